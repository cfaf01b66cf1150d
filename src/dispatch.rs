//! Request dispatch: one handler per request kind.
//!
//! The [`Dispatcher`] maps every [`RequestKind`] to a handler function and
//! refuses to start unless the table covers [`RequestKind::ALL`]. Each
//! request is answered with exactly one [`Response`]:
//!
//! - `Success` with the kind's named payload field
//! - `Fail` for expected absences and malformed requests
//! - `Error` for oracle faults, encoding faults and handler panics

use std::collections::HashMap;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;

use serde::Serialize;

use crate::assemble::Assembler;
use crate::compose::{Composer, Depth};
use crate::error::{DispatchError, OntoResult, QueryError, QueryResult};
use crate::model::EntityKind;
use crate::oracle::Oracle;
use crate::protocol::{GetType, Request, RequestKind, Response};
use crate::resolve::Resolver;
use crate::search::SearchEngine;

/// A request handler. Returns the success response or the reason it failed.
pub type Handler = fn(&Context<'_>, &Request) -> QueryResult<Response>;

// ---------------------------------------------------------------------------
// Handler context
// ---------------------------------------------------------------------------

/// Query components bound to the oracle for the duration of one request.
pub struct Context<'a> {
    pub kind: RequestKind,
    pub resolver: Resolver<'a>,
    pub composer: Composer<'a>,
    pub assembler: Assembler<'a>,
    pub search: SearchEngine<'a>,
}

impl<'a> Context<'a> {
    fn new(oracle: &'a dyn Oracle, name_attribute: &'a str, kind: RequestKind) -> Self {
        Self {
            kind,
            resolver: Resolver::new(oracle),
            composer: Composer::new(oracle),
            assembler: Assembler::new(oracle, name_attribute),
            search: SearchEngine::new(oracle, name_attribute),
        }
    }

    /// A required string field of the request data.
    pub fn field<'r>(&self, request: &'r Request, name: &str) -> QueryResult<&'r str> {
        request.field(name).ok_or_else(|| {
            QueryError::malformed(format!(
                "Missing field \"{name}\" in {} request.",
                self.kind
            ))
        })
    }

    /// A required `Direct`/`All` field of the request data.
    pub fn depth(&self, request: &Request, name: &str) -> QueryResult<Depth> {
        let value = self.field(request, name)?;
        match value.parse::<GetType>() {
            Ok(GetType::Direct) => Ok(Depth::Direct),
            Ok(GetType::All) => Ok(Depth::All),
            Err(_) => Err(QueryError::malformed(format!(
                "Invalid value \"{value}\" for \"{name}\"; expected \"Direct\" or \"All\"."
            ))),
        }
    }
}

/// Success response with `payload` encoded under `field`.
fn success(field: &str, payload: impl Serialize) -> QueryResult<Response> {
    let value = serde_json::to_value(payload).map_err(|e| QueryError::Encode {
        field: field.to_string(),
        message: e.to_string(),
    })?;
    Ok(Response::success(field, value))
}

// ---------------------------------------------------------------------------
// Dispatcher
// ---------------------------------------------------------------------------

/// Stateless request dispatcher over a shared read-only oracle.
pub struct Dispatcher {
    oracle: Arc<dyn Oracle>,
    name_attribute: String,
    handlers: HashMap<RequestKind, Handler>,
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("namespace", &self.oracle.namespace())
            .field("name_attribute", &self.name_attribute)
            .field("handlers", &self.handlers.len())
            .finish()
    }
}

impl Dispatcher {
    /// Dispatcher with the built-in handler table.
    pub fn new(oracle: Arc<dyn Oracle>, name_attribute: impl Into<String>) -> OntoResult<Self> {
        Self::with_handlers(oracle, name_attribute, builtin_handlers())
    }

    /// Dispatcher with a custom handler table. Fails if any request kind is
    /// left without a handler.
    pub fn with_handlers(
        oracle: Arc<dyn Oracle>,
        name_attribute: impl Into<String>,
        handlers: HashMap<RequestKind, Handler>,
    ) -> OntoResult<Self> {
        if let Some(kind) = RequestKind::ALL.iter().find(|k| !handlers.contains_key(k)) {
            return Err(DispatchError::MissingHandler {
                kind: kind.to_string(),
            }
            .into());
        }
        Ok(Self {
            oracle,
            name_attribute: name_attribute.into(),
            handlers,
        })
    }

    pub fn oracle(&self) -> &Arc<dyn Oracle> {
        &self.oracle
    }

    /// Answer one decoded request.
    pub fn handle(&self, request: &Request) -> Response {
        let kind = match request.kind.parse::<RequestKind>() {
            Ok(kind) => kind,
            Err(tag) => {
                tracing::debug!(tag = %tag, "unknown request type");
                return Response::fail(format!("Unknown request type \"{tag}\"."));
            }
        };
        tracing::debug!(kind = %kind, "request received");

        let Some(handler) = self.handlers.get(&kind) else {
            return Response::error(format!("No handler registered for {kind}."));
        };

        let ctx = Context::new(self.oracle.as_ref(), &self.name_attribute, kind);
        for name in kind.required_fields() {
            if let Err(e) = ctx.field(request, name) {
                tracing::debug!(kind = %kind, field = %name, "required field missing");
                return Response::fail(e.to_string());
            }
        }
        match catch_unwind(AssertUnwindSafe(|| handler(&ctx, request))) {
            Ok(Ok(response)) => response,
            Ok(Err(e)) if e.is_fail() => {
                tracing::debug!(kind = %kind, reason = %e, "request failed");
                Response::fail(e.to_string())
            }
            Ok(Err(e)) => {
                tracing::error!(kind = %kind, error = %e, "request errored");
                Response::error(e.to_string())
            }
            Err(panic) => {
                let message = panic_message(panic.as_ref());
                tracing::error!(kind = %kind, panic = %message, "handler panicked");
                Response::error(message)
            }
        }
    }

    /// Decode a JSON request, answer it and encode the response.
    pub fn process(&self, text: &str) -> String {
        let response = match Request::from_json(text) {
            Ok(request) => self.handle(&request),
            Err(e) => {
                tracing::debug!(error = %e, "malformed request envelope");
                Response::fail(format!("Malformed request: {e}."))
            }
        };
        response.to_json()
    }
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "request handler panicked".to_string()
    }
}

// ---------------------------------------------------------------------------
// Built-in handlers
// ---------------------------------------------------------------------------

/// The handler table covering every request kind.
pub fn builtin_handlers() -> HashMap<RequestKind, Handler> {
    use RequestKind::*;

    let table: [(RequestKind, Handler); 24] = [
        (GetComment, get_comment),
        (GetClass, get_class),
        (GetSuperClasses, get_super_classes),
        (GetSubClasses, get_sub_classes),
        (GetDomainRelations, get_domain_relations),
        (GetRangeRelations, get_range_relations),
        (GetClassAttributes, get_class_attributes),
        (GetClassIndividuals, get_class_individuals),
        (GetRelation, get_relation),
        (GetRelations, get_relations),
        (GetInverseRelation, get_inverse_relation),
        (GetRelationDomains, get_relation_domains),
        (GetRelationRanges, get_relation_ranges),
        (GetAttribute, get_attribute),
        (GetAttributes, get_attributes),
        (GetAttributeDomains, get_attribute_domains),
        (GetIndividual, get_individual),
        (GetIndividuals, get_individuals),
        (GetIndividualClasses, get_individual_classes),
        (GetRelationValue, get_relation_value),
        (GetRelationValues, get_relation_values),
        (GetAttributeValues, get_attribute_values),
        (GetAttributeValuesByAttributeName, get_attribute_values_by_attribute_name),
        (SearchIndividuals, search_individuals),
    ];
    table.into_iter().collect()
}

fn get_comment(ctx: &Context<'_>, request: &Request) -> QueryResult<Response> {
    let name = ctx.field(request, "Object")?;
    let kinds = [
        EntityKind::Relation,
        EntityKind::Attribute,
        EntityKind::Class,
        EntityKind::Individual,
    ];
    let entity = ctx
        .resolver
        .resolve_any(&kinds, name)?
        .ok_or_else(|| QueryError::not_found(format!("Object \"{name}\" not found.")))?;
    let comment = ctx
        .composer
        .oracle()
        .comment(entity.id())?
        .ok_or_else(|| QueryError::not_found(format!("Comment of \"{name}\" not found.")))?;
    success("Comment", comment)
}

fn get_class(ctx: &Context<'_>, request: &Request) -> QueryResult<Response> {
    let class = ctx.resolver.class(ctx.field(request, "Class")?)?;
    success("Class", ctx.assembler.class(&class)?)
}

fn get_super_classes(ctx: &Context<'_>, request: &Request) -> QueryResult<Response> {
    let name = ctx.field(request, "Class")?;
    let depth = ctx.depth(request, "GetSuperClassType")?;
    let class = ctx.resolver.class(name)?;
    let supers = ctx.composer.super_classes(&class, depth)?;
    success("SuperClasses", ctx.assembler.classes(&supers)?)
}

fn get_sub_classes(ctx: &Context<'_>, request: &Request) -> QueryResult<Response> {
    let name = ctx.field(request, "Class")?;
    let depth = ctx.depth(request, "GetSubClassType")?;
    let class = ctx.resolver.class(name)?;
    let subs = ctx.composer.sub_classes(&class, depth)?;
    success("SubClasses", ctx.assembler.classes(&subs)?)
}

fn get_domain_relations(ctx: &Context<'_>, request: &Request) -> QueryResult<Response> {
    let class = ctx.resolver.class(ctx.field(request, "Class")?)?;
    let relations = ctx.composer.domain_relations(&class)?;
    success("DomainRelations", ctx.assembler.relations(&relations)?)
}

fn get_range_relations(ctx: &Context<'_>, request: &Request) -> QueryResult<Response> {
    let class = ctx.resolver.class(ctx.field(request, "Class")?)?;
    let relations = ctx.composer.range_relations(&class)?;
    success("RangeRelations", ctx.assembler.relations(&relations)?)
}

fn get_class_attributes(ctx: &Context<'_>, request: &Request) -> QueryResult<Response> {
    let class = ctx.resolver.class(ctx.field(request, "Class")?)?;
    let attributes = ctx.composer.class_attributes(&class)?;
    success("ClassAttributes", ctx.assembler.attributes(&attributes)?)
}

fn get_class_individuals(ctx: &Context<'_>, request: &Request) -> QueryResult<Response> {
    let name = ctx.field(request, "Class")?;
    let depth = ctx.depth(request, "GetIndividualType")?;
    let class = ctx.resolver.class(name)?;
    let individuals = ctx.composer.class_individuals(&class, depth)?;
    success("ClassIndividuals", ctx.assembler.individuals(&individuals)?)
}

fn get_relation(ctx: &Context<'_>, request: &Request) -> QueryResult<Response> {
    let relation = ctx.resolver.relation(ctx.field(request, "Relation")?)?;
    success("Relation", ctx.assembler.relation(&relation)?)
}

fn get_relations(ctx: &Context<'_>, _request: &Request) -> QueryResult<Response> {
    let relations = ctx.composer.relations()?;
    success("Relations", ctx.assembler.relations(&relations)?)
}

fn get_inverse_relation(ctx: &Context<'_>, request: &Request) -> QueryResult<Response> {
    let relation = ctx.resolver.relation(ctx.field(request, "Relation")?)?;
    let inverse = ctx.composer.inverse_relation(&relation)?;
    success("InverseRelation", ctx.assembler.relation(&inverse)?)
}

fn get_relation_domains(ctx: &Context<'_>, request: &Request) -> QueryResult<Response> {
    let name = ctx.field(request, "Relation")?;
    let depth = ctx.depth(request, "GetDomainType")?;
    let relation = ctx.resolver.relation(name)?;
    let domains = ctx.composer.relation_domains(&relation, depth)?;
    success("RelationDomains", ctx.assembler.classes(&domains)?)
}

fn get_relation_ranges(ctx: &Context<'_>, request: &Request) -> QueryResult<Response> {
    let name = ctx.field(request, "Relation")?;
    let depth = ctx.depth(request, "GetRangeType")?;
    let relation = ctx.resolver.relation(name)?;
    let ranges = ctx.composer.relation_ranges(&relation, depth)?;
    success("RelationRanges", ctx.assembler.classes(&ranges)?)
}

fn get_attribute(ctx: &Context<'_>, request: &Request) -> QueryResult<Response> {
    let attribute = ctx.resolver.attribute(ctx.field(request, "Attribute")?)?;
    success("Attribute", ctx.assembler.attribute(&attribute)?)
}

fn get_attributes(ctx: &Context<'_>, _request: &Request) -> QueryResult<Response> {
    let attributes = ctx.composer.attributes()?;
    success("Attributes", ctx.assembler.attributes(&attributes)?)
}

fn get_attribute_domains(ctx: &Context<'_>, request: &Request) -> QueryResult<Response> {
    let name = ctx.field(request, "Attribute")?;
    let depth = ctx.depth(request, "GetDomainType")?;
    let attribute = ctx.resolver.attribute(name)?;
    let domains = ctx.composer.attribute_domains(&attribute, depth)?;
    success("AttributeDomains", ctx.assembler.classes(&domains)?)
}

fn get_individual(ctx: &Context<'_>, request: &Request) -> QueryResult<Response> {
    let individual = ctx.resolver.individual(ctx.field(request, "Individual")?)?;
    success("Individual", ctx.assembler.individual(&individual)?)
}

fn get_individuals(ctx: &Context<'_>, _request: &Request) -> QueryResult<Response> {
    let individuals = ctx.composer.individuals()?;
    success("Individuals", ctx.assembler.individuals(&individuals)?)
}

fn get_individual_classes(ctx: &Context<'_>, request: &Request) -> QueryResult<Response> {
    let name = ctx.field(request, "Individual")?;
    let depth = ctx.depth(request, "GetClassType")?;
    let individual = ctx.resolver.individual(name)?;
    match depth {
        Depth::Direct => {
            let class = ctx.composer.individual_class(&individual)?;
            success("IndividualClass", ctx.assembler.class(&class)?)
        }
        Depth::All => {
            let classes = ctx.composer.individual_classes(&individual)?;
            success("IndividualClasses", ctx.assembler.classes(&classes)?)
        }
    }
}

fn get_relation_value(ctx: &Context<'_>, request: &Request) -> QueryResult<Response> {
    let individual_name = ctx.field(request, "Individual")?;
    let relation_name = ctx.field(request, "Relation")?;
    let individual = ctx.resolver.individual(individual_name)?;
    let relation = ctx.resolver.relation(relation_name)?;
    let values = ctx.composer.relation_value(&individual, &relation)?;
    success("RelationValue", ctx.assembler.individual_list(&values)?)
}

fn get_relation_values(ctx: &Context<'_>, request: &Request) -> QueryResult<Response> {
    let individual = ctx.resolver.individual(ctx.field(request, "Individual")?)?;
    let pairs = ctx.composer.relation_values(&individual)?;
    success("RelationValues", ctx.assembler.relation_values(pairs)?)
}

fn get_attribute_values(ctx: &Context<'_>, request: &Request) -> QueryResult<Response> {
    let individual = ctx.resolver.individual(ctx.field(request, "Individual")?)?;
    let pairs = ctx.composer.attribute_values(&individual)?;
    success("AttributeValues", ctx.assembler.attribute_values(pairs)?)
}

fn get_attribute_values_by_attribute_name(
    ctx: &Context<'_>,
    request: &Request,
) -> QueryResult<Response> {
    let individual_name = ctx.field(request, "Individual")?;
    let attribute_name = ctx.field(request, "Attribute")?;
    let individual = ctx.resolver.individual(individual_name)?;
    let attribute = ctx.resolver.attribute(attribute_name)?;
    let values = ctx.composer.attribute_value(&individual, &attribute)?;
    success("AttributeValues", values)
}

fn search_individuals(ctx: &Context<'_>, request: &Request) -> QueryResult<Response> {
    let keywords = ctx.field(request, "Keywords")?;
    success("SearchIndividuals", ctx.search.search(keywords)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    use crate::error::{OracleError, OracleResult};
    use crate::oracle::owl::tests::test_oracle;
    use crate::oracle::{
        AttributeRef, AxiomLookup, ClassExpression, ClassRef, DataRangeAxiom, IndividualRef,
        RelationRef,
    };
    use crate::protocol::Status;

    fn test_dispatcher() -> Dispatcher {
        Dispatcher::new(Arc::new(test_oracle()), "name").unwrap()
    }

    /// Oracle whose backing store is unreachable.
    struct Offline;

    fn offline<T>() -> OracleResult<T> {
        Err(OracleError::Internal {
            message: "store offline".into(),
        })
    }

    impl Oracle for Offline {
        fn namespace(&self) -> &str {
            ""
        }
        fn class_exists(&self, _: &str) -> OracleResult<bool> {
            offline()
        }
        fn relation_exists(&self, _: &str) -> OracleResult<bool> {
            offline()
        }
        fn attribute_exists(&self, _: &str) -> OracleResult<bool> {
            offline()
        }
        fn individual_exists(&self, _: &str) -> OracleResult<bool> {
            offline()
        }
        fn super_classes(&self, _: &ClassRef, _: bool) -> OracleResult<BTreeSet<ClassRef>> {
            offline()
        }
        fn sub_classes(&self, _: &ClassRef, _: bool) -> OracleResult<BTreeSet<ClassRef>> {
            offline()
        }
        fn expression_sub_classes(
            &self,
            _: &ClassExpression,
            _: bool,
        ) -> OracleResult<BTreeSet<ClassRef>> {
            offline()
        }
        fn instances(&self, _: &ClassRef, _: bool) -> OracleResult<BTreeSet<IndividualRef>> {
            offline()
        }
        fn types(&self, _: &IndividualRef, _: bool) -> OracleResult<BTreeSet<ClassRef>> {
            offline()
        }
        fn class_assertions(&self, _: &IndividualRef) -> OracleResult<Vec<ClassExpression>> {
            offline()
        }
        fn relation_domain(&self, _: &RelationRef) -> OracleResult<AxiomLookup<ClassExpression>> {
            offline()
        }
        fn relation_range(&self, _: &RelationRef) -> OracleResult<AxiomLookup<ClassExpression>> {
            offline()
        }
        fn attribute_domain(
            &self,
            _: &AttributeRef,
        ) -> OracleResult<AxiomLookup<ClassExpression>> {
            offline()
        }
        fn attribute_range(
            &self,
            _: &AttributeRef,
        ) -> OracleResult<AxiomLookup<DataRangeAxiom>> {
            offline()
        }
        fn relation_values(
            &self,
            _: &IndividualRef,
            _: &RelationRef,
        ) -> OracleResult<Vec<IndividualRef>> {
            offline()
        }
        fn attribute_values(
            &self,
            _: &IndividualRef,
            _: &AttributeRef,
        ) -> OracleResult<Vec<String>> {
            offline()
        }
        fn inverse_relations(&self, _: &RelationRef) -> OracleResult<BTreeSet<RelationRef>> {
            offline()
        }
        fn label(&self, _: &str) -> OracleResult<Option<String>> {
            offline()
        }
        fn comment(&self, _: &str) -> OracleResult<Option<String>> {
            offline()
        }
        fn classes(&self) -> OracleResult<BTreeSet<ClassRef>> {
            offline()
        }
        fn relations(&self) -> OracleResult<BTreeSet<RelationRef>> {
            offline()
        }
        fn attributes(&self) -> OracleResult<BTreeSet<AttributeRef>> {
            offline()
        }
        fn individuals(&self) -> OracleResult<BTreeSet<IndividualRef>> {
            offline()
        }
    }

    #[test]
    fn table_covers_every_kind() {
        let handlers = builtin_handlers();
        for kind in RequestKind::ALL {
            assert!(handlers.contains_key(kind), "{kind}");
        }
    }

    #[test]
    fn incomplete_table_is_rejected() {
        let mut handlers = builtin_handlers();
        handlers.remove(&RequestKind::SearchIndividuals);
        let err = Dispatcher::with_handlers(Arc::new(test_oracle()), "name", handlers).unwrap_err();
        assert!(err.to_string().contains("SearchIndividuals"));
    }

    #[test]
    fn unknown_kind_fails() {
        let dispatcher = test_dispatcher();
        let response = dispatcher.handle(&Request {
            kind: "GetWeather".into(),
            data: None,
        });
        assert_eq!(response.status, Status::Fail);
        assert_eq!(
            response.message.as_deref(),
            Some("Unknown request type \"GetWeather\".")
        );
    }

    #[test]
    fn missing_field_fails() {
        let dispatcher = test_dispatcher();
        let response = dispatcher.handle(&Request::new(RequestKind::GetClass));
        assert_eq!(response.status, Status::Fail);
        assert_eq!(
            response.message.as_deref(),
            Some("Missing field \"Class\" in GetClass request.")
        );
    }

    #[test]
    fn required_fields_are_checked_before_the_handler() {
        fn unreachable(_: &Context<'_>, _: &Request) -> QueryResult<Response> {
            panic!("handler ran without its fields")
        }
        let mut handlers = builtin_handlers();
        handlers.insert(RequestKind::GetRelationValue, unreachable);
        let dispatcher =
            Dispatcher::with_handlers(Arc::new(test_oracle()), "name", handlers).unwrap();
        let request = Request::new(RequestKind::GetRelationValue).with("Individual", "IR64");
        let response = dispatcher.handle(&request);
        assert_eq!(response.status, Status::Fail);
        assert_eq!(
            response.message.as_deref(),
            Some("Missing field \"Relation\" in GetRelationValue request.")
        );
    }

    #[test]
    fn oracle_fault_is_an_error_not_a_fail() {
        let dispatcher = Dispatcher::new(Arc::new(Offline), "name").unwrap();
        for request in [
            Request::new(RequestKind::GetRelations),
            Request::new(RequestKind::GetClass).with("Class", "Rice"),
        ] {
            let response = dispatcher.handle(&request);
            assert_eq!(response.status, Status::Error, "{}", request.kind);
            assert!(response.message.unwrap().contains("store offline"));
        }
    }

    #[test]
    fn invalid_depth_fails() {
        let dispatcher = test_dispatcher();
        let request = Request::new(RequestKind::GetSubClasses)
            .with("Class", "Rice")
            .with("GetSubClassType", "Some");
        let response = dispatcher.handle(&request);
        assert_eq!(response.status, Status::Fail);
        assert!(response.message.unwrap().contains("GetSubClassType"));
    }

    #[test]
    fn thing_always_resolves() {
        let dispatcher = test_dispatcher();
        let response = dispatcher.handle(&Request::new(RequestKind::GetClass).with("Class", "Thing"));
        assert!(response.is_success());
        let class: crate::model::Class = response.payload("Class").unwrap().unwrap();
        assert_eq!(class.id(), "Thing");
    }

    #[test]
    fn panicking_handler_becomes_error() {
        fn boom(_: &Context<'_>, _: &Request) -> QueryResult<Response> {
            panic!("oracle exploded")
        }
        let mut handlers = builtin_handlers();
        handlers.insert(RequestKind::GetRelations, boom);
        let dispatcher =
            Dispatcher::with_handlers(Arc::new(test_oracle()), "name", handlers).unwrap();
        let response = dispatcher.handle(&Request::new(RequestKind::GetRelations));
        assert_eq!(response.status, Status::Error);
        assert_eq!(response.message.as_deref(), Some("oracle exploded"));
    }

    #[test]
    fn process_handles_garbage() {
        let dispatcher = test_dispatcher();
        let out = dispatcher.process("{not json");
        let response = Response::from_json(&out).unwrap();
        assert_eq!(response.status, Status::Fail);
        assert!(response.message.unwrap().starts_with("Malformed request"));
    }

    #[test]
    fn comment_lookup_order() {
        let dispatcher = test_dispatcher();
        let response = dispatcher.handle(&Request::new(RequestKind::GetComment).with("Object", "damages"));
        let comment: String = response.payload("Comment").unwrap().unwrap();
        assert_eq!(comment, "Gây hại cho cây trồng.");

        let response = dispatcher.handle(&Request::new(RequestKind::GetComment).with("Object", "Pest"));
        assert!(response.is_success());

        let response = dispatcher.handle(&Request::new(RequestKind::GetComment).with("Object", "IR64"));
        assert_eq!(response.message.as_deref(), Some("Comment of \"IR64\" not found."));

        let response = dispatcher.handle(&Request::new(RequestKind::GetComment).with("Object", "Ghost"));
        assert_eq!(response.message.as_deref(), Some("Object \"Ghost\" not found."));
    }
}
