//! Bundled oracle over an OWL document.
//!
//! The document is parsed into an in-memory oxigraph store, the facts the
//! query layer needs are pulled out with SPARQL SELECT queries, and the store
//! is dropped. What remains is a set of immutable indexes plus a [`Taxonomy`],
//! so the oracle is `Send + Sync` and never blocks on a lock.
//!
//! Reasoning is structural: told subsumption closed transitively, types
//! inherited along the class hierarchy and property values implied by
//! declared inverses. No tableau, no consistency checking.

use std::collections::{BTreeSet, HashMap, HashSet};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use oxigraph::io::RdfFormat;
use oxigraph::model::Term;
use oxigraph::sparql::QueryResults;
use oxigraph::store::Store;

use crate::error::{OracleError, OracleResult};
use crate::model::DataType;

use super::{
    AttributeRef, AxiomLookup, ClassExpression, ClassRef, DataRangeAxiom, ExpressionOperator,
    IndividualRef, NOTHING, Oracle, RelationRef, THING, Taxonomy,
};

const RDF_NIL: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#nil";
const OWL_NS: &str = "http://www.w3.org/2002/07/owl#";
const XSD_NS: &str = "http://www.w3.org/2001/XMLSchema#";

const PREFIXES: &str = "\
PREFIX rdf: <http://www.w3.org/1999/02/22-rdf-syntax-ns#>
PREFIX rdfs: <http://www.w3.org/2000/01/rdf-schema#>
PREFIX owl: <http://www.w3.org/2002/07/owl#>
";

/// Loading options for [`OwlOracle`].
#[derive(Debug, Clone)]
pub struct OracleSettings {
    /// Entity namespace. Derived from the `owl:Ontology` IRI when absent.
    pub namespace: Option<String>,
    /// Preferred language tag for labels and comments.
    pub language: String,
}

impl Default for OracleSettings {
    fn default() -> Self {
        Self {
            namespace: None,
            language: "vi".into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Extracted RDF terms
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum Node {
    Iri(String),
    Blank(String),
    Literal {
        value: String,
        language: Option<String>,
    },
}

impl Node {
    fn from_term(term: &Term) -> Option<Self> {
        match term {
            Term::NamedNode(node) => Some(Self::Iri(node.as_str().to_string())),
            Term::BlankNode(node) => Some(Self::Blank(node.as_str().to_string())),
            Term::Literal(literal) => Some(Self::Literal {
                value: literal.value().to_string(),
                language: literal.language().map(str::to_string),
            }),
            #[allow(unreachable_patterns)]
            _ => None,
        }
    }
}

/// A localized annotation value.
#[derive(Debug, Clone)]
struct Localized {
    value: String,
    language: Option<String>,
}

/// First value tagged with `language`, else the last value.
fn pick_localized(values: &[Localized], language: &str) -> Option<String> {
    values
        .iter()
        .find(|v| v.language.as_deref() == Some(language))
        .or_else(|| values.last())
        .map(|v| v.value.clone())
}

/// Run a SELECT query and project the named variables of every solution.
#[allow(deprecated)]
fn select(store: &Store, query: &str, vars: &[&str]) -> OracleResult<Vec<Vec<Option<Node>>>> {
    let sparql = format!("{PREFIXES}{query}");
    let results = store.query(sparql.as_str()).map_err(|e| OracleError::Sparql {
        message: format!("extraction query failed: {e}"),
    })?;

    let QueryResults::Solutions(solutions) = results else {
        return Err(OracleError::Sparql {
            message: "extraction query did not return solutions".into(),
        });
    };

    let mut rows = Vec::new();
    for solution in solutions {
        let solution = solution.map_err(|e| OracleError::Sparql {
            message: format!("solution error: {e}"),
        })?;
        rows.push(
            vars.iter()
                .map(|var| solution.get(*var).and_then(Node::from_term))
                .collect(),
        );
    }
    Ok(rows)
}

fn format_for(path: &Path) -> RdfFormat {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .as_deref()
    {
        Some("nt") => RdfFormat::NTriples,
        Some("owl" | "rdf" | "xml") => RdfFormat::RdfXml,
        _ => RdfFormat::Turtle,
    }
}

// ---------------------------------------------------------------------------
// OwlOracle
// ---------------------------------------------------------------------------

type ValueIndex<T> = HashMap<String, HashMap<String, T>>;

/// [`Oracle`] over an OWL document, indexed at load time.
#[derive(Debug)]
pub struct OwlOracle {
    namespace: String,
    language: String,
    taxonomy: Taxonomy,
    relations: BTreeSet<String>,
    attributes: BTreeSet<String>,
    individuals: BTreeSet<String>,
    asserted_types: HashMap<String, BTreeSet<String>>,
    class_assertions: HashMap<String, Vec<ClassExpression>>,
    relation_domains: HashMap<String, Vec<ClassExpression>>,
    relation_ranges: HashMap<String, Vec<ClassExpression>>,
    attribute_domains: HashMap<String, Vec<ClassExpression>>,
    attribute_ranges: HashMap<String, Vec<DataRangeAxiom>>,
    inverses: HashMap<String, BTreeSet<String>>,
    relation_values: ValueIndex<BTreeSet<String>>,
    attribute_values: ValueIndex<Vec<String>>,
    labels: HashMap<String, Vec<Localized>>,
    comments: HashMap<String, Vec<Localized>>,
}

impl OwlOracle {
    /// Load an ontology document. The RDF syntax is chosen by file extension.
    pub fn load(path: &Path, settings: &OracleSettings) -> OracleResult<Self> {
        let file = File::open(path).map_err(|source| OracleError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let store = Self::new_store()?;
        store
            .load_from_reader(format_for(path), BufReader::new(file))
            .map_err(|e| OracleError::Parse {
                message: format!("{}: {e}", path.display()),
            })?;
        Self::from_store(&store, settings)
    }

    /// Build from a Turtle document held in memory.
    pub fn from_turtle_str(turtle: &str, settings: &OracleSettings) -> OracleResult<Self> {
        let store = Self::new_store()?;
        store
            .load_from_reader(RdfFormat::Turtle, turtle.as_bytes())
            .map_err(|e| OracleError::Parse {
                message: e.to_string(),
            })?;
        Self::from_store(&store, settings)
    }

    fn new_store() -> OracleResult<Store> {
        Store::new().map_err(|e| OracleError::Internal {
            message: format!("failed to create oxigraph store: {e}"),
        })
    }

    /// Extract every fact from a populated store.
    pub fn from_store(store: &Store, settings: &OracleSettings) -> OracleResult<Self> {
        let namespace = match &settings.namespace {
            Some(ns) => ns.clone(),
            None => ontology_namespace(store)?,
        };
        let mut loader = Loader::new(store, namespace);
        loader.declarations()?;
        loader.subsumptions()?;
        loader.expressions()?;
        loader.property_axioms()?;
        loader.assertions()?;
        loader.annotations()?;
        let oracle = loader.finish(settings.language.clone());

        tracing::info!(
            namespace = %oracle.namespace,
            classes = oracle.taxonomy.len(),
            relations = oracle.relations.len(),
            attributes = oracle.attributes.len(),
            individuals = oracle.individuals.len(),
            "ontology loaded"
        );
        Ok(oracle)
    }

    fn direct_types(&self, individual: &str) -> BTreeSet<String> {
        let named: BTreeSet<String> = self
            .asserted_types
            .get(individual)
            .into_iter()
            .flatten()
            .filter(|c| c.as_str() != THING)
            .cloned()
            .collect();
        self.taxonomy.most_specific(&named)
    }

    fn all_types(&self, individual: &str) -> BTreeSet<String> {
        let mut types = BTreeSet::new();
        for class in self.asserted_types.get(individual).into_iter().flatten() {
            types.insert(class.clone());
            types.extend(self.taxonomy.ancestors(class));
        }
        types.remove(THING);
        types
    }

    fn class_set(ids: impl IntoIterator<Item = String>) -> BTreeSet<ClassRef> {
        ids.into_iter().map(ClassRef::new).collect()
    }
}

/// `owl:Ontology` IRI with a `#` separator appended when it has none.
fn ontology_namespace(store: &Store) -> OracleResult<String> {
    let rows = select(store, "SELECT ?o WHERE { ?o a owl:Ontology }", &["o"])?;
    rows.into_iter()
        .find_map(|row| match row.into_iter().next().flatten() {
            Some(Node::Iri(iri)) => Some(iri),
            _ => None,
        })
        .map(|iri| {
            if iri.ends_with('#') || iri.ends_with('/') {
                iri
            } else {
                format!("{iri}#")
            }
        })
        .ok_or(OracleError::MissingNamespace)
}

// ---------------------------------------------------------------------------
// Loader
// ---------------------------------------------------------------------------

/// Mutable state while facts are pulled out of the store.
struct Loader<'a> {
    store: &'a Store,
    namespace: String,
    classes: BTreeSet<String>,
    relations: BTreeSet<String>,
    attributes: BTreeSet<String>,
    individuals: BTreeSet<String>,
    subsumptions: Vec<(String, String)>,
    typed: Vec<(String, Node)>,
    expressions: HashMap<String, (ExpressionOperator, Vec<Node>)>,
    fillers: HashMap<String, Vec<Node>>,
    has_values: HashMap<String, Vec<Node>>,
    one_of: HashMap<String, Vec<Node>>,
    domains: Vec<(String, Node)>,
    ranges: Vec<(String, Node)>,
    inverse_pairs: Vec<(String, String)>,
    assertions: Vec<(String, String, Node)>,
    labels: HashMap<String, Vec<Localized>>,
    comments: HashMap<String, Vec<Localized>>,
}

impl<'a> Loader<'a> {
    fn new(store: &'a Store, namespace: String) -> Self {
        Self {
            store,
            namespace,
            classes: BTreeSet::new(),
            relations: BTreeSet::new(),
            attributes: BTreeSet::new(),
            individuals: BTreeSet::new(),
            subsumptions: Vec::new(),
            typed: Vec::new(),
            expressions: HashMap::new(),
            fillers: HashMap::new(),
            has_values: HashMap::new(),
            one_of: HashMap::new(),
            domains: Vec::new(),
            ranges: Vec::new(),
            inverse_pairs: Vec::new(),
            assertions: Vec::new(),
            labels: HashMap::new(),
            comments: HashMap::new(),
        }
    }

    /// Local name of an IRI inside the namespace.
    fn local(&self, iri: &str) -> Option<String> {
        iri.strip_prefix(self.namespace.as_str())
            .filter(|rest| !rest.is_empty())
            .map(str::to_string)
    }

    /// Class identifier of an IRI: a local name, `Thing` or `Nothing`.
    fn class_id(&self, iri: &str) -> Option<String> {
        match iri.strip_prefix(OWL_NS) {
            Some("Thing") => Some(THING.to_string()),
            Some("Nothing") => Some(NOTHING.to_string()),
            _ => self.local(iri),
        }
    }

    fn declarations(&mut self) -> OracleResult<()> {
        let rows = select(self.store, "SELECT ?s ?t WHERE { ?s rdf:type ?t }", &["s", "t"])?;
        for row in rows {
            let [Some(Node::Iri(subject)), Some(object)] = row.as_slice() else {
                continue;
            };
            let Some(id) = self.local(subject) else {
                continue;
            };
            let declared = match object {
                Node::Iri(t) => t.strip_prefix(OWL_NS).or_else(|| {
                    t.strip_prefix("http://www.w3.org/2000/01/rdf-schema#")
                        .filter(|rest| *rest == "Class")
                }),
                _ => None,
            };
            match declared {
                Some("Class") => {
                    self.classes.insert(id);
                }
                Some(
                    "ObjectProperty"
                    | "TransitiveProperty"
                    | "SymmetricProperty"
                    | "AsymmetricProperty"
                    | "ReflexiveProperty"
                    | "IrreflexiveProperty"
                    | "InverseFunctionalProperty",
                ) => {
                    self.relations.insert(id);
                }
                Some("DatatypeProperty") => {
                    self.attributes.insert(id);
                }
                Some("NamedIndividual") => {
                    self.individuals.insert(id);
                }
                Some("Thing") => self.typed.push((id, object.clone())),
                Some(_) => {}
                None => self.typed.push((id, object.clone())),
            }
        }
        Ok(())
    }

    fn subsumptions(&mut self) -> OracleResult<()> {
        let rows = select(
            self.store,
            "SELECT ?sub ?sup WHERE { ?sub rdfs:subClassOf ?sup }",
            &["sub", "sup"],
        )?;
        for row in rows {
            let [Some(Node::Iri(sub)), Some(Node::Iri(sup))] = row.as_slice() else {
                continue;
            };
            if let (Some(sub), Some(sup)) = (self.class_id(sub), self.class_id(sup)) {
                for id in [&sub, &sup] {
                    if id != THING && id != NOTHING {
                        self.classes.insert(id.clone());
                    }
                }
                self.subsumptions.push((sub, sup));
            }
        }
        Ok(())
    }

    fn expressions(&mut self) -> OracleResult<()> {
        let cells = select(
            self.store,
            "SELECT ?cell ?first ?rest WHERE { ?cell rdf:first ?first . ?cell rdf:rest ?rest }",
            &["cell", "first", "rest"],
        )?;
        let mut list: HashMap<Node, (Node, Node)> = HashMap::new();
        for row in cells {
            if let [Some(cell), Some(first), Some(rest)] = row.as_slice() {
                list.insert(cell.clone(), (first.clone(), rest.clone()));
            }
        }

        let rows = select(
            self.store,
            "SELECT ?node ?op ?list WHERE { \
                ?node ?op ?list . \
                FILTER(?op IN (owl:unionOf, owl:intersectionOf, owl:oneOf)) \
            }",
            &["node", "op", "list"],
        )?;
        for row in rows {
            let [Some(Node::Blank(node)), Some(Node::Iri(op)), Some(head)] = row.as_slice() else {
                continue;
            };
            let members = walk_list(&list, head);
            match op.strip_prefix(OWL_NS) {
                Some("unionOf") => {
                    self.expressions
                        .insert(node.clone(), (ExpressionOperator::Union, members));
                }
                Some("intersectionOf") => {
                    self.expressions
                        .insert(node.clone(), (ExpressionOperator::Intersection, members));
                }
                Some("oneOf") => {
                    self.one_of.insert(node.clone(), members);
                }
                _ => {}
            }
        }

        // Restriction fillers and complements.
        let rows = select(
            self.store,
            "SELECT ?node ?op ?filler WHERE { \
                ?node ?op ?filler . \
                FILTER(isBlank(?node) && ?op IN (owl:someValuesFrom, owl:allValuesFrom, \
                    owl:onClass, owl:complementOf, owl:hasValue)) \
            }",
            &["node", "op", "filler"],
        )?;
        for row in rows {
            let [Some(Node::Blank(node)), Some(Node::Iri(op)), Some(filler)] = row.as_slice()
            else {
                continue;
            };
            let target = if op.strip_prefix(OWL_NS) == Some("hasValue") {
                &mut self.has_values
            } else {
                &mut self.fillers
            };
            target.entry(node.clone()).or_default().push(filler.clone());
        }
        Ok(())
    }

    /// `(property, object)` pairs of every triple with the given predicate.
    fn property_objects(&self, predicate: &str) -> OracleResult<Vec<(String, Node)>> {
        let rows = select(
            self.store,
            &format!("SELECT ?p ?c WHERE {{ ?p {predicate} ?c }}"),
            &["p", "c"],
        )?;
        Ok(rows
            .into_iter()
            .filter_map(|row| match row.as_slice() {
                [Some(Node::Iri(property)), Some(object)] => {
                    Some((self.local(property)?, object.clone()))
                }
                _ => None,
            })
            .collect())
    }

    fn property_axioms(&mut self) -> OracleResult<()> {
        self.domains = self.property_objects("rdfs:domain")?;
        self.ranges = self.property_objects("rdfs:range")?;

        let rows = select(
            self.store,
            "SELECT ?p ?q WHERE { ?p owl:inverseOf ?q }",
            &["p", "q"],
        )?;
        for row in rows {
            let [Some(Node::Iri(p)), Some(Node::Iri(q))] = row.as_slice() else {
                continue;
            };
            if let (Some(p), Some(q)) = (self.local(p), self.local(q)) {
                self.relations.insert(p.clone());
                self.relations.insert(q.clone());
                self.inverse_pairs.push((p, q));
            }
        }

        // Named classes used as relation domains/ranges or attribute domains.
        let used: Vec<String> = self
            .domains
            .iter()
            .chain(self.ranges.iter().filter(|(p, _)| !self.attributes.contains(p)))
            .filter_map(|(_, node)| match node {
                Node::Iri(iri) => self.class_id(iri),
                _ => None,
            })
            .filter(|id| id != THING && id != NOTHING)
            .collect();
        self.classes.extend(used);
        Ok(())
    }

    fn assertions(&mut self) -> OracleResult<()> {
        let rows = select(
            self.store,
            "SELECT ?s ?p ?o WHERE { ?s ?p ?o . FILTER(isIRI(?s)) }",
            &["s", "p", "o"],
        )?;
        for row in rows {
            let [Some(Node::Iri(s)), Some(Node::Iri(p)), Some(o)] = row.as_slice() else {
                continue;
            };
            let (Some(subject), Some(property)) = (self.local(s), self.local(p)) else {
                continue;
            };
            if self.relations.contains(&property) || self.attributes.contains(&property) {
                self.assertions.push((subject, property, o.clone()));
            }
        }
        Ok(())
    }

    fn annotations(&mut self) -> OracleResult<()> {
        let rows = select(
            self.store,
            "SELECT ?s ?p ?o WHERE { \
                ?s ?p ?o . \
                FILTER(?p IN (rdfs:label, rdfs:comment) && isLiteral(?o)) \
            }",
            &["s", "p", "o"],
        )?;
        for row in rows {
            let [
                Some(Node::Iri(s)),
                Some(Node::Iri(p)),
                Some(Node::Literal { value, language }),
            ] = row.as_slice()
            else {
                continue;
            };
            let Some(id) = self.class_id(s) else {
                continue;
            };
            let localized = Localized {
                value: value.clone(),
                language: language.clone(),
            };
            if p.ends_with("#label") {
                self.labels.entry(id).or_default().push(localized);
            } else {
                self.comments.entry(id).or_default().push(localized);
            }
        }
        Ok(())
    }

    fn expression(&self, node: &Node) -> ClassExpression {
        let other = || ClassExpression::Complex {
            operator: ExpressionOperator::Other,
            operands: BTreeSet::new(),
        };
        match node {
            Node::Iri(iri) => match self.class_id(iri) {
                Some(id) if id != NOTHING => ClassExpression::Named(ClassRef::new(id)),
                _ => other(),
            },
            Node::Blank(blank) => ClassExpression::Complex {
                operator: self
                    .expressions
                    .get(blank)
                    .map_or(ExpressionOperator::Other, |(operator, _)| *operator),
                operands: self
                    .signature(node, &mut HashSet::new())
                    .into_iter()
                    .map(ClassRef::new)
                    .collect(),
            },
            Node::Literal { .. } => other(),
        }
    }

    /// Named classes referenced anywhere inside a class expression: list
    /// members, restriction fillers, complements and the types of `hasValue`
    /// individuals. `Nothing` is left out.
    fn signature(&self, node: &Node, seen: &mut HashSet<String>) -> BTreeSet<String> {
        match node {
            Node::Iri(iri) => self
                .class_id(iri)
                .filter(|id| id != NOTHING)
                .into_iter()
                .collect(),
            Node::Blank(blank) => {
                if !seen.insert(blank.clone()) {
                    return BTreeSet::new();
                }
                let members = self
                    .expressions
                    .get(blank)
                    .map(|(_, members)| members.as_slice())
                    .unwrap_or_default();
                let mut classes = BTreeSet::new();
                for nested in members.iter().chain(self.fillers.get(blank).into_iter().flatten()) {
                    classes.extend(self.signature(nested, seen));
                }
                for value in self.has_values.get(blank).into_iter().flatten() {
                    classes.extend(self.value_types(value));
                }
                classes
            }
            Node::Literal { .. } => BTreeSet::new(),
        }
    }

    /// Declared named types of an individual given as an IRI.
    fn value_types(&self, value: &Node) -> BTreeSet<String> {
        let Some(individual) = (match value {
            Node::Iri(iri) => self.local(iri),
            _ => None,
        }) else {
            return BTreeSet::new();
        };
        self.typed
            .iter()
            .filter(|(subject, _)| *subject == individual)
            .filter_map(|(_, object)| match object {
                Node::Iri(iri) => self.class_id(iri),
                _ => None,
            })
            .filter(|id| self.classes.contains(id))
            .collect()
    }

    fn data_range(&self, node: &Node) -> DataRangeAxiom {
        match node {
            Node::Iri(iri) => DataRangeAxiom::Scalar(match iri.strip_prefix(XSD_NS) {
                Some("string") => DataType::String,
                Some("boolean") => DataType::Boolean,
                Some("int" | "integer") => DataType::Int,
                _ => DataType::Unknown,
            }),
            Node::Blank(blank) => match self.one_of.get(blank) {
                Some(members) => DataRangeAxiom::Enumerated(
                    members
                        .iter()
                        .filter_map(|m| match m {
                            Node::Literal { value, .. } => Some(value.clone()),
                            _ => None,
                        })
                        .collect(),
                ),
                None => DataRangeAxiom::Scalar(DataType::Unknown),
            },
            Node::Literal { .. } => DataRangeAxiom::Scalar(DataType::Unknown),
        }
    }

    fn finish(self, language: String) -> OwlOracle {
        let mut individuals = self.individuals.clone();
        let mut asserted_types: HashMap<String, BTreeSet<String>> = HashMap::new();
        let mut class_assertions: HashMap<String, Vec<ClassExpression>> = HashMap::new();

        for (subject, object) in &self.typed {
            let expression = self.expression(object);
            let is_class = match &expression {
                ClassExpression::Named(class) => {
                    class.is_thing() || self.classes.contains(class.id())
                }
                ClassExpression::Complex { .. } => matches!(object, Node::Blank(_)),
            };
            if !is_class
                || self.classes.contains(subject)
                || self.relations.contains(subject)
                || self.attributes.contains(subject)
            {
                continue;
            }
            individuals.insert(subject.clone());
            if let ClassExpression::Named(class) = &expression {
                asserted_types
                    .entry(subject.clone())
                    .or_default()
                    .insert(class.id().to_string());
            }
            class_assertions
                .entry(subject.clone())
                .or_default()
                .push(expression);
        }

        let mut inverses: HashMap<String, BTreeSet<String>> = HashMap::new();
        for (p, q) in &self.inverse_pairs {
            inverses.entry(p.clone()).or_default().insert(q.clone());
            inverses.entry(q.clone()).or_default().insert(p.clone());
        }

        let mut relation_values: ValueIndex<BTreeSet<String>> = HashMap::new();
        let mut attribute_values: ValueIndex<Vec<String>> = HashMap::new();
        for (subject, property, object) in &self.assertions {
            match object {
                Node::Iri(iri) if self.relations.contains(property) => {
                    let Some(target) = self.local(iri) else {
                        continue;
                    };
                    individuals.insert(subject.clone());
                    individuals.insert(target.clone());
                    relation_values
                        .entry(subject.clone())
                        .or_default()
                        .entry(property.clone())
                        .or_default()
                        .insert(target.clone());
                    for inverse in inverses.get(property).into_iter().flatten() {
                        relation_values
                            .entry(target.clone())
                            .or_default()
                            .entry(inverse.clone())
                            .or_default()
                            .insert(subject.clone());
                    }
                }
                Node::Literal { value, .. } if self.attributes.contains(property) => {
                    individuals.insert(subject.clone());
                    attribute_values
                        .entry(subject.clone())
                        .or_default()
                        .entry(property.clone())
                        .or_default()
                        .push(value.clone());
                }
                _ => {}
            }
        }
        for values in attribute_values.values_mut().flat_map(|m| m.values_mut()) {
            values.sort();
        }

        let mut relation_domains: HashMap<String, Vec<ClassExpression>> = HashMap::new();
        let mut attribute_domains: HashMap<String, Vec<ClassExpression>> = HashMap::new();
        for (property, node) in &self.domains {
            let expression = self.expression(node);
            if self.attributes.contains(property) {
                attribute_domains.entry(property.clone()).or_default().push(expression);
            } else if self.relations.contains(property) {
                relation_domains.entry(property.clone()).or_default().push(expression);
            }
        }

        let mut relation_ranges: HashMap<String, Vec<ClassExpression>> = HashMap::new();
        let mut attribute_ranges: HashMap<String, Vec<DataRangeAxiom>> = HashMap::new();
        for (property, node) in &self.ranges {
            if self.attributes.contains(property) {
                attribute_ranges
                    .entry(property.clone())
                    .or_default()
                    .push(self.data_range(node));
            } else if self.relations.contains(property) {
                relation_ranges
                    .entry(property.clone())
                    .or_default()
                    .push(self.expression(node));
            }
        }

        for (kind, index) in [("domain", &self.domains), ("range", &self.ranges)] {
            let mut counts: HashMap<&str, usize> = HashMap::new();
            for (property, _) in index {
                *counts.entry(property.as_str()).or_default() += 1;
            }
            for (property, count) in counts.into_iter().filter(|(_, n)| *n > 1) {
                tracing::warn!(property, count, kind, "property has several axioms");
            }
        }

        let taxonomy = Taxonomy::build(self.classes.iter().cloned(), self.subsumptions.clone());

        // Anything punned as a class or property is not an individual.
        let individuals: BTreeSet<String> = individuals
            .into_iter()
            .filter(|i| {
                !self.classes.contains(i)
                    && !self.relations.contains(i)
                    && !self.attributes.contains(i)
            })
            .collect();

        OwlOracle {
            namespace: self.namespace,
            language,
            taxonomy,
            relations: self.relations,
            attributes: self.attributes,
            individuals,
            asserted_types,
            class_assertions,
            relation_domains,
            relation_ranges,
            attribute_domains,
            attribute_ranges,
            inverses,
            relation_values,
            attribute_values,
            labels: self.labels,
            comments: self.comments,
        }
    }
}

/// Members of an RDF list in document order.
fn walk_list(cells: &HashMap<Node, (Node, Node)>, head: &Node) -> Vec<Node> {
    let mut members = Vec::new();
    let mut seen = HashSet::new();
    let mut current = head;
    while let Some((first, rest)) = cells.get(current) {
        if !seen.insert(current) {
            break;
        }
        members.push(first.clone());
        if matches!(rest, Node::Iri(iri) if iri == RDF_NIL) {
            break;
        }
        current = rest;
    }
    members
}

// ---------------------------------------------------------------------------
// Oracle impl
// ---------------------------------------------------------------------------

impl Oracle for OwlOracle {
    fn namespace(&self) -> &str {
        &self.namespace
    }

    fn class_exists(&self, id: &str) -> OracleResult<bool> {
        Ok(self.taxonomy.contains(id))
    }

    fn relation_exists(&self, id: &str) -> OracleResult<bool> {
        Ok(self.relations.contains(id))
    }

    fn attribute_exists(&self, id: &str) -> OracleResult<bool> {
        Ok(self.attributes.contains(id))
    }

    fn individual_exists(&self, id: &str) -> OracleResult<bool> {
        Ok(self.individuals.contains(id))
    }

    fn super_classes(&self, class: &ClassRef, transitive: bool) -> OracleResult<BTreeSet<ClassRef>> {
        let ids = if transitive {
            self.taxonomy.ancestors(class.id())
        } else {
            self.taxonomy.direct_supers(class.id())
        };
        Ok(Self::class_set(ids))
    }

    fn sub_classes(&self, class: &ClassRef, transitive: bool) -> OracleResult<BTreeSet<ClassRef>> {
        let ids = if transitive {
            self.taxonomy.descendants(class.id())
        } else {
            self.taxonomy.direct_subs(class.id())
        };
        Ok(Self::class_set(ids))
    }

    fn expression_sub_classes(
        &self,
        expression: &ClassExpression,
        transitive: bool,
    ) -> OracleResult<BTreeSet<ClassRef>> {
        let operator = match expression {
            ClassExpression::Named(class) => return self.sub_classes(class, transitive),
            ClassExpression::Complex { operator, .. } => *operator,
        };
        let members: BTreeSet<String> = expression
            .signature()
            .iter()
            .map(|c| c.id().to_string())
            .collect();

        // Other constructors are widened to the classes they name.
        let ids = match operator {
            ExpressionOperator::Union | ExpressionOperator::Other => {
                if transitive {
                    let mut all = members.clone();
                    for member in &members {
                        all.extend(self.taxonomy.descendants(member));
                    }
                    all
                } else {
                    self.taxonomy.most_general(&members)
                }
            }
            ExpressionOperator::Intersection => {
                let mut below = members.iter().map(|m| {
                    let mut set = self.taxonomy.descendants(m);
                    set.insert(m.clone());
                    set
                });
                let first = below.next().unwrap_or_default();
                let common: BTreeSet<String> = below.fold(first, |acc, set| {
                    acc.intersection(&set).cloned().collect()
                });
                let candidates: BTreeSet<String> = common.difference(&members).cloned().collect();
                if transitive {
                    candidates
                } else {
                    self.taxonomy.most_general(&candidates)
                }
            }
        };
        Ok(Self::class_set(ids.into_iter().filter(|id| id != NOTHING)))
    }

    fn instances(&self, class: &ClassRef, transitive: bool) -> OracleResult<BTreeSet<IndividualRef>> {
        let keep = |individual: &&String| {
            if class.is_thing() {
                transitive || self.direct_types(individual).is_empty()
            } else if transitive {
                self.all_types(individual).contains(class.id())
            } else {
                self.direct_types(individual).contains(class.id())
            }
        };
        Ok(self
            .individuals
            .iter()
            .filter(keep)
            .map(|i| IndividualRef::new(i.as_str()))
            .collect())
    }

    fn types(&self, individual: &IndividualRef, transitive: bool) -> OracleResult<BTreeSet<ClassRef>> {
        let ids = if transitive {
            self.all_types(individual.id())
        } else {
            self.direct_types(individual.id())
        };
        Ok(Self::class_set(ids))
    }

    fn class_assertions(&self, individual: &IndividualRef) -> OracleResult<Vec<ClassExpression>> {
        Ok(self
            .class_assertions
            .get(individual.id())
            .cloned()
            .unwrap_or_default())
    }

    fn relation_domain(&self, relation: &RelationRef) -> OracleResult<AxiomLookup<ClassExpression>> {
        Ok(AxiomLookup::from_axioms(
            self.relation_domains.get(relation.id()).cloned().unwrap_or_default(),
        ))
    }

    fn relation_range(&self, relation: &RelationRef) -> OracleResult<AxiomLookup<ClassExpression>> {
        Ok(AxiomLookup::from_axioms(
            self.relation_ranges.get(relation.id()).cloned().unwrap_or_default(),
        ))
    }

    fn attribute_domain(&self, attribute: &AttributeRef) -> OracleResult<AxiomLookup<ClassExpression>> {
        Ok(AxiomLookup::from_axioms(
            self.attribute_domains.get(attribute.id()).cloned().unwrap_or_default(),
        ))
    }

    fn attribute_range(&self, attribute: &AttributeRef) -> OracleResult<AxiomLookup<DataRangeAxiom>> {
        Ok(AxiomLookup::from_axioms(
            self.attribute_ranges.get(attribute.id()).cloned().unwrap_or_default(),
        ))
    }

    fn relation_values(
        &self,
        individual: &IndividualRef,
        relation: &RelationRef,
    ) -> OracleResult<Vec<IndividualRef>> {
        Ok(self
            .relation_values
            .get(individual.id())
            .and_then(|m| m.get(relation.id()))
            .into_iter()
            .flatten()
            .map(|i| IndividualRef::new(i.as_str()))
            .collect())
    }

    fn attribute_values(
        &self,
        individual: &IndividualRef,
        attribute: &AttributeRef,
    ) -> OracleResult<Vec<String>> {
        Ok(self
            .attribute_values
            .get(individual.id())
            .and_then(|m| m.get(attribute.id()))
            .cloned()
            .unwrap_or_default())
    }

    fn inverse_relations(&self, relation: &RelationRef) -> OracleResult<BTreeSet<RelationRef>> {
        let Some(partners) = self.inverses.get(relation.id()).filter(|p| !p.is_empty()) else {
            return Ok(BTreeSet::new());
        };
        let mut set: BTreeSet<RelationRef> =
            partners.iter().map(|p| RelationRef::new(p.as_str())).collect();
        set.insert(relation.clone());
        Ok(set)
    }

    fn label(&self, id: &str) -> OracleResult<Option<String>> {
        Ok(self
            .labels
            .get(id)
            .and_then(|values| pick_localized(values, &self.language)))
    }

    fn comment(&self, id: &str) -> OracleResult<Option<String>> {
        Ok(self
            .comments
            .get(id)
            .and_then(|values| pick_localized(values, &self.language)))
    }

    fn classes(&self) -> OracleResult<BTreeSet<ClassRef>> {
        Ok(self.taxonomy.classes().map(ClassRef::new).collect())
    }

    fn relations(&self) -> OracleResult<BTreeSet<RelationRef>> {
        Ok(self.relations.iter().map(|r| RelationRef::new(r.as_str())).collect())
    }

    fn attributes(&self) -> OracleResult<BTreeSet<AttributeRef>> {
        Ok(self.attributes.iter().map(|a| AttributeRef::new(a.as_str())).collect())
    }

    fn individuals(&self) -> OracleResult<BTreeSet<IndividualRef>> {
        Ok(self
            .individuals
            .iter()
            .map(|i| IndividualRef::new(i.as_str()))
            .collect())
    }
}
