//! Taxonomy and property composition.
//!
//! Turns primitive oracle facts into the direct or transitive views a query
//! asks for. Every operation reports an empty answer as
//! [`QueryError::NotFound`] with a message naming the entity involved; an
//! absent fact is never returned as an empty set.

use std::collections::BTreeSet;

use crate::error::{QueryError, QueryResult};
use crate::oracle::{
    AttributeRef, AxiomLookup, ClassExpression, ClassRef, DataRangeAxiom, IndividualRef, Oracle,
    RelationRef,
};

/// Direct (immediate) or transitive (closure) view of a relationship.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Depth {
    Direct,
    All,
}

impl Depth {
    pub fn is_transitive(self) -> bool {
        self == Self::All
    }
}

/// Query-level composition over an [`Oracle`].
#[derive(Clone, Copy)]
pub struct Composer<'a> {
    oracle: &'a dyn Oracle,
}

impl<'a> Composer<'a> {
    pub fn new(oracle: &'a dyn Oracle) -> Self {
        Self { oracle }
    }

    pub fn oracle(&self) -> &'a dyn Oracle {
        self.oracle
    }

    // -----------------------------------------------------------------------
    // Taxonomy
    // -----------------------------------------------------------------------

    pub fn super_classes(&self, class: &ClassRef, depth: Depth) -> QueryResult<BTreeSet<ClassRef>> {
        let supers = self.oracle.super_classes(class, depth.is_transitive())?;
        non_empty(supers, || format!("Super classes of \"{class}\" not found."))
    }

    pub fn sub_classes(&self, class: &ClassRef, depth: Depth) -> QueryResult<BTreeSet<ClassRef>> {
        let mut subs = self.oracle.sub_classes(class, depth.is_transitive())?;
        subs.retain(|c| !c.is_nothing());
        non_empty(subs, || format!("Sub classes of \"{class}\" not found."))
    }

    pub fn class_individuals(
        &self,
        class: &ClassRef,
        depth: Depth,
    ) -> QueryResult<BTreeSet<IndividualRef>> {
        let individuals = self.oracle.instances(class, depth.is_transitive())?;
        non_empty(individuals, || format!("Individuals of \"{class}\" not found."))
    }

    // -----------------------------------------------------------------------
    // Domains and ranges
    // -----------------------------------------------------------------------

    pub fn relation_domains(
        &self,
        relation: &RelationRef,
        depth: Depth,
    ) -> QueryResult<BTreeSet<ClassRef>> {
        let lookup = self.oracle.relation_domain(relation)?;
        self.expand(lookup, depth, relation.id(), || {
            format!("Domains of \"{relation}\" not found.")
        })
    }

    pub fn relation_ranges(
        &self,
        relation: &RelationRef,
        depth: Depth,
    ) -> QueryResult<BTreeSet<ClassRef>> {
        let lookup = self.oracle.relation_range(relation)?;
        self.expand(lookup, depth, relation.id(), || {
            format!("Ranges of \"{relation}\" not found.")
        })
    }

    pub fn attribute_domains(
        &self,
        attribute: &AttributeRef,
        depth: Depth,
    ) -> QueryResult<BTreeSet<ClassRef>> {
        let lookup = self.oracle.attribute_domain(attribute)?;
        self.expand(lookup, depth, attribute.id(), || {
            format!("Domains of \"{attribute}\" not found.")
        })
    }

    /// The single data range of an attribute, if it has exactly one.
    pub fn attribute_range(&self, attribute: &AttributeRef) -> QueryResult<Option<DataRangeAxiom>> {
        Ok(match self.oracle.attribute_range(attribute)? {
            AxiomLookup::Single(range) => Some(range),
            AxiomLookup::Missing | AxiomLookup::Ambiguous(_) => None,
        })
    }

    /// Classes covered by a domain or range axiom.
    ///
    /// A single named class yields itself directly, or itself plus all of its
    /// sub classes transitively. A complex expression yields its sub classes.
    fn expand(
        &self,
        lookup: AxiomLookup<ClassExpression>,
        depth: Depth,
        property: &str,
        message: impl Fn() -> String,
    ) -> QueryResult<BTreeSet<ClassRef>> {
        let expression = match lookup {
            AxiomLookup::Single(expression) => expression,
            AxiomLookup::Missing => return Err(QueryError::not_found(message())),
            AxiomLookup::Ambiguous(count) => {
                return Err(QueryError::AmbiguousAxiom {
                    message: message(),
                    property: property.to_string(),
                    count,
                });
            }
        };

        let mut classes = match expression.single_class() {
            Some(class) => {
                let mut classes = BTreeSet::from([class.clone()]);
                if depth.is_transitive() {
                    classes.extend(self.oracle.sub_classes(class, true)?);
                }
                classes
            }
            None => self
                .oracle
                .expression_sub_classes(&expression, depth.is_transitive())?,
        };
        classes.retain(|c| !c.is_nothing());
        non_empty(classes, message)
    }

    /// Relations whose transitive domain contains `class`.
    pub fn domain_relations(&self, class: &ClassRef) -> QueryResult<BTreeSet<RelationRef>> {
        let mut relations = BTreeSet::new();
        for relation in self.oracle.relations()? {
            if let Some(domains) = absent_as_none(self.relation_domains(&relation, Depth::All))? {
                if domains.contains(class) {
                    relations.insert(relation);
                }
            }
        }
        non_empty(relations, || format!("Relations of domain \"{class}\" not found."))
    }

    /// Relations whose transitive range contains `class`.
    pub fn range_relations(&self, class: &ClassRef) -> QueryResult<BTreeSet<RelationRef>> {
        let mut relations = BTreeSet::new();
        for relation in self.oracle.relations()? {
            if let Some(ranges) = absent_as_none(self.relation_ranges(&relation, Depth::All))? {
                if ranges.contains(class) {
                    relations.insert(relation);
                }
            }
        }
        non_empty(relations, || format!("Relations of range \"{class}\" not found."))
    }

    /// Attributes whose transitive domain contains `class`.
    pub fn class_attributes(&self, class: &ClassRef) -> QueryResult<BTreeSet<AttributeRef>> {
        let mut attributes = BTreeSet::new();
        for attribute in self.oracle.attributes()? {
            if let Some(domains) = absent_as_none(self.attribute_domains(&attribute, Depth::All))? {
                if domains.contains(class) {
                    attributes.insert(attribute);
                }
            }
        }
        non_empty(attributes, || format!("Attributes of \"{class}\" not found."))
    }

    // -----------------------------------------------------------------------
    // Individuals
    // -----------------------------------------------------------------------

    /// The class named by the individual's only class assertion.
    pub fn individual_class(&self, individual: &IndividualRef) -> QueryResult<ClassRef> {
        let message = || format!("Classes of \"{individual}\" not found.");
        let assertions = self.oracle.class_assertions(individual)?;
        match assertions.as_slice() {
            [assertion] => assertion
                .single_class()
                .filter(|class| !class.is_thing())
                .cloned()
                .ok_or_else(|| QueryError::not_found(message())),
            _ => Err(QueryError::not_found(message())),
        }
    }

    /// Every type of the individual, without the top class.
    pub fn individual_classes(&self, individual: &IndividualRef) -> QueryResult<BTreeSet<ClassRef>> {
        let mut classes = self.oracle.types(individual, true)?;
        classes.retain(|c| !c.is_thing());
        non_empty(classes, || format!("Classes of \"{individual}\" not found."))
    }

    /// The inverse of a relation: the other member of a two-element inverse set.
    pub fn inverse_relation(&self, relation: &RelationRef) -> QueryResult<RelationRef> {
        let inverses = self.oracle.inverse_relations(relation)?;
        if inverses.len() == 2 {
            if let Some(inverse) = inverses.into_iter().find(|r| r.id() != relation.id()) {
                return Ok(inverse);
            }
        }
        Err(QueryError::not_found(format!(
            "Inverse relation of \"{relation}\" not found."
        )))
    }

    pub fn relation_value(
        &self,
        individual: &IndividualRef,
        relation: &RelationRef,
    ) -> QueryResult<Vec<IndividualRef>> {
        let values = self.oracle.relation_values(individual, relation)?;
        if values.is_empty() {
            return Err(QueryError::not_found(format!(
                "Relation value \"{relation}\" of \"{individual}\" not found."
            )));
        }
        Ok(values)
    }

    /// Every relation with at least one value for the individual.
    pub fn relation_values(
        &self,
        individual: &IndividualRef,
    ) -> QueryResult<Vec<(RelationRef, Vec<IndividualRef>)>> {
        let mut pairs = Vec::new();
        for relation in self.oracle.relations()? {
            let values = self.oracle.relation_values(individual, &relation)?;
            if !values.is_empty() {
                pairs.push((relation, values));
            }
        }
        if pairs.is_empty() {
            return Err(QueryError::not_found(format!(
                "Relation values of \"{individual}\" not found."
            )));
        }
        Ok(pairs)
    }

    pub fn attribute_value(
        &self,
        individual: &IndividualRef,
        attribute: &AttributeRef,
    ) -> QueryResult<Vec<String>> {
        let values = self.oracle.attribute_values(individual, attribute)?;
        if values.is_empty() {
            return Err(QueryError::not_found(format!(
                "Attribute \"{attribute}\" values of \"{individual}\" not found."
            )));
        }
        Ok(values)
    }

    /// Every attribute with at least one value for the individual.
    pub fn attribute_values(
        &self,
        individual: &IndividualRef,
    ) -> QueryResult<Vec<(AttributeRef, Vec<String>)>> {
        let mut pairs = Vec::new();
        for attribute in self.oracle.attributes()? {
            let values = self.oracle.attribute_values(individual, &attribute)?;
            if !values.is_empty() {
                pairs.push((attribute, values));
            }
        }
        if pairs.is_empty() {
            return Err(QueryError::not_found(format!(
                "Attributes values of \"{individual}\" not found."
            )));
        }
        Ok(pairs)
    }

    // -----------------------------------------------------------------------
    // Enumeration
    // -----------------------------------------------------------------------

    pub fn relations(&self) -> QueryResult<BTreeSet<RelationRef>> {
        non_empty(self.oracle.relations()?, || "Relations not found.".to_string())
    }

    pub fn attributes(&self) -> QueryResult<BTreeSet<AttributeRef>> {
        non_empty(self.oracle.attributes()?, || "Attributes not found.".to_string())
    }

    pub fn individuals(&self) -> QueryResult<BTreeSet<IndividualRef>> {
        non_empty(self.oracle.individuals()?, || "Individuals not found.".to_string())
    }
}

fn non_empty<T>(set: BTreeSet<T>, message: impl FnOnce() -> String) -> QueryResult<BTreeSet<T>> {
    if set.is_empty() {
        Err(QueryError::not_found(message()))
    } else {
        Ok(set)
    }
}

/// Map an expected absence to `None`, keeping oracle faults as errors.
fn absent_as_none<T>(result: QueryResult<T>) -> QueryResult<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(e) if e.is_fail() => Ok(None),
        Err(e) => Err(e),
    }
}
