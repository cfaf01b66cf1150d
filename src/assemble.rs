//! Entity assembly: typed handles to labelled value objects.
//!
//! Only the id, label and (for attributes) the value range are filled in.
//! Derived views are attached by the caller when a query asks for them.

use std::collections::BTreeSet;

use crate::compose::Composer;
use crate::error::QueryResult;
use crate::model::{Attribute, AttributeValues, Class, Individual, Pair, Relation, RelationValues};
use crate::oracle::{AttributeRef, ClassRef, DataRangeAxiom, IndividualRef, Oracle, RelationRef};

/// Builds response entities from oracle handles.
#[derive(Clone, Copy)]
pub struct Assembler<'a> {
    oracle: &'a dyn Oracle,
    name_attribute: &'a str,
}

impl<'a> Assembler<'a> {
    /// `name_attribute` is the data property whose first value labels an
    /// individual.
    pub fn new(oracle: &'a dyn Oracle, name_attribute: &'a str) -> Self {
        Self {
            oracle,
            name_attribute,
        }
    }

    pub fn name_attribute(&self) -> &'a str {
        self.name_attribute
    }

    pub fn class(&self, class: &ClassRef) -> QueryResult<Class> {
        Ok(Class::new(class.id()).with_label(self.oracle.label(class.id())?))
    }

    pub fn classes<'c>(
        &self,
        classes: impl IntoIterator<Item = &'c ClassRef>,
    ) -> QueryResult<BTreeSet<Class>> {
        classes.into_iter().map(|c| self.class(c)).collect()
    }

    pub fn relation(&self, relation: &RelationRef) -> QueryResult<Relation> {
        Ok(Relation::new(relation.id()).with_label(self.oracle.label(relation.id())?))
    }

    pub fn relations<'r>(
        &self,
        relations: impl IntoIterator<Item = &'r RelationRef>,
    ) -> QueryResult<BTreeSet<Relation>> {
        relations.into_iter().map(|r| self.relation(r)).collect()
    }

    /// Attribute with its label and value range.
    pub fn attribute(&self, attribute: &AttributeRef) -> QueryResult<Attribute> {
        let assembled =
            Attribute::new(attribute.id()).with_label(self.oracle.label(attribute.id())?);
        Ok(match Composer::new(self.oracle).attribute_range(attribute)? {
            Some(DataRangeAxiom::Scalar(range)) => assembled.with_range(range),
            Some(DataRangeAxiom::Enumerated(values)) => assembled.with_enumerated_values(values),
            None => assembled,
        })
    }

    pub fn attributes<'r>(
        &self,
        attributes: impl IntoIterator<Item = &'r AttributeRef>,
    ) -> QueryResult<BTreeSet<Attribute>> {
        attributes.into_iter().map(|a| self.attribute(a)).collect()
    }

    /// Individual labelled with the first value of the name attribute.
    pub fn individual(&self, individual: &IndividualRef) -> QueryResult<Individual> {
        let name = AttributeRef::new(self.name_attribute);
        let label = self
            .oracle
            .attribute_values(individual, &name)?
            .into_iter()
            .next();
        Ok(Individual::new(individual.id()).with_label(label))
    }

    pub fn individuals<'r>(
        &self,
        individuals: impl IntoIterator<Item = &'r IndividualRef>,
    ) -> QueryResult<BTreeSet<Individual>> {
        individuals.into_iter().map(|i| self.individual(i)).collect()
    }

    /// Ordered individuals, keeping oracle order and duplicates.
    pub fn individual_list(&self, individuals: &[IndividualRef]) -> QueryResult<Vec<Individual>> {
        individuals.iter().map(|i| self.individual(i)).collect()
    }

    pub fn relation_values(
        &self,
        pairs: Vec<(RelationRef, Vec<IndividualRef>)>,
    ) -> QueryResult<RelationValues> {
        pairs
            .into_iter()
            .map(|(relation, values)| {
                Ok(Pair::new(
                    self.relation(&relation)?,
                    self.individual_list(&values)?,
                ))
            })
            .collect()
    }

    pub fn attribute_values(
        &self,
        pairs: Vec<(AttributeRef, Vec<String>)>,
    ) -> QueryResult<AttributeValues> {
        pairs
            .into_iter()
            .map(|(attribute, values)| Ok(Pair::new(self.attribute(&attribute)?, values)))
            .collect()
    }
}
