//! Entity resolution: plain names to typed oracle handles.
//!
//! `"Thing"` resolves to the top class without consulting the oracle. Every
//! other name must exist in the ontology; a miss is a [`QueryError::NotFound`]
//! naming the entity.

use crate::error::{QueryError, QueryResult};
use crate::model::EntityKind;
use crate::oracle::{AttributeRef, ClassRef, IndividualRef, Oracle, RelationRef, THING};

/// A resolved handle of any kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntityRef {
    Class(ClassRef),
    Relation(RelationRef),
    Attribute(AttributeRef),
    Individual(IndividualRef),
}

impl EntityRef {
    pub fn id(&self) -> &str {
        match self {
            Self::Class(c) => c.id(),
            Self::Relation(r) => r.id(),
            Self::Attribute(a) => a.id(),
            Self::Individual(i) => i.id(),
        }
    }

    pub fn kind(&self) -> EntityKind {
        match self {
            Self::Class(_) => EntityKind::Class,
            Self::Relation(_) => EntityKind::Relation,
            Self::Attribute(_) => EntityKind::Attribute,
            Self::Individual(_) => EntityKind::Individual,
        }
    }
}

/// Name lookup against an oracle.
#[derive(Clone, Copy)]
pub struct Resolver<'a> {
    oracle: &'a dyn Oracle,
}

impl<'a> Resolver<'a> {
    pub fn new(oracle: &'a dyn Oracle) -> Self {
        Self { oracle }
    }

    /// Resolve `name` as an entity of the given kind.
    pub fn resolve(&self, kind: EntityKind, name: &str) -> QueryResult<EntityRef> {
        Ok(match kind {
            EntityKind::Class => EntityRef::Class(self.class(name)?),
            EntityKind::Relation => EntityRef::Relation(self.relation(name)?),
            EntityKind::Attribute => EntityRef::Attribute(self.attribute(name)?),
            EntityKind::Individual => EntityRef::Individual(self.individual(name)?),
        })
    }

    /// First kind in `kinds` under which `name` exists.
    pub fn resolve_any(&self, kinds: &[EntityKind], name: &str) -> QueryResult<Option<EntityRef>> {
        for &kind in kinds {
            match self.resolve(kind, name) {
                Ok(entity) => return Ok(Some(entity)),
                Err(QueryError::NotFound { .. }) => continue,
                Err(e) => return Err(e),
            }
        }
        Ok(None)
    }

    pub fn class(&self, name: &str) -> QueryResult<ClassRef> {
        if name == THING {
            return Ok(ClassRef::thing());
        }
        if self.oracle.class_exists(name)? {
            Ok(ClassRef::new(name))
        } else {
            Err(not_found(EntityKind::Class, name))
        }
    }

    pub fn relation(&self, name: &str) -> QueryResult<RelationRef> {
        if self.oracle.relation_exists(name)? {
            Ok(RelationRef::new(name))
        } else {
            Err(not_found(EntityKind::Relation, name))
        }
    }

    pub fn attribute(&self, name: &str) -> QueryResult<AttributeRef> {
        if self.oracle.attribute_exists(name)? {
            Ok(AttributeRef::new(name))
        } else {
            Err(not_found(EntityKind::Attribute, name))
        }
    }

    pub fn individual(&self, name: &str) -> QueryResult<IndividualRef> {
        if self.oracle.individual_exists(name)? {
            Ok(IndividualRef::new(name))
        } else {
            Err(not_found(EntityKind::Individual, name))
        }
    }
}

fn not_found(kind: EntityKind, name: &str) -> QueryError {
    QueryError::not_found(format!("{kind} \"{name}\" not found."))
}
