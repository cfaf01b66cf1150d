//! Ontology oracle: the primitive fact interface the query layer is built on.
//!
//! The composer never looks inside the ontology itself. Everything it knows
//! about taxonomy, property axioms and assertions comes through the [`Oracle`]
//! trait, so a different backing store can be substituted without touching
//! the query code. [`OwlOracle`] is the bundled implementation.

pub mod owl;
pub mod taxonomy;

use std::collections::BTreeSet;

use crate::error::OracleResult;

pub use owl::{OracleSettings, OwlOracle};
pub use taxonomy::Taxonomy;

/// Identifier of the universal top class.
pub const THING: &str = "Thing";

/// Identifier of the universal bottom class.
pub const NOTHING: &str = "Nothing";

// ---------------------------------------------------------------------------
// Typed handles
// ---------------------------------------------------------------------------

macro_rules! entity_ref {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Identifier local to the ontology namespace.
            pub fn id(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

entity_ref!(
    /// A class known to exist in the ontology (or the top class).
    ClassRef
);
entity_ref!(
    /// An object property.
    RelationRef
);
entity_ref!(
    /// A data property.
    AttributeRef
);
entity_ref!(
    /// A named individual.
    IndividualRef
);

impl ClassRef {
    pub fn thing() -> Self {
        Self::new(THING)
    }

    pub fn is_thing(&self) -> bool {
        self.0 == THING
    }

    pub fn is_nothing(&self) -> bool {
        self.0 == NOTHING
    }
}

// ---------------------------------------------------------------------------
// Axiom shapes
// ---------------------------------------------------------------------------

/// Boolean operator of a complex class expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExpressionOperator {
    Union,
    Intersection,
    /// Any other constructor (restrictions, complements, ...).
    Other,
}

/// The class expression on the right-hand side of a domain, range or class
/// assertion axiom.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClassExpression {
    Named(ClassRef),
    Complex {
        operator: ExpressionOperator,
        /// Every named class the expression mentions, at any nesting depth.
        operands: BTreeSet<ClassRef>,
    },
}

impl ClassExpression {
    /// Named classes referenced by the expression.
    pub fn signature(&self) -> BTreeSet<ClassRef> {
        match self {
            Self::Named(class) => BTreeSet::from([class.clone()]),
            Self::Complex { operands, .. } => operands.clone(),
        }
    }

    /// The class when the expression references exactly one named class.
    pub fn single_class(&self) -> Option<&ClassRef> {
        match self {
            Self::Named(class) => Some(class),
            Self::Complex { operands, .. } if operands.len() == 1 => operands.iter().next(),
            Self::Complex { .. } => None,
        }
    }
}

/// The data range of a data property range axiom.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataRangeAxiom {
    Scalar(crate::model::DataType),
    Enumerated(Vec<String>),
}

/// Outcome of looking up the single domain or range axiom of a property.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AxiomLookup<T> {
    Single(T),
    Missing,
    Ambiguous(usize),
}

impl<T> AxiomLookup<T> {
    pub fn from_axioms(mut axioms: Vec<T>) -> Self {
        match axioms.len() {
            0 => Self::Missing,
            1 => axioms.pop().map_or(Self::Missing, Self::Single),
            n => Self::Ambiguous(n),
        }
    }
}

// ---------------------------------------------------------------------------
// Oracle trait
// ---------------------------------------------------------------------------

/// Primitive taxonomy, property and instance facts about the loaded ontology.
///
/// Implementations are read-only after construction and must be safe to
/// query from several request threads at once. Identifiers are local names
/// within the ontology namespace; [`THING`] names the top class.
pub trait Oracle: Send + Sync {
    /// Namespace every entity identifier is relative to.
    fn namespace(&self) -> &str;

    fn class_exists(&self, id: &str) -> OracleResult<bool>;
    fn relation_exists(&self, id: &str) -> OracleResult<bool>;
    fn attribute_exists(&self, id: &str) -> OracleResult<bool>;
    fn individual_exists(&self, id: &str) -> OracleResult<bool>;

    /// Super classes of `class`. Direct results include [`THING`] for a root
    /// class; [`NOTHING`] never appears.
    fn super_classes(&self, class: &ClassRef, transitive: bool) -> OracleResult<BTreeSet<ClassRef>>;

    /// Sub classes of `class`, never including [`NOTHING`].
    fn sub_classes(&self, class: &ClassRef, transitive: bool) -> OracleResult<BTreeSet<ClassRef>>;

    /// Named sub classes of an arbitrary class expression.
    fn expression_sub_classes(
        &self,
        expression: &ClassExpression,
        transitive: bool,
    ) -> OracleResult<BTreeSet<ClassRef>>;

    fn instances(&self, class: &ClassRef, transitive: bool) -> OracleResult<BTreeSet<IndividualRef>>;

    /// Types of an individual, never including [`THING`].
    fn types(&self, individual: &IndividualRef, transitive: bool) -> OracleResult<BTreeSet<ClassRef>>;

    /// The class assertion axioms told about an individual.
    fn class_assertions(&self, individual: &IndividualRef) -> OracleResult<Vec<ClassExpression>>;

    fn relation_domain(&self, relation: &RelationRef) -> OracleResult<AxiomLookup<ClassExpression>>;
    fn relation_range(&self, relation: &RelationRef) -> OracleResult<AxiomLookup<ClassExpression>>;
    fn attribute_domain(&self, attribute: &AttributeRef) -> OracleResult<AxiomLookup<ClassExpression>>;
    fn attribute_range(&self, attribute: &AttributeRef) -> OracleResult<AxiomLookup<DataRangeAxiom>>;

    fn relation_values(
        &self,
        individual: &IndividualRef,
        relation: &RelationRef,
    ) -> OracleResult<Vec<IndividualRef>>;

    fn attribute_values(
        &self,
        individual: &IndividualRef,
        attribute: &AttributeRef,
    ) -> OracleResult<Vec<String>>;

    /// The inverse set of a relation: empty, `{relation}` for a self-inverse
    /// property, or `{relation, inverse}`.
    fn inverse_relations(&self, relation: &RelationRef) -> OracleResult<BTreeSet<RelationRef>>;

    /// Display label, preferring the configured language.
    fn label(&self, id: &str) -> OracleResult<Option<String>>;

    /// Comment, preferring the configured language.
    fn comment(&self, id: &str) -> OracleResult<Option<String>>;

    fn classes(&self) -> OracleResult<BTreeSet<ClassRef>>;
    fn relations(&self) -> OracleResult<BTreeSet<RelationRef>>;
    fn attributes(&self) -> OracleResult<BTreeSet<AttributeRef>>;
    fn individuals(&self) -> OracleResult<BTreeSet<IndividualRef>>;
}
