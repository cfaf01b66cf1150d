//! Entity value objects returned by queries.
//!
//! Every derived view on an entity (super classes, domains, values, ...) is an
//! `Option`: it is present only when the operation that built the entity asked
//! for it, and omitted from the wire encoding otherwise. Entities compare,
//! hash and order by identifier alone, so sets of entities deduplicate by id.

use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

/// Which of the four entity families an entity belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EntityKind {
    Class,
    Relation,
    Attribute,
    Individual,
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Class => "Class",
            Self::Relation => "Relation",
            Self::Attribute => "Attribute",
            Self::Individual => "Individual",
        };
        f.write_str(name)
    }
}

/// Value-range classifier of an attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DataType {
    Unknown,
    Int,
    String,
    Boolean,
    Enumerated,
}

/// A two-element tuple, encoded as `{"Left": .., "Right": ..}`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Pair<L, R> {
    pub left: L,
    pub right: R,
}

impl<L, R> Pair<L, R> {
    pub fn new(left: L, right: R) -> Self {
        Self { left, right }
    }
}

/// Relation id paired with the ordered individuals it links to.
pub type RelationValues = Vec<Pair<Relation, Vec<Individual>>>;

/// Attribute paired with the ordered literal values it holds.
pub type AttributeValues = Vec<Pair<Attribute, Vec<String>>>;

/// One search hit: the individual and the attribute values that matched.
pub type SearchHit = Pair<Individual, AttributeValues>;

// Identity by id: the kind is fixed by the Rust type, so id alone is enough.
macro_rules! entity_identity {
    ($ty:ident) => {
        impl PartialEq for $ty {
            fn eq(&self, other: &Self) -> bool {
                self.id == other.id
            }
        }

        impl Eq for $ty {}

        impl Hash for $ty {
            fn hash<H: Hasher>(&self, state: &mut H) {
                self.id.hash(state);
            }
        }

        impl PartialOrd for $ty {
            fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
                Some(self.cmp(other))
            }
        }

        impl Ord for $ty {
            fn cmp(&self, other: &Self) -> Ordering {
                self.id.cmp(&other.id)
            }
        }

        impl $ty {
            /// The stable identifier within the ontology namespace.
            pub fn id(&self) -> &str {
                &self.id
            }

            pub fn label(&self) -> Option<&str> {
                self.label.as_deref()
            }

            pub fn kind(&self) -> EntityKind {
                self.kind
            }

            pub fn with_label(mut self, label: Option<String>) -> Self {
                self.label = label;
                self
            }
        }
    };
}

// ---------------------------------------------------------------------------
// Class
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Class {
    id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    label: Option<String>,
    #[serde(rename = "Type")]
    kind: EntityKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direct_super_classes: Option<BTreeSet<Class>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub all_super_classes: Option<BTreeSet<Class>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direct_sub_classes: Option<BTreeSet<Class>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub all_sub_classes: Option<BTreeSet<Class>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attributes: Option<BTreeSet<Attribute>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direct_individuals: Option<BTreeSet<Individual>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub all_individuals: Option<BTreeSet<Individual>>,
}

entity_identity!(Class);

impl Class {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: None,
            kind: EntityKind::Class,
            direct_super_classes: None,
            all_super_classes: None,
            direct_sub_classes: None,
            all_sub_classes: None,
            attributes: None,
            direct_individuals: None,
            all_individuals: None,
        }
    }

    pub fn with_super_classes(mut self, classes: BTreeSet<Class>, transitive: bool) -> Self {
        if transitive {
            self.all_super_classes = Some(classes);
        } else {
            self.direct_super_classes = Some(classes);
        }
        self
    }

    pub fn with_sub_classes(mut self, classes: BTreeSet<Class>, transitive: bool) -> Self {
        if transitive {
            self.all_sub_classes = Some(classes);
        } else {
            self.direct_sub_classes = Some(classes);
        }
        self
    }

    pub fn with_attributes(mut self, attributes: BTreeSet<Attribute>) -> Self {
        self.attributes = Some(attributes);
        self
    }

    pub fn with_individuals(mut self, individuals: BTreeSet<Individual>, transitive: bool) -> Self {
        if transitive {
            self.all_individuals = Some(individuals);
        } else {
            self.direct_individuals = Some(individuals);
        }
        self
    }
}

// ---------------------------------------------------------------------------
// Relation
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Relation {
    id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    label: Option<String>,
    #[serde(rename = "Type")]
    kind: EntityKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direct_domains: Option<BTreeSet<Class>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub all_domains: Option<BTreeSet<Class>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direct_ranges: Option<BTreeSet<Class>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub all_ranges: Option<BTreeSet<Class>>,
}

entity_identity!(Relation);

impl Relation {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: None,
            kind: EntityKind::Relation,
            direct_domains: None,
            all_domains: None,
            direct_ranges: None,
            all_ranges: None,
        }
    }

    pub fn with_domains(mut self, domains: BTreeSet<Class>, transitive: bool) -> Self {
        if transitive {
            self.all_domains = Some(domains);
        } else {
            self.direct_domains = Some(domains);
        }
        self
    }

    pub fn with_ranges(mut self, ranges: BTreeSet<Class>, transitive: bool) -> Self {
        if transitive {
            self.all_ranges = Some(ranges);
        } else {
            self.direct_ranges = Some(ranges);
        }
        self
    }
}

// ---------------------------------------------------------------------------
// Attribute
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Attribute {
    id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    label: Option<String>,
    #[serde(rename = "Type")]
    kind: EntityKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direct_domains: Option<BTreeSet<Class>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub all_domains: Option<BTreeSet<Class>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    range: Option<DataType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    enumerated_values: Option<Vec<String>>,
}

entity_identity!(Attribute);

impl Attribute {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: None,
            kind: EntityKind::Attribute,
            direct_domains: None,
            all_domains: None,
            range: None,
            enumerated_values: None,
        }
    }

    pub fn with_domains(mut self, domains: BTreeSet<Class>, transitive: bool) -> Self {
        if transitive {
            self.all_domains = Some(domains);
        } else {
            self.direct_domains = Some(domains);
        }
        self
    }

    /// Set a range classifier. Any non-enumerated classifier clears the
    /// enumerated value list.
    pub fn with_range(mut self, range: DataType) -> Self {
        if range != DataType::Enumerated {
            self.enumerated_values = None;
        }
        self.range = Some(range);
        self
    }

    /// Set the closed list of permitted literals. Forces the range to
    /// [`DataType::Enumerated`].
    pub fn with_enumerated_values(mut self, values: Vec<String>) -> Self {
        self.range = Some(DataType::Enumerated);
        self.enumerated_values = Some(values);
        self
    }

    pub fn range(&self) -> Option<DataType> {
        self.range
    }

    pub fn enumerated_values(&self) -> Option<&[String]> {
        self.enumerated_values.as_deref()
    }
}

// ---------------------------------------------------------------------------
// Individual
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Individual {
    id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    label: Option<String>,
    #[serde(rename = "Type")]
    kind: EntityKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direct_class: Option<Class>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub all_classes: Option<BTreeSet<Class>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relation_values: Option<RelationValues>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attribute_values: Option<AttributeValues>,
}

entity_identity!(Individual);

impl Individual {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: None,
            kind: EntityKind::Individual,
            direct_class: None,
            all_classes: None,
            relation_values: None,
            attribute_values: None,
        }
    }

    pub fn with_direct_class(mut self, class: Class) -> Self {
        self.direct_class = Some(class);
        self
    }

    pub fn with_all_classes(mut self, classes: BTreeSet<Class>) -> Self {
        self.all_classes = Some(classes);
        self
    }

    pub fn with_relation_values(mut self, values: RelationValues) -> Self {
        self.relation_values = Some(values);
        self
    }

    pub fn with_attribute_values(mut self, values: AttributeValues) -> Self {
        self.attribute_values = Some(values);
        self
    }
}
