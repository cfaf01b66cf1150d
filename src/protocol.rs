//! Wire envelope: request kinds, requests and responses.
//!
//! Requests are `{"Type": <kind>, "Data": {<field>: <string>, ...}}` and
//! responses `{"Status": .., "Data": {<payload field>: ..}, "Message": ..}`.
//! The request `Type` is kept as a raw string so an unknown kind can be
//! answered with a `Fail` instead of a decoding error.

use std::str::FromStr;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

macro_rules! request_kinds {
    ($($variant:ident => [$($field:literal),*]),* $(,)?) => {
        /// Every request the service understands.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum RequestKind {
            $($variant,)*
        }

        impl RequestKind {
            pub const ALL: &'static [RequestKind] = &[$(RequestKind::$variant,)*];

            /// Wire tag of the kind.
            pub fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => stringify!($variant),)*
                }
            }

            /// `Data` fields the kind requires.
            pub fn required_fields(self) -> &'static [&'static str] {
                match self {
                    $(Self::$variant => &[$($field),*],)*
                }
            }
        }

        impl FromStr for RequestKind {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $(stringify!($variant) => Ok(Self::$variant),)*
                    other => Err(other.to_string()),
                }
            }
        }
    };
}

request_kinds! {
    GetComment => ["Object"],
    GetClass => ["Class"],
    GetSuperClasses => ["Class", "GetSuperClassType"],
    GetSubClasses => ["Class", "GetSubClassType"],
    GetDomainRelations => ["Class"],
    GetRangeRelations => ["Class"],
    GetClassAttributes => ["Class"],
    GetClassIndividuals => ["Class", "GetIndividualType"],
    GetRelation => ["Relation"],
    GetRelations => [],
    GetInverseRelation => ["Relation"],
    GetRelationDomains => ["Relation", "GetDomainType"],
    GetRelationRanges => ["Relation", "GetRangeType"],
    GetAttribute => ["Attribute"],
    GetAttributes => [],
    GetAttributeDomains => ["Attribute", "GetDomainType"],
    GetIndividual => ["Individual"],
    GetIndividuals => [],
    GetIndividualClasses => ["Individual", "GetClassType"],
    GetRelationValue => ["Individual", "Relation"],
    GetRelationValues => ["Individual"],
    GetAttributeValues => ["Individual"],
    GetAttributeValuesByAttributeName => ["Individual", "Attribute"],
    SearchIndividuals => ["Keywords"],
}

impl std::fmt::Display for RequestKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Value of the `Get*Type` request fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GetType {
    Direct,
    All,
}

impl GetType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Direct => "Direct",
            Self::All => "All",
        }
    }
}

impl FromStr for GetType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Direct" => Ok(Self::Direct),
            "All" => Ok(Self::All),
            other => Err(other.to_string()),
        }
    }
}

// ---------------------------------------------------------------------------
// Request
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Request {
    #[serde(rename = "Type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Map<String, Value>>,
}

impl Request {
    pub fn new(kind: RequestKind) -> Self {
        Self {
            kind: kind.as_str().to_string(),
            data: None,
        }
    }

    /// Add a string `Data` field.
    pub fn with(mut self, field: &str, value: impl Into<String>) -> Self {
        self.data
            .get_or_insert_with(Map::new)
            .insert(field.to_string(), Value::String(value.into()));
        self
    }

    pub fn with_depth(self, field: &str, depth: GetType) -> Self {
        self.with(field, depth.as_str())
    }

    /// A string `Data` field, if present.
    pub fn field(&self, name: &str) -> Option<&str> {
        self.data.as_ref()?.get(name)?.as_str()
    }

    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

// ---------------------------------------------------------------------------
// Response
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Status {
    Success,
    Fail,
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Response {
    pub status: Status,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Map<String, Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl Response {
    /// Success carrying exactly one named payload field.
    pub fn success(field: &str, payload: Value) -> Self {
        let mut data = Map::new();
        data.insert(field.to_string(), payload);
        Self {
            status: Status::Success,
            data: Some(data),
            message: None,
        }
    }

    pub fn fail(message: impl Into<String>) -> Self {
        Self {
            status: Status::Fail,
            data: None,
            message: Some(message.into()),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: Status::Error,
            data: None,
            message: Some(message.into()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == Status::Success
    }

    /// Decode a payload field into a typed value.
    pub fn payload<T: DeserializeOwned>(&self, field: &str) -> Option<serde_json::Result<T>> {
        let value = self.data.as_ref()?.get(field)?;
        Some(T::deserialize(value))
    }

    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }

    /// Encode for the wire. Falls back to a bare `Error` envelope if the
    /// payload cannot be encoded.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|e| {
            let fallback = Response::error(format!("failed to encode response: {e}"));
            serde_json::to_string(&fallback).unwrap_or_default()
        })
    }
}
