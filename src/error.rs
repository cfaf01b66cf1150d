//! Rich diagnostic error types for the ontoquery service.
//!
//! Each subsystem defines its own error type with miette `#[diagnostic]` derives,
//! providing error codes and help text. Query-level failures carry enough
//! information for the dispatcher to decide between a `Fail` outcome (the
//! answer is legitimately absent) and an `Error` outcome (something broke).

use miette::Diagnostic;
use thiserror::Error;

/// Top-level error type for the ontoquery service.
#[derive(Debug, Error, Diagnostic)]
pub enum OntoError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Oracle(#[from] OracleError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Query(#[from] QueryError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Dispatch(#[from] DispatchError),
}

// ---------------------------------------------------------------------------
// Oracle errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum OracleError {
    #[error("failed to read ontology document: {path}")]
    #[diagnostic(
        code(ontoquery::oracle::io),
        help("Check that the ontology path exists and is readable.")
    )]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse ontology document: {message}")]
    #[diagnostic(
        code(ontoquery::oracle::parse),
        help(
            "The document is not valid in the detected RDF syntax. \
             Turtle is expected for .ttl, N-Triples for .nt and RDF/XML for .owl/.rdf/.xml."
        )
    )]
    Parse { message: String },

    #[error("SPARQL extraction failed: {message}")]
    #[diagnostic(
        code(ontoquery::oracle::sparql),
        help("The ontology store rejected an extraction query. This is a bug; please report it.")
    )]
    Sparql { message: String },

    #[error("ontology has no namespace")]
    #[diagnostic(
        code(ontoquery::oracle::missing_namespace),
        help(
            "The document declares no owl:Ontology IRI. Set `namespace` in the \
             configuration (for example \"http://example.org/onto#\")."
        )
    )]
    MissingNamespace,

    #[error("oracle failure: {message}")]
    #[diagnostic(code(ontoquery::oracle::internal))]
    Internal { message: String },
}

/// Result type for oracle operations.
pub type OracleResult<T> = std::result::Result<T, OracleError>;

// ---------------------------------------------------------------------------
// Query errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum QueryError {
    #[error("{message}")]
    #[diagnostic(code(ontoquery::query::not_found))]
    NotFound { message: String },

    #[error("{message}")]
    #[diagnostic(
        code(ontoquery::query::ambiguous_axiom),
        help(
            "The property has {count} axioms of this kind. Exactly one is needed \
             to answer the query."
        )
    )]
    AmbiguousAxiom {
        message: String,
        property: String,
        count: usize,
    },

    #[error("{message}")]
    #[diagnostic(
        code(ontoquery::query::malformed),
        help("Check the request `Type` tag and that every required `Data` field is a string.")
    )]
    MalformedRequest { message: String },

    #[error("failed to encode {field} payload: {message}")]
    #[diagnostic(code(ontoquery::query::encode))]
    Encode { field: String, message: String },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Oracle(#[from] OracleError),
}

impl QueryError {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedRequest {
            message: message.into(),
        }
    }

    /// Whether this error is an expected absence (reported as `Fail`) rather
    /// than an internal fault (reported as `Error`).
    pub fn is_fail(&self) -> bool {
        matches!(
            self,
            Self::NotFound { .. } | Self::AmbiguousAxiom { .. } | Self::MalformedRequest { .. }
        )
    }
}

/// Result type for query composition.
pub type QueryResult<T> = std::result::Result<T, QueryError>;

// ---------------------------------------------------------------------------
// Config errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    #[error("failed to read config: {path}")]
    #[diagnostic(
        code(ontoquery::config::read),
        help("Ensure the config file exists and is readable.")
    )]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {path}: {message}")]
    #[diagnostic(
        code(ontoquery::config::parse),
        help("Check the TOML syntax in the config file.")
    )]
    Parse { path: String, message: String },

    #[error("invalid config value for `{field}`: {message}")]
    #[diagnostic(code(ontoquery::config::invalid))]
    Invalid { field: String, message: String },
}

pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// ---------------------------------------------------------------------------
// Transport errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum TransportError {
    #[error("I/O error: {source}")]
    #[diagnostic(
        code(ontoquery::transport::io),
        help("The peer closed the connection or the network is unreachable.")
    )]
    Io {
        #[source]
        source: std::io::Error,
    },

    #[error("frame of {length} bytes exceeds the limit of {limit} bytes")]
    #[diagnostic(
        code(ontoquery::transport::frame_too_large),
        help("Raise `max_frame_bytes` in the configuration or send a smaller request.")
    )]
    FrameTooLarge { length: usize, limit: usize },

    #[error("frame payload is not valid UTF-8")]
    #[diagnostic(code(ontoquery::transport::utf8))]
    InvalidUtf8,

    #[error("malformed response: {message}")]
    #[diagnostic(code(ontoquery::transport::response))]
    MalformedResponse { message: String },
}

impl From<std::io::Error> for TransportError {
    fn from(source: std::io::Error) -> Self {
        Self::Io { source }
    }
}

pub type TransportResult<T> = std::result::Result<T, TransportError>;

// ---------------------------------------------------------------------------
// Dispatch errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum DispatchError {
    #[error("no handler registered for request kind {kind}")]
    #[diagnostic(
        code(ontoquery::dispatch::missing_handler),
        help("Every request kind must have a handler before the dispatcher can start.")
    )]
    MissingHandler { kind: String },
}

/// Convenience result alias using the top-level error.
pub type OntoResult<T> = std::result::Result<T, OntoError>;
