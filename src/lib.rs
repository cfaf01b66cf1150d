// thiserror's #[error("...{field}...")] format strings reference struct fields,
// but the compiler doesn't see through the derive macro and reports false positives.
#![allow(unused_assignments)]

//! # ontoquery
//!
//! An ontology query service: taxonomy, property and instance queries over an
//! OWL knowledge base, answered as JSON over a length-prefixed TCP protocol.
//!
//! ## Architecture
//!
//! - **Oracle** (`oracle`): primitive taxonomic and assertional facts behind the
//!   [`Oracle`](oracle::Oracle) trait; `OwlOracle` is the bundled implementation
//!   over oxigraph
//! - **Resolver** (`resolve`): names to typed handles
//! - **Composer** (`compose`): direct/transitive closures, domain and range
//!   expansion, inverse relations and property values
//! - **Assembler** (`assemble`): handles to labelled value objects (`model`)
//! - **Search** (`search`): accent- and case-insensitive individual search
//! - **Dispatcher** (`dispatch`): request kind to handler table
//! - **Transport** (`transport`): framing, TCP server and the blocking `client`
//!
//! ## Library usage
//!
//! ```no_run
//! use std::sync::Arc;
//! use ontoquery::dispatch::Dispatcher;
//! use ontoquery::oracle::{OracleSettings, OwlOracle};
//! use ontoquery::protocol::{GetType, Request, RequestKind};
//!
//! let oracle = OwlOracle::load("rice.ttl".as_ref(), &OracleSettings::default()).unwrap();
//! let dispatcher = Dispatcher::new(Arc::new(oracle), "name").unwrap();
//! let request = Request::new(RequestKind::GetSuperClasses)
//!     .with("Class", "Rice")
//!     .with_depth("GetSuperClassType", GetType::All);
//! println!("{}", dispatcher.handle(&request).to_json());
//! ```

pub mod assemble;
pub mod client;
pub mod compose;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod model;
pub mod oracle;
pub mod protocol;
pub mod resolve;
pub mod search;
pub mod transport;
