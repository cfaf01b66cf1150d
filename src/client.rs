//! Blocking client for a running `ontoqueryd`.
//!
//! Each call opens a fresh connection, sends one framed request and reads
//! one framed response. The typed helpers return `Ok(None)` when the service
//! answers `Fail`, so "legitimately absent" stays distinct from a broken
//! service.

use std::collections::BTreeSet;
use std::net::{SocketAddr, TcpStream, ToSocketAddrs};
use std::time::Duration;

use miette::Diagnostic;
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::error::TransportError;
use crate::model::{AttributeValues, Class, Individual, SearchHit};
use crate::protocol::{GetType, Request, RequestKind, Response, Status};
use crate::transport::{DEFAULT_MAX_FRAME_BYTES, read_frame, write_frame};

// ---------------------------------------------------------------------------
// Client error
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum ClientError {
    #[error("service error: {message}")]
    #[diagnostic(
        code(ontoquery::client::remote),
        help("The service failed internally; check the ontoqueryd log.")
    )]
    Remote { message: String },

    #[error("unexpected response from service: {message}")]
    #[diagnostic(code(ontoquery::client::response))]
    Response { message: String },

    #[error("cannot resolve address: {addr}")]
    #[diagnostic(code(ontoquery::client::address))]
    Address { addr: String },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Transport(#[from] TransportError),
}

pub type ClientResult<T> = Result<T, ClientError>;

// ---------------------------------------------------------------------------
// OntologyClient
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct OntologyClient {
    addr: SocketAddr,
    timeout: Option<Duration>,
    max_frame_bytes: usize,
}

impl OntologyClient {
    pub fn new(addr: impl ToSocketAddrs) -> ClientResult<Self> {
        let addr = addr
            .to_socket_addrs()
            .map_err(TransportError::from)?
            .next()
            .ok_or_else(|| ClientError::Address {
                addr: "<empty>".to_string(),
            })?;
        Ok(Self {
            addr,
            timeout: Some(Duration::from_secs(30)),
            max_frame_bytes: DEFAULT_MAX_FRAME_BYTES,
        })
    }

    /// Read and write timeout per call; `None` blocks indefinitely.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_max_frame_bytes(mut self, limit: usize) -> Self {
        self.max_frame_bytes = limit;
        self
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Send a raw request and return the decoded response, whatever its status.
    pub fn send(&self, request: &Request) -> ClientResult<Response> {
        let payload = request.to_json().map_err(|e| ClientError::Response {
            message: e.to_string(),
        })?;

        let mut stream = match self.timeout {
            Some(t) => TcpStream::connect_timeout(&self.addr, t),
            None => TcpStream::connect(self.addr),
        }
        .map_err(TransportError::from)?;
        stream
            .set_read_timeout(self.timeout)
            .map_err(TransportError::from)?;
        stream
            .set_write_timeout(self.timeout)
            .map_err(TransportError::from)?;

        write_frame(&mut stream, &payload)?;
        let text = read_frame(&mut stream, self.max_frame_bytes)?;
        Response::from_json(&text).map_err(|e| ClientError::Response {
            message: e.to_string(),
        })
    }

    /// Send a request and decode its `field` payload. `Fail` becomes `None`.
    pub fn fetch<T: DeserializeOwned>(&self, request: &Request, field: &str) -> ClientResult<Option<T>> {
        let response = self.send(request)?;
        match response.status {
            Status::Fail => {
                tracing::debug!(
                    kind = %request.kind,
                    reason = response.message.as_deref().unwrap_or_default(),
                    "request failed"
                );
                Ok(None)
            }
            Status::Error => Err(ClientError::Remote {
                message: response.message.unwrap_or_default(),
            }),
            Status::Success => match response.payload(field) {
                Some(Ok(value)) => Ok(Some(value)),
                Some(Err(e)) => Err(ClientError::Response {
                    message: format!("cannot decode `{field}`: {e}"),
                }),
                None => Err(ClientError::Response {
                    message: format!("missing payload field `{field}`"),
                }),
            },
        }
    }

    pub fn get_class(&self, class: &str) -> ClientResult<Option<Class>> {
        let request = Request::new(RequestKind::GetClass).with("Class", class);
        self.fetch(&request, "Class")
    }

    pub fn get_super_classes(&self, class: &str, depth: GetType) -> ClientResult<Option<BTreeSet<Class>>> {
        let request = Request::new(RequestKind::GetSuperClasses)
            .with("Class", class)
            .with_depth("GetSuperClassType", depth);
        self.fetch(&request, "SuperClasses")
    }

    pub fn get_sub_classes(&self, class: &str, depth: GetType) -> ClientResult<Option<BTreeSet<Class>>> {
        let request = Request::new(RequestKind::GetSubClasses)
            .with("Class", class)
            .with_depth("GetSubClassType", depth);
        self.fetch(&request, "SubClasses")
    }

    pub fn get_individual(&self, individual: &str) -> ClientResult<Option<Individual>> {
        let request = Request::new(RequestKind::GetIndividual).with("Individual", individual);
        self.fetch(&request, "Individual")
    }

    pub fn get_attribute_values(&self, individual: &str) -> ClientResult<Option<AttributeValues>> {
        let request = Request::new(RequestKind::GetAttributeValues).with("Individual", individual);
        self.fetch(&request, "AttributeValues")
    }

    pub fn search_individuals(&self, keywords: &str) -> ClientResult<Option<Vec<SearchHit>>> {
        let request = Request::new(RequestKind::SearchIndividuals).with("Keywords", keywords);
        self.fetch(&request, "SearchIndividuals")
    }
}
