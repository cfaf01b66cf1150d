//! Length-prefixed JSON transport.
//!
//! Every message is a 4-byte little-endian length followed by that many
//! bytes of UTF-8 JSON. A connection carries exactly one request and one
//! response.

pub mod frame;
#[cfg(feature = "server")]
pub mod server;

pub use frame::{DEFAULT_MAX_FRAME_BYTES, read_frame, write_frame};
#[cfg(feature = "server")]
pub use frame::{read_frame_async, write_frame_async};
#[cfg(feature = "server")]
pub use server::{Server, ShutdownSignal};
