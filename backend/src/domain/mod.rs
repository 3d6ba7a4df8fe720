//! Domain primitives, the todo aggregate, and the hexagonal ports.
//!
//! Purpose: define strongly typed domain entities used by the HTTP and
//! persistence layers. Keep types immutable where possible and document
//! invariants and serialisation contracts in each type's Rustdoc.

pub mod auth;
pub mod error;
pub mod ports;
pub mod todo;
pub mod trace_id;

pub use self::auth::{Credentials, CredentialsValidationError};
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::todo::{Todo, TodoDraft, TodoId, TodoParts, Username, UsernameValidationError};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
