//! Raw compose-descriptor model and document-level validation.
//!
//! Only the key subset the translation pipeline understands is modeled as
//! typed fields; everything else a service declares is captured verbatim so
//! it can be reported as unsupported.

mod parser;
mod service;
mod types;

pub use service::*;
pub use types::*;
