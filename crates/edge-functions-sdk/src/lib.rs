//! Edge Functions SDK - Types and utilities for writing edge function handlers
//!
//! A handler receives a [`Request`] built by the hosting runtime and returns a
//! [`Response`] which the runtime writes back over HTTP.

pub mod request;
pub mod response;
pub mod handler;
pub mod error;

pub mod prelude {
    //! Common imports for edge function handlers
    pub use crate::request::Request;
    pub use crate::response::Response;
    pub use crate::handler::{handler_fn, BoxFuture, Handler};
    pub use crate::error::HandlerError;
    pub use serde::{Deserialize, Serialize};
    pub use serde_json::{json, Value as JsonValue};
}

// Re-export key types at crate root
pub use request::Request;
pub use response::Response;
pub use handler::{handler_fn, BoxFuture, Handler};
pub use error::HandlerError;
