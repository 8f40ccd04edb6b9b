//! Middleware components used by the HTTP server.
//!
//! Currently includes request tracing and the request context consulted by
//! the central error responder.

pub mod request_context;
pub mod trace;

pub use request_context::{ErrorContext, RequestContext};
pub use trace::{TRACE_ID_HEADER, Trace, TraceId};
