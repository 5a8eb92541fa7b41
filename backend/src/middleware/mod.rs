//! Request middleware.
//!
//! Purpose: Define middleware components for request lifecycle concerns such as
//! tracing and response defaults shared by the demo applications.

pub mod headers;
pub mod trace;

pub use headers::{custom_header, json_by_default};
pub use trace::Trace;
