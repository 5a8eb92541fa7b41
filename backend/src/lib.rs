//! Small actix-web applications demonstrating JSON response envelopes,
//! centralised error handling and declarative request validation.

pub mod api;
pub mod middleware;
pub mod models;
pub mod server;
pub mod settings;
pub mod validation;

pub use middleware::Trace;
pub use models::{AppError, Envelope, HttpError, UserData};
