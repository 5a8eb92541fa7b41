//! Demo applications.
//!
//! Each module exposes an `app()` constructor returning a fully wired
//! [`actix_web::App`]: routes plus the middleware the idiom depends on.

pub mod custom_responses;
pub mod error_pages;
pub mod simple_errors;
pub mod validation_demo;
