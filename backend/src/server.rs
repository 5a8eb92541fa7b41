//! Demo selection and HTTP server construction.

use std::fmt;
use std::str::FromStr;

use actix_web::HttpServer;
use actix_web::dev::Server;
use thiserror::Error;
use tracing::info;

use crate::api::{custom_responses, error_pages, simple_errors, validation_demo};
use crate::middleware::Trace;
use crate::settings::Settings;

/// The demo application a server instance serves.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DemoApp {
    /// Envelope responses.
    #[default]
    CustomResponses,
    /// HTML pages for views, JSON errors under `/api`.
    ErrorPages,
    /// Flat JSON errors and an after-request header.
    SimpleErrors,
    /// Path, query and body validation.
    Validation,
}

impl DemoApp {
    /// Every demo, in declaration order.
    pub const ALL: [Self; 4] = [
        Self::CustomResponses,
        Self::ErrorPages,
        Self::SimpleErrors,
        Self::Validation,
    ];

    /// Configuration name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CustomResponses => "custom-responses",
            Self::ErrorPages => "error-pages",
            Self::SimpleErrors => "simple-errors",
            Self::Validation => "validation",
        }
    }
}

impl fmt::Display for DemoApp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Configured demo name did not match any [`DemoApp`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error(
    "unknown demo application `{0}`; expected custom-responses, error-pages, simple-errors or validation"
)]
pub struct UnknownApp(pub String);

impl FromStr for DemoApp {
    type Err = UnknownApp;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase().replace('_', "-");
        Self::ALL
            .into_iter()
            .find(|app| app.as_str() == wanted)
            .ok_or_else(|| UnknownApp(s.to_owned()))
    }
}

/// Construct an Actix HTTP server for the configured demo.
///
/// # Returns
/// A [`Server`] that must be awaited to drive the listener.
///
/// # Errors
/// Propagates [`std::io::Error`] when the demo name is unknown or binding the
/// socket fails.
pub fn create_server(settings: &Settings) -> std::io::Result<Server> {
    let demo = settings.app().map_err(std::io::Error::other)?;
    let addr = (settings.host().to_owned(), settings.port());
    let workers = settings.workers;
    info!(app = %demo, host = %addr.0, port = addr.1, "starting server");

    macro_rules! serve {
        ($app:expr) => {{
            let mut server = HttpServer::new(|| $app.wrap(Trace));
            if let Some(workers) = workers {
                server = server.workers(workers);
            }
            server.bind(addr)?.run()
        }};
    }

    let server = match demo {
        DemoApp::CustomResponses => serve!(custom_responses::app()),
        DemoApp::ErrorPages => serve!(error_pages::app()),
        DemoApp::SimpleErrors => serve!(simple_errors::app()),
        DemoApp::Validation => serve!(validation_demo::app()),
    };
    Ok(server)
}
