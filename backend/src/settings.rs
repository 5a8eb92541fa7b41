//! Runtime configuration loaded via OrthoConfig.
//!
//! Values are layered from CLI flags, `ROUTE_IDIOMS_*` environment variables
//! and an optional configuration file.

use ortho_config::OrthoConfig;
use serde::Deserialize;

use crate::server::{DemoApp, UnknownApp};

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 5000;

/// Configuration values controlling which demo is served and where.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "ROUTE_IDIOMS")]
pub struct Settings {
    /// Demo application to serve (`custom-responses`, `error-pages`,
    /// `simple-errors` or `validation`).
    pub app: Option<String>,
    /// Interface to bind.
    pub host: Option<String>,
    /// Port to bind.
    pub port: Option<u16>,
    /// Worker count; defaults to the number of physical cores.
    pub workers: Option<usize>,
    /// Emit logs as JSON lines instead of human readable text.
    #[ortho_config(default = false)]
    pub json_logs: bool,
}

impl Settings {
    /// Selected demo application, falling back to the envelope demo.
    ///
    /// # Errors
    /// Returns [`UnknownApp`] when the configured name is not recognised.
    pub fn app(&self) -> Result<DemoApp, UnknownApp> {
        self.app
            .as_deref()
            .map_or(Ok(DemoApp::default()), str::parse)
    }

    /// Interface to bind, falling back to loopback.
    pub fn host(&self) -> &str {
        self.host.as_deref().unwrap_or(DEFAULT_HOST)
    }

    /// Port to bind, falling back to 5000.
    pub fn port(&self) -> u16 {
        self.port.unwrap_or(DEFAULT_PORT)
    }
}
