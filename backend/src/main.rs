//! Entry point: loads settings, initialises logging and serves one demo
//! application.

use std::io;

use ortho_config::OrthoConfig;
use route_idioms::server::create_server;
use route_idioms::settings::Settings;
use tracing::warn;
use tracing_subscriber::{EnvFilter, fmt};

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let result = if json {
        fmt().with_env_filter(filter).json().try_init()
    } else {
        fmt().with_env_filter(filter).try_init()
    };
    if let Err(e) = result {
        warn!(error = %e, "tracing init failed");
    }
}

/// Application bootstrap.
#[actix_web::main]
async fn main() -> io::Result<()> {
    let settings = Settings::load_from_iter(std::env::args_os())
        .map_err(|e| io::Error::other(format!("failed to load settings: {e}")))?;
    init_tracing(settings.json_logs);
    create_server(&settings)?.await
}
