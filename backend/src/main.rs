//! Conduit entry-point: loads settings, installs logging, and serves the API.

mod server;

use actix_web::cookie::SameSite;
use ortho_config::OrthoConfig;
use tracing::warn;
use tracing_subscriber::{EnvFilter, fmt};

use server::{BuildMode, ServerConfig, ServerSettings, create_server, load_session_key};

fn init_tracing(json: bool) {
    let builder = fmt().with_env_filter(EnvFilter::from_default_env());
    let result = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    if let Err(e) = result {
        warn!(error = %e, "tracing init failed");
    }
}

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let settings = ServerSettings::load().map_err(|e| std::io::Error::other(e.to_string()))?;
    init_tracing(settings.json_logs);

    let key = load_session_key(
        settings.session_key_file.as_deref(),
        BuildMode::from_debug_assertions(),
    )
    .map_err(std::io::Error::other)?;

    let config = ServerConfig::new(
        key,
        settings.cookie_secure,
        SameSite::Lax,
        settings.bind_addr(),
    );
    create_server(config)?.await
}
