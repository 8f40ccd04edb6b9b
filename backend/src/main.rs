//! Backend entry-point: loads settings, installs logging and serves the API.

mod server;

use actix_web::web;
use color_eyre::eyre::{Context, Result};
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use sac_backend::inbound::http::health::HealthState;
use sac_backend::settings::{LogFormat, Settings};
use server::{ServerConfig, create_server};

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = fmt().with_env_filter(filter);
    let result = match format {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Pretty => builder.pretty().try_init(),
    };
    if let Err(e) = result {
        warn!(error = %e, "tracing init failed");
    }
}

/// Application bootstrap.
#[actix_web::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let settings =
        Settings::load_from_iter(std::env::args_os()).wrap_err("failed to load settings")?;
    init_tracing(settings.log_format()?);

    let environment = settings.environment()?;
    let config = ServerConfig::from_settings(&settings).wrap_err("invalid server settings")?;
    info!(
        bind_addr = %config.bind_addr(),
        environment = ?environment,
        "starting server"
    );

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state.clone(), config)
        .wrap_err("failed to bind HTTP listener")?;
    let handle = server.handle();

    let drain_state = health_state.clone();
    actix_web::rt::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            drain_state.mark_unhealthy();
            info!("shutdown signal received; draining");
            handle.stop(true).await;
        }
    });

    server.await.wrap_err("server terminated with an error")
}
