//! Service entry-point: loads settings, installs tracing and runs the server.

mod server;

use color_eyre::eyre::WrapErr;
use ortho_config::OrthoConfig;
use tracing::warn;
use tracing_subscriber::{EnvFilter, fmt};

use server::{ServerSettings, create_server};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = ServerSettings::load_from_iter(std::env::args_os())
        .wrap_err("failed to load server settings")?;
    let config = settings.build()?;
    create_server(config)?.await?;
    Ok(())
}
