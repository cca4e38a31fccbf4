use gatehouse::{config::Config, error::Error, server::GatehouseServer};
use std::{env, path::Path};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Error> {
    let config_path = env::args()
        .nth(1)
        .or_else(|| env::var("GATEHOUSE_CONFIG").ok())
        .unwrap_or_else(|| String::from("gatehouse.toml"));
    let config = Config::load(Path::new(&config_path))?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _guard = match &config.server.log_directory {
        Some(log_directory) => {
            let file_appender = tracing_appender::rolling::daily(log_directory, "gatehouse.log");
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(non_blocking)
                .with_ansi(false)
                .init();
            Some(guard)
        }
        None => {
            tracing_subscriber::fmt().with_env_filter(filter).init();
            None
        }
    };

    let server = GatehouseServer::builder()
        .config(config)
        .start_server()
        .await?;
    info!("Listening on {}", server.addr);

    if let Err(error) = tokio::signal::ctrl_c().await {
        tracing::error!("Ctrl-C handler failed: {}", error);
    }
    info!("Shutting down");
    server.signals.stop();

    Ok(())
}
