use std::io::IsTerminal;

use netcheck::client::Client;
use netcheck::config::{Config, report_config_error};
use netcheck::emitter::HumanReadableEmitter;
use tokio::signal;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let stdout = std::io::stdout();
    let color = stdout.is_terminal();
    let mut emitter = HumanReadableEmitter::new(stdout, color);

    let config = match Config::from_args(std::env::args_os()) {
        Ok(config) => config,
        Err(e) => {
            report_config_error(&e, &mut emitter)?;
            return Ok(());
        }
    };

    let client = Client::new(config)?;

    let shutdown = async {
        // without a handler Ctrl+C keeps its default behaviour
        if let Err(e) = signal::ctrl_c().await {
            tracing::warn!(error = %e, "cannot listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };
    client.run_until(&mut emitter, shutdown).await?;

    Ok(())
}
