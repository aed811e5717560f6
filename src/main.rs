//! # Fetchline Main Entry Point

use anyhow::Result;
use fetchline::cmd_args::CommandLineArgs;
use fetchline::AppController;
use tracing_subscriber::{fmt::time::ChronoLocal, EnvFilter};

/// Dependency targets that only produce noise at debug level
const QUIET_TARGETS: &[&str] = &[
    "reqwest", "hyper", "hyper_util", "h2", "tokio", "tower", "rustls", "tracing",
];

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing_subscriber()?;

    let cmd_args = CommandLineArgs::parse();
    tracing::debug!("Command line: {:?}", cmd_args);

    let mut app = AppController::new(&cmd_args)?;
    let succeeded = app.run(cmd_args.command()).await?;

    if !succeeded {
        std::process::exit(1);
    }
    Ok(())
}

fn init_tracing_subscriber() -> Result<()> {
    let mut filter = EnvFilter::from_env(format!(
        "{}_LOG_LEVEL",
        env!("CARGO_PKG_NAME").to_uppercase()
    ));
    for target in QUIET_TARGETS {
        filter = filter.add_directive(format!("{target}=warn").parse()?);
    }

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_timer(ChronoLocal::rfc_3339())
        .init();
    Ok(())
}
