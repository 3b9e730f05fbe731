use clap::Parser;
use gpu_node_tagger::cli::{commands, Cli};
use std::process;
use tracing::level_filters::LevelFilter;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let log_level = if cli.verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    };

    let filter = EnvFilter::builder()
        .with_default_directive(log_level.into())
        .from_env_lossy();

    let subscriber = FmtSubscriber::builder().with_env_filter(filter).finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");

    info!("Starting gpu-node-tagger v{}", env!("CARGO_PKG_VERSION"));

    if let Err(e) = commands::handle_run(cli).await {
        error!("{}", e);
        process::exit(1);
    }
}
