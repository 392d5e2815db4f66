use anyhow::{Context, Result};
use automl_video_datasets::cli::{self, Cli};
use clap::Parser;
use tracing_subscriber::EnvFilter;

fn init_tracing(verbose: u8) {
    // RUST_LOG wins over -v
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(cli::default_log_level(verbose)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env file is fine
    dotenvy::dotenv().ok();

    let args = Cli::parse();
    init_tracing(args.verbose);

    let command = args.command.clone();
    let mut stdout = std::io::stdout();
    cli::execute(args, |key| std::env::var(key).ok(), &mut stdout)
        .await
        .with_context(|| format!("{} failed", command.name()))?;

    Ok(())
}
