use clap::Parser;
use tracing_subscriber::EnvFilter;

use drivezip::cli;
use drivezip::error::Result;
use drivezip::storage::StorageClient;

use drivezip::cli::Args;
use drivezip::config::load_storage_config;

#[tokio::main]
async fn main() {
    init_logging();
    let args = Args::parse();

    if let Err(e) = run_app(args).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

// Library code logs through `log`; the subscriber picks it up via tracing-log.
fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .try_init();
}

async fn run_app(args: Args) -> Result<()> {
    let config = load_storage_config()?;
    let client = StorageClient::new(config).await?;
    cli::run(args, client).await?;
    Ok(())
}
