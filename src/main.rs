use clap::Parser;
use tracing_subscriber::EnvFilter;

use vet_clinic_api::cli::{self, Cli};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("vet_clinic_api=info,tower_http=info")),
        )
        .init();

    let cli = Cli::parse();
    cli::run(cli).await
}
