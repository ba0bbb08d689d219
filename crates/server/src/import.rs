//! One-shot import of legacy achievement records.
//!
//! Reads a JSON array of legacy rows and writes them as approved
//! nominations, in batches.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use awards_common::Config;
use awards_core::LegacyImporter;
use awards_db::repositories::NominationRepository;
use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(name = "import-legacy", version, about = "Import legacy achievement records")]
struct Args {
    /// JSON export holding an array of legacy records.
    path: PathBuf,

    /// Rows per insert batch (at most 500).
    #[arg(long)]
    batch_size: Option<usize>,

    /// Configuration file to use instead of `config/`.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "awards=info,import_legacy=info".into()),
        )
        .init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => Config::from_file(path),
        None => Config::load(),
    }
    .context("failed to load configuration")?;

    let db = awards_db::init(&config)
        .await
        .context("failed to connect to database")?;
    awards_db::migrate(&db)
        .await
        .context("failed to run migrations")?;

    let repo = NominationRepository::new(Arc::new(db));
    let importer = LegacyImporter::new(
        Arc::new(repo),
        args.batch_size.unwrap_or(config.import.batch_size),
    );

    info!(
        path = %args.path.display(),
        batch_size = importer.batch_size(),
        "Starting legacy import"
    );

    let report = importer
        .import_file(&args.path)
        .await
        .with_context(|| format!("import of {} failed", args.path.display()))?;

    println!(
        "Imported {} records in {} batches.",
        report.records, report.batches
    );
    Ok(())
}
