//! # docs-index
//!
//! Rebuilds the hosted documentation search index from the content tree.
//!
//! ## Usage
//!
//! ```bash
//! ALGOLIA_ADMIN_API_KEY=... docs-index
//! ```
//!
//! No flag is required. The content root, app id and index name come from
//! `./config/docs-index.toml` when it exists, with `ALGOLIA_APP_ID` and
//! `ALGOLIA_INDEX_NAME` taking precedence. The write key is read only from
//! `ALGOLIA_ADMIN_API_KEY`.
//!
//! ## Examples
//!
//! ```bash
//! # Full-replace sync using ./config/docs-index.toml
//! docs-index
//!
//! # Index a different tree without uploading
//! docs-index --root ./website/docs --dry-run
//!
//! # Dump the records that would be uploaded
//! docs-index --json > records.json
//! ```
//!
//! Progress is logged on stderr (`RUST_LOG` controls verbosity); the final
//! summary goes to stdout. Any fatal error exits with status 1.

use anyhow::Context;
use clap::Parser;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use docs_indexer::config::{self, Config, IndexSettings};
use docs_indexer::index::algolia::AlgoliaIndex;
use docs_indexer::index::SearchIndex;
use docs_indexer::pipeline;

const DEFAULT_CONFIG: &str = "./config/docs-index.toml";

/// Rebuild the documentation search index from Markdown/MDX sources.
#[derive(Parser)]
#[command(
    name = "docs-index",
    version,
    about = "Rebuild the hosted documentation search index from Markdown/MDX sources",
    long_about = "Walks the content root, extracts one search record per document and \
    replaces the remote Algolia index with the fresh record set (clear, then bulk write)."
)]
struct Cli {
    /// Path to configuration file (TOML).
    ///
    /// When omitted, `./config/docs-index.toml` is used if it exists and the
    /// built-in defaults otherwise.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Content root to scan, overriding `[content].root`.
    #[arg(long)]
    root: Option<PathBuf>,

    /// Build the records and print a summary without touching the remote index.
    #[arg(long)]
    dry_run: bool,

    /// Print the records as JSON on stdout instead of uploading them.
    #[arg(long)]
    json: bool,
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "docs_indexer=info,docs_index=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn load(cli: &Cli) -> anyhow::Result<Config> {
    let mut cfg = match &cli.config {
        Some(path) => config::load_config(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => config::load_config_or_default(Path::new(DEFAULT_CONFIG))?,
    };
    if let Some(root) = &cli.root {
        cfg.content.root = root.clone();
    }
    Ok(cfg)
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let cfg = load(&cli)?;

    if cli.json {
        let snapshot = pipeline::build_snapshot(&cfg)?;
        println!("{}", serde_json::to_string_pretty(&snapshot.records)?);
        return Ok(());
    }

    if cli.dry_run {
        let snapshot = pipeline::build_snapshot(&cfg)?;
        pipeline::log_samples(&snapshot);
        println!("index (dry-run)");
        println!("  root: {}", cfg.content.root.display());
        println!("  records: {}", snapshot.len());
        println!("ok");
        return Ok(());
    }

    let settings = IndexSettings::from_env(&cfg.algolia);
    let index: Arc<dyn SearchIndex> = Arc::new(AlgoliaIndex::new(&settings)?);
    let report = pipeline::run_index(&cfg, &settings, index).await?;

    println!("index {}", report.sync.index_name);
    println!("  documents: {}", report.files_found);
    println!("  records written: {}", report.sync.records_written);
    println!("  batches: {}", report.sync.batches);
    println!("ok");
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
