#[macro_use]
mod macros;

mod assets;
mod config;
mod models;
mod pipeline;
mod scraper;
mod storage;
mod utils;
mod validate;

use anyhow::{bail, Result};
use clap::{ArgGroup, Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};
use url::Url;

use crate::assets::AssetResolver;
use crate::config::AppConfig;
use crate::pipeline::Pipeline;
use crate::scraper::http_client::HttpClient;
use crate::storage::UnitStore;

#[derive(Parser)]
#[command(name = "danmemo-data", about = "DanMemo unit dataset tools", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Command {
    /// Scrape unit records from a notice page
    #[command(group(ArgGroup::new("source").required(true).args(["url", "id"])))]
    Scrape {
        /// The url of the notice page containing unit information
        #[arg(long)]
        url: Option<Url>,

        /// The id of the notice (from '/asset/notice/view/<id>')
        #[arg(long)]
        id: Option<u64>,

        /// Leave existing unit files untouched
        #[arg(long)]
        skip_existing: bool,
    },

    /// Bundle every unit record into a single JSON array
    Bundle {
        /// Output file
        out: PathBuf,
    },

    /// Validate unit records
    Validate {
        /// Directory of unit records (default: configured data dir)
        dir: Option<PathBuf>,

        /// Only print failures and the final summary
        #[arg(long)]
        summary: bool,
    },

    /// Set the 'new' flag on the given unit ids and clear it everywhere else
    MarkNew {
        ids: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => "danmemo_data=info,warn",
        1 => "danmemo_data=debug,info",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(fmt::layer().compact().with_target(false))
        .with(EnvFilter::new(filter))
        .init();

    let config = AppConfig::load()?;

    match cli.command {
        Command::Scrape { url, id, skip_existing } => {
            let url = match (url, id) {
                (Some(url), _) => url,
                (None, Some(id)) => config.scraper.notice_url(id)?,
                (None, None) => bail!("either --url or --id is required"),
            };

            let _timer = utils::StageTimer::start("scrape", &url);
            let fetcher = Arc::new(HttpClient::new(&config.scraper)?);
            let store = UnitStore::open(&config.storage.data_dir)?;
            let assets = AssetResolver::new(fetcher.clone(), &config.storage.res_dir);
            let overwrite = config.pipeline.overwrite && !skip_existing;

            let stats = Pipeline::new(fetcher, store, assets, overwrite).run(&url).await?;
            info!(
                "Done: {} saved, {} skipped, {} failed to parse, {} missing images, {} failed to write",
                stats.units_saved,
                stats.units_skipped,
                stats.parse_errors,
                stats.asset_errors,
                stats.save_errors
            );
        }

        Command::Bundle { out } => {
            let _timer = utils::StageTimer::start("bundle", out.display());
            let store = UnitStore::open(&config.storage.data_dir)?;
            store.bundle(&out)?;
        }

        Command::Validate { dir, summary } => {
            let dir = dir.unwrap_or(config.storage.data_dir);
            let _timer = utils::StageTimer::start("validate", dir.display());
            let reports = validate::validate_dir(&dir)?;

            let mut failures = 0usize;
            for report in &reports {
                if report.is_ok() {
                    if !summary {
                        println!("validate OK {}", report.path.display());
                    }
                    continue;
                }
                for e in &report.errors {
                    println!("validate ERR! {}: {}", report.path.display(), e);
                    failures += 1;
                }
            }

            if failures > 0 {
                error!("Validation failed with {} errors", failures);
                bail!("{} of {} records are invalid", reports.iter().filter(|r| !r.is_ok()).count(), reports.len());
            }
            println!("validate OK Validation succeeded ({} records)", reports.len());
        }

        Command::MarkNew { ids } => {
            let store = UnitStore::open(&config.storage.data_dir)?;
            let changes = store.mark_new(&ids).await?;
            info!("{} set, {} cleared", changes.set.len(), changes.cleared.len());
        }
    }

    Ok(())
}
