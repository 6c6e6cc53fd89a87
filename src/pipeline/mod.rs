//! Pipeline orchestrator: ties notice fetch → parse → assets → storage together.
//!
//! Units are handled one at a time, in page order. A unit that fails to parse
//! is logged and skipped; a unit whose image cannot be downloaded is still
//! saved, pointing at image files that do not exist yet. A record that cannot
//! be written is logged and skipped too. Only a page that cannot be fetched
//! or has no content block aborts the run.

use crate::assets::{AssetOutcome, AssetResolver};
use crate::scraper::{scrape_notice, Fetcher};
use crate::storage::UnitStore;
use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::{info, warn};
use url::Url;

pub struct Pipeline {
    fetcher: Arc<dyn Fetcher>,
    store: UnitStore,
    assets: AssetResolver,
    overwrite: bool,
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct PipelineStats {
    pub units_found: usize,
    pub units_saved: usize,
    pub units_skipped: usize,
    pub parse_errors: usize,
    pub asset_errors: usize,
    pub save_errors: usize,
}

impl Pipeline {
    pub fn new(fetcher: Arc<dyn Fetcher>, store: UnitStore, assets: AssetResolver, overwrite: bool) -> Self {
        Self {
            fetcher,
            store,
            assets,
            overwrite,
        }
    }

    pub async fn run(&self, url: &Url) -> Result<PipelineStats> {
        let page = scrape_notice(self.fetcher.as_ref(), url)
            .await
            .with_context(|| format!("Failed to scrape {}", url))?;

        let mut stats = PipelineStats {
            units_found: page.units.len(),
            ..Default::default()
        };
        info!(
            "{} unit blocks (banner: {:?}, limited: {})",
            stats.units_found, page.context.banner, page.context.limited
        );

        for (position, result) in page.units.into_iter().enumerate() {
            let mut unit = match result {
                Ok(unit) => unit,
                Err(e) => {
                    warn!("unit #{} ({:?}): {}", position + 1, e.category(), e);
                    stats.parse_errors += 1;
                    continue;
                }
            };

            if !self.overwrite && self.store.exists(unit.id()) {
                info!("{} exists, skipping.", unit.id());
                stats.units_skipped += 1;
                continue;
            }

            match self.assets.resolve(&mut unit).await {
                Ok(AssetOutcome::NoSource) => warn!("{}: no image on the page", unit.id()),
                Ok(_) => {}
                Err(e) => {
                    warn!("{}: image not saved: {}", unit.id(), e);
                    stats.asset_errors += 1;
                }
            }

            match self.store.save(&unit).await {
                Ok(_) => {
                    info!("{} added", unit.id());
                    stats.units_saved += 1;
                }
                Err(e) => {
                    warn!("{}: record not saved: {:#}", unit.id(), e);
                    stats.save_errors += 1;
                }
            }
        }

        Ok(stats)
    }
}
