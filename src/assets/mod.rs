//! Unit image download into the resource directory.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;
use tracing::{debug, info};
use url::Url;

use crate::models::UnitRecord;
use crate::scraper::Fetcher;
use crate::scraper::error::TransportError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetOutcome {
    /// The page had no image for this unit.
    NoSource,
    /// `<id>-full.png` was already on disk.
    AlreadyPresent,
    Downloaded { bytes: usize },
}

pub struct AssetResolver {
    fetcher: Arc<dyn Fetcher>,
    res_dir: PathBuf,
}

impl AssetResolver {
    pub fn new(fetcher: Arc<dyn Fetcher>, res_dir: impl Into<PathBuf>) -> Self {
        Self {
            fetcher,
            res_dir: res_dir.into(),
        }
    }

    pub fn full_name(id: &str) -> String {
        format!("{}-full.png", id)
    }

    pub fn thumb_name(id: &str) -> String {
        format!("{}-thumb.png", id)
    }

    /// Point the record at its local image files, then download the remote
    /// image if it is not cached yet. The references are rewritten even when
    /// the download fails.
    pub async fn resolve(&self, unit: &mut UnitRecord) -> Result<AssetOutcome, TransportError> {
        let common = unit.common_mut();
        let full = Self::full_name(&common.id);
        let source = common.image.replace(full.clone());
        common.thumbnail = Some(Self::thumb_name(&common.id));

        let Some(source) = source else {
            return Ok(AssetOutcome::NoSource);
        };

        let dest = self.res_dir.join(&full);
        if fs::try_exists(&dest).await.unwrap_or(false) {
            info!("'{}' already exists, skipping.", full);
            return Ok(AssetOutcome::AlreadyPresent);
        }

        let url = Url::parse(&source).map_err(|e| TransportError::InvalidUrl {
            url: source.clone(),
            source: e,
        })?;

        debug!("Downloading {} → {:?}", url, dest);
        let fetched = self.fetcher.fetch(&url).await?;
        if !fetched.is_success() {
            return Err(TransportError::Status {
                url: url.to_string(),
                status: fetched.status,
            });
        }

        fs::create_dir_all(&self.res_dir)
            .await
            .map_err(|e| TransportError::io(&self.res_dir, e))?;

        write_then_rename(&dest, &fetched.body).await?;

        info!("'{}' saved.", full);
        Ok(AssetOutcome::Downloaded {
            bytes: fetched.body.len(),
        })
    }
}

/// Write `<dest>.downloading` and move it into place. The temp file never
/// outlives a failed attempt.
async fn write_then_rename(dest: &Path, body: &[u8]) -> Result<(), TransportError> {
    let mut tmp = dest.as_os_str().to_owned();
    tmp.push(".downloading");
    let tmp = PathBuf::from(tmp);

    let _ = fs::remove_file(&tmp).await;
    if let Err(e) = fs::write(&tmp, body).await {
        let _ = fs::remove_file(&tmp).await;
        return Err(TransportError::io(&tmp, e));
    }
    if let Err(e) = fs::rename(&tmp, dest).await {
        let _ = fs::remove_file(&tmp).await;
        return Err(TransportError::io(dest, e));
    }
    Ok(())
}
