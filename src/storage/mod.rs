//! The unit dataset on disk: one pretty-printed `<id>.json` per unit.
//!
//! Record writes go through `tokio::fs`; the read-side commands (`bundle`,
//! `validate`) run outside the scrape loop and read synchronously.

use crate::models::UnitRecord;
use anyhow::{Context, Result};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub struct UnitStore {
    data_dir: PathBuf,
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct NewFlagChanges {
    pub set: Vec<String>,
    pub cleared: Vec<String>,
}

impl UnitStore {
    pub fn open(data_dir: impl Into<PathBuf>) -> Result<Self> {
        let data_dir = data_dir.into();
        fs::create_dir_all(&data_dir)
            .with_context(|| format!("Failed to create data directory {:?}", data_dir))?;
        Ok(Self { data_dir })
    }

    #[cfg(test)]
    pub fn dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn path_for(&self, id: &str) -> PathBuf {
        self.data_dir.join(format!("{}.json", id))
    }

    pub fn exists(&self, id: &str) -> bool {
        self.path_for(id).is_file()
    }

    pub async fn save(&self, unit: &UnitRecord) -> Result<PathBuf> {
        let path = self.path_for(unit.id());
        let mut text = serde_json::to_string_pretty(unit)?;
        text.push('\n');
        tokio::fs::write(&path, text)
            .await
            .with_context(|| format!("Failed to write {:?}", path))?;
        debug!("wrote {:?}", path);
        Ok(path)
    }

    pub fn load(&self, id: &str) -> Result<UnitRecord> {
        read_record(&self.path_for(id))
    }

    /// Every `*.json` file in the data directory, sorted by file name.
    pub fn record_files(&self) -> Result<Vec<PathBuf>> {
        record_files(&self.data_dir)
    }

    /// Concatenate every record, as stored, into one JSON array.
    pub fn bundle(&self, out: &Path) -> Result<usize> {
        let mut units = Vec::new();
        for path in self.record_files()? {
            let text = fs::read_to_string(&path).with_context(|| format!("Failed to read {:?}", path))?;
            let value: serde_json::Value =
                serde_json::from_str(&text).with_context(|| format!("Invalid JSON in {:?}", path))?;
            units.push(value);
        }

        if let Some(parent) = out.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(out, serde_json::to_string(&units)?)
            .with_context(|| format!("Failed to write {:?}", out))?;

        info!("Bundled {} units into {:?}", units.len(), out);
        Ok(units.len())
    }

    /// Flag exactly the listed ids as new; rewrite only records whose flag changes.
    pub async fn mark_new(&self, ids: &[String]) -> Result<NewFlagChanges> {
        let wanted: HashSet<&str> = ids.iter().map(String::as_str).collect();
        let mut changes = NewFlagChanges::default();

        for path in self.record_files()? {
            let mut unit = read_record(&path)?;
            let is_new = wanted.contains(unit.id());
            if unit.common().is_new.unwrap_or(false) == is_new {
                continue;
            }

            unit.common_mut().is_new = Some(is_new);
            self.save(&unit).await?;
            if is_new {
                info!("  {}: setting 'new'", unit.id());
                changes.set.push(unit.id().to_string());
            } else {
                info!("  {}: clearing 'new'", unit.id());
                changes.cleared.push(unit.id().to_string());
            }
        }

        Ok(changes)
    }
}

pub fn read_record(path: &Path) -> Result<UnitRecord> {
    let text = fs::read_to_string(path).with_context(|| format!("Failed to read {:?}", path))?;
    serde_json::from_str(&text).with_context(|| format!("Invalid unit record {:?}", path))
}

pub fn record_files(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.exists() {
        return Ok(vec![]);
    }

    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && path.extension().map(|e| e == "json").unwrap_or(false) {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::models::{AssistRecord, AssistSkill, Stats, UnitCommon};

    pub(crate) fn assist(name: &str, title: &str) -> UnitRecord {
        UnitRecord::Assist(AssistRecord {
            common: UnitCommon {
                id: crate::scraper::cleaner::unit_id(name, title),
                limited: Some(false),
                rarity: 2,
                title: title.into(),
                name: name.into(),
                stats: Stats { hp: 10, mp: 5, str: 1, end: 1, dex: 1, agi: 1 },
                image: None,
                thumbnail: None,
                alias: None,
                banner: None,
                is_new: None,
            },
            skill: AssistSkill {
                name: "Support".into(),
                descriptions: ["one".into(), "two".into()],
                tags: None,
            },
        })
    }

    #[tokio::test]
    async fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = UnitStore::open(dir.path()).unwrap();
        let unit = assist("Hestia", "Goddess");

        let path = store.save(&unit).await.unwrap();
        assert_eq!(path, dir.path().join("hestia-goddess.json"));
        assert!(store.exists("hestia-goddess"));
        assert!(fs::read_to_string(&path).unwrap().ends_with("}\n"));
        assert_eq!(store.load("hestia-goddess").unwrap(), unit);
    }

    #[tokio::test]
    async fn test_bundle() {
        let dir = tempfile::tempdir().unwrap();
        let store = UnitStore::open(dir.path().join("data")).unwrap();
        store.save(&assist("Hestia", "Goddess")).await.unwrap();
        store.save(&assist("Loki", "Trickster")).await.unwrap();
        fs::write(store.dir().join("notes.txt"), "ignored").unwrap();

        let out = dir.path().join("dist/units.json");
        assert_eq!(store.bundle(&out).unwrap(), 2);

        let bundled: Vec<serde_json::Value> =
            serde_json::from_str(&fs::read_to_string(out).unwrap()).unwrap();
        assert_eq!(bundled[0]["id"], "hestia-goddess");
        assert_eq!(bundled[1]["id"], "loki-trickster");
    }

    #[tokio::test]
    async fn test_mark_new() {
        let dir = tempfile::tempdir().unwrap();
        let store = UnitStore::open(dir.path()).unwrap();
        let mut old = assist("Loki", "Trickster");
        old.common_mut().is_new = Some(true);
        store.save(&old).await.unwrap();
        store.save(&assist("Hestia", "Goddess")).await.unwrap();
        store.save(&assist("Freya", "Goddess of Beauty")).await.unwrap();

        let changes = store.mark_new(&["hestia-goddess".to_string()]).await.unwrap();
        assert_eq!(changes.set, vec!["hestia-goddess".to_string()]);
        assert_eq!(changes.cleared, vec!["loki-trickster".to_string()]);
        assert_eq!(store.load("hestia-goddess").unwrap().common().is_new, Some(true));
        assert_eq!(store.load("loki-trickster").unwrap().common().is_new, Some(false));
        assert_eq!(store.load("freya-goddess.of.beauty").unwrap().common().is_new, None);
    }

    #[tokio::test]
    async fn test_save_into_blocked_path() {
        let dir = tempfile::tempdir().unwrap();
        let store = UnitStore::open(dir.path()).unwrap();
        fs::create_dir(store.path_for("hestia-goddess")).unwrap();

        let err = store.save(&assist("Hestia", "Goddess")).await.unwrap_err();
        assert!(err.to_string().contains("hestia-goddess.json"));
        assert!(!store.exists("hestia-goddess"));
    }
}
