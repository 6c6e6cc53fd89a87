//! Record checks over a data directory.
//!
//! Deserializing into `UnitRecord` already enforces the shape (kind tag,
//! required fields, fixed skill counts); `check_record` adds the invariants the
//! type cannot express.

use crate::models::UnitRecord;
use crate::scraper::cleaner::unit_id;
use crate::storage::{read_record, record_files};
use anyhow::Result;
use std::path::{Path, PathBuf};

#[derive(Debug)]
pub struct FileReport {
    pub path: PathBuf,
    pub errors: Vec<String>,
}

impl FileReport {
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }
}

pub fn check_record(unit: &UnitRecord) -> Vec<String> {
    let common = unit.common();
    let mut errors = Vec::new();

    let expected_id = unit_id(&common.name, &common.title);
    if common.id != expected_id {
        errors.push(format!("id '{}' should be '{}'", common.id, expected_id));
    }
    if !(1..=4).contains(&common.rarity) {
        errors.push(format!("rarity {} is outside 1..=4", common.rarity));
    }

    if let UnitRecord::Adventurer(adventurer) = unit {
        for (i, skill) in adventurer.combat_skills.iter().enumerate() {
            if skill.special_arts != (i == 0) {
                errors.push(format!(
                    "combatSkills[{}] '{}': only the first combat skill is special arts",
                    i, skill.name
                ));
            }
        }
    }

    errors
}

pub fn validate_file(path: &Path) -> FileReport {
    let errors = match read_record(path) {
        Ok(unit) => check_record(&unit),
        Err(e) => vec![format!("{:#}", e)],
    };
    FileReport {
        path: path.to_path_buf(),
        errors,
    }
}

pub fn validate_dir(dir: &Path) -> Result<Vec<FileReport>> {
    Ok(record_files(dir)?.iter().map(|p| validate_file(p)).collect())
}
