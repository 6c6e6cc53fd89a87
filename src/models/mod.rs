use serde::{Deserialize, Serialize};
use std::fmt;

// ── Unit kind / type ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum UnitKind {
    Adventurer,
    Assist,
}

impl fmt::Display for UnitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnitKind::Adventurer => f.write_str("adventurer"),
            UnitKind::Assist => f.write_str("assist"),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum UnitType {
    #[serde(rename = "p.attack")]
    PhysicalAttack,
    #[serde(rename = "m.attack")]
    MagicAttack,
    #[serde(rename = "balance")]
    Balance,
    #[serde(rename = "healer")]
    Healer,
    #[serde(rename = "defense")]
    Defense,
}

// ── Stats ─────────────────────────────────────────────────────────────────────

/// One row of a status table: hp, mp, str, end, dex, agi, mag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatLine {
    pub hp: i32,
    pub mp: i32,
    pub str: i32,
    pub end: i32,
    pub dex: i32,
    pub agi: i32,
    pub mag: i32,
}

/// The six stats carried on a record. `mag` is read from the page but not kept.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Stats {
    pub hp: i32,
    pub mp: i32,
    pub str: i32,
    pub end: i32,
    pub dex: i32,
    pub agi: i32,
}

impl From<StatLine> for Stats {
    fn from(line: StatLine) -> Self {
        Stats {
            hp: line.hp,
            mp: line.mp,
            str: line.str,
            end: line.end,
            dex: line.dex,
            agi: line.agi,
        }
    }
}

// ── Skills ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CombatSkill {
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub special_arts: bool,
    pub name: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mp: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PassiveSkill {
    pub name: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    /// Enemy category the skill is more effective against.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nemesis: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CombinationSkill {
    pub name: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AssistSkill {
    pub name: String,
    /// Base and max-level descriptions, in page order.
    pub descriptions: [String; 2],
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

/// Stats after the mid-game power-up ("MHA").
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AscensionStats {
    #[serde(flatten)]
    pub stats: Stats,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub combination_skills: Option<Vec<CombinationSkill>>,
}

// ── Records ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum Banner {
    One(String),
    Many(Vec<String>),
}

/// Fields shared by every unit kind.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UnitCommon {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limited: Option<bool>,
    pub rarity: u8,
    pub title: String,
    pub name: String,
    #[serde(flatten)]
    pub stats: Stats,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub banner: Option<Banner>,
    #[serde(rename = "new", default, skip_serializing_if = "Option::is_none")]
    pub is_new: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AdventurerRecord {
    #[serde(flatten)]
    pub common: UnitCommon,
    #[serde(rename = "type")]
    pub unit_type: UnitType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ascension: Option<AscensionStats>,
    /// Special arts first, then the three regular combat skills.
    pub combat_skills: [CombatSkill; 4],
    pub passive_skills: [PassiveSkill; 5],
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AssistRecord {
    #[serde(flatten)]
    pub common: UnitCommon,
    pub skill: AssistSkill,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum UnitRecord {
    Adventurer(AdventurerRecord),
    Assist(AssistRecord),
}

impl UnitRecord {
    pub fn kind(&self) -> UnitKind {
        match self {
            UnitRecord::Adventurer(_) => UnitKind::Adventurer,
            UnitRecord::Assist(_) => UnitKind::Assist,
        }
    }

    pub fn common(&self) -> &UnitCommon {
        match self {
            UnitRecord::Adventurer(a) => &a.common,
            UnitRecord::Assist(a) => &a.common,
        }
    }

    pub fn common_mut(&mut self) -> &mut UnitCommon {
        match self {
            UnitRecord::Adventurer(a) => &mut a.common,
            UnitRecord::Assist(a) => &mut a.common,
        }
    }

    pub fn id(&self) -> &str {
        &self.common().id
    }
}
