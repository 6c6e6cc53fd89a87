//! Kind-specific parsers for the tables that follow a unit's base stats.

use scraper::ElementRef;
use tracing::trace;

use crate::models::{AscensionStats, AssistSkill, CombatSkill, PassiveSkill, Stats, UnitType};
use crate::scraper::cleaner::parse_unit_type;
use crate::scraper::error::ParseError;
use crate::scraper::table::{
    element_text, has_class, parse_combat_skill, parse_passive_skill, parse_skill_row,
    parse_stat_table, row_cells, table_rows, TableCursor,
};

/// Marks the optional pre-ascension status table.
const STATUS_TABLE_CLASS: &str = "status-table";

const COMBAT_SKILL_COUNT: usize = 4;
const PASSIVE_SKILL_COUNT: usize = 5;
const ASSIST_DESCRIPTION_COUNT: usize = 2;

#[derive(Debug, Clone)]
pub struct AdventurerSection {
    pub unit_type: UnitType,
    pub ascension: Option<AscensionStats>,
    pub combat_skills: [CombatSkill; COMBAT_SKILL_COUNT],
    pub passive_skills: [PassiveSkill; PASSIVE_SKILL_COUNT],
}

// ── Adventurer ────────────────────────────────────────────────────────────────

pub fn parse_adventurer(
    character_table: ElementRef,
    cursor: &mut TableCursor,
) -> Result<AdventurerSection, ParseError> {
    let unit_type_text = table_rows(character_table)
        .get(2)
        .and_then(|row| row_cells(*row).first().copied())
        .map(element_text)
        .filter(|text| !text.trim().is_empty())
        .ok_or(ParseError::Missing("unit type <tr>"))?;
    let unit_type = parse_unit_type(&unit_type_text)?;

    let mut special_arts_table = cursor
        .advance()
        .ok_or(ParseError::Missing("MHA stats or special arts <table>"))?;

    // The class is the only marker of ascension stats; a reused class would be misread.
    let mut ascension = None;
    if has_class(special_arts_table, STATUS_TABLE_CLASS) {
        let mha_table = special_arts_table;
        special_arts_table = cursor
            .advance()
            .ok_or(ParseError::Missing("special arts <table>"))?;

        let stats = parse_stat_table(mha_table)?;
        trace!("ascension stats: {:?}", stats);
        ascension = Some(AscensionStats {
            stats: Stats::from(stats),
            combination_skills: None,
        });
    }

    let special_arts_row = table_rows(special_arts_table)
        .get(1)
        .copied()
        .ok_or(ParseError::Missing("special arts skill <tr>"))?;
    let mut combat_skills = vec![parse_combat_skill(special_arts_row, true)?];

    let combat_table = cursor
        .advance()
        .ok_or(ParseError::Missing("combat skills <table>"))?;
    for row in table_rows(combat_table).into_iter().skip(1) {
        combat_skills.push(parse_combat_skill(row, false)?);
    }
    let combat_skills = exact("combat skills", combat_skills)?;

    let skills_table = cursor
        .advance()
        .ok_or(ParseError::Missing("skill/development abilities <table>"))?;
    let passive_skills = table_rows(skills_table)
        .into_iter()
        .skip(1)
        .map(parse_passive_skill)
        .collect::<Result<Vec<_>, _>>()?;
    let passive_skills = exact("passive skills", passive_skills)?;

    cursor.expect_exhausted("passive skills")?;

    Ok(AdventurerSection {
        unit_type,
        ascension,
        combat_skills,
        passive_skills,
    })
}

// ── Assist ────────────────────────────────────────────────────────────────────

pub fn parse_assist(cursor: &mut TableCursor) -> Result<AssistSkill, ParseError> {
    let skill_table = cursor
        .advance()
        .ok_or(ParseError::Missing("assist skill <table>"))?;

    let mut rows = table_rows(skill_table).into_iter().skip(1);
    let first = rows
        .next()
        .ok_or(ParseError::Missing("assist skill <tr>"))?;
    let name = parse_skill_row(first)?.name;

    let descriptions = rows
        .map(|row| parse_skill_row(row).map(|skill| skill.description))
        .collect::<Result<Vec<_>, _>>()?;
    let descriptions: [String; ASSIST_DESCRIPTION_COUNT] =
        exact("assist skill descriptions", descriptions)?;

    cursor.expect_exhausted("assist skill")?;

    Ok(AssistSkill {
        name,
        descriptions,
        tags: None,
    })
}

fn exact<T, const N: usize>(what: &'static str, items: Vec<T>) -> Result<[T; N], ParseError> {
    items.try_into().map_err(|items: Vec<T>| ParseError::Count {
        what,
        expected: N,
        found: items.len(),
    })
}

// ── Tests ─────────────────────────────────────────────────────────────────────
