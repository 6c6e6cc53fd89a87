//! Table-level building blocks: the forward-only table cursor, the status
//! table extractor and the two-cell skill row parser.

use scraper::ElementRef;
use scraper::node::Node;

use crate::models::{CombatSkill, PassiveSkill, StatLine};
use crate::scraper::error::ParseError;

// ── Cursor ────────────────────────────────────────────────────────────────────

/// Forward-only cursor over a unit block's tables, in document order.
pub struct TableCursor<'a> {
    tables: Vec<ElementRef<'a>>,
    position: usize,
}

impl<'a> TableCursor<'a> {
    pub fn new(tables: Vec<ElementRef<'a>>) -> Self {
        Self { tables, position: 0 }
    }

    pub fn peek(&self) -> Option<ElementRef<'a>> {
        self.tables.get(self.position).copied()
    }

    pub fn advance(&mut self) -> Option<ElementRef<'a>> {
        let table = self.peek()?;
        self.position += 1;
        Some(table)
    }

    pub fn is_exhausted(&self) -> bool {
        self.position >= self.tables.len()
    }

    /// Fails with `UnexpectedContent` if any table is left.
    pub fn expect_exhausted(&self, after: &'static str) -> Result<(), ParseError> {
        if self.is_exhausted() {
            Ok(())
        } else {
            Err(ParseError::UnexpectedContent(after))
        }
    }
}

// ── Element helpers ───────────────────────────────────────────────────────────

pub fn element_text(element: ElementRef) -> String {
    element.text().collect()
}

/// Text content of the node right after `element`, whether a text node or an element.
pub fn next_sibling_text(element: ElementRef) -> Option<String> {
    let node = element.next_sibling()?;
    if let Some(sibling) = ElementRef::wrap(node) {
        return Some(element_text(sibling));
    }
    match node.value() {
        Node::Text(text) => {
            let s: &str = text;
            Some(s.to_owned())
        }
        _ => None,
    }
}

pub fn has_class(element: ElementRef, class: &str) -> bool {
    element.value().classes().any(|c| c == class)
}

fn child_elements<'a>(element: ElementRef<'a>) -> impl Iterator<Item = ElementRef<'a>> {
    element.children().filter_map(ElementRef::wrap)
}

/// The table's own rows, including those inside `thead`/`tbody`/`tfoot`,
/// but not rows of nested tables.
pub fn table_rows(table: ElementRef) -> Vec<ElementRef> {
    let mut rows = Vec::new();
    for child in child_elements(table) {
        match child.value().name() {
            "tr" => rows.push(child),
            "thead" | "tbody" | "tfoot" => {
                rows.extend(child_elements(child).filter(|e| e.value().name() == "tr"))
            }
            _ => {}
        }
    }
    rows
}

/// Header and data cells of a row.
pub fn row_cells(row: ElementRef) -> Vec<ElementRef> {
    child_elements(row)
        .filter(|e| matches!(e.value().name(), "td" | "th"))
        .collect()
}

fn data_cells(row: ElementRef) -> Vec<ElementRef> {
    child_elements(row)
        .filter(|e| e.value().name() == "td")
        .collect()
}

// ── Status tables ─────────────────────────────────────────────────────────────

/// Parse exactly seven integer cells: hp, mp, str, end, dex, agi, mag.
pub fn parse_stats<S: AsRef<str>>(cells: &[S]) -> Result<StatLine, ParseError> {
    if cells.len() != 7 {
        return Err(ParseError::malformed(
            "stats",
            format!("expected 7 cells, found {}", cells.len()),
        ));
    }

    let mut values = [0i32; 7];
    for (value, cell) in values.iter_mut().zip(cells) {
        let cell = cell.as_ref().trim();
        *value = cell
            .parse()
            .map_err(|_| ParseError::malformed("stats", format!("'{}' is not a number", cell)))?;
    }

    let [hp, mp, str, end, dex, agi, mag] = values;
    Ok(StatLine { hp, mp, str, end, dex, agi, mag })
}

pub fn parse_stat_table(table: ElementRef) -> Result<StatLine, ParseError> {
    let cells: Vec<String> = table
        .select(selector!("tbody > tr > td"))
        .map(element_text)
        .collect();
    parse_stats(&cells)
}

// ── Skill rows ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkillRow {
    pub name: String,
    pub description: String,
}

/// Drop a trailing rank annotation: "Sword Dance: A" → "Sword Dance".
pub fn strip_rank(name_with_rank: &str) -> &str {
    let trimmed = name_with_rank.trim();
    regex!(r"(?is)^(.*?)([:：]\s*[a-z?]+)?$")
        .captures(trimmed)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim())
        .unwrap_or(trimmed)
}

/// "Increases damage towards Dragons" → Some("Dragons")
pub fn find_nemesis(description: &str) -> Option<String> {
    regex!(r"(?i)\btowards? (\w+)$")
        .captures(description.trim())
        .map(|caps| caps[1].to_string())
}

pub fn parse_skill_row(row: ElementRef) -> Result<SkillRow, ParseError> {
    let cells = data_cells(row);
    if cells.len() != 2 {
        return Err(ParseError::malformed(
            "skill row",
            format!("expected 2 cells, found {}", cells.len()),
        ));
    }

    let name_with_rank = element_text(cells[0]);
    let description = element_text(cells[1]);
    if name_with_rank.trim().is_empty() || description.trim().is_empty() {
        return Err(ParseError::malformed("skill row", "empty cell"));
    }

    Ok(SkillRow {
        name: strip_rank(&name_with_rank).to_string(),
        description: description.trim().to_string(),
    })
}

pub fn parse_combat_skill(row: ElementRef, special_arts: bool) -> Result<CombatSkill, ParseError> {
    let SkillRow { name, description } = parse_skill_row(row)?;
    Ok(CombatSkill {
        special_arts,
        name,
        description,
        mp: None,
        tags: None,
    })
}

pub fn parse_passive_skill(row: ElementRef) -> Result<PassiveSkill, ParseError> {
    let SkillRow { name, description } = parse_skill_row(row)?;
    let nemesis = find_nemesis(&description);
    Ok(PassiveSkill {
        name,
        description,
        tags: None,
        nemesis,
    })
}

/// First table in a fragment; test helper shared by the parser modules.
#[cfg(test)]
pub(crate) fn first_table(doc: &scraper::Html) -> ElementRef<'_> {
    doc.select(selector!("table")).next().expect("fixture has a table")
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::Html;

    fn rows_of(html: &str) -> Html {
        Html::parse_fragment(&format!("<table><tbody>{}</tbody></table>", html))
    }

    #[test]
    fn test_parse_stats_in_order() {
        let line = parse_stats(&["1200", "300", " 410 ", "220", "180", "260", "90"]).unwrap();
        assert_eq!(
            line,
            StatLine { hp: 1200, mp: 300, str: 410, end: 220, dex: 180, agi: 260, mag: 90 }
        );
    }

    #[test]
    fn test_parse_stats_rejects_wrong_shape() {
        assert!(parse_stats(&["1", "2", "3", "4", "5", "6"]).is_err());
        assert!(parse_stats(&["1", "2", "3", "4", "5", "6", "7", "8"]).is_err());
        assert!(parse_stats(&["1", "2", "3", "four", "5", "6", "7"]).is_err());
        assert!(parse_stats(&["1", "2", "3", "", "5", "6", "7"]).is_err());
    }

    #[test]
    fn test_parse_stat_table() {
        let doc = Html::parse_fragment(
            "<table class=\"argo-table heading\"><thead><tr><th>HP</th></tr></thead>\
             <tbody><tr><td>1</td><td>2</td><td>3</td><td>4</td><td>5</td><td>6</td><td>7</td></tr></tbody></table>",
        );
        let line = parse_stat_table(first_table(&doc)).unwrap();
        assert_eq!(line.hp, 1);
        assert_eq!(line.mag, 7);
    }

    #[test]
    fn test_strip_rank() {
        assert_eq!(strip_rank("Sword Dance: A"), "Sword Dance");
        assert_eq!(strip_rank("Sword Dance：?"), "Sword Dance");
        assert_eq!(strip_rank("Crush: Strong Foe"), "Crush: Strong Foe");
        assert_eq!(strip_rank("  Lucky  "), "Lucky");
    }

    #[test]
    fn test_find_nemesis() {
        assert_eq!(find_nemesis("Increases damage towards Dragons"), Some("Dragons".into()));
        assert_eq!(find_nemesis("Effective toward Beasts"), Some("Beasts".into()));
        assert_eq!(find_nemesis("Raises Str."), None);
        assert_eq!(find_nemesis("Damage towards Dragons is increased"), None);
    }

    #[test]
    fn test_parse_passive_skill() {
        let doc = rows_of("<tr><td>Dragon Slayer: B</td><td>Increases damage towards Dragons</td></tr>");
        let row = table_rows(first_table(&doc))[0];
        let skill = parse_passive_skill(row).unwrap();
        assert_eq!(skill.name, "Dragon Slayer");
        assert_eq!(skill.nemesis.as_deref(), Some("Dragons"));
    }

    #[test]
    fn test_parse_combat_skill_flags_special_arts() {
        let doc = rows_of("<tr><td>Airiel</td><td>Ultra strong wind attack</td></tr>");
        let row = table_rows(first_table(&doc))[0];
        assert!(parse_combat_skill(row, true).unwrap().special_arts);
        assert!(!parse_combat_skill(row, false).unwrap().special_arts);
    }

    #[test]
    fn test_parse_skill_row_rejects_bad_rows() {
        let doc = rows_of(
            "<tr><td>Only one</td></tr>\
             <tr><td>Name</td><td>  </td></tr>\
             <tr><td>a</td><td>b</td><td>c</td></tr>",
        );
        for row in table_rows(first_table(&doc)) {
            assert!(parse_skill_row(row).is_err());
        }
    }

    #[test]
    fn test_cursor_moves_forward_only() {
        let doc = Html::parse_fragment("<table id=a></table><table id=b></table>");
        let tables: Vec<_> = doc.select(selector!("table")).collect();
        let mut cursor = TableCursor::new(tables);

        assert_eq!(cursor.peek().and_then(|t| t.value().attr("id")), Some("a"));
        assert_eq!(cursor.advance().and_then(|t| t.value().attr("id")), Some("a"));
        assert!(cursor.expect_exhausted("test").is_err());
        assert_eq!(cursor.advance().and_then(|t| t.value().attr("id")), Some("b"));
        assert!(cursor.is_exhausted());
        assert!(cursor.advance().is_none());
        assert!(cursor.expect_exhausted("test").is_ok());
    }
}
