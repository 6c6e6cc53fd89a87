use crate::models::UnitType;
use crate::scraper::error::ParseError;

// ── Identifiers ───────────────────────────────────────────────────────────────

/// Lowercase, keep only ASCII letters and whitespace, collapse whitespace to `.`.
/// "Ais Wallenstein" → "ais.wallenstein" | "Bell Cranel!" → "bell.cranel"
pub fn normalize_id(text: &str) -> String {
    let letters: String = text
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_alphabetic() || c.is_whitespace())
        .collect();
    regex!(r"\s+").replace_all(&letters, ".").into_owned()
}

/// `<name>-<title>`, both normalized.
pub fn unit_id(name: &str, title: &str) -> String {
    format!("{}-{}", normalize_id(name), normalize_id(title))
}

// ── Display name ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TitleAndName {
    pub title: String,
    pub name: String,
}

/// "[ Sword Princess ] Ais Wallenstein" → title "Sword Princess", name "Ais Wallenstein"
pub fn split_title_and_name(text: &str) -> Result<TitleAndName, ParseError> {
    let caps = regex!(r"^\[\s*(?P<title>[^\]]+?)\s*\]\s*(?P<name>.*?)\s*$")
        .captures(text)
        .ok_or_else(|| ParseError::malformed("character name", text.trim()))?;

    Ok(TitleAndName {
        title: caps["title"].to_string(),
        name: caps["name"].to_string(),
    })
}

// ── Unit type ─────────────────────────────────────────────────────────────────

/// "Unit Type: P. Attack Type" → p.attack | "Healer" → healer
pub fn parse_unit_type(text: &str) -> Result<UnitType, ParseError> {
    let caps = regex!(r"(?i)^\s*(?:unit\s+type\s*[:：]\s*)?((?:[pm]\.\s*)?\S*)(?:\s+type)?\s*$")
        .captures(text.trim())
        .ok_or_else(|| ParseError::malformed("unit type", text.trim()))?;

    let token = caps[1].to_lowercase();
    let compact: String = token.chars().filter(|c| !c.is_whitespace()).collect();

    match compact.as_str() {
        "p.attack" => Ok(UnitType::PhysicalAttack),
        "m.attack" => Ok(UnitType::MagicAttack),
        "balance" => Ok(UnitType::Balance),
        "healer" => Ok(UnitType::Healer),
        "defense" => Ok(UnitType::Defense),
        _ => Err(ParseError::malformed(
            "unit type",
            format!("unhandled unit type '{}'", token),
        )),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_id() {
        assert_eq!(normalize_id("Ais Wallenstein"), "ais.wallenstein");
        assert_eq!(normalize_id("Bell Cranel!"), "bell.cranel");
        assert_eq!(normalize_id("Hero's   Return"), "heros.return");
        assert_eq!(normalize_id("3rd Anniversary"), "rd.anniversary");
    }

    #[test]
    fn test_unit_id() {
        assert_eq!(unit_id("Bell Cranel", "Little Rookie"), "bell.cranel-little.rookie");
    }

    #[test]
    fn test_split_title_and_name() {
        let parsed = split_title_and_name("[ Sword Princess ]  Ais Wallenstein ").unwrap();
        assert_eq!(parsed.title, "Sword Princess");
        assert_eq!(parsed.name, "Ais Wallenstein");

        let tight = split_title_and_name("[Little Rookie]Bell Cranel").unwrap();
        assert_eq!(tight.title, "Little Rookie");
        assert_eq!(tight.name, "Bell Cranel");
    }

    #[test]
    fn test_split_title_and_name_requires_brackets() {
        assert!(split_title_and_name("Sword Princess Ais Wallenstein").is_err());
        assert!(split_title_and_name("Sword Princess] Ais").is_err());
    }

    #[test]
    fn test_parse_unit_type() {
        assert_eq!(parse_unit_type("Unit Type: P. Attack Type").unwrap(), UnitType::PhysicalAttack);
        assert_eq!(parse_unit_type("unit type：m.attack").unwrap(), UnitType::MagicAttack);
        assert_eq!(parse_unit_type("Unit Type: Healer Type").unwrap(), UnitType::Healer);
        assert_eq!(parse_unit_type("Defense").unwrap(), UnitType::Defense);
        assert_eq!(parse_unit_type("  Balance Type ").unwrap(), UnitType::Balance);
    }

    #[test]
    fn test_parse_unit_type_names_unknown_token() {
        let err = parse_unit_type("Support").unwrap_err();
        assert!(err.to_string().contains("'support'"), "{}", err);
    }
}
