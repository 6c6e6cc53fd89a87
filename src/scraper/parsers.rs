use scraper::{ElementRef, Html};
use tracing::{debug, trace};
use url::Url;

use crate::models::{
    AdventurerRecord, AssistRecord, AssistSkill, Banner, Stats, UnitCommon, UnitKind, UnitRecord,
};
use crate::scraper::cleaner::{split_title_and_name, unit_id, TitleAndName};
use crate::scraper::error::{PageError, ParseError};
use crate::scraper::sections::{parse_adventurer, parse_assist, AdventurerSection};
use crate::scraper::table::{
    element_text, has_class, next_sibling_text, parse_stat_table, TableCursor,
};

// ── Page ──────────────────────────────────────────────────────────────────────

/// Page-wide facts applied to every unit on the notice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageContext {
    pub banner: Option<String>,
    pub limited: bool,
}

#[derive(Debug)]
pub struct ParsedPage {
    pub context: PageContext,
    /// One entry per non-empty grid cell, in document order.
    pub units: Vec<Result<UnitRecord, ParseError>>,
}

pub fn parse_page(html: &str, page_url: Option<&Url>) -> Result<ParsedPage, PageError> {
    let doc = Html::parse_document(html);

    let main = doc
        .select(selector!("div.mainBlcok"))
        .next()
        .ok_or(PageError::MissingContent)?;
    let main_text = element_text(main);
    if main_text.trim().is_empty() {
        return Err(PageError::MissingContent);
    }

    let context = PageContext {
        banner: find_banner(main),
        limited: !regex!(r"(?i)these are not time-limited units").is_match(&main_text),
    };
    debug!("page context: {:?}", context);

    let units = main
        .select(selector!("div.algo-Grid > div.grid-cell"))
        .filter(|cell| {
            cell.children()
                .any(|node| node.value().is_element() || node.value().is_text())
        })
        .map(|cell| parse_unit(cell, &context, page_url))
        .collect();

    Ok(ParsedPage { context, units })
}

/// "Wind Festival Gacha is now live!" after the description heading → "Wind Festival"
fn find_banner(main: ElementRef) -> Option<String> {
    let heading = main
        .select(selector!("h3"))
        .find(|h3| regex!(r"(?i)description").is_match(&element_text(*h3)))?;
    let text = next_sibling_text(heading)?;

    regex!(r"(?i)^(.*?)\s*gacha")
        .captures(text.trim())
        .map(|caps| caps[1].to_string())
        .filter(|banner| !banner.is_empty())
}

// ── Unit block ────────────────────────────────────────────────────────────────

/// Accumulates the fields common to every unit until the kind-specific
/// section is known; only then does it become a `UnitRecord`.
struct UnitBuilder {
    identity: TitleAndName,
    rarity: u8,
    limited: bool,
    banner: Option<String>,
    image: Option<String>,
    stats: Stats,
}

enum Section {
    Adventurer(AdventurerSection),
    Assist(AssistSkill),
}

impl UnitBuilder {
    fn finish(self, section: Section) -> UnitRecord {
        let common = UnitCommon {
            id: unit_id(&self.identity.name, &self.identity.title),
            limited: Some(self.limited),
            rarity: self.rarity,
            title: self.identity.title,
            name: self.identity.name,
            stats: self.stats,
            image: self.image,
            thumbnail: None,
            alias: None,
            banner: self.banner.map(Banner::One),
            is_new: None,
        };

        match section {
            Section::Adventurer(section) => UnitRecord::Adventurer(AdventurerRecord {
                common,
                unit_type: section.unit_type,
                ascension: section.ascension,
                combat_skills: section.combat_skills,
                passive_skills: section.passive_skills,
            }),
            Section::Assist(skill) => UnitRecord::Assist(AssistRecord { common, skill }),
        }
    }
}

pub fn parse_unit(
    block: ElementRef,
    context: &PageContext,
    page_url: Option<&Url>,
) -> Result<UnitRecord, ParseError> {
    let mut cursor = TableCursor::new(block.select(selector!("table.argo-table.heading")).collect());

    let character_table = cursor
        .advance()
        .ok_or(ParseError::Missing("character <table>"))?;

    let kind_span = character_table
        .select(selector!("span.basicRed, span.basicBlue"))
        .next()
        .ok_or(ParseError::Missing("unit kind <span>"))?;
    let kind = if has_class(kind_span, "basicRed") {
        UnitKind::Adventurer
    } else {
        UnitKind::Assist
    };

    let rarity = parse_rarity(kind_span)?;

    let display = character_table
        .select(selector!("span.character-name"))
        .next()
        .map(element_text)
        .filter(|text| !text.trim().is_empty())
        .ok_or(ParseError::Missing("character name <span>"))?;
    let identity = split_title_and_name(&display)?;
    trace!("{} {:?}, rarity {}", kind, identity, rarity);

    let image = character_table
        .select(selector!("img"))
        .next()
        .and_then(|img| img.value().attr("src"))
        .filter(|src| !src.trim().is_empty())
        .map(|src| resolve_src(src.trim(), page_url));

    let mlb_table = cursor
        .advance()
        .ok_or(ParseError::Missing("MLB stats <table>"))?;
    let stats = Stats::from(parse_stat_table(mlb_table)?);

    let builder = UnitBuilder {
        identity,
        rarity,
        limited: context.limited,
        banner: context.banner.clone(),
        image,
        stats,
    };

    let section = match kind {
        UnitKind::Adventurer => Section::Adventurer(parse_adventurer(character_table, &mut cursor)?),
        UnitKind::Assist => Section::Assist(parse_assist(&mut cursor)?),
    };

    let unit = builder.finish(section);
    debug!("parsed {} {}", unit.kind(), unit.id());
    Ok(unit)
}

/// Count of the star glyphs right after the kind marker.
fn parse_rarity(kind_span: ElementRef) -> Result<u8, ParseError> {
    let stars = next_sibling_text(kind_span)
        .map(|text| text.trim().chars().count())
        .filter(|count| *count > 0)
        .ok_or(ParseError::Missing("unit rarity"))?;

    match u8::try_from(stars) {
        Ok(rarity @ 1..=4) => Ok(rarity),
        _ => Err(ParseError::malformed(
            "unit rarity",
            format!("{} stars", stars),
        )),
    }
}

fn resolve_src(src: &str, page_url: Option<&Url>) -> String {
    page_url
        .and_then(|base| base.join(src).ok())
        .map(String::from)
        .unwrap_or_else(|| src.to_string())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
