//! Notice-page markup shared by the parser and pipeline tests.

pub const PAGE_URL: &str = "https://notices.example.com/asset/notice/view/310";

fn skills_table(header: &str, rows: &[(&str, &str)]) -> String {
    let mut html = format!(
        r#"<table class="argo-table heading"><tbody><tr><th>{}</th><th>Effect</th></tr>"#,
        header
    );
    for (name, description) in rows {
        html.push_str(&format!("<tr><td>{}</td><td>{}</td></tr>", name, description));
    }
    html.push_str("</tbody></table>");
    html
}

fn stats_table(class: &str, values: [i32; 7]) -> String {
    let cells: String = values.iter().map(|v| format!("<td>{}</td>", v)).collect();
    format!(
        r#"<table class="{}"><thead><tr><th>HP</th><th>MP</th><th>STR</th><th>END</th><th>DEX</th><th>AGI</th><th>MAG</th></tr></thead><tbody><tr>{}</tr></tbody></table>"#,
        class, cells
    )
}

fn character_table(color: &str, stars: &str, display: &str, extra_row: &str, image: bool) -> String {
    let img = if image { r#"<img src="/img/unit/full.png">"# } else { "" };
    format!(
        r#"<table class="argo-table heading"><tbody>
<tr><td><span class="{color}">Unit</span>{stars}</td></tr>
<tr><td>{img}<span class="character-name">{display}</span></td></tr>
{extra_row}
</tbody></table>"#
    )
}

pub fn adventurer_block(display: &str, combat_rows: usize, ascension: bool) -> String {
    let mut html = character_table(
        "basicRed",
        "★★★★",
        display,
        "<tr><td>Unit Type: P. Attack Type</td></tr>",
        true,
    );
    html.push_str(&stats_table("argo-table heading", [3000, 400, 500, 300, 250, 350, 100]));
    if ascension {
        html.push_str(&stats_table(
            "argo-table heading status-table",
            [3300, 420, 560, 330, 270, 380, 110],
        ));
    }
    html.push_str(&skills_table("Special Arts", &[("Lil Rafaga: ?", "Ultra Strong Wind Attack")]));
    let combat: Vec<(&str, &str)> = [
        ("Airiel Slash: A", "Strong wind attack against foes"),
        ("Wind Step: B", "Medium wind attack and Agi buff"),
        ("Gale: C", "Wind attack against all foes"),
    ]
    .into_iter()
    .take(combat_rows)
    .collect();
    html.push_str(&skills_table("Combat Skills", &combat));
    html.push_str(&skills_table(
        "Skill/Development Abilities",
        &[
            ("Swordsman: H", "Raises Str."),
            ("Windy: I", "Raises Agi."),
            ("Slayer: G", "Increases damage towards Dragons"),
            ("Instinct: F", "Raises Dex."),
            ("Loyalty: E", "Raises End."),
        ],
    ));
    format!(r#"<div class="grid-cell">{}</div>"#, html)
}

pub fn assist_block(display: &str) -> String {
    let mut html = character_table("basicBlue", "★★★", display, "", false);
    html.push_str(&stats_table("argo-table heading", [120, 60, 40, 30, 20, 10, 5]));
    html.push_str(&skills_table(
        "Assist Skill",
        &[
            ("Hearth of the Goddess: ?", "—"),
            ("Lv. 1", "Raises Str. of all allies by 10%"),
            ("Lv. Max", "Raises Str. of all allies by 15%"),
        ],
    ));
    format!(r#"<div class="grid-cell">{}</div>"#, html)
}

pub fn page(notice: &str, blocks: &[String]) -> String {
    format!(
        r#"<!doctype html><html><head><title>Notice</title></head><body>
<div class="mainBlcok">
<h3>Period</h3>Until the end of the month
<h3>Description</h3>Wind Festival Gacha is now live!
<p>{notice}</p>
<div class="algo-Grid">{blocks}<div class="grid-cell"></div></div>
</div>
</body></html>"#,
        notice = notice,
        blocks = blocks.concat(),
    )
}

/// Valid adventurer, adventurer with a missing combat skill, valid assist.
pub fn mixed_page() -> String {
    page(
        "New units join the roster.",
        &[
            adventurer_block("[ Sword Princess ] Ais Wallenstein", 3, true),
            adventurer_block("[Little Rookie] Bell Cranel", 2, false),
            assist_block("[Goddess] Hestia"),
        ],
    )
}
