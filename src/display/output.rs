use crate::analysis::draft::DraftContext;
use crate::analysis::recommender::SuggestionReport;
use crate::data::models::{HeroRow, Relation};
use crate::roster::{self, HeroId};
use colored::*;
use tabled::{builder::Builder, settings::Style, Table, Tabled};

#[derive(Tabled)]
struct BoardRow {
    side: String,
    picks: String,
    bans: String,
}

#[derive(Tabled)]
struct SuggestionRow {
    rank: String,
    hero: String,
    #[tabled(rename = "id")]
    hero_id: String,
    score: String,
}

fn hero_names(ids: &[HeroId]) -> String {
    if ids.is_empty() {
        return "-".to_string();
    }
    ids.iter()
        .map(|id| roster::id_to_name(*id))
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn display_draft_board(draft: &DraftContext) {
    println!("\n{}", "⚔️  MLBB DRAFT ASSISTANT".bold().cyan());
    println!("{}\n", "=".repeat(60).cyan());

    let rows = vec![
        BoardRow {
            side: "Team".green().to_string(),
            picks: hero_names(&draft.team_pick),
            bans: hero_names(&draft.team_ban),
        },
        BoardRow {
            side: "Enemy".red().to_string(),
            picks: hero_names(&draft.enemy_pick),
            bans: hero_names(&draft.enemy_ban),
        },
    ];

    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{}", table);
}

pub fn display_suggestions(report: &SuggestionReport) {
    println!("\n{}", "🎯 Strong Recommended".bold().cyan());
    println!("{}\n", "=".repeat(60).cyan());

    if let Some(shortfall) = report.shortfall {
        display_warning(&format!(
            "Only {} heroes available for suggestion ({} requested); some heroes are unknown to the model",
            shortfall.available, shortfall.requested
        ));
    }

    if report.suggestions.is_empty() {
        println!("{}", "No hero suggestions available (model has no candidates left)".yellow());
        return;
    }

    let rows: Vec<SuggestionRow> = report
        .suggestions
        .iter()
        .enumerate()
        .map(|(idx, s)| SuggestionRow {
            rank: format!("#{}", idx + 1),
            hero: s.hero_name.clone(),
            hero_id: s.hero_id.to_string(),
            score: format!("{:.3}", s.score),
        })
        .collect();

    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{}", table);

    println!("\n{}", "Interpretation".bold().yellow());
    println!("• Score: model confidence that the hero belongs with your current picks");
    println!("• Heroes already picked or banned by either side are never suggested\n");
}

pub fn display_training_summary(examples: usize, heroes: usize, trees: usize, seed: u64, path: &str) {
    println!("\n{}", "🧠 Model trained and saved".bold().green());
    println!("   Training examples:  {}", examples);
    println!("   Suggestable heroes: {}", heroes);
    println!("   Trees:              {} (seed {})", trees, seed);
    println!("   Saved to:           {}\n", path);
}

pub fn display_error(error: &str) {
    eprintln!("{} {}", "❌ Error:".red().bold(), error);
}

pub fn display_warning(message: &str) {
    println!("{} {}", "⚠️".yellow(), message.yellow());
}

pub fn display_info(message: &str) {
    println!("{} {}", "ℹ️".cyan(), message);
}

pub fn display_success(message: &str) {
    println!("{} {}", "✓".green(), message);
}

fn section_title(relation: Relation) -> (&'static str, &'static str) {
    match relation {
        Relation::Counter => (
            "A. Counter",
            "These columns show which heroes are strong against the main hero (counters).",
        ),
        Relation::Countered => (
            "B. Countered",
            "These columns show which heroes are most easily countered by the main hero.",
        ),
        Relation::Best => (
            "C. Best (Synergy)",
            "These columns show which heroes have the best synergy with the main hero.",
        ),
        Relation::Worst => (
            "D. Worst (Synergy)",
            "These columns show which heroes have the worst synergy with the main hero.",
        ),
    }
}

/// Name for a raw dataset cell: roster name when known, the number otherwise,
/// blank when missing.
fn cell_label(cell: Option<i64>) -> String {
    match cell {
        Some(value) => match HeroId::try_from(value) {
            Ok(id) => roster::id_to_name(id),
            Err(_) => value.to_string(),
        },
        None => String::new(),
    }
}

/// Renders the historical dataset as a markdown reference with hero ids
/// replaced by names, one section per relation.
pub fn render_draft_table_markdown(rows: &[HeroRow]) -> String {
    let mut out = vec![
        "# MLBB Draft Table Documentation".to_string(),
        String::new(),
        "This document provides a full, human-readable reference for the columns in `hero_data.csv` used by the MLBB Draft Assistant. All hero IDs are replaced with their actual names for clarity.".to_string(),
        String::new(),
        "---".to_string(),
        String::new(),
    ];

    for relation in Relation::ALL {
        let (title, description) = section_title(relation);
        let prefix = relation.column_prefix();

        let mut builder = Builder::default();
        let mut header = vec!["main_hero".to_string()];
        header.extend((1..=5).map(|slot| format!("{}{}", prefix, slot)));
        builder.push_record(header);

        for row in rows {
            let mut record = vec![cell_label(row.main_heroid)];
            record.extend(row.related(relation).iter().map(|cell| cell_label(*cell)));
            builder.push_record(record);
        }

        let mut table = builder.build();
        table.with(Style::markdown());

        out.push(format!("## {}", title));
        out.push(String::new());
        out.push(description.to_string());
        out.push(String::new());
        out.push(table.to_string());
        out.push(String::new());
    }

    out.push("For the full list of hero names and their IDs, run `hero_draft --list-heroes`.".to_string());
    out.join("\n")
}

pub fn display_roster() {
    #[derive(Tabled)]
    struct RosterRow {
        id: HeroId,
        name: String,
    }

    let rows: Vec<RosterRow> = roster::all_ids()
        .map(|id| RosterRow {
            id,
            name: roster::id_to_name(id),
        })
        .collect();

    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{}", table);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hero_names() {
        assert_eq!(hero_names(&[]), "-");
        assert_eq!(hero_names(&[1, 61]), "Miya, Chang'e");
    }

    #[test]
    fn test_cell_label() {
        assert_eq!(cell_label(None), "");
        assert_eq!(cell_label(Some(5)), "Nana");
        assert_eq!(cell_label(Some(300)), "300");
        assert_eq!(cell_label(Some(-1)), "-1");
    }

    #[test]
    fn test_draft_table_has_all_sections_with_names() {
        let row = HeroRow {
            main_heroid: Some(1),
            counter: [Some(2), None, None, None, None],
            countered: [Some(3), None, None, None, None],
            best: [Some(4), Some(5), None, None, None],
            worst: [Some(6), None, None, None, None],
        };
        let md = render_draft_table_markdown(&[row]);

        for title in ["## A. Counter", "## B. Countered", "## C. Best (Synergy)", "## D. Worst (Synergy)"] {
            assert!(md.contains(title), "missing {}", title);
        }
        assert!(md.contains("main_hero"));
        assert!(md.contains("best5"));
        assert!(md.contains("Miya"));
        assert!(md.contains("Balmond"));
        assert!(md.contains("Alice"));
        assert!(md.contains("Nana"));
        assert!(md.contains("Tigreal"));
    }
}
