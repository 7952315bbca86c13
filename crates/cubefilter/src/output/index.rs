//! Card index output formatting.

use std::collections::BTreeSet;

use cube_filter::card_index::InMemoryCardIndex;
use owo_colors::OwoColorize;
use serde::Serialize;

/// JSON output structure for a single card.
#[derive(Serialize)]
pub struct CardOutput<'a> {
    pub card: &'a str,
    pub cubes: &'a BTreeSet<String>,
}

/// Formats the whole index as JSON.
pub fn format_index_json(index: &InMemoryCardIndex) -> Result<String, serde_json::Error> {
    let cards: Vec<CardOutput> = index
        .iter()
        .map(|(card, cubes)| CardOutput { card, cubes })
        .collect();
    serde_json::to_string_pretty(&serde_json::json!({ "cards": cards }))
}

/// Formats the whole index as a table of cards and cube counts.
pub fn format_index_table(index: &InMemoryCardIndex, use_colors: bool) -> String {
    if index.is_empty() {
        return "No cards indexed.\n".to_string();
    }

    let mut output = String::new();

    let header = format!("{:<30} {}", "Card", "Cubes");
    if use_colors {
        output.push_str(&format!("{}\n", header.dimmed()));
    } else {
        output.push_str(&header);
        output.push('\n');
    }

    for (card, cubes) in index.iter() {
        output.push_str(&format!("{:<30} {}\n", card, cubes.len()));
    }

    output
}

/// Formats one card's cubes as JSON.
pub fn format_card_json(card: &str, cubes: &BTreeSet<String>) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&CardOutput { card, cubes })
}

/// Formats one card's cubes for a terminal.
pub fn format_card_table(card: &str, cubes: &BTreeSet<String>, use_colors: bool) -> String {
    let mut output = if use_colors {
        format!("{}\n", card.bold())
    } else {
        format!("{}\n", card)
    };

    if cubes.is_empty() {
        output.push_str("  (not in any cube)\n");
    }
    for cube in cubes {
        output.push_str(&format!("  {}\n", cube));
    }

    output
}
