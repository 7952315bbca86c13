//! Field table and category output formatting.

use cube_filter::filter::{FieldSpec, Operator};
use owo_colors::OwoColorize;
use serde::Serialize;

/// JSON output structure for a field.
#[derive(Serialize)]
pub struct FieldOutput<'a> {
    pub name: &'a str,
    pub kind: &'a str,
    pub operators: String,
    pub output_fields: &'a [&'a str],
    pub description: &'a str,
}

/// JSON output structure for the categories command.
#[derive(Serialize)]
pub struct CategoriesOutput<'a> {
    #[serde(rename = "override")]
    pub override_categories: &'a [&'a str],
    #[serde(rename = "prefix")]
    pub prefix_categories: &'a [&'a str],
}

fn operator_list(operators: &[Operator]) -> String {
    operators.iter().map(|op| op.symbol()).collect()
}

/// Formats the field table as JSON.
pub fn format_fields_json(fields: &[FieldSpec]) -> Result<String, serde_json::Error> {
    let output: Vec<FieldOutput> = fields
        .iter()
        .map(|f| FieldOutput {
            name: f.name,
            kind: f.kind.as_str(),
            operators: operator_list(f.operators),
            output_fields: f.output_fields,
            description: f.description,
        })
        .collect();
    serde_json::to_string_pretty(&output)
}

/// Formats the field table for a terminal.
pub fn format_fields_table(fields: &[FieldSpec], use_colors: bool) -> String {
    let mut output = String::new();

    let header = format!("{:<10} {:<12} {:<4} {}", "Field", "Kind", "Ops", "Description");
    if use_colors {
        output.push_str(&format!("{}\n", header.dimmed()));
    } else {
        output.push_str(&header);
        output.push('\n');
    }

    for field in fields {
        let name = format!("{:<10}", field.name);
        let name = if use_colors {
            name.cyan().to_string()
        } else {
            name
        };
        output.push_str(&format!(
            "{} {:<12} {:<4} {}\n",
            name,
            field.kind.as_str(),
            operator_list(field.operators),
            field.description
        ));
    }

    output
}

/// Formats the category sets as JSON.
pub fn format_categories_json(
    override_categories: &[&str],
    prefix_categories: &[&str],
) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&CategoriesOutput {
        override_categories,
        prefix_categories,
    })
}

/// Formats the category sets for a terminal.
pub fn format_categories_table(
    override_categories: &[&str],
    prefix_categories: &[&str],
    use_colors: bool,
) -> String {
    let mut output = String::new();

    for (title, names) in [
        ("Override categories", override_categories),
        ("Prefix categories", prefix_categories),
    ] {
        if !output.is_empty() {
            output.push('\n');
        }
        if use_colors {
            output.push_str(&format!("{}\n", title.green().bold()));
        } else {
            output.push_str(&format!("{}\n", title));
        }
        for name in names {
            output.push_str(&format!("  {}\n", name));
        }
    }

    output
}
