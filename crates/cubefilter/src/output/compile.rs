//! Compiled filter output formatting.

use cube_filter::filter::{CompiledFilter, FilterResponse};
use owo_colors::OwoColorize;

/// Formats a compilation result as `{ "err": ..., "filter": ... }` JSON.
pub fn format_response_json(response: &FilterResponse) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(response)
}

/// Formats a compiled filter for reading in a terminal.
pub fn format_compiled_table(
    filter: &CompiledFilter,
    use_colors: bool,
) -> Result<String, serde_json::Error> {
    let mut output = String::new();

    let heading = |text: &str| {
        if use_colors {
            text.green().bold().to_string()
        } else {
            text.to_string()
        }
    };

    output.push_str(&heading("Query"));
    output.push('\n');
    output.push_str(&serde_json::to_string_pretty(&filter.query.to_mongo())?);
    output.push_str("\n\n");

    output.push_str(&heading("Fields used"));
    output.push('\n');
    for field in &filter.fields_used {
        if use_colors {
            output.push_str(&format!("  {}\n", field.cyan()));
        } else {
            output.push_str(&format!("  {}\n", field));
        }
    }

    Ok(output)
}
