//! Compile command implementation.
//!
//! Compiles a single filter clause and prints the resulting query.

use cube_filter::filter::{make_filter, FilterResponse};

use super::{CommandContext, Result};
use crate::output::{format_compiled_table, format_response_json};

/// Executes the compile command.
///
/// In JSON mode the `{ "err", "filter" }` response is printed for failures
/// too, so scripts always get a document on stdout. The filter error is
/// still returned so the process exits non-zero.
pub async fn execute(ctx: &CommandContext, clause: &str) -> Result<()> {
    let store = ctx.card_index_store()?;
    log::debug!("using card index {}", store.path().display());

    let result = make_filter(clause, &store).await;
    let response = FilterResponse::from(result.clone());

    if ctx.json_output {
        println!("{}", format_response_json(&response)?);
    } else if let Ok(filter) = &result {
        if !ctx.quiet {
            print!("{}", format_compiled_table(filter, ctx.use_colors)?);
        }
    }

    result.map(|_| ()).map_err(Into::into)
}
