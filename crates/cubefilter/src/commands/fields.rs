//! Fields and categories command implementations.

use cube_filter::filter::{all_fields, OVERRIDE_CATEGORIES, PREFIX_CATEGORIES};

use super::{CommandContext, Result};
use crate::output::{
    format_categories_json, format_categories_table, format_fields_json, format_fields_table,
};

/// Executes the fields command.
pub fn execute_fields(ctx: &CommandContext) -> Result<()> {
    if ctx.json_output {
        println!("{}", format_fields_json(all_fields())?);
    } else if !ctx.quiet {
        print!("{}", format_fields_table(all_fields(), ctx.use_colors));
    }
    Ok(())
}

/// Executes the categories command.
pub fn execute_categories(ctx: &CommandContext) -> Result<()> {
    if ctx.json_output {
        println!(
            "{}",
            format_categories_json(OVERRIDE_CATEGORIES, PREFIX_CATEGORIES)?
        );
    } else if !ctx.quiet {
        print!(
            "{}",
            format_categories_table(OVERRIDE_CATEGORIES, PREFIX_CATEGORIES, ctx.use_colors)
        );
    }
    Ok(())
}
