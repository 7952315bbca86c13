//! Card index command implementations.
//!
//! These commands maintain the local card -> cubes index that `card:`
//! filters resolve against.

use std::collections::BTreeSet;

use cube_filter::card_index::{normalize_card_name, CardIndexStore};

use super::{CommandContext, CommandError, Result};
use crate::output::{format_card_json, format_card_table, format_index_json, format_index_table};

/// Options for the index add and remove commands.
pub struct IndexEditOptions {
    /// Card name as typed by the user.
    pub card: String,
    /// Cube IDs to add or remove.
    pub cube_ids: Vec<String>,
}

fn store(ctx: &CommandContext) -> Result<CardIndexStore> {
    let store = ctx.card_index_store()?;
    log::debug!("using card index {}", store.path().display());
    Ok(store)
}

/// Executes the index list command.
pub async fn execute_list(ctx: &CommandContext) -> Result<()> {
    let index = store(ctx)?.load_or_default_async().await?;

    if ctx.json_output {
        println!("{}", format_index_json(&index)?);
    } else if !ctx.quiet {
        print!("{}", format_index_table(&index, ctx.use_colors));
    }
    Ok(())
}

/// Executes the index show command.
///
/// A card missing from the index is not an error: it simply belongs to no cube.
pub async fn execute_show(ctx: &CommandContext, card: &str) -> Result<()> {
    let index = store(ctx)?.load_or_default_async().await?;
    let key = normalize_card_name(card);
    let empty = BTreeSet::new();
    let cubes = index.cubes_for(&key).unwrap_or(&empty);

    if ctx.json_output {
        println!("{}", format_card_json(&key, cubes)?);
    } else if !ctx.quiet {
        print!("{}", format_card_table(&key, cubes, ctx.use_colors));
    }
    Ok(())
}

/// Executes the index add command.
pub async fn execute_add(ctx: &CommandContext, opts: &IndexEditOptions) -> Result<()> {
    let store = store(ctx)?;
    let mut index = store.load_or_default_async().await?;

    let added = opts
        .cube_ids
        .iter()
        .filter(|cube_id| index.insert(&opts.card, cube_id.as_str()))
        .count();
    store.save_async(&index).await?;

    let key = normalize_card_name(&opts.card);
    if ctx.json_output {
        let output = serde_json::json!({
            "status": "success",
            "card": key,
            "added": added,
            "cubes": index.cubes_for(&key),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else if !ctx.quiet {
        println!("Added {} cube(s) to '{}'", added, key);
    }
    Ok(())
}

/// Executes the index remove command.
///
/// Without cube IDs the whole card entry is dropped.
pub async fn execute_remove(ctx: &CommandContext, opts: &IndexEditOptions) -> Result<()> {
    let store = store(ctx)?;
    let mut index = store.load_or_default_async().await?;
    let key = normalize_card_name(&opts.card);

    let removed = if opts.cube_ids.is_empty() {
        index.remove_card(&key).map(|cubes| cubes.len()).unwrap_or(0)
    } else {
        opts.cube_ids
            .iter()
            .filter(|cube_id| index.remove(&key, cube_id))
            .count()
    };

    if removed == 0 {
        return Err(CommandError::NotFound(format!(
            "card '{}' has no matching entries in the index",
            key
        )));
    }
    store.save_async(&index).await?;

    if ctx.json_output {
        let output = serde_json::json!({
            "status": "success",
            "card": key,
            "removed": removed,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else if !ctx.quiet {
        println!("Removed {} cube(s) from '{}'", removed, key);
    }
    Ok(())
}
