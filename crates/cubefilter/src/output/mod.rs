//! Output formatting utilities for the cubefilter CLI.
//!
//! - [`compile`] - compiled filter output
//! - [`fields`] - field table and category listings
//! - [`index`] - card index listings

mod compile;
mod fields;
mod index;

pub use compile::{format_compiled_table, format_response_json};
pub use fields::{
    format_categories_json, format_categories_table, format_fields_json, format_fields_table,
};
pub use index::{format_card_json, format_card_table, format_index_json, format_index_table};
