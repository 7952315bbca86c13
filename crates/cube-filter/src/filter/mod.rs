//! Filter compiler for the cube catalog filter language.
//!
//! A filter is a single clause `field<op>value` that compiles into a
//! backend-agnostic [`Predicate`] plus the set of catalog fields it uses.
//!
//! # Supported Syntax
//!
//! ## Text fields (`:` only, case-insensitive substring match)
//! - `owner:dekkerglen` - Owner name contains "dekkerglen"
//! - `name:"Vintage Cube"` - Cube name contains "Vintage Cube"
//!
//! ## Numeric fields (`:`, `>`, `<`)
//! - `decks>5` - More than 5 decks built
//! - `cards<180` - Fewer than 180 cards
//! - `cards:360` - Exactly 360 cards
//!
//! ## Category
//! - `category:Commander` - Prefix category
//! - `category:Legacy` - Override category
//!
//! ## Card
//! - `card:murder` - Cubes containing the card, resolved through a [`CardIndex`]
//!
//! Field names are case-insensitive. Values containing spaces must be quoted.
//!
//! # Example
//!
//! ```
//! use cube_filter::card_index::InMemoryCardIndex;
//! use cube_filter::filter::make_filter;
//! use serde_json::json;
//!
//! # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
//! let cards = InMemoryCardIndex::new().with_card("Murder", ["123", "456"]);
//!
//! let filter = make_filter("card:murder", &cards).await.unwrap();
//! assert_eq!(
//!     filter.query.to_mongo(),
//!     json!({ "_id": { "$in": ["123", "456"] } })
//! );
//! # });
//! ```
//!
//! [`CardIndex`]: crate::card_index::CardIndex

mod ast;
mod category;
mod compiler;
mod error;
mod field_spec;
mod lexer;
mod render;
mod suggest;

pub use ast::{CompareOp, Comparison, Predicate, Value};
pub use category::{
    classify_category, resolve_category, CategoryClass, LEGACY_TYPE_FIELD, OVERRIDE_CATEGORIES,
    OVERRIDE_FLAG_FIELD, PREFIX_CATEGORIES,
};
pub use compiler::{make_filter, CompiledFilter, FilterResponse};
pub use error::{FilterError, FilterResult};
pub use field_spec::{all as all_fields, lookup as lookup_field, FieldKind, FieldSpec};
pub use lexer::{tokenize, Lexer, Operator, ParsedClause};

#[cfg(test)]
mod tests;
