//! Filter compiler for a catalog of cubes.
//!
//! This crate parses single-clause filter expressions such as
//! `owner:dekkerglen`, `decks>5` or `category:Commander` into a predicate
//! tree that can be rendered into a store's native query syntax, and records
//! which catalog fields each clause uses.
//!
//! - [`filter`] - tokenizer, field table, category resolver and compiler
//! - [`card_index`] - the card-to-cubes lookup used by `card:` clauses, with
//!   an in-memory implementation and JSON file storage

pub mod card_index;
pub mod filter;

pub use card_index::{CardIndex, CardIndexError, CardIndexStore, InMemoryCardIndex};
pub use filter::{make_filter, CompiledFilter, FilterError, FilterResponse, FilterResult, Predicate};
