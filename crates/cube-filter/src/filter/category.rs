//! Category classification and expansion.
//!
//! A cube stores its category in one of two places depending on its
//! `overrideCategory` flag: curated categories live in `categoryOverride` or
//! `categoryPrefixes`, older cubes only carry the legacy `type` field. A
//! category clause therefore expands into an OR over both representations.

use std::collections::BTreeSet;

use super::ast::{Comparison, Predicate, Value};
use super::error::{FilterError, FilterResult};
use super::suggest::suggest_category;

/// Flag selecting which representation a cube uses.
pub const OVERRIDE_FLAG_FIELD: &str = "overrideCategory";

/// Legacy category field used when the override flag is unset.
pub const LEGACY_TYPE_FIELD: &str = "type";

/// Categories stored in `categoryOverride`.
pub const OVERRIDE_CATEGORIES: &[&str] = &[
    "Vintage", "Legacy+", "Legacy", "Modern", "Pioneer", "Historic", "Standard", "Set",
];

/// Categories stored in `categoryPrefixes`.
pub const PREFIX_CATEGORIES: &[&str] = &[
    "Powered",
    "Unpowered",
    "Pauper",
    "Peasant",
    "Budget",
    "Silver-bordered",
    "Commander",
    "Battle Box",
    "Multiplayer",
    "Judge Tower",
];

/// Which enumerated set a category belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CategoryClass {
    /// One of [`OVERRIDE_CATEGORIES`].
    Override,
    /// One of [`PREFIX_CATEGORIES`].
    Prefix,
}

impl CategoryClass {
    /// The field holding categories of this class on overridden cubes.
    pub fn field(self) -> &'static str {
        match self {
            CategoryClass::Override => "categoryOverride",
            CategoryClass::Prefix => "categoryPrefixes",
        }
    }
}

/// Classifies a category name, ignoring case.
///
/// # Example
///
/// ```
/// use cube_filter::filter::{classify_category, CategoryClass};
///
/// assert_eq!(classify_category("Commander"), Some(CategoryClass::Prefix));
/// assert_eq!(classify_category("legacy"), Some(CategoryClass::Override));
/// assert_eq!(classify_category("Cube"), None);
/// ```
pub fn classify_category(value: &str) -> Option<CategoryClass> {
    let is_in = |names: &[&str]| names.iter().any(|name| name.eq_ignore_ascii_case(value));

    if is_in(OVERRIDE_CATEGORIES) {
        Some(CategoryClass::Override)
    } else if is_in(PREFIX_CATEGORIES) {
        Some(CategoryClass::Prefix)
    } else {
        None
    }
}

/// Expands a category value into its two-branch predicate.
///
/// Returns the predicate together with the catalog fields it uses: the
/// class field, `type` and `overrideCategory`. The value is matched as
/// written in both branches.
///
/// # Errors
///
/// Returns `FilterError::UnknownCategory` if the value is in neither set.
pub fn resolve_category(value: &str) -> FilterResult<(Predicate, BTreeSet<String>)> {
    let class = classify_category(value)
        .ok_or_else(|| FilterError::unknown_category(value, suggest_category(value)))?;
    log::debug!("category '{}' classified as {:?}", value, class);

    let overridden = Predicate::and(
        Comparison::equals(OVERRIDE_FLAG_FIELD, Value::Bool(true)).into(),
        Comparison::matches(class.field(), value).into(),
    );
    let legacy = Predicate::and(
        Comparison::equals(OVERRIDE_FLAG_FIELD, Value::Bool(false)).into(),
        Comparison::matches(LEGACY_TYPE_FIELD, value).into(),
    );
    let predicate = Predicate::or(overridden, legacy);

    let fields_used = predicate
        .referenced_fields()
        .into_iter()
        .map(str::to_string)
        .collect();
    Ok((predicate, fields_used))
}
