//! "Did you mean" suggestions for misspelled field and category names.

use strsim::levenshtein;

use super::category::{OVERRIDE_CATEGORIES, PREFIX_CATEGORIES};
use super::field_spec;

/// Largest edit distance still offered as a suggestion.
const MAX_SUGGESTION_DISTANCE: usize = 3;

/// Closest field in the field table to a misspelled field name.
pub(crate) fn suggest_field(field: &str) -> Option<String> {
    closest(field, field_spec::all().iter().map(|spec| spec.name))
}

/// Closest override or prefix category to an unrecognized category.
pub(crate) fn suggest_category(value: &str) -> Option<String> {
    closest(
        value,
        OVERRIDE_CATEGORIES.iter().chain(PREFIX_CATEGORIES).copied(),
    )
}

/// Case-insensitive nearest name; ties go to the earlier table entry.
fn closest<'a>(typed: &str, known: impl Iterator<Item = &'a str>) -> Option<String> {
    let typed = typed.to_lowercase();
    known
        .map(|name| (levenshtein(&typed, &name.to_lowercase()), name))
        .filter(|&(distance, _)| distance > 0 && distance <= MAX_SUGGESTION_DISTANCE)
        .min_by_key(|&(distance, _)| distance)
        .map(|(_, name)| name.to_string())
}
