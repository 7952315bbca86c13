//! The table of filterable fields.

use super::lexer::Operator;

/// How a field's value is compiled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    /// Case-insensitive substring match on a text field.
    String,
    /// Integer comparison.
    Number,
    /// Category name, expanded by the category resolver.
    CategoryCompound,
    /// Card name, resolved to cube ids through the card index.
    Lookup,
}

impl FieldKind {
    /// Returns a short human-readable name for the kind.
    pub fn as_str(self) -> &'static str {
        match self {
            FieldKind::String => "string",
            FieldKind::Number => "number",
            FieldKind::CategoryCompound => "category",
            FieldKind::Lookup => "card lookup",
        }
    }
}

/// Static description of a filterable field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    /// The name used in filter clauses.
    pub name: &'static str,
    /// How the value is compiled.
    pub kind: FieldKind,
    /// The catalog fields the compiled predicate targets.
    pub output_fields: &'static [&'static str],
    /// Operators accepted for this field.
    pub operators: &'static [Operator],
    /// The name recorded in `fields_used`. Unused for category fields,
    /// whose usage comes from the category resolver.
    pub usage_field: &'static str,
    /// One-line description for help output.
    pub description: &'static str,
}

impl FieldSpec {
    /// Returns true if `operator` may be used with this field.
    pub fn supports(&self, operator: Operator) -> bool {
        self.operators.contains(&operator)
    }

    /// Returns the first output field, the target of simple comparisons.
    pub fn primary_output(&self) -> &'static str {
        self.output_fields.first().copied().unwrap_or(self.name)
    }
}

const EQ_ONLY: &[Operator] = &[Operator::Eq];
const NUMERIC: &[Operator] = &[Operator::Eq, Operator::Gt, Operator::Lt];

static FIELD_SPECS: &[FieldSpec] = &[
    FieldSpec {
        name: "owner",
        kind: FieldKind::String,
        output_fields: &["owner_name"],
        operators: EQ_ONLY,
        usage_field: "owner_name",
        description: "Owner name contains the value",
    },
    FieldSpec {
        name: "name",
        kind: FieldKind::String,
        output_fields: &["name"],
        operators: EQ_ONLY,
        usage_field: "name",
        description: "Cube name contains the value",
    },
    FieldSpec {
        name: "decks",
        kind: FieldKind::Number,
        output_fields: &["numDecks"],
        operators: NUMERIC,
        usage_field: "numDecks",
        description: "Number of decks built from the cube",
    },
    FieldSpec {
        name: "cards",
        kind: FieldKind::Number,
        output_fields: &["card_count"],
        operators: NUMERIC,
        usage_field: "card_count",
        description: "Number of cards in the cube",
    },
    FieldSpec {
        name: "category",
        kind: FieldKind::CategoryCompound,
        output_fields: &["categoryPrefixes", "categoryOverride", "type"],
        operators: EQ_ONLY,
        usage_field: "category",
        description: "Cube category (override or prefix category)",
    },
    FieldSpec {
        name: "card",
        kind: FieldKind::Lookup,
        output_fields: &["_id"],
        operators: EQ_ONLY,
        usage_field: "card",
        description: "Cube contains the named card",
    },
];

/// Looks up a field by name, ignoring ASCII case.
pub fn lookup(name: &str) -> Option<&'static FieldSpec> {
    FIELD_SPECS
        .iter()
        .find(|spec| spec.name.eq_ignore_ascii_case(name))
}

/// Returns every field in table order.
pub fn all() -> &'static [FieldSpec] {
    FIELD_SPECS
}
