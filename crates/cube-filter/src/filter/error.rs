//! Error types for the filter compiler.

use thiserror::Error;

/// A specialized Result type for filter compilation.
pub type FilterResult<T> = Result<T, FilterError>;

/// Errors that can occur while compiling a filter clause.
///
/// Every variant is plain data so a failed compilation can be compared,
/// cloned and serialized like a successful one.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FilterError {
    /// The filter expression is empty.
    #[error("filter expression is empty")]
    EmptyExpression,

    /// The clause does not have the `field<op>value` shape.
    #[error("malformed filter at position {position}: {message}")]
    Parse {
        /// What was wrong with the clause.
        message: String,
        /// Byte offset into the trimmed clause where the problem was found.
        position: usize,
    },

    /// The field name is not in the field table.
    #[error("unknown filter field '{field}'{}", did_you_mean(.suggestion))]
    UnknownField {
        /// The unrecognized field name.
        field: String,
        /// The closest known field name, if any is close enough.
        suggestion: Option<String>,
    },

    /// The operator is not allowed for the field.
    #[error("operator '{operator}' is not supported for field '{field}'")]
    UnsupportedOperator {
        /// The field the operator was applied to.
        field: String,
        /// The operator symbol as written.
        operator: String,
    },

    /// The value could not be coerced to the field's value type.
    #[error("invalid value '{value}' for field '{field}' (expected {expected})")]
    InvalidValue {
        /// The field being compiled.
        field: String,
        /// The raw value.
        value: String,
        /// A description of the expected value type.
        expected: String,
    },

    /// The category is neither an override nor a prefix category.
    #[error("unknown category '{value}'{}", did_you_mean(.suggestion))]
    UnknownCategory {
        /// The category value as written.
        value: String,
        /// The closest known category name, if any is close enough.
        suggestion: Option<String>,
    },

    /// The card index failed (not a miss, a real failure).
    #[error("card lookup for '{card}' failed: {message}")]
    CardLookup {
        /// The card name being looked up.
        card: String,
        /// The underlying error message.
        message: String,
    },
}

fn did_you_mean(suggestion: &Option<String>) -> String {
    match suggestion {
        Some(s) => format!(". Did you mean '{}'?", s),
        None => String::new(),
    }
}

impl FilterError {
    /// Creates a parse error.
    pub fn parse(message: impl Into<String>, position: usize) -> Self {
        FilterError::Parse {
            message: message.into(),
            position,
        }
    }

    /// Creates an unknown field error.
    pub fn unknown_field(field: impl Into<String>, suggestion: Option<String>) -> Self {
        FilterError::UnknownField {
            field: field.into(),
            suggestion,
        }
    }

    /// Creates an unsupported operator error.
    pub fn unsupported_operator(field: impl Into<String>, operator: impl Into<String>) -> Self {
        FilterError::UnsupportedOperator {
            field: field.into(),
            operator: operator.into(),
        }
    }

    /// Creates an invalid value error.
    pub fn invalid_value(
        field: impl Into<String>,
        value: impl Into<String>,
        expected: impl Into<String>,
    ) -> Self {
        FilterError::InvalidValue {
            field: field.into(),
            value: value.into(),
            expected: expected.into(),
        }
    }

    /// Creates an unknown category error.
    pub fn unknown_category(value: impl Into<String>, suggestion: Option<String>) -> Self {
        FilterError::UnknownCategory {
            value: value.into(),
            suggestion,
        }
    }

    /// Creates a card lookup error.
    pub fn card_lookup(card: impl Into<String>, message: impl Into<String>) -> Self {
        FilterError::CardLookup {
            card: card.into(),
            message: message.into(),
        }
    }

    /// Returns a stable machine-readable code for this error.
    pub fn code(&self) -> &'static str {
        match self {
            FilterError::EmptyExpression | FilterError::Parse { .. } => "PARSE_ERROR",
            FilterError::UnknownField { .. } => "UNKNOWN_FIELD",
            FilterError::UnsupportedOperator { .. } => "UNSUPPORTED_OPERATOR",
            FilterError::InvalidValue { .. } => "INVALID_VALUE",
            FilterError::UnknownCategory { .. } => "UNKNOWN_CATEGORY",
            FilterError::CardLookup { .. } => "CARD_LOOKUP_ERROR",
        }
    }
}
