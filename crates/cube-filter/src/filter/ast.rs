//! Predicate tree produced by the filter compiler.

use std::collections::BTreeSet;

/// Comparison operator of a predicate leaf.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompareOp {
    /// Equality, or substring match when the comparison is case-insensitive.
    Eq,
    /// Greater than.
    Gt,
    /// Less than.
    Lt,
    /// Membership in a set.
    In,
}

/// A literal value in a comparison.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// A text value.
    Str(String),
    /// An integer value.
    Int(i64),
    /// A boolean flag.
    Bool(bool),
    /// A set of strings. An empty set matches nothing.
    Set(BTreeSet<String>),
}

/// A single field comparison, the only kind of leaf in a predicate tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comparison {
    /// The catalog field being compared.
    pub field: String,
    /// The comparison operator.
    pub op: CompareOp,
    /// The value compared against.
    pub value: Value,
    /// Whether a string equality is a case-insensitive substring match.
    pub case_insensitive: bool,
}

impl Comparison {
    /// Case-insensitive substring match of `field` against `value`.
    pub fn matches(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            op: CompareOp::Eq,
            value: Value::Str(value.into()),
            case_insensitive: true,
        }
    }

    /// Exact equality.
    pub fn equals(field: impl Into<String>, value: Value) -> Self {
        Self {
            field: field.into(),
            op: CompareOp::Eq,
            value,
            case_insensitive: false,
        }
    }

    /// Numeric greater-than.
    pub fn greater_than(field: impl Into<String>, value: i64) -> Self {
        Self {
            field: field.into(),
            op: CompareOp::Gt,
            value: Value::Int(value),
            case_insensitive: false,
        }
    }

    /// Numeric less-than.
    pub fn less_than(field: impl Into<String>, value: i64) -> Self {
        Self {
            field: field.into(),
            op: CompareOp::Lt,
            value: Value::Int(value),
            case_insensitive: false,
        }
    }

    /// Set membership.
    pub fn member_of(field: impl Into<String>, values: BTreeSet<String>) -> Self {
        Self {
            field: field.into(),
            op: CompareOp::In,
            value: Value::Set(values),
            case_insensitive: false,
        }
    }
}

/// A backend-agnostic boolean expression over catalog fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    /// A single field comparison.
    Comparison(Comparison),
    /// All children must match.
    And(Vec<Predicate>),
    /// At least one child must match.
    Or(Vec<Predicate>),
}

impl Predicate {
    /// Creates an AND of two predicates.
    ///
    /// # Example
    ///
    /// ```
    /// use cube_filter::filter::{Comparison, Predicate};
    ///
    /// let p = Predicate::and(
    ///     Comparison::greater_than("numDecks", 5).into(),
    ///     Comparison::less_than("card_count", 400).into(),
    /// );
    /// assert!(matches!(p, Predicate::And(ref children) if children.len() == 2));
    /// ```
    pub fn and(left: Predicate, right: Predicate) -> Self {
        Predicate::And(vec![left, right])
    }

    /// Creates an OR of two predicates.
    pub fn or(left: Predicate, right: Predicate) -> Self {
        Predicate::Or(vec![left, right])
    }

    /// Returns every catalog field compared anywhere in the tree.
    pub fn referenced_fields(&self) -> BTreeSet<&str> {
        let mut fields = BTreeSet::new();
        self.collect_fields(&mut fields);
        fields
    }

    fn collect_fields<'a>(&'a self, fields: &mut BTreeSet<&'a str>) {
        match self {
            Predicate::Comparison(c) => {
                fields.insert(c.field.as_str());
            }
            Predicate::And(children) | Predicate::Or(children) => {
                for child in children {
                    child.collect_fields(fields);
                }
            }
        }
    }
}

impl From<Comparison> for Predicate {
    fn from(comparison: Comparison) -> Self {
        Predicate::Comparison(comparison)
    }
}
