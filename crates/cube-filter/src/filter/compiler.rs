//! Filter compiler: clause text to predicate tree.

use std::collections::BTreeSet;

use serde::ser::{Serialize, SerializeStruct, Serializer};

use super::ast::{Comparison, Predicate, Value};
use super::category::resolve_category;
use super::error::{FilterError, FilterResult};
use super::field_spec::{self, FieldKind, FieldSpec};
use super::lexer::{tokenize, Operator, ParsedClause};
use super::suggest::suggest_field;
use crate::card_index::CardIndex;

/// A successfully compiled filter clause.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledFilter {
    /// The predicate to run against the catalog.
    pub query: Predicate,
    /// Every catalog field the clause refers to, for highlighting active
    /// filters. Static per clause, independent of the data queried.
    pub fields_used: BTreeSet<String>,
}

impl Serialize for CompiledFilter {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("CompiledFilter", 2)?;
        state.serialize_field("query", &self.query.to_mongo())?;
        state.serialize_field("fieldsUsed", &self.fields_used)?;
        state.end()
    }
}

/// Serializable `{ err, filter }` view of a compilation result.
///
/// Exactly one of `err` and `filter` is set.
///
/// # Example
///
/// ```
/// use cube_filter::filter::{CompiledFilter, FilterError, FilterResponse, FilterResult};
///
/// let result: FilterResult<CompiledFilter> = Err(FilterError::EmptyExpression);
/// let response = FilterResponse::from(result);
/// let json = serde_json::to_value(&response).unwrap();
/// assert!(json["filter"].is_null());
/// assert_eq!(json["err"]["code"], "PARSE_ERROR");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterResponse {
    /// The error, if compilation failed.
    pub err: Option<FilterError>,
    /// The compiled filter, if compilation succeeded.
    pub filter: Option<CompiledFilter>,
}

impl From<FilterResult<CompiledFilter>> for FilterResponse {
    fn from(result: FilterResult<CompiledFilter>) -> Self {
        match result {
            Ok(filter) => Self {
                err: None,
                filter: Some(filter),
            },
            Err(err) => Self {
                err: Some(err),
                filter: None,
            },
        }
    }
}

impl Serialize for FilterResponse {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let err = self.err.as_ref().map(|e| {
            serde_json::json!({
                "code": e.code(),
                "message": e.to_string(),
            })
        });
        let mut state = serializer.serialize_struct("FilterResponse", 2)?;
        state.serialize_field("err", &err)?;
        state.serialize_field("filter", &self.filter)?;
        state.end()
    }
}

/// Compiles a single filter clause.
///
/// The only suspension point is the card index lookup for `card:` clauses;
/// every other step is pure. The first failure is returned and nothing is
/// partially built.
///
/// # Errors
///
/// - `FilterError::EmptyExpression` / `FilterError::Parse` for malformed clauses.
/// - `FilterError::UnknownField` if the field is not in the field table.
/// - `FilterError::UnsupportedOperator` if the field does not accept the operator.
/// - `FilterError::InvalidValue` if a numeric value is not an integer.
/// - `FilterError::UnknownCategory` if a category value is not recognized.
/// - `FilterError::CardLookup` if the card index itself fails. A card that
///   is not indexed is not an error.
///
/// # Example
///
/// ```
/// use cube_filter::card_index::InMemoryCardIndex;
/// use cube_filter::filter::make_filter;
/// use serde_json::json;
///
/// # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
/// let cards = InMemoryCardIndex::new();
/// let filter = make_filter("decks>5", &cards).await.unwrap();
///
/// assert_eq!(filter.query.to_mongo(), json!({ "numDecks": { "$gt": 5 } }));
/// assert!(filter.fields_used.contains("numDecks"));
/// # });
/// ```
pub async fn make_filter<C>(clause: &str, card_index: &C) -> FilterResult<CompiledFilter>
where
    C: CardIndex,
{
    log::debug!("compiling filter clause {:?}", clause);

    let parsed = tokenize(clause)?;
    let spec = resolve_field(&parsed)?;
    log::debug!(
        "field '{}' resolved to {} field",
        spec.name,
        spec.kind.as_str()
    );

    let compiled = match spec.kind {
        FieldKind::String => compile_string(spec, &parsed),
        FieldKind::Number => compile_number(spec, &parsed)?,
        FieldKind::CategoryCompound => {
            let (query, fields_used) = resolve_category(&parsed.raw_value)?;
            CompiledFilter { query, fields_used }
        }
        FieldKind::Lookup => compile_card_lookup(spec, &parsed, card_index).await?,
    };

    Ok(compiled)
}

/// Finds the field spec for a clause and checks its operator.
fn resolve_field(parsed: &ParsedClause) -> FilterResult<&'static FieldSpec> {
    let spec = field_spec::lookup(&parsed.field).ok_or_else(|| {
        FilterError::unknown_field(&parsed.field, suggest_field(&parsed.field))
    })?;

    if !spec.supports(parsed.operator) {
        return Err(FilterError::unsupported_operator(
            spec.name,
            parsed.operator.to_string(),
        ));
    }

    Ok(spec)
}

fn single_use(spec: &FieldSpec) -> BTreeSet<String> {
    BTreeSet::from([spec.usage_field.to_string()])
}

fn compile_string(spec: &FieldSpec, parsed: &ParsedClause) -> CompiledFilter {
    CompiledFilter {
        query: Comparison::matches(spec.primary_output(), parsed.raw_value.as_str()).into(),
        fields_used: single_use(spec),
    }
}

fn compile_number(spec: &FieldSpec, parsed: &ParsedClause) -> FilterResult<CompiledFilter> {
    let value: i64 = parsed
        .raw_value
        .parse()
        .map_err(|_| FilterError::invalid_value(spec.name, &parsed.raw_value, "an integer"))?;

    let field = spec.primary_output();
    let comparison = match parsed.operator {
        Operator::Eq => Comparison::equals(field, Value::Int(value)),
        Operator::Gt => Comparison::greater_than(field, value),
        Operator::Lt => Comparison::less_than(field, value),
    };

    Ok(CompiledFilter {
        query: comparison.into(),
        fields_used: single_use(spec),
    })
}

async fn compile_card_lookup<C>(
    spec: &FieldSpec,
    parsed: &ParsedClause,
    card_index: &C,
) -> FilterResult<CompiledFilter>
where
    C: CardIndex,
{
    let card_name = parsed.raw_value.as_str();
    let cube_ids = card_index
        .find_cubes_containing_card(card_name)
        .await
        .map_err(|e| FilterError::card_lookup(card_name, e.to_string()))?;
    log::debug!(
        "card '{}' found in {} cubes",
        card_name,
        cube_ids.len()
    );

    Ok(CompiledFilter {
        query: Comparison::member_of(spec.primary_output(), cube_ids).into(),
        fields_used: single_use(spec),
    })
}
