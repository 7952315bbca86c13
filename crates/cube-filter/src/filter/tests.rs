//! Tests for the filter compiler.

use std::collections::BTreeSet;
use std::sync::atomic::{AtomicUsize, Ordering};

use serde_json::json;

use super::*;
use crate::card_index::{CardIndex, CardIndexError, InMemoryCardIndex};

fn test_index() -> InMemoryCardIndex {
    InMemoryCardIndex::new().with_card("Murder", ["123", "456", "7890"])
}

fn fields(names: &[&str]) -> BTreeSet<String> {
    names.iter().map(|s| s.to_string()).collect()
}

/// Card index that counts lookups and always misses.
#[derive(Default)]
struct CountingIndex {
    calls: AtomicUsize,
}

impl CardIndex for CountingIndex {
    async fn find_cubes_containing_card(
        &self,
        _card_name: &str,
    ) -> crate::card_index::Result<BTreeSet<String>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(BTreeSet::new())
    }
}

/// Card index whose backing store is unavailable.
struct BrokenIndex;

impl CardIndex for BrokenIndex {
    async fn find_cubes_containing_card(
        &self,
        _card_name: &str,
    ) -> crate::card_index::Result<BTreeSet<String>> {
        Err(CardIndexError::NoDataDir)
    }
}

// ==================== Tokenizer Tests ====================

#[test]
fn test_tokenize_each_operator() {
    let clause = tokenize("owner:dekkerglen").unwrap();
    assert_eq!(
        clause,
        ParsedClause {
            field: "owner".to_string(),
            operator: Operator::Eq,
            raw_value: "dekkerglen".to_string(),
        }
    );

    assert_eq!(tokenize("decks>5").unwrap().operator, Operator::Gt);
    assert_eq!(tokenize("cards<180").unwrap().operator, Operator::Lt);
}

#[test]
fn test_tokenize_trims_surrounding_whitespace() {
    let clause = tokenize("  decks>5\t\n").unwrap();
    assert_eq!(clause.field, "decks");
    assert_eq!(clause.raw_value, "5");
}

#[test]
fn test_tokenize_empty() {
    assert_eq!(tokenize(""), Err(FilterError::EmptyExpression));
    assert_eq!(tokenize("   "), Err(FilterError::EmptyExpression));
}

#[test]
fn test_tokenize_quoted_values() {
    assert_eq!(
        tokenize(r#"name:"Vintage Cube""#).unwrap().raw_value,
        "Vintage Cube"
    );
    assert_eq!(
        tokenize(r"name:'My \'Cube\''").unwrap().raw_value,
        "My 'Cube'"
    );
    assert_eq!(
        tokenize(r#"category:"Battle Box""#).unwrap().raw_value,
        "Battle Box"
    );
}

#[test]
fn test_tokenize_missing_operator() {
    assert_eq!(
        tokenize("owner"),
        Err(FilterError::parse("expected an operator after 'owner'", 5))
    );
}

#[test]
fn test_tokenize_missing_field() {
    assert_eq!(
        tokenize(":dekkerglen"),
        Err(FilterError::parse("missing field name before ':'", 0))
    );
    assert!(matches!(
        tokenize("@owner:x"),
        Err(FilterError::Parse { position: 0, .. })
    ));
}

#[test]
fn test_tokenize_missing_value() {
    assert_eq!(
        tokenize("owner:"),
        Err(FilterError::parse("missing value after 'owner:'", 6))
    );
    assert!(matches!(
        tokenize(r#"name:"""#),
        Err(FilterError::Parse { position: 5, .. })
    ));
}

#[test]
fn test_tokenize_unknown_operator() {
    assert_eq!(
        tokenize("owner=dekkerglen"),
        Err(FilterError::parse(
            "expected one of ':', '>', '<' after 'owner', found '='",
            5
        ))
    );
}

#[test]
fn test_tokenize_unterminated_quote() {
    assert_eq!(
        tokenize(r#"name:"Vintage"#),
        Err(FilterError::parse("unterminated \" quote", 5))
    );
}

#[test]
fn test_tokenize_text_after_quote() {
    assert!(matches!(
        tokenize(r#"name:"Vintage"Cube"#),
        Err(FilterError::Parse { position: 14, .. })
    ));
}

#[test]
fn test_tokenize_rejects_second_clause() {
    assert!(matches!(
        tokenize("owner:dekkerglen decks>5"),
        Err(FilterError::Parse { position: 16, .. })
    ));
}

// ==================== Field Table Tests ====================

#[test]
fn test_lookup_field_case_insensitive() {
    let spec = lookup_field("OWNER").unwrap();
    assert_eq!(spec.name, "owner");
    assert_eq!(spec.kind, FieldKind::String);
    assert_eq!(spec.output_fields, &["owner_name"]);
}

#[test]
fn test_lookup_unknown_field() {
    assert!(lookup_field("foo").is_none());
    assert!(lookup_field("").is_none());
}

#[test]
fn test_field_operators() {
    let owner = lookup_field("owner").unwrap();
    assert!(owner.supports(Operator::Eq));
    assert!(!owner.supports(Operator::Gt));

    let decks = lookup_field("decks").unwrap();
    assert!(decks.supports(Operator::Eq));
    assert!(decks.supports(Operator::Gt));
    assert!(decks.supports(Operator::Lt));
}

#[test]
fn test_field_table_names_are_unique() {
    let names: BTreeSet<&str> = all_fields().iter().map(|s| s.name).collect();
    assert_eq!(names.len(), all_fields().len());
}

// ==================== Category Tests ====================

#[test]
fn test_classify_category() {
    assert_eq!(classify_category("Commander"), Some(CategoryClass::Prefix));
    assert_eq!(classify_category("battle box"), Some(CategoryClass::Prefix));
    assert_eq!(classify_category("Legacy"), Some(CategoryClass::Override));
    assert_eq!(classify_category("LEGACY+"), Some(CategoryClass::Override));
    assert_eq!(classify_category("Cube"), None);
}

#[test]
fn test_category_sets_are_disjoint() {
    for name in OVERRIDE_CATEGORIES {
        assert!(
            !PREFIX_CATEGORIES
                .iter()
                .any(|p| p.eq_ignore_ascii_case(name)),
            "{name} is in both category sets"
        );
    }
}

#[test]
fn test_resolve_category_keeps_value_as_written() {
    let (predicate, used) = resolve_category("commander").unwrap();
    assert_eq!(
        predicate,
        Predicate::or(
            Predicate::and(
                Comparison::equals("overrideCategory", Value::Bool(true)).into(),
                Comparison::matches("categoryPrefixes", "commander").into(),
            ),
            Predicate::and(
                Comparison::equals("overrideCategory", Value::Bool(false)).into(),
                Comparison::matches("type", "commander").into(),
            ),
        )
    );
    assert_eq!(used, fields(&["categoryPrefixes", "type", "overrideCategory"]));
}

#[test]
fn test_resolve_unknown_category_suggests() {
    assert_eq!(
        resolve_category("Comander"),
        Err(FilterError::unknown_category(
            "Comander",
            Some("Commander".to_string())
        ))
    );
    assert_eq!(
        resolve_category("Cubes Of Old").unwrap_err().code(),
        "UNKNOWN_CATEGORY"
    );
}

// ==================== Rendering Tests ====================

#[test]
fn test_render_exact_equality() {
    let p = Predicate::from(Comparison::equals("card_count", Value::Int(360)));
    assert_eq!(p.to_mongo(), json!({ "card_count": 360 }));
}

#[test]
fn test_render_empty_set() {
    let p = Predicate::from(Comparison::member_of("_id", BTreeSet::new()));
    assert_eq!(p.to_mongo(), json!({ "_id": { "$in": [] } }));
}

#[test]
fn test_referenced_fields() {
    let p = Predicate::and(
        Comparison::greater_than("numDecks", 1).into(),
        Predicate::or(
            Comparison::matches("name", "a").into(),
            Comparison::less_than("numDecks", 9).into(),
        ),
    );
    let referenced: Vec<&str> = p.referenced_fields().into_iter().collect();
    assert_eq!(referenced, vec!["name", "numDecks"]);
}

// ==================== Compiler Tests ====================

#[tokio::test]
async fn test_make_filter_owner() {
    let filter = make_filter("owner:dekkerglen", &test_index()).await.unwrap();
    assert_eq!(filter.fields_used, fields(&["owner_name"]));
    assert_eq!(
        filter.query.to_mongo(),
        json!({ "owner_name": { "$regex": "dekkerglen", "$options": "i" } })
    );
}

#[tokio::test]
async fn test_make_filter_name() {
    let filter = make_filter("name:dekkerglen", &test_index()).await.unwrap();
    assert_eq!(filter.fields_used, fields(&["name"]));
    assert_eq!(
        filter.query.to_mongo(),
        json!({ "name": { "$regex": "dekkerglen", "$options": "i" } })
    );
}

#[tokio::test]
async fn test_make_filter_numeric_operators() {
    let index = test_index();

    let filter = make_filter("decks>5", &index).await.unwrap();
    assert_eq!(filter.fields_used, fields(&["numDecks"]));
    assert_eq!(filter.query.to_mongo(), json!({ "numDecks": { "$gt": 5 } }));

    let filter = make_filter("cards<180", &index).await.unwrap();
    assert_eq!(filter.fields_used, fields(&["card_count"]));
    assert_eq!(filter.query.to_mongo(), json!({ "card_count": { "$lt": 180 } }));

    let filter = make_filter("cards:360", &index).await.unwrap();
    assert_eq!(filter.query.to_mongo(), json!({ "card_count": 360 }));

    let filter = make_filter("decks>-1", &index).await.unwrap();
    assert_eq!(filter.query.to_mongo(), json!({ "numDecks": { "$gt": -1 } }));
}

#[tokio::test]
async fn test_make_filter_field_name_case_insensitive() {
    let filter = make_filter("Decks>5", &test_index()).await.unwrap();
    assert_eq!(filter.query.to_mongo(), json!({ "numDecks": { "$gt": 5 } }));
}

#[tokio::test]
async fn test_make_filter_quoted_name() {
    let filter = make_filter(r#"name:"Vintage Cube""#, &test_index())
        .await
        .unwrap();
    assert_eq!(
        filter.query.to_mongo(),
        json!({ "name": { "$regex": "Vintage Cube", "$options": "i" } })
    );
}

#[tokio::test]
async fn test_make_filter_override_category() {
    let filter = make_filter("category:Legacy", &test_index()).await.unwrap();
    assert_eq!(
        filter.fields_used,
        fields(&["categoryOverride", "type", "overrideCategory"])
    );
    assert_eq!(
        filter.query.to_mongo(),
        json!({
            "$or": [
                { "$and": [
                    { "overrideCategory": true },
                    { "categoryOverride": { "$regex": "Legacy", "$options": "i" } }
                ] },
                { "$and": [
                    { "overrideCategory": false },
                    { "type": { "$regex": "Legacy", "$options": "i" } }
                ] }
            ]
        })
    );
}

#[tokio::test]
async fn test_make_filter_category_with_regex_metacharacter() {
    let filter = make_filter(r#"category:"Legacy+""#, &test_index())
        .await
        .unwrap();
    assert_eq!(
        filter.fields_used,
        fields(&["categoryOverride", "type", "overrideCategory"])
    );
    assert_eq!(
        filter.query.to_mongo(),
        json!({
            "$or": [
                { "$and": [
                    { "overrideCategory": true },
                    { "categoryOverride": { "$regex": "Legacy\\+", "$options": "i" } }
                ] },
                { "$and": [
                    { "overrideCategory": false },
                    { "type": { "$regex": "Legacy\\+", "$options": "i" } }
                ] }
            ]
        })
    );
}

#[tokio::test]
async fn test_make_filter_owner_escapes_regex() {
    let index = test_index();

    let filter = make_filter("owner:a.c", &index).await.unwrap();
    assert_eq!(
        filter.query.to_mongo(),
        json!({ "owner_name": { "$regex": "a\\.c", "$options": "i" } })
    );

    let filter = make_filter("owner:a(b", &index).await.unwrap();
    assert_eq!(
        filter.query.to_mongo(),
        json!({ "owner_name": { "$regex": "a\\(b", "$options": "i" } })
    );
}

#[test]
fn test_predicate_keeps_value_as_typed() {
    let (predicate, _) = resolve_category("Legacy+").unwrap();
    let Predicate::Or(branches) = predicate else {
        panic!("expected an $or predicate");
    };
    let Predicate::And(parts) = &branches[0] else {
        panic!("expected an $and branch");
    };
    assert_eq!(
        parts[1],
        Predicate::from(Comparison::matches("categoryOverride", "Legacy+"))
    );
}

#[tokio::test]
async fn test_make_filter_card() {
    let filter = make_filter("card:murder", &test_index()).await.unwrap();
    assert_eq!(filter.fields_used, fields(&["card"]));
    assert_eq!(
        filter.query.to_mongo(),
        json!({ "_id": { "$in": ["123", "456", "7890"] } })
    );
}

#[tokio::test]
async fn test_make_filter_card_miss_is_not_an_error() {
    let filter = make_filter("card:\"Black Lotus\"", &test_index())
        .await
        .unwrap();
    assert_eq!(filter.fields_used, fields(&["card"]));
    assert_eq!(
        filter.query,
        Predicate::from(Comparison::member_of("_id", BTreeSet::new()))
    );
}

#[tokio::test]
async fn test_make_filter_card_index_failure() {
    assert_eq!(
        make_filter("card:murder", &BrokenIndex).await,
        Err(FilterError::card_lookup(
            "murder",
            "failed to determine data directory: no valid home directory found"
        ))
    );
}

#[tokio::test]
async fn test_make_filter_unknown_field() {
    let index = test_index();
    assert_eq!(
        make_filter("foo:bar", &index).await,
        Err(FilterError::unknown_field("foo", None))
    );
    assert_eq!(
        make_filter("ownr:bar", &index).await,
        Err(FilterError::unknown_field("ownr", Some("owner".to_string())))
    );
}

#[tokio::test]
async fn test_make_filter_unsupported_operator() {
    let index = test_index();
    assert_eq!(
        make_filter("owner>5", &index).await,
        Err(FilterError::unsupported_operator("owner", ">"))
    );
    assert_eq!(
        make_filter("category<Legacy", &index).await,
        Err(FilterError::unsupported_operator("category", "<"))
    );
    assert_eq!(
        make_filter("card>murder", &index).await,
        Err(FilterError::unsupported_operator("card", ">"))
    );
}

#[tokio::test]
async fn test_make_filter_invalid_number() {
    let index = test_index();
    assert_eq!(
        make_filter("decks>five", &index).await,
        Err(FilterError::invalid_value("decks", "five", "an integer"))
    );
    assert_eq!(
        make_filter("decks>=5", &index).await,
        Err(FilterError::invalid_value("decks", "=5", "an integer"))
    );
    assert!(matches!(
        make_filter("cards<99999999999999999999", &index).await,
        Err(FilterError::InvalidValue { .. })
    ));
    assert!(matches!(
        make_filter("cards<1.5", &index).await,
        Err(FilterError::InvalidValue { .. })
    ));
}

#[tokio::test]
async fn test_make_filter_unknown_category() {
    assert!(matches!(
        make_filter("category:Cube", &test_index()).await,
        Err(FilterError::UnknownCategory { .. })
    ));
}

#[tokio::test]
async fn test_make_filter_errors_short_circuit_before_lookup() {
    let index = CountingIndex::default();

    assert!(make_filter("card:", &index).await.is_err());
    assert!(make_filter("cardz:murder", &index).await.is_err());
    assert!(make_filter("card<murder", &index).await.is_err());
    assert!(make_filter("owner:murder", &index).await.is_ok());
    assert_eq!(index.calls.load(Ordering::SeqCst), 0);

    assert!(make_filter("card:murder", &index).await.is_ok());
    assert_eq!(index.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_make_filter_is_idempotent() {
    let index = test_index();
    for clause in [
        "owner:dekkerglen",
        "decks>5",
        "category:Commander",
        "card:murder",
        "foo:bar",
    ] {
        let first = make_filter(clause, &index).await;
        let second = make_filter(clause, &index).await;
        assert_eq!(first, second, "compiling {clause} twice differed");
    }
}

// ==================== Response Tests ====================

#[tokio::test]
async fn test_response_success_shape() {
    let response = FilterResponse::from(make_filter("decks>5", &test_index()).await);
    assert_eq!(
        serde_json::to_value(&response).unwrap(),
        json!({
            "err": null,
            "filter": {
                "query": { "numDecks": { "$gt": 5 } },
                "fieldsUsed": ["numDecks"]
            }
        })
    );
}

#[tokio::test]
async fn test_response_error_shape() {
    let response = FilterResponse::from(make_filter("owner>5", &test_index()).await);
    assert!(response.filter.is_none());
    assert_eq!(
        serde_json::to_value(&response).unwrap(),
        json!({
            "err": {
                "code": "UNSUPPORTED_OPERATOR",
                "message": "operator '>' is not supported for field 'owner'"
            },
            "filter": null
        })
    );
}

#[test]
fn test_error_display_with_suggestion() {
    let err = FilterError::unknown_field("ownr", Some("owner".to_string()));
    assert_eq!(
        err.to_string(),
        "unknown filter field 'ownr'. Did you mean 'owner'?"
    );
    let err = FilterError::unknown_field("foo", None);
    assert_eq!(err.to_string(), "unknown filter field 'foo'");
}
