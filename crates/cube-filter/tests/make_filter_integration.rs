//! Integration tests for compiling filters through the public API.
//!
//! The expected documents are the Mongo queries the catalog backend runs.

use std::collections::BTreeSet;
use std::sync::Arc;

use cube_filter::card_index::{CardIndexStore, InMemoryCardIndex};
use cube_filter::filter::{make_filter, FilterError, FilterResponse};
use regex::RegexBuilder;
use serde_json::{json, Value};
use tempfile::TempDir;

const TEST_IDS: [&str; 3] = ["123", "456", "7890"];

fn card_index() -> InMemoryCardIndex {
    InMemoryCardIndex::new().with_card("murder", TEST_IDS)
}

async fn compile(clause: &str) -> Value {
    let response = FilterResponse::from(make_filter(clause, &card_index()).await);
    serde_json::to_value(&response).unwrap()
}

fn sorted_fields(response: &Value) -> Vec<String> {
    let mut fields: Vec<String> = response["filter"]["fieldsUsed"]
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f.as_str().unwrap().to_string())
        .collect();
    fields.sort();
    fields
}

#[tokio::test]
async fn test_owner_condition() {
    let response = compile("owner:dekkerglen").await;

    assert!(response["err"].is_null());
    assert_eq!(response["filter"]["fieldsUsed"], json!(["owner_name"]));
    assert_eq!(
        response["filter"]["query"],
        json!({ "owner_name": { "$regex": "dekkerglen", "$options": "i" } })
    );
}

#[tokio::test]
async fn test_name_condition() {
    let response = compile("name:dekkerglen").await;

    assert!(response["err"].is_null());
    assert_eq!(response["filter"]["fieldsUsed"], json!(["name"]));
    assert_eq!(
        response["filter"]["query"],
        json!({ "name": { "$regex": "dekkerglen", "$options": "i" } })
    );
}

#[tokio::test]
async fn test_num_decks_condition() {
    let response = compile("decks>5").await;

    assert!(response["err"].is_null());
    assert_eq!(response["filter"]["fieldsUsed"], json!(["numDecks"]));
    assert_eq!(response["filter"]["query"], json!({ "numDecks": { "$gt": 5 } }));
}

#[tokio::test]
async fn test_card_count_condition() {
    let response = compile("cards<180").await;

    assert!(response["err"].is_null());
    assert_eq!(response["filter"]["fieldsUsed"], json!(["card_count"]));
    assert_eq!(
        response["filter"]["query"],
        json!({ "card_count": { "$lt": 180 } })
    );
}

#[tokio::test]
async fn test_category_prefixes_condition() {
    let response = compile("category:Commander").await;

    assert!(response["err"].is_null());
    assert_eq!(
        sorted_fields(&response),
        vec!["categoryPrefixes", "overrideCategory", "type"]
    );
    assert_eq!(
        response["filter"]["query"],
        json!({
            "$or": [
                {
                    "$and": [
                        { "overrideCategory": true },
                        { "categoryPrefixes": { "$options": "i", "$regex": "Commander" } }
                    ]
                },
                {
                    "$and": [
                        { "overrideCategory": false },
                        { "type": { "$options": "i", "$regex": "Commander" } }
                    ]
                }
            ]
        })
    );
}

#[tokio::test]
async fn test_category_override_condition() {
    let response = compile("category:Legacy").await;

    assert!(response["err"].is_null());
    assert_eq!(
        sorted_fields(&response),
        vec!["categoryOverride", "overrideCategory", "type"]
    );
    assert_eq!(
        response["filter"]["query"],
        json!({
            "$or": [
                {
                    "$and": [
                        { "overrideCategory": true },
                        { "categoryOverride": { "$options": "i", "$regex": "Legacy" } }
                    ]
                },
                {
                    "$and": [
                        { "overrideCategory": false },
                        { "type": { "$options": "i", "$regex": "Legacy" } }
                    ]
                }
            ]
        })
    );
}

#[tokio::test]
async fn test_card_condition() {
    let response = compile("card:murder").await;

    assert!(response["err"].is_null());
    assert_eq!(response["filter"]["fieldsUsed"], json!(["card"]));
    assert_eq!(
        response["filter"]["query"],
        json!({ "_id": { "$in": TEST_IDS } })
    );
}

#[tokio::test]
async fn test_invalid_clauses_have_no_filter() {
    for clause in ["foo:bar", "owner>5", "decks>many", "category:Cube", "owner"] {
        let response = compile(clause).await;
        assert!(!response["err"].is_null(), "{clause} should fail");
        assert!(response["filter"].is_null(), "{clause} should have no filter");
    }
}

#[tokio::test]
async fn test_card_index_from_store() {
    let temp_dir = TempDir::new().unwrap();
    let store = CardIndexStore::with_path(temp_dir.path().join("card_index.json"));

    let mut index = InMemoryCardIndex::new();
    index.insert("Lightning Bolt", "5d2cb3f44153591614458e5d");
    index.insert("Lightning Bolt", "5e3c9a6b8b3f2a1d4c8e7f90");
    store.save_async(&index).await.unwrap();

    let loaded = store.load_or_default_async().await.unwrap();
    let filter = make_filter(r#"card:"lightning bolt""#, &loaded)
        .await
        .unwrap();
    assert_eq!(
        filter.query.to_mongo(),
        json!({
            "_id": { "$in": ["5d2cb3f44153591614458e5d", "5e3c9a6b8b3f2a1d4c8e7f90"] }
        })
    );
}

#[tokio::test]
async fn test_missing_store_compiles_empty_card_filter() {
    let temp_dir = TempDir::new().unwrap();
    let store = CardIndexStore::with_path(temp_dir.path().join("absent.json"));
    let index = store.load_or_default().unwrap();

    let filter = make_filter("card:murder", &index).await.unwrap();
    assert_eq!(filter.fields_used, BTreeSet::from(["card".to_string()]));
    assert_eq!(filter.query.to_mongo(), json!({ "_id": { "$in": [] } }));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_compilation_shares_index() {
    let index = Arc::new(card_index());

    let handles: Vec<_> = ["card:murder", "decks>5", "category:Modern", "nope:x"]
        .into_iter()
        .map(|clause| {
            let index = Arc::clone(&index);
            tokio::spawn(async move { make_filter(clause, index.as_ref()).await })
        })
        .collect();

    let mut results = Vec::new();
    for handle in handles {
        results.push(handle.await.unwrap());
    }

    assert!(results[0].is_ok());
    assert!(results[1].is_ok());
    assert!(results[2].is_ok());
    assert!(matches!(results[3], Err(FilterError::UnknownField { .. })));
}

/// Compiles the `$regex` of a substring match the way the catalog store does.
fn substring_pattern(condition: &Value) -> regex::Regex {
    assert_eq!(condition["$options"], "i");
    RegexBuilder::new(condition["$regex"].as_str().unwrap())
        .case_insensitive(true)
        .build()
        .unwrap()
}

#[tokio::test]
async fn test_substring_match_treats_value_literally() {
    let response = compile(r#"category:"Legacy+""#).await;
    let branches = response["filter"]["query"]["$or"].as_array().unwrap();
    let override_match = substring_pattern(&branches[0]["$and"][1]["categoryOverride"]);
    let legacy_match = substring_pattern(&branches[1]["$and"][1]["type"]);
    for pattern in [&override_match, &legacy_match] {
        assert!(pattern.is_match("Legacy+"));
        assert!(pattern.is_match("legacy+ cube"));
        assert!(!pattern.is_match("Legacy"));
    }

    let response = compile("owner:a.c").await;
    let owner = substring_pattern(&response["filter"]["query"]["owner_name"]);
    assert!(owner.is_match("xA.Cx"));
    assert!(!owner.is_match("abc"));

    let response = compile("owner:a(b").await;
    assert!(response["err"].is_null());
    let owner = substring_pattern(&response["filter"]["query"]["owner_name"]);
    assert!(owner.is_match("a(b"));
}
