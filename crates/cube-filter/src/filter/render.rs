//! Rendering of predicate trees into a Mongo-style query document.

use serde_json::{json, Map, Value as Json};

use super::ast::{CompareOp, Comparison, Predicate, Value};

impl Predicate {
    /// Renders the predicate using the Mongo operator vocabulary.
    ///
    /// | predicate | document |
    /// |---|---|
    /// | case-insensitive `Eq` | `{field: {"$regex": escape(v), "$options": "i"}}` |
    /// | `Eq` | `{field: v}` |
    /// | `Gt` / `Lt` | `{field: {"$gt": v}}` / `{field: {"$lt": v}}` |
    /// | `In` | `{field: {"$in": [...]}}` |
    /// | `And` / `Or` | `{"$and": [...]}` / `{"$or": [...]}` |
    ///
    /// Regex metacharacters in a substring match are escaped, so `Legacy+`
    /// matches the literal text and never plain `Legacy`.
    ///
    /// # Example
    ///
    /// ```
    /// use cube_filter::filter::{Comparison, Predicate};
    /// use serde_json::json;
    ///
    /// let p = Predicate::from(Comparison::greater_than("numDecks", 5));
    /// assert_eq!(p.to_mongo(), json!({ "numDecks": { "$gt": 5 } }));
    /// ```
    pub fn to_mongo(&self) -> Json {
        match self {
            Predicate::Comparison(c) => comparison_to_mongo(c),
            Predicate::And(children) => {
                json!({ "$and": children.iter().map(Predicate::to_mongo).collect::<Vec<_>>() })
            }
            Predicate::Or(children) => {
                json!({ "$or": children.iter().map(Predicate::to_mongo).collect::<Vec<_>>() })
            }
        }
    }
}

fn comparison_to_mongo(c: &Comparison) -> Json {
    let condition = match (c.op, &c.value) {
        (CompareOp::Eq, Value::Str(s)) if c.case_insensitive => {
            json!({ "$regex": regex::escape(s), "$options": "i" })
        }
        (CompareOp::Eq, value) => value_to_json(value),
        (CompareOp::Gt, value) => json!({ "$gt": value_to_json(value) }),
        (CompareOp::Lt, value) => json!({ "$lt": value_to_json(value) }),
        (CompareOp::In, value) => json!({ "$in": value_to_json(value) }),
    };

    let mut doc = Map::new();
    doc.insert(c.field.clone(), condition);
    Json::Object(doc)
}

fn value_to_json(value: &Value) -> Json {
    match value {
        Value::Str(s) => Json::String(s.clone()),
        Value::Int(n) => Json::from(*n),
        Value::Bool(b) => Json::Bool(*b),
        Value::Set(items) => Json::Array(items.iter().cloned().map(Json::String).collect()),
    }
}
