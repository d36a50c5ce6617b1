//! List query parameters
//!
//! A [`Query`] is an ordered set of query-string parameters (`filter`,
//! `maxResults`, `pageToken`, ...). List calls borrow it and never modify
//! it; continuation queries are fresh copies.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Query-string key carrying the continuation token
pub const PAGE_TOKEN: &str = "pageToken";

/// Query-string parameters for a list call
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Query(Map<String, Value>);

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn page_token(&self) -> Option<&str> {
        self.get(PAGE_TOKEN).and_then(|v| v.as_str())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    /// Copy of this query continuing at `token`
    pub fn continued(&self, token: &str) -> Self {
        let mut next = self.clone();
        next.insert(PAGE_TOKEN, token);
        next
    }

    /// Flatten into `key=value` pairs
    ///
    /// Arrays repeat the key once per element; null and nested objects are
    /// skipped since the API has no encoding for them.
    pub fn to_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        for (key, value) in &self.0 {
            match value {
                Value::Array(arr) => {
                    for item in arr {
                        if let Some(s) = primitive_to_string(item) {
                            pairs.push((key.clone(), s));
                        }
                    }
                }
                other => {
                    if let Some(s) = primitive_to_string(other) {
                        pairs.push((key.clone(), s));
                    }
                }
            }
        }
        pairs
    }

    /// Render as an encoded query string (without the leading `?`)
    pub fn to_query_string(&self) -> String {
        self.to_pairs()
            .iter()
            .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&")
    }
}

fn primitive_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

impl From<Map<String, Value>> for Query {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Query {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_continued_leaves_original_untouched() {
        let query = Query::new().with("maxResults", 5);
        let next = query.continued("token-2");

        assert_eq!(query.len(), 1);
        assert!(query.page_token().is_none());
        assert_eq!(next.page_token(), Some("token-2"));
        assert_eq!(next.get("maxResults"), Some(&json!(5)));
    }

    #[test]
    fn test_continued_overwrites_existing_token() {
        let query = Query::new().with(PAGE_TOKEN, "old");
        assert_eq!(query.continued("new").page_token(), Some("new"));
        assert_eq!(query.page_token(), Some("old"));
    }

    #[test]
    fn test_to_pairs_flattens_arrays() {
        let query = Query::new()
            .with("filter", "name eq web.*")
            .with("zone", json!(["a", "b"]))
            .with("nested", json!({"x": 1}))
            .with("flag", true);

        assert_eq!(
            query.to_pairs(),
            vec![
                ("filter".to_string(), "name eq web.*".to_string()),
                ("zone".to_string(), "a".to_string()),
                ("zone".to_string(), "b".to_string()),
                ("flag".to_string(), "true".to_string()),
            ]
        );
    }

    #[test]
    fn test_to_query_string_encodes() {
        let query = Query::new().with("filter", "name eq a b");
        assert_eq!(query.to_query_string(), "filter=name%20eq%20a%20b");
    }
}
