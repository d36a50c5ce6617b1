//! List response normalization
//!
//! List endpoints answer in one of two shapes. Flat collections return
//! `items` as an array of records. Aggregated collections return `items` as
//! a map keyed by location (`zones/us-central1-a`, `regions/us-east1`), each
//! value holding the records under a kind-specific field:
//!
//! ```json
//! { "items": { "zones/us-central1-a": { "disks": [ { "name": "d1" } ] },
//!              "zones/us-east1-b":    { "warning": { "code": "NO_RESULTS_ON_PAGE" } } },
//!   "nextPageToken": "..." }
//! ```
//!
//! Keys outside the expected location scope are skipped without error.

use super::operation::Operation;
use crate::error::{Error, Result};
use crate::query::Query;
use futures::stream::{self, Stream, TryStreamExt};
use serde_json::Value;
use std::future::Future;

/// One page of a list call
#[derive(Debug, Clone)]
pub struct ListPage<T> {
    pub items: Vec<T>,
    /// Query for the next page; `None` on the last page
    pub next_query: Option<Query>,
    /// Raw decoded response
    pub response: Value,
}

/// Result of a create call
#[derive(Debug, Clone)]
pub struct Created<T> {
    pub resource: T,
    /// Operation tracking the creation; its metadata is `response`
    pub operation: Operation,
    pub response: Value,
}

/// Location grouping used by aggregated list responses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocationScope {
    Zones,
    Regions,
}

impl LocationScope {
    pub fn prefix(&self) -> &'static str {
        match self {
            LocationScope::Zones => "zones/",
            LocationScope::Regions => "regions/",
        }
    }

    /// Location name for an aggregated key, if the key belongs to this scope
    pub fn location<'a>(&self, key: &'a str) -> Option<&'a str> {
        key.strip_prefix(self.prefix()).filter(|name| !name.is_empty())
    }
}

fn record_name(record: &Value) -> &str {
    record.get("name").and_then(|v| v.as_str()).unwrap_or_default()
}

/// Build one value per record of a flat `items` array, in order
pub(crate) fn flat_items<T>(response: &Value, mut build: impl FnMut(&str, Value) -> T) -> Vec<T> {
    match response.get("items") {
        Some(Value::Array(records)) => records
            .iter()
            .map(|record| build(record_name(record), record.clone()))
            .collect(),
        Some(_) => {
            tracing::debug!("expected a flat items array, skipping");
            Vec::new()
        }
        None => Vec::new(),
    }
}

/// Build one value per record of an aggregated `items` map
///
/// `locate` resolves the location handle once per matching key; `build`
/// constructs each child through it.
pub(crate) fn aggregated_items<L, T>(
    response: &Value,
    scope: LocationScope,
    field: &str,
    mut locate: impl FnMut(&str) -> L,
    mut build: impl FnMut(&L, &str, Value) -> T,
) -> Vec<T> {
    let groups = match response.get("items") {
        Some(Value::Object(groups)) => groups,
        Some(_) => {
            tracing::debug!("expected an aggregated items map, skipping");
            return Vec::new();
        }
        None => return Vec::new(),
    };

    let mut items = Vec::new();
    for (key, group) in groups {
        let Some(location_name) = scope.location(key) else {
            tracing::debug!("skipping aggregated key {} outside {}", key, scope.prefix());
            continue;
        };
        let Some(records) = group.get(field).and_then(|v| v.as_array()) else {
            continue;
        };

        let location = locate(location_name);
        for record in records {
            items.push(build(&location, record_name(record), record.clone()));
        }
    }
    items
}

/// `nextPageToken` of a response as a continuation of `query`
pub(crate) fn next_query(query: &Query, response: &Value) -> Option<Query> {
    response
        .get("nextPageToken")
        .and_then(|v| v.as_str())
        .map(|token| query.continued(token))
}

/// Follow `next_query` across pages, yielding every item
///
/// ```ignore
/// let compute = compute.clone();
/// let firewalls: Vec<Firewall> = paginate(None, move |query| {
///     let compute = compute.clone();
///     async move { compute.get_firewalls(Some(&query)).await }
/// })
/// .try_collect()
/// .await?;
/// ```
pub fn paginate<T, F, Fut>(query: Option<&Query>, fetch: F) -> impl Stream<Item = Result<T>>
where
    F: FnMut(Query) -> Fut,
    Fut: Future<Output = Result<ListPage<T>>>,
{
    let seed = Some(query.cloned().unwrap_or_default());

    stream::try_unfold((seed, fetch), |(next, mut fetch)| async move {
        let Some(query) = next else {
            return Ok::<_, Error>(None);
        };
        let page = fetch(query).await?;
        let items = stream::iter(page.items.into_iter().map(Ok::<T, Error>));
        Ok(Some((items, (page.next_query, fetch))))
    })
    .try_flatten()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_flat_items_preserves_order() {
        let response = json!({"items": [{"name": "b"}, {"name": "a"}, {"name": "c"}]});
        let names = flat_items(&response, |name, _| name.to_string());
        assert_eq!(names, vec!["b", "a", "c"]);
    }

    #[test]
    fn test_flat_items_missing_name_keeps_length() {
        let response = json!({"items": [{"name": "a"}, {"id": "42"}]});
        let names = flat_items(&response, |name, _| name.to_string());
        assert_eq!(names, vec!["a", ""]);
    }

    #[test]
    fn test_flat_items_without_items() {
        let names = flat_items(&json!({"kind": "compute#firewallList"}), |n, _| n.to_string());
        assert!(names.is_empty());
    }

    #[test]
    fn test_aggregated_items_skips_foreign_keys() {
        let response = json!({
            "items": {
                "zones/zone-a": {"autoscalers": [{"name": "as-1"}]},
                "regions/region-a": {"autoscalers": [{"name": "as-2"}]},
                "global": {"autoscalers": [{"name": "as-3"}]}
            }
        });

        let items = aggregated_items(
            &response,
            LocationScope::Zones,
            "autoscalers",
            |zone| zone.to_string(),
            |zone, name, _| format!("{}/{}", zone, name),
        );
        assert_eq!(items, vec!["zone-a/as-1"]);
    }

    #[test]
    fn test_aggregated_items_skips_warning_groups() {
        let response = json!({
            "items": {
                "zones/zone-a": {"warning": {"code": "NO_RESULTS_ON_PAGE"}},
                "zones/zone-b": {"disks": [{"name": "d1"}, {"name": "d2"}]}
            }
        });

        let mut located = Vec::new();
        let items = aggregated_items(
            &response,
            LocationScope::Zones,
            "disks",
            |zone| {
                located.push(zone.to_string());
                zone.to_string()
            },
            |_, name, record| (name.to_string(), record),
        );

        assert_eq!(located, vec!["zone-b"]);
        assert_eq!(items.len(), 2);
        assert_eq!(items[1].0, "d2");
        assert_eq!(items[1].1, json!({"name": "d2"}));
    }

    #[test]
    fn test_location_scope_requires_name() {
        assert_eq!(LocationScope::Regions.location("regions/us-east1"), Some("us-east1"));
        assert_eq!(LocationScope::Regions.location("regions/"), None);
        assert_eq!(LocationScope::Regions.location("zones/us-east1-b"), None);
    }

    #[test]
    fn test_next_query() {
        let query = Query::new().with("maxResults", 2);
        assert!(next_query(&query, &json!({})).is_none());

        let next = next_query(&query, &json!({"nextPageToken": "abc"})).unwrap();
        assert_eq!(next.page_token(), Some("abc"));
        assert!(query.page_token().is_none());
    }

    #[tokio::test]
    async fn test_paginate_follows_tokens() {
        let pages = vec![
            ListPage {
                items: vec![1, 2],
                next_query: Some(Query::new().continued("p2")),
                response: Value::Null,
            },
            ListPage {
                items: vec![3],
                next_query: None,
                response: Value::Null,
            },
        ];
        let mut pages = pages.into_iter();
        let mut seen = Vec::new();

        let items: Vec<i32> = paginate(None, |query| {
            seen.push(query.page_token().map(|s| s.to_string()));
            let page = pages.next().unwrap();
            async move { Ok(page) }
        })
        .try_collect()
        .await
        .unwrap();

        assert_eq!(items, vec![1, 2, 3]);
        assert_eq!(seen, vec![None, Some("p2".to_string())]);
    }
}
