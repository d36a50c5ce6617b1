//! Firewall rules
//!
//! Besides the handle, this module turns the shorthand accepted by
//! [`Compute::create_firewall`](crate::Compute::create_firewall) into the
//! API's field names:
//!
//! | shorthand | API field |
//! |---|---|
//! | `protocols: {"tcp": [80, 443], "icmp": []}` | `allowed: [{IPProtocol, ports?}]` |
//! | `ranges: "0.0.0.0/0"` | `sourceRanges: ["0.0.0.0/0"]` |
//! | `tags: "web"` | `sourceTags: ["web"]` |

use super::core::{Delete, Exists, Get, GetMetadata, ResourceCore, Scope, ServiceObject};
use crate::compute::Compute;
use serde_json::{json, Map, Value};

#[derive(Debug, Clone, PartialEq)]
pub struct Firewall {
    core: ResourceCore,
}

impl Firewall {
    pub(crate) fn new(compute: Compute, name: &str) -> Self {
        Self {
            core: ResourceCore::new(compute, Scope::Global, "firewalls", name),
        }
    }
}

impl ServiceObject for Firewall {
    fn core(&self) -> &ResourceCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut ResourceCore {
        &mut self.core
    }
}

impl Exists for Firewall {}
impl GetMetadata for Firewall {}
impl Get for Firewall {}
impl Delete for Firewall {}

/// Wrap a scalar in a one-element array; null becomes empty
pub(crate) fn arrify(value: Value) -> Vec<Value> {
    match value {
        Value::Null => Vec::new(),
        Value::Array(values) => values,
        other => vec![other],
    }
}

/// Port values meaning "no port list": null, false, 0, "" and []
fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(values) => values.is_empty(),
        Value::Object(_) => false,
    }
}

/// Convert a `protocols` map into `allowed` entries, in map order
fn protocols_to_allowed(protocols: Map<String, Value>) -> Vec<Value> {
    protocols
        .into_iter()
        .map(|(protocol, ports)| {
            if is_falsy(&ports) {
                json!({ "IPProtocol": protocol })
            } else {
                json!({ "IPProtocol": protocol, "ports": arrify(ports) })
            }
        })
        .collect()
}

/// Rewrite firewall shorthand fields into API fields
pub(crate) fn normalize_firewall_config(mut config: Map<String, Value>) -> Map<String, Value> {
    if let Some(protocols) = config.remove("protocols") {
        let mut allowed = config.remove("allowed").map(arrify).unwrap_or_default();
        match protocols {
            Value::Object(protocols) => allowed.extend(protocols_to_allowed(protocols)),
            other => {
                tracing::warn!("ignoring non-map protocols value: {}", other);
            }
        }
        config.insert("allowed".to_string(), Value::Array(allowed));
    }

    if let Some(ranges) = config.remove("ranges") {
        config.insert("sourceRanges".to_string(), Value::Array(arrify(ranges)));
    }

    if let Some(tags) = config.remove("tags") {
        config.insert("sourceTags".to_string(), Value::Array(arrify(tags)));
    }

    config
}

#[cfg(test)]
mod tests {
    use super::*;

    fn normalize(config: Value) -> Value {
        match config {
            Value::Object(map) => Value::Object(normalize_firewall_config(map)),
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_protocols_become_allowed() {
        let body = normalize(json!({
            "protocols": { "https": [8080, 9000], "ssh": 22, "ftp": [] }
        }));

        assert_eq!(
            body["allowed"],
            json!([
                { "IPProtocol": "https", "ports": [8080, 9000] },
                { "IPProtocol": "ssh", "ports": [22] },
                { "IPProtocol": "ftp" }
            ])
        );
        assert!(body.get("protocols").is_none());
    }

    #[test]
    fn test_allowed_passes_through() {
        let allowed = json!([{ "IPProtocol": "tcp", "ports": ["80"] }]);
        let body = normalize(json!({ "allowed": allowed.clone() }));
        assert_eq!(body["allowed"], allowed);
    }

    #[test]
    fn test_protocols_append_to_allowed() {
        let body = normalize(json!({
            "allowed": { "IPProtocol": "icmp" },
            "protocols": { "tcp": "8000-9000" }
        }));
        assert_eq!(
            body["allowed"],
            json!([
                { "IPProtocol": "icmp" },
                { "IPProtocol": "tcp", "ports": ["8000-9000"] }
            ])
        );
    }

    #[test]
    fn test_non_map_protocols_are_dropped() {
        let allowed = json!([{ "IPProtocol": "tcp" }]);
        let body = normalize(json!({ "allowed": allowed.clone(), "protocols": "tcp:80" }));

        assert_eq!(body["allowed"], allowed);
        assert!(body.get("protocols").is_none());
    }

    #[test]
    fn test_falsy_ports_are_omitted() {
        let body = normalize(json!({
            "protocols": { "udp": 0, "icmp": null, "esp": "", "ah": false }
        }));
        for entry in body["allowed"].as_array().unwrap() {
            assert!(entry.get("ports").is_none(), "{entry}");
        }
    }

    #[test]
    fn test_ranges_and_tags_are_renamed() {
        let body = normalize(json!({
            "ranges": "0.0.0.0/0",
            "tags": ["web", "db"],
            "network": "global/networks/default"
        }));

        assert_eq!(body["sourceRanges"], json!(["0.0.0.0/0"]));
        assert_eq!(body["sourceTags"], json!(["web", "db"]));
        assert_eq!(body["network"], "global/networks/default");
        assert!(body.get("ranges").is_none());
        assert!(body.get("tags").is_none());
    }

    #[test]
    fn test_arrify() {
        assert_eq!(arrify(Value::Null), Vec::<Value>::new());
        assert_eq!(arrify(json!("a")), vec![json!("a")]);
        assert_eq!(arrify(json!([1, 2])), vec![json!(1), json!(2)]);
    }
}
