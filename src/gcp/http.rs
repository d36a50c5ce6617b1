//! HTTP transport for Compute Engine REST calls

use super::auth::Credentials;
use super::transport::{ApiRequest, Transport};
use crate::error::{Error, Result};
use futures::future::BoxFuture;
use reqwest::Client;
use serde_json::Value;

/// Compute Engine API root
pub const DEFAULT_BASE_URL: &str = "https://www.googleapis.com/compute/v1";

/// Maximum length of response body to log (to avoid logging sensitive data)
const MAX_LOG_BODY_LENGTH: usize = 200;

/// Sanitize response body for logging
/// Truncates long responses and strips control characters
fn sanitize_for_log(body: &str) -> String {
    let truncated = if body.len() > MAX_LOG_BODY_LENGTH {
        let mut end = MAX_LOG_BODY_LENGTH;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}... [truncated, {} bytes total]", &body[..end], body.len())
    } else {
        body.to_string()
    };

    truncated.replace(|c: char| !c.is_ascii_graphic() && c != ' ', "")
}

/// Pull `error.message` out of a Google API error body
fn error_message(body: &Value) -> Option<String> {
    body.get("error")
        .and_then(|e| e.get("message"))
        .and_then(|m| m.as_str())
        .map(|s| s.to_string())
}

/// Body of an error response: decoded JSON, or the text itself when it
/// is not JSON. Empty bodies carry nothing.
fn raw_response(body: String) -> Option<Value> {
    if body.is_empty() {
        return None;
    }
    Some(serde_json::from_str(&body).unwrap_or(Value::String(body)))
}

/// reqwest-backed [`Transport`] scoped to one project
#[derive(Clone)]
pub struct HttpTransport {
    client: Client,
    credentials: Credentials,
    /// `<base url>/projects/<project>`
    project_url: String,
}

impl std::fmt::Debug for HttpTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpTransport")
            .field("project_url", &self.project_url)
            .field("credentials", &self.credentials)
            .finish()
    }
}

impl HttpTransport {
    pub fn new(base_url: &str, project_id: &str, credentials: Credentials) -> Result<Self> {
        let parsed = url::Url::parse(base_url)
            .map_err(|e| Error::invalid(format!("invalid base URL {:?}: {}", base_url, e)))?;
        if parsed.cannot_be_a_base() {
            return Err(Error::invalid(format!("base URL {:?} cannot hold paths", base_url)));
        }

        let client = Client::builder()
            .user_agent(concat!("gcompute/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            credentials,
            project_url: format!(
                "{}/projects/{}",
                base_url.trim_end_matches('/'),
                project_id
            ),
        })
    }

    /// Full URL for a project-relative path
    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.project_url, path.trim_start_matches('/'))
    }

    async fn execute(&self, request: ApiRequest) -> Result<Value> {
        let url = self.url(&request.path);
        tracing::debug!("{} {}", request.method, url);

        let token = self.credentials.get_token().await?;

        let url = if request.query.is_empty() {
            url
        } else {
            format!("{}?{}", url, request.query.to_query_string())
        };
        let mut builder = self
            .client
            .request(request.method.clone(), &url)
            .bearer_auth(token);

        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            // Security: Only log sanitized/truncated error body to avoid leaking sensitive data
            tracing::error!("API error: {} - {}", status, sanitize_for_log(&body));
            let message = serde_json::from_str::<Value>(&body)
                .ok()
                .as_ref()
                .and_then(error_message)
                .unwrap_or_else(|| status.canonical_reason().unwrap_or("").to_string());
            return Err(Error::Api {
                status: status.as_u16(),
                message,
                response: raw_response(body),
            });
        }

        if body.is_empty() {
            return Ok(Value::Null);
        }

        serde_json::from_str(&body).map_err(|source| Error::UnexpectedResponse {
            source,
            response: Value::String(body),
        })
    }
}

impl Transport for HttpTransport {
    fn send(&self, request: ApiRequest) -> BoxFuture<'_, Result<Value>> {
        Box::pin(self.execute(request))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_url_joins_project_and_path() {
        let transport = HttpTransport::new(
            "https://www.googleapis.com/compute/v1/",
            "my-project",
            Credentials::from_access_token("t"),
        )
        .unwrap();

        assert_eq!(
            transport.url("/global/firewalls"),
            "https://www.googleapis.com/compute/v1/projects/my-project/global/firewalls"
        );
        assert_eq!(
            transport.url("zones"),
            "https://www.googleapis.com/compute/v1/projects/my-project/zones"
        );
    }

    #[test]
    fn test_rejects_unparseable_base_url() {
        let err = HttpTransport::new("not a url", "p", Credentials::from_access_token("t"))
            .unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
        assert!(HttpTransport::new("mailto:a@b", "p", Credentials::from_access_token("t")).is_err());
    }

    #[test]
    fn test_sanitize_for_log_truncates() {
        let body = "a".repeat(500);
        let sanitized = sanitize_for_log(&body);
        assert!(sanitized.contains("[truncated, 500 bytes total]"));
    }

    #[test]
    fn test_raw_response_keeps_text_bodies() {
        assert_eq!(raw_response(String::new()), None);
        assert_eq!(
            raw_response(r#"{"error":{"code":502}}"#.to_string()),
            Some(json!({"error": {"code": 502}}))
        );
        assert_eq!(
            raw_response("<html>upstream connect error</html>".to_string()),
            Some(json!("<html>upstream connect error</html>"))
        );
    }

    #[test]
    fn test_error_message_extraction() {
        let body = json!({"error": {"code": 404, "message": "The resource was not found"}});
        assert_eq!(error_message(&body).as_deref(), Some("The resource was not found"));
        assert!(error_message(&json!({})).is_none());
    }
}
