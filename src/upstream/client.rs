use crate::constants::limits::MAX_BODY_DETAIL_BYTES;
use crate::constants::network::{MAX_REDIRECTS, TIMEOUT_API_REQUEST_MS};
use crate::constants::{env_vars, upstream};
use crate::errors::ToolError;
use crate::services::credentials::CredentialSources;
use crate::services::logger::Logger;
use base64::Engine;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, USER_AGENT};
use reqwest::{Client, Method, StatusCode};
use serde_json::Value;
use std::time::{Duration, Instant};
use url::Url;

#[derive(Debug, Clone)]
pub struct UpstreamConfig {
    pub base_url: String,
    pub timeout_ms: u64,
}

impl UpstreamConfig {
    pub fn from_env() -> Self {
        let base_url = std::env::var(env_vars::API_BASE_URL)
            .ok()
            .map(|raw| raw.trim().trim_end_matches('/').to_string())
            .filter(|raw| !raw.is_empty())
            .unwrap_or_else(|| upstream::DEFAULT_BASE_URL.to_string());
        Self {
            base_url,
            timeout_ms: TIMEOUT_API_REQUEST_MS,
        }
    }
}

/// Authenticated HTTP access to the banking API. One call per tool
/// invocation, a hard timeout on every call, and no internal retries: a
/// duplicated payment submission is worse than a failed one, and read
/// retries belong to the caller's policy, which gets everything it needs
/// from the error classification (`retryable`, retry-after hint).
pub struct UpstreamClient {
    logger: Logger,
    sources: CredentialSources,
    config: UpstreamConfig,
    client: Client,
}

impl UpstreamClient {
    pub fn new(
        logger: Logger,
        sources: CredentialSources,
        config: UpstreamConfig,
    ) -> Result<Self, ToolError> {
        let client = Client::builder()
            .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
            .build()
            .map_err(|err| ToolError::internal(format!("Failed to build HTTP client: {}", err)))?;
        Ok(Self {
            logger: logger.child("upstream"),
            sources,
            config,
            client,
        })
    }

    /// Issues one authenticated request and returns the parsed JSON body of a
    /// 2xx response. Any other status is classified into the typed taxonomy;
    /// the credential is resolved fresh for this call and never logged.
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<&Value>,
    ) -> Result<Value, ToolError> {
        let credential = self.sources.resolve()?;
        let url = self.build_url(path, query)?;

        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static("bankgate/0.1.0"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        // Upstream convention: HTTP Basic with the token as username and an
        // empty password.
        let encoded = base64::engine::general_purpose::STANDARD
            .encode(format!("{}:", credential.expose()));
        let auth_value = HeaderValue::from_str(&format!("Basic {}", encoded))
            .map_err(|_| ToolError::internal("API token contains invalid header characters"))?;
        headers.insert(AUTHORIZATION, auth_value);

        let mut req = self
            .client
            .request(method.clone(), url)
            .headers(headers)
            .timeout(Duration::from_millis(self.config.timeout_ms));
        if let Some(body) = body {
            req = req.json(body);
        }

        let started = Instant::now();
        let response = req.send().await.map_err(map_reqwest_error)?;
        let status = response.status();
        let retry_after = response
            .headers()
            .get("retry-after")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse::<u64>().ok());
        let text = response.text().await.map_err(map_reqwest_error)?;

        self.logger.debug(
            "Upstream call",
            Some(&serde_json::json!({
                "method": method.as_str(),
                "path": path,
                "status": status.as_u16(),
                "duration_ms": started.elapsed().as_millis() as u64,
            })),
        );

        if status.is_success() {
            if text.trim().is_empty() {
                return Ok(Value::Null);
            }
            return serde_json::from_str(&text).map_err(|err| {
                ToolError::mapping(format!("Upstream returned a non-JSON 2xx body: {}", err))
            });
        }
        Err(classify_status(status, retry_after, &text))
    }

    fn build_url(&self, path: &str, query: &[(&str, String)]) -> Result<Url, ToolError> {
        let mut url = Url::parse(&self.config.base_url).map_err(|_| {
            ToolError::internal(format!("Invalid upstream base URL: {}", self.config.base_url))
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ToolError::internal(
                "Only http/https upstream URLs are supported",
            ));
        }
        {
            // Push segments one by one so opaque identifiers get
            // percent-encoded instead of corrupting the URL.
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| ToolError::internal("Upstream base URL cannot carry a path"))?;
            segments.pop_if_empty();
            for segment in path.split('/').filter(|s| !s.is_empty()) {
                segments.push(segment);
            }
        }
        if !query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in query {
                pairs.append_pair(key, value);
            }
        }
        Ok(url)
    }
}

/// HTTP status → error taxonomy. 401/403 can never succeed on retry with the
/// same credential; 404 must stay distinguishable from the catch-all so
/// callers can tell "no such resource" from "upstream broke".
pub fn classify_status(status: StatusCode, retry_after: Option<u64>, body: &str) -> ToolError {
    let detail = body_detail(body);
    match status.as_u16() {
        401 | 403 => ToolError::unauthorized(format!(
            "Upstream rejected the credential (HTTP {})",
            status.as_u16()
        ))
        .with_details(detail),
        404 => ToolError::not_found("Upstream resource not found").with_details(detail),
        429 => {
            let mut err = ToolError::rate_limited("Upstream rate limit exceeded");
            let mut details = serde_json::json!({ "status": 429 });
            if let Some(secs) = retry_after {
                err = err.with_hint(format!("Retry after {} seconds", secs));
                details["retry_after_secs"] = secs.into();
            }
            err.with_details(details)
        }
        code if status.is_server_error() => {
            ToolError::unavailable(format!("Upstream unavailable (HTTP {})", code))
                .with_details(detail)
        }
        code => ToolError::upstream(format!("Upstream request failed (HTTP {})", code))
            .with_details(detail),
    }
}

fn body_detail(body: &str) -> Value {
    let trimmed = if body.len() > MAX_BODY_DETAIL_BYTES {
        let mut end = MAX_BODY_DETAIL_BYTES;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        &body[..end]
    } else {
        body
    };
    match serde_json::from_str::<Value>(trimmed) {
        Ok(parsed) => serde_json::json!({ "body": parsed }),
        Err(_) => serde_json::json!({ "body": trimmed }),
    }
}

pub fn map_reqwest_error(err: reqwest::Error) -> ToolError {
    if err.is_timeout() {
        return ToolError::timeout("Upstream request timed out");
    }
    // reqwest errors can embed the full URL; the path is enough diagnostics.
    ToolError::unavailable(format!("Upstream connection failed: {}", err.without_url()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ToolErrorKind;

    #[test]
    fn auth_failures_are_terminal() {
        let err = classify_status(StatusCode::UNAUTHORIZED, None, "");
        assert_eq!(err.kind, ToolErrorKind::Unauthorized);
        assert!(!err.retryable);
        let err = classify_status(StatusCode::FORBIDDEN, None, "{}");
        assert_eq!(err.kind, ToolErrorKind::Unauthorized);
    }

    #[test]
    fn not_found_is_distinct_from_catch_all() {
        let not_found = classify_status(StatusCode::NOT_FOUND, None, "");
        let other = classify_status(StatusCode::IM_A_TEAPOT, None, "");
        assert_eq!(not_found.kind, ToolErrorKind::NotFound);
        assert_eq!(other.kind, ToolErrorKind::Upstream);
        assert_ne!(not_found.kind, other.kind);
    }

    #[test]
    fn rate_limit_carries_retry_after_hint() {
        let err = classify_status(StatusCode::TOO_MANY_REQUESTS, Some(17), "");
        assert_eq!(err.kind, ToolErrorKind::RateLimited);
        assert!(err.retryable);
        assert_eq!(err.hint.as_deref(), Some("Retry after 17 seconds"));
        assert_eq!(
            err.details.unwrap().get("retry_after_secs").unwrap(),
            &serde_json::json!(17)
        );
    }

    #[test]
    fn server_errors_are_unavailable() {
        for code in [500u16, 502, 503, 504] {
            let status = StatusCode::from_u16(code).unwrap();
            assert_eq!(
                classify_status(status, None, "").kind,
                ToolErrorKind::Unavailable
            );
        }
    }

    #[test]
    fn catch_all_keeps_raw_status_and_body() {
        let err = classify_status(StatusCode::IM_A_TEAPOT, None, r#"{"error":"teapot"}"#);
        assert!(err.message.contains("418"));
        let details = err.details.unwrap();
        assert_eq!(details["body"]["error"], "teapot");
    }
}
