//! Authenticated gateway for frontend-backend communication.
//!
//! Every authorized call goes through [`request`]: the bearer token is read
//! from session storage, injected into the headers, and the response is
//! normalized into [`ApiError`] / parsed JSON. Requests are sent with
//! `no-store` so session-scoped data always reflects current server state.

use gloo_net::http::{Method, RequestBuilder};
use gloo_timers::future::TimeoutFuture;
use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;
use wasm_bindgen_futures::spawn_local;

use crate::system::auth::storage;

/// Per-request deadline. The backend lives next to the frontend, so anything
/// slower than this is a hung connection, not a slow query.
const REQUEST_TIMEOUT_MS: u32 = 30_000;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApiError {
    /// No access token in session storage; nothing was sent.
    #[error("not authenticated")]
    Unauthenticated,

    /// Transport-level failure: DNS, dropped connection, aborted by timeout.
    #[error("transport error: {0}")]
    Io(String),

    /// The server answered outside the 200-299 range. The response body is
    /// read in full before this is produced so diagnostics are not lost.
    #[error("request failed: {status} {status_text}: {body}")]
    RequestFailed {
        status: u16,
        status_text: String,
        body: String,
    },

    /// A JSON payload could not be serialized or parsed.
    #[error("invalid JSON payload: {0}")]
    Parse(String),
}

/// Get the base URL for API requests
///
/// Constructs the API base URL from the current window location,
/// using port 3000 for the backend server.
pub fn api_base() -> String {
    let window = match web_sys::window() {
        Some(w) => w,
        None => return String::new(),
    };
    let location = window.location();
    let protocol = location.protocol().unwrap_or_else(|_| "http:".to_string());
    let hostname = location
        .hostname()
        .unwrap_or_else(|_| "127.0.0.1".to_string());
    format!("{}//{}:3000", protocol, hostname)
}

/// Build a full API URL from a path (should start with "/api/").
pub fn api_url(path: &str) -> String {
    format!("{}{}", api_base(), path)
}

/// A fully resolved request: method, URL, final headers, serialized body.
/// Everything is decided here, before any I/O exists.
#[derive(Debug, Clone)]
struct PreparedRequest {
    method: Method,
    url: String,
    headers: Vec<(String, String)>,
    body: Option<String>,
}

impl PreparedRequest {
    /// Resolves the outgoing request or fails fast with `Unauthenticated`
    /// when there is no credential. Caller headers are merged over the
    /// defaults and win on collision (header names compare case-insensitively).
    fn new<B: Serialize>(
        method: Method,
        url: &str,
        token: Option<&str>,
        extra_headers: &[(&str, &str)],
        body: Option<&B>,
    ) -> Result<PreparedRequest, ApiError> {
        let token = token.ok_or(ApiError::Unauthenticated)?;

        let mut headers: Vec<(String, String)> = vec![
            ("Content-Type".to_string(), "application/json".to_string()),
            ("Authorization".to_string(), format!("Bearer {}", token)),
        ];
        for (name, value) in extra_headers {
            match headers
                .iter_mut()
                .find(|(existing, _)| existing.eq_ignore_ascii_case(name))
            {
                Some(slot) => slot.1 = value.to_string(),
                None => headers.push((name.to_string(), value.to_string())),
            }
        }

        let body = match body {
            Some(value) => {
                Some(serde_json::to_string(value).map_err(|e| ApiError::Parse(e.to_string()))?)
            }
            None => None,
        };

        Ok(PreparedRequest {
            method,
            url: url.to_string(),
            headers,
            body,
        })
    }
}

/// Classify a received response: 204 is an empty success, anything outside
/// the success range is a failure carrying the body text, the rest is JSON.
fn decode_response<T: DeserializeOwned>(
    status: u16,
    status_text: &str,
    body: &str,
) -> Result<Option<T>, ApiError> {
    if status == 204 {
        return Ok(None);
    }
    if !(200..=299).contains(&status) {
        return Err(ApiError::RequestFailed {
            status,
            status_text: status_text.to_string(),
            body: body.to_string(),
        });
    }
    serde_json::from_str(body)
        .map(Some)
        .map_err(|e| ApiError::Parse(e.to_string()))
}

async fn execute<T: DeserializeOwned>(prepared: PreparedRequest) -> Result<Option<T>, ApiError> {
    let controller = web_sys::AbortController::new().ok();
    let signal = controller.as_ref().map(|c| c.signal());

    let mut builder = RequestBuilder::new(&prepared.url)
        .method(prepared.method)
        .cache(web_sys::RequestCache::NoStore)
        .abort_signal(signal.as_ref());
    for (name, value) in &prepared.headers {
        builder = builder.header(name, value);
    }

    // Arm the deadline; aborting an already settled fetch is a no-op.
    if let Some(controller) = controller {
        spawn_local(async move {
            TimeoutFuture::new(REQUEST_TIMEOUT_MS).await;
            controller.abort();
        });
    }

    let request = match prepared.body {
        Some(json) => builder.body(json).map_err(|e| ApiError::Io(e.to_string()))?,
        None => builder.build().map_err(|e| ApiError::Io(e.to_string()))?,
    };

    let response = request
        .send()
        .await
        .map_err(|e| ApiError::Io(e.to_string()))?;

    let status = response.status();
    let status_text = response.status_text();
    // Body first, classification second: error responses keep their payload.
    let body = response
        .text()
        .await
        .map_err(|e| ApiError::Io(e.to_string()))?;

    decode_response(status, &status_text, &body)
}

/// Issue an authorized request against the backend.
///
/// Fails with [`ApiError::Unauthenticated`] before any network I/O when the
/// session has no token. `extra_headers` override the default
/// `Content-Type`/`Authorization` pair on collision. `Ok(None)` means the
/// server answered 204 No Content.
pub async fn request<B, T>(
    method: Method,
    path: &str,
    extra_headers: &[(&str, &str)],
    body: Option<&B>,
) -> Result<Option<T>, ApiError>
where
    B: Serialize,
    T: DeserializeOwned,
{
    let method_label = format!("{:?}", method);
    let result = match PreparedRequest::new(
        method,
        &api_url(path),
        storage::access_token().as_deref(),
        extra_headers,
        body,
    ) {
        Ok(prepared) => execute(prepared).await,
        Err(err) => Err(err),
    };

    if let Err(err) = &result {
        log::error!("api: {} {} failed: {}", method_label, path, err);
    }
    result
}

/// Authorized GET expecting a JSON body.
pub async fn get<T: DeserializeOwned>(path: &str) -> Result<T, ApiError> {
    match request::<(), T>(Method::GET, path, &[], None).await? {
        Some(value) => Ok(value),
        None => {
            let err = ApiError::Parse("empty response body".to_string());
            log::error!("api: GET {} failed: {}", path, err);
            Err(err)
        }
    }
}

/// Authorized POST whose success answer carries no payload (204 or ignored).
pub async fn post_no_content<B: Serialize>(path: &str, body: &B) -> Result<(), ApiError> {
    request::<B, serde_json::Value>(Method::POST, path, &[], Some(body))
        .await
        .map(|_| ())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn header<'a>(prepared: &'a PreparedRequest, name: &str) -> Option<&'a str> {
        prepared
            .headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    #[test]
    fn missing_token_fails_before_any_send() {
        let result =
            PreparedRequest::new::<()>(Method::GET, "http://x/api/ping", None, &[], None);
        assert_eq!(result.unwrap_err(), ApiError::Unauthenticated);
    }

    #[test]
    fn default_headers_carry_bearer_token() {
        let prepared =
            PreparedRequest::new::<()>(Method::GET, "http://x/api/ping", Some("tok-1"), &[], None)
                .unwrap();
        assert_eq!(header(&prepared, "content-type"), Some("application/json"));
        assert_eq!(header(&prepared, "authorization"), Some("Bearer tok-1"));
        assert!(prepared.body.is_none());
    }

    #[test]
    fn caller_headers_override_defaults_case_insensitively() {
        let prepared = PreparedRequest::new::<()>(
            Method::GET,
            "http://x/api/export",
            Some("tok-1"),
            &[("content-type", "text/csv"), ("X-Request-Id", "42")],
            None,
        )
        .unwrap();
        assert_eq!(header(&prepared, "Content-Type"), Some("text/csv"));
        assert_eq!(header(&prepared, "Authorization"), Some("Bearer tok-1"));
        assert_eq!(header(&prepared, "x-request-id"), Some("42"));
        // Overriding replaces the default entry, it does not duplicate it.
        assert_eq!(prepared.headers.len(), 3);
    }

    #[test]
    fn body_is_serialized_as_json_text() {
        let prepared = PreparedRequest::new(
            Method::POST,
            "http://x/api/items",
            Some("tok-1"),
            &[],
            Some(&json!({"name": "bolt", "qty": 3})),
        )
        .unwrap();
        let body: Value = serde_json::from_str(prepared.body.as_deref().unwrap()).unwrap();
        assert_eq!(body["name"], "bolt");
        assert_eq!(body["qty"], 3);
    }

    #[test]
    fn success_body_is_parsed() {
        let value: Option<Value> = decode_response(200, "OK", r#"{"ok":true}"#).unwrap();
        assert_eq!(value.unwrap()["ok"], true);
    }

    #[test]
    fn no_content_skips_parsing() {
        // Whatever the body claims to be, 204 never reaches the parser.
        let value: Option<Value> = decode_response(204, "No Content", "not json").unwrap();
        assert!(value.is_none());
    }

    #[test]
    fn failure_keeps_status_and_body_text() {
        let err = decode_response::<Value>(500, "Internal Server Error", "server exploded")
            .unwrap_err();
        assert_eq!(
            err,
            ApiError::RequestFailed {
                status: 500,
                status_text: "Internal Server Error".to_string(),
                body: "server exploded".to_string(),
            }
        );
        assert!(err.to_string().contains("server exploded"));
    }

    #[test]
    fn redirects_are_outside_the_success_range() {
        let err = decode_response::<Value>(301, "Moved Permanently", "").unwrap_err();
        assert!(matches!(err, ApiError::RequestFailed { status: 301, .. }));
    }

    #[test]
    fn invalid_json_on_success_is_a_parse_error() {
        let err = decode_response::<Value>(200, "OK", "<html>oops</html>").unwrap_err();
        assert!(matches!(err, ApiError::Parse(_)));
    }
}
