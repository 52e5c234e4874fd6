use contracts::system::auth::{LoginRequest, LoginResponse, UserInfo};
use gloo_net::http::{Method, Request};

use crate::shared::api_client::{self, ApiError};

/// Login with username and password.
///
/// The one call that goes out without a bearer header: there is no session
/// yet, so it cannot use the authorized gateway.
pub async fn login(username: String, password: String) -> Result<LoginResponse, ApiError> {
    let result = login_request(LoginRequest { username, password }).await;
    if let Err(err) = &result {
        log::error!("api: login failed: {}", err);
    }
    result
}

async fn login_request(request: LoginRequest) -> Result<LoginResponse, ApiError> {
    let response = Request::post(&api_client::api_url("/api/system/auth/login"))
        .json(&request)
        .map_err(|e| ApiError::Parse(e.to_string()))?
        .send()
        .await
        .map_err(|e| ApiError::Io(e.to_string()))?;

    if !response.ok() {
        let status = response.status();
        let status_text = response.status_text();
        let body = response.text().await.unwrap_or_default();
        return Err(ApiError::RequestFailed {
            status,
            status_text,
            body,
        });
    }

    response
        .json::<LoginResponse>()
        .await
        .map_err(|e| ApiError::Parse(e.to_string()))
}

/// Revoke the current session on the server. Local cleanup (token, auth
/// state) is the caller's job and happens even if this fails.
pub async fn logout() -> Result<(), ApiError> {
    api_client::request::<(), serde_json::Value>(
        Method::POST,
        "/api/system/auth/logout",
        &[],
        None,
    )
    .await
    .map(|_| ())
}

/// Current user for the stored credential; doubles as token validation.
pub async fn current_user() -> Result<UserInfo, ApiError> {
    api_client::get("/api/system/auth/me").await
}
