use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
    /// Server-side expiry of the issued token. The client does not refresh;
    /// an expired token fails validation on the next request.
    pub expires_at: DateTime<Utc>,
    pub user: UserInfo,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserInfo {
    pub id: Uuid,
    pub username: String,
    pub full_name: Option<String>,
    pub email: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_response_parses_backend_shape() {
        let json = r#"{
            "access_token": "tok-123",
            "expires_at": "2026-08-08T12:00:00Z",
            "user": {
                "id": "7f2c1a90-8a6e-4d38-9c55-0f3a5f1f2b11",
                "username": "admin",
                "full_name": null,
                "email": "admin@example.com"
            }
        }"#;

        let response: LoginResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.access_token, "tok-123");
        assert_eq!(response.user.username, "admin");
        assert_eq!(response.user.full_name, None);
        assert_eq!(response.user.email.as_deref(), Some("admin@example.com"));
    }
}
