use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const AUTH_TABLE_NAME: &str = "auth";

/// One row of the `auth` table
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct AuthRecord {
    pub user_id: String,
    #[serde(skip_serializing)]
    pub hashed_password: String,
    #[serde(skip_serializing)]
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing)]
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoginResponse {
    pub user_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_record_hides_secrets() {
        let record = AuthRecord {
            user_id: "AB1234".to_string(),
            hashed_password: "$argon2id$v=19$...".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json, serde_json::json!({ "user_id": "AB1234" }));
    }

    #[test]
    fn test_login_request_missing_fields_default_to_empty() {
        let request: LoginRequest = serde_json::from_str(r#"{"user_id":"AB1234"}"#).unwrap();
        assert_eq!(request.password, "");
    }
}
