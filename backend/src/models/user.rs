// src/models/user.rs

use serde::{Deserialize, Serialize};
use validator::Validate;

/// A registered account. Immutable after creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,

    /// Unique username.
    pub username: String,

    /// Argon2 password hash.
    /// Skipped during serialization to prevent leaking sensitive data.
    #[serde(skip)]
    pub password_hash: String,
}

/// Data the store needs to create a user. The id is assigned by the store.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub password_hash: String,
}

/// Public view of a user, returned by every auth endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: i64,
    pub username: String,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
        }
    }
}

/// DTO for creating a new user (Registration).
#[derive(Debug, Deserialize, Serialize, Validate)]
pub struct RegisterRequest {
    #[validate(
        required(message = "Username is required"),
        length(
            min = 3,
            max = 50,
            message = "Username length must be between 3 and 50 characters."
        )
    )]
    pub username: Option<String>,
    #[validate(
        required(message = "Password is required"),
        length(
            min = 1,
            max = 128,
            message = "Password length must be between 1 and 128 characters."
        )
    )]
    pub password: Option<String>,
}

/// DTO for user login.
#[derive(Debug, Deserialize, Serialize, Validate)]
pub struct LoginRequest {
    #[validate(
        required(message = "Username and password are required"),
        length(min = 1, message = "Username and password are required")
    )]
    pub username: Option<String>,
    #[validate(
        required(message = "Username and password are required"),
        length(min = 1, message = "Username and password are required")
    )]
    pub password: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn password_hash_is_never_serialized() {
        let user = User {
            id: 7,
            username: "alice".to_string(),
            password_hash: "$argon2id$secret".to_string(),
        };
        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("password_hash").is_none());
        assert_eq!(json["username"], "alice");
    }

    #[test]
    fn register_rules_report_every_field() {
        let req = RegisterRequest {
            username: Some("yo".to_string()),
            password: None,
        };
        let errors = req.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("username"));
        assert!(fields.contains_key("password"));
    }

    #[test]
    fn short_passwords_are_allowed() {
        let req = RegisterRequest {
            username: Some("alice".to_string()),
            password: Some("pw1".to_string()),
        };
        assert!(req.validate().is_ok());
    }

    #[test]
    fn login_requires_both_credentials() {
        let req = LoginRequest {
            username: Some("alice".to_string()),
            password: Some(String::new()),
        };
        assert!(req.validate().is_err());

        let req = LoginRequest {
            username: Some("alice".to_string()),
            password: Some("pw1".to_string()),
        };
        assert!(req.validate().is_ok());
    }
}
