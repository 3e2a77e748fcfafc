use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub email_verified_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// Path of the avatar relative to the public storage root
    pub image: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The fields a new user row may be created with.
#[derive(Debug, Clone, PartialEq)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub image: String,
}

impl NewUser {
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        password_hash: impl Into<String>,
        image: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            password_hash: password_hash.into(),
            image: image.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_hash_is_never_serialized() {
        let now = Utc::now();
        let user = User {
            id: 7,
            name: "Doe".to_string(),
            email: "doe@example.com".to_string(),
            email_verified_at: None,
            password_hash: "$argon2id$secret".to_string(),
            image: "avatars/doe.png".to_string(),
            created_at: now,
            updated_at: now,
        };

        let value = serde_json::to_value(&user).expect("user serializes");
        let object = value.as_object().expect("user is a JSON object");

        assert!(!object.contains_key("password_hash"));
        assert!(!object.contains_key("password"));
        assert_eq!(object["email"], "doe@example.com");
        assert!(object["email_verified_at"].is_null());
    }
}
