use chrono::{DateTime, Utc};
use rand::{distributions::Alphanumeric, Rng};
use serde::Serialize;
use sha2::{Digest, Sha256};
use sqlx::FromRow;

/// Length of the random part of a plaintext token.
const SECRET_LENGTH: usize = 40;

// ============================================================================
// PersonalAccessToken - bearer tokens (hashed)
// ============================================================================

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PersonalAccessToken {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    #[serde(skip_serializing)]
    pub token: String,
    pub last_used_at: Option<DateTime<Utc>>,
    pub expires_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PersonalAccessToken {
    pub fn is_expired(&self) -> bool {
        self.expires_at
            .map(|expires_at| expires_at <= Utc::now())
            .unwrap_or(false)
    }

    /// Compare a presented secret against the stored hash
    pub fn matches_secret(&self, secret: &str) -> bool {
        let presented = hash_secret(secret);
        let stored = self.token.as_bytes();
        // Constant-time compare of equal-length hex digests
        presented.len() == stored.len()
            && presented
                .as_bytes()
                .iter()
                .zip(stored)
                .fold(0u8, |acc, (a, b)| acc | (a ^ b))
                == 0
    }
}

/// Generate the random part of a new token
pub fn generate_secret() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(SECRET_LENGTH)
        .map(char::from)
        .collect()
}

/// Hash a token secret using SHA-256
pub fn hash_secret(secret: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(secret.as_bytes());
    hex::encode(hasher.finalize())
}

// ============================================================================
// PlainTextToken - the `{id}|{secret}` value handed to the client once
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlainTextToken {
    pub token_id: i64,
    pub secret: String,
}

impl PlainTextToken {
    pub fn new(token_id: i64, secret: impl Into<String>) -> Self {
        Self {
            token_id,
            secret: secret.into(),
        }
    }

    /// Split a presented bearer value into id and secret.
    ///
    /// Returns `None` for anything that is not `<digits>|<non-empty secret>`.
    pub fn parse(raw: &str) -> Option<Self> {
        let (id, secret) = raw.split_once('|')?;
        let token_id = id.parse::<i64>().ok()?;
        if secret.is_empty() {
            return None;
        }
        Some(Self::new(token_id, secret))
    }
}

impl std::fmt::Display for PlainTextToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}|{}", self.token_id, self.secret)
    }
}
