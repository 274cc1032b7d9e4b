use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Staff account as stored, including the argon2 password hash. Never
/// serialized to the wire.
#[derive(Debug, Clone, FromRow)]
pub struct UserRecord {
    pub username: String,
    pub password_hash: String,
    pub full_name: Option<String>,
    pub role: String,
    pub created_at: DateTime<Utc>,
}
