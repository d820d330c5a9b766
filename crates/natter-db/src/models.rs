//! Database row types. These map directly to SQLite rows and are converted
//! into `natter_types` models before leaving the crate.

use anyhow::{Result, anyhow};
use chrono::{DateTime, SecondsFormat, Utc};
use natter_types::models::{Message, User};

pub struct UserRow {
    pub id: i64,
    pub username: String,
    pub logged_in_until: Option<String>,
}

pub struct MessageRow {
    pub id: i64,
    pub body: String,
    pub created_at: String,
    pub author: UserRow,
}

impl UserRow {
    pub fn into_user(self) -> Result<User> {
        let logged_in_until = self
            .logged_in_until
            .as_deref()
            .map(parse_timestamp)
            .transpose()
            .map_err(|e| anyhow!("corrupt logged_in_until on user {}: {}", self.id, e))?;

        Ok(User {
            id: self.id,
            username: self.username,
            logged_in_until,
        })
    }
}

impl MessageRow {
    pub fn into_message(self) -> Result<Message> {
        let created_at = parse_timestamp(&self.created_at)
            .map_err(|e| anyhow!("corrupt created_at on message {}: {}", self.id, e))?;

        Ok(Message {
            id: self.id,
            body: self.body,
            author: self.author.into_user()?,
            created_at,
        })
    }
}

/// Timestamps are written as RFC 3339 with full sub-second precision so a
/// value read back compares equal to the one written.
pub fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

pub fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| anyhow!("unparseable timestamp '{}': {}", raw, e))
}
