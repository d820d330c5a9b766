use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    /// `None` until the user logs in for the first time.
    pub logged_in_until: Option<DateTime<Utc>>,
}

impl User {
    /// True while the session window is still open at `now`.
    pub fn session_active_at(&self, now: DateTime<Utc>) -> bool {
        match self.logged_in_until {
            Some(until) => until > now,
            None => false,
        }
    }
}

/// Messages are immutable once stored; ids are assigned by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: i64,
    pub body: String,
    pub author: User,
    pub created_at: DateTime<Utc>,
}
