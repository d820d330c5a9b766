use crate::Database;
use crate::models::{MessageRow, UserRow, format_timestamp};
use anyhow::{Result, anyhow};
use chrono::{DateTime, Utc};
use natter_types::models::{Message, User};
use rusqlite::{Connection, Row};

const MESSAGE_COLUMNS: &str = "m.id, m.body, m.created_at, u.id, u.username, u.logged_in_until
     FROM messages m
     JOIN users u ON m.author_id = u.id";

impl Database {
    // -- Users --

    /// Returns `None` when the username is already taken.
    pub fn create_user(&self, username: &str) -> Result<Option<User>> {
        self.with_conn(|conn| {
            let inserted = conn.execute(
                "INSERT INTO users (username) VALUES (?1) ON CONFLICT(username) DO NOTHING",
                [username],
            )?;
            if inserted == 0 {
                return Ok(None);
            }

            Ok(Some(User {
                id: conn.last_insert_rowid(),
                username: username.to_string(),
                logged_in_until: None,
            }))
        })
    }

    pub fn find_users_by_username(&self, username: &str) -> Result<Vec<User>> {
        self.with_conn(|conn| {
            let mut stmt = conn
                .prepare("SELECT id, username, logged_in_until FROM users WHERE username = ?1")?;

            let rows = stmt
                .query_map([username], user_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;

            rows.into_iter().map(UserRow::into_user).collect()
        })
    }

    pub fn update_user(&self, user: &User) -> Result<()> {
        self.with_conn(|conn| {
            let updated = conn.execute(
                "UPDATE users SET logged_in_until = ?1 WHERE id = ?2",
                rusqlite::params![user.logged_in_until.map(format_timestamp), user.id],
            )?;
            if updated == 0 {
                return Err(anyhow!("User not found: {}", user.id));
            }
            Ok(())
        })
    }

    // -- Messages --

    pub fn insert_message(
        &self,
        body: &str,
        author_id: i64,
        created_at: DateTime<Utc>,
    ) -> Result<Message> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO messages (body, author_id, created_at) VALUES (?1, ?2, ?3)",
                rusqlite::params![body, author_id, format_timestamp(created_at)],
            )?;
            let id = conn.last_insert_rowid();

            query_message(conn, id)?.ok_or_else(|| anyhow!("Message {} vanished after insert", id))
        })
    }

    pub fn get_message(&self, id: i64) -> Result<Option<Message>> {
        self.with_conn(|conn| query_message(conn, id))
    }

    /// All messages in insertion order.
    pub fn get_all_messages(&self) -> Result<Vec<Message>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!("SELECT {MESSAGE_COLUMNS} ORDER BY m.id ASC"))?;

            let rows = stmt
                .query_map([], message_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;

            rows.into_iter().map(MessageRow::into_message).collect()
        })
    }

    /// Returns how many rows were removed (0 or 1).
    pub fn delete_message(&self, id: i64) -> Result<usize> {
        self.with_conn(|conn| Ok(conn.execute("DELETE FROM messages WHERE id = ?1", [id])?))
    }
}

fn query_message(conn: &Connection, id: i64) -> Result<Option<Message>> {
    let mut stmt = conn.prepare(&format!("SELECT {MESSAGE_COLUMNS} WHERE m.id = ?1"))?;

    let row = stmt.query_row([id], message_row).optional()?;

    row.map(MessageRow::into_message).transpose()
}

fn user_row(row: &Row<'_>) -> rusqlite::Result<UserRow> {
    Ok(UserRow {
        id: row.get(0)?,
        username: row.get(1)?,
        logged_in_until: row.get(2)?,
    })
}

fn message_row(row: &Row<'_>) -> rusqlite::Result<MessageRow> {
    Ok(MessageRow {
        id: row.get(0)?,
        body: row.get(1)?,
        created_at: row.get(2)?,
        author: UserRow {
            id: row.get(3)?,
            username: row.get(4)?,
            logged_in_until: row.get(5)?,
        },
    })
}

/// Extension trait for optional query results
trait OptionalExt<T> {
    fn optional(self) -> Result<Option<T>>;
}

impl<T> OptionalExt<T> for std::result::Result<T, rusqlite::Error> {
    fn optional(self) -> Result<Option<T>> {
        match self {
            Ok(val) => Ok(Some(val)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}
