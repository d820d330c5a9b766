use anyhow::Result;
use rusqlite::Connection;
use tracing::info;

/// Creates the tables the controller needs. Safe to run on every start.
pub fn run(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS users (
            id               INTEGER PRIMARY KEY AUTOINCREMENT,
            username         TEXT NOT NULL UNIQUE,
            logged_in_until  TEXT
        );

        CREATE TABLE IF NOT EXISTS messages (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            body        TEXT NOT NULL,
            author_id   INTEGER NOT NULL REFERENCES users(id),
            created_at  TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_messages_author
            ON messages(author_id);
        ",
    )?;

    info!("Database migrations complete");
    Ok(())
}
