use std::sync::Arc;

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use natter_types::models::{Message, User};
use tracing::debug;

use crate::{Database, migrations};

/// Everything the controller needs from storage. Crate-private: the
/// controller is the only caller.
#[async_trait]
pub(crate) trait ChatDao: Send + Sync {
    async fn create_tables(&self) -> Result<()>;

    /// `None` when the username is already taken.
    async fn create_user(&self, username: &str) -> Result<Option<User>>;

    async fn find_users_by_username(&self, username: &str) -> Result<Vec<User>>;

    async fn update_user(&self, user: &User) -> Result<()>;

    async fn create_msg(
        &self,
        text: &str,
        author: &User,
        created_at: DateTime<Utc>,
    ) -> Result<Message>;

    async fn find_msg_by_id(&self, id: i64) -> Result<Option<Message>>;

    async fn find_all_msgs(&self) -> Result<Vec<Message>>;

    async fn delete_msg(&self, id: i64) -> Result<()>;
}

pub(crate) struct SqliteChatDao {
    db: Arc<Database>,
}

impl SqliteChatDao {
    pub(crate) fn new(db: Database) -> Self {
        Self { db: Arc::new(db) }
    }

    /// Run a blocking DB call off the async runtime.
    async fn blocking<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Database) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let db = self.db.clone();
        tokio::task::spawn_blocking(move || f(&db))
            .await
            .map_err(|e| anyhow!("spawn_blocking join error: {}", e))?
    }
}

#[async_trait]
impl ChatDao for SqliteChatDao {
    async fn create_tables(&self) -> Result<()> {
        self.blocking(|db| db.with_conn(migrations::run)).await
    }

    async fn create_user(&self, username: &str) -> Result<Option<User>> {
        let username = username.to_string();
        self.blocking(move |db| db.create_user(&username)).await
    }

    async fn find_users_by_username(&self, username: &str) -> Result<Vec<User>> {
        let username = username.to_string();
        self.blocking(move |db| db.find_users_by_username(&username)).await
    }

    async fn update_user(&self, user: &User) -> Result<()> {
        let user = user.clone();
        self.blocking(move |db| db.update_user(&user)).await
    }

    async fn create_msg(
        &self,
        text: &str,
        author: &User,
        created_at: DateTime<Utc>,
    ) -> Result<Message> {
        let text = text.to_string();
        let author_id = author.id;
        self.blocking(move |db| db.insert_message(&text, author_id, created_at))
            .await
    }

    async fn find_msg_by_id(&self, id: i64) -> Result<Option<Message>> {
        self.blocking(move |db| db.get_message(id)).await
    }

    async fn find_all_msgs(&self) -> Result<Vec<Message>> {
        self.blocking(|db| db.get_all_messages()).await
    }

    async fn delete_msg(&self, id: i64) -> Result<()> {
        let removed = self.blocking(move |db| db.delete_message(id)).await?;
        debug!(id, removed, "delete_msg");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    async fn dao() -> SqliteChatDao {
        let dao = SqliteChatDao::new(Database::open_in_memory().unwrap());
        dao.create_tables().await.unwrap();
        dao
    }

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 8, 30, 0).unwrap()
    }

    #[tokio::test]
    async fn create_tables_is_idempotent() {
        let dao = dao().await;
        dao.create_tables().await.unwrap();
        dao.create_user("alice").await.unwrap().unwrap();
        dao.create_tables().await.unwrap();
        assert_eq!(dao.find_users_by_username("alice").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn duplicate_username_is_rejected() {
        let dao = dao().await;
        assert!(dao.create_user("alice").await.unwrap().is_some());
        assert!(dao.create_user("alice").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn lookup_of_unknown_user_is_empty() {
        let dao = dao().await;
        assert!(dao.find_users_by_username("ghost").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn update_user_persists_session() {
        let dao = dao().await;
        let mut user = dao.create_user("alice").await.unwrap().unwrap();
        user.logged_in_until = Some(t0() + Duration::hours(24));
        dao.update_user(&user).await.unwrap();

        let stored = dao.find_users_by_username("alice").await.unwrap();
        assert_eq!(stored, vec![user]);
    }

    #[tokio::test]
    async fn update_of_missing_user_fails() {
        let dao = dao().await;
        let ghost = User {
            id: 99,
            username: "ghost".into(),
            logged_in_until: Some(t0()),
        };
        assert!(dao.update_user(&ghost).await.is_err());
    }

    #[tokio::test]
    async fn messages_come_back_in_insertion_order() {
        let dao = dao().await;
        let alice = dao.create_user("alice").await.unwrap().unwrap();
        let bob = dao.create_user("bob").await.unwrap().unwrap();

        let first = dao.create_msg("one", &alice, t0()).await.unwrap();
        let second = dao.create_msg("two", &bob, t0()).await.unwrap();
        let third = dao.create_msg("three", &alice, t0()).await.unwrap();
        assert!(first.id > 0 && first.id < second.id && second.id < third.id);

        let all = dao.find_all_msgs().await.unwrap();
        let bodies: Vec<_> = all.iter().map(|m| m.body.as_str()).collect();
        assert_eq!(bodies, ["one", "two", "three"]);
        assert_eq!(all[1].author, bob);
        assert_eq!(all[0].created_at, t0());
    }

    #[tokio::test]
    async fn message_for_unknown_author_violates_foreign_key() {
        let dao = dao().await;
        let ghost = User {
            id: 42,
            username: "ghost".into(),
            logged_in_until: None,
        };
        assert!(dao.create_msg("boo", &ghost, t0()).await.is_err());
    }

    #[tokio::test]
    async fn delete_is_idempotent() {
        let dao = dao().await;
        let alice = dao.create_user("alice").await.unwrap().unwrap();
        let msg = dao.create_msg("bye", &alice, t0()).await.unwrap();

        dao.delete_msg(msg.id).await.unwrap();
        dao.delete_msg(msg.id).await.unwrap();
        assert!(dao.find_msg_by_id(msg.id).await.unwrap().is_none());
    }
}
