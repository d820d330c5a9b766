use std::sync::Arc;

use anyhow::anyhow;
use chrono::Duration;
use natter_types::models::{Message, User};
use tracing::{debug, info};

use crate::clock::{Clock, SystemClock};
use crate::dao::{ChatDao, SqliteChatDao};
use crate::error::ControllerError;
use crate::{Database, DbConfig, validation};

/// How long a login keeps a user's session open.
pub const SESSION_TTL_HOURS: i64 = 24;

type Result<T> = std::result::Result<T, ControllerError>;

/// Single entry point to persistence: validates arguments, applies the
/// login/expiry policy, and delegates everything else to the DAO.
///
/// Cheap to clone; clones share the same store.
#[derive(Clone)]
pub struct Controller {
    dao: Arc<dyn ChatDao>,
    clock: Arc<dyn Clock>,
}

impl Controller {
    /// Opens the database and makes sure its tables exist.
    pub async fn create(config: &DbConfig) -> Result<Self> {
        Self::create_with_clock(config, Arc::new(SystemClock)).await
    }

    pub async fn create_with_clock(config: &DbConfig, clock: Arc<dyn Clock>) -> Result<Self> {
        let path = config.path.clone();
        let db = tokio::task::spawn_blocking(move || Database::open(&path))
            .await
            .map_err(|e| anyhow!("spawn_blocking join error: {}", e))??;
        Self::init(Arc::new(SqliteChatDao::new(db)), clock).await
    }

    pub(crate) async fn init(dao: Arc<dyn ChatDao>, clock: Arc<dyn Clock>) -> Result<Self> {
        dao.create_tables().await?;
        Ok(Self { dao, clock })
    }

    /// Creates a user with no session yet.
    pub async fn register(&self, username: &str) -> Result<User> {
        validation::username(username)?;

        let user = self
            .dao
            .create_user(username)
            .await?
            .ok_or_else(|| ControllerError::UsernameTaken(username.to_string()))?;

        info!(user_id = user.id, username, "registered user");
        Ok(user)
    }

    /// Opens a session for an existing user. `None` means no such user.
    pub async fn login(&self, username: &str) -> Result<Option<User>> {
        validation::username(username)?;

        let Some(mut user) = self.find_user(username).await? else {
            debug!(username, "login for unknown user");
            return Ok(None);
        };

        let until = self.clock.now() + Duration::hours(SESSION_TTL_HOURS);
        user.logged_in_until = Some(until);
        self.dao.update_user(&user).await?;

        info!(user_id = user.id, username, %until, "user logged in");
        Ok(Some(user))
    }

    /// The user, if their session is still open right now.
    pub async fn is_logged_in(&self, username: &str) -> Result<Option<User>> {
        validation::username(username)?;

        let user = self.find_user(username).await?;
        let now = self.clock.now();
        Ok(user.filter(|u| u.session_active_at(now)))
    }

    pub async fn add_msg(&self, msg: &str, author: &User) -> Result<Message> {
        validation::message_body(msg)?;
        validation::author(author)?;

        let created = self.dao.create_msg(msg, author, self.clock.now()).await?;
        debug!(msg_id = created.id, author_id = author.id, "message added");
        Ok(created)
    }

    pub async fn find_msg(&self, msg_id: i64) -> Result<Option<Message>> {
        validation::message_id(msg_id)?;
        Ok(self.dao.find_msg_by_id(msg_id).await?)
    }

    /// Every stored message, oldest first.
    pub async fn find_all_msgs(&self) -> Result<Vec<Message>> {
        Ok(self.dao.find_all_msgs().await?)
    }

    /// Deleting an id that does not exist is not an error.
    pub async fn delete_msg(&self, msg_id: i64) -> Result<()> {
        validation::message_id(msg_id)?;
        self.dao.delete_msg(msg_id).await?;
        debug!(msg_id, "message deleted");
        Ok(())
    }

    async fn find_user(&self, username: &str) -> Result<Option<User>> {
        let users = self.dao.find_users_by_username(username).await?;
        Ok(users.into_iter().next())
    }
}
