use natter_types::models::User;

use crate::error::ValidationError;

pub fn username(username: &str) -> Result<(), ValidationError> {
    if username.is_empty() {
        return Err(ValidationError::EmptyUsername);
    }
    if !username.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(ValidationError::InvalidUsername(username.to_string()));
    }
    Ok(())
}

pub fn message_body(body: &str) -> Result<(), ValidationError> {
    if body.is_empty() {
        return Err(ValidationError::EmptyMessage);
    }
    Ok(())
}

pub fn message_id(id: i64) -> Result<(), ValidationError> {
    if id <= 0 {
        return Err(ValidationError::InvalidMessageId(id));
    }
    Ok(())
}

/// Shape check only; the row is not looked up here. The store records the
/// message against `author.id`, so the id alone decides who the author is and
/// the returned message carries the stored user, not the username passed in.
pub fn author(author: &User) -> Result<(), ValidationError> {
    if author.id <= 0 || username(&author.username).is_err() {
        return Err(ValidationError::InvalidAuthor);
    }
    Ok(())
}
