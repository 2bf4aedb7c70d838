//! User directory use-cases over a [`UserRepository`].
//!
//! The service owns the business rules that sit between validation and the
//! store: email uniqueness, existence checks and the classification of store
//! failures as internal errors.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::domain::ports::{UserDirectory, UserPersistenceError, UserRepository};
use crate::domain::{EmailAddress, Error, NewUser, User, UserId, UserPatch};

/// Message returned when another user already holds an email address.
pub const USER_EXISTS_MESSAGE: &str = "User already exists";
/// Message returned when the target user is absent.
pub const USER_MISSING_MESSAGE: &str = "User does not exist";

fn map_persistence_error(error: UserPersistenceError) -> Error {
    Error::internal(error.to_string())
}

fn user_missing() -> Error {
    Error::not_found(USER_MISSING_MESSAGE)
}

/// Domain implementation of [`UserDirectory`].
pub struct UserDirectoryService<R> {
    repository: Arc<R>,
}

impl<R> UserDirectoryService<R> {
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }
}

impl<R> UserDirectoryService<R>
where
    R: UserRepository,
{
    /// The user currently holding `email`, if any.
    async fn email_holder(&self, email: &EmailAddress) -> Result<Option<User>, Error> {
        self.repository
            .find_by_email(email)
            .await
            .map_err(map_persistence_error)
    }
}

#[async_trait]
impl<R> UserDirectory for UserDirectoryService<R>
where
    R: UserRepository,
{
    async fn list_users(&self) -> Result<Vec<User>, Error> {
        self.repository.list().await.map_err(map_persistence_error)
    }

    async fn get_user(&self, id: &UserId) -> Result<User, Error> {
        self.repository
            .find_by_id(id)
            .await
            .map_err(map_persistence_error)?
            .ok_or_else(user_missing)
    }

    async fn create_user(&self, user: NewUser) -> Result<User, Error> {
        if self.email_holder(&user.email).await?.is_some() {
            debug!(email = %user.email, "rejecting create for taken email");
            return Err(Error::conflict(USER_EXISTS_MESSAGE));
        }
        let created = self
            .repository
            .insert(&user)
            .await
            .map_err(map_persistence_error)?;
        debug!(user_id = %created.id(), "user created");
        Ok(created)
    }

    async fn update_user(&self, id: &UserId, patch: UserPatch) -> Result<User, Error> {
        let current = self.get_user(id).await?;
        if let Some(email) = &patch.email {
            let holder = self.email_holder(email).await?;
            if holder.is_some_and(|existing| existing.id() != id) {
                debug!(user_id = %id, %email, "rejecting update for taken email");
                return Err(Error::conflict(USER_EXISTS_MESSAGE));
            }
        }
        if patch.is_empty() {
            return Ok(current);
        }
        self.repository
            .update(id, &patch)
            .await
            .map_err(map_persistence_error)?
            .ok_or_else(user_missing)
    }

    async fn delete_user(&self, id: &UserId) -> Result<User, Error> {
        let removed = self
            .repository
            .delete(id)
            .await
            .map_err(map_persistence_error)?
            .ok_or_else(user_missing)?;
        debug!(user_id = %id, "user deleted");
        Ok(removed)
    }
}
