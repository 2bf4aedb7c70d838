//! Driving port for the user directory use-cases.
//!
//! Inbound adapters call this trait; errors are already classified into
//! domain [`Error`] codes so adapters only translate them.
use async_trait::async_trait;

use crate::domain::{Error, NewUser, User, UserId, UserPatch};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn list_users(&self) -> Result<Vec<User>, Error>;

    async fn get_user(&self, id: &UserId) -> Result<User, Error>;

    async fn create_user(&self, user: NewUser) -> Result<User, Error>;

    async fn update_user(&self, id: &UserId, patch: UserPatch) -> Result<User, Error>;

    async fn delete_user(&self, id: &UserId) -> Result<User, Error>;
}
