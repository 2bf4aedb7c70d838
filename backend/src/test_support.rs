//! Test utilities shared by unit tests and the `tests/` suites.
//!
//! Compiled for `cfg(test)` and behind the `test-support` feature.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Local, TimeDelta, Utc};
use mockable::Clock;
use uuid::Uuid;

use crate::domain::ports::{UserPersistenceError, UserRepository};
use crate::domain::{EmailAddress, NewUser, User, UserDirectoryService, UserId, UserPatch};
use crate::inbound::http::state::HttpState;

/// In-memory [`UserRepository`] keeping rows in insertion order.
///
/// Cloning shares the underlying rows. [`InMemoryUserRepository::fail_with`]
/// makes every subsequent call fail, which lets tests exercise the 500 path.
#[derive(Clone, Default)]
pub struct InMemoryUserRepository {
    state: Arc<Mutex<StoreState>>,
}

#[derive(Default)]
struct StoreState {
    rows: Vec<User>,
    failure: Option<UserPersistenceError>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail every later call with `error`.
    pub fn fail_with(&self, error: UserPersistenceError) {
        self.lock().failure = Some(error);
    }

    /// Snapshot of the stored users.
    pub fn users(&self) -> Vec<User> {
        self.lock().rows.clone()
    }

    fn lock(&self) -> MutexGuard<'_, StoreState> {
        match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn guard(&self) -> Result<MutexGuard<'_, StoreState>, UserPersistenceError> {
        let state = self.lock();
        if let Some(error) = state.failure.clone() {
            return Err(error);
        }
        Ok(state)
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn list(&self) -> Result<Vec<User>, UserPersistenceError> {
        Ok(self.guard()?.rows.clone())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        Ok(self.guard()?.rows.iter().find(|user| user.id() == id).cloned())
    }

    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<User>, UserPersistenceError> {
        Ok(self
            .guard()?
            .rows
            .iter()
            .find(|user| user.email() == email)
            .cloned())
    }

    async fn insert(&self, user: &NewUser) -> Result<User, UserPersistenceError> {
        let created = User::new(
            UserId::from_uuid(Uuid::new_v4()),
            user.firstname.clone(),
            user.lastname.clone(),
            user.email.clone(),
        );
        self.guard()?.rows.push(created.clone());
        Ok(created)
    }

    async fn update(
        &self,
        id: &UserId,
        patch: &UserPatch,
    ) -> Result<Option<User>, UserPersistenceError> {
        let mut state = self.guard()?;
        Ok(state
            .rows
            .iter_mut()
            .find(|user| user.id() == id)
            .map(|user| {
                *user = user.apply(patch);
                user.clone()
            }))
    }

    async fn delete(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        let mut state = self.guard()?;
        let position = state.rows.iter().position(|user| user.id() == id);
        Ok(position.map(|index| state.rows.remove(index)))
    }
}

/// HTTP state wired to the real service over `repository`.
pub fn http_state_with(repository: InMemoryUserRepository) -> HttpState {
    HttpState::new(Arc::new(UserDirectoryService::new(Arc::new(repository))))
}

/// Clock that only moves when told to; clones share the same instant.
#[derive(Clone)]
pub struct MutableClock(Arc<Mutex<DateTime<Utc>>>);

impl MutableClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self(Arc::new(Mutex::new(now)))
    }

    pub fn advance(&self, delta: Duration) {
        let delta = match TimeDelta::from_std(delta) {
            Ok(delta) => delta,
            Err(error) => panic!("failed to convert Duration to TimeDelta: {error}"),
        };
        *self.lock_clock() += delta;
    }

    fn lock_clock(&self) -> MutexGuard<'_, DateTime<Utc>> {
        match self.0.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl Clock for MutableClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        *self.lock_clock()
    }
}
