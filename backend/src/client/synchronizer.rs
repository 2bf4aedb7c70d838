//! Keeps the client table in step with the server.
//!
//! Every mutation goes to the server first; local state changes only once
//! the server answers. There is no push channel, so the table is re-fetched
//! after each successful add or update.

use std::time::Duration;

use chrono::{DateTime, Utc};
use mockable::Clock;
use tracing::{debug, warn};

use crate::client::api::{ApiFailure, UsersApi};
use crate::client::rules::{check_changes, check_fields};
use crate::client::table::{Field, TableAction, TableState, UserFields, UserRecord};

/// How long a banner stays visible.
pub const BANNER_TTL: Duration = Duration::from_secs(3);

pub const ADDED_MESSAGE: &str = "User added successfully";
pub const UPDATED_MESSAGE: &str = "User updated";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BannerKind {
    Success,
    Failure,
}

/// Transient status message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Banner {
    pub kind: BannerKind,
    pub message: String,
    shown_at: DateTime<Utc>,
}

impl Banner {
    fn visible_at(&self, now: DateTime<Utc>) -> bool {
        // A clock stepping backwards keeps the banner up.
        match (now - self.shown_at).to_std() {
            Ok(elapsed) => elapsed < BANNER_TTL,
            Err(_) => true,
        }
    }
}

/// Result of one operator action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The server accepted the change, or the read succeeded.
    Applied,
    /// Nothing needed sending.
    Unchanged,
    /// Rejected locally or by the server; the banner says why.
    Failed,
}

/// Table, create form, details panel and banner driven through a [`UsersApi`].
pub struct Synchronizer<A, C> {
    api: A,
    clock: C,
    table: TableState,
    form: UserFields,
    details: Option<UserRecord>,
    banner: Option<Banner>,
}

impl<A: UsersApi, C: Clock> Synchronizer<A, C> {
    pub fn new(api: A, clock: C) -> Self {
        Self {
            api,
            clock,
            table: TableState::default(),
            form: UserFields::default(),
            details: None,
            banner: None,
        }
    }

    pub fn table(&self) -> &TableState {
        &self.table
    }

    pub fn form(&self) -> &UserFields {
        &self.form
    }

    /// User shown in the read-only details panel.
    pub fn details(&self) -> Option<&UserRecord> {
        self.details.as_ref()
    }

    /// The banner, if it was raised less than [`BANNER_TTL`] ago.
    pub fn banner(&self) -> Option<&Banner> {
        let now = self.clock.utc();
        self.banner.as_ref().filter(|banner| banner.visible_at(now))
    }

    fn announce(&mut self, kind: BannerKind, message: impl Into<String>) {
        self.banner = Some(Banner {
            kind,
            message: message.into(),
            shown_at: self.clock.utc(),
        });
    }

    fn fail(&mut self, action: &str, message: impl Into<String>) -> Outcome {
        let message = message.into();
        warn!(action, %message, "users action failed");
        self.announce(BannerKind::Failure, message);
        Outcome::Failed
    }

    fn fail_api(&mut self, action: &str, err: &ApiFailure) -> Outcome {
        if let Some(status) = err.status() {
            debug!(
                action,
                status,
                trace_id = err.trace_id().unwrap_or("-"),
                "server rejected request"
            );
        }
        self.fail(action, err.to_string())
    }

    fn reduce(&mut self, action: TableAction) {
        self.table = std::mem::take(&mut self.table).reduce(action);
    }

    /// Replace the table with the server's current list.
    pub async fn refresh(&mut self) -> Outcome {
        match self.api.list_users().await {
            Ok(users) => {
                self.reduce(TableAction::Loaded(users));
                Outcome::Applied
            }
            Err(err) => self.fail_api("refresh", &err),
        }
    }

    pub fn set_form_field(&mut self, field: Field, value: impl Into<String>) {
        self.form.set(field, value);
    }

    /// Submit the create form.
    ///
    /// On success the form is cleared and the table re-fetched.
    pub async fn add(&mut self) -> Outcome {
        if let Err(err) = check_fields(&self.form) {
            return self.fail("add", err.to_string());
        }
        match self.api.create_user(&self.form).await {
            Ok(created) => {
                debug!(id = %created.id, "user added");
                self.form = UserFields::default();
                self.announce(BannerKind::Success, ADDED_MESSAGE);
                self.refresh().await;
                Outcome::Applied
            }
            Err(err) => self.fail_api("add", &err),
        }
    }

    pub fn begin_edit(&mut self, id: impl Into<String>) {
        self.reduce(TableAction::BeginEdit(id.into()));
    }

    /// Type into a row input; ignored unless the row is in edit mode.
    pub fn input(&mut self, id: impl Into<String>, field: Field, value: impl Into<String>) {
        self.reduce(TableAction::Input {
            id: id.into(),
            field,
            value: value.into(),
        });
    }

    pub fn cancel(&mut self) {
        self.reduce(TableAction::Cancel);
    }

    /// Send the edited row's changed fields.
    ///
    /// With no changes the row leaves edit mode and nothing is sent. A
    /// rejected update keeps the row in edit mode with its draft intact.
    pub async fn commit(&mut self) -> Outcome {
        let (Some(id), Some(changes)) = (
            self.table.editing().map(ToOwned::to_owned),
            self.table.changed_fields(),
        ) else {
            return Outcome::Unchanged;
        };
        if changes.is_empty() {
            self.reduce(TableAction::Cancel);
            return Outcome::Unchanged;
        }
        if let Err(err) = check_changes(&changes) {
            return self.fail("update", err.to_string());
        }
        match self.api.update_user(&id, &changes).await {
            Ok(updated) => {
                self.reduce(TableAction::Committed(updated));
                self.announce(BannerKind::Success, UPDATED_MESSAGE);
                self.refresh().await;
                Outcome::Applied
            }
            Err(err) => self.fail_api("update", &err),
        }
    }

    /// Delete a user; the row goes only once the server confirms.
    pub async fn delete(&mut self, id: &str) -> Outcome {
        match self.api.delete_user(id).await {
            Ok(removed) => {
                self.reduce(TableAction::Removed(id.to_owned()));
                if self.details.as_ref().is_some_and(|shown| shown.id == id) {
                    self.details = None;
                }
                self.announce(
                    BannerKind::Success,
                    format!("User with email {} was deleted", removed.fields.email),
                );
                Outcome::Applied
            }
            Err(err) => self.fail_api("delete", &err),
        }
    }

    /// Fetch one user into the details panel.
    pub async fn select(&mut self, id: &str) -> Outcome {
        match self.api.get_user(id).await {
            Ok(user) => {
                self.details = Some(user);
                Outcome::Applied
            }
            Err(err) => self.fail_api("select", &err),
        }
    }

    pub fn clear_details(&mut self) {
        self.details = None;
    }
}

#[cfg(test)]
mod tests;
