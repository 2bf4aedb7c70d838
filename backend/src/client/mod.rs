//! Client side of the user directory.
//!
//! [`Synchronizer`] keeps an editable table in step with the server through
//! the [`UsersApi`] port; [`HttpUsersApi`] is the `reqwest` adapter used by
//! the `userdir` binary.

pub mod api;
pub mod http;
pub mod rules;
pub mod synchronizer;
pub mod table;

#[cfg(test)]
pub use api::MockUsersApi;
pub use api::{ApiFailure, UsersApi};
pub use http::HttpUsersApi;
pub use synchronizer::{BANNER_TTL, Banner, BannerKind, Outcome, Synchronizer};
pub use table::{Field, FieldChanges, RowMode, TableAction, TableState, UserFields, UserRecord};
