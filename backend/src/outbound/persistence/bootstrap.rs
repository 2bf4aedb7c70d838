//! Startup schema application.
//!
//! The statements are idempotent, so running them on every boot is safe.

use diesel_async::SimpleAsyncConnection;
use tracing::info;

use crate::domain::ports::UserPersistenceError;

use super::pool::DbPool;

const CREATE_USERS_SQL: &str =
    include_str!("../../../migrations/2025-01-01-000000_create_users/up.sql");

/// Create the users table and its indexes when absent.
///
/// # Errors
///
/// Returns a connection error when no connection can be checked out and a
/// query error when the statements fail.
pub async fn apply_schema(pool: &DbPool) -> Result<(), UserPersistenceError> {
    let mut conn = pool
        .get()
        .await
        .map_err(|err| UserPersistenceError::connection(err.message()))?;
    conn.batch_execute(CREATE_USERS_SQL)
        .await
        .map_err(|err| UserPersistenceError::query(err.to_string()))?;
    info!("users schema is in place");
    Ok(())
}
