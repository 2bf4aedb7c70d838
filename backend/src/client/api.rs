//! Port between the synchronizer and the users REST API.

use async_trait::async_trait;

use crate::client::table::{FieldChanges, UserFields, UserRecord};

/// Failure of a single API call.
#[derive(Debug, thiserror::Error)]
pub enum ApiFailure {
    /// The server answered with an error status and `{"error": message}`.
    #[error("{message}")]
    Rejected {
        status: u16,
        message: String,
        trace_id: Option<String>,
    },
    #[error("request failed: {0}")]
    Transport(String),
    #[error("unexpected response body: {0}")]
    Decode(String),
    #[error("invalid base URL: {0}")]
    InvalidBaseUrl(#[from] url::ParseError),
    #[error("{0} cannot be used as a base URL")]
    NotABaseUrl(String),
}

impl ApiFailure {
    /// HTTP status of a rejected call.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Rejected { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Trace id the server attached to a rejection.
    pub fn trace_id(&self) -> Option<&str> {
        match self {
            Self::Rejected { trace_id, .. } => trace_id.as_deref(),
            _ => None,
        }
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UsersApi: Send + Sync {
    async fn list_users(&self) -> Result<Vec<UserRecord>, ApiFailure>;

    async fn get_user(&self, id: &str) -> Result<UserRecord, ApiFailure>;

    async fn create_user(&self, fields: &UserFields) -> Result<UserRecord, ApiFailure>;

    async fn update_user(
        &self,
        id: &str,
        changes: &FieldChanges,
    ) -> Result<UserRecord, ApiFailure>;

    async fn delete_user(&self, id: &str) -> Result<UserRecord, ApiFailure>;
}
