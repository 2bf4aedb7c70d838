//! `reqwest` implementation of [`UsersApi`].

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::client::api::{ApiFailure, UsersApi};
use crate::client::table::{FieldChanges, UserFields, UserRecord};
use crate::domain::TRACE_ID_HEADER;

#[derive(Deserialize)]
struct UserEnvelope {
    user: UserRecord,
}

#[derive(Deserialize)]
struct UsersEnvelope {
    users: Vec<UserRecord>,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: String,
}

/// Talks to a running server at `base_url`.
#[derive(Debug, Clone)]
pub struct HttpUsersApi {
    client: Client,
    base_url: Url,
}

impl HttpUsersApi {
    /// Build a client for the server at `base_url`, e.g. `http://localhost:5000`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiFailure::InvalidBaseUrl`] when `base_url` does not parse,
    /// and [`ApiFailure::NotABaseUrl`] when the URL cannot carry paths.
    pub fn new(base_url: &str) -> Result<Self, ApiFailure> {
        let base_url = Url::parse(base_url)?;
        if base_url.cannot_be_a_base() {
            return Err(ApiFailure::NotABaseUrl(base_url.into()));
        }
        Ok(Self {
            client: Client::new(),
            base_url,
        })
    }

    fn users_url(&self, id: Option<&str>) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().extend(["api", "users"]);
            if let Some(id) = id {
                segments.push(id);
            }
        }
        url
    }

    fn request(&self, method: Method, id: Option<&str>) -> RequestBuilder {
        let url = self.users_url(id);
        debug!(%method, %url, "users api request");
        self.client.request(method, url)
    }

    async fn send<T: DeserializeOwned>(builder: RequestBuilder) -> Result<T, ApiFailure> {
        let response = builder
            .send()
            .await
            .map_err(|err| ApiFailure::Transport(err.to_string()))?;
        let response = check_error(response).await?;
        response
            .json::<T>()
            .await
            .map_err(|err| ApiFailure::Decode(err.to_string()))
    }
}

async fn check_error(response: Response) -> Result<Response, ApiFailure> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let trace_id = response
        .headers()
        .get(TRACE_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(ToOwned::to_owned);
    let message = match response.json::<ErrorEnvelope>().await {
        Ok(body) => body.error,
        // Not one of ours, so fall back on the status line.
        Err(_) => status
            .canonical_reason()
            .unwrap_or("Unexpected response")
            .to_owned(),
    };
    Err(ApiFailure::Rejected {
        status: status.as_u16(),
        message,
        trace_id,
    })
}

#[async_trait]
impl UsersApi for HttpUsersApi {
    async fn list_users(&self) -> Result<Vec<UserRecord>, ApiFailure> {
        let body: UsersEnvelope = Self::send(self.request(Method::GET, None)).await?;
        Ok(body.users)
    }

    async fn get_user(&self, id: &str) -> Result<UserRecord, ApiFailure> {
        let body: UserEnvelope = Self::send(self.request(Method::GET, Some(id))).await?;
        Ok(body.user)
    }

    async fn create_user(&self, fields: &UserFields) -> Result<UserRecord, ApiFailure> {
        let body: UserEnvelope =
            Self::send(self.request(Method::POST, None).json(fields)).await?;
        Ok(body.user)
    }

    async fn update_user(
        &self,
        id: &str,
        changes: &FieldChanges,
    ) -> Result<UserRecord, ApiFailure> {
        let body: UserEnvelope =
            Self::send(self.request(Method::PUT, Some(id)).json(changes)).await?;
        Ok(body.user)
    }

    async fn delete_user(&self, id: &str) -> Result<UserRecord, ApiFailure> {
        let body: UserEnvelope = Self::send(self.request(Method::DELETE, Some(id))).await?;
        Ok(body.user)
    }
}
