//! Users API handlers.
//!
//! ```text
//! GET    /api/users
//! GET    /api/users/{id}
//! POST   /api/users       {"firstname":"Jo","lastname":"Li","email":"jo@x.com"}
//! PUT    /api/users/{id}  {"firstname":"Jon"}
//! DELETE /api/users/{id}
//! ```
//!
//! Successful responses wrap records as `{"users": [...]}` or `{"user": {...}}`.

use actix_web::{HttpResponse, delete, get, post, put, web};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::{
    EmailAddress, Error, FirstName, LastName, NewUser, User, UserPatch, UserValidationError,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::error::{ErrorBody, MALFORMED_BODY_MESSAGE};
use crate::inbound::http::schemas::UserSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{Rule, first_violation, invalid_field, parse_user_id};

/// Request body for `POST /api/users`.
///
/// Fields are optional at the wire level so a missing field is reported by
/// the validation chain rather than as a malformed body.
#[derive(Debug, Default, Deserialize, Serialize, utoipa::ToSchema)]
pub struct CreateUserRequest {
    #[schema(example = "Jo")]
    pub firstname: Option<String>,
    #[schema(example = "Li")]
    pub lastname: Option<String>,
    #[schema(example = "jo@x.com")]
    pub email: Option<String>,
}

impl CreateUserRequest {
    fn into_new_user(self) -> ApiResult<NewUser> {
        first_violation(&[
            Rule::Required(
                self.firstname.as_deref(),
                UserValidationError::FirstNameRequired,
            ),
            Rule::Required(
                self.lastname.as_deref(),
                UserValidationError::LastNameRequired,
            ),
            Rule::Email(self.email.as_deref(), UserValidationError::EmailInvalid),
        ])?;
        Ok(NewUser {
            firstname: FirstName::new(self.firstname.unwrap_or_default())
                .map_err(invalid_field)?,
            lastname: LastName::new(self.lastname.unwrap_or_default()).map_err(invalid_field)?,
            email: EmailAddress::new(self.email.unwrap_or_default()).map_err(invalid_field)?,
        })
    }
}

/// Request body for `PUT /api/users/{id}`.
///
/// Only these three keys are accepted; any other key rejects the request.
#[derive(Debug, Default, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(deny_unknown_fields)]
pub struct UpdateUserRequest {
    #[schema(example = "Jon")]
    pub firstname: Option<String>,
    pub lastname: Option<String>,
    pub email: Option<String>,
}

impl UpdateUserRequest {
    /// Decode a raw update body; an empty body is an empty update.
    fn from_body(body: &[u8]) -> ApiResult<Self> {
        if body.trim_ascii().is_empty() {
            return Ok(Self::default());
        }
        serde_json::from_slice(body).map_err(|err| {
            debug!(error = %err, "rejecting update body");
            Error::invalid_request(MALFORMED_BODY_MESSAGE)
        })
    }

    fn into_patch(self) -> ApiResult<UserPatch> {
        first_violation(&[
            Rule::NotBlank(
                self.firstname.as_deref(),
                UserValidationError::FirstNameRequired,
            ),
            Rule::NotBlank(
                self.lastname.as_deref(),
                UserValidationError::LastNameRequired,
            ),
            Rule::OptionalEmail(self.email.as_deref(), UserValidationError::EmailInvalid),
        ])?;
        Ok(UserPatch {
            firstname: self
                .firstname
                .map(FirstName::new)
                .transpose()
                .map_err(invalid_field)?,
            lastname: self
                .lastname
                .map(LastName::new)
                .transpose()
                .map_err(invalid_field)?,
            email: self
                .email
                .map(EmailAddress::new)
                .transpose()
                .map_err(invalid_field)?,
        })
    }
}

/// Envelope for a single user.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct UserEnvelope {
    #[schema(value_type = UserSchema)]
    pub user: User,
}

/// Envelope for the user list.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct UsersEnvelope {
    #[schema(value_type = Vec<UserSchema>)]
    pub users: Vec<User>,
}

/// List every user in insertion order.
#[utoipa::path(
    get,
    path = "/api/users",
    responses(
        (status = 200, description = "All users", body = UsersEnvelope),
        (status = 500, description = "Internal server error", body = ErrorBody)
    ),
    tags = ["users"],
    operation_id = "listUsers"
)]
#[get("/users")]
pub async fn list_users(state: web::Data<HttpState>) -> ApiResult<web::Json<UsersEnvelope>> {
    let users = state.users.list_users().await?;
    Ok(web::Json(UsersEnvelope { users }))
}

/// Fetch one user.
#[utoipa::path(
    get,
    path = "/api/users/{id}",
    params(("id" = String, Path, description = "User identifier (UUID)")),
    responses(
        (status = 200, description = "The user", body = UserEnvelope),
        (status = 400, description = "Malformed identifier", body = ErrorBody),
        (status = 404, description = "No such user", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody)
    ),
    tags = ["users"],
    operation_id = "getUser"
)]
#[get("/users/{id}")]
pub async fn get_user(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<UserEnvelope>> {
    let id = parse_user_id(&path)?;
    let user = state.users.get_user(&id).await?;
    Ok(web::Json(UserEnvelope { user }))
}

/// Create a user; the email must not be taken.
#[utoipa::path(
    post,
    path = "/api/users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created", body = UserEnvelope),
        (status = 400, description = "Validation failed", body = ErrorBody),
        (status = 409, description = "Email already in use", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody)
    ),
    tags = ["users"],
    operation_id = "createUser"
)]
#[post("/users")]
pub async fn create_user(
    state: web::Data<HttpState>,
    payload: web::Json<CreateUserRequest>,
) -> ApiResult<HttpResponse> {
    let new_user = payload.into_inner().into_new_user()?;
    let user = state.users.create_user(new_user).await?;
    Ok(HttpResponse::Created().json(UserEnvelope { user }))
}

/// Partially update a user.
#[utoipa::path(
    put,
    path = "/api/users/{id}",
    params(("id" = String, Path, description = "User identifier (UUID)")),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "Updated user", body = UserEnvelope),
        (status = 400, description = "Validation failed", body = ErrorBody),
        (status = 404, description = "No such user", body = ErrorBody),
        (status = 409, description = "Email held by another user", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody)
    ),
    tags = ["users"],
    operation_id = "updateUser"
)]
#[put("/users/{id}")]
pub async fn update_user(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    body: web::Bytes,
) -> ApiResult<web::Json<UserEnvelope>> {
    let id = parse_user_id(&path)?;
    let patch = UpdateUserRequest::from_body(&body)?.into_patch()?;
    let user = state.users.update_user(&id, patch).await?;
    Ok(web::Json(UserEnvelope { user }))
}

/// Delete a user and return the removed record.
#[utoipa::path(
    delete,
    path = "/api/users/{id}",
    params(("id" = String, Path, description = "User identifier (UUID)")),
    responses(
        (status = 200, description = "Deleted user", body = UserEnvelope),
        (status = 400, description = "Malformed identifier", body = ErrorBody),
        (status = 404, description = "No such user", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody)
    ),
    tags = ["users"],
    operation_id = "deleteUser"
)]
#[delete("/users/{id}")]
pub async fn delete_user(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<UserEnvelope>> {
    let id = parse_user_id(&path)?;
    let user = state.users.delete_user(&id).await?;
    Ok(web::Json(UserEnvelope { user }))
}

/// Register the user routes on a scope.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(list_users)
        .service(get_user)
        .service(create_user)
        .service(update_user)
        .service(delete_user);
}

#[cfg(test)]
mod tests;
