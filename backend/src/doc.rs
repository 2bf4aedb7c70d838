//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every users route and the schemas they reference. The
//! document backs Swagger UI in debug builds and is printed by the
//! `openapi-dump` binary.

use utoipa::OpenApi;

use crate::inbound::http::error::ErrorBody;
use crate::inbound::http::schemas::UserSchema;
use crate::inbound::http::users::{
    CreateUserRequest, UpdateUserRequest, UserEnvelope, UsersEnvelope,
};

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "User directory API",
        description = "Create, list, update and delete user records."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::users::list_users,
        crate::inbound::http::users::get_user,
        crate::inbound::http::users::create_user,
        crate::inbound::http::users::update_user,
        crate::inbound::http::users::delete_user,
    ),
    components(schemas(
        UserSchema,
        UserEnvelope,
        UsersEnvelope,
        CreateUserRequest,
        UpdateUserRequest,
        ErrorBody
    )),
    tags(
        (name = "users", description = "User record management")
    )
)]
pub struct ApiDoc;
