//! OpenAPI schema definitions for domain types.
//!
//! Domain types stay free of utoipa derives; these mirrors give them a name
//! and shape in the generated document.

use utoipa::ToSchema;

/// OpenAPI schema for [`crate::domain::User`].
#[derive(ToSchema)]
#[schema(as = User)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct UserSchema {
    /// Store-generated identifier.
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    id: String,
    /// Given name, 2 to 32 characters after trimming.
    #[schema(example = "Ada", min_length = 2, max_length = 32)]
    firstname: String,
    /// Family name, 2 to 32 characters.
    #[schema(example = "Lovelace", min_length = 2, max_length = 32)]
    lastname: String,
    /// Lowercased, unique email address.
    #[schema(example = "ada@example.com", max_length = 255)]
    email: String,
}
