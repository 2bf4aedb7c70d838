//! Domain primitives, ports and services.
//!
//! Purpose: define the user record and its validation rules, the ports the
//! adapters plug into, and the service enforcing uniqueness and existence.
//!
//! Public surface:
//! - Error / ErrorCode: transport-agnostic failures.
//! - User and its field newtypes: validated user data.
//! - UserDirectoryService: the [`ports::UserDirectory`] implementation.

pub mod error;
pub mod ports;
pub mod trace_id;
pub mod user;
pub mod user_directory_service;

pub use self::error::{Error, ErrorCode, ErrorValidationError, TRACE_ID_HEADER};
pub use self::trace_id::TraceId;
pub use self::user::{
    EMAIL_MAX, EmailAddress, FirstName, LastName, NAME_MAX, NAME_MIN, NewUser, User, UserId,
    UserPatch, UserValidationError,
};
pub use self::user_directory_service::{
    USER_EXISTS_MESSAGE, USER_MISSING_MESSAGE, UserDirectoryService,
};
