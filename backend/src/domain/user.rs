//! User data model.
//!
//! Every field of a [`User`] is a validated newtype, so a value that made it
//! into the domain already satisfies the length and format rules. The
//! validation messages double as the user-facing error text on both the
//! server and the client.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Minimum length of a first or last name.
pub const NAME_MIN: usize = 2;
/// Maximum length of a first or last name.
pub const NAME_MAX: usize = 32;
/// Maximum length of an email address.
pub const EMAIL_MAX: usize = 255;

/// Validation errors raised by the user newtypes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum UserValidationError {
    #[error("Not a valid user id")]
    InvalidId,
    #[error("First name is required")]
    FirstNameRequired,
    #[error("First name must be between {min} and {max} characters")]
    FirstNameLength { min: usize, max: usize },
    #[error("Last name is required")]
    LastNameRequired,
    #[error("Last name must be between {min} and {max} characters")]
    LastNameLength { min: usize, max: usize },
    #[error("Email not valid")]
    EmailInvalid,
    #[error("Email must be at most {max} characters")]
    EmailTooLong { max: usize },
}

/// Store-generated user identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UserId(Uuid);

impl UserId {
    /// Parse an identifier from its textual form.
    ///
    /// # Examples
    /// ```
    /// use user_directory::domain::UserId;
    ///
    /// assert!(UserId::new("3fa85f64-5717-4562-b3fc-2c963f66afa6").is_ok());
    /// assert!(UserId::new("not-an-id").is_err());
    /// ```
    pub fn new(id: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let raw = id.as_ref();
        if raw.trim() != raw {
            return Err(UserValidationError::InvalidId);
        }
        Uuid::parse_str(raw)
            .map(Self)
            .map_err(|_| UserValidationError::InvalidId)
    }

    /// Wrap a UUID produced by the store.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

fn within_name_bounds(value: &str) -> bool {
    (NAME_MIN..=NAME_MAX).contains(&value.chars().count())
}

/// Given name, trimmed of surrounding whitespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FirstName(String);

impl FirstName {
    pub fn new(value: impl Into<String>) -> Result<Self, UserValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(UserValidationError::FirstNameRequired);
        }
        if !within_name_bounds(trimmed) {
            return Err(UserValidationError::FirstNameLength {
                min: NAME_MIN,
                max: NAME_MAX,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }
}

/// Family name, stored exactly as submitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LastName(String);

impl LastName {
    pub fn new(value: impl Into<String>) -> Result<Self, UserValidationError> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(UserValidationError::LastNameRequired);
        }
        if !within_name_bounds(&value) {
            return Err(UserValidationError::LastNameLength {
                min: NAME_MIN,
                max: NAME_MAX,
            });
        }
        Ok(Self(value))
    }
}

static EMAIL_RE: OnceLock<Regex> = OnceLock::new();

fn email_regex() -> &'static Regex {
    EMAIL_RE.get_or_init(|| {
        // Length is enforced separately; the domain part needs at least one dot.
        let pattern = r"^[a-z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-z0-9](?:[a-z0-9-]{0,61}[a-z0-9])?(?:\.[a-z0-9](?:[a-z0-9-]{0,61}[a-z0-9])?)+$";
        Regex::new(pattern).unwrap_or_else(|error| panic!("email regex failed to compile: {error}"))
    })
}

/// Email address, trimmed and lowercased.
///
/// Uniqueness is decided on this normalised form.
///
/// # Examples
/// ```
/// use user_directory::domain::EmailAddress;
///
/// let email = EmailAddress::new(" Jo@X.com ").expect("valid email");
/// assert_eq!(email.as_ref(), "jo@x.com");
/// assert!(EmailAddress::new("jo.x.com").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EmailAddress(String);

impl EmailAddress {
    pub fn new(value: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let normalised = value.as_ref().trim().to_lowercase();
        if !email_regex().is_match(&normalised) {
            return Err(UserValidationError::EmailInvalid);
        }
        if normalised.chars().count() > EMAIL_MAX {
            return Err(UserValidationError::EmailTooLong { max: EMAIL_MAX });
        }
        Ok(Self(normalised))
    }
}

macro_rules! text_newtype {
    ($($name:ident),*) => {
        $(
            impl AsRef<str> for $name {
                fn as_ref(&self) -> &str {
                    self.0.as_str()
                }
            }

            impl fmt::Display for $name {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.write_str(self.as_ref())
                }
            }

            impl From<$name> for String {
                fn from(value: $name) -> Self {
                    value.0
                }
            }
        )*
    };
}

text_newtype!(FirstName, LastName, EmailAddress);

/// A persisted user record.
///
/// Serialises as `{ "id", "firstname", "lastname", "email" }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "UserDto", into = "UserDto")]
pub struct User {
    id: UserId,
    firstname: FirstName,
    lastname: LastName,
    email: EmailAddress,
}

impl User {
    pub fn new(id: UserId, firstname: FirstName, lastname: LastName, email: EmailAddress) -> Self {
        Self {
            id,
            firstname,
            lastname,
            email,
        }
    }

    pub fn id(&self) -> &UserId {
        &self.id
    }

    pub fn firstname(&self) -> &FirstName {
        &self.firstname
    }

    pub fn lastname(&self) -> &LastName {
        &self.lastname
    }

    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Return a copy with every field present in `patch` replaced.
    #[must_use]
    pub fn apply(&self, patch: &UserPatch) -> Self {
        Self {
            id: self.id,
            firstname: patch.firstname.clone().unwrap_or_else(|| self.firstname.clone()),
            lastname: patch.lastname.clone().unwrap_or_else(|| self.lastname.clone()),
            email: patch.email.clone().unwrap_or_else(|| self.email.clone()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct UserDto {
    id: String,
    firstname: String,
    lastname: String,
    email: String,
}

impl From<User> for UserDto {
    fn from(value: User) -> Self {
        Self {
            id: value.id.to_string(),
            firstname: value.firstname.into(),
            lastname: value.lastname.into(),
            email: value.email.into(),
        }
    }
}

impl TryFrom<UserDto> for User {
    type Error = UserValidationError;

    fn try_from(value: UserDto) -> Result<Self, Self::Error> {
        Ok(Self {
            id: UserId::new(value.id)?,
            firstname: FirstName::new(value.firstname)?,
            lastname: LastName::new(value.lastname)?,
            email: EmailAddress::new(value.email)?,
        })
    }
}

/// A user awaiting insertion; the store assigns the identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub firstname: FirstName,
    pub lastname: LastName,
    pub email: EmailAddress,
}

/// Partial update of a user.
///
/// Only these three fields are updatable; anything else in a request is
/// rejected before a patch is built.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserPatch {
    pub firstname: Option<FirstName>,
    pub lastname: Option<LastName>,
    pub email: Option<EmailAddress>,
}

impl UserPatch {
    /// True when the patch changes nothing.
    pub fn is_empty(&self) -> bool {
        self.firstname.is_none() && self.lastname.is_none() && self.email.is_none()
    }
}
