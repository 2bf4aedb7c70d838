//! Request validation chain.
//!
//! Handlers declare an ordered list of [`Rule`]s; [`first_violation`] reports
//! the first one that fails and ignores the rest. Rules only check presence
//! and format. Length limits are enforced when the domain newtypes are built,
//! which happens after the chain passes.

use crate::domain::{EmailAddress, Error, UserId, UserValidationError};

/// A single declared field rule.
#[derive(Debug, Clone, Copy)]
pub enum Rule<'a> {
    /// Field must be present and not blank.
    Required(Option<&'a str>, UserValidationError),
    /// Field must be present and look like an email address.
    Email(Option<&'a str>, UserValidationError),
    /// Field may be absent; if present it must not be blank.
    NotBlank(Option<&'a str>, UserValidationError),
    /// Field may be absent; if present it must look like an email address.
    OptionalEmail(Option<&'a str>, UserValidationError),
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

fn is_malformed_email(value: &str) -> bool {
    matches!(
        EmailAddress::new(value),
        Err(UserValidationError::EmailInvalid)
    )
}

impl Rule<'_> {
    fn violation(self) -> Option<UserValidationError> {
        let failed = match self {
            Self::Required(value, _) => value.is_none_or(is_blank),
            Self::Email(value, _) => value.is_none_or(is_malformed_email),
            Self::NotBlank(value, _) => value.is_some_and(is_blank),
            Self::OptionalEmail(value, _) => value.is_some_and(is_malformed_email),
        };
        match self {
            Self::Required(_, err)
            | Self::Email(_, err)
            | Self::NotBlank(_, err)
            | Self::OptionalEmail(_, err) => failed.then_some(err),
        }
    }
}

/// Run `rules` in order and stop at the first failure.
///
/// # Examples
/// ```
/// use user_directory::domain::UserValidationError;
/// use user_directory::inbound::http::validation::{Rule, first_violation};
///
/// let outcome = first_violation(&[
///     Rule::Required(Some(""), UserValidationError::FirstNameRequired),
///     Rule::Email(Some("nope"), UserValidationError::EmailInvalid),
/// ]);
/// let err = outcome.expect_err("blank first name");
/// assert_eq!(err.message(), "First name is required");
/// ```
pub fn first_violation(rules: &[Rule<'_>]) -> Result<(), Error> {
    match rules.iter().find_map(|rule| rule.violation()) {
        Some(err) => Err(invalid_field(err)),
        None => Ok(()),
    }
}

/// Translate a domain validation failure into a 400 error.
pub fn invalid_field(err: UserValidationError) -> Error {
    Error::invalid_request(err.to_string())
}

/// Parse a path identifier, rejecting malformed ids before any store access.
pub fn parse_user_id(raw: &str) -> Result<UserId, Error> {
    UserId::new(raw).map_err(invalid_field)
}
