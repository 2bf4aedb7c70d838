//! Client-side field checks.
//!
//! The checks build the same domain newtypes the server builds and report
//! violations in the server's order: presence, email format, then lengths.
//! The server stays authoritative; these only save a round trip.

use crate::client::table::{FieldChanges, UserFields};
use crate::domain::{EmailAddress, FirstName, LastName, UserValidationError};

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

fn presence(
    value: Option<&str>,
    err: UserValidationError,
) -> Result<(), UserValidationError> {
    match value {
        Some(value) if is_blank(value) => Err(err),
        _ => Ok(()),
    }
}

fn email_format(value: Option<&str>) -> Result<(), UserValidationError> {
    match value.map(EmailAddress::new) {
        Some(Err(UserValidationError::EmailInvalid)) => Err(UserValidationError::EmailInvalid),
        _ => Ok(()),
    }
}

fn check(
    firstname: Option<&str>,
    lastname: Option<&str>,
    email: Option<&str>,
) -> Result<(), UserValidationError> {
    presence(firstname, UserValidationError::FirstNameRequired)?;
    presence(lastname, UserValidationError::LastNameRequired)?;
    email_format(email)?;
    firstname.map(FirstName::new).transpose()?;
    lastname.map(LastName::new).transpose()?;
    email.map(EmailAddress::new).transpose()?;
    Ok(())
}

/// Check a complete create form.
///
/// # Examples
/// ```
/// use user_directory::client::rules::check_fields;
/// use user_directory::client::table::UserFields;
///
/// assert!(check_fields(&UserFields::new("Jo", "Li", "jo@x.com")).is_ok());
/// let err = check_fields(&UserFields::new("J", "Li", "jo@x.com")).expect_err("too short");
/// assert_eq!(err.to_string(), "First name must be between 2 and 32 characters");
/// ```
pub fn check_fields(fields: &UserFields) -> Result<(), UserValidationError> {
    check(
        Some(&fields.firstname),
        Some(&fields.lastname),
        Some(&fields.email),
    )
}

/// Check only the fields present in a partial update.
pub fn check_changes(changes: &FieldChanges) -> Result<(), UserValidationError> {
    check(
        changes.firstname.as_deref(),
        changes.lastname.as_deref(),
        changes.email.as_deref(),
    )
}
