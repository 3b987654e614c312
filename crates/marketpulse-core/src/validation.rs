//! Form input validation
//!
//! Checks login, signup and password-reset input before anything is sent to
//! the authentication service. Errors are reported per field so a front end
//! can show them inline.

use chrono::NaiveDate;
use serde::Serialize;
use std::fmt;

/// Date format used by the date-of-birth field and the wire.
pub const DATE_OF_BIRTH_FORMAT: &str = "%Y-%m-%d";

/// Form field a validation error belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum FormField {
    Name,
    Email,
    Password,
    DateOfBirth,
}

impl fmt::Display for FormField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            FormField::Name => "Full Name",
            FormField::Email => "Email Address",
            FormField::Password => "Password",
            FormField::DateOfBirth => "Date of Birth",
        };
        f.write_str(label)
    }
}

/// A single inline validation message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: FormField,
    pub message: String,
}

impl FieldError {
    pub fn new(field: FormField, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validates an email address.
///
/// Accepts `local@domain` where the domain contains a dot that is neither its
/// first nor last character. Anything stricter is the server's job.
pub fn validate_email(email: &str) -> Option<FieldError> {
    let trimmed = email.trim();
    if trimmed.is_empty() {
        return Some(FieldError::new(FormField::Email, "Email is required"));
    }

    let well_formed = match trimmed.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && !trimmed.contains(char::is_whitespace)
                && domain
                    .find('.')
                    .is_some_and(|dot| dot > 0 && dot < domain.len() - 1)
                && !domain.ends_with('.')
        }
        None => false,
    };

    if well_formed {
        None
    } else {
        Some(FieldError::new(
            FormField::Email,
            format!("'{}' is not a valid email address", trimmed),
        ))
    }
}

fn validate_password(password: &str) -> Option<FieldError> {
    if password.is_empty() {
        Some(FieldError::new(FormField::Password, "Password is required"))
    } else {
        None
    }
}

fn validate_name(name: &str) -> Option<FieldError> {
    if name.trim().is_empty() {
        Some(FieldError::new(FormField::Name, "Name is required"))
    } else {
        None
    }
}

/// Validates a date of birth against `today`.
pub fn validate_date_of_birth(dob: &str, today: NaiveDate) -> Option<FieldError> {
    let trimmed = dob.trim();
    if trimmed.is_empty() {
        return Some(FieldError::new(
            FormField::DateOfBirth,
            "Date of birth is required",
        ));
    }

    match NaiveDate::parse_from_str(trimmed, DATE_OF_BIRTH_FORMAT) {
        Ok(date) if date > today => Some(FieldError::new(
            FormField::DateOfBirth,
            "Date of birth cannot be in the future",
        )),
        Ok(_) => None,
        Err(_) => Some(FieldError::new(
            FormField::DateOfBirth,
            format!("'{}' is not a valid date (use YYYY-MM-DD)", trimmed),
        )),
    }
}

/// Validates sign-in input. An empty vector means the form may be submitted.
pub fn validate_login(email: &str, password: &str) -> Vec<FieldError> {
    [validate_email(email), validate_password(password)]
        .into_iter()
        .flatten()
        .collect()
}

/// Validates sign-up input, in form order.
pub fn validate_signup(
    name: &str,
    email: &str,
    password: &str,
    date_of_birth: &str,
    today: NaiveDate,
) -> Vec<FieldError> {
    [
        validate_name(name),
        validate_email(email),
        validate_date_of_birth(date_of_birth, today),
        validate_password(password),
    ]
    .into_iter()
    .flatten()
    .collect()
}
