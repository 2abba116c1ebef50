//! Form definitions backing the back-office routes.
//!
//! Each raw form deserialized from the request body converts into a typed
//! payload with `TryFrom`, so services only ever see validated domain values.

use thiserror::Error;
use validator::ValidationErrors;

use crate::services::ServiceError;

pub mod auth;
pub mod client_requests;
pub mod clients;
pub mod request_types;
pub mod users;

#[derive(Debug, Error)]
/// Errors that can occur when processing form data.
pub enum FormError {
    #[error("validation errors: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("Enter a valid email address.")]
    InvalidEmail,

    #[error(
        "Enter a valid username. This value may contain only letters, numbers, and @/./+/-/_ characters."
    )]
    InvalidUsername,

    #[error("This field is required.")]
    InvalidName,

    #[error("Enter a valid phone number.")]
    InvalidContactNumber,

    #[error("Enter a valid URL.")]
    InvalidUrl,

    #[error("Select a valid {0}.")]
    InvalidChoice(&'static str),

    #[error("Passwords do not match")]
    PasswordMismatch,

    #[error("malformed form body: {0}")]
    Malformed(String),
}

impl FormError {
    /// Messages suitable for rendering next to the form.
    pub fn messages(&self) -> Vec<String> {
        match self {
            FormError::Validation(errors) => {
                let mut messages = errors
                    .field_errors()
                    .into_iter()
                    .flat_map(|(field, errs)| {
                        errs.iter().map(move |err| match &err.message {
                            Some(message) => message.to_string(),
                            None => format!("{field}: invalid value"),
                        })
                    })
                    .collect::<Vec<_>>();
                messages.sort();
                messages
            }
            other => vec![other.to_string()],
        }
    }
}

impl From<FormError> for ServiceError {
    fn from(err: FormError) -> Self {
        ServiceError::Form(err.messages().join(" "))
    }
}

/// Interprets an HTML checkbox value. Absent, empty, `false`, `off` and `0`
/// are unchecked.
pub(crate) fn checkbox(value: Option<&str>) -> bool {
    match value.map(str::trim) {
        None | Some("") => false,
        Some(v) => !(v.eq_ignore_ascii_case("false") || v.eq_ignore_ascii_case("off") || v == "0"),
    }
}

/// Blank select boxes submit an empty string.
pub(crate) fn optional_field(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn checkbox_values() {
        assert!(checkbox(Some("on")));
        assert!(checkbox(Some("true")));
        assert!(!checkbox(Some("False")));
        assert!(!checkbox(Some("")));
        assert!(!checkbox(None));
    }

    #[test]
    fn optional_field_drops_blank_values() {
        assert_eq!(optional_field(Some(" 3 ".into())), Some("3".into()));
        assert_eq!(optional_field(Some("  ".into())), None);
    }
}
