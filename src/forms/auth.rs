//! Login and self-registration forms.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::types::{UserEmail, Username};
use crate::forms::FormError;

/// Minimum password length accepted at registration.
pub const PASSWORD_MIN_LENGTH: u64 = 12;

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    /// Local path to continue to after a successful login.
    #[serde(default)]
    pub next: Option<String>,
}

/// Registration form. Echoed back to the template on failure, minus the
/// passwords.
#[derive(Debug, Deserialize, Serialize, Validate)]
pub struct RegisterForm {
    #[validate(length(
        min = 1,
        max = 150,
        message = "Required. 150 characters or fewer. Letters, digits and @/./+/-/_ only."
    ))]
    #[serde(default)]
    pub username: String,
    #[validate(email(message = "Enter a valid email address."))]
    #[serde(default)]
    pub email: String,
    #[validate(length(
        min = PASSWORD_MIN_LENGTH,
        message = "Ensure this value has at least 12 characters."
    ))]
    #[serde(default, skip_serializing)]
    pub password: String,
    #[serde(default, skip_serializing)]
    pub password_confirm: String,
}

/// Validated registration data. The password is still in clear text.
pub struct RegisterPayload {
    pub username: Username,
    pub email: UserEmail,
    pub password: String,
}

impl TryFrom<RegisterForm> for RegisterPayload {
    type Error = FormError;

    fn try_from(form: RegisterForm) -> Result<Self, Self::Error> {
        form.validate()?;

        if form.password != form.password_confirm {
            return Err(FormError::PasswordMismatch);
        }

        Ok(Self {
            username: Username::new(form.username).map_err(|_| FormError::InvalidUsername)?,
            email: UserEmail::new(form.email).map_err(|_| FormError::InvalidEmail)?,
            password: form.password,
        })
    }
}

/// Only same-site absolute paths are followed after login.
pub fn safe_next(next: Option<&str>) -> Option<&str> {
    next.map(str::trim).filter(|path| {
        path.starts_with('/') && !path.starts_with("//") && !path.contains('\\')
    })
}
