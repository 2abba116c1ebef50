//! Forms of the user admin pages.

use serde::Deserialize;

use crate::domain::types::{GroupId, UserEmail, Username};
use crate::forms::{FormError, checkbox, optional_field};

#[derive(Debug, Deserialize)]
pub struct UserAddForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub password_confirm: String,
}

pub struct UserAddPayload {
    pub username: Username,
    pub password: String,
}

impl TryFrom<UserAddForm> for UserAddPayload {
    type Error = FormError;

    fn try_from(form: UserAddForm) -> Result<Self, Self::Error> {
        let username = Username::new(form.username).map_err(|_| FormError::InvalidUsername)?;
        if form.password.is_empty() {
            return Err(FormError::InvalidName);
        }
        if form.password != form.password_confirm {
            return Err(FormError::PasswordMismatch);
        }
        Ok(Self {
            username,
            password: form.password,
        })
    }
}

/// Change page body; `groups` repeats once per ticked group.
#[derive(Debug, Deserialize)]
pub struct UserChangeForm {
    pub email: Option<String>,
    pub is_active: Option<String>,
    pub is_staff: Option<String>,
    pub is_superuser: Option<String>,
    #[serde(default)]
    pub groups: Vec<i32>,
}

pub struct UserChangePayload {
    pub email: Option<UserEmail>,
    pub is_active: bool,
    pub is_staff: bool,
    pub is_superuser: bool,
    pub groups: Vec<GroupId>,
}

impl TryFrom<&[u8]> for UserChangePayload {
    type Error = FormError;

    fn try_from(body: &[u8]) -> Result<Self, Self::Error> {
        let form: UserChangeForm =
            serde_html_form::from_bytes(body).map_err(|e| FormError::Malformed(e.to_string()))?;

        let email = optional_field(form.email)
            .map(UserEmail::new)
            .transpose()
            .map_err(|_| FormError::InvalidEmail)?;

        let groups = form
            .groups
            .into_iter()
            .map(GroupId::new)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|_| FormError::InvalidChoice("group"))?;

        Ok(Self {
            email,
            is_active: checkbox(form.is_active.as_deref()),
            is_staff: checkbox(form.is_staff.as_deref()),
            is_superuser: checkbox(form.is_superuser.as_deref()),
            groups,
        })
    }
}
