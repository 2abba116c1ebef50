use chrono::NaiveDateTime;
use serde::Serialize;

use crate::domain::types::{
    ContentTypeId, GroupId, GroupName, PermissionId, UserEmail, UserId, Username,
};

/// Staff account able to sign in to the back-office.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct User {
    pub id: UserId,
    pub username: Username,
    pub email: Option<UserEmail>,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub is_active: bool,
    pub is_staff: bool,
    pub is_superuser: bool,
    pub date_joined: NaiveDateTime,
    pub last_login: Option<NaiveDateTime>,
}

impl User {
    /// A disabled account authenticates but may not enter the admin panel.
    /// Inactive accounts count as disabled rather than as unknown logins.
    pub fn is_disabled(&self) -> bool {
        !self.is_active || !self.is_staff
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct NewUser {
    pub username: Username,
    pub email: Option<UserEmail>,
    pub password_hash: String,
    pub is_active: bool,
    pub is_staff: bool,
    pub is_superuser: bool,
}

impl NewUser {
    /// Builds an active, non-staff account.
    #[must_use]
    pub fn new(username: Username, email: Option<UserEmail>, password_hash: String) -> Self {
        Self {
            username,
            email,
            password_hash,
            is_active: true,
            is_staff: false,
            is_superuser: false,
        }
    }

    #[must_use]
    pub fn staff(mut self, is_staff: bool) -> Self {
        self.is_staff = is_staff;
        self
    }

    /// Superusers are always staff.
    #[must_use]
    pub fn superuser(mut self) -> Self {
        self.is_superuser = true;
        self.is_staff = true;
        self
    }
}

/// Editable account attributes from the user admin page.
#[derive(Clone, Debug, PartialEq)]
pub struct UpdateUser {
    pub email: Option<UserEmail>,
    pub is_active: bool,
    pub is_staff: bool,
    pub is_superuser: bool,
}

#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct Group {
    pub id: GroupId,
    pub name: GroupName,
}

/// `(app_label, model)` pair permissions are attached to.
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct ContentType {
    pub id: ContentTypeId,
    pub app_label: String,
    pub model: String,
}

#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct Permission {
    pub id: PermissionId,
    pub content_type_id: ContentTypeId,
    pub codename: String,
    pub name: String,
}
