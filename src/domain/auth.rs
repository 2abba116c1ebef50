//! Authorization vocabulary: the models exposed in the admin panel, the
//! actions permissions grant on them and the signed-in user with its
//! resolved permission set.

use std::collections::BTreeSet;
use std::fmt::Display;

use serde::Serialize;

use crate::domain::types::{UserId, Username};
use crate::domain::user::User;

/// Models registered with the admin panel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum AdminModel {
    Client,
    RequestType,
    ClientRequest,
    User,
}

impl AdminModel {
    /// Registration order, used for the admin index.
    pub const ALL: [AdminModel; 4] = [
        AdminModel::Client,
        AdminModel::ClientRequest,
        AdminModel::RequestType,
        AdminModel::User,
    ];

    pub const fn app_label(self) -> &'static str {
        match self {
            AdminModel::User => crate::AUTH_APP_LABEL,
            _ => crate::MAIN_APP_LABEL,
        }
    }

    /// Lower-case model name as used in content types and urls.
    pub const fn model_name(self) -> &'static str {
        match self {
            AdminModel::Client => "client",
            AdminModel::RequestType => "requesttype",
            AdminModel::ClientRequest => "clientrequest",
            AdminModel::User => "user",
        }
    }

    pub const fn verbose_name(self) -> &'static str {
        match self {
            AdminModel::Client => "client",
            AdminModel::RequestType => "request type",
            AdminModel::ClientRequest => "client request",
            AdminModel::User => "user",
        }
    }

    pub const fn verbose_name_plural(self) -> &'static str {
        match self {
            AdminModel::Client => "clients",
            AdminModel::RequestType => "request types",
            AdminModel::ClientRequest => "client requests",
            AdminModel::User => "users",
        }
    }

    /// Base url of the model's changelist.
    pub fn admin_url(self) -> String {
        format!("/admin/{}/{}/", self.app_label(), self.model_name())
    }

    pub fn from_path(app_label: &str, model_name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|m| m.app_label() == app_label && m.model_name() == model_name)
    }
}

/// Action a model permission grants.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum PermissionAction {
    View,
    Add,
    Change,
    Delete,
}

impl PermissionAction {
    pub const ALL: [PermissionAction; 4] = [
        PermissionAction::Add,
        PermissionAction::Change,
        PermissionAction::Delete,
        PermissionAction::View,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            PermissionAction::View => "view",
            PermissionAction::Add => "add",
            PermissionAction::Change => "change",
            PermissionAction::Delete => "delete",
        }
    }

    /// Codename of the permission for `model`, e.g. `view_client`.
    pub fn codename(self, model: &str) -> String {
        format!("{}_{model}", self.as_str())
    }

    /// Fully qualified permission, e.g. `main.view_client`.
    pub fn perm(self, model: AdminModel) -> String {
        format!("{}.{}", model.app_label(), self.codename(model.model_name()))
    }
}

impl Display for PermissionAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Signed-in account together with every permission it holds, directly or
/// through its groups, as `app_label.codename` strings.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct AuthenticatedUser {
    pub id: UserId,
    pub username: Username,
    pub is_active: bool,
    pub is_staff: bool,
    pub is_superuser: bool,
    pub permissions: BTreeSet<String>,
}

impl AuthenticatedUser {
    pub fn new(user: &User, permissions: impl IntoIterator<Item = String>) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            is_active: user.is_active,
            is_staff: user.is_staff,
            is_superuser: user.is_superuser,
            permissions: permissions.into_iter().collect(),
        }
    }

    /// Active superusers hold every permission; inactive users hold none.
    pub fn has_perm(&self, perm: &str) -> bool {
        if !self.is_active {
            return false;
        }
        self.is_superuser || self.permissions.contains(perm)
    }

    pub fn can(&self, action: PermissionAction, model: AdminModel) -> bool {
        self.has_perm(&action.perm(model))
    }

    /// Whether any permission of `app_label` is held.
    pub fn has_module_perms(&self, app_label: &str) -> bool {
        if !self.is_active {
            return false;
        }
        let prefix = format!("{app_label}.");
        self.is_superuser || self.permissions.iter().any(|p| p.starts_with(&prefix))
    }

    /// Only active staff may enter the admin panel.
    pub fn is_admin_member(&self) -> bool {
        self.is_active && self.is_staff
    }
}
