//! DTOs shaped for the admin panel templates.

use serde::{Deserialize, Serialize};

use crate::domain::auth::{AdminModel, AuthenticatedUser, PermissionAction};
use crate::domain::client::Client;
use crate::domain::client_request::{ClientRequest, RequestStatus};
use crate::domain::request_type::RequestType;
use crate::domain::types::GroupId;
use crate::domain::user::{Group, User};
use crate::pagination::Paginated;
use crate::repository::CreatedFilter;

/// Query string accepted by every changelist. Filters a model does not
/// support are ignored.
#[derive(Debug, Default, Deserialize)]
pub struct ChangeListQuery {
    pub q: Option<String>,
    pub page: Option<usize>,
    pub is_active: Option<String>,
    pub is_staff: Option<String>,
    pub is_superuser: Option<String>,
    pub status: Option<String>,
    pub created: Option<String>,
}

impl ChangeListQuery {
    pub fn page(&self) -> usize {
        self.page.unwrap_or(1).max(1)
    }

    pub fn created(&self) -> CreatedFilter {
        self.created
            .as_deref()
            .map(CreatedFilter::from_param)
            .unwrap_or_default()
    }
}

/// Parses a yes/no filter value (`1`/`0`); anything else means "all".
pub fn bool_filter(value: Option<&str>) -> Option<bool> {
    match value {
        Some("1") => Some(true),
        Some("0") => Some(false),
        _ => None,
    }
}

/// What the current user may do with a model, for toggling buttons.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct ModelPermissions {
    pub can_view: bool,
    pub can_add: bool,
    pub can_change: bool,
    pub can_delete: bool,
}

impl ModelPermissions {
    pub fn for_user(user: &AuthenticatedUser, model: AdminModel) -> Self {
        let can = |action: PermissionAction| user.is_admin_member() && user.can(action, model);
        Self {
            can_view: can(PermissionAction::View),
            can_add: can(PermissionAction::Add),
            can_change: can(PermissionAction::Change),
            can_delete: can(PermissionAction::Delete),
        }
    }

    /// Changelists and change pages open with either view or change.
    pub fn can_view_or_change(&self) -> bool {
        self.can_view || self.can_change
    }
}

/// Row of the admin index.
#[derive(Debug, Serialize)]
pub struct AdminIndexEntry {
    pub app_label: &'static str,
    pub name: &'static str,
    pub url: String,
    pub perms: ModelPermissions,
}

#[derive(Debug)]
pub struct AdminIndexData {
    pub models: Vec<AdminIndexEntry>,
}

#[derive(Debug)]
pub struct ClientListPageData {
    pub clients: Paginated<Client>,
    pub search: Option<String>,
    pub is_active: Option<bool>,
    pub created: CreatedFilter,
    pub perms: ModelPermissions,
}

/// Request shown inline on the client change page.
#[derive(Debug, Serialize)]
pub struct InlineRequestRow {
    pub request: ClientRequest,
    pub request_type: RequestType,
}

#[derive(Debug)]
pub struct ClientFormPageData {
    /// `None` on the add page.
    pub client: Option<Client>,
    pub requests: Vec<InlineRequestRow>,
    /// Choices for the extra inline request.
    pub request_types: Vec<RequestType>,
    pub perms: ModelPermissions,
    pub can_add_request: bool,
}

#[derive(Debug)]
pub struct ClientDeletePageData {
    pub client: Client,
    /// Requests removed together with the client.
    pub request_count: usize,
}

#[derive(Debug)]
pub struct RequestTypeListPageData {
    pub request_types: Paginated<RequestType>,
    pub search: Option<String>,
    pub perms: ModelPermissions,
}

#[derive(Debug)]
pub struct RequestTypeFormPageData {
    pub request_type: Option<RequestType>,
    pub perms: ModelPermissions,
}

/// Changelist row with its related records resolved.
#[derive(Debug, Serialize)]
pub struct ClientRequestRow {
    pub request: ClientRequest,
    pub client: Client,
    pub request_type: RequestType,
}

#[derive(Debug)]
pub struct ClientRequestListPageData {
    pub requests: Paginated<ClientRequestRow>,
    pub search: Option<String>,
    pub status: Option<RequestStatus>,
    pub created: CreatedFilter,
    pub perms: ModelPermissions,
}

#[derive(Debug)]
pub struct ClientRequestFormPageData {
    pub request: Option<ClientRequest>,
    pub clients: Vec<Client>,
    pub request_types: Vec<RequestType>,
    pub perms: ModelPermissions,
}

#[derive(Debug)]
pub struct UserListPageData {
    pub users: Paginated<User>,
    pub search: Option<String>,
    pub is_staff: Option<bool>,
    pub is_superuser: Option<bool>,
    pub is_active: Option<bool>,
    pub perms: ModelPermissions,
}

#[derive(Debug)]
pub struct UserChangePageData {
    pub user: User,
    pub groups: Vec<Group>,
    pub member_of: Vec<GroupId>,
    pub perms: ModelPermissions,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bool_filters_parse_one_and_zero() {
        assert_eq!(bool_filter(Some("1")), Some(true));
        assert_eq!(bool_filter(Some("0")), Some(false));
        assert_eq!(bool_filter(Some("")), None);
        assert_eq!(bool_filter(None), None);
    }

    #[test]
    fn query_defaults() {
        let query = ChangeListQuery {
            page: Some(0),
            created: Some("past_7_days".into()),
            ..Default::default()
        };
        assert_eq!(query.page(), 1);
        assert_eq!(query.created(), CreatedFilter::PastSevenDays);
    }
}
