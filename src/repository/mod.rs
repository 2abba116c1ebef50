use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime};

use crate::{
    db::{DbConnection, DbPool, get_connection},
    domain::{
        client::{Client, NewClient, UpdateClient},
        client_request::{
            ClientRequest, InlineRequest, NewClientRequest, RequestStatus,
            UpdateClientRequest,
        },
        request_type::{NewRequestType, RequestType},
        types::{
            ClientId, ClientName, ClientRequestId, ContentTypeId, GroupId, GroupName,
            PermissionId, RequestTypeId, UserId, Username,
        },
        user::{ContentType, Group, NewUser, Permission, UpdateUser, User},
    },
    repository::errors::RepositoryResult,
};

pub mod client;
pub mod client_request;
pub mod errors;
#[cfg(feature = "test-mocks")]
pub mod mock;
pub mod request_type;
pub mod user;

/// Diesel-backed implementation of every repository trait.
#[derive(Clone)]
pub struct DieselRepository {
    pool: DbPool,
}

impl DieselRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn conn(&self) -> RepositoryResult<DbConnection> {
        Ok(get_connection(&self.pool)?)
    }
}

#[derive(Debug, Clone)]
pub struct Pagination {
    pub page: usize,
    pub per_page: usize,
}

impl Pagination {
    pub(crate) fn offset(&self) -> i64 {
        ((self.page.max(1) - 1) * self.per_page) as i64
    }

    pub(crate) fn limit(&self) -> i64 {
        self.per_page as i64
    }
}

/// Date-hierarchy filter applied to `created_at` columns.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CreatedFilter {
    #[default]
    Any,
    Today,
    PastSevenDays,
    ThisMonth,
    ThisYear,
}

impl CreatedFilter {
    pub const ALL: [CreatedFilter; 5] = [
        CreatedFilter::Any,
        CreatedFilter::Today,
        CreatedFilter::PastSevenDays,
        CreatedFilter::ThisMonth,
        CreatedFilter::ThisYear,
    ];

    /// Query string value selecting this filter.
    pub const fn param(self) -> &'static str {
        match self {
            CreatedFilter::Any => "",
            CreatedFilter::Today => "today",
            CreatedFilter::PastSevenDays => "past_7_days",
            CreatedFilter::ThisMonth => "this_month",
            CreatedFilter::ThisYear => "this_year",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            CreatedFilter::Any => "Any date",
            CreatedFilter::Today => "Today",
            CreatedFilter::PastSevenDays => "Past 7 days",
            CreatedFilter::ThisMonth => "This month",
            CreatedFilter::ThisYear => "This year",
        }
    }

    /// Unknown values fall back to [`CreatedFilter::Any`].
    pub fn from_param(value: &str) -> Self {
        Self::ALL
            .into_iter()
            .find(|f| f.param() == value)
            .unwrap_or_default()
    }

    /// Inclusive lower bound for `created_at`, relative to `now`.
    pub fn since(self, now: NaiveDateTime) -> Option<NaiveDateTime> {
        let today = now.date();
        let start_of = |date: NaiveDate| date.and_hms_opt(0, 0, 0);
        match self {
            CreatedFilter::Any => None,
            CreatedFilter::Today => start_of(today),
            CreatedFilter::PastSevenDays => start_of(today - Duration::days(7)),
            CreatedFilter::ThisMonth => today.with_day(1).and_then(start_of),
            CreatedFilter::ThisYear => today.with_ordinal(1).and_then(start_of),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ClientListQuery {
    pub search: Option<String>,
    pub is_active: Option<bool>,
    pub created: CreatedFilter,
    pub pagination: Option<Pagination>,
}

impl ClientListQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }

    pub fn is_active(mut self, is_active: bool) -> Self {
        self.is_active = Some(is_active);
        self
    }

    pub fn created(mut self, created: CreatedFilter) -> Self {
        self.created = created;
        self
    }

    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination { page, per_page });
        self
    }
}

#[derive(Debug, Clone, Default)]
pub struct RequestTypeListQuery {
    pub search: Option<String>,
    pub pagination: Option<Pagination>,
}

impl RequestTypeListQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }

    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination { page, per_page });
        self
    }
}

#[derive(Debug, Clone, Default)]
pub struct ClientRequestListQuery {
    pub search: Option<String>,
    pub client_id: Option<ClientId>,
    pub status: Option<RequestStatus>,
    pub created: CreatedFilter,
    pub pagination: Option<Pagination>,
}

impl ClientRequestListQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }

    pub fn client(mut self, client_id: ClientId) -> Self {
        self.client_id = Some(client_id);
        self
    }

    pub fn status(mut self, status: RequestStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn created(mut self, created: CreatedFilter) -> Self {
        self.created = created;
        self
    }

    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination { page, per_page });
        self
    }
}

#[derive(Debug, Clone, Default)]
pub struct UserListQuery {
    pub search: Option<String>,
    pub is_staff: Option<bool>,
    pub is_superuser: Option<bool>,
    pub is_active: Option<bool>,
    pub pagination: Option<Pagination>,
}

impl UserListQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }

    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination { page, per_page });
        self
    }
}

pub trait ClientReader {
    fn get_client_by_id(&self, id: ClientId) -> RepositoryResult<Option<Client>>;
    fn get_client_by_name(&self, name: &ClientName) -> RepositoryResult<Option<Client>>;
    fn list_clients(&self, query: ClientListQuery) -> RepositoryResult<(usize, Vec<Client>)>;
}

pub trait ClientWriter {
    fn create_client(&self, new_client: &NewClient) -> RepositoryResult<Client>;
    fn update_client(&self, id: ClientId, updates: &UpdateClient) -> RepositoryResult<Client>;
    /// Inserts the client and its inline request, if any, in one transaction.
    fn create_client_with_request(
        &self,
        new_client: &NewClient,
        request: Option<InlineRequest>,
    ) -> RepositoryResult<Client>;
    /// Updates the client and adds its inline request, if any, in one transaction.
    fn update_client_with_request(
        &self,
        id: ClientId,
        updates: &UpdateClient,
        request: Option<InlineRequest>,
    ) -> RepositoryResult<Client>;
    /// Deletes the client together with its requests.
    fn delete_client(&self, id: ClientId) -> RepositoryResult<()>;
}

pub trait RequestTypeReader {
    fn get_request_type_by_id(&self, id: RequestTypeId) -> RepositoryResult<Option<RequestType>>;
    fn list_request_types(
        &self,
        query: RequestTypeListQuery,
    ) -> RepositoryResult<(usize, Vec<RequestType>)>;
}

pub trait RequestTypeWriter {
    fn create_request_type(&self, new_type: &NewRequestType) -> RepositoryResult<RequestType>;
    fn update_request_type(
        &self,
        id: RequestTypeId,
        updates: &NewRequestType,
    ) -> RepositoryResult<RequestType>;
    fn delete_request_type(&self, id: RequestTypeId) -> RepositoryResult<()>;
}

pub trait ClientRequestReader {
    fn get_client_request_by_id(
        &self,
        id: ClientRequestId,
    ) -> RepositoryResult<Option<ClientRequest>>;
    fn list_client_requests(
        &self,
        query: ClientRequestListQuery,
    ) -> RepositoryResult<(usize, Vec<(ClientRequest, Client, RequestType)>)>;
}

pub trait ClientRequestWriter {
    fn create_client_request(&self, request: &NewClientRequest) -> RepositoryResult<ClientRequest>;
    fn update_client_request(
        &self,
        id: ClientRequestId,
        updates: &UpdateClientRequest,
    ) -> RepositoryResult<ClientRequest>;
    fn delete_client_request(&self, id: ClientRequestId) -> RepositoryResult<()>;
    /// Sets `status` on every listed request, returning the number updated.
    fn set_client_requests_status(
        &self,
        ids: &[ClientRequestId],
        status: &RequestStatus,
    ) -> RepositoryResult<usize>;
}

pub trait UserReader {
    fn get_user_by_id(&self, id: UserId) -> RepositoryResult<Option<User>>;
    fn get_user_by_username(&self, username: &Username) -> RepositoryResult<Option<User>>;
    fn list_users(&self, query: UserListQuery) -> RepositoryResult<(usize, Vec<User>)>;
    /// Direct and group permissions as `app_label.codename` strings.
    fn list_user_permissions(&self, id: UserId) -> RepositoryResult<Vec<String>>;
    fn list_user_groups(&self, id: UserId) -> RepositoryResult<Vec<Group>>;
}

pub trait UserWriter {
    fn create_user(&self, new_user: &NewUser) -> RepositoryResult<User>;
    fn update_user(&self, id: UserId, updates: &UpdateUser) -> RepositoryResult<User>;
    fn record_login(&self, id: UserId, at: NaiveDateTime) -> RepositoryResult<()>;
    fn add_user_to_group(&self, user_id: UserId, group_id: GroupId) -> RepositoryResult<()>;
    /// Replaces the user's group memberships.
    fn set_user_groups(&self, user_id: UserId, group_ids: &[GroupId]) -> RepositoryResult<()>;
    /// Replaces the permissions granted directly to the user.
    fn set_user_permissions(
        &self,
        user_id: UserId,
        permission_ids: &[PermissionId],
    ) -> RepositoryResult<()>;
    fn delete_user(&self, id: UserId) -> RepositoryResult<()>;
    fn delete_users_by_username(&self, usernames: &[Username]) -> RepositoryResult<usize>;
}

pub trait GroupReader {
    fn get_group_by_name(&self, name: &GroupName) -> RepositoryResult<Option<Group>>;
    fn list_groups(&self) -> RepositoryResult<Vec<Group>>;
    fn list_group_permissions(&self, group_id: GroupId) -> RepositoryResult<Vec<Permission>>;
    fn group_has_permission(
        &self,
        group_id: GroupId,
        permission_id: PermissionId,
    ) -> RepositoryResult<bool>;
}

pub trait GroupWriter {
    fn get_or_create_group(&self, name: &GroupName) -> RepositoryResult<Group>;
    fn add_group_permission(
        &self,
        group_id: GroupId,
        permission_id: PermissionId,
    ) -> RepositoryResult<()>;
}

pub trait PermissionReader {
    fn get_content_type(
        &self,
        app_label: &str,
        model: &str,
    ) -> RepositoryResult<Option<ContentType>>;
    fn get_permission(
        &self,
        content_type_id: ContentTypeId,
        codename: &str,
    ) -> RepositoryResult<Option<Permission>>;
    fn list_permissions(&self) -> RepositoryResult<Vec<Permission>>;
}
