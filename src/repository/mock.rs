//! Mock repository implementations for isolating services in tests.

use chrono::NaiveDateTime;
use mockall::mock;

use crate::domain::client::{Client, NewClient, UpdateClient};
use crate::domain::client_request::{
    ClientRequest, InlineRequest, NewClientRequest, RequestStatus, UpdateClientRequest,
};
use crate::domain::request_type::{NewRequestType, RequestType};
use crate::domain::types::{
    ClientId, ClientName, ClientRequestId, ContentTypeId, GroupId, GroupName, PermissionId,
    RequestTypeId, UserId, Username,
};
use crate::domain::user::{ContentType, Group, NewUser, Permission, UpdateUser, User};
use crate::repository::errors::RepositoryResult;
use crate::repository::{
    ClientListQuery, ClientReader, ClientRequestListQuery, ClientRequestReader,
    ClientRequestWriter, ClientWriter, GroupReader, GroupWriter, PermissionReader,
    RequestTypeListQuery, RequestTypeReader, RequestTypeWriter, UserListQuery, UserReader,
    UserWriter,
};

mock! {
    pub Repository {}

    impl ClientReader for Repository {
        fn get_client_by_id(&self, id: ClientId) -> RepositoryResult<Option<Client>>;
        fn get_client_by_name(&self, name: &ClientName) -> RepositoryResult<Option<Client>>;
        fn list_clients(&self, query: ClientListQuery) -> RepositoryResult<(usize, Vec<Client>)>;
    }

    impl ClientWriter for Repository {
        fn create_client(&self, new_client: &NewClient) -> RepositoryResult<Client>;
        fn update_client(&self, id: ClientId, updates: &UpdateClient) -> RepositoryResult<Client>;
        fn create_client_with_request(
            &self,
            new_client: &NewClient,
            request: Option<InlineRequest>,
        ) -> RepositoryResult<Client>;
        fn update_client_with_request(
            &self,
            id: ClientId,
            updates: &UpdateClient,
            request: Option<InlineRequest>,
        ) -> RepositoryResult<Client>;
        fn delete_client(&self, id: ClientId) -> RepositoryResult<()>;
    }

    impl RequestTypeReader for Repository {
        fn get_request_type_by_id(&self, id: RequestTypeId) -> RepositoryResult<Option<RequestType>>;
        fn list_request_types(
            &self,
            query: RequestTypeListQuery,
        ) -> RepositoryResult<(usize, Vec<RequestType>)>;
    }

    impl RequestTypeWriter for Repository {
        fn create_request_type(&self, new_type: &NewRequestType) -> RepositoryResult<RequestType>;
        fn update_request_type(
            &self,
            id: RequestTypeId,
            updates: &NewRequestType,
        ) -> RepositoryResult<RequestType>;
        fn delete_request_type(&self, id: RequestTypeId) -> RepositoryResult<()>;
    }

    impl ClientRequestReader for Repository {
        fn get_client_request_by_id(
            &self,
            id: ClientRequestId,
        ) -> RepositoryResult<Option<ClientRequest>>;
        fn list_client_requests(
            &self,
            query: ClientRequestListQuery,
        ) -> RepositoryResult<(usize, Vec<(ClientRequest, Client, RequestType)>)>;
    }

    impl ClientRequestWriter for Repository {
        fn create_client_request(&self, request: &NewClientRequest) -> RepositoryResult<ClientRequest>;
        fn update_client_request(
            &self,
            id: ClientRequestId,
            updates: &UpdateClientRequest,
        ) -> RepositoryResult<ClientRequest>;
        fn delete_client_request(&self, id: ClientRequestId) -> RepositoryResult<()>;
        fn set_client_requests_status(
            &self,
            ids: &[ClientRequestId],
            status: &RequestStatus,
        ) -> RepositoryResult<usize>;
    }

    impl UserReader for Repository {
        fn get_user_by_id(&self, id: UserId) -> RepositoryResult<Option<User>>;
        fn get_user_by_username(&self, username: &Username) -> RepositoryResult<Option<User>>;
        fn list_users(&self, query: UserListQuery) -> RepositoryResult<(usize, Vec<User>)>;
        fn list_user_permissions(&self, id: UserId) -> RepositoryResult<Vec<String>>;
        fn list_user_groups(&self, id: UserId) -> RepositoryResult<Vec<Group>>;
    }

    impl UserWriter for Repository {
        fn create_user(&self, new_user: &NewUser) -> RepositoryResult<User>;
        fn update_user(&self, id: UserId, updates: &UpdateUser) -> RepositoryResult<User>;
        fn record_login(&self, id: UserId, at: NaiveDateTime) -> RepositoryResult<()>;
        fn add_user_to_group(&self, user_id: UserId, group_id: GroupId) -> RepositoryResult<()>;
        fn set_user_groups(&self, user_id: UserId, group_ids: &[GroupId]) -> RepositoryResult<()>;
        fn set_user_permissions(
            &self,
            user_id: UserId,
            permission_ids: &[PermissionId],
        ) -> RepositoryResult<()>;
        fn delete_user(&self, id: UserId) -> RepositoryResult<()>;
        fn delete_users_by_username(&self, usernames: &[Username]) -> RepositoryResult<usize>;
    }

    impl GroupReader for Repository {
        fn get_group_by_name(&self, name: &GroupName) -> RepositoryResult<Option<Group>>;
        fn list_groups(&self) -> RepositoryResult<Vec<Group>>;
        fn list_group_permissions(&self, group_id: GroupId) -> RepositoryResult<Vec<Permission>>;
        fn group_has_permission(
            &self,
            group_id: GroupId,
            permission_id: PermissionId,
        ) -> RepositoryResult<bool>;
    }

    impl GroupWriter for Repository {
        fn get_or_create_group(&self, name: &GroupName) -> RepositoryResult<Group>;
        fn add_group_permission(
            &self,
            group_id: GroupId,
            permission_id: PermissionId,
        ) -> RepositoryResult<()>;
    }

    impl PermissionReader for Repository {
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
}
