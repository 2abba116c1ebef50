use client_desk::domain::client::{NewClient, UpdateClient};
use client_desk::domain::client_request::{
    InlineRequest, NewClientRequest, RequestStatus, UpdateClientRequest,
};
use client_desk::domain::request_type::NewRequestType;
use client_desk::domain::types::{
    ClientEmail, ClientName, CompanyUrl, ContactNumber, GroupName, RequestDescription,
    RequestTypeId, RequestTypeName, UserEmail, Username,
};
use client_desk::domain::user::{NewUser, UpdateUser};
use client_desk::repository::errors::RepositoryError;
use client_desk::repository::{
    ClientListQuery, ClientReader, ClientRequestListQuery, ClientRequestReader,
    ClientRequestWriter, ClientWriter, CreatedFilter, GroupReader, GroupWriter,
    PermissionReader, RequestTypeListQuery, RequestTypeReader, RequestTypeWriter, UserListQuery,
    UserReader, UserWriter,
};

mod common;

fn new_client(name: &str, is_active: bool) -> NewClient {
    NewClient::new(
        ClientName::new(name).unwrap(),
        ClientEmail::new(format!("{name}@example.com")).unwrap(),
        ContactNumber::new("07999999").unwrap(),
        CompanyUrl::new(format!("https://{name}.example.com/")).unwrap(),
        is_active,
    )
}

fn new_type(name: &str) -> NewRequestType {
    NewRequestType::new(RequestTypeName::new(name).unwrap(), "")
}

#[test]
fn test_client_repository_crud() {
    let test_db = common::TestDb::new("test_client_repository_crud.db");
    let repo = test_db.repo();

    let alice = repo.create_client(&new_client("alice", true)).unwrap();
    let bob = repo.create_client(&new_client("bob", false)).unwrap();

    let (total, items) = repo.list_clients(ClientListQuery::new()).unwrap();
    assert_eq!(total, 2);
    assert_eq!(items.len(), 2);

    let (search_total, search_items) = repo
        .list_clients(ClientListQuery::new().search("bob"))
        .unwrap();
    assert_eq!(search_total, 1);
    assert_eq!(search_items[0].id, bob.id);

    let (active_total, active_items) = repo
        .list_clients(ClientListQuery::new().is_active(true))
        .unwrap();
    assert_eq!(active_total, 1);
    assert_eq!(active_items[0].id, alice.id);

    let (today_total, _) = repo
        .list_clients(ClientListQuery::new().created(CreatedFilter::ThisYear))
        .unwrap();
    assert_eq!(today_total, 2);

    let found = repo
        .get_client_by_name(&ClientName::new("alice").unwrap())
        .unwrap();
    assert_eq!(found.map(|c| c.id), Some(alice.id));

    let updates = UpdateClient {
        name: ClientName::new("bobby").unwrap(),
        email: bob.email.clone(),
        contact_number: bob.contact_number.clone(),
        company_url: bob.company_url.clone(),
        is_active: true,
    };
    let updated = repo.update_client(bob.id, &updates).unwrap();
    assert_eq!(updated.name.as_str(), "bobby");
    assert!(updated.is_active);

    repo.delete_client(alice.id).unwrap();
    assert!(repo.get_client_by_id(alice.id).unwrap().is_none());
    assert!(matches!(
        repo.delete_client(alice.id),
        Err(RepositoryError::NotFound)
    ));

    let (page_total, page_items) = repo
        .list_clients(ClientListQuery::new().paginate(1, 1))
        .unwrap();
    assert_eq!(page_total, 1);
    assert_eq!(page_items[0].name.as_str(), "bobby");
}

#[test]
fn test_request_type_repository_crud() {
    let test_db = common::TestDb::new("test_request_type_repository_crud.db");
    let repo = test_db.repo();

    let support = repo.create_request_type(&new_type("Support")).unwrap();
    repo.create_request_type(&new_type("Billing")).unwrap();

    let (total, items) = repo.list_request_types(RequestTypeListQuery::new()).unwrap();
    assert_eq!(total, 2);
    assert_eq!(items[0].name.as_str(), "Billing");

    let (_, found) = repo
        .list_request_types(RequestTypeListQuery::new().search("Supp"))
        .unwrap();
    assert_eq!(found.len(), 1);

    let updated = repo
        .update_request_type(
            support.id,
            &NewRequestType::new(RequestTypeName::new("Technical support").unwrap(), "Help"),
        )
        .unwrap();
    assert_eq!(updated.name.as_str(), "Technical support");
    assert_eq!(updated.description, "Help");

    repo.delete_request_type(support.id).unwrap();
    assert!(repo.get_request_type_by_id(support.id).unwrap().is_none());
}

#[test]
fn test_client_request_repository_crud() {
    let test_db = common::TestDb::new("test_client_request_repository_crud.db");
    let repo = test_db.repo();

    let client = repo.create_client(&new_client("vetpartners", true)).unwrap();
    let other = repo.create_client(&new_client("dcc", true)).unwrap();
    let support = repo.create_request_type(&new_type("Support")).unwrap();

    let first = repo
        .create_client_request(&NewClientRequest::new(
            client.id,
            support.id,
            RequestStatus::Pending,
            None,
        ))
        .unwrap();
    let second = repo
        .create_client_request(&NewClientRequest::new(
            other.id,
            support.id,
            RequestStatus::InProgress,
            Some(RequestDescription::new("Call back").unwrap()),
        ))
        .unwrap();

    let (total, rows) = repo
        .list_client_requests(ClientRequestListQuery::new())
        .unwrap();
    assert_eq!(total, 2);
    assert!(rows.iter().all(|(_, _, request_type)| request_type.id == support.id));

    let (_, by_client) = repo
        .list_client_requests(ClientRequestListQuery::new().client(client.id))
        .unwrap();
    assert_eq!(by_client.len(), 1);
    assert_eq!(by_client[0].0.id, first.id);

    let (_, by_status) = repo
        .list_client_requests(ClientRequestListQuery::new().status(RequestStatus::InProgress))
        .unwrap();
    assert_eq!(by_status.len(), 1);
    assert_eq!(by_status[0].0.id, second.id);

    let (_, by_search) = repo
        .list_client_requests(ClientRequestListQuery::new().search("dcc"))
        .unwrap();
    assert_eq!(by_search.len(), 1);
    assert_eq!(by_search[0].1.id, other.id);

    let updated = repo
        .update_client_request(
            first.id,
            &UpdateClientRequest::new(client.id, support.id, RequestStatus::Cancelled, None),
        )
        .unwrap();
    assert_eq!(updated.status, RequestStatus::Cancelled);
    assert!(updated.updated_at >= first.updated_at);

    let changed = repo
        .set_client_requests_status(&[first.id, second.id], &RequestStatus::Completed)
        .unwrap();
    assert_eq!(changed, 2);
    let reloaded = repo.get_client_request_by_id(second.id).unwrap().unwrap();
    assert_eq!(reloaded.status, RequestStatus::Completed);

    repo.delete_client_request(second.id).unwrap();
    assert!(repo.get_client_request_by_id(second.id).unwrap().is_none());
}

#[test]
fn test_deleting_client_removes_its_requests() {
    let test_db = common::TestDb::new("test_client_cascade.db");
    let repo = test_db.repo();

    let client = repo.create_client(&new_client("curaleaf", false)).unwrap();
    let support = repo.create_request_type(&new_type("Support")).unwrap();
    let request = repo
        .create_client_request(&NewClientRequest::new(
            client.id,
            support.id,
            RequestStatus::Pending,
            None,
        ))
        .unwrap();

    repo.delete_client(client.id).unwrap();
    assert!(repo.get_client_request_by_id(request.id).unwrap().is_none());
}

#[test]
fn test_request_type_in_use_cannot_be_deleted() {
    let test_db = common::TestDb::new("test_request_type_in_use.db");
    let repo = test_db.repo();

    let client = repo.create_client(&new_client("curaleaf", true)).unwrap();
    let support = repo.create_request_type(&new_type("Support")).unwrap();
    repo.create_client_request(&NewClientRequest::new(
        client.id,
        support.id,
        RequestStatus::Pending,
        None,
    ))
    .unwrap();

    let result = repo.delete_request_type(support.id);
    assert!(matches!(result, Err(RepositoryError::ConstraintViolation(_))));
    assert!(repo.get_request_type_by_id(support.id).unwrap().is_some());
}

#[test]
fn test_client_with_request_is_written_atomically() {
    let test_db = common::TestDb::new("test_client_with_request.db");
    let repo = test_db.repo();
    let support = repo.create_request_type(&new_type("Support")).unwrap();

    let client = repo
        .create_client_with_request(
            &new_client("dcc", true),
            Some(InlineRequest {
                request_type_id: support.id,
                status: RequestStatus::InProgress,
            }),
        )
        .unwrap();
    let (_, rows) = repo
        .list_client_requests(ClientRequestListQuery::new().client(client.id))
        .unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].0.status, RequestStatus::InProgress);

    let missing_type = InlineRequest {
        request_type_id: RequestTypeId::new(9999).unwrap(),
        status: RequestStatus::Pending,
    };
    let result =
        repo.create_client_with_request(&new_client("orphan", true), Some(missing_type.clone()));
    assert!(matches!(result, Err(RepositoryError::ConstraintViolation(_))));
    assert!(
        repo.get_client_by_name(&ClientName::new("orphan").unwrap())
            .unwrap()
            .is_none()
    );

    let updates = UpdateClient {
        name: ClientName::new("renamed").unwrap(),
        email: client.email.clone(),
        contact_number: client.contact_number.clone(),
        company_url: client.company_url.clone(),
        is_active: false,
    };
    let result = repo.update_client_with_request(client.id, &updates, Some(missing_type));
    assert!(matches!(result, Err(RepositoryError::ConstraintViolation(_))));
    let unchanged = repo.get_client_by_id(client.id).unwrap().unwrap();
    assert_eq!(unchanged.name.as_str(), "dcc");
    assert!(unchanged.is_active);
}

#[test]
fn test_user_repository_crud() {
    let test_db = common::TestDb::new("test_user_repository_crud.db");
    let repo = test_db.repo();

    let user = repo
        .create_user(
            &NewUser::new(
                Username::new("carol").unwrap(),
                Some(UserEmail::new("carol@example.com").unwrap()),
                "hash".to_string(),
            )
            .staff(true),
        )
        .unwrap();
    repo.create_user(&NewUser::new(
        Username::new("dave").unwrap(),
        None,
        "hash".to_string(),
    ))
    .unwrap();

    let duplicate = repo.create_user(&NewUser::new(
        Username::new("carol").unwrap(),
        None,
        "hash".to_string(),
    ));
    assert!(matches!(duplicate, Err(RepositoryError::ConstraintViolation(_))));

    let (total, users) = repo.list_users(UserListQuery::new()).unwrap();
    assert_eq!(total, 2);
    assert_eq!(users[0].username.as_str(), "carol");

    let staff_query = UserListQuery {
        is_staff: Some(true),
        ..UserListQuery::new()
    };
    let (staff_total, _) = repo.list_users(staff_query).unwrap();
    assert_eq!(staff_total, 1);

    let updated = repo
        .update_user(
            user.id,
            &UpdateUser {
                email: None,
                is_active: false,
                is_staff: true,
                is_superuser: false,
            },
        )
        .unwrap();
    assert!(!updated.is_active);
    assert!(updated.email.is_none());

    let deleted = repo
        .delete_users_by_username(&[Username::new("dave").unwrap(), Username::new("zed").unwrap()])
        .unwrap();
    assert_eq!(deleted, 1);

    repo.delete_user(user.id).unwrap();
    assert!(repo.get_user_by_id(user.id).unwrap().is_none());
}

#[test]
fn test_group_permissions_flow_to_members() {
    let test_db = common::TestDb::new("test_group_permissions.db");
    let repo = test_db.repo();

    let user = repo
        .create_user(
            &NewUser::new(Username::new("erin").unwrap(), None, "hash".to_string()).staff(true),
        )
        .unwrap();
    let group = repo
        .get_or_create_group(&GroupName::new("Editors").unwrap())
        .unwrap();
    let again = repo
        .get_or_create_group(&GroupName::new("Editors").unwrap())
        .unwrap();
    assert_eq!(group.id, again.id);

    let content_type = repo.get_content_type("main", "client").unwrap().unwrap();
    let permission = repo
        .get_permission(content_type.id, "view_client")
        .unwrap()
        .unwrap();
    assert!(!repo.group_has_permission(group.id, permission.id).unwrap());
    repo.add_group_permission(group.id, permission.id).unwrap();
    assert!(repo.group_has_permission(group.id, permission.id).unwrap());

    repo.add_user_to_group(user.id, group.id).unwrap();
    assert_eq!(
        repo.list_user_permissions(user.id).unwrap(),
        vec!["main.view_client".to_string()]
    );
    assert_eq!(repo.list_user_groups(user.id).unwrap(), vec![group.clone()]);

    repo.set_user_groups(user.id, &[]).unwrap();
    assert!(repo.list_user_permissions(user.id).unwrap().is_empty());

    repo.set_user_permissions(user.id, &[permission.id]).unwrap();
    assert_eq!(
        repo.list_user_permissions(user.id).unwrap(),
        vec!["main.view_client".to_string()]
    );

    // Six content types with four actions each.
    assert_eq!(repo.list_permissions().unwrap().len(), 24);
}
