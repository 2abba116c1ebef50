//! Client request admin pages and the "mark as completed" bulk action.

use crate::domain::auth::{AdminModel, AuthenticatedUser, PermissionAction};
use crate::domain::client_request::{
    ClientRequest, NewClientRequest, RequestStatus, UpdateClientRequest,
};
use crate::domain::types::ClientRequestId;
use crate::dto::admin::{
    ChangeListQuery, ClientRequestFormPageData, ClientRequestListPageData, ClientRequestRow,
    ModelPermissions,
};
use crate::forms::client_requests::{
    BulkAction, BulkActionPayload, ClientRequestForm, ClientRequestPayload,
};
use crate::pagination::{DEFAULT_ITEMS_PER_PAGE, Paginated};
use crate::repository::errors::RepositoryError;
use crate::repository::{
    ClientListQuery, ClientReader, ClientRequestListQuery, ClientRequestReader,
    ClientRequestWriter, RequestTypeListQuery, RequestTypeReader,
};
use crate::services::{
    ServiceError, ServiceResult, ensure_perm, ensure_view_or_change, normalize_search,
};

/// Changelist filtered by status, creation date and a search over the
/// description, client name and request type name.
pub fn list_client_requests<R>(
    repo: &R,
    user: &AuthenticatedUser,
    query: ChangeListQuery,
) -> ServiceResult<ClientRequestListPageData>
where
    R: ClientRequestReader + ?Sized,
{
    ensure_view_or_change(user, AdminModel::ClientRequest)?;

    let page = query.page();
    let created = query.created();
    let status = normalize_search(query.status).map(RequestStatus::from);
    let search = normalize_search(query.q);

    let mut list_query = ClientRequestListQuery::new()
        .created(created)
        .paginate(page, DEFAULT_ITEMS_PER_PAGE);
    if let Some(term) = &search {
        list_query = list_query.search(term.clone());
    }
    if let Some(status) = &status {
        list_query = list_query.status(status.clone());
    }

    let (total, rows) = repo.list_client_requests(list_query)?;
    let rows = rows
        .into_iter()
        .map(|(request, client, request_type)| ClientRequestRow {
            request,
            client,
            request_type,
        })
        .collect();

    Ok(ClientRequestListPageData {
        requests: Paginated::new(rows, page, total, DEFAULT_ITEMS_PER_PAGE),
        search,
        status,
        created,
        perms: ModelPermissions::for_user(user, AdminModel::ClientRequest),
    })
}

fn form_page<R>(
    repo: &R,
    user: &AuthenticatedUser,
    request: Option<ClientRequest>,
) -> ServiceResult<ClientRequestFormPageData>
where
    R: ClientReader + RequestTypeReader + ?Sized,
{
    let (_, clients) = repo.list_clients(ClientListQuery::new())?;
    let (_, request_types) = repo.list_request_types(RequestTypeListQuery::new())?;

    Ok(ClientRequestFormPageData {
        request,
        clients,
        request_types,
        perms: ModelPermissions::for_user(user, AdminModel::ClientRequest),
    })
}

pub fn load_add_client_request<R>(
    repo: &R,
    user: &AuthenticatedUser,
) -> ServiceResult<ClientRequestFormPageData>
where
    R: ClientReader + RequestTypeReader + ?Sized,
{
    ensure_perm(user, PermissionAction::Add, AdminModel::ClientRequest)?;
    form_page(repo, user, None)
}

pub fn load_client_request<R>(
    repo: &R,
    user: &AuthenticatedUser,
    request_id: i32,
) -> ServiceResult<ClientRequestFormPageData>
where
    R: ClientRequestReader + ClientReader + RequestTypeReader + ?Sized,
{
    ensure_view_or_change(user, AdminModel::ClientRequest)?;

    let request = repo
        .get_client_request_by_id(ClientRequestId::new(request_id)?)?
        .ok_or(ServiceError::NotFound)?;
    form_page(repo, user, Some(request))
}

/// Unknown client or request type ids surface as form errors.
fn choice_error(err: RepositoryError) -> ServiceError {
    match err {
        RepositoryError::ConstraintViolation(_) => ServiceError::Form(
            "Select a valid choice. That choice is not one of the available choices.".to_string(),
        ),
        other => other.into(),
    }
}

pub fn add_client_request<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: ClientRequestForm,
) -> ServiceResult<ClientRequest>
where
    R: ClientRequestWriter + ?Sized,
{
    ensure_perm(user, PermissionAction::Add, AdminModel::ClientRequest)?;

    let payload = ClientRequestPayload::try_from(form)?;
    let new_request = NewClientRequest::new(
        payload.client_id,
        payload.request_type_id,
        payload.status,
        payload.description,
    );
    let request = repo.create_client_request(&new_request).map_err(choice_error)?;

    log::info!("User {} added client request {}", user.username, request.id);
    Ok(request)
}

pub fn update_client_request<R>(
    repo: &R,
    user: &AuthenticatedUser,
    request_id: i32,
    form: ClientRequestForm,
) -> ServiceResult<ClientRequest>
where
    R: ClientRequestReader + ClientRequestWriter + ?Sized,
{
    ensure_perm(user, PermissionAction::Change, AdminModel::ClientRequest)?;

    let request_id = ClientRequestId::new(request_id)?;
    if repo.get_client_request_by_id(request_id)?.is_none() {
        return Err(ServiceError::NotFound);
    }

    let payload = ClientRequestPayload::try_from(form)?;
    let updates = UpdateClientRequest::new(
        payload.client_id,
        payload.request_type_id,
        payload.status,
        payload.description,
    );
    let request = repo
        .update_client_request(request_id, &updates)
        .map_err(choice_error)?;

    log::info!("User {} changed client request {}", user.username, request.id);
    Ok(request)
}

pub fn load_delete_client_request<R>(
    repo: &R,
    user: &AuthenticatedUser,
    request_id: i32,
) -> ServiceResult<ClientRequest>
where
    R: ClientRequestReader + ?Sized,
{
    ensure_perm(user, PermissionAction::Delete, AdminModel::ClientRequest)?;

    repo.get_client_request_by_id(ClientRequestId::new(request_id)?)?
        .ok_or(ServiceError::NotFound)
}

pub fn delete_client_request<R>(
    repo: &R,
    user: &AuthenticatedUser,
    request_id: i32,
) -> ServiceResult<ClientRequest>
where
    R: ClientRequestReader + ClientRequestWriter + ?Sized,
{
    let request = load_delete_client_request(repo, user, request_id)?;
    repo.delete_client_request(request.id)?;

    log::info!("User {} deleted client request {}", user.username, request.id);
    Ok(request)
}

/// Runs a changelist bulk action and returns the confirmation message.
pub fn run_bulk_action<R>(repo: &R, user: &AuthenticatedUser, body: &[u8]) -> ServiceResult<String>
where
    R: ClientRequestWriter + ?Sized,
{
    let payload = BulkActionPayload::try_from(body)?;
    match payload.action {
        BulkAction::MarkAsCompleted => {
            let updated = mark_as_completed(repo, user, &payload.ids)?;
            Ok(format!("{updated} requests marked as completed."))
        }
    }
}

/// Sets every selected request to `Completed`.
pub fn mark_as_completed<R>(
    repo: &R,
    user: &AuthenticatedUser,
    ids: &[ClientRequestId],
) -> ServiceResult<usize>
where
    R: ClientRequestWriter + ?Sized,
{
    ensure_perm(user, PermissionAction::Change, AdminModel::ClientRequest)?;

    if ids.is_empty() {
        return Err(ServiceError::Form(
            "Items must be selected in order to perform actions on them. No items have been changed."
                .to_string(),
        ));
    }

    let updated = repo.set_client_requests_status(ids, &RequestStatus::Completed)?;
    log::info!(
        "User {} marked {updated} request(s) as completed",
        user.username
    );
    Ok(updated)
}

#[cfg(all(test, feature = "test-mocks"))]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::domain::types::{ClientId, RequestTypeId};
    use crate::repository::mock::MockRepository;
    use crate::services::test_support::staff_with;

    fn limited() -> AuthenticatedUser {
        staff_with(&[
            "main.view_clientrequest",
            "main.add_clientrequest",
            "main.change_clientrequest",
        ])
    }

    fn stored(id: i32) -> ClientRequest {
        ClientRequest {
            id: ClientRequestId::new(id).unwrap(),
            client_id: ClientId::new(1).unwrap(),
            request_type_id: RequestTypeId::new(1).unwrap(),
            status: RequestStatus::Pending,
            description: None,
            created_at: Utc::now().naive_utc(),
            updated_at: Utc::now().naive_utc(),
        }
    }

    fn form() -> ClientRequestForm {
        ClientRequestForm {
            client: "1".into(),
            request_type: "1".into(),
            status: Some("In Progress".into()),
            description: Some("Call back".into()),
        }
    }

    #[test]
    fn bulk_action_marks_selected_requests() {
        let mut repo = MockRepository::new();
        repo.expect_set_client_requests_status()
            .times(1)
            .returning(|ids, status| {
                assert_eq!(*status, RequestStatus::Completed);
                Ok(ids.len())
            });

        let message = run_bulk_action(
            &repo,
            &limited(),
            b"action=mark_as_completed&_selected_action=1&_selected_action=2",
        )
        .unwrap();
        assert_eq!(message, "2 requests marked as completed.");
    }

    #[test]
    fn bulk_action_needs_change_permission() {
        let mut repo = MockRepository::new();
        repo.expect_set_client_requests_status().never();
        let user = staff_with(&["main.view_clientrequest"]);

        assert!(matches!(
            run_bulk_action(&repo, &user, b"action=mark_as_completed&_selected_action=1"),
            Err(ServiceError::Unauthorized)
        ));
    }

    #[test]
    fn bulk_action_without_selection_is_a_form_error() {
        let mut repo = MockRepository::new();
        repo.expect_set_client_requests_status().never();

        assert!(matches!(
            run_bulk_action(&repo, &limited(), b"action=mark_as_completed"),
            Err(ServiceError::Form(_))
        ));
    }

    #[test]
    fn list_filters_by_status() {
        let mut repo = MockRepository::new();
        repo.expect_list_client_requests().returning(|query| {
            assert_eq!(query.status, Some(RequestStatus::Completed));
            assert!(query.search.is_none());
            Ok((0, vec![]))
        });

        let data = list_client_requests(
            &repo,
            &limited(),
            ChangeListQuery {
                status: Some("Completed".into()),
                q: Some("  ".into()),
                ..Default::default()
            },
        )
        .unwrap();
        assert!(data.requests.items.is_empty());
        assert_eq!(data.status, Some(RequestStatus::Completed));
    }

    #[test]
    fn add_passes_parsed_fields() {
        let mut repo = MockRepository::new();
        repo.expect_create_client_request()
            .times(1)
            .returning(|new_request| {
                assert_eq!(new_request.status, RequestStatus::InProgress);
                assert_eq!(
                    new_request.description.as_ref().map(|d| d.as_str()),
                    Some("Call back")
                );
                Ok(stored(3))
            });

        assert_eq!(add_client_request(&repo, &limited(), form()).unwrap().id.get(), 3);
    }

    #[test]
    fn unknown_client_is_a_form_error() {
        let mut repo = MockRepository::new();
        repo.expect_create_client_request()
            .returning(|_| Err(RepositoryError::ConstraintViolation("FOREIGN KEY".into())));

        assert!(matches!(
            add_client_request(&repo, &limited(), form()),
            Err(ServiceError::Form(_))
        ));
    }

    #[test]
    fn update_of_missing_request_is_not_found() {
        let mut repo = MockRepository::new();
        repo.expect_get_client_request_by_id().returning(|_| Ok(None));
        repo.expect_update_client_request().never();

        assert!(matches!(
            update_client_request(&repo, &limited(), 42, form()),
            Err(ServiceError::NotFound)
        ));
    }

    #[test]
    fn limited_user_cannot_delete() {
        let mut repo = MockRepository::new();
        repo.expect_delete_client_request().never();

        assert!(matches!(
            delete_client_request(&repo, &limited(), 1),
            Err(ServiceError::Unauthorized)
        ));
    }
}
