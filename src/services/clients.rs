//! Client admin pages.

use crate::domain::auth::{AdminModel, AuthenticatedUser, PermissionAction};
use crate::domain::client::{Client, UpdateClient};
use crate::domain::client_request::InlineRequest;
use crate::domain::request_type::RequestType;
use crate::domain::types::ClientId;
use crate::dto::admin::{
    ChangeListQuery, ClientDeletePageData, ClientFormPageData, ClientListPageData,
    InlineRequestRow, ModelPermissions, bool_filter,
};
use crate::forms::clients::{ClientForm, ClientPayload};
use crate::pagination::{DEFAULT_ITEMS_PER_PAGE, Paginated};
use crate::repository::errors::RepositoryError;
use crate::repository::{
    ClientListQuery, ClientReader, ClientRequestListQuery, ClientRequestReader, ClientWriter,
    RequestTypeListQuery, RequestTypeReader,
};
use crate::services::{
    ServiceError, ServiceResult, ensure_perm, ensure_view_or_change, normalize_search,
};

/// Loads the filtered, paginated client changelist.
pub fn list_clients<R>(
    repo: &R,
    user: &AuthenticatedUser,
    query: ChangeListQuery,
) -> ServiceResult<ClientListPageData>
where
    R: ClientReader + ?Sized,
{
    ensure_view_or_change(user, AdminModel::Client)?;

    let page = query.page();
    let created = query.created();
    let is_active = bool_filter(query.is_active.as_deref());
    let search = normalize_search(query.q);

    let mut list_query = ClientListQuery::new()
        .created(created)
        .paginate(page, DEFAULT_ITEMS_PER_PAGE);
    if let Some(term) = &search {
        list_query = list_query.search(term.clone());
    }
    if let Some(is_active) = is_active {
        list_query = list_query.is_active(is_active);
    }

    let (total, clients) = repo.list_clients(list_query)?;

    Ok(ClientListPageData {
        clients: Paginated::new(clients, page, total, DEFAULT_ITEMS_PER_PAGE),
        search,
        is_active,
        created,
        perms: ModelPermissions::for_user(user, AdminModel::Client),
    })
}

fn inline_rows<R>(repo: &R, client_id: ClientId) -> ServiceResult<Vec<InlineRequestRow>>
where
    R: ClientRequestReader + ?Sized,
{
    let (_, rows) = repo.list_client_requests(ClientRequestListQuery::new().client(client_id))?;
    Ok(rows
        .into_iter()
        .map(|(request, _, request_type)| InlineRequestRow {
            request,
            request_type,
        })
        .collect())
}

fn request_type_choices<R>(repo: &R) -> ServiceResult<Vec<RequestType>>
where
    R: RequestTypeReader + ?Sized,
{
    let (_, request_types) = repo.list_request_types(RequestTypeListQuery::new())?;
    Ok(request_types)
}

/// Data for the empty add form.
pub fn load_add_client<R>(repo: &R, user: &AuthenticatedUser) -> ServiceResult<ClientFormPageData>
where
    R: RequestTypeReader + ?Sized,
{
    ensure_perm(user, PermissionAction::Add, AdminModel::Client)?;

    Ok(ClientFormPageData {
        client: None,
        requests: Vec::new(),
        request_types: request_type_choices(repo)?,
        perms: ModelPermissions::for_user(user, AdminModel::Client),
        can_add_request: user.can(PermissionAction::Add, AdminModel::ClientRequest),
    })
}

/// Data for the change form, with the client's requests inline.
pub fn load_client<R>(
    repo: &R,
    user: &AuthenticatedUser,
    client_id: i32,
) -> ServiceResult<ClientFormPageData>
where
    R: ClientReader + ClientRequestReader + RequestTypeReader + ?Sized,
{
    ensure_view_or_change(user, AdminModel::Client)?;

    let client = repo
        .get_client_by_id(ClientId::new(client_id)?)?
        .ok_or(ServiceError::NotFound)?;

    Ok(ClientFormPageData {
        requests: inline_rows(repo, client.id)?,
        client: Some(client),
        request_types: request_type_choices(repo)?,
        perms: ModelPermissions::for_user(user, AdminModel::Client),
        can_add_request: user.can(PermissionAction::Add, AdminModel::ClientRequest),
    })
}

/// Parses the form and refuses an inline request the user may not add.
fn client_payload(user: &AuthenticatedUser, form: ClientForm) -> ServiceResult<ClientPayload> {
    let payload = ClientPayload::try_from(form)?;
    if payload.inline_request.is_some() {
        ensure_perm(user, PermissionAction::Add, AdminModel::ClientRequest)?;
    }
    Ok(payload)
}

/// Rejects an inline request whose type does not exist before anything is written.
fn ensure_inline_request_type<R>(repo: &R, inline: Option<&InlineRequest>) -> ServiceResult<()>
where
    R: RequestTypeReader + ?Sized,
{
    let Some(inline) = inline else {
        return Ok(());
    };
    if repo.get_request_type_by_id(inline.request_type_id)?.is_none() {
        return Err(invalid_request_type());
    }
    Ok(())
}

fn invalid_request_type() -> ServiceError {
    ServiceError::Form("Select a valid request type.".to_string())
}

/// Only the inline request carries a foreign key, so that violation is its type.
fn map_inline_error(err: RepositoryError) -> ServiceError {
    match err {
        RepositoryError::ConstraintViolation(msg) if msg.starts_with("Foreign key") => {
            invalid_request_type()
        }
        other => other.into(),
    }
}

/// Creates a client and, when filled in, its extra inline request.
pub fn add_client<R>(repo: &R, user: &AuthenticatedUser, form: ClientForm) -> ServiceResult<Client>
where
    R: ClientWriter + RequestTypeReader + ?Sized,
{
    ensure_perm(user, PermissionAction::Add, AdminModel::Client)?;

    let payload = client_payload(user, form)?;
    ensure_inline_request_type(repo, payload.inline_request.as_ref())?;
    let client = repo
        .create_client_with_request(&payload.client, payload.inline_request)
        .map_err(map_inline_error)?;

    log::info!("User {} added client {}", user.username, client.name);
    Ok(client)
}

/// Replaces the client's fields and adds the extra inline request if any.
pub fn update_client<R>(
    repo: &R,
    user: &AuthenticatedUser,
    client_id: i32,
    form: ClientForm,
) -> ServiceResult<Client>
where
    R: ClientReader + ClientWriter + RequestTypeReader + ?Sized,
{
    ensure_perm(user, PermissionAction::Change, AdminModel::Client)?;

    let client_id = ClientId::new(client_id)?;
    if repo.get_client_by_id(client_id)?.is_none() {
        return Err(ServiceError::NotFound);
    }

    let payload = client_payload(user, form)?;
    ensure_inline_request_type(repo, payload.inline_request.as_ref())?;
    let client = repo
        .update_client_with_request(
            client_id,
            &UpdateClient::from(payload.client),
            payload.inline_request,
        )
        .map_err(map_inline_error)?;

    log::info!("User {} changed client {}", user.username, client.name);
    Ok(client)
}

/// Confirmation data: the client and how many requests go with it.
pub fn load_delete_client<R>(
    repo: &R,
    user: &AuthenticatedUser,
    client_id: i32,
) -> ServiceResult<ClientDeletePageData>
where
    R: ClientReader + ClientRequestReader + ?Sized,
{
    ensure_perm(user, PermissionAction::Delete, AdminModel::Client)?;

    let client = repo
        .get_client_by_id(ClientId::new(client_id)?)?
        .ok_or(ServiceError::NotFound)?;
    let (request_count, _) = repo.list_client_requests(
        ClientRequestListQuery::new()
            .client(client.id)
            .paginate(1, 1),
    )?;

    Ok(ClientDeletePageData {
        client,
        request_count,
    })
}

/// Deletes the client and its requests.
pub fn delete_client<R>(
    repo: &R,
    user: &AuthenticatedUser,
    client_id: i32,
) -> ServiceResult<Client>
where
    R: ClientReader + ClientWriter + ?Sized,
{
    ensure_perm(user, PermissionAction::Delete, AdminModel::Client)?;

    let client = repo
        .get_client_by_id(ClientId::new(client_id)?)?
        .ok_or(ServiceError::NotFound)?;
    repo.delete_client(client.id)?;

    log::info!("User {} deleted client {}", user.username, client.name);
    Ok(client)
}
