//! Account management pages of the admin panel.

use crate::domain::auth::{AdminModel, AuthenticatedUser, PermissionAction};
use crate::domain::types::UserId;
use crate::domain::user::{NewUser, UpdateUser, User};
use crate::dto::admin::{
    ChangeListQuery, ModelPermissions, UserChangePageData, UserListPageData, bool_filter,
};
use crate::forms::users::{UserAddForm, UserAddPayload, UserChangePayload};
use crate::pagination::{DEFAULT_ITEMS_PER_PAGE, Paginated};
use crate::password::hash_password;
use crate::repository::{GroupReader, UserListQuery, UserReader, UserWriter};
use crate::services::{
    ServiceError, ServiceResult, ensure_perm, ensure_view_or_change, normalize_search,
};

pub fn list_users<R>(
    repo: &R,
    user: &AuthenticatedUser,
    query: ChangeListQuery,
) -> ServiceResult<UserListPageData>
where
    R: UserReader + ?Sized,
{
    ensure_view_or_change(user, AdminModel::User)?;

    let page = query.page();
    let search = normalize_search(query.q);
    let is_staff = bool_filter(query.is_staff.as_deref());
    let is_superuser = bool_filter(query.is_superuser.as_deref());
    let is_active = bool_filter(query.is_active.as_deref());

    let mut list_query = UserListQuery::new().paginate(page, DEFAULT_ITEMS_PER_PAGE);
    if let Some(term) = &search {
        list_query = list_query.search(term.clone());
    }
    list_query.is_staff = is_staff;
    list_query.is_superuser = is_superuser;
    list_query.is_active = is_active;

    let (total, users) = repo.list_users(list_query)?;

    Ok(UserListPageData {
        users: Paginated::new(users, page, total, DEFAULT_ITEMS_PER_PAGE),
        search,
        is_staff,
        is_superuser,
        is_active,
        perms: ModelPermissions::for_user(user, AdminModel::User),
    })
}

pub fn ensure_can_add_user(user: &AuthenticatedUser) -> ServiceResult<()> {
    ensure_perm(user, PermissionAction::Add, AdminModel::User)
}

/// Creates an active, non-staff account. Flags and groups are set on the
/// change page afterwards.
pub fn add_user<R>(repo: &R, user: &AuthenticatedUser, form: UserAddForm) -> ServiceResult<User>
where
    R: UserReader + UserWriter + ?Sized,
{
    ensure_can_add_user(user)?;

    let payload = UserAddPayload::try_from(form)?;
    if repo.get_user_by_username(&payload.username)?.is_some() {
        return Err(ServiceError::Form(
            "A user with that username already exists.".to_string(),
        ));
    }

    let new_user = NewUser::new(payload.username, None, hash_password(&payload.password)?);
    let created = repo.create_user(&new_user)?;

    log::info!("User {} added user {}", user.username, created.username);
    Ok(created)
}

pub fn load_user<R>(
    repo: &R,
    user: &AuthenticatedUser,
    user_id: i32,
) -> ServiceResult<UserChangePageData>
where
    R: UserReader + GroupReader + ?Sized,
{
    ensure_view_or_change(user, AdminModel::User)?;

    let target = repo
        .get_user_by_id(UserId::new(user_id)?)?
        .ok_or(ServiceError::NotFound)?;
    let member_of = repo
        .list_user_groups(target.id)?
        .into_iter()
        .map(|group| group.id)
        .collect();

    Ok(UserChangePageData {
        user: target,
        groups: repo.list_groups()?,
        member_of,
        perms: ModelPermissions::for_user(user, AdminModel::User),
    })
}

/// Applies the change form: email, status flags and group memberships.
pub fn update_user<R>(
    repo: &R,
    user: &AuthenticatedUser,
    user_id: i32,
    body: &[u8],
) -> ServiceResult<User>
where
    R: UserReader + UserWriter + ?Sized,
{
    ensure_perm(user, PermissionAction::Change, AdminModel::User)?;

    let user_id = UserId::new(user_id)?;
    if repo.get_user_by_id(user_id)?.is_none() {
        return Err(ServiceError::NotFound);
    }

    let payload = UserChangePayload::try_from(body)?;
    let updates = UpdateUser {
        email: payload.email,
        is_active: payload.is_active,
        is_staff: payload.is_staff,
        is_superuser: payload.is_superuser,
    };
    let updated = repo.update_user(user_id, &updates)?;
    repo.set_user_groups(user_id, &payload.groups)?;

    log::info!("User {} changed user {}", user.username, updated.username);
    Ok(updated)
}

pub fn load_delete_user<R>(
    repo: &R,
    user: &AuthenticatedUser,
    user_id: i32,
) -> ServiceResult<User>
where
    R: UserReader + ?Sized,
{
    ensure_perm(user, PermissionAction::Delete, AdminModel::User)?;

    repo.get_user_by_id(UserId::new(user_id)?)?
        .ok_or(ServiceError::NotFound)
}

pub fn delete_user<R>(repo: &R, user: &AuthenticatedUser, user_id: i32) -> ServiceResult<User>
where
    R: UserReader + UserWriter + ?Sized,
{
    let target = load_delete_user(repo, user, user_id)?;
    if target.id == user.id {
        return Err(ServiceError::Form(
            "You cannot delete the account you are signed in with.".to_string(),
        ));
    }
    repo.delete_user(target.id)?;

    log::info!("User {} deleted user {}", user.username, target.username);
    Ok(target)
}
