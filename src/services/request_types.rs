use crate::domain::auth::{AdminModel, AuthenticatedUser, PermissionAction};
use crate::domain::request_type::{NewRequestType, RequestType};
use crate::domain::types::RequestTypeId;
use crate::dto::admin::{
    ChangeListQuery, ModelPermissions, RequestTypeFormPageData, RequestTypeListPageData,
};
use crate::forms::request_types::RequestTypeForm;
use crate::pagination::{DEFAULT_ITEMS_PER_PAGE, Paginated};
use crate::repository::errors::RepositoryError;
use crate::repository::{RequestTypeListQuery, RequestTypeReader, RequestTypeWriter};
use crate::services::{
    ServiceError, ServiceResult, ensure_perm, ensure_view_or_change, normalize_search,
};

pub fn list_request_types<R>(
    repo: &R,
    user: &AuthenticatedUser,
    query: ChangeListQuery,
) -> ServiceResult<RequestTypeListPageData>
where
    R: RequestTypeReader + ?Sized,
{
    ensure_view_or_change(user, AdminModel::RequestType)?;

    let page = query.page();
    let search = normalize_search(query.q);

    let mut list_query = RequestTypeListQuery::new().paginate(page, DEFAULT_ITEMS_PER_PAGE);
    if let Some(term) = &search {
        list_query = list_query.search(term.clone());
    }

    let (total, request_types) = repo.list_request_types(list_query)?;

    Ok(RequestTypeListPageData {
        request_types: Paginated::new(request_types, page, total, DEFAULT_ITEMS_PER_PAGE),
        search,
        perms: ModelPermissions::for_user(user, AdminModel::RequestType),
    })
}

pub fn load_add_request_type(user: &AuthenticatedUser) -> ServiceResult<RequestTypeFormPageData> {
    ensure_perm(user, PermissionAction::Add, AdminModel::RequestType)?;

    Ok(RequestTypeFormPageData {
        request_type: None,
        perms: ModelPermissions::for_user(user, AdminModel::RequestType),
    })
}

pub fn load_request_type<R>(
    repo: &R,
    user: &AuthenticatedUser,
    request_type_id: i32,
) -> ServiceResult<RequestTypeFormPageData>
where
    R: RequestTypeReader + ?Sized,
{
    ensure_view_or_change(user, AdminModel::RequestType)?;

    let request_type = repo
        .get_request_type_by_id(RequestTypeId::new(request_type_id)?)?
        .ok_or(ServiceError::NotFound)?;

    Ok(RequestTypeFormPageData {
        request_type: Some(request_type),
        perms: ModelPermissions::for_user(user, AdminModel::RequestType),
    })
}

pub fn add_request_type<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: RequestTypeForm,
) -> ServiceResult<RequestType>
where
    R: RequestTypeWriter + ?Sized,
{
    ensure_perm(user, PermissionAction::Add, AdminModel::RequestType)?;

    let new_type = NewRequestType::try_from(form)?;
    let request_type = repo.create_request_type(&new_type)?;

    log::info!(
        "User {} added request type {}",
        user.username,
        request_type.name
    );
    Ok(request_type)
}

pub fn update_request_type<R>(
    repo: &R,
    user: &AuthenticatedUser,
    request_type_id: i32,
    form: RequestTypeForm,
) -> ServiceResult<RequestType>
where
    R: RequestTypeReader + RequestTypeWriter + ?Sized,
{
    ensure_perm(user, PermissionAction::Change, AdminModel::RequestType)?;

    let request_type_id = RequestTypeId::new(request_type_id)?;
    if repo.get_request_type_by_id(request_type_id)?.is_none() {
        return Err(ServiceError::NotFound);
    }

    let updates = NewRequestType::try_from(form)?;
    let request_type = repo.update_request_type(request_type_id, &updates)?;

    log::info!(
        "User {} changed request type {}",
        user.username,
        request_type.name
    );
    Ok(request_type)
}

/// Confirmation data for the delete page.
pub fn load_delete_request_type<R>(
    repo: &R,
    user: &AuthenticatedUser,
    request_type_id: i32,
) -> ServiceResult<RequestType>
where
    R: RequestTypeReader + ?Sized,
{
    ensure_perm(user, PermissionAction::Delete, AdminModel::RequestType)?;

    repo.get_request_type_by_id(RequestTypeId::new(request_type_id)?)?
        .ok_or(ServiceError::NotFound)
}

/// Request types still referenced by requests are protected.
pub fn delete_request_type<R>(
    repo: &R,
    user: &AuthenticatedUser,
    request_type_id: i32,
) -> ServiceResult<RequestType>
where
    R: RequestTypeReader + RequestTypeWriter + ?Sized,
{
    let request_type = load_delete_request_type(repo, user, request_type_id)?;

    match repo.delete_request_type(request_type.id) {
        Ok(()) => {}
        Err(RepositoryError::ConstraintViolation(_)) => {
            return Err(ServiceError::Form(format!(
                "Cannot delete request type “{}” because client requests still use it.",
                request_type.name
            )));
        }
        Err(err) => return Err(err.into()),
    }

    log::info!(
        "User {} deleted request type {}",
        user.username,
        request_type.name
    );
    Ok(request_type)
}

#[cfg(all(test, feature = "test-mocks"))]
mod tests {
    use super::*;
    use crate::domain::types::RequestTypeName;
    use crate::repository::mock::MockRepository;
    use crate::services::test_support::{staff_with, superuser};

    fn request_type(id: i32, name: &str) -> RequestType {
        RequestType {
            id: RequestTypeId::new(id).unwrap(),
            name: RequestTypeName::new(name).unwrap(),
            description: "Test Description".to_string(),
        }
    }

    fn form(name: &str) -> RequestTypeForm {
        RequestTypeForm {
            name: name.to_string(),
            description: "Test Description".to_string(),
        }
    }

    #[test]
    fn limited_user_adds_request_type() {
        let mut repo = MockRepository::new();
        repo.expect_create_request_type()
            .times(1)
            .returning(|new_type| {
                assert_eq!(new_type.name.as_str(), "Test Request Type");
                Ok(request_type(1, new_type.name.as_str()))
            });
        let user = staff_with(&["main.add_requesttype"]);

        let created = add_request_type(&repo, &user, form("Test Request Type")).unwrap();
        assert_eq!(created.id.get(), 1);
    }

    #[test]
    fn change_requires_change_permission() {
        let repo = MockRepository::new();
        let user = staff_with(&["main.view_requesttype"]);
        assert!(matches!(
            update_request_type(&repo, &user, 1, form("Updated Request Type")),
            Err(ServiceError::Unauthorized)
        ));
    }

    #[test]
    fn list_searches_by_name() {
        let mut repo = MockRepository::new();
        repo.expect_list_request_types().returning(|query| {
            assert_eq!(query.search.as_deref(), Some("Test"));
            Ok((1, vec![request_type(1, "Test Request Type")]))
        });
        let user = staff_with(&["main.view_requesttype"]);

        let data = list_request_types(
            &repo,
            &user,
            ChangeListQuery {
                q: Some("Test".into()),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(data.request_types.total, 1);
    }

    #[test]
    fn referenced_request_type_is_protected() {
        let mut repo = MockRepository::new();
        repo.expect_get_request_type_by_id()
            .returning(|id| Ok(Some(request_type(id.get(), "Refund"))));
        repo.expect_delete_request_type()
            .returning(|_| Err(RepositoryError::ConstraintViolation("FOREIGN KEY".into())));

        let result = delete_request_type(&repo, &superuser(), 1);
        assert!(matches!(result, Err(ServiceError::Form(msg)) if msg.contains("Refund")));
    }

    #[test]
    fn limited_user_cannot_delete() {
        let mut repo = MockRepository::new();
        repo.expect_delete_request_type().never();
        let user = staff_with(&[
            "main.view_requesttype",
            "main.add_requesttype",
            "main.change_requesttype",
        ]);

        assert!(matches!(
            delete_request_type(&repo, &user, 1),
            Err(ServiceError::Unauthorized)
        ));
    }
}
