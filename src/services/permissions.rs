//! Bootstrap of the restricted `LimitedUsers` permission group.

use crate::domain::auth::{AdminModel, PermissionAction};
use crate::domain::types::GroupName;
use crate::domain::user::Group;
use crate::repository::{GroupReader, GroupWriter, PermissionReader};
use crate::services::ServiceResult;

/// Name of the restricted staff group.
pub const LIMITED_USERS_GROUP: &str = "LimitedUsers";

/// Models the restricted group may work with.
pub const LIMITED_MODELS: [AdminModel; 3] = [
    AdminModel::Client,
    AdminModel::RequestType,
    AdminModel::ClientRequest,
];

/// Actions granted on [`LIMITED_MODELS`]. Delete is never granted.
pub const LIMITED_ACTIONS: [PermissionAction; 3] = [
    PermissionAction::View,
    PermissionAction::Add,
    PermissionAction::Change,
];

/// Ensures the `LimitedUsers` group exists and holds view/add/change on the
/// client, request type and client request models.
///
/// Missing content types and permissions are logged and skipped. Running it
/// again attaches nothing new.
pub fn create_limited_users_permission_group<R>(repo: &R) -> ServiceResult<Group>
where
    R: GroupReader + GroupWriter + PermissionReader + ?Sized,
{
    let group = repo.get_or_create_group(&GroupName::new(LIMITED_USERS_GROUP)?)?;

    for model in LIMITED_MODELS {
        let Some(content_type) = repo.get_content_type(model.app_label(), model.model_name())?
        else {
            log::error!("ContentType for model {} not found.", model.model_name());
            continue;
        };

        for action in LIMITED_ACTIONS {
            let codename = action.codename(model.model_name());
            let Some(permission) = repo.get_permission(content_type.id, &codename)? else {
                log::warn!(
                    "Permission {codename} not found for model {}",
                    model.model_name()
                );
                continue;
            };

            if repo.group_has_permission(group.id, permission.id)? {
                log::info!("Permission {codename} already assigned to group");
            } else {
                repo.add_group_permission(group.id, permission.id)?;
                log::info!("Added {action} permission for {}", model.model_name());
            }
        }
    }

    Ok(group)
}

#[cfg(all(test, feature = "test-mocks"))]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::domain::types::{ContentTypeId, GroupId, PermissionId};
    use crate::domain::user::{ContentType, Permission};
    use crate::repository::errors::RepositoryError;
    use crate::repository::mock::MockRepository;
    use crate::services::ServiceError;

    fn limited_group() -> Group {
        Group {
            id: GroupId::new(1).unwrap(),
            name: GroupName::new(LIMITED_USERS_GROUP).unwrap(),
        }
    }

    fn content_type_for(model: &str) -> ContentType {
        let id = match model {
            "client" => 1,
            "requesttype" => 2,
            _ => 3,
        };
        ContentType {
            id: ContentTypeId::new(id).unwrap(),
            app_label: "main".to_string(),
            model: model.to_string(),
        }
    }

    fn permission(content_type_id: ContentTypeId, codename: &str) -> Permission {
        let action_offset = match codename.split('_').next() {
            Some("add") => 1,
            Some("change") => 2,
            Some("delete") => 3,
            _ => 4,
        };
        Permission {
            id: PermissionId::new(content_type_id.get() * 10 + action_offset).unwrap(),
            content_type_id,
            codename: codename.to_string(),
            name: codename.to_string(),
        }
    }

    #[test]
    fn grants_view_add_change_on_each_model() {
        let mut repo = MockRepository::new();
        let granted = Arc::new(Mutex::new(Vec::new()));

        repo.expect_get_or_create_group()
            .times(1)
            .returning(|_| Ok(limited_group()));
        repo.expect_get_content_type()
            .times(3)
            .returning(|app_label, model| {
                assert_eq!(app_label, "main");
                Ok(Some(content_type_for(model)))
            });
        repo.expect_get_permission()
            .times(9)
            .returning(|ct, codename| Ok(Some(permission(ct, codename))));
        repo.expect_group_has_permission()
            .times(9)
            .returning(|_, _| Ok(false));
        let sink = granted.clone();
        repo.expect_add_group_permission()
            .times(9)
            .returning(move |_, permission_id| {
                sink.lock().unwrap().push(permission_id.get());
                Ok(())
            });

        let group = create_limited_users_permission_group(&repo).unwrap();
        assert_eq!(group.name.as_str(), LIMITED_USERS_GROUP);

        let granted = granted.lock().unwrap();
        assert_eq!(granted.len(), 9);
        assert!(granted.iter().all(|id| id % 10 != 3), "delete was granted");
    }

    #[test]
    fn existing_grants_are_not_attached_twice() {
        let mut repo = MockRepository::new();
        repo.expect_get_or_create_group()
            .returning(|_| Ok(limited_group()));
        repo.expect_get_content_type()
            .returning(|_, model| Ok(Some(content_type_for(model))));
        repo.expect_get_permission()
            .returning(|ct, codename| Ok(Some(permission(ct, codename))));
        repo.expect_group_has_permission()
            .returning(|_, _| Ok(true));
        repo.expect_add_group_permission().never();

        assert!(create_limited_users_permission_group(&repo).is_ok());
    }

    #[test]
    fn missing_content_type_skips_the_model() {
        let mut repo = MockRepository::new();
        repo.expect_get_or_create_group()
            .returning(|_| Ok(limited_group()));
        repo.expect_get_content_type().returning(|_, model| {
            Ok((model != "requesttype").then(|| content_type_for(model)))
        });
        repo.expect_get_permission()
            .times(6)
            .returning(|ct, codename| Ok(Some(permission(ct, codename))));
        repo.expect_group_has_permission()
            .returning(|_, _| Ok(false));
        repo.expect_add_group_permission()
            .times(6)
            .returning(|_, _| Ok(()));

        assert!(create_limited_users_permission_group(&repo).is_ok());
    }

    #[test]
    fn missing_permission_is_skipped() {
        let mut repo = MockRepository::new();
        repo.expect_get_or_create_group()
            .returning(|_| Ok(limited_group()));
        repo.expect_get_content_type()
            .returning(|_, model| Ok(Some(content_type_for(model))));
        repo.expect_get_permission().returning(|ct, codename| {
            Ok((codename != "add_client").then(|| permission(ct, codename)))
        });
        repo.expect_group_has_permission()
            .returning(|_, _| Ok(false));
        repo.expect_add_group_permission()
            .times(8)
            .returning(|_, _| Ok(()));

        assert!(create_limited_users_permission_group(&repo).is_ok());
    }

    #[test]
    fn repository_failures_propagate() {
        let mut repo = MockRepository::new();
        repo.expect_get_or_create_group()
            .returning(|_| Err(RepositoryError::ConnectionError("down".into())));

        assert!(matches!(
            create_limited_users_permission_group(&repo),
            Err(ServiceError::Repository(RepositoryError::ConnectionError(_)))
        ));
    }
}
