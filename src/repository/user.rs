//! Repository implementation for accounts, groups and permissions.

use std::collections::BTreeSet;

use chrono::NaiveDateTime;
use diesel::prelude::*;
use diesel::sqlite::Sqlite;

use crate::{
    domain::{
        types::{ContentTypeId, GroupId, GroupName, PermissionId, UserId, Username},
        user::{ContentType, Group, NewUser, Permission, UpdateUser, User},
    },
    models::user::{
        ContentType as DbContentType, Group as DbGroup, GroupPermission as DbGroupPermission,
        NewGroup as DbNewGroup, NewUser as DbNewUser, Permission as DbPermission,
        UpdateUser as DbUpdateUser, User as DbUser, UserGroup as DbUserGroup,
        UserPermission as DbUserPermission,
    },
    repository::{
        DieselRepository, GroupReader, GroupWriter, PermissionReader, UserListQuery, UserReader,
        UserWriter,
        errors::{RepositoryError, RepositoryResult},
    },
};

impl UserReader for DieselRepository {
    fn get_user_by_id(&self, id: UserId) -> RepositoryResult<Option<User>> {
        use crate::schema::auth_users;

        let mut conn = self.conn()?;
        let user = auth_users::table
            .find(id.get())
            .first::<DbUser>(&mut conn)
            .optional()?;

        user.map(User::try_from)
            .transpose()
            .map_err(RepositoryError::from)
    }

    fn get_user_by_username(&self, username: &Username) -> RepositoryResult<Option<User>> {
        use crate::schema::auth_users;

        let mut conn = self.conn()?;
        let user = auth_users::table
            .filter(auth_users::username.eq(username.as_str()))
            .first::<DbUser>(&mut conn)
            .optional()?;

        user.map(User::try_from)
            .transpose()
            .map_err(RepositoryError::from)
    }

    fn list_users(&self, query: UserListQuery) -> RepositoryResult<(usize, Vec<User>)> {
        use crate::schema::auth_users;

        let mut conn = self.conn()?;

        let query_builder = || {
            let mut items = auth_users::table.into_boxed::<Sqlite>();
            if let Some(term) = &query.search {
                let pattern = format!("%{term}%");
                items = items.filter(
                    auth_users::username
                        .like(pattern.clone())
                        .or(auth_users::email.like(pattern)),
                );
            }
            if let Some(is_staff) = query.is_staff {
                items = items.filter(auth_users::is_staff.eq(is_staff));
            }
            if let Some(is_superuser) = query.is_superuser {
                items = items.filter(auth_users::is_superuser.eq(is_superuser));
            }
            if let Some(is_active) = query.is_active {
                items = items.filter(auth_users::is_active.eq(is_active));
            }
            items
        };

        let total = query_builder().count().get_result::<i64>(&mut conn)? as usize;

        let mut items = query_builder().order(auth_users::username.asc());
        if let Some(pagination) = &query.pagination {
            items = items.offset(pagination.offset()).limit(pagination.limit());
        }

        let users = items
            .load::<DbUser>(&mut conn)?
            .into_iter()
            .map(User::try_from)
            .collect::<Result<Vec<_>, _>>()
            .map_err(RepositoryError::from)?;

        Ok((total, users))
    }

    fn list_user_permissions(&self, id: UserId) -> RepositoryResult<Vec<String>> {
        use crate::schema::{
            auth_content_types, auth_group_permissions, auth_permissions, auth_user_groups,
            auth_user_permissions,
        };

        let mut conn = self.conn()?;

        let direct = auth_user_permissions::table
            .inner_join(auth_permissions::table.inner_join(auth_content_types::table))
            .filter(auth_user_permissions::user_id.eq(id.get()))
            .select((auth_content_types::app_label, auth_permissions::codename))
            .load::<(String, String)>(&mut conn)?;

        let group_ids = auth_user_groups::table
            .filter(auth_user_groups::user_id.eq(id.get()))
            .select(auth_user_groups::group_id);

        let via_groups = auth_group_permissions::table
            .inner_join(auth_permissions::table.inner_join(auth_content_types::table))
            .filter(auth_group_permissions::group_id.eq_any(group_ids))
            .select((auth_content_types::app_label, auth_permissions::codename))
            .load::<(String, String)>(&mut conn)?;

        let permissions = direct
            .into_iter()
            .chain(via_groups)
            .map(|(app_label, codename)| format!("{app_label}.{codename}"))
            .collect::<BTreeSet<String>>();

        Ok(permissions.into_iter().collect())
    }

    fn list_user_groups(&self, id: UserId) -> RepositoryResult<Vec<Group>> {
        use crate::schema::{auth_groups, auth_user_groups};

        let mut conn = self.conn()?;
        let groups = auth_user_groups::table
            .inner_join(auth_groups::table)
            .filter(auth_user_groups::user_id.eq(id.get()))
            .select(DbGroup::as_select())
            .order(auth_groups::name.asc())
            .load::<DbGroup>(&mut conn)?;

        groups
            .into_iter()
            .map(Group::try_from)
            .collect::<Result<Vec<_>, _>>()
            .map_err(RepositoryError::from)
    }
}

impl UserWriter for DieselRepository {
    fn create_user(&self, new_user: &NewUser) -> RepositoryResult<User> {
        use crate::schema::auth_users;

        let mut conn = self.conn()?;
        let insertable: DbNewUser = new_user.into();

        let created = diesel::insert_into(auth_users::table)
            .values(&insertable)
            .get_result::<DbUser>(&mut conn)?;

        User::try_from(created).map_err(RepositoryError::from)
    }

    fn update_user(&self, id: UserId, updates: &UpdateUser) -> RepositoryResult<User> {
        use crate::schema::auth_users;

        let mut conn = self.conn()?;
        let changeset: DbUpdateUser = updates.into();

        let updated = diesel::update(auth_users::table.find(id.get()))
            .set(&changeset)
            .get_result::<DbUser>(&mut conn)?;

        User::try_from(updated).map_err(RepositoryError::from)
    }

    fn record_login(&self, id: UserId, at: NaiveDateTime) -> RepositoryResult<()> {
        use crate::schema::auth_users;

        let mut conn = self.conn()?;
        diesel::update(auth_users::table.find(id.get()))
            .set(auth_users::last_login.eq(Some(at)))
            .execute(&mut conn)?;
        Ok(())
    }

    fn add_user_to_group(&self, user_id: UserId, group_id: GroupId) -> RepositoryResult<()> {
        use crate::schema::auth_user_groups;

        let mut conn = self.conn()?;
        diesel::insert_into(auth_user_groups::table)
            .values(&DbUserGroup {
                user_id: user_id.get(),
                group_id: group_id.get(),
            })
            .on_conflict_do_nothing()
            .execute(&mut conn)?;
        Ok(())
    }

    fn set_user_groups(&self, user_id: UserId, group_ids: &[GroupId]) -> RepositoryResult<()> {
        use crate::schema::auth_user_groups;

        let mut conn = self.conn()?;
        let rows = group_ids
            .iter()
            .map(|group_id| DbUserGroup {
                user_id: user_id.get(),
                group_id: group_id.get(),
            })
            .collect::<Vec<_>>();

        conn.transaction::<(), diesel::result::Error, _>(move |conn| {
            diesel::delete(
                auth_user_groups::table.filter(auth_user_groups::user_id.eq(user_id.get())),
            )
            .execute(conn)?;

            if !rows.is_empty() {
                diesel::insert_into(auth_user_groups::table)
                    .values(rows)
                    .execute(conn)?;
            }
            Ok(())
        })
        .map_err(RepositoryError::from)
    }

    fn set_user_permissions(
        &self,
        user_id: UserId,
        permission_ids: &[PermissionId],
    ) -> RepositoryResult<()> {
        use crate::schema::auth_user_permissions;

        let mut conn = self.conn()?;
        let rows = permission_ids
            .iter()
            .map(|permission_id| DbUserPermission {
                user_id: user_id.get(),
                permission_id: permission_id.get(),
            })
            .collect::<Vec<_>>();

        conn.transaction::<(), diesel::result::Error, _>(move |conn| {
            diesel::delete(
                auth_user_permissions::table
                    .filter(auth_user_permissions::user_id.eq(user_id.get())),
            )
            .execute(conn)?;

            if !rows.is_empty() {
                diesel::insert_into(auth_user_permissions::table)
                    .values(rows)
                    .execute(conn)?;
            }
            Ok(())
        })
        .map_err(RepositoryError::from)
    }

    fn delete_user(&self, id: UserId) -> RepositoryResult<()> {
        use crate::schema::auth_users;

        let mut conn = self.conn()?;
        let deleted = diesel::delete(auth_users::table.find(id.get())).execute(&mut conn)?;
        if deleted == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    fn delete_users_by_username(&self, usernames: &[Username]) -> RepositoryResult<usize> {
        use crate::schema::auth_users;

        let mut conn = self.conn()?;
        let names = usernames.iter().map(Username::as_str).collect::<Vec<&str>>();

        let deleted = diesel::delete(auth_users::table.filter(auth_users::username.eq_any(names)))
            .execute(&mut conn)?;
        Ok(deleted)
    }
}

impl GroupReader for DieselRepository {
    fn get_group_by_name(&self, name: &GroupName) -> RepositoryResult<Option<Group>> {
        use crate::schema::auth_groups;

        let mut conn = self.conn()?;
        let group = auth_groups::table
            .filter(auth_groups::name.eq(name.as_str()))
            .first::<DbGroup>(&mut conn)
            .optional()?;

        group
            .map(Group::try_from)
            .transpose()
            .map_err(RepositoryError::from)
    }

    fn list_groups(&self) -> RepositoryResult<Vec<Group>> {
        use crate::schema::auth_groups;

        let mut conn = self.conn()?;
        auth_groups::table
            .order(auth_groups::name.asc())
            .load::<DbGroup>(&mut conn)?
            .into_iter()
            .map(Group::try_from)
            .collect::<Result<Vec<_>, _>>()
            .map_err(RepositoryError::from)
    }

    fn list_group_permissions(&self, group_id: GroupId) -> RepositoryResult<Vec<Permission>> {
        use crate::schema::{auth_group_permissions, auth_permissions};

        let mut conn = self.conn()?;
        auth_group_permissions::table
            .inner_join(auth_permissions::table)
            .filter(auth_group_permissions::group_id.eq(group_id.get()))
            .select(DbPermission::as_select())
            .order(auth_permissions::id.asc())
            .load::<DbPermission>(&mut conn)?
            .into_iter()
            .map(Permission::try_from)
            .collect::<Result<Vec<_>, _>>()
            .map_err(RepositoryError::from)
    }

    fn group_has_permission(
        &self,
        group_id: GroupId,
        permission_id: PermissionId,
    ) -> RepositoryResult<bool> {
        use crate::schema::auth_group_permissions;

        let mut conn = self.conn()?;
        let exists = diesel::select(diesel::dsl::exists(
            auth_group_permissions::table
                .filter(auth_group_permissions::group_id.eq(group_id.get()))
                .filter(auth_group_permissions::permission_id.eq(permission_id.get())),
        ))
        .get_result::<bool>(&mut conn)?;
        Ok(exists)
    }
}

impl GroupWriter for DieselRepository {
    fn get_or_create_group(&self, name: &GroupName) -> RepositoryResult<Group> {
        use crate::schema::auth_groups;

        let mut conn = self.conn()?;

        let group = conn.transaction::<DbGroup, diesel::result::Error, _>(|conn| {
            diesel::insert_into(auth_groups::table)
                .values(&DbNewGroup {
                    name: name.as_str(),
                })
                .on_conflict_do_nothing()
                .execute(conn)?;

            auth_groups::table
                .filter(auth_groups::name.eq(name.as_str()))
                .first::<DbGroup>(conn)
        })?;

        Group::try_from(group).map_err(RepositoryError::from)
    }

    fn add_group_permission(
        &self,
        group_id: GroupId,
        permission_id: PermissionId,
    ) -> RepositoryResult<()> {
        use crate::schema::auth_group_permissions;

        let mut conn = self.conn()?;
        diesel::insert_into(auth_group_permissions::table)
            .values(&DbGroupPermission {
                group_id: group_id.get(),
                permission_id: permission_id.get(),
            })
            .on_conflict_do_nothing()
            .execute(&mut conn)?;
        Ok(())
    }
}

impl PermissionReader for DieselRepository {
    fn get_content_type(
        &self,
        app_label: &str,
        model: &str,
    ) -> RepositoryResult<Option<ContentType>> {
        use crate::schema::auth_content_types;

        let mut conn = self.conn()?;
        let content_type = auth_content_types::table
            .filter(auth_content_types::app_label.eq(app_label))
            .filter(auth_content_types::model.eq(model))
            .first::<DbContentType>(&mut conn)
            .optional()?;

        content_type
            .map(ContentType::try_from)
            .transpose()
            .map_err(RepositoryError::from)
    }

    fn get_permission(
        &self,
        content_type_id: ContentTypeId,
        codename: &str,
    ) -> RepositoryResult<Option<Permission>> {
        use crate::schema::auth_permissions;

        let mut conn = self.conn()?;
        let permission = auth_permissions::table
            .filter(auth_permissions::content_type_id.eq(content_type_id.get()))
            .filter(auth_permissions::codename.eq(codename))
            .first::<DbPermission>(&mut conn)
            .optional()?;

        permission
            .map(Permission::try_from)
            .transpose()
            .map_err(RepositoryError::from)
    }

    fn list_permissions(&self) -> RepositoryResult<Vec<Permission>> {
        use crate::schema::auth_permissions;

        let mut conn = self.conn()?;
        auth_permissions::table
            .order(auth_permissions::id.asc())
            .load::<DbPermission>(&mut conn)?
            .into_iter()
            .map(Permission::try_from)
            .collect::<Result<Vec<_>, _>>()
            .map_err(RepositoryError::from)
    }
}
