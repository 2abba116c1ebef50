//! Diesel models for accounts, permission groups and permissions.

use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::types::{
    ContentTypeId, GroupId, GroupName, PermissionId, TypeConstraintError, UserEmail, UserId,
    Username,
};
use crate::domain::user::{
    ContentType as DomainContentType, Group as DomainGroup, NewUser as DomainNewUser,
    Permission as DomainPermission, UpdateUser as DomainUpdateUser, User as DomainUser,
};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::auth_users)]
/// Diesel model for [`crate::domain::user::User`].
pub struct User {
    pub id: i32,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub is_active: bool,
    pub is_staff: bool,
    pub is_superuser: bool,
    pub date_joined: NaiveDateTime,
    pub last_login: Option<NaiveDateTime>,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::auth_users)]
pub struct NewUser<'a> {
    pub username: &'a str,
    pub email: &'a str,
    pub password_hash: &'a str,
    pub is_active: bool,
    pub is_staff: bool,
    pub is_superuser: bool,
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::auth_users)]
pub struct UpdateUser<'a> {
    pub email: &'a str,
    pub is_active: bool,
    pub is_staff: bool,
    pub is_superuser: bool,
}

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::auth_groups)]
pub struct Group {
    pub id: i32,
    pub name: String,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::auth_groups)]
pub struct NewGroup<'a> {
    pub name: &'a str,
}

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::auth_content_types)]
pub struct ContentType {
    pub id: i32,
    pub app_label: String,
    pub model: String,
}

#[derive(Debug, Clone, Identifiable, Queryable, Selectable, Associations)]
#[diesel(belongs_to(ContentType, foreign_key = content_type_id))]
#[diesel(table_name = crate::schema::auth_permissions)]
pub struct Permission {
    pub id: i32,
    pub content_type_id: i32,
    pub codename: String,
    pub name: String,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::auth_group_permissions)]
/// Association row granting a permission to a group.
pub struct GroupPermission {
    pub group_id: i32,
    pub permission_id: i32,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::auth_user_groups)]
/// Association row placing a user in a group.
pub struct UserGroup {
    pub user_id: i32,
    pub group_id: i32,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::auth_user_permissions)]
/// Association row granting a permission directly to a user.
pub struct UserPermission {
    pub user_id: i32,
    pub permission_id: i32,
}

impl TryFrom<User> for DomainUser {
    type Error = TypeConstraintError;

    fn try_from(user: User) -> Result<Self, Self::Error> {
        let email = if user.email.trim().is_empty() {
            None
        } else {
            Some(UserEmail::new(user.email)?)
        };

        Ok(Self {
            id: UserId::try_from(user.id)?,
            username: Username::new(user.username)?,
            email,
            password_hash: user.password_hash,
            is_active: user.is_active,
            is_staff: user.is_staff,
            is_superuser: user.is_superuser,
            date_joined: user.date_joined,
            last_login: user.last_login,
        })
    }
}

impl<'a> From<&'a DomainNewUser> for NewUser<'a> {
    fn from(user: &'a DomainNewUser) -> Self {
        Self {
            username: user.username.as_str(),
            email: user.email.as_ref().map_or("", |e| e.as_str()),
            password_hash: user.password_hash.as_str(),
            is_active: user.is_active,
            is_staff: user.is_staff,
            is_superuser: user.is_superuser,
        }
    }
}

impl<'a> From<&'a DomainUpdateUser> for UpdateUser<'a> {
    fn from(user: &'a DomainUpdateUser) -> Self {
        Self {
            email: user.email.as_ref().map_or("", |e| e.as_str()),
            is_active: user.is_active,
            is_staff: user.is_staff,
            is_superuser: user.is_superuser,
        }
    }
}

impl TryFrom<Group> for DomainGroup {
    type Error = TypeConstraintError;

    fn try_from(group: Group) -> Result<Self, Self::Error> {
        Ok(Self {
            id: GroupId::try_from(group.id)?,
            name: GroupName::new(group.name)?,
        })
    }
}

impl TryFrom<ContentType> for DomainContentType {
    type Error = TypeConstraintError;

    fn try_from(content_type: ContentType) -> Result<Self, Self::Error> {
        Ok(Self {
            id: ContentTypeId::try_from(content_type.id)?,
            app_label: content_type.app_label,
            model: content_type.model,
        })
    }
}

impl TryFrom<Permission> for DomainPermission {
    type Error = TypeConstraintError;

    fn try_from(permission: Permission) -> Result<Self, Self::Error> {
        Ok(Self {
            id: PermissionId::try_from(permission.id)?,
            content_type_id: ContentTypeId::try_from(permission.content_type_id)?,
            codename: permission.codename,
            name: permission.name,
        })
    }
}
