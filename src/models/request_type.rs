//! Diesel models for request types.

use diesel::prelude::*;

use crate::domain::request_type::{
    NewRequestType as DomainNewRequestType, RequestType as DomainRequestType,
};
use crate::domain::types::{RequestTypeId, RequestTypeName, TypeConstraintError};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::request_types)]
pub struct RequestType {
    pub id: i32,
    pub name: String,
    pub description: String,
}

#[derive(Insertable, AsChangeset)]
#[diesel(table_name = crate::schema::request_types)]
pub struct NewRequestType<'a> {
    pub name: &'a str,
    pub description: &'a str,
}

impl TryFrom<RequestType> for DomainRequestType {
    type Error = TypeConstraintError;

    fn try_from(request_type: RequestType) -> Result<Self, Self::Error> {
        Ok(Self {
            id: RequestTypeId::try_from(request_type.id)?,
            name: RequestTypeName::new(request_type.name)?,
            description: request_type.description,
        })
    }
}

impl<'a> From<&'a DomainNewRequestType> for NewRequestType<'a> {
    fn from(request_type: &'a DomainNewRequestType) -> Self {
        Self {
            name: request_type.name.as_str(),
            description: request_type.description.as_str(),
        }
    }
}
