use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::client::{
    Client as DomainClient, NewClient as DomainNewClient, UpdateClient as DomainUpdateClient,
};
use crate::domain::types::{
    ClientEmail, ClientId, ClientName, CompanyUrl, ContactNumber, TypeConstraintError,
};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::clients)]
/// Diesel model for [`crate::domain::client::Client`].
pub struct Client {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub contact_number: String,
    pub company_url: String,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::clients)]
/// Insertable form of [`Client`].
pub struct NewClient<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub contact_number: &'a str,
    pub company_url: &'a str,
    pub is_active: bool,
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::clients)]
/// Data used when updating a [`Client`] record.
pub struct UpdateClient<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub contact_number: &'a str,
    pub company_url: &'a str,
    pub is_active: bool,
}

impl TryFrom<Client> for DomainClient {
    type Error = TypeConstraintError;

    fn try_from(client: Client) -> Result<Self, Self::Error> {
        Ok(Self {
            id: ClientId::try_from(client.id)?,
            name: ClientName::new(client.name)?,
            email: ClientEmail::new(client.email)?,
            contact_number: ContactNumber::new(client.contact_number)?,
            company_url: CompanyUrl::new(client.company_url)?,
            is_active: client.is_active,
            created_at: client.created_at,
        })
    }
}

impl<'a> From<&'a DomainNewClient> for NewClient<'a> {
    fn from(client: &'a DomainNewClient) -> Self {
        Self {
            name: client.name.as_str(),
            email: client.email.as_str(),
            contact_number: client.contact_number.as_str(),
            company_url: client.company_url.as_str(),
            is_active: client.is_active,
        }
    }
}

impl<'a> From<&'a DomainUpdateClient> for UpdateClient<'a> {
    fn from(client: &'a DomainUpdateClient) -> Self {
        Self {
            name: client.name.as_str(),
            email: client.email.as_str(),
            contact_number: client.contact_number.as_str(),
            company_url: client.company_url.as_str(),
            is_active: client.is_active,
        }
    }
}
