use chrono::NaiveDateTime;
use serde::Serialize;

use crate::domain::types::{ClientEmail, ClientId, ClientName, CompanyUrl, ContactNumber};

/// Company or customer record managed by staff.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct Client {
    pub id: ClientId,
    pub name: ClientName,
    pub email: ClientEmail,
    pub contact_number: ContactNumber,
    pub company_url: CompanyUrl,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
}

#[derive(Clone, Debug, PartialEq)]
pub struct NewClient {
    pub name: ClientName,
    pub email: ClientEmail,
    pub contact_number: ContactNumber,
    pub company_url: CompanyUrl,
    pub is_active: bool,
}

impl NewClient {
    #[must_use]
    pub fn new(
        name: ClientName,
        email: ClientEmail,
        contact_number: ContactNumber,
        company_url: CompanyUrl,
        is_active: bool,
    ) -> Self {
        Self {
            name,
            email,
            contact_number,
            company_url,
            is_active,
        }
    }
}

/// Replacement values for every editable column of a client.
#[derive(Clone, Debug, PartialEq)]
pub struct UpdateClient {
    pub name: ClientName,
    pub email: ClientEmail,
    pub contact_number: ContactNumber,
    pub company_url: CompanyUrl,
    pub is_active: bool,
}

impl From<NewClient> for UpdateClient {
    fn from(client: NewClient) -> Self {
        Self {
            name: client.name,
            email: client.email,
            contact_number: client.contact_number,
            company_url: client.company_url,
            is_active: client.is_active,
        }
    }
}
