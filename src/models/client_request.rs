//! Diesel models for client requests.

use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::client_request::{
    ClientRequest as DomainClientRequest, NewClientRequest as DomainNewClientRequest,
    RequestStatus, UpdateClientRequest as DomainUpdateClientRequest,
};
use crate::domain::types::{
    ClientId, ClientRequestId, RequestDescription, RequestTypeId, TypeConstraintError,
};
use crate::models::client::Client;
use crate::models::request_type::RequestType;

#[derive(Debug, Clone, Identifiable, Queryable, Selectable, Associations)]
#[diesel(belongs_to(Client, foreign_key = client_id))]
#[diesel(belongs_to(RequestType, foreign_key = request_type_id))]
#[diesel(table_name = crate::schema::client_requests)]
pub struct ClientRequest {
    pub id: i32,
    pub client_id: i32,
    pub request_type_id: i32,
    pub status: String,
    pub description: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::client_requests)]
pub struct NewClientRequest {
    pub client_id: i32,
    pub request_type_id: i32,
    pub status: String,
    pub description: Option<String>,
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::client_requests)]
#[diesel(treat_none_as_null = true)]
pub struct UpdateClientRequest {
    pub client_id: i32,
    pub request_type_id: i32,
    pub status: String,
    pub description: Option<String>,
    pub updated_at: NaiveDateTime,
}

impl TryFrom<ClientRequest> for DomainClientRequest {
    type Error = TypeConstraintError;

    fn try_from(request: ClientRequest) -> Result<Self, Self::Error> {
        // Stored descriptions that sanitize to nothing are treated as absent.
        let description = request
            .description
            .and_then(|text| RequestDescription::new(text).ok());

        Ok(Self {
            id: ClientRequestId::try_from(request.id)?,
            client_id: ClientId::try_from(request.client_id)?,
            request_type_id: RequestTypeId::try_from(request.request_type_id)?,
            status: RequestStatus::from(request.status),
            description,
            created_at: request.created_at,
            updated_at: request.updated_at,
        })
    }
}

impl From<&DomainNewClientRequest> for NewClientRequest {
    fn from(request: &DomainNewClientRequest) -> Self {
        Self {
            client_id: request.client_id.get(),
            request_type_id: request.request_type_id.get(),
            status: request.status.to_string(),
            description: request
                .description
                .as_ref()
                .map(|d| d.as_str().to_string()),
        }
    }
}

impl From<&DomainUpdateClientRequest> for UpdateClientRequest {
    fn from(request: &DomainUpdateClientRequest) -> Self {
        Self {
            client_id: request.client_id.get(),
            request_type_id: request.request_type_id.get(),
            status: request.status.to_string(),
            description: request
                .description
                .as_ref()
                .map(|d| d.as_str().to_string()),
            updated_at: request.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn new_request_stores_status_label() {
        let domain = DomainNewClientRequest::new(
            ClientId::new(1).unwrap(),
            RequestTypeId::new(2).unwrap(),
            RequestStatus::InProgress,
            None,
        );
        let new: NewClientRequest = (&domain).into();
        assert_eq!(new.status, "In Progress");
        assert_eq!(new.description, None);
    }

    #[test]
    fn row_into_domain_parses_status() {
        let now = Utc::now().naive_utc();
        let row = ClientRequest {
            id: 5,
            client_id: 1,
            request_type_id: 2,
            status: "Completed".to_string(),
            description: Some("Renewal <b>quote</b>".to_string()),
            created_at: now,
            updated_at: now,
        };
        let domain = DomainClientRequest::try_from(row).expect("valid request");
        assert_eq!(domain.status, RequestStatus::Completed);
        assert_eq!(
            domain.description.map(|d| d.into_inner()),
            Some("Renewal <b>quote</b>".to_string())
        );
    }
}
