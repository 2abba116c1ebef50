//! Client add/change form, including the single extra inline request row.

use serde::Deserialize;

use crate::domain::client::NewClient;
use crate::domain::client_request::{InlineRequest, RequestStatus};
use crate::domain::types::{ClientEmail, ClientName, CompanyUrl, ContactNumber, RequestTypeId};
use crate::forms::{FormError, checkbox, optional_field};

#[derive(Debug, Default, Deserialize)]
pub struct ClientForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub contact_number: String,
    #[serde(default)]
    pub company_url: String,
    pub is_active: Option<String>,
    /// Request type of the extra inline request; blank leaves it out.
    pub request_type: Option<String>,
    pub request_status: Option<String>,
}

pub struct ClientPayload {
    pub client: NewClient,
    pub inline_request: Option<InlineRequest>,
}

impl TryFrom<ClientForm> for ClientPayload {
    type Error = FormError;

    fn try_from(form: ClientForm) -> Result<Self, Self::Error> {
        let client = NewClient::new(
            ClientName::new(form.name).map_err(|_| FormError::InvalidName)?,
            ClientEmail::new(form.email).map_err(|_| FormError::InvalidEmail)?,
            ContactNumber::new(form.contact_number)
                .map_err(|_| FormError::InvalidContactNumber)?,
            CompanyUrl::new(form.company_url).map_err(|_| FormError::InvalidUrl)?,
            checkbox(form.is_active.as_deref()),
        );

        let inline_request = match optional_field(form.request_type) {
            Some(raw) => {
                let request_type_id = raw
                    .parse::<i32>()
                    .ok()
                    .and_then(|id| RequestTypeId::new(id).ok())
                    .ok_or(FormError::InvalidChoice("request type"))?;
                let status = optional_field(form.request_status)
                    .map(RequestStatus::from)
                    .unwrap_or_default();
                Some(InlineRequest {
                    request_type_id,
                    status,
                })
            }
            None => None,
        };

        Ok(Self {
            client,
            inline_request,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> ClientForm {
        ClientForm {
            name: "Test Client".into(),
            email: "Test@Example.com".into(),
            contact_number: "0123456789".into(),
            company_url: "https://example.com".into(),
            is_active: Some("on".into()),
            ..Default::default()
        }
    }

    #[test]
    fn converts_without_inline_request() {
        let payload = ClientPayload::try_from(form()).unwrap();
        assert_eq!(payload.client.name.as_str(), "Test Client");
        assert_eq!(payload.client.email.as_str(), "test@example.com");
        assert!(payload.client.is_active);
        assert!(payload.inline_request.is_none());
    }

    #[test]
    fn false_checkbox_deactivates() {
        let payload = ClientPayload::try_from(ClientForm {
            is_active: Some("False".into()),
            ..form()
        })
        .unwrap();
        assert!(!payload.client.is_active);
    }

    #[test]
    fn inline_request_defaults_to_pending() {
        let payload = ClientPayload::try_from(ClientForm {
            request_type: Some("2".into()),
            request_status: Some(String::new()),
            ..form()
        })
        .unwrap();
        assert_eq!(
            payload.inline_request,
            Some(InlineRequest {
                request_type_id: RequestTypeId::new(2).unwrap(),
                status: RequestStatus::Pending,
            })
        );
    }

    #[test]
    fn invalid_fields_are_reported() {
        let err = ClientPayload::try_from(ClientForm {
            company_url: "not a url".into(),
            ..form()
        })
        .err()
        .unwrap();
        assert!(matches!(err, FormError::InvalidUrl));

        let err = ClientPayload::try_from(ClientForm {
            request_type: Some("abc".into()),
            ..form()
        })
        .err()
        .unwrap();
        assert!(matches!(err, FormError::InvalidChoice("request type")));
    }
}
