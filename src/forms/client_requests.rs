//! Client request add/change form and the changelist bulk action.

use serde::Deserialize;

use crate::domain::client_request::RequestStatus;
use crate::domain::types::{ClientId, ClientRequestId, RequestDescription, RequestTypeId};
use crate::forms::{FormError, optional_field};

#[derive(Debug, Default, Deserialize)]
pub struct ClientRequestForm {
    #[serde(default)]
    pub client: String,
    #[serde(default)]
    pub request_type: String,
    pub status: Option<String>,
    pub description: Option<String>,
}

/// Validated request fields, shared by the add and change pages.
#[derive(Debug, PartialEq)]
pub struct ClientRequestPayload {
    pub client_id: ClientId,
    pub request_type_id: RequestTypeId,
    pub status: RequestStatus,
    pub description: Option<RequestDescription>,
}

fn parse_id<T>(raw: &str, label: &'static str) -> Result<T, FormError>
where
    T: TryFrom<i32>,
{
    raw.trim()
        .parse::<i32>()
        .ok()
        .and_then(|id| T::try_from(id).ok())
        .ok_or(FormError::InvalidChoice(label))
}

impl TryFrom<ClientRequestForm> for ClientRequestPayload {
    type Error = FormError;

    fn try_from(form: ClientRequestForm) -> Result<Self, Self::Error> {
        Ok(Self {
            client_id: parse_id(&form.client, "client")?,
            request_type_id: parse_id(&form.request_type, "request type")?,
            status: optional_field(form.status)
                .map(RequestStatus::from)
                .unwrap_or_default(),
            // Markup-only descriptions sanitize to nothing and are dropped.
            description: optional_field(form.description)
                .and_then(|d| RequestDescription::new(d).ok()),
        })
    }
}

/// Bulk action posted from the changelist with the ticked rows.
#[derive(Debug, Deserialize)]
pub struct BulkActionForm {
    #[serde(default)]
    pub action: String,
    #[serde(default, rename = "_selected_action")]
    pub selected: Vec<i32>,
}

/// Actions offered on the client request changelist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BulkAction {
    MarkAsCompleted,
}

impl BulkAction {
    pub const fn name(self) -> &'static str {
        match self {
            BulkAction::MarkAsCompleted => "mark_as_completed",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            BulkAction::MarkAsCompleted => "Mark selected requests as completed",
        }
    }
}

pub struct BulkActionPayload {
    pub action: BulkAction,
    pub ids: Vec<ClientRequestId>,
}

impl TryFrom<&[u8]> for BulkActionPayload {
    type Error = FormError;

    fn try_from(body: &[u8]) -> Result<Self, Self::Error> {
        let form: BulkActionForm =
            serde_html_form::from_bytes(body).map_err(|e| FormError::Malformed(e.to_string()))?;

        let action = match form.action.as_str() {
            "mark_as_completed" => BulkAction::MarkAsCompleted,
            _ => return Err(FormError::InvalidChoice("action")),
        };

        let ids = form
            .selected
            .into_iter()
            .map(ClientRequestId::new)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|_| FormError::InvalidChoice("request"))?;

        Ok(Self { action, ids })
    }
}
