use std::fmt::Display;

use chrono::{NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::types::{ClientId, ClientRequestId, RequestDescription, RequestTypeId};

/// Ticket-like record linking a client to a request type.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct ClientRequest {
    pub id: ClientRequestId,
    pub client_id: ClientId,
    pub request_type_id: RequestTypeId,
    pub status: RequestStatus,
    pub description: Option<RequestDescription>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Workflow state of a request. Unknown labels are kept verbatim.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(from = "String", into = "String")]
pub enum RequestStatus {
    #[default]
    Pending,
    InProgress,
    Completed,
    Cancelled,
    Other(String),
}

impl RequestStatus {
    /// Statuses offered in forms and changelist filters.
    pub const CHOICES: [RequestStatus; 4] = [
        RequestStatus::Pending,
        RequestStatus::InProgress,
        RequestStatus::Completed,
        RequestStatus::Cancelled,
    ];
}

impl Display for RequestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RequestStatus::Pending => write!(f, "Pending"),
            RequestStatus::InProgress => write!(f, "In Progress"),
            RequestStatus::Completed => write!(f, "Completed"),
            RequestStatus::Cancelled => write!(f, "Cancelled"),
            RequestStatus::Other(s) => write!(f, "{s}"),
        }
    }
}

impl From<&str> for RequestStatus {
    fn from(s: &str) -> Self {
        match s.trim() {
            "" | "Pending" => RequestStatus::Pending,
            "In Progress" => RequestStatus::InProgress,
            "Completed" => RequestStatus::Completed,
            "Cancelled" => RequestStatus::Cancelled,
            other => RequestStatus::Other(other.to_string()),
        }
    }
}

impl From<String> for RequestStatus {
    fn from(s: String) -> Self {
        s.as_str().into()
    }
}

impl From<RequestStatus> for String {
    fn from(status: RequestStatus) -> Self {
        status.to_string()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct NewClientRequest {
    pub client_id: ClientId,
    pub request_type_id: RequestTypeId,
    pub status: RequestStatus,
    pub description: Option<RequestDescription>,
}

impl NewClientRequest {
    #[must_use]
    pub fn new(
        client_id: ClientId,
        request_type_id: RequestTypeId,
        status: RequestStatus,
        description: Option<RequestDescription>,
    ) -> Self {
        Self {
            client_id,
            request_type_id,
            status,
            description,
        }
    }
}

/// Request entered on the client form, saved together with the client.
#[derive(Clone, Debug, PartialEq)]
pub struct InlineRequest {
    pub request_type_id: RequestTypeId,
    pub status: RequestStatus,
}

impl InlineRequest {
    #[must_use]
    pub fn for_client(&self, client_id: ClientId) -> NewClientRequest {
        NewClientRequest::new(client_id, self.request_type_id, self.status.clone(), None)
    }
}

/// Replacement values for a request; `updated_at` is stamped on construction.
#[derive(Clone, Debug, PartialEq)]
pub struct UpdateClientRequest {
    pub client_id: ClientId,
    pub request_type_id: RequestTypeId,
    pub status: RequestStatus,
    pub description: Option<RequestDescription>,
    pub updated_at: NaiveDateTime,
}

impl UpdateClientRequest {
    #[must_use]
    pub fn new(
        client_id: ClientId,
        request_type_id: RequestTypeId,
        status: RequestStatus,
        description: Option<RequestDescription>,
    ) -> Self {
        Self {
            client_id,
            request_type_id,
            status,
            description,
            updated_at: Utc::now().naive_utc(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_round_trips_known_labels() {
        for status in RequestStatus::CHOICES {
            assert_eq!(RequestStatus::from(status.to_string()), status);
        }
    }

    #[test]
    fn status_keeps_free_text() {
        let status = RequestStatus::from("Waiting on client");
        assert_eq!(status, RequestStatus::Other("Waiting on client".to_string()));
        assert_eq!(status.to_string(), "Waiting on client");
    }

    #[test]
    fn empty_status_defaults_to_pending() {
        assert_eq!(RequestStatus::from("  "), RequestStatus::Pending);
    }
}
