use serde::Serialize;

use crate::domain::types::{RequestTypeId, RequestTypeName};

/// Categorization tag attached to client requests.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct RequestType {
    pub id: RequestTypeId,
    pub name: RequestTypeName,
    pub description: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct NewRequestType {
    pub name: RequestTypeName,
    pub description: String,
}

impl NewRequestType {
    #[must_use]
    pub fn new(name: RequestTypeName, description: impl Into<String>) -> Self {
        Self {
            name,
            description: description.into().trim().to_string(),
        }
    }
}
