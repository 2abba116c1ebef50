use serde::Deserialize;

use crate::domain::request_type::NewRequestType;
use crate::domain::types::RequestTypeName;
use crate::forms::FormError;

#[derive(Debug, Deserialize)]
pub struct RequestTypeForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
}

impl TryFrom<RequestTypeForm> for NewRequestType {
    type Error = FormError;

    fn try_from(form: RequestTypeForm) -> Result<Self, Self::Error> {
        let name = RequestTypeName::new(form.name).map_err(|_| FormError::InvalidName)?;
        Ok(NewRequestType::new(name, form.description))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_name_and_description() {
        let new_type = NewRequestType::try_from(RequestTypeForm {
            name: "  Test Request Type ".into(),
            description: " Test Description ".into(),
        })
        .unwrap();
        assert_eq!(new_type.name.as_str(), "Test Request Type");
        assert_eq!(new_type.description, "Test Description");
    }

    #[test]
    fn blank_name_is_rejected() {
        let result = NewRequestType::try_from(RequestTypeForm {
            name: "   ".into(),
            description: String::new(),
        });
        assert!(matches!(result, Err(FormError::InvalidName)));
    }
}
