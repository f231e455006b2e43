// src/record/field.rs
use serde::{Deserialize, Serialize};

/// One named credential attribute of a card, e.g. a login or a password.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: String,
    pub value: String,
}

impl Field {
    pub fn new(
        name: impl Into<String>,
        field_type: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            field_type: field_type.into(),
            value: value.into(),
        }
    }
}

impl std::str::FromStr for Field {
    type Err = String;

    /// Parses `name:type:value`. The value may itself contain colons.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.splitn(3, ':');
        match (parts.next(), parts.next(), parts.next()) {
            (Some(name), Some(field_type), Some(value)) if !name.is_empty() => {
                Ok(Field::new(name, field_type, value))
            }
            _ => Err(format!(
                "Invalid field '{}'. Expected format: name:type:value",
                s
            )),
        }
    }
}
