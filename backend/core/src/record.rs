use serde::{Deserialize, Serialize};

/// A person extracted from message content.
///
/// Field names serialize capitalized (`Name`, `Email`, `Phone`) because that is
/// the shape the extraction prompt asks for and the shape the live feed emits.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactRecord {
    #[serde(rename = "Name", default)]
    pub name: String,
    #[serde(rename = "Email", default)]
    pub email: String,
    #[serde(rename = "Phone", default)]
    pub phone: String,
}

impl ContactRecord {
    pub fn new(name: impl Into<String>, email: impl Into<String>, phone: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            phone: phone.into(),
        }
    }

    /// True when every field is empty. Such records are never persisted.
    pub fn is_empty(&self) -> bool {
        self.name.is_empty() && self.email.is_empty() && self.phone.is_empty()
    }

    /// Spreadsheet row in column order.
    pub fn to_row(&self) -> [&str; 3] {
        [&self.name, &self.email, &self.phone]
    }
}
