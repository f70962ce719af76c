//! Domain Value Objects
//!
//! Small immutable types with validation and conversion logic.

use serde::{Deserialize, Serialize};

/// Administrative status of a server registration.
///
/// The zero value is `Inactive` so that a failed detail fetch never
/// presents a phantom record as active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServerStatus {
    Active,
    #[default]
    Inactive,
}

impl ServerStatus {
    /// Parse from the wire representation, defaulting to Inactive.
    pub fn from_str(value: &str) -> Self {
        match value {
            "active" => ServerStatus::Active,
            _ => ServerStatus::Inactive,
        }
    }

    /// Wire representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            ServerStatus::Active => "active",
            ServerStatus::Inactive => "inactive",
        }
    }
}
