// src/record/class.rs
use serde::{Deserialize, Serialize};

use crate::error::WalletError;

/// Discriminator selecting which shape a record has.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RecordClass {
    Card,
    Note,
}

impl RecordClass {
    /// Name used for the `recordClass` attribute.
    pub fn wire_name(&self) -> &'static str {
        match self {
            RecordClass::Card => "CARD",
            RecordClass::Note => "NOTE",
        }
    }

    /// Strict lookup used by the codec: only the exact wire names match.
    pub fn parse_wire(s: &str) -> Option<Self> {
        match s {
            "CARD" => Some(RecordClass::Card),
            "NOTE" => Some(RecordClass::Note),
            _ => None,
        }
    }
}

impl std::fmt::Display for RecordClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecordClass::Card => write!(f, "card"),
            RecordClass::Note => write!(f, "note"),
        }
    }
}

impl std::str::FromStr for RecordClass {
    type Err = WalletError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "card" | "cards" => Ok(RecordClass::Card),
            "note" | "notes" => Ok(RecordClass::Note),
            _ => Err(WalletError::InvalidRecordClass(s.to_string())),
        }
    }
}
