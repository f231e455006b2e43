use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, WalletError};

const MAX_INDENT: usize = 16;

/// Settings for reading and writing wallet documents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodecConfig {
    /// Spaces per nesting level in written documents
    pub indent: usize,
    /// Upper bound on parsed XML nodes
    pub max_nodes: u32,
    /// Accept documents carrying a DTD
    pub allow_dtd: bool,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            indent: 4,
            max_nodes: u32::MAX,
            allow_dtd: false,
        }
    }
}

impl CodecConfig {
    /// Load from a JSON file. `None` yields the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };

        let raw = fs::read_to_string(path).map_err(|e| {
            WalletError::Config(format!("cannot read {}: {}", path.display(), e))
        })?;
        let config: CodecConfig = serde_json::from_str(&raw).map_err(|e| {
            WalletError::Config(format!("invalid config {}: {}", path.display(), e))
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.indent > MAX_INDENT {
            return Err(WalletError::Config(format!(
                "indent {} exceeds maximum of {}",
                self.indent, MAX_INDENT
            )));
        }
        if self.max_nodes == 0 {
            return Err(WalletError::Config("max_nodes must be positive".to_string()));
        }
        Ok(())
    }

    pub(crate) fn parsing_options(&self) -> Result<roxmltree::ParsingOptions> {
        self.validate()?;
        let mut options = roxmltree::ParsingOptions::default();
        options.allow_dtd = self.allow_dtd;
        options.nodes_limit = self.max_nodes;
        Ok(options)
    }
}
