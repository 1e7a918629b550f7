//! Body grid configuration loaded from JSON.

use serde::{Deserialize, Serialize};

use crate::body_grid::BodyGridKind;
use crate::error::GridConfigError;
use crate::group_box::DEFAULT_GRID_COLUMN_COUNT;

/// Strategy and fallback column count for a group box.
///
/// Missing keys take their defaults:
///
/// ```json
/// { "kind": "horizontal", "default_column_count": 3 }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BodyGridConfig {
    /// Dynamic layout strategy.
    pub kind: BodyGridKind,
    /// Column count used when no group box in the ancestor chain sets one.
    pub default_column_count: u16,
}

impl Default for BodyGridConfig {
    fn default() -> Self {
        Self {
            kind: BodyGridKind::default(),
            default_column_count: DEFAULT_GRID_COLUMN_COUNT,
        }
    }
}

impl BodyGridConfig {
    /// Parse and validate a JSON document.
    pub fn from_json(json: &str) -> Result<Self, GridConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), GridConfigError> {
        if self.default_column_count == 0 {
            return Err(GridConfigError::ZeroColumnCount);
        }
        Ok(())
    }

    pub fn to_json(&self) -> Result<String, GridConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
