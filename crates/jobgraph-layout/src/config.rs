//! Layout spacing options.

use jobgraph_core::{Error, Result};
use serde::{Deserialize, Serialize};

/// Spacing used by [`layout`](crate::position::layout). Levels advance along x, nodes of one
/// level are stacked along y around `level_offset_y`.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LayoutConfig {
    pub level_spacing: f64,
    pub node_spacing: f64,
    pub level_offset_x: f64,
    pub level_offset_y: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            level_spacing: 250.0,
            node_spacing: 100.0,
            level_offset_x: 100.0,
            level_offset_y: 300.0,
        }
    }
}

impl LayoutConfig {
    /// Parses a (possibly partial) JSON object; missing fields keep their defaults.
    pub fn from_json_str(text: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let fields = [
            ("levelSpacing", self.level_spacing),
            ("nodeSpacing", self.node_spacing),
            ("levelOffsetX", self.level_offset_x),
            ("levelOffsetY", self.level_offset_y),
        ];
        for (name, value) in fields {
            if !value.is_finite() {
                return Err(Error::InvalidConfig {
                    message: format!("`{name}` must be a finite number"),
                });
            }
        }
        if self.level_spacing < 0.0 || self.node_spacing < 0.0 {
            return Err(Error::InvalidConfig {
                message: "spacing must not be negative".to_string(),
            });
        }
        Ok(())
    }
}
