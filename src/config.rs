//! Locator Configuration
//!
//! Tunable matching constants and the named target library, stored in TOML
//! format. The pixel gaps are screen-resolution dependent defaults taken
//! from a 1080p desktop; recalibrate them for unusual DPI.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;

use crate::matcher::TextTarget;

/// Locator settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LocatorConfig {
    /// Minimum token confidence as a fraction of the backend's 0-100 scale.
    pub confidence_threshold: f32,
    /// Minimum similarity ratio for fuzzy variant matching.
    pub fuzz_threshold: f32,
    /// Vertical gap in pixels beyond which tokens belong to different lines.
    pub line_gap_px: i32,
    /// Horizontal budget in pixels between the two words of a pair query.
    pub pair_gap_px: i32,
    /// Minimum token confidence (0-100) for pair queries.
    pub pair_min_confidence: f32,
    /// Delay between polls while waiting for text to appear.
    pub poll_interval_ms: u64,
    /// Named targets: label -> acceptable spellings, tried in order.
    pub targets: BTreeMap<String, Vec<String>>,
}

impl Default for LocatorConfig {
    fn default() -> Self {
        Self {
            confidence_threshold: 0.8,
            fuzz_threshold: 0.8,
            line_gap_px: 10,
            pair_gap_px: 300,
            pair_min_confidence: 30.0,
            poll_interval_ms: 500,
            targets: BTreeMap::new(),
        }
    }
}

impl LocatorConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// Look up a named target from the library.
    pub fn target(&self, name: &str) -> Option<TextTarget> {
        self.targets
            .get(name)
            .map(|variants| TextTarget::Variants(variants.clone()))
    }
}

/// Load configuration from file
pub fn load_config(path: &Path) -> Result<LocatorConfig> {
    let content = std::fs::read_to_string(path)?;
    let config: LocatorConfig = toml::from_str(&content)?;
    Ok(config)
}

/// Save configuration to file
pub fn save_config(config: &LocatorConfig, path: &Path) -> Result<()> {
    let content = toml::to_string_pretty(config)?;
    std::fs::write(path, content)?;
    Ok(())
}
