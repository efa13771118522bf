// SPDX-License-Identifier: MIT OR Apache-2.0
//! Router settings, stored as RON.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Tuning constants for angled noodle routing
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RouterSettings {
    /// Horizontal distance a noodle travels out of a port before turning (unscaled)
    pub node_padding: f32,
    /// How far below the padding line a loop-back's top run sits, relative to
    /// the node's top edge (unscaled)
    pub loop_clearance: f32,
    /// Maximum distance for a point to count as on the noodle (unscaled)
    pub hit_distance: f32,
    /// Lower bound of the tolerance used when checking whether two waypoints are aligned
    pub alignment_epsilon: f32,
}

impl Default for RouterSettings {
    fn default() -> Self {
        Self {
            node_padding: 25.0,
            loop_clearance: 16.0,
            hit_distance: 10.0,
            alignment_epsilon: 1e-5,
        }
    }
}

impl RouterSettings {
    /// Padding distance at `zoom`, in graph units.
    ///
    /// Dividing by zoom keeps the padding a constant size on screen.
    pub fn padding_at(&self, zoom: f32) -> f32 {
        self.node_padding / zoom
    }

    /// Height of a loop-back's top run above the node's top edge at `zoom`, in graph units
    pub fn loop_rise_at(&self, zoom: f32) -> f32 {
        (self.node_padding - self.loop_clearance) / zoom
    }

    /// Hit-test threshold at `zoom`, in graph units
    pub fn hit_distance_at(&self, zoom: f32) -> f32 {
        self.hit_distance / zoom
    }

    /// Parse settings from a RON string
    pub fn from_ron(source: &str) -> Result<Self, SettingsError> {
        Ok(ron::from_str(source)?)
    }

    /// Serialize settings to a pretty RON string
    pub fn to_ron(&self) -> Result<String, SettingsError> {
        Ok(ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())?)
    }

    /// Load settings from a RON file
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let content = std::fs::read_to_string(path)?;
        let settings = Self::from_ron(&content)?;
        tracing::debug!("Loaded router settings from {:?}", path);
        Ok(settings)
    }

    /// Save settings to a RON file
    pub fn save(&self, path: &Path) -> Result<(), SettingsError> {
        std::fs::write(path, self.to_ron()?)?;
        tracing::debug!("Saved router settings to {:?}", path);
        Ok(())
    }
}

/// Error loading or saving settings
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    /// File could not be read or written
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// File contents are not valid settings
    #[error("Parse error: {0}")]
    Parse(#[from] ron::error::SpannedError),

    /// Settings could not be serialized
    #[error("Serialize error: {0}")]
    Serialize(#[from] ron::Error),
}
