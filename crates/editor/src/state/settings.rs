//! Editor settings

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::selection::Highlight;

/// Tuning for interactive gestures
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GestureSettings {
    /// Pointer travel (normalized screen units) before a drag starts editing
    pub dead_zone: f32,
    /// Scale change per unit of pointer distance from the pivot
    pub scale_sensitivity: f32,
    /// Half-length of the axis constraint guide line
    pub limit_line_extent: f32,
}

impl Default for GestureSettings {
    fn default() -> Self {
        Self {
            dead_zone: 0.001,
            scale_sensitivity: 1.2,
            limit_line_extent: 1000.0,
        }
    }
}

/// Selection highlight colors (RGBA)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HighlightSettings {
    /// Tint of the most recently selected object
    pub primary_tint: [f32; 4],
    /// Tint of every other selected object
    pub secondary_tint: [f32; 4],
    /// Color of the selection middle-point marker
    pub marker_color: [f32; 4],
    pub marker_scale: f32,
}

impl Default for HighlightSettings {
    fn default() -> Self {
        Self {
            primary_tint: [1.0, 0.8, 0.3, 1.0],
            secondary_tint: [1.0, 1.0, 0.4, 1.0],
            marker_color: [1.0, 0.6, 0.2, 1.0],
            marker_scale: 0.3,
        }
    }
}

impl HighlightSettings {
    /// Tint for an object in the given highlight state; `None` when unselected
    pub fn tint(&self, highlight: Highlight) -> Option<[f32; 4]> {
        match highlight {
            Highlight::Primary => Some(self.primary_tint),
            Highlight::Secondary => Some(self.secondary_tint),
            Highlight::None => None,
        }
    }
}

/// All editor settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct EditorSettings {
    #[serde(default)]
    pub gesture: GestureSettings,
    #[serde(default)]
    pub highlight: HighlightSettings,
}

impl EditorSettings {
    pub fn config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("org", "scene-editor", "scene-editor")
            .map(|dirs| dirs.config_dir().join("settings.json"))
    }

    /// Load settings from file, or return default if not found
    pub fn load() -> Self {
        Self::config_path()
            .map(|path| Self::load_from(&path))
            .unwrap_or_default()
    }

    /// Load settings from a specific file; missing or broken files give defaults
    pub fn load_from(path: &Path) -> Self {
        let Ok(json) = std::fs::read_to_string(path) else {
            return Self::default();
        };
        match Self::from_json(&json) {
            Ok(settings) => settings,
            Err(e) => {
                tracing::warn!("Ignoring {}: {e}", path.display());
                Self::default()
            }
        }
    }

    /// Parse settings from JSON text
    pub fn from_json(json: &str) -> Result<Self, String> {
        serde_json::from_str(json).map_err(|e| format!("Invalid settings JSON: {e}"))
    }

    /// Save settings to the user config file
    pub fn save(&self) -> Result<PathBuf, String> {
        let path = Self::config_path().ok_or("No config directory available")?;
        self.save_to(&path)?;
        Ok(path)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), String> {
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)
                .map_err(|e| format!("Cannot create {}: {e}", dir.display()))?;
        }
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| format!("Failed to serialize settings: {e}"))?;
        std::fs::write(path, json)
            .map_err(|e| format!("Failed to save settings to {}: {e}", path.display()))
    }
}
