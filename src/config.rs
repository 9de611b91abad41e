use std::fs;
use std::path::Path;

use egui::Color32;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::render::Style;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorPalette {
    pub timestamp: Color32,
    pub info: Color32,
    pub warn: Color32,
    pub error: Color32,
    pub label: Color32,
    pub message: Color32,
    pub default: Color32,
}

impl Default for ColorPalette {
    fn default() -> Self {
        Self {
            timestamp: Color32::from_rgb(156, 163, 175),
            info: Color32::from_rgb(74, 222, 128),
            warn: Color32::from_rgb(250, 204, 21),
            error: Color32::from_rgb(248, 113, 113),
            label: Color32::from_rgb(96, 165, 250),
            message: Color32::from_rgb(220, 220, 220),
            default: Color32::from_rgb(220, 220, 220),
        }
    }
}

impl ColorPalette {
    pub fn color_for(&self, style: Style) -> Color32 {
        match style {
            Style::Timestamp => self.timestamp,
            Style::Info => self.info,
            Style::Warn => self.warn,
            Style::Error => self.error,
            Style::Label => self.label,
            Style::Message => self.message,
            Style::Default => self.default,
        }
    }

    /// Editable entries for the configuration panel.
    pub fn entries_mut(&mut self) -> [(&'static str, &mut Color32); 7] {
        [
            ("Timestamp", &mut self.timestamp),
            ("Info", &mut self.info),
            ("Warn", &mut self.warn),
            ("Error", &mut self.error),
            ("Label", &mut self.label),
            ("Message", &mut self.message),
            ("Default", &mut self.default),
        ]
    }
}

/// Labels offered in the label dropdown. Filtering accepts any string.
pub fn default_labels() -> Vec<String> {
    [
        "TEST",
        "Global",
        "AccessibilityService",
        "Sync",
        "Status",
        "AbortMerge",
        "CloneRepo",
        "PullFromRepo",
        "PushToRepo",
        "RecentCommits",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub color_palette: ColorPalette,
    pub labels: Vec<String>,
    pub font_size: f32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            color_palette: ColorPalette::default(),
            labels: default_labels(),
            font_size: 13.0,
        }
    }
}

impl AppConfig {
    /// Reads a JSON config; fields missing from the file keep their defaults.
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: AppConfig = serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }
}
