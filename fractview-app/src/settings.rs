use std::fs;
use std::path::{Path, PathBuf};

use fractview_core::ViewConfig;
use fractview_render::EngineConfig;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

// ---------------------------------------------------------------------------
// Application settings
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppSettings {
    #[serde(default = "default_window_width")]
    pub window_width: f32,
    #[serde(default = "default_window_height")]
    pub window_height: f32,
    #[serde(default = "default_true")]
    pub show_controls: bool,
    /// JSON array of custom palettes. Empty means `palettes.json` next to the executable.
    #[serde(default)]
    pub palettes_file: String,
    #[serde(default)]
    pub engine: EngineConfig,
}

fn default_window_width() -> f32 {
    1280.0
}
fn default_window_height() -> f32 {
    800.0
}
fn default_true() -> bool {
    true
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            window_width: default_window_width(),
            window_height: default_window_height(),
            show_controls: true,
            palettes_file: String::new(),
            engine: EngineConfig::default(),
        }
    }
}

impl AppSettings {
    /// Load settings from next to the executable, falling back to defaults.
    pub fn load() -> Self {
        Self::load_from(&settings_path())
    }

    pub fn load_from(path: &Path) -> Self {
        if path.exists() {
            match fs::read_to_string(path) {
                Ok(json) => match serde_json::from_str::<AppSettings>(&json) {
                    Ok(mut settings) => {
                        info!("Loaded settings from {}", path.display());
                        settings.sanitize();
                        return settings;
                    }
                    Err(e) => {
                        error!("Failed to parse settings: {e}");
                    }
                },
                Err(e) => {
                    error!("Failed to read settings file: {e}");
                }
            }
        } else {
            debug!("No settings file at {}", path.display());
        }
        Self::default()
    }

    /// Replace values the viewer cannot run with by their defaults.
    fn sanitize(&mut self) {
        if let Err(e) = self.engine.view.validate() {
            error!("Ignoring view settings: {e}");
            self.engine.view = ViewConfig::default();
        }
        let defaults = Self::default();
        if !(self.window_width.is_finite() && self.window_width >= 1.0) {
            self.window_width = defaults.window_width;
        }
        if !(self.window_height.is_finite() && self.window_height >= 1.0) {
            self.window_height = defaults.window_height;
        }
        if !(self.engine.border_px.is_finite() && self.engine.border_px >= 0.0) {
            warn!("Invalid border width {}, using default", self.engine.border_px);
            self.engine.border_px = defaults.engine.border_px;
        }
    }

    /// Persist settings to disk.
    pub fn save(&self) {
        self.save_to(&settings_path());
    }

    pub fn save_to(&self, path: &Path) {
        if let Some(parent) = path.parent() {
            if let Err(e) = fs::create_dir_all(parent) {
                error!("Failed to create settings directory: {e}");
                return;
            }
        }
        match serde_json::to_string_pretty(self) {
            Ok(json) => {
                if let Err(e) = fs::write(path, &json) {
                    error!("Failed to write settings: {e}");
                } else {
                    debug!("Saved settings");
                }
            }
            Err(e) => error!("Failed to serialize settings: {e}"),
        }
    }

    pub fn palettes_path(&self) -> PathBuf {
        if self.palettes_file.is_empty() {
            crate::app_dir::palettes_path()
        } else {
            PathBuf::from(&self.palettes_file)
        }
    }
}

fn settings_path() -> PathBuf {
    crate::app_dir::exe_directory().join("settings.json")
}
