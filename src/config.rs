//! Persisted settings stored as TOML in the app directory.
//!
//! Config keys:
//! - `[service]`: `base_url`, `analyze_path`, `ocr_path`
//! - `[canvas]`: `width`, `height`, `pen_width`, `pen_color`
//!
//! A missing file is created with defaults on first load. `SCRY_SERVICE_URL`
//! overrides `service.base_url` without touching the file.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::analysis::api::{
    DEFAULT_ANALYZE_PATH, DEFAULT_BASE_URL, DEFAULT_OCR_PATH, EndpointError, ServiceEndpoint,
};
use crate::app_dirs;
use crate::canvas::{DEFAULT_HEIGHT, DEFAULT_WIDTH, Pen, parse_hex_color};

/// Default filename used to store the app configuration.
pub const CONFIG_FILE_NAME: &str = "config.toml";
/// Environment variable overriding the service base URL.
pub const SERVICE_URL_ENV: &str = "SCRY_SERVICE_URL";

const MAX_CANVAS_EDGE: u32 = 4096;
const MIN_PEN_WIDTH: f32 = 0.5;
const MAX_PEN_WIDTH: f32 = 64.0;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("No suitable config directory found")]
    NoConfigDir,
    #[error("Unable to create config directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid config at {path}: {source}")]
    ParseToml {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("Failed to serialize config to TOML at {path}: {source}")]
    SerializeToml {
        path: PathBuf,
        source: toml::ser::Error,
    },
    #[error(transparent)]
    Endpoint(#[from] EndpointError),
    #[error("Invalid pen colour {0:?}; expected #rrggbb")]
    PenColor(String),
}

/// Everything read from `config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    pub service: ServiceSettings,
    pub canvas: CanvasSettings,
}

/// Location and routes of the analysis service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceSettings {
    pub base_url: String,
    pub analyze_path: String,
    pub ocr_path: String,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            analyze_path: DEFAULT_ANALYZE_PATH.to_string(),
            ocr_path: DEFAULT_OCR_PATH.to_string(),
        }
    }
}

/// Drawing canvas size and pen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasSettings {
    pub width: u32,
    pub height: u32,
    pub pen_width: f32,
    pub pen_color: String,
}

impl Default for CanvasSettings {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            pen_width: Pen::default().width,
            pen_color: "#6b21a8".to_string(),
        }
    }
}

impl AppSettings {
    /// Clamp numeric settings into usable ranges.
    pub fn normalized(mut self) -> Self {
        self.canvas.width = self.canvas.width.clamp(1, MAX_CANVAS_EDGE);
        self.canvas.height = self.canvas.height.clamp(1, MAX_CANVAS_EDGE);
        self.canvas.pen_width = if self.canvas.pen_width.is_finite() {
            self.canvas.pen_width.clamp(MIN_PEN_WIDTH, MAX_PEN_WIDTH)
        } else {
            Pen::default().width
        };
        self
    }

    pub fn endpoint(&self) -> Result<ServiceEndpoint, ConfigError> {
        Ok(ServiceEndpoint::new(&self.service.base_url)?
            .with_paths(&self.service.analyze_path, &self.service.ocr_path))
    }

    pub fn pen(&self) -> Result<Pen, ConfigError> {
        let color = parse_hex_color(&self.canvas.pen_color)
            .ok_or_else(|| ConfigError::PenColor(self.canvas.pen_color.clone()))?;
        Ok(Pen {
            width: self.canvas.pen_width,
            color,
        })
    }

    /// Apply `SCRY_SERVICE_URL` when it is set and non-empty.
    pub fn with_env_overrides(mut self) -> Self {
        if let Some(url) = std::env::var(SERVICE_URL_ENV)
            .ok()
            .filter(|url| !url.trim().is_empty())
        {
            tracing::info!("Using service URL from {SERVICE_URL_ENV}: {url}");
            self.service.base_url = url;
        }
        self
    }
}

/// Resolve the configuration file path, ensuring the parent directory exists.
pub fn config_path() -> Result<PathBuf, ConfigError> {
    let dir = app_dirs::app_root_dir().map_err(map_app_dir_error)?;
    Ok(dir.join(CONFIG_FILE_NAME))
}

/// Load settings, writing a default file on first launch.
pub fn load_or_default() -> Result<AppSettings, ConfigError> {
    let path = config_path()?;
    let settings = if path.exists() {
        load_from(&path)?
    } else {
        let defaults = AppSettings::default();
        if let Err(err) = save_to_path(&defaults, &path) {
            tracing::warn!("Could not write default config: {err}");
        }
        defaults
    };
    Ok(settings.with_env_overrides())
}

/// Read settings from a specific file; missing keys take their defaults.
pub fn load_from(path: &Path) -> Result<AppSettings, ConfigError> {
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str::<AppSettings>(&text)
        .map(AppSettings::normalized)
        .map_err(|source| ConfigError::ParseToml {
            path: path.to_path_buf(),
            source,
        })
}

/// Write settings to `path`, creating parent directories as needed.
pub fn save_to_path(settings: &AppSettings, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|source| ConfigError::CreateDir {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    let text = toml::to_string_pretty(settings).map_err(|source| ConfigError::SerializeToml {
        path: path.to_path_buf(),
        source,
    })?;
    std::fs::write(path, text).map_err(|source| ConfigError::Write {
        path: path.to_path_buf(),
        source,
    })
}

fn map_app_dir_error(error: app_dirs::AppDirError) -> ConfigError {
    match error {
        app_dirs::AppDirError::NoBaseDir => ConfigError::NoConfigDir,
        app_dirs::AppDirError::CreateDir { path, source } => {
            ConfigError::CreateDir { path, source }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app_dirs::OverrideGuard;
    use image::Rgba;
    use tempfile::tempdir;

    #[test]
    fn partial_file_keeps_defaults_for_missing_keys() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "[service]\nbase_url = \"http://analysis.local:8080\"\n").unwrap();
        let settings = load_from(&path).unwrap();
        assert_eq!(settings.service.base_url, "http://analysis.local:8080");
        assert_eq!(settings.service.analyze_path, DEFAULT_ANALYZE_PATH);
        assert_eq!(settings.canvas, CanvasSettings::default());
    }

    #[test]
    fn invalid_toml_is_reported_with_path() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "[canvas\nwidth = ").unwrap();
        let err = load_from(&path).unwrap_err();
        assert!(matches!(err, ConfigError::ParseToml { .. }));
        assert!(err.to_string().contains(CONFIG_FILE_NAME));
    }

    #[test]
    fn out_of_range_canvas_values_are_clamped() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "[canvas]\nwidth = 0\nheight = 100000\npen_width = 0.0\n").unwrap();
        let settings = load_from(&path).unwrap();
        assert_eq!(settings.canvas.width, 1);
        assert_eq!(settings.canvas.height, MAX_CANVAS_EDGE);
        assert_eq!(settings.canvas.pen_width, MIN_PEN_WIDTH);
    }

    #[test]
    fn save_then_load_preserves_settings() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join(CONFIG_FILE_NAME);
        let mut settings = AppSettings::default();
        settings.service.analyze_path = "/upload_and_analyze".to_string();
        settings.canvas.pen_color = "#000000".to_string();
        save_to_path(&settings, &path).unwrap();
        assert_eq!(load_from(&path).unwrap(), settings);
    }

    #[test]
    fn load_or_default_writes_defaults_on_first_launch() {
        let base = tempdir().unwrap();
        let _guard = OverrideGuard::set(base.path().to_path_buf());
        let path = config_path().unwrap();
        assert!(!path.exists());
        let settings = load_or_default().unwrap();
        assert!(path.exists());
        assert_eq!(settings.canvas, CanvasSettings::default());
    }

    #[test]
    fn settings_build_endpoint_and_pen() {
        let settings = AppSettings::default();
        let endpoint = settings.endpoint().unwrap();
        assert_eq!(endpoint.analyze_url(), "http://127.0.0.1:5000/analyze");
        let pen = settings.pen().unwrap();
        assert_eq!(pen.color, Rgba([0x6b, 0x21, 0xa8, 0xff]));
        assert_eq!(pen.width, 4.0);
    }

    #[test]
    fn bad_pen_colour_and_url_are_errors() {
        let mut settings = AppSettings::default();
        settings.canvas.pen_color = "purple".to_string();
        assert!(matches!(settings.pen(), Err(ConfigError::PenColor(_))));
        settings.service.base_url = "nowhere".to_string();
        assert!(matches!(settings.endpoint(), Err(ConfigError::Endpoint(_))));
    }
}
