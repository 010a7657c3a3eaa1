//! Gallery configuration file and environment overrides

use std::path::{Path, PathBuf};

use crate::domains::gallery::GalleryConfig;

/// Explicit configuration file, takes precedence over the default location.
pub const CONFIG_PATH_ENV: &str = "HIREOS_GALLERY_CONFIG";
/// `1|true|yes|on` or `0|false|no|off`.
pub const AUTOSCROLL_ENV: &str = "HIREOS_GALLERY_AUTOSCROLL";
/// Bend amount as a float.
pub const BEND_ENV: &str = "HIREOS_GALLERY_BEND";

const CONFIG_DIR: &str = "hireos-gallery";
const CONFIG_FILE: &str = "gallery.json";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// `<config_dir>/hireos-gallery/gallery.json`, if the platform has a config
/// directory.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(CONFIG_DIR).join(CONFIG_FILE))
}

/// Read a configuration file. A missing file is `Ok(None)`.
pub fn load_file(path: &Path) -> Result<Option<GalleryConfig>, ConfigError> {
    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(ConfigError::Io {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    serde_json::from_str(&contents)
        .map(Some)
        .map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
}

/// Apply the override values of [`AUTOSCROLL_ENV`] and [`BEND_ENV`].
/// Unparseable values are logged and ignored.
pub fn apply_overrides(
    mut config: GalleryConfig,
    autoscroll: Option<&str>,
    bend: Option<&str>,
) -> GalleryConfig {
    if let Some(value) = autoscroll {
        match value.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => config.auto_scroll_enabled = true,
            "0" | "false" | "no" | "off" => config.auto_scroll_enabled = false,
            other => log::warn!("Ignoring {AUTOSCROLL_ENV}={other}"),
        }
    }

    if let Some(value) = bend {
        match value.trim().parse::<f32>() {
            Ok(bend) if bend.is_finite() => config.bend_amount = bend,
            _ => log::warn!("Ignoring {BEND_ENV}={value}"),
        }
    }

    config
}

/// Load the gallery configuration the way the binary does: file from
/// [`CONFIG_PATH_ENV`] or the default location, then environment overrides.
/// Any failure falls back to defaults.
pub fn load_from_environment() -> GalleryConfig {
    let path = std::env::var_os(CONFIG_PATH_ENV)
        .map(PathBuf::from)
        .or_else(default_config_path);

    let config = match path.as_deref().map(load_file) {
        Some(Ok(Some(config))) => {
            if let Some(path) = &path {
                log::info!(
                    "Loaded gallery configuration from {}",
                    path.display()
                );
            }
            config
        }
        Some(Ok(None)) | None => GalleryConfig::default(),
        Some(Err(e)) => {
            log::warn!("{e}; using default gallery configuration");
            GalleryConfig::default()
        }
    };

    let autoscroll = std::env::var(AUTOSCROLL_ENV).ok();
    let bend = std::env::var(BEND_ENV).ok();
    apply_overrides(config, autoscroll.as_deref(), bend.as_deref())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_is_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = load_file(&dir.path().join("absent.json")).unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn reads_partial_file_with_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gallery.json");
        std::fs::write(
            &path,
            r#"{ "bendAmount": -2.5, "autoScrollEnabled": false }"#,
        )
        .unwrap();

        let config = load_file(&path).unwrap().unwrap();
        assert_eq!(config.bend_amount, -2.5);
        assert!(!config.auto_scroll_enabled);
        assert_eq!(
            config.scroll_speed_multiplier,
            GalleryConfig::default().scroll_speed_multiplier
        );
    }

    #[test]
    fn malformed_file_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gallery.json");
        std::fs::write(&path, "{ not json").unwrap();

        assert!(matches!(load_file(&path), Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn overrides_apply_and_reject_garbage() {
        let config =
            apply_overrides(GalleryConfig::default(), Some("off"), Some("0"));
        assert!(!config.auto_scroll_enabled);
        assert_eq!(config.bend_amount, 0.0);

        let untouched = apply_overrides(
            GalleryConfig::default(),
            Some("maybe"),
            Some("NaN"),
        );
        assert_eq!(untouched, GalleryConfig::default());
    }
}
