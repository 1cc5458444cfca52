//! edgy configuration
//!
//! Settings are read from `edgy.toml` in the working directory when present and can
//! be overridden with `EDGY_*` environment variables.

use edgy_core::{GLYPH_COUNT, OffsetTable};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default configuration file name, looked up in the current directory.
pub const DEFAULT_CONFIG_FILE: &str = "edgy.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct EdgyConfig {
    /// Glyph rasterization settings
    pub font: FontConfig,
    /// Atlas canvas and packing settings
    pub atlas: AtlasConfig,
    /// Where output files go
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FontConfig {
    /// Em size in pixels used for every glyph
    pub pixel_size: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct AtlasConfig {
    pub width: u32,
    pub height: u32,
    /// Advance by the trimmed glyph box instead of the nominal advance width
    pub tight_packing: bool,
    /// Empty columns after each tightly packed glyph
    pub gutter: u32,
    /// Extra columns scanned right of each nominal glyph cell
    pub scan_padding: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct OutputConfig {
    pub directory: PathBuf,
}

impl Default for FontConfig {
    fn default() -> Self {
        Self { pixel_size: 72.0 }
    }
}

impl Default for AtlasConfig {
    fn default() -> Self {
        Self {
            width: 2048,
            height: 256,
            tight_packing: true,
            gutter: 2,
            scan_padding: 10,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("."),
        }
    }
}

impl EdgyConfig {
    /// Load configuration from a TOML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load `edgy.toml` from the current directory, or defaults if it doesn't exist.
    ///
    /// A file that exists but fails to parse is still an error.
    pub fn load_or_default() -> Result<Self, ConfigError> {
        if Path::new(DEFAULT_CONFIG_FILE).exists() {
            Self::load_from_file(DEFAULT_CONFIG_FILE)
        } else {
            Ok(Self::default())
        }
    }

    /// Apply `EDGY_*` environment overrides on top of the file values.
    ///
    /// Unparseable values are reported rather than silently ignored.
    pub fn merge_with_env(&mut self) -> Result<(), ConfigError> {
        self.merge_with(|key| std::env::var(key).ok())
    }

    fn merge_with(&mut self, var: impl Fn(&str) -> Option<String>) -> Result<(), ConfigError> {
        if let Some(val) = var("EDGY_PIXEL_SIZE") {
            self.font.pixel_size = parse_var("EDGY_PIXEL_SIZE", &val)?;
        }
        if let Some(val) = var("EDGY_ATLAS_WIDTH") {
            self.atlas.width = parse_var("EDGY_ATLAS_WIDTH", &val)?;
        }
        if let Some(val) = var("EDGY_ATLAS_HEIGHT") {
            self.atlas.height = parse_var("EDGY_ATLAS_HEIGHT", &val)?;
        }
        if let Some(val) = var("EDGY_TIGHT_PACKING") {
            self.atlas.tight_packing = val == "1" || val.eq_ignore_ascii_case("true");
        }
        if let Some(val) = var("EDGY_GUTTER") {
            self.atlas.gutter = parse_var("EDGY_GUTTER", &val)?;
        }
        if let Some(val) = var("EDGY_SCAN_PADDING") {
            self.atlas.scan_padding = parse_var("EDGY_SCAN_PADDING", &val)?;
        }
        if let Some(dir) = var("EDGY_OUTPUT_DIR") {
            self.output.directory = PathBuf::from(dir);
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.atlas.width == 0 || self.atlas.height == 0 {
            return Err(ConfigError::Invalid(format!(
                "atlas size must be non-zero, got {}x{}",
                self.atlas.width, self.atlas.height
            )));
        }
        // The pixel section has to end inside the container's 32-bit offsets.
        OffsetTable::compute(GLYPH_COUNT, self.atlas.width, self.atlas.height, 0)
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;
        if !self.font.pixel_size.is_finite() || self.font.pixel_size <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "font pixel size must be positive, got {}",
                self.font.pixel_size
            )));
        }
        Ok(())
    }

    /// Load configuration the way the command line does:
    /// 1. `path` if given, else `edgy.toml` (or defaults if absent)
    /// 2. environment overrides
    /// 3. validation
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::load_from_file(path)?,
            None => Self::load_or_default()?,
        };
        config.merge_with_env()?;
        config.validate()?;
        Ok(config)
    }
}

fn parse_var<T: std::str::FromStr>(key: &str, val: &str) -> Result<T, ConfigError> {
    val.trim()
        .parse()
        .map_err(|_| ConfigError::Invalid(format!("{key}={val:?} is not a valid value")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = EdgyConfig::default();
        assert_eq!(config.font.pixel_size, 72.0);
        assert_eq!((config.atlas.width, config.atlas.height), (2048, 256));
        assert!(config.atlas.tight_packing);
        assert_eq!(config.atlas.gutter, 2);
        assert_eq!(config.output.directory, PathBuf::from("."));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_toml_serialization() {
        let config = EdgyConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: EdgyConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let parsed: EdgyConfig = toml::from_str("[atlas]\ntight_packing = false\n").unwrap();
        assert!(!parsed.atlas.tight_packing);
        assert_eq!(parsed.atlas.width, 2048);
        assert_eq!(parsed.font.pixel_size, 72.0);
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("edgy.toml");
        std::fs::write(&path, "[font]\npixel_size = 32.0\n[output]\ndirectory = \"out\"\n")
            .unwrap();
        let config = EdgyConfig::load_from_file(&path).unwrap();
        assert_eq!(config.font.pixel_size, 32.0);
        assert_eq!(config.output.directory, PathBuf::from("out"));
    }

    #[test]
    fn test_bad_toml_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("edgy.toml");
        std::fs::write(&path, "[atlas\nwidth = ").unwrap();
        assert!(matches!(
            EdgyConfig::load_from_file(&path),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn test_merge_with_env() {
        let mut config = EdgyConfig::default();
        config
            .merge_with(vars(&[
                ("EDGY_PIXEL_SIZE", "48"),
                ("EDGY_TIGHT_PACKING", "false"),
                ("EDGY_SCAN_PADDING", " 4 "),
                ("EDGY_OUTPUT_DIR", "/tmp/atlases"),
            ]))
            .unwrap();
        assert_eq!(config.font.pixel_size, 48.0);
        assert!(!config.atlas.tight_packing);
        assert_eq!(config.atlas.scan_padding, 4);
        assert_eq!(config.output.directory, PathBuf::from("/tmp/atlases"));
    }

    #[test]
    fn test_bad_env_value_is_rejected() {
        let mut config = EdgyConfig::default();
        let err = config
            .merge_with(vars(&[("EDGY_ATLAS_WIDTH", "wide")]))
            .unwrap_err();
        assert!(err.to_string().contains("EDGY_ATLAS_WIDTH"));
    }

    #[test]
    fn test_validate_rejects_degenerate_values() {
        let mut config = EdgyConfig::default();
        config.atlas.height = 0;
        assert!(config.validate().is_err());

        let mut config = EdgyConfig::default();
        config.font.pixel_size = f32::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_atlas_too_large_for_container() {
        let mut config = EdgyConfig::default();
        config.atlas.width = 30000;
        config.atlas.height = 20000;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        config.atlas.width = 16384;
        config.atlas.height = 16384;
        assert!(config.validate().is_ok());
    }
}
