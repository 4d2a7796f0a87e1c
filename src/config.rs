use std::fs;
use std::path::Path;

use a2ui_kit::a2ui::A2uiConfig;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Bytes per simulated transport chunk.
pub const DEFAULT_CHUNK_SIZE: usize = 64;

/// Demo configuration, read from TOML.
///
/// ```toml
/// chunk_size = 16
///
/// [a2ui]
/// default_surface_id = "main"
/// max_depth = 20
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub chunk_size: usize,
    pub a2ui: A2uiConfig,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            chunk_size: DEFAULT_CHUNK_SIZE,
            a2ui: A2uiConfig::default(),
        }
    }
}

impl Config {
    /// Load from `path` if given, defaults otherwise.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load_from(path),
            None => Ok(Self::default()),
        }
    }

    /// A missing file is not an error; it yields the defaults.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::info!("Config {} not found, using defaults", path.display());
            return Ok(Self::default());
        }
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let mut config: Config = toml::from_str(&contents)
            .with_context(|| format!("failed to parse {}", path.display()))?;

        if config.chunk_size == 0 {
            log::warn!("chunk_size = 0 in {}, using 1", path.display());
            config.chunk_size = 1;
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_config(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(Some(&dir.path().join("absent.toml"))).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(Config::load(None).unwrap().chunk_size, 64);
    }

    #[test]
    fn test_partial_tables() {
        let file = write_config("chunk_size = 16\n\n[a2ui]\ndefault_surface_id = \"main\"\n");
        let config = Config::load_from(file.path()).unwrap();

        assert_eq!(config.chunk_size, 16);
        assert_eq!(config.a2ui.default_surface_id, "main");
        assert_eq!(config.a2ui.max_depth, 50);
        assert_eq!(config.a2ui.data_prefix, "data:");
    }

    #[test]
    fn test_zero_chunk_size_is_clamped() {
        let file = write_config("chunk_size = 0\n");
        assert_eq!(Config::load_from(file.path()).unwrap().chunk_size, 1);
    }

    #[test]
    fn test_invalid_toml_is_an_error() {
        let file = write_config("chunk_size = \"big\"\n");
        let err = Config::load_from(file.path()).unwrap_err();
        assert!(format!("{:#}", err).contains("failed to parse"));
    }
}
