use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use serde::Deserialize;

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub output: OutputConfig,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub extension: String,
    pub append_tags: bool,
    pub preserve_mtime: bool,
    pub notebook_dirs: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            extension: "md".to_string(),
            append_tags: true,
            preserve_mtime: true,
            notebook_dirs: true,
        }
    }
}

impl Config {
    /// Load config from a TOML file, or return defaults if not found.
    pub fn load(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(content) => match toml::from_str(&content) {
                Ok(config) => config,
                Err(err) => {
                    tracing::warn!("ignoring unparseable config {}: {err}", path.display());
                    Self::default()
                }
            },
            Err(err) => {
                if err.kind() != ErrorKind::NotFound {
                    tracing::warn!("ignoring unreadable config {}: {err}", path.display());
                }
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply() {
        let config = Config::default();
        assert_eq!(config.output.extension, "md");
        assert!(config.output.append_tags);
        assert!(config.output.preserve_mtime);
        assert!(config.output.notebook_dirs);
    }

    #[test]
    fn partial_file_keeps_remaining_defaults() {
        let config: Config =
            toml::from_str("[output]\nextension = \"txt\"\nappend_tags = false\n").unwrap();
        assert_eq!(config.output.extension, "txt");
        assert!(!config.output.append_tags);
        assert!(config.output.preserve_mtime);
    }

    #[test]
    fn missing_file_loads_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(&dir.path().join("nope.toml"));
        assert_eq!(config.output.extension, "md");
    }

    #[test]
    fn unreadable_file_loads_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("garbled.toml");
        fs::write(&path, [0xff, 0xfe, 0xfd]).unwrap();
        let config = Config::load(&path);
        assert_eq!(config.output.extension, "md");
    }
}
