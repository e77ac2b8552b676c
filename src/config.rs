//! Optional on-disk configuration.
//!
//! The source and spec.md describe no configurability beyond the banner and
//! prompt; this is a convenience layer, never a requirement — a missing
//! file or a parse error both fall back to defaults silently.

use std::fs;
use std::path::PathBuf;

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Whether diagnostics and the REPL's dimmed `null` use ANSI color.
    pub color: bool,
    /// Whether the REPL prints its startup banner.
    pub banner: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self { color: true, banner: true }
    }
}

impl Config {
    /// Loads `$XDG_CONFIG_HOME/polyscript/config.toml` (or the platform
    /// equivalent via `dirs`), falling back to defaults if it is absent or
    /// fails to parse.
    pub fn load() -> Self {
        let Some(path) = Self::default_path() else {
            return Self::default();
        };
        Self::load_from_path(&path)
    }

    pub fn load_from_path(path: &std::path::Path) -> Self {
        match fs::read_to_string(path) {
            Ok(text) => toml::from_str(&text).unwrap_or_else(|e| {
                tracing::debug!(path = %path.display(), error = %e, "ignoring unparsable config file");
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }

    fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("polyscript").join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let config = Config::load_from_path(std::path::Path::new("/nonexistent/polyscript/config.toml"));
        assert_eq!(config, Config::default());
    }

    #[test]
    fn malformed_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "not valid toml [[[").unwrap();
        let config = Config::load_from_path(&path);
        assert_eq!(config, Config::default());
    }

    #[test]
    fn parses_a_valid_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "color = false\nbanner = false\n").unwrap();
        let config = Config::load_from_path(&path);
        assert_eq!(config, Config { color: false, banner: false });
    }
}
