//! Configuration file loader with multi-source merging

use super::error::ConfigError;
use super::file_config::FileConfig;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use std::path::{Path, PathBuf};

/// Project-level config file name, looked up in the working directory.
pub const PROJECT_CONFIG_FILE: &str = "relay.toml";

/// Prefix of environment overrides. Nested keys are separated by `__`.
pub const ENV_PREFIX: &str = "LIVE_RELAY_";

/// Where configuration is read from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigSources {
    pub global: Option<PathBuf>,
    pub project: Option<PathBuf>,
    /// Must exist when set.
    pub explicit: Option<PathBuf>,
    pub env: bool,
}

impl ConfigSources {
    /// Standard locations plus an optional explicit file.
    pub fn discover(config_path: Option<&Path>) -> Self {
        Self {
            global: ConfigLoader::global_config_path(),
            project: ConfigLoader::project_config_path(),
            explicit: config_path.map(Path::to_path_buf),
            env: true,
        }
    }
}

/// Configuration loader that handles file discovery and merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from all standard sources.
    pub fn load(config_path: Option<&Path>) -> Result<FileConfig, ConfigError> {
        Self::load_from(&ConfigSources::discover(config_path))
    }

    /// Load configuration from the given sources, later sources winning.
    ///
    /// Missing global or project files are skipped; a missing explicit file
    /// is an error.
    pub fn load_from(sources: &ConfigSources) -> Result<FileConfig, ConfigError> {
        let mut figment = Figment::new().merge(Serialized::defaults(FileConfig::default()));

        for path in [&sources.global, &sources.project].into_iter().flatten() {
            if path.exists() {
                figment = figment.merge(Toml::file(path));
            }
        }

        if let Some(path) = &sources.explicit {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.clone()));
            }
            figment = figment.merge(Toml::file(path));
        }

        if sources.env {
            figment = figment.merge(Env::prefixed(ENV_PREFIX).split("__"));
        }

        Ok(figment.extract().map_err(Box::new)?)
    }

    /// Load only default configuration (for --no-config)
    pub fn load_defaults() -> FileConfig {
        FileConfig::default()
    }

    /// Get the global config file path
    ///
    /// Returns XDG_CONFIG_HOME/live-relay/config.toml if set,
    /// otherwise falls back to ~/.config/live-relay/config.toml
    pub fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("live-relay").join("config.toml"))
    }

    /// Get the project-level config file path (if it exists)
    pub fn project_config_path() -> Option<PathBuf> {
        let path = PathBuf::from(PROJECT_CONFIG_FILE);
        path.exists().then_some(path)
    }

    /// Print the config file locations being used (for debugging)
    pub fn print_config_sources(config_path: Option<&Path>) {
        println!("Configuration sources (in priority order):");
        println!("  [ENV  ] Environment: {ENV_PREFIX}*");

        if let Some(path) = config_path {
            let mark = if path.exists() { "FOUND" } else { "MISS " };
            println!("  [{mark}] Explicit: {}", path.display());
        }

        if let Some(path) = Self::project_config_path() {
            println!("  [FOUND] Project: {}", path.display());
        } else {
            println!("  [     ] Project: ./{PROJECT_CONFIG_FILE}");
        }

        if let Some(path) = Self::global_config_path() {
            if path.exists() {
                println!("  [FOUND] Global:  {}", path.display());
            } else {
                println!("  [     ] Global:  {}", path.display());
            }
        }

        println!("  [     ] Default: built-in defaults");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write(dir: &Path, name: &str, contents: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_load_defaults() {
        let config = ConfigLoader::load_defaults();
        assert_eq!(config.relay.min_edit_interval_ms, 1000);
        assert!(config.output.color);
    }

    #[test]
    fn test_global_config_path_returns_some() {
        let path = ConfigLoader::global_config_path();
        assert!(path.is_some());
        assert!(path.unwrap().to_string_lossy().contains("live-relay"));
    }

    #[test]
    fn test_later_files_override_earlier_ones() {
        let dir = tempfile::tempdir().unwrap();
        let global = write(
            dir.path(),
            "global.toml",
            "[relay]\nmin_edit_interval_ms = 2000\nmarkup = \"plain\"\n",
        );
        let project = write(dir.path(), "project.toml", "[relay]\nmin_edit_interval_ms = 500\n");

        let sources = ConfigSources {
            global: Some(global),
            project: Some(project),
            ..ConfigSources::default()
        };
        let config = ConfigLoader::load_from(&sources).unwrap();

        assert_eq!(config.relay.min_edit_interval_ms, 500);
        assert_eq!(config.relay.markup, "plain");
        assert_eq!(config.relay.flush_chunk_size, 200);
    }

    #[test]
    fn test_explicit_file_wins() {
        let dir = tempfile::tempdir().unwrap();
        let project = write(dir.path(), "relay.toml", "[output]\ncolor = true\n");
        let explicit = write(dir.path(), "custom.toml", "[output]\ncolor = false\n");

        let sources = ConfigSources {
            project: Some(project),
            explicit: Some(explicit),
            ..ConfigSources::default()
        };
        let config = ConfigLoader::load_from(&sources).unwrap();
        assert!(!config.output.color);
    }

    #[test]
    fn test_missing_optional_files_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let sources = ConfigSources {
            global: Some(dir.path().join("absent.toml")),
            project: Some(dir.path().join("also-absent.toml")),
            ..ConfigSources::default()
        };
        let config = ConfigLoader::load_from(&sources).unwrap();
        assert_eq!(config, FileConfig::default());
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        let sources = ConfigSources {
            explicit: Some(missing.clone()),
            ..ConfigSources::default()
        };
        match ConfigLoader::load_from(&sources) {
            Err(ConfigError::NotFound(path)) => assert_eq!(path, missing),
            other => panic!("expected NotFound, got {other:?}"),
        }
    }

    #[test]
    fn test_type_mismatch_is_a_load_error() {
        let dir = tempfile::tempdir().unwrap();
        let explicit = write(
            dir.path(),
            "bad.toml",
            "[relay]\nmin_edit_interval_ms = \"soon\"\n",
        );
        let sources = ConfigSources {
            explicit: Some(explicit),
            ..ConfigSources::default()
        };
        assert!(matches!(
            ConfigLoader::load_from(&sources),
            Err(ConfigError::Load(_))
        ));
    }
}
