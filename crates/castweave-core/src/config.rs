//! Layered configuration.
//!
//! Sources, lowest precedence first:
//!
//! 1. built-in defaults
//! 2. the user file, `~/.config/castweave/config.<ext>`
//! 3. project files in the nearest directory (walking up from the search
//!    root) holding `.castweave.<ext>` or `castweave.<ext>`
//! 4. files passed explicitly (`--config`)
//! 5. `CASTWEAVE_*` environment variables
//!
//! `<ext>` is `toml`, `yaml`, `yml` or `json`. Files found in the same
//! directory are all merged by figment, dotfiles first, and within each
//! name toml < yaml < yml < json.
//!
//! # Example
//! ```no_run
//! use camino::Utf8PathBuf;
//! use castweave_core::config::{Config, ConfigLoader};
//!
//! let cwd = std::env::current_dir().unwrap();
//! let cwd = Utf8PathBuf::try_from(cwd).expect("current directory is not valid UTF-8");
//! let (config, _sources) = ConfigLoader::new()
//!     .with_project_search(&cwd)
//!     .load()
//!     .unwrap();
//! println!("window: {}", config.window_size);
//! ```

use camino::{Utf8Path, Utf8PathBuf};
use figment::Figment;
use figment::providers::{Env, Format, Json, Serialized, Toml, Yaml};
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};
use crate::sentiment::LexiconScorer;
use crate::{DEFAULT_MAX_INPUT_BYTES, DEFAULT_WINDOW_SIZE};

/// The configuration for castweave.
///
/// Deserialized from config files found during discovery (TOML, YAML, or
/// JSON) and from `CASTWEAVE_*` environment variables.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Log level for the application (e.g., "debug", "info", "warn", "error").
    pub log_level: LogLevel,
    /// Directory for JSONL log files (falls back to platform defaults if unset).
    pub log_dir: Option<Utf8PathBuf>,
    /// Window width in tokens (default: 50).
    pub window_size: usize,
    /// Default character roster, used when a command is given none.
    pub characters: Vec<String>,
    /// Keep the "alone" diagonal of the pair frequency matrix in output.
    pub keep_self_pairs: bool,
    /// Normalize quotes, dashes and stray symbols before tokenizing.
    pub clean_input: bool,
    /// JSON file of extra `word → valence` entries for the sentiment lexicon.
    ///
    /// Relative paths resolve against the directory of the config file that
    /// set them, or the working directory when set from the environment.
    pub lexicon: Option<Utf8PathBuf>,
    /// Maximum input size in bytes (default: 5 MiB).
    ///
    /// Applies to both the CLI and the MCP server. Use `disable_input_limit`
    /// to remove the limit entirely.
    pub max_input_bytes: Option<usize>,
    /// Disable the input size limit entirely.
    pub disable_input_limit: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: LogLevel::default(),
            log_dir: None,
            window_size: DEFAULT_WINDOW_SIZE,
            characters: Vec::new(),
            keep_self_pairs: false,
            clean_input: false,
            lexicon: None,
            max_input_bytes: None,
            disable_input_limit: false,
        }
    }
}

impl Config {
    /// The input size limit in effect, or `None` when disabled.
    pub fn input_limit(&self) -> Option<usize> {
        if self.disable_input_limit {
            None
        } else {
            Some(self.max_input_bytes.unwrap_or(DEFAULT_MAX_INPUT_BYTES))
        }
    }

    /// Build the sentiment scorer, folding in the configured lexicon file.
    ///
    /// A relative `lexicon` path is resolved against `base`.
    pub fn scorer(&self, base: &Utf8Path) -> ConfigResult<LexiconScorer> {
        let scorer = LexiconScorer::new();
        match &self.lexicon {
            Some(path) if path.is_relative() => scorer.with_lexicon_file(&base.join(path)),
            Some(path) => scorer.with_lexicon_file(path),
            None => Ok(scorer),
        }
    }
}

/// Log level configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Verbose output for debugging and development.
    Debug,
    /// Standard operational information (default).
    #[default]
    Info,
    /// Warnings about potential issues.
    Warn,
    /// Errors that indicate failures.
    Error,
}

impl LogLevel {
    /// Returns the log level as a lowercase string slice.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

/// The files that contributed to a loaded [`Config`].
///
/// Commands report these instead of repeating discovery.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ConfigSources {
    /// Project files from the nearest matching directory, low to high precedence.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub project_files: Vec<Utf8PathBuf>,
    /// The user-level config file, if one exists.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_file: Option<Utf8PathBuf>,
    /// Files passed with `--config`, in order.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub explicit_files: Vec<Utf8PathBuf>,
}

impl ConfigSources {
    /// The file with the final say: the last explicit file, else the last
    /// project file, else the user file.
    pub fn primary_file(&self) -> Option<&Utf8Path> {
        self.explicit_files
            .last()
            .map(Utf8PathBuf::as_path)
            .or_else(|| self.project_files.last().map(Utf8PathBuf::as_path))
            .or(self.user_file.as_deref())
    }

    /// Directory that relative paths in the config resolve against.
    ///
    /// The primary file's directory, else `fallback`.
    pub fn base_dir<'a>(&'a self, fallback: &'a Utf8Path) -> &'a Utf8Path {
        self.primary_file()
            .and_then(Utf8Path::parent)
            .filter(|dir| !dir.as_str().is_empty())
            .unwrap_or(fallback)
    }
}

/// Recognized extensions, lowest precedence first.
const CONFIG_EXTENSIONS: &[&str] = &["toml", "yaml", "yml", "json"];

/// Used for config file names and platform directories.
const APP_NAME: &str = "castweave";

/// Prefix for environment variable overrides.
const ENV_PREFIX: &str = "CASTWEAVE_";

/// Builder that discovers and merges configuration sources.
#[derive(Debug, Default)]
pub struct ConfigLoader {
    project_search_root: Option<Utf8PathBuf>,
    include_user_config: bool,
    /// Directory entry that ends the upward search (`.git` by default).
    boundary_marker: Option<String>,
    explicit_files: Vec<Utf8PathBuf>,
}

impl ConfigLoader {
    /// Loader with the user file enabled and a `.git` search boundary.
    pub fn new() -> Self {
        Self {
            project_search_root: None,
            include_user_config: true,
            boundary_marker: Some(".git".to_string()),
            explicit_files: Vec::new(),
        }
    }

    /// Look for project files from `path` upward.
    pub fn with_project_search<P: AsRef<Utf8Path>>(mut self, path: P) -> Self {
        self.project_search_root = Some(path.as_ref().to_path_buf());
        self
    }

    /// Include or skip the user-level config file.
    pub const fn with_user_config(mut self, include: bool) -> Self {
        self.include_user_config = include;
        self
    }

    /// Stop the upward search at a directory containing `marker`.
    ///
    /// Files next to the marker are still found.
    pub fn with_boundary_marker<S: Into<String>>(mut self, marker: S) -> Self {
        self.boundary_marker = Some(marker.into());
        self
    }

    /// Search all the way to the filesystem root.
    pub fn without_boundary_marker(mut self) -> Self {
        self.boundary_marker = None;
        self
    }

    /// Merge `path` after every discovered file; later calls win.
    pub fn with_file<P: AsRef<Utf8Path>>(mut self, path: P) -> Self {
        self.explicit_files.push(path.as_ref().to_path_buf());
        self
    }

    /// Load configuration, merging all discovered sources.
    ///
    /// Precedence (highest to lowest):
    /// 1. `CASTWEAVE_*` environment variables
    /// 2. Explicit files (in order added via `with_file`)
    /// 3. Project config (closest to search root)
    /// 4. User config (`~/.config/castweave/config.<ext>`)
    /// 5. Default values
    #[tracing::instrument(skip(self), fields(search_root = ?self.project_search_root))]
    pub fn load(self) -> ConfigResult<(Config, ConfigSources)> {
        tracing::debug!("loading configuration");
        let mut figment = Figment::new().merge(Serialized::defaults(Config::default()));
        let mut sources = ConfigSources::default();

        if self.include_user_config
            && let Some(user_config) = self.find_user_config()
        {
            figment = Self::merge_file(figment, &user_config);
            sources.user_file = Some(user_config);
        }

        if let Some(ref root) = self.project_search_root {
            let project_configs = self.find_project_configs(root);
            for pc in &project_configs {
                figment = Self::merge_file(figment, pc);
            }
            sources.project_files = project_configs;
        }

        for file in &self.explicit_files {
            figment = Self::merge_file(figment, file);
        }
        sources.explicit_files = self.explicit_files;

        // CASTWEAVE_WINDOW_SIZE=80, CASTWEAVE_CHARACTERS=[Aang,Sokka], etc.
        figment = figment.merge(Env::prefixed(ENV_PREFIX).lowercase(true));

        let config: Config = figment
            .extract()
            .map_err(|e| ConfigError::Deserialize(Box::new(e)))?;
        tracing::info!(
            log_level = config.log_level.as_str(),
            window_size = config.window_size,
            characters = config.characters.len(),
            "configuration loaded"
        );
        Ok((config, sources))
    }

    /// Like [`ConfigLoader::load`], but [`ConfigError::NotFound`] when no
    /// file of any kind exists.
    pub fn load_or_error(self) -> ConfigResult<(Config, ConfigSources)> {
        let has_user = self.include_user_config && self.find_user_config().is_some();
        let has_project = self
            .project_search_root
            .as_ref()
            .is_some_and(|root| !self.find_project_configs(root).is_empty());
        let has_explicit = !self.explicit_files.is_empty();

        if !has_user && !has_project && !has_explicit {
            return Err(ConfigError::NotFound);
        }

        self.load()
    }

    /// Find project config files by walking up from the given directory.
    ///
    /// Returns all matching config files from the closest directory that has
    /// any match, dotfiles before regular files (low to high precedence).
    fn find_project_configs(&self, start: &Utf8Path) -> Vec<Utf8PathBuf> {
        let mut current = Some(start.to_path_buf());

        while let Some(dir) = current {
            let mut found = Vec::new();
            for ext in CONFIG_EXTENSIONS {
                let dotfile = dir.join(format!(".{APP_NAME}.{ext}"));
                if dotfile.is_file() {
                    found.push(dotfile);
                }
            }
            for ext in CONFIG_EXTENSIONS {
                let regular = dir.join(format!("{APP_NAME}.{ext}"));
                if regular.is_file() {
                    found.push(regular);
                }
            }

            if !found.is_empty() {
                return found;
            }

            // Checked after the config files so a config beside the marker is found.
            if let Some(ref marker) = self.boundary_marker
                && dir.join(marker).exists()
                && dir != start
            {
                break;
            }

            current = dir.parent().map(Utf8Path::to_path_buf);
        }

        Vec::new()
    }

    /// First `config.<ext>` present in the user config directory.
    fn find_user_config(&self) -> Option<Utf8PathBuf> {
        let config_dir = user_config_dir()?;
        CONFIG_EXTENSIONS
            .iter()
            .map(|ext| config_dir.join(format!("config.{ext}")))
            .find(|path| path.is_file())
    }

    /// Merge one file, choosing the format by extension (TOML otherwise).
    fn merge_file(figment: Figment, path: &Utf8Path) -> Figment {
        match path.extension() {
            Some("yaml" | "yml") => figment.merge(Yaml::file_exact(path.as_str())),
            Some("json") => figment.merge(Json::file_exact(path.as_str())),
            _ => figment.merge(Toml::file_exact(path.as_str())),
        }
    }
}

/// Platform config directory for castweave (`~/.config/castweave` on Linux).
///
/// `None` when no home directory can be determined.
pub fn user_config_dir() -> Option<Utf8PathBuf> {
    let dirs = directories::ProjectDirs::from("", "", APP_NAME)?;
    Utf8PathBuf::from_path_buf(dirs.config_dir().to_path_buf()).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::sync::{Mutex, MutexGuard};
    use tempfile::TempDir;

    /// Serializes tests that mutate environment variables via `set_var`/`remove_var`.
    static TEST_ENV_MUTEX: Mutex<()> = Mutex::new(());

    fn env_lock() -> MutexGuard<'static, ()> {
        TEST_ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn utf8(path: std::path::PathBuf) -> Utf8PathBuf {
        Utf8PathBuf::try_from(path).unwrap()
    }

    #[test]
    fn default_config() {
        let config = Config::default();
        assert_eq!(config.log_level, LogLevel::Info);
        assert_eq!(config.window_size, DEFAULT_WINDOW_SIZE);
        assert!(config.characters.is_empty());
        assert!(!config.keep_self_pairs);
        assert!(config.log_dir.is_none());
    }

    #[test]
    fn loader_builds_with_defaults() {
        let _lock = env_lock();
        let (config, sources) = ConfigLoader::new()
            .with_user_config(false)
            .without_boundary_marker()
            .load()
            .unwrap();
        assert_eq!(config.window_size, DEFAULT_WINDOW_SIZE);
        assert!(sources.primary_file().is_none());
    }

    #[test]
    fn single_file_overrides_default() {
        let _lock = env_lock();
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join("config.toml");
        fs::write(
            &config_path,
            r#"log_level = "debug"
window_size = 80
characters = ["Aang", "Sokka", "Zuko"]
keep_self_pairs = true
"#,
        )
        .unwrap();

        let (config, _sources) = ConfigLoader::new()
            .with_user_config(false)
            .with_file(utf8(config_path))
            .load()
            .unwrap();

        assert_eq!(config.log_level, LogLevel::Debug);
        assert_eq!(config.window_size, 80);
        assert_eq!(config.characters, ["Aang", "Sokka", "Zuko"]);
        assert!(config.keep_self_pairs);
        assert!(!config.clean_input);
    }

    #[test]
    fn yaml_and_json_configs_load() {
        let _lock = env_lock();
        let tmp = TempDir::new().unwrap();
        let yaml = tmp.path().join("castweave.yaml");
        fs::write(&yaml, "window_size: 30\ncharacters:\n  - Toph\n  - Katara\n").unwrap();
        let json = tmp.path().join("override.json");
        fs::write(&json, r#"{"clean_input": true}"#).unwrap();

        let (config, sources) = ConfigLoader::new()
            .with_user_config(false)
            .with_file(utf8(yaml))
            .with_file(utf8(json.clone()))
            .load()
            .unwrap();

        assert_eq!(config.window_size, 30);
        assert_eq!(config.characters, ["Toph", "Katara"]);
        assert!(config.clean_input);
        assert_eq!(sources.primary_file(), Some(utf8(json).as_path()));
    }

    #[test]
    fn yaml_config_matches_serde_yaml() {
        let parsed: Config =
            serde_yaml::from_str("window_size: 12\nlexicon: words.json\n").unwrap();
        assert_eq!(parsed.window_size, 12);
        assert_eq!(parsed.lexicon.as_deref(), Some(Utf8Path::new("words.json")));
        assert_eq!(parsed.log_level, LogLevel::Info);
    }

    #[test]
    fn later_file_overrides_earlier() {
        let _lock = env_lock();
        let tmp = TempDir::new().unwrap();
        let base = tmp.path().join("base.toml");
        fs::write(&base, "window_size = 10").unwrap();
        let over = tmp.path().join("override.toml");
        fs::write(&over, "window_size = 20").unwrap();

        let (config, _sources) = ConfigLoader::new()
            .with_user_config(false)
            .with_file(utf8(base))
            .with_file(utf8(over))
            .load()
            .unwrap();

        assert_eq!(config.window_size, 20);
    }

    #[test]
    fn project_config_discovery() {
        let _lock = env_lock();
        let tmp = TempDir::new().unwrap();
        let project_dir = tmp.path().join("project");
        let sub_dir = project_dir.join("chapters").join("book-one");
        fs::create_dir_all(&sub_dir).unwrap();
        fs::write(project_dir.join(".castweave.toml"), "window_size = 64").unwrap();

        let (config, sources) = ConfigLoader::new()
            .with_user_config(false)
            .without_boundary_marker()
            .with_project_search(utf8(sub_dir))
            .load()
            .unwrap();

        assert_eq!(config.window_size, 64);
        assert_eq!(sources.project_files.len(), 1);
    }

    #[test]
    fn regular_file_overrides_dotfile() {
        let _lock = env_lock();
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(".castweave.toml"), "window_size = 5\nclean_input = true").unwrap();
        fs::write(tmp.path().join("castweave.toml"), "window_size = 7").unwrap();

        let (config, sources) = ConfigLoader::new()
            .with_user_config(false)
            .without_boundary_marker()
            .with_project_search(utf8(tmp.path().to_path_buf()))
            .load()
            .unwrap();

        assert_eq!(config.window_size, 7);
        assert!(config.clean_input);
        assert_eq!(sources.project_files.len(), 2);
    }

    #[test]
    fn boundary_marker_stops_search() {
        let _lock = env_lock();
        let tmp = TempDir::new().unwrap();
        let parent = tmp.path().join("parent");
        let child = parent.join("child");
        let work = child.join("work");
        fs::create_dir_all(&work).unwrap();
        fs::write(parent.join(".castweave.toml"), "window_size = 3").unwrap();
        fs::create_dir(child.join(".git")).unwrap();

        let (config, sources) = ConfigLoader::new()
            .with_user_config(false)
            .with_boundary_marker(".git")
            .with_project_search(utf8(work))
            .load()
            .unwrap();

        assert_eq!(config.window_size, DEFAULT_WINDOW_SIZE);
        assert!(sources.project_files.is_empty());
    }

    #[test]
    fn explicit_file_overrides_project_config() {
        let _lock = env_lock();
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(".castweave.toml"), "window_size = 9").unwrap();
        let over = tmp.path().join("override.toml");
        fs::write(&over, "window_size = 11").unwrap();

        let (config, sources) = ConfigLoader::new()
            .with_user_config(false)
            .without_boundary_marker()
            .with_project_search(utf8(tmp.path().to_path_buf()))
            .with_file(utf8(over))
            .load()
            .unwrap();

        assert_eq!(config.window_size, 11);
        assert!(!sources.project_files.is_empty());
        assert_eq!(sources.explicit_files.len(), 1);
    }

    #[test]
    fn load_or_error_fails_when_no_config() {
        let _lock = env_lock();
        let result = ConfigLoader::new()
            .with_user_config(false)
            .without_boundary_marker()
            .load_or_error();
        assert!(matches!(result, Err(ConfigError::NotFound)));
    }

    #[test]
    fn malformed_config_is_a_deserialize_error() {
        let _lock = env_lock();
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("bad.toml");
        fs::write(&path, "window_size = \"wide\"").unwrap();

        let result = ConfigLoader::new()
            .with_user_config(false)
            .with_file(utf8(path))
            .load();
        assert!(matches!(result, Err(ConfigError::Deserialize(_))));
    }

    #[test]
    fn user_config_dir_names_the_app() {
        if let Some(path) = user_config_dir() {
            assert!(path.as_str().contains("castweave"));
        }
    }

    #[test]
    fn input_limit_defaults_and_overrides() {
        let mut config = Config::default();
        assert_eq!(config.input_limit(), Some(DEFAULT_MAX_INPUT_BYTES));
        config.max_input_bytes = Some(1024);
        assert_eq!(config.input_limit(), Some(1024));
        config.disable_input_limit = true;
        assert_eq!(config.input_limit(), None);
    }

    #[test]
    fn relative_lexicon_resolves_against_base() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("words.json"), r#"{"sky bison": 3.0, "bending": 2.5}"#).unwrap();
        let config = Config {
            lexicon: Some(Utf8PathBuf::from("words.json")),
            ..Config::default()
        };
        let base = utf8(tmp.path().to_path_buf());
        let default_len = LexiconScorer::new().len();
        let scorer = config.scorer(&base).unwrap();
        assert!(scorer.len() > default_len);

        let missing = Config {
            lexicon: Some(Utf8PathBuf::from("absent.json")),
            ..Config::default()
        };
        assert!(matches!(
            missing.scorer(&base),
            Err(ConfigError::LexiconFile { .. })
        ));
    }

    #[test]
    fn base_dir_prefers_primary_file() {
        let sources = ConfigSources {
            explicit_files: vec![Utf8PathBuf::from("/stories/castweave.toml")],
            ..ConfigSources::default()
        };
        assert_eq!(sources.base_dir(Utf8Path::new("/cwd")).as_str(), "/stories");
        assert_eq!(
            ConfigSources::default().base_dir(Utf8Path::new("/cwd")).as_str(),
            "/cwd"
        );
    }

    #[test]
    #[allow(unsafe_code)]
    fn env_var_overrides_file_config() {
        let _lock = env_lock();

        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        fs::write(&path, "window_size = 40").unwrap();

        // SAFETY: Test environment; the mutex serializes env access across tests.
        unsafe {
            std::env::set_var("CASTWEAVE_WINDOW_SIZE", "90");
        }

        let result = ConfigLoader::new()
            .with_user_config(false)
            .with_file(utf8(path))
            .load();

        // SAFETY: Cleanup after test.
        unsafe {
            std::env::remove_var("CASTWEAVE_WINDOW_SIZE");
        }

        assert_eq!(result.unwrap().0.window_size, 90);
    }
}
