//! Configuration management for mdweave.
//!
//! Parses `mdweave.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ```toml
//! [pipeline]
//! extensions = ["yaml_front_matter", "citations"]
//!
//! [html]
//! escape = true
//!
//! [normalize]
//! expand_auto_links = false
//! ```

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::Deserialize;

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Replace the configured extension list.
    pub extensions: Option<Vec<ExtensionName>>,
    /// Override HTML escaping of literal text.
    pub escape_html: Option<bool>,
    /// Override auto-link expansion in normalized output.
    pub expand_auto_links: Option<bool>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "mdweave.toml";

/// Application configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Pipeline assembly.
    pub pipeline: PipelineConfig,
    /// HTML renderer options.
    pub html: HtmlConfig,
    /// Normalize renderer options.
    pub normalize: NormalizeConfig,

    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

/// Pipeline configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineConfig {
    /// Extensions in registration order.
    pub extensions: Vec<ExtensionName>,
}

/// Extensions that can be enabled by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtensionName {
    Citations,
    YamlFrontMatter,
    ListExtras,
    CustomContainers,
    Mathematics,
    AutoLinks,
}

impl ExtensionName {
    /// Every extension, in the order they are listed to users.
    pub const ALL: [Self; 6] = [
        Self::Citations,
        Self::YamlFrontMatter,
        Self::ListExtras,
        Self::CustomContainers,
        Self::Mathematics,
        Self::AutoLinks,
    ];

    /// Name as written in `mdweave.toml`.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Citations => "citations",
            Self::YamlFrontMatter => "yaml_front_matter",
            Self::ListExtras => "list_extras",
            Self::CustomContainers => "custom_containers",
            Self::Mathematics => "mathematics",
            Self::AutoLinks => "auto_links",
        }
    }
}

impl fmt::Display for ExtensionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExtensionName {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|name| name.as_str() == s)
            .ok_or_else(|| ConfigError::Validation(format!("unknown extension: {s}")))
    }
}

/// HTML renderer configuration.
#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HtmlConfig {
    /// Escape `<`, `>`, `&` and quotes in literal text.
    pub escape: bool,
    /// Emit block-level tags.
    pub block_tags: bool,
    /// Emit inline tags.
    pub inline_tags: bool,
}

impl Default for HtmlConfig {
    fn default() -> Self {
        Self {
            escape: true,
            block_tags: true,
            inline_tags: true,
        }
    }
}

/// Normalize renderer configuration.
#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NormalizeConfig {
    /// Write bare URLs as `[url](url)`.
    pub expand_auto_links: bool,
    /// Blank line after every heading.
    pub empty_line_after_heading: bool,
    /// Blank line after every code block.
    pub empty_line_after_code_block: bool,
}

impl Default for NormalizeConfig {
    fn default() -> Self {
        Self {
            expand_auto_links: true,
            empty_line_after_heading: true,
            empty_line_after_code_block: true,
        }
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `mdweave.toml` in current directory and parents,
    /// falling back to defaults when none is found.
    ///
    /// CLI settings are applied after loading and the result is validated.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist, parsing fails or
    /// validation fails.
    pub fn load(config_path: Option<&Path>, cli_settings: Option<&CliSettings>) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = std::env::current_dir()
            .ok()
            .and_then(|cwd| discover_config(&cwd))
        {
            Self::load_from_file(&discovered)?
        } else {
            Self::default()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
        }

        config.validate()?;
        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(extensions) = &settings.extensions {
            self.pipeline.extensions.clone_from(extensions);
        }
        if let Some(escape) = settings.escape_html {
            self.html.escape = escape;
        }
        if let Some(expand) = settings.expand_auto_links {
            self.normalize.expand_auto_links = expand;
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;
        config.config_path = Some(path.to_path_buf());
        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if an extension is listed twice.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let extensions = &self.pipeline.extensions;
        for (index, name) in extensions.iter().enumerate() {
            if extensions[..index].contains(name) {
                return Err(ConfigError::Validation(format!(
                    "pipeline.extensions lists {name} more than once"
                )));
            }
        }
        Ok(())
    }
}

/// Search for a config file in `start` and its parents.
fn discover_config(start: &Path) -> Option<PathBuf> {
    let mut current = start.to_path_buf();
    loop {
        let candidate = current.join(CONFIG_FILENAME);
        if candidate.exists() {
            return Some(candidate);
        }
        if !current.pop() {
            return None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.pipeline.extensions.is_empty());
        assert!(config.html.escape);
        assert!(config.html.block_tags);
        assert!(config.normalize.expand_auto_links);
        assert!(config.config_path.is_none());
    }

    #[test]
    fn test_parse_minimal_config() {
        let config: Config = toml::from_str("").unwrap();
        assert!(config.pipeline.extensions.is_empty());
        assert!(config.html.inline_tags);
    }

    #[test]
    fn test_parse_full_config() {
        let toml = r#"
[pipeline]
extensions = ["yaml_front_matter", "citations", "auto_links"]

[html]
escape = false

[normalize]
empty_line_after_heading = false
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(
            config.pipeline.extensions,
            vec![
                ExtensionName::YamlFrontMatter,
                ExtensionName::Citations,
                ExtensionName::AutoLinks
            ]
        );
        assert!(!config.html.escape);
        assert!(config.html.block_tags);
        assert!(!config.normalize.empty_line_after_heading);
        assert!(config.normalize.expand_auto_links);
    }

    #[test]
    fn test_unknown_extension_fails_parsing() {
        let result: Result<Config, _> = toml::from_str("[pipeline]\nextensions = [\"tables\"]\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_unknown_option_fails_parsing() {
        let result: Result<Config, _> = toml::from_str("[html]\nsanitize = true\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_extension_names_round_trip() {
        for name in ExtensionName::ALL {
            assert_eq!(name.as_str().parse::<ExtensionName>().unwrap(), name);
        }
        assert!(matches!(
            "tables".parse::<ExtensionName>(),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn test_validate_rejects_duplicate_extensions() {
        let mut config = Config::default();
        config.pipeline.extensions = vec![ExtensionName::Citations, ExtensionName::Citations];
        let err = config.validate().unwrap_err();
        assert_eq!(
            err.to_string(),
            "Configuration error: pipeline.extensions lists citations more than once"
        );
    }

    #[test]
    fn test_apply_cli_settings() {
        let mut config = Config::default();
        config.apply_cli_settings(&CliSettings {
            extensions: Some(vec![ExtensionName::Mathematics]),
            escape_html: Some(false),
            expand_auto_links: Some(false),
        });
        assert_eq!(config.pipeline.extensions, vec![ExtensionName::Mathematics]);
        assert!(!config.html.escape);
        assert!(!config.normalize.expand_auto_links);
    }

    #[test]
    fn test_apply_cli_settings_empty() {
        let mut config = Config::default();
        config.pipeline.extensions = vec![ExtensionName::ListExtras];
        config.apply_cli_settings(&CliSettings::default());
        assert_eq!(config.pipeline.extensions, vec![ExtensionName::ListExtras]);
        assert!(config.html.escape);
    }

    #[test]
    fn test_load_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        std::fs::write(&path, "[pipeline]\nextensions = [\"mathematics\"]\n").unwrap();

        let config = Config::load(Some(&path), None).unwrap();
        assert_eq!(config.pipeline.extensions, vec![ExtensionName::Mathematics]);
        assert_eq!(config.config_path, Some(path));
    }

    #[test]
    fn test_load_rejects_unknown_section() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mdweave.toml");
        std::fs::write(&path, "[pipelines]\nextensions = [\"mathematics\"]\n").unwrap();

        assert!(matches!(Config::load(Some(&path), None), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_load_missing_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.toml");
        assert!(matches!(
            Config::load(Some(&path), None),
            Err(ConfigError::NotFound(missing)) if missing == path
        ));
    }

    #[test]
    fn test_load_validates_cli_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        std::fs::write(&path, "").unwrap();

        let settings = CliSettings {
            extensions: Some(vec![ExtensionName::AutoLinks, ExtensionName::AutoLinks]),
            ..CliSettings::default()
        };
        assert!(matches!(
            Config::load(Some(&path), Some(&settings)),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn test_discover_config_in_parent() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("docs").join("guide");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(dir.path().join(CONFIG_FILENAME), "").unwrap();

        assert_eq!(discover_config(&nested), Some(dir.path().join(CONFIG_FILENAME)));
    }

    #[test]
    fn test_discover_config_prefers_nearest() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("docs");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(dir.path().join(CONFIG_FILENAME), "").unwrap();
        std::fs::write(nested.join(CONFIG_FILENAME), "").unwrap();

        assert_eq!(discover_config(&nested), Some(nested.join(CONFIG_FILENAME)));
    }
}
