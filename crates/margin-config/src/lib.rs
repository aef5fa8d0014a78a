//! Configuration management for margin.
//!
//! Parses `margin.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ## Environment Variable Expansion
//!
//! `output.dir` supports environment variable expansion:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default

mod expand;

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override output directory.
    pub output_dir: Option<PathBuf>,
    /// Override math wrapping flag.
    pub math_enabled: Option<bool>,
    /// Override sidenote numbering.
    pub numbering: Option<SidenoteNumbering>,
}

/// Configuration filename to search for.
pub const CONFIG_FILENAME: &str = "margin.toml";

/// Application configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Markdown conversion.
    pub markdown: MarkdownConfig,
    /// Sidenote rendering.
    pub sidenotes: SidenotesConfig,
    /// Inline math wrapping.
    pub math: MathConfig,
    /// Raw output configuration (internal).
    #[serde(rename = "output")]
    output_raw: OutputConfigRaw,
    /// Resolved output configuration.
    #[serde(skip)]
    pub output: OutputConfig,
    /// Path to the loaded config file (None if using defaults).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

/// Markdown conversion configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct MarkdownConfig {
    /// Enable GitHub Flavored Markdown.
    pub gfm: bool,
    /// Give headings slug `id` attributes.
    pub heading_ids: bool,
    /// Add `target="_blank"` to links that are not relative.
    pub links_new_tab: bool,
}

impl Default for MarkdownConfig {
    fn default() -> Self {
        Self {
            gfm: true,
            heading_ids: true,
            links_new_tab: true,
        }
    }
}

/// Order in which sidenotes are numbered.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SidenoteNumbering {
    /// Inline sidenotes first, then block sidenotes.
    #[default]
    TwoPass,
    /// Strict document order.
    DocumentOrder,
}

/// Sidenote rendering configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SidenotesConfig {
    /// Id assignment order.
    pub numbering: SidenoteNumbering,
    /// Classes of inline sidenote annotations.
    pub inline_class: String,
    /// Classes of block sidenote annotations.
    pub block_class: String,
}

impl Default for SidenotesConfig {
    fn default() -> Self {
        Self {
            numbering: SidenoteNumbering::default(),
            inline_class: "sidenote sidenote-inline".to_owned(),
            block_class: "sidenote sidenote-block".to_owned(),
        }
    }
}

/// Inline math configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct MathConfig {
    /// Wrap `$…$` spans.
    pub enabled: bool,
    /// Leave `$` inside code untouched.
    pub skip_code: bool,
}

impl Default for MathConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            skip_code: false,
        }
    }
}

/// Raw output configuration as parsed from TOML (paths as strings).
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct OutputConfigRaw {
    dir: Option<String>,
}

/// Resolved output configuration with absolute paths.
#[derive(Debug, Default)]
pub struct OutputConfig {
    /// Directory for rendered HTML. `None` writes a single page to stdout.
    pub dir: Option<PathBuf>,
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
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`output.dir`").
        field: String,
        /// Error message (e.g., "${`SITE_DIR`} not set").
        message: String,
    },
}

/// Require a class attribute value to be non-empty and free of quotes.
fn require_class(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    if value.contains('"') {
        return Err(ConfigError::Validation(format!(
            "{field} cannot contain '\"'"
        )));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `margin.toml` in current directory and parents.
    ///
    /// CLI settings are applied after loading and path resolution, allowing CLI
    /// arguments to take precedence over config file values.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist or parsing fails.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
        }

        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(output_dir) = &settings.output_dir {
            self.output.dir = Some(output_dir.clone());
        }
        if let Some(math_enabled) = settings.math_enabled {
            self.math.enabled = math_enabled;
        }
        if let Some(numbering) = settings.numbering {
            self.sidenotes.numbering = numbering;
        }
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
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

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        // Expand environment variables before path resolution
        config.expand_env_vars()?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve_paths(config_dir);
        config.config_path = Some(path.to_path_buf());

        config.validate()?;
        tracing::debug!(path = %path.display(), "Loaded configuration");

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// Called automatically after loading from file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_class(&self.sidenotes.inline_class, "sidenotes.inline_class")?;
        require_class(&self.sidenotes.block_class, "sidenotes.block_class")?;
        Ok(())
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        if let Some(ref dir) = self.output_raw.dir {
            self.output_raw.dir = Some(expand::expand_env(dir, "output.dir")?);
        }
        Ok(())
    }

    /// Resolve relative paths against the config directory.
    fn resolve_paths(&mut self, config_dir: &Path) {
        self.output = OutputConfig {
            dir: self.output_raw.dir.as_deref().map(|dir| config_dir.join(dir)),
        };
    }
}
