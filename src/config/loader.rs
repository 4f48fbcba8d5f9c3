//! Configuration File Loading
//!
//! Handles loading and saving configuration files from various locations
//! with support for multiple formats and fallback mechanisms.

use super::Config;
use crate::error::{Error, Result};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable naming an explicit configuration file
pub const CONFIG_ENV_VAR: &str = "QUILL_CONFIG";

/// Configuration file loader
pub struct ConfigLoader {
    /// File named by `$QUILL_CONFIG`, loaded as given
    explicit_path: Option<PathBuf>,
    /// Search paths for configuration files (without extension)
    search_paths: Vec<PathBuf>,
    /// Supported configuration file formats
    supported_formats: Vec<ConfigFormat>,
    /// Current configuration file path (if loaded)
    current_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConfigFormat {
    /// TOML format
    Toml,
    /// JSON format
    Json,
}

impl ConfigFormat {
    fn extension(self) -> &'static str {
        match self {
            ConfigFormat::Toml => "toml",
            ConfigFormat::Json => "json",
        }
    }

    fn name(self) -> &'static str {
        match self {
            ConfigFormat::Toml => "TOML",
            ConfigFormat::Json => "JSON",
        }
    }

    /// Pick a format from a file extension, defaulting to TOML
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => ConfigFormat::Json,
            _ => ConfigFormat::Toml,
        }
    }
}

#[derive(Debug, Clone)]
pub struct LoadOptions {
    /// Whether to fall back to the default config if none exists
    pub create_default: bool,
    /// Whether to validate configuration after loading
    pub validate: bool,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            create_default: true,
            validate: true,
        }
    }
}

impl ConfigLoader {
    /// Create a new configuration loader
    pub fn new() -> Self {
        Self {
            explicit_path: env::var_os(CONFIG_ENV_VAR)
                .filter(|p| !p.is_empty())
                .map(PathBuf::from),
            search_paths: Self::get_search_paths(),
            supported_formats: vec![ConfigFormat::Toml, ConfigFormat::Json],
            current_path: None,
        }
    }

    /// Load configuration with default options
    pub fn load() -> Result<Config> {
        Self::load_with_options(LoadOptions::default())
    }

    /// Load configuration with custom options
    pub fn load_with_options(options: LoadOptions) -> Result<Config> {
        Self::new().load_from_search_paths(&options)
    }

    /// Load configuration using this loader's search paths
    pub fn load_from_search_paths(&mut self, options: &LoadOptions) -> Result<Config> {
        if let Some((path, config)) = self.find_and_load_config()? {
            info!("Configuration loaded from {}", path.display());
            self.current_path = Some(path);
            if options.validate {
                validate_config(&config)?;
            }
            return Ok(config);
        }

        if options.create_default {
            debug!("No configuration file found, using defaults");
            Ok(Config::default())
        } else {
            Err(Error::ConfigNotFound)
        }
    }

    /// Load and validate a specific file, choosing the format by extension
    pub fn load_from_file(path: &Path) -> Result<Config> {
        let config = load_config_file(path, ConfigFormat::from_path(path))?;
        validate_config(&config)?;
        Ok(config)
    }

    /// Save configuration to a specific path
    pub fn save_to_path(&self, config: &Config, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let format = ConfigFormat::from_path(path);
        let content = match format {
            ConfigFormat::Json => serde_json::to_string_pretty(config).map_err(|e| {
                Error::ConfigSerializationFailed {
                    format: format.name().to_string(),
                    reason: e.to_string(),
                }
            })?,
            ConfigFormat::Toml => {
                toml::to_string_pretty(config).map_err(|e| Error::ConfigSerializationFailed {
                    format: format.name().to_string(),
                    reason: e.to_string(),
                })?
            }
        };

        fs::write(path, content)?;
        Ok(())
    }

    /// Find and load configuration from search paths
    fn find_and_load_config(&self) -> Result<Option<(PathBuf, Config)>> {
        if let Some(path) = &self.explicit_path {
            if path.is_file() {
                match load_config_file(path, ConfigFormat::from_path(path)) {
                    Ok(config) => return Ok(Some((path.clone(), config))),
                    Err(e) => warn!("Failed to load config from {}: {}", path.display(), e),
                }
            } else {
                warn!("{} names a missing file: {}", CONFIG_ENV_VAR, path.display());
            }
        }

        for path in &self.search_paths {
            for format in &self.supported_formats {
                let config_path = path.with_extension(format.extension());

                if config_path.exists() {
                    match load_config_file(&config_path, *format) {
                        Ok(config) => return Ok(Some((config_path, config))),
                        Err(e) => {
                            // Keep searching; a broken file should not block startup
                            warn!("Failed to load config from {}: {}", config_path.display(), e);
                            continue;
                        }
                    }
                }
            }
        }

        Ok(None)
    }

    /// Get default search paths for configuration files
    fn get_search_paths() -> Vec<PathBuf> {
        let mut paths = Vec::new();

        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("quill").join("config"));
        }

        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".quill").join("config"));
        }

        if let Ok(cwd) = env::current_dir() {
            paths.push(cwd.join(".quill").join("config"));
        }

        paths
    }

    /// Get the default configuration path
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("quill")
            .join("config.toml")
    }

    /// Get the current configuration file path
    pub fn current_path(&self) -> Option<&Path> {
        self.current_path.as_deref()
    }

    /// List all search paths
    pub fn search_paths(&self) -> &[PathBuf] {
        &self.search_paths
    }

    /// Clear all search paths, including the explicit file, and add a single path
    pub fn set_search_path(&mut self, path: PathBuf) {
        self.explicit_path = None;
        self.search_paths = vec![path];
    }

    /// The explicit configuration file, tried before the search paths
    pub fn explicit_path(&self) -> Option<&Path> {
        self.explicit_path.as_deref()
    }

    /// Name a file to try before the search paths, whatever its extension
    pub fn set_explicit_path(&mut self, path: PathBuf) {
        self.explicit_path = Some(path);
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

/// Load a specific configuration file
fn load_config_file(path: &Path, format: ConfigFormat) -> Result<Config> {
    let content = fs::read_to_string(path)?;

    match format {
        ConfigFormat::Toml => toml::from_str(&content).map_err(|e| Error::ConfigParseFailed {
            format: format.name().to_string(),
            reason: e.to_string(),
        }),
        ConfigFormat::Json => serde_json::from_str(&content).map_err(|e| Error::ConfigParseFailed {
            format: format.name().to_string(),
            reason: e.to_string(),
        }),
    }
}

/// Validate configuration
pub fn validate_config(config: &Config) -> Result<()> {
    let highlight = &config.highlight;
    if highlight.comment_marker.is_empty() {
        return Err(Error::ConfigValidationFailed {
            field: "highlight.comment_marker".to_string(),
            reason: "Comment marker cannot be empty".to_string(),
        });
    }

    if highlight.decorator_marker.is_empty() {
        return Err(Error::ConfigValidationFailed {
            field: "highlight.decorator_marker".to_string(),
            reason: "Decorator marker cannot be empty".to_string(),
        });
    }

    if highlight.keywords.iter().any(|k| k.trim().is_empty()) {
        return Err(Error::ConfigValidationFailed {
            field: "highlight.keywords".to_string(),
            reason: "Keywords cannot be empty strings".to_string(),
        });
    }

    if highlight.operators.iter().any(|o| o.is_empty()) {
        return Err(Error::ConfigValidationFailed {
            field: "highlight.operators".to_string(),
            reason: "Operators cannot be empty strings".to_string(),
        });
    }

    let shell = &config.shell;
    if shell.shell_path.as_os_str().is_empty() {
        return Err(Error::ConfigValidationFailed {
            field: "shell.shell_path".to_string(),
            reason: "Shell path cannot be empty".to_string(),
        });
    }

    if shell.python_executable.trim().is_empty() {
        return Err(Error::ConfigValidationFailed {
            field: "shell.python_executable".to_string(),
            reason: "Python executable cannot be empty".to_string(),
        });
    }

    if shell.history_limit == 0 {
        return Err(Error::ConfigValidationFailed {
            field: "shell.history_limit".to_string(),
            reason: "History limit must be greater than 0".to_string(),
        });
    }

    if shell.output_limit == 0 {
        return Err(Error::ConfigValidationFailed {
            field: "shell.output_limit".to_string(),
            reason: "Output limit must be greater than 0".to_string(),
        });
    }

    Ok(())
}
