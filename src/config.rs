use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Ok, Result, bail};
use glob::Pattern;
use serde::{Deserialize, Serialize};

use crate::core::{
    hash::{DEFAULT_HASH_LENGTH, MAX_HASH_LENGTH, MIN_HASH_LENGTH},
    transform::{ArgMode, TransformOptions},
};

pub const CONFIG_FILE_NAME: &str = ".lingorc.json";

pub const TEST_FILE_PATTERNS: &[&str] = &[
    "**/*.test.tsx",
    "**/*.test.ts",
    "**/*.test.jsx",
    "**/*.test.js",
    "**/*.spec.tsx",
    "**/*.spec.ts",
    "**/*.spec.jsx",
    "**/*.spec.js",
    "**/__tests__/**",
];

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    #[serde(default = "default_includes")]
    pub includes: Vec<String>,
    #[serde(default)]
    pub ignores: Vec<String>,
    #[serde(default = "default_ignore_test_files")]
    pub ignore_test_files: bool,
    #[serde(default)]
    pub arg_mode: ArgMode,
    #[serde(default)]
    pub set_default_value: bool,
    #[serde(default)]
    pub debug: bool,
    #[serde(default = "default_hash_length")]
    pub hash_length: usize,
    #[serde(default = "default_runtime")]
    pub runtime_id: String,
    #[serde(default = "default_runtime")]
    pub runtime_module: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub out_dir: Option<String>,
    #[serde(default)]
    pub json: JsonConfig,
    #[serde(default, skip_serializing_if = "CatalogConfig::is_unset")]
    pub catalog: CatalogConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JsonConfig {
    #[serde(default = "default_json_output")]
    pub output: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_level_key: Option<String>,
    #[serde(default = "default_json_indent")]
    pub indent: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogConfig {
    /// POT template path; no catalog is written when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
}

impl CatalogConfig {
    fn is_unset(&self) -> bool {
        self.output.is_none()
    }
}

fn default_includes() -> Vec<String> {
    vec!["src".to_string()]
}

fn default_ignore_test_files() -> bool {
    true
}

fn default_hash_length() -> usize {
    DEFAULT_HASH_LENGTH
}

fn default_runtime() -> String {
    "i18next".to_string()
}

fn default_json_output() -> String {
    "i18n/messages.json".to_string()
}

fn default_json_indent() -> usize {
    2
}

impl Default for JsonConfig {
    fn default() -> Self {
        Self {
            output: default_json_output(),
            top_level_key: None,
            indent: default_json_indent(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            includes: default_includes(),
            ignores: Vec::new(),
            ignore_test_files: default_ignore_test_files(),
            arg_mode: ArgMode::default(),
            set_default_value: false,
            debug: false,
            hash_length: default_hash_length(),
            runtime_id: default_runtime(),
            runtime_module: default_runtime(),
            out_dir: None,
            json: JsonConfig::default(),
            catalog: CatalogConfig::default(),
        }
    }
}

impl Config {
    /// Validate configuration values.
    ///
    /// Returns an error if any glob pattern in `ignores` or `includes` is
    /// invalid, or if the transform options are out of range.
    pub fn validate(&self) -> Result<()> {
        for pattern in &self.ignores {
            Pattern::new(pattern)
                .with_context(|| format!("Invalid glob pattern in 'ignores': \"{}\"", pattern))?;
        }

        // Patterns without wildcards are literal directory paths.
        for pattern in &self.includes {
            if pattern.contains('*') || pattern.contains('?') {
                Pattern::new(pattern).with_context(|| {
                    format!("Invalid glob pattern in 'includes': \"{}\"", pattern)
                })?;
            }
        }

        if !(MIN_HASH_LENGTH..=MAX_HASH_LENGTH).contains(&self.hash_length) {
            bail!(
                "Invalid 'hashLength': {} (expected {}..={})",
                self.hash_length,
                MIN_HASH_LENGTH,
                MAX_HASH_LENGTH
            );
        }

        self.transform_options()
            .validate()
            .context("Invalid transform settings")?;

        Ok(())
    }

    pub fn transform_options(&self) -> TransformOptions {
        TransformOptions {
            arg_mode: self.arg_mode,
            set_default_value: self.set_default_value,
            debug: self.debug,
            hash_length: self.hash_length,
            runtime_id: self.runtime_id.clone(),
            runtime_module: self.runtime_module.clone(),
        }
    }
}

pub fn default_config_json() -> Result<String> {
    let config = Config::default();
    serde_json::to_string_pretty(&config).context("Failed to generate default config.")
}

pub fn find_config_file(start_dir: &Path) -> Option<PathBuf> {
    let mut current = start_dir.to_path_buf();

    loop {
        let config_path = current.join(CONFIG_FILE_NAME);
        if config_path.exists() {
            return Some(config_path);
        }
        if current.join(".git").exists() {
            return None;
        }
        if !current.pop() {
            return None;
        }
    }
}

/// Result of loading configuration.
pub struct ConfigLoadResult {
    pub config: Config,
    /// Where the config came from; `None` means defaults.
    pub path: Option<PathBuf>,
}

pub fn load_config(start_dir: &Path) -> Result<ConfigLoadResult> {
    match find_config_file(start_dir) {
        Some(path) => {
            let content = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config file: {:?}", path))?;
            let config: Config = serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {:?}", path))?;
            config.validate()?;
            Ok(ConfigLoadResult {
                config,
                path: Some(path),
            })
        }
        None => Ok(ConfigLoadResult {
            config: Config::default(),
            path: None,
        }),
    }
}
