//! Evaluator configuration, stored as TOML.
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::{
    error::{ConfigError, ConfigResult},
    language::ClientLanguage,
    redirect::RedirectRule,
};

/// Environment variable overriding [`EvaluatorConfig::default_path`].
pub const ENV_CONFIG_PATH: &str = "SESTRING_EVAL_CONFIG";

/// System-message template used as the label of each system link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkTemplateIds {
    pub player: u32,
    pub class_job_level: u32,
    pub map_position: u32,
    pub item: u32,
    pub chat_sound: u32,
    pub object_name: u32,
    pub literal_text: u32,
    pub time_remaining: u32,
    pub status: u32,
    pub party_finder: u32,
    pub quest: u32,
    pub auto_translate: u32,
    /// Template of `levelpos`: place name, then x and y in tenths.
    pub level_position: u32,
}

impl Default for LinkTemplateIds {
    fn default() -> Self {
        Self {
            player: 1000,
            class_job_level: 1001,
            map_position: 1002,
            item: 1003,
            chat_sound: 1004,
            object_name: 1005,
            literal_text: 1006,
            time_remaining: 1007,
            status: 1008,
            party_finder: 1009,
            quest: 1010,
            auto_translate: 1011,
            level_position: 1012,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvaluatorConfig {
    /// Maximum nesting of evaluations, e.g. a string cell evaluating a
    /// string cell.
    pub max_depth: usize,
    /// Maximum number of redirect steps of one sheet lookup.
    pub max_redirects: usize,
    /// Idle output builders kept for reuse.
    pub pool_capacity: usize,
    pub default_language: ClientLanguage,
    pub templates: LinkTemplateIds,
    /// Consulted before the sheet provider's own redirects.
    pub redirects: Vec<RedirectRule>,
}

impl Default for EvaluatorConfig {
    fn default() -> Self {
        Self {
            max_depth: 32,
            max_redirects: 8,
            pool_capacity: 8,
            default_language: ClientLanguage::English,
            templates: LinkTemplateIds::default(),
            redirects: Vec::new(),
        }
    }
}

impl EvaluatorConfig {
    /// Get the default path to the configuration file.
    pub fn default_path() -> PathBuf {
        if let Ok(config_path) = std::env::var(ENV_CONFIG_PATH) {
            return config_path.into();
        }

        let mut path = PathBuf::new();

        #[cfg(target_os = "windows")]
        {
            if let Ok(appdata) = std::env::var("APPDATA") {
                path.push(appdata);
            }
        }
        #[cfg(not(target_os = "windows"))]
        {
            if let Ok(xdg_config_home) = std::env::var("XDG_CONFIG_HOME") {
                path.push(xdg_config_home);
            } else if let Ok(home) = std::env::var("HOME") {
                path.push(home);
                path.push(".config");
            }
        }

        path.push("sestring");
        path.push("evaluator.toml");
        path
    }

    /// Parse and validate a configuration.
    pub fn from_toml_str(toml_str: &str) -> ConfigResult<Self> {
        Self::parse(toml_str, "<string>")
    }

    /// Load a configuration from a TOML file.
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let toml_str = std::fs::read_to_string(path)?;
        Self::parse(&toml_str, &path.display().to_string())
    }

    fn parse(toml_str: &str, file: &str) -> ConfigResult<Self> {
        let config: Self = toml::from_str(toml_str).map_err(|source| ConfigError::Parse {
            source,
            file: file.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Save the configuration to a TOML file, creating parent directories.
    pub fn save(&self, path: &Path) -> ConfigResult<()> {
        let toml_str = toml::to_string(self)?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, toml_str)?;
        Ok(())
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.max_depth == 0 {
            return Err(ConfigError::Invalid("`max_depth` must be at least 1".into()));
        }
        for rule in &self.redirects {
            if rule.first_row > rule.last_row {
                return Err(ConfigError::Invalid(format!(
                    "redirect of `{}` has an empty row range {}..={}",
                    rule.sheet, rule.first_row, rule.last_row
                )));
            }
            if rule.sheet.is_empty() || rule.target_sheet.is_empty() {
                return Err(ConfigError::Invalid("redirect sheet names cannot be empty".into()));
            }
        }
        Ok(())
    }
}
