use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::config::budgets::CharLimits;
use crate::config::cli::Cli;
use crate::config::providers::{ProviderRule, ProviderRuleConfig, ProviderTable};
use crate::error::AiCommitError;

pub const CONFIG_FILE_NAME: &str = "ai-commit.config.json";
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_PROMPT: &str = "default";

/// Contents of `ai-commit.config.json`. Every field is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ConfigFile {
    pub model: Option<String>,
    pub prompt: Option<String>,
    pub recent_commits: Option<usize>,
    pub char_limits: HashMap<String, usize>,
    pub default_char_limit: Option<usize>,
    pub providers: Vec<ProviderRuleConfig>,
    pub local_endpoint: Option<String>,
    pub diff_exclusions: Vec<String>,
}

impl ConfigFile {
    /// Reads a config file. A missing file yields defaults, a malformed one is an error.
    pub fn from_file(path: &Path) -> Result<Self, AiCommitError> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => return Err(e.into()),
        };

        debug!("loading config from {}", path.display());
        serde_json::from_str(&content).map_err(|e| {
            AiCommitError::InvalidConfiguration(format!("{}: {}", path.display(), e))
        })
    }

    /// Loads the file named by `--config`, which must exist, or the first file found in the
    /// default locations.
    pub fn load(explicit: Option<&Path>) -> Result<Self, AiCommitError> {
        if let Some(path) = explicit {
            if !path.is_file() {
                return Err(AiCommitError::InvalidConfiguration(format!(
                    "{}: no such file",
                    path.display()
                )));
            }
            return Self::from_file(path);
        }

        match Self::locate() {
            Some(path) => Self::from_file(&path),
            None => Ok(Self::default()),
        }
    }

    fn locate() -> Option<PathBuf> {
        let local = PathBuf::from(CONFIG_FILE_NAME);
        if local.exists() {
            return Some(local);
        }

        dirs::home_dir()
            .map(|home| home.join(".config").join("ai-commit").join(CONFIG_FILE_NAME))
            .filter(|path| path.exists())
    }
}

/// Settings for one run, after merging CLI flags, environment and the config file.
#[derive(Debug)]
pub struct AiCommitConfig {
    pub model: String,
    pub prompt: String,
    pub commit: bool,
    pub recent_commits: Option<usize>,
    pub api_base: Option<String>,
    pub max_chars: Option<usize>,
    pub providers: ProviderTable,
    pub char_limits: CharLimits,
    pub diff_exclusions: Vec<String>,
    pub interactive: bool,
}

impl AiCommitConfig {
    pub fn build(cli: &Cli) -> Result<Self, AiCommitError> {
        let file = ConfigFile::load(cli.config.as_deref())?;

        let interactive = !cli.non_interactive && std::io::stdin().is_terminal();
        Ok(Self::merge(cli, file, interactive))
    }

    pub fn merge(cli: &Cli, file: ConfigFile, interactive: bool) -> Self {
        let model = cli
            .model
            .clone()
            .or(file.model)
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());

        let prompt = cli
            .prompt
            .clone()
            .or(file.prompt)
            .unwrap_or_else(|| DEFAULT_PROMPT.to_string());

        let user_rules = file.providers.into_iter().map(ProviderRule::from).collect();

        AiCommitConfig {
            model,
            prompt,
            commit: cli.commit,
            recent_commits: file.recent_commits,
            api_base: cli.api_base.clone(),
            max_chars: cli.max_chars,
            providers: ProviderTable::new(user_rules, file.local_endpoint),
            char_limits: CharLimits::new(file.char_limits, file.default_char_limit),
            diff_exclusions: file.diff_exclusions,
            interactive,
        }
    }

    /// Character budget for the configured model.
    pub fn char_limit(&self) -> Result<usize, AiCommitError> {
        match self.max_chars {
            Some(limit) => Ok(limit),
            None => self.char_limits.limit_for(&self.model),
        }
    }
}
