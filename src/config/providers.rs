use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

use crate::error::AiCommitError;

pub const DEFAULT_LOCAL_ENDPOINT: &str = "http://localhost:11434/v1/";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    OpenAI,
    Anthropic,
    Gemini,
    DeepSeek,
    Xai,
    Ollama,
}

/// Static facts about a provider.
pub struct ProviderInfo {
    pub id: &'static str,
    pub display_name: &'static str,
    /// Environment variable holding the API key. Empty for providers without one.
    pub env_key: &'static str,
    pub needs_api_key: bool,
    /// Served from a local address rather than a hosted API.
    pub is_local: bool,
    /// Base URL of the provider's API.
    pub default_endpoint: &'static str,
    /// Placeholder credential sent by providers that take no API key.
    pub keyless_auth: Option<&'static str>,
}

pub const ALL_PROVIDERS: &[ProviderKind] = &[
    ProviderKind::OpenAI,
    ProviderKind::Anthropic,
    ProviderKind::Gemini,
    ProviderKind::DeepSeek,
    ProviderKind::Xai,
    ProviderKind::Ollama,
];

impl ProviderInfo {
    pub fn for_provider(kind: ProviderKind) -> &'static ProviderInfo {
        match kind {
            ProviderKind::OpenAI => &ProviderInfo {
                id: "openai",
                display_name: "OpenAI",
                env_key: "OPENAI_API_KEY",
                needs_api_key: true,
                is_local: false,
                default_endpoint: "https://api.openai.com/v1/",
                keyless_auth: None,
            },
            ProviderKind::Anthropic => &ProviderInfo {
                id: "anthropic",
                display_name: "Anthropic",
                env_key: "ANTHROPIC_API_KEY",
                needs_api_key: true,
                is_local: false,
                default_endpoint: "https://api.anthropic.com/v1/",
                keyless_auth: None,
            },
            ProviderKind::Gemini => &ProviderInfo {
                id: "gemini",
                display_name: "Gemini",
                env_key: "GEMINI_API_KEY",
                needs_api_key: true,
                is_local: false,
                default_endpoint: "https://generativelanguage.googleapis.com/v1beta/",
                keyless_auth: None,
            },
            ProviderKind::DeepSeek => &ProviderInfo {
                id: "deepseek",
                display_name: "DeepSeek",
                env_key: "DEEPSEEK_API_KEY",
                needs_api_key: true,
                is_local: false,
                default_endpoint: "https://api.deepseek.com/v1/",
                keyless_auth: None,
            },
            ProviderKind::Xai => &ProviderInfo {
                id: "xai",
                display_name: "xAI",
                env_key: "XAI_API_KEY",
                needs_api_key: true,
                is_local: false,
                default_endpoint: "https://api.x.ai/v1/",
                keyless_auth: None,
            },
            ProviderKind::Ollama => &ProviderInfo {
                id: "ollama",
                display_name: "Ollama",
                env_key: "",
                needs_api_key: false,
                is_local: true,
                default_endpoint: DEFAULT_LOCAL_ENDPOINT,
                keyless_auth: Some("ollama"),
            },
        }
    }

    /// Account name under which the key lives in the secret store.
    pub fn store_account(&self) -> String {
        format!("{}_key", self.id)
    }
}

impl ProviderKind {
    pub fn info(self) -> &'static ProviderInfo {
        ProviderInfo::for_provider(self)
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.info().display_name)
    }
}

impl FromStr for ProviderKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_ascii_lowercase();
        ALL_PROVIDERS
            .iter()
            .copied()
            .find(|kind| kind.info().id == s)
            .ok_or_else(|| {
                let known: Vec<&str> = ALL_PROVIDERS.iter().map(|k| k.info().id).collect();
                format!("unknown provider '{}' (expected one of: {})", s, known.join(", "))
            })
    }
}

impl<'de> Deserialize<'de> for ProviderKind {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// How a rule recognises a model identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelPattern {
    /// Any identifier starting with the text.
    Prefix(String),
    /// The exact name, or the name followed by `-` (so `o1` matches `o1-mini` but not `o100`).
    Family(String),
}

impl ModelPattern {
    pub fn matches(&self, model: &str) -> bool {
        match self {
            ModelPattern::Prefix(prefix) => model.starts_with(prefix.as_str()),
            ModelPattern::Family(name) => match model.strip_prefix(name.as_str()) {
                Some(rest) => rest.is_empty() || rest.starts_with('-'),
                None => false,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderRule {
    pub pattern: ModelPattern,
    pub provider: ProviderKind,
}

/// Rule as written in the config file.
#[derive(Debug, Clone, Deserialize)]
pub struct ProviderRuleConfig {
    pub prefix: String,
    pub provider: ProviderKind,
}

impl From<ProviderRuleConfig> for ProviderRule {
    fn from(rule: ProviderRuleConfig) -> Self {
        ProviderRule {
            pattern: ModelPattern::Prefix(rule.prefix),
            provider: rule.provider,
        }
    }
}

/// Where a model request goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelRoute {
    pub provider: ProviderKind,
    /// Model identifier as given by the user.
    pub model: String,
    /// Model name sent to the provider.
    pub wire_model: String,
    pub endpoint: Option<String>,
}

/// Ordered table mapping model identifiers to providers. First match wins.
#[derive(Debug, Clone)]
pub struct ProviderTable {
    rules: Vec<ProviderRule>,
    local_endpoint: String,
}

impl ProviderTable {
    pub fn builtin_rules() -> Vec<ProviderRule> {
        let prefix = |p: &str, provider: ProviderKind| ProviderRule {
            pattern: ModelPattern::Prefix(p.to_string()),
            provider,
        };
        let family = |p: &str, provider: ProviderKind| ProviderRule {
            pattern: ModelPattern::Family(p.to_string()),
            provider,
        };

        vec![
            prefix("gpt", ProviderKind::OpenAI),
            family("o1", ProviderKind::OpenAI),
            family("o3", ProviderKind::OpenAI),
            family("o4", ProviderKind::OpenAI),
            prefix("claude", ProviderKind::Anthropic),
            prefix("gemini", ProviderKind::Gemini),
            prefix("deepseek", ProviderKind::DeepSeek),
            prefix("grok", ProviderKind::Xai),
            prefix("ollama/", ProviderKind::Ollama),
        ]
    }

    /// Builds a table whose user rules are consulted before the built-in ones.
    pub fn new(user_rules: Vec<ProviderRule>, local_endpoint: Option<String>) -> Self {
        let mut rules = user_rules;
        rules.extend(Self::builtin_rules());
        ProviderTable {
            rules,
            local_endpoint: local_endpoint.unwrap_or_else(|| DEFAULT_LOCAL_ENDPOINT.to_string()),
        }
    }

    pub fn provider_for(&self, model: &str) -> Option<ProviderKind> {
        self.rules
            .iter()
            .find(|rule| rule.pattern.matches(model))
            .map(|rule| rule.provider)
    }

    /// Resolves a model identifier to a route. `api_base` overrides the endpoint for any provider.
    pub fn route(&self, model: &str, api_base: Option<&str>) -> Result<ModelRoute, AiCommitError> {
        let provider = self
            .provider_for(model)
            .ok_or_else(|| AiCommitError::InvalidModel(model.to_string()))?;

        let wire_model = match provider {
            ProviderKind::Ollama => model.strip_prefix("ollama/").unwrap_or(model),
            _ => model,
        }
        .to_string();

        let endpoint = match (api_base, provider.info().is_local) {
            (Some(base), _) => Some(base.to_string()),
            (None, true) => Some(self.local_endpoint.clone()),
            (None, false) => None,
        };

        Ok(ModelRoute {
            provider,
            model: model.to_string(),
            wire_model,
            endpoint,
        })
    }
}

impl Default for ProviderTable {
    fn default() -> Self {
        Self::new(Vec::new(), None)
    }
}
