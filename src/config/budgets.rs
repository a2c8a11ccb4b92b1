use std::collections::HashMap;

use crate::error::AiCommitError;

/// Default per-model character budgets for the diff. The values are rough and only cover the
/// common models; the config file extends or overrides them.
const DEFAULT_CHAR_LIMITS: &[(&str, usize)] = &[
    ("gpt-3.5-turbo", 12_000),
    ("gpt-4", 25_000),
    ("gpt-4-32k", 120_000),
    ("gpt-4o", 400_000),
    ("gpt-4o-mini", 400_000),
    ("claude-3-5-sonnet-latest", 600_000),
    ("claude-3-5-haiku-latest", 600_000),
    ("ollama/llama2", 12_000),
    ("ollama/llama3", 24_000),
];

#[derive(Debug, Clone)]
pub struct CharLimits {
    limits: HashMap<String, usize>,
    fallback: Option<usize>,
}

impl CharLimits {
    pub fn new(overrides: HashMap<String, usize>, fallback: Option<usize>) -> Self {
        let mut limits: HashMap<String, usize> = DEFAULT_CHAR_LIMITS
            .iter()
            .map(|(model, limit)| (model.to_string(), *limit))
            .collect();
        limits.extend(overrides);

        CharLimits { limits, fallback }
    }

    /// Budget for an exact model identifier.
    pub fn limit_for(&self, model: &str) -> Result<usize, AiCommitError> {
        self.limits
            .get(model)
            .copied()
            .or(self.fallback)
            .ok_or_else(|| AiCommitError::UnknownCharLimit(model.to_string()))
    }
}

impl Default for CharLimits {
    fn default() -> Self {
        Self::new(HashMap::new(), None)
    }
}
