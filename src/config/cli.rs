use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "ai-commit")]
#[command(about = "Generate commit messages for staged git changes with a language model", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Prompt preset or literal prompt.
    ///
    /// Presets:
    ///   "default"       - a general-purpose commit message request
    ///   "refactoring"   - a detailed message for refactoring changes, one bullet per change
    ///   "documentation" - a message for documentation changes
    ///   "mimic"         - a message that mimics the style of recent commits
    ///   "detailed"      - a title-first message enriched with the repository name and recent commits
    ///
    /// Any other string is used as the prompt directly.
    #[arg(short = 'p', long = "prompt", env = "AI_COMMIT_PROMPT")]
    pub prompt: Option<String>,

    /// Make the git commit directly
    #[arg(short = 'c', long = "commit")]
    pub commit: bool,

    /// Model to use (e.g. gpt-4o-mini, claude-3-5-sonnet-latest, ollama/llama2)
    #[arg(short = 'm', long = "model", env = "AI_COMMIT_MODEL")]
    pub model: Option<String>,

    /// Enable debug logging
    #[arg(short = 'd', long = "debug")]
    pub debug: bool,

    /// Override the completion endpoint
    #[arg(long = "api-base", value_name = "URL")]
    pub api_base: Option<String>,

    /// Character budget for the diff, bypassing the per-model table
    #[arg(long = "max-chars", value_name = "N")]
    pub max_chars: Option<usize>,

    /// Path to a configuration file
    #[arg(long = "config", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Never prompt for an API key
    #[arg(long = "non-interactive")]
    pub non_interactive: bool,
}
