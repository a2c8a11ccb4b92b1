use indoc::{formatdoc, indoc};
use std::borrow::Cow;
use tracing::debug;

use crate::provider::Message;
use crate::vcs::VcsBackend;

const SYSTEM_PROMPT: &str = "You are a helpful assistant.";

/// Commits shown to `mimic` as style examples.
const MIMIC_EXAMPLES: usize = 5;
/// Commits shown to `detailed` as context.
const DETAILED_COMMITS: usize = 3;

const DEFAULT_PROMPT: &str = indoc! {"
    You are an expert software engineer.
    Review the provided diffs which are about to be committed to a git repo.
    Review the diffs carefully.
    Generate a commit message for those changes.
    The commit message MUST use the imperative tense.
    Reply with JUST the commit message, without quotes, comments, questions, etc!
"};

const REFACTORING_PROMPT: &str = indoc! {"
    Please provide a detailed git commit message that explains the refactoring changes described below.
    Please detail every major change as a separate bullet point.
    Reply with JUST the commit message, without quotes, comments, questions, etc!
"};

const DOCUMENTATION_PROMPT: &str = indoc! {"
    Please provide a git commit message that explains the documentation changes described below.
    Reply with JUST the commit message, without quotes, comments, questions, etc!
"};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptPreset {
    Default,
    Refactoring,
    Documentation,
    /// Imitates the style of recent commit messages.
    Mimic,
    /// Title-first message with repository name and recent commits as context.
    Detailed,
}

impl PromptPreset {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "default" => Some(PromptPreset::Default),
            "refactoring" => Some(PromptPreset::Refactoring),
            "documentation" => Some(PromptPreset::Documentation),
            "mimic" => Some(PromptPreset::Mimic),
            "detailed" => Some(PromptPreset::Detailed),
            _ => None,
        }
    }

    fn header<C: CommitContext + ?Sized>(self, context: &C, recent_commits: Option<usize>) -> String {
        match self {
            PromptPreset::Default => DEFAULT_PROMPT.to_string(),
            PromptPreset::Refactoring => REFACTORING_PROMPT.to_string(),
            PromptPreset::Documentation => DOCUMENTATION_PROMPT.to_string(),
            PromptPreset::Mimic => {
                let examples =
                    mimic_examples(context, recent_commits.unwrap_or(MIMIC_EXAMPLES));
                formatdoc! {"
                    Please provide a git commit message for the diffs provided below.
                    Your message should closely mimic the style and structure of the following recent git commit messages in this repository:

                    {examples}
                    Reply with JUST the commit message, without quotes, comments, questions, etc!
                ", examples = examples}
            }
            PromptPreset::Detailed => {
                let root_dir = context
                    .root_dir_name()
                    .map(|name| format!("Repository root dir: {name}\n\n"))
                    .unwrap_or_default();
                let recent = recent_commits_block(
                    context,
                    recent_commits.unwrap_or(DETAILED_COMMITS),
                );
                formatdoc! {"
                    As your response, please provide a concise git commit message for the changes described below.

                    The first paragraph of your response should be a single short line to serve as the title of the commit.

                    Add more paragraphs that describe the changes in more detail only if necessary. Prefer to use bullet lists instead of long paragraphs.

                    {root_dir}{recent}",
                    root_dir = root_dir,
                    recent = recent,
                }
            }
        }
    }
}

/// A preset name or a prompt given verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptSelection {
    Preset(PromptPreset),
    Literal(String),
}

impl PromptSelection {
    /// Known preset names select the preset, an empty string selects the default, and any other
    /// text is used as the prompt itself.
    pub fn parse(input: &str) -> Self {
        if input.trim().is_empty() {
            return PromptSelection::Preset(PromptPreset::Default);
        }

        match PromptPreset::from_name(input) {
            Some(preset) => PromptSelection::Preset(preset),
            None => PromptSelection::Literal(input.to_string()),
        }
    }
}

/// Repository metadata available to the presets that ask for it. Lookups never fail: missing
/// metadata comes back empty.
pub trait CommitContext {
    fn recent_commit_messages(&self, count: usize) -> Vec<String>;

    fn root_dir_name(&self) -> Option<String>;
}

impl<B: VcsBackend + ?Sized> CommitContext for B {
    fn recent_commit_messages(&self, count: usize) -> Vec<String> {
        VcsBackend::recent_commit_messages(self, count).unwrap_or_else(|e| {
            debug!("could not read recent commits: {}", e);
            Vec::new()
        })
    }

    fn root_dir_name(&self) -> Option<String> {
        VcsBackend::root_dir_name(self)
            .map_err(|e| debug!("could not read repository root: {}", e))
            .ok()
    }
}

fn mimic_examples<C: CommitContext + ?Sized>(context: &C, count: usize) -> String {
    let messages = context.recent_commit_messages(count);
    if messages.is_empty() {
        return String::new();
    }

    let examples = messages
        .iter()
        .enumerate()
        .map(|(i, msg)| format!("Example {} - {}", i + 1, msg))
        .collect::<Vec<_>>()
        .join("\n\n");

    format!("Recent commits:\n{examples}\n\n")
}

fn recent_commits_block<C: CommitContext + ?Sized>(context: &C, count: usize) -> String {
    let messages = context.recent_commit_messages(count);
    if messages.is_empty() {
        return String::new();
    }

    format!("Recent commits:\n{}\n\n", messages.join("\n\n"))
}

pub fn cutoff_marker(limit: usize) -> String {
    format!(" (cut off at {limit} characters).")
}

/// Keeps the first `limit` characters of the diff and notes the cut.
pub fn truncate_diff(diff: &str, limit: usize) -> Cow<'_, str> {
    match diff.char_indices().nth(limit) {
        Some((cut, _)) => Cow::Owned(format!("{}{}", &diff[..cut], cutoff_marker(limit))),
        None => Cow::Borrowed(diff),
    }
}

pub struct AIPrompt {
    pub system_prompt: String,
    pub user_prompt: String,
}

impl AIPrompt {
    pub fn build_commit_prompt<C: CommitContext + ?Sized>(
        selection: &PromptSelection,
        diff: &str,
        char_limit: usize,
        recent_commits: Option<usize>,
        context: &C,
    ) -> Self {
        let header = match selection {
            PromptSelection::Preset(preset) => preset.header(context, recent_commits),
            PromptSelection::Literal(prompt) => prompt.clone(),
        };

        let diff = truncate_diff(diff, char_limit);
        if let Cow::Owned(_) = diff {
            debug!("diff truncated to {} characters", char_limit);
        }

        let user_prompt = format!(
            "{}\n\nOutput of \"git diff --staged\":\n{}\n",
            header.trim_end(),
            diff
        );

        AIPrompt {
            system_prompt: SYSTEM_PROMPT.to_string(),
            user_prompt,
        }
    }

    pub fn into_messages(self) -> Vec<Message> {
        vec![
            Message::system(self.system_prompt),
            Message::user(self.user_prompt),
        ]
    }
}
