use spinoff::{spinners, Color, Spinner};
use tracing::debug;

use crate::ai_prompt::{AIPrompt, PromptSelection};
use crate::config::AiCommitConfig;
use crate::credential::CredentialResolver;
use crate::error::AiCommitError;
use crate::provider::{self, ChatBackend, ModelInvocation};
use crate::vcs::VcsBackend;

pub mod output;

#[derive(Debug, PartialEq, Eq)]
pub enum Outcome {
    NothingToCommit,
    Printed(String),
    Committed(Vec<String>),
}

/// One run of the tool: staged diff in, commit message out.
pub struct CommitCommand<'a> {
    config: &'a AiCommitConfig,
    vcs: &'a dyn VcsBackend,
    chat: &'a dyn ChatBackend,
    credentials: &'a CredentialResolver,
    show_progress: bool,
}

impl<'a> CommitCommand<'a> {
    pub fn new(
        config: &'a AiCommitConfig,
        vcs: &'a dyn VcsBackend,
        chat: &'a dyn ChatBackend,
        credentials: &'a CredentialResolver,
    ) -> Self {
        CommitCommand {
            config,
            vcs,
            chat,
            credentials,
            show_progress: false,
        }
    }

    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    pub async fn execute(&self) -> Result<Outcome, AiCommitError> {
        // Both lookups fail before anything touches git, the keyring or the network.
        let route = self
            .config
            .providers
            .route(&self.config.model, self.config.api_base.as_deref())?;
        let char_limit = self.config.char_limit()?;
        debug!(
            "model {} routed to {} with a {} character budget",
            route.model, route.provider, char_limit
        );

        let diff = self.vcs.staged_diff()?;
        if diff.is_empty() {
            println!("No changes to commit.");
            return Ok(Outcome::NothingToCommit);
        }

        let info = route.provider.info();
        let api_key = if info.needs_api_key {
            Some(self.credentials.resolve_or_enroll(info)?)
        } else {
            debug!("{} needs no API key", info.display_name);
            None
        };

        let selection = PromptSelection::parse(&self.config.prompt);
        let prompt = AIPrompt::build_commit_prompt(
            &selection,
            &diff,
            char_limit,
            self.config.recent_commits,
            self.vcs,
        );

        let invocation = ModelInvocation::new(route, prompt.into_messages(), api_key);
        let response = self.complete(&invocation).await?;

        output::deliver(&response, self.config.commit, self.vcs)
    }

    async fn complete(&self, invocation: &ModelInvocation) -> Result<String, AiCommitError> {
        if !self.show_progress {
            return provider::dispatch(self.chat, invocation).await;
        }

        let mut spinner = Spinner::new(
            spinners::Dots,
            "Generating commit message...",
            Color::Blue,
        );
        let result = provider::dispatch(self.chat, invocation).await;
        match &result {
            Ok(_) => spinner.clear(),
            Err(_) => spinner.fail("Failed"),
        }
        result
    }
}
