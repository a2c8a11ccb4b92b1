use crate::{credential::CredentialError, vcs::VcsError};
use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AiCommitError {
    #[error("Invalid model: {0}")]
    InvalidModel(String),

    #[error("No character limit known for model '{0}' (add it to `char_limits`, set `default_char_limit`, or pass --max-chars)")]
    UnknownCharLimit(String),

    #[error(transparent)]
    CredentialError(#[from] CredentialError),

    #[error("{0}")]
    VcsError(#[from] VcsError),

    #[error("Request to {model} failed (re-run with --debug for details)")]
    CompletionFailed { model: String },

    #[error("The model returned an empty commit message")]
    EmptyResponse,

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error(transparent)]
    IoError(#[from] io::Error),
}
