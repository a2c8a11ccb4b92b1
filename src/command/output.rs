use tracing::debug;

use super::Outcome;
use crate::error::AiCommitError;
use crate::vcs::VcsBackend;

/// Splits a response on blank lines. The first paragraph is the commit title.
pub fn split_paragraphs(response: &str) -> Vec<String> {
    response
        .replace("\r\n", "\n")
        .split("\n\n")
        .map(|p| p.trim_start_matches('\n').trim_end())
        .filter(|p| !p.is_empty())
        .map(String::from)
        .collect()
}

/// Prints the response, or commits with it when `commit` is set.
pub fn deliver(
    response: &str,
    commit: bool,
    vcs: &dyn VcsBackend,
) -> Result<Outcome, AiCommitError> {
    if !commit {
        println!("{response}");
        return Ok(Outcome::Printed(response.to_string()));
    }

    let paragraphs = split_paragraphs(response);
    if paragraphs.is_empty() {
        return Err(AiCommitError::EmptyResponse);
    }

    debug!("committing with title {:?}", paragraphs[0]);
    vcs.commit(&paragraphs)?;
    Ok(Outcome::Committed(paragraphs))
}
