use clap::Parser;
use command::CommitCommand;
use config::cli::Cli;
use config::AiCommitConfig;
use credential::CredentialResolver;
use error::AiCommitError;
use provider::GenAIBackend;
use std::io::IsTerminal;
use std::process;
use vcs::GitBackend;

mod ai_prompt;
mod command;
mod config;
mod credential;
mod error;
mod logging;
mod provider;
mod vcs;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();
    logging::init_logging(cli.debug);

    if let Err(e) = run(cli).await {
        eprintln!("\x1b[91m\rerror:\x1b[0m {e}");
        process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), AiCommitError> {
    let config = AiCommitConfig::build(&cli)?;

    let vcs = GitBackend::new().with_exclusions(config.diff_exclusions.clone());
    let credentials = CredentialResolver::system(config.interactive);
    let chat = GenAIBackend;

    CommitCommand::new(&config, &vcs, &chat, &credentials)
        .with_progress(std::io::stdout().is_terminal())
        .execute()
        .await?;

    Ok(())
}
