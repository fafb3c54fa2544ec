use anyhow::{Context, Result};
use clap::Subcommand;
use shared::{config::ClientConfig, models::CreateIssueRequest};

use super::session::require_session;
use crate::context::AppContext;

#[derive(Subcommand, Debug)]
pub enum IssueCommand {
    /// Create a feedback issue
    Create {
        #[arg(long, short)]
        title: String,
        #[arg(long, short)]
        description: String,
    },
}

pub async fn run(config: ClientConfig, command: IssueCommand) -> Result<()> {
    let ctx = AppContext::open(config, "/feedback")?;
    require_session(&ctx).await?;

    match command {
        IssueCommand::Create { title, description } => {
            let created = ctx
                .client
                .create_issue(&CreateIssueRequest { title, description })
                .await
                .context("failed to create issue")?;
            ctx.persist()?;
            println!("Created issue #{}: {}", created.issue_number, created.issue_url);
        }
    }
    Ok(())
}
