use anyhow::{Context, Result};
use clap::Subcommand;
use shared::{
    config::ClientConfig,
    models::{LoginResponse, OAuthCallbackParams},
};

use super::session::complete_login;
use crate::context::AppContext;

#[derive(Subcommand, Debug)]
pub enum OAuthCommand {
    /// Print the URL that starts a sign-in with the provider
    Authorize {
        /// Provider identifier, e.g. github
        provider: String,

        /// Where the provider should send the browser back to
        #[arg(
            long,
            help = "Where the provider should send the browser back to. Defaults to <app origin>/auth/callback/<provider>."
        )]
        redirect_uri: Option<String>,
    },

    /// Complete a sign-in with the code the provider handed back
    Callback {
        /// Provider identifier, e.g. github
        provider: String,

        /// Authorization code from the callback URL
        #[arg(long)]
        code: String,

        /// State value from the callback URL
        #[arg(long)]
        state: Option<String>,
    },
}

pub async fn run(config: ClientConfig, command: OAuthCommand) -> Result<()> {
    match command {
        OAuthCommand::Authorize {
            provider,
            redirect_uri,
        } => {
            let ctx = AppContext::open(config, "/login")?;
            let redirect_uri = redirect_uri.unwrap_or_else(|| {
                format!(
                    "{}/auth/callback/{provider}",
                    ctx.config.app_origin.trim_end_matches('/')
                )
            });
            println!("{}", ctx.client.authorize_url(&provider, &redirect_uri));
            Ok(())
        }
        OAuthCommand::Callback {
            provider,
            code,
            state,
        } => {
            let ctx = AppContext::open(config, &format!("/auth/callback/{provider}"))?;
            let response: LoginResponse = ctx
                .client
                .handle_callback(&provider, &OAuthCallbackParams { code, state })
                .await
                .with_context(|| format!("{provider} sign-in failed"))?;
            complete_login(&ctx, &response)
        }
    }
}
