use std::{fs, path::PathBuf};

use anyhow::{Context, Result, bail};
use clap::Subcommand;
use shared::{
    config::ClientConfig,
    models::{InviteUserRequest, UpdateUserRequest},
};

use super::session::require_session;
use crate::context::AppContext;

#[derive(Subcommand, Debug)]
pub enum ProfileCommand {
    /// Update profile fields of the signed-in user
    Update {
        #[arg(long)]
        full_name: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        phone: Option<String>,
        /// URL of an already uploaded avatar
        #[arg(long)]
        avatar: Option<String>,
    },

    /// Invite someone to the workspace
    Invite {
        #[arg(long)]
        email: String,
        #[arg(long)]
        role: Option<String>,
    },

    /// Upload a new avatar image
    Avatar {
        /// Image file to upload
        file: PathBuf,
    },
}

pub async fn run(config: ClientConfig, command: ProfileCommand) -> Result<()> {
    let ctx = AppContext::open(config, "/settings")?;
    let userinfo = require_session(&ctx).await?;

    let outcome = match command {
        ProfileCommand::Update {
            full_name,
            email,
            phone,
            avatar,
        } => {
            let update = UpdateUserRequest {
                full_name,
                email,
                phone,
                avatar,
            };
            if update.is_empty() {
                bail!("nothing to update; pass at least one field");
            }
            let user_id = userinfo.id.context("profile has no id")?;
            ctx.client
                .update_user_info(&user_id, &update)
                .await
                .map(|updated| {
                    ctx.client
                        .platform()
                        .notifier
                        .success("Profile updated", Some(updated.display_name()));
                })
        }
        ProfileCommand::Invite { email, role } => ctx
            .client
            .invite_user(&InviteUserRequest {
                email: email.clone(),
                role,
            })
            .await
            .map(|_| {
                ctx.client
                    .platform()
                    .notifier
                    .success("Invitation sent", Some(email.as_str()));
            }),
        ProfileCommand::Avatar { file } => {
            let bytes =
                fs::read(&file).with_context(|| format!("failed to read {}", file.display()))?;
            let file_name = file
                .file_name()
                .and_then(|name| name.to_str())
                .unwrap_or("avatar")
                .to_string();
            ctx.client
                .upload_avatar(&file_name, bytes)
                .await
                .map(|uploaded| {
                    ctx.client
                        .platform()
                        .notifier
                        .success("Avatar uploaded", Some(uploaded.url.as_str()));
                })
        }
    };

    ctx.persist()?;
    Ok(outcome?)
}
