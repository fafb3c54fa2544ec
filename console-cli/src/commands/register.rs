use anyhow::{Context, Result};
use clap::Args;
use client::RegisterForm;
use rpassword::prompt_password;
use shared::config::ClientConfig;

use super::session::{prompt, read_stdin_line};
use crate::context::AppContext;

#[derive(Args, Debug)]
pub struct RegisterArgs {
    /// E-mail address of the new account; its local part becomes the user name
    #[arg(long, short)]
    pub email: Option<String>,

    /// Read the password and its confirmation from two lines of standard input
    #[arg(long)]
    pub password_stdin: bool,
}

pub async fn register(config: ClientConfig, args: RegisterArgs) -> Result<()> {
    let ctx = AppContext::open(config, "/register")?;

    let email = match args.email {
        Some(email) => email,
        None => prompt("Email: ")?,
    };
    let (password, confirm_password) = if args.password_stdin {
        (read_stdin_line()?, read_stdin_line()?)
    } else {
        (
            prompt_password("Password: ")?,
            prompt_password("Confirm password: ")?,
        )
    };

    let form = RegisterForm {
        email,
        password,
        confirm_password,
    };
    let response = ctx
        .client
        .register_account(&form)
        .await
        .context("registration failed")?;

    ctx.client.platform().notifier.success(
        response.message.as_deref().unwrap_or("Account created"),
        Some("Run `console login` to sign in."),
    );
    Ok(())
}
