use std::io::{self, BufRead, Write};

use anyhow::{Context, Result, bail};
use clap::Args;
use client::{
    AuthGuard, GuardOutcome,
    platform::PreferenceStorage,
    session::{LOGIN_FALLBACK_URL_KEY, LOGIN_PATH, UserState},
};
use colored::Colorize;
use rpassword::prompt_password;
use shared::{
    config::ClientConfig,
    models::{AuthMethod, LdapLoginRequest, LoginRequest, LoginResponse, UserInfo},
};

use crate::context::AppContext;

#[derive(Args, Debug)]
pub struct LoginArgs {
    /// Account e-mail address
    #[arg(long, short, conflicts_with = "username")]
    pub email: Option<String>,

    /// Account user name
    #[arg(long, short)]
    pub username: Option<String>,

    /// Sign in through this LDAP provider instead of with a local password
    #[arg(long, value_name = "PROVIDER")]
    pub ldap: Option<String>,

    /// Read the password from standard input instead of prompting
    #[arg(long)]
    pub password_stdin: bool,
}

pub async fn login(config: ClientConfig, args: LoginArgs) -> Result<()> {
    let ctx = AppContext::open(config, LOGIN_PATH)?;

    let response = match &args.ldap {
        Some(provider) => {
            let username = match args.username.or(args.email) {
                Some(username) => username,
                None => prompt("Username: ")?,
            };
            let password = read_password(args.password_stdin, "Password: ")?;
            ctx.client
                .login_with_ldap(provider, &LdapLoginRequest { username, password })
                .await
        }
        None => {
            let (email, username) = match (args.email, args.username) {
                (None, None) => (Some(prompt("Email: ")?), None),
                identifiers => identifiers,
            };
            let password = read_password(args.password_stdin, "Password: ")?;
            ctx.client
                .login(&LoginRequest {
                    email,
                    username,
                    password,
                    auth_method: Some(AuthMethod::Standard),
                })
                .await
        }
    }
    .context("login failed")?;

    complete_login(&ctx, &response)
}

/// Stores a successful login and reports it.
pub fn complete_login(ctx: &AppContext, response: &LoginResponse) -> Result<()> {
    ctx.session().confirm(response);
    ctx.persist()?;
    print_user_summary(&ctx.session().users().state());

    if let Some(url) = ctx.storage.get(LOGIN_FALLBACK_URL_KEY) {
        println!("return to: {url}");
        ctx.storage.remove(LOGIN_FALLBACK_URL_KEY);
    }
    Ok(())
}

pub async fn whoami(config: ClientConfig) -> Result<()> {
    let ctx = AppContext::open(config, "/")?;
    let userinfo = require_session(&ctx).await?;
    print_user_summary(&ctx.session().users().state());
    if let Some(id) = &userinfo.id {
        println!("id: {id}");
    }
    Ok(())
}

pub async fn logout(config: ClientConfig) -> Result<()> {
    let ctx = AppContext::open(config, "/")?;
    if let Err(err) = ctx.client.sign_out().await {
        eprintln!("warning: logout request failed: {err}");
    }
    ctx.forget()?;
    println!("Signed out.");
    Ok(())
}

/// Runs the auth guard for a protected command and returns the confirmed
/// profile.
pub async fn require_session(ctx: &AppContext) -> Result<UserInfo> {
    let guard = AuthGuard::new(ctx.client.clone());
    let outcome = guard.check("/").await;
    ctx.persist()?;

    match outcome {
        GuardOutcome::Authorized | GuardOutcome::Public => ctx
            .session()
            .users()
            .userinfo()
            .context("session confirmed without a profile"),
        GuardOutcome::Redirected => bail!("not signed in; run `console login` first"),
        GuardOutcome::Busy => bail!("another session check is still running"),
    }
}

fn print_user_summary(state: &UserState) {
    let Some(userinfo) = &state.userinfo else {
        return;
    };
    println!("Logged in as {}", userinfo.display_name().bold());
    if let Some(email) = &userinfo.email {
        println!("email: {email}");
    }
    if let Some(role) = &state.role {
        println!("role: {role}");
    }
}

pub fn prompt(message: &str) -> Result<String> {
    print!("{message}");
    io::stdout().flush().ok();
    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    let trimmed = input.trim().to_string();
    if trimmed.is_empty() {
        bail!("input must not be empty");
    }
    Ok(trimmed)
}

/// Reads one password, from stdin when `from_stdin` is set.
pub fn read_password(from_stdin: bool, message: &str) -> Result<String> {
    let password = if from_stdin {
        read_stdin_line()?
    } else {
        prompt_password(message)?
    };
    if password.is_empty() {
        bail!("password must not be empty");
    }
    Ok(password)
}

pub fn read_stdin_line() -> Result<String> {
    let line = io::stdin()
        .lock()
        .lines()
        .next()
        .context("expected a line on standard input")??;
    Ok(line.trim_end_matches('\r').to_string())
}
