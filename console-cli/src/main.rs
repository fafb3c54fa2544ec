#![cfg_attr(not(test), forbid(unsafe_code))]

//! Main entry point for the Console CLI.

use anyhow::Result;
use clap::{Parser, Subcommand};
use dotenv::dotenv;
use shared::config::ClientConfig;
use std::path::PathBuf;

mod commands;
mod context;
mod host;
mod logging;

/// Console CLI
#[derive(Parser)]
#[command(name = "console")]
#[command(about = "Command-line client for the Console backend", long_about = None)]
pub struct Cli {
    /// Path to the configuration file (optional)
    #[arg(
        long,
        short,
        global = true,
        help = "Path to the configuration file (e.g., config.yaml or config.json). If not provided, defaults and environment variables are used."
    )]
    config: Option<PathBuf>,

    /// API base URL override
    #[arg(
        long,
        global = true,
        help = "API base URL (e.g., https://console.example.com/api/v1). Overrides the configuration file and CONSOLE_API_CLIENT_URL."
    )]
    api: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

/// Subcommands for the Console CLI
#[derive(Subcommand)]
enum Commands {
    /// Sign in with a password or through an LDAP provider
    Login(commands::session::LoginArgs),

    /// Create a new account
    Register(commands::register::RegisterArgs),

    /// Sign in through an OAuth2/OIDC provider
    #[command(subcommand)]
    Oauth(commands::oauth::OAuthCommand),

    /// Confirm the stored session and show the signed-in user
    Whoami,

    /// Sign out and forget the stored session
    Logout,

    /// Manage the signed-in user's profile
    #[command(subcommand)]
    Profile(commands::profile::ProfileCommand),

    /// File a feedback issue
    #[command(subcommand)]
    Issue(commands::issue::IssueCommand),

    /// Show backend build information
    Version,

    /// Show or change the colour theme preference
    #[command(subcommand)]
    Theme(commands::theme::ThemeCommand),

    /// Run the local development reverse proxy
    Proxy(commands::proxy::ProxyArgs),

    /// Generate shell completion scripts for the CLI
    Completion {
        /// The shell type for which to generate the completion script (e.g., bash, zsh, fish, powershell)
        #[arg(
            long,
            short,
            help = "The shell type for which to generate the completion script (e.g., bash, zsh, fish, powershell)"
        )]
        shell: clap_complete::Shell,
    },

    /// Generate a configuration file
    Config {
        /// Format of the configuration file to generate (yaml or json). Defaults to yaml.
        #[arg(
            long,
            short,
            help = "Format of the configuration file to generate (yaml or json). Defaults to yaml."
        )]
        format: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    let cli = Cli::parse();

    match cli.command {
        Commands::Completion { shell } => {
            commands::completion::generate_completion(shell);
            return Ok(());
        }
        Commands::Config { format } => {
            let format = format.unwrap_or_else(|| "yaml".to_string());
            return commands::config::generate_config(&format);
        }
        _ => {}
    }

    let config = ClientConfig::load_config(cli.config, cli.api)?;
    logging::initialize_tracing(&config);

    match cli.command {
        Commands::Login(args) => commands::session::login(config, args).await,
        Commands::Register(args) => commands::register::register(config, args).await,
        Commands::Oauth(command) => commands::oauth::run(config, command).await,
        Commands::Whoami => commands::session::whoami(config).await,
        Commands::Logout => commands::session::logout(config).await,
        Commands::Profile(command) => commands::profile::run(config, command).await,
        Commands::Issue(command) => commands::issue::run(config, command).await,
        Commands::Version => commands::version::show_version(config).await,
        Commands::Theme(command) => commands::theme::run(&command),
        Commands::Proxy(args) => commands::proxy::serve(config, args).await,
        Commands::Completion { .. } | Commands::Config { .. } => Ok(()),
    }
}
