use std::sync::Arc;

use anyhow::Result;
use clap::Subcommand;
use client::{ThemeStore, platform::memory::MemoryThemeRoot};
use shared::models::Theme;

use crate::host::{FileStorage, StateDir, TerminalColorScheme};

fn parse_theme(value: &str) -> Result<Theme, String> {
    value
        .parse()
        .map_err(|_| format!("expected one of: light, dark, system (got '{value}')"))
}

#[derive(Subcommand, Debug)]
pub enum ThemeCommand {
    /// Show the stored preference and the palette it resolves to
    Show,

    /// Store a new preference
    Set {
        /// light, dark or system
        #[arg(value_parser = parse_theme)]
        theme: Theme,
    },

    /// Cycle light, dark, system
    Toggle,
}

pub fn run(command: &ThemeCommand) -> Result<()> {
    let state = StateDir::resolve();
    state.ensure()?;
    let store = ThemeStore::new(
        Arc::new(FileStorage::open(state.preferences_path())),
        Arc::new(MemoryThemeRoot::default()),
        Arc::new(TerminalColorScheme),
    );

    match command {
        ThemeCommand::Show => {}
        ThemeCommand::Set { theme } => store.set_theme(*theme),
        ThemeCommand::Toggle => store.set_theme(store.theme().next()),
    }

    let palette = if store.is_dark() { "dark" } else { "light" };
    println!("theme: {} ({palette} palette)", store.theme());
    Ok(())
}
