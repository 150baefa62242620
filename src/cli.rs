//! Clap adapter for the `theme-admin` console.
//!
//! Compiled only with the `clap` feature (on by default). The only bridge to
//! the core is [`Command::into_action()`], which turns parsed arguments into a
//! [`ThemeAction`]. Everything else goes through [`handle`](crate::handle).

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};

use crate::types::ThemeAction;

/// Inspect and edit the storefront theme.
#[derive(Debug, Parser)]
#[command(name = "theme-admin", version)]
pub struct Cli {
    /// Console settings file (defaults to the platform config directory).
    #[arg(long, global = true)]
    pub settings: Option<PathBuf>,

    /// Increase log output (-v info, -vv debug).
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List every theme property with its current value.
    Show,
    /// Show one property and its description.
    Get {
        /// Dotted key (e.g. "colors.accent").
        key: String,
    },
    /// Change one property.
    Set {
        /// Dotted key (e.g. "buttons.primaryBg").
        key: String,
        /// New value, e.g. "#f59e0b" or "0.5rem".
        value: String,
        /// Save the theme after the change.
        #[arg(long)]
        save: bool,
    },
    /// Restore every property to its default.
    Reset {
        /// Skip the confirmation prompt.
        #[arg(short, long)]
        yes: bool,
        /// Save the theme after resetting.
        #[arg(long)]
        save: bool,
    },
    /// Save the current theme to the storefront.
    Save,
    /// Download the full site export.
    Export {
        /// Write to this file instead of the configured export file.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Upload a site export, replacing the server's data.
    Import {
        /// Exported JSON document.
        file: PathBuf,
    },
    /// List the projected style variables.
    Vars,
    /// Print the projected style variables as CSS.
    Css,
    /// Console settings file helpers.
    Settings {
        #[command(subcommand)]
        action: SettingsCommand,
    },
}

#[derive(Debug, Subcommand)]
pub enum SettingsCommand {
    /// Print a commented settings file template.
    Gen,
}

impl Command {
    /// Convert a parsed command into a framework-agnostic `ThemeAction`.
    pub fn into_action(self) -> ThemeAction {
        match self {
            Command::Show => ThemeAction::Show,
            Command::Get { key } => ThemeAction::Get { key },
            Command::Set { key, value, save } => ThemeAction::Set { key, value, save },
            Command::Reset { yes, save } => ThemeAction::Reset {
                confirmed: yes,
                save,
            },
            Command::Save => ThemeAction::Save,
            Command::Export { output } => ThemeAction::Export { output },
            Command::Import { file } => ThemeAction::Import { file },
            Command::Vars => ThemeAction::Vars,
            Command::Css => ThemeAction::Css,
            Command::Settings {
                action: SettingsCommand::Gen,
            } => ThemeAction::SettingsTemplate,
        }
    }
}

impl Cli {
    /// Bare `theme-admin` shows the theme.
    pub fn action(self) -> ThemeAction {
        self.command
            .map(Command::into_action)
            .unwrap_or(ThemeAction::Show)
    }
}
