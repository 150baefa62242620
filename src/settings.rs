//! Console settings: where the storefront API lives and how to talk to it.
//!
//! Layers, highest priority first: environment variables, the settings file,
//! compiled defaults. The settings file is `theme-admin.toml` in the platform
//! config directory unless a path is given explicitly. A missing file is fine.

use std::path::{Path, PathBuf};

use confique::Config;

use crate::error::ThemeError;
use crate::gateway::Credential;

pub const APP_NAME: &str = "theme-admin";
pub const FILE_NAME: &str = "theme-admin.toml";

#[derive(Config, Debug)]
pub struct ConsoleSettings {
    /// Base URL of the storefront API (e.g. "https://shop.example.com/api").
    #[config(default = "http://localhost:8000/api", env = "THEME_ADMIN_BACKEND_URL")]
    pub backend_url: String,

    /// Bearer token attached to every request. Issued by the storefront login.
    #[config(env = "THEME_ADMIN_TOKEN")]
    pub token: Option<String>,

    /// File written by `export` when no output path is given.
    #[config(default = "theme_export.json")]
    pub export_file: String,

    /// Reject imported themes carrying keys outside the default table.
    #[config(default = false, env = "THEME_ADMIN_STRICT_IMPORT")]
    pub strict_import: bool,

    /// HTTP request timeout in seconds.
    #[config(default = 30, env = "THEME_ADMIN_TIMEOUT_SECS")]
    pub timeout_secs: u64,
}

impl ConsoleSettings {
    pub fn credential(&self) -> Option<Credential> {
        self.token
            .as_deref()
            .filter(|t| !t.trim().is_empty())
            .map(Credential::new)
    }
}

/// `theme-admin.toml` in the platform config directory.
pub fn default_settings_path() -> Option<PathBuf> {
    let proj = directories::ProjectDirs::from("", "", APP_NAME)?;
    Some(proj.config_dir().join(FILE_NAME))
}

/// Load settings from env, then `path` (or the platform default), then defaults.
pub fn load(path: Option<&Path>) -> Result<ConsoleSettings, ThemeError> {
    let file = path.map(Path::to_path_buf).or_else(default_settings_path);
    let mut builder = ConsoleSettings::builder().env();
    if let Some(file) = file {
        builder = builder.file(file);
    }
    Ok(builder.load()?)
}

/// Commented TOML template for the settings file.
pub fn template() -> String {
    confique::toml::template::<ConsoleSettings>(confique::toml::FormatOptions::default())
}
