use std::path::PathBuf;
use thiserror::Error;

use crate::gateway::GatewayError;

#[derive(Debug, Error)]
pub enum ThemeError {
    #[error("Failed to load theme settings: {0}")]
    FetchFailure(GatewayError),

    #[error("Failed to save theme settings: {0}")]
    SaveFailure(GatewayError),

    #[error("Failed to export theme: {0}")]
    ExportFailure(GatewayError),

    #[error("Failed to import theme: {0}")]
    ImportFailure(GatewayError),

    #[error("Malformed theme document: {reason}")]
    MalformedDocument { reason: String },

    #[error("Invalid theme: {reason}")]
    InvalidTheme { reason: String },

    #[error("Unknown section '{0}' (expected one of colors, typography, header, footer, buttons, cards)")]
    UnknownSection(String),

    #[error("Unknown property '{property}' in section '{section}'")]
    UnknownProperty { section: String, property: String },

    #[error("Invalid key '{0}' (expected section.property, e.g. colors.accent)")]
    InvalidKey(String),

    #[error("Unknown keys in imported theme: {}", .0.join(", "))]
    UnknownKeys(Vec<String>),

    #[error("Failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Settings error: {0}")]
    Settings(#[from] confique::Error),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),
}

impl ThemeError {
    /// True for failures that came from the remote side rather than local input.
    pub fn is_network(&self) -> bool {
        matches!(
            self,
            ThemeError::FetchFailure(_)
                | ThemeError::SaveFailure(_)
                | ThemeError::ExportFailure(_)
                | ThemeError::ImportFailure(_)
                | ThemeError::Http(_)
        )
    }
}
