use std::path::PathBuf;

/// A console operation, independent of any CLI framework.
/// The CLI layer converts parsed clap args into this.
#[derive(Debug, Clone, PartialEq)]
pub enum ThemeAction {
    /// List every property with its current value.
    Show,
    /// One property by dotted key, e.g. `colors.accent`.
    Get { key: String },
    /// Edit one property locally, optionally saving afterwards.
    Set {
        key: String,
        value: String,
        save: bool,
    },
    /// Restore the default table. `confirmed` skips the prompt.
    Reset { confirmed: bool, save: bool },
    Save,
    Export { output: Option<PathBuf> },
    Import { file: PathBuf },
    /// The projected style variables.
    Vars,
    /// The projected style variables as a CSS `:root` block.
    Css,
    /// Commented template for the console settings file.
    SettingsTemplate,
}
