//! Console operations and their result types.
//!
//! [`handle`] runs one [`ThemeAction`] against a [`ThemeStore`] and returns a
//! [`ThemeResult`] the caller prints. Everything here is framework-free; the
//! clap layer only builds the action.

use std::fmt;
use std::path::PathBuf;

use crate::error::ThemeError;
use crate::gateway::PersistenceGateway;
use crate::settings::{self, ConsoleSettings};
use crate::store::{StoreState, ThemeStore};
use crate::theme::Section;
use crate::types::ThemeAction;

/// Result of a console operation. Returned to the caller for display.
#[derive(Debug, Clone, PartialEq)]
pub enum ThemeResult {
    /// Every known property as dotted key-value pairs.
    Listing { entries: Vec<(String, String)> },
    /// One property's value, its description and any suggested choices.
    KeyValue {
        key: String,
        value: String,
        doc: Option<&'static str>,
        options: &'static [(&'static str, &'static str)],
    },
    ValueSet {
        key: String,
        value: String,
        saved: bool,
    },
    Reset { saved: bool },
    ResetDeclined,
    Saved,
    Exported { path: PathBuf, bytes: usize },
    Imported { path: PathBuf, theme_applied: bool },
    /// Projected style variables, by name.
    Variables { entries: Vec<(String, String)> },
    Css(String),
    Template(String),
}

impl fmt::Display for ThemeResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ThemeResult::Listing { entries } => {
                for (i, (key, value)) in entries.iter().enumerate() {
                    if i > 0 {
                        writeln!(f)?;
                    }
                    write!(f, "{key} = {value}")?;
                }
                Ok(())
            }
            ThemeResult::KeyValue {
                key,
                value,
                doc,
                options,
            } => {
                if let Some(doc) = doc {
                    writeln!(f, "# {doc}")?;
                }
                if !options.is_empty() {
                    writeln!(f, "# Choices:")?;
                    for (choice, label) in options.iter() {
                        writeln!(f, "#   {choice}  ({label})")?;
                    }
                }
                write!(f, "{key} = {value}")
            }
            ThemeResult::ValueSet { key, value, saved } => {
                write!(f, "Set {key} = {value}")?;
                if !saved {
                    write!(f, " (preview only, pass --save to persist)")?;
                }
                Ok(())
            }
            ThemeResult::Reset { saved } => {
                write!(f, "Theme reset to defaults")?;
                if !saved {
                    write!(f, " (preview only, pass --save to persist)")?;
                }
                Ok(())
            }
            ThemeResult::ResetDeclined => write!(f, "Reset cancelled"),
            ThemeResult::Saved => write!(f, "Theme settings saved successfully!"),
            ThemeResult::Exported { path, bytes } => {
                write!(f, "Exported {bytes} bytes to {}", path.display())
            }
            ThemeResult::Imported {
                path,
                theme_applied,
            } => {
                write!(f, "Imported {}", path.display())?;
                if *theme_applied {
                    write!(f, " (theme applied)")?;
                }
                write!(f, ". Reload to see all imported data.")
            }
            ThemeResult::Variables { entries } => {
                for (i, (name, value)) in entries.iter().enumerate() {
                    if i > 0 {
                        writeln!(f)?;
                    }
                    write!(f, "--{name}: {value}")?;
                }
                Ok(())
            }
            ThemeResult::Css(css) => write!(f, "{}", css.trim_end()),
            ThemeResult::Template(t) => write!(f, "{t}"),
        }
    }
}

/// Split `section.property` into its parts.
pub fn parse_key(key: &str) -> Result<(Section, &str), ThemeError> {
    let (section, property) = key
        .split_once('.')
        .filter(|(_, property)| !property.is_empty() && !property.contains('.'))
        .ok_or_else(|| ThemeError::InvalidKey(key.to_string()))?;
    Ok((section.parse()?, property))
}

/// Run `action` against `store`.
///
/// The store is loaded first unless the action never looks at the theme.
/// `save` and `set --save` refuse to run when the load fell back to the
/// defaults, since the theme they would send was never seen on the server.
/// `reset --save` still runs: replacing the stored theme is what it asks for.
/// `confirm` is asked before an unconfirmed reset.
pub async fn handle<G: PersistenceGateway>(
    store: &ThemeStore<G>,
    action: &ThemeAction,
    console: &ConsoleSettings,
    confirm: impl FnOnce(&str) -> bool,
) -> Result<ThemeResult, ThemeError> {
    let needs_theme = !matches!(
        action,
        ThemeAction::SettingsTemplate | ThemeAction::Export { .. }
    );
    if needs_theme && store.state() == StoreState::Loading {
        store.load().await;
    }

    let persists_loaded_theme = matches!(
        action,
        ThemeAction::Save | ThemeAction::Set { save: true, .. }
    );
    if persists_loaded_theme && let Some(e) = store.fetch_failure() {
        return Err(ThemeError::FetchFailure(e));
    }

    match action {
        ThemeAction::Show => Ok(ThemeResult::Listing {
            entries: store.theme().entries(),
        }),
        ThemeAction::Get { key } => {
            let (section, property) = parse_key(key)?;
            let theme = store.theme();
            let value = theme
                .get(section, property)
                .ok_or_else(|| ThemeError::UnknownProperty {
                    section: section.to_string(),
                    property: property.to_string(),
                })?;
            Ok(ThemeResult::KeyValue {
                key: key.clone(),
                value: value.to_string(),
                doc: section.describe(property),
                options: section.options(property),
            })
        }
        ThemeAction::Set { key, value, save } => {
            let (section, property) = parse_key(key)?;
            store.update_property(section, property, value)?;
            if *save {
                store.save().await?;
            }
            Ok(ThemeResult::ValueSet {
                key: key.clone(),
                value: value.clone(),
                saved: *save,
            })
        }
        ThemeAction::Reset { confirmed, save } => {
            let reset = if *confirmed {
                store.reset(|_| true)
            } else {
                store.reset(confirm)
            };
            if !reset {
                return Ok(ThemeResult::ResetDeclined);
            }
            if *save {
                store.save().await?;
            }
            Ok(ThemeResult::Reset { saved: *save })
        }
        ThemeAction::Save => {
            store.save().await?;
            Ok(ThemeResult::Saved)
        }
        ThemeAction::Export { output } => {
            let path = output
                .clone()
                .unwrap_or_else(|| PathBuf::from(&console.export_file));
            let bytes = store.export().await?;
            tokio::fs::write(&path, &bytes)
                .await
                .map_err(|source| ThemeError::Io {
                    path: path.clone(),
                    source,
                })?;
            Ok(ThemeResult::Exported {
                path,
                bytes: bytes.len(),
            })
        }
        ThemeAction::Import { file } => {
            let bytes = tokio::fs::read(file)
                .await
                .map_err(|source| ThemeError::Io {
                    path: file.clone(),
                    source,
                })?;
            let outcome = store.import(&bytes).await?;
            Ok(ThemeResult::Imported {
                path: file.clone(),
                theme_applied: outcome.theme_applied,
            })
        }
        ThemeAction::Vars => Ok(ThemeResult::Variables {
            entries: store.vars().snapshot().into_iter().collect(),
        }),
        ThemeAction::Css => Ok(ThemeResult::Css(store.vars().to_css())),
        ThemeAction::SettingsTemplate => Ok(ThemeResult::Template(settings::template())),
    }
}
