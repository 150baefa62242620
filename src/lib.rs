//! Theme configuration for a storefront admin console.
//!
//! A storefront's look (colors, typography, header, footer, buttons, cards) is
//! one [`Theme`]: six fixed sections of string properties. This crate holds the
//! live theme, lets an operator edit it, previews every edit immediately
//! through a set of style variables, and persists it to the storefront API.
//!
//! ```ignore
//! let gateway = HttpGateway::from_settings(&settings)?;
//! let store = ThemeStore::new(gateway, StyleVars::new());
//! store.load().await;
//! store.update_property(Section::Colors, "accent", "#ff0000")?;
//! store.save().await?;
//! ```
//!
//! # Defaults as source of truth
//!
//! The default table ([`defaults()`]) defines which properties exist and what
//! their fallback values are. Whatever comes from the server or an imported
//! file is deep-merged on top of it ([`merge`]), so a stored theme missing a
//! section or a property still yields a complete theme. Keys the table does
//! not know are carried along untouched.
//!
//! # Lifecycle
//!
//! ```text
//! Loading ──load()──► Ready
//!                       │  update_property / reset / import
//!                       ▼
//!               local theme + style vars   ──save()──► server
//! ```
//!
//! A failed initial fetch is not fatal: the store falls back to the defaults
//! and still becomes `Ready`. Local edits are never rolled back when a save
//! fails.
//!
//! # Style projection
//!
//! Every change to the theme is published into [`StyleVars`], a shared
//! namespace of CSS custom properties (`color-accent`, `btn-radius`, ...).
//! Only a fixed subset is published; see the [`projection`] module.
//!
//! # Export and import
//!
//! An export is the server's whole site document, of which the theme is only
//! one part (`siteSettings.theme`). Import previews that theme locally and
//! then hands the complete document to the server, which replaces its data.
//! The [`codec`] keeps every byte of the document it does not understand.
//!
//! # Console
//!
//! The `theme-admin` binary (behind the `clap` feature, on by default) drives
//! all of the above from the command line. Its own settings (API URL, bearer
//! token, timeouts) live in `theme-admin.toml` and `THEME_ADMIN_*` environment
//! variables; see [`settings`].
//!
//! # Error handling
//!
//! All fallible operations return [`ThemeError`]. Remote failures keep the
//! underlying [`GatewayError`] so callers can tell a rejected request from an
//! unreachable server.

pub mod codec;
pub mod error;
pub mod gateway;
pub mod merge;
pub mod projection;
pub mod settings;
pub mod store;
pub mod theme;
pub mod types;

#[cfg(feature = "clap")]
pub mod cli;
mod ops;

#[cfg(test)]
mod fixtures;

pub use codec::ExportedDocument;
pub use error::ThemeError;
pub use gateway::{Credential, GatewayError, HttpGateway, PersistenceGateway, SiteSettings};
pub use ops::{ThemeResult, handle, parse_key};
pub use projection::{StyleVars, project};
pub use settings::ConsoleSettings;
pub use store::{ImportOutcome, StoreState, ThemeStore};
pub use theme::{Section, Theme, defaults};
pub use types::ThemeAction;
