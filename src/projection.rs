//! Live style projection.
//!
//! [`project`] publishes the preview-critical part of a [`Theme`] into a shared
//! [`StyleVars`] namespace that rendering code reads without further wiring.
//! Only a fixed subset is published:
//!
//! | Section      | Variables                                                            |
//! |--------------|----------------------------------------------------------------------|
//! | `colors`     | `color-<key>` for every property                                     |
//! | `typography` | `font-family`, `heading-font`                                        |
//! | `header`     | `header-bg`, `header-text`, `header-nav-hover`                       |
//! | `footer`     | `footer-bg`, `footer-text`                                           |
//! | `buttons`    | `btn-primary-bg`, `btn-primary-hover`, `btn-secondary-bg`, `btn-radius` |
//! | `cards`      | none                                                                 |
//!
//! Everything else (font sizes, `buttons.primaryText`, card styling, ...) is
//! read straight from the theme by the components that use it. Those readers
//! key off [`StyleVars::refresh_count`], which every projection bumps.
//!
//! The namespace is last-writer-wins and never cleared: a variable that a later
//! theme no longer produces keeps its old value.

use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::RwLock;
use serde_json::Value;
use tracing::{debug, warn};

use crate::theme::Theme;

/// Shared handle to the style variable namespace. Clones see the same state.
#[derive(Debug, Clone, Default)]
pub struct StyleVars {
    inner: Arc<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    vars: RwLock<BTreeMap<String, String>>,
    refresh: AtomicU64,
}

impl StyleVars {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<String> {
        self.inner.vars.read().get(name).cloned()
    }

    /// Copy of the whole namespace.
    pub fn snapshot(&self) -> BTreeMap<String, String> {
        self.inner.vars.read().clone()
    }

    pub fn len(&self) -> usize {
        self.inner.vars.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.vars.read().is_empty()
    }

    /// Number of projections so far. Consumers re-render when it changes.
    pub fn refresh_count(&self) -> u64 {
        self.inner.refresh.load(Ordering::Acquire)
    }

    /// Render the namespace as a `:root` block of CSS custom properties.
    ///
    /// A variable whose name or value could escape its own declaration is
    /// left out.
    pub fn to_css(&self) -> String {
        let vars = self.inner.vars.read();
        let mut css = String::from(":root {\n");
        for (name, value) in vars.iter() {
            if !is_css_ident(name) || !is_css_value(value) {
                warn!(name = %name, "skipping style variable unsafe for CSS");
                continue;
            }
            let _ = writeln!(css, "  --{name}: {value};");
        }
        css.push_str("}\n");
        css
    }

    fn publish(&self, entries: Vec<(String, String)>) -> u64 {
        {
            let mut vars = self.inner.vars.write();
            for (name, value) in entries {
                vars.insert(name, value);
            }
        }
        self.inner.refresh.fetch_add(1, Ordering::AcqRel) + 1
    }
}

fn is_css_ident(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

fn is_css_value(value: &str) -> bool {
    !value.contains([';', '{', '}', '<', '\n', '\r'])
}

/// Variable name/value pairs a theme projects, in publication order.
pub fn variables(theme: &Theme) -> Vec<(String, String)> {
    let c = &theme.colors;
    let mut out: Vec<(String, String)> = [
        ("primary", &c.primary),
        ("primaryLight", &c.primary_light),
        ("accent", &c.accent),
        ("accentHover", &c.accent_hover),
        ("background", &c.background),
        ("backgroundAlt", &c.background_alt),
        ("text", &c.text),
        ("textLight", &c.text_light),
        ("white", &c.white),
        ("success", &c.success),
        ("error", &c.error),
    ]
    .into_iter()
    .map(|(key, value)| (format!("color-{key}"), value.clone()))
    .collect();

    // Colors publish every key they carry, including ones outside the table.
    out.extend(c.extra.iter().filter_map(|(key, value)| match value {
        Value::String(s) => Some((format!("color-{key}"), s.clone())),
        _ => None,
    }));

    let fixed = [
        ("font-family", &theme.typography.font_family),
        ("heading-font", &theme.typography.heading_font),
        ("header-bg", &theme.header.background),
        ("header-text", &theme.header.text),
        ("header-nav-hover", &theme.header.nav_hover),
        ("footer-bg", &theme.footer.background),
        ("footer-text", &theme.footer.text),
        ("btn-primary-bg", &theme.buttons.primary_bg),
        ("btn-primary-hover", &theme.buttons.primary_hover),
        ("btn-secondary-bg", &theme.buttons.secondary_bg),
        ("btn-radius", &theme.buttons.border_radius),
    ];
    out.extend(
        fixed
            .into_iter()
            .map(|(name, value)| (name.to_string(), value.clone())),
    );
    out
}

/// Publish `theme` into `vars` and bump the refresh counter.
///
/// Returns the new counter value.
pub fn project(theme: &Theme, vars: &StyleVars) -> u64 {
    let entries = variables(theme);
    let count = entries.len();
    let refresh = vars.publish(entries);
    debug!(variables = count, refresh, "projected theme");
    refresh
}
