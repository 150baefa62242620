//! The configuration store: sole owner and writer of the live theme.
//!
//! ```text
//! new() ──► Loading ──load()──► Ready
//! ```
//!
//! The defaults are projected as soon as the store exists. `load()` always
//! ends in `Ready`. A failed fetch falls back to the default table so the
//! console stays usable; [`ThemeStore::fetch_failure`] reports why, so callers
//! that persist can refuse to overwrite a theme they never saw.
//!
//! Every local change (edit, reset, import) replaces the whole theme and is
//! projected into [`StyleVars`] right away; nothing reaches the server until
//! [`ThemeStore::save`] or [`ThemeStore::import`].
//!
//! Methods take `&self` so network calls can overlap. Outgoing payloads are
//! snapshots taken at call time. Each local change bumps a generation counter;
//! a fetch that started before the latest change is dropped instead of
//! clobbering the newer edit.

use parking_lot::Mutex;
use tracing::{info, warn};

use crate::codec;
use crate::error::ThemeError;
use crate::gateway::{GatewayError, PersistenceGateway, SITE_SETTINGS};
use crate::projection::{StyleVars, project};
use crate::theme::{Section, Theme, defaults};

pub const RESET_PROMPT: &str =
    "Are you sure you want to reset to the default theme? This will discard all unsaved changes.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreState {
    Loading,
    Ready,
}

/// What a completed import did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportOutcome {
    /// The document carried a theme and it is now the local theme.
    pub theme_applied: bool,
    /// The server replaced state the console does not model; reload to see it.
    pub reload_required: bool,
}

struct Inner {
    state: StoreState,
    theme: Theme,
    generation: u64,
    fallback: Option<GatewayError>,
}

pub struct ThemeStore<G> {
    gateway: G,
    vars: StyleVars,
    strict_import: bool,
    inner: Mutex<Inner>,
}

impl<G: PersistenceGateway> ThemeStore<G> {
    pub fn new(gateway: G, vars: StyleVars) -> Self {
        project(defaults(), &vars);
        Self {
            gateway,
            vars,
            strict_import: false,
            inner: Mutex::new(Inner {
                state: StoreState::Loading,
                theme: defaults().clone(),
                generation: 0,
                fallback: None,
            }),
        }
    }

    /// Reject imported themes that carry keys outside the default table.
    pub fn strict_import(mut self, strict: bool) -> Self {
        self.strict_import = strict;
        self
    }

    pub fn state(&self) -> StoreState {
        self.inner.lock().state
    }

    pub fn theme(&self) -> Theme {
        self.inner.lock().theme.clone()
    }

    pub fn vars(&self) -> &StyleVars {
        &self.vars
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    /// Why the last `load()` fell back to the defaults, if it did.
    pub fn fetch_failure(&self) -> Option<GatewayError> {
        self.inner.lock().fallback.clone()
    }

    /// Fetch the stored theme, merge it with the defaults and enter `Ready`.
    pub async fn load(&self) -> Theme {
        let started = self.inner.lock().generation;

        let fetched = self.gateway.fetch_settings().await.and_then(|settings| {
            settings
                .theme
                .as_ref()
                .map(Theme::from_partial)
                .transpose()
                .map_err(|e| GatewayError::Decode {
                    endpoint: SITE_SETTINGS,
                    reason: e.to_string(),
                })
        });

        let theme = {
            let mut inner = self.inner.lock();
            inner.state = StoreState::Ready;
            inner.fallback = None;
            match fetched {
                Ok(Some(theme)) if inner.generation == started => {
                    inner.theme = theme;
                    info!("theme loaded");
                }
                Ok(Some(_)) => warn!("dropping fetched theme, local changes are newer"),
                Ok(None) => info!("no stored theme, using defaults"),
                Err(e) => {
                    warn!(error = %e, "using default theme");
                    inner.fallback = Some(e);
                }
            }
            inner.theme.clone()
        };

        project(&theme, &self.vars);
        theme
    }

    /// Replace one property and project the result.
    pub fn update_property(
        &self,
        section: Section,
        property: &str,
        value: &str,
    ) -> Result<(), ThemeError> {
        let theme = {
            let mut inner = self.inner.lock();
            let next = inner.theme.with_property(section, property, value)?;
            inner.theme = next.clone();
            inner.generation += 1;
            next
        };
        project(&theme, &self.vars);
        Ok(())
    }

    /// Send the current theme to the server. Local state is kept either way.
    pub async fn save(&self) -> Result<(), ThemeError> {
        let snapshot = self.theme();
        self.gateway
            .save_theme(snapshot)
            .await
            .map_err(ThemeError::SaveFailure)?;
        info!("theme saved");
        Ok(())
    }

    /// Discard local edits in favor of the default table, if `confirm` agrees.
    pub fn reset(&self, confirm: impl FnOnce(&str) -> bool) -> bool {
        if !confirm(RESET_PROMPT) {
            return false;
        }
        self.replace(defaults().clone());
        info!("theme reset to defaults");
        true
    }

    /// The server's export, byte for byte. Unsaved local edits are not in it.
    pub async fn export(&self) -> Result<Vec<u8>, ThemeError> {
        self.gateway
            .export_document()
            .await
            .map_err(ThemeError::ExportFailure)
    }

    /// Preview an exported document locally, then hand the whole of it to the server.
    ///
    /// The document is decoded and its theme merged before anything changes.
    /// A bad file leaves the store and the server untouched.
    pub async fn import(&self, bytes: &[u8]) -> Result<ImportOutcome, ThemeError> {
        let document = codec::deserialize(bytes)?;
        let theme = document
            .theme()
            .map(Theme::from_partial)
            .transpose()
            .map_err(|e| match e {
                ThemeError::InvalidTheme { reason } => ThemeError::MalformedDocument { reason },
                other => other,
            })?;

        if self.strict_import
            && let Some(theme) = &theme
        {
            let unknown = theme.unknown_keys();
            if !unknown.is_empty() {
                return Err(ThemeError::UnknownKeys(unknown));
            }
        }

        let theme_applied = theme.is_some();
        if let Some(theme) = theme {
            self.replace(theme);
        }

        self.gateway
            .import_document(document)
            .await
            .map_err(ThemeError::ImportFailure)?;
        info!(theme_applied, "document imported, reload required");

        Ok(ImportOutcome {
            theme_applied,
            reload_required: true,
        })
    }

    fn replace(&self, theme: Theme) {
        {
            let mut inner = self.inner.lock();
            inner.theme = theme.clone();
            inner.generation += 1;
        }
        project(&theme, &self.vars);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::test::MemoryGateway;
    use serde_json::json;
    use std::sync::Arc;
    use tokio::sync::Notify;

    fn store(gateway: MemoryGateway) -> ThemeStore<MemoryGateway> {
        ThemeStore::new(gateway, StyleVars::new())
    }

    #[tokio::test]
    async fn starts_loading_with_defaults_projected() {
        let store = store(MemoryGateway::new());
        assert_eq!(store.state(), StoreState::Loading);
        assert_eq!(&store.theme(), defaults());
        assert_eq!(store.vars().get("color-accent").as_deref(), Some("#f59e0b"));
        assert_eq!(store.vars().refresh_count(), 1);
        assert!(store.fetch_failure().is_none());
    }

    #[tokio::test]
    async fn load_merges_fetched_theme() {
        let store = store(MemoryGateway::with_settings(
            json!({"theme": {"colors": {"accent": "#ff0000"}}}),
        ));
        let theme = store.load().await;
        assert_eq!(store.state(), StoreState::Ready);
        assert_eq!(theme.colors.accent, "#ff0000");
        assert_eq!(theme.colors.primary, "#3d2518");
        assert_eq!(store.vars().get("color-accent").as_deref(), Some("#ff0000"));
        assert_eq!(store.vars().refresh_count(), 2);
        assert!(store.fetch_failure().is_none());
    }

    #[tokio::test]
    async fn load_without_theme_uses_defaults() {
        let store = store(MemoryGateway::with_settings(json!({"storeName": "Acme"})));
        assert_eq!(&store.load().await, defaults());
        assert_eq!(store.state(), StoreState::Ready);
    }

    #[tokio::test]
    async fn failed_fetch_falls_back_to_defaults() {
        let store = store(
            MemoryGateway::with_settings(json!({"theme": {"colors": {"accent": "#ff0000"}}}))
                .failing_fetch(),
        );
        assert_eq!(&store.load().await, defaults());
        assert_eq!(store.state(), StoreState::Ready);
        assert_eq!(store.vars().get("color-accent").as_deref(), Some("#f59e0b"));
        assert!(matches!(
            store.fetch_failure(),
            Some(GatewayError::Status { status: 503, .. })
        ));
    }

    #[tokio::test]
    async fn structurally_invalid_theme_falls_back_to_defaults() {
        let store = store(MemoryGateway::with_settings(
            json!({"theme": {"colors": ["#ffffff"]}}),
        ));
        assert_eq!(&store.load().await, defaults());
        assert_eq!(store.state(), StoreState::Ready);
        assert!(matches!(
            store.fetch_failure(),
            Some(GatewayError::Decode { .. })
        ));
    }

    #[tokio::test]
    async fn null_leaf_keeps_the_rest_of_the_stored_theme() {
        let store = store(MemoryGateway::with_settings(
            json!({"theme": {"colors": {"accent": "#ff0000", "primary": null}}}),
        ));
        let theme = store.load().await;
        assert_eq!(theme.colors.accent, "#ff0000");
        assert_eq!(theme.colors.primary, "#3d2518");
        assert!(store.fetch_failure().is_none());
    }

    #[tokio::test]
    async fn successful_reload_clears_fetch_failure() {
        let store = store(MemoryGateway::new().failing_fetch());
        store.load().await;
        assert!(store.fetch_failure().is_some());

        store.gateway().recover_fetch();
        store.load().await;
        assert!(store.fetch_failure().is_none());
    }

    #[tokio::test]
    async fn update_changes_one_leaf_and_projects() {
        let store = store(MemoryGateway::new());
        store.load().await;
        let before = store.theme();

        store
            .update_property(Section::Colors, "accent", "#000000")
            .unwrap();

        let after = store.theme();
        let expected = before
            .with_property(Section::Colors, "accent", "#000000")
            .unwrap();
        assert_eq!(after, expected);
        assert_eq!(store.vars().get("color-accent").as_deref(), Some("#000000"));
        assert_eq!(store.vars().refresh_count(), 3);
    }

    #[tokio::test]
    async fn update_unknown_property_changes_nothing() {
        let store = store(MemoryGateway::new());
        store.load().await;
        let err = store
            .update_property(Section::Header, "shadow", "none")
            .unwrap_err();
        assert!(matches!(err, ThemeError::UnknownProperty { .. }));
        assert_eq!(&store.theme(), defaults());
        assert_eq!(store.vars().refresh_count(), 2);
    }

    #[tokio::test]
    async fn save_sends_current_theme() {
        let store = store(MemoryGateway::new());
        store.load().await;
        store
            .update_property(Section::Footer, "text", "#111111")
            .unwrap();
        store.save().await.unwrap();
        let saved = store.gateway().saved();
        assert_eq!(saved.len(), 1);
        assert_eq!(saved[0].footer.text, "#111111");
    }

    #[tokio::test]
    async fn failed_save_keeps_local_state() {
        let store = store(MemoryGateway::new().failing_save());
        store.load().await;
        store
            .update_property(Section::Buttons, "primaryBg", "#123456")
            .unwrap();
        let before = store.theme();

        let err = store.save().await.unwrap_err();
        assert!(matches!(err, ThemeError::SaveFailure(_)));
        assert_eq!(store.theme(), before);
    }

    #[tokio::test]
    async fn save_uses_snapshot_taken_at_call_time() {
        let gate = Arc::new(Notify::new());
        let store = store(MemoryGateway::new().gated_save(gate.clone()));
        store.load().await;
        store
            .update_property(Section::Colors, "primary", "#abcdef")
            .unwrap();

        let (saved, reset) = tokio::join!(store.save(), async {
            let reset = store.reset(|_| true);
            gate.notify_one();
            reset
        });
        saved.unwrap();
        assert!(reset);
        assert_eq!(store.gateway().saved()[0].colors.primary, "#abcdef");
        assert_eq!(&store.theme(), defaults());
    }

    #[tokio::test]
    async fn reset_restores_defaults() {
        let store = store(MemoryGateway::with_settings(
            json!({"theme": {"cards": {"border": "#000000"}}}),
        ));
        store.load().await;
        store
            .update_property(Section::Typography, "h1Size", "4rem")
            .unwrap();

        let mut prompt_seen = String::new();
        assert!(store.reset(|prompt| {
            prompt_seen = prompt.to_string();
            true
        }));
        assert_eq!(prompt_seen, RESET_PROMPT);
        assert_eq!(&store.theme(), defaults());
        assert_eq!(store.vars().get("color-accent").as_deref(), Some("#f59e0b"));
    }

    #[tokio::test]
    async fn declined_reset_changes_nothing() {
        let store = store(MemoryGateway::new());
        store.load().await;
        store
            .update_property(Section::Colors, "text", "#222222")
            .unwrap();
        let before = store.theme();
        let refresh = store.vars().refresh_count();

        assert!(!store.reset(|_| false));
        assert_eq!(store.theme(), before);
        assert_eq!(store.vars().refresh_count(), refresh);
    }

    #[tokio::test]
    async fn export_returns_server_bytes_not_local_edits() {
        let store = store(MemoryGateway::new().with_export(br#"{"siteSettings":{}}"#.to_vec()));
        store.load().await;
        store
            .update_property(Section::Colors, "accent", "#000000")
            .unwrap();
        assert_eq!(store.export().await.unwrap(), br#"{"siteSettings":{}}"#.to_vec());
    }

    #[tokio::test]
    async fn failed_export_is_reported() {
        let store = store(MemoryGateway::new().failing_export());
        assert!(matches!(
            store.export().await,
            Err(ThemeError::ExportFailure(_))
        ));
    }

    #[tokio::test]
    async fn import_applies_theme_and_forwards_document() {
        let store = store(MemoryGateway::new());
        store.load().await;
        let bytes =
            br##"{"siteSettings":{"theme":{"buttons":{"primaryBg":"#00ff00"}}},"products":[{"id":1}]}"##;

        let outcome = store.import(bytes).await.unwrap();
        assert_eq!(
            outcome,
            ImportOutcome {
                theme_applied: true,
                reload_required: true
            }
        );

        let theme = store.theme();
        assert_eq!(theme.buttons.primary_bg, "#00ff00");
        let mut expected = defaults().buttons.clone();
        expected.primary_bg = "#00ff00".into();
        assert_eq!(theme.buttons, expected);
        assert_eq!(store.vars().get("btn-primary-bg").as_deref(), Some("#00ff00"));

        let imported = store.gateway().imported();
        assert_eq!(imported.len(), 1);
        assert_eq!(imported[0].as_map()["products"], json!([{"id": 1}]));
    }

    #[tokio::test]
    async fn import_without_theme_only_forwards() {
        let store = store(MemoryGateway::new());
        store.load().await;
        let outcome = store.import(br#"{"products":[]}"#).await.unwrap();
        assert!(!outcome.theme_applied);
        assert!(outcome.reload_required);
        assert_eq!(&store.theme(), defaults());
        assert_eq!(store.gateway().imported().len(), 1);
    }

    #[tokio::test]
    async fn malformed_import_changes_nothing() {
        let store = store(MemoryGateway::new());
        store.load().await;
        let refresh = store.vars().refresh_count();

        let err = store.import(b"{ not json").await.unwrap_err();
        assert!(matches!(err, ThemeError::MalformedDocument { .. }));
        assert_eq!(&store.theme(), defaults());
        assert_eq!(store.vars().refresh_count(), refresh);
        assert!(store.gateway().imported().is_empty());
    }

    #[tokio::test]
    async fn structurally_invalid_import_theme_is_malformed() {
        let store = store(MemoryGateway::new());
        store.load().await;
        let err = store
            .import(br##"{"siteSettings":{"theme":{"colors":["#000000"]}}}"##)
            .await
            .unwrap_err();
        assert!(matches!(err, ThemeError::MalformedDocument { .. }));
        assert_eq!(&store.theme(), defaults());
        assert!(store.gateway().imported().is_empty());
    }

    #[tokio::test]
    async fn strict_import_rejects_unknown_keys() {
        let store = store(MemoryGateway::new()).strict_import(true);
        store.load().await;
        let err = store
            .import(br##"{"siteSettings":{"theme":{"colors":{"neon":"#39ff14"}}}}"##)
            .await
            .unwrap_err();
        match err {
            ThemeError::UnknownKeys(keys) => assert_eq!(keys, vec!["colors.neon".to_string()]),
            other => panic!("Expected UnknownKeys, got {other:?}"),
        }
        assert_eq!(&store.theme(), defaults());
        assert!(store.gateway().imported().is_empty());
    }

    #[tokio::test]
    async fn lenient_import_keeps_unknown_keys() {
        let store = store(MemoryGateway::new());
        store.load().await;
        store
            .import(br##"{"siteSettings":{"theme":{"colors":{"neon":"#39ff14"}}}}"##)
            .await
            .unwrap();
        assert_eq!(store.theme().colors.extra["neon"], "#39ff14");
        assert_eq!(store.vars().get("color-neon").as_deref(), Some("#39ff14"));
    }

    #[tokio::test]
    async fn failed_import_forward_is_reported() {
        let store = store(MemoryGateway::new().failing_import());
        store.load().await;
        let err = store
            .import(br##"{"siteSettings":{"theme":{"cards":{"border":"#000"}}}}"##)
            .await
            .unwrap_err();
        assert!(matches!(err, ThemeError::ImportFailure(_)));
        assert!(err.is_network());
    }

    #[tokio::test]
    async fn superseded_fetch_does_not_clobber_local_edit() {
        let gate = Arc::new(Notify::new());
        let store = store(
            MemoryGateway::with_settings(json!({"theme": {"colors": {"accent": "#ff0000"}}}))
                .gated_fetch(gate.clone()),
        );

        let (loaded, ()) = tokio::join!(store.load(), async {
            store
                .update_property(Section::Colors, "accent", "#000000")
                .unwrap();
            gate.notify_one();
        });

        assert_eq!(loaded.colors.accent, "#000000");
        assert_eq!(store.theme().colors.accent, "#000000");
        assert_eq!(store.state(), StoreState::Ready);
    }
}
