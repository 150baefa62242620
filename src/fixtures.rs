#[cfg(test)]
pub mod test {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};

    use async_trait::async_trait;
    use parking_lot::Mutex;
    use serde_json::Value;
    use tokio::sync::Notify;

    use crate::codec::ExportedDocument;
    use crate::gateway::{
        EXPORT_THEME, GatewayError, IMPORT_THEME, PersistenceGateway, SITE_SETTINGS, SiteSettings,
    };
    use crate::theme::Theme;

    /// In-memory [`PersistenceGateway`] that records what it was sent.
    ///
    /// Each endpoint can be switched to fail with HTTP 503. Fetch and save can
    /// be held on a [`Notify`] gate so tests can interleave local edits with
    /// requests in flight.
    #[derive(Default)]
    pub struct MemoryGateway {
        settings: Mutex<SiteSettings>,
        export: Mutex<Vec<u8>>,
        saved: Mutex<Vec<Theme>>,
        imported: Mutex<Vec<ExportedDocument>>,
        fail_fetch: AtomicBool,
        fail_save: AtomicBool,
        fail_export: AtomicBool,
        fail_import: AtomicBool,
        fetch_gate: Option<Arc<Notify>>,
        save_gate: Option<Arc<Notify>>,
    }

    impl MemoryGateway {
        pub fn new() -> Self {
            Self::default()
        }

        /// Serve `settings` (a `GET /site-settings` body) from fetch.
        pub fn with_settings(settings: Value) -> Self {
            let settings = serde_json::from_value(settings).unwrap();
            Self {
                settings: Mutex::new(settings),
                ..Self::default()
            }
        }

        pub fn with_export(self, bytes: Vec<u8>) -> Self {
            *self.export.lock() = bytes;
            self
        }

        pub fn failing_fetch(self) -> Self {
            self.fail_fetch.store(true, Ordering::SeqCst);
            self
        }

        pub fn recover_fetch(&self) {
            self.fail_fetch.store(false, Ordering::SeqCst);
        }

        pub fn failing_save(self) -> Self {
            self.fail_save.store(true, Ordering::SeqCst);
            self
        }

        pub fn failing_export(self) -> Self {
            self.fail_export.store(true, Ordering::SeqCst);
            self
        }

        pub fn failing_import(self) -> Self {
            self.fail_import.store(true, Ordering::SeqCst);
            self
        }

        pub fn gated_fetch(mut self, gate: Arc<Notify>) -> Self {
            self.fetch_gate = Some(gate);
            self
        }

        pub fn gated_save(mut self, gate: Arc<Notify>) -> Self {
            self.save_gate = Some(gate);
            self
        }

        pub fn saved(&self) -> Vec<Theme> {
            self.saved.lock().clone()
        }

        pub fn imported(&self) -> Vec<ExportedDocument> {
            self.imported.lock().clone()
        }
    }

    fn unavailable(endpoint: &'static str, failing: &AtomicBool) -> Result<(), GatewayError> {
        if failing.load(Ordering::SeqCst) {
            return Err(GatewayError::Status {
                endpoint,
                status: 503,
            });
        }
        Ok(())
    }

    #[async_trait]
    impl PersistenceGateway for MemoryGateway {
        async fn fetch_settings(&self) -> Result<SiteSettings, GatewayError> {
            if let Some(gate) = &self.fetch_gate {
                gate.notified().await;
            }
            unavailable(SITE_SETTINGS, &self.fail_fetch)?;
            Ok(self.settings.lock().clone())
        }

        async fn save_theme(&self, theme: Theme) -> Result<(), GatewayError> {
            if let Some(gate) = &self.save_gate {
                gate.notified().await;
            }
            unavailable(SITE_SETTINGS, &self.fail_save)?;
            self.saved.lock().push(theme);
            Ok(())
        }

        async fn export_document(&self) -> Result<Vec<u8>, GatewayError> {
            unavailable(EXPORT_THEME, &self.fail_export)?;
            Ok(self.export.lock().clone())
        }

        async fn import_document(&self, document: ExportedDocument) -> Result<(), GatewayError> {
            unavailable(IMPORT_THEME, &self.fail_import)?;
            self.imported.lock().push(document);
            Ok(())
        }
    }

    #[tokio::test]
    async fn memory_gateway_serves_configured_settings() {
        let gw = MemoryGateway::with_settings(serde_json::json!({"theme": {"colors": {}}}));
        let settings = gw.fetch_settings().await.unwrap();
        assert_eq!(settings.theme, Some(serde_json::json!({"colors": {}})));
    }

    #[tokio::test]
    async fn memory_gateway_failures_are_503() {
        let gw = MemoryGateway::new().failing_export();
        assert!(matches!(
            gw.export_document().await,
            Err(GatewayError::Status { status: 503, .. })
        ));
    }
}
