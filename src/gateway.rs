//! Persistence gateway: the remote authority that stores the theme.
//!
//! [`PersistenceGateway`] is the seam the store talks through. [`HttpGateway`]
//! implements it against the storefront API:
//!
//! ```text
//! GET  {base}/site-settings   -> { theme?: PartialTheme, ... }
//! PUT  {base}/site-settings      { theme: Theme }
//! GET  {base}/export-theme    -> opaque bytes
//! POST {base}/import-theme       <exported document>
//! ```
//!
//! Every request carries the bearer [`Credential`] when one is configured. The
//! gateway never issues or validates it.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::debug;

use crate::codec::ExportedDocument;
use crate::error::ThemeError;
use crate::settings::ConsoleSettings;
use crate::theme::Theme;

pub const SITE_SETTINGS: &str = "site-settings";
pub const EXPORT_THEME: &str = "export-theme";
pub const IMPORT_THEME: &str = "import-theme";

#[derive(Debug, Clone, Error)]
pub enum GatewayError {
    #[error("request to {endpoint} failed: {reason}")]
    Transport {
        endpoint: &'static str,
        reason: String,
    },

    #[error("{endpoint} answered with HTTP {status}")]
    Status { endpoint: &'static str, status: u16 },

    #[error("could not decode {endpoint} response: {reason}")]
    Decode {
        endpoint: &'static str,
        reason: String,
    },
}

/// Body of `GET /site-settings`. Only the theme is modeled; the rest is opaque.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SiteSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<Value>,
    #[serde(flatten)]
    pub other: Map<String, Value>,
}

#[async_trait]
pub trait PersistenceGateway: Send + Sync {
    async fn fetch_settings(&self) -> Result<SiteSettings, GatewayError>;

    async fn save_theme(&self, theme: Theme) -> Result<(), GatewayError>;

    async fn export_document(&self) -> Result<Vec<u8>, GatewayError>;

    async fn import_document(&self, document: ExportedDocument) -> Result<(), GatewayError>;
}

/// Opaque bearer credential supplied by session management.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn new(token: impl Into<String>) -> Self {
        Credential(token.into())
    }

    fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(***)")
    }
}

#[derive(Serialize)]
struct SaveBody<'a> {
    theme: &'a Theme,
}

/// [`PersistenceGateway`] over the storefront's HTTP API.
#[derive(Debug, Clone)]
pub struct HttpGateway {
    client: reqwest::Client,
    base_url: String,
    credential: Option<Credential>,
}

impl HttpGateway {
    pub fn new(
        base_url: &str,
        credential: Option<Credential>,
        timeout: Duration,
    ) -> Result<Self, ThemeError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            credential,
        })
    }

    pub fn from_settings(settings: &ConsoleSettings) -> Result<Self, ThemeError> {
        Self::new(
            &settings.backend_url,
            settings.credential(),
            Duration::from_secs(settings.timeout_secs),
        )
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}/{endpoint}", self.base_url)
    }

    async fn send(
        &self,
        endpoint: &'static str,
        request: reqwest::RequestBuilder,
    ) -> Result<reqwest::Response, GatewayError> {
        let request = match &self.credential {
            Some(credential) => request.bearer_auth(credential.expose()),
            None => request,
        };
        let response = request
            .send()
            .await
            .map_err(|e| GatewayError::Transport {
                endpoint,
                reason: e.to_string(),
            })?;
        let status = response.status();
        debug!(endpoint, status = status.as_u16(), "gateway response");
        if !status.is_success() {
            return Err(GatewayError::Status {
                endpoint,
                status: status.as_u16(),
            });
        }
        Ok(response)
    }
}

#[async_trait]
impl PersistenceGateway for HttpGateway {
    async fn fetch_settings(&self) -> Result<SiteSettings, GatewayError> {
        let response = self
            .send(SITE_SETTINGS, self.client.get(self.url(SITE_SETTINGS)))
            .await?;
        response
            .json::<SiteSettings>()
            .await
            .map_err(|e| GatewayError::Decode {
                endpoint: SITE_SETTINGS,
                reason: e.to_string(),
            })
    }

    async fn save_theme(&self, theme: Theme) -> Result<(), GatewayError> {
        let request = self
            .client
            .put(self.url(SITE_SETTINGS))
            .json(&SaveBody { theme: &theme });
        self.send(SITE_SETTINGS, request).await?;
        Ok(())
    }

    async fn export_document(&self) -> Result<Vec<u8>, GatewayError> {
        let response = self
            .send(EXPORT_THEME, self.client.get(self.url(EXPORT_THEME)))
            .await?;
        let bytes = response.bytes().await.map_err(|e| GatewayError::Decode {
            endpoint: EXPORT_THEME,
            reason: e.to_string(),
        })?;
        Ok(bytes.to_vec())
    }

    async fn import_document(&self, document: ExportedDocument) -> Result<(), GatewayError> {
        let request = self
            .client
            .post(self.url(IMPORT_THEME))
            .json(document.as_map());
        self.send(IMPORT_THEME, request).await?;
        Ok(())
    }
}
