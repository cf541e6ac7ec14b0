//! Client configuration

use shared::Entity;

use crate::collection::{CollectionController, PAGE_SIZE_OPTIONS, PageMode};
use crate::notify::Notifier;

/// Client configuration for connecting to the IAMC backend
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Server base URL (e.g., "http://localhost:5000")
    pub base_url: String,

    /// Bearer token, sent as-is. Obtaining and refreshing it is the caller's job.
    pub token: Option<String>,

    /// Request timeout in seconds
    pub timeout: u64,

    /// Default rows per page for new collection views
    pub page_size: usize,

    /// Fall back to the built-in demonstration dataset when a list view
    /// cannot load anything from the backend
    pub demo_fallback: bool,

    /// Capacity of the notification broadcast channel
    pub notification_capacity: usize,
}

impl ClientConfig {
    /// Create a new client configuration
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            token: None,
            timeout: 30,
            page_size: PAGE_SIZE_OPTIONS[0],
            demo_fallback: false,
            notification_capacity: 64,
        }
    }

    /// Build from the environment, after loading a `.env` file if one exists.
    ///
    /// | Variable | Default |
    /// |---|---|
    /// | `IAMC_API_URL` | `http://localhost:5000` |
    /// | `IAMC_TOKEN` | unset |
    /// | `IAMC_TIMEOUT_SECS` | `30` |
    /// | `IAMC_PAGE_SIZE` | `10` |
    /// | `IAMC_DEMO_FALLBACK` | `false` |
    pub fn from_env() -> Self {
        dotenv::dotenv().ok();

        let mut config = Self::new(
            std::env::var("IAMC_API_URL").unwrap_or_else(|_| "http://localhost:5000".into()),
        );
        config.token = std::env::var("IAMC_TOKEN").ok().filter(|t| !t.is_empty());
        config.timeout = std::env::var("IAMC_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(30);
        config.page_size = std::env::var("IAMC_PAGE_SIZE")
            .ok()
            .and_then(|v| v.parse().ok())
            .filter(|n: &usize| *n > 0)
            .unwrap_or(PAGE_SIZE_OPTIONS[0]);
        config.demo_fallback = std::env::var("IAMC_DEMO_FALLBACK")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(false);
        config
    }

    /// Set the bearer token
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout = seconds;
        self
    }

    /// Set the default page size. Zero is ignored.
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        if page_size > 0 {
            self.page_size = page_size;
        }
        self
    }

    /// Enable or disable the demonstration-data fallback
    pub fn with_demo_fallback(mut self, enabled: bool) -> Self {
        self.demo_fallback = enabled;
        self
    }

    pub fn with_notification_capacity(mut self, capacity: usize) -> Self {
        self.notification_capacity = capacity.max(1);
        self
    }

    /// New list controller using the configured page size and, when enabled,
    /// the demonstration fallback for kinds that have one
    pub fn collection<T: Entity>(&self, mode: PageMode, notifier: &Notifier) -> CollectionController<T> {
        let controller = CollectionController::new(mode)
            .with_page_size(self.page_size)
            .with_notifier(notifier.clone());
        match crate::demo::rows_for::<T>().filter(|_| self.demo_fallback) {
            Some(rows) => controller.with_fallback(rows),
            None => controller,
        }
    }

    /// Create the remote gateway from this configuration
    pub fn build_gateway(&self) -> crate::ClientResult<crate::RemoteGateway> {
        crate::RemoteGateway::new(self)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new("http://localhost:5000")
    }
}
