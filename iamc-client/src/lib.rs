//! IAMC HR console client
//!
//! Data layer behind the administrative console: typed gateway to the IAMC
//! backend, paginated list controllers with page-independent selection, and
//! the QR badge workflow.
//!
//! # Example
//!
//! ```ignore
//! use iamc_client::{ClientConfig, Notifier, PageMode, SharedCollection};
//! use shared::models::Funcionario;
//! use std::sync::Arc;
//!
//! let config = ClientConfig::from_env();
//! let gateway = Arc::new(config.build_gateway()?);
//! let notifier = Notifier::default();
//!
//! let view = SharedCollection::new(
//!     config.collection::<Funcionario>(PageMode::Server, &notifier),
//!     gateway.clone(),
//! );
//! view.update(|c| c.set_search_term("Silva")).await;
//! println!("{} matches", view.lock().await.total_count());
//! ```

pub mod blob;
pub mod collection;
pub mod config;
pub mod contact_card;
pub mod demo;
pub mod error;
pub mod gateway;
pub mod http;
pub mod logger;
pub mod notify;
pub mod qr;
pub mod query;

pub use blob::{BlobHandle, BlobStore};
pub use collection::{
    Applied, CollectionController, CollectionSource, FetchTicket, HeaderState, PAGE_SIZE_OPTIONS,
    PageMode, SharedCollection, ViewState,
};
pub use config::ClientConfig;
pub use error::{ClientError, ClientResult, RemoteError};
pub use gateway::RemoteGateway;
pub use http::{HttpClient, NetworkHttpClient};
pub use notify::{Level, Notification, Notifier};
pub use qr::{BadgeView, BulkOutcome, PartitionMut, Partitions, QrBackend, QrBadgeManager};
pub use query::{CollectionQuery, FilterValue, Filters};

// Re-export shared types for convenience
pub use shared::{self, ApiResponse, CrudAction, Entity, EntityKind, Page, PageResponse};
