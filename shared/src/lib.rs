//! Shared types for the IAMC HR client
//!
//! Entity schemas, casing normalization, response envelopes and validation
//! helpers. Nothing in here performs I/O.

pub mod entity;
pub mod error;
pub mod intent;
pub mod models;
pub mod normalize;
pub mod response;
pub mod util;
pub mod validation;

// Re-exports
pub use serde::{Deserialize, Serialize};

pub use entity::{Entity, EntityKind};
pub use error::{ModelError, ModelResult};
pub use intent::{CrudAction, Payload};
pub use normalize::{normalize, normalize_into};
pub use response::{ApiResponse, IdsRequest, Page, PageResponse};
