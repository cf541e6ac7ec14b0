//! Data models
//!
//! HR records owned by the IAMC backend. Field names are the canonical
//! lowercase-first keys produced by [`crate::normalize`]; all IDs are `i64`.

pub mod avaliacao;
pub mod beneficio;
pub mod cargo;
pub mod dashboard;
pub mod departamento;
pub mod folha_salarial;
pub mod funcionario;
pub mod licenca;
pub mod presenca;
pub mod settings;
pub mod user;

// Re-exports
pub use avaliacao::*;
pub use beneficio::*;
pub use cargo::*;
pub use dashboard::*;
pub use departamento::*;
pub use folha_salarial::*;
pub use funcionario::*;
pub use licenca::*;
pub use presenca::*;
pub use settings::*;
pub use user::*;
