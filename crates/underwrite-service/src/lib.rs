//! HTTP surface for the underwriting engine: an axum router serving
//! `POST /ai/deals/underwrite`, and a typed reqwest client for it.

pub mod client;
pub mod config;
pub mod credentials;
pub mod error;
pub mod routes;

pub use client::UnderwriteClient;
pub use config::{ClientConfig, ServiceConfig};
pub use credentials::{Anonymous, CredentialProvider, StaticToken};
pub use error::{ApiError, ServiceError, ServiceResult};
pub use routes::{router, AppState};
