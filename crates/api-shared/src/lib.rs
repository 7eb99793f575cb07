//! # API Shared
//!
//! Shared wire types and services for the SymptomX APIs.
//!
//! Contains:
//! - Request/response types (`types` module) with OpenAPI schemas
//! - Shared services like `HealthService`
//!
//! Used by `symptomx-core`, `api-rest` and the CLI so every surface speaks the same shapes.

pub mod health;
pub mod types;

pub use health::HealthService;
pub use types::*;
