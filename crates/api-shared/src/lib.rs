//! # API Shared
//!
//! Shared definitions for the CareBridge REST API.
//!
//! Contains:
//! - Request/response DTOs with their OpenAPI schemas (`dto` module)
//! - Shared services like `HealthService`
//!
//! Used by the `carebridge-run` server binary; kept separate so the DTO
//! shapes can be reused by other surfaces without pulling in axum.

pub mod dto;
pub mod health;

pub use dto::*;
pub use health::HealthService;
