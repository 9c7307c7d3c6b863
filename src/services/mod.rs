//! Service layer for business logic
//!
//! Request validation and orchestration over the storage layer, shared by
//! the HTTP handlers and the CLI seed commands.

mod analytics_service;
mod auth_service;
mod hostel_service;

pub use analytics_service::*;
pub use auth_service::*;
pub use hostel_service::*;
