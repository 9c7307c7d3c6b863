//! Mode routing
//!
//! - Server mode (HTTP server, default)
//! - CLI mode (one-shot admin commands)

pub mod cli;
pub mod server;

pub use cli::run_cli;
pub use server::{AppState, configure_app, run_server};
