//! Nepstay - hostel listing marketplace API
//!
//! Public catalogue search, click tracking and an admin back office for
//! hostel listings.
//!
//! # Architecture
//! - `storage`: SeaORM backend (SQLite / MySQL / PostgreSQL)
//! - `services`: validation and business rules over storage
//! - `api`: HTTP handlers, middleware and the JSON envelope
//! - `config`: TOML + environment configuration
//! - `runtime`: server startup/shutdown and one-shot CLI commands
//! - `system`: logging

pub mod api;
pub mod cli;
pub mod config;
pub mod errors;
pub mod runtime;
pub mod services;
pub mod storage;
pub mod system;
pub mod utils;
