//! HTTP layer: handlers, middleware and the JSON envelope

pub mod constants;
pub mod jwt;
pub mod middleware;
pub mod services;
