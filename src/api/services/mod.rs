//! HTTP 端点
//!
//! 处理函数返回 `Result<HttpResponse, NepstayError>`，错误经
//! [`ResponseError`](actix_web::ResponseError) 统一转换为错误信封。

mod admin;
mod auth;
pub mod error_code;
pub mod health;
mod helpers;
mod hostels;
pub mod routes;
mod track;
pub mod types;

pub use error_code::ErrorCode;
pub use health::{AppStartTime, HealthService, health_routes};
pub use helpers::{
    CookieBuilder, default_not_found, error_from_nepstay, error_response, json_error_handler,
    json_response, path_error_handler, query_error_handler, success_response,
};
pub use routes::configure_api;
pub use types::*;
