//! Server mode
//!
//! This module contains the HTTP server startup logic.
//! It configures and starts the HTTP server with all necessary routes.

use actix_cors::Cors;
use actix_web::{
    App, HttpServer,
    http::{Method, header},
    middleware::{Compress, DefaultHeaders},
    web,
};
use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::warn;

use crate::api::middleware::{RateLimiters, RequestIdMiddleware, TimingMiddleware};
use crate::api::services::{
    AppStartTime, configure_api, default_not_found, health_routes, json_error_handler,
    path_error_handler, query_error_handler,
};
use crate::config::CorsConfig;
use crate::runtime::lifetime;
use crate::runtime::lifetime::startup::StartupContext;
use crate::services::{AnalyticsService, AuthService, HostelService};
use crate::storage::SeaOrmStorage;

/// 每个 worker 共享的应用状态
#[derive(Clone)]
pub struct AppState {
    pub storage: Arc<SeaOrmStorage>,
    pub hostel_service: Arc<HostelService>,
    pub auth_service: Arc<AuthService>,
    pub analytics_service: Arc<AnalyticsService>,
    pub rate_limiters: RateLimiters,
    pub app_start_time: AppStartTime,
    pub body_limit_bytes: usize,
}

impl AppState {
    pub fn from_startup(startup: StartupContext, app_start_time: AppStartTime) -> Self {
        let config = crate::config::get_config();
        Self {
            storage: startup.storage,
            hostel_service: startup.hostel_service,
            auth_service: startup.auth_service,
            analytics_service: startup.analytics_service,
            rate_limiters: startup.rate_limiters,
            app_start_time,
            body_limit_bytes: config.api.body_limit_bytes,
        }
    }
}

/// 注册 app_data、提取器配置和全部路由
pub fn configure_app(cfg: &mut web::ServiceConfig, state: &AppState) {
    cfg.app_data(web::Data::new(state.storage.clone()))
        .app_data(web::Data::from(state.hostel_service.clone()))
        .app_data(web::Data::from(state.auth_service.clone()))
        .app_data(web::Data::from(state.analytics_service.clone()))
        .app_data(web::Data::new(state.app_start_time.clone()))
        .app_data(
            web::JsonConfig::default()
                .limit(state.body_limit_bytes)
                .error_handler(json_error_handler),
        )
        .app_data(web::QueryConfig::default().error_handler(query_error_handler))
        .app_data(web::PathConfig::default().error_handler(path_error_handler))
        .service(health_routes())
        .configure(|cfg| configure_api(cfg, &state.rate_limiters))
        .default_service(web::to(default_not_found));
}

/// Validate CORS configuration at startup (runs once)
fn validate_cors_config(cors_config: &CorsConfig) {
    if cors_config.allowed_origins.is_empty() {
        warn!(
            "cors.allowed_origins is empty. \
            No cross-origin requests will be allowed."
        );
    }

    let is_any_origin = cors_config.allowed_origins.iter().any(|o| o == "*");
    if is_any_origin && cors_config.allow_credentials {
        tracing::error!(
            "SECURITY WARNING: allow_any_origin + allow_credentials is a dangerous combination! \
            Disabling credentials for safety."
        );
    }
}

/// Build CORS middleware from configuration
fn build_cors_middleware(cors_config: &CorsConfig) -> Cors {
    let is_any_origin = cors_config.allowed_origins.iter().any(|o| o == "*");

    let mut cors = Cors::default()
        .allowed_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allowed_headers([header::CONTENT_TYPE, header::AUTHORIZATION, header::ACCEPT])
        .allowed_header("x-request-id")
        .expose_headers(["x-request-id"])
        .max_age(cors_config.max_age as usize);

    if is_any_origin {
        cors = cors.allow_any_origin();
    } else {
        for origin in &cors_config.allowed_origins {
            cors = cors.allowed_origin(origin);
        }
    }

    // any_origin + credentials 会回显 Origin，禁止组合
    if cors_config.allow_credentials && !is_any_origin {
        cors = cors.supports_credentials();
    }

    cors
}

/// Run the HTTP server
///
/// **Note**: Logging system must be initialized before calling this function
pub async fn run_server() -> Result<()> {
    // Record application start time
    let app_start_time = AppStartTime {
        start_datetime: chrono::Utc::now(),
    };

    let startup = lifetime::startup::prepare_server_startup()
        .await
        .inspect_err(|e| tracing::error!("Server startup failed: {:#}", e))?;

    let config = crate::config::get_config();
    let state = AppState::from_startup(startup, app_start_time);
    let storage_for_shutdown = state.storage.clone();

    let cpu_count = config.server.cpu_count.clamp(1, 32);
    warn!("Using {} CPU cores for the server", cpu_count);

    let cors_config = config.cors.clone();
    validate_cors_config(&cors_config);

    if config.api.trusted_proxies.is_empty() {
        warn!(
            "Rate limiting: Auto-detect mode enabled. \
             Connections from private IPs will use X-Forwarded-For. \
             To disable, configure api.trusted_proxies explicitly."
        );
    } else {
        warn!(
            "Rate limiting: Explicit trusted proxies configured: {:?}",
            config.api.trusted_proxies
        );
    }

    let bind_address = format!("{}:{}", config.server.host, config.server.port);

    let server = HttpServer::new(move || {
        let cors = build_cors_middleware(&cors_config);

        App::new()
            .wrap(TimingMiddleware) // 最外层，记录请求延迟
            .wrap(RequestIdMiddleware)
            .wrap(cors)
            .wrap(Compress::default())
            .wrap(
                DefaultHeaders::new()
                    .add(("X-Content-Type-Options", "nosniff"))
                    .add(("X-Frame-Options", "DENY"))
                    .add(("Cache-Control", "no-cache, no-store, must-revalidate")),
            )
            .configure(|cfg| configure_app(cfg, &state))
    })
    .keep_alive(std::time::Duration::from_secs(30))
    .client_request_timeout(std::time::Duration::from_millis(5000))
    .client_disconnect_timeout(std::time::Duration::from_millis(1000))
    .workers(cpu_count)
    .bind(&bind_address)
    .with_context(|| format!("Failed to bind {}", bind_address))?;

    warn!("Starting server at http://{}", bind_address);
    let server = server.run();

    // Wait for server or shutdown signal
    tokio::select! {
        res = server => {
            res?;
        }
        _ = lifetime::shutdown::listen_for_shutdown(storage_for_shutdown) => {
            warn!("Graceful shutdown: all tasks completed");
        }
    }

    Ok(())
}
