use actix_web::{Responder, web};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{error, trace};

use crate::storage::SeaOrmStorage;
use crate::utils::TimeParser;

use super::helpers::json_response;
use super::types::HealthResponse;

const PING_TIMEOUT: Duration = Duration::from_secs(5);

// 应用启动时间结构体
#[derive(Clone, Debug)]
pub struct AppStartTime {
    pub start_datetime: chrono::DateTime<chrono::Utc>,
}

/// Health Service
///
/// 直接调用 storage 的 ping，不经过业务服务
pub struct HealthService;

impl HealthService {
    pub async fn health_check(
        storage: web::Data<Arc<SeaOrmStorage>>,
        app_start_time: web::Data<AppStartTime>,
    ) -> impl Responder {
        let start_time = Instant::now();
        trace!("Received health check request");

        let connected = match tokio::time::timeout(PING_TIMEOUT, storage.ping()).await {
            Ok(connected) => connected,
            Err(_) => {
                error!("Database health check timeout");
                false
            }
        };

        let now = chrono::Utc::now();
        let config = crate::config::get_config();

        let body = HealthResponse {
            success: true,
            message: "Nepstay API is running".to_string(),
            timestamp: now,
            environment: config.server.environment.clone(),
            database: if connected { "connected" } else { "disconnected" }.to_string(),
        };

        trace!(
            "Health check completed in {:?}, database: {}, uptime: {}",
            start_time.elapsed(),
            body.database,
            TimeParser::format_duration_human(app_start_time.start_datetime, now)
        );

        json_response(actix_web::http::StatusCode::OK, &body)
    }
}

/// Health 路由配置
pub fn health_routes() -> actix_web::Scope {
    web::scope("/health")
        .route("", web::get().to(HealthService::health_check))
        .route("", web::head().to(HealthService::health_check))
}
