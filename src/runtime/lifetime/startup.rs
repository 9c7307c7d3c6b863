use crate::api::middleware::RateLimiters;
use crate::services::{AnalyticsService, AuthService, HostelService};
use crate::storage::{SeaOrmStorage, StorageFactory};
use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::{debug, info, warn};

pub struct StartupContext {
    pub storage: Arc<SeaOrmStorage>,
    pub hostel_service: Arc<HostelService>,
    pub auth_service: Arc<AuthService>,
    pub analytics_service: Arc<AnalyticsService>,
    pub rate_limiters: RateLimiters,
}

/// 准备服务器启动的上下文
/// 包括存储、服务和限流配置
pub async fn prepare_server_startup() -> Result<StartupContext> {
    let start_time = std::time::Instant::now();
    debug!("Starting pre-startup processing...");

    let config = crate::config::get_config();

    let storage = StorageFactory::create()
        .await
        .context("Failed to create storage backend")?;
    info!("Using storage backend: {}", storage.backend_name());

    let admin_count = storage
        .count_active_admins()
        .await
        .context("Failed to query admin accounts")?;
    if admin_count == 0 {
        warn!("No active admin account found. Run `nepstay seed-admin` to create one.");
    }

    if config.api.jwt_secret.is_empty() {
        warn!("api.jwt_secret is empty: sessions will not survive a restart");
    }

    // 预热 JwtService
    let _ = crate::api::jwt::get_jwt_service();

    let rate_limiters = RateLimiters::from_config(&config.rate_limit, &config.api.trusted_proxies)
        .context("Failed to build rate limiters")?;
    if !rate_limiters.enabled {
        warn!("Rate limiting is disabled in configuration");
    }

    let hostel_service = Arc::new(HostelService::new(storage.clone()));
    let auth_service = Arc::new(AuthService::new(storage.clone()));
    let analytics_service = Arc::new(AnalyticsService::new(storage.clone()));

    info!(
        "Pre-startup processing completed in {:?}",
        start_time.elapsed()
    );

    Ok(StartupContext {
        storage,
        hostel_service,
        auth_service,
        analytics_service,
        rate_limiters,
    })
}
