//! 基于 IP 的限流
//!
//! 全局限流覆盖 `/api`，登录端点另有更严格的限流。窗口配置折算为令牌桶：
//! 突发容量 = 窗口内最大请求数，补充间隔 = 窗口 / 最大请求数。

use actix_governor::{GovernorConfig, GovernorConfigBuilder, KeyExtractor, SimpleKeyExtractionError};
use actix_web::dev::ServiceRequest;
use actix_web::http::header::ContentType;
use actix_web::{HttpResponse, HttpResponseBuilder};
use governor::NotUntil;
use governor::clock::{Clock, DefaultClock, QuantaInstant};
use governor::middleware::NoOpMiddleware;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use crate::api::services::{ErrorCode, ErrorResponse};
use crate::config::RateLimitConfig;
use crate::utils::ip::TrustedProxies;

pub const GLOBAL_LIMIT_MESSAGE: &str = "Too many requests from this IP, please try again later.";
pub const LOGIN_LIMIT_MESSAGE: &str =
    "Too many login attempts from this IP, please try again after 15 minutes.";

/// 基于客户端 IP 的限流 key 提取器
///
/// 默认使用连接 IP（peer_addr）；连接来自可信代理时使用 X-Forwarded-For
#[derive(Clone)]
pub struct ClientIpKeyExtractor {
    trusted_proxies: Arc<TrustedProxies>,
    code: ErrorCode,
    message: &'static str,
}

impl ClientIpKeyExtractor {
    pub fn new(trusted_proxies: Arc<TrustedProxies>, code: ErrorCode, message: &'static str) -> Self {
        Self {
            trusted_proxies,
            code,
            message,
        }
    }
}

impl KeyExtractor for ClientIpKeyExtractor {
    type Key = String;
    type KeyExtractionError = SimpleKeyExtractionError<&'static str>;

    fn extract(&self, req: &ServiceRequest) -> Result<Self::Key, Self::KeyExtractionError> {
        let conn_info = req.connection_info();
        let peer_ip = conn_info
            .peer_addr()
            .ok_or_else(|| SimpleKeyExtractionError::new("Unable to extract peer IP"))?;

        Ok(self.trusted_proxies.client_ip(peer_ip, req.headers()))
    }

    fn exceed_rate_limit_response(
        &self,
        negative: &NotUntil<QuantaInstant>,
        mut response: HttpResponseBuilder,
    ) -> HttpResponse {
        let wait = negative.wait_time_from(DefaultClock::default().now());
        warn!(
            "Rate limit exceeded ({}), retry in {}s",
            self.code.as_str(),
            wait.as_secs()
        );
        response
            .insert_header(ContentType::json())
            .insert_header(("Retry-After", wait.as_secs().max(1).to_string()))
            .json(ErrorResponse::new(self.code, self.message, None))
    }
}

pub type RateLimiterConfig = GovernorConfig<ClientIpKeyExtractor, NoOpMiddleware>;

/// 全局与登录两个限流配置，启动时构建一次，各 worker 共享
#[derive(Clone)]
pub struct RateLimiters {
    pub enabled: bool,
    pub global: RateLimiterConfig,
    pub login: RateLimiterConfig,
}

impl RateLimiters {
    pub fn from_config(config: &RateLimitConfig, trusted_proxies: &[String]) -> anyhow::Result<Self> {
        let trusted_proxies = Arc::new(TrustedProxies::new(trusted_proxies));
        let global = build_limiter(
            config.window_secs,
            config.max_requests,
            ClientIpKeyExtractor::new(
                Arc::clone(&trusted_proxies),
                ErrorCode::RateLimitExceeded,
                GLOBAL_LIMIT_MESSAGE,
            ),
        )?;
        let login = build_limiter(
            config.login_window_secs,
            config.login_max_requests,
            ClientIpKeyExtractor::new(
                trusted_proxies,
                ErrorCode::LoginRateLimitExceeded,
                LOGIN_LIMIT_MESSAGE,
            ),
        )?;

        debug!(
            "Rate limiters created: global {}/{}s, login {}/{}s",
            config.max_requests,
            config.window_secs,
            config.login_max_requests,
            config.login_window_secs
        );

        Ok(Self {
            enabled: config.enabled,
            global,
            login,
        })
    }
}

/// 窗口内最多 `max_requests` 次 → 令牌桶参数
pub fn replenish_interval(window_secs: u64, max_requests: u32) -> Duration {
    let max = u64::from(max_requests.max(1));
    let window_ms = window_secs.max(1).saturating_mul(1000);
    Duration::from_millis((window_ms / max).max(1))
}

fn build_limiter(
    window_secs: u64,
    max_requests: u32,
    extractor: ClientIpKeyExtractor,
) -> anyhow::Result<RateLimiterConfig> {
    GovernorConfigBuilder::default()
        .period(replenish_interval(window_secs, max_requests))
        .burst_size(max_requests.max(1))
        .key_extractor(extractor)
        .finish()
        .ok_or_else(|| anyhow::anyhow!("Invalid rate limit config"))
}
