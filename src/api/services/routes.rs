//! API 路由配置
//!
//! `/api` 整体挂全局限流；管理端路由逐条挂 [`AdminAuth`]。

use actix_governor::Governor;
use actix_web::middleware::Condition;
use actix_web::web;

use crate::api::middleware::{AdminAuth, RateLimiters};

use super::admin::{dashboard_metrics, system_info};
use super::auth::{login, logout, me, status};
use super::hostels::{
    create_hostel, delete_hostel, featured_hostels, get_hostel, hostel_stats, list_hostels,
    popular_hostels, toggle_featured, update_hostel,
};
use super::track::{click_analytics, track_click};

/// 酒店路由 `/hostels`
///
/// 固定路径必须在 `/{id}` 之前注册
pub fn hostel_routes() -> actix_web::Scope {
    web::scope("/hostels")
        .route("", web::get().to(list_hostels))
        .route("", web::post().to(create_hostel).wrap(AdminAuth))
        .route("/admin/stats", web::get().to(hostel_stats).wrap(AdminAuth))
        .route("/featured", web::get().to(featured_hostels))
        .route("/popular", web::get().to(popular_hostels))
        .route("/{id}/featured", web::put().to(toggle_featured).wrap(AdminAuth))
        .route("/{id}", web::get().to(get_hostel))
        .route("/{id}", web::put().to(update_hostel).wrap(AdminAuth))
        .route("/{id}", web::delete().to(delete_hostel).wrap(AdminAuth))
}

/// 认证路由 `/auth`
///
/// - POST /auth/login - 登录（带限流）
/// - GET /auth/status - 会话状态（公开）
/// - POST /auth/logout - 登出
/// - GET /auth/me - 当前管理员
pub fn auth_routes(limiters: &RateLimiters) -> actix_web::Scope {
    web::scope("/auth")
        .route(
            "/login",
            web::post().to(login).wrap(Condition::new(
                limiters.enabled,
                Governor::new(&limiters.login),
            )),
        )
        .route("/status", web::get().to(status))
        .route("/logout", web::post().to(logout).wrap(AdminAuth))
        .route("/me", web::get().to(me).wrap(AdminAuth))
}

/// 点击统计路由 `/track`
pub fn track_routes() -> actix_web::Scope {
    web::scope("/track")
        .route("/click", web::post().to(track_click))
        .route("/analytics", web::get().to(click_analytics).wrap(AdminAuth))
}

/// 仪表盘路由 `/admin`
pub fn admin_routes() -> actix_web::Scope {
    web::scope("/admin")
        .route("/metrics", web::get().to(dashboard_metrics).wrap(AdminAuth))
        .route("/system-info", web::get().to(system_info).wrap(AdminAuth))
}

/// 注册 `/api` 下的全部路由
pub fn configure_api(cfg: &mut web::ServiceConfig, limiters: &RateLimiters) {
    cfg.service(
        web::scope("/api")
            .wrap(Condition::new(
                limiters.enabled,
                Governor::new(&limiters.global),
            ))
            .service(hostel_routes())
            .service(auth_routes(limiters))
            .service(track_routes())
            .service(admin_routes()),
    );
}
