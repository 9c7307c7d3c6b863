//! 管理后台仪表盘端点

use actix_web::{HttpResponse, web};

use crate::api::middleware::AuthenticatedAdmin;
use crate::errors::NepstayError;
use crate::services::AnalyticsService;

use super::health::AppStartTime;
use super::helpers::success_response;
use super::types::{ApiResponse, SystemInfoData};

/// `GET /api/admin/metrics`
pub async fn dashboard_metrics(
    _admin: AuthenticatedAdmin,
    service: web::Data<AnalyticsService>,
) -> Result<HttpResponse, NepstayError> {
    let metrics = service.dashboard_metrics().await?;
    Ok(success_response(ApiResponse::data(metrics)))
}

/// `GET /api/admin/system-info`
pub async fn system_info(
    _admin: AuthenticatedAdmin,
    service: web::Data<AnalyticsService>,
    app_start_time: web::Data<AppStartTime>,
) -> Result<HttpResponse, NepstayError> {
    let system_info = service.system_info(app_start_time.start_datetime).await?;
    Ok(success_response(ApiResponse::data(SystemInfoData {
        system_info,
    })))
}
