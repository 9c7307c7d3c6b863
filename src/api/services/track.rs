//! 点击统计端点

use actix_web::{HttpResponse, web};
use tracing::trace;

use crate::api::middleware::AuthenticatedAdmin;
use crate::errors::NepstayError;
use crate::services::{AnalyticsService, ClickAnalyticsQuery, HostelService};

use super::helpers::success_response;
use super::types::{ApiResponse, ClickData, TrackClickRequest};

/// `POST /api/track/click`
pub async fn track_click(
    body: web::Json<TrackClickRequest>,
    service: web::Data<HostelService>,
) -> Result<HttpResponse, NepstayError> {
    let result = service.track_click(body.hostel_id.as_deref()).await?;
    trace!("Track API: hostel {} now at {} clicks", result.id, result.clicks);

    Ok(success_response(
        ApiResponse::data(ClickData { hostel: result }).with_message("Click tracked successfully"),
    ))
}

/// `GET /api/track/analytics`
pub async fn click_analytics(
    _admin: AuthenticatedAdmin,
    query: web::Query<ClickAnalyticsQuery>,
    service: web::Data<AnalyticsService>,
) -> Result<HttpResponse, NepstayError> {
    let analytics = service.click_analytics(query.into_inner()).await?;
    Ok(success_response(ApiResponse::data(analytics)))
}
