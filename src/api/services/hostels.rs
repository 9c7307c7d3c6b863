//! 酒店目录端点

use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse, web};
use tracing::{info, trace};

use crate::api::middleware::AuthenticatedAdmin;
use crate::api::middleware::auth::resolve_admin;
use crate::errors::NepstayError;
use crate::services::{HostelListQuery, HostelPayload, HostelService, ShowcaseQuery};

use super::helpers::{json_response, success_response};
use super::types::{ApiResponse, FeaturedData, HostelData, HostelListData};

type HandlerResult = Result<HttpResponse, NepstayError>;

/// `GET /api/hostels`
pub async fn list_hostels(
    query: web::Query<HostelListQuery>,
    service: web::Data<HostelService>,
) -> HandlerResult {
    trace!("Hostel API: list with {:?}", query);
    let page = service.list(query.into_inner()).await?;
    let count = page.hostels.len();

    Ok(success_response(
        ApiResponse::data(HostelListData {
            hostels: page.hostels,
        })
        .with_page(count, page.pagination),
    ))
}

/// `GET /api/hostels/featured`
pub async fn featured_hostels(
    query: web::Query<ShowcaseQuery>,
    service: web::Data<HostelService>,
) -> HandlerResult {
    let limit = query.limit()?;
    let hostels = service.featured(limit).await?;
    Ok(showcase_response(hostels))
}

/// `GET /api/hostels/popular`
pub async fn popular_hostels(
    query: web::Query<ShowcaseQuery>,
    service: web::Data<HostelService>,
) -> HandlerResult {
    let limit = query.limit()?;
    let hostels = service.popular(limit).await?;
    Ok(showcase_response(hostels))
}

fn showcase_response(hostels: Vec<crate::storage::Hostel>) -> HttpResponse {
    let count = hostels.len();
    let mut body = ApiResponse::data(HostelListData { hostels });
    body.count = Some(count);
    success_response(body)
}

/// `GET /api/hostels/{id-or-slug}`
///
/// 持有效管理员会话时可以看到下架酒店
pub async fn get_hostel(
    req: HttpRequest,
    path: web::Path<String>,
    service: web::Data<HostelService>,
) -> HandlerResult {
    let id_or_slug = path.into_inner();
    let is_admin = resolve_admin(&req).await.is_ok();
    let hostel = service.get(&id_or_slug, is_admin).await?;
    Ok(success_response(ApiResponse::data(HostelData { hostel })))
}

/// `GET /api/hostels/admin/stats`
pub async fn hostel_stats(
    _admin: AuthenticatedAdmin,
    service: web::Data<HostelService>,
) -> HandlerResult {
    let stats = service.stats().await?;
    Ok(success_response(ApiResponse::data(stats)))
}

/// `POST /api/hostels`
pub async fn create_hostel(
    admin: AuthenticatedAdmin,
    payload: web::Json<HostelPayload>,
    service: web::Data<HostelService>,
) -> HandlerResult {
    let hostel = service.create(payload.into_inner()).await?;
    info!("Hostel API: '{}' created by {}", hostel.slug, admin.0.email);

    Ok(json_response(
        StatusCode::CREATED,
        &ApiResponse::data(HostelData { hostel }).with_message("Hostel created successfully"),
    ))
}

/// `PUT /api/hostels/{id}`
pub async fn update_hostel(
    admin: AuthenticatedAdmin,
    path: web::Path<String>,
    payload: web::Json<HostelPayload>,
    service: web::Data<HostelService>,
) -> HandlerResult {
    let hostel = service.update(&path, payload.into_inner()).await?;
    info!("Hostel API: '{}' updated by {}", hostel.slug, admin.0.email);

    Ok(success_response(
        ApiResponse::data(HostelData { hostel }).with_message("Hostel updated successfully"),
    ))
}

/// `PUT /api/hostels/{id}/featured`
pub async fn toggle_featured(
    _admin: AuthenticatedAdmin,
    path: web::Path<String>,
    service: web::Data<HostelService>,
) -> HandlerResult {
    let toggled = service.toggle_featured(&path).await?;
    let message = if toggled.featured {
        "Hostel featured successfully"
    } else {
        "Hostel unfeatured successfully"
    };

    Ok(success_response(
        ApiResponse::data(FeaturedData { hostel: toggled }).with_message(message),
    ))
}

/// `DELETE /api/hostels/{id}`
pub async fn delete_hostel(
    admin: AuthenticatedAdmin,
    path: web::Path<String>,
    service: web::Data<HostelService>,
) -> HandlerResult {
    service.delete(&path).await?;
    info!("Hostel API: {} deleted by {}", path.as_str(), admin.0.email);
    Ok(success_response(ApiResponse::message(
        "Hostel deleted successfully",
    )))
}
