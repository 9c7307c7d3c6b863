//! 认证端点

use actix_web::{HttpRequest, HttpResponse, web};
use tracing::{error, info};

use crate::api::jwt::get_jwt_service;
use crate::api::middleware::AuthenticatedAdmin;
use crate::api::middleware::auth::resolve_admin;
use crate::errors::NepstayError;
use crate::services::{AuthService, LoginRequest};

use super::helpers::{CookieBuilder, json_response, success_response};
use super::types::{ApiResponse, AuthStatusResponse, UserData};

type HandlerResult = Result<HttpResponse, NepstayError>;

/// `POST /api/auth/login`
pub async fn login(
    body: web::Json<LoginRequest>,
    auth: web::Data<AuthService>,
) -> HandlerResult {
    let admin = auth.login(body.into_inner()).await?;

    let token = get_jwt_service()
        .generate_access_token(&admin.id)
        .map_err(|e| {
            error!("Auth API: failed to generate access token: {}", e);
            NepstayError::internal("Failed to generate token")
        })?;

    let cookie = CookieBuilder::from_config().build_session_cookie(token);
    info!("Auth API: login successful for {}", admin.email);

    Ok(HttpResponse::Ok().cookie(cookie).json(
        ApiResponse::data(UserData {
            user: admin.profile().without_created_at(),
        })
        .with_message("Login successful"),
    ))
}

/// `GET /api/auth/status`：始终 200
pub async fn status(req: HttpRequest) -> HttpResponse {
    let body = match resolve_admin(&req).await {
        Ok(admin) => AuthStatusResponse {
            success: true,
            authenticated: true,
            message: None,
            data: Some(UserData {
                user: admin.profile(),
            }),
        },
        Err(err) => AuthStatusResponse {
            success: true,
            authenticated: false,
            message: Some(unauthenticated_message(&err).to_string()),
            data: None,
        },
    };

    json_response(actix_web::http::StatusCode::OK, &body)
}

fn unauthenticated_message(err: &NepstayError) -> &'static str {
    match err {
        NepstayError::NoToken(_) => "Not authenticated",
        NepstayError::InvalidToken(_) | NepstayError::TokenExpired(_) => {
            "Invalid or expired token"
        }
        _ => "Invalid or expired session",
    }
}

/// `POST /api/auth/logout`
pub async fn logout(admin: AuthenticatedAdmin) -> HandlerResult {
    info!("Auth API: {} logged out", admin.0.email);
    let cookie = CookieBuilder::from_config().build_logged_out_cookie();
    Ok(HttpResponse::Ok()
        .cookie(cookie)
        .json(ApiResponse::message("Logout successful")))
}

/// `GET /api/auth/me`
pub async fn me(admin: AuthenticatedAdmin) -> HandlerResult {
    Ok(success_response(ApiResponse::data(UserData {
        user: admin.0.profile(),
    })))
}
