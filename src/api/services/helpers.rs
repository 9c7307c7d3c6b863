//! HTTP 帮助函数：响应信封、错误映射、Cookie 构建、提取器错误处理

use actix_web::cookie::{Cookie, SameSite};
use actix_web::error::{JsonPayloadError, PathError, QueryPayloadError};
use actix_web::http::StatusCode;
use actix_web::http::header::ContentType;
use actix_web::{HttpRequest, HttpResponse, ResponseError};
use serde::Serialize;
use tracing::{error, warn};

use crate::api::constants;
use crate::config::SameSitePolicy;
use crate::errors::{FieldError, NepstayError};

use super::error_code::ErrorCode;
use super::types::{ApiResponse, ErrorResponse};

/// 构建 JSON 响应
pub fn json_response<T: Serialize>(status: StatusCode, body: &T) -> HttpResponse {
    HttpResponse::build(status)
        .insert_header(ContentType::json())
        .json(body)
}

/// 构建成功响应（200）
pub fn success_response<T: Serialize>(body: ApiResponse<T>) -> HttpResponse {
    json_response(StatusCode::OK, &body)
}

/// 构建错误响应
pub fn error_response(
    status: StatusCode,
    code: ErrorCode,
    message: &str,
    details: Option<Vec<FieldError>>,
) -> HttpResponse {
    json_response(status, &ErrorResponse::new(code, message, details))
}

/// 从 NepstayError 构建错误响应（自动映射 HTTP 状态码和 ErrorCode）
pub fn error_from_nepstay(err: &NepstayError) -> HttpResponse {
    let status = err.http_status();
    if status.is_server_error() {
        error!("Request failed: {}", err);
    }
    error_response(
        status,
        err.code(),
        err.public_message(),
        err.details().map(<[FieldError]>::to_vec),
    )
}

impl ResponseError for NepstayError {
    fn status_code(&self) -> StatusCode {
        self.http_status()
    }

    fn error_response(&self) -> HttpResponse {
        error_from_nepstay(self)
    }
}

/// Cookie 构建器
pub struct CookieBuilder {
    same_site: SameSite,
    secure: bool,
    domain: Option<String>,
    expires_days: u64,
}

impl CookieBuilder {
    pub fn from_config() -> Self {
        let config = crate::config::get_config();

        let same_site = match config.api.cookie_same_site {
            SameSitePolicy::Strict => SameSite::Strict,
            SameSitePolicy::None => SameSite::None,
            SameSitePolicy::Lax => SameSite::Lax,
        };

        Self {
            same_site,
            secure: config
                .api
                .cookie_secure
                .unwrap_or_else(|| config.is_production()),
            domain: config.api.cookie_domain.clone(),
            expires_days: config.api.cookie_expires_days,
        }
    }

    fn build_cookie_base(
        &self,
        value: String,
        max_age: actix_web::cookie::time::Duration,
    ) -> Cookie<'static> {
        let mut cookie = Cookie::new(constants::JWT_COOKIE_NAME, value);
        cookie.set_path("/");
        cookie.set_http_only(true);
        cookie.set_secure(self.secure);
        cookie.set_same_site(self.same_site);
        cookie.set_max_age(max_age);
        if let Some(ref domain) = self.domain {
            cookie.set_domain(domain.clone());
        }
        cookie
    }

    pub fn build_session_cookie(&self, token: String) -> Cookie<'static> {
        self.build_cookie_base(
            token,
            actix_web::cookie::time::Duration::days(self.expires_days as i64),
        )
    }

    /// 登出：覆盖为占位值，10 秒后过期
    pub fn build_logged_out_cookie(&self) -> Cookie<'static> {
        self.build_cookie_base(
            constants::LOGGED_OUT_VALUE.to_string(),
            actix_web::cookie::time::Duration::seconds(constants::LOGGED_OUT_COOKIE_SECS),
        )
    }
}

// ============ 提取器错误处理 ============

pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    let nepstay_err = match &err {
        JsonPayloadError::Overflow { .. } | JsonPayloadError::OverflowKnownLength { .. } => {
            NepstayError::PayloadTooLarge("Request entity too large".to_string())
        }
        JsonPayloadError::ContentType => {
            NepstayError::invalid_field("body", "Content-Type must be application/json")
        }
        _ => NepstayError::invalid_field("body", format!("Invalid JSON body: {}", err)),
    };
    warn!("JSON payload rejected: {}", err);
    actix_web::error::InternalError::from_response(err, error_from_nepstay(&nepstay_err)).into()
}

pub fn query_error_handler(err: QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    let nepstay_err = NepstayError::query_validation(vec![FieldError::new(
        "query",
        format!("Invalid query string: {}", err),
    )]);
    actix_web::error::InternalError::from_response(err, error_from_nepstay(&nepstay_err)).into()
}

pub fn path_error_handler(err: PathError, _req: &HttpRequest) -> actix_web::Error {
    let nepstay_err = NepstayError::invalid_field("path", format!("Invalid path: {}", err));
    actix_web::error::InternalError::from_response(err, error_from_nepstay(&nepstay_err)).into()
}

/// 未匹配路由
pub async fn default_not_found(req: HttpRequest) -> HttpResponse {
    error_response(
        StatusCode::NOT_FOUND,
        ErrorCode::NotFound,
        &format!("Not found - {}", req.path()),
        None,
    )
}
