//! 统一 API 错误码定义

use actix_web::http::StatusCode;
use serde::{Deserialize, Serialize};
use strum::IntoStaticStr;
use ts_rs::TS;

use crate::errors::NepstayError;

use super::types::TS_EXPORT_PATH;

/// API 错误码枚举
///
/// 序列化为 SCREAMING_SNAKE_CASE 字符串，ts-rs 生成对应的联合类型。
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, IntoStaticStr, TS,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub enum ErrorCode {
    // 校验
    ValidationError,
    QueryValidationError,
    DuplicateField,

    // 资源
    HostelNotFound,
    ResourceNotFound,
    NotFound,

    // 认证
    InvalidCredentials,
    AccountLocked,
    NoToken,
    InvalidToken,
    TokenExpired,
    UserNotFound,
    AccountInactive,
    InsufficientPermissions,

    // 请求限制
    PayloadTooLarge,
    RateLimitExceeded,
    LoginRateLimitExceeded,

    InternalServerError,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        self.into()
    }
}

impl From<&NepstayError> for ErrorCode {
    fn from(err: &NepstayError) -> Self {
        match err {
            NepstayError::Validation { .. } => ErrorCode::ValidationError,
            NepstayError::QueryValidation { .. } => ErrorCode::QueryValidationError,
            NepstayError::Duplicate(_) => ErrorCode::DuplicateField,
            NepstayError::HostelNotFound(_) => ErrorCode::HostelNotFound,
            NepstayError::NotFound(_) => ErrorCode::ResourceNotFound,
            NepstayError::InvalidCredentials(_) => ErrorCode::InvalidCredentials,
            NepstayError::AccountLocked(_) | NepstayError::SessionLocked(_) => {
                ErrorCode::AccountLocked
            }
            NepstayError::NoToken(_) => ErrorCode::NoToken,
            NepstayError::InvalidToken(_) => ErrorCode::InvalidToken,
            NepstayError::TokenExpired(_) => ErrorCode::TokenExpired,
            NepstayError::UserNotFound(_) => ErrorCode::UserNotFound,
            NepstayError::AccountInactive(_) => ErrorCode::AccountInactive,
            NepstayError::Forbidden(_) => ErrorCode::InsufficientPermissions,
            NepstayError::PayloadTooLarge(_) => ErrorCode::PayloadTooLarge,
            NepstayError::RateLimited(_) => ErrorCode::RateLimitExceeded,
            NepstayError::DatabaseConfig(_)
            | NepstayError::DatabaseConnection(_)
            | NepstayError::DatabaseOperation(_)
            | NepstayError::FileOperation(_)
            | NepstayError::Serialization(_)
            | NepstayError::DateParse(_)
            | NepstayError::Internal(_) => ErrorCode::InternalServerError,
        }
    }
}

impl NepstayError {
    pub fn code(&self) -> ErrorCode {
        ErrorCode::from(self)
    }

    /// HTTP 状态码映射
    ///
    /// 登录时的锁定返回 423；已登录会话被锁定返回 401
    pub fn http_status(&self) -> StatusCode {
        match self {
            NepstayError::Validation { .. }
            | NepstayError::QueryValidation { .. }
            | NepstayError::Duplicate(_) => StatusCode::BAD_REQUEST,
            NepstayError::HostelNotFound(_) | NepstayError::NotFound(_) => StatusCode::NOT_FOUND,
            NepstayError::InvalidCredentials(_)
            | NepstayError::NoToken(_)
            | NepstayError::InvalidToken(_)
            | NepstayError::TokenExpired(_)
            | NepstayError::UserNotFound(_)
            | NepstayError::AccountInactive(_)
            | NepstayError::SessionLocked(_) => StatusCode::UNAUTHORIZED,
            NepstayError::AccountLocked(_) => StatusCode::LOCKED,
            NepstayError::Forbidden(_) => StatusCode::FORBIDDEN,
            NepstayError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            NepstayError::RateLimited(_) => StatusCode::TOO_MANY_REQUESTS,
            NepstayError::DatabaseConfig(_)
            | NepstayError::DatabaseConnection(_)
            | NepstayError::DatabaseOperation(_)
            | NepstayError::FileOperation(_)
            | NepstayError::Serialization(_)
            | NepstayError::DateParse(_)
            | NepstayError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// 对外展示的消息：5xx 不泄露内部细节
    pub fn public_message(&self) -> &str {
        if self.http_status().is_server_error() {
            "Internal Server Error"
        } else {
            self.message()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_strings() {
        assert_eq!(ErrorCode::QueryValidationError.as_str(), "QUERY_VALIDATION_ERROR");
        assert_eq!(
            serde_json::to_string(&ErrorCode::LoginRateLimitExceeded).unwrap(),
            "\"LOGIN_RATE_LIMIT_EXCEEDED\""
        );
    }

    #[test]
    fn test_status_mapping() {
        let cases = [
            (NepstayError::hostel_not_found(), 404, ErrorCode::HostelNotFound),
            (NepstayError::not_found("x"), 404, ErrorCode::ResourceNotFound),
            (NepstayError::duplicate("slug"), 400, ErrorCode::DuplicateField),
            (NepstayError::invalid_field("name", "bad"), 400, ErrorCode::ValidationError),
            (NepstayError::query_validation(vec![]), 400, ErrorCode::QueryValidationError),
            (NepstayError::invalid_credentials(), 401, ErrorCode::InvalidCredentials),
            (NepstayError::account_locked(), 423, ErrorCode::AccountLocked),
            (NepstayError::SessionLocked("x".into()), 401, ErrorCode::AccountLocked),
            (NepstayError::Forbidden("x".into()), 403, ErrorCode::InsufficientPermissions),
            (NepstayError::PayloadTooLarge("x".into()), 413, ErrorCode::PayloadTooLarge),
            (NepstayError::RateLimited("x".into()), 429, ErrorCode::RateLimitExceeded),
            (NepstayError::database_operation("boom"), 500, ErrorCode::InternalServerError),
        ];
        for (err, status, code) in cases {
            assert_eq!(err.http_status().as_u16(), status, "{:?}", err);
            assert_eq!(err.code(), code);
        }
    }

    #[test]
    fn test_server_errors_hide_details() {
        let err = NepstayError::database_operation("connection refused at 10.0.0.5");
        assert_eq!(err.public_message(), "Internal Server Error");
        assert_eq!(
            NepstayError::hostel_not_found().public_message(),
            "Hostel not found"
        );
    }
}
