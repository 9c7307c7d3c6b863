use std::fmt;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::api::services::types::TS_EXPORT_PATH;

/// 字段级校验错误，随 VALIDATION_ERROR / QUERY_VALIDATION_ERROR 一起返回
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone)]
pub enum NepstayError {
    DatabaseConfig(String),
    DatabaseConnection(String),
    DatabaseOperation(String),
    FileOperation(String),
    Serialization(String),
    DateParse(String),
    Validation {
        message: String,
        details: Vec<FieldError>,
    },
    QueryValidation {
        message: String,
        details: Vec<FieldError>,
    },
    NotFound(String),
    HostelNotFound(String),
    Duplicate(String),
    InvalidCredentials(String),
    AccountLocked(String),
    NoToken(String),
    InvalidToken(String),
    TokenExpired(String),
    UserNotFound(String),
    AccountInactive(String),
    SessionLocked(String),
    Forbidden(String),
    PayloadTooLarge(String),
    RateLimited(String),
    Internal(String),
}

impl NepstayError {
    /// 获取错误类型名称
    pub fn error_type(&self) -> &'static str {
        match self {
            NepstayError::DatabaseConfig(_) => "Database Configuration Error",
            NepstayError::DatabaseConnection(_) => "Database Connection Error",
            NepstayError::DatabaseOperation(_) => "Database Operation Error",
            NepstayError::FileOperation(_) => "File Operation Error",
            NepstayError::Serialization(_) => "Serialization Error",
            NepstayError::DateParse(_) => "Date Parse Error",
            NepstayError::Validation { .. } => "Validation Error",
            NepstayError::QueryValidation { .. } => "Query Validation Error",
            NepstayError::NotFound(_) => "Resource Not Found",
            NepstayError::HostelNotFound(_) => "Hostel Not Found",
            NepstayError::Duplicate(_) => "Duplicate Field",
            NepstayError::InvalidCredentials(_) => "Invalid Credentials",
            NepstayError::AccountLocked(_) | NepstayError::SessionLocked(_) => "Account Locked",
            NepstayError::NoToken(_) => "Missing Token",
            NepstayError::InvalidToken(_) => "Invalid Token",
            NepstayError::TokenExpired(_) => "Token Expired",
            NepstayError::UserNotFound(_) => "User Not Found",
            NepstayError::AccountInactive(_) => "Account Inactive",
            NepstayError::Forbidden(_) => "Insufficient Permissions",
            NepstayError::PayloadTooLarge(_) => "Payload Too Large",
            NepstayError::RateLimited(_) => "Rate Limit Exceeded",
            NepstayError::Internal(_) => "Internal Server Error",
        }
    }

    /// 获取错误详情
    pub fn message(&self) -> &str {
        match self {
            NepstayError::DatabaseConfig(msg)
            | NepstayError::DatabaseConnection(msg)
            | NepstayError::DatabaseOperation(msg)
            | NepstayError::FileOperation(msg)
            | NepstayError::Serialization(msg)
            | NepstayError::DateParse(msg)
            | NepstayError::NotFound(msg)
            | NepstayError::HostelNotFound(msg)
            | NepstayError::Duplicate(msg)
            | NepstayError::InvalidCredentials(msg)
            | NepstayError::AccountLocked(msg)
            | NepstayError::NoToken(msg)
            | NepstayError::InvalidToken(msg)
            | NepstayError::TokenExpired(msg)
            | NepstayError::UserNotFound(msg)
            | NepstayError::AccountInactive(msg)
            | NepstayError::SessionLocked(msg)
            | NepstayError::Forbidden(msg)
            | NepstayError::PayloadTooLarge(msg)
            | NepstayError::RateLimited(msg)
            | NepstayError::Internal(msg) => msg,
            NepstayError::Validation { message, .. }
            | NepstayError::QueryValidation { message, .. } => message,
        }
    }

    /// 字段级错误（仅校验类错误携带）
    pub fn details(&self) -> Option<&[FieldError]> {
        match self {
            NepstayError::Validation { details, .. }
            | NepstayError::QueryValidation { details, .. } => Some(details),
            _ => None,
        }
    }

    /// 格式化为彩色输出（用于 CLI 模式）
    pub fn format_colored(&self) -> String {
        use colored::Colorize;
        format!(
            "{} {}\n  {}",
            "[ERROR]".red().bold(),
            self.error_type().red(),
            self.message().white()
        )
    }

    /// 格式化为简洁输出
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for NepstayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for NepstayError {}

// 便捷的构造函数
impl NepstayError {
    pub fn database_config<T: Into<String>>(msg: T) -> Self {
        NepstayError::DatabaseConfig(msg.into())
    }

    pub fn database_connection<T: Into<String>>(msg: T) -> Self {
        NepstayError::DatabaseConnection(msg.into())
    }

    pub fn database_operation<T: Into<String>>(msg: T) -> Self {
        NepstayError::DatabaseOperation(msg.into())
    }

    pub fn file_operation<T: Into<String>>(msg: T) -> Self {
        NepstayError::FileOperation(msg.into())
    }

    pub fn serialization<T: Into<String>>(msg: T) -> Self {
        NepstayError::Serialization(msg.into())
    }

    /// Validation failure on a request body; the message joins all field messages.
    pub fn validation(details: Vec<FieldError>) -> Self {
        NepstayError::Validation {
            message: join_messages(&details, "Validation failed"),
            details,
        }
    }

    pub fn query_validation(details: Vec<FieldError>) -> Self {
        NepstayError::QueryValidation {
            message: join_messages(&details, "Query validation failed"),
            details,
        }
    }

    /// 单字段校验错误
    pub fn invalid_field(field: &str, message: impl Into<String>) -> Self {
        Self::validation(vec![FieldError::new(field, message)])
    }

    pub fn not_found<T: Into<String>>(msg: T) -> Self {
        NepstayError::NotFound(msg.into())
    }

    pub fn hostel_not_found() -> Self {
        NepstayError::HostelNotFound("Hostel not found".to_string())
    }

    pub fn duplicate<T: Into<String>>(msg: T) -> Self {
        NepstayError::Duplicate(msg.into())
    }

    pub fn invalid_credentials() -> Self {
        NepstayError::InvalidCredentials("Invalid email or password".to_string())
    }

    pub fn account_locked() -> Self {
        NepstayError::AccountLocked(
            "Account is temporarily locked due to too many failed login attempts. Please try again later."
                .to_string(),
        )
    }

    pub fn internal<T: Into<String>>(msg: T) -> Self {
        NepstayError::Internal(msg.into())
    }
}

fn join_messages(details: &[FieldError], fallback: &str) -> String {
    if details.is_empty() {
        return fallback.to_string();
    }
    details
        .iter()
        .map(|d| d.message.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

// 为常见的错误类型实现 From trait
impl From<sea_orm::DbErr> for NepstayError {
    fn from(err: sea_orm::DbErr) -> Self {
        use sea_orm::SqlErr;

        // 唯一约束冲突 → DUPLICATE_FIELD
        if let Some(SqlErr::UniqueConstraintViolation(detail)) = err.sql_err() {
            let lower = detail.to_lowercase();
            let message = if lower.contains("email") {
                "Email already exists"
            } else if lower.contains("slug") {
                "Hostel with this name already exists"
            } else {
                "Duplicate field value entered"
            };
            return NepstayError::Duplicate(message.to_string());
        }

        NepstayError::DatabaseOperation(err.to_string())
    }
}

impl From<std::io::Error> for NepstayError {
    fn from(err: std::io::Error) -> Self {
        NepstayError::FileOperation(err.to_string())
    }
}

impl From<serde_json::Error> for NepstayError {
    fn from(err: serde_json::Error) -> Self {
        NepstayError::Serialization(err.to_string())
    }
}

impl From<chrono::ParseError> for NepstayError {
    fn from(err: chrono::ParseError) -> Self {
        NepstayError::DateParse(err.to_string())
    }
}

impl From<jsonwebtoken::errors::Error> for NepstayError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        use jsonwebtoken::errors::ErrorKind;

        match err.kind() {
            ErrorKind::ExpiredSignature => NepstayError::TokenExpired("Token expired".to_string()),
            _ => NepstayError::InvalidToken("Invalid token".to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, NepstayError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_message_joins_details() {
        let err = NepstayError::validation(vec![
            FieldError::new("name", "Hostel name is required"),
            FieldError::new("totalBeds", "Total beds must be at least 1"),
        ]);
        assert_eq!(
            err.message(),
            "Hostel name is required, Total beds must be at least 1"
        );
        assert_eq!(err.details().map(|d| d.len()), Some(2));
    }

    #[test]
    fn test_validation_without_details_uses_fallback() {
        let err = NepstayError::query_validation(Vec::new());
        assert_eq!(err.message(), "Query validation failed");
    }

    #[test]
    fn test_non_validation_error_has_no_details() {
        assert!(NepstayError::hostel_not_found().details().is_none());
    }

    #[test]
    fn test_db_err_maps_to_database_operation() {
        let err: NepstayError = sea_orm::DbErr::Custom("boom".to_string()).into();
        assert!(matches!(err, NepstayError::DatabaseOperation(_)));
    }

    #[test]
    fn test_jwt_expired_maps_to_token_expired() {
        let err: NepstayError =
            jsonwebtoken::errors::Error::from(jsonwebtoken::errors::ErrorKind::ExpiredSignature)
                .into();
        assert!(matches!(err, NepstayError::TokenExpired(_)));

        let err: NepstayError =
            jsonwebtoken::errors::Error::from(jsonwebtoken::errors::ErrorKind::InvalidSignature)
                .into();
        assert!(matches!(err, NepstayError::InvalidToken(_)));
    }

    #[test]
    fn test_display_uses_simple_format() {
        let err = NepstayError::not_found("Route /nope not found");
        assert_eq!(err.to_string(), "Resource Not Found: Route /nope not found");
    }
}
