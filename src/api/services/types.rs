//! API 类型定义

use serde::Serialize;
use ts_rs::TS;

use crate::errors::FieldError;
use crate::services::{
    ClickResult, DashboardMetrics, FeaturedToggle, HostelStats, SystemInfo,
};
use crate::storage::{AdminProfile, Hostel, Pagination};

use super::error_code::ErrorCode;

/// 输出目录常量
pub const TS_EXPORT_PATH: &str = "../frontend/src/services/types.generated.ts";

/// 成功响应信封
///
/// `{success: true, message?, count?, pagination?, data?}`
#[derive(Serialize, Clone, Debug)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn data(data: T) -> Self {
        Self {
            success: true,
            message: None,
            count: None,
            pagination: None,
            data: Some(data),
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_page(mut self, count: usize, pagination: Pagination) -> Self {
        self.count = Some(count);
        self.pagination = Some(pagination);
        self
    }
}

impl ApiResponse<()> {
    /// 只有 message 的成功响应
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            count: None,
            pagination: None,
            data: None,
        }
    }
}

#[derive(Serialize, Clone, Debug, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct ErrorDetail {
    pub code: ErrorCode,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub details: Option<Vec<FieldError>>,
}

/// 错误响应信封 `{success: false, error: {code, message, details?}}`
#[derive(Serialize, Clone, Debug, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: ErrorDetail,
}

impl ErrorResponse {
    pub fn new(code: ErrorCode, message: impl Into<String>, details: Option<Vec<FieldError>>) -> Self {
        Self {
            success: false,
            error: ErrorDetail {
                code,
                message: message.into(),
                details,
            },
        }
    }
}

// ============ data 载荷 ============

#[derive(Serialize, Clone, Debug, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct HostelListData {
    pub hostels: Vec<Hostel>,
}

#[derive(Serialize, Clone, Debug, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct HostelData {
    pub hostel: Hostel,
}

#[derive(Serialize, Clone, Debug, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct FeaturedData {
    pub hostel: FeaturedToggle,
}

#[derive(Serialize, Clone, Debug, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct ClickData {
    pub hostel: ClickResult,
}

pub type StatsData = HostelStats;

#[derive(Serialize, Clone, Debug, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct UserData {
    pub user: AdminProfile,
}

/// `GET /api/auth/status`：始终 200
#[derive(Serialize, Clone, Debug, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct AuthStatusResponse {
    pub success: bool,
    pub authenticated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub data: Option<UserData>,
}

#[derive(Serialize, Clone, Debug, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct SystemInfoData {
    pub system_info: SystemInfo,
}

pub type MetricsData = DashboardMetrics;

#[derive(Serialize, Clone, Debug, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct HealthResponse {
    pub success: bool,
    pub message: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    pub environment: String,
    pub database: String,
}

#[derive(serde::Deserialize, Clone, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct TrackClickRequest {
    pub hostel_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_only_envelope_omits_data() {
        let json = serde_json::to_value(ApiResponse::message("Logout successful")).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"success": true, "message": "Logout successful"})
        );
    }

    #[test]
    fn test_paged_envelope() {
        let body = ApiResponse::data(HostelListData { hostels: vec![] })
            .with_page(0, Pagination::new(1, 12, 0));
        let json = serde_json::to_value(body).unwrap();
        assert_eq!(json["count"], 0);
        assert_eq!(json["pagination"]["totalPages"], 0);
        assert_eq!(json["pagination"]["hasPrevPage"], false);
        assert!(json["data"]["hostels"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_error_envelope() {
        let body = ErrorResponse::new(
            ErrorCode::ValidationError,
            "Hostel name is required",
            Some(vec![FieldError::new("name", "Hostel name is required")]),
        );
        let json = serde_json::to_value(body).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["error"]["code"], "VALIDATION_ERROR");
        assert_eq!(json["error"]["details"][0]["field"], "name");

        let body = ErrorResponse::new(ErrorCode::NotFound, "Not found", None);
        let json = serde_json::to_value(body).unwrap();
        assert!(json["error"].get("details").is_none());
    }
}
