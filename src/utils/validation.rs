//! 输入校验规则
//!
//! 所有规则均为纯函数，由 [`FieldErrors`] 汇总为字段级错误，
//! 一次请求返回全部错误而不是遇到第一个就停止。

use crate::errors::{FieldError, NepstayError, Result};

/// 字段错误收集器
#[derive(Debug, Default)]
pub struct FieldErrors {
    errors: Vec<FieldError>,
}

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(FieldError::new(field, message));
    }

    /// `ok` 为 false 时记录错误
    pub fn check(&mut self, ok: bool, field: &str, message: &str) {
        if !ok {
            self.push(field, message);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// 请求体校验结果（VALIDATION_ERROR）
    pub fn into_result(self) -> Result<()> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(NepstayError::validation(self.errors))
        }
    }

    /// 查询参数校验结果（QUERY_VALIDATION_ERROR）
    pub fn into_query_result(self) -> Result<()> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(NepstayError::query_validation(self.errors))
        }
    }
}

/// 按字符计数（而不是字节）
pub fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// `local@domain.tld`：不含空白，恰好一个 `@`，域名中有一个非首尾的 `.`
pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    domain
        .char_indices()
        .any(|(i, c)| c == '.' && i > 0 && i + 1 < domain.len())
}

/// 去掉空格与连字符
pub fn normalize_phone(raw: &str) -> String {
    raw.chars()
        .filter(|c| !c.is_whitespace() && *c != '-')
        .collect()
}

/// 可选 `+977` 前缀 + 10 位数字
pub fn is_valid_whatsapp(raw: &str) -> bool {
    let normalized = normalize_phone(raw);
    let digits = normalized.strip_prefix("+977").unwrap_or(&normalized);
    digits.len() == 10 && digits.chars().all(|c| c.is_ascii_digit())
}

/// 主键格式（UUID）
pub fn is_valid_id(id: &str) -> bool {
    uuid::Uuid::parse_str(id).is_ok()
}

/// 非空则返回去除首尾空白后的值
pub fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_rules() {
        assert!(is_valid_email("admin@kathmanduhostels.com"));
        assert!(is_valid_email("a.b@c.d"));
        assert!(!is_valid_email("admin@localhost"));
        assert!(!is_valid_email("admin@.com"));
        assert!(!is_valid_email("admin@com."));
        assert!(!is_valid_email("ad min@x.com"));
        assert!(!is_valid_email("a@b@c.com"));
        assert!(!is_valid_email("@x.com"));
    }

    #[test]
    fn test_whatsapp_rules() {
        assert!(is_valid_whatsapp("9841234567"));
        assert!(is_valid_whatsapp("+977 984-123-4567"));
        assert!(!is_valid_whatsapp("+1 9841234567"));
        assert!(!is_valid_whatsapp("98412345"));
        assert!(!is_valid_whatsapp("98412345678"));
    }

    #[test]
    fn test_id_rules() {
        assert!(is_valid_id("6f1c2b7e-9a3d-4e5f-8a2b-1c3d4e5f6a7b"));
        assert!(!is_valid_id("507f1f77bcf86cd799439011"));
    }

    #[test]
    fn test_field_errors_collects_all() {
        let mut errors = FieldErrors::new();
        errors.check(false, "name", "Hostel name is required");
        errors.check(true, "description", "unused");
        errors.check(false, "totalBeds", "At least 1 bed is required");
        assert_eq!(errors.len(), 2);

        let err = errors.into_result().unwrap_err();
        assert!(matches!(err, NepstayError::Validation { .. }));
        assert_eq!(err.details().map(<[_]>::len), Some(2));
    }

    #[test]
    fn test_query_errors_variant() {
        let mut errors = FieldErrors::new();
        errors.push("limit", "limit must be less than or equal to 50");
        assert!(matches!(
            errors.into_query_result(),
            Err(NepstayError::QueryValidation { .. })
        ));
    }

    #[test]
    fn test_non_blank() {
        assert_eq!(non_blank(Some("  wifi ")), Some("wifi"));
        assert_eq!(non_blank(Some("   ")), None);
        assert_eq!(non_blank(None), None);
    }
}
