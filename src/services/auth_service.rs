//! Admin authentication service
//!
//! Login with attempt counting and temporary lockout, session checks for
//! authenticated requests, and idempotent admin seeding.

use std::sync::Arc;

use chrono::Utc;
use serde::Deserialize;
use tracing::{info, warn};

use crate::errors::{NepstayError, Result};
use crate::storage::{Admin, SeaOrmStorage};
use crate::storage::backend::normalize_email;
use crate::utils::password::{hash_password, verify_password};
use crate::utils::validation::{FieldErrors, is_valid_email};

pub const MIN_PASSWORD_LEN: usize = 6;

// ============ Request/Response DTOs ============

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

impl LoginRequest {
    /// 返回 (规范化邮箱, 密码)
    pub fn validate(self) -> Result<(String, String)> {
        let mut errors = FieldErrors::new();

        let email = self.email.as_deref().map(normalize_email).unwrap_or_default();
        if email.is_empty() {
            errors.push("email", "Email is required");
        } else if !is_valid_email(&email) {
            errors.push("email", "Please provide a valid email address");
        }

        let password = self.password.unwrap_or_default();
        if password.is_empty() {
            errors.push("password", "Password is required");
        } else if password.chars().count() < MIN_PASSWORD_LEN {
            errors.push("password", "Password must be at least 6 characters long");
        }

        errors.into_result()?;
        Ok((email, password))
    }
}

// ============ AuthService Implementation ============

pub struct AuthService {
    storage: Arc<SeaOrmStorage>,
}

impl AuthService {
    pub fn new(storage: Arc<SeaOrmStorage>) -> Self {
        Self { storage }
    }

    /// 登录
    ///
    /// 锁定中的账户在比较密码之前即被拒绝（423）。
    /// 未知邮箱与错误密码返回同一错误。
    pub async fn login(&self, request: LoginRequest) -> Result<Admin> {
        let (email, password) = request.validate()?;

        let Some(mut admin) = self.storage.find_admin_by_email(&email).await? else {
            info!("AuthService: login failed for unknown email");
            return Err(NepstayError::invalid_credentials());
        };

        let now = Utc::now();
        if admin.is_locked_at(now) {
            warn!("AuthService: login attempt on locked account {}", admin.email);
            return Err(NepstayError::account_locked());
        }

        if !verify_password(&password, &admin.password_hash)? {
            self.storage.record_failed_login(&admin, now).await?;
            info!(
                "AuthService: invalid password for {} (attempt {})",
                admin.email,
                admin.after_failed_login(now).0
            );
            return Err(NepstayError::invalid_credentials());
        }

        self.storage.reset_login_attempts(&admin.id, now).await?;
        admin.login_attempts = 0;
        admin.lock_until = None;
        admin.last_login = Some(now);

        info!("AuthService: admin {} logged in", admin.email);
        Ok(admin)
    }

    /// 校验 token 对应的管理员仍然有效
    pub async fn authorize_admin(&self, admin_id: &str) -> Result<Admin> {
        let admin = self
            .storage
            .find_admin_by_id(admin_id)
            .await?
            .ok_or_else(|| NepstayError::UserNotFound("User not found".to_string()))?;

        check_session(&admin)?;
        Ok(admin)
    }

    /// 创建初始管理员；已存在时不修改密码
    pub async fn seed_admin(&self, email: &str, password: &str) -> Result<(Admin, bool)> {
        let (email, password) = LoginRequest {
            email: Some(email.to_string()),
            password: Some(password.to_string()),
        }
        .validate()?;

        let hash = hash_password(&password)?;
        self.storage.create_initial_admin(&email, &hash).await
    }
}

/// 已认证会话的账户状态检查
pub fn check_session(admin: &Admin) -> Result<()> {
    if !admin.is_active {
        return Err(NepstayError::AccountInactive(
            "Account is inactive".to_string(),
        ));
    }
    if admin.is_locked() {
        return Err(NepstayError::SessionLocked(
            "Account is temporarily locked due to too many failed login attempts".to_string(),
        ));
    }
    if admin.role != Admin::ROLE_ADMIN {
        return Err(NepstayError::Forbidden(
            "User role is not authorized to access this route".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn admin() -> Admin {
        let now = Utc::now();
        Admin {
            id: "a".into(),
            email: "admin@kathmanduhostels.com".into(),
            password_hash: String::new(),
            role: Admin::ROLE_ADMIN.into(),
            is_active: true,
            last_login: None,
            login_attempts: 0,
            lock_until: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_login_request_validation() {
        let (email, password) = LoginRequest {
            email: Some("  Admin@KathmanduHostels.com ".into()),
            password: Some("secret1".into()),
        }
        .validate()
        .unwrap();
        assert_eq!(email, "admin@kathmanduhostels.com");
        assert_eq!(password, "secret1");

        let err = LoginRequest::default().validate().unwrap_err();
        assert_eq!(err.details().map(<[_]>::len), Some(2));

        let err = LoginRequest {
            email: Some("not-an-email".into()),
            password: Some("12345".into()),
        }
        .validate()
        .unwrap_err();
        let messages: Vec<&str> = err
            .details()
            .unwrap()
            .iter()
            .map(|d| d.message.as_str())
            .collect();
        assert!(messages.contains(&"Please provide a valid email address"));
        assert!(messages.contains(&"Password must be at least 6 characters long"));
    }

    #[test]
    fn test_check_session() {
        assert!(check_session(&admin()).is_ok());

        let mut inactive = admin();
        inactive.is_active = false;
        assert!(matches!(
            check_session(&inactive),
            Err(NepstayError::AccountInactive(_))
        ));

        let mut locked = admin();
        locked.lock_until = Some(Utc::now() + Duration::minutes(5));
        assert!(matches!(
            check_session(&locked),
            Err(NepstayError::SessionLocked(_))
        ));

        let mut editor = admin();
        editor.role = "editor".into();
        assert!(matches!(
            check_session(&editor),
            Err(NepstayError::Forbidden(_))
        ));
    }
}
