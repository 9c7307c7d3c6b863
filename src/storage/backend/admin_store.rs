//! Admin account persistence and login-attempt bookkeeping

use chrono::{DateTime, Duration, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, ExprTrait, PaginatorTrait, QueryFilter,
    sea_query::{CaseStatement, Expr},
};
use tracing::{info, warn};

use super::converters::model_to_admin;
use super::{SeaOrmStorage, retry};
use crate::errors::{NepstayError, Result};
use crate::storage::models::{
    Admin, FailedLoginUpdate, LOCK_DURATION_MINUTES, MAX_LOGIN_ATTEMPTS,
};

use migration::entities::admin;

/// 邮箱统一为去空白的小写形式
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

impl SeaOrmStorage {
    /// 按邮箱查找启用中的管理员
    pub async fn find_admin_by_email(&self, email: &str) -> Result<Option<Admin>> {
        let db = &self.db;
        let email = normalize_email(email);
        let model = retry::with_retry("find_admin_by_email", self.retry_config, || async {
            admin::Entity::find()
                .filter(admin::Column::Email.eq(email.as_str()))
                .filter(admin::Column::IsActive.eq(true))
                .one(db)
                .await
        })
        .await?;

        Ok(model.map(model_to_admin))
    }

    pub async fn find_admin_by_id(&self, id: &str) -> Result<Option<Admin>> {
        let db = &self.db;
        let model = retry::with_retry("find_admin_by_id", self.retry_config, || async {
            admin::Entity::find_by_id(id.to_string()).one(db).await
        })
        .await?;

        Ok(model.map(model_to_admin))
    }

    pub async fn count_active_admins(&self) -> Result<u64> {
        let db = &self.db;
        let count = retry::with_retry("count_active_admins", self.retry_config, || async {
            admin::Entity::find()
                .filter(admin::Column::IsActive.eq(true))
                .count(db)
                .await
        })
        .await?;
        Ok(count)
    }

    /// 创建初始管理员（幂等）：邮箱已存在时返回现有记录
    ///
    /// 返回 (admin, 是否新建)
    pub async fn create_initial_admin(
        &self,
        email: &str,
        password_hash: &str,
    ) -> Result<(Admin, bool)> {
        let db = &self.db;
        let email = normalize_email(email);

        let existing = admin::Entity::find()
            .filter(admin::Column::Email.eq(email.as_str()))
            .one(db)
            .await?;
        if let Some(model) = existing {
            info!("Admin user already exists: {}", email);
            return Ok((model_to_admin(model), false));
        }

        use sea_orm::ActiveValue::Set;
        let now = Utc::now();
        let model = admin::ActiveModel {
            id: Set(uuid::Uuid::new_v4().to_string()),
            email: Set(email.clone()),
            password_hash: Set(password_hash.to_string()),
            role: Set(Admin::ROLE_ADMIN.to_string()),
            is_active: Set(true),
            last_login: Set(None),
            login_attempts: Set(0),
            lock_until: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(db)
        .await?;

        info!("Initial admin user created: {}", email);
        Ok((model_to_admin(model), true))
    }

    /// 记录一次失败登录
    ///
    /// 旧锁已过期时重置为 1；否则原子地 +1，达到上限且未锁定时写入 lock_until。
    /// lock_until 的 SET 在 login_attempts 之前，MySQL 按顺序求值时仍读到旧计数。
    pub async fn record_failed_login(&self, admin: &Admin, now: DateTime<Utc>) -> Result<()> {
        let db = &self.db;
        let id = admin.id.as_str();

        let result = match admin.failed_login_update(now) {
            FailedLoginUpdate::Restart => {
                retry::with_retry("record_failed_login(restart)", self.retry_config, || async {
                    admin::Entity::update_many()
                        .col_expr(admin::Column::LoginAttempts, Expr::value(1))
                        .col_expr(
                            admin::Column::LockUntil,
                            Expr::value(Option::<DateTime<Utc>>::None),
                        )
                        .col_expr(admin::Column::UpdatedAt, Expr::value(now))
                        .filter(admin::Column::Id.eq(id))
                        .exec(db)
                        .await
                })
                .await?
            }
            FailedLoginUpdate::Increment => {
                let lock_until = now + Duration::minutes(LOCK_DURATION_MINUTES);
                retry::with_write_retry("record_failed_login(increment)", self.retry_config, || async {
                    let reaches_limit = Condition::all()
                        .add(
                            Expr::col(admin::Column::LoginAttempts)
                                .add(1)
                                .gte(MAX_LOGIN_ATTEMPTS as i32),
                        )
                        .add(
                            Condition::any()
                                .add(admin::Column::LockUntil.is_null())
                                .add(admin::Column::LockUntil.lte(now)),
                        );
                    let next_lock = CaseStatement::new()
                        .case(reaches_limit, Expr::value(lock_until))
                        .finally(Expr::col(admin::Column::LockUntil));

                    admin::Entity::update_many()
                        .col_expr(admin::Column::LockUntil, next_lock.into())
                        .col_expr(
                            admin::Column::LoginAttempts,
                            Expr::col(admin::Column::LoginAttempts).add(1),
                        )
                        .col_expr(admin::Column::UpdatedAt, Expr::value(now))
                        .filter(admin::Column::Id.eq(id))
                        .exec(db)
                        .await
                })
                .await?
            }
        };

        if result.rows_affected == 0 {
            return Err(NepstayError::not_found("Admin not found"));
        }

        let (attempts, lock) = admin.after_failed_login(now);
        if lock.is_some() && !admin.is_locked_at(now) {
            warn!(
                "Admin {} locked until {:?} after {} failed attempts",
                admin.email, lock, attempts
            );
        }
        Ok(())
    }

    /// 登录成功：清零计数、解除锁定、记录 last_login
    pub async fn reset_login_attempts(&self, id: &str, now: DateTime<Utc>) -> Result<()> {
        let db = &self.db;
        retry::with_retry("reset_login_attempts", self.retry_config, || async {
            admin::Entity::update_many()
                .col_expr(admin::Column::LoginAttempts, Expr::value(0))
                .col_expr(
                    admin::Column::LockUntil,
                    Expr::value(Option::<DateTime<Utc>>::None),
                )
                .col_expr(admin::Column::LastLogin, Expr::value(now))
                .col_expr(admin::Column::UpdatedAt, Expr::value(now))
                .filter(admin::Column::Id.eq(id))
                .exec(db)
                .await
        })
        .await?;
        Ok(())
    }
}
