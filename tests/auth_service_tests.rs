//! AuthService tests
//!
//! Login, lockout after repeated failures, session checks and seeding.

use std::sync::{Arc, Once};

use chrono::{DateTime, Duration, Utc};
use migration::entities::admin;
use nepstay::config::init_config;
use nepstay::errors::NepstayError;
use nepstay::services::{AuthService, LoginRequest};
use nepstay::storage::SeaOrmStorage;
use nepstay::storage::models::{LOCK_DURATION_MINUTES, MAX_LOGIN_ATTEMPTS};
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, sea_query::Expr};
use tempfile::TempDir;

static INIT: Once = Once::new();

const EMAIL: &str = "admin@nepstay.test";
const PASSWORD: &str = "correct-horse";

fn init_test_config() {
    INIT.call_once(|| {
        init_config();
    });
}

async fn create_test_service() -> (AuthService, Arc<SeaOrmStorage>, TempDir) {
    init_test_config();

    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = temp_dir.path().join("auth.db");
    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());

    let storage = Arc::new(
        SeaOrmStorage::new(&db_url, "sqlite")
            .await
            .expect("Failed to create storage"),
    );
    let service = AuthService::new(storage.clone());
    service
        .seed_admin(EMAIL, PASSWORD)
        .await
        .expect("Failed to seed admin");

    (service, storage, temp_dir)
}

/// 直接改写库中的失败计数与锁定时间
async fn set_lock_state(storage: &SeaOrmStorage, attempts: i32, lock_until: Option<DateTime<Utc>>) {
    admin::Entity::update_many()
        .col_expr(admin::Column::LoginAttempts, Expr::value(attempts))
        .col_expr(admin::Column::LockUntil, Expr::value(lock_until))
        .filter(admin::Column::Email.eq(EMAIL))
        .exec(storage.get_db())
        .await
        .expect("Failed to update admin lock state");
}

fn login(email: &str, password: &str) -> LoginRequest {
    LoginRequest {
        email: Some(email.to_string()),
        password: Some(password.to_string()),
    }
}

#[tokio::test]
async fn test_login_success_updates_last_login() {
    let (service, storage, _dir) = create_test_service().await;

    let admin = service.login(login(" Admin@Nepstay.TEST ", PASSWORD)).await.unwrap();
    assert_eq!(admin.email, EMAIL);
    assert!(admin.last_login.is_some());
    assert_eq!(admin.login_attempts, 0);

    let stored = storage.find_admin_by_id(&admin.id).await.unwrap().unwrap();
    assert!(stored.last_login.is_some());
}

#[tokio::test]
async fn test_unknown_email_and_wrong_password_look_the_same() {
    let (service, _storage, _dir) = create_test_service().await;

    let unknown = service
        .login(login("nobody@nepstay.test", PASSWORD))
        .await
        .unwrap_err();
    let wrong = service.login(login(EMAIL, "wrong-password")).await.unwrap_err();

    assert!(matches!(unknown, NepstayError::InvalidCredentials(_)));
    assert!(matches!(wrong, NepstayError::InvalidCredentials(_)));
    assert_eq!(unknown.message(), wrong.message());
}

#[tokio::test]
async fn test_login_validation() {
    let (service, _storage, _dir) = create_test_service().await;

    let err = service.login(LoginRequest::default()).await.unwrap_err();
    match err {
        NepstayError::Validation { details, .. } => {
            let fields: Vec<&str> = details.iter().map(|d| d.field.as_str()).collect();
            assert_eq!(fields, vec!["email", "password"]);
        }
        other => panic!("expected validation error, got {:?}", other),
    }

    let err = service.login(login(EMAIL, "12345")).await.unwrap_err();
    assert!(matches!(err, NepstayError::Validation { .. }));
}

#[tokio::test]
async fn test_lockout_after_max_attempts() {
    let (service, storage, _dir) = create_test_service().await;

    for _ in 0..MAX_LOGIN_ATTEMPTS {
        let err = service.login(login(EMAIL, "wrong-password")).await.unwrap_err();
        assert!(matches!(err, NepstayError::InvalidCredentials(_)));
    }

    let stored = storage.find_admin_by_email(EMAIL).await.unwrap().unwrap();
    assert_eq!(stored.login_attempts, MAX_LOGIN_ATTEMPTS);
    let lock_until = stored.lock_until.expect("account should be locked");
    let expected = Utc::now() + Duration::minutes(LOCK_DURATION_MINUTES);
    assert!((expected - lock_until).num_seconds().abs() < 60);

    // 正确密码也被拒绝
    let err = service.login(login(EMAIL, PASSWORD)).await.unwrap_err();
    assert!(matches!(err, NepstayError::AccountLocked(_)));

    // 锁定中的会话同样失效
    let err = service.authorize_admin(&stored.id).await.unwrap_err();
    assert!(matches!(err, NepstayError::SessionLocked(_)));
}

#[tokio::test]
async fn test_successful_login_resets_attempts() {
    let (service, storage, _dir) = create_test_service().await;

    for _ in 0..(MAX_LOGIN_ATTEMPTS - 1) {
        let _ = service.login(login(EMAIL, "wrong-password")).await;
    }
    let stored = storage.find_admin_by_email(EMAIL).await.unwrap().unwrap();
    assert_eq!(stored.login_attempts, MAX_LOGIN_ATTEMPTS - 1);
    assert!(stored.lock_until.is_none());

    service.login(login(EMAIL, PASSWORD)).await.unwrap();
    let stored = storage.find_admin_by_email(EMAIL).await.unwrap().unwrap();
    assert_eq!(stored.login_attempts, 0);

    // 重置后重新计数，一次失败不会锁定
    let _ = service.login(login(EMAIL, "wrong-password")).await;
    let stored = storage.find_admin_by_email(EMAIL).await.unwrap().unwrap();
    assert_eq!(stored.login_attempts, 1);
    assert!(stored.lock_until.is_none());
}

#[tokio::test]
async fn test_authorize_unknown_admin() {
    let (service, _storage, _dir) = create_test_service().await;

    let err = service
        .authorize_admin(&uuid::Uuid::new_v4().to_string())
        .await
        .unwrap_err();
    assert!(matches!(err, NepstayError::UserNotFound(_)));
}

#[tokio::test]
async fn test_seed_admin_is_idempotent() {
    let (service, storage, _dir) = create_test_service().await;

    let (admin, created) = service.seed_admin(EMAIL, "another-password").await.unwrap();
    assert!(!created);
    assert_eq!(admin.email, EMAIL);
    assert_eq!(storage.count_active_admins().await.unwrap(), 1);

    // 原密码仍然有效
    service.login(login(EMAIL, PASSWORD)).await.unwrap();
}

#[tokio::test]
async fn test_expired_lock_restarts_the_count() {
    let (service, storage, _dir) = create_test_service().await;
    set_lock_state(
        &storage,
        MAX_LOGIN_ATTEMPTS as i32,
        Some(Utc::now() - Duration::minutes(1)),
    )
    .await;

    let err = service.login(login(EMAIL, "wrong-password")).await.unwrap_err();
    assert!(matches!(err, NepstayError::InvalidCredentials(_)));

    let stored = storage.find_admin_by_email(EMAIL).await.unwrap().unwrap();
    assert_eq!(stored.login_attempts, 1);
    assert!(stored.lock_until.is_none());

    // 重新计数后再失败到上限会再次锁定
    for _ in 1..MAX_LOGIN_ATTEMPTS {
        let _ = service.login(login(EMAIL, "wrong-password")).await;
    }
    let stored = storage.find_admin_by_email(EMAIL).await.unwrap().unwrap();
    assert_eq!(stored.login_attempts, MAX_LOGIN_ATTEMPTS);
    assert!(stored.lock_until.is_some_and(|until| until > Utc::now()));

    let err = service.login(login(EMAIL, PASSWORD)).await.unwrap_err();
    assert!(matches!(err, NepstayError::AccountLocked(_)));
}

#[tokio::test]
async fn test_increment_relocks_when_stored_lock_already_expired() {
    let (_service, storage, _dir) = create_test_service().await;

    // 读取时未锁定，写入前库中已出现过期锁：由 SQL 的 CASE 重新加锁
    let snapshot = storage.find_admin_by_email(EMAIL).await.unwrap().unwrap();
    set_lock_state(
        &storage,
        MAX_LOGIN_ATTEMPTS as i32 - 1,
        Some(Utc::now() - Duration::minutes(5)),
    )
    .await;

    let now = Utc::now();
    storage.record_failed_login(&snapshot, now).await.unwrap();

    let stored = storage.find_admin_by_email(EMAIL).await.unwrap().unwrap();
    assert_eq!(stored.login_attempts, MAX_LOGIN_ATTEMPTS);
    let lock_until = stored.lock_until.expect("account should be locked again");
    let expected = now + Duration::minutes(LOCK_DURATION_MINUTES);
    assert!((expected - lock_until).num_seconds().abs() < 5);
}

#[tokio::test]
async fn test_increment_keeps_a_live_lock() {
    let (_service, storage, _dir) = create_test_service().await;

    let snapshot = storage.find_admin_by_email(EMAIL).await.unwrap().unwrap();
    let live_lock = Utc::now() + Duration::minutes(10);
    set_lock_state(&storage, MAX_LOGIN_ATTEMPTS as i32, Some(live_lock)).await;

    storage.record_failed_login(&snapshot, Utc::now()).await.unwrap();

    let stored = storage.find_admin_by_email(EMAIL).await.unwrap().unwrap();
    assert_eq!(stored.login_attempts, MAX_LOGIN_ATTEMPTS + 1);
    let lock_until = stored.lock_until.expect("lock should remain");
    assert!((lock_until - live_lock).num_seconds().abs() < 1);
}
