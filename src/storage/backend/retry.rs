//! 数据库重试策略
//!
//! 读操作与绝对赋值的写操作可以安全重放；自增、插入、删除、取反等
//! 写操作只在确定语句没有生效时重放：连接池取连接失败、SQLite BUSY/LOCKED、
//! 死锁或序列化失败导致的语句回滚。执行中途断开的连接无法判断是否已提交，不重放。

use sea_orm::DbErr;
use sea_orm::error::RuntimeErr;
use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, warn};

/// 瞬时错误的分类
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transient {
    /// 语句未发出（取连接失败）
    NotSent,
    /// 语句被数据库拒绝或回滚（BUSY、死锁、序列化失败）
    RolledBack,
    /// 连接在执行过程中出错，结果未知
    Interrupted,
}

/// 操作可以重放的程度
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Replay {
    /// 重复执行结果相同
    Idempotent,
    /// 重复执行会叠加效果，只在语句确定未生效时重放
    OnlyIfNotApplied,
}

impl Replay {
    fn allows(self, kind: Transient) -> bool {
        match self {
            Replay::Idempotent => true,
            Replay::OnlyIfNotApplied => kind != Transient::Interrupted,
        }
    }
}

/// 对数据库错误分类，非瞬时错误返回 None
pub fn classify(err: &DbErr) -> Option<Transient> {
    match err {
        DbErr::ConnectionAcquire(_) => Some(Transient::NotSent),
        DbErr::Conn(_) => Some(Transient::Interrupted),
        DbErr::Exec(runtime) | DbErr::Query(runtime) => {
            is_rollback(runtime).then_some(Transient::RolledBack)
        }
        _ => None,
    }
}

// MySQL 1213/1205，PostgreSQL 40001/40P01，SQLite 5 (BUSY) / 6 (LOCKED)
const ROLLBACK_CODES: [&str; 6] = ["1213", "1205", "40001", "40P01", "5", "6"];

fn is_rollback(err: &RuntimeErr) -> bool {
    match err {
        RuntimeErr::SqlxError(sqlx_err) => {
            use std::ops::Deref;
            if let Some(code) = sqlx_err.deref().as_database_error().and_then(|e| e.code()) {
                return ROLLBACK_CODES.contains(&code.as_ref());
            }
            mentions_rollback(&sqlx_err.to_string())
        }
        RuntimeErr::Internal(msg) => mentions_rollback(msg),
        #[allow(unreachable_patterns)]
        _ => false,
    }
}

fn mentions_rollback(message: &str) -> bool {
    let message = message.to_lowercase();
    ["deadlock", "lock wait timeout", "database is locked", "serialization failure"]
        .iter()
        .any(|needle| message.contains(needle))
}

#[derive(Clone, Copy, Debug)]
pub struct RetryConfig {
    pub max_retries: u32,
    pub base_delay_ms: u64,
    pub max_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay_ms: 100,
            max_delay_ms: 2000,
        }
    }
}

/// 按 [`Replay`] 策略执行并在瞬时错误时指数退避重试
pub async fn run<T, F, Fut>(
    operation_name: &str,
    config: RetryConfig,
    replay: Replay,
    mut operation: F,
) -> Result<T, DbErr>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, DbErr>>,
{
    let mut attempt = 0;
    loop {
        let err = match operation().await {
            Ok(value) => {
                if attempt > 0 {
                    debug!("'{}' succeeded after {} retries", operation_name, attempt);
                }
                return Ok(value);
            }
            Err(err) => err,
        };

        let kind = classify(&err);
        let retryable = kind.is_some_and(|kind| replay.allows(kind));
        if !retryable || attempt >= config.max_retries {
            if kind == Some(Transient::Interrupted) && replay == Replay::OnlyIfNotApplied {
                warn!("'{}' lost its connection mid-statement, not replaying: {}", operation_name, err);
            }
            return Err(err);
        }

        attempt += 1;
        let delay = backoff_ms(attempt, config);
        warn!(
            "'{}' failed ({:?}, attempt {}/{}): {}; retrying in {} ms",
            operation_name,
            kind,
            attempt,
            config.max_retries + 1,
            err,
            delay
        );
        sleep(Duration::from_millis(delay)).await;
    }
}

/// 读操作与绝对赋值写操作
pub async fn with_retry<T, F, Fut>(
    operation_name: &str,
    config: RetryConfig,
    operation: F,
) -> Result<T, DbErr>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, DbErr>>,
{
    run(operation_name, config, Replay::Idempotent, operation).await
}

/// 插入、自增、删除、取反
pub async fn with_write_retry<T, F, Fut>(
    operation_name: &str,
    config: RetryConfig,
    operation: F,
) -> Result<T, DbErr>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, DbErr>>,
{
    run(operation_name, config, Replay::OnlyIfNotApplied, operation).await
}

/// base * 2^(attempt-1)，封顶 max，再加 0-25% 抖动
fn backoff_ms(attempt: u32, config: RetryConfig) -> u64 {
    use rand::RngExt;
    let capped = config
        .base_delay_ms
        .saturating_mul(2u64.saturating_pow(attempt.saturating_sub(1)))
        .min(config.max_delay_ms);
    capped.saturating_add(rand::rng().random_range(0..=capped / 4))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn fast() -> RetryConfig {
        RetryConfig {
            max_retries: 3,
            base_delay_ms: 1,
            max_delay_ms: 5,
        }
    }

    fn lost_connection() -> DbErr {
        DbErr::Conn(RuntimeErr::Internal("connection reset by peer".into()))
    }

    #[test]
    fn test_classify() {
        assert_eq!(
            classify(&DbErr::ConnectionAcquire(sea_orm::error::ConnAcquireErr::Timeout)),
            Some(Transient::NotSent)
        );
        assert_eq!(classify(&lost_connection()), Some(Transient::Interrupted));
        assert_eq!(
            classify(&DbErr::Exec(RuntimeErr::Internal("database is locked".into()))),
            Some(Transient::RolledBack)
        );
        assert_eq!(
            classify(&DbErr::Query(RuntimeErr::Internal(
                "Deadlock found when trying to get lock".into()
            ))),
            Some(Transient::RolledBack)
        );
        assert_eq!(classify(&DbErr::RecordNotFound("x".into())), None);
    }

    #[test]
    fn test_backoff_grows_and_caps() {
        let config = RetryConfig::default();
        assert!((100..=125).contains(&backoff_ms(1, config)));
        assert!((400..=500).contains(&backoff_ms(3, config)));
        assert!((2000..=2500).contains(&backoff_ms(10, config)));
    }

    #[tokio::test]
    async fn test_idempotent_operation_replays_after_lost_connection() {
        let calls = AtomicU32::new(0);
        let result = with_retry("read", fast(), || {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            async move { if n == 0 { Err(lost_connection()) } else { Ok(7) } }
        })
        .await;

        assert_eq!(result.unwrap(), 7);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_write_is_not_replayed_after_lost_connection() {
        let calls = AtomicU32::new(0);
        let result = with_write_retry("increment", fast(), || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err::<u64, _>(lost_connection()) }
        })
        .await;

        assert!(matches!(result, Err(DbErr::Conn(_))));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_write_replays_when_statement_was_not_applied() {
        let calls = AtomicU32::new(0);
        let result = with_write_retry("increment", fast(), || {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            async move {
                match n {
                    0 => Err(DbErr::ConnectionAcquire(sea_orm::error::ConnAcquireErr::Timeout)),
                    1 => Err(DbErr::Exec(RuntimeErr::Internal("database is locked".into()))),
                    _ => Ok(1),
                }
            }
        })
        .await;

        assert_eq!(result.unwrap(), 1);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_gives_up_after_max_retries() {
        let calls = AtomicU32::new(0);
        let result = with_retry("read", fast(), || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err::<u64, _>(DbErr::ConnectionAcquire(sea_orm::error::ConnAcquireErr::Timeout)) }
        })
        .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 4);
    }

    #[tokio::test]
    async fn test_permanent_error_is_returned_immediately() {
        let calls = AtomicU32::new(0);
        let result = with_retry("read", fast(), || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err::<u64, _>(DbErr::RecordNotFound("gone".into())) }
        })
        .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
