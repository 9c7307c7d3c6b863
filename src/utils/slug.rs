//! Slug 生成
//!
//! `name` → 小写、去除特殊字符、空白/下划线/连字符折叠为单个 `-`，
//! 再追加 `-<base36 毫秒时间戳>`。时间戳在进程内严格递增，
//! 同名酒店在同一进程内总能得到不同的 slug。

use std::sync::atomic::{AtomicU64, Ordering};

/// 名称中没有任何可用字符时的兜底前缀
pub const FALLBACK_SLUG_BASE: &str = "hostel";

static LAST_SLUG_MILLIS: AtomicU64 = AtomicU64::new(0);

/// 将名称规整为 slug 主体（不含时间戳后缀）
pub fn slugify(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut pending_separator = false;

    for c in name.chars().flat_map(char::to_lowercase) {
        let is_word = c.is_ascii_alphanumeric();
        let is_separator = c.is_whitespace() || c == '_' || c == '-';

        if is_separator {
            pending_separator = true;
        } else if is_word {
            if pending_separator && !out.is_empty() {
                out.push('-');
            }
            pending_separator = false;
            out.push(c);
        }
        // 其他字符直接丢弃，不影响分隔符状态
    }

    out
}

/// 进程内单调递增的毫秒时间戳
fn next_slug_millis() -> u64 {
    let now = chrono::Utc::now().timestamp_millis().max(0) as u64;
    let mut last = LAST_SLUG_MILLIS.load(Ordering::Relaxed);
    loop {
        let next = now.max(last + 1);
        match LAST_SLUG_MILLIS.compare_exchange_weak(last, next, Ordering::AcqRel, Ordering::Relaxed)
        {
            Ok(_) => return next,
            Err(current) => last = current,
        }
    }
}

/// 小写 base-36 编码
pub fn to_base36(mut value: u64) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if value == 0 {
        return "0".to_string();
    }
    let mut buf = Vec::with_capacity(13);
    while value > 0 {
        buf.push(DIGITS[(value % 36) as usize]);
        value /= 36;
    }
    buf.reverse();
    String::from_utf8(buf).unwrap_or_default()
}

/// 为酒店名称生成唯一 slug
pub fn generate_slug(name: &str) -> String {
    let base = slugify(name);
    let base = if base.is_empty() {
        FALLBACK_SLUG_BASE.to_string()
    } else {
        base
    };
    format!("{}-{}", base, to_base36(next_slug_millis()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_slugify_basic() {
        assert_eq!(slugify("Kathmandu Backpackers"), "kathmandu-backpackers");
        assert_eq!(slugify("  Zostel -- Thamel__Inn  "), "zostel-thamel-inn");
        assert_eq!(slugify("Hotel & Hostel!"), "hotel-hostel");
        assert_eq!(slugify("---"), "");
    }

    #[test]
    fn test_slugify_drops_non_ascii_letters() {
        assert_eq!(slugify("Café Pokhara"), "caf-pokhara");
        assert_eq!(slugify("काठमाडौं"), "");
    }

    #[test]
    fn test_base36() {
        assert_eq!(to_base36(0), "0");
        assert_eq!(to_base36(35), "z");
        assert_eq!(to_base36(36), "10");
        assert_eq!(to_base36(1_700_000_000_000), "loyw3v28");
    }

    #[test]
    fn test_generate_slug_is_unique_for_same_name() {
        let slugs: HashSet<String> = (0..200)
            .map(|_| generate_slug("Kathmandu Backpackers"))
            .collect();
        assert_eq!(slugs.len(), 200);
        assert!(slugs.iter().all(|s| s.starts_with("kathmandu-backpackers-")));
    }

    #[test]
    fn test_generate_slug_fallback_base() {
        let slug = generate_slug("!!!");
        assert!(slug.starts_with("hostel-"));
    }
}
