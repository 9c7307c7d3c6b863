use chrono::{DateTime, Duration, Utc};

#[derive(Debug, Clone)]
pub struct TimeParser;

impl TimeParser {
    /// 解析相对时长字符串，支持：
    /// - 单个单位：30m, 12h, 7d, 2w
    /// - 组合格式：1d12h, 1h30m
    pub fn parse_duration(input: &str) -> Result<Duration, String> {
        let input = input.trim();
        let mut total_duration = Duration::zero();
        let mut remaining = input;

        while !remaining.is_empty() {
            // 提取数字
            let digits_len = remaining
                .find(|c: char| !c.is_ascii_digit())
                .unwrap_or(remaining.len());
            let num_str = &remaining[..digits_len];

            if num_str.is_empty() {
                return Err(format!("Invalid duration format: '{}'", input));
            }

            let num: i64 = num_str
                .parse()
                .map_err(|_| format!("Invalid number: '{}'", num_str))?;
            remaining = &remaining[digits_len..];

            // 提取单位
            let unit_len = remaining
                .find(|c: char| !c.is_alphabetic())
                .unwrap_or(remaining.len());
            let unit_str = &remaining[..unit_len];

            if unit_str.is_empty() {
                return Err(format!("Missing time unit after '{}'", num));
            }

            let duration = match unit_str {
                "s" | "sec" | "second" | "seconds" => Duration::seconds(num),
                "m" | "min" | "minute" | "minutes" => Duration::minutes(num),
                "h" | "hour" | "hours" => Duration::hours(num),
                "d" | "day" | "days" => Duration::days(num),
                "w" | "week" | "weeks" => Duration::weeks(num),
                _ => return Err(format!("Unsupported time unit: '{}'", unit_str)),
            };

            total_duration += duration;
            remaining = &remaining[unit_len..];
        }

        if total_duration == Duration::zero() {
            return Err("Duration must be greater than zero".to_string());
        }

        Ok(total_duration)
    }

    /// 格式化持续时间为人类可读的字符串
    pub fn format_duration_human(from: DateTime<Utc>, to: DateTime<Utc>) -> String {
        let duration = to.signed_duration_since(from);

        if duration.num_seconds() < 0 {
            return "0s".to_string();
        }

        let days = duration.num_days();
        let hours = (duration.num_seconds() % 86400) / 3600;
        let minutes = (duration.num_seconds() % 3600) / 60;

        if days > 0 {
            format!("{}d {}h", days, hours)
        } else if hours > 0 {
            format!("{}h {}m", hours, minutes)
        } else if minutes > 0 {
            format!("{}m", minutes)
        } else {
            format!("{}s", duration.num_seconds())
        }
    }
}
