//! 时间格式化模块
//!
//! 服务端返回的时间有两种写法：
//! - RFC 3339（如 `2024-01-05T09:30:00Z`）
//! - SQLite `CURRENT_TIMESTAMP` 风格（如 `2024-01-05 09:30:00`，视为 UTC）
//!
//! 这里统一解析并格式化为界面上展示的形式。

use chrono::{DateTime, NaiveDateTime, Utc};

const NAIVE_FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S%.f"];

/// 界面展示格式：`Jan 5, 2024, 09:30 AM`
const DISPLAY_FORMAT: &str = "%b %-d, %Y, %I:%M %p";
/// 仅日期：`1/5/2024`
const DAY_FORMAT: &str = "%-m/%-d/%Y";

/// 解析服务端时间字符串
///
/// 返回 None 如果所有格式都不匹配
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| naive.and_utc())
}

/// 格式化为展示字符串，无法解析时原样返回
pub fn format_timestamp(raw: &str) -> String {
    parse_timestamp(raw)
        .map(|dt| dt.format(DISPLAY_FORMAT).to_string())
        .unwrap_or_else(|| raw.to_string())
}

/// 只格式化日期部分；缺失时返回 `Never`
pub fn format_day(raw: Option<&str>) -> String {
    match raw {
        Some(raw) => parse_timestamp(raw)
            .map(|dt| dt.format(DAY_FORMAT).to_string())
            .unwrap_or_else(|| raw.to_string()),
        None => "Never".to_string(),
    }
}

/// 当前时间的 RFC 3339 字符串（用于本地乐观更新 `solved_at`）
pub fn now_rfc3339() -> String {
    Utc::now().to_rfc3339()
}
