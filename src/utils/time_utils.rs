// time_utils.rs
//
// 提供時間轉換相關的工具函數，用於在系統不同層之間轉換時間格式。
// 主要功能：
// 1. 將上游導出的本地樸素時間戳正規化為帶有明確 UTC 偏移的 ISO-8601 格式
// 2. 從已正規化的時間戳中提取日曆日期
// 3. 提供快照 ID 使用的緊湊日期格式

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};

/// 上游 CSV 中的樸素時間戳格式（空格或 T 分隔日期與時間）
const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

/// 解析樸素時間戳（"YYYY-MM-DD HH:MM:SS" 或 "YYYY-MM-DDTHH:MM:SS"）為 DateTime<Utc>
///
/// 上游導出不帶時區信息，按約定視為 UTC。
pub fn parse_naive_timestamp(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    for fmt in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }
    None
}

/// 將 DateTime<Utc> 格式化為帶明確 "+00:00" 偏移的 ISO-8601 字符串
pub fn to_iso_utc(dt: &DateTime<Utc>) -> String {
    dt.format("%Y-%m-%dT%H:%M:%S+00:00").to_string()
}

/// 將樸素時間戳正規化為 ISO-8601 UTC 形式
pub fn normalize_naive_timestamp(s: &str) -> Option<String> {
    parse_naive_timestamp(s).map(|dt| to_iso_utc(&dt))
}

/// 從 ISO-8601 時間戳中提取 UTC 日曆日期
pub fn date_of_iso_timestamp(s: &str) -> Option<NaiveDate> {
    let date_part = s.get(..10)?;
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()
}

/// 快照 ID 使用的緊湊日期形式（"2026-02-02" -> "20260202"）
pub fn compact_date(date: &NaiveDate) -> String {
    date.format("%Y%m%d").to_string()
}
