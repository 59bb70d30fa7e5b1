use chrono::{Local, TimeZone};

/// 获取当前 UTC 时间戳（毫秒）
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// 将毫秒时间戳格式化为本地时间 `YYYY-MM-DD HH:MM:SS`
///
/// Out-of-range timestamps yield an empty string.
pub fn format_millis(millis: i64) -> String {
    Local
        .timestamp_millis_opt(millis)
        .single()
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_millis_shape() {
        let s = format_millis(now_millis());
        assert_eq!(s.len(), 19);
        assert_eq!(&s[4..5], "-");
        assert_eq!(&s[10..11], " ");
        assert_eq!(&s[13..14], ":");
    }

    #[test]
    fn test_format_millis_out_of_range() {
        assert_eq!(format_millis(i64::MAX), "");
    }
}
