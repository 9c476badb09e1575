//! Duration parsing and rendering for scheduler resource limits.

/// Parse `h:m:s`, `m:s` or plain seconds into seconds.
///
/// Returns None for empty strings, non-numeric parts, more than three parts
/// or totals that overflow `u64`.
pub fn parse_time(s: &str) -> Option<u64> {
    let parts: Vec<u64> = s
        .trim()
        .split(':')
        .map(|p| p.parse().ok())
        .collect::<Option<_>>()?;

    match parts.as_slice() {
        [secs] => Some(*secs),
        [mins, secs] => mins.checked_mul(60)?.checked_add(*secs),
        [hours, mins, secs] => hours
            .checked_mul(3600)?
            .checked_add(mins.checked_mul(60)?)?
            .checked_add(*secs),
        _ => None,
    }
}

/// Format seconds as `h:mm:ss`.
pub fn repr_time(seconds: u64) -> String {
    let hours = seconds / 3600;
    let mins = (seconds / 60) % 60;
    let secs = seconds % 60;
    format!("{}:{:02}:{:02}", hours, mins, secs)
}

/// Format seconds as `h:mmh`, rounded to whole minutes.
///
/// Infinite durations print as `inf`.
pub fn repr_time_mins(seconds: f64) -> String {
    if seconds.is_infinite() {
        return "inf".to_string();
    }
    let minutes = (seconds / 60.0).round_ties_even() as u64;
    format!("{}:{:02}h", minutes / 60, minutes % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_time() {
        assert_eq!(parse_time("42"), Some(42));
        assert_eq!(parse_time("2:30"), Some(150));
        assert_eq!(parse_time("1:00:00"), Some(3600));
        assert_eq!(parse_time("10:05:07"), Some(36307));
        assert_eq!(parse_time(""), None);
        assert_eq!(parse_time("1:2:3:4"), None);
        assert_eq!(parse_time("1:xx"), None);
    }

    #[test]
    fn test_parse_time_overflow() {
        assert_eq!(parse_time("6000000000000000:0:0"), None);
        assert_eq!(parse_time("0:307445734561825861:0"), None);
        assert_eq!(parse_time("0:0:18446744073709551615"), Some(u64::MAX));
        assert_eq!(parse_time("1:18446744073709551615"), None);
        assert_eq!(parse_time("18446744073709551616"), None);
    }

    #[test]
    fn test_repr_time() {
        assert_eq!(repr_time(0), "0:00:00");
        assert_eq!(repr_time(59), "0:00:59");
        assert_eq!(repr_time(3661), "1:01:01");
        assert_eq!(repr_time(100 * 3600), "100:00:00");
    }

    #[test]
    fn test_repr_time_mins() {
        assert_eq!(repr_time_mins(0.0), "0:00h");
        assert_eq!(repr_time_mins(3600.0), "1:00h");
        assert_eq!(repr_time_mins(5430.0), "1:30h");
        assert_eq!(repr_time_mins(89.0), "0:01h");
        assert_eq!(repr_time_mins(f64::INFINITY), "inf");
    }
}
