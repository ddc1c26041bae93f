use crate::domain::market_data::Timeframe;
use chrono::{DateTime, Utc};

/// Format a candle time for the x-axis, in UTC.
///
/// - intraday timeframes -> `HH:MM`
/// - `1D` to `3M` -> `Mon D`
/// - `1Y` -> `Mon YY`
pub fn format_time_label(timestamp_ms: u64, timeframe: Timeframe) -> String {
    let Some(date) = to_datetime(timestamp_ms) else {
        return String::new();
    };
    let pattern = match timeframe {
        tf if tf.is_intraday() => "%H:%M",
        Timeframe::OneYear => "%b %y",
        _ => "%b %-d",
    };
    date.format(pattern).to_string()
}

/// Full timestamp for tooltips and logs, e.g. `2024-01-01 09:30`.
pub fn format_timestamp(timestamp_ms: u64) -> String {
    to_datetime(timestamp_ms)
        .map(|date| date.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_default()
}

fn to_datetime(timestamp_ms: u64) -> Option<DateTime<Utc>> {
    i64::try_from(timestamp_ms).ok().and_then(DateTime::<Utc>::from_timestamp_millis)
}

/// Align a wall-clock time down to the start of its timeframe bucket.
pub fn align_to_step(timestamp_ms: u64, step_ms: u64) -> u64 {
    if step_ms == 0 { timestamp_ms } else { timestamp_ms - timestamp_ms % step_ms }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn epoch_is_midnight_january_first() {
        assert_eq!(format_time_label(0, Timeframe::OneHour), "00:00");
        assert_eq!(format_time_label(0, Timeframe::OneDay), "Jan 1");
        assert_eq!(format_time_label(0, Timeframe::OneYear), "Jan 70");
        assert_eq!(format_timestamp(0), "1970-01-01 00:00");
    }

    #[test]
    fn align_truncates_to_bucket() {
        assert_eq!(align_to_step(3_723_000, 3_600_000), 3_600_000);
        assert_eq!(align_to_step(42, 0), 42);
    }
}
