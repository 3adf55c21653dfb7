use chrono::{prelude::*, SecondsFormat};
use chrono_tz::Tz;

/// Timezone the festival takes place in, used for every date shown to users
pub const FESTIVAL_TIMEZONE: Tz = chrono_tz::Europe::Paris;

fn to_datetime(ts_millis: i64) -> Option<DateTime<Utc>> {
    Utc.timestamp_millis_opt(ts_millis).single()
}

/// `2024-07-12T18:30:00.000Z`
pub fn format_rfc3339(ts_millis: i64) -> String {
    match to_datetime(ts_millis) {
        Some(dt) => dt.to_rfc3339_opts(SecondsFormat::Millis, true),
        None => ts_millis.to_string(),
    }
}

/// `12/07/2024 20:30` in the given timezone
pub fn format_local(ts_millis: i64, tz: Tz) -> String {
    match to_datetime(ts_millis) {
        Some(dt) => dt.with_timezone(&tz).format("%d/%m/%Y %H:%M").to_string(),
        None => ts_millis.to_string(),
    }
}

#[cfg(test)]
mod test {
    use super::*;

    // Fri Jul 12 2024 18:30:00 UTC
    const TS: i64 = 1720809000000;

    #[test]
    fn formats_rfc3339_in_utc() {
        assert_eq!(format_rfc3339(TS), "2024-07-12T18:30:00.000Z");
    }

    #[test]
    fn formats_in_festival_timezone() {
        // Summer time in Paris is UTC+2
        assert_eq!(format_local(TS, FESTIVAL_TIMEZONE), "12/07/2024 20:30");
        assert_eq!(format_local(TS, chrono_tz::UTC), "12/07/2024 18:30");
    }
}
