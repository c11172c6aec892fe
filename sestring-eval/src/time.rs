//! The macro time register and calendar helpers.
//!
//! Time placeholders read the "current macro time", which `settime` and
//! `setresettime` overwrite. The value travels in the evaluation context; a
//! [`MacroTimeRegister`] is the host boundary it is loaded from and stored to.
use chrono::{DateTime, Datelike, Duration, TimeZone, Timelike, Utc};
use once_cell::sync::Lazy;
use parking_lot::Mutex;
use sestring::expr::PlaceholderKind;

/// Host-side storage of the macro time.
pub trait MacroTimeRegister {
    fn load(&self) -> DateTime<Utc>;

    fn store(&self, time: DateTime<Utc>);
}

impl MacroTimeRegister for Mutex<DateTime<Utc>> {
    fn load(&self) -> DateTime<Utc> {
        *self.lock()
    }

    fn store(&self, time: DateTime<Utc>) {
        *self.lock() = time;
    }
}

static PROCESS_MACRO_TIME: Lazy<Mutex<DateTime<Utc>>> = Lazy::new(|| Mutex::new(Utc::now()));

/// The process-wide register. Last writer wins.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessMacroTime;

impl MacroTimeRegister for ProcessMacroTime {
    fn load(&self) -> DateTime<Utc> {
        PROCESS_MACRO_TIME.load()
    }

    fn store(&self, time: DateTime<Utc>) {
        PROCESS_MACRO_TIME.store(time)
    }
}

/// Time of a Unix timestamp in seconds.
pub fn from_unix(seconds: i64) -> Option<DateTime<Utc>> {
    Utc.timestamp_opt(seconds, 0).single()
}

/// Next `hour:00:00` at or after `now`, on `weekday` (0 = Sunday, taken
/// modulo 7) when given. `None` for hours outside `0..24`.
pub fn next_reset(now: DateTime<Utc>, hour: i32, weekday: Option<i32>) -> Option<DateTime<Utc>> {
    let hour = u32::try_from(hour).ok().filter(|h| *h < 24)?;
    let mut candidate = now.date_naive().and_hms_opt(hour, 0, 0)?.and_utc();

    match weekday {
        Some(weekday) => {
            let today = now.weekday().num_days_from_sunday() as i64;
            let ahead = (weekday.rem_euclid(7) as i64 - today).rem_euclid(7);
            candidate += Duration::days(ahead);
            if candidate < now {
                candidate += Duration::days(7);
            }
        }
        None => {
            if candidate < now {
                candidate += Duration::days(1);
            }
        }
    }
    Some(candidate)
}

/// Value of a time placeholder at `time`. Weekdays count from 1 = Sunday;
/// unassigned placeholders and the stack color read as 0.
pub fn placeholder_value(kind: PlaceholderKind, time: DateTime<Utc>) -> i32 {
    match kind {
        PlaceholderKind::Millisecond => time.timestamp_subsec_millis() as i32,
        PlaceholderKind::Second => time.second() as i32,
        PlaceholderKind::Minute => time.minute() as i32,
        PlaceholderKind::Hour => time.hour() as i32,
        PlaceholderKind::Day => time.day() as i32,
        PlaceholderKind::Weekday => time.weekday().num_days_from_sunday() as i32 + 1,
        PlaceholderKind::Month => time.month() as i32,
        PlaceholderKind::Year => time.year(),
        PlaceholderKind::Unassigned(_) | PlaceholderKind::StackColor => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
    }

    #[test]
    fn daily_reset() {
        // 2024-03-05 is a Tuesday.
        let now = at(2024, 3, 5, 16, 30);
        assert_eq!(next_reset(now, 15, None), Some(at(2024, 3, 6, 15, 0)));
        assert_eq!(next_reset(now, 17, None), Some(at(2024, 3, 5, 17, 0)));
        assert_eq!(next_reset(at(2024, 3, 5, 15, 0), 15, None), Some(at(2024, 3, 5, 15, 0)));
        assert_eq!(next_reset(now, 24, None), None);
        assert_eq!(next_reset(now, -1, None), None);
    }

    #[test]
    fn weekly_reset() {
        let now = at(2024, 3, 5, 16, 30);
        // Tuesday 08:00 already passed this week.
        assert_eq!(next_reset(now, 8, Some(2)), Some(at(2024, 3, 12, 8, 0)));
        // Sunday, and 7 is Sunday again.
        assert_eq!(next_reset(now, 0, Some(0)), Some(at(2024, 3, 10, 0, 0)));
        assert_eq!(next_reset(now, 0, Some(7)), Some(at(2024, 3, 10, 0, 0)));
    }

    #[test]
    fn placeholders() {
        let time = at(2024, 3, 10, 9, 41);
        assert_eq!(placeholder_value(PlaceholderKind::Weekday, time), 1);
        assert_eq!(placeholder_value(PlaceholderKind::Month, time), 3);
        assert_eq!(placeholder_value(PlaceholderKind::Year, time), 2024);
        assert_eq!(placeholder_value(PlaceholderKind::Minute, time), 41);
        assert_eq!(placeholder_value(PlaceholderKind::Unassigned(2), time), 0);
    }

    #[test]
    fn register_roundtrip() {
        let register = Mutex::new(at(2000, 1, 1, 0, 0));
        register.store(at(2024, 1, 1, 0, 0));
        assert_eq!(register.load(), at(2024, 1, 1, 0, 0));
    }
}
