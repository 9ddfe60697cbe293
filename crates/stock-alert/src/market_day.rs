//! Trading-day arithmetic
//!
//! Markets are assumed open Monday through Friday. Holidays are not modeled,
//! so a lookback that lands on one will miss in the price series.

use chrono::{DateTime, Datelike, Duration, NaiveDate, TimeZone, Utc};

use crate::error::{AlertError, Result};

/// Shift for the most recent completed trading day
pub const YESTERDAY: u32 = 1;

/// Shift for the trading day before [`YESTERDAY`]
pub const DAY_BEFORE_YESTERDAY: u32 = 2;

/// Source of the current instant
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock frozen at a given instant
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Current time in the market's local timezone
pub fn market_now<Tz: TimeZone>(clock: &dyn Clock, tz: &Tz) -> DateTime<Tz> {
    clock.now().with_timezone(tz)
}

/// Calendar date `shift` trading days before `now`.
///
/// `now` must already be in the market's timezone. Only shifts of 1 and 2 are
/// supported; a longer lookback could straddle a weekend in ways this rule
/// does not cover.
pub fn trading_day_before<Tz: TimeZone>(now: &DateTime<Tz>, shift: u32) -> Result<NaiveDate> {
    if !(YESTERDAY..=DAY_BEFORE_YESTERDAY).contains(&shift) {
        return Err(AlertError::InvalidArgument(format!(
            "trading day shift must be 1 or 2, got {shift}"
        )));
    }

    // Monday = 0 .. Sunday = 6
    let days_back = match now.weekday().num_days_from_monday() {
        2..=5 => shift,
        1 if shift == YESTERDAY => shift,
        0 | 1 => shift + 2,
        _ => shift + 1,
    };

    Ok(now.date_naive() - Duration::days(i64::from(days_back)))
}
