/*!
 * Fixed-precision time arithmetic for subtitle timestamps.
 *
 * Timestamps are held as integer milliseconds (`Seconds`) so that sums and
 * differences over hundreds of captions never drift. Conversion to and from
 * the `HH:MM:SS,mmm` text form happens only at the edges.
 */

use std::fmt;

use crate::errors::TimeError;

/// Seconds with exactly three fractional digits, stored as milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Seconds {
    millis: i64,
}

impl Seconds {
    /// Zero seconds
    pub const ZERO: Seconds = Seconds { millis: 0 };

    /// Create a value from integer milliseconds
    pub fn from_millis(millis: i64) -> Self {
        Self { millis }
    }

    /// Create a value from whole seconds
    pub fn from_whole_secs(secs: u64) -> Self {
        Self { millis: (secs as i64).saturating_mul(1000) }
    }

    /// Convert a float number of seconds, rounding to the millisecond.
    /// Returns `None` for NaN, infinities and values too large to hold.
    pub fn from_secs_f64(value: f64) -> Option<Self> {
        round_decimal_millis(value).map(Self::from_millis)
    }

    /// Integer milliseconds
    pub fn as_millis(self) -> i64 {
        self.millis
    }

    /// Float seconds
    pub fn as_secs_f64(self) -> f64 {
        self.millis as f64 / 1000.0
    }

    /// Largest whole second not after this value
    pub fn floor_secs(self) -> i64 {
        self.millis.div_euclid(1000)
    }

    /// Smallest whole second not before this value
    pub fn ceil_secs(self) -> i64 {
        let floor = self.millis.div_euclid(1000);
        if self.millis.rem_euclid(1000) == 0 { floor } else { floor + 1 }
    }
}

impl fmt::Display for Seconds {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let sign = if self.millis < 0 { "-" } else { "" };
        let abs = self.millis.unsigned_abs();
        write!(f, "{}{}.{:03}", sign, abs / 1000, abs % 1000)
    }
}

/// Parse an `HH:MM:SS,mmm` timestamp into seconds.
///
/// The millisecond component is read as a decimal fraction, so `,5` is half a
/// second and `,0005` rounds to the nearest millisecond. A blank timestamp
/// yields `Ok(None)`: zero is a real position on the timeline and must not
/// stand in for a missing value.
pub fn to_seconds(timestamp: &str) -> Result<Option<Seconds>, TimeError> {
    let trimmed = timestamp.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    let parts: Vec<&str> = trimmed.split(&[':', ',', '.'][..]).collect();
    if parts.len() != 4 {
        return Err(parse_error(
            timestamp,
            format!("expected hours:minutes:seconds,millis but found {} component(s)", parts.len()),
        ));
    }

    let hours = parse_whole(timestamp, parts[0], "hours")?;
    let minutes = parse_whole(timestamp, parts[1], "minutes")?;
    let seconds = parse_whole(timestamp, parts[2], "seconds")?;
    let fraction = parse_fraction(timestamp, parts[3])?;

    let whole = hours
        .checked_mul(3600)
        .and_then(|h| minutes.checked_mul(60).and_then(|m| h.checked_add(m)))
        .and_then(|hm| hm.checked_add(seconds))
        .and_then(|s| i64::try_from(s).ok())
        .and_then(|s| s.checked_mul(1000))
        .and_then(|ms| ms.checked_add(fraction))
        .ok_or_else(|| parse_error(timestamp, "value out of range".to_string()))?;

    Ok(Some(Seconds::from_millis(whole)))
}

/// Render seconds as an `HH:MM:SS,mmm` timestamp. Hours are not wrapped;
/// negative values are clamped to zero.
pub fn to_timestamp(seconds: Seconds) -> String {
    let millis = seconds.as_millis().max(0) as u64;
    let total_secs = millis / 1000;
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let secs = total_secs - hours * 3600 - minutes * 60;

    format!("{:02}:{:02}:{:02},{:03}", hours, minutes, secs, millis % 1000)
}

/// Round a float to exactly three decimal digits.
///
/// Rounding works on the shortest decimal representation of the input, so a
/// value that already has three or fewer fractional digits is returned
/// unchanged (`1.005` stays `1.005`). Non-finite input is returned as is.
pub fn round_to_milli(value: f64) -> f64 {
    match round_decimal_millis(value) {
        Some(millis) => millis as f64 / 1000.0,
        None => value,
    }
}

/// Sum of two time values
pub fn add_seconds(a: Seconds, b: Seconds) -> Seconds {
    Seconds::from_millis(a.millis.saturating_add(b.millis))
}

/// Absolute difference of two time values.
///
/// The planner always subtracts an earlier cumulative removal from a later
/// timestamp, so the result is never signed. Use [`sub_seconds_signed`] when
/// the sign matters.
pub fn sub_seconds(a: Seconds, b: Seconds) -> Seconds {
    Seconds::from_millis(a.millis.saturating_sub(b.millis).saturating_abs())
}

/// Signed difference `a - b`
pub fn sub_seconds_signed(a: Seconds, b: Seconds) -> Seconds {
    Seconds::from_millis(a.millis.saturating_sub(b.millis))
}

fn parse_error(timestamp: &str, reason: String) -> TimeError {
    TimeError::ParseError {
        timestamp: timestamp.to_string(),
        reason,
    }
}

fn parse_whole(timestamp: &str, part: &str, name: &str) -> Result<u64, TimeError> {
    let part = part.trim();
    if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
        return Err(parse_error(timestamp, format!("{} component '{}' is not a number", name, part)));
    }
    part.parse()
        .map_err(|e| parse_error(timestamp, format!("{} component '{}': {}", name, part, e)))
}

// Reads "5" as 500ms, "05" as 50ms, "0505" as 51ms (half away from zero).
fn parse_fraction(timestamp: &str, part: &str) -> Result<i64, TimeError> {
    let part = part.trim();
    if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
        return Err(parse_error(timestamp, format!("milliseconds component '{}' is not a number", part)));
    }
    Ok(decimal_digits_to_millis(part))
}

fn decimal_digits_to_millis(digits: &str) -> i64 {
    let digits: Vec<i64> = digits.bytes().map(|b| i64::from(b - b'0')).collect();
    let mut millis = 0;
    for i in 0..3 {
        millis = millis * 10 + digits.get(i).copied().unwrap_or(0);
    }
    if digits.get(3).is_some_and(|d| *d >= 5) {
        millis += 1;
    }
    millis
}

fn round_decimal_millis(value: f64) -> Option<i64> {
    if !value.is_finite() {
        return None;
    }

    // f64 Display never uses exponent notation and gives the shortest
    // representation that round-trips
    let repr = format!("{}", value.abs());
    let (whole, fraction) = repr.split_once('.').unwrap_or((repr.as_str(), ""));
    let whole: i64 = whole.parse().ok()?;
    let millis = whole.checked_mul(1000)?.checked_add(decimal_digits_to_millis(fraction))?;

    Some(if value.is_sign_negative() { -millis } else { millis })
}
