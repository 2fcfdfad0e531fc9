//! Timestamp parsing, validation, and relative-time display.
//!
//! Frontmatter dates are Temporal / RFC 9557 strings. Two shapes are accepted:
//!
//! ```text
//! 2024-03-01T10:00:00-05:00                     # explicit offset (or Z)
//! 2024-03-01T10:00:00-05:00[America/New_York]   # bracketed time zone
//! ```
//!
//! A string with neither an offset nor a bracketed zone is rejected: a wall
//! clock reading without a zone does not name an instant. A date with only a
//! bracketed zone (`2024-03-01[America/New_York]`) resolves to the start of
//! that day in the zone.
//!
//! Some inputs are refused rather than approximated. A numeric offset with
//! seconds (`+05:30:30`) cannot be written back out, since displayed offsets
//! stop at minutes. A calendar annotation other than `[u-ca=iso8601]` would
//! change what the date fields mean.
//!
//! A leap second (`23:59:60`) is read as `23:59:59` of the same minute, as
//! Temporal does. It is the one input whose written value is not kept exactly.
//!
//! [`parse_time`] is the only definition of "legal timestamp". [`is_valid_time`]
//! is derived from it so the build-time schema check and render-time parsing
//! can never disagree.
//!
//! ## Relative display
//!
//! [`print_time`] maps elapsed time onto a fixed ladder, first match wins:
//!
//! | Elapsed     | Output               |
//! |-------------|----------------------|
//! | < 1 minute  | `now`                |
//! | < 2 minutes | `1 minute ago`       |
//! | < 1 hour    | `N minutes ago`      |
//! | < 2 hours   | `1 hour ago`         |
//! | < 1 day     | `N hours ago`        |
//! | < 2 days    | `yesterday`          |
//! | < 7 days    | `N days ago`         |
//! | otherwise   | `at YYYY-MM-DD HH:MM`|
//!
//! Minutes and hours are truncated; days are rounded to the nearest whole day,
//! so 6 days 20 hours reads "7 days ago". The absolute fallback is rendered in
//! the instant's own zone, not the viewer's.
//!
//! Instants in the future are clamped to zero elapsed and read "now".

use jiff::civil::{Date, Time};
use jiff::fmt::temporal::{Pieces, PiecesOffset};
use jiff::tz::{Offset, TimeZone};
use jiff::{SignedDuration, Timestamp, Zoned};
use std::fmt;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TimeError {
    #[error("invalid datetime {input:?}: {source}")]
    Invalid { input: String, source: jiff::Error },
    #[error("datetime {0:?} has no UTC offset or time zone")]
    MissingZone(String),
    #[error("datetime {0:?} has a UTC offset with seconds")]
    SubMinuteOffset(String),
    #[error("datetime {input:?} uses unsupported calendar {calendar:?}")]
    UnsupportedCalendar { input: String, calendar: String },
}

/// A point in time pinned to a time zone or fixed UTC offset.
///
/// Constructed only by [`parse_time`]; never mutated afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct ZonedInstant(Zoned);

impl ZonedInstant {
    pub fn timestamp(&self) -> Timestamp {
        self.0.timestamp()
    }

    pub fn offset(&self) -> Offset {
        self.0.offset()
    }

    /// IANA name of the attached zone, `None` for fixed offsets.
    pub fn zone_name(&self) -> Option<&str> {
        self.0.time_zone().iana_name()
    }

    /// Civil date in the instant's own zone.
    pub fn date(&self) -> Date {
        self.0.date()
    }

    pub fn hour(&self) -> i8 {
        self.0.hour()
    }

    pub fn minute(&self) -> i8 {
        self.0.minute()
    }

    /// Milliseconds since the Unix epoch, as feed readers expect.
    pub fn epoch_millis(&self) -> i64 {
        self.0.timestamp().as_millisecond()
    }

    /// RFC 3339 form for HTML `datetime` attributes (no zone annotation).
    pub fn rfc3339(&self) -> String {
        self.0.strftime("%Y-%m-%dT%H:%M:%S%:z").to_string()
    }
}

impl fmt::Display for ZonedInstant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

fn invalid(input: &str, source: jiff::Error) -> TimeError {
    TimeError::Invalid {
        input: input.to_string(),
        source,
    }
}

/// Values of every `[u-ca=...]` annotation, critical (`[!u-ca=...]`) or not.
///
/// Only meaningful once the input is known to be syntactically valid.
fn calendar_annotations(input: &str) -> impl Iterator<Item = &str> {
    input
        .split('[')
        .skip(1)
        .filter_map(|part| part.split_once(']'))
        .filter_map(|(inner, _)| inner.trim_start_matches('!').strip_prefix("u-ca="))
}

/// Parse a zoned datetime string.
///
/// With a bracketed annotation, the zone is resolved against the tz database
/// and any explicit offset must agree with it. Without one, the explicit
/// offset becomes a fixed-offset zone (`Z` pins to UTC).
pub fn parse_time(input: &str) -> Result<ZonedInstant, TimeError> {
    let pieces = Pieces::parse(input).map_err(|e| invalid(input, e))?;

    if let Some(calendar) =
        calendar_annotations(input).find(|c| !c.eq_ignore_ascii_case("iso8601"))
    {
        return Err(TimeError::UnsupportedCalendar {
            input: input.to_string(),
            calendar: calendar.to_string(),
        });
    }

    if pieces.time_zone_annotation().is_some() {
        let zoned: Zoned = input.parse().map_err(|e| invalid(input, e))?;
        return Ok(ZonedInstant(zoned));
    }

    let tz = match pieces.offset() {
        None => return Err(TimeError::MissingZone(input.to_string())),
        Some(PiecesOffset::Numeric(numeric)) if numeric.offset().seconds() % 60 != 0 => {
            return Err(TimeError::SubMinuteOffset(input.to_string()));
        }
        Some(PiecesOffset::Numeric(numeric)) => TimeZone::fixed(numeric.offset()),
        Some(_) => TimeZone::UTC,
    };
    // An offset is only ever parsed after a time of day.
    let time = pieces.time().unwrap_or(Time::midnight());
    let zoned = pieces
        .date()
        .to_datetime(time)
        .to_zoned(tz)
        .map_err(|e| invalid(input, e))?;
    Ok(ZonedInstant(zoned))
}

/// Whether [`parse_time`] accepts `input`.
pub fn is_valid_time(input: &str) -> bool {
    parse_time(input).is_ok()
}

// ============================================================================
// Elapsed time
// ============================================================================

const NANOS_PER_DAY: i128 = 86_400 * 1_000_000_000;

/// Non-negative time elapsed between an instant and "now".
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Elapsed(SignedDuration);

impl Elapsed {
    /// Elapsed time from `instant` to `now`, clamped at zero for future instants.
    pub fn between(instant: &ZonedInstant, now: Timestamp) -> Self {
        let delta = now.as_duration() - instant.timestamp().as_duration();
        if delta.is_negative() {
            Elapsed(SignedDuration::ZERO)
        } else {
            Elapsed(delta)
        }
    }

    pub fn from_duration(duration: SignedDuration) -> Self {
        Elapsed(duration.max(SignedDuration::ZERO))
    }

    pub fn is_less_than(&self, threshold: SignedDuration) -> bool {
        self.0 < threshold
    }

    /// Whole minutes, truncated.
    pub fn whole_minutes(&self) -> i64 {
        self.0.as_secs() / 60
    }

    /// Whole hours, truncated.
    pub fn whole_hours(&self) -> i64 {
        self.0.as_secs() / 3600
    }

    /// Days rounded to the nearest whole day, halves rounding up.
    pub fn rounded_days(&self) -> i64 {
        ((self.0.as_nanos() + NANOS_PER_DAY / 2) / NANOS_PER_DAY) as i64
    }

    pub fn as_duration(&self) -> SignedDuration {
        self.0
    }
}

// ============================================================================
// Relative display
// ============================================================================

/// Render `instant` relative to `now`.
///
/// Callers pass the current instant explicitly; use [`print_time_now`] to read
/// the system clock.
pub fn print_time(instant: &ZonedInstant, now: Timestamp) -> String {
    let elapsed = Elapsed::between(instant, now);
    let minutes = SignedDuration::from_mins;
    let hours = SignedDuration::from_hours;

    if elapsed.is_less_than(minutes(1)) {
        return "now".to_string();
    }
    if elapsed.is_less_than(minutes(2)) {
        return "1 minute ago".to_string();
    }
    if elapsed.is_less_than(hours(1)) {
        return format!("{} minutes ago", elapsed.whole_minutes());
    }
    if elapsed.is_less_than(hours(2)) {
        return "1 hour ago".to_string();
    }
    if elapsed.is_less_than(hours(24)) {
        return format!("{} hours ago", elapsed.whole_hours());
    }
    if elapsed.is_less_than(hours(48)) {
        return "yesterday".to_string();
    }
    if elapsed.is_less_than(hours(7 * 24)) {
        return format!("{} days ago", elapsed.rounded_days());
    }
    format!(
        "at {} {:02}:{:02}",
        instant.date(),
        instant.hour(),
        instant.minute()
    )
}

/// [`print_time`] against the system clock, sampled once.
pub fn print_time_now(instant: &ZonedInstant) -> String {
    print_time(instant, Timestamp::now())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{ago, instant};

    fn relative(input: &str, elapsed: SignedDuration) -> String {
        let instant = instant(input);
        print_time(&instant, ago(&instant, elapsed))
    }

    // =========================================================================
    // parse_time
    // =========================================================================

    #[test]
    fn parse_explicit_offset() {
        let t = parse_time("2024-03-01T10:00:00-05:00").unwrap();
        assert_eq!(t.offset().seconds(), -5 * 3600);
        assert_eq!(t.hour(), 10);
        assert_eq!(t.zone_name(), None);
        assert_eq!(t.timestamp().as_second(), 1_709_305_200);
    }

    #[test]
    fn parse_zulu_pins_to_utc() {
        let t = parse_time("2024-01-01T09:30:00Z").unwrap();
        assert_eq!(t.offset(), Offset::UTC);
        assert_eq!(t.zone_name(), Some("UTC"));
    }

    #[test]
    fn parse_bracketed_zone() {
        let t = parse_time("2024-07-10T20:48:00-04:00[America/New_York]").unwrap();
        assert_eq!(t.zone_name(), Some("America/New_York"));
        assert_eq!(t.offset().seconds(), -4 * 3600);
    }

    #[test]
    fn parse_bracketed_zone_without_offset() {
        let t = parse_time("2024-01-15T08:00:00[Europe/Budapest]").unwrap();
        assert_eq!(t.offset().seconds(), 3600);
        assert_eq!(t.hour(), 8);
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!(matches!(
            parse_time("not-a-date"),
            Err(TimeError::Invalid { .. })
        ));
    }

    #[test]
    fn parse_rejects_month_thirteen() {
        assert!(parse_time("2024-13-01T00:00:00Z").is_err());
    }

    #[test]
    fn parse_rejects_day_out_of_range() {
        assert!(parse_time("2023-02-29T00:00:00Z").is_err());
    }

    #[test]
    fn parse_rejects_missing_zone() {
        assert!(matches!(
            parse_time("2024-03-01T10:00:00"),
            Err(TimeError::MissingZone(_))
        ));
        assert!(matches!(
            parse_time("2024-03-01"),
            Err(TimeError::MissingZone(_))
        ));
    }

    #[test]
    fn parse_date_with_zone_is_start_of_day() {
        let t = parse_time("2024-03-01[America/New_York]").unwrap();
        assert_eq!(t.hour(), 0);
        assert_eq!(t.minute(), 0);
        assert_eq!(t.offset().seconds(), -5 * 3600);
        assert_eq!(t.rfc3339(), "2024-03-01T00:00:00-05:00");
    }

    #[test]
    fn parse_rejects_date_with_offset_but_no_time() {
        for input in ["2024-03-01Z", "2024-03-01-05:00", "2024-03-01+01:00[Europe/Budapest]"] {
            assert!(
                matches!(parse_time(input), Err(TimeError::Invalid { .. })),
                "{input:?} should be rejected"
            );
        }
    }

    #[test]
    fn parse_rejects_offset_with_seconds() {
        assert!(matches!(
            parse_time("2024-03-01T10:00:00+05:30:30"),
            Err(TimeError::SubMinuteOffset(_))
        ));
        let t = parse_time("2024-03-01T10:00:00+05:30:00").unwrap();
        assert_eq!(t.offset().seconds(), 5 * 3600 + 30 * 60);
    }

    #[test]
    fn parse_rejects_non_iso_calendar() {
        let err = parse_time("2024-03-01T10:00:00-05:00[u-ca=hebrew]").unwrap_err();
        assert!(matches!(
            &err,
            TimeError::UnsupportedCalendar { calendar, .. } if calendar == "hebrew"
        ));
        assert!(matches!(
            parse_time("2024-03-01T10:00:00-05:00[America/New_York][!u-ca=japanese]"),
            Err(TimeError::UnsupportedCalendar { .. })
        ));
    }

    #[test]
    fn parse_accepts_iso_calendar() {
        let t = parse_time("2024-03-01T10:00:00-05:00[America/New_York][u-ca=iso8601]").unwrap();
        assert_eq!(t.zone_name(), Some("America/New_York"));
        assert!(parse_time("2024-03-01T10:00:00Z[u-ca=ISO8601]").is_ok());
    }

    #[test]
    fn parse_reads_leap_second_as_fifty_nine() {
        let t = parse_time("2016-12-31T23:59:60Z").unwrap();
        assert_eq!(t.rfc3339(), "2016-12-31T23:59:59+00:00");
    }

    #[test]
    fn parse_rejects_offset_conflicting_with_zone() {
        assert!(parse_time("2024-07-10T20:48:00+09:00[America/New_York]").is_err());
    }

    #[test]
    fn parse_rejects_unknown_zone() {
        assert!(parse_time("2024-07-10T20:48:00Z[Mars/Olympus_Mons]").is_err());
    }

    #[test]
    fn parse_rejects_trailing_input() {
        assert!(parse_time("2024-03-01T10:00:00Z trailing").is_err());
    }

    #[test]
    fn display_round_trips_fixed_offset() {
        let t = parse_time("2024-03-01T10:00:00-05:00").unwrap();
        let again = parse_time(&t.to_string()).unwrap();
        assert_eq!(again.timestamp(), t.timestamp());
        assert_eq!(again.offset(), t.offset());
        assert_eq!(again.zone_name(), None);
    }

    #[test]
    fn rfc3339_has_no_annotation() {
        let t = parse_time("2024-07-10T20:48:00-04:00[America/New_York]").unwrap();
        assert_eq!(t.rfc3339(), "2024-07-10T20:48:00-04:00");
    }

    #[test]
    fn epoch_millis_of_utc_instant() {
        let t = parse_time("1970-01-01T00:00:01.5Z").unwrap();
        assert_eq!(t.epoch_millis(), 1500);
    }

    // =========================================================================
    // Elapsed
    // =========================================================================

    #[test]
    fn elapsed_clamps_future_to_zero() {
        let t = instant("2024-01-01T00:00:00Z");
        let before = t.timestamp() - SignedDuration::from_hours(3);
        assert_eq!(
            Elapsed::between(&t, before).as_duration(),
            SignedDuration::ZERO
        );
    }

    #[test]
    fn elapsed_rounds_half_day_up() {
        let e = Elapsed::from_duration(SignedDuration::from_hours(2 * 24 + 12));
        assert_eq!(e.rounded_days(), 3);
        let e = Elapsed::from_duration(SignedDuration::from_hours(2 * 24 + 11));
        assert_eq!(e.rounded_days(), 2);
    }

    // =========================================================================
    // print_time ladder
    // =========================================================================

    const T: &str = "2024-05-01T12:00:00+02:00";

    #[test]
    fn minute_boundaries() {
        assert_eq!(relative(T, SignedDuration::from_secs(0)), "now");
        assert_eq!(relative(T, SignedDuration::from_secs(59)), "now");
        assert_eq!(relative(T, SignedDuration::from_secs(60)), "1 minute ago");
        assert_eq!(relative(T, SignedDuration::from_secs(90)), "1 minute ago");
        assert_eq!(relative(T, SignedDuration::from_secs(120)), "2 minutes ago");
    }

    #[test]
    fn minutes_truncate() {
        assert_eq!(relative(T, SignedDuration::from_mins(30)), "30 minutes ago");
        assert_eq!(
            relative(T, SignedDuration::from_secs(59 * 60 + 59)),
            "59 minutes ago"
        );
    }

    #[test]
    fn hour_boundaries() {
        assert_eq!(relative(T, SignedDuration::from_hours(1)), "1 hour ago");
        assert_eq!(relative(T, SignedDuration::from_mins(90)), "1 hour ago");
        assert_eq!(relative(T, SignedDuration::from_hours(2)), "2 hours ago");
        assert_eq!(relative(T, SignedDuration::from_mins(23 * 60 + 59)), "23 hours ago");
    }

    #[test]
    fn day_boundaries() {
        assert_eq!(relative(T, SignedDuration::from_hours(24)), "yesterday");
        assert_eq!(relative(T, SignedDuration::from_hours(25)), "yesterday");
        assert_eq!(relative(T, SignedDuration::from_hours(48)), "2 days ago");
    }

    #[test]
    fn days_round_not_truncate() {
        assert_eq!(
            relative(T, SignedDuration::from_hours(6 * 24 + 20)),
            "7 days ago"
        );
        assert_eq!(relative(T, SignedDuration::from_hours(3 * 24 + 5)), "3 days ago");
    }

    #[test]
    fn absolute_fallback_after_a_week() {
        assert_eq!(
            relative("2024-01-01T09:30:00Z", SignedDuration::from_hours(10 * 24)),
            "at 2024-01-01 09:30"
        );
        assert_eq!(
            relative(T, SignedDuration::from_hours(7 * 24)),
            "at 2024-05-01 12:00"
        );
    }

    #[test]
    fn absolute_fallback_uses_instants_own_zone() {
        assert_eq!(
            relative(
                "2024-07-10T23:05:42-04:00[America/New_York]",
                SignedDuration::from_hours(30 * 24)
            ),
            "at 2024-07-10 23:05"
        );
    }

    #[test]
    fn print_time_now_reads_system_clock() {
        assert_eq!(
            print_time_now(&instant("2000-01-01T00:00:00Z")),
            "at 2000-01-01 00:00"
        );
    }

    #[test]
    fn future_instant_reads_now() {
        let t = instant(T);
        let earlier = t.timestamp() - SignedDuration::from_hours(5);
        assert_eq!(print_time(&t, earlier), "now");
    }
}
