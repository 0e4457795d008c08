// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Resolve the reporting window from an optional calendar day (civil +05:30) or a rolling 24h period
// role: windowing
// inputs: optional YYYY-MM-DD string; "now" instant (overridable for tests)
// outputs: TimeWindow with absolute UTC bounds plus display labels in the civil offset
// invariants:
// - since < until; duration is exactly 24h in both modes
// - all arithmetic is on absolute instants; display labels are never compared
// errors: InvalidDateFormat when a date is given but is not a real YYYY-MM-DD day
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use chrono::{DateTime, Duration, FixedOffset, NaiveDate, NaiveDateTime, SecondsFormat, TimeZone, Utc};
use once_cell::sync::Lazy;
use serde::Serialize;

use crate::error::{ActivityError, Result};

/// Civil offset reports are anchored to (+05:30, no DST).
pub const CIVIL_OFFSET_SECS: i32 = 5 * 3600 + 30 * 60;

pub const WINDOW_HOURS: i64 = 24;

static DATE_RE: Lazy<regex::Regex> = Lazy::new(|| regex::Regex::new(r"^\d{4}-\d{2}-\d{2}$").unwrap());

pub fn civil_offset() -> FixedOffset {
  FixedOffset::east_opt(CIVIL_OFFSET_SECS).expect("+05:30 is a valid offset")
}

/// Half-open `[since, until)` interval of absolute instants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimeWindow {
  pub since: DateTime<Utc>,
  pub until: DateTime<Utc>,
}

impl TimeWindow {
  /// The civil day starting at midnight +05:30.
  pub fn for_civil_day(day: NaiveDate) -> Self {
    let midnight = day.and_hms_opt(0, 0, 0).expect("midnight exists");
    // Fixed offsets map every local time to exactly one instant.
    let since = civil_offset()
      .from_local_datetime(&midnight)
      .single()
      .expect("fixed offset is unambiguous")
      .with_timezone(&Utc);

    Self {
      since,
      until: since + Duration::hours(WINDOW_HOURS),
    }
  }

  /// `[now - 24h, now)`.
  pub fn trailing(now: DateTime<Utc>) -> Self {
    Self {
      since: now - Duration::hours(WINDOW_HOURS),
      until: now,
    }
  }

  pub fn duration(&self) -> Duration {
    self.until - self.since
  }

  pub fn contains(&self, instant: DateTime<Utc>) -> bool {
    self.since <= instant && instant < self.until
  }

  /// RFC 3339 UTC form used in host query parameters.
  pub fn since_param(&self) -> String {
    iso_utc(self.since)
  }

  pub fn until_param(&self) -> String {
    iso_utc(self.until)
  }

  pub fn since_display(&self) -> String {
    display_civil(self.since)
  }

  pub fn until_display(&self) -> String {
    display_civil(self.until)
  }
}

/// Resolve the reporting window.
///
/// With a `YYYY-MM-DD` date the window is that civil day at +05:30; without one it is the
/// trailing 24 hours ending at `now`.
pub fn resolve(date: Option<&str>, now: DateTime<Utc>) -> Result<TimeWindow> {
  match date.map(str::trim) {
    None => Ok(TimeWindow::trailing(now)),
    Some(raw) => {
      let day = parse_day(raw).ok_or_else(|| ActivityError::InvalidDateFormat(raw.to_string()))?;
      Ok(TimeWindow::for_civil_day(day))
    }
  }
}

fn parse_day(raw: &str) -> Option<NaiveDate> {
  if !DATE_RE.is_match(raw) {
    return None;
  }
  NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()
}

pub fn iso_utc(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Human-readable label in the civil offset, e.g. `01 Jan 2024, 00:00 IST`.
pub fn display_civil(dt: DateTime<Utc>) -> String {
  dt.with_timezone(&civil_offset()).format("%d %b %Y, %H:%M IST").to_string()
}

/// Parse a `--now-override` value.
/// Accepts RFC 3339 or a naive `%Y-%m-%dT%H:%M:%S` read in the civil offset.
pub fn parse_now_override(s: Option<&str>) -> Option<DateTime<Utc>> {
  s.and_then(|raw| {
    DateTime::parse_from_rfc3339(raw)
      .ok()
      .map(|dt| dt.with_timezone(&Utc))
      .or_else(|| {
        NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S")
          .ok()
          .and_then(|ndt| civil_offset().from_local_datetime(&ndt).single())
          .map(|dt| dt.with_timezone(&Utc))
      })
  })
}

/// Returns the override when present, otherwise the current instant.
pub fn effective_now(override_now: Option<DateTime<Utc>>) -> DateTime<Utc> {
  override_now.unwrap_or_else(Utc::now)
}
