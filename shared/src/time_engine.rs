//! Time engine - wall-clock sampling and display formatting
//!
//! Provides timezone-aware time snapshots for the render loop, the
//! timezone catalogue behind the picker, and the digital/spoken readout
//! formatting used across panels.

use chrono::{DateTime, Offset, Timelike, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

/// AM/PM indicator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Meridiem {
    AM,
    PM,
}

impl std::fmt::Display for Meridiem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Meridiem::AM => write!(f, "AM"),
            Meridiem::PM => write!(f, "PM"),
        }
    }
}

/// 12-hour vs 24-hour digital readout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HourCycle {
    Twelve,
    TwentyFour,
}

impl Default for HourCycle {
    fn default() -> Self {
        HourCycle::TwentyFour
    }
}

/// Wall-clock snapshot for a single render tick
#[derive(Debug, Clone)]
pub struct TimeData {
    /// Hour in 12-hour format (1-12)
    pub hour12: u32,
    /// Hour in 24-hour format (0-23)
    pub hour24: u32,
    /// Minute (0-59)
    pub minute: u32,
    /// Second (0-59)
    pub second: u32,
    /// Fractional seconds (0.0-1.0) for smooth hand sweep
    pub second_fraction: f64,
    /// AM/PM indicator
    pub meridiem: Meridiem,
    /// UTC offset in minutes (e.g., -480 for UTC-8)
    pub utc_offset_minutes: i32,
    /// Time zone abbreviation (e.g., "PST")
    pub tz_abbrev: String,
    /// The raw DateTime for additional formatting needs
    pub local_datetime: DateTime<Tz>,
}

impl TimeData {
    /// Format the UTC offset as "UTC±hh:mm"
    pub fn format_utc_offset(&self) -> String {
        let sign = if self.utc_offset_minutes >= 0 { "+" } else { "-" };
        let abs_minutes = self.utc_offset_minutes.abs();
        format!("UTC{}{:02}:{:02}", sign, abs_minutes / 60, abs_minutes % 60)
    }
}

/// Compute the current time data for a given timezone
pub fn compute_time_data(tz: Tz) -> TimeData {
    compute_time_data_at(tz, Utc::now())
}

/// Compute time data for a given timezone at a specific instant
pub fn compute_time_data_at(tz: Tz, now_utc: DateTime<Utc>) -> TimeData {
    let local = now_utc.with_timezone(&tz);

    let hour24 = local.hour();
    let hour12 = match hour24 {
        0 => 12,
        1..=12 => hour24,
        _ => hour24 - 12,
    };
    let meridiem = if hour24 < 12 { Meridiem::AM } else { Meridiem::PM };

    let second_fraction = local.nanosecond() as f64 / 1_000_000_000.0;

    let offset = local.offset().fix();
    let utc_offset_minutes = offset.local_minus_utc() / 60;

    let tz_abbrev = local.format("%Z").to_string();

    TimeData {
        hour12,
        hour24,
        minute: local.minute(),
        second: local.second(),
        second_fraction,
        meridiem,
        utc_offset_minutes,
        tz_abbrev,
        local_datetime: local,
    }
}

/// Format a time for the digital readout
///
/// Truncates fractional fields; 12-hour cycle appends AM/PM.
pub fn format_clock(h: f64, m: f64, s: f64, cycle: HourCycle, show_seconds: bool) -> String {
    let h = h.floor() as u32 % 24;
    let m = m.floor() as u32 % 60;
    let s = s.floor() as u32 % 60;

    match cycle {
        HourCycle::Twelve => {
            let meridiem = if h >= 12 { Meridiem::PM } else { Meridiem::AM };
            let h12 = match h % 12 {
                0 => 12,
                other => other,
            };
            if show_seconds {
                format!("{:02}:{:02}:{:02} {}", h12, m, s, meridiem)
            } else {
                format!("{:02}:{:02} {}", h12, m, meridiem)
            }
        }
        HourCycle::TwentyFour => {
            if show_seconds {
                format!("{:02}:{:02}:{:02}", h, m, s)
            } else {
                format!("{:02}:{:02}", h, m)
            }
        }
    }
}

/// Build the spoken-style sentence for a displayed time
///
/// Shown as a toast by the read-time action; speech output is not
/// available, so the sentence degrades to text.
pub fn spoken_time(h: f64, m: f64) -> String {
    let h = h.floor() as u32 % 24;
    let m = m.floor() as u32 % 60;
    let meridiem = if h >= 12 { Meridiem::PM } else { Meridiem::AM };
    let h12 = match h % 12 {
        0 => 12,
        other => other,
    };
    format!("The time is {}:{:02} {}", h12, m, meridiem)
}

/// Get the system's local timezone as a chrono-tz Tz
pub fn system_timezone() -> Option<Tz> {
    let tz_name = chrono::Local::now().format("%Z").to_string();
    tz_name.parse::<Tz>().ok()
}

/// Parse a timezone string into a Tz, with fallback
pub fn parse_timezone(tz_str: &str) -> Result<Tz, String> {
    tz_str
        .parse::<Tz>()
        .map_err(|_| format!("Invalid timezone: {}", tz_str))
}

/// Get a list of all available timezones
pub fn all_timezones() -> Vec<Tz> {
    chrono_tz::TZ_VARIANTS.to_vec()
}

/// Search timezones by name (case-insensitive partial match)
pub fn search_timezones(query: &str) -> Vec<Tz> {
    let query_lower = query.to_lowercase();
    chrono_tz::TZ_VARIANTS
        .iter()
        .filter(|tz| tz.name().to_lowercase().contains(&query_lower))
        .copied()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_compute_time_data_ranges() {
        let tz: Tz = "America/New_York".parse().unwrap();
        let data = compute_time_data(tz);
        assert!(data.hour12 >= 1 && data.hour12 <= 12);
        assert!(data.hour24 < 24);
        assert!(data.minute < 60);
        assert!(data.second < 60);
    }

    #[test]
    fn test_midnight_and_noon_hour12() {
        let tz: Tz = "UTC".parse().unwrap();
        let midnight = Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap();
        let data = compute_time_data_at(tz, midnight);
        assert_eq!(data.hour12, 12);
        assert_eq!(data.meridiem, Meridiem::AM);

        let noon = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();
        let data = compute_time_data_at(tz, noon);
        assert_eq!(data.hour12, 12);
        assert_eq!(data.meridiem, Meridiem::PM);
    }

    #[test]
    fn test_format_clock_cycles() {
        assert_eq!(
            format_clock(15.0, 7.0, 9.0, HourCycle::TwentyFour, true),
            "15:07:09"
        );
        assert_eq!(
            format_clock(15.0, 7.0, 9.0, HourCycle::Twelve, false),
            "03:07 PM"
        );
        // Fractional fields truncate, midnight reads as 12 AM
        assert_eq!(
            format_clock(0.0, 30.9, 0.0, HourCycle::Twelve, false),
            "12:30 AM"
        );
    }

    #[test]
    fn test_spoken_time() {
        assert_eq!(spoken_time(14.0, 5.0), "The time is 2:05 PM");
        assert_eq!(spoken_time(0.0, 0.0), "The time is 12:00 AM");
    }

    #[test]
    fn test_search_timezones() {
        let results = search_timezones("New_York");
        assert!(results.iter().any(|tz| tz.name() == "America/New_York"));
    }
}
