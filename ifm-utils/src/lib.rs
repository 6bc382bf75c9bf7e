//! Shared utility functions for the influent flow model crates.

/// Date utility functions
pub mod dates {
    use chrono::{Datelike, Months, NaiveDate, TimeDelta, Weekday};

    /// Day of month used as the representative timestamp of a monthly mean.
    pub const ANCHOR_DAY_OF_MONTH: u32 = 15;

    /// Format a NaiveDate as "YYYY-MM-DD"
    pub fn format_date(date: &NaiveDate) -> String {
        date.format("%Y-%m-%d").to_string()
    }

    /// Parse a date string in "YYYY-MM-DD" format
    pub fn parse_date(s: &str) -> anyhow::Result<NaiveDate> {
        Ok(NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")?)
    }

    /// First day of the month containing `date`.
    pub fn month_start(date: &NaiveDate) -> NaiveDate {
        *date - TimeDelta::days(date.day0() as i64)
    }

    /// First day of the following month, `None` past the end of the calendar.
    pub fn next_month_start(date: &NaiveDate) -> Option<NaiveDate> {
        month_start(date).checked_add_months(Months::new(1))
    }

    /// Last day of the month containing `date`.
    pub fn month_end(date: &NaiveDate) -> Option<NaiveDate> {
        next_month_start(date).map(|d| d - TimeDelta::days(1))
    }

    /// Mid-month anchor (the 15th) of the month containing `date`.
    pub fn month_anchor(date: &NaiveDate) -> NaiveDate {
        month_start(date) + TimeDelta::days((ANCHOR_DAY_OF_MONTH - 1) as i64)
    }

    /// Three-letter weekday label, e.g. "Mon".
    pub fn weekday_abbrev(weekday: Weekday) -> &'static str {
        match weekday {
            Weekday::Mon => "Mon",
            Weekday::Tue => "Tue",
            Weekday::Wed => "Wed",
            Weekday::Thu => "Thu",
            Weekday::Fri => "Fri",
            Weekday::Sat => "Sat",
            Weekday::Sun => "Sun",
        }
    }

    /// Interpolation abscissa for a date: days since 0001-01-01 (CE).
    pub fn ordinal(date: &NaiveDate) -> f64 {
        date.num_days_from_ce() as f64
    }

}
