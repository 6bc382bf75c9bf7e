use chrono::{NaiveDate, TimeDelta};
use std::mem::replace;

/// A date range iterator that yields each date from the start date
/// through the end date (inclusive).
#[derive(Clone, Eq, PartialEq, Copy, Debug)]
pub struct DateRange(pub NaiveDate, pub NaiveDate);

impl DateRange {
    /// Number of days covered, counting both ends. Zero when inverted.
    pub fn num_days(&self) -> usize {
        let days = (self.1 - self.0).num_days();
        if days < 0 {
            0
        } else {
            days as usize + 1
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0 > self.1
    }

    pub fn contains(&self, date: &NaiveDate) -> bool {
        self.0 <= *date && *date <= self.1
    }

    /// True when the two ranges share at least one day.
    pub fn overlaps(&self, other: &DateRange) -> bool {
        !self.is_empty() && !other.is_empty() && self.0 <= other.1 && other.0 <= self.1
    }
}

impl Iterator for DateRange {
    type Item = NaiveDate;
    fn next(&mut self) -> Option<Self::Item> {
        if self.0 <= self.1 {
            let next = self.0 + TimeDelta::days(1);
            Some(replace(&mut self.0, next))
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::DateRange;
    use chrono::NaiveDate;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_date_range_iteration() {
        let start = ymd(2023, 1, 1);
        let end = ymd(2023, 1, 5);
        let dates: Vec<NaiveDate> = DateRange(start, end).collect();
        assert_eq!(dates.len(), 5);
        assert_eq!(dates[0], start);
        assert_eq!(dates[4], end);
    }

    #[test]
    fn test_date_range_crosses_leap_day() {
        let range = DateRange(ymd(2024, 2, 28), ymd(2024, 3, 1));
        assert_eq!(range.num_days(), 3);
        let dates: Vec<NaiveDate> = range.collect();
        assert_eq!(dates[1], ymd(2024, 2, 29));
    }

    #[test]
    fn test_date_range_empty() {
        let range = DateRange(ymd(2023, 3, 15), ymd(2023, 3, 14));
        assert!(range.is_empty());
        assert_eq!(range.num_days(), 0);
        assert_eq!(range.count(), 0);
    }

    #[test]
    fn test_overlaps() {
        let a = DateRange(ymd(2023, 1, 1), ymd(2023, 1, 31));
        let b = DateRange(ymd(2023, 1, 31), ymd(2023, 2, 28));
        let c = DateRange(ymd(2023, 2, 1), ymd(2023, 2, 28));
        assert!(a.overlaps(&b));
        assert!(!a.overlaps(&c));
        assert!(a.contains(&ymd(2023, 1, 15)));
        assert!(!a.contains(&ymd(2023, 2, 1)));
    }
}
