//! Month arithmetic on `NaiveDate`.
//!
//! Every observation date in the crate is the first day of a period, so the
//! helpers here only ever deal with first-of-month dates.

use chrono::{Datelike, NaiveDate};

/// First day of the month containing `date`.
pub fn month_start(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// First day of the month `months` months after the month containing `date`.
///
/// Returns `None` when the result falls outside chrono's supported range.
pub fn add_months(date: NaiveDate, months: u32) -> Option<NaiveDate> {
    let zero_based = date.month0() + months;
    let year = date.year() + (zero_based / 12) as i32;
    let month = zero_based % 12 + 1;
    NaiveDate::from_ymd_opt(year, month, 1)
}

/// Whole months from the month of `from` to the month of `to` (0 if `to` is earlier).
pub fn months_between(from: NaiveDate, to: NaiveDate) -> u32 {
    let a = from.year() * 12 + from.month0() as i32;
    let b = to.year() * 12 + to.month0() as i32;
    (b - a).max(0) as u32
}

/// True if `date` is the first day of a calendar quarter.
pub fn is_quarter_start(date: NaiveDate) -> bool {
    date.day() == 1 && date.month0() % 3 == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn add_months_rolls_over_year_end() {
        assert_eq!(add_months(d(2020, 11, 1), 3), Some(d(2021, 2, 1)));
        assert_eq!(add_months(d(2020, 1, 31), 1), Some(d(2020, 2, 1)));
    }

    #[test]
    fn months_between_counts_calendar_months() {
        assert_eq!(months_between(d(2020, 1, 15), d(2020, 3, 1)), 2);
        assert_eq!(months_between(d(2020, 3, 1), d(2020, 1, 1)), 0);
        assert_eq!(months_between(d(2019, 12, 1), d(2020, 1, 31)), 1);
    }

    #[test]
    fn quarter_starts() {
        assert!(is_quarter_start(d(2020, 4, 1)));
        assert!(!is_quarter_start(d(2020, 5, 1)));
        assert!(!is_quarter_start(d(2020, 4, 2)));
    }
}
