//! Age predicate deciding which files get archived

use chrono::{DateTime, Datelike, Local};
use std::time::SystemTime;

/// Current year in the local calendar
pub fn current_year() -> i32 {
    Local::now().year()
}

/// Local calendar year of a filesystem timestamp
pub fn year_of(timestamp: SystemTime) -> i32 {
    DateTime::<Local>::from(timestamp).year()
}

/// Whether a file last modified at `modified` is old enough to archive
///
/// Compares calendar years only: a file qualifies when
/// `current_year - modified_year >= min_age_years`.
pub fn is_eligible(modified: SystemTime, current_year: i32, min_age_years: u32) -> bool {
    i64::from(current_year) - i64::from(year_of(modified)) >= i64::from(min_age_years)
}
