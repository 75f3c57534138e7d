//! Human-readable pet age.

use chrono::{Datelike, NaiveDate};

/// Whole calendar months from `from` to `to`, or `0` when `to` is earlier.
///
/// A month only counts once the day-of-month has been reached again.
pub fn full_months_between(from: NaiveDate, to: NaiveDate) -> u32 {
    if to <= from {
        return 0;
    }
    let mut months = (to.year() - from.year()) * 12 + to.month() as i32 - from.month() as i32;
    if to.day() < from.day() {
        months -= 1;
    }
    u32::try_from(months).unwrap_or(0)
}

/// Formats the age of a pet born on `birthday` as of `today`.
///
/// Years once a full year has elapsed, months once a full month has
/// elapsed, otherwise `Just born`.
pub fn age_string(birthday: NaiveDate, today: NaiveDate) -> String {
    let months = full_months_between(birthday, today);
    let years = months / 12;
    if years > 0 {
        return format!("{years} year{} old", plural_suffix(years));
    }
    if months > 0 {
        return format!("{months} month{} old", plural_suffix(months));
    }
    "Just born".to_string()
}

fn plural_suffix(count: u32) -> &'static str {
    if count == 1 {
        ""
    } else {
        "s"
    }
}
