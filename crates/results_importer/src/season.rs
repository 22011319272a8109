//! Season boundaries. Season `Y` runs from August 15 of `Y` through
//! August 14 of `Y + 1`, both inclusive.

use chrono::{Datelike, NaiveDate};

/// True when `date` falls on or before August 14 of its own year.
pub fn is_first_half(date: NaiveDate) -> bool {
    let month = date.month0();
    month < 7 || (month == 7 && date.day() <= 14)
}

pub fn is_within_season(year: i32, date: NaiveDate) -> bool {
    (date.year() == year && !is_first_half(date)) || (date.year() == year + 1 && is_first_half(date))
}

/// Anchor year of the season containing `date`.
pub fn season_of(date: NaiveDate) -> i32 {
    if is_first_half(date) {
        date.year() - 1
    } else {
        date.year()
    }
}
