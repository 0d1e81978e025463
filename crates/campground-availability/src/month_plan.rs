use std::collections::BTreeSet;

use chrono::{Months, NaiveDate};

use crate::availability_types::{DateRange, MonthKey};

/// Calendar months touched by `start..=end`, one key per month.
///
/// Walks month starts from `start`'s month until passing `end`, so a range
/// that begins late in a month never skips the following one. Callers are
/// expected to pass `end >= start`.
pub fn plan_months(start: NaiveDate, end: NaiveDate) -> BTreeSet<MonthKey> {
    let mut months = BTreeSet::new();
    let mut current = MonthKey::from_date(start).first_day();

    while current <= end {
        months.insert(MonthKey::from_date(current));

        current = match current.checked_add_months(Months::new(1)) {
            Some(next) => next,
            None => break,
        };
    }

    months
}

/// Months to fetch for a validated date range
pub fn plan_range(range: &DateRange) -> BTreeSet<MonthKey> {
    plan_months(range.start(), range.end())
}
