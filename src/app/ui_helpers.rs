use chrono::{Days, Months, NaiveDate};

pub fn wrap_prev_index(current: usize, len: usize) -> usize {
    if len == 0 {
        0
    } else if current == 0 {
        len - 1
    } else {
        current - 1
    }
}

pub fn wrap_next_index(current: usize, len: usize) -> usize {
    if len == 0 {
        0
    } else if current + 1 >= len {
        0
    } else {
        current + 1
    }
}

/// Moves by whole days. Out-of-range results leave the date unchanged.
pub fn step_days(date: NaiveDate, delta: i64) -> NaiveDate {
    let stepped = if delta >= 0 {
        date.checked_add_days(Days::new(delta as u64))
    } else {
        date.checked_sub_days(Days::new(delta.unsigned_abs()))
    };
    stepped.unwrap_or(date)
}

/// Moves by one month, clamping the day to the target month's length.
pub fn step_month(date: NaiveDate, forward: bool) -> NaiveDate {
    let stepped = if forward {
        date.checked_add_months(Months::new(1))
    } else {
        date.checked_sub_months(Months::new(1))
    };
    stepped.unwrap_or(date)
}
