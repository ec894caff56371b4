//! Month-grid generation and the canonical `YYYY-MM-DD` day key.
//!
//! Months are 0-based throughout (0 = January). A grid is always 42 cells:
//! the tail of the previous month, every day of the requested month, then the
//! head of the next month.

use chrono::{Datelike, NaiveDate};

use crate::constants::{DAYS_PER_WEEK, GRID_CELLS};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DayCell {
    pub day: u32,
    pub year: i32,
    pub month: u32,
    pub overflow: bool,
}

impl DayCell {
    pub fn key(&self) -> String {
        day_key(self.year, self.month, self.day)
    }

    pub fn date(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month + 1, self.day)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DayTiming {
    pub is_today: bool,
    pub is_past: bool,
    pub is_overflow: bool,
}

impl DayTiming {
    /// Overflow cells are never classified as today or past.
    pub fn classify(cell: &DayCell, today: NaiveDate) -> Self {
        if cell.overflow {
            return Self {
                is_overflow: true,
                ..Self::default()
            };
        }

        let cell_ym = (cell.year, cell.month);
        let today_ym = (today.year(), today.month0());
        let is_today = cell_ym == today_ym && cell.day == today.day();
        let is_past = cell_ym < today_ym || (cell_ym == today_ym && cell.day < today.day());

        Self {
            is_today,
            is_past,
            is_overflow: false,
        }
    }
}

pub fn day_key(year: i32, month: u32, day: u32) -> String {
    format!("{}-{:02}-{:02}", year, month + 1, day)
}

/// Inverse of [`day_key`]: returns `(year, 0-based month, day)`.
pub fn parse_day_key(key: &str) -> Option<(i32, u32, u32)> {
    let date = NaiveDate::parse_from_str(key, "%Y-%m-%d").ok()?;
    Some((date.year(), date.month0(), date.day()))
}

pub fn date_key(date: NaiveDate) -> String {
    day_key(date.year(), date.month0(), date.day())
}

pub fn is_leap_year(year: i32) -> bool {
    year % 4 == 0 && (year % 100 != 0 || year % 400 == 0)
}

pub fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        1 => {
            if is_leap_year(year) {
                29
            } else {
                28
            }
        }
        3 | 5 | 8 | 10 => 30,
        _ => 31,
    }
}

/// 0 = Sunday.
pub fn first_weekday(year: i32, month: u32) -> u32 {
    NaiveDate::from_ymd_opt(year, month + 1, 1)
        .map(|date| date.weekday().num_days_from_sunday())
        .unwrap_or(0)
}

pub fn prev_month(year: i32, month: u32) -> (i32, u32) {
    if month == 0 { (year.saturating_sub(1), 11) } else { (year, month - 1) }
}

pub fn next_month(year: i32, month: u32) -> (i32, u32) {
    if month >= 11 { (year.saturating_add(1), 0) } else { (year, month + 1) }
}

pub fn month_name(month: u32) -> &'static str {
    match month {
        0 => "January",
        1 => "February",
        2 => "March",
        3 => "April",
        4 => "May",
        5 => "June",
        6 => "July",
        7 => "August",
        8 => "September",
        9 => "October",
        10 => "November",
        11 => "December",
        _ => "Invalid Month",
    }
}

/// Builds the 6x7 grid for `month` of `year`. A month past 11 rolls into the
/// following years.
pub fn build_month_grid(year: i32, month: u32) -> [DayCell; GRID_CELLS] {
    let year = year.saturating_add((month / 12) as i32);
    let month = month % 12;

    let leading = first_weekday(year, month) as usize;
    let days = days_in_month(year, month) as usize;
    let (prev_year, prev_month) = prev_month(year, month);
    let prev_days = days_in_month(prev_year, prev_month) as usize;
    let (next_year, next_month) = next_month(year, month);

    std::array::from_fn(|i| {
        if i < leading {
            DayCell {
                day: (prev_days - leading + i + 1) as u32,
                year: prev_year,
                month: prev_month,
                overflow: true,
            }
        } else if i < leading + days {
            DayCell {
                day: (i - leading + 1) as u32,
                year,
                month,
                overflow: false,
            }
        } else {
            DayCell {
                day: (i - leading - days + 1) as u32,
                year: next_year,
                month: next_month,
                overflow: true,
            }
        }
    })
}

pub fn grid_rows(grid: &[DayCell; GRID_CELLS]) -> impl Iterator<Item = &[DayCell]> {
    grid.chunks(DAYS_PER_WEEK)
}

/// Position of `date` in the grid for its own month.
pub fn grid_index_of(date: NaiveDate) -> usize {
    first_weekday(date.year(), date.month0()) as usize + date.day0() as usize
}
