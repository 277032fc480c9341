use std::collections::HashMap;
use std::rc::Rc;

use chrono::{DateTime, Datelike, NaiveDate};
use chrono_tz::Tz;

use crate::zone;

#[derive(Debug, Clone, PartialEq)]
pub struct Day {
    pub date: DateTime<Tz>,
    pub is_current_month: bool,
}

#[derive(Debug, Default)]
pub struct GridCache {
    grids: HashMap<String, Rc<[Day]>>,
}

impl GridCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn grid_for(&mut self, anchor: &DateTime<Tz>) -> Rc<[Day]> {
        let key = month_key(anchor);
        if let Some(grid) = self.grids.get(&key) {
            return Rc::clone(grid);
        }
        let grid: Rc<[Day]> = Rc::from(build_month_grid(anchor));
        self.grids.insert(key, Rc::clone(&grid));
        grid
    }

    pub fn clear(&mut self) {
        self.grids.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.grids.is_empty()
    }
}

pub fn month_key(anchor: &DateTime<Tz>) -> String {
    anchor.format("%Y-%m").to_string()
}

pub fn build_month_grid(anchor: &DateTime<Tz>) -> Vec<Day> {
    let zone = anchor.timezone();
    let first = first_day_of_month(anchor.date_naive());
    let last = last_day_of_month(anchor.date_naive());
    let current_len = days_in_month(anchor.date_naive());

    let lead = first.weekday().num_days_from_sunday() as i64;
    let mut trail = 6 - last.weekday().num_days_from_sunday() as i64;
    if trail > 0 && (lead + current_len + trail) / 7 < 6 {
        trail += 7;
    }

    let mut days = Vec::with_capacity((lead + current_len + trail) as usize);
    for offset in -lead..current_len + trail {
        let date = add_days(first, offset);
        days.push(Day {
            date: zone::resolve_wall_clock(zone, date.and_time(anchor.time())),
            is_current_month: date.month() == anchor.month() && date.year() == anchor.year(),
        });
    }
    days
}

pub fn first_day_of_month(date: NaiveDate) -> NaiveDate {
    NaiveDate::from_ymd_opt(date.year(), date.month(), 1).unwrap_or(NaiveDate::MIN)
}

pub fn last_day_of_month(date: NaiveDate) -> NaiveDate {
    let first = first_day_of_month(date);
    add_days(shift_months(first, 1), -1)
}

pub fn days_in_month(date: NaiveDate) -> i64 {
    last_day_of_month(date).day() as i64
}

pub fn add_days(date: NaiveDate, days: i64) -> NaiveDate {
    date.checked_add_signed(chrono::Duration::days(days))
        .unwrap_or(date)
}

pub fn shift_months(date: NaiveDate, months: i32) -> NaiveDate {
    let mut year = date.year();
    let mut month = date.month() as i32 + months;
    while month < 1 {
        month += 12;
        year -= 1;
    }
    while month > 12 {
        month -= 12;
        year += 1;
    }
    clamped_ymd(year, month as u32, date.day())
}

pub fn with_year_month(date: NaiveDate, year: i32, month0: u32) -> NaiveDate {
    clamped_ymd(year, month0 + 1, date.day())
}

fn clamped_ymd(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or_else(|| {
        let first = NaiveDate::from_ymd_opt(year, month, 1).unwrap_or(NaiveDate::MIN);
        let max_day = days_in_month(first) as u32;
        NaiveDate::from_ymd_opt(year, month, day.min(max_day)).unwrap_or(first)
    })
}
