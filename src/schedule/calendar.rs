use chrono::{Datelike, Weekday};

use super::models::{Episode, YearMonth};

fn is_weekday(weekday: Weekday) -> bool {
    !matches!(weekday, Weekday::Sat | Weekday::Sun)
}

/// One fresh episode per Monday–Friday of `month`, numbered from
/// `start_id` upwards without gaps. An invalid month yields no rows, and
/// numbering stops at `u32::MAX`.
pub fn generate_month(year: i32, month: u32, start_id: u32) -> Vec<Episode> {
    let Some(first) = YearMonth::new(year, month).and_then(YearMonth::first_day) else {
        return Vec::new();
    };

    first
        .iter_days()
        .take_while(|date| date.month() == month)
        .filter(|date| is_weekday(date.weekday()))
        .zip(start_id..=u32::MAX)
        .map(|(date, number)| Episode::scheduled(number, date))
        .collect()
}

pub fn weekdays_in_month(year: i32, month: u32) -> usize {
    let Some(first) = YearMonth::new(year, month).and_then(YearMonth::first_day) else {
        return 0;
    };
    first
        .iter_days()
        .take_while(|date| date.month() == month)
        .filter(|date| is_weekday(date.weekday()))
        .count()
}
