use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::Serialize;

use super::calendar::{generate_month, weekdays_in_month};
use super::models::{Episode, YearMonth};

/// Starting number used when the table holds no rows at all.
pub const DEFAULT_START_ID: u32 = 85;

/// Months after the current one that must always be present.
pub const DEFAULT_LOOKAHEAD_MONTHS: u32 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncOptions {
    pub lookahead_months: u32,
    pub default_start_id: u32,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            lookahead_months: DEFAULT_LOOKAHEAD_MONTHS,
            default_start_id: DEFAULT_START_ID,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SyncOutcome {
    pub episodes: Vec<Episode>,
    /// Months that were missing and have been generated, oldest first.
    pub generated: Vec<YearMonth>,
}

impl SyncOutcome {
    pub fn changed(&self) -> bool {
        !self.generated.is_empty()
    }
}

/// The current month plus the lookahead window, oldest first.
pub fn required_months(today: NaiveDate, lookahead_months: u32) -> Vec<YearMonth> {
    let current = YearMonth::of(today);
    (0..=lookahead_months as i32)
        .map(|n| current.offset(n))
        .collect()
}

/// Months that have at least one dated row.
pub fn covered_months(episodes: &[Episode]) -> BTreeSet<YearMonth> {
    episodes.iter().filter_map(Episode::year_month).collect()
}

/// Highest numeric id in the table, reading malformed ids as 0.
pub fn max_id(episodes: &[Episode]) -> Option<u32> {
    episodes.iter().map(|e| e.id.value()).max()
}

/// Fills every required month that has no rows yet.
///
/// Existing rows come first and are kept untouched; generated months are
/// appended in chronological order, each continuing from the highest id in
/// the table so far. Running it again with the same `today` changes nothing.
/// A month whose ids would run past `u32::MAX` is skipped with a warning.
pub fn synchronize(episodes: Vec<Episode>, today: NaiveDate, options: &SyncOptions) -> SyncOutcome {
    let covered = covered_months(&episodes);
    let mut next_id = match max_id(&episodes) {
        Some(max) => max.checked_add(1),
        None => Some(options.default_start_id),
    };

    let mut episodes = episodes;
    let mut generated = Vec::new();

    for month in required_months(today, options.lookahead_months) {
        if covered.contains(&month) {
            continue;
        }

        let count = weekdays_in_month(month.year, month.month) as u32;
        let ids = next_id.and_then(|start| {
            start
                .checked_add(count.saturating_sub(1))
                .map(|last| (start, last))
        });
        let Some((start, last)) = ids else {
            log::warn!("Cannot number {}: episode ids would pass {}", month, u32::MAX);
            continue;
        };

        let rows = generate_month(month.year, month.month, start);
        log::info!(
            "Generated {} rows for {} starting at #{}",
            rows.len(),
            month,
            start
        );
        next_id = last.checked_add(1);
        episodes.extend(rows);
        generated.push(month);
    }

    SyncOutcome {
        episodes,
        generated,
    }
}
