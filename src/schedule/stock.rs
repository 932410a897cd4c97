use serde::Serialize;

use super::models::{Episode, EpisodeStatus};

/// Statuses counted as finished stock unless configured otherwise.
pub const DEFAULT_STOCK_STATUSES: [EpisodeStatus; 2] =
    [EpisodeStatus::Edited, EpisodeStatus::Published];

pub const NO_STOCK_TEXT: &str = "在庫なし";
pub const NO_STOCK_SUBTEXT: &str = "撮影頑張りましょう！";
pub const STOCK_SUBTEXT: &str = "投稿可能！✨";
/// Deadline text when every finished row lacks a readable date.
pub const UNDATED_STOCK_TEXT: &str = "公開日未定";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StockSummary {
    pub finished: usize,
    pub deadline_text: String,
    pub sub_text: String,
}

/// Finished stock among `episodes` and the last publish date it covers.
///
/// Rows whose date could not be read still count as stock but never set
/// the deadline.
pub fn summarize(episodes: &[Episode], stock_statuses: &[EpisodeStatus]) -> StockSummary {
    let finished: Vec<&Episode> = episodes
        .iter()
        .filter(|e| stock_statuses.contains(&e.status))
        .collect();

    if finished.is_empty() {
        return StockSummary {
            finished: 0,
            deadline_text: NO_STOCK_TEXT.to_string(),
            sub_text: NO_STOCK_SUBTEXT.to_string(),
        };
    }

    // First row wins on equal dates.
    let last = finished
        .iter()
        .filter_map(|e| e.date.day().map(|day| (day, *e)))
        .fold(None::<(chrono::NaiveDate, &Episode)>, |best, (day, e)| match best {
            Some((best_day, _)) if best_day >= day => best,
            _ => Some((day, e)),
        });

    let deadline_text = match last {
        Some((_, e)) => format!("{} {} まで", e.date.to_sheet_text(), e.weekday_label()),
        None => UNDATED_STOCK_TEXT.to_string(),
    };

    StockSummary {
        finished: finished.len(),
        deadline_text,
        sub_text: STOCK_SUBTEXT.to_string(),
    }
}
