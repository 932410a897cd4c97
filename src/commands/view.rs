use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::schedule::YearMonth;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewMode {
    Edit,
    #[default]
    Preview,
}

/// Per-user screen state. Owned by the presentation layer and passed into
/// commands explicitly; the notebook itself keeps none of it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewState {
    pub month: YearMonth,
    /// Position within the current month's list.
    pub selected: usize,
    pub mode: ViewMode,
}

impl ViewState {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            month: YearMonth::of(today),
            selected: 0,
            mode: ViewMode::default(),
        }
    }

    pub fn next_month(&mut self) {
        self.month = self.month.succ();
        self.selected = 0;
    }

    pub fn previous_month(&mut self) {
        self.month = self.month.pred();
        self.selected = 0;
    }

    /// Moves down the list unless already on `last`.
    pub fn select_next(&mut self, last: usize) {
        if self.selected < last {
            self.selected += 1;
        }
    }

    pub fn select_previous(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    /// Resets the selection when the list got shorter than it.
    pub fn clamp_selection(&mut self, len: usize) {
        if self.selected >= len {
            self.selected = 0;
        }
    }
}
