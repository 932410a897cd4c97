use serde::Serialize;

use super::Notebook;
use crate::schedule::{summarize, Episode, EpisodeStatus, StockSummary, YearMonth};
use crate::store::SheetStore;

#[derive(Debug, Clone, Serialize)]
pub struct MonthStats {
    pub month: YearMonth,
    pub total: usize,
    /// Row count per status, in pipeline order.
    pub by_status: Vec<(EpisodeStatus, usize)>,
    pub stock: StockSummary,
}

impl<S: SheetStore> Notebook<S> {
    fn month_episodes(&self, month: YearMonth) -> Vec<Episode> {
        self.month_indices(month)
            .into_iter()
            .map(|i| self.episodes[i].clone())
            .collect()
    }

    /// Finished stock for `month` and the date it lasts until.
    pub fn stock(&self, month: YearMonth) -> StockSummary {
        summarize(&self.month_episodes(month), &self.stock_statuses)
    }

    pub fn month_stats(&self, month: YearMonth) -> MonthStats {
        let episodes = self.month_episodes(month);
        let by_status = EpisodeStatus::ALL
            .into_iter()
            .map(|status| (status, episodes.iter().filter(|e| e.status == status).count()))
            .collect();
        MonthStats {
            month,
            total: episodes.len(),
            by_status,
            stock: summarize(&episodes, &self.stock_statuses),
        }
    }
}
