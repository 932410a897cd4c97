use serde::Serialize;

use super::Notebook;
use crate::error::AppError;
use crate::schedule::{Episode, EpisodeId, EpisodeStatus, YearMonth};
use crate::store::{table_from_episodes, SheetStore};

/// One line of the schedule list.
#[derive(Debug, Clone, Serialize)]
pub struct EpisodeSummary {
    /// Position in the full table; used by every edit command.
    pub index: usize,
    pub id: String,
    pub date: String,
    pub weekday: String,
    pub title: String,
    pub status: EpisodeStatus,
    pub icon: &'static str,
    pub label: String,
}

impl EpisodeSummary {
    fn new(index: usize, episode: &Episode) -> Self {
        let id = episode.id.to_string();
        let date = episode.date.to_sheet_text();
        let weekday = episode.weekday_label().to_string();
        let title = episode.display_title().to_string();
        let icon = episode.status.icon();
        let label = format!("{} {} | {} {} | {}", icon, id, date, weekday, title);
        Self {
            index,
            id,
            date,
            weekday,
            title,
            status: episode.status,
            icon,
            label,
        }
    }
}

impl<S: SheetStore> Notebook<S> {
    pub fn episodes(&self) -> &[Episode] {
        &self.episodes
    }

    pub fn episode(&self, index: usize) -> Result<&Episode, AppError> {
        self.episodes
            .get(index)
            .ok_or_else(|| AppError::NotFound(format!("episode at row {}", index)))
    }

    fn episode_mut(&mut self, index: usize) -> Result<&mut Episode, AppError> {
        self.episodes
            .get_mut(index)
            .ok_or_else(|| AppError::NotFound(format!("episode at row {}", index)))
    }

    /// Table positions of the rows scheduled in `month`, in table order.
    pub fn month_indices(&self, month: YearMonth) -> Vec<usize> {
        self.episodes
            .iter()
            .enumerate()
            .filter(|(_, e)| e.year_month() == Some(month))
            .map(|(i, _)| i)
            .collect()
    }

    pub fn month_view(&self, month: YearMonth) -> Vec<EpisodeSummary> {
        self.month_indices(month)
            .into_iter()
            .map(|i| EpisodeSummary::new(i, &self.episodes[i]))
            .collect()
    }

    pub fn set_title(&mut self, index: usize, title: &str) -> Result<(), AppError> {
        let episode = self.episode_mut(index)?;
        if episode.title == title {
            return Ok(());
        }
        episode.title = title.to_string();
        log::info!("Updated title of {}", episode.id);
        self.dirty = true;
        Ok(())
    }

    pub fn set_status(&mut self, index: usize, status: EpisodeStatus) -> Result<(), AppError> {
        let episode = self.episode_mut(index)?;
        if episode.status == status {
            return Ok(());
        }
        log::info!("Status of {}: {} -> {}", episode.id, episode.status, status);
        episode.status = status;
        self.dirty = true;
        Ok(())
    }

    pub fn set_script(&mut self, index: usize, script: &str) -> Result<(), AppError> {
        let episode = self.episode_mut(index)?;
        if episode.script == script {
            return Ok(());
        }
        episode.script = script.to_string();
        log::info!("Updated script of {}", episode.id);
        self.dirty = true;
        Ok(())
    }

    /// Sets `status` on every row of `month` from `start` through `end`
    /// inclusive, by their position in the month list. Ids match by number,
    /// so `#48` and `48` name the same row. Returns the number of rows set.
    pub fn bulk_update_status(
        &mut self,
        month: YearMonth,
        start: &EpisodeId,
        end: &EpisodeId,
        status: EpisodeStatus,
    ) -> Result<usize, AppError> {
        let indices = self.month_indices(month);
        let position = |id: &EpisodeId| {
            indices
                .iter()
                .position(|&i| self.episodes[i].id.same_episode(id))
                .ok_or_else(|| AppError::NotFound(format!("episode {} in {}", id, month)))
        };
        let from = position(start)?;
        let to = position(end)?;
        if from > to {
            return Err(AppError::InvalidRange(format!(
                "{} comes after {}",
                start, end
            )));
        }

        for &i in &indices[from..=to] {
            self.episodes[i].status = status;
        }
        let count = to - from + 1;
        log::info!("Set {} episodes ({} to {}) to {}", count, start, end, status);
        self.dirty = true;
        Ok(count)
    }

    /// Writes the whole table to the sheet, replacing what was there.
    pub fn save(&mut self) -> Result<(), AppError> {
        let table = table_from_episodes(&self.episodes);
        self.store.save(&table)?;
        self.dirty = false;
        Ok(())
    }

    /// Marks one episode as published and saves immediately.
    pub fn publish(&mut self, index: usize) -> Result<(), AppError> {
        self.set_status(index, EpisodeStatus::Published)?;
        self.save()
    }
}
