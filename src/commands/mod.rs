//! Command layer between the presentation surface and the schedule core.
//!
//! A [`Notebook`] owns the in-memory table for one interaction: it is opened
//! from a sheet, edited through the methods in the submodules and written
//! back wholesale on save.

mod episodes;
mod script;
mod stats;
mod view;


use chrono::NaiveDate;
use serde::Serialize;

use crate::config::NotebookConfig;
use crate::error::AppError;
use crate::schedule::{
    renumber, synchronize, Episode, EpisodeStatus, NumberingReport, SpeakerSet, YearMonth,
};
use crate::store::{episodes_from_records, SheetStore};

pub use episodes::EpisodeSummary;
pub use stats::MonthStats;
pub use view::{ViewMode, ViewState};

/// What happened while opening a notebook.
#[derive(Debug, Clone, Serialize)]
pub struct OpenReport {
    pub loaded: usize,
    pub numbering: NumberingReport,
    pub generated: Vec<YearMonth>,
}

pub struct Notebook<S: SheetStore> {
    store: S,
    episodes: Vec<Episode>,
    speakers: SpeakerSet,
    stock_statuses: Vec<EpisodeStatus>,
    dirty: bool,
}

impl<S: SheetStore> Notebook<S> {
    /// Loads the sheet, canonicalizes bare ids and fills in the months that
    /// must exist as of `today`. Nothing is written back until [`save`].
    ///
    /// [`save`]: Notebook::save
    pub fn open(
        store: S,
        config: &NotebookConfig,
        today: NaiveDate,
    ) -> Result<(Self, OpenReport), AppError> {
        let speakers = config.speaker_set()?;

        let records = match store.load()? {
            Some(records) => records,
            None => {
                log::warn!("Sheet has no data yet; starting from an empty schedule");
                Vec::new()
            }
        };
        let loaded = records.len();

        let mut episodes = episodes_from_records(records, today);
        let numbering = renumber(&mut episodes, config.numbering_start);
        let outcome = synchronize(episodes, today, &config.sync_options());

        let dirty = numbering.renumbered > 0 || outcome.changed();
        log::info!(
            "Opened notebook: {} rows loaded, {} total, generated months: {:?}",
            loaded,
            outcome.episodes.len(),
            outcome.generated.iter().map(ToString::to_string).collect::<Vec<_>>()
        );

        let notebook = Self {
            store,
            episodes: outcome.episodes,
            speakers,
            stock_statuses: config.stock_statuses.clone(),
            dirty,
        };
        let report = OpenReport {
            loaded,
            numbering,
            generated: outcome.generated,
        };
        Ok((notebook, report))
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Whether the in-memory table differs from what was last loaded or saved.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }
}
