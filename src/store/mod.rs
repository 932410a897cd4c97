//! Sheet storage boundary.
//!
//! The schedule lives in a single flat sheet: a header row followed by one
//! row per episode. Stores only move whole tables; translating cells to and
//! from [`Episode`] values happens here so every store behaves the same.

pub mod memory;
pub mod sqlite;

#[cfg(test)]
mod tests;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::AppError;
use crate::schedule::{Episode, EpisodeId, EpisodeStatus, PublishDate};

pub use memory::MemorySheet;
pub use sqlite::SqliteSheet;

/// One sheet row keyed by column name.
pub type Record = serde_json::Map<String, Value>;

pub const COL_ID: &str = "No";
pub const COL_DATE: &str = "公開予定日";
pub const COL_WEEKDAY: &str = "曜日";
pub const COL_TITLE: &str = "タイトル";
pub const COL_STATUS: &str = "ステータス";
/// Script column as it is known inside the notebook.
pub const COL_SCRIPT: &str = "台本メモ";
/// Script column as it is named in the sheet.
pub const SHEET_COL_SCRIPT: &str = "台本";

/// Column order used on every write.
pub const SHEET_COLUMNS: [&str; 6] = [
    COL_ID,
    COL_DATE,
    COL_WEEKDAY,
    COL_TITLE,
    COL_STATUS,
    SHEET_COL_SCRIPT,
];

/// A whole sheet: header plus value rows.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SheetTable {
    pub header: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

impl SheetTable {
    /// Rows keyed by header name. Short rows are padded with empty strings.
    pub fn records(&self) -> Vec<Record> {
        self.rows
            .iter()
            .map(|row| {
                self.header
                    .iter()
                    .enumerate()
                    .map(|(i, name)| {
                        let value = row
                            .get(i)
                            .cloned()
                            .unwrap_or_else(|| Value::String(String::new()));
                        (name.clone(), value)
                    })
                    .collect::<Record>()
            })
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Where the schedule table is persisted.
///
/// `save` replaces the whole sheet; there is no row-level update.
pub trait SheetStore {
    /// All rows, or `None` when the sheet holds no data yet.
    fn load(&self) -> Result<Option<Vec<Record>>, AppError>;

    fn save(&mut self, table: &SheetTable) -> Result<(), AppError>;
}

// ============================================================================
// Cell conversion
// ============================================================================

/// Renames the sheet's script column to the internal name when only the
/// sheet name is present.
pub fn normalize_columns(mut record: Record) -> Record {
    if !record.contains_key(COL_SCRIPT) {
        if let Some(script) = record.remove(SHEET_COL_SCRIPT) {
            record.insert(COL_SCRIPT.to_string(), script);
        }
    }
    record
}

fn cell_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

fn id_from_cell(value: Option<&Value>) -> EpisodeId {
    match value {
        Some(Value::Number(n)) => match whole_number(n) {
            Some(n) => EpisodeId::Bare(n),
            None => EpisodeId::Malformed(n.to_string()),
        },
        Some(Value::String(s)) => EpisodeId::parse(s),
        other => EpisodeId::Malformed(cell_text(other)),
    }
}

/// Sheets hand back integers as floats (`48.0`); those count as whole numbers.
fn whole_number(n: &serde_json::Number) -> Option<u32> {
    if let Some(n) = n.as_u64() {
        return u32::try_from(n).ok();
    }
    n.as_f64()
        .filter(|f| f.fract() == 0.0 && (0.0..=u32::MAX as f64).contains(f))
        .map(|f| f as u32)
}

fn id_to_cell(id: &EpisodeId) -> Value {
    match id {
        EpisodeId::Bare(n) => Value::from(*n),
        EpisodeId::Canonical(_) | EpisodeId::Malformed(_) => Value::String(id.to_string()),
    }
}

/// Reads one sheet row. Missing columns become empty strings and unknown
/// statuses become `未`; nothing here fails.
pub fn episode_from_record(record: &Record, today: NaiveDate) -> Episode {
    let script = record
        .get(COL_SCRIPT)
        .or_else(|| record.get(SHEET_COL_SCRIPT));
    let date_text = cell_text(record.get(COL_DATE));
    let weekday = cell_text(record.get(COL_WEEKDAY));

    let date = PublishDate::parse(&date_text, &weekday, today);
    if let PublishDate::Unparsed { text, .. } = &date {
        log::warn!("Unparsable publish date {:?}; row kept without a date", text);
    }

    Episode {
        id: id_from_cell(record.get(COL_ID)),
        date,
        title: cell_text(record.get(COL_TITLE)),
        status: EpisodeStatus::from(cell_text(record.get(COL_STATUS))),
        script: cell_text(script),
    }
}

pub fn episodes_from_records(records: Vec<Record>, today: NaiveDate) -> Vec<Episode> {
    records
        .into_iter()
        .map(normalize_columns)
        .map(|record| episode_from_record(&record, today))
        .collect()
}

/// Cells for one episode in [`SHEET_COLUMNS`] order.
pub fn episode_to_row(episode: &Episode) -> Vec<Value> {
    vec![
        id_to_cell(&episode.id),
        Value::String(episode.date.to_sheet_text()),
        Value::String(episode.weekday_label().to_string()),
        Value::String(episode.title.clone()),
        Value::String(episode.status.label().to_string()),
        Value::String(episode.script.clone()),
    ]
}

pub fn table_from_episodes(episodes: &[Episode]) -> SheetTable {
    SheetTable {
        header: SHEET_COLUMNS.iter().map(|c| c.to_string()).collect(),
        rows: episodes.iter().map(episode_to_row).collect(),
    }
}
