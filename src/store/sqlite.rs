use anyhow::{anyhow, Result};
use rusqlite::{params, Connection, OptionalExtension};
use serde_json::Value;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use super::{Record, SheetStore, SheetTable};
use crate::error::AppError;

/// Sheet kept as a cell grid in a local SQLite file.
///
/// Row 0 holds the header. Every save clears the grid and writes it again
/// inside a single transaction.
pub struct SqliteSheet {
    conn: Mutex<Connection>,
}

impl SqliteSheet {
    pub fn new(db_path: &Path) -> Result<Self> {
        let conn = Connection::open(db_path)?;

        conn.execute_batch(
            "
            PRAGMA journal_mode=WAL;
            PRAGMA synchronous=NORMAL;
        ",
        )?;

        let sheet = Self {
            conn: Mutex::new(conn),
        };
        sheet.init_schema()?;

        Ok(sheet)
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| anyhow!("sheet connection lock poisoned"))
    }

    fn init_schema(&self) -> Result<()> {
        let conn = self.lock()?;
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS sheet_cells (
                row_idx INTEGER NOT NULL,
                col_idx INTEGER NOT NULL,
                value_json TEXT NOT NULL,
                PRIMARY KEY (row_idx, col_idx)
            );

            -- Sheet metadata (key-value store)
            CREATE TABLE IF NOT EXISTS sheet_meta (
                key TEXT PRIMARY KEY,
                value TEXT,
                updated_at TEXT DEFAULT (datetime('now'))
            );
            "#,
        )?;
        Ok(())
    }

    pub fn read_table(&self) -> Result<Option<SheetTable>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            "SELECT row_idx, col_idx, value_json FROM sheet_cells ORDER BY row_idx, col_idx",
        )?;
        let cells = stmt.query_map([], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, i64>(1)?,
                row.get::<_, String>(2)?,
            ))
        })?;

        let mut grid: Vec<Vec<Value>> = Vec::new();
        for cell in cells {
            let (row_idx, col_idx, json) = cell?;
            let (row_idx, col_idx) = (usize::try_from(row_idx)?, usize::try_from(col_idx)?);
            if grid.len() <= row_idx {
                grid.resize_with(row_idx + 1, Vec::new);
            }
            let row = &mut grid[row_idx];
            if row.len() <= col_idx {
                row.resize(col_idx + 1, Value::String(String::new()));
            }
            row[col_idx] = serde_json::from_str(&json)?;
        }

        let mut rows = grid.into_iter();
        let Some(header) = rows.next() else {
            return Ok(None);
        };
        let header = header
            .into_iter()
            .map(|v| match v {
                Value::String(s) => s,
                other => other.to_string(),
            })
            .collect();

        Ok(Some(SheetTable {
            header,
            rows: rows.collect(),
        }))
    }

    pub fn write_table(&self, table: &SheetTable) -> Result<()> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        tx.execute("DELETE FROM sheet_cells", [])?;
        {
            let mut insert = tx.prepare(
                "INSERT INTO sheet_cells (row_idx, col_idx, value_json) VALUES (?, ?, ?)",
            )?;
            for (col_idx, name) in table.header.iter().enumerate() {
                insert.execute(params![0i64, col_idx as i64, serde_json::to_string(name)?])?;
            }
            for (row_idx, row) in table.rows.iter().enumerate() {
                for (col_idx, value) in row.iter().enumerate() {
                    insert.execute(params![
                        row_idx as i64 + 1,
                        col_idx as i64,
                        serde_json::to_string(value)?
                    ])?;
                }
            }
        }
        let now = chrono::Utc::now().to_rfc3339();
        tx.execute(
            "INSERT OR REPLACE INTO sheet_meta (key, value, updated_at) VALUES ('last_saved', ?, ?)",
            params![table.rows.len().to_string(), now],
        )?;
        tx.commit()?;
        Ok(())
    }

    /// Time of the last save as RFC 3339, if the sheet was ever saved.
    pub fn last_saved(&self) -> Result<Option<String>> {
        let conn = self.lock()?;
        let value = conn
            .query_row(
                "SELECT updated_at FROM sheet_meta WHERE key = 'last_saved'",
                [],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }
}

impl SheetStore for SqliteSheet {
    fn load(&self) -> Result<Option<Vec<Record>>, AppError> {
        let records = self.read_table()?.map(|t| t.records()).unwrap_or_default();
        if records.is_empty() {
            return Ok(None);
        }
        Ok(Some(records))
    }

    fn save(&mut self, table: &SheetTable) -> Result<(), AppError> {
        self.write_table(table)?;
        log::info!("Saved {} rows to sheet", table.rows.len());
        Ok(())
    }
}
