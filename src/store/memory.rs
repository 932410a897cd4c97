use super::{Record, SheetStore, SheetTable};
use crate::error::AppError;

/// Sheet held in memory. Used for dry runs and tests.
#[derive(Debug, Default)]
pub struct MemorySheet {
    table: Option<SheetTable>,
    saves: usize,
    fail_saves: bool,
}

impl MemorySheet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_table(table: SheetTable) -> Self {
        Self {
            table: Some(table),
            ..Self::default()
        }
    }

    /// Make every following `save` fail like an unreachable remote sheet.
    pub fn fail_saves(&mut self, fail: bool) {
        self.fail_saves = fail;
    }

    pub fn table(&self) -> Option<&SheetTable> {
        self.table.as_ref()
    }

    pub fn save_count(&self) -> usize {
        self.saves
    }
}

impl SheetStore for MemorySheet {
    fn load(&self) -> Result<Option<Vec<Record>>, AppError> {
        Ok(self
            .table
            .as_ref()
            .map(SheetTable::records)
            .filter(|records| !records.is_empty()))
    }

    fn save(&mut self, table: &SheetTable) -> Result<(), AppError> {
        if self.fail_saves {
            return Err(AppError::Store("sheet unavailable".to_string()));
        }
        self.table = Some(table.clone());
        self.saves += 1;
        Ok(())
    }
}
