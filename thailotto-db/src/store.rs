use anyhow::Result;

use crate::models::DrawRecord;

/// Outcome of a batch append.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AppendSummary {
    pub inserted: u32,
    pub skipped: u32,
}

/// Append-only draw history. One draw per calendar date.
pub trait HistoryStore {
    /// Full history, oldest first.
    fn load(&self) -> Result<Vec<DrawRecord>>;

    /// The `n` most recent records, newest first.
    fn most_recent(&self, n: usize) -> Result<Vec<DrawRecord>>;

    /// Returns `false` when a draw for the same date is already stored.
    fn append(&mut self, record: &DrawRecord) -> Result<bool>;

    fn count(&self) -> Result<usize>;

    fn append_many(&mut self, records: &[DrawRecord]) -> Result<AppendSummary> {
        let mut summary = AppendSummary::default();
        for record in records {
            if self.append(record)? {
                summary.inserted += 1;
            } else {
                summary.skipped += 1;
            }
        }
        Ok(summary)
    }
}

/// Vec-backed store, kept sorted by date.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    records: Vec<DrawRecord>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a store from records in any order; later duplicates of a date are dropped.
    pub fn from_records(records: impl IntoIterator<Item = DrawRecord>) -> Self {
        let mut store = Self::new();
        for record in records {
            store.insert_sorted(record);
        }
        store
    }

    fn insert_sorted(&mut self, record: DrawRecord) -> bool {
        match self.records.binary_search_by_key(&record.date, |r| r.date) {
            Ok(_) => false,
            Err(pos) => {
                self.records.insert(pos, record);
                true
            }
        }
    }
}

impl HistoryStore for MemoryStore {
    fn load(&self) -> Result<Vec<DrawRecord>> {
        Ok(self.records.clone())
    }

    fn most_recent(&self, n: usize) -> Result<Vec<DrawRecord>> {
        Ok(self.records.iter().rev().take(n).copied().collect())
    }

    fn append(&mut self, record: &DrawRecord) -> Result<bool> {
        Ok(self.insert_sorted(*record))
    }

    fn count(&self) -> Result<usize> {
        Ok(self.records.len())
    }
}
