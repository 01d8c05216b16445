use anyhow::{Context, Result, bail};
use serde::Deserialize;
use std::path::Path;
use tracing::{info, warn};

use thailotto_db::models::DrawRecord;
use thailotto_db::store::HistoryStore;

/// One row of the legacy JSON cache, before validation.
#[derive(Debug, Deserialize)]
struct RawRecord {
    date: String,
    number: String,
}

pub struct ImportResult {
    pub total_records: u32,
    pub inserted: u32,
    pub skipped: u32,
    pub errors: u32,
}

fn read_json_rows(path: &Path) -> Result<Vec<RawRecord>> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("cannot open {:?}", path))?;
    serde_json::from_str(&json).with_context(|| format!("{:?} is not a draw list", path))
}

/// Legacy CSV export: `date,day,month,weekday,number`; only `date` and `number` are used.
fn read_csv_rows(path: &Path) -> Result<Vec<Result<RawRecord>>> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("cannot open {:?}", path))?;

    let headers = reader.headers()?.clone();
    let column = |name: &str| -> Result<usize> {
        headers
            .iter()
            .position(|h| h.trim().eq_ignore_ascii_case(name))
            .with_context(|| format!("missing '{}' column in {:?}", name, path))
    };
    let date_idx = column("date")?;
    let number_idx = column("number")?;

    let rows: Vec<Result<RawRecord>> = reader
        .records()
        .map(|record| -> Result<RawRecord> {
            let record = record?;
            let get = |idx: usize| -> Result<String> {
                record
                    .get(idx)
                    .map(|s| s.trim().to_string())
                    .with_context(|| format!("missing field at index {}", idx))
            };
            Ok(RawRecord {
                date: get(date_idx)?,
                number: get(number_idx)?,
            })
        })
        .collect();
    Ok(rows)
}

pub fn import_file(store: &mut dyn HistoryStore, path: &Path) -> Result<ImportResult> {
    let rows: Vec<Result<RawRecord>> = match path.extension().and_then(|e| e.to_str()) {
        Some("json") => read_json_rows(path)?.into_iter().map(Ok).collect(),
        Some("csv") => read_csv_rows(path)?,
        _ => bail!("unsupported file type {:?} (expected .json or .csv)", path),
    };

    let mut result = ImportResult {
        total_records: 0,
        inserted: 0,
        skipped: 0,
        errors: 0,
    };
    let mut valid = Vec::with_capacity(rows.len());

    for row in rows {
        result.total_records += 1;
        let parsed = row.and_then(|raw| {
            DrawRecord::parse(&raw.date, &raw.number)
                .with_context(|| format!("rejected row ({}, {})", raw.date, raw.number))
        });
        match parsed {
            Ok(record) => valid.push(record),
            Err(e) => {
                warn!(line = result.total_records, "{:#}", e);
                result.errors += 1;
            }
        }
    }

    let summary = store.append_many(&valid)?;
    result.inserted = summary.inserted;
    result.skipped = summary.skipped;
    info!(
        file = %path.display(),
        inserted = result.inserted,
        skipped = result.skipped,
        errors = result.errors,
        "import finished"
    );
    Ok(result)
}

/// Writes the history newest first, the layout the legacy cache used.
pub fn export_json(store: &dyn HistoryStore, path: &Path) -> Result<usize> {
    let mut records = store.load()?;
    records.reverse();
    let json = serde_json::to_string_pretty(&records)?;
    std::fs::write(path, json).with_context(|| format!("cannot write {:?}", path))?;
    Ok(records.len())
}
