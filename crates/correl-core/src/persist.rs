// File: crates/correl-core/src/persist.rs
// Summary: Round-trip of a correlation as two parallel numeric CSV columns.

use std::path::Path;

use crate::anchor::CorrespondenceSet;
use crate::error::CorrelError;

/// Load a correlation from a headerless two-column CSV file.
///
/// Both columns must be strictly monotonically increasing; a violation
/// rejects this correlation item with `MalformedPersistedData` (callers keep
/// loading the rest of their file).
pub fn load_pointers(path: impl AsRef<Path>) -> Result<CorrespondenceSet, CorrelError> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .trim(csv::Trim::All)
        .from_path(path.as_ref())
        .map_err(|e| CorrelError::MalformedPersistedData { reason: e.to_string() })?;

    let mut pos_a = Vec::new();
    let mut pos_b = Vec::new();
    for (row, rec) in rdr.records().enumerate() {
        let rec = rec.map_err(|e| CorrelError::MalformedPersistedData { reason: e.to_string() })?;
        if rec.len() < 2 {
            return Err(CorrelError::MalformedPersistedData {
                reason: format!("row {} has {} columns, expected 2", row + 1, rec.len()),
            });
        }
        pos_a.push(parse_field(&rec[0], row)?);
        pos_b.push(parse_field(&rec[1], row)?);
    }
    CorrespondenceSet::from_columns(&pos_a, &pos_b)
}

/// Write a correlation as two parallel columns, one row per anchor.
pub fn save_pointers(path: impl AsRef<Path>, set: &CorrespondenceSet) -> Result<(), CorrelError> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path.as_ref())
        .map_err(|e| CorrelError::MalformedPersistedData { reason: e.to_string() })?;
    for anchor in set.anchors() {
        wtr.write_record(&[anchor.pos_a.to_string(), anchor.pos_b.to_string()])
            .map_err(|e| CorrelError::MalformedPersistedData { reason: e.to_string() })?;
    }
    wtr.flush()
        .map_err(|e| CorrelError::MalformedPersistedData { reason: e.to_string() })?;
    Ok(())
}

fn parse_field(field: &str, row: usize) -> Result<f64, CorrelError> {
    field.parse::<f64>().map_err(|_| CorrelError::MalformedPersistedData {
        reason: format!("row {}: '{}' is not a number", row + 1, field),
    })
}
