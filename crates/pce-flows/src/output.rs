use std::collections::HashSet;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use tracing::info;

use pce_model::{EXPORT_HEADER, ExportRow};

use crate::error::ExportError;

/// Write label values one per line, sorted.
pub fn write_label_values(path: &Path, values: &[String]) -> Result<(), ExportError> {
    let mut sorted: Vec<&str> = values.iter().map(String::as_str).collect();
    sorted.sort_unstable();

    let file = File::create(path).map_err(|e| ExportError::io(path, e))?;
    let mut out = BufWriter::new(file);
    for value in &sorted {
        writeln!(out, "{value}").map_err(|e| ExportError::io(path, e))?;
    }
    out.flush().map_err(|e| ExportError::io(path, e))?;

    info!(path = %path.display(), values = sorted.len(), "label values written");
    Ok(())
}

/// Write the flow export: fixed header, then the rows in no particular order.
pub fn write_export_csv<'a>(
    path: &Path,
    rows: impl IntoIterator<Item = &'a ExportRow>,
) -> Result<usize, ExportError> {
    let file = File::create(path).map_err(|e| ExportError::io(path, e))?;
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(BufWriter::new(file));

    wtr.write_record(EXPORT_HEADER)?;
    let mut written = 0;
    for row in rows {
        wtr.serialize(row)?;
        written += 1;
    }
    wtr.flush().map_err(|e| ExportError::io(path, e))?;

    info!(path = %path.display(), rows = written, "flow export written");
    Ok(written)
}

/// Read a flow export back into a set of rows.
pub fn read_export_csv(path: &Path) -> Result<HashSet<ExportRow>, ExportError> {
    let mut rdr = csv::ReaderBuilder::new().has_headers(true).from_path(path)?;
    let mut rows = HashSet::new();
    for record in rdr.deserialize() {
        let row: ExportRow = record?;
        rows.insert(row);
    }
    Ok(rows)
}
