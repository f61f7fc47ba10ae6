use std::collections::BTreeSet;
use std::io::Write;

use super::row::Row;
use super::table::Table;
use crate::error::CarsResult;

/// Name of the row-key column in exports
pub const ID_COLUMN: &str = "id";

fn cell_text(row: &Row, column: &str) -> String {
    row.get(column)
        .map(|bytes| String::from_utf8_lossy(bytes).into_owned())
        .unwrap_or_default()
}

/// Write the table as CSV: an `id` column followed by every column seen
/// in any row, sorted. Missing cells are left empty. Returns rows written.
pub fn export_csv<W: Write>(table: &Table<'_>, out: W) -> CarsResult<usize> {
    // First pass collects the header
    let mut columns = BTreeSet::new();
    for row in table.scan()? {
        columns.extend(row?.columns().map(|c| c.to_string()));
    }

    let mut writer = csv::Writer::from_writer(out);
    let mut header = vec![ID_COLUMN.to_string()];
    header.extend(columns.iter().cloned());
    writer.write_record(&header)?;

    let mut count = 0;
    for row in table.scan()? {
        let row = row?;
        let mut record = Vec::with_capacity(header.len());
        record.push(row.key().to_string());
        record.extend(columns.iter().map(|c| cell_text(&row, c)));
        writer.write_record(&record)?;
        count += 1;
    }
    writer.flush()?;
    Ok(count)
}

/// Write the table as JSON Lines, one object per row keyed by column name
pub fn export_jsonl<W: Write>(table: &Table<'_>, mut out: W) -> CarsResult<usize> {
    let mut count = 0;
    for row in table.scan()? {
        let row = row?;
        let mut obj = serde_json::Map::new();
        obj.insert(ID_COLUMN.to_string(), row.key().into());
        for (column, value) in row.iter() {
            obj.insert(
                column.to_string(),
                String::from_utf8_lossy(value).into_owned().into(),
            );
        }
        serde_json::to_writer(&mut out, &serde_json::Value::Object(obj))?;
        out.write_all(b"\n")?;
        count += 1;
    }
    out.flush()?;
    Ok(count)
}
