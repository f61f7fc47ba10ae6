use crate::error::{CarsError, CarsResult};

/// Separates the row key from the qualifier inside a family key.
/// Sorts below every printable byte, so `car_1\0..` < `car_10\0..`
/// and a forward iteration visits rows in plain row-key order.
pub const CELL_SEPARATOR: u8 = 0x00;

/// Separates family and qualifier in a column name (`basic:year`)
pub const COLUMN_SEPARATOR: char = ':';

/// Build the storage key of one cell: `<row> 0x00 <qualifier>`
pub fn encode_cell_key(row_key: &str, qualifier: &str) -> Vec<u8> {
    let mut key = Vec::with_capacity(row_key.len() + qualifier.len() + 1);
    key.extend_from_slice(row_key.as_bytes());
    key.push(CELL_SEPARATOR);
    key.extend_from_slice(qualifier.as_bytes());
    key
}

/// Prefix shared by every cell of a row within one family
pub fn row_prefix(row_key: &str) -> Vec<u8> {
    let mut prefix = Vec::with_capacity(row_key.len() + 1);
    prefix.extend_from_slice(row_key.as_bytes());
    prefix.push(CELL_SEPARATOR);
    prefix
}

/// Split a storage key back into (row key, qualifier)
pub fn decode_cell_key(bytes: &[u8]) -> Option<(&[u8], &[u8])> {
    let pos = bytes.iter().position(|&b| b == CELL_SEPARATOR)?;
    Some((&bytes[..pos], &bytes[pos + 1..]))
}

/// Row keys are non-empty and must not contain the cell separator
pub fn validate_row_key(row_key: &str) -> CarsResult<()> {
    if row_key.is_empty() || row_key.as_bytes().contains(&CELL_SEPARATOR) {
        return Err(CarsError::InvalidRowKey(row_key.to_string()));
    }
    Ok(())
}

/// Split `family:qualifier`
pub fn split_column(column: &str) -> CarsResult<(&str, &str)> {
    match column.split_once(COLUMN_SEPARATOR) {
        Some((family, qualifier))
            if !family.is_empty()
                && !qualifier.is_empty()
                && !qualifier.as_bytes().contains(&CELL_SEPARATOR) =>
        {
            Ok((family, qualifier))
        }
        _ => Err(CarsError::InvalidColumn(column.to_string())),
    }
}

/// Join a family and qualifier into a column name
pub fn column_name(family: &str, qualifier: &str) -> String {
    format!("{}{}{}", family, COLUMN_SEPARATOR, qualifier)
}
