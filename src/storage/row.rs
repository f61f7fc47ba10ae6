use std::collections::BTreeMap;

use crate::error::{CarsError, CarsResult};

/// One row returned by a scan or point lookup.
///
/// Cells are addressed by their full column name (`family:qualifier`)
/// and hold the raw stored bytes. Interpretation is left to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    key: String,
    cells: BTreeMap<String, Vec<u8>>,
}

impl Row {
    pub fn new(key: String) -> Self {
        Self {
            key,
            cells: BTreeMap::new(),
        }
    }

    /// Row key
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn insert(&mut self, column: String, value: Vec<u8>) {
        self.cells.insert(column, value);
    }

    /// Raw cell bytes, if the cell exists
    pub fn get(&self, column: &str) -> Option<&[u8]> {
        self.cells.get(column).map(|v| v.as_slice())
    }

    /// Cell decoded as UTF-8 text
    pub fn get_str(&self, column: &str) -> CarsResult<&str> {
        let bytes = self.get(column).ok_or_else(|| CarsError::MissingCell {
            row: self.key.clone(),
            column: column.to_string(),
        })?;
        std::str::from_utf8(bytes).map_err(|_| CarsError::InvalidEncoding {
            row: self.key.clone(),
            column: column.to_string(),
        })
    }

    /// Column names in sorted order
    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.cells.keys().map(|k| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[u8])> {
        self.cells.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_row() -> Row {
        let mut row = Row::new("car_0".to_string());
        row.insert("basic:name".to_string(), b"Maruti Swift".to_vec());
        row.insert("basic:year".to_string(), b"2014".to_vec());
        row.insert("specs:torque".to_string(), vec![0xff, 0xfe]);
        row
    }

    #[test]
    fn test_get_str() {
        let row = sample_row();
        assert_eq!(row.key(), "car_0");
        assert_eq!(row.get_str("basic:name").unwrap(), "Maruti Swift");
        assert_eq!(row.len(), 3);
    }

    #[test]
    fn test_missing_cell() {
        let row = sample_row();
        match row.get_str("sales:selling_price") {
            Err(CarsError::MissingCell { row, column }) => {
                assert_eq!(row, "car_0");
                assert_eq!(column, "sales:selling_price");
            }
            other => panic!("expected MissingCell, got {:?}", other),
        }
    }

    #[test]
    fn test_invalid_encoding() {
        let row = sample_row();
        assert!(matches!(
            row.get_str("specs:torque"),
            Err(CarsError::InvalidEncoding { .. })
        ));
    }

    #[test]
    fn test_columns_sorted() {
        let row = sample_row();
        let columns: Vec<&str> = row.columns().collect();
        assert_eq!(columns, vec!["basic:name", "basic:year", "specs:torque"]);
    }
}
