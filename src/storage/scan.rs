use rocksdb::DBRawIterator;

use super::codec::{column_name, decode_cell_key};
use super::row::Row;
use crate::error::{CarsError, CarsResult};

/// Full-table scan.
///
/// Holds one raw iterator per family and merges them: each step takes
/// the smallest row key any family is positioned on and drains every
/// family's cells for that key into one [`Row`]. A row appears as long
/// as any of its families has a cell.
pub struct TableScanner<'a> {
    cursors: Vec<(String, DBRawIterator<'a>)>,
    done: bool,
}

impl<'a> TableScanner<'a> {
    pub(crate) fn new(cursors: Vec<(String, DBRawIterator<'a>)>) -> Self {
        Self {
            cursors,
            done: false,
        }
    }

    fn next_row(&mut self) -> CarsResult<Option<Row>> {
        let mut min_row: Option<Vec<u8>> = None;
        for (family, iter) in &self.cursors {
            if !iter.valid() {
                iter.status()?;
                continue;
            }
            let key = iter.key().unwrap_or_default();
            let (row_key, _) = decode_cell_key(key).ok_or_else(|| {
                CarsError::InternalError(format!("Corrupt cell key in family {}", family))
            })?;
            if min_row.as_deref().map_or(true, |current| row_key < current) {
                min_row = Some(row_key.to_vec());
            }
        }

        let Some(row_key) = min_row else {
            return Ok(None);
        };

        let key = String::from_utf8(row_key.clone())
            .map_err(|e| CarsError::InvalidRowKey(String::from_utf8_lossy(e.as_bytes()).into_owned()))?;
        let mut row = Row::new(key);

        for (family, iter) in &mut self.cursors {
            while iter.valid() {
                let (qualifier, value) = match (iter.key(), iter.value()) {
                    (Some(k), Some(v)) => match decode_cell_key(k) {
                        Some((r, q)) if r == row_key.as_slice() => (q.to_vec(), v.to_vec()),
                        _ => break,
                    },
                    _ => break,
                };
                row.insert(
                    column_name(family, &String::from_utf8_lossy(&qualifier)),
                    value,
                );
                iter.next();
            }
        }

        Ok(Some(row))
    }
}

impl Iterator for TableScanner<'_> {
    type Item = CarsResult<Row>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.next_row() {
            Ok(Some(row)) => Some(Ok(row)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::storage::StorageEngine;
    use tempfile::TempDir;

    fn create_test_engine() -> (StorageEngine, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let mut engine = StorageEngine::open(temp_dir.path()).unwrap();
        engine
            .create_table("cars", &["basic", "specs", "sales"])
            .unwrap();
        (engine, temp_dir)
    }

    #[test]
    fn test_scan_empty_table() {
        let (engine, _dir) = create_test_engine();
        let table = engine.table("cars").unwrap();
        assert_eq!(table.scan().unwrap().count(), 0);
    }

    #[test]
    fn test_scan_merges_families() {
        let (engine, _dir) = create_test_engine();
        let table = engine.table("cars").unwrap();

        table
            .put(
                "car_0",
                [
                    ("basic:name", "Swift"),
                    ("specs:seats", "5"),
                    ("sales:selling_price", "450000"),
                ],
            )
            .unwrap();
        table
            .put("car_1", [("basic:name", "City"), ("sales:selling_price", "370000")])
            .unwrap();

        let rows: Vec<_> = table.scan().unwrap().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].key(), "car_0");
        assert_eq!(rows[0].len(), 3);
        assert_eq!(rows[1].key(), "car_1");
        assert_eq!(rows[1].len(), 2);
        assert!(rows[1].get("specs:seats").is_none());
    }

    #[test]
    fn test_scan_is_in_row_key_order() {
        let (engine, _dir) = create_test_engine();
        let table = engine.table("cars").unwrap();

        for i in [2, 10, 0, 1, 11] {
            table
                .put(&format!("car_{}", i), [("basic:year", "2010")])
                .unwrap();
        }

        let keys: Vec<String> = table
            .scan()
            .unwrap()
            .map(|r| r.unwrap().key().to_string())
            .collect();
        assert_eq!(keys, vec!["car_0", "car_1", "car_10", "car_11", "car_2"]);
    }

    #[test]
    fn test_scan_row_present_in_one_family_only() {
        let (engine, _dir) = create_test_engine();
        let table = engine.table("cars").unwrap();

        table.put("car_0", [("basic:name", "Swift")]).unwrap();
        table.put("car_5", [("sales:selling_price", "1")]).unwrap();
        table.put("car_3", [("specs:seats", "7")]).unwrap();

        let keys: Vec<String> = table
            .scan()
            .unwrap()
            .map(|r| r.unwrap().key().to_string())
            .collect();
        assert_eq!(keys, vec!["car_0", "car_3", "car_5"]);
        assert_eq!(table.count_rows().unwrap(), 3);
    }
}
