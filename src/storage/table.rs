use chrono::{DateTime, Utc};
use rocksdb::{ColumnFamily, Direction, IteratorMode, WriteBatch, DB};
use serde::{Deserialize, Serialize};

use super::codec::{column_name, decode_cell_key, encode_cell_key, row_prefix, split_column, validate_row_key};
use super::engine::family_cf_name;
use super::row::Row;
use super::scan::TableScanner;
use crate::error::{CarsError, CarsResult};

/// Persisted table definition
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TableDescriptor {
    pub name: String,
    pub families: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl TableDescriptor {
    pub fn new(name: &str, families: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            families: families.iter().map(|f| f.to_string()).collect(),
            created_at: Utc::now(),
        }
    }
}

/// Handle to one table of an open [`StorageEngine`](super::StorageEngine)
pub struct Table<'a> {
    db: &'a DB,
    descriptor: TableDescriptor,
}

impl<'a> Table<'a> {
    pub(crate) fn new(db: &'a DB, descriptor: TableDescriptor) -> CarsResult<Self> {
        let table = Self { db, descriptor };
        // Every family must be backed by a column family
        for family in &table.descriptor.families {
            table.family_cf(family)?;
        }
        Ok(table)
    }

    pub fn name(&self) -> &str {
        &self.descriptor.name
    }

    pub fn families(&self) -> &[String] {
        &self.descriptor.families
    }

    pub fn descriptor(&self) -> &TableDescriptor {
        &self.descriptor
    }

    fn family_cf(&self, family: &str) -> CarsResult<&'a ColumnFamily> {
        if !self.descriptor.families.iter().any(|f| f == family) {
            return Err(CarsError::UnknownFamily {
                table: self.descriptor.name.clone(),
                family: family.to_string(),
            });
        }
        let cf_name = family_cf_name(&self.descriptor.name, family);
        self.db.cf_handle(&cf_name).ok_or_else(|| {
            CarsError::InternalError(format!("Column family {} missing", cf_name))
        })
    }

    /// Write cells of one row in a single atomic batch.
    ///
    /// Columns are `family:qualifier`; existing cells with the same
    /// column are overwritten, other cells of the row are left as is.
    pub fn put<I, C, V>(&self, row_key: &str, cells: I) -> CarsResult<()>
    where
        I: IntoIterator<Item = (C, V)>,
        C: AsRef<str>,
        V: AsRef<[u8]>,
    {
        validate_row_key(row_key)?;

        let mut batch = WriteBatch::default();
        for (column, value) in cells {
            let (family, qualifier) = split_column(column.as_ref())?;
            let cf = self.family_cf(family)?;
            batch.put_cf(cf, encode_cell_key(row_key, qualifier), value.as_ref());
        }

        if batch.is_empty() {
            return Ok(());
        }

        self.db
            .write(batch)
            .map_err(|e| CarsError::InternalError(format!("Failed to write row {}: {}", row_key, e)))
    }

    /// Point lookup of one row across all families
    pub fn get_row(&self, row_key: &str) -> CarsResult<Option<Row>> {
        validate_row_key(row_key)?;
        let prefix = row_prefix(row_key);
        let mut row = Row::new(row_key.to_string());

        for family in &self.descriptor.families {
            let cf = self.family_cf(family)?;
            let iter = self
                .db
                .iterator_cf(cf, IteratorMode::From(&prefix, Direction::Forward));
            for item in iter {
                let (key, value) = item?;
                if !key.starts_with(&prefix) {
                    break;
                }
                if let Some((_, qualifier)) = decode_cell_key(&key) {
                    row.insert(
                        column_name(family, &String::from_utf8_lossy(qualifier)),
                        value.to_vec(),
                    );
                }
            }
        }

        Ok(if row.is_empty() { None } else { Some(row) })
    }

    /// Full scan in row-key order
    pub fn scan(&self) -> CarsResult<TableScanner<'a>> {
        let mut cursors = Vec::with_capacity(self.descriptor.families.len());
        for family in &self.descriptor.families {
            let cf = self.family_cf(family)?;
            let mut iter = self.db.raw_iterator_cf(cf);
            iter.seek_to_first();
            cursors.push((family.clone(), iter));
        }
        Ok(TableScanner::new(cursors))
    }

    /// Number of rows, by full scan
    pub fn count_rows(&self) -> CarsResult<usize> {
        let mut count = 0;
        for row in self.scan()? {
            row?;
            count += 1;
        }
        Ok(count)
    }
}
