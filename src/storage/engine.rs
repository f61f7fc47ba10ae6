use rocksdb::{ColumnFamily, ColumnFamilyDescriptor, Direction, IteratorMode, Options, DB};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

use super::table::{Table, TableDescriptor};
use crate::error::{CarsError, CarsResult};

/// Metadata column family name
const META_CF: &str = "_meta";

/// Key prefix of table descriptors inside META_CF
const TABLE_PREFIX: &str = "table:";

/// Column family backing one family of one table
pub fn family_cf_name(table: &str, family: &str) -> String {
    format!("{}:{}", table, family)
}

/// The store handle, backed by RocksDB.
///
/// A table is a group of column families (`<table>:<family>`) plus a
/// descriptor in the metadata family. DDL takes `&mut self`; reads and
/// writes go through [`Table`] handles that borrow the engine.
pub struct StorageEngine {
    db: DB,
    path: PathBuf,
}

impl std::fmt::Debug for StorageEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorageEngine")
            .field("path", &self.path)
            .finish()
    }
}

impl StorageEngine {
    /// Open (or create) the store in `data_dir`
    pub fn open<P: AsRef<Path>>(data_dir: P) -> CarsResult<Self> {
        let path = data_dir.as_ref().to_path_buf();

        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        // Limit WAL size and info log retention
        opts.set_max_total_wal_size(50 * 1024 * 1024);
        opts.set_keep_log_file_num(5);

        // Existing column families must all be named when opening
        let mut cf_names = match DB::list_cf(&opts, &path) {
            Ok(cfs) => cfs,
            Err(_) => vec!["default".to_string()],
        };
        if !cf_names.iter().any(|name| name == META_CF) {
            cf_names.push(META_CF.to_string());
        }

        let cf_descriptors: Vec<ColumnFamilyDescriptor> = cf_names
            .iter()
            .map(|name| ColumnFamilyDescriptor::new(name, Options::default()))
            .collect();

        let db = DB::open_cf_descriptors(&opts, &path, cf_descriptors)
            .map_err(|e| CarsError::InternalError(format!("Failed to open RocksDB: {}", e)))?;

        tracing::info!("Opened store at {}", path.display());
        Ok(Self { db, path })
    }

    /// Get the data directory path
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn meta_cf(&self) -> CarsResult<&ColumnFamily> {
        self.db
            .cf_handle(META_CF)
            .ok_or_else(|| CarsError::InternalError("Metadata column family missing".to_string()))
    }

    fn descriptor(&self, name: &str) -> CarsResult<Option<TableDescriptor>> {
        let meta = self.meta_cf()?;
        let key = format!("{}{}", TABLE_PREFIX, name);
        match self.db.get_cf(meta, key.as_bytes())? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    // ==================== Table Operations ====================

    /// List all table names, sorted
    pub fn list_tables(&self) -> CarsResult<Vec<String>> {
        let meta = self.meta_cf()?;
        let prefix = TABLE_PREFIX.as_bytes();
        let iter = self
            .db
            .iterator_cf(meta, IteratorMode::From(prefix, Direction::Forward));

        let mut tables = Vec::new();
        for item in iter {
            let (key, _) = item?;
            if !key.starts_with(prefix) {
                break;
            }
            if let Ok(name) = std::str::from_utf8(&key[prefix.len()..]) {
                tables.push(name.to_string());
            }
        }
        Ok(tables)
    }

    pub fn table_exists(&self, name: &str) -> CarsResult<bool> {
        Ok(self.descriptor(name)?.is_some())
    }

    /// Create a table with the given column families
    pub fn create_table(&mut self, name: &str, families: &[&str]) -> CarsResult<()> {
        if name.is_empty() || name.contains(':') {
            return Err(CarsError::InvalidTableName(name.to_string()));
        }
        if families.is_empty() {
            return Err(CarsError::InvalidFamilies(
                "a table needs at least one family".to_string(),
            ));
        }
        let mut seen = HashSet::new();
        for family in families {
            if family.is_empty() || family.contains(':') {
                return Err(CarsError::InvalidFamilies(format!(
                    "invalid family name '{}'",
                    family
                )));
            }
            if !seen.insert(*family) {
                return Err(CarsError::InvalidFamilies(format!(
                    "duplicate family '{}'",
                    family
                )));
            }
        }

        if self.table_exists(name)? {
            return Err(CarsError::TableAlreadyExists(name.to_string()));
        }

        for family in families {
            let cf_name = family_cf_name(name, family);
            // Leftover from an interrupted delete
            if self.db.cf_handle(&cf_name).is_some() {
                tracing::warn!("Dropping orphaned column family {}", cf_name);
                self.db.drop_cf(&cf_name)?;
            }
            self.db
                .create_cf(&cf_name, &Options::default())
                .map_err(|e| {
                    CarsError::InternalError(format!("Failed to create family {}: {}", cf_name, e))
                })?;
        }

        let descriptor = TableDescriptor::new(name, families);
        let meta = self.meta_cf()?;
        let key = format!("{}{}", TABLE_PREFIX, name);
        self.db
            .put_cf(meta, key.as_bytes(), serde_json::to_vec(&descriptor)?)
            .map_err(|e| CarsError::InternalError(format!("Failed to create table: {}", e)))?;

        tracing::info!("Created table {} with families {:?}", name, families);
        Ok(())
    }

    /// Drop a table and all of its column families
    pub fn delete_table(&mut self, name: &str) -> CarsResult<()> {
        let descriptor = self
            .descriptor(name)?
            .ok_or_else(|| CarsError::TableNotFound(name.to_string()))?;

        for family in &descriptor.families {
            let cf_name = family_cf_name(name, family);
            if self.db.cf_handle(&cf_name).is_some() {
                self.db.drop_cf(&cf_name).map_err(|e| {
                    CarsError::InternalError(format!("Failed to drop family {}: {}", cf_name, e))
                })?;
            }
        }

        let meta = self.meta_cf()?;
        let key = format!("{}{}", TABLE_PREFIX, name);
        self.db
            .delete_cf(meta, key.as_bytes())
            .map_err(|e| CarsError::InternalError(format!("Failed to delete table: {}", e)))?;

        tracing::info!("Deleted table {}", name);
        Ok(())
    }

    /// Get a handle to an existing table
    pub fn table(&self, name: &str) -> CarsResult<Table<'_>> {
        let descriptor = self
            .descriptor(name)?
            .ok_or_else(|| CarsError::TableNotFound(name.to_string()))?;
        Table::new(&self.db, descriptor)
    }

    /// Flush memtables of every column family to disk
    pub fn flush(&self) -> CarsResult<()> {
        let names = DB::list_cf(&Options::default(), &self.path)?;
        for name in names {
            if let Some(cf) = self.db.cf_handle(&name) {
                self.db
                    .flush_cf(cf)
                    .map_err(|e| CarsError::InternalError(format!("Failed to flush: {}", e)))?;
            }
        }
        Ok(())
    }

    /// Flush and release the store
    pub fn close(self) -> CarsResult<()> {
        let result = self.flush();
        tracing::info!("Closed store at {}", self.path.display());
        drop(self.db);
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_engine() -> (StorageEngine, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let engine = StorageEngine::open(temp_dir.path()).unwrap();
        (engine, temp_dir)
    }

    #[test]
    fn test_create_table() {
        let (mut engine, _dir) = create_test_engine();

        assert!(engine.create_table("cars", &["basic", "sales"]).is_ok());
        assert!(engine.table_exists("cars").unwrap());
        assert_eq!(engine.list_tables().unwrap(), vec!["cars".to_string()]);

        let table = engine.table("cars").unwrap();
        assert_eq!(table.families(), &["basic".to_string(), "sales".to_string()]);
    }

    #[test]
    fn test_create_duplicate_table() {
        let (mut engine, _dir) = create_test_engine();

        engine.create_table("cars", &["basic"]).unwrap();
        assert!(matches!(
            engine.create_table("cars", &["basic"]),
            Err(CarsError::TableAlreadyExists(_))
        ));
    }

    #[test]
    fn test_invalid_definitions() {
        let (mut engine, _dir) = create_test_engine();

        assert!(matches!(
            engine.create_table("", &["basic"]),
            Err(CarsError::InvalidTableName(_))
        ));
        assert!(matches!(
            engine.create_table("a:b", &["basic"]),
            Err(CarsError::InvalidTableName(_))
        ));
        assert!(matches!(
            engine.create_table("cars", &[]),
            Err(CarsError::InvalidFamilies(_))
        ));
        assert!(matches!(
            engine.create_table("cars", &["basic", "basic"]),
            Err(CarsError::InvalidFamilies(_))
        ));
        assert!(engine.list_tables().unwrap().is_empty());
    }

    #[test]
    fn test_delete_table() {
        let (mut engine, _dir) = create_test_engine();

        engine.create_table("cars", &["basic", "sales"]).unwrap();
        engine
            .table("cars")
            .unwrap()
            .put("car_0", [("basic:name", "Swift")])
            .unwrap();

        engine.delete_table("cars").unwrap();
        assert!(!engine.table_exists("cars").unwrap());
        assert!(matches!(engine.table("cars"), Err(CarsError::TableNotFound(_))));

        // Recreated table starts empty
        engine.create_table("cars", &["basic", "sales"]).unwrap();
        assert_eq!(engine.table("cars").unwrap().count_rows().unwrap(), 0);
    }

    #[test]
    fn test_delete_missing_table() {
        let (mut engine, _dir) = create_test_engine();
        assert!(matches!(
            engine.delete_table("nope"),
            Err(CarsError::TableNotFound(_))
        ));
    }

    #[test]
    fn test_reopen_keeps_tables() {
        let temp_dir = TempDir::new().unwrap();
        {
            let mut engine = StorageEngine::open(temp_dir.path()).unwrap();
            engine.create_table("cars", &["basic"]).unwrap();
            engine
                .table("cars")
                .unwrap()
                .put("car_0", [("basic:year", "2014")])
                .unwrap();
            engine.close().unwrap();
        }

        let engine = StorageEngine::open(temp_dir.path()).unwrap();
        let table = engine.table("cars").unwrap();
        let row = table.get_row("car_0").unwrap().unwrap();
        assert_eq!(row.get_str("basic:year").unwrap(), "2014");
    }
}
