pub mod codec;
pub mod engine;
pub mod export;
pub mod row;
pub mod scan;
pub mod table;

pub use engine::StorageEngine;
pub use row::Row;
pub use scan::TableScanner;
pub use table::{Table, TableDescriptor};
