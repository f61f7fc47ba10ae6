pub mod batch;
pub mod cars;
pub mod config;
pub mod error;
pub mod storage;

pub use batch::BatchAnalyzer;
pub use config::BatchConfig;
pub use error::{CarsError, CarsResult};
pub use storage::{Row, StorageEngine, Table};
