pub mod analysis;
pub mod loader;
pub mod record;
pub mod report;
pub mod schema;

pub use analysis::{MileageSummary, PriceAverage};
pub use loader::{load_file, load_records, setup_table};
pub use record::{CarView, Mileage};
pub use report::Report;
pub use schema::{row_key, CsvCar, FAMILIES};
