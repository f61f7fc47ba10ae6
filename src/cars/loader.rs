use indicatif::{ProgressBar, ProgressStyle};
use std::fs::File;
use std::io::Read;
use std::path::Path;

use super::schema::{row_key, CsvCar, FAMILIES};
use crate::error::{CarsError, CarsResult};
use crate::storage::{StorageEngine, Table};

/// Drop the table if it exists and create it fresh with the car families
pub fn setup_table(engine: &mut StorageEngine, name: &str) -> CarsResult<()> {
    if engine.table_exists(name)? {
        tracing::info!("Deleting existing table {}", name);
        engine.delete_table(name)?;
    }
    engine.create_table(name, &FAMILIES)?;
    tracing::info!("Table {} created", name);
    Ok(())
}

/// Load every CSV record into `table`, one put per record.
///
/// Row `i` (0-based, header excluded) is stored under `car_<i>`. The
/// first malformed record aborts the load.
pub fn load_records<R: Read>(table: &Table<'_>, reader: R) -> CarsResult<usize> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut loaded = 0;
    for (index, result) in csv_reader.deserialize::<CsvCar>().enumerate() {
        let car = result.map_err(|source| CarsError::MalformedRow { index, source })?;
        table.put(&row_key(index), car.cells())?;
        loaded += 1;
    }

    Ok(loaded)
}

/// Load the CSV file at `path`, optionally drawing a progress bar on stderr
pub fn load_file(table: &Table<'_>, path: &Path, show_progress: bool) -> CarsResult<usize> {
    let file = File::open(path)?;
    let total_size = file.metadata()?.len();

    let pb = if show_progress {
        let pb = ProgressBar::new(total_size);
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({eta})")
            .map(|s| s.progress_chars("#>-"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        pb.set_style(style);
        pb
    } else {
        ProgressBar::hidden()
    };

    let start = std::time::Instant::now();
    let result = load_records(table, pb.wrap_read(file));
    pb.finish_and_clear();

    let loaded = result?;
    tracing::info!(
        "Loaded {} records from {} in {:?}",
        loaded,
        path.display(),
        start.elapsed()
    );
    Ok(loaded)
}
