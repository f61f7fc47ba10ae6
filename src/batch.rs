use std::io::Write;

use crate::cars::{analysis, load_file, setup_table, Report};
use crate::config::BatchConfig;
use crate::error::CarsResult;
use crate::storage::StorageEngine;

/// Runs the whole job: schema setup, bulk load, then every analysis in
/// report order against an explicitly passed store handle.
#[derive(Debug, Clone)]
pub struct BatchAnalyzer {
    config: BatchConfig,
}

impl BatchAnalyzer {
    pub fn new(config: BatchConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &BatchConfig {
        &self.config
    }

    /// Recreate the table and load the CSV; returns the number of records
    pub fn prepare(&self, engine: &mut StorageEngine) -> CarsResult<usize> {
        setup_table(engine, &self.config.table)?;
        let table = engine.table(&self.config.table)?;
        load_file(&table, &self.config.csv_path, self.config.show_progress)
    }

    /// Run the analyses in order, writing each section to `out`.
    ///
    /// The price update happens between the transmission averages and
    /// the most-recent-by-fuel section, so later sections see it.
    pub fn analyze<W: Write>(&self, engine: &StorageEngine, out: W) -> CarsResult<W> {
        let cfg = &self.config;
        let table = engine.table(&cfg.table)?;
        let mut report = Report::new(out);

        report.preview(&analysis::preview(&table, cfg.preview_limit)?)?;
        report.priced_above(
            cfg.price_threshold,
            &analysis::priced_above(&table, cfg.price_threshold)?,
        )?;
        report.owner_histogram(&analysis::owner_histogram(&table)?)?;
        report.average_price_by_fuel(&analysis::average_price_by_fuel(&table)?)?;
        report.most_driven(&analysis::most_driven(&table, cfg.top_km_limit)?)?;
        report.average_price_by_transmission(&analysis::average_price_by_transmission(&table)?)?;

        analysis::update_price(&table, &cfg.update_row_key, cfg.update_price)?;
        report.price_updated(&cfg.update_row_key, cfg.update_price)?;

        report.most_recent_by_fuel(&analysis::most_recent_by_fuel(&table)?)?;
        report.average_price_by_year(&analysis::average_price_by_year(&table)?)?;
        report.oldest(&analysis::oldest(&table, cfg.oldest_limit)?)?;

        let mileage = analysis::average_mileage(&table)?;
        if !mileage.skipped.is_empty() {
            tracing::info!(
                "{} cars skipped in mileage averages",
                mileage.skipped.len()
            );
        }
        report.average_mileage(&mileage)?;

        report.flush()?;
        Ok(report.into_inner())
    }

    /// Full run: prepare then analyze
    pub fn run<W: Write>(&self, engine: &mut StorageEngine, out: W) -> CarsResult<W> {
        let loaded = self.prepare(engine)?;
        tracing::info!("{} records loaded into {}", loaded, self.config.table);
        self.analyze(engine, out)
    }
}
