//! Batch configuration
//!
//! Analysis parameters are fixed constants. Only the locations of the
//! inputs can be changed, through environment variables that may also
//! be set in a `.env` file in the working directory:
//!
//! - `USEDCARS_CSV` - path of the listings CSV
//! - `USEDCARS_DATA_DIR` - directory of the store
//! - `USEDCARS_PROGRESS` - `0`/`false` hides the load progress bar

use std::path::{Path, PathBuf};

/// Environment variable names
pub const ENV_CSV: &str = "USEDCARS_CSV";
pub const ENV_DATA_DIR: &str = "USEDCARS_DATA_DIR";
pub const ENV_PROGRESS: &str = "USEDCARS_PROGRESS";

pub const DEFAULT_CSV_PATH: &str = "Car_details_v3.csv";
pub const DEFAULT_DATA_DIR: &str = "./data";
pub const TABLE_NAME: &str = "used_cars";

pub const PREVIEW_LIMIT: usize = 5;
pub const PRICE_THRESHOLD: i64 = 6_000_000;
pub const TOP_KM_LIMIT: usize = 5;
pub const OLDEST_LIMIT: usize = 5;
pub const UPDATE_ROW_KEY: &str = "car_0";
pub const UPDATE_PRICE: i64 = 460_000;

/// Everything the batch run needs to know
#[derive(Debug, Clone, PartialEq)]
pub struct BatchConfig {
    pub csv_path: PathBuf,
    pub data_dir: PathBuf,
    pub table: String,
    pub show_progress: bool,
    pub preview_limit: usize,
    pub price_threshold: i64,
    pub top_km_limit: usize,
    pub oldest_limit: usize,
    pub update_row_key: String,
    pub update_price: i64,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            csv_path: PathBuf::from(DEFAULT_CSV_PATH),
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            table: TABLE_NAME.to_string(),
            show_progress: true,
            preview_limit: PREVIEW_LIMIT,
            price_threshold: PRICE_THRESHOLD,
            top_km_limit: TOP_KM_LIMIT,
            oldest_limit: OLDEST_LIMIT,
            update_row_key: UPDATE_ROW_KEY.to_string(),
            update_price: UPDATE_PRICE,
        }
    }
}

impl BatchConfig {
    /// Defaults with the store and CSV rooted at explicit paths
    pub fn new(csv_path: impl AsRef<Path>, data_dir: impl AsRef<Path>) -> Self {
        Self {
            csv_path: csv_path.as_ref().to_path_buf(),
            data_dir: data_dir.as_ref().to_path_buf(),
            ..Self::default()
        }
    }

    /// Load `.env` from the working directory (if any) and apply overrides
    pub fn from_env() -> Self {
        if let Err(e) = dotenvy::dotenv() {
            if !e.not_found() {
                tracing::warn!("Ignoring unreadable .env file: {}", e);
            }
        }
        let mut config = Self::default();
        config.apply_env_overrides(|name| std::env::var(name).ok());
        config
    }

    /// Apply overrides from a variable lookup
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(csv) = lookup(ENV_CSV).filter(|v| !v.is_empty()) {
            self.csv_path = PathBuf::from(csv);
        }

        if let Some(dir) = lookup(ENV_DATA_DIR).filter(|v| !v.is_empty()) {
            self.data_dir = PathBuf::from(dir);
        }

        if let Some(progress) = lookup(ENV_PROGRESS) {
            match progress.trim().to_ascii_lowercase().as_str() {
                "0" | "false" | "no" | "off" => self.show_progress = false,
                "1" | "true" | "yes" | "on" => self.show_progress = true,
                other => tracing::warn!("Ignoring {}={}", ENV_PROGRESS, other),
            }
        }
    }
}
