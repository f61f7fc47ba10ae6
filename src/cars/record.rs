//! Typed access to stored listings.
//!
//! Every cell is stored as text; these accessors are the only place
//! where it is parsed. Each one fails with an error naming the row and
//! column, and callers decide whether that aborts or skips:
//!
//! - text accessors fail with `MissingCell` or `InvalidEncoding`
//! - integer accessors additionally fail with `InvalidValue`
//! - [`CarView::mileage`] fails with `InvalidValue` when the text is not
//!   `<number><optional unit>`

use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;
use std::str::FromStr;

use super::schema::{FUEL, KM_DRIVEN, MILEAGE, NAME, OWNER, SELLER_TYPE, SELLING_PRICE, TRANSMISSION, YEAR};
use crate::error::{CarsError, CarsResult};
use crate::storage::Row;

static MILEAGE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(\d+(?:\.\d+)?)(?:\s*(\S+))?").expect("mileage pattern is valid")
});

/// Fuel efficiency reading such as `23.4 kmpl` or `21.1 km/kg`
#[derive(Debug, Clone, PartialEq)]
pub struct Mileage {
    pub value: f64,
    /// Unit token, empty when the reading has none
    pub unit: String,
}

impl Mileage {
    /// Parse `<number><optional unit>`; anything after the unit is ignored
    pub fn parse(text: &str) -> Option<Self> {
        let caps = MILEAGE_PATTERN.captures(text)?;
        let value = caps.get(1)?.as_str().parse::<f64>().ok()?;
        let unit = caps
            .get(2)
            .map(|m| m.as_str().to_string())
            .unwrap_or_default();
        Some(Self { value, unit })
    }
}

impl fmt::Display for Mileage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.unit.is_empty() {
            write!(f, "{}", self.value)
        } else {
            write!(f, "{} {}", self.value, self.unit)
        }
    }
}

/// Read-only view of one stored listing
#[derive(Debug, Clone, Copy)]
pub struct CarView<'r> {
    row: &'r Row,
}

impl<'r> CarView<'r> {
    pub fn new(row: &'r Row) -> Self {
        Self { row }
    }

    /// Row key (`car_<i>`)
    pub fn id(&self) -> &'r str {
        self.row.key()
    }

    pub fn name(&self) -> CarsResult<&'r str> {
        self.row.get_str(NAME)
    }

    pub fn fuel(&self) -> CarsResult<&'r str> {
        self.row.get_str(FUEL)
    }

    pub fn transmission(&self) -> CarsResult<&'r str> {
        self.row.get_str(TRANSMISSION)
    }

    pub fn owner(&self) -> CarsResult<&'r str> {
        self.row.get_str(OWNER)
    }

    pub fn seller_type(&self) -> CarsResult<&'r str> {
        self.row.get_str(SELLER_TYPE)
    }

    pub fn year(&self) -> CarsResult<i32> {
        self.parse(YEAR)
    }

    pub fn selling_price(&self) -> CarsResult<i64> {
        self.parse(SELLING_PRICE)
    }

    pub fn km_driven(&self) -> CarsResult<i64> {
        self.parse(KM_DRIVEN)
    }

    pub fn mileage(&self) -> CarsResult<Mileage> {
        let text = self.row.get_str(MILEAGE)?;
        Mileage::parse(text).ok_or_else(|| self.invalid(MILEAGE, text))
    }

    fn parse<T: FromStr>(&self, column: &str) -> CarsResult<T> {
        let text = self.row.get_str(column)?;
        text.trim().parse().map_err(|_| self.invalid(column, text))
    }

    fn invalid(&self, column: &str, value: &str) -> CarsError {
        CarsError::InvalidValue {
            row: self.row.key().to_string(),
            column: column.to_string(),
            value: value.to_string(),
        }
    }
}
