use serde::Deserialize;

/// Column families of the listings table
pub const FAMILY_BASIC: &str = "basic";
pub const FAMILY_SPECS: &str = "specs";
pub const FAMILY_SALES: &str = "sales";
pub const FAMILY_CONDITION: &str = "condition";

pub const FAMILIES: [&str; 4] = [FAMILY_BASIC, FAMILY_SPECS, FAMILY_SALES, FAMILY_CONDITION];

// Stored columns
pub const NAME: &str = "basic:name";
pub const YEAR: &str = "basic:year";
pub const TRANSMISSION: &str = "basic:transmission";
pub const FUEL: &str = "basic:fuel";
pub const ENGINE: &str = "specs:engine";
pub const MAX_POWER: &str = "specs:max_power";
pub const TORQUE: &str = "specs:torque";
pub const SEATS: &str = "specs:seats";
pub const MILEAGE: &str = "specs:mileage";
pub const SELLING_PRICE: &str = "sales:selling_price";
pub const SELLER_TYPE: &str = "sales:seller_type";
pub const KM_DRIVEN: &str = "condition:km_driven";
pub const OWNER: &str = "condition:owner";

pub const ROW_KEY_PREFIX: &str = "car_";

/// Row key of the listing at `index` (0-based) in the source file
pub fn row_key(index: usize) -> String {
    format!("{}{}", ROW_KEY_PREFIX, index)
}

/// One line of the listings CSV.
///
/// The integer columns are validated here so that a malformed file
/// fails the load instead of a later analysis.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CsvCar {
    pub name: String,
    pub year: i32,
    pub selling_price: i64,
    pub km_driven: i64,
    pub fuel: String,
    pub seller_type: String,
    pub transmission: String,
    pub owner: String,
    pub mileage: String,
    pub engine: String,
    pub max_power: String,
    pub torque: String,
    pub seats: String,
}

impl CsvCar {
    /// Every attribute as a `(column, text)` cell
    pub fn cells(&self) -> [(&'static str, String); 13] {
        [
            (NAME, self.name.clone()),
            (YEAR, self.year.to_string()),
            (TRANSMISSION, self.transmission.clone()),
            (FUEL, self.fuel.clone()),
            (ENGINE, self.engine.clone()),
            (MAX_POWER, self.max_power.clone()),
            (TORQUE, self.torque.clone()),
            (SEATS, self.seats.clone()),
            (MILEAGE, self.mileage.clone()),
            (SELLING_PRICE, self.selling_price.to_string()),
            (SELLER_TYPE, self.seller_type.clone()),
            (KM_DRIVEN, self.km_driven.to_string()),
            (OWNER, self.owner.clone()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::codec::split_column;

    #[test]
    fn test_row_key() {
        assert_eq!(row_key(0), "car_0");
        assert_eq!(row_key(8127), "car_8127");
    }

    #[test]
    fn test_cells_cover_every_family() {
        let car = CsvCar {
            name: "Maruti Swift Dzire VDI".to_string(),
            year: 2014,
            selling_price: 450000,
            km_driven: 145500,
            fuel: "Diesel".to_string(),
            seller_type: "Individual".to_string(),
            transmission: "Manual".to_string(),
            owner: "First Owner".to_string(),
            mileage: "23.4 kmpl".to_string(),
            engine: "1248 CC".to_string(),
            max_power: "74 bhp".to_string(),
            torque: "190Nm@ 2000rpm".to_string(),
            seats: "5".to_string(),
        };

        let cells = car.cells();
        for (column, _) in &cells {
            let (family, _) = split_column(column).unwrap();
            assert!(FAMILIES.contains(&family), "{} outside known families", column);
        }
        for family in FAMILIES {
            assert!(cells.iter().any(|(c, _)| c.starts_with(family)));
        }

        assert!(cells.contains(&(YEAR, "2014".to_string())));
        assert!(cells.contains(&(SELLING_PRICE, "450000".to_string())));
        assert!(cells.contains(&(KM_DRIVEN, "145500".to_string())));
    }
}
