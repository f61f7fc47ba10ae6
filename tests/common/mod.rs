//! Common test utilities for the listings tests
//!
//! Provides shared helper functions for:
//! - Building listing CSVs
//! - Creating temporary stores
//! - Loading listings into a fresh table

#![allow(dead_code)]

use std::path::PathBuf;
use tempfile::TempDir;
use usedcars::cars::{load_records, setup_table};
use usedcars::StorageEngine;

pub const TABLE: &str = "used_cars";

pub const HEADER: &str =
    "name,year,selling_price,km_driven,fuel,seller_type,transmission,owner,mileage,engine,max_power,torque,seats";

/// One listing with sensible defaults
#[derive(Debug, Clone)]
pub struct Listing {
    pub name: String,
    pub year: String,
    pub selling_price: String,
    pub km_driven: String,
    pub fuel: String,
    pub seller_type: String,
    pub transmission: String,
    pub owner: String,
    pub mileage: String,
}

impl Listing {
    pub fn new(name: &str, year: i32, price: i64) -> Self {
        Self {
            name: name.to_string(),
            year: year.to_string(),
            selling_price: price.to_string(),
            km_driven: "50000".to_string(),
            fuel: "Petrol".to_string(),
            seller_type: "Individual".to_string(),
            transmission: "Manual".to_string(),
            owner: "First Owner".to_string(),
            mileage: "18.5 kmpl".to_string(),
        }
    }

    pub fn km(mut self, km: i64) -> Self {
        self.km_driven = km.to_string();
        self
    }

    pub fn fuel(mut self, fuel: &str) -> Self {
        self.fuel = fuel.to_string();
        self
    }

    pub fn transmission(mut self, transmission: &str) -> Self {
        self.transmission = transmission.to_string();
        self
    }

    pub fn owner(mut self, owner: &str) -> Self {
        self.owner = owner.to_string();
        self
    }

    pub fn mileage(mut self, mileage: &str) -> Self {
        self.mileage = mileage.to_string();
        self
    }

    fn csv_line(&self) -> String {
        format!(
            "{},{},{},{},{},{},{},{},{},1248 CC,74 bhp,190Nm@ 2000rpm,5",
            self.name,
            self.year,
            self.selling_price,
            self.km_driven,
            self.fuel,
            self.seller_type,
            self.transmission,
            self.owner,
            self.mileage
        )
    }
}

pub fn to_csv(listings: &[Listing]) -> String {
    let mut csv = String::from(HEADER);
    csv.push('\n');
    for listing in listings {
        csv.push_str(&listing.csv_line());
        csv.push('\n');
    }
    csv
}

/// Write the listings to `cars.csv` inside `dir`
pub fn write_csv(dir: &TempDir, listings: &[Listing]) -> PathBuf {
    let path = dir.path().join("cars.csv");
    std::fs::write(&path, to_csv(listings)).expect("Failed to write CSV");
    path
}

pub fn create_test_engine() -> (StorageEngine, TempDir) {
    let tmp_dir = TempDir::new().expect("Failed to create temp dir");
    let engine = StorageEngine::open(tmp_dir.path().join("store"))
        .expect("Failed to open storage engine");
    (engine, tmp_dir)
}

/// Fresh store with the listings loaded into `used_cars`
pub fn create_loaded_engine(listings: &[Listing]) -> (StorageEngine, TempDir) {
    let (mut engine, tmp) = create_test_engine();
    setup_table(&mut engine, TABLE).unwrap();
    {
        let table = engine.table(TABLE).unwrap();
        let loaded = load_records(&table, to_csv(listings).as_bytes()).unwrap();
        assert_eq!(loaded, listings.len());
    }
    (engine, tmp)
}

/// A small, varied fleet
pub fn sample_fleet() -> Vec<Listing> {
    vec![
        Listing::new("Maruti Swift Dzire VDI", 2014, 450000)
            .km(145500)
            .fuel("Diesel")
            .mileage("23.4 kmpl"),
        Listing::new("Skoda Rapid 1.5 TDI Ambition", 2014, 370000)
            .km(120000)
            .fuel("Diesel")
            .owner("Second Owner")
            .mileage("21.14 kmpl"),
        Listing::new("Honda City 2017-2020 EXi", 2006, 158000)
            .km(140000)
            .owner("Third Owner")
            .mileage("17.7 kmpl"),
        Listing::new("Hyundai i20 Sportz Diesel", 2010, 225000)
            .km(127000)
            .fuel("Diesel")
            .mileage("23.0 kmpl"),
        Listing::new("Maruti Swift VXI BSIII", 2007, 130000)
            .km(120000)
            .mileage("16.1 kmpl"),
        Listing::new("Maruti Wagon R LXI CNG", 2010, 260000)
            .km(35000)
            .fuel("CNG")
            .mileage("26.6 km/kg"),
        Listing::new("Volvo XC90 T8 Excellence", 2017, 10000000)
            .km(30000)
            .transmission("Automatic")
            .mileage("42.0 kmpl"),
        Listing::new("BMW X7 xDrive 30d", 2020, 7200000)
            .km(5000)
            .fuel("Diesel")
            .transmission("Automatic")
            .mileage("13.38 kmpl"),
        Listing::new("Maruti 800 AC", 1994, 40000)
            .km(60000)
            .owner("Fourth & Above Owner")
            .mileage("16.1 kmpl"),
        Listing::new("Hyundai Santro GLS LPG", 2010, 155000)
            .km(70000)
            .fuel("LPG")
            .mileage("13.45 km/kg"),
        Listing::new("Tata Indica DLS", 2008, 95000)
            .km(145500)
            .fuel("Diesel")
            .owner("Second Owner")
            .mileage(""),
        Listing::new("Mahindra Scorpio", 2010, 350000)
            .km(200000)
            .fuel("Diesel")
            .mileage("12.05 kmpl"),
    ]
}
