//! Scan-and-reduce analyses over the listings table.
//!
//! Every function runs its own full scan. Only [`average_mileage`]
//! isolates per-record failures; everywhere else the first unreadable
//! cell aborts the analysis with the error from [`CarView`].

use std::collections::HashMap;
use std::hash::Hash;

use super::record::{CarView, Mileage};
use super::schema::SELLING_PRICE;
use crate::error::CarsResult;
use crate::storage::{Row, Table};

/// Accumulator keyed by group, remembering first-seen order
struct Groups<K, A> {
    index: HashMap<K, usize>,
    entries: Vec<(K, A)>,
}

impl<K: Hash + Eq + Clone, A: Default> Groups<K, A> {
    fn new() -> Self {
        Self {
            index: HashMap::new(),
            entries: Vec::new(),
        }
    }

    fn entry(&mut self, key: K) -> &mut A {
        let idx = match self.index.get(&key) {
            Some(&idx) => idx,
            None => {
                self.entries.push((key.clone(), A::default()));
                self.index.insert(key, self.entries.len() - 1);
                self.entries.len() - 1
            }
        };
        &mut self.entries[idx].1
    }

    fn into_entries(self) -> Vec<(K, A)> {
        self.entries
    }
}

#[derive(Debug, Default, Clone, Copy)]
struct Sum {
    total: f64,
    count: usize,
}

impl Sum {
    fn add(&mut self, value: f64) {
        self.total += value;
        self.count += 1;
    }

    fn average(&self) -> f64 {
        self.total / self.count as f64
    }
}

/// Visit every row of the table, stopping at the first error
fn for_each_row<F>(table: &Table<'_>, mut visit: F) -> CarsResult<()>
where
    F: FnMut(&Row) -> CarsResult<()>,
{
    for row in table.scan()? {
        visit(&row?)?;
    }
    Ok(())
}

// ==================== Result Types ====================

#[derive(Debug, Clone, PartialEq)]
pub struct PreviewCar {
    pub id: String,
    pub name: String,
    pub year: i32,
    pub price: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PricedCar {
    pub id: String,
    pub name: String,
    pub price: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OwnerCount {
    pub owner: String,
    pub count: usize,
}

/// Average selling price of one group
#[derive(Debug, Clone, PartialEq)]
pub struct PriceAverage<K> {
    pub group: K,
    pub average: f64,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DrivenCar {
    pub id: String,
    pub name: String,
    pub km: i64,
    pub price: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DatedCar {
    pub id: String,
    pub name: String,
    pub year: i32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecentByFuel {
    pub fuel: String,
    pub car: DatedCar,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MileageAverage {
    pub transmission: String,
    pub fuel: String,
    pub unit: String,
    pub average: f64,
    pub count: usize,
}

/// A record left out of the mileage averages
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedCar {
    pub id: String,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct MileageSummary {
    pub averages: Vec<MileageAverage>,
    pub skipped: Vec<SkippedCar>,
}

// ==================== Analyses ====================

/// First `limit` listings in scan order
pub fn preview(table: &Table<'_>, limit: usize) -> CarsResult<Vec<PreviewCar>> {
    let mut cars = Vec::with_capacity(limit);
    for row in table.scan()?.take(limit) {
        let row = row?;
        let car = CarView::new(&row);
        cars.push(PreviewCar {
            id: car.id().to_string(),
            name: car.name()?.to_string(),
            year: car.year()?,
            price: car.selling_price()?,
        });
    }
    Ok(cars)
}

/// Listings with a selling price strictly above `threshold`
pub fn priced_above(table: &Table<'_>, threshold: i64) -> CarsResult<Vec<PricedCar>> {
    let mut cars = Vec::new();
    for_each_row(table, |row| {
        let car = CarView::new(row);
        let price = car.selling_price()?;
        if price > threshold {
            cars.push(PricedCar {
                id: car.id().to_string(),
                name: car.name()?.to_string(),
                price,
            });
        }
        Ok(())
    })?;
    Ok(cars)
}

/// Number of listings per owner category
pub fn owner_histogram(table: &Table<'_>) -> CarsResult<Vec<OwnerCount>> {
    let mut groups: Groups<String, usize> = Groups::new();
    for_each_row(table, |row| {
        let owner = CarView::new(row).owner()?;
        *groups.entry(owner.to_string()) += 1;
        Ok(())
    })?;
    Ok(groups
        .into_entries()
        .into_iter()
        .map(|(owner, count)| OwnerCount { owner, count })
        .collect())
}

fn average_price_by<K, F>(table: &Table<'_>, group_of: F) -> CarsResult<Vec<PriceAverage<K>>>
where
    K: Hash + Eq + Clone,
    F: Fn(&CarView<'_>) -> CarsResult<K>,
{
    let mut groups: Groups<K, Sum> = Groups::new();
    for_each_row(table, |row| {
        let car = CarView::new(row);
        let group = group_of(&car)?;
        let price = car.selling_price()?;
        groups.entry(group).add(price as f64);
        Ok(())
    })?;
    Ok(groups
        .into_entries()
        .into_iter()
        .map(|(group, sum)| PriceAverage {
            group,
            average: sum.average(),
            count: sum.count,
        })
        .collect())
}

/// Mean selling price per fuel type, in first-seen order
pub fn average_price_by_fuel(table: &Table<'_>) -> CarsResult<Vec<PriceAverage<String>>> {
    average_price_by(table, |car| Ok(car.fuel()?.to_string()))
}

/// Mean selling price per transmission type, in first-seen order
pub fn average_price_by_transmission(table: &Table<'_>) -> CarsResult<Vec<PriceAverage<String>>> {
    average_price_by(table, |car| Ok(car.transmission()?.to_string()))
}

/// Mean selling price per manufacture year, ascending by year
pub fn average_price_by_year(table: &Table<'_>) -> CarsResult<Vec<PriceAverage<i32>>> {
    let mut averages = average_price_by(table, |car| car.year())?;
    averages.sort_by_key(|a| a.group);
    Ok(averages)
}

/// The `limit` listings with the highest odometer reading.
/// Equal readings keep scan order.
pub fn most_driven(table: &Table<'_>, limit: usize) -> CarsResult<Vec<DrivenCar>> {
    let mut cars = Vec::new();
    for_each_row(table, |row| {
        let car = CarView::new(row);
        cars.push(DrivenCar {
            id: car.id().to_string(),
            name: car.name()?.to_string(),
            km: car.km_driven()?,
            price: car.selling_price()?,
        });
        Ok(())
    })?;
    cars.sort_by(|a, b| b.km.cmp(&a.km));
    cars.truncate(limit);
    Ok(cars)
}

/// The `limit` oldest listings. Equal years keep scan order.
pub fn oldest(table: &Table<'_>, limit: usize) -> CarsResult<Vec<DatedCar>> {
    let mut cars = Vec::new();
    for_each_row(table, |row| {
        let car = CarView::new(row);
        cars.push(DatedCar {
            id: car.id().to_string(),
            name: car.name()?.to_string(),
            year: car.year()?,
        });
        Ok(())
    })?;
    cars.sort_by_key(|c| c.year);
    cars.truncate(limit);
    Ok(cars)
}

/// Overwrite the selling price of one listing, leaving its other cells alone
pub fn update_price(table: &Table<'_>, row_key: &str, price: i64) -> CarsResult<()> {
    if table.get_row(row_key)?.is_none() {
        tracing::warn!("Car {} does not exist, the update creates it", row_key);
    }
    table.put(row_key, [(SELLING_PRICE, price.to_string())])?;
    tracing::info!("Updated selling price of {} to {}", row_key, price);
    Ok(())
}

/// Newest listing per fuel type. On equal years the first one scanned wins.
pub fn most_recent_by_fuel(table: &Table<'_>) -> CarsResult<Vec<RecentByFuel>> {
    let mut groups: Groups<String, Option<DatedCar>> = Groups::new();
    for_each_row(table, |row| {
        let car = CarView::new(row);
        let fuel = car.fuel()?;
        let year = car.year()?;
        let newest = groups.entry(fuel.to_string());
        if newest.as_ref().map_or(true, |current| current.year < year) {
            *newest = Some(DatedCar {
                id: car.id().to_string(),
                name: car.name()?.to_string(),
                year,
            });
        }
        Ok(())
    })?;
    Ok(groups
        .into_entries()
        .into_iter()
        .filter_map(|(fuel, car)| car.map(|car| RecentByFuel { fuel, car }))
        .collect())
}

fn mileage_group(car: &CarView<'_>) -> CarsResult<((String, String, String), Mileage)> {
    let transmission = car.transmission()?.to_string();
    let fuel = car.fuel()?.to_string();
    let mileage = car.mileage()?;
    Ok(((transmission, fuel, mileage.unit.clone()), mileage))
}

/// Mean mileage per (transmission, fuel, unit).
///
/// Records whose mileage cannot be read are logged and skipped; only
/// storage errors abort the scan.
pub fn average_mileage(table: &Table<'_>) -> CarsResult<MileageSummary> {
    let mut groups: Groups<(String, String, String), Sum> = Groups::new();
    let mut skipped = Vec::new();

    for row in table.scan()? {
        let row = row?;
        let car = CarView::new(&row);
        match mileage_group(&car) {
            Ok((key, mileage)) => groups.entry(key).add(mileage.value),
            Err(e) => {
                tracing::warn!("Skipping car {} in mileage averages: {}", car.id(), e);
                skipped.push(SkippedCar {
                    id: car.id().to_string(),
                    reason: e.to_string(),
                });
            }
        }
    }

    let averages = groups
        .into_entries()
        .into_iter()
        .map(|((transmission, fuel, unit), sum)| MileageAverage {
            transmission,
            fuel,
            unit,
            average: sum.average(),
            count: sum.count,
        })
        .collect();

    Ok(MileageSummary { averages, skipped })
}
