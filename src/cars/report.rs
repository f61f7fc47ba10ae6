use std::fmt::Display;
use std::io::{self, Write};

use super::analysis::{
    DatedCar, DrivenCar, MileageSummary, OwnerCount, PreviewCar, PriceAverage, PricedCar,
    RecentByFuel,
};

/// Human-readable report, one labeled section per analysis
pub struct Report<W: Write> {
    out: W,
}

impl<W: Write> Report<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn heading(&mut self, title: &str) -> io::Result<()> {
        writeln!(self.out, "\n=== {} ===", title)
    }

    fn averages<K: Display>(&mut self, averages: &[PriceAverage<K>]) -> io::Result<()> {
        for avg in averages {
            writeln!(self.out, "{}: {:.2}", avg.group, avg.average)?;
        }
        Ok(())
    }

    pub fn preview(&mut self, cars: &[PreviewCar]) -> io::Result<()> {
        self.heading(&format!("All cars in the database (first {})", cars.len()))?;
        for car in cars {
            writeln!(self.out, "\nCar ID: {}", car.id)?;
            writeln!(self.out, "Name: {}", car.name)?;
            writeln!(self.out, "Year: {}", car.year)?;
            writeln!(self.out, "Price: {}", car.price)?;
        }
        Ok(())
    }

    pub fn priced_above(&mut self, threshold: i64, cars: &[PricedCar]) -> io::Result<()> {
        self.heading(&format!("Cars priced above {}", threshold))?;
        for car in cars {
            writeln!(self.out, "\nCar ID: {}", car.id)?;
            writeln!(self.out, "Name: {}", car.name)?;
            writeln!(self.out, "Price: {}", car.price)?;
        }
        Ok(())
    }

    pub fn owner_histogram(&mut self, owners: &[OwnerCount]) -> io::Result<()> {
        self.heading("Cars by owner type")?;
        for entry in owners {
            writeln!(self.out, "{}: {} cars", entry.owner, entry.count)?;
        }
        Ok(())
    }

    pub fn average_price_by_fuel(&mut self, averages: &[PriceAverage<String>]) -> io::Result<()> {
        self.heading("Average price by fuel type")?;
        self.averages(averages)
    }

    pub fn most_driven(&mut self, cars: &[DrivenCar]) -> io::Result<()> {
        self.heading(&format!("Top {} cars by kilometers driven", cars.len()))?;
        for car in cars {
            writeln!(self.out, "ID: {}", car.id)?;
            writeln!(self.out, "Name: {}", car.name)?;
            writeln!(self.out, "Kilometers: {}", car.km)?;
            writeln!(self.out, "Price: {}\n", car.price)?;
        }
        Ok(())
    }

    pub fn average_price_by_transmission(
        &mut self,
        averages: &[PriceAverage<String>],
    ) -> io::Result<()> {
        self.heading("Average price by transmission type")?;
        self.averages(averages)
    }

    pub fn price_updated(&mut self, row_key: &str, price: i64) -> io::Result<()> {
        writeln!(self.out, "\nPrice updated to {} for car ID: {}", price, row_key)
    }

    pub fn most_recent_by_fuel(&mut self, recent: &[RecentByFuel]) -> io::Result<()> {
        self.heading("Most recent vehicles by fuel type")?;
        for entry in recent {
            writeln!(
                self.out,
                "{}: {} ({}) - ID: {}",
                entry.fuel, entry.car.name, entry.car.year, entry.car.id
            )?;
        }
        Ok(())
    }

    pub fn average_price_by_year(&mut self, averages: &[PriceAverage<i32>]) -> io::Result<()> {
        self.heading("Average price by manufacture year")?;
        for avg in averages {
            writeln!(
                self.out,
                "Year {}: average price {:.2}",
                avg.group, avg.average
            )?;
        }
        Ok(())
    }

    pub fn oldest(&mut self, cars: &[DatedCar]) -> io::Result<()> {
        self.heading("Oldest vehicles")?;
        for car in cars {
            writeln!(
                self.out,
                "ID: {}, Name: {}, Year: {}",
                car.id, car.name, car.year
            )?;
        }
        Ok(())
    }

    pub fn average_mileage(&mut self, summary: &MileageSummary) -> io::Result<()> {
        self.heading("Average mileage by transmission and fuel type")?;
        for avg in &summary.averages {
            writeln!(
                self.out,
                "Transmission: {}, Fuel: {}, Unit: {} -> Average: {:.2} {}",
                avg.transmission, avg.fuel, avg.unit, avg.average, avg.unit
            )?;
        }
        if !summary.skipped.is_empty() {
            writeln!(
                self.out,
                "({} cars without a readable mileage were skipped)",
                summary.skipped.len()
            )?;
        }
        Ok(())
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }
}
