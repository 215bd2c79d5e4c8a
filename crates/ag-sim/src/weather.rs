//! Daily weather input.
//!
//! # CSV format
//!
//! One row per simulated day, indexed from day 0 of the run:
//!
//! ```csv
//! day,min_temp,max_temp
//! 0,4.5,18.0
//! 1,6.0,21.5
//! ```
//!
//! Rows may appear in any order; a day missing from the file is an error
//! when the run reaches it.

use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use ag_core::Tick;
use ag_phenology::DailyWeather;

use crate::{SimError, SimResult};

/// Source of daily weather, queried once per day before any component runs.
pub trait WeatherSource {
    fn weather(&self, tick: Tick, day_of_year: u32) -> SimResult<DailyWeather>;
}

/// The same temperatures every day.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ConstantWeather {
    pub min_temp: f64,
    pub max_temp: f64,
}

impl ConstantWeather {
    pub fn new(min_temp: f64, max_temp: f64) -> Self {
        Self { min_temp, max_temp }
    }
}

impl Default for ConstantWeather {
    fn default() -> Self {
        Self::new(10.0, 25.0)
    }
}

impl WeatherSource for ConstantWeather {
    fn weather(&self, _tick: Tick, day_of_year: u32) -> SimResult<DailyWeather> {
        Ok(DailyWeather::new(day_of_year, self.min_temp, self.max_temp))
    }
}

#[derive(Deserialize)]
struct WeatherRecord {
    day:      u64,
    min_temp: f64,
    max_temp: f64,
}

/// Weather read from a table, one entry per run day.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TableWeather {
    days: BTreeMap<u64, (f64, f64)>,
}

impl TableWeather {
    pub fn insert(&mut self, day: u64, min_temp: f64, max_temp: f64) {
        self.days.insert(day, (min_temp, max_temp));
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }
}

impl WeatherSource for TableWeather {
    fn weather(&self, tick: Tick, day_of_year: u32) -> SimResult<DailyWeather> {
        self.days
            .get(&tick.0)
            .map(|&(min, max)| DailyWeather::new(day_of_year, min, max))
            .ok_or(SimError::WeatherMissing(tick))
    }
}

/// Load a weather table from a CSV file.
pub fn load_weather_csv(path: &Path) -> SimResult<TableWeather> {
    let file = std::fs::File::open(path)?;
    load_weather_reader(file)
}

/// Load a weather table from any `Read` source (e.g. an in-memory string in
/// tests).
pub fn load_weather_reader<R: Read>(reader: R) -> SimResult<TableWeather> {
    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let mut table = TableWeather::default();
    for result in rdr.deserialize::<WeatherRecord>() {
        let record = result?;
        if record.min_temp > record.max_temp {
            return Err(SimError::Config(format!(
                "weather day {}: min_temp {} exceeds max_temp {}",
                record.day, record.min_temp, record.max_temp
            )));
        }
        table.insert(record.day, record.min_temp, record.max_temp);
    }
    tracing::debug!(days = table.len(), "weather table loaded");
    Ok(table)
}
