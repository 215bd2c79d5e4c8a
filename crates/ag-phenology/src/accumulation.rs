//! Daily development drivers.

/// Weather for one simulated day.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct DailyWeather {
    pub day_of_year: u32,
    pub min_temp:    f64,
    pub max_temp:    f64,
}

impl DailyWeather {
    pub fn new(day_of_year: u32, min_temp: f64, max_temp: f64) -> Self {
        Self { day_of_year, min_temp, max_temp }
    }

    #[inline]
    pub fn mean_temp(&self) -> f64 {
        (self.min_temp + self.max_temp) / 2.0
    }
}

/// What a phase accumulates each day.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Accumulation {
    /// Degree-days from the daily mean temperature.  Rises linearly from
    /// `base` to `optimum`, falls linearly back to zero at `maximum`.
    ThermalTime { base: f64, optimum: f64, maximum: f64 },
    /// One unit per whole day.
    Days,
}

impl Accumulation {
    /// Accumulation for a whole day of `weather`.  Never negative.
    pub fn daily(&self, weather: &DailyWeather) -> f64 {
        match *self {
            Accumulation::Days => 1.0,
            Accumulation::ThermalTime { base, optimum, maximum } => {
                let t = weather.mean_temp();
                if !t.is_finite() || t <= base || t >= maximum {
                    0.0
                } else if t <= optimum {
                    t - base
                } else {
                    (optimum - base) * (maximum - t) / (maximum - optimum)
                }
            }
        }
    }

    pub fn units(&self) -> &'static str {
        match self {
            Accumulation::ThermalTime { .. } => "oCd",
            Accumulation::Days => "d",
        }
    }
}
