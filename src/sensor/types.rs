use crate::model::Unit;
use chrono::{DateTime, Local};
use std::fmt;

/// The named readings published for a gas meter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SensorKind {
    LastEnergy,
    LastEnergyM3,
    LastEnergyPrice,
    MonthEnergy,
    MonthEnergyM3,
    MonthEnergyPrice,
    LastMonthEnergy,
    LastMonthEnergyM3,
    LastMonthEnergyPrice,
}

impl SensorKind {
    pub const ALL: [SensorKind; 9] = [
        SensorKind::LastEnergy,
        SensorKind::LastEnergyM3,
        SensorKind::LastEnergyPrice,
        SensorKind::MonthEnergy,
        SensorKind::MonthEnergyM3,
        SensorKind::MonthEnergyPrice,
        SensorKind::LastMonthEnergy,
        SensorKind::LastMonthEnergyM3,
        SensorKind::LastMonthEnergyPrice,
    ];

    pub fn name(self) -> &'static str {
        match self {
            SensorKind::LastEnergy => "Gazpar energy",
            SensorKind::LastEnergyM3 => "Gazpar energy m³",
            SensorKind::LastEnergyPrice => "Gazpar energy price",
            SensorKind::MonthEnergy => "Gazpar energy month",
            SensorKind::MonthEnergyM3 => "Gazpar energy month m³",
            SensorKind::MonthEnergyPrice => "Gazpar energy month price",
            SensorKind::LastMonthEnergy => "Gazpar energy last month",
            SensorKind::LastMonthEnergyM3 => "Gazpar energy last month m³",
            SensorKind::LastMonthEnergyPrice => "Gazpar energy last month price",
        }
    }

    pub fn unit(self) -> Unit {
        match self {
            SensorKind::LastEnergy | SensorKind::MonthEnergy | SensorKind::LastMonthEnergy => {
                Unit::Kwh
            }
            SensorKind::LastEnergyM3 | SensorKind::MonthEnergyM3 | SensorKind::LastMonthEnergyM3 => {
                Unit::CubicMeter
            }
            SensorKind::LastEnergyPrice
            | SensorKind::MonthEnergyPrice
            | SensorKind::LastMonthEnergyPrice => Unit::Euro,
        }
    }
}

impl fmt::Display for SensorKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Last known state of a sensor.
///
/// `state` stays `None` until the first successful cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct Sensor {
    pub kind: SensorKind,
    pub state: Option<f64>,
    /// Day the state refers to
    pub timestamp: Option<DateTime<Local>>,
}

impl Sensor {
    pub fn new(kind: SensorKind) -> Self {
        Self {
            kind,
            state: None,
            timestamp: None,
        }
    }

    pub fn set_data(&mut self, timestamp: DateTime<Local>, value: f64) {
        self.state = Some(value);
        self.timestamp = Some(timestamp);
    }
}
