use std::fmt;

/// Represents the type of measurement being collected.
///
/// Each measurement type corresponds to a different InfluxDB measurement
/// (table) where the data will be stored.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum Measurement {
    /// Latest state of every named gas sensor
    GasSensor,
    /// Per-day consumption history
    GasDaily,
}

impl fmt::Display for Measurement {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Measurement::GasSensor => write!(f, "gas_sensor"),
            Measurement::GasDaily => write!(f, "gas_daily"),
        }
    }
}

/// Units of measurement used in the system.
///
/// Written as a tag next to every value so that dashboards can label
/// series without knowing the sensor names.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum Unit {
    /// Kilowatt-hours (kWh) - energy
    Kwh,
    /// Cubic meters (m³) - gas volume
    CubicMeter,
    /// Euros (€) - derived price
    Euro,
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Unit::Kwh => write!(f, "kWh"),
            Unit::CubicMeter => write!(f, "m³"),
            Unit::Euro => write!(f, "€"),
        }
    }
}
