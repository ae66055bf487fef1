//! Vehicle classes and toll rows.

use serde::{Deserialize, Serialize};

use super::Edge;

/// A vehicle class with its own toll column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VehicleClass {
    /// Motorcycle.
    Moto,
    /// Passenger car.
    Car,
    /// Recreational vehicle.
    Rv,
    /// Bus.
    Bus,
    /// Truck.
    Truck,
}

impl VehicleClass {
    /// All classes in column order.
    pub const ALL: [VehicleClass; 5] = [
        VehicleClass::Moto,
        VehicleClass::Car,
        VehicleClass::Rv,
        VehicleClass::Bus,
        VehicleClass::Truck,
    ];

    /// Column name used in toll tables.
    pub fn column(&self) -> &'static str {
        match self {
            VehicleClass::Moto => "moto",
            VehicleClass::Car => "car",
            VehicleClass::Rv => "rv",
            VehicleClass::Bus => "bus",
            VehicleClass::Truck => "truck",
        }
    }
}

/// One toll value per vehicle class.
///
/// # Examples
///
/// ```
/// use u_toll::models::{TollRates, VehicleClass};
///
/// let mut rates = TollRates::default();
/// *rates.get_mut(VehicleClass::Bus) = 22.0;
/// assert_eq!(rates.bus, 22.0);
/// assert_eq!(rates.get(VehicleClass::Bus), 22.0);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TollRates {
    /// Motorcycles.
    pub moto: f64,
    /// Passenger cars.
    pub car: f64,
    /// Recreational vehicles.
    pub rv: f64,
    /// Buses.
    pub bus: f64,
    /// Trucks.
    pub truck: f64,
}

impl TollRates {
    /// Toll for the given class.
    pub fn get(&self, class: VehicleClass) -> f64 {
        match class {
            VehicleClass::Moto => self.moto,
            VehicleClass::Car => self.car,
            VehicleClass::Rv => self.rv,
            VehicleClass::Bus => self.bus,
            VehicleClass::Truck => self.truck,
        }
    }

    /// Mutable toll for the given class.
    pub fn get_mut(&mut self, class: VehicleClass) -> &mut f64 {
        match class {
            VehicleClass::Moto => &mut self.moto,
            VehicleClass::Car => &mut self.car,
            VehicleClass::Rv => &mut self.rv,
            VehicleClass::Bus => &mut self.bus,
            VehicleClass::Truck => &mut self.truck,
        }
    }
}

/// An edge with its computed toll columns.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TollRow {
    /// The priced edge.
    #[serde(flatten)]
    pub edge: Edge,
    /// Toll per vehicle class.
    #[serde(flatten)]
    pub rates: TollRates,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_mut_roundtrips_every_class() {
        let mut rates = TollRates::default();
        for (i, class) in VehicleClass::ALL.iter().enumerate() {
            *rates.get_mut(*class) = i as f64;
        }
        assert_eq!(rates.moto, 0.0);
        assert_eq!(rates.car, 1.0);
        assert_eq!(rates.rv, 2.0);
        assert_eq!(rates.bus, 3.0);
        assert_eq!(rates.truck, 4.0);
    }

    #[test]
    fn test_class_serde_lowercase() {
        let json = serde_json::to_string(&VehicleClass::Truck).expect("json");
        assert_eq!(json, "\"truck\"");
        let class: VehicleClass = serde_json::from_str("\"rv\"").expect("json");
        assert_eq!(class, VehicleClass::Rv);
        assert_eq!(class.column(), "rv");
    }

    #[test]
    fn test_toll_row_serializes_flat() {
        let row = TollRow {
            edge: Edge::new(1, 2, 10.0).expect("valid"),
            rates: TollRates {
                moto: 8.0,
                ..TollRates::default()
            },
        };
        let value = serde_json::to_value(row).expect("json");
        assert_eq!(value["id_start"], 1);
        assert_eq!(value["distance"], 10.0);
        assert_eq!(value["moto"], 8.0);
    }
}
