//! Delivery fleet domain types.

use serde::{Deserialize, Serialize};

/// Truck availability status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TruckStatus {
    Available,
    InTransit,
    Maintenance,
}

impl std::fmt::Display for TruckStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Available => "available",
            Self::InTransit => "in_transit",
            Self::Maintenance => "maintenance",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Driver {
    pub id: u64,
    pub driver_name: String,
    #[serde(default)]
    pub phone_number: Option<String>,
}

/// A delivery truck with its assigned driver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Truck {
    pub id: u64,
    pub license_plate: String,
    pub capacity_kg: u32,
    pub availability_status: TruckStatus,
    #[serde(default)]
    pub current_latitude: Option<String>,
    #[serde(default)]
    pub current_longitude: Option<String>,
    pub driver: Driver,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truck_decodes() {
        let json = r#"{
            "id": 5,
            "licensePlate": "WP-KA-4421",
            "capacityKg": 2000,
            "availabilityStatus": "in_transit",
            "driver": {"id": 3, "driverName": "S. Perera"}
        }"#;
        let truck: Truck = serde_json::from_str(json).unwrap();
        assert_eq!(truck.availability_status, TruckStatus::InTransit);
        assert_eq!(truck.availability_status.to_string(), "in_transit");
        assert_eq!(truck.driver.driver_name, "S. Perera");
    }
}
