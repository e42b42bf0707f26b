use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VesselType {
    Container,
    Bulker,
    BulkCarrier,
    Tanker,
    RoRo,
}

impl VesselType {
    pub const ALL: [VesselType; 5] = [
        VesselType::Container,
        VesselType::Bulker,
        VesselType::BulkCarrier,
        VesselType::Tanker,
        VesselType::RoRo,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            VesselType::Container => "Container",
            VesselType::Bulker => "Bulker",
            VesselType::BulkCarrier => "BulkCarrier",
            VesselType::Tanker => "Tanker",
            VesselType::RoRo => "RoRo",
        }
    }
}

impl fmt::Display for VesselType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for VesselType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        VesselType::ALL
            .into_iter()
            .find(|v| v.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown vessel type '{}'", s))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FuelType {
    HFO,
    MDO,
    MGO,
    LNG,
    Methanol,
}

impl FuelType {
    pub const ALL: [FuelType; 5] = [
        FuelType::HFO,
        FuelType::MDO,
        FuelType::MGO,
        FuelType::LNG,
        FuelType::Methanol,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FuelType::HFO => "HFO",
            FuelType::MDO => "MDO",
            FuelType::MGO => "MGO",
            FuelType::LNG => "LNG",
            FuelType::Methanol => "Methanol",
        }
    }
}

impl fmt::Display for FuelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for FuelType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FuelType::ALL
            .into_iter()
            .find(|v| v.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown fuel type '{}'", s))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Route {
    pub route_id: String,
    pub vessel_type: VesselType,
    pub fuel_type: FuelType,
    pub year: i32,
    /// gCO₂e/MJ
    pub ghg_intensity: f64,
    /// tonnes
    pub fuel_consumption: f64,
    /// km
    pub distance: f64,
    /// tonnes
    pub total_emissions: f64,
    #[serde(default)]
    pub is_baseline: bool,
}

/// Positive balance is a surplus, negative a deficit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ComplianceBalance {
    pub year: i32,
    pub balance: f64,
    pub banked: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolMember {
    pub ship_id: String,
    pub vessel_name: String,
    pub verified_cb: f64,
}

impl PoolMember {
    pub fn new(ship_id: impl Into<String>, vessel_name: impl Into<String>, verified_cb: f64) -> Self {
        Self {
            ship_id: ship_id.into(),
            vessel_name: vessel_name.into(),
            verified_cb,
        }
    }
}

/// A finalized pool. `members` is a snapshot of the draft at creation time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pool {
    pub pool_id: String,
    pub members: Vec<PoolMember>,
    pub total_balance: f64,
    pub is_valid: bool,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}
