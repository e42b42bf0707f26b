//! Built-in data used when no `[seed]` section is configured.

use crate::domain::model::{ComplianceBalance, FuelType, PoolMember, Route, VesselType};

pub const DEFAULT_REPORTING_YEAR: i32 = 2025;

#[allow(clippy::too_many_arguments)]
fn route(
    route_id: &str,
    vessel_type: VesselType,
    fuel_type: FuelType,
    year: i32,
    ghg_intensity: f64,
    fuel_consumption: f64,
    distance: f64,
    total_emissions: f64,
    is_baseline: bool,
) -> Route {
    Route {
        route_id: route_id.to_string(),
        vessel_type,
        fuel_type,
        year,
        ghg_intensity,
        fuel_consumption,
        distance,
        total_emissions,
        is_baseline,
    }
}

/// R001 is the only baseline so the seed satisfies the single-baseline invariant.
pub fn default_routes() -> Vec<Route> {
    vec![
        route("R001", VesselType::Container, FuelType::HFO, 2024, 91.0, 5000.0, 12000.0, 4500.0, true),
        route("R002", VesselType::BulkCarrier, FuelType::LNG, 2024, 88.0, 4800.0, 11500.0, 4200.0, false),
        route("R003", VesselType::Tanker, FuelType::MGO, 2024, 93.5, 5100.0, 12500.0, 4700.0, false),
        route("R004", VesselType::RoRo, FuelType::HFO, 2025, 89.2, 4900.0, 11800.0, 4300.0, false),
        route("R005", VesselType::Container, FuelType::LNG, 2025, 90.5, 4950.0, 11900.0, 4400.0, false),
    ]
}

/// Starts in deficit with credits banked from 2024, so both bank and apply can be exercised.
pub fn default_balance() -> ComplianceBalance {
    ComplianceBalance {
        year: DEFAULT_REPORTING_YEAR,
        balance: -500.0,
        banked: 2000.0,
    }
}

/// The operator's own fleet, always the first entry of a fresh pool draft.
pub fn default_fleet_member() -> PoolMember {
    PoolMember::new("MY-FLEET-01", "My Current Fleet", -500.0)
}
