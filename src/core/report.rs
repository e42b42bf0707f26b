//! Plain-text renderings of the four dashboard views.

use crate::core::dashboard::PoolingState;
use crate::core::formatters::{
    format_balance, format_emissions, format_intensity, format_percentage, format_signed,
};
use crate::core::rules::is_compliant_against;
use crate::core::views::{BankingOverview, ComparisonReport};
use crate::domain::model::{FuelType, PoolMember, Route, VesselType};
use tabled::{Table, Tabled};

#[derive(Tabled)]
struct RouteLine {
    #[tabled(rename = "Route")]
    route_id: String,
    #[tabled(rename = "Vessel")]
    vessel_type: VesselType,
    #[tabled(rename = "Fuel")]
    fuel_type: FuelType,
    #[tabled(rename = "Year")]
    year: i32,
    #[tabled(rename = "GHG Intensity")]
    ghg_intensity: String,
    #[tabled(rename = "Fuel Consumption")]
    fuel_consumption: String,
    #[tabled(rename = "Distance")]
    distance: String,
    #[tabled(rename = "Emissions")]
    total_emissions: String,
    #[tabled(rename = "Status")]
    status: &'static str,
    #[tabled(rename = "Baseline")]
    baseline: &'static str,
}

#[derive(Tabled)]
struct CompareLine {
    #[tabled(rename = "Route")]
    route_id: String,
    #[tabled(rename = "GHG Intensity")]
    ghg_intensity: String,
    #[tabled(rename = "vs Target")]
    diff_vs_target: String,
    #[tabled(rename = "vs Baseline")]
    diff_vs_baseline: String,
    #[tabled(rename = "Status")]
    status: &'static str,
}

#[derive(Tabled)]
struct KpiLine {
    #[tabled(rename = "Metric")]
    metric: &'static str,
    #[tabled(rename = "Value")]
    value: String,
}

#[derive(Tabled)]
struct MemberLine {
    #[tabled(rename = "Ship ID")]
    ship_id: String,
    #[tabled(rename = "Vessel")]
    vessel_name: String,
    #[tabled(rename = "Verified CB")]
    verified_cb: String,
}

fn status(compliant: bool) -> &'static str {
    if compliant {
        "Compliant"
    } else {
        "Deficit"
    }
}

fn availability(available: bool) -> String {
    if available { "available" } else { "unavailable" }.to_string()
}

pub fn routes_table(routes: &[&Route], target: f64) -> String {
    let lines = routes.iter().map(|r| RouteLine {
        route_id: r.route_id.clone(),
        vessel_type: r.vessel_type,
        fuel_type: r.fuel_type,
        year: r.year,
        ghg_intensity: format_intensity(r.ghg_intensity),
        fuel_consumption: format_emissions(r.fuel_consumption),
        distance: format!("{} km", format_balance(r.distance)),
        total_emissions: format_emissions(r.total_emissions),
        status: status(is_compliant_against(r.ghg_intensity, target)),
        baseline: if r.is_baseline { "yes" } else { "" },
    });

    let mut out = Table::new(lines).to_string();
    out.push('\n');
    if routes.is_empty() {
        out.push_str("No routes found matching your filters.\n");
    }
    out
}

pub fn comparison_table(report: &ComparisonReport) -> String {
    let lines = report.rows.iter().map(|row| CompareLine {
        route_id: row.route_id.clone(),
        ghg_intensity: format_intensity(row.ghg_intensity),
        diff_vs_target: format_percentage(row.diff_vs_target),
        diff_vs_baseline: row
            .diff_vs_baseline
            .map(format_percentage)
            .unwrap_or_else(|| "-".to_string()),
        status: status(row.compliant),
    });

    format!(
        "Target: {}   Baseline: {}\n{}\nCompliant: {}   Deficit: {}\n",
        format_intensity(report.target),
        report.baseline_route_id.as_deref().unwrap_or("none"),
        Table::new(lines),
        report.summary.compliant,
        report.summary.deficit
    )
}

pub fn banking_summary(overview: &BankingOverview) -> String {
    let lines = vec![
        KpiLine {
            metric: "Reporting Year",
            value: overview.year.to_string(),
        },
        KpiLine {
            metric: "Compliance Balance",
            value: format!(
                "{} ({})",
                format_balance(overview.balance),
                if overview.has_deficit { "Deficit" } else { "Surplus" }
            ),
        },
        KpiLine {
            metric: "Banked from Previous Years",
            value: format_balance(overview.banked),
        },
        KpiLine {
            metric: "Bank Surplus",
            value: availability(overview.can_bank),
        },
        KpiLine {
            metric: "Apply Banked",
            value: availability(overview.can_apply),
        },
    ];

    format!("{}\n", Table::new(lines))
}

fn member_line(member: &PoolMember) -> MemberLine {
    MemberLine {
        ship_id: member.ship_id.clone(),
        vessel_name: member.vessel_name.clone(),
        verified_cb: format_signed(member.verified_cb),
    }
}

pub fn pooling_summary(pooling: &PoolingState) -> String {
    let mut out = format!(
        "Projected Pool Balance: {} ({})\n",
        format_signed(pooling.projected_total()),
        if pooling.is_draft_valid() { "valid" } else { "invalid" }
    );
    out.push_str(&Table::new(pooling.draft.iter().map(member_line)).to_string());
    out.push('\n');

    match &pooling.active_pool {
        Some(pool) => out.push_str(&format!(
            "Pool Active: {} ({} members, total {}, created {})\n",
            pool.pool_id,
            pool.members.len(),
            format_signed(pool.total_balance),
            pool.created_at.format("%Y-%m-%d %H:%M UTC")
        )),
        None => out.push_str(&format!(
            "No active pool ({})\n",
            if pooling.can_finalize() { "ready to finalize" } else { "cannot finalize yet" }
        )),
    }
    out
}
