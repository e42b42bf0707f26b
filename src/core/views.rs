use crate::core::rules::{calculate_diff, is_compliant_against};
use crate::domain::model::{ComplianceBalance, FuelType, Route, VesselType};
use serde::{Deserialize, Serialize};

/// Routes view filters. Unset criteria match everything.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RouteFilter {
    pub vessel_type: Option<VesselType>,
    pub fuel_type: Option<FuelType>,
    pub year: Option<i32>,
    /// Case-insensitive substring of the route id.
    pub search: Option<String>,
}

impl RouteFilter {
    pub fn matches(&self, route: &Route) -> bool {
        let match_vessel = self.vessel_type.map_or(true, |v| route.vessel_type == v);
        let match_fuel = self.fuel_type.map_or(true, |f| route.fuel_type == f);
        let match_year = self.year.map_or(true, |y| route.year == y);
        let match_search = self.search.as_deref().map_or(true, |query| {
            route
                .route_id
                .to_lowercase()
                .contains(&query.trim().to_lowercase())
        });

        match_vessel && match_fuel && match_year && match_search
    }

    pub fn apply<'a>(&self, routes: &'a [Route]) -> Vec<&'a Route> {
        routes.iter().filter(|r| self.matches(r)).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonRow {
    pub route_id: String,
    pub vessel_type: VesselType,
    pub fuel_type: FuelType,
    pub year: i32,
    pub ghg_intensity: f64,
    pub is_baseline: bool,
    pub diff_vs_target: f64,
    /// Absent when no baseline route is set.
    pub diff_vs_baseline: Option<f64>,
    pub compliant: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ComparisonSummary {
    pub compliant: usize,
    pub deficit: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonReport {
    pub target: f64,
    pub baseline_route_id: Option<String>,
    pub rows: Vec<ComparisonRow>,
    pub summary: ComparisonSummary,
}

pub fn compare_routes(routes: &[Route], target: f64) -> ComparisonReport {
    let baseline = routes.iter().find(|r| r.is_baseline);

    let rows: Vec<ComparisonRow> = routes
        .iter()
        .map(|r| ComparisonRow {
            route_id: r.route_id.clone(),
            vessel_type: r.vessel_type,
            fuel_type: r.fuel_type,
            year: r.year,
            ghg_intensity: r.ghg_intensity,
            is_baseline: r.is_baseline,
            diff_vs_target: calculate_diff(r.ghg_intensity, target),
            diff_vs_baseline: baseline.map(|b| calculate_diff(r.ghg_intensity, b.ghg_intensity)),
            compliant: is_compliant_against(r.ghg_intensity, target),
        })
        .collect();

    let compliant = rows.iter().filter(|r| r.compliant).count();
    let summary = ComparisonSummary {
        compliant,
        deficit: rows.len() - compliant,
    };

    ComparisonReport {
        target,
        baseline_route_id: baseline.map(|b| b.route_id.clone()),
        rows,
        summary,
    }
}

/// Banking view KPIs and which actions are currently meaningful.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BankingOverview {
    pub year: i32,
    pub balance: f64,
    pub banked: f64,
    pub has_surplus: bool,
    pub has_deficit: bool,
    pub can_bank: bool,
    pub can_apply: bool,
}

impl From<&ComplianceBalance> for BankingOverview {
    fn from(balance: &ComplianceBalance) -> Self {
        let has_surplus = balance.balance > 0.0;
        let has_deficit = balance.balance < 0.0;
        Self {
            year: balance.year,
            balance: balance.balance,
            banked: balance.banked,
            has_surplus,
            has_deficit,
            can_bank: has_surplus,
            can_apply: has_deficit && balance.banked > 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::rules::TARGET_GHG;
    use crate::domain::seed::default_routes;

    #[test]
    fn test_empty_filter_returns_everything_in_order() {
        let routes = default_routes();
        let filtered = RouteFilter::default().apply(&routes);
        assert_eq!(filtered.len(), 5);
        assert_eq!(filtered[0].route_id, "R001");
    }

    #[test]
    fn test_filters_combine() {
        let routes = default_routes();

        let filter = RouteFilter {
            vessel_type: Some(VesselType::Container),
            ..Default::default()
        };
        let ids: Vec<&str> = filter.apply(&routes).iter().map(|r| r.route_id.as_str()).collect();
        assert_eq!(ids, vec!["R001", "R005"]);

        let filter = RouteFilter {
            vessel_type: Some(VesselType::Container),
            year: Some(2025),
            ..Default::default()
        };
        let ids: Vec<&str> = filter.apply(&routes).iter().map(|r| r.route_id.as_str()).collect();
        assert_eq!(ids, vec!["R005"]);

        let filter = RouteFilter {
            fuel_type: Some(FuelType::Methanol),
            ..Default::default()
        };
        assert!(filter.apply(&routes).is_empty());
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let routes = default_routes();
        let filter = RouteFilter {
            search: Some("r00".to_string()),
            ..Default::default()
        };
        assert_eq!(filter.apply(&routes).len(), 5);

        let filter = RouteFilter {
            search: Some("r003".to_string()),
            ..Default::default()
        };
        assert_eq!(filter.apply(&routes)[0].route_id, "R003");
    }

    #[test]
    fn test_compare_routes_against_target_and_baseline() {
        let routes = default_routes();
        let report = compare_routes(&routes, TARGET_GHG);

        assert_eq!(report.baseline_route_id.as_deref(), Some("R001"));
        assert_eq!(report.summary.compliant, 2); // R002 88.0, R004 89.2
        assert_eq!(report.summary.deficit, 3);

        let r002 = report.rows.iter().find(|r| r.route_id == "R002").unwrap();
        assert!(r002.compliant);
        let expected = ((88.0 / 91.0) - 1.0) * 100.0;
        assert!((r002.diff_vs_baseline.unwrap() - expected).abs() < 1e-9);
        assert!(r002.diff_vs_target < 0.0);

        let r001 = report.rows.iter().find(|r| r.route_id == "R001").unwrap();
        assert_eq!(r001.diff_vs_baseline, Some(0.0));
    }

    #[test]
    fn test_compare_without_baseline() {
        let routes: Vec<Route> = default_routes()
            .into_iter()
            .map(|r| Route {
                is_baseline: false,
                ..r
            })
            .collect();

        let report = compare_routes(&routes, TARGET_GHG);
        assert!(report.baseline_route_id.is_none());
        assert!(report.rows.iter().all(|r| r.diff_vs_baseline.is_none()));
    }

    #[test]
    fn test_banking_overview() {
        let overview = BankingOverview::from(&ComplianceBalance {
            year: 2025,
            balance: -500.0,
            banked: 2000.0,
        });
        assert!(overview.has_deficit);
        assert!(overview.can_apply);
        assert!(!overview.can_bank);

        let overview = BankingOverview::from(&ComplianceBalance {
            year: 2025,
            balance: 0.0,
            banked: 1500.0,
        });
        assert!(!overview.has_deficit && !overview.has_surplus);
        assert!(!overview.can_apply && !overview.can_bank);

        let overview = BankingOverview::from(&ComplianceBalance {
            year: 2025,
            balance: 300.0,
            banked: 0.0,
        });
        assert!(overview.can_bank);
        assert!(!overview.can_apply);
    }
}
