use crate::core::rules::TARGET_GHG;
use crate::domain::model::{ComplianceBalance, PoolMember, Route};
use crate::domain::seed;
use crate::utils::error::{DashError, Result};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

const DEFAULT_LATENCY_MS: u64 = 300;
const DEFAULT_TIMEOUT_SECONDS: u64 = 30;
const MAX_LATENCY_MS: u64 = 10_000;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DashboardConfig {
    #[serde(default)]
    pub dashboard: DashboardSection,
    #[serde(default)]
    pub backend: BackendConfig,
    pub seed: Option<SeedConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardSection {
    #[serde(default = "default_name")]
    pub name: String,
    #[serde(default = "default_reporting_year")]
    pub reporting_year: i32,
    #[serde(default = "default_target")]
    pub target_ghg_intensity: f64,
}

fn default_name() -> String {
    "FuelEU Compliance Dashboard".to_string()
}

fn default_reporting_year() -> i32 {
    seed::DEFAULT_REPORTING_YEAR
}

fn default_target() -> f64 {
    TARGET_GHG
}

impl Default for DashboardSection {
    fn default() -> Self {
        Self {
            name: default_name(),
            reporting_year: default_reporting_year(),
            target_ghg_intensity: default_target(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    #[default]
    Memory,
    Http,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BackendConfig {
    #[serde(default)]
    pub r#type: BackendKind,
    pub endpoint: Option<String>,
    pub latency_ms: Option<u64>,
    pub timeout_seconds: Option<u64>,
}

/// Startup data for the in-memory backend. Keys use the same camelCase names as the REST payloads.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SeedConfig {
    pub routes: Option<Vec<Route>>,
    pub balance: Option<ComplianceBalance>,
    pub fleet: Option<PoolMember>,
}

impl DashboardConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(DashError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| DashError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${COMPLIANCE_API})，未設定的變數保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| DashError::ConfigValidationError {
            field: "env_substitution".to_string(),
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn validate_config(&self) -> Result<()> {
        validation::validate_non_empty_string("dashboard.name", &self.dashboard.name)?;
        validation::validate_finite(
            "dashboard.target_ghg_intensity",
            self.dashboard.target_ghg_intensity,
        )?;
        if self.dashboard.target_ghg_intensity <= 0.0 {
            return Err(DashError::InvalidConfigValueError {
                field: "dashboard.target_ghg_intensity".to_string(),
                value: self.dashboard.target_ghg_intensity.to_string(),
                reason: "Target must be greater than zero".to_string(),
            });
        }

        if self.backend.r#type == BackendKind::Http {
            let endpoint =
                validation::validate_required_field("backend.endpoint", &self.backend.endpoint)?;
            validation::validate_url("backend.endpoint", endpoint)?;
        }

        if let Some(latency) = self.backend.latency_ms {
            validation::validate_range("backend.latency_ms", latency, 0, MAX_LATENCY_MS)?;
        }
        if let Some(timeout) = self.backend.timeout_seconds {
            validation::validate_range("backend.timeout_seconds", timeout, 1, 600)?;
        }

        if let Some(seed) = &self.seed {
            self.validate_seed(seed)?;
        }

        Ok(())
    }

    fn validate_seed(&self, seed: &SeedConfig) -> Result<()> {
        if let Some(routes) = &seed.routes {
            validation::validate_unique_ids(
                "seed.routes",
                routes.iter().map(|r| r.route_id.as_str()),
            )?;

            let baselines = routes.iter().filter(|r| r.is_baseline).count();
            if baselines > 1 {
                return Err(DashError::ConfigValidationError {
                    field: "seed.routes".to_string(),
                    message: format!("At most one baseline route is allowed, found {}", baselines),
                });
            }

            for route in routes {
                validation::validate_non_empty_string("seed.routes.routeId", &route.route_id)?;
                validation::validate_finite("seed.routes.ghgIntensity", route.ghg_intensity)?;
            }
        }

        if let Some(balance) = &seed.balance {
            validation::validate_finite("seed.balance.balance", balance.balance)?;
            validation::validate_non_negative("seed.balance.banked", balance.banked)?;
            // 啟動時只載入報告年度的餘額
            if balance.year != self.reporting_year() {
                return Err(DashError::ConfigValidationError {
                    field: "seed.balance.year".to_string(),
                    message: format!(
                        "Seeded balance is for {} but the reporting year is {}",
                        balance.year,
                        self.reporting_year()
                    ),
                });
            }
        }

        if let Some(fleet) = &seed.fleet {
            validation::validate_finite("seed.fleet.verifiedCb", fleet.verified_cb)?;
        }

        Ok(())
    }

    pub fn backend_kind(&self) -> BackendKind {
        self.backend.r#type
    }

    pub fn reporting_year(&self) -> i32 {
        self.dashboard.reporting_year
    }

    pub fn target_ghg(&self) -> f64 {
        self.dashboard.target_ghg_intensity
    }

    pub fn latency(&self) -> Duration {
        Duration::from_millis(self.backend.latency_ms.unwrap_or(DEFAULT_LATENCY_MS))
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.backend.timeout_seconds.unwrap_or(DEFAULT_TIMEOUT_SECONDS))
    }

    pub fn seed_routes(&self) -> Vec<Route> {
        self.seed
            .as_ref()
            .and_then(|s| s.routes.clone())
            .unwrap_or_else(seed::default_routes)
    }

    /// Falls back to the built-in balance, moved to the configured reporting year.
    pub fn seed_balance(&self) -> ComplianceBalance {
        self.seed
            .as_ref()
            .and_then(|s| s.balance)
            .unwrap_or_else(|| ComplianceBalance {
                year: self.reporting_year(),
                ..seed::default_balance()
            })
    }

    pub fn fleet_member(&self) -> PoolMember {
        self.seed
            .as_ref()
            .and_then(|s| s.fleet.clone())
            .unwrap_or_else(seed::default_fleet_member)
    }
}

impl Validate for DashboardConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
