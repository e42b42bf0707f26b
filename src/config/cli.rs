use crate::domain::model::{FuelType, VesselType};
use crate::utils::error::Result;
pub use crate::utils::logger::LogFormat;
use crate::utils::validation::{self, Validate};
use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
pub enum View {
    Routes,
    Compare,
    Banking,
    Pooling,
    All,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Csv,
}

#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "fueleu-dash")]
#[command(about = "FuelEU Maritime compliance dashboard: routes, banking and pooling")]
pub struct CliArgs {
    /// Path to TOML dashboard configuration (built-in seed data when omitted)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Session script with actions to play before rendering
    #[arg(short, long)]
    pub script: Option<String>,

    #[arg(long, value_enum, default_value = "all")]
    pub view: View,

    /// Only routes of this vessel type
    #[arg(long)]
    pub vessel: Option<VesselType>,

    /// Only routes burning this fuel
    #[arg(long)]
    pub fuel: Option<FuelType>,

    /// Only routes of this year
    #[arg(long)]
    pub year: Option<i32>,

    /// Case-insensitive route id search
    #[arg(long)]
    pub search: Option<String>,

    #[arg(long, value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Write the rendered report to this directory instead of stdout
    #[arg(short, long)]
    pub output: Option<String>,

    #[arg(long, value_enum, default_value = "compact")]
    pub log_format: LogFormat,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,
}

impl Validate for CliArgs {
    fn validate(&self) -> Result<()> {
        if let Some(config) = &self.config {
            validation::validate_path("config", config)?;
        }
        if let Some(script) = &self.script {
            validation::validate_path("script", script)?;
        }
        if let Some(output) = &self.output {
            validation::validate_path("output", output)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = CliArgs::parse_from(["fueleu-dash"]);
        assert_eq!(args.view, View::All);
        assert_eq!(args.format, OutputFormat::Text);
        assert!(args.config.is_none());
        assert!(!args.verbose);
    }

    #[test]
    fn test_filters_parse_domain_enums() {
        let args = CliArgs::parse_from([
            "fueleu-dash",
            "--view",
            "routes",
            "--vessel",
            "container",
            "--fuel",
            "LNG",
            "--year",
            "2025",
            "--format",
            "csv",
        ]);
        assert_eq!(args.view, View::Routes);
        assert_eq!(args.vessel, Some(VesselType::Container));
        assert_eq!(args.fuel, Some(FuelType::LNG));
        assert_eq!(args.year, Some(2025));
        assert_eq!(args.format, OutputFormat::Csv);
    }

    #[test]
    fn test_validate_rejects_empty_paths() {
        let args = CliArgs::parse_from(["fueleu-dash", "--output", ""]);
        assert!(args.validate().is_err());

        let args = CliArgs::parse_from(["fueleu-dash", "-c", "configs/dashboard.toml", "-o", "out"]);
        assert!(args.validate().is_ok());
    }
}
