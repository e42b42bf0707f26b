//! FuelEU Maritime compliance dashboard core.
//!
//! Routes with a single baseline, compliance-balance banking per reporting
//! year, and multi-ship pooling, behind ports that can be served by the
//! in-memory stores or a REST backend.

pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliArgs;

pub use adapters::{build_backend, Backend};
pub use config::{DashboardConfig, SessionScript};
pub use core::dashboard::{Dashboard, DashboardSettings};
pub use core::session::{SessionReport, SessionRunner};
pub use utils::error::{DashError, Result};

/// Dashboard wired to a runtime-selected backend.
pub type AppDashboard<N> = Dashboard<
    Box<dyn domain::ports::RouteRepository>,
    Box<dyn domain::ports::BankingService>,
    Box<dyn domain::ports::PoolingService>,
    N,
>;
