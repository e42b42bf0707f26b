#[cfg(feature = "cli")]
pub mod cli;
pub mod dashboard_config;
pub mod session;

#[cfg(feature = "cli")]
pub use cli::CliArgs;
pub use dashboard_config::{BackendKind, DashboardConfig};
pub use session::{SessionAction, SessionScript};
