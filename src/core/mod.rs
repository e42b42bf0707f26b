pub mod dashboard;
pub mod formatters;
pub mod report;
pub mod rules;
pub mod session;
pub mod views;

pub use crate::domain::model::{ComplianceBalance, Pool, PoolMember, Route};
pub use crate::domain::ports::{BankingService, Notifier, PoolingService, RouteRepository};
pub use crate::utils::error::Result;
pub use dashboard::{Dashboard, DashboardSettings, DashboardState, LoadState, PoolingState};
