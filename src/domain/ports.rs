use crate::domain::model::{ComplianceBalance, Pool, PoolMember, Route};
use crate::utils::error::Result;
use async_trait::async_trait;

/// Route collection with baseline-toggle semantics.
#[async_trait]
pub trait RouteRepository: Send + Sync {
    /// All routes in insertion order.
    async fn get_all_routes(&self) -> Result<Vec<Route>>;
    async fn get_route_by_id(&self, id: &str) -> Result<Option<Route>>;
    /// Marks `route_id` as the only baseline. An unknown id leaves no baseline at all.
    async fn set_baseline(&self, route_id: &str) -> Result<()>;
}

/// Banking of compliance balance, one record per reporting year.
#[async_trait]
pub trait BankingService: Send + Sync {
    async fn get_current_balance(&self, year: i32) -> Result<ComplianceBalance>;
    async fn bank_surplus(&self, amount: f64, year: i32) -> Result<ComplianceBalance>;
    async fn apply_surplus(&self, amount: f64, year: i32) -> Result<ComplianceBalance>;
}

#[async_trait]
pub trait PoolingService: Send + Sync {
    async fn create_pool(&self, members: &[PoolMember]) -> Result<Pool>;
    fn validate_pool(&self, members: &[PoolMember]) -> bool;
}

/// Blocking user notification (the dashboard's alert box).
pub trait Notifier: Send + Sync {
    fn notify(&self, notice: Notice);
}

#[derive(Debug, Clone, PartialEq)]
pub enum Notice {
    Info(String),
    Error(String),
}

impl Notice {
    pub fn message(&self) -> &str {
        match self {
            Notice::Info(message) | Notice::Error(message) => message,
        }
    }
}

/// Where exported reports are written.
pub trait Storage: Send + Sync {
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

// Boxed ports let the backend be chosen at runtime (memory or http).

#[async_trait]
impl<T: RouteRepository + ?Sized> RouteRepository for Box<T> {
    async fn get_all_routes(&self) -> Result<Vec<Route>> {
        (**self).get_all_routes().await
    }

    async fn get_route_by_id(&self, id: &str) -> Result<Option<Route>> {
        (**self).get_route_by_id(id).await
    }

    async fn set_baseline(&self, route_id: &str) -> Result<()> {
        (**self).set_baseline(route_id).await
    }
}

#[async_trait]
impl<T: BankingService + ?Sized> BankingService for Box<T> {
    async fn get_current_balance(&self, year: i32) -> Result<ComplianceBalance> {
        (**self).get_current_balance(year).await
    }

    async fn bank_surplus(&self, amount: f64, year: i32) -> Result<ComplianceBalance> {
        (**self).bank_surplus(amount, year).await
    }

    async fn apply_surplus(&self, amount: f64, year: i32) -> Result<ComplianceBalance> {
        (**self).apply_surplus(amount, year).await
    }
}

#[async_trait]
impl<T: PoolingService + ?Sized> PoolingService for Box<T> {
    async fn create_pool(&self, members: &[PoolMember]) -> Result<Pool> {
        (**self).create_pool(members).await
    }

    fn validate_pool(&self, members: &[PoolMember]) -> bool {
        (**self).validate_pool(members)
    }
}
