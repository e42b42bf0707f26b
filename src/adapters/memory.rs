//! In-memory stand-ins for the remote route and compliance APIs.

use crate::adapters::simulate_latency;
use crate::domain::model::{ComplianceBalance, Route};
use crate::domain::ports::{BankingService, RouteRepository};
use crate::utils::error::{DashError, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::{Mutex, RwLock};

pub struct InMemoryRouteStore {
    routes: RwLock<Vec<Route>>,
    latency: Duration,
}

impl InMemoryRouteStore {
    pub fn new(routes: Vec<Route>) -> Self {
        Self {
            routes: RwLock::new(routes),
            latency: Duration::ZERO,
        }
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }
}

#[async_trait]
impl RouteRepository for InMemoryRouteStore {
    async fn get_all_routes(&self) -> Result<Vec<Route>> {
        simulate_latency(self.latency).await;
        Ok(self.routes.read().await.clone())
    }

    async fn get_route_by_id(&self, id: &str) -> Result<Option<Route>> {
        let routes = self.routes.read().await;
        Ok(routes.iter().find(|r| r.route_id == id).cloned())
    }

    async fn set_baseline(&self, route_id: &str) -> Result<()> {
        let mut routes = self.routes.write().await;

        // 整批替換，讀者不會看到零個或多個 baseline 的中間狀態
        let updated: Vec<Route> = routes
            .iter()
            .map(|r| Route {
                is_baseline: r.route_id == route_id,
                ..r.clone()
            })
            .collect();

        if !updated.iter().any(|r| r.is_baseline) {
            tracing::warn!("Route '{}' not found, no baseline is set", route_id);
        }

        *routes = updated;
        tracing::debug!("Baseline set to {}", route_id);
        Ok(())
    }
}

/// One balance record per reporting year. A single lock serializes every bank/apply.
pub struct InMemoryComplianceStore {
    balances: Mutex<HashMap<i32, ComplianceBalance>>,
    latency: Duration,
}

impl InMemoryComplianceStore {
    pub fn new(balances: impl IntoIterator<Item = ComplianceBalance>) -> Self {
        Self {
            balances: Mutex::new(balances.into_iter().map(|b| (b.year, b)).collect()),
            latency: Duration::ZERO,
        }
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }
}

fn check_amount(amount: f64) -> Result<()> {
    if !amount.is_finite() || amount < 0.0 {
        return Err(DashError::InvalidAmount { amount });
    }
    Ok(())
}

#[async_trait]
impl BankingService for InMemoryComplianceStore {
    async fn get_current_balance(&self, year: i32) -> Result<ComplianceBalance> {
        simulate_latency(self.latency).await;
        let balances = self.balances.lock().await;
        balances
            .get(&year)
            .copied()
            .ok_or(DashError::BalanceNotFound { year })
    }

    async fn bank_surplus(&self, amount: f64, year: i32) -> Result<ComplianceBalance> {
        check_amount(amount)?;
        let mut balances = self.balances.lock().await;
        let record = balances
            .get_mut(&year)
            .ok_or(DashError::BalanceNotFound { year })?;

        if amount > record.balance {
            return Err(DashError::InsufficientBalance {
                requested: amount,
                available: record.balance,
            });
        }

        record.balance -= amount;
        record.banked += amount;
        tracing::debug!(
            "Banked {} for {}: balance={}, banked={}",
            amount,
            year,
            record.balance,
            record.banked
        );
        Ok(*record)
    }

    async fn apply_surplus(&self, amount: f64, year: i32) -> Result<ComplianceBalance> {
        check_amount(amount)?;
        let mut balances = self.balances.lock().await;
        let record = balances
            .get_mut(&year)
            .ok_or(DashError::BalanceNotFound { year })?;

        if amount > record.banked {
            return Err(DashError::InsufficientBanked {
                requested: amount,
                available: record.banked,
            });
        }

        record.banked -= amount;
        record.balance += amount;
        tracing::debug!(
            "Applied {} for {}: balance={}, banked={}",
            amount,
            year,
            record.balance,
            record.banked
        );
        Ok(*record)
    }
}
