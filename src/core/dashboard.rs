//! Application state and the actions the presentation layer can trigger.
//!
//! [`Dashboard`] owns every piece of state (routes, the current compliance
//! balance, the pool draft and the finalized pool). Actions run to completion
//! one at a time through `&mut self`; a failed action notifies the user and
//! leaves the state exactly as it was.

use crate::core::rules;
use crate::core::views::{self, BankingOverview, ComparisonReport, RouteFilter};
use crate::domain::model::{ComplianceBalance, Pool, PoolMember, Route};
use crate::domain::ports::{BankingService, Notice, Notifier, PoolingService, RouteRepository};
use crate::utils::error::{DashError, Result};
use rand::Rng;
use serde::Serialize;
use uuid::Uuid;

const SHIP_ID_ATTEMPTS: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LoadState {
    Idle,
    Loading,
    Ready,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolingState {
    pub draft: Vec<PoolMember>,
    pub active_pool: Option<Pool>,
}

impl PoolingState {
    pub fn projected_total(&self) -> f64 {
        rules::pool_total(&self.draft)
    }

    pub fn is_draft_valid(&self) -> bool {
        rules::validate_pool(&self.draft)
    }

    pub fn can_finalize(&self) -> bool {
        self.is_draft_valid() && self.active_pool.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardState {
    pub routes: Vec<Route>,
    pub balance: Option<ComplianceBalance>,
    pub pooling: PoolingState,
    pub loading: LoadState,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DashboardSettings {
    pub reporting_year: i32,
    pub target_ghg: f64,
}

impl Default for DashboardSettings {
    fn default() -> Self {
        Self {
            reporting_year: crate::domain::seed::DEFAULT_REPORTING_YEAR,
            target_ghg: rules::TARGET_GHG,
        }
    }
}

pub struct Dashboard<R, B, P, N>
where
    R: RouteRepository,
    B: BankingService,
    P: PoolingService,
    N: Notifier,
{
    routes_repo: R,
    banking: B,
    pooling_service: P,
    notifier: N,
    settings: DashboardSettings,
    state: DashboardState,
}

impl<R, B, P, N> Dashboard<R, B, P, N>
where
    R: RouteRepository,
    B: BankingService,
    P: PoolingService,
    N: Notifier,
{
    /// The pool draft starts with the operator's own fleet entry.
    pub fn new(
        routes_repo: R,
        banking: B,
        pooling_service: P,
        notifier: N,
        settings: DashboardSettings,
        fleet_member: PoolMember,
    ) -> Self {
        Self {
            routes_repo,
            banking,
            pooling_service,
            notifier,
            settings,
            state: DashboardState {
                routes: Vec::new(),
                balance: None,
                pooling: PoolingState {
                    draft: vec![fleet_member],
                    active_pool: None,
                },
                loading: LoadState::Idle,
            },
        }
    }

    /// Initial fetch: idle -> loading -> ready. A failure drops back to idle.
    pub async fn load(&mut self) -> Result<()> {
        self.state.loading = LoadState::Loading;
        tracing::info!("📥 Loading routes and {} compliance balance", self.settings.reporting_year);

        let fetched = async {
            let routes = self.routes_repo.get_all_routes().await?;
            let balance = self
                .banking
                .get_current_balance(self.settings.reporting_year)
                .await?;
            Ok::<_, DashError>((routes, balance))
        }
        .await;

        match fetched {
            Ok((routes, balance)) => {
                tracing::info!("✅ Loaded {} routes", routes.len());
                self.state.routes = routes;
                self.state.balance = Some(balance);
                self.state.loading = LoadState::Ready;
                Ok(())
            }
            Err(e) => {
                self.state.loading = LoadState::Idle;
                Err(self.report_failure("load", e))
            }
        }
    }

    /// Marks the baseline, then replaces the route list with a fresh fetch.
    pub async fn set_baseline(&mut self, route_id: &str) -> Result<()> {
        tracing::info!("Setting baseline route {}", route_id);

        let refreshed = async {
            self.routes_repo.set_baseline(route_id).await?;
            self.routes_repo.get_all_routes().await
        }
        .await;

        match refreshed {
            Ok(routes) => {
                self.state.routes = routes;
                Ok(())
            }
            Err(e) => Err(self.report_failure("set_baseline", e)),
        }
    }

    pub async fn bank_surplus(&mut self, amount: f64) -> Result<ComplianceBalance> {
        tracing::info!("🏦 Banking {} for {}", amount, self.settings.reporting_year);
        let result = match self.check_banking_amount(amount) {
            Ok(()) => {
                self.banking
                    .bank_surplus(amount, self.settings.reporting_year)
                    .await
            }
            Err(e) => Err(e),
        };
        self.finish_banking("bank_surplus", result)
    }

    pub async fn apply_surplus(&mut self, amount: f64) -> Result<ComplianceBalance> {
        tracing::info!("🏦 Applying {} banked to {}", amount, self.settings.reporting_year);
        let result = match self.check_banking_amount(amount) {
            Ok(()) => {
                self.banking
                    .apply_surplus(amount, self.settings.reporting_year)
                    .await
            }
            Err(e) => Err(e),
        };
        self.finish_banking("apply_surplus", result)
    }

    /// Appends to the draft. An empty ship id gets a generated `IMO-` id.
    pub fn add_pool_member(&mut self, mut member: PoolMember) -> &PoolMember {
        if member.ship_id.trim().is_empty() {
            member.ship_id = self.generate_ship_id();
        }
        if self
            .state
            .pooling
            .draft
            .iter()
            .any(|m| m.ship_id == member.ship_id)
        {
            tracing::warn!("Ship {} is already in the pool draft", member.ship_id);
        }

        tracing::info!(
            "➕ Adding {} ({}) to pool draft, CB {}",
            member.vessel_name,
            member.ship_id,
            member.verified_cb
        );
        let index = self.state.pooling.draft.len();
        self.state.pooling.draft.push(member);
        &self.state.pooling.draft[index]
    }

    /// Removes every draft entry with this ship id and returns how many were removed.
    pub fn remove_pool_member(&mut self, ship_id: &str) -> usize {
        let draft = &mut self.state.pooling.draft;
        let before = draft.len();
        draft.retain(|m| m.ship_id != ship_id);
        let removed = before - draft.len();

        if removed == 0 {
            tracing::debug!("Ship {} not in pool draft", ship_id);
        } else {
            tracing::info!("➖ Removed {} from pool draft", ship_id);
        }
        removed
    }

    /// Finalizes the current draft into the active pool. The draft stays editable
    /// afterwards and later edits never touch the finalized snapshot.
    pub async fn create_pool(&mut self) -> Result<Pool> {
        if let Some(active) = &self.state.pooling.active_pool {
            let e = DashError::PoolCreationFailed {
                reason: format!("pool {} is already active", active.pool_id),
            };
            return Err(self.report_failure("create_pool", e));
        }
        if !self.pooling_service.validate_pool(&self.state.pooling.draft) {
            let e = DashError::PoolCreationFailed {
                reason: format!(
                    "pool total balance {} is negative",
                    self.state.pooling.projected_total()
                ),
            };
            return Err(self.report_failure("create_pool", e));
        }

        match self
            .pooling_service
            .create_pool(&self.state.pooling.draft)
            .await
        {
            Ok(pool) => {
                tracing::info!(
                    "✅ Pool {} created with {} members, total {}",
                    pool.pool_id,
                    pool.members.len(),
                    pool.total_balance
                );
                self.notifier.notify(Notice::Info(format!(
                    "Pool Created Successfully! ID: {}",
                    pool.pool_id
                )));
                self.state.pooling.active_pool = Some(pool.clone());
                Ok(pool)
            }
            Err(e) => {
                let e = match e {
                    DashError::PoolCreationFailed { .. } => e,
                    other => DashError::PoolCreationFailed {
                        reason: other.to_string(),
                    },
                };
                Err(self.report_failure("create_pool", e))
            }
        }
    }

    pub fn state(&self) -> &DashboardState {
        &self.state
    }

    pub fn routes(&self) -> &[Route] {
        &self.state.routes
    }

    pub fn balance(&self) -> Option<&ComplianceBalance> {
        self.state.balance.as_ref()
    }

    pub fn pooling(&self) -> &PoolingState {
        &self.state.pooling
    }

    pub fn loading(&self) -> LoadState {
        self.state.loading
    }

    pub fn is_loading(&self) -> bool {
        self.state.loading == LoadState::Loading
    }

    pub fn settings(&self) -> &DashboardSettings {
        &self.settings
    }

    pub fn filtered_routes(&self, filter: &RouteFilter) -> Vec<&Route> {
        filter.apply(&self.state.routes)
    }

    pub fn comparison(&self) -> ComparisonReport {
        views::compare_routes(&self.state.routes, self.settings.target_ghg)
    }

    pub fn banking_overview(&self) -> Option<BankingOverview> {
        self.state.balance.as_ref().map(BankingOverview::from)
    }

    fn check_banking_amount(&self, amount: f64) -> Result<()> {
        if self.state.balance.is_none() {
            return Err(DashError::NotLoaded);
        }
        // 與儀表板一致：金額必須為正數
        if !amount.is_finite() || amount <= 0.0 {
            return Err(DashError::InvalidAmount { amount });
        }
        Ok(())
    }

    fn finish_banking(
        &mut self,
        action: &str,
        result: Result<ComplianceBalance>,
    ) -> Result<ComplianceBalance> {
        match result {
            Ok(balance) => {
                tracing::info!(
                    "✅ {}: balance={}, banked={}",
                    action,
                    balance.balance,
                    balance.banked
                );
                self.state.balance = Some(balance);
                Ok(balance)
            }
            Err(e) => Err(self.report_failure(action, e)),
        }
    }

    fn report_failure(&self, action: &str, e: DashError) -> DashError {
        tracing::warn!(
            "❌ {} failed: {} (Category: {:?}, Severity: {:?})",
            action,
            e,
            e.category(),
            e.severity()
        );
        self.notifier.notify(Notice::Error(e.user_friendly_message()));
        e
    }

    /// `IMO-` plus five random digits; after `SHIP_ID_ATTEMPTS` collisions a uuid suffix is used.
    fn generate_ship_id(&self) -> String {
        let draft = &self.state.pooling.draft;
        let mut rng = rand::thread_rng();
        for _ in 0..SHIP_ID_ATTEMPTS {
            let candidate = format!("IMO-{:05}", rng.gen_range(0..100_000));
            if !draft.iter().any(|m| m.ship_id == candidate) {
                return candidate;
            }
        }

        tracing::debug!("Five-digit ship ids exhausted, using a uuid suffix");
        let raw = Uuid::new_v4().simple().to_string();
        format!("IMO-{}", raw[..12].to_uppercase())
    }
}
