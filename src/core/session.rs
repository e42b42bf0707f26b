use crate::config::session::{FailurePolicy, SessionAction, SessionScript};
use crate::core::dashboard::Dashboard;
use crate::domain::ports::{BankingService, Notifier, PoolingService, RouteRepository};
use crate::utils::error::{DashError, Result};
use serde::Serialize;
use std::time::{Duration, Instant};

/// Outcome of one scripted action.
#[derive(Debug, Clone, Serialize)]
pub struct ActionOutcome {
    pub index: usize,
    pub action: String,
    pub succeeded: bool,
    pub detail: String,
    #[serde(skip)]
    pub duration: Duration,
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionReport {
    pub session_id: String,
    pub name: String,
    pub outcomes: Vec<ActionOutcome>,
    /// Actions not run because an earlier one failed under `on_failure = "stop"`.
    pub skipped: usize,
}

impl SessionReport {
    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.succeeded).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.succeeded()
    }
}

/// Plays a [`SessionScript`] against a dashboard, one action at a time.
pub struct SessionRunner {
    session_id: String,
}

impl SessionRunner {
    pub fn new(session_id: String) -> Self {
        Self { session_id }
    }

    pub async fn run<R, B, P, N>(
        &self,
        script: &SessionScript,
        dashboard: &mut Dashboard<R, B, P, N>,
    ) -> SessionReport
    where
        R: RouteRepository,
        B: BankingService,
        P: PoolingService,
        N: Notifier,
    {
        tracing::info!(
            "🎬 Session '{}' ({}) with {} actions",
            script.session.name,
            self.session_id,
            script.actions.len()
        );

        let mut outcomes = Vec::with_capacity(script.actions.len());
        let mut skipped = 0;

        for (index, action) in script.actions.iter().enumerate() {
            let start = Instant::now();
            let result = execute(action, dashboard).await;
            let duration = start.elapsed();

            let outcome = match result {
                Ok(detail) => {
                    tracing::info!("✅ [{}] {} - {}", index + 1, action.name(), detail);
                    ActionOutcome {
                        index,
                        action: action.name().to_string(),
                        succeeded: true,
                        detail,
                        duration,
                    }
                }
                Err(e) => {
                    tracing::warn!("❌ [{}] {} - {}", index + 1, action.name(), e);
                    ActionOutcome {
                        index,
                        action: action.name().to_string(),
                        succeeded: false,
                        detail: e.to_string(),
                        duration,
                    }
                }
            };

            let failed = !outcome.succeeded;
            outcomes.push(outcome);

            if failed && script.session.on_failure == FailurePolicy::Stop {
                skipped = script.actions.len() - index - 1;
                tracing::warn!("🛑 Stopping session, {} actions skipped", skipped);
                break;
            }
        }

        SessionReport {
            session_id: self.session_id.clone(),
            name: script.session.name.clone(),
            outcomes,
            skipped,
        }
    }
}

async fn execute<R, B, P, N>(
    action: &SessionAction,
    dashboard: &mut Dashboard<R, B, P, N>,
) -> Result<String>
where
    R: RouteRepository,
    B: BankingService,
    P: PoolingService,
    N: Notifier,
{
    match action {
        SessionAction::SetBaseline { route_id } => {
            dashboard.set_baseline(route_id).await?;
            Ok(format!("baseline is now {}", route_id))
        }
        SessionAction::BankSurplus { amount } => {
            let balance = dashboard.bank_surplus(*amount).await?;
            Ok(format!("balance {}, banked {}", balance.balance, balance.banked))
        }
        SessionAction::ApplySurplus { amount } => {
            let balance = dashboard.apply_surplus(*amount).await?;
            Ok(format!("balance {}, banked {}", balance.balance, balance.banked))
        }
        SessionAction::AddPoolMember { .. } => {
            let member = action.pool_member().ok_or_else(|| DashError::ConfigValidationError {
                field: "actions".to_string(),
                message: "add_pool_member without member data".to_string(),
            })?;
            let added = dashboard.add_pool_member(member);
            Ok(format!("added {} ({})", added.vessel_name, added.ship_id))
        }
        SessionAction::RemovePoolMember { ship_id } => {
            let removed = dashboard.remove_pool_member(ship_id);
            Ok(format!("removed {} entries for {}", removed, ship_id))
        }
        SessionAction::CreatePool => {
            let pool = dashboard.create_pool().await?;
            Ok(format!("pool {} total {}", pool.pool_id, pool.total_balance))
        }
    }
}
