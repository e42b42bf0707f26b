use crate::core::rules;
use crate::domain::model::{Pool, PoolMember};
use crate::domain::ports::PoolingService;
use crate::utils::error::Result;
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashSet;
use tokio::sync::Mutex;
use uuid::Uuid;

/// Finalizes pools locally. The only state kept is the set of issued pool IDs.
#[derive(Default)]
pub struct LocalPoolingService {
    issued_ids: Mutex<HashSet<String>>,
}

impl LocalPoolingService {
    pub fn new() -> Self {
        Self::default()
    }

    async fn next_pool_id(&self) -> String {
        let mut issued = self.issued_ids.lock().await;
        loop {
            let raw = Uuid::new_v4().simple().to_string();
            let candidate = format!("POOL-{}", raw[..8].to_uppercase());
            if issued.insert(candidate.clone()) {
                return candidate;
            }
        }
    }
}

#[async_trait]
impl PoolingService for LocalPoolingService {
    async fn create_pool(&self, members: &[PoolMember]) -> Result<Pool> {
        let total_balance = rules::pool_total(members);
        let pool = Pool {
            pool_id: self.next_pool_id().await,
            members: members.to_vec(),
            total_balance,
            is_valid: rules::is_valid_total(total_balance),
            created_at: Utc::now(),
        };

        tracing::debug!(
            "Created pool {} with {} members, total {}",
            pool.pool_id,
            pool.members.len(),
            pool.total_balance
        );
        Ok(pool)
    }

    fn validate_pool(&self, members: &[PoolMember]) -> bool {
        rules::validate_pool(members)
    }
}
