use crate::domain::model::PoolMember;
use crate::utils::error::{DashError, Result};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A scripted sequence of dashboard actions, played in file order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionScript {
    pub session: SessionInfo,
    #[serde(default)]
    pub actions: Vec<SessionAction>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionInfo {
    pub name: String,
    pub description: Option<String>,
    #[serde(default)]
    pub on_failure: FailurePolicy,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// 通知後繼續下一個動作
    #[default]
    Continue,
    Stop,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionAction {
    SetBaseline {
        route_id: String,
    },
    BankSurplus {
        amount: f64,
    },
    ApplySurplus {
        amount: f64,
    },
    AddPoolMember {
        #[serde(default)]
        ship_id: Option<String>,
        vessel_name: String,
        verified_cb: f64,
    },
    RemovePoolMember {
        ship_id: String,
    },
    CreatePool,
}

impl SessionAction {
    pub fn name(&self) -> &'static str {
        match self {
            SessionAction::SetBaseline { .. } => "set_baseline",
            SessionAction::BankSurplus { .. } => "bank_surplus",
            SessionAction::ApplySurplus { .. } => "apply_surplus",
            SessionAction::AddPoolMember { .. } => "add_pool_member",
            SessionAction::RemovePoolMember { .. } => "remove_pool_member",
            SessionAction::CreatePool => "create_pool",
        }
    }

    /// Member to add; an empty ship id is filled in by the dashboard.
    pub fn pool_member(&self) -> Option<PoolMember> {
        match self {
            SessionAction::AddPoolMember {
                ship_id,
                vessel_name,
                verified_cb,
            } => Some(PoolMember::new(
                ship_id.clone().unwrap_or_default(),
                vessel_name.clone(),
                *verified_cb,
            )),
            _ => None,
        }
    }
}

impl SessionScript {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(DashError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| DashError::ConfigValidationError {
            field: "session_toml_parsing".to_string(),
            message: format!("Session TOML parsing error: {}", e),
        })
    }
}

impl Validate for SessionScript {
    fn validate(&self) -> Result<()> {
        validation::validate_non_empty_string("session.name", &self.session.name)?;

        for (index, action) in self.actions.iter().enumerate() {
            let field = format!("actions[{}]", index);
            match action {
                SessionAction::SetBaseline { route_id } => {
                    validation::validate_non_empty_string(&field, route_id)?
                }
                SessionAction::RemovePoolMember { ship_id } => {
                    validation::validate_non_empty_string(&field, ship_id)?
                }
                SessionAction::BankSurplus { amount } | SessionAction::ApplySurplus { amount } => {
                    validation::validate_finite(&field, *amount)?
                }
                SessionAction::AddPoolMember { verified_cb, .. } => {
                    validation::validate_finite(&field, *verified_cb)?
                }
                SessionAction::CreatePool => {}
            }
        }

        Ok(())
    }
}
