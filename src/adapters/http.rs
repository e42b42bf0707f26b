//! REST/JSON clients for a real compliance backend.
//!
//! Endpoints, relative to the configured base URL:
//!
//! - `GET routes`, `GET routes/{id}`, `POST routes/{id}/baseline`
//! - `GET compliance/{year}`, `POST compliance/{year}/bank`, `POST compliance/{year}/apply`
//! - `POST pools`

use crate::core::rules;
use crate::domain::model::{ComplianceBalance, Pool, PoolMember, Route};
use crate::domain::ports::{BankingService, PoolingService, RouteRepository};
use crate::utils::error::{DashError, Result};
use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

#[derive(Debug, Clone)]
struct HttpBackend {
    client: Client,
    base: Url,
}

impl HttpBackend {
    fn new(endpoint: &str, timeout: Duration) -> Result<Self> {
        let base = Url::parse(endpoint)?;
        if base.cannot_be_a_base() {
            return Err(DashError::InvalidConfigValueError {
                field: "backend.endpoint".to_string(),
                value: endpoint.to_string(),
                reason: "URL cannot be used as a base".to_string(),
            });
        }
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, base })
    }

    fn url_for(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| DashError::InvalidConfigValueError {
                field: "backend.endpoint".to_string(),
                value: self.base.to_string(),
                reason: "URL cannot be used as a base".to_string(),
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}

async fn backend_error(response: Response) -> DashError {
    let status = response.status().as_u16();
    let message = response.text().await.unwrap_or_default();
    DashError::BackendError { status, message }
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
    #[serde(default)]
    available: Option<f64>,
}

#[derive(Debug, Serialize)]
struct AmountRequest {
    amount: f64,
}

#[derive(Debug, Serialize)]
struct CreatePoolRequest<'a> {
    members: &'a [PoolMember],
}

#[derive(Debug, Clone)]
pub struct HttpRouteRepository {
    backend: HttpBackend,
}

impl HttpRouteRepository {
    pub fn new(endpoint: &str, timeout: Duration) -> Result<Self> {
        Ok(Self {
            backend: HttpBackend::new(endpoint, timeout)?,
        })
    }
}

#[async_trait]
impl RouteRepository for HttpRouteRepository {
    async fn get_all_routes(&self) -> Result<Vec<Route>> {
        let url = self.backend.url_for(&["routes"])?;
        tracing::debug!("Fetching routes from {}", url);

        let response = self.backend.client.get(url).send().await?;
        if !response.status().is_success() {
            return Err(backend_error(response).await);
        }
        Ok(response.json().await?)
    }

    async fn get_route_by_id(&self, id: &str) -> Result<Option<Route>> {
        let url = self.backend.url_for(&["routes", id])?;
        let response = self.backend.client.get(url).send().await?;

        match response.status() {
            StatusCode::NOT_FOUND => Ok(None),
            status if status.is_success() => Ok(Some(response.json().await?)),
            _ => Err(backend_error(response).await),
        }
    }

    async fn set_baseline(&self, route_id: &str) -> Result<()> {
        let url = self.backend.url_for(&["routes", route_id, "baseline"])?;
        tracing::debug!("Setting baseline via {}", url);

        let response = self.backend.client.post(url).send().await?;
        if !response.status().is_success() {
            return Err(backend_error(response).await);
        }
        Ok(())
    }
}

/// Banking and pooling share one backend, as they do in the compliance API.
#[derive(Debug, Clone)]
pub struct HttpComplianceApi {
    backend: HttpBackend,
}

impl HttpComplianceApi {
    pub fn new(endpoint: &str, timeout: Duration) -> Result<Self> {
        Ok(Self {
            backend: HttpBackend::new(endpoint, timeout)?,
        })
    }

    async fn post_amount(&self, action: &str, amount: f64, year: i32) -> Result<ComplianceBalance> {
        let year_segment = year.to_string();
        let url = self
            .backend
            .url_for(&["compliance", year_segment.as_str(), action])?;
        tracing::debug!("POST {} amount={}", url, amount);

        let response = self
            .backend
            .client
            .post(url)
            .json(&AmountRequest { amount })
            .send()
            .await?;

        match response.status() {
            status if status.is_success() => Ok(response.json().await?),
            StatusCode::NOT_FOUND => Err(DashError::BalanceNotFound { year }),
            StatusCode::CONFLICT | StatusCode::UNPROCESSABLE_ENTITY => {
                let status = response.status().as_u16();
                let text = response.text().await.unwrap_or_default();
                Err(map_rejection(status, &text, amount))
            }
            _ => Err(backend_error(response).await),
        }
    }
}

/// Maps a 409/422 rejection body onto the domain error kinds.
fn map_rejection(status: u16, body: &str, amount: f64) -> DashError {
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(parsed) => {
            let available = parsed.available.unwrap_or(0.0);
            match parsed.error.as_str() {
                "InsufficientBalance" => DashError::InsufficientBalance {
                    requested: amount,
                    available,
                },
                "InsufficientBanked" => DashError::InsufficientBanked {
                    requested: amount,
                    available,
                },
                "InvalidAmount" => DashError::InvalidAmount { amount },
                _ => DashError::BackendError {
                    status,
                    message: body.to_string(),
                },
            }
        }
        Err(_) => DashError::BackendError {
            status,
            message: body.to_string(),
        },
    }
}

#[async_trait]
impl BankingService for HttpComplianceApi {
    async fn get_current_balance(&self, year: i32) -> Result<ComplianceBalance> {
        let year_segment = year.to_string();
        let url = self.backend.url_for(&["compliance", year_segment.as_str()])?;
        let response = self.backend.client.get(url).send().await?;

        match response.status() {
            status if status.is_success() => Ok(response.json().await?),
            StatusCode::NOT_FOUND => Err(DashError::BalanceNotFound { year }),
            _ => Err(backend_error(response).await),
        }
    }

    async fn bank_surplus(&self, amount: f64, year: i32) -> Result<ComplianceBalance> {
        self.post_amount("bank", amount, year).await
    }

    async fn apply_surplus(&self, amount: f64, year: i32) -> Result<ComplianceBalance> {
        self.post_amount("apply", amount, year).await
    }
}

#[async_trait]
impl PoolingService for HttpComplianceApi {
    async fn create_pool(&self, members: &[PoolMember]) -> Result<Pool> {
        let url = self.backend.url_for(&["pools"])?;
        let sent = self
            .backend
            .client
            .post(url)
            .json(&CreatePoolRequest { members })
            .send()
            .await;

        let response = match sent {
            Ok(response) if response.status().is_success() => response,
            Ok(response) => {
                return Err(DashError::PoolCreationFailed {
                    reason: format!("backend returned {}", response.status()),
                })
            }
            Err(e) => {
                return Err(DashError::PoolCreationFailed {
                    reason: e.to_string(),
                })
            }
        };

        response
            .json::<Pool>()
            .await
            .map_err(|e| DashError::PoolCreationFailed {
                reason: format!("invalid pool payload: {}", e),
            })
    }

    fn validate_pool(&self, members: &[PoolMember]) -> bool {
        rules::validate_pool(members)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_for_keeps_base_path() {
        let backend = HttpBackend::new("http://localhost:8080/api", Duration::from_secs(5)).unwrap();
        let url = backend.url_for(&["routes", "R001", "baseline"]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:8080/api/routes/R001/baseline");

        let backend = HttpBackend::new("http://localhost:8080/api/", Duration::from_secs(5)).unwrap();
        let url = backend.url_for(&["routes"]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:8080/api/routes");
    }

    #[test]
    fn test_url_for_escapes_route_ids() {
        let backend = HttpBackend::new("http://localhost:8080", Duration::from_secs(5)).unwrap();
        let url = backend.url_for(&["routes", "R 1/x"]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:8080/routes/R%201%2Fx");
    }

    #[test]
    fn test_map_rejection() {
        let err = map_rejection(409, r#"{"error":"InsufficientBalance","available":0}"#, 100.0);
        assert!(matches!(
            err,
            DashError::InsufficientBalance { requested, available } if requested == 100.0 && available == 0.0
        ));

        let err = map_rejection(422, r#"{"error":"InsufficientBanked"}"#, 5.0);
        assert!(matches!(err, DashError::InsufficientBanked { .. }));

        let err = map_rejection(409, "not json", 5.0);
        assert!(matches!(err, DashError::BackendError { status: 409, .. }));
    }
}
