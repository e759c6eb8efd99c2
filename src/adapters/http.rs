//! # HTTP Adapters
//!
//! reqwest-based transports for real Forge and Anvil deployments. All
//! transport-native failures (connect errors, client-side timeouts, non-2xx
//! statuses) are mapped into the closed taxonomy here; callers above this
//! boundary never see a `reqwest::Error`.
//!
//! Status mapping: 404 becomes `NotFound`, 401/403 become `Unauthorized`,
//! 422 becomes `Validation` with the field map from the response body, and a
//! 204 from the next-assignment endpoint means the queue is empty
//! (`NoAssignments`). Anything else is `Unexpected` carrying a body snippet
//! for the logs.

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::Deserialize;
use serde_json::json;
use std::collections::BTreeMap;
use std::time::Duration;

use crate::adapters::{AnvilAdapter, ForgeAdapter};
use crate::error::{ClientError, Result};
use crate::models::{Assignment, Label, QueueStats, Sample};

const ERROR_BODY_SNIPPET_LEN: usize = 256;

/// Field errors as Anvil reports them on a 422.
#[derive(Debug, Deserialize)]
struct ValidationBody {
    errors: BTreeMap<String, String>,
}

#[derive(Debug, Clone)]
pub struct HttpForgeAdapter {
    base_url: String,
    client: Client,
    timeout_ms: u64,
}

impl HttpForgeAdapter {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: http_client(timeout),
            timeout_ms: timeout.as_millis() as u64,
        }
    }
}

#[async_trait]
impl ForgeAdapter for HttpForgeAdapter {
    fn name(&self) -> &'static str {
        "http-forge"
    }

    async fn get_sample(&self, sample_id: &str) -> Result<Sample> {
        let url = format!("{}/api/v1/samples/{sample_id}", self.base_url);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| transport_error("get_sample", self.timeout_ms, e))?;

        match response.status() {
            status if status.is_success() => {
                let raw = decode_json("get_sample", response).await?;
                Ok(Sample::from_value(raw)?)
            }
            StatusCode::NOT_FOUND => Err(ClientError::NotFound {
                resource: format!("sample/{sample_id}"),
            }),
            status => Err(classify_status("forge", "get_sample", status, response).await),
        }
    }

    async fn health_check(&self) -> Result<()> {
        let url = format!("{}/health", self.base_url);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| transport_error("health_check", self.timeout_ms, e))?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(classify_status("forge", "health_check", response.status(), response).await)
        }
    }
}

#[derive(Debug, Clone)]
pub struct HttpAnvilAdapter {
    base_url: String,
    client: Client,
    timeout_ms: u64,
}

impl HttpAnvilAdapter {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: http_client(timeout),
            timeout_ms: timeout.as_millis() as u64,
        }
    }
}

#[async_trait]
impl AnvilAdapter for HttpAnvilAdapter {
    fn name(&self) -> &'static str {
        "http-anvil"
    }

    async fn get_next_assignment(&self, queue_id: &str, user_id: &str) -> Result<Assignment> {
        let url = format!("{}/api/v1/queues/{queue_id}/assignments/next", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(&json!({ "user_id": user_id }))
            .send()
            .await
            .map_err(|e| transport_error("get_next_assignment", self.timeout_ms, e))?;

        match response.status() {
            // Anvil answers 204 when the queue has nothing to hand out
            StatusCode::NO_CONTENT => Err(ClientError::NoAssignments {
                queue_id: queue_id.to_string(),
            }),
            status if status.is_success() => {
                let raw = decode_json("get_next_assignment", response).await?;
                Ok(Assignment::from_value(raw)?)
            }
            StatusCode::NOT_FOUND => Err(ClientError::NotFound {
                resource: format!("queue/{queue_id}"),
            }),
            status => {
                Err(classify_status("anvil", "get_next_assignment", status, response).await)
            }
        }
    }

    async fn submit_label(
        &self,
        assignment_id: &str,
        values: BTreeMap<String, serde_json::Value>,
        elapsed_seconds: f64,
    ) -> Result<Label> {
        let url = format!("{}/api/v1/assignments/{assignment_id}/labels", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(&json!({ "values": values, "elapsed_seconds": elapsed_seconds }))
            .send()
            .await
            .map_err(|e| transport_error("submit_label", self.timeout_ms, e))?;

        match response.status() {
            status if status.is_success() => {
                let raw = decode_json("submit_label", response).await?;
                Ok(Label::from_value(raw)?)
            }
            StatusCode::UNPROCESSABLE_ENTITY => {
                let body: ValidationBody =
                    response.json().await.map_err(|e| ClientError::Unexpected {
                        detail: format!("anvil 422 with unreadable error body: {e}"),
                    })?;
                Err(ClientError::Validation {
                    fields: body.errors,
                })
            }
            StatusCode::NOT_FOUND => Err(ClientError::NotFound {
                resource: format!("assignment/{assignment_id}"),
            }),
            status => Err(classify_status("anvil", "submit_label", status, response).await),
        }
    }

    async fn get_queue_stats(&self, queue_id: &str) -> Result<QueueStats> {
        let url = format!("{}/api/v1/queues/{queue_id}/stats", self.base_url);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| transport_error("get_queue_stats", self.timeout_ms, e))?;

        match response.status() {
            status if status.is_success() => {
                let raw = decode_json("get_queue_stats", response).await?;
                Ok(QueueStats::from_value(raw)?)
            }
            StatusCode::NOT_FOUND => Err(ClientError::NotFound {
                resource: format!("queue/{queue_id}"),
            }),
            status => Err(classify_status("anvil", "get_queue_stats", status, response).await),
        }
    }

    async fn health_check(&self) -> Result<()> {
        let url = format!("{}/health", self.base_url);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| transport_error("health_check", self.timeout_ms, e))?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(classify_status("anvil", "health_check", response.status(), response).await)
        }
    }
}

fn http_client(timeout: Duration) -> Client {
    // The resilience wrapper enforces the same bound; setting it on the
    // client as well keeps a half-open TCP connection from outliving it
    Client::builder()
        .timeout(timeout)
        .build()
        .unwrap_or_else(|_| Client::new())
}

fn transport_error(operation: &str, timeout_ms: u64, err: reqwest::Error) -> ClientError {
    if err.is_timeout() {
        ClientError::Timeout {
            operation: operation.to_string(),
            timeout_ms,
        }
    } else {
        ClientError::Network {
            operation: operation.to_string(),
            message: err.to_string(),
        }
    }
}

async fn decode_json(operation: &str, response: Response) -> Result<serde_json::Value> {
    response.json().await.map_err(|e| ClientError::Unexpected {
        detail: format!("{operation}: response body is not valid JSON: {e}"),
    })
}

async fn classify_status(
    upstream: &str,
    operation: &str,
    status: StatusCode,
    response: Response,
) -> ClientError {
    let mut body = response.text().await.unwrap_or_default();
    if body.len() > ERROR_BODY_SNIPPET_LEN {
        // Char-wise so a multi-byte body cannot split mid-character
        body = body.chars().take(ERROR_BODY_SNIPPET_LEN).collect();
    }

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ClientError::Unauthorized {
            message: format!("{upstream} rejected {operation}: {body}"),
        },
        status => ClientError::Unexpected {
            detail: format!("{upstream} returned {status} for {operation}: {body}"),
        },
    }
}
