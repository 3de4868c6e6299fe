//! Request builder and response parser for the optimization service.
//!
//! # Design
//! `OptimizerClient` holds only static configuration (`base_url`, `csv_path`)
//! and carries no state between calls. Each operation is split into a
//! `build_*` method that produces an `HttpRequest` and a `parse_*` method
//! that consumes an `HttpResponse`. `execute` glues the two around a single
//! `Transport` round trip and never retries.

use serde_json::Value;

use crate::error::{ClientError, ServiceError, TransportError};
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::transport::Transport;
use crate::types::{OptimizationRequest, OptimizeBody, RawPlan};

/// Top-level fields every successful `/optimize` response must carry.
const REQUIRED_FIELDS: [&str; 6] = [
    "stores",
    "items",
    "item_total",
    "miles_traveled",
    "approximate_total_cost",
    "route_order",
];

#[derive(Debug, Clone)]
pub struct OptimizerClient {
    base_url: String,
    csv_path: String,
}

impl OptimizerClient {
    pub fn new(base_url: &str, csv_path: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            csv_path: csv_path.to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn build_health(&self) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            url: format!("{}/", self.base_url),
            headers: Vec::new(),
            body: None,
        }
    }

    /// Returns the service's banner text.
    pub fn parse_health(&self, response: HttpResponse) -> Result<String, ClientError> {
        if !response.is_success() {
            return Err(TransportError::Status {
                status: response.status,
                body: response.body,
            }
            .into());
        }
        Ok(response.body.trim().to_string())
    }

    pub fn build_optimize(
        &self,
        request: &OptimizationRequest,
    ) -> Result<HttpRequest, ClientError> {
        let body = serde_json::to_string(&OptimizeBody {
            csv_path: &self.csv_path,
            grocery_list: &request.grocery_list,
            max_stores: request.max_stores,
            user_address: &request.user_address,
        })?;
        Ok(HttpRequest {
            method: HttpMethod::Post,
            url: format!("{}/optimize", self.base_url),
            headers: vec![("content-type".to_string(), "application/json".to_string())],
            body: Some(body),
        })
    }

    /// Interpret an `/optimize` response.
    ///
    /// # Errors
    ///
    /// - [`ServiceError::Reported`]: body is `{"error": "..."}`, whatever the status.
    /// - [`TransportError::Status`]: non-2xx status with any other body.
    /// - [`ServiceError::MalformedResponse`]: 2xx body that is not a complete plan.
    pub fn parse_optimize(&self, response: HttpResponse) -> Result<RawPlan, ClientError> {
        let value = serde_json::from_str::<Value>(&response.body).ok();

        if let Some(message) = value
            .as_ref()
            .and_then(|v| v.get("error"))
            .and_then(Value::as_str)
        {
            return Err(ServiceError::Reported(message.to_string()).into());
        }

        if !response.is_success() {
            return Err(TransportError::Status {
                status: response.status,
                body: response.body,
            }
            .into());
        }

        let Some(value) = value else {
            return Err(malformed("body is not JSON"));
        };
        if !value.is_object() {
            return Err(malformed("body is not a JSON object"));
        }
        if let Some(missing) = REQUIRED_FIELDS.iter().find(|f| value.get(**f).is_none()) {
            return Err(malformed(&format!("missing field `{missing}`")));
        }
        serde_json::from_value(value).map_err(|e| malformed(&e.to_string()))
    }

    /// Send one `/optimize` call through `transport`.
    pub fn execute<T: Transport + ?Sized>(
        &self,
        transport: &T,
        request: &OptimizationRequest,
    ) -> Result<RawPlan, ClientError> {
        let http_request = self.build_optimize(request)?;
        tracing::debug!(
            url = %http_request.url,
            items = request.grocery_list.len(),
            max_stores = request.max_stores,
            "requesting optimized plan"
        );
        let response = transport.send(http_request)?;
        self.parse_optimize(response)
    }

    pub fn check_health<T: Transport + ?Sized>(
        &self,
        transport: &T,
    ) -> Result<String, ClientError> {
        let response = transport.send(self.build_health())?;
        self.parse_health(response)
    }
}

fn malformed(reason: &str) -> ClientError {
    ServiceError::MalformedResponse {
        reason: reason.to_string(),
    }
    .into()
}
