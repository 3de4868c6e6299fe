//! Error types for the planning pipeline.
//!
//! # Design
//! Each pipeline stage owns one error family. `ValidationError` is raised
//! before any request is built and never reaches the network. Transport and
//! service failures are kept apart so callers can tell "no usable answer"
//! from "the service answered with a refusal". `NormalizationError` covers
//! both per-item parse failures (collected, non-fatal) and route or store
//! invariant violations (fatal for the whole plan).

use std::fmt;

use thiserror::Error;

/// Input field that failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    HomeAddress,
    GroceryList,
    Budget,
    MaxStores,
}

impl Field {
    /// Form-field name shown to the user.
    pub fn as_str(self) -> &'static str {
        match self {
            Field::HomeAddress => "homeAddress",
            Field::GroceryList => "groceryList",
            Field::Budget => "budget",
            Field::MaxStores => "maxStores",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Bad user input, caught before a request is built.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid {field}: {reason}")]
pub struct ValidationError {
    pub field: Field,
    pub reason: String,
}

impl ValidationError {
    pub(crate) fn new(field: Field, reason: impl Into<String>) -> Self {
        Self {
            field,
            reason: reason.into(),
        }
    }
}

/// Network or infrastructure failure: no interpretable response body.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("request to {url} timed out")]
    Timeout { url: String },

    #[error("could not reach {url}: {reason}")]
    Connect { url: String, reason: String },

    /// Non-2xx status whose body is not a service error object.
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },
}

/// Well-formed answer from the service that is not a usable plan.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The service returned `{"error": "..."}`.
    #[error("{0}")]
    Reported(String),

    #[error("malformed response: {reason}")]
    MalformedResponse { reason: String },
}

/// Errors returned by `OptimizerClient`.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Service(#[from] ServiceError),

    #[error("failed to serialize request: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Plan-level rule checked after parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Invariant {
    /// Route is non-empty with step numbers strictly increasing from 1.
    StepOrder,
    /// Exactly one start (first) and one end (last), stores in between.
    RouteShape,
    /// Every store that sells an item is visited.
    StoresVisited,
    /// No more stores than the shopper allowed.
    StoreLimit,
    /// Distance is not negative.
    NonNegativeDistance,
}

impl fmt::Display for Invariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Invariant::StepOrder => "step-order",
            Invariant::RouteShape => "route-shape",
            Invariant::StoresVisited => "stores-visited",
            Invariant::StoreLimit => "store-limit",
            Invariant::NonNegativeDistance => "non-negative-distance",
        };
        f.write_str(name)
    }
}

/// Failure to turn a raw response into an `OptimizationPlan`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NormalizationError {
    /// An item string does not follow `<name> ($<price>) : <store> - <address>`.
    #[error("unparsable item {raw:?}: {reason}")]
    Item { raw: String, reason: String },

    /// A route step carries an unknown tag or an invalid step number.
    #[error("invalid route step {step} ({tag:?})")]
    Step { step: i64, tag: String },

    #[error("{invariant} violated: {detail}")]
    Invariant { invariant: Invariant, detail: String },

    /// Line item prices cannot be summed or compared without overflowing.
    #[error("line item prices overflow the item total")]
    TotalOverflow,
}

/// Failure to load client configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
