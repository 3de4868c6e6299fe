//! Client core for the grocery route optimization service.
//!
//! # Overview
//! Turns the shopper's four search fields into a request, calls the remote
//! optimization service once, and normalizes its answer into a typed
//! shopping plan (line items, stores, route, totals).
//!
//! # Design
//! - `input` validates raw form text into an `OptimizationRequest`.
//! - `OptimizerClient` builds `HttpRequest` values and parses `HttpResponse`
//!   values (host-does-IO); a `Transport` runs the actual round trip.
//! - `normalize` parses the encoded item strings and checks route and store
//!   rules; bad items are collected, broken rules reject the plan.
//! - `Session` owns the request lifecycle and drops stale completions.

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod input;
pub mod item;
pub mod normalize;
pub mod session;
pub mod transport;
pub mod types;

pub use client::OptimizerClient;
pub use config::ClientConfig;
pub use error::{
    ClientError, ConfigError, Field, Invariant, NormalizationError, ServiceError, TransportError,
    ValidationError,
};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use input::{build_request, parse_grocery_list, SearchInput};
pub use item::parse_line_item;
pub use normalize::normalize;
pub use session::{
    ErrorInfo, ErrorKind, Resolution, Session, SessionState, Submission, SubmissionId,
};
pub use transport::{Transport, UreqTransport};
pub use types::{
    LineItem, NormalizationWarning, OptimizationPlan, OptimizationRequest, RawPlan, RawRouteStep,
    RouteStep, StopKind, TotalMismatch,
};
