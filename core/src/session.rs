//! Request lifecycle state machine.
//!
//! # Design
//! `Session` is the single owner of the current plan. `submit` validates the
//! input and hands back a `Submission` ticket; whoever performs the network
//! call returns the ticket through `resolve`. Tickets are consumed on use, and
//! only the ticket of the latest submission is applied: a completion for a
//! superseded submission is logged and dropped, so results land in
//! submission order regardless of completion order.
//!
//! ```text
//! Idle | Success | Error --submit--> Loading
//! Loading --resolve(ok)--> Success
//! Loading --resolve(err)--> Error
//! ```

use std::fmt;
use std::sync::Arc;

use crate::client::OptimizerClient;
use crate::error::{ClientError, NormalizationError, ServiceError, ValidationError};
use crate::input::{build_request, SearchInput};
use crate::normalize::normalize;
use crate::transport::Transport;
use crate::types::{OptimizationPlan, OptimizationRequest, RawPlan};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SubmissionId(u64);

impl fmt::Display for SubmissionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Ticket for one in-flight submission. Not `Clone`: each ticket resolves at
/// most once.
#[derive(Debug)]
pub struct Submission {
    id: SubmissionId,
    request: OptimizationRequest,
}

impl Submission {
    pub fn id(&self) -> SubmissionId {
        self.id
    }

    pub fn request(&self) -> &OptimizationRequest {
        &self.request
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    Transport,
    Service,
    Normalization,
}

/// User-facing description of a failed submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorInfo {
    pub kind: ErrorKind,
    pub message: String,
}

impl From<&ValidationError> for ErrorInfo {
    fn from(err: &ValidationError) -> Self {
        Self {
            kind: ErrorKind::Validation,
            message: err.to_string(),
        }
    }
}

impl From<&ClientError> for ErrorInfo {
    fn from(err: &ClientError) -> Self {
        let kind = match err {
            ClientError::Transport(_) | ClientError::Serialization(_) => ErrorKind::Transport,
            ClientError::Service(_) => ErrorKind::Service,
        };
        let message = match err {
            ClientError::Service(ServiceError::Reported(message)) => message.clone(),
            other => other.to_string(),
        };
        Self { kind, message }
    }
}

impl From<&NormalizationError> for ErrorInfo {
    fn from(err: &NormalizationError) -> Self {
        Self {
            kind: ErrorKind::Normalization,
            message: err.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Loading,
    Success(Arc<OptimizationPlan>),
    Error(ErrorInfo),
}

/// Whether `resolve` changed the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Applied,
    /// The ticket belonged to a superseded or already resolved submission.
    Stale,
}

#[derive(Debug)]
pub struct Session {
    state: SessionState,
    latest_plan: Option<Arc<OptimizationPlan>>,
    next_id: u64,
    in_flight: Option<SubmissionId>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Self {
            state: SessionState::Idle,
            latest_plan: None,
            next_id: 1,
            in_flight: None,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, SessionState::Loading)
    }

    /// Most recent successful plan. Stays available after later failures.
    pub fn latest_plan(&self) -> Option<&OptimizationPlan> {
        self.latest_plan.as_deref()
    }

    /// Start a new submission, superseding any one still in flight.
    ///
    /// # Errors
    ///
    /// Returns the [`ValidationError`] for bad input; the session moves to
    /// `Error` and nothing is left in flight.
    pub fn submit(&mut self, input: &SearchInput) -> Result<Submission, ValidationError> {
        if let Some(previous) = self.in_flight.take() {
            tracing::debug!(%previous, "superseding in-flight submission");
        }

        let request = match build_request(input) {
            Ok(request) => request,
            Err(err) => {
                tracing::debug!(%err, "submission rejected by validation");
                self.state = SessionState::Error(ErrorInfo::from(&err));
                return Err(err);
            }
        };

        let id = SubmissionId(self.next_id);
        self.next_id += 1;
        self.in_flight = Some(id);
        self.state = SessionState::Loading;
        tracing::debug!(submission = %id, "session loading");
        Ok(Submission { id, request })
    }

    /// Apply the outcome of `submission`'s service call.
    pub fn resolve(
        &mut self,
        submission: Submission,
        outcome: Result<RawPlan, ClientError>,
    ) -> Resolution {
        if self.in_flight != Some(submission.id) {
            tracing::debug!(submission = %submission.id, "discarding stale resolution");
            return Resolution::Stale;
        }
        self.in_flight = None;

        let result = outcome
            .map_err(|err| ErrorInfo::from(&err))
            .and_then(|raw| {
                normalize(&raw, submission.request.max_stores).map_err(|err| ErrorInfo::from(&err))
            });

        match result {
            Ok(plan) => {
                let plan = Arc::new(plan);
                tracing::debug!(
                    submission = %submission.id,
                    stores = plan.stores.len(),
                    items = plan.line_items.len(),
                    "session succeeded"
                );
                self.latest_plan = Some(Arc::clone(&plan));
                self.state = SessionState::Success(plan);
            }
            Err(info) => {
                tracing::debug!(
                    submission = %submission.id,
                    message = %info.message,
                    "session failed"
                );
                self.state = SessionState::Error(info);
            }
        }
        Resolution::Applied
    }

    /// Submit, call the service once, and resolve. Returns the resulting state.
    pub fn run<T: Transport + ?Sized>(
        &mut self,
        client: &OptimizerClient,
        transport: &T,
        input: &SearchInput,
    ) -> &SessionState {
        if let Ok(submission) = self.submit(input) {
            let outcome = client.execute(transport, submission.request());
            self.resolve(submission, outcome);
        }
        &self.state
    }
}
