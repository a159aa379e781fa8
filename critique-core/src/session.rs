//! The review session controller.
//!
//! [`ReviewSession`] is the single owner of the session's mutable fields: the
//! current source payload, the selected model, the last result, the busy and
//! error flags. The display layer only ever sees snapshots through the
//! read-only accessors, and the UI state is recomputed from [`SessionFacts`]
//! on every call to [`ReviewSession::state`].
//!
//! # Request lifecycle
//!
//! Submitting does not perform I/O. [`ReviewSession::submit_review`] marks the
//! session busy and returns a [`ReviewRequest`] for the caller to dispatch; the
//! caller later hands the outcome back through [`ReviewSession::settle`]. The
//! session stays usable (model changes, new code) while a request is out.
//!
//! Every submission and every new payload advances a monotonically increasing
//! epoch. A request is only allowed to land if its token still equals the
//! current epoch, so a late response for code the user has since replaced is
//! dropped instead of overwriting newer state.

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::bridge::{HostMessage, Outbox, SessionMessage};
use crate::catalog::{ModelCatalog, ModelEntry};
use crate::error::{NotReadyReason, ServiceError, SessionError};
use crate::normalize::normalize;
use crate::state::{derive_state, ReviewUiState, SessionFacts};
use crate::types::{
    ApplyScope, ApplyStatus, RequestToken, ReviewRequest, SharedResult, SourcePayload,
};

/// What [`ReviewSession::settle`] did with an outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Settlement {
    /// Success stored as the current result.
    Stored,
    /// Failure recorded; the session is in the error state.
    Failed,
    /// The request finished but newer code had arrived; outcome discarded.
    Stale,
    /// Token is not the outstanding request (duplicate or unknown).
    Ignored,
}

pub struct ReviewSession {
    id: Uuid,
    catalog: ModelCatalog,
    model: String,
    authenticated: bool,
    source: Option<SourcePayload>,
    result: Option<SharedResult>,
    /// Message of the last failed request; `Some` means `is_error`.
    failure: Option<String>,
    in_flight: Option<RequestToken>,
    epoch: u64,
    apply_status: Option<ApplyStatus>,
    outbox: Outbox,
}

impl ReviewSession {
    /// Creates an unauthenticated, empty session using the catalog's default model.
    pub fn new(catalog: ModelCatalog, outbox: Outbox) -> Self {
        let model = catalog.default_entry().id.clone();
        Self {
            id: Uuid::new_v4(),
            catalog,
            model,
            authenticated: false,
            source: None,
            result: None,
            failure: None,
            in_flight: None,
            epoch: 0,
            apply_status: None,
            outbox,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Tells the host this session is up. Returns `false` if the host is gone.
    pub fn announce(&self) -> bool {
        self.outbox.send(SessionMessage::Ready {
            session_id: self.id.to_string(),
        })
    }

    // ------------------------------------------------------------------
    // Read-only views
    // ------------------------------------------------------------------

    pub fn facts(&self) -> SessionFacts {
        SessionFacts {
            is_authenticated: self.authenticated,
            has_code: self.source.as_ref().is_some_and(SourcePayload::has_code),
            is_busy: self.in_flight.is_some(),
            has_result: self.result.is_some(),
            is_error: self.failure.is_some(),
        }
    }

    pub fn state(&self) -> ReviewUiState {
        derive_state(self.facts())
    }

    pub fn result(&self) -> Option<&SharedResult> {
        self.result.as_ref()
    }

    pub fn source(&self) -> Option<&SourcePayload> {
        self.source.as_ref()
    }

    pub fn catalog(&self) -> &ModelCatalog {
        &self.catalog
    }

    pub fn model(&self) -> &ModelEntry {
        // `model` is only ever assigned catalog ids.
        self.catalog
            .get(&self.model)
            .unwrap_or_else(|| self.catalog.default_entry())
    }

    pub fn error_message(&self) -> Option<&str> {
        self.failure.as_deref()
    }

    pub fn apply_status(&self) -> Option<&ApplyStatus> {
        self.apply_status.as_ref()
    }

    /// Token of the outstanding request, if any.
    pub fn in_flight(&self) -> Option<RequestToken> {
        self.in_flight
    }

    // ------------------------------------------------------------------
    // Operations
    // ------------------------------------------------------------------

    /// Stores a new payload, invalidating the previous result and error.
    ///
    /// An outstanding request keeps running but can no longer land.
    pub fn receive_source_payload(&mut self, payload: SourcePayload) {
        self.epoch += 1;
        info!(
            session = %self.id,
            file = %payload.file_path,
            language = %payload.language_id,
            bytes = payload.code.len(),
            "received source payload"
        );
        if let Some(token) = self.in_flight {
            debug!(session = %self.id, %token, "outstanding review superseded by new code");
        }
        self.source = Some(payload);
        self.result = None;
        self.failure = None;
        self.apply_status = None;
    }

    /// Selects a catalog model for future submissions.
    ///
    /// # Errors
    ///
    /// [`SessionError::InvalidModel`] if `id` is not in the catalog.
    pub fn set_model(&mut self, id: &str) -> Result<(), SessionError> {
        if !self.catalog.contains(id) {
            return Err(SessionError::InvalidModel(id.to_owned()));
        }
        if self.model != id {
            info!(session = %self.id, model = id, "review model changed");
            self.model = id.to_owned();
        }
        Ok(())
    }

    /// Moves the selection `step` entries through the catalog, wrapping around.
    pub fn cycle_model(&mut self, step: isize) -> &ModelEntry {
        let next = self.catalog.cycle(&self.model, step).id.clone();
        // `next` comes from the catalog, so this cannot fail.
        let _ = self.set_model(&next);
        self.model()
    }

    pub fn set_authenticated(&mut self, authenticated: bool) {
        if self.authenticated != authenticated {
            info!(session = %self.id, authenticated, "authentication changed");
        }
        self.authenticated = authenticated;
    }

    /// Starts a review of the current code with the current model.
    ///
    /// The returned request must be dispatched by the caller and its outcome fed
    /// back through [`ReviewSession::settle`].
    ///
    /// # Errors
    ///
    /// [`SessionError::NotReady`] when a request is already outstanding, when
    /// there is no code, or when unauthenticated, checked in that order. The
    /// session is left untouched.
    pub fn submit_review(&mut self) -> Result<ReviewRequest, SessionError> {
        if self.in_flight.is_some() {
            return Err(SessionError::NotReady(NotReadyReason::Busy));
        }
        let code = match self.source.as_ref().filter(|s| s.has_code()) {
            Some(source) => source.code.clone(),
            None => return Err(SessionError::NotReady(NotReadyReason::NoCode)),
        };
        if !self.authenticated {
            return Err(SessionError::NotReady(NotReadyReason::Unauthenticated));
        }

        self.epoch += 1;
        let token = RequestToken(self.epoch);
        self.in_flight = Some(token);
        self.failure = None;
        info!(session = %self.id, %token, model = %self.model, "review submitted");

        Ok(ReviewRequest {
            token,
            code,
            model_id: self.model.clone(),
        })
    }

    /// Lands the outcome of a dispatched request.
    pub fn settle(&mut self, token: RequestToken, outcome: Result<Value, ServiceError>) -> Settlement {
        if self.in_flight != Some(token) {
            debug!(session = %self.id, %token, "ignoring settlement for unknown request");
            return Settlement::Ignored;
        }
        self.in_flight = None;

        if token.0 != self.epoch {
            debug!(session = %self.id, %token, "discarding review for superseded code");
            return Settlement::Stale;
        }

        match outcome {
            Ok(raw) => {
                let result = normalize(&raw);
                info!(
                    session = %self.id,
                    %token,
                    overall = result.overall_score,
                    issues = result.issues.len(),
                    "review completed"
                );
                self.result = Some(Arc::new(result));
                self.failure = None;
                Settlement::Stored
            }
            Err(err) => {
                warn!(session = %self.id, %token, error = %err, "review failed");
                self.result = None;
                self.failure = Some(err.to_string());
                Settlement::Failed
            }
        }
    }

    /// Asks the host to write the improved code into the editor.
    ///
    /// Fire-and-forget: the host answers later with `APPLY_RESULT`. Scoring
    /// state is never touched.
    ///
    /// # Errors
    ///
    /// [`SessionError::NothingToApply`] when there is no non-blank improved
    /// code, [`SessionError::HostDisconnected`] when the host link is closed.
    pub fn request_apply(&mut self, scope: ApplyScope) -> Result<(), SessionError> {
        let text = self
            .result
            .as_ref()
            .and_then(|r| r.improved_code())
            .ok_or(SessionError::NothingToApply)?
            .to_owned();

        if !self.outbox.send(SessionMessage::ApplyText { scope, text }) {
            warn!(session = %self.id, "apply requested but host link is closed");
            return Err(SessionError::HostDisconnected);
        }
        info!(session = %self.id, ?scope, "apply requested");
        self.apply_status = Some(ApplyStatus::Pending(scope));
        Ok(())
    }

    /// Records the host's answer to the last apply request.
    ///
    /// A success with no apply pending (e.g. new code arrived in between) has
    /// no known scope and is dropped.
    pub fn record_apply_result(&mut self, success: bool, message: Option<String>) {
        let status = match (success, &self.apply_status) {
            (true, Some(ApplyStatus::Pending(scope))) => ApplyStatus::Applied(*scope),
            (true, _) => {
                debug!(session = %self.id, "ignoring apply success with nothing pending");
                return;
            }
            (false, _) => ApplyStatus::Rejected(message),
        };
        info!(session = %self.id, ?status, "host answered apply");
        self.apply_status = Some(status);
    }

    /// Routes one inbound host message. Unknown kinds are ignored.
    pub fn handle_host_message(&mut self, msg: HostMessage) {
        match msg {
            HostMessage::NewCode(payload) => self.receive_source_payload(payload),
            HostMessage::AuthChanged { authenticated } => self.set_authenticated(authenticated),
            HostMessage::ApplyResult { success, message } => {
                self.record_apply_result(success, message)
            }
            HostMessage::Unknown => {}
        }
    }
}
