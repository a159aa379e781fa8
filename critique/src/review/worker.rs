//! Background task that talks to the review service.
//!
//! The event loop never awaits the service. It sends each [`ReviewRequest`] to
//! this task and carries on; the outcome comes back later as
//! `AppEvent::ReviewSettled`, tagged with the request token so the session can
//! tell whether it is still relevant.

use std::sync::Arc;

use critique_core::service::ReviewService;
use critique_core::types::ReviewRequest;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};
use tracing::debug;

use crate::event::AppEvent;

/// Spawns the review worker. It runs until `rx` is closed.
pub fn spawn_review_worker(
    service: Arc<dyn ReviewService>,
    rx: UnboundedReceiver<ReviewRequest>,
    event_tx: UnboundedSender<AppEvent>,
) {
    tokio::spawn(review_worker_loop(service, rx, event_tx));
}

/// Handles requests one at a time, in the order they were submitted.
///
/// The session only ever has one request outstanding, so there is nothing to
/// gain from running them concurrently.
pub async fn review_worker_loop(
    service: Arc<dyn ReviewService>,
    mut rx: UnboundedReceiver<ReviewRequest>,
    event_tx: UnboundedSender<AppEvent>,
) {
    while let Some(request) = rx.recv().await {
        debug!(token = %request.token, model = %request.model_id, "dispatching review");
        let outcome = service
            .submit_for_review(&request.code, &request.model_id)
            .await;
        if event_tx
            .send(AppEvent::ReviewSettled { token: request.token, outcome })
            .is_err()
        {
            break;
        }
    }
}
