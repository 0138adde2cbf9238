use super::*;

/// The `RewriterActor` owns the [`ParamRewriter`] and is the only code that
/// mutates it. It runs on a dedicated thread with its own current-thread Tokio
/// runtime and processes messages received from [`RewriterHandle`]s.
///
/// ## Ordering
///
/// Each request is handled to completion, including the file write and the
/// sibling column adjustment, before the next message is received. Requests
/// are therefore applied in arrival order, never interleaved, and there is at
/// most one write in flight for any file.
///
/// ## Notifications
///
/// Every finished apply or reset is published as a [`RewriteEvent`] on a
/// broadcast channel. Having no subscribers is fine.
pub struct RewriterActor {
    request_receiver: mpsc::Receiver<RewriterMessage>,
    rewriter: ParamRewriter,
    events_tx: broadcast::Sender<RewriteEvent>,
}

/// A message that can be sent to the RewriterActor.
#[derive(Debug)]
pub enum RewriterMessage {
    Request(RewriteRequest),
    Shutdown,
}

/// Requests that can be sent to the RewriterActor.
#[derive(Debug)]
pub enum RewriteRequest {
    ApplyChange {
        id: ParamId,
        value: f64,
        responder: oneshot::Sender<Result<AppliedChange, RewriteError>>,
    },
    ResetParam {
        id: ParamId,
        responder: oneshot::Sender<Result<f64, RewriteError>>,
    },
    ResetAll {
        responder: oneshot::Sender<BTreeMap<ParamId, Result<f64, RewriteError>>>,
    },
    CurrentValues {
        responder: oneshot::Sender<BTreeMap<ParamId, f64>>,
    },
    Status {
        id: ParamId,
        responder: oneshot::Sender<Option<ParamStatus>>,
    },
    Statuses {
        responder: oneshot::Sender<BTreeMap<ParamId, ParamStatus>>,
    },
}

impl RewriterActor {
    pub fn new(
        request_receiver: mpsc::Receiver<RewriterMessage>,
        rewriter: ParamRewriter,
        events_tx: broadcast::Sender<RewriteEvent>,
    ) -> Self {
        Self {
            request_receiver,
            rewriter,
            events_tx,
        }
    }

    /// Runs the actor's event loop until shutdown or until every handle is dropped.
    pub async fn run(mut self) {
        tracing::trace!("rewriter actor started");
        while let Some(message) = self.request_receiver.recv().await {
            match message {
                RewriterMessage::Request(request) => self.handle_request(request).await,
                RewriterMessage::Shutdown => break,
            }
        }
        tracing::trace!("rewriter actor stopped");
    }

    async fn handle_request(&mut self, request: RewriteRequest) {
        match request {
            RewriteRequest::ApplyChange {
                id,
                value,
                responder,
            } => {
                let result = self.rewriter.apply_change(&id, value).await;
                publish(&self.events_tx, &id, EventOrigin::Apply, &result);
                let _ = responder.send(result);
            }
            RewriteRequest::ResetParam { id, responder } => {
                let result = self.reset_one(&id).await;
                let _ = responder.send(result);
            }
            RewriteRequest::ResetAll { responder } => {
                let events_tx = &self.events_tx;
                let outcomes = self
                    .rewriter
                    .reset_all_with(|id, outcome| {
                        publish(events_tx, id, EventOrigin::Reset, outcome)
                    })
                    .await;
                let failed = outcomes.values().filter(|o| o.is_err()).count();
                tracing::debug!(total = outcomes.len(), failed, "reset all finished");
                let _ = responder.send(outcomes);
            }
            RewriteRequest::CurrentValues { responder } => {
                let _ = responder.send(self.rewriter.current_values());
            }
            RewriteRequest::Status { id, responder } => {
                let _ = responder.send(self.rewriter.status(&id));
            }
            RewriteRequest::Statuses { responder } => {
                let _ = responder.send(self.rewriter.statuses());
            }
        }
    }

    async fn reset_one(&mut self, id: &ParamId) -> Result<f64, RewriteError> {
        let original = self.rewriter.get(id).map(TrackedParameter::original_value);
        let result = self.rewriter.reset_change(id).await;
        publish(&self.events_tx, id, EventOrigin::Reset, &result);
        result.and_then(|_| original.ok_or_else(|| RewriteError::UnknownParam { id: id.clone() }))
    }

}

fn publish(
    events_tx: &broadcast::Sender<RewriteEvent>,
    id: &ParamId,
    origin: EventOrigin,
    outcome: &Result<AppliedChange, RewriteError>,
) {
    // No receivers is not an error.
    let _ = events_tx.send(RewriteEvent {
        id: id.clone(),
        origin,
        outcome: outcome.clone(),
    });
}
