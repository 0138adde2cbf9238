use super::*;

/// A handle to the RewriterActor.
/// Used by the UI layer to send requests; cheap to clone.
#[derive(Clone, Debug)]
pub struct RewriterHandle {
    /// Channel sender to send requests to the RewriterActor
    pub(crate) request_sender: mpsc::Sender<RewriterMessage>,
    pub(crate) events_tx: broadcast::Sender<RewriteEvent>,
}

impl RewriterHandle {
    /// Create a builder to configure the rewriter before starting it.
    pub fn builder() -> RewriterBuilder {
        RewriterBuilder::default()
    }

    async fn request<T>(
        &self,
        make: impl FnOnce(oneshot::Sender<T>) -> RewriteRequest,
    ) -> Result<T, ChannelError> {
        let (responder, response_rx) = oneshot::channel();
        self.request_sender
            .send(RewriterMessage::Request(make(responder)))
            .await
            .map_err(|_| ChannelError::SendError)?;
        response_rx.await.map_err(|_| ChannelError::RecvError)
    }

    /// Write a new value for one parameter.
    pub async fn apply_change(
        &self,
        id: impl Into<ParamId>,
        value: f64,
    ) -> Result<AppliedChange, RewriteError> {
        let id = id.into();
        let span = tracing::trace_span!("apply_change", %id, value);
        self.request(|responder| RewriteRequest::ApplyChange {
            id,
            value,
            responder,
        })
        .instrument(span)
        .await?
    }

    /// Restore one parameter's original value; returns that value.
    pub async fn reset_param(&self, id: impl Into<ParamId>) -> Result<f64, RewriteError> {
        let id = id.into();
        self.request(|responder| RewriteRequest::ResetParam { id, responder })
            .await?
    }

    /// Reset every parameter independently. Channel errors are reported for
    /// the whole batch; per-parameter failures are in the map.
    pub async fn reset_all(
        &self,
    ) -> Result<BTreeMap<ParamId, Result<f64, RewriteError>>, ChannelError> {
        self.request(|responder| RewriteRequest::ResetAll { responder })
            .await
    }

    pub async fn current_values(&self) -> Result<BTreeMap<ParamId, f64>, ChannelError> {
        self.request(|responder| RewriteRequest::CurrentValues { responder })
            .await
    }

    pub async fn status(
        &self,
        id: impl Into<ParamId>,
    ) -> Result<Option<ParamStatus>, ChannelError> {
        let id = id.into();
        self.request(|responder| RewriteRequest::Status { id, responder })
            .await
    }

    pub async fn statuses(&self) -> Result<BTreeMap<ParamId, ParamStatus>, ChannelError> {
        self.request(|responder| RewriteRequest::Statuses { responder })
            .await
    }

    /// Subscribe to completion events of every apply and reset.
    pub fn subscribe(&self) -> broadcast::Receiver<RewriteEvent> {
        self.events_tx.subscribe()
    }

    /// Blocking façade for callers without an async runtime.
    pub fn blocking(&self) -> BlockingRewriter {
        BlockingRewriter {
            handle: self.clone(),
        }
    }

    /// Stop the actor once the request in flight completes.
    pub async fn shutdown(&self) {
        let _ = self.request_sender.send(RewriterMessage::Shutdown).await;
    }
}

/// Synchronous wrapper around [`RewriterHandle`] for UI threads that do not run
/// an async executor. Must not be used from inside an async task.
#[derive(Clone, Debug)]
pub struct BlockingRewriter {
    handle: RewriterHandle,
}

impl BlockingRewriter {
    pub fn apply_change(
        &self,
        id: impl Into<ParamId>,
        value: f64,
    ) -> Result<AppliedChange, RewriteError> {
        block_on(self.handle.apply_change(id, value))
    }

    pub fn reset_param(&self, id: impl Into<ParamId>) -> Result<f64, RewriteError> {
        block_on(self.handle.reset_param(id))
    }

    pub fn reset_all(&self) -> Result<BTreeMap<ParamId, Result<f64, RewriteError>>, ChannelError> {
        block_on(self.handle.reset_all())
    }

    pub fn current_values(&self) -> Result<BTreeMap<ParamId, f64>, ChannelError> {
        block_on(self.handle.current_values())
    }

    pub fn statuses(&self) -> Result<BTreeMap<ParamId, ParamStatus>, ChannelError> {
        block_on(self.handle.statuses())
    }

    pub fn shutdown(&self) {
        block_on(self.handle.shutdown())
    }
}
