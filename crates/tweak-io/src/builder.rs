use super::*;

/// Configures and starts a [`RewriterActor`] on its own thread.
///
/// Root precedence: `with_project_root` > `TWEAK_PROJECT_ROOT` > config file.
#[derive(Default, Debug)]
pub struct RewriterBuilder {
    config: RewriterConfig,
    project_root: Option<PathBuf>,
    specs: Vec<ParamSpec>,
}

impl RewriterBuilder {
    pub fn with_config(mut self, config: RewriterConfig) -> Self {
        self.config = config;
        self
    }

    /// Confine writes to this directory and resolve relative discovery paths against it.
    pub fn with_project_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.project_root = Some(root.into());
        self
    }

    pub fn with_params<I>(mut self, specs: I) -> Self
    where
        I: IntoIterator<Item = ParamSpec>,
    {
        self.specs.extend(specs);
        self
    }

    pub fn with_mailbox_capacity(mut self, capacity: usize) -> Self {
        self.config.mailbox_capacity = capacity;
        self
    }

    pub fn with_event_capacity(mut self, capacity: usize) -> Self {
        self.config.event_capacity = capacity;
        self
    }

    pub fn with_sync_parent_dir(mut self, sync: bool) -> Self {
        self.config.sync_parent_dir = sync;
        self
    }

    /// Validate the parameter set and spawn the actor.
    pub fn build(self) -> Result<RewriterHandle, BuildError> {
        let mut config = self.config.with_env_overrides();
        if let Some(root) = self.project_root {
            config.project_root = Some(root);
        }

        let rewriter = ParamRewriter::new(self.specs, config.project_root.clone())?
            .with_sync_parent_dir(config.sync_parent_dir);

        let (tx, rx) = mpsc::channel(config.mailbox_capacity.max(1));
        let (events_tx, _) = broadcast::channel(config.event_capacity.max(1));

        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| BuildError::Runtime(Arc::new(e)))?;

        let actor = RewriterActor::new(rx, rewriter, events_tx.clone());
        thread::Builder::new()
            .name("tweak-rewriter".into())
            .spawn(move || rt.block_on(actor.run()))
            .map_err(|e| BuildError::Runtime(Arc::new(e)))?;

        Ok(RewriterHandle {
            request_sender: tx,
            events_tx,
        })
    }
}
