use super::*;

#[derive(Debug, Error, Clone)]
pub enum ChannelError {
    #[error("Failed to send request to the rewriter")]
    SendError,
    #[error("Failed to receive response from the rewriter")]
    RecvError,
}

/// Failure of a single rewrite. Scoped to one parameter; never fatal.
#[derive(Debug, Error, Clone)]
pub enum RewriteError {
    #[error(
        "Expected {expected:?} for {id} at {path}:{line}:{column} within {radius} columns, found {found:?}",
        radius = crate::locate::DRIFT_RADIUS
    )]
    VerificationFailed {
        id: ParamId,
        path: PathBuf,
        line: usize,
        column: usize,
        expected: String,
        found: String,
    },

    #[error("Could not read {path}: {reason}")]
    FileRead { path: PathBuf, reason: String },

    #[error("File operation {operation} failed for {path}: {source}")]
    Write {
        path: PathBuf,
        operation: &'static str,
        source: Arc<std::io::Error>,
    },

    #[error("Refusing to touch {path}: outside project root {root}")]
    OutsideProjectRoot { path: PathBuf, root: PathBuf },

    #[error("Unknown parameter: {id}")]
    UnknownParam { id: ParamId },

    #[error("Value {value} for {id} is not a finite number")]
    InvalidValue { id: ParamId, value: f64 },

    #[error("Rewriter channel error")]
    Channel(#[from] ChannelError),
}

impl RewriteError {
    /// Whether this failure leaves the parameter disabled.
    pub fn disables(&self) -> bool {
        matches!(
            self,
            RewriteError::VerificationFailed { .. }
                | RewriteError::FileRead { .. }
                | RewriteError::Write { .. }
                | RewriteError::OutsideProjectRoot { .. }
        )
    }

    /// The file changed underneath us (or vanished); the UI shows both the same way.
    pub fn is_external_change(&self) -> bool {
        matches!(
            self,
            RewriteError::VerificationFailed { .. } | RewriteError::FileRead { .. }
        )
    }

    pub(crate) fn write(operation: &'static str, path: &Path, e: std::io::Error) -> Self {
        RewriteError::Write {
            path: path.to_path_buf(),
            operation,
            source: Arc::new(e),
        }
    }
}

/// Errors raised while starting the rewriter.
#[derive(Debug, Error, Clone)]
pub enum BuildError {
    #[error(transparent)]
    Spec(#[from] SpecError),

    #[error("Failed to start rewriter runtime: {0}")]
    Runtime(Arc<std::io::Error>),
}

#[derive(Debug, Error, Clone)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        source: Arc<std::io::Error>,
    },

    #[error("Failed to parse config: {0}")]
    Parse(String),
}
