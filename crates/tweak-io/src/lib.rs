//! tweak-io: live numeric-parameter rewriter
//!
//! Given numeric literals discovered in source files (file, line, column,
//! original text, bounds), tweak-io writes new values back into exactly those
//! spots while a user drags sliders in a UI. It focuses on never corrupting a
//! file and on reporting precisely which write failed:
//!
//! - Locate: the literal is matched by text at its stored column, tolerating up
//!   to [`locate::DRIFT_RADIUS`] characters of drift either way.
//! - Format: new values are rendered in the literal's own style (decimals,
//!   unit suffix, `.5` vs `0.5`) via `tweak_core::ValueFormat`.
//! - Write: whole-file atomic temp-write + fsync + rename; other literals on
//!   the same line get their columns shifted by the length change.
//! - Repair: reset one or all parameters to their original values; failures
//!   disable the parameter until a later write succeeds.
//!
//! Key properties
//! - Every mutation is serialized through one actor ([`RewriterActor`]) on its
//!   own thread, so at most one write per file is in flight.
//! - Project-root containment is checked before any file access.
//! - Errors are typed ([`RewriteError`]) and scoped to one parameter.
//!
//! Quick start
//! ```rust,ignore
//! use tweak_core::ParamSpec;
//! use tweak_io::RewriterHandle;
//!
//! let handle = RewriterHandle::builder()
//!     .with_project_root("/home/me/site")
//!     .with_params([ParamSpec::new("gap", "css/main.css", 12, 10, "1.5rem", 0.0, 4.0)
//!         .with_step(0.25)])
//!     .build()?;
//!
//! # futures::executor::block_on(async {
//! let change = handle.apply_change("gap", 2.0).await?;
//! assert_eq!(change.text, "2.00rem");
//! handle.reset_param("gap").await?;
//! handle.shutdown().await;
//! # Ok::<_, tweak_io::RewriteError>(())
//! # });
//! ```
//!
//! Configuration
//! - [`RewriterConfig`] loads from TOML; `TWEAK_PROJECT_ROOT` overrides the root.
//! - [`tracing_setup::init_tracing`] installs a `RUST_LOG`-driven subscriber.
mod actor;
pub use actor::{RewriteRequest, RewriterActor, RewriterMessage};
mod builder;
pub use builder::RewriterBuilder;
pub mod config;
pub use config::RewriterConfig;
pub mod errors;
pub use errors::{BuildError, ChannelError, ConfigError, RewriteError};
pub mod events;
pub use events::{EventOrigin, RewriteEvent};
pub mod handle;
pub use handle::{BlockingRewriter, RewriterHandle};
pub mod locate;
mod path_policy;
mod read;
pub mod rewriter;
pub use rewriter::{AppliedChange, ParamRewriter, ParamState, ParamStatus, TrackedParameter};
pub mod tracing_setup;
mod write;

use futures::executor::block_on;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread;
use thiserror::Error;
use tokio::sync::{broadcast, mpsc, oneshot};
use tracing::Instrument;
use tweak_core::{
    validate_specs, Bounds, FormattedValue, LiteralStyle, ParamId, ParamSpec, SpecError,
    ValueFormat,
};
