use super::*;

/// What triggered a write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventOrigin {
    Apply,
    Reset,
}

/// Broadcast after every finished apply or reset, successful or not.
///
/// Subscribers typically forward these onto their UI thread.
#[derive(Debug, Clone)]
pub struct RewriteEvent {
    pub id: ParamId,
    pub origin: EventOrigin,
    pub outcome: Result<AppliedChange, RewriteError>,
}

impl RewriteEvent {
    pub fn is_ok(&self) -> bool {
        self.outcome.is_ok()
    }
}
