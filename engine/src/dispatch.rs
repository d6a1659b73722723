//! Serialized dispatch of visibility changes to the compositor boundary.
//!
//! Every boundary call is enqueued on the serial executor, so calls execute
//! in FIFO order on one background thread no matter which thread decided
//! them. The boundary's own semantics are stateful; reordering a "show"
//! before a prior "hide" would corrupt its view of the world.

use std::sync::Arc;

use veil_config::TransitionProtocolMode;

use crate::boundary::{BoundaryError, CompositorBoundary};
use crate::executor::TaskExecutor;

/// How visibility intent maps onto boundary primitives.
///
/// Chosen once at construction; the two protocols are mutually exclusive for
/// the process lifetime.
trait TransitionProtocol: Send + Sync {
    fn name(&self) -> &'static str;

    fn forward_visibility(
        &self,
        boundary: &dyn CompositorBoundary,
        shown: bool,
        ambient: bool,
    ) -> Result<(), BoundaryError>;

    fn forward_going_away(
        &self,
        boundary: &dyn CompositorBoundary,
        ambient: bool,
    ) -> Result<(), BoundaryError>;
}

/// `set_lock_surface_shown` plus a dedicated going-away request.
struct LegacyProtocol;

impl TransitionProtocol for LegacyProtocol {
    fn name(&self) -> &'static str {
        "legacy"
    }

    fn forward_visibility(
        &self,
        boundary: &dyn CompositorBoundary,
        shown: bool,
        ambient: bool,
    ) -> Result<(), BoundaryError> {
        boundary.set_lock_surface_shown(shown, ambient)
    }

    fn forward_going_away(
        &self,
        boundary: &dyn CompositorBoundary,
        _ambient: bool,
    ) -> Result<(), BoundaryError> {
        boundary.request_going_away()
    }
}

/// Everything is a `start_transition` call; going-away folds into a
/// transition to hidden.
struct ShellTransitionProtocol;

impl TransitionProtocol for ShellTransitionProtocol {
    fn name(&self) -> &'static str {
        "shell"
    }

    fn forward_visibility(
        &self,
        boundary: &dyn CompositorBoundary,
        shown: bool,
        ambient: bool,
    ) -> Result<(), BoundaryError> {
        boundary.start_transition(shown, ambient)
    }

    fn forward_going_away(
        &self,
        boundary: &dyn CompositorBoundary,
        ambient: bool,
    ) -> Result<(), BoundaryError> {
        boundary.start_transition(false, ambient)
    }
}

pub(crate) struct BoundaryDispatcher {
    boundary: Arc<dyn CompositorBoundary>,
    protocol: Arc<dyn TransitionProtocol>,
    executor: Arc<dyn TaskExecutor>,
}

impl BoundaryDispatcher {
    pub(crate) fn new(
        boundary: Arc<dyn CompositorBoundary>,
        executor: Arc<dyn TaskExecutor>,
        mode: TransitionProtocolMode,
    ) -> Self {
        let protocol: Arc<dyn TransitionProtocol> = match mode {
            TransitionProtocolMode::Legacy => Arc::new(LegacyProtocol),
            TransitionProtocolMode::Shell => Arc::new(ShellTransitionProtocol),
        };
        Self {
            boundary,
            protocol,
            executor,
        }
    }

    /// Enqueue a lock-surface visibility change. Never blocks.
    pub(crate) fn dispatch_visibility(&self, shown: bool, ambient: bool) {
        tracing::debug!(
            shown,
            ambient,
            protocol = self.protocol.name(),
            "enqueueing lock surface visibility change"
        );
        let boundary = Arc::clone(&self.boundary);
        let protocol = Arc::clone(&self.protocol);
        self.executor.execute(Box::new(move || {
            if let Err(err) = protocol.forward_visibility(boundary.as_ref(), shown, ambient) {
                // Local state is not rolled back: the boundary is assumed
                // eventually consistent for visibility.
                tracing::warn!(%err, "boundary visibility call failed");
            }
        }));
    }

    /// Enqueue the going-away request. Never blocks.
    pub(crate) fn dispatch_going_away(&self, ambient: bool) {
        tracing::debug!(
            ambient,
            protocol = self.protocol.name(),
            "enqueueing going-away request"
        );
        let boundary = Arc::clone(&self.boundary);
        let protocol = Arc::clone(&self.protocol);
        self.executor.execute(Box::new(move || {
            if let Err(err) = protocol.forward_going_away(boundary.as_ref(), ambient) {
                tracing::warn!(%err, "boundary going-away call failed");
            }
        }));
    }
}

impl std::fmt::Debug for BoundaryDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoundaryDispatcher")
            .field("protocol", &self.protocol.name())
            .finish_non_exhaustive()
    }
}
