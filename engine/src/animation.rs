//! Lifecycle of the in-flight going-away animation.
//!
//! At most one animation exists at a time. The controller is a pure state
//! machine: it mutates lifecycle state and hands effects (the finish handle
//! to invoke, whether the start was solicited) back to the coordinator, which
//! executes them outside the state lock.

use veil_types::UserId;

/// Move-only token for the boundary's finish acknowledgement.
///
/// The boundary expects this invoked exactly once to release the animation.
/// Invoking consumes the handle, so a second invocation cannot be expressed.
pub struct FinishHandle {
    notify: Box<dyn FnOnce() + Send>,
}

impl FinishHandle {
    pub fn new(notify: impl FnOnce() + Send + 'static) -> Self {
        Self {
            notify: Box::new(notify),
        }
    }

    /// Tell the boundary the animation is done, consuming the handle.
    pub fn finish(self) {
        (self.notify)();
    }
}

impl std::fmt::Debug for FinishHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FinishHandle").finish_non_exhaustive()
    }
}

/// Identity token for one animation instance.
///
/// Deferred continuations capture the generation they were registered under;
/// completions for a generation the controller has moved past are no-ops.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Generation(u64);

/// The animation the controller currently owns while `Running`.
#[derive(Debug)]
struct GoingAwayAnimation {
    finish: Option<FinishHandle>,
    /// Active user at the time the going-away was requested. Compared against
    /// the fresh user id at the start/cancel checkpoints.
    requested_for: UserId,
    generation: Generation,
}

#[derive(Debug)]
enum Lifecycle {
    Idle,
    /// We asked the boundary to start going away; its callback hasn't arrived.
    Requested { requested_for: UserId },
    Running(GoingAwayAnimation),
}

/// What `begin_running` found and produced.
pub(crate) struct BeginOutcome {
    pub(crate) generation: Generation,
    /// False when the boundary started the animation unsolicited.
    pub(crate) was_requested: bool,
    pub(crate) requested_for: UserId,
    /// Handle of a previous animation that was still running; the caller must
    /// finish it (a start-while-running is a boundary protocol violation, but
    /// the old handle still has to be released exactly once).
    pub(crate) displaced: Option<FinishHandle>,
}

#[derive(Debug)]
pub(crate) struct GoingAwayAnimationController {
    lifecycle: Lifecycle,
    next_generation: u64,
}

impl GoingAwayAnimationController {
    pub(crate) fn new() -> Self {
        Self {
            lifecycle: Lifecycle::Idle,
            next_generation: 0,
        }
    }

    pub(crate) fn is_active(&self) -> bool {
        !matches!(self.lifecycle, Lifecycle::Idle)
    }

    /// Snapshot of the user the active request/animation was made for.
    pub(crate) fn requested_for(&self) -> Option<UserId> {
        match &self.lifecycle {
            Lifecycle::Idle => None,
            Lifecycle::Requested { requested_for } => Some(*requested_for),
            Lifecycle::Running(animation) => Some(animation.requested_for),
        }
    }

    pub(crate) fn current_generation(&self) -> Option<Generation> {
        match &self.lifecycle {
            Lifecycle::Running(animation) => Some(animation.generation),
            _ => None,
        }
    }

    /// `Idle -> Requested`. Returns false (and changes nothing) when a
    /// request or animation is already in flight.
    pub(crate) fn request(&mut self, requested_for: UserId) -> bool {
        if self.is_active() {
            tracing::debug!("going-away already in flight, ignoring request");
            return false;
        }
        self.lifecycle = Lifecycle::Requested { requested_for };
        true
    }

    /// `Requested/Idle -> Running`: the boundary's start callback arrived
    /// with a finish handle.
    ///
    /// An existing `Requested` snapshot is kept; an unsolicited start (from
    /// `Idle`) snapshots `fallback_user` instead.
    pub(crate) fn begin_running(
        &mut self,
        finish: FinishHandle,
        fallback_user: UserId,
    ) -> BeginOutcome {
        let (was_requested, requested_for, displaced) =
            match std::mem::replace(&mut self.lifecycle, Lifecycle::Idle) {
                Lifecycle::Idle => (false, fallback_user, None),
                Lifecycle::Requested { requested_for } => (true, requested_for, None),
                Lifecycle::Running(mut previous) => {
                    tracing::warn!(
                        "start callback while an animation is already running, displacing it"
                    );
                    (true, fallback_user, previous.finish.take())
                }
            };

        self.next_generation += 1;
        let generation = Generation(self.next_generation);
        self.lifecycle = Lifecycle::Running(GoingAwayAnimation {
            finish: Some(finish),
            requested_for,
            generation,
        });

        BeginOutcome {
            generation,
            was_requested,
            requested_for,
            displaced,
        }
    }

    /// Any state -> `Idle`. Returns the held finish handle, if one existed.
    ///
    /// Ending from `Requested` (callback never arrived) or `Idle` yields no
    /// handle; both are legal.
    pub(crate) fn end(&mut self) -> Option<FinishHandle> {
        match std::mem::replace(&mut self.lifecycle, Lifecycle::Idle) {
            Lifecycle::Idle | Lifecycle::Requested { .. } => None,
            Lifecycle::Running(mut animation) => animation.finish.take(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    fn counting_handle(counter: &Arc<AtomicUsize>) -> FinishHandle {
        let counter = Arc::clone(counter);
        FinishHandle::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        })
    }

    #[test]
    fn request_then_begin_keeps_snapshot() {
        let mut controller = GoingAwayAnimationController::new();
        assert!(controller.request(UserId::new(10)));

        let counter = Arc::new(AtomicUsize::new(0));
        let outcome = controller.begin_running(counting_handle(&counter), UserId::new(11));
        assert!(outcome.was_requested);
        assert_eq!(outcome.requested_for, UserId::new(10));
        assert!(outcome.displaced.is_none());
    }

    #[test]
    fn unsolicited_begin_uses_fallback_user() {
        let mut controller = GoingAwayAnimationController::new();
        let counter = Arc::new(AtomicUsize::new(0));
        let outcome = controller.begin_running(counting_handle(&counter), UserId::new(11));
        assert!(!outcome.was_requested);
        assert_eq!(outcome.requested_for, UserId::new(11));
    }

    #[test]
    fn second_request_is_rejected() {
        let mut controller = GoingAwayAnimationController::new();
        assert!(controller.request(UserId::new(0)));
        assert!(!controller.request(UserId::new(0)));
    }

    #[test]
    fn end_yields_handle_exactly_once() {
        let mut controller = GoingAwayAnimationController::new();
        let counter = Arc::new(AtomicUsize::new(0));
        controller.begin_running(counting_handle(&counter), UserId::new(0));

        let handle = controller.end().expect("handle held while running");
        handle.finish();
        assert_eq!(counter.load(Ordering::SeqCst), 1);

        // Already idle: nothing left to finish.
        assert!(controller.end().is_none());
        assert!(!controller.is_active());
    }

    #[test]
    fn end_from_requested_has_no_handle() {
        let mut controller = GoingAwayAnimationController::new();
        controller.request(UserId::new(0));
        assert!(controller.end().is_none());
        assert!(!controller.is_active());
    }

    #[test]
    fn displaced_handle_is_surfaced() {
        let mut controller = GoingAwayAnimationController::new();
        let first = Arc::new(AtomicUsize::new(0));
        let second = Arc::new(AtomicUsize::new(0));

        let first_outcome = controller.begin_running(counting_handle(&first), UserId::new(0));
        let second_outcome = controller.begin_running(counting_handle(&second), UserId::new(0));

        second_outcome.displaced.expect("first handle displaced").finish();
        assert_eq!(first.load(Ordering::SeqCst), 1);
        assert_ne!(first_outcome.generation, second_outcome.generation);
        assert_eq!(
            controller.current_generation(),
            Some(second_outcome.generation)
        );
    }
}
