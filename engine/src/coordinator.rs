//! The public facade coordinating visibility state and the going-away
//! animation.
//!
//! One mutex guards the visibility store and the animation controller; every
//! entry point locks, drives the pure state machines, collects effects, then
//! releases the lock before executing them. No collaborator is ever called
//! with the lock held, so a collaborator that calls straight back into the
//! coordinator (the already-dismissed continuation often fires synchronously)
//! cannot deadlock.

use std::sync::{Arc, Mutex, MutexGuard};

use veil_config::{TransitionProtocolMode, VeilConfig};
use veil_types::{AnimationTargetDescriptor, LockSurfaceVisibility, TargetKind};

use crate::animation::{FinishHandle, Generation, GoingAwayAnimationController};
use crate::boundary::CompositorBoundary;
use crate::collaborators::{
    ActiveUserProvider, CredentialPolicyProvider, DismissDecisionProvider, GoingAwayObserver,
    RedirectCollaborator, RenderingTargetApplier,
};
use crate::dispatch::BoundaryDispatcher;
use crate::executor::{SerialExecutor, TaskExecutor};
use crate::user_switch::{RedirectOutcome, UserSwitchRaceGuard};
use crate::visibility::VisibilityStateStore;

pub(crate) const GOING_AWAY_STARTED_REASON: &str = "going-away remote animation started";

const DEFAULT_WORKER_THREAD: &str = "veil-boundary";

/// Everything the coordinator consumes from the rest of the system.
pub struct Collaborators {
    pub boundary: Arc<dyn CompositorBoundary>,
    pub dismiss: Arc<dyn DismissDecisionProvider>,
    pub applier: Arc<dyn RenderingTargetApplier>,
    pub users: Arc<dyn ActiveUserProvider>,
    pub credentials: Arc<dyn CredentialPolicyProvider>,
    pub redirects: Arc<dyn RedirectCollaborator>,
    pub observer: Arc<dyn GoingAwayObserver>,
}

/// The state pair protected by the single mutex.
#[derive(Debug)]
struct CoreState {
    visibility: VisibilityStateStore,
    animation: GoingAwayAnimationController,
}

struct Inner {
    state: Mutex<CoreState>,
    dispatcher: BoundaryDispatcher,
    guard: UserSwitchRaceGuard,
    dismiss: Arc<dyn DismissDecisionProvider>,
    applier: Arc<dyn RenderingTargetApplier>,
    users: Arc<dyn ActiveUserProvider>,
    observer: Arc<dyn GoingAwayObserver>,
}

/// Coordinates lock-surface and ambient visibility against the compositor
/// boundary and tracks the going-away reveal animation to completion,
/// cancellation, or preemption by a user switch.
pub struct TransitionCoordinator {
    inner: Arc<Inner>,
}

impl TransitionCoordinator {
    pub fn new(
        protocol: TransitionProtocolMode,
        collaborators: Collaborators,
        executor: Arc<dyn TaskExecutor>,
    ) -> Self {
        let Collaborators {
            boundary,
            dismiss,
            applier,
            users,
            credentials,
            redirects,
            observer,
        } = collaborators;

        let guard = UserSwitchRaceGuard::new(
            Arc::clone(&users),
            credentials,
            redirects,
            Arc::clone(&dismiss),
        );

        Self {
            inner: Arc::new(Inner {
                state: Mutex::new(CoreState {
                    visibility: VisibilityStateStore::new(),
                    animation: GoingAwayAnimationController::new(),
                }),
                dispatcher: BoundaryDispatcher::new(boundary, executor, protocol),
                guard,
                dismiss,
                applier,
                users,
                observer,
            }),
        }
    }

    /// Construct with a [`SerialExecutor`] and the configured protocol.
    pub fn from_config(
        config: &VeilConfig,
        collaborators: Collaborators,
    ) -> std::io::Result<Self> {
        let thread_name = config
            .transitions
            .as_ref()
            .and_then(|t| t.worker_thread_name.as_deref())
            .unwrap_or(DEFAULT_WORKER_THREAD);
        let executor = Arc::new(SerialExecutor::new(thread_name)?);
        Ok(Self::new(config.protocol(), collaborators, executor))
    }

    /// Set the visibility of the surface behind the lock surface.
    ///
    /// Making it visible while the lock surface is shown starts the
    /// going-away flow; making it invisible re-asserts the lock surface,
    /// which cancels any running animation boundary-side.
    pub fn set_surface_behind_visibility(&self, visible: bool) {
        // Fresh read, outside the lock: collaborators may re-enter.
        let current_user = self.inner.users.current_user_id();

        enum Action {
            None,
            StartGoingAway { ambient: bool },
            ReShowLockSurface,
        }

        let action = {
            let mut state = self.inner.lock_state();
            if visible && state.visibility.going_away() {
                tracing::debug!("surface behind already becoming visible, ignoring");
                Action::None
            } else if visible && !state.visibility.lock_surface().is_shown() {
                tracing::debug!(
                    "lock surface is not showing, surface behind is already visible, ignoring"
                );
                Action::None
            } else if visible {
                state.animation.request(current_user);
                state.visibility.set_going_away(true);
                Action::StartGoingAway {
                    ambient: state.visibility.ambient_visible(),
                }
            } else if state.visibility.lock_surface().is_shown() {
                // Hiding the surface behind while the lock surface is showing:
                // re-asserting shown state makes the boundary cancel the
                // going-away animation and call us back.
                Action::ReShowLockSurface
            } else {
                Action::None
            }
        };

        match action {
            Action::None => {}
            Action::StartGoingAway { ambient } => {
                self.inner.observer.on_going_away_changed(true);
                self.inner.dispatcher.dispatch_going_away(ambient);
            }
            Action::ReShowLockSurface => {
                tracing::debug!(
                    "re-asserting lock surface shown to hide the surface behind it"
                );
                self.set_lockscreen_shown(true);
            }
        }
    }

    /// Set the visibility of the ambient (always-on) display.
    pub fn set_aod_visible(&self, visible: bool) {
        let forward = {
            let mut state = self.inner.lock_state();
            state.visibility.set_ambient_visible(visible)
        };
        if let Some(forward) = forward {
            self.inner
                .dispatcher
                .dispatch_visibility(forward.shown, forward.ambient);
        }
    }

    /// Set the visibility of the lock surface.
    pub fn set_lockscreen_shown(&self, shown: bool) {
        let forward = {
            let mut state = self.inner.lock_state();
            state.visibility.set_lock_surface_shown(shown)
        };
        if let Some(forward) = forward {
            self.inner
                .dispatcher
                .dispatch_visibility(forward.shown, forward.ambient);
        }
    }

    /// The boundary's going-away animation started, with zero or more reveal
    /// targets and the handle we must invoke exactly once when done.
    ///
    /// Triggered either because we requested the going-away, or unsolicited
    /// (another component dismissed the lock surface directly).
    pub fn on_going_away_animation_start(
        &self,
        targets: Vec<AnimationTargetDescriptor>,
        finish: FinishHandle,
    ) {
        self.inner.on_animation_start(targets, finish);
    }

    /// The boundary cancelled the going-away animation (timeout, re-show, or
    /// any other compositor-side reason).
    pub fn on_going_away_animation_cancelled(&self) {
        self.inner.on_animation_cancelled();
    }

    /// Declare whether the going-away animation target is still in use.
    ///
    /// Some reveal animations outlive the transition itself; the caller keeps
    /// this true until it is genuinely done with the target. Passing false
    /// ends the animation and releases the target.
    pub fn set_using_going_away_remote_animation(&self, using: bool) {
        if using {
            tracing::debug!("going-away animation target still in use");
            return;
        }
        self.inner.end_animation(None);
    }

    /// Whether a going-away reveal is currently considered active.
    #[must_use]
    pub fn is_animating_reveal_effect(&self) -> bool {
        self.inner.lock_state().visibility.going_away()
    }

    #[must_use]
    pub fn lock_surface_visibility(&self) -> LockSurfaceVisibility {
        self.inner.lock_state().visibility.lock_surface()
    }

    #[must_use]
    pub fn ambient_visible(&self) -> bool {
        self.inner.lock_state().visibility.ambient_visible()
    }
}

impl std::fmt::Debug for TransitionCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransitionCoordinator").finish_non_exhaustive()
    }
}

impl Inner {
    fn lock_state(&self) -> MutexGuard<'_, CoreState> {
        self.state.lock().expect("visibility state lock poisoned")
    }

    fn on_animation_start(
        self: &Arc<Self>,
        targets: Vec<AnimationTargetDescriptor>,
        finish: FinishHandle,
    ) {
        let current_user = self.users.current_user_id();

        let (generation, was_requested, requested_for, displaced, flipped_on) = {
            let mut state = self.lock_state();
            let begin = state.animation.begin_running(finish, current_user);
            let flipped_on = !state.visibility.going_away();
            state.visibility.set_going_away(true);
            (
                begin.generation,
                begin.was_requested,
                begin.requested_for,
                begin.displaced,
                flipped_on,
            )
        };

        if let Some(stale) = displaced {
            stale.finish();
        }
        if flipped_on {
            self.observer.on_going_away_changed(true);
        }

        // Checkpoint: a user switch between request and start invalidates the
        // animation before any of the new user's state is consulted.
        match self.guard.check(requested_for) {
            RedirectOutcome::SecureUser => {
                // Never reveal content for the wrong credential state.
                self.end_animation(None);
                return;
            }
            RedirectOutcome::InsecureUser => {
                // The freshly requested dismiss transition drives the normal
                // end path; hold the handle and apply nothing.
                return;
            }
            RedirectOutcome::None => {}
        }

        if !was_requested {
            // Unsolicited start: something else dismissed the lock surface.
            // Ask whether a dismiss transition can still begin; if the surface
            // is already fully dismissed the continuation ends the animation
            // (for this generation only - it may fire arbitrarily late).
            let inner = Arc::clone(self);
            self.dismiss.start_dismiss_transition(
                GOING_AWAY_STARTED_REASON,
                Some(Box::new(move || {
                    tracing::debug!(
                        "dismiss transition reports already dismissed, ending remote animation"
                    );
                    inner.end_animation(Some(generation));
                })),
            );
        }

        match targets.into_iter().find(|t| t.kind() == TargetKind::App) {
            Some(target) => {
                // The continuation above may have ended us synchronously;
                // only apply to an animation that is still current.
                let still_current =
                    self.lock_state().animation.current_generation() == Some(generation);
                if still_current {
                    self.applier.apply_parameters(&target);
                } else {
                    tracing::debug!("animation ended before target application, skipping");
                }
            }
            None => {
                // Nothing to animate; completion must still be signaled.
                tracing::debug!("going-away animation started with no app targets, finishing");
                self.end_animation(Some(generation));
            }
        }
    }

    fn on_animation_cancelled(&self) {
        let snapshot = self.lock_state().animation.requested_for();
        let Some(requested_for) = snapshot else {
            tracing::debug!("cancel callback for an animation no longer tracked, ignoring");
            return;
        };

        self.end_animation(None);

        // Checkpoint: the cancel may be the first sign of a user switch.
        let _ = self.guard.check(requested_for);
    }

    /// Terminal transition to `Idle`, shared by every path that ends the
    /// animation. Idempotent; with `only_if` set it only acts on that exact
    /// animation generation.
    fn end_animation(&self, only_if: Option<Generation>) {
        let (handle, flipped_off) = {
            let mut state = self.lock_state();
            if !state.animation.is_active() && !state.visibility.going_away() {
                tracing::debug!("no going-away animation tracked, short-circuiting end");
                return;
            }
            if let Some(expected) = only_if {
                if state.animation.current_generation() != Some(expected) {
                    tracing::debug!("completion for a superseded animation generation, ignoring");
                    return;
                }
            }
            let handle = state.animation.end();
            let flipped_off = state.visibility.going_away();
            state.visibility.set_going_away(false);
            (handle, flipped_off)
        };

        if let Some(handle) = handle {
            tracing::debug!("finishing going-away remote animation");
            handle.finish();
        }
        self.applier.notify_released();
        if flipped_off {
            self.observer.on_going_away_changed(false);
        }
    }
}
