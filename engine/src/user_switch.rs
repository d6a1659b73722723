//! Detection of a user switch racing a going-away animation.
//!
//! A user switch can complete in the window between "animation requested" and
//! "animation started/cancelled" on the boundary side. Without this check the
//! unlock would finish, or the reveal would play, against the wrong user's
//! credential state.

use std::sync::Arc;

use veil_types::UserId;

use crate::collaborators::{
    ActiveUserProvider, CredentialPolicyProvider, DismissDecisionProvider, RedirectCollaborator,
};

pub(crate) const INSECURE_USER_SWITCH_REASON: &str =
    "user switch during going-away, new user is insecure";

/// What a checkpoint decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RedirectOutcome {
    /// Same user; the animation proceeds normally.
    None,
    /// Switched to a user with a secure credential. The redirect collaborator
    /// has been notified; the caller must finish the held handle immediately
    /// so no wrong-user content is revealed.
    SecureUser,
    /// Switched to a user without a secure credential. A fresh dismiss
    /// transition has been requested; it drives the handle to completion
    /// through the normal end path, so the caller must NOT force it.
    InsecureUser,
}

pub(crate) struct UserSwitchRaceGuard {
    users: Arc<dyn ActiveUserProvider>,
    credentials: Arc<dyn CredentialPolicyProvider>,
    redirects: Arc<dyn RedirectCollaborator>,
    dismiss: Arc<dyn DismissDecisionProvider>,
}

impl UserSwitchRaceGuard {
    pub(crate) fn new(
        users: Arc<dyn ActiveUserProvider>,
        credentials: Arc<dyn CredentialPolicyProvider>,
        redirects: Arc<dyn RedirectCollaborator>,
        dismiss: Arc<dyn DismissDecisionProvider>,
    ) -> Self {
        Self {
            users,
            credentials,
            redirects,
            dismiss,
        }
    }

    /// Compare the fresh active user against the animation-time snapshot and
    /// redirect if they differ. Runs once per checkpoint (boundary start and
    /// boundary cancel); must not be called with the state lock held.
    pub(crate) fn check(&self, requested_for: UserId) -> RedirectOutcome {
        let current = self.users.current_user_id();
        if current == requested_for {
            return RedirectOutcome::None;
        }

        if self.credentials.is_secure(current) {
            tracing::debug!(
                %current,
                %requested_for,
                "user switched to a secure user during going-away, re-securing"
            );
            self.redirects.on_switched_to_secure_user_during_going_away();
            RedirectOutcome::SecureUser
        } else {
            tracing::debug!(
                %current,
                %requested_for,
                "user switched to an insecure user during going-away, dismissing for them"
            );
            self.dismiss
                .start_dismiss_transition(INSECURE_USER_SWITCH_REASON, None);
            RedirectOutcome::InsecureUser
        }
    }
}

impl std::fmt::Debug for UserSwitchRaceGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserSwitchRaceGuard").finish_non_exhaustive()
    }
}
