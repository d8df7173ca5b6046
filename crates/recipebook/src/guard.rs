//! Interception of navigation away from a dirty form.
//!
//! The guard parks at most one leave action. The caller shows its own
//! confirmation and then either resumes the parked action or drops it.

use tracing::debug;

/// What the caller should do with a leave request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LeaveDecision<A> {
    /// Nothing to lose; run the action now.
    Proceed(A),
    /// The action was parked; ask the user whether to discard changes.
    Prompt,
    /// Another action is already parked; this one was dropped.
    AlreadyPending,
}

/// Holds a pending leave action while the user decides.
#[derive(Debug)]
pub struct LeaveGuard<A> {
    pending: Option<A>,
}

impl<A> Default for LeaveGuard<A> {
    fn default() -> Self {
        Self { pending: None }
    }
}

impl<A> LeaveGuard<A> {
    /// Create an empty guard.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask to leave with `action`.
    ///
    /// A clean request goes through at once and forgets any parked action.
    pub fn request_leave(&mut self, action: A, dirty: bool) -> LeaveDecision<A> {
        if !dirty {
            if self.pending.take().is_some() {
                debug!("Clean leave, dropping parked action");
            }
            return LeaveDecision::Proceed(action);
        }
        if self.pending.is_some() {
            debug!("Leave already pending, dropping new request");
            return LeaveDecision::AlreadyPending;
        }
        self.pending = Some(action);
        LeaveDecision::Prompt
    }

    /// The user chose to discard; hand back the parked action to run.
    pub fn confirm_discard(&mut self) -> Option<A> {
        self.pending.take()
    }

    /// The user chose to stay; forget the parked action.
    pub fn keep_editing(&mut self) {
        self.pending = None;
    }

    /// Whether an action is parked.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq, Eq)]
    enum Nav {
        Back,
        Home,
        Settings,
    }

    #[test]
    fn test_clean_form_proceeds() {
        let mut guard = LeaveGuard::new();
        assert_eq!(guard.request_leave(Nav::Back, false), LeaveDecision::Proceed(Nav::Back));
        assert!(!guard.is_pending());
    }

    #[test]
    fn test_dirty_form_prompts_then_resumes() {
        let mut guard = LeaveGuard::new();
        assert_eq!(guard.request_leave(Nav::Back, true), LeaveDecision::Prompt);
        assert!(guard.is_pending());

        assert_eq!(guard.confirm_discard(), Some(Nav::Back));
        assert!(!guard.is_pending());
        assert_eq!(guard.confirm_discard(), None);
    }

    #[test]
    fn test_keep_editing_drops_action() {
        let mut guard = LeaveGuard::new();
        guard.request_leave(Nav::Back, true);
        guard.keep_editing();

        assert!(!guard.is_pending());
        assert_eq!(guard.confirm_discard(), None);
    }

    #[test]
    fn test_second_request_does_not_replace_pending() {
        let mut guard = LeaveGuard::new();
        guard.request_leave(Nav::Back, true);
        assert_eq!(guard.request_leave(Nav::Home, true), LeaveDecision::AlreadyPending);

        assert_eq!(guard.confirm_discard(), Some(Nav::Back));
    }

    #[test]
    fn test_clean_request_while_pending_clears_parked_action() {
        let mut guard = LeaveGuard::new();
        guard.request_leave(Nav::Back, true);
        assert_eq!(
            guard.request_leave(Nav::Home, false),
            LeaveDecision::Proceed(Nav::Home)
        );
        assert!(!guard.is_pending());

        assert_eq!(guard.request_leave(Nav::Settings, true), LeaveDecision::Prompt);
        assert_eq!(guard.confirm_discard(), Some(Nav::Settings));
    }

    #[test]
    fn test_guard_follows_form_dirtiness() {
        let mut form = crate::form::RecipeForm::new("Dinner");
        let mut guard = LeaveGuard::new();
        assert_eq!(
            guard.request_leave(Nav::Back, form.is_dirty()),
            LeaveDecision::Proceed(Nav::Back)
        );

        form.set_name("Soup");
        assert_eq!(guard.request_leave(Nav::Back, form.is_dirty()), LeaveDecision::Prompt);
    }
}
