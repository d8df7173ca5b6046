//! Image acquisition.
//!
//! Camera and photo-library access sit behind two collaborators: a
//! [`PermissionCheck`] that reports and requests access, and an
//! [`ImagePicker`] that yields a URI. The recipe only ever stores that URI
//! string; image bytes are never read here.

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Access state reported by the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PermissionState {
    /// Full access.
    Granted,
    /// Access to a user-chosen subset of the library.
    Limited,
    /// Not granted yet; asking may still succeed.
    Denied,
    /// Refused permanently; only the system settings can change it.
    Blocked,
    /// The device has no such capability.
    Unavailable,
}

impl PermissionState {
    /// Whether the picker may be opened.
    #[must_use]
    pub fn allows_access(self) -> bool {
        matches!(self, Self::Granted | Self::Limited)
    }

    /// Whether a request prompt could still change the state.
    #[must_use]
    pub fn is_requestable(self) -> bool {
        self == Self::Denied
    }

    /// Whether the user has to go to the system settings.
    #[must_use]
    pub fn needs_settings(self) -> bool {
        self == Self::Blocked
    }
}

/// Where a picture comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaSource {
    /// Take a new photo.
    Camera,
    /// Choose from the photo library.
    Library,
}

impl fmt::Display for MediaSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Camera => write!(f, "camera"),
            Self::Library => write!(f, "photo library"),
        }
    }
}

/// Platform permission surface.
#[async_trait]
pub trait PermissionCheck: Send + Sync {
    /// Current state without prompting.
    async fn check(&self, source: MediaSource) -> PermissionState;

    /// Prompt the user and return the resulting state.
    async fn request(&self, source: MediaSource) -> PermissionState;
}

/// Platform camera or gallery surface.
#[async_trait]
pub trait ImagePicker: Send + Sync {
    /// Open the picker. `None` if the user cancelled.
    async fn pick(&self, source: MediaSource) -> Option<String>;
}

/// Result of trying to attach a picture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AcquireOutcome {
    /// The user picked a picture at this URI.
    Picked(String),
    /// The picker was closed without a choice.
    Cancelled,
    /// Access was refused; the picker was never opened.
    PermissionDenied {
        /// The final state after any request.
        state: PermissionState,
    },
}

impl AcquireOutcome {
    /// The picked URI, if any.
    #[must_use]
    pub fn uri(&self) -> Option<&str> {
        match self {
            Self::Picked(uri) => Some(uri),
            _ => None,
        }
    }
}

/// Make sure access is granted, asking once if it is not.
pub async fn ensure_access(
    permissions: &dyn PermissionCheck,
    source: MediaSource,
) -> PermissionState {
    let state = permissions.check(source).await;
    if state.allows_access() || !state.is_requestable() {
        return state;
    }
    debug!("Requesting {} access", source);
    permissions.request(source).await
}

/// Check access, request it if needed, and only then open the picker.
pub async fn acquire_image(
    permissions: &dyn PermissionCheck,
    picker: &dyn ImagePicker,
    source: MediaSource,
) -> AcquireOutcome {
    let state = ensure_access(permissions, source).await;
    if !state.allows_access() {
        warn!("No {} access: {:?}", source, state);
        return AcquireOutcome::PermissionDenied { state };
    }

    match picker.pick(source).await {
        Some(uri) if !uri.trim().is_empty() => AcquireOutcome::Picked(uri),
        _ => AcquireOutcome::Cancelled,
    }
}

/// Human-readable hint for a refused permission.
#[must_use]
pub fn permission_instructions(source: MediaSource, state: PermissionState) -> String {
    match state {
        _ if state.needs_settings() => format!(
            "Access to the {source} is turned off. Enable it for recipebook in the system settings."
        ),
        PermissionState::Unavailable => format!("This device has no {source}."),
        _ => format!("recipebook needs access to the {source} to attach a picture."),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    struct FakePermissions {
        initial: PermissionState,
        after_request: PermissionState,
        requests: AtomicUsize,
    }

    impl FakePermissions {
        fn new(initial: PermissionState, after_request: PermissionState) -> Self {
            Self {
                initial,
                after_request,
                requests: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl PermissionCheck for FakePermissions {
        async fn check(&self, _source: MediaSource) -> PermissionState {
            self.initial
        }

        async fn request(&self, _source: MediaSource) -> PermissionState {
            self.requests.fetch_add(1, Ordering::SeqCst);
            self.after_request
        }
    }

    struct FakePicker {
        result: Option<String>,
        opened: AtomicUsize,
    }

    impl FakePicker {
        fn returning(result: Option<&str>) -> Self {
            Self {
                result: result.map(ToString::to_string),
                opened: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl ImagePicker for FakePicker {
        async fn pick(&self, _source: MediaSource) -> Option<String> {
            self.opened.fetch_add(1, Ordering::SeqCst);
            self.result.clone()
        }
    }

    #[test]
    fn test_allows_access() {
        assert!(PermissionState::Granted.allows_access());
        assert!(PermissionState::Limited.allows_access());
        assert!(!PermissionState::Denied.allows_access());
        assert!(!PermissionState::Blocked.allows_access());
        assert!(!PermissionState::Unavailable.allows_access());
    }

    #[test]
    fn test_only_blocked_needs_settings() {
        assert!(PermissionState::Blocked.needs_settings());
        assert!(!PermissionState::Blocked.is_requestable());
        assert!(!PermissionState::Denied.needs_settings());
        assert!(PermissionState::Denied.is_requestable());
        assert!(!PermissionState::Unavailable.needs_settings());
    }

    #[tokio::test]
    async fn test_granted_skips_request() {
        let perms = FakePermissions::new(PermissionState::Granted, PermissionState::Denied);
        let picker = FakePicker::returning(Some("file:///a.jpg"));

        let outcome = acquire_image(&perms, &picker, MediaSource::Camera).await;
        assert_eq!(outcome, AcquireOutcome::Picked("file:///a.jpg".to_string()));
        assert_eq!(perms.requests.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_limited_library_is_enough() {
        let perms = FakePermissions::new(PermissionState::Limited, PermissionState::Denied);
        let picker = FakePicker::returning(Some("ph://1"));

        let outcome = acquire_image(&perms, &picker, MediaSource::Library).await;
        assert_eq!(outcome.uri(), Some("ph://1"));
    }

    #[tokio::test]
    async fn test_denied_then_granted_on_request() {
        let perms = FakePermissions::new(PermissionState::Denied, PermissionState::Granted);
        let picker = FakePicker::returning(Some("file:///b.jpg"));

        let outcome = acquire_image(&perms, &picker, MediaSource::Camera).await;
        assert_eq!(outcome.uri(), Some("file:///b.jpg"));
        assert_eq!(perms.requests.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_refused_never_opens_picker() {
        let perms = FakePermissions::new(PermissionState::Denied, PermissionState::Blocked);
        let picker = FakePicker::returning(Some("file:///c.jpg"));

        let outcome = acquire_image(&perms, &picker, MediaSource::Camera).await;
        assert_eq!(
            outcome,
            AcquireOutcome::PermissionDenied {
                state: PermissionState::Blocked
            }
        );
        assert_eq!(picker.opened.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_blocked_is_not_requested_again() {
        let perms = FakePermissions::new(PermissionState::Blocked, PermissionState::Granted);
        let picker = FakePicker::returning(None);

        let outcome = acquire_image(&perms, &picker, MediaSource::Library).await;
        assert!(matches!(outcome, AcquireOutcome::PermissionDenied { .. }));
        assert_eq!(perms.requests.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_cancel_and_blank_uri() {
        let perms = FakePermissions::new(PermissionState::Granted, PermissionState::Granted);

        let picker = FakePicker::returning(None);
        assert_eq!(
            acquire_image(&perms, &picker, MediaSource::Camera).await,
            AcquireOutcome::Cancelled
        );

        let picker = FakePicker::returning(Some("  "));
        assert_eq!(
            acquire_image(&perms, &picker, MediaSource::Camera).await,
            AcquireOutcome::Cancelled
        );
    }

    #[tokio::test]
    async fn test_picked_uri_lands_in_form() {
        let perms = FakePermissions::new(PermissionState::Granted, PermissionState::Granted);
        let picker = FakePicker::returning(Some("file:///d.jpg"));
        let mut form = crate::form::RecipeForm::new("Dinner");

        if let Some(uri) = acquire_image(&perms, &picker, MediaSource::Library).await.uri() {
            form.set_image(uri);
        }
        assert_eq!(form.state().image_url, "file:///d.jpg");
        assert!(form.is_dirty());
    }

    #[test]
    fn test_permission_instructions() {
        let text = permission_instructions(MediaSource::Camera, PermissionState::Blocked);
        assert!(text.contains("settings"));
        assert!(text.contains("camera"));

        let text = permission_instructions(MediaSource::Library, PermissionState::Unavailable);
        assert!(text.contains("photo library"));
    }
}
