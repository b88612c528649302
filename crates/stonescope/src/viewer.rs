//! Session queries for host applications.
//!
//! A host embedding the viewer (e.g. a kiosk shell around the window) polls
//! these from another thread to drive its own loading UI.

use stonescope_core::material::SourceKind;
use stonescope_core::session::SessionState;
use stonescope_core::state::try_with_context;

/// Current lifecycle state of the viewer session.
///
/// Returns `None` if stonescope is not initialized.
#[must_use]
pub fn viewer_state() -> Option<SessionState> {
    try_with_context(|ctx| ctx.session.state())
}

/// Monotonic load progress, 0-100.
#[must_use]
pub fn load_progress() -> Option<u8> {
    try_with_context(|ctx| ctx.session.progress())
}

/// The fatal error message, when the viewer is in the failed state.
#[must_use]
pub fn error_message() -> Option<String> {
    try_with_context(|ctx| ctx.session.error_message().map(String::from)).flatten()
}

/// Provenance of the displayed surface texture (photograph or procedural).
#[must_use]
pub fn texture_source() -> Option<SourceKind> {
    try_with_context(|ctx| ctx.session.source_kind()).flatten()
}

/// Number of meshes the material was bound to in the active session.
#[must_use]
pub fn meshes_bound() -> Option<usize> {
    try_with_context(|ctx| ctx.session.meshes_bound())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_queries_none_before_init() {
        // No other unit test in this crate initializes the global context,
        // so this binary observes the uninitialized process.
        assert_eq!(viewer_state(), None);
        assert_eq!(load_progress(), None);
        assert_eq!(error_message(), None);
        assert_eq!(texture_source(), None);
        assert_eq!(meshes_bound(), None);
    }
}
