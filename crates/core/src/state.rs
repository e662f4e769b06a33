//! Tag store: the mutable state behind the plugtest resource.

use serde::Serialize;

use crate::etag::ETag;

/// Current representation identity plus the two mode flags.
///
/// Fields move only through the transitions below; the evaluator reads
/// and writes them under one exclusive borrow per request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResourceState {
    tag: ETag,
    /// The next GET must rotate the tag before answering.
    pending_change: bool,
    /// The next PUT carrying If-None-Match answers Created (otherwise 4.12).
    none_match_succeeds: bool,
}

impl ResourceState {
    /// Startup state: placeholder tag, rotation pending, If-None-Match will succeed.
    pub fn new() -> Self {
        Self {
            tag: ETag::placeholder(),
            pending_change: true,
            none_match_succeeds: true,
        }
    }

    pub fn tag(&self) -> &ETag {
        &self.tag
    }

    pub fn pending_change(&self) -> bool {
        self.pending_change
    }

    pub fn none_match_succeeds(&self) -> bool {
        self.none_match_succeeds
    }

    /// Install a freshly generated tag. Clears `pending_change`.
    pub(crate) fn install_tag(&mut self, tag: ETag) {
        self.tag = tag;
        self.pending_change = false;
    }

    pub(crate) fn mark_pending_change(&mut self) {
        self.pending_change = true;
    }

    /// Flip the If-None-Match flag, returning the value it had before.
    pub(crate) fn take_none_match_outcome(&mut self) -> bool {
        let succeeds = self.none_match_succeeds;
        self.none_match_succeeds = !succeeds;
        succeeds
    }
}

impl Default for ResourceState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state() {
        let state = ResourceState::new();
        assert_eq!(state.tag().as_bytes(), &[0x00]);
        assert!(state.pending_change());
        assert!(state.none_match_succeeds());
    }

    #[test]
    fn test_none_match_flag_alternates() {
        let mut state = ResourceState::new();
        assert!(state.take_none_match_outcome());
        assert!(!state.take_none_match_outcome());
        assert!(state.take_none_match_outcome());
        assert!(!state.none_match_succeeds());
    }

    #[test]
    fn test_install_tag_clears_pending() {
        let mut state = ResourceState::new();
        state.install_tag(ETag::new(&[9, 9]).unwrap());
        assert!(!state.pending_change());
        state.mark_pending_change();
        assert!(state.pending_change());
        assert_eq!(state.tag().as_bytes(), &[9, 9]);
    }

    #[test]
    fn test_state_serializes_with_hex_tag() {
        let mut state = ResourceState::new();
        state.install_tag(ETag::new(&[0xbe, 0xef]).unwrap());
        state.take_none_match_outcome();
        let json = serde_json::to_value(&state).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "tag": "beef",
                "pending_change": false,
                "none_match_succeeds": false,
            })
        );
    }
}
