use std::collections::HashMap;

use super::machine::{transition, GrantEvent, GrantState};
use super::models::{GrantKey, PendingGrant};

/// In-memory registry of grants waiting on their member.
///
/// Codes and handles are separate namespaces. A new grant under an
/// existing key displaces the old one (last write wins); lookup
/// consumes, so a key resolves at most once. State lives only for the
/// life of the process.
#[derive(Default)]
pub struct PendingGrants {
    by_code: HashMap<String, PendingGrant>,
    by_handle: HashMap<String, PendingGrant>,
}

impl PendingGrants {
    pub fn new() -> Self {
        Self::default()
    }

    /// File a grant, displacing any previous grant under the same key.
    /// Returns the displaced grant, already marked expired.
    pub fn put(&mut self, mut grant: PendingGrant) -> Option<PendingGrant> {
        grant.state = transition(grant.state, GrantEvent::Registered);
        let displaced = match &grant.key {
            GrantKey::Code(code) => self.by_code.insert(code.clone(), grant),
            GrantKey::Handle(handle) => self.by_handle.insert(handle.clone(), grant),
        };
        displaced.map(|mut old| {
            old.state = transition(old.state, GrantEvent::Displaced);
            old
        })
    }

    /// Consume the grant under a key. The returned grant is marked
    /// resolved; a second take under the same key finds nothing.
    pub fn take(&mut self, key: &GrantKey) -> Option<PendingGrant> {
        let grant = match key {
            GrantKey::Code(code) => self.by_code.remove(code),
            GrantKey::Handle(handle) => self.by_handle.remove(handle),
        };
        grant.map(|mut grant| {
            grant.state = transition(grant.state, GrantEvent::Matched);
            grant
        })
    }

    pub fn len(&self) -> usize {
        self.by_code.len() + self.by_handle.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_code.is_empty() && self.by_handle.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::verification::Tier;

    fn grant(key: GrantKey) -> PendingGrant {
        PendingGrant::new(key, "@Someone", "role-1", Some(Tier::InnerCircle))
    }

    #[test]
    fn take_consumes_exactly_once() {
        let mut registry = PendingGrants::new();
        registry.put(grant(GrantKey::handle("User#1234")));

        let key = GrantKey::handle("user#1234");
        let resolved = registry.take(&key).unwrap();
        assert_eq!(resolved.state, GrantState::Resolved);
        assert!(registry.take(&key).is_none());
        assert!(registry.is_empty());
    }

    #[test]
    fn filing_moves_a_grant_to_awaiting() {
        let mut registry = PendingGrants::new();
        registry.put(grant(GrantKey::code("YT-AB12")));

        let resolved = registry.take(&GrantKey::code("yt-ab12")).unwrap();
        // Went Submitted -> Awaiting -> Resolved, so the lookup matched
        assert_eq!(resolved.state, GrantState::Resolved);
    }

    #[test]
    fn newer_submission_displaces_the_old_grant() {
        let mut registry = PendingGrants::new();
        registry.put(PendingGrant::new(
            GrantKey::handle("user#1234"),
            "@First",
            "role-1",
            None,
        ));
        let displaced = registry.put(PendingGrant::new(
            GrantKey::handle("user#1234"),
            "@Second",
            "role-2",
            None,
        ));

        let displaced = displaced.unwrap();
        assert_eq!(displaced.source_handle, "@First");
        assert_eq!(displaced.state, GrantState::Expired);

        let current = registry.take(&GrantKey::handle("user#1234")).unwrap();
        assert_eq!(current.source_handle, "@Second");
        assert_eq!(registry.len(), 0);
    }

    #[test]
    fn codes_and_handles_are_separate_namespaces() {
        let mut registry = PendingGrants::new();
        registry.put(grant(GrantKey::code("SAME")));
        registry.put(grant(GrantKey::handle("same")));

        assert_eq!(registry.len(), 2);
        assert!(registry.take(&GrantKey::code("same")).is_some());
        assert!(registry.take(&GrantKey::handle("SAME")).is_some());
    }
}
