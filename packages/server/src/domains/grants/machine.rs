//! Lifecycle of a pending grant as an explicit state machine.
//!
//! The states used to be implicit in which map an entry sat in and which
//! handler touched it; making them a type means a test can assert the
//! whole lifecycle without staging real gateway events.

/// Where a grant is in its lifecycle. `Resolved` and `Expired` are
/// terminal and absorb every further event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GrantState {
    /// Parsed from the audit channel, not yet filed
    Submitted,
    /// Filed in the registry, waiting for a join or a code entry
    Awaiting,
    /// Consumed by a matching member event
    Resolved,
    /// Displaced by a newer submission under the same key
    Expired,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GrantEvent {
    /// The grant was filed in the registry
    Registered,
    /// The member joined or redeemed the code
    Matched,
    /// A newer submission claimed the same key
    Displaced,
}

/// The single place grant state changes. Any event that does not apply
/// to the current state leaves it unchanged.
pub fn transition(state: GrantState, event: GrantEvent) -> GrantState {
    match (state, event) {
        (GrantState::Submitted, GrantEvent::Registered) => GrantState::Awaiting,
        (GrantState::Awaiting, GrantEvent::Matched) => GrantState::Resolved,
        (GrantState::Awaiting, GrantEvent::Displaced) => GrantState::Expired,
        (state, _) => state,
    }
}
