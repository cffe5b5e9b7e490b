//! Poll domain - a fixed three-option poll held in process memory.

pub mod store;

pub use store::{voter_fingerprint, PollSnapshot, PollStore, VoteOutcome};
