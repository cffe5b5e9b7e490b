// Verification actions

pub mod verify;

pub use verify::{submit_verification, SubmitOutcome};
