//! Verification domain - the membership bridge's submission side.
//!
//! A form submission comes in over HTTP, gets an access email (primary
//! channel with a webhook fallback), and is always mirrored to the audit
//! channel as a typed embed. The bot process picks the embed up from there;
//! this domain owns both ends of that schema.
//!
//! Responsibilities:
//! - Request validation and the response contract
//! - Dual-channel email delivery (never errors, reports what happened)
//! - The typed audit event schema (produced here, parsed by the reactor)
//! - Membership tier inference

pub mod actions;
pub mod audit;
pub mod delivery;
pub mod email;
pub mod models;
pub mod tier;

pub use actions::{submit_verification, SubmitOutcome};
pub use audit::AuditEvent;
pub use delivery::deliver_email;
pub use models::{DeliveryMethod, EmailDelivery, VerificationRequest, VerifyResponse};
pub use tier::Tier;
