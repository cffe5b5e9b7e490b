//! Grants domain - the membership bridge's resolution side.
//!
//! The bot process watches the audit channel for verification embeds,
//! files a pending grant per submission, and resolves it when the member
//! shows up: by joining under the submitted handle, or by redeeming a
//! one-time code through the slash command. Role changes made by
//! Discord's own YouTube integration are announced as auto-verified
//! without touching the registry.

pub mod machine;
pub mod models;
pub mod reactor;
pub mod registry;

pub use machine::{transition, GrantEvent, GrantState};
pub use models::{mint_code, GrantKey, PendingGrant};
pub use reactor::Reactor;
pub use registry::PendingGrants;
