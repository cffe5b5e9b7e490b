//! Kernel module - server infrastructure and dependencies.

pub mod deps;
pub mod test_dependencies;
pub mod traits;

pub use deps::{preview_url, DiscordAdapter, ResendAdapter, ServerDeps, WebhookAuditSink};
pub use test_dependencies::{
    MockAuditSink, MockDiscordService, MockMailer, RoleGrant, SentEmail, TestDependencies,
};
pub use traits::*;
