// YouTube -> Discord Membership Bridge - Core
//
// Backend for the membership verification bridge: an HTTP service that turns
// membership form submissions into email + audit-channel notifications, and a
// companion bot process that watches the audit channel and resolves pending
// role grants. The two processes share no state; they coordinate only through
// the audit channel.

pub mod config;
pub mod domains;
pub mod kernel;
pub mod server;

pub use config::*;
