// HTTP routes
pub mod health;
pub mod poll;
pub mod rss;
pub mod verify;
pub mod webhook;

pub use health::*;
pub use poll::*;
pub use rss::*;
pub use verify::*;
pub use webhook::*;
