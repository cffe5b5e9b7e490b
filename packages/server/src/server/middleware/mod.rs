// HTTP middleware
pub mod ip_extractor;

pub use ip_extractor::*;
