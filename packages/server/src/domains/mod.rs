// Business domains
pub mod grants;
pub mod poll;
pub mod verification;
