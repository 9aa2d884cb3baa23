//! CLI command implementations

pub mod cache;
pub mod resolve;

pub use cache::execute as cache;
pub use resolve::execute as resolve;
