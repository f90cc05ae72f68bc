pub mod data;
pub mod diff;
pub mod error;
pub mod filter;
pub mod loader;
pub mod report;
