pub mod client;
pub mod error;

// Re-exports
pub use client::HttpUserInfoClient;
pub use error::{Error, Result};
