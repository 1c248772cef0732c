//! Shared building blocks for secure-props.
//!
//! This crate holds the small value types every other layer leans on:
//! location-tagged errors, a password wrapper that refuses to leak, and HTTP
//! status helpers. It carries no business logic.
//!
//! ## Architecture
//!
//! - **common** (this crate): Shared value types
//! - **props-core**: Artifact download, command building, process execution
//! - **secure-props**: CLI wiring everything together

pub mod error;
pub mod http_status;
pub mod redacted_password;

#[cfg(test)]
mod tests;

pub use error::error_location::ErrorLocation;
pub use error::redact_error::RedactError;
pub use http_status::HttpStatusCode;
pub use redacted_password::RedactedPassword;
