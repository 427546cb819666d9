//! Core strongbox types and operations.
//!
//! - [`version`] - Protocol versions and string encodings
//! - [`error`] - Error types for strongbox operations
//! - [`header`] - Envelope header resolution
//! - [`types`] - Keys, key pairs and guarded buffers
//! - [`operations`] - Envelopes, signatures, password storage and key handling

pub mod error;
pub mod header;
pub mod operations;
pub mod types;
pub mod version;

// Re-export commonly used items
pub use error::{StrongboxError, StrongboxResult};
pub use version::{Encoding, ProtocolVersion};
