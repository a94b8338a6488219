//! Error handling for decompression operations
//!
//! This module re-exports the error types defined in [`crate::common`].
//! The decoder uses thiserror for ergonomic error handling; malformed
//! streams carry a static message identifying the defect.

pub use crate::common::InflateError;
pub use crate::common::Result;
