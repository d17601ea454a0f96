//! Utility modules.

/// Timestamp serialization helpers for upstream record fields.
pub mod datetime;

/// Masking and truncation of subscriber data in logs.
pub mod log_sanitizer;
