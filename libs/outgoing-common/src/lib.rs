//! Outgoing Common - Shared constants and utilities for the correspondence catalogue
//!
//! # Examples
//!
//! ```
//! use outgoing_common::{normalize_missing, FIELD_LABELS, MISSING_VALUE};
//!
//! assert_eq!(FIELD_LABELS[0], "Signatur");
//! assert_eq!(normalize_missing("   "), MISSING_VALUE);
//! ```

pub mod constants;
pub mod utils;

pub use constants::*;
pub use utils::*;
