//! Foundation types for the ZDL toolchain.
//!
//! This module provides fundamental types used throughout the crate:
//! - [`TextRange`], [`TextSize`] - Source positions (byte offsets)
//! - [`LineIndex`] - Offset to line/column conversion
//! - [`Position`], [`Span`] - Line/column positions for document paths
//!
//! This module has NO dependencies on other zdl modules.

mod line_index;
mod position;

pub use line_index::LineIndex;
pub use position::{Position, Span};
pub use text_size::{TextRange, TextSize};

// Re-export text-size types for convenience
pub use text_size;
