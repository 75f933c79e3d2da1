//! Semantic layer tests
//!
//! Tests for everything that runs after the document is built:
//! - Field classification and the symbol table
//! - Reference validation and problem reporting
//! - The end-to-end pipeline

pub mod tests_pipeline;
pub mod tests_post_process;
pub mod tests_validation;
