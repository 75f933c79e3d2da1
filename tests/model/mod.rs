//! Model layer tests
//!
//! Tests for the semantic document built from ZDL sources:
//! - Declaration, field, enum and relationship nodes
//! - Services, aggregates and legacy CRUD synthesis
//! - Derived names
//! - Location recording and resolution

pub mod tests_builder;
pub mod tests_locations;
pub mod tests_names;
