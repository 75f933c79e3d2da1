//! # Semantic Analysis
//!
//! Passes that run over a built [`ZdlModel`](crate::model::ZdlModel):
//!
//! - [`post_process`] classifies field types against the declared kinds and
//!   stores a [`SymbolTable`] on the model.
//! - [`Validator`] checks cross-references and records problems.
//!
//! Post-processing must run before validation.

mod post_process;
mod symbols;
mod validate;

pub use post_process::post_process;
pub use symbols::{SymbolKind, SymbolTable};
pub use validate::Validator;
