//! Entry assembly, signing operations, and schema validation
//!
//! This crate turns pipeline state into an unsigned entry, appends
//! signatures over the canonical form, performs the self-referential
//! location rewrite (which always resets the signature set), and validates
//! finished entries against the closed schema.

pub mod builder;
pub mod error;
pub mod validation;

pub use builder::{rewrite_location, sign_entry, EntryDraft};
pub use error::{Error, Result};
pub use validation::{validate_entry, validate_value, ValidationIssue, ValidationReport};
