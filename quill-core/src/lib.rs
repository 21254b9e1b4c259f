//! Core value types for the quill source generator.
//!
//! This crate provides the names and type references that every other
//! quill crate passes around.

mod error;
mod literal;
mod name;
mod types;

pub use error::NameError;
pub use literal::{char_literal, string_literal};
pub use name::{AbbreviationLevel, QualifiedName, is_identifier};
pub use types::{Bound, Primitive, Reflect, TypeRef};
