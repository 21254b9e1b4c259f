//! TOML manifests describing one generated source file.
//!
//! A `listing.toml` names the package and primary type, configures the
//! render, declares imports and lists the body items. [`Manifest::to_document`]
//! turns it into a [`quill_codegen::Document`].

// Miette's derive macro generates code that triggers these warnings
#![allow(unused_assignments)]

mod error;
mod item;
mod manifest;
mod validate;

pub use error::{Error, Result};
pub use item::{ArgSpec, Item, Scope, TypeSpec};
pub use manifest::{Imports, MANIFEST_FILE, Manifest};
pub use validate::ParseContext;
