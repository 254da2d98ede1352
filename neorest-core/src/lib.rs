
//! Core value model, decoding, and conversion traits for neorest.
//!
//! This crate is not meant to be used directly — use the [`neorest`] facade
//! crate instead, which re-exports everything you need.

pub mod traits;
pub mod error;

pub mod value;
pub mod record;

pub use error::NeorestError;
pub use value::{Value, NodeRef, RelRef, Path};
pub use record::{Columns, Row};
pub use traits::{FromValue, IntoValue, FromRow, ToParams};
