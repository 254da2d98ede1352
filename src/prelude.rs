
//! Convenience re-exports for common neorest usage.
//!
//! ```rust
//! use neorest::prelude::*;
//! ```
//!
//! This imports the service handle ([`Graph`]), the query builder
//! ([`cypher`], [`CypherQuery`]), the result types ([`Row`], [`RowStream`],
//! [`Value`], [`NodeRef`], [`RelRef`], [`Path`]), the conversion traits,
//! and the error type.

pub use crate::graph::Graph;
pub use crate::query::{cypher, CypherQuery};
pub use crate::stream::RowStream;

pub use neorest_core::error::NeorestError;
pub use neorest_core::record::{Columns, Row};
pub use neorest_core::traits::{FromRow, FromValue, IntoValue, ToParams};
pub use neorest_core::value::{NodeRef, Path, RelRef, Value};
