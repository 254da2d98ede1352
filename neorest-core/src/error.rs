
//! Error types for neorest operations.

use thiserror::Error;

/// Unified error type for all neorest operations.
///
/// The taxonomy separates "my query was bad" ([`InvalidQuery`](NeorestError::InvalidQuery),
/// raised before anything is transmitted) from "the server had a problem"
/// ([`Remote`](NeorestError::Remote), carrying the server's own status and
/// message) from "the response could not be parsed"
/// ([`Malformed`](NeorestError::Malformed)). Conversion helpers wrap their
/// errors with [`Context`](NeorestError::Context) via
/// [`with_context`](NeorestError::with_context), producing chained messages
/// like:
///
/// ```text
/// column 'user' (row 3): type mismatch: expected Node, got String (NodeRef)
/// ```
#[derive(Error, Debug)]
pub enum NeorestError {
    /// A general mapping error with a freeform message.
    #[error("mapping error: {0}")]
    Mapping(String),

    /// The query was rejected locally, before transmission: empty statement,
    /// a placeholder without a bound parameter, or an unbindable parameter
    /// value. Never retried.
    #[error("invalid query: {0}")]
    InvalidQuery(String),

    /// The server rejected or failed the query. The status and message are
    /// surfaced verbatim; this crate performs no retries.
    #[error("remote error (status {status}): {message}")]
    Remote { status: u16, message: String },

    /// The response violated the expected shape — a contract violation by
    /// the server. The whole call is aborted; no partial result is returned.
    #[error("malformed result: {0}")]
    Malformed(String),

    /// The caller aborted row dispatch. No partial row was handed out.
    #[error("cancelled")]
    Cancelled,

    /// The request never completed: connection failure, timeout, or a
    /// similar transport-level fault. Distinct from [`Remote`](NeorestError::Remote),
    /// which means the server answered and said no.
    #[error("transport error: {0}")]
    Transport(String),

    /// A [`Value`](crate::Value) variant did not match the expected Rust type.
    #[error("type mismatch: expected {expected}, got {got} ({context})")]
    TypeMismatch {
        expected: String,
        got: String,
        context: String,
    },

    /// A required column was not found in a result row.
    #[error("missing column '{column}' in {context}")]
    MissingColumn { column: String, context: String },

    /// A required property was not found on a node or relationship.
    #[error("missing property '{property}' on {entity}")]
    MissingProperty { property: String, entity: String },

    /// A fetch that requires at least one row got an empty result.
    #[error("no rows returned ({context})")]
    MissingRow { context: String },

    /// Wraps an inner error with additional context (column, row ordinal).
    ///
    /// Created by the conversion layer. Can also be created manually via
    /// [`with_context`](NeorestError::with_context).
    #[error("{context}: {source}")]
    Context {
        context: String,
        source: Box<NeorestError>,
    },

    /// A `serde_json` error from body serialization or parsing.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl NeorestError {
    /// Create an [`InvalidQuery`](NeorestError::InvalidQuery) error.
    pub fn invalid_query(message: impl Into<String>) -> Self {
        NeorestError::InvalidQuery(message.into())
    }

    /// Create a [`Remote`](NeorestError::Remote) error.
    pub fn remote(status: u16, message: impl Into<String>) -> Self {
        NeorestError::Remote {
            status,
            message: message.into(),
        }
    }

    /// Create a [`Malformed`](NeorestError::Malformed) error.
    pub fn malformed(message: impl Into<String>) -> Self {
        NeorestError::Malformed(message.into())
    }

    /// Create a [`TypeMismatch`](NeorestError::TypeMismatch) error.
    pub fn type_mismatch(expected: &str, got: &str, context: &str) -> Self {
        NeorestError::TypeMismatch {
            expected: expected.to_owned(),
            got: got.to_owned(),
            context: context.to_owned(),
        }
    }

    /// Create a [`MissingColumn`](NeorestError::MissingColumn) error.
    pub fn missing_column(column: &str, context: &str) -> Self {
        NeorestError::MissingColumn {
            column: column.to_owned(),
            context: context.to_owned(),
        }
    }

    /// Create a [`MissingProperty`](NeorestError::MissingProperty) error.
    pub fn missing_property(property: &str, entity: &str) -> Self {
        NeorestError::MissingProperty {
            property: property.to_owned(),
            entity: entity.to_owned(),
        }
    }

    /// Create a [`MissingRow`](NeorestError::MissingRow) error.
    pub fn missing_row(context: &str) -> Self {
        NeorestError::MissingRow {
            context: context.to_owned(),
        }
    }

    /// Wrap this error with additional context, producing a
    /// [`Context`](NeorestError::Context) variant.
    ///
    /// The row and conversion layers call this to annotate errors with the
    /// column name and row ordinal so you can trace exactly where decoding
    /// failed.
    ///
    /// ```rust
    /// # use neorest_core::NeorestError;
    /// let err = NeorestError::type_mismatch("Integer", "String", "i64");
    /// let wrapped = err.with_context("column 'age'");
    /// assert!(wrapped.to_string().contains("column 'age'"));
    /// ```
    pub fn with_context(self, ctx: impl Into<String>) -> Self {
        NeorestError::Context {
            context: ctx.into(),
            source: Box::new(self),
        }
    }
}
