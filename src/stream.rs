
//! Lazy, ordered row decoding and dispatch.

use std::ops::ControlFlow;
use std::sync::Arc;

use serde_json::Value as Json;

use neorest_core::{Columns, NeorestError, Row};

use crate::rest::RestResponse;

/// The decoded result of one query: a lazy sequence of [`Row`]s.
///
/// The column header list is decoded eagerly when the stream is built
/// (establishing the schema every row shares); rows are decoded one at a
/// time, strictly in server arrival order, as the stream is consumed. Row
/// order is part of the result contract — the stream never reorders.
///
/// All decoding state is local to the stream; a malformed row or cell fails
/// the whole call and no partial row is ever handed out.
///
/// # Example
///
/// ```rust,no_run
/// # use neorest::prelude::*;
/// # async fn example(graph: &Graph) -> Result<(), NeorestError> {
/// let stream = cypher("START n=node(*) RETURN n.name")
///     .fetch_stream(graph)
///     .await?;
/// for row in stream {
///     let name: String = row?.get_as("n.name")?;
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct RowStream {
    columns: Arc<Columns>,
    raw: std::vec::IntoIter<Json>,
}

impl RowStream {
    /// Build a stream from the REST exchange of one query.
    ///
    /// Only a `200` with a body is a result. An empty body is a broken
    /// exchange — a zero-row result still carries a columns/data document —
    /// and surfaces as [`Remote`](NeorestError::Remote), not as an empty
    /// stream.
    pub fn from_response(response: RestResponse) -> Result<Self, NeorestError> {
        match response {
            RestResponse::Body(payload) => Self::from_payload(payload),
            RestResponse::Empty => {
                Err(NeorestError::remote(200, "server returned an empty response"))
            }
            RestResponse::Created(_) => {
                Err(NeorestError::malformed("unexpected 201 from the query endpoint"))
            }
        }
    }

    /// Build a stream from a raw result payload.
    ///
    /// The payload must be an object carrying a `columns` array of names
    /// and a `data` array of rows; unknown extra fields are ignored. A
    /// payload with empty `columns` and `data` is a valid empty result.
    pub fn from_payload(payload: Json) -> Result<Self, NeorestError> {
        let mut obj = match payload {
            Json::Object(obj) => obj,
            _ => return Err(NeorestError::malformed("result payload is not an object")),
        };
        let names = match obj.remove("columns") {
            Some(Json::Array(cols)) => cols
                .into_iter()
                .map(|c| match c {
                    Json::String(name) => Ok(name),
                    _ => Err(NeorestError::malformed("column name is not a string")),
                })
                .collect::<Result<Vec<_>, _>>()?,
            Some(_) => return Err(NeorestError::malformed("'columns' is not an array")),
            None => return Err(NeorestError::malformed("result payload is missing 'columns'")),
        };
        let rows = match obj.remove("data") {
            Some(Json::Array(rows)) => rows,
            Some(_) => return Err(NeorestError::malformed("'data' is not an array")),
            None => return Err(NeorestError::malformed("result payload is missing 'data'")),
        };
        Ok(Self {
            columns: Arc::new(Columns::new(names)),
            raw: rows.into_iter(),
        })
    }

    /// The column schema shared by every row.
    pub fn columns(&self) -> &Columns {
        &self.columns
    }

    /// Rows not yet decoded.
    pub fn remaining(&self) -> usize {
        self.raw.len()
    }

    /// Decode and collect every remaining row, preserving arrival order.
    pub fn collect_rows(self) -> Result<Vec<Row>, NeorestError> {
        self.collect()
    }

    /// Invoke `handler` once per row, in arrival order.
    ///
    /// Dispatch is strictly sequential: each row is fully decoded before
    /// the handler sees it, and the next row is not touched until the
    /// handler returns. A handler returning [`ControlFlow::Break`] stops
    /// dispatch immediately and surfaces
    /// [`Cancelled`](NeorestError::Cancelled).
    pub fn dispatch<F>(self, mut handler: F) -> Result<(), NeorestError>
    where
        F: FnMut(Row) -> ControlFlow<()>,
    {
        for row in self {
            match handler(row?) {
                ControlFlow::Continue(()) => {}
                ControlFlow::Break(()) => return Err(NeorestError::Cancelled),
            }
        }
        Ok(())
    }
}

impl Iterator for RowStream {
    type Item = Result<Row, NeorestError>;

    fn next(&mut self) -> Option<Self::Item> {
        let raw = self.raw.next()?;
        Some(Row::decode(Arc::clone(&self.columns), &raw))
    }
}
