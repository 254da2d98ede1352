
//! The query executor: builder, validation, and typed fetch helpers.

use std::collections::HashMap;
use std::ops::ControlFlow;

use serde_json::{json, Value as Json};
use tracing::debug;

use neorest_core::{FromRow, IntoValue, NeorestError, Row, ToParams, Value};

use crate::graph::Graph;
use crate::stream::RowStream;

/// A parameterized Cypher query.
///
/// Built with [`cypher`] or [`CypherQuery::new`], parameters bound with
/// [`param`](CypherQuery::param) / [`params_from`](CypherQuery::params_from),
/// executed with one of the `fetch_*` helpers or [`for_each`](CypherQuery::for_each).
///
/// Before anything is transmitted the statement is validated: it must be
/// non-empty and every `{name}` placeholder it references must have a bound
/// parameter, otherwise the call fails locally with
/// [`InvalidQuery`](NeorestError::InvalidQuery).
///
/// # Examples
///
/// ```rust,no_run
/// # use neorest::prelude::*;
/// # async fn example(graph: &Graph) -> Result<(), NeorestError> {
/// let rows = cypher("START n=node({id}) RETURN n.name AS name")
///     .param("id", 17_i64)
///     .fetch_all::<Row>(graph)
///     .await?;
/// # Ok(())
/// # }
/// ```
pub struct CypherQuery {
    statement: String,
    params: HashMap<String, Value>,
}

impl CypherQuery {
    /// Create a new query from a Cypher statement.
    pub fn new(statement: impl Into<String>) -> Self {
        Self {
            statement: statement.into(),
            params: HashMap::new(),
        }
    }

    /// The Cypher statement this query will send.
    pub fn statement(&self) -> &str {
        &self.statement
    }

    /// Bind a named parameter. Accepts any type that converts to [`Value`].
    ///
    /// ```rust
    /// # use neorest::query::CypherQuery;
    /// let q = CypherQuery::new("START n=node({id}) RETURN n")
    ///     .param("id", 17_i64);
    /// ```
    pub fn param(mut self, key: impl Into<String>, value: impl IntoValue) -> Self {
        self.params.insert(key.into(), value.into_value());
        self
    }

    /// Bind all entries from a [`ToParams`] source as named parameters.
    ///
    /// This is a bulk alternative to calling [`.param()`](Self::param) for
    /// each entry individually.
    pub fn params_from(mut self, source: impl ToParams) -> Self {
        self.params.extend(source.to_params());
        self
    }

    /// Validate the query and serialize the request body.
    ///
    /// This is the pre-transmission step: an empty statement, a placeholder
    /// without a bound parameter, or an unbindable parameter value all fail
    /// here with [`InvalidQuery`](NeorestError::InvalidQuery) — nothing is
    /// sent.
    pub fn request_body(&self) -> Result<Json, NeorestError> {
        if self.statement.trim().is_empty() {
            return Err(NeorestError::invalid_query("empty statement"));
        }
        for name in placeholders(&self.statement) {
            if !self.params.contains_key(&name) {
                return Err(NeorestError::invalid_query(format!(
                    "placeholder {{{name}}} has no bound parameter"
                )));
            }
        }
        let mut params = serde_json::Map::with_capacity(self.params.len());
        for (k, v) in &self.params {
            params.insert(k.clone(), v.clone().into_json()?);
        }
        Ok(json!({ "query": self.statement, "params": params }))
    }

    async fn run(self, graph: &Graph) -> Result<RowStream, NeorestError> {
        let body = self.request_body()?;
        debug!(statement = %self.statement, params = self.params.len(), "executing cypher");
        // The one suspension point: a single request/response exchange.
        let response = graph.cypher(&body).await?;
        RowStream::from_response(response)
    }

    /// Execute and collect every row into `Vec<T>`, preserving server
    /// arrival order. A zero-row result yields an empty vector.
    pub async fn fetch_all<T: FromRow>(self, graph: &Graph) -> Result<Vec<T>, NeorestError> {
        let stream = self.run(graph).await?;
        let mut out = Vec::new();
        for row in stream {
            out.push(T::from_row(&row?)?);
        }
        Ok(out)
    }

    /// Execute and return exactly one row, mapped to `T`.
    ///
    /// Returns [`MissingRow`](NeorestError::MissingRow) if the result is
    /// empty. Additional rows are ignored.
    pub async fn fetch_one<T: FromRow>(self, graph: &Graph) -> Result<T, NeorestError> {
        let mut stream = self.run(graph).await?;
        match stream.next() {
            Some(row) => T::from_row(&row?),
            None => Err(NeorestError::missing_row("fetch_one")),
        }
    }

    /// Execute and return zero or one row, mapped to `T`.
    pub async fn fetch_optional<T: FromRow>(
        self,
        graph: &Graph,
    ) -> Result<Option<T>, NeorestError> {
        let mut stream = self.run(graph).await?;
        match stream.next() {
            Some(row) => Ok(Some(T::from_row(&row?)?)),
            None => Ok(None),
        }
    }

    /// Execute and return the lazy [`RowStream`] — rows are decoded one at
    /// a time as the stream is consumed.
    pub async fn fetch_stream(self, graph: &Graph) -> Result<RowStream, NeorestError> {
        self.run(graph).await
    }

    /// Execute and invoke `handler` once per row, in arrival order — the
    /// side-effecting mode; no collection is built.
    ///
    /// The handler returns [`ControlFlow`]: `Break` aborts dispatch
    /// immediately and the call returns
    /// [`Cancelled`](NeorestError::Cancelled). On a server error no handler
    /// invocation happens at all.
    ///
    /// ```rust,no_run
    /// # use std::ops::ControlFlow;
    /// # use neorest::prelude::*;
    /// # async fn example(graph: &Graph) -> Result<(), NeorestError> {
    /// cypher("START n=node(*) RETURN n.name AS name")
    ///     .for_each(graph, |row| {
    ///         println!("{:?}", row.get("name"));
    ///         ControlFlow::Continue(())
    ///     })
    ///     .await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn for_each<F>(self, graph: &Graph, handler: F) -> Result<(), NeorestError>
    where
        F: FnMut(Row) -> ControlFlow<()>,
    {
        self.run(graph).await?.dispatch(handler)
    }
}

/// Convenience constructor — equivalent to [`CypherQuery::new`].
///
/// ```rust
/// # use neorest::query::cypher;
/// let q = cypher("START n=node(*) RETURN n");
/// ```
pub fn cypher(statement: impl Into<String>) -> CypherQuery {
    CypherQuery::new(statement)
}

/// Scan a statement for `{name}` placeholders.
///
/// Quoted spans are skipped so string literals cannot introduce phantom
/// placeholders. A brace group only counts when its contents form an
/// identifier (`[A-Za-z_][A-Za-z0-9_]*`), which keeps map literals like
/// `{name: {n}}` from matching at the outer level while still finding the
/// inner `{n}`.
pub(crate) fn placeholders(statement: &str) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    let mut chars = statement.chars().peekable();
    let mut quote: Option<char> = None;

    while let Some(c) = chars.next() {
        if let Some(q) = quote {
            if c == '\\' {
                chars.next();
            } else if c == q {
                quote = None;
            }
            continue;
        }
        match c {
            '\'' | '"' => quote = Some(c),
            '{' => {
                let mut name = String::new();
                while let Some(&n) = chars.peek() {
                    if n.is_ascii_alphanumeric() || n == '_' {
                        name.push(n);
                        chars.next();
                    } else {
                        break;
                    }
                }
                let is_ident = name
                    .chars()
                    .next()
                    .is_some_and(|first| first.is_ascii_alphabetic() || first == '_');
                if is_ident && chars.peek() == Some(&'}') {
                    chars.next();
                    if !out.contains(&name) {
                        out.push(name);
                    }
                }
            }
            _ => {}
        }
    }
    out
}
