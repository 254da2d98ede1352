
//! The service handle: endpoint discovery and entity create/read/delete.

use std::collections::HashMap;

use serde::Deserialize;
use serde_json::{json, Value as Json};
use tracing::debug;

use neorest_core::value::{entity_id, type_name};
use neorest_core::{NeorestError, NodeRef, RelRef, ToParams, Value};

use crate::rest::{Resource, RestResponse};

/// Service root document. Only the endpoints this crate uses are read;
/// everything else the server advertises is ignored.
#[derive(Debug, Default, Deserialize)]
struct ServiceRoot {
    #[serde(default)]
    cypher: Option<String>,
    #[serde(default)]
    node: Option<String>,
}

/// A handle to one remote graph database service.
///
/// [`connect`](Graph::connect) fetches the service root document once and
/// records the discovered endpoints; after that the handle holds no mutable
/// state, so it is safe to share across concurrent callers — each query is
/// an independent request/response exchange.
///
/// # Example
///
/// ```rust,no_run
/// # use neorest::prelude::*;
/// # async fn example() -> Result<(), NeorestError> {
/// let graph = Graph::connect("http://localhost:7474/db/data").await?;
/// let alice = graph
///     .create_node(vec![("name", "Alice")])
///     .await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Graph {
    resource: Resource,
    uri: String,
    cypher_uri: String,
    node_uri: String,
}

impl Graph {
    /// Connect to a service root URI and discover its endpoints.
    ///
    /// Endpoints missing from the root document fall back to the
    /// conventional `<root>/cypher` and `<root>/node` locations.
    pub async fn connect(uri: &str) -> Result<Self, NeorestError> {
        Self::connect_with(uri, Resource::new()).await
    }

    /// Like [`connect`](Graph::connect), but reuses an existing
    /// [`Resource`] (shared connection pool, custom timeouts).
    pub async fn connect_with(uri: &str, resource: Resource) -> Result<Self, NeorestError> {
        let base = uri.trim_end_matches('/').to_owned();
        let root: ServiceRoot = match resource.get(&base).await? {
            RestResponse::Body(doc) => serde_json::from_value(doc)?,
            _ => return Err(NeorestError::malformed("service root returned no body")),
        };
        debug!(uri = %base, "connected to graph service");
        Ok(Self::build(base, root, resource))
    }

    /// Build a handle from a previously obtained service root document,
    /// without touching the network.
    ///
    /// Useful when the root document has already been fetched (or the
    /// service layout is known ahead of time); unknown fields in the
    /// document are ignored, and endpoints it does not mention fall back to
    /// the conventional locations.
    pub fn with_index(uri: &str, index: &Json) -> Result<Self, NeorestError> {
        let base = uri.trim_end_matches('/').to_owned();
        let root: ServiceRoot = serde_json::from_value(index.clone())?;
        Ok(Self::build(base, root, Resource::new()))
    }

    fn build(base: String, root: ServiceRoot, resource: Resource) -> Self {
        let cypher_uri = root.cypher.unwrap_or_else(|| format!("{base}/cypher"));
        let node_uri = root.node.unwrap_or_else(|| format!("{base}/node"));
        Self { resource, uri: base, cypher_uri, node_uri }
    }

    /// The service root URI this handle was connected to.
    pub fn uri(&self) -> &str {
        &self.uri
    }

    /// The discovered query endpoint.
    pub fn cypher_endpoint(&self) -> &str {
        &self.cypher_uri
    }

    /// The discovered node endpoint.
    pub fn node_endpoint(&self) -> &str {
        &self.node_uri
    }

    /// POST a query document to the cypher endpoint.
    pub(crate) async fn cypher(&self, body: &Json) -> Result<RestResponse, NeorestError> {
        self.resource.post(&self.cypher_uri, body).await
    }

    fn node_location(&self, id: u64) -> String {
        format!("{}/{}", self.node_uri, id)
    }

    fn relationship_location(&self, id: u64) -> String {
        format!("{}/relationship/{}", self.uri, id)
    }

    /// Create a node with the given properties and return a reference to it.
    pub async fn create_node(&self, props: impl ToParams) -> Result<NodeRef, NeorestError> {
        let properties = props.to_params();
        let body = properties_json(&properties)?;
        match self.resource.post(&self.node_uri, &body).await? {
            RestResponse::Created(location) => Ok(NodeRef {
                id: entity_id(&location, "created node")?,
                properties,
            }),
            // Some servers answer 200 with the full node representation.
            RestResponse::Body(doc) => expect_node(&doc),
            RestResponse::Empty => Err(NeorestError::malformed("node creation returned no body")),
        }
    }

    /// Fetch a node by identifier.
    pub async fn node(&self, id: u64) -> Result<NodeRef, NeorestError> {
        match self.resource.get(&self.node_location(id)).await? {
            RestResponse::Body(doc) => expect_node(&doc),
            _ => Err(NeorestError::malformed("node fetch returned no body")),
        }
    }

    /// Delete a node by identifier.
    ///
    /// The server rejects deletion of a node that still has relationships;
    /// that refusal surfaces as [`Remote`](NeorestError::Remote).
    pub async fn delete_node(&self, id: u64) -> Result<(), NeorestError> {
        self.resource.delete(&self.node_location(id)).await.map(|_| ())
    }

    /// Create a relationship of type `rel_type` from node `from` to node
    /// `to`, with the given properties.
    pub async fn create_relationship(
        &self,
        from: u64,
        rel_type: &str,
        to: u64,
        props: impl ToParams,
    ) -> Result<RelRef, NeorestError> {
        let properties = props.to_params();
        let body = json!({
            "to": self.node_location(to),
            "type": rel_type,
            "data": properties_json(&properties)?,
        });
        let uri = format!("{}/relationships", self.node_location(from));
        match self.resource.post(&uri, &body).await? {
            RestResponse::Created(location) => Ok(RelRef {
                id: entity_id(&location, "created relationship")?,
                rel_type: rel_type.to_owned(),
                start: from,
                end: to,
                properties,
            }),
            RestResponse::Body(doc) => expect_relationship(&doc),
            RestResponse::Empty => {
                Err(NeorestError::malformed("relationship creation returned no body"))
            }
        }
    }

    /// Fetch a relationship by identifier.
    pub async fn relationship(&self, id: u64) -> Result<RelRef, NeorestError> {
        match self.resource.get(&self.relationship_location(id)).await? {
            RestResponse::Body(doc) => expect_relationship(&doc),
            _ => Err(NeorestError::malformed("relationship fetch returned no body")),
        }
    }

    /// Delete a relationship by identifier.
    pub async fn delete_relationship(&self, id: u64) -> Result<(), NeorestError> {
        self.resource
            .delete(&self.relationship_location(id))
            .await
            .map(|_| ())
    }
}

fn properties_json(properties: &HashMap<String, Value>) -> Result<Json, NeorestError> {
    let mut out = serde_json::Map::with_capacity(properties.len());
    for (k, v) in properties {
        out.insert(k.clone(), v.clone().into_json()?);
    }
    Ok(Json::Object(out))
}

fn expect_node(doc: &Json) -> Result<NodeRef, NeorestError> {
    match Value::decode(doc)? {
        Value::Node(n) => Ok(n),
        other => Err(NeorestError::malformed(format!(
            "expected a node representation, got {}",
            type_name(&other)
        ))),
    }
}

fn expect_relationship(doc: &Json) -> Result<RelRef, NeorestError> {
    match Value::decode(doc)? {
        Value::Relationship(r) => Ok(r),
        other => Err(NeorestError::malformed(format!(
            "expected a relationship representation, got {}",
            type_name(&other)
        ))),
    }
}
