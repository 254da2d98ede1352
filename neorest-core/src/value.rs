
//! The typed cell model and its wire decoding.
//!
//! Every cell of a query result decodes into exactly one [`Value`] variant.
//! Decoding inspects structural markers in the JSON payload (a `self` URI
//! marks an entity, `type`/`start`/`end` distinguish a relationship from a
//! node, strict node/relationship alternation marks a path) in one place —
//! [`Value::decode`] — rather than scattering shape checks across the crate.

use std::collections::HashMap;

use serde_json::Value as Json;

use crate::error::NeorestError;
use crate::traits::FromValue;

/// A single decoded result cell.
///
/// Scalars, lists, and maps mirror JSON directly. [`Node`](Value::Node),
/// [`Relationship`](Value::Relationship), and [`Path`](Value::Path) are
/// client-side references to remote graph entities, reconstructed from the
/// entity representations the server embeds in result cells.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
    List(Vec<Value>),
    Map(HashMap<String, Value>),
    Node(NodeRef),
    Relationship(RelRef),
    Path(Path),
}

/// Returns a human-readable name for a [`Value`] variant.
///
/// Used in error messages to describe the actual type received when a
/// conversion fails.
pub fn type_name(v: &Value) -> &'static str {
    match v {
        Value::Null => "Null",
        Value::Bool(_) => "Boolean",
        Value::Integer(_) => "Integer",
        Value::Float(_) => "Float",
        Value::String(_) => "String",
        Value::List(_) => "List",
        Value::Map(_) => "Map",
        Value::Node(_) => "Node",
        Value::Relationship(_) => "Relationship",
        Value::Path(_) => "Path",
    }
}

/// A client-side reference to a node in the remote graph.
///
/// Carries the node's opaque numeric identifier and a snapshot of its
/// property map as of query time. The snapshot is never refreshed; re-run
/// the query to observe newer state.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeRef {
    /// Server-assigned node identifier.
    pub id: u64,
    /// Property snapshot at query time.
    pub properties: HashMap<String, Value>,
}

impl NodeRef {
    /// Read a property and convert it, failing with
    /// [`MissingProperty`](NeorestError::MissingProperty) if absent.
    pub fn prop<T: FromValue>(&self, key: &str) -> Result<T, NeorestError> {
        match self.properties.get(key) {
            Some(v) => T::from_value(v.clone())
                .map_err(|e| e.with_context(format!("node {} property '{key}'", self.id))),
            None => Err(NeorestError::missing_property(key, &format!("node {}", self.id))),
        }
    }
}

/// A client-side reference to a relationship in the remote graph.
///
/// Carries the relationship's identifier, its type label, the identifiers of
/// its two endpoint nodes, and a property snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct RelRef {
    /// Server-assigned relationship identifier.
    pub id: u64,
    /// Relationship type label (e.g. `"KNOWS"`).
    pub rel_type: String,
    /// Identifier of the start node.
    pub start: u64,
    /// Identifier of the end node.
    pub end: u64,
    /// Property snapshot at query time.
    pub properties: HashMap<String, Value>,
}

impl RelRef {
    /// Read a property and convert it, failing with
    /// [`MissingProperty`](NeorestError::MissingProperty) if absent.
    pub fn prop<T: FromValue>(&self, key: &str) -> Result<T, NeorestError> {
        match self.properties.get(key) {
            Some(v) => T::from_value(v.clone())
                .map_err(|e| e.with_context(format!("relationship {} property '{key}'", self.id))),
            None => Err(NeorestError::missing_property(
                key,
                &format!("relationship {}", self.id),
            )),
        }
    }
}

/// A traversal result: an alternating sequence of nodes and relationships.
///
/// Invariant: `nodes.len() == rels.len() + 1`. `nodes[i]` and `nodes[i + 1]`
/// are the endpoints of `rels[i]` (in either direction).
#[derive(Debug, Clone, PartialEq)]
pub struct Path {
    /// Ordered nodes along the path.
    pub nodes: Vec<NodeRef>,
    /// Relationships connecting consecutive nodes.
    pub rels: Vec<RelRef>,
}

impl Path {
    /// Number of relationships in the path.
    pub fn len(&self) -> usize {
        self.rels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rels.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Wire shapes
// ---------------------------------------------------------------------------

/// Extract the numeric identifier from an entity URI.
///
/// Entity representations carry a `self` URI whose last segment is the
/// identifier, e.g. `http://host:7474/db/data/node/17` → `17`. `what` names
/// the entity kind in the error message.
pub fn entity_id(uri: &str, what: &str) -> Result<u64, NeorestError> {
    uri.trim_end_matches('/')
        .rsplit('/')
        .next()
        .and_then(|tail| tail.parse::<u64>().ok())
        .ok_or_else(|| NeorestError::malformed(format!("{what} URI '{uri}' has no numeric id")))
}

fn uri_field<'a>(obj: &'a serde_json::Map<String, Json>, key: &str, what: &str) -> Result<&'a str, NeorestError> {
    match obj.get(key) {
        Some(Json::String(s)) => Ok(s),
        Some(_) => Err(NeorestError::malformed(format!("{what} field '{key}' is not a string"))),
        None => Err(NeorestError::malformed(format!("{what} is missing field '{key}'"))),
    }
}

fn is_node_shaped(raw: &Json) -> bool {
    matches!(raw, Json::Object(obj) if obj.contains_key("self") && !is_rel_shaped(raw))
}

fn is_rel_shaped(raw: &Json) -> bool {
    matches!(
        raw,
        Json::Object(obj)
            if obj.contains_key("self")
                && obj.contains_key("type")
                && obj.contains_key("start")
                && obj.contains_key("end")
    )
}

fn decode_properties(obj: &serde_json::Map<String, Json>, what: &str) -> Result<HashMap<String, Value>, NeorestError> {
    // "data" is required on every entity representation. A tagged object
    // without it is a malformed cell, which fails the whole call.
    let data = match obj.get("data") {
        Some(Json::Object(data)) => data,
        Some(_) => return Err(NeorestError::malformed(format!("{what} field 'data' is not an object"))),
        None => return Err(NeorestError::malformed(format!("{what} is missing field 'data'"))),
    };
    let mut out = HashMap::with_capacity(data.len());
    for (k, v) in data {
        out.insert(k.clone(), Value::decode(v)?);
    }
    Ok(out)
}

fn decode_node(raw: &Json) -> Result<NodeRef, NeorestError> {
    let obj = match raw {
        Json::Object(obj) => obj,
        _ => return Err(NeorestError::malformed("node cell is not an object")),
    };
    let id = entity_id(uri_field(obj, "self", "node")?, "node")?;
    let properties = decode_properties(obj, "node")?;
    Ok(NodeRef { id, properties })
}

fn decode_rel(raw: &Json) -> Result<RelRef, NeorestError> {
    let obj = match raw {
        Json::Object(obj) => obj,
        _ => return Err(NeorestError::malformed("relationship cell is not an object")),
    };
    let id = entity_id(uri_field(obj, "self", "relationship")?, "relationship")?;
    let rel_type = uri_field(obj, "type", "relationship")?.to_owned();
    let start = entity_id(uri_field(obj, "start", "relationship")?, "relationship start")?;
    let end = entity_id(uri_field(obj, "end", "relationship")?, "relationship end")?;
    let properties = decode_properties(obj, "relationship")?;
    Ok(RelRef { id, rel_type, start, end, properties })
}

// A path is an array of entity representations that strictly alternates
// node, relationship, node, ... with a node at both ends. Arrays that do
// not match (including a single-element entity array, e.g. from
// `collect(n)`) decode as plain lists.
fn is_path_shaped(items: &[Json]) -> bool {
    items.len() >= 3
        && items.len() % 2 == 1
        && items.iter().enumerate().all(|(i, item)| {
            if i % 2 == 0 {
                is_node_shaped(item)
            } else {
                is_rel_shaped(item)
            }
        })
}

impl Value {
    /// Decode one raw result cell into exactly one variant.
    ///
    /// Structural markers decide the variant: an object carrying a `self`
    /// URI is an entity reference (relationship when `type`/`start`/`end`
    /// are present, node otherwise); an array of strictly alternating
    /// entities is a [`Path`]; everything else maps to the corresponding
    /// scalar, list, or map variant. Unknown extra fields on any object are
    /// ignored — the wire schema is owned by the server and may grow.
    ///
    /// A tagged object missing a required sub-field fails with
    /// [`Malformed`](NeorestError::Malformed); it never decodes partially.
    pub fn decode(raw: &Json) -> Result<Value, NeorestError> {
        match raw {
            Json::Null => Ok(Value::Null),
            Json::Bool(b) => Ok(Value::Bool(*b)),
            Json::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Ok(Value::Integer(i))
                } else if let Some(f) = n.as_f64() {
                    Ok(Value::Float(f))
                } else {
                    Err(NeorestError::malformed(format!("unrepresentable number {n}")))
                }
            }
            Json::String(s) => Ok(Value::String(s.clone())),
            Json::Array(items) => {
                if is_path_shaped(items) {
                    let mut nodes = Vec::with_capacity(items.len() / 2 + 1);
                    let mut rels = Vec::with_capacity(items.len() / 2);
                    for (i, item) in items.iter().enumerate() {
                        if i % 2 == 0 {
                            nodes.push(decode_node(item)?);
                        } else {
                            rels.push(decode_rel(item)?);
                        }
                    }
                    Ok(Value::Path(Path { nodes, rels }))
                } else {
                    items
                        .iter()
                        .map(Value::decode)
                        .collect::<Result<Vec<_>, _>>()
                        .map(Value::List)
                }
            }
            Json::Object(obj) => {
                if is_rel_shaped(raw) {
                    Ok(Value::Relationship(decode_rel(raw)?))
                } else if obj.contains_key("self") {
                    Ok(Value::Node(decode_node(raw)?))
                } else {
                    let mut out = HashMap::with_capacity(obj.len());
                    for (k, v) in obj {
                        out.insert(k.clone(), Value::decode(v)?);
                    }
                    Ok(Value::Map(out))
                }
            }
        }
    }

    /// Serialize this value for the parameter side of the wire.
    ///
    /// Scalars, lists, and maps serialize naturally. [`Node`](Value::Node)
    /// and [`Relationship`](Value::Relationship) parameters bind as their
    /// numeric identifier, for `START`-style clauses that address entities
    /// by id. A [`Path`](Value::Path) has no parameter representation and
    /// is rejected as [`InvalidQuery`](NeorestError::InvalidQuery).
    pub fn into_json(self) -> Result<Json, NeorestError> {
        match self {
            Value::Null => Ok(Json::Null),
            Value::Bool(b) => Ok(Json::Bool(b)),
            Value::Integer(i) => Ok(Json::from(i)),
            Value::Float(f) => serde_json::Number::from_f64(f)
                .map(Json::Number)
                .ok_or_else(|| NeorestError::invalid_query(format!("non-finite float parameter {f}"))),
            Value::String(s) => Ok(Json::String(s)),
            Value::List(items) => items
                .into_iter()
                .map(Value::into_json)
                .collect::<Result<Vec<_>, _>>()
                .map(Json::Array),
            Value::Map(map) => {
                let mut out = serde_json::Map::with_capacity(map.len());
                for (k, v) in map {
                    out.insert(k, v.into_json()?);
                }
                Ok(Json::Object(out))
            }
            Value::Node(n) => Ok(Json::from(n.id)),
            Value::Relationship(r) => Ok(Json::from(r.id)),
            Value::Path(_) => Err(NeorestError::invalid_query(
                "path values cannot be used as query parameters",
            )),
        }
    }
}
