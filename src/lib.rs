#![doc = r#"
A Rust client for REST-speaking Cypher graph databases.

`neorest` talks to a remote graph database over its JSON/HTTP interface:
create nodes and relationships, run parameterized Cypher, and get typed
Rust values back — nodes, relationships, paths, and scalars.

# Quick start

## Connect and create entities

```rust,no_run
use neorest::prelude::*;

# async fn example() -> Result<(), NeorestError> {
let graph = Graph::connect("http://localhost:7474/db/data").await?;

let alice = graph.create_node(vec![("name", "Alice")]).await?;
let bob = graph.create_node(vec![("name", "Bob")]).await?;
let knows = graph
    .create_relationship(alice.id, "KNOWS", bob.id, Vec::<(String, String)>::new())
    .await?;
# Ok(())
# }
```

## Run queries

Parameters use `{name}` placeholders; every placeholder must be bound
before the query is sent, or the call fails locally with
[`InvalidQuery`](NeorestError::InvalidQuery):

```rust,no_run
use neorest::prelude::*;

# async fn example(graph: &Graph) -> Result<(), NeorestError> {
// All rows at once, mapped by column ordinal:
let names: Vec<(String, i64)> = cypher("START n=node(*) RETURN n.name, n.age")
    .fetch_all(graph)
    .await?;

// Exactly one row (error if empty):
let (total,): (i64,) = cypher("START n=node(*) RETURN count(n)")
    .fetch_one(graph)
    .await?;

// Zero or one row:
let found: Option<(NodeRef,)> = cypher("START n=node({id}) RETURN n")
    .param("id", 17_i64)
    .fetch_optional(graph)
    .await?;
# Ok(())
# }
```

## Per-row dispatch

Supply a row handler instead of collecting. Rows arrive strictly in server
order; returning `ControlFlow::Break` cancels the remainder:

```rust,no_run
use std::ops::ControlFlow;
use neorest::prelude::*;

# async fn example(graph: &Graph) -> Result<(), NeorestError> {
cypher("START n=node(*) RETURN n")
    .for_each(graph, |row| {
        let node: NodeRef = match row.get_as("n") {
            Ok(n) => n,
            Err(_) => return ControlFlow::Break(()),
        };
        println!("node {}", node.id);
        ControlFlow::Continue(())
    })
    .await?;
# Ok(())
# }
```

Or consume the lazy [`RowStream`] directly — rows are decoded one at a
time as you iterate.

# Typed cells

Every result cell decodes into one [`Value`] variant:

| Wire shape | `Value` variant | Rust types via [`FromValue`] |
|------------|-----------------|------------------------------|
| null | `Null` | `Option<T>` |
| boolean | `Bool` | `bool` |
| whole number | `Integer` | `i64`, `i32`, `u64`, `u32`, ... |
| other number | `Float` | `f64`, `f32` |
| string | `String` | `String` |
| array | `List` | `Vec<T>`, `(A, B)`, `(A, B, C)` |
| object | `Map` | `HashMap<String, V>` |
| object with `self` URI | `Node` | [`NodeRef`] |
| object with `self` + `type`/`start`/`end` | `Relationship` | [`RelRef`] |
| array alternating node/relationship | `Path` | [`Path`] |

Unknown extra fields in any server payload are tolerated; the wire schema
is owned by the server and may grow.

# Error handling

All operations return [`NeorestError`]. The taxonomy keeps failure causes
apart: [`InvalidQuery`](NeorestError::InvalidQuery) (your query, rejected
before transmission), [`Remote`](NeorestError::Remote) (the server's
status and message, verbatim), [`Malformed`](NeorestError::Malformed)
(the response broke the wire contract),
[`Transport`](NeorestError::Transport) (no answer at all), and
[`Cancelled`](NeorestError::Cancelled) (you stopped dispatch). A failure
aborts the whole call; there are no partial results and no retries.
"#]

pub mod geoff;
pub mod prelude;
pub mod rest;
pub mod graph;
pub mod query;
pub mod stream;

pub use neorest_core as core;

pub use neorest_core::error::NeorestError;
pub use neorest_core::record::{Columns, Row};
pub use neorest_core::traits::{FromRow, FromValue, IntoValue, ToParams};
pub use neorest_core::value::{NodeRef, Path, RelRef, Value};

pub use graph::Graph;
pub use query::{cypher, CypherQuery};
pub use rest::{Resource, RestResponse};
pub use stream::RowStream;
