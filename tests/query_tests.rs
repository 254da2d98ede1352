use std::ops::ControlFlow;

use serde_json::json;

use neorest::prelude::*;

fn node_json(id: u64, props: serde_json::Value) -> serde_json::Value {
    json!({
        "self": format!("http://localhost:7474/db/data/node/{id}"),
        "data": props,
    })
}

// --- Request building & validation ---

#[test]
fn test_request_body_carries_query_and_params() {
    let body = cypher("RETURN {x} AS val")
        .param("x", 42_i64)
        .request_body()
        .unwrap();
    assert_eq!(body, json!({"query": "RETURN {x} AS val", "params": {"x": 42}}));
}

#[test]
fn test_empty_statement_is_invalid_query() {
    let err = cypher("   ").request_body().unwrap_err();
    assert!(matches!(err, NeorestError::InvalidQuery(_)), "got: {err}");
}

#[test]
fn test_unbound_placeholder_is_invalid_query() {
    let err = cypher("START n=node({id}) RETURN n").request_body().unwrap_err();
    match &err {
        NeorestError::InvalidQuery(msg) => assert!(msg.contains("{id}"), "got: {msg}"),
        other => panic!("expected InvalidQuery, got: {other}"),
    }
}

#[test]
fn test_no_placeholders_with_empty_params_is_valid() {
    let body = cypher("START n=node(*) RETURN n").request_body().unwrap();
    assert_eq!(body["params"], json!({}));
}

#[test]
fn test_params_from_binds_in_bulk() {
    let body = cypher("START n=node({id}) WHERE n.name = {name} RETURN n")
        .params_from(vec![("id", 17.into_value()), ("name", "Alice".into_value())])
        .request_body()
        .unwrap();
    assert_eq!(body["params"], json!({"id": 17, "name": "Alice"}));
}

#[test]
fn test_quoted_placeholder_needs_no_binding() {
    // string literals cannot introduce placeholders
    let body = cypher("RETURN '{x}' AS literal").request_body().unwrap();
    assert_eq!(body["params"], json!({}));

    let body = cypher(r#"RETURN "{x}" AS literal"#).request_body().unwrap();
    assert_eq!(body["params"], json!({}));
}

#[test]
fn test_map_literal_only_needs_inner_placeholder() {
    let body = cypher("CREATE (n {name: {n}}) RETURN n")
        .param("n", "Alice")
        .request_body()
        .unwrap();
    assert_eq!(body["params"], json!({"n": "Alice"}));
}

#[test]
fn test_repeated_placeholder_needs_one_binding() {
    let body = cypher("START a=node({id}), b=node({id}) RETURN a, b")
        .param("id", 17_i64)
        .request_body()
        .unwrap();
    assert_eq!(body["params"], json!({"id": 17}));
}

#[test]
fn test_non_identifier_brace_groups_are_not_placeholders() {
    // digits-first and empty groups never name a parameter
    let body = cypher("RETURN {1} AS one, {} AS nothing")
        .request_body()
        .unwrap();
    assert_eq!(body["params"], json!({}));
}

// --- Result decoding ---

#[test]
fn test_scalar_round_trip() {
    // RETURN {x} AS val with {x: 42}
    let stream = RowStream::from_payload(json!({"columns": ["val"], "data": [[42]]})).unwrap();
    let rows = stream.collect_rows().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].get("val"), Some(&Value::Integer(42)));
}

#[test]
fn test_node_reference_round_trip() {
    let payload = json!({
        "columns": ["n"],
        "data": [[node_json(17, json!({"name": "Alice"}))]],
    });
    let rows = RowStream::from_payload(payload).unwrap().collect_rows().unwrap();
    let node: NodeRef = rows[0].get_as("n").unwrap();
    assert_eq!(node.id, 17);
    assert_eq!(node.prop::<String>("name").unwrap(), "Alice");
}

#[test]
fn test_empty_columns_and_rows_is_a_valid_empty_result() {
    let stream = RowStream::from_payload(json!({"columns": [], "data": []})).unwrap();
    assert!(stream.columns().is_empty());
    assert_eq!(stream.collect_rows().unwrap(), Vec::<Row>::new());
}

#[test]
fn test_zero_rows_with_columns_is_empty_not_an_error() {
    let stream =
        RowStream::from_payload(json!({"columns": ["name", "age"], "data": []})).unwrap();
    assert_eq!(stream.columns().names(), ["name", "age"]);
    assert!(stream.collect_rows().unwrap().is_empty());
}

#[test]
fn test_rows_preserve_arrival_order() {
    let payload = json!({
        "columns": ["i"],
        "data": [[0], [1], [2], [3], [4]],
    });
    let rows = RowStream::from_payload(payload).unwrap().collect_rows().unwrap();
    let seen: Vec<i64> = rows.iter().map(|r| r.get_as("i").unwrap()).collect();
    assert_eq!(seen, vec![0, 1, 2, 3, 4]);
}

#[test]
fn test_row_length_mismatch_fails_with_malformed() {
    let payload = json!({
        "columns": ["a", "b"],
        "data": [["x", 1], ["y"]],
    });
    let err = RowStream::from_payload(payload).unwrap().collect_rows().unwrap_err();
    assert!(matches!(err, NeorestError::Malformed(_)), "got: {err}");
}

#[test]
fn test_missing_columns_field_is_malformed() {
    let err = RowStream::from_payload(json!({"data": []})).unwrap_err();
    assert!(matches!(err, NeorestError::Malformed(_)), "got: {err}");
}

#[test]
fn test_unknown_payload_fields_are_tolerated() {
    let payload = json!({
        "columns": ["n"],
        "data": [[1]],
        "plan": {"operator": "AllNodesScan"},
        "stats": {"rows": 1},
    });
    let rows = RowStream::from_payload(payload).unwrap().collect_rows().unwrap();
    assert_eq!(rows.len(), 1);
}

#[test]
fn test_payload_decoding_is_idempotent() {
    let payload = json!({
        "columns": ["n", "k"],
        "data": [
            [node_json(17, json!({"name": "Alice"})), "x"],
            [node_json(18, json!({"name": "Bob"})), "y"],
        ],
    });
    let first = RowStream::from_payload(payload.clone()).unwrap().collect_rows().unwrap();
    let second = RowStream::from_payload(payload).unwrap().collect_rows().unwrap();
    assert_eq!(first, second);
}

// --- Row dispatch ---

#[test]
fn test_dispatch_invokes_handler_once_per_row_in_order() {
    let payload = json!({"columns": ["i"], "data": [[10], [20], [30]]});
    let mut seen = Vec::new();
    RowStream::from_payload(payload)
        .unwrap()
        .dispatch(|row| {
            seen.push(row.get_as::<i64>("i").unwrap());
            ControlFlow::Continue(())
        })
        .unwrap();
    assert_eq!(seen, vec![10, 20, 30]);
}

#[test]
fn test_dispatch_on_empty_result_never_invokes_handler() {
    let payload = json!({"columns": ["i"], "data": []});
    let mut calls = 0;
    RowStream::from_payload(payload)
        .unwrap()
        .dispatch(|_| {
            calls += 1;
            ControlFlow::Continue(())
        })
        .unwrap();
    assert_eq!(calls, 0);
}

#[test]
fn test_dispatch_break_surfaces_cancelled_and_stops() {
    let payload = json!({"columns": ["i"], "data": [[1], [2], [3], [4]]});
    let mut seen = Vec::new();
    let err = RowStream::from_payload(payload)
        .unwrap()
        .dispatch(|row| {
            let i: i64 = row.get_as("i").unwrap();
            seen.push(i);
            if i == 2 {
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            }
        })
        .unwrap_err();
    assert!(matches!(err, NeorestError::Cancelled), "got: {err}");
    assert_eq!(seen, vec![1, 2]);
}

#[test]
fn test_dispatch_stops_on_malformed_row_without_invoking_handler_for_it() {
    let payload = json!({
        "columns": ["n"],
        "data": [[1], [{"self": "http://localhost:7474/db/data/node/9"}]],
    });
    let mut seen = 0;
    let err = RowStream::from_payload(payload)
        .unwrap()
        .dispatch(|_| {
            seen += 1;
            ControlFlow::Continue(())
        })
        .unwrap_err();
    assert!(matches!(err, NeorestError::Malformed(_)), "got: {err}");
    assert_eq!(seen, 1);
}

#[test]
fn test_stream_decodes_lazily() {
    let payload = json!({
        "columns": ["n"],
        "data": [[1], [{"self": "bad"}], [3]],
    });
    let mut stream = RowStream::from_payload(payload).unwrap();
    assert_eq!(stream.remaining(), 3);
    assert!(stream.next().unwrap().is_ok());
    assert!(stream.next().unwrap().is_err());
    assert_eq!(stream.remaining(), 1);
}

// --- Typed row mapping ---

#[test]
fn test_tuple_from_row_by_ordinal() {
    let payload = json!({
        "columns": ["name", "age"],
        "data": [["Alice", 30], ["Bob", 25]],
    });
    let rows = RowStream::from_payload(payload).unwrap().collect_rows().unwrap();
    let typed: Vec<(String, i64)> = rows
        .iter()
        .map(|r| FromRow::from_row(r).unwrap())
        .collect();
    assert_eq!(typed, vec![("Alice".to_string(), 30), ("Bob".to_string(), 25)]);
}

#[test]
fn test_optional_cell_maps_to_none() {
    let payload = json!({"columns": ["age"], "data": [[null]]});
    let rows = RowStream::from_payload(payload).unwrap().collect_rows().unwrap();
    let age: Option<i64> = rows[0].get_as("age").unwrap();
    assert_eq!(age, None);
}
