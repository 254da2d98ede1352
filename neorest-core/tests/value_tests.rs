use std::collections::HashMap;
use std::sync::Arc;

use serde_json::json;

use neorest_core::record::{Columns, Row};
use neorest_core::traits::{FromValue, IntoValue};
use neorest_core::value::{entity_id, NodeRef, Path, RelRef, Value};
use neorest_core::NeorestError;

fn node_json(id: u64, props: serde_json::Value) -> serde_json::Value {
    json!({
        "self": format!("http://localhost:7474/db/data/node/{id}"),
        "data": props,
        "traverse": format!("http://localhost:7474/db/data/node/{id}/traverse/{{returnType}}"),
    })
}

fn rel_json(id: u64, rel_type: &str, start: u64, end: u64, props: serde_json::Value) -> serde_json::Value {
    json!({
        "self": format!("http://localhost:7474/db/data/relationship/{id}"),
        "type": rel_type,
        "start": format!("http://localhost:7474/db/data/node/{start}"),
        "end": format!("http://localhost:7474/db/data/node/{end}"),
        "data": props,
    })
}

// --- Scalars ---

#[test]
fn test_decode_scalars() {
    assert_eq!(Value::decode(&json!(null)).unwrap(), Value::Null);
    assert_eq!(Value::decode(&json!(true)).unwrap(), Value::Bool(true));
    assert_eq!(Value::decode(&json!(42)).unwrap(), Value::Integer(42));
    assert_eq!(Value::decode(&json!(2.5)).unwrap(), Value::Float(2.5));
    assert_eq!(
        Value::decode(&json!("hello")).unwrap(),
        Value::String("hello".to_string())
    );
}

#[test]
fn test_decode_list_and_map() {
    let val = Value::decode(&json!([1, 2, 3])).unwrap();
    assert_eq!(
        val,
        Value::List(vec![Value::Integer(1), Value::Integer(2), Value::Integer(3)])
    );

    let val = Value::decode(&json!({"a": 1, "b": "two"})).unwrap();
    match val {
        Value::Map(m) => {
            assert_eq!(m.get("a"), Some(&Value::Integer(1)));
            assert_eq!(m.get("b"), Some(&Value::String("two".to_string())));
        }
        other => panic!("expected Map, got {other:?}"),
    }
}

// --- Entity references ---

#[test]
fn test_decode_node_reference() {
    let val = Value::decode(&node_json(17, json!({"name": "Alice"}))).unwrap();
    match val {
        Value::Node(n) => {
            assert_eq!(n.id, 17);
            assert_eq!(n.properties.get("name"), Some(&Value::String("Alice".to_string())));
        }
        other => panic!("expected Node, got {other:?}"),
    }
}

#[test]
fn test_decode_relationship_reference() {
    let val = Value::decode(&rel_json(5, "KNOWS", 1, 2, json!({"since": 2011}))).unwrap();
    match val {
        Value::Relationship(r) => {
            assert_eq!(r.id, 5);
            assert_eq!(r.rel_type, "KNOWS");
            assert_eq!(r.start, 1);
            assert_eq!(r.end, 2);
            assert_eq!(r.properties.get("since"), Some(&Value::Integer(2011)));
        }
        other => panic!("expected Relationship, got {other:?}"),
    }
}

#[test]
fn test_decode_tolerates_unknown_entity_fields() {
    let mut raw = node_json(3, json!({}));
    raw.as_object_mut()
        .unwrap()
        .insert("paged_traverse".to_string(), json!("http://..."));
    let val = Value::decode(&raw).unwrap();
    assert!(matches!(val, Value::Node(NodeRef { id: 3, .. })));
}

#[test]
fn test_decode_path() {
    let raw = json!([
        node_json(1, json!({"name": "Alice"})),
        rel_json(9, "KNOWS", 1, 2, json!({})),
        node_json(2, json!({"name": "Bob"})),
    ]);
    let val = Value::decode(&raw).unwrap();
    match val {
        Value::Path(p) => {
            assert_eq!(p.nodes.len(), 2);
            assert_eq!(p.rels.len(), 1);
            assert_eq!(p.len(), 1);
            assert_eq!(p.nodes[0].id, 1);
            assert_eq!(p.rels[0].id, 9);
            assert_eq!(p.nodes[1].id, 2);
        }
        other => panic!("expected Path, got {other:?}"),
    }
}

#[test]
fn test_entity_array_without_alternation_is_a_list() {
    // collect(n) returns a plain array of nodes, not a path
    let raw = json!([node_json(1, json!({})), node_json(2, json!({})), node_json(3, json!({}))]);
    let val = Value::decode(&raw).unwrap();
    match val {
        Value::List(items) => {
            assert_eq!(items.len(), 3);
            assert!(matches!(items[0], Value::Node(_)));
        }
        other => panic!("expected List, got {other:?}"),
    }
}

#[test]
fn test_single_entity_array_is_a_list() {
    let raw = json!([node_json(1, json!({}))]);
    let val = Value::decode(&raw).unwrap();
    assert!(matches!(val, Value::List(_)));
}

// --- Malformed cells ---

#[test]
fn test_node_without_data_is_malformed() {
    let raw = json!({"self": "http://localhost:7474/db/data/node/17"});
    let err = Value::decode(&raw).unwrap_err();
    assert!(matches!(err, NeorestError::Malformed(_)), "got: {err}");
}

#[test]
fn test_node_with_unparsable_id_is_malformed() {
    let raw = json!({"self": "http://localhost:7474/db/data/node/latest", "data": {}});
    let err = Value::decode(&raw).unwrap_err();
    assert!(matches!(err, NeorestError::Malformed(_)), "got: {err}");
}

#[test]
fn test_relationship_endpoint_not_a_string_is_malformed() {
    let raw = json!({
        "self": "http://localhost:7474/db/data/relationship/5",
        "type": "KNOWS",
        "start": 1,
        "end": "http://localhost:7474/db/data/node/2",
        "data": {},
    });
    let err = Value::decode(&raw).unwrap_err();
    assert!(matches!(err, NeorestError::Malformed(_)), "got: {err}");
}

#[test]
fn test_malformed_path_element_fails_whole_cell() {
    let raw = json!([
        node_json(1, json!({})),
        rel_json(9, "KNOWS", 1, 2, json!({})),
        {"self": "http://localhost:7474/db/data/node/2"},  // no data
    ]);
    let err = Value::decode(&raw).unwrap_err();
    assert!(matches!(err, NeorestError::Malformed(_)), "got: {err}");
}

// --- Idempotence ---

#[test]
fn test_decoding_is_idempotent_across_cell_kinds() {
    let raws = vec![
        json!(null),
        json!(42),
        json!(1.25),
        json!("text"),
        json!([1, "two", null]),
        json!({"k": [true]}),
        node_json(17, json!({"name": "Alice"})),
        rel_json(5, "KNOWS", 1, 2, json!({})),
        json!([node_json(1, json!({})), rel_json(9, "R", 1, 2, json!({})), node_json(2, json!({}))]),
    ];
    for raw in raws {
        assert_eq!(Value::decode(&raw).unwrap(), Value::decode(&raw).unwrap());
    }
}

// --- entity_id ---

#[test]
fn test_entity_id_parses_uri_tail() {
    assert_eq!(entity_id("http://localhost:7474/db/data/node/17", "node").unwrap(), 17);
    assert_eq!(entity_id("http://localhost:7474/db/data/node/17/", "node").unwrap(), 17);
    assert!(entity_id("http://localhost:7474/db/data/node", "node").is_err());
}

// --- FromValue conversions ---

#[test]
fn test_from_value_integer() {
    let res = i64::from_value(Value::Integer(42)).unwrap();
    assert_eq!(res, 42);
}

#[test]
fn test_from_value_string() {
    let res = String::from_value(Value::String("hello".to_string())).unwrap();
    assert_eq!(res, "hello");
}

#[test]
fn test_from_value_bool() {
    let res = bool::from_value(Value::Bool(true)).unwrap();
    assert!(res);
}

#[test]
fn test_from_value_list() {
    let val = Value::List(vec![Value::Integer(1), Value::Integer(2)]);
    let res = Vec::<i64>::from_value(val).unwrap();
    assert_eq!(res, vec![1, 2]);
}

#[test]
fn test_from_value_option() {
    let res = Option::<i64>::from_value(Value::Null).unwrap();
    assert_eq!(res, None);

    let res = Option::<i64>::from_value(Value::Integer(42)).unwrap();
    assert_eq!(res, Some(42));
}

#[test]
fn test_from_value_tuple() {
    let val = Value::List(vec![Value::String("Alice".to_string()), Value::Integer(30)]);
    let (name, age): (String, i64) = FromValue::from_value(val).unwrap();
    assert_eq!(name, "Alice");
    assert_eq!(age, 30);
}

#[test]
fn test_from_value_hashmap() {
    let mut m = HashMap::new();
    m.insert("a".to_string(), Value::Integer(1));
    m.insert("b".to_string(), Value::Integer(2));
    let res = HashMap::<String, i64>::from_value(Value::Map(m)).unwrap();
    assert_eq!(res.get("a"), Some(&1));
    assert_eq!(res.get("b"), Some(&2));
}

#[test]
fn test_type_mismatch_error() {
    let err = i64::from_value(Value::String("oops".to_string())).unwrap_err();
    match &err {
        NeorestError::TypeMismatch { expected, got, .. } => {
            assert_eq!(expected, "Integer");
            assert_eq!(got, "String");
        }
        other => panic!("expected TypeMismatch, got: {other}"),
    }
}

#[test]
fn test_node_prop_typed_access() {
    let raw = node_json(17, json!({"name": "Alice", "age": 30}));
    let node = NodeRef::from_value(Value::decode(&raw).unwrap()).unwrap();
    let name: String = node.prop("name").unwrap();
    let age: i64 = node.prop("age").unwrap();
    assert_eq!(name, "Alice");
    assert_eq!(age, 30);

    let err = node.prop::<String>("email").unwrap_err();
    match &err {
        NeorestError::MissingProperty { property, entity } => {
            assert_eq!(property, "email");
            assert_eq!(entity, "node 17");
        }
        other => panic!("expected MissingProperty, got: {other}"),
    }
}

#[test]
fn test_rel_from_value_mismatch() {
    let err = RelRef::from_value(Value::Integer(1)).unwrap_err();
    assert!(matches!(err, NeorestError::TypeMismatch { .. }));
}

#[test]
fn test_path_from_value() {
    let raw = json!([
        node_json(1, json!({})),
        rel_json(9, "KNOWS", 1, 2, json!({})),
        node_json(2, json!({})),
    ]);
    let path = Path::from_value(Value::decode(&raw).unwrap()).unwrap();
    assert_eq!(path.nodes.len(), path.rels.len() + 1);
}

// --- Parameter direction ---

#[test]
fn test_into_json_scalars() {
    assert_eq!(42_i64.into_value().into_json().unwrap(), json!(42));
    assert_eq!("Alice".into_value().into_json().unwrap(), json!("Alice"));
    assert_eq!(true.into_value().into_json().unwrap(), json!(true));
    assert_eq!(Option::<i64>::None.into_value().into_json().unwrap(), json!(null));
    assert_eq!(
        vec![1_i64, 2].into_value().into_json().unwrap(),
        json!([1, 2])
    );
}

#[test]
fn test_entity_params_bind_as_ids() {
    let node = NodeRef { id: 17, properties: HashMap::new() };
    assert_eq!(node.into_value().into_json().unwrap(), json!(17));
}

#[test]
fn test_path_param_is_invalid() {
    let path = Value::Path(Path { nodes: vec![], rels: vec![] });
    let err = path.into_json().unwrap_err();
    assert!(matches!(err, NeorestError::InvalidQuery(_)), "got: {err}");
}

#[test]
fn test_non_finite_float_param_is_invalid() {
    let err = Value::Float(f64::NAN).into_json().unwrap_err();
    assert!(matches!(err, NeorestError::InvalidQuery(_)));
}

// --- Rows ---

#[test]
fn test_row_access_by_name_and_ordinal() {
    let columns = Arc::new(Columns::new(vec!["name".to_string(), "age".to_string()]));
    let row = Row::decode(columns, &json!(["Alice", 30])).unwrap();
    assert_eq!(row.len(), 2);
    assert_eq!(row.get("name"), Some(&Value::String("Alice".to_string())));
    assert_eq!(row.get_index(1), Some(&Value::Integer(30)));
    assert_eq!(row.get("missing"), None);

    let age: i64 = row.get_as("age").unwrap();
    assert_eq!(age, 30);
    let err = row.get_as::<i64>("missing").unwrap_err();
    assert!(matches!(err, NeorestError::MissingColumn { .. }));
}

#[test]
fn test_row_length_mismatch_is_malformed() {
    let columns = Arc::new(Columns::new(vec!["a".to_string(), "b".to_string()]));
    let err = Row::decode(columns, &json!(["only one"])).unwrap_err();
    assert!(matches!(err, NeorestError::Malformed(_)), "got: {err}");
}

#[test]
fn test_row_conversion_error_carries_column_context() {
    let columns = Arc::new(Columns::new(vec!["age".to_string()]));
    let row = Row::decode(columns, &json!(["not a number"])).unwrap();
    let err = row.get_as::<i64>("age").unwrap_err();
    assert!(err.to_string().contains("column 'age'"), "got: {err}");
}
