
//! Conversion traits between [`Value`] cells, rows, and Rust types.
//!
//! [`FromValue`] is the core conversion primitive for single cells,
//! [`FromRow`] maps whole rows, and [`IntoValue`]/[`ToParams`] cover the
//! parameter-binding direction.

use std::collections::HashMap;

use crate::error::NeorestError;
use crate::record::Row;
use crate::value::{type_name, NodeRef, Path, RelRef, Value};

/// Converts a single result cell into a Rust type.
///
/// Implementations exist for primitives, collections, tuples, and the
/// entity reference types. See the [crate-level docs](crate) for the full
/// table.
pub trait FromValue: Sized {
    /// Convert a [`Value`] into `Self`.
    fn from_value(value: Value) -> Result<Self, NeorestError>;
}

/// Converts a Rust value into a [`Value`] for use as a query parameter.
///
/// Entity references bind as their numeric identifier when the query is
/// serialized; see [`Value::into_json`].
pub trait IntoValue {
    /// Convert `self` into a [`Value`].
    fn into_value(self) -> Value;
}

/// Converts a bundle of named parameters into a parameter map.
///
/// Use with `CypherQuery::params_from` to bind several parameters in a
/// single call. Implemented for maps and `(name, value)` pair lists.
pub trait ToParams {
    /// Convert `self` into a map of parameter name → value.
    fn to_params(self) -> HashMap<String, Value>;
}

/// Maps a whole result row into a Rust type.
///
/// Implemented for [`Row`] itself (identity) and for tuples of up to four
/// [`FromValue`] types, matched by column ordinal.
pub trait FromRow: Sized {
    /// Convert a [`Row`] into `Self`.
    fn from_row(row: &Row) -> Result<Self, NeorestError>;
}

// ---------------------------------------------------------------------------
// Numeric macro
// ---------------------------------------------------------------------------

macro_rules! impl_from_val_num {
    ($t:ty, $pat:ident) => {
        impl FromValue for $t {
            fn from_value(value: Value) -> Result<Self, NeorestError> {
                match value {
                    Value::$pat(v) => Ok(v as $t),
                    other => Err(NeorestError::type_mismatch(
                        stringify!($pat),
                        type_name(&other),
                        stringify!($t),
                    )),
                }
            }
        }
    };
}

// ---------------------------------------------------------------------------
// Primitives
// ---------------------------------------------------------------------------

impl FromValue for String {
    fn from_value(value: Value) -> Result<Self, NeorestError> {
        match value {
            Value::String(s) => Ok(s),
            other => Err(NeorestError::type_mismatch("String", type_name(&other), "String")),
        }
    }
}

impl FromValue for bool {
    fn from_value(value: Value) -> Result<Self, NeorestError> {
        match value {
            Value::Bool(b) => Ok(b),
            other => Err(NeorestError::type_mismatch("Boolean", type_name(&other), "bool")),
        }
    }
}

impl FromValue for Value {
    fn from_value(value: Value) -> Result<Self, NeorestError> {
        Ok(value)
    }
}

impl_from_val_num!(i64, Integer);
impl_from_val_num!(i32, Integer);
impl_from_val_num!(u64, Integer);
impl_from_val_num!(u32, Integer);
impl_from_val_num!(i16, Integer);
impl_from_val_num!(u16, Integer);
impl_from_val_num!(i8, Integer);
impl_from_val_num!(u8, Integer);
impl_from_val_num!(f64, Float);
impl_from_val_num!(f32, Float);

// ---------------------------------------------------------------------------
// Collections
// ---------------------------------------------------------------------------

impl<T: FromValue> FromValue for Vec<T> {
    fn from_value(value: Value) -> Result<Self, NeorestError> {
        match value {
            Value::List(xs) => xs.into_iter().map(T::from_value).collect(),
            other => Err(NeorestError::type_mismatch("List", type_name(&other), "Vec<T>")),
        }
    }
}

/// `Option<T>` is the null-tolerance primitive: a present-but-`null` cell
/// maps to `None`, anything else to `Some(T)`.
impl<T: FromValue> FromValue for Option<T> {
    fn from_value(value: Value) -> Result<Self, NeorestError> {
        match value {
            Value::Null => Ok(None),
            other => Ok(Some(T::from_value(other)?)),
        }
    }
}

impl<V: FromValue> FromValue for HashMap<String, V> {
    fn from_value(value: Value) -> Result<Self, NeorestError> {
        match value {
            Value::Map(m) => {
                let mut out = HashMap::with_capacity(m.len());
                for (k, v) in m {
                    out.insert(k, V::from_value(v)?);
                }
                Ok(out)
            }
            other => Err(NeorestError::type_mismatch("Map", type_name(&other), "HashMap<String, V>")),
        }
    }
}

// ---------------------------------------------------------------------------
// Entity references
// ---------------------------------------------------------------------------

impl FromValue for NodeRef {
    fn from_value(value: Value) -> Result<Self, NeorestError> {
        match value {
            Value::Node(n) => Ok(n),
            other => Err(NeorestError::type_mismatch("Node", type_name(&other), "NodeRef")),
        }
    }
}

impl FromValue for RelRef {
    fn from_value(value: Value) -> Result<Self, NeorestError> {
        match value {
            Value::Relationship(r) => Ok(r),
            other => Err(NeorestError::type_mismatch("Relationship", type_name(&other), "RelRef")),
        }
    }
}

impl FromValue for Path {
    fn from_value(value: Value) -> Result<Self, NeorestError> {
        match value {
            Value::Path(p) => Ok(p),
            other => Err(NeorestError::type_mismatch("Path", type_name(&other), "Path")),
        }
    }
}

// ---------------------------------------------------------------------------
// Tuples — for common list shapes (e.g. pair unpacking)
// ---------------------------------------------------------------------------

impl<A: FromValue, B: FromValue> FromValue for (A, B) {
    fn from_value(value: Value) -> Result<Self, NeorestError> {
        match value {
            Value::List(mut xs) if xs.len() == 2 => {
                let b = xs.pop().unwrap();
                let a = xs.pop().unwrap();
                Ok((A::from_value(a)?, B::from_value(b)?))
            }
            other => Err(NeorestError::type_mismatch("List[2]", type_name(&other), "tuple(A, B)")),
        }
    }
}

impl<A: FromValue, B: FromValue, C: FromValue> FromValue for (A, B, C) {
    fn from_value(value: Value) -> Result<Self, NeorestError> {
        match value {
            Value::List(mut xs) if xs.len() == 3 => {
                let c = xs.pop().unwrap();
                let b = xs.pop().unwrap();
                let a = xs.pop().unwrap();
                Ok((A::from_value(a)?, B::from_value(b)?, C::from_value(c)?))
            }
            other => Err(NeorestError::type_mismatch("List[3]", type_name(&other), "tuple(A, B, C)")),
        }
    }
}

// ---------------------------------------------------------------------------
// IntoValue
// ---------------------------------------------------------------------------

macro_rules! impl_into_val {
    ($t:ty, $pat:ident) => {
        impl IntoValue for $t {
            fn into_value(self) -> Value {
                Value::$pat(self.into())
            }
        }
    };
}

impl_into_val!(bool, Bool);
impl_into_val!(i64, Integer);
impl_into_val!(i32, Integer);
impl_into_val!(i16, Integer);
impl_into_val!(i8, Integer);
impl_into_val!(u32, Integer);
impl_into_val!(u16, Integer);
impl_into_val!(u8, Integer);
impl_into_val!(f64, Float);
impl_into_val!(String, String);

impl IntoValue for f32 {
    fn into_value(self) -> Value {
        Value::Float(f64::from(self))
    }
}

impl IntoValue for &str {
    fn into_value(self) -> Value {
        Value::String(self.to_owned())
    }
}

impl IntoValue for Value {
    fn into_value(self) -> Value {
        self
    }
}

impl IntoValue for NodeRef {
    fn into_value(self) -> Value {
        Value::Node(self)
    }
}

impl IntoValue for RelRef {
    fn into_value(self) -> Value {
        Value::Relationship(self)
    }
}

impl<T: IntoValue> IntoValue for Option<T> {
    fn into_value(self) -> Value {
        match self {
            Some(v) => v.into_value(),
            None => Value::Null,
        }
    }
}

impl<T: IntoValue> IntoValue for Vec<T> {
    fn into_value(self) -> Value {
        Value::List(self.into_iter().map(IntoValue::into_value).collect())
    }
}

impl<V: IntoValue> IntoValue for HashMap<String, V> {
    fn into_value(self) -> Value {
        Value::Map(self.into_iter().map(|(k, v)| (k, v.into_value())).collect())
    }
}

// ---------------------------------------------------------------------------
// ToParams
// ---------------------------------------------------------------------------

impl<V: IntoValue> ToParams for HashMap<String, V> {
    fn to_params(self) -> HashMap<String, Value> {
        self.into_iter().map(|(k, v)| (k, v.into_value())).collect()
    }
}

impl<K: Into<String>, V: IntoValue> ToParams for Vec<(K, V)> {
    fn to_params(self) -> HashMap<String, Value> {
        self.into_iter().map(|(k, v)| (k.into(), v.into_value())).collect()
    }
}

// ---------------------------------------------------------------------------
// FromRow
// ---------------------------------------------------------------------------

impl FromRow for Row {
    fn from_row(row: &Row) -> Result<Self, NeorestError> {
        Ok(row.clone())
    }
}

impl<A: FromValue> FromRow for (A,) {
    fn from_row(row: &Row) -> Result<Self, NeorestError> {
        Ok((row.get_index_as(0)?,))
    }
}

impl<A: FromValue, B: FromValue> FromRow for (A, B) {
    fn from_row(row: &Row) -> Result<Self, NeorestError> {
        Ok((row.get_index_as(0)?, row.get_index_as(1)?))
    }
}

impl<A: FromValue, B: FromValue, C: FromValue> FromRow for (A, B, C) {
    fn from_row(row: &Row) -> Result<Self, NeorestError> {
        Ok((row.get_index_as(0)?, row.get_index_as(1)?, row.get_index_as(2)?))
    }
}

impl<A: FromValue, B: FromValue, C: FromValue, D: FromValue> FromRow for (A, B, C, D) {
    fn from_row(row: &Row) -> Result<Self, NeorestError> {
        Ok((
            row.get_index_as(0)?,
            row.get_index_as(1)?,
            row.get_index_as(2)?,
            row.get_index_as(3)?,
        ))
    }
}
