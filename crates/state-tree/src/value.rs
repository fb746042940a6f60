//! The state value model.
//!
//! A state tree is built from [`StateValue`]s. Records and arrays are
//! reference-counted, so cloning a value is cheap and two trees can share
//! any subtree by pointer. "Absent" is modelled as `Option::None`: a missing
//! record key, an out-of-range or unfilled array slot, or a path that cannot
//! be walked.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use serde_json::{Map, Number, Value};
use state_tree_path::parse_array_index;

/// Record contents. Insertion order is kept but carries no meaning.
pub type Record = IndexMap<String, StateValue>;

/// Array contents. `None` slots are holes left by writes past the end.
pub type Array = Vec<Option<StateValue>>;

#[derive(Clone)]
pub enum StateValue {
    Null,
    Bool(bool),
    Number(f64),
    BigInt(i128),
    String(Arc<str>),
    Record(Arc<Record>),
    Array(Arc<Array>),
    /// Any host value that is not traversable (callbacks, handles, ...).
    Opaque(Arc<dyn Any + Send + Sync>),
}

impl StateValue {
    pub fn empty_record() -> Self {
        StateValue::Record(Arc::new(Record::new()))
    }

    pub fn record<I, K>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, StateValue)>,
        K: Into<String>,
    {
        StateValue::Record(Arc::new(
            entries.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        ))
    }

    pub fn array<I>(items: I) -> Self
    where
        I: IntoIterator<Item = StateValue>,
    {
        StateValue::Array(Arc::new(items.into_iter().map(Some).collect()))
    }

    pub fn opaque<T: Any + Send + Sync>(value: T) -> Self {
        StateValue::Opaque(Arc::new(value))
    }

    /// Human-readable label for the variant, used in error messages.
    pub fn type_label(&self) -> &'static str {
        match self {
            StateValue::Null => "null",
            StateValue::Bool(_) => "boolean",
            StateValue::Number(_) => "number",
            StateValue::BigInt(_) => "bigint",
            StateValue::String(_) => "string",
            StateValue::Record(_) => "record",
            StateValue::Array(_) => "array",
            StateValue::Opaque(_) => "opaque",
        }
    }

    pub fn is_record(&self) -> bool {
        matches!(self, StateValue::Record(_))
    }

    pub fn as_record(&self) -> Option<&Record> {
        match self {
            StateValue::Record(record) => Some(&**record),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&Array> {
        match self {
            StateValue::Array(items) => Some(&**items),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            StateValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            StateValue::String(s) => Some(&**s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            StateValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Reference equality, the change detector of the store.
    ///
    /// Containers and opaque values compare by pointer. Scalars compare by
    /// value, except that `NaN` never equals itself.
    pub fn same(&self, other: &StateValue) -> bool {
        match (self, other) {
            (StateValue::Null, StateValue::Null) => true,
            (StateValue::Bool(a), StateValue::Bool(b)) => a == b,
            (StateValue::Number(a), StateValue::Number(b)) => a == b,
            (StateValue::BigInt(a), StateValue::BigInt(b)) => a == b,
            (StateValue::String(a), StateValue::String(b)) => a == b,
            (StateValue::Record(a), StateValue::Record(b)) => Arc::ptr_eq(a, b),
            (StateValue::Array(a), StateValue::Array(b)) => Arc::ptr_eq(a, b),
            (StateValue::Opaque(a), StateValue::Opaque(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }

    /// The direct child under `segment`. Array segments that are not valid
    /// indices read as absent.
    pub fn child(&self, segment: &str) -> Option<&StateValue> {
        match self {
            StateValue::Record(record) => record.get(segment),
            StateValue::Array(items) => {
                let index = parse_array_index(segment)?;
                items.get(index).and_then(Option::as_ref)
            }
            _ => None,
        }
    }

    /// Walks `path` from this value.
    pub fn get_in(&self, path: &[String]) -> Option<&StateValue> {
        let mut cur = self;
        for segment in path {
            cur = cur.child(segment)?;
        }
        Some(cur)
    }

    /// Converts to JSON. Holes and opaque values become `null`; a big
    /// integer outside the 64-bit range becomes a decimal string.
    pub fn to_json(&self) -> Value {
        match self {
            StateValue::Null | StateValue::Opaque(_) => Value::Null,
            StateValue::Bool(b) => Value::Bool(*b),
            StateValue::Number(n) => number_to_json(*n),
            StateValue::BigInt(n) => {
                if let Ok(i) = i64::try_from(*n) {
                    Value::from(i)
                } else if let Ok(u) = u64::try_from(*n) {
                    Value::from(u)
                } else {
                    Value::String(n.to_string())
                }
            }
            StateValue::String(s) => Value::String(s.to_string()),
            StateValue::Record(record) => Value::Object(
                record
                    .iter()
                    .map(|(k, v)| (k.clone(), v.to_json()))
                    .collect::<Map<String, Value>>(),
            ),
            StateValue::Array(items) => Value::Array(
                items
                    .iter()
                    .map(|item| item.as_ref().map_or(Value::Null, StateValue::to_json))
                    .collect(),
            ),
        }
    }
}

fn number_to_json(n: f64) -> Value {
    // 2^53: integral floats below this are exact as i64
    const MAX_SAFE: f64 = 9_007_199_254_740_992.0;
    if n.fract() == 0.0 && n.abs() < MAX_SAFE {
        return Value::from(n as i64);
    }
    Number::from_f64(n).map_or(Value::Null, Value::Number)
}

impl fmt::Debug for StateValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StateValue::Null => write!(f, "null"),
            StateValue::Bool(b) => write!(f, "{b}"),
            StateValue::Number(n) => write!(f, "{n}"),
            StateValue::BigInt(n) => write!(f, "{n}n"),
            StateValue::String(s) => write!(f, "{s:?}"),
            StateValue::Record(record) => f.debug_map().entries(record.iter()).finish(),
            StateValue::Array(items) => f.debug_list().entries(items.iter()).finish(),
            StateValue::Opaque(_) => write!(f, "<opaque>"),
        }
    }
}

/// Structural equality. Opaque values compare by pointer.
impl PartialEq for StateValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (StateValue::Record(a), StateValue::Record(b)) => Arc::ptr_eq(a, b) || a == b,
            (StateValue::Array(a), StateValue::Array(b)) => Arc::ptr_eq(a, b) || a == b,
            _ => self.same(other),
        }
    }
}

impl From<Value> for StateValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => StateValue::Null,
            Value::Bool(b) => StateValue::Bool(b),
            Value::Number(n) => StateValue::Number(n.as_f64().unwrap_or(f64::NAN)),
            Value::String(s) => StateValue::String(s.into()),
            Value::Array(items) => StateValue::array(items.into_iter().map(StateValue::from)),
            Value::Object(map) => {
                StateValue::record(map.into_iter().map(|(k, v)| (k, StateValue::from(v))))
            }
        }
    }
}

impl From<bool> for StateValue {
    fn from(b: bool) -> Self {
        StateValue::Bool(b)
    }
}

impl From<f64> for StateValue {
    fn from(n: f64) -> Self {
        StateValue::Number(n)
    }
}

impl From<i32> for StateValue {
    fn from(n: i32) -> Self {
        StateValue::Number(f64::from(n))
    }
}

impl From<i64> for StateValue {
    fn from(n: i64) -> Self {
        StateValue::Number(n as f64)
    }
}

impl From<i128> for StateValue {
    fn from(n: i128) -> Self {
        StateValue::BigInt(n)
    }
}

impl From<&str> for StateValue {
    fn from(s: &str) -> Self {
        StateValue::String(s.into())
    }
}

impl From<String> for StateValue {
    fn from(s: String) -> Self {
        StateValue::String(s.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn p(segments: &[&str]) -> Vec<String> {
        segments.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_get_in_records_and_arrays() {
        let doc = StateValue::from(json!({"a": {"b": [10, 20, {"c": true}]}}));
        assert_eq!(doc.get_in(&p(&["a", "b", "1"])), Some(&StateValue::from(20)));
        assert_eq!(
            doc.get_in(&p(&["a", "b", "2", "c"])),
            Some(&StateValue::Bool(true))
        );
        assert_eq!(doc.get_in(&p(&["a", "b", "-1"])), None);
        assert_eq!(doc.get_in(&p(&["a", "b", "3"])), None);
        assert_eq!(doc.get_in(&p(&["a", "b", "x"])), None);
        assert_eq!(doc.get_in(&p(&["a", "b", "0", "z"])), None);
        assert_eq!(doc.get_in(&[]), Some(&doc));
    }

    #[test]
    fn test_same_is_pointer_equality_for_containers() {
        let a = StateValue::from(json!({"x": 1}));
        let b = StateValue::from(json!({"x": 1}));
        assert!(a.same(&a.clone()));
        assert!(!a.same(&b));
        assert_eq!(a, b);
    }

    #[test]
    fn test_same_for_scalars() {
        assert!(StateValue::from("x").same(&StateValue::from("x")));
        assert!(StateValue::Null.same(&StateValue::Null));
        assert!(!StateValue::Number(f64::NAN).same(&StateValue::Number(f64::NAN)));
        assert!(!StateValue::Null.same(&StateValue::Bool(false)));
        assert!(StateValue::BigInt(1 << 100).same(&StateValue::BigInt(1 << 100)));
    }

    #[test]
    fn test_opaque_compares_by_pointer() {
        let f = StateValue::opaque(|x: i32| x + 1);
        assert!(f.same(&f.clone()));
        assert!(!f.same(&StateValue::opaque(|x: i32| x + 1)));
        assert_eq!(f.type_label(), "opaque");
    }

    #[test]
    fn test_json_roundtrip() {
        let doc = json!({"a": [1, 2.5, "s", null, true], "b": {"c": {}}});
        assert_eq!(StateValue::from(doc.clone()).to_json(), doc);
    }

    #[test]
    fn test_to_json_holes_and_bigint() {
        let arr = StateValue::Array(Arc::new(vec![Some(StateValue::from(1)), None]));
        assert_eq!(arr.to_json(), json!([1, null]));
        assert_eq!(StateValue::BigInt(42).to_json(), json!(42));
        assert_eq!(
            StateValue::BigInt(i128::MAX).to_json(),
            json!(i128::MAX.to_string())
        );
    }

    #[test]
    fn test_type_labels() {
        assert_eq!(StateValue::Null.type_label(), "null");
        assert_eq!(StateValue::from(1).type_label(), "number");
        assert_eq!(StateValue::empty_record().type_label(), "record");
        assert_eq!(StateValue::array([]).type_label(), "array");
    }
}
