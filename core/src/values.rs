//! Native values carried by records and raw cell values read back from the store.

use chrono::NaiveDateTime;

/// Layout used for timestamps in both directions.
pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A native value held by a [`Record`](crate::Record) or used as a lookup operand.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Value {
    /// Absent value
    #[default]
    Null,
    /// Integer value
    Integer(i64),
    /// Floating point value
    Float(f64),
    /// Text value
    Text(String),
    /// Timestamp with one-second granularity
    DateTime(NaiveDateTime),
    /// Operand of an `in` lookup
    List(Vec<Value>),
}

impl Value {
    pub const fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Integer(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(value) => Some(*value),
            Value::Integer(value) => Some(*value as f64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_datetime(&self) -> Option<NaiveDateTime> {
        match self {
            Value::DateTime(value) => Some(*value),
            _ => None,
        }
    }

    /// Text form used by text columns, without quoting.
    pub(crate) fn to_text(&self) -> String {
        match self {
            Value::Null => String::new(),
            Value::Integer(value) => value.to_string(),
            Value::Float(value) => value.to_string(),
            Value::Text(value) => value.clone(),
            Value::DateTime(value) => value.format(DATETIME_FORMAT).to_string(),
            Value::List(values) => values
                .iter()
                .map(Value::to_text)
                .collect::<Vec<_>>()
                .join(","),
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl From<&String> for Value {
    fn from(value: &String) -> Self {
        Value::Text(value.clone())
    }
}

macro_rules! impl_from_integer {
    ($($ty:ty),*) => { $(
        impl From<$ty> for Value {
            fn from(value: $ty) -> Self {
                Value::Integer(i64::from(value))
            }
        }
    )* }
}

impl_from_integer!(i8, i16, i32, i64, u8, u16, u32, bool);

impl From<f32> for Value {
    fn from(value: f32) -> Self {
        Value::Float(f64::from(value))
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<NaiveDateTime> for Value {
    fn from(value: NaiveDateTime) -> Self {
        Value::DateTime(value)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(values: Vec<T>) -> Self {
        Value::List(values.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>, const N: usize> From<[T; N]> for Value {
    fn from(values: [T; N]) -> Self {
        Value::List(values.into_iter().map(Into::into).collect())
    }
}

/// A cell as returned by the execution collaborator.
#[derive(Clone, Debug, PartialEq)]
pub enum RawValue {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
    Blob(Vec<u8>),
}

impl From<RawValue> for Value {
    /// Verbatim conversion used for columns that match no field, such as aggregates.
    fn from(raw: RawValue) -> Self {
        match raw {
            RawValue::Null => Value::Null,
            RawValue::Integer(value) => Value::Integer(value),
            RawValue::Real(value) => Value::Float(value),
            RawValue::Text(value) => Value::Text(value),
            RawValue::Blob(bytes) => Value::Text(String::from_utf8_lossy(&bytes).into_owned()),
        }
    }
}
