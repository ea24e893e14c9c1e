use crate::level::Level;
use serde::Serialize;
use serde_json::Value;

/// One key/value pair of a structured log line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Field {
    pub key: String,
    pub value: Value,
}

impl Field {
    pub fn new(key: impl Into<String>, value: impl Into<Value>) -> Self {
        Field {
            key: key.into(),
            value: value.into(),
        }
    }
}

impl<K: Into<String>, V: Into<Value>> From<(K, V)> for Field {
    fn from((key, value): (K, V)) -> Self {
        Field::new(key, value)
    }
}

/// A leveled event as produced by the middleware at one decision point.
///
/// Records are built per event and dropped right after being forwarded.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LogRecord {
    pub level: Level,
    pub fields: Vec<Field>,
}

impl LogRecord {
    pub fn new(level: Level, fields: Vec<Field>) -> Self {
        LogRecord { level, fields }
    }

    /// Flatten into the key/value sequence handed to a [`KvLogger`]:
    /// the record's fields followed by `("level", <level>)`.
    ///
    /// [`KvLogger`]: crate::logger::KvLogger
    pub fn to_kv(&self) -> Vec<Field> {
        leveled(self.level, &[], &self.fields)
    }
}

/// `context ++ fields ++ ("level", level)` as a fresh vector.
pub(crate) fn leveled(level: Level, context: &[Field], fields: &[Field]) -> Vec<Field> {
    let mut kv = Vec::with_capacity(context.len() + fields.len() + 1);
    kv.extend_from_slice(context);
    kv.extend_from_slice(fields);
    kv.push(Field::new(Level::KEY, level.as_str()));
    kv
}

/// Build a `Vec<Field>` from `key => value` pairs, keeping their order.
///
/// ```
/// use interceptor_log_kit::fields;
///
/// let kv = fields!["grpc.method" => "Get", "attempt" => 2];
/// assert_eq!(kv[0].key, "grpc.method");
/// assert_eq!(kv[1].value, 2);
/// ```
#[macro_export]
macro_rules! fields {
    () => {
        ::std::vec::Vec::<$crate::record::Field>::new()
    };
    ($($key:expr => $value:expr),+ $(,)?) => {
        vec![$($crate::record::Field::new($key, $value)),+]
    };
}
