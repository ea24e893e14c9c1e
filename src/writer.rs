//! Line-oriented loggers writing to any [`std::io::Write`].

use crate::error::{LogError, Result};
use crate::logger::KvLogger;
use crate::record::Field;
use chrono::{SecondsFormat, Utc};
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use serde_json::Value;
use std::io::{self, Write};
use std::sync::Mutex;

/// Key used for the optional timestamp prepended to each line.
///
/// A caller field with this key replaces the generated timestamp.
pub const TIMESTAMP_KEY: &str = "ts";

fn has_timestamp(fields: &[Field]) -> bool {
    fields.iter().any(|f| f.key == TIMESTAMP_KEY)
}

fn now_rfc3339() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn write_line<W: Write>(writer: &Mutex<W>, mut line: Vec<u8>) -> Result<()> {
    line.push(b'\n');
    let mut guard = writer.lock().map_err(|_| LogError::Poisoned)?;
    guard.write_all(&line)?;
    guard.flush()?;
    Ok(())
}

/// Writes each call as a single JSON object on its own line.
///
/// Keys appear in call order. A key that repeats is written once, with
/// its last value, at the position of its last occurrence.
pub struct JsonLogger<W> {
    writer: Mutex<W>,
    timestamp: bool,
}

impl<W: Write + Send> JsonLogger<W> {
    pub fn new(writer: W) -> Self {
        JsonLogger {
            writer: Mutex::new(writer),
            timestamp: false,
        }
    }

    /// Prepend a UTC RFC 3339 timestamp under [`TIMESTAMP_KEY`].
    pub fn with_timestamp(mut self) -> Self {
        self.timestamp = true;
        self
    }

    /// Recover the underlying writer.
    pub fn into_inner(self) -> Result<W> {
        self.writer.into_inner().map_err(|_| LogError::Poisoned)
    }
}

impl JsonLogger<io::Stdout> {
    pub fn stdout() -> Self {
        JsonLogger::new(io::stdout())
    }
}

impl JsonLogger<io::Stderr> {
    pub fn stderr() -> Self {
        JsonLogger::new(io::stderr())
    }
}

struct JsonLine<'a> {
    timestamp: Option<String>,
    fields: &'a [Field],
}

impl Serialize for JsonLine<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        if let Some(ts) = self.timestamp.as_ref().filter(|_| !has_timestamp(self.fields)) {
            map.serialize_entry(TIMESTAMP_KEY, ts)?;
        }
        for (i, field) in self.fields.iter().enumerate() {
            let shadowed = self.fields[i + 1..].iter().any(|later| later.key == field.key);
            if !shadowed {
                map.serialize_entry(&field.key, &field.value)?;
            }
        }
        map.end()
    }
}

impl<W: Write + Send> KvLogger for JsonLogger<W> {
    fn log(&self, fields: &[Field]) -> Result<()> {
        let line = JsonLine {
            timestamp: self.timestamp.then(now_rfc3339),
            fields,
        };
        write_line(&self.writer, serde_json::to_vec(&line)?)
    }
}

/// Writes each call as a logfmt line: `key=value key2="quoted value"`.
pub struct LogfmtLogger<W> {
    writer: Mutex<W>,
    timestamp: bool,
}

impl<W: Write + Send> LogfmtLogger<W> {
    pub fn new(writer: W) -> Self {
        LogfmtLogger {
            writer: Mutex::new(writer),
            timestamp: false,
        }
    }

    pub fn with_timestamp(mut self) -> Self {
        self.timestamp = true;
        self
    }

    pub fn into_inner(self) -> Result<W> {
        self.writer.into_inner().map_err(|_| LogError::Poisoned)
    }
}

impl LogfmtLogger<io::Stdout> {
    pub fn stdout() -> Self {
        LogfmtLogger::new(io::stdout())
    }
}

impl LogfmtLogger<io::Stderr> {
    pub fn stderr() -> Self {
        LogfmtLogger::new(io::stderr())
    }
}

impl<W: Write + Send> KvLogger for LogfmtLogger<W> {
    fn log(&self, fields: &[Field]) -> Result<()> {
        let mut line = String::new();
        if self.timestamp && !has_timestamp(fields) {
            line.push_str(TIMESTAMP_KEY);
            line.push('=');
            line.push_str(&now_rfc3339());
        }
        for field in fields {
            if !line.is_empty() {
                line.push(' ');
            }
            push_pair(&mut line, field)?;
        }
        write_line(&self.writer, line.into_bytes())
    }
}

/// Render `fields` as one logfmt string without a trailing newline.
pub fn logfmt(fields: &[Field]) -> String {
    let mut out = String::new();
    for field in fields {
        if !out.is_empty() {
            out.push(' ');
        }
        // serde_json never fails on a `Value`
        let _ = push_pair(&mut out, field);
    }
    out
}

fn push_pair(out: &mut String, field: &Field) -> Result<()> {
    if field.key.is_empty() {
        out.push('_');
    }
    out.extend(field.key.chars().map(|c| {
        if c <= ' ' || c == '=' || c == '"' {
            '_'
        } else {
            c
        }
    }));
    out.push('=');

    let raw = match &field.value {
        Value::String(s) => s.clone(),
        other => serde_json::to_string(other)?,
    };
    if needs_quotes(&raw) {
        out.push_str(&serde_json::to_string(&raw)?);
    } else {
        out.push_str(&raw);
    }
    Ok(())
}

fn needs_quotes(s: &str) -> bool {
    s.is_empty() || s.chars().any(|c| c <= ' ' || c == '=' || c == '"' || c == '\\')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields;

    fn lines(buf: Vec<u8>) -> Vec<String> {
        String::from_utf8(buf)
            .unwrap()
            .lines()
            .map(str::to_string)
            .collect()
    }

    #[test]
    fn json_keeps_call_order() {
        let logger = JsonLogger::new(Vec::new());
        logger
            .log(&fields!["grpc.method" => "Get", "attempt" => 2, "level" => "info"])
            .unwrap();
        let out = lines(logger.into_inner().unwrap());
        assert_eq!(out, [r#"{"grpc.method":"Get","attempt":2,"level":"info"}"#]);
    }

    #[test]
    fn json_repeated_key_last_wins() {
        let logger = JsonLogger::new(Vec::new());
        logger.log(&fields!["level" => "debug", "a" => 1, "level" => "error"]).unwrap();
        let out = lines(logger.into_inner().unwrap());
        assert_eq!(out, [r#"{"a":1,"level":"error"}"#]);
    }

    #[test]
    fn json_timestamp_is_first() {
        let logger = JsonLogger::new(Vec::new()).with_timestamp();
        logger.log(&fields!["a" => true]).unwrap();
        let out = lines(logger.into_inner().unwrap());
        let parsed: serde_json::Value = serde_json::from_str(&out[0]).unwrap();
        assert!(parsed["ts"].as_str().unwrap().ends_with('Z'));
        assert!(out[0].starts_with(r#"{"ts":"#));
        assert_eq!(parsed["a"], true);
    }

    #[test]
    fn json_caller_timestamp_replaces_generated_one() {
        let logger = JsonLogger::new(Vec::new()).with_timestamp();
        logger.log(&fields!["ts" => "user", "a" => 1]).unwrap();
        let out = lines(logger.into_inner().unwrap());
        assert_eq!(out[0].matches("\"ts\"").count(), 1);
        assert_eq!(out, [r#"{"ts":"user","a":1}"#]);
    }

    #[test]
    fn logfmt_caller_timestamp_replaces_generated_one() {
        let logger = LogfmtLogger::new(Vec::new()).with_timestamp();
        logger.log(&fields!["ts" => "user"]).unwrap();
        assert_eq!(lines(logger.into_inner().unwrap()), ["ts=user"]);
    }

    struct FailingWriter;

    impl Write for FailingWriter {
        fn write(&mut self, _: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "pipe closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn write_failure_is_reported_as_io() {
        let json = JsonLogger::new(FailingWriter);
        match json.log(&fields!["a" => 1]) {
            Err(LogError::Io(e)) => assert_eq!(e.kind(), io::ErrorKind::BrokenPipe),
            other => panic!("expected io error, got {:?}", other),
        }
        let text = LogfmtLogger::new(FailingWriter);
        assert!(matches!(text.log(&fields!["a" => 1]), Err(LogError::Io(_))));
    }

    #[test]
    fn logfmt_quotes_when_needed() {
        let logger = LogfmtLogger::new(Vec::new());
        logger
            .log(&fields![
                "msg" => "finished call",
                "grpc.code" => "OK",
                "grpc.time_ms" => 1.5,
                "empty" => "",
                "peer" => serde_json::Value::Null,
            ])
            .unwrap();
        let out = lines(logger.into_inner().unwrap());
        assert_eq!(
            out,
            [r#"msg="finished call" grpc.code=OK grpc.time_ms=1.5 empty="" peer=null"#]
        );
    }

    #[test]
    fn logfmt_sanitizes_keys() {
        assert_eq!(logfmt(&fields!["a b" => 1, "" => 2]), "a_b=1 _=2");
    }

    #[test]
    fn one_line_per_call() {
        let logger = LogfmtLogger::new(Vec::new());
        logger.log(&fields!["n" => 1]).unwrap();
        logger.log(&fields!["n" => 2]).unwrap();
        assert_eq!(lines(logger.into_inner().unwrap()), ["n=1", "n=2"]);
    }
}
