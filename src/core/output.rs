// src/core/output.rs

use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::sync::{Arc, Mutex};
use std::time::SystemTime;

/// The closed set of message kinds an action can emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageType {
    Log,
    Success,
    Error,
    Warning,
    Info,
    Newline,
    Code,
    Header,
    List,
    KeyValue,
    Table,
    Json,
    Divider,
    Step,
}

/// Typed payload of an `OutputMessage`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MessageContent {
    Text { text: String },
    Code { source: String, language: Option<String> },
    List { items: Vec<String> },
    KeyValue { pairs: Vec<(String, String)> },
    Table { headers: Vec<String>, rows: Vec<Vec<String>> },
    Json { value: Value },
    Step { number: usize, total: Option<usize>, text: String },
    Empty,
}

impl MessageContent {
    /// The plain text of text-like payloads.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text { text } | Self::Step { text, .. } => Some(text),
            Self::Code { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// One entry of the output log. Never mutated after it is appended.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutputMessage {
    #[serde(rename = "type")]
    pub message_type: MessageType,
    pub content: MessageContent,
    pub timestamp: SystemTime,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<Value>,
}

/// Live consumer of messages, invoked synchronously once per append.
pub type OutputSink = Arc<dyn Fn(&OutputMessage) + Send + Sync>;

/// Append-only, ordered message log with an optional streaming sink.
pub struct OutputChannel {
    messages: Mutex<Vec<OutputMessage>>,
    sink: Option<OutputSink>,
}

impl fmt::Debug for OutputChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OutputChannel")
            .field("messages", &self.messages().len())
            .field("streaming", &self.sink.is_some())
            .finish()
    }
}

impl OutputChannel {
    pub fn new(sink: Option<OutputSink>) -> Self {
        Self {
            messages: Mutex::new(Vec::new()),
            sink,
        }
    }

    /// A snapshot of every message appended so far, in order.
    pub fn messages(&self) -> Vec<OutputMessage> {
        self.messages
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Appends a message, then hands it to the sink before returning.
    pub fn emit(&self, message_type: MessageType, content: MessageContent, meta: Option<Value>) {
        let message = OutputMessage {
            message_type,
            content,
            timestamp: SystemTime::now(),
            meta,
        };
        self.messages
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(message.clone());

        // The sink runs outside the lock so it may read `messages()` itself.
        if let Some(sink) = &self.sink {
            sink(&message);
        }
    }

    fn emit_text(&self, message_type: MessageType, text: impl Into<String>) {
        self.emit(message_type, MessageContent::Text { text: text.into() }, None);
    }

    // --- Text messages ---

    pub fn log(&self, text: impl Into<String>) {
        self.emit_text(MessageType::Log, text);
    }

    /// Logs several values on one line: strings as-is, `null` as `"null"`,
    /// anything else as compact JSON, joined by spaces.
    pub fn log_values(&self, values: &[Value]) {
        let line = values
            .iter()
            .map(stringify_log_value)
            .collect::<Vec<_>>()
            .join(" ");
        self.log(line);
    }

    pub fn success(&self, text: impl Into<String>) {
        self.emit_text(MessageType::Success, text);
    }

    pub fn error(&self, text: impl Into<String>) {
        self.emit_text(MessageType::Error, text);
    }

    pub fn warn(&self, text: impl Into<String>) {
        self.emit_text(MessageType::Warning, text);
    }

    pub fn info(&self, text: impl Into<String>) {
        self.emit_text(MessageType::Info, text);
    }

    pub fn header(&self, text: impl Into<String>) {
        self.emit_text(MessageType::Header, text);
    }

    pub fn newline(&self) {
        self.emit(MessageType::Newline, MessageContent::Empty, None);
    }

    pub fn divider(&self) {
        self.emit(MessageType::Divider, MessageContent::Empty, None);
    }

    // --- Structured messages ---

    pub fn code(&self, source: impl Into<String>, language: Option<&str>) {
        self.emit(
            MessageType::Code,
            MessageContent::Code {
                source: source.into(),
                language: language.map(str::to_string),
            },
            None,
        );
    }

    pub fn list<I, S>(&self, items: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let items = items.into_iter().map(Into::into).collect();
        self.emit(MessageType::List, MessageContent::List { items }, None);
    }

    pub fn key_value<I, K, V>(&self, pairs: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let pairs = pairs
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        self.emit(MessageType::KeyValue, MessageContent::KeyValue { pairs }, None);
    }

    pub fn table(&self, headers: Vec<String>, rows: Vec<Vec<String>>) {
        self.emit(
            MessageType::Table,
            MessageContent::Table { headers, rows },
            None,
        );
    }

    /// Pretty-printed structured data. Values that fail to serialize are
    /// logged as a plain line with their debug form instead.
    pub fn json<T: Serialize + fmt::Debug>(&self, data: &T) {
        match serde_json::to_value(data) {
            Ok(value) => self.emit(MessageType::Json, MessageContent::Json { value }, None),
            Err(e) => {
                log::debug!("Falling back to debug output for JSON message: {}", e);
                self.log(format!("{:?}", data));
            }
        }
    }

    pub fn step(&self, number: usize, total: Option<usize>, text: impl Into<String>) {
        self.emit(
            MessageType::Step,
            MessageContent::Step {
                number,
                total,
                text: text.into(),
            },
            None,
        );
    }
}

fn stringify_log_value(value: &Value) -> String {
    match value {
        Value::Null => String::from("null"),
        Value::String(s) => s.clone(),
        other => serde_json::to_string(other).unwrap_or_else(|_| format!("{:?}", other)),
    }
}

// MARK: --- UNIT TESTS ---

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_messages_keep_append_order() {
        let channel = OutputChannel::new(None);
        channel.header("Setup");
        channel.log("one");
        channel.success("two");
        channel.newline();
        channel.step(1, Some(3), "three");

        let kinds: Vec<_> = channel.messages().iter().map(|m| m.message_type).collect();
        assert_eq!(
            kinds,
            vec![
                MessageType::Header,
                MessageType::Log,
                MessageType::Success,
                MessageType::Newline,
                MessageType::Step
            ]
        );
        let messages = channel.messages();
        assert!(messages.windows(2).all(|w| w[0].timestamp <= w[1].timestamp));
    }

    #[test]
    fn test_sink_sees_each_message_once_before_return() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink_seen = Arc::clone(&seen);
        let channel = OutputChannel::new(Some(Arc::new(move |m: &OutputMessage| {
            sink_seen
                .lock()
                .unwrap()
                .push(m.content.as_text().unwrap_or_default().to_string());
        })));

        channel.log("a");
        assert_eq!(seen.lock().unwrap().len(), 1);
        channel.warn("b");
        channel.info("c");

        assert_eq!(*seen.lock().unwrap(), vec!["a", "b", "c"]);
        let logged: Vec<_> = channel
            .messages()
            .iter()
            .map(|m| m.content.as_text().unwrap_or_default().to_string())
            .collect();
        assert_eq!(logged, *seen.lock().unwrap());
    }

    #[test]
    fn test_log_values_stringification() {
        let channel = OutputChannel::new(None);
        channel.log_values(&[json!("count:"), json!(3), Value::Null, json!({"a": [1, 2]})]);
        assert_eq!(
            channel.messages()[0].content.as_text(),
            Some(r#"count: 3 null {"a":[1,2]}"#)
        );
    }

    #[test]
    fn test_structured_payloads() {
        let channel = OutputChannel::new(None);
        channel.key_value([("name", "demo"), ("version", "1.0")]);
        channel.table(
            vec!["id".into(), "state".into()],
            vec![vec!["1".into(), "ok".into()]],
        );
        channel.json(&json!({"ok": true}));

        let messages = channel.messages();
        assert!(matches!(
            &messages[0].content,
            MessageContent::KeyValue { pairs } if pairs.len() == 2
        ));
        assert!(matches!(&messages[1].content, MessageContent::Table { rows, .. } if rows.len() == 1));
        assert_eq!(
            messages[2].content,
            MessageContent::Json { value: json!({"ok": true}) }
        );

        let dumped = serde_json::to_value(&messages[0]).unwrap();
        assert_eq!(dumped["type"], json!("key_value"));
    }
}
