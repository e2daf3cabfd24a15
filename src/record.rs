use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

/// One logging call, as handed to the transport.
///
/// `message` is the primary argument and may be any JSON value (or absent);
/// `splat` holds the remaining arguments in call order. `serialized` is the
/// display form produced upstream, kept only so listeners of the `logged`
/// notification see the record exactly as it arrived.
#[derive(Debug, Clone, Serialize)]
pub struct LogRecord {
    pub timestamp: DateTime<Utc>,
    pub level: String,
    pub target: Option<String>,
    pub message: Option<Value>,
    pub splat: Vec<Value>,
    pub serialized: Option<String>,
}

impl LogRecord {
    pub fn new(level: impl Into<String>, message: impl Into<Value>) -> Self {
        Self {
            timestamp: Utc::now(),
            level: level.into(),
            target: None,
            message: Some(message.into()),
            splat: Vec::new(),
            serialized: None,
        }
    }

    /// Record without a primary message; it splits as empty content.
    pub fn without_message(level: impl Into<String>) -> Self {
        Self {
            timestamp: Utc::now(),
            level: level.into(),
            target: None,
            message: None,
            splat: Vec::new(),
            serialized: None,
        }
    }

    pub fn with_splat<I, V>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.splat = args.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_target(mut self, target: impl Into<String>) -> Self {
        self.target = Some(target.into());
        self
    }

    pub fn with_serialized(mut self, serialized: impl Into<String>) -> Self {
        self.serialized = Some(serialized.into());
        self
    }
}

/// Single output line travelling through a [`Formatter`](crate::format::Formatter).
///
/// `message` is the raw line; `formatted` is what ends up on the stream.
/// Both start out equal, formatters rewrite `formatted`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LineRecord {
    pub level: String,
    pub message: String,
    #[serde(skip)]
    pub formatted: String,
}

impl LineRecord {
    pub fn new(level: impl Into<String>, line: impl Into<String>) -> Self {
        let message = line.into();
        Self {
            level: level.into(),
            formatted: message.clone(),
            message,
        }
    }
}
