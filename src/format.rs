use crate::record::LineRecord;
use chrono::Utc;
use std::error::Error;

/// Boxed error returned by a failing [`Formatter`].
pub type FormatError = Box<dyn Error + Send + Sync>;

/// Per-line transform applied by the transport after splitting.
///
/// Implementations receive a fresh [`LineRecord`] for every output line and
/// return the record to write; only its `formatted` field and `level` are
/// looked at afterwards. Errors are handed back to the caller of
/// [`submit`](crate::transport::MultiLineConsole::submit) untouched.
pub trait Formatter: Send + Sync {
    fn transform(&self, record: LineRecord) -> Result<LineRecord, FormatError>;
}

impl<F> Formatter for F
where
    F: Fn(LineRecord) -> Result<LineRecord, FormatError> + Send + Sync,
{
    fn transform(&self, record: LineRecord) -> Result<LineRecord, FormatError> {
        self(record)
    }
}

/// Writes every line as it was split.
#[derive(Debug, Clone, Copy, Default)]
pub struct Passthrough;

impl Formatter for Passthrough {
    fn transform(&self, record: LineRecord) -> Result<LineRecord, FormatError> {
        Ok(record)
    }
}

/// `"{level}: {line}"`, optionally with the level upper-cased.
#[derive(Debug, Clone, Copy, Default)]
pub struct LevelPrefix {
    uppercase: bool,
}

impl LevelPrefix {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn uppercase(mut self, yes: bool) -> Self {
        self.uppercase = yes;
        self
    }
}

impl Formatter for LevelPrefix {
    fn transform(&self, mut record: LineRecord) -> Result<LineRecord, FormatError> {
        let level = if self.uppercase {
            record.level.to_uppercase()
        } else {
            record.level.clone()
        };
        record.formatted = format!("{}: {}", level, record.formatted);
        Ok(record)
    }
}

/// One compact JSON object per line: `{"level":..,"message":..}`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Json;

impl Formatter for Json {
    fn transform(&self, mut record: LineRecord) -> Result<LineRecord, FormatError> {
        record.formatted = serde_json::to_string(&record)?;
        Ok(record)
    }
}

/// Prefixes the output of an inner formatter with the current UTC time.
pub struct Timestamped<F> {
    inner: F,
    pattern: String,
}

impl<F: Formatter> Timestamped<F> {
    /// Uses an RFC 3339 style pattern with millisecond precision.
    pub fn new(inner: F) -> Self {
        Self::with_pattern(inner, "%Y-%m-%dT%H:%M:%S%.3fZ")
    }

    /// `pattern` is a `chrono` strftime pattern.
    pub fn with_pattern(inner: F, pattern: impl Into<String>) -> Self {
        Self {
            inner,
            pattern: pattern.into(),
        }
    }
}

impl<F: Formatter> Formatter for Timestamped<F> {
    fn transform(&self, record: LineRecord) -> Result<LineRecord, FormatError> {
        let mut record = self.inner.transform(record)?;
        record.formatted = format!("{} {}", Utc::now().format(&self.pattern), record.formatted);
        Ok(record)
    }
}
