use crate::console::{Console, ProcessConsole};
use crate::format::{Formatter, Passthrough};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::sync::Arc;

/// Environment variable holding a comma-separated list of stderr levels.
pub const STDERR_LEVELS_ENV: &str = "MULTILINE_CONSOLE_STDERR_LEVELS";

/// Environment variable overriding the line terminator. `\n` and `\r`
/// escapes are understood.
pub const EOL_ENV: &str = "MULTILINE_CONSOLE_EOL";

/// Environment variable overriding the transport name.
pub const NAME_ENV: &str = "MULTILINE_CONSOLE_NAME";

pub const DEFAULT_NAME: &str = "multi-line-console";

/// `logged` notifications kept for late listeners while nobody listens.
pub const DEFAULT_NOTIFY_CAPACITY: usize = 64;

/// Plain-data part of the transport configuration.
///
/// Deserializes from the camelCase surface
/// `{"stderrLevels": [...], "eol": "...", "name": "...", "silent": false}`.
/// `stderr_levels` stays untyped until the transport is built so a bad
/// shape is reported by [`LevelSet`](crate::level_set::LevelSet). Keys the
/// transport does not know are kept in `passthrough`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransportOptions {
    #[serde(default)]
    pub stderr_levels: Option<Value>,
    #[serde(default)]
    pub eol: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub silent: bool,
    #[serde(default)]
    pub notify_capacity: Option<usize>,
    #[serde(flatten)]
    pub passthrough: Map<String, Value>,
}

/// Everything [`MultiLineConsole::new`](crate::transport::MultiLineConsole::new)
/// needs: the formatter, the console and the options.
#[derive(Clone)]
pub struct TransportConfig {
    pub format: Option<Arc<dyn Formatter>>,
    pub console: Arc<dyn Console>,
    pub options: TransportOptions,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            format: None,
            console: Arc::new(ProcessConsole::new()),
            options: TransportOptions::default(),
        }
    }
}

impl TransportConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_options(options: TransportOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    /// Read options from `MULTILINE_CONSOLE_*` environment variables.
    /// Unset variables leave the defaults in place.
    pub fn from_env() -> Self {
        let mut options = TransportOptions::default();

        if let Ok(levels) = std::env::var(STDERR_LEVELS_ENV) {
            options.stderr_levels = Some(parse_level_list(&levels));
        }
        if let Ok(eol) = std::env::var(EOL_ENV) {
            options.eol = Some(unescape_eol(&eol));
        }
        if let Ok(name) = std::env::var(NAME_ENV) {
            options.name = Some(name);
        }

        Self::from_options(options)
    }

    pub fn format(mut self, format: impl Formatter + 'static) -> Self {
        self.format = Some(Arc::new(format));
        self
    }

    pub fn shared_format(mut self, format: Arc<dyn Formatter>) -> Self {
        self.format = Some(format);
        self
    }

    pub fn console(mut self, console: impl Console + 'static) -> Self {
        self.console = Arc::new(console);
        self
    }

    pub fn stderr_levels<I, S>(mut self, levels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let levels = levels.into_iter().map(|l| Value::String(l.into())).collect();
        self.options.stderr_levels = Some(Value::Array(levels));
        self
    }

    /// Set the level list from an untyped value, validated at build time.
    pub fn stderr_levels_value(mut self, levels: Value) -> Self {
        self.options.stderr_levels = Some(levels);
        self
    }

    pub fn eol(mut self, eol: impl Into<String>) -> Self {
        self.options.eol = Some(eol.into());
        self
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.options.name = Some(name.into());
        self
    }

    pub fn silent(mut self, silent: bool) -> Self {
        self.options.silent = silent;
        self
    }

    pub fn notify_capacity(mut self, capacity: usize) -> Self {
        self.options.notify_capacity = Some(capacity);
        self
    }
}

fn parse_level_list(raw: &str) -> Value {
    Value::Array(
        raw.split(',')
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(|l| Value::String(l.to_string()))
            .collect(),
    )
}

fn unescape_eol(raw: &str) -> String {
    raw.replace("\\r", "\r").replace("\\n", "\n")
}
