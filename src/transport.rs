use crate::config::{TransportConfig, DEFAULT_NAME, DEFAULT_NOTIFY_CAPACITY};
use crate::console::{Channel, Console};
use crate::error::{ConfigError, SubmitError};
use crate::format::{Formatter, Passthrough};
use crate::level_set::LevelSet;
use crate::lines::{split_lines, PLATFORM_EOL};
use crate::notify::{LoggedHub, LoggedReceiver};
use crate::record::{LineRecord, LogRecord};
use std::sync::Arc;

/// Console transport that splits every record on the line terminator and
/// formats and writes each line on its own.
///
/// Levels in the configured stderr set go to [`Channel::Stderr`], everything
/// else to [`Channel::Stdout`]. Each accepted record is also announced to
/// `logged` listeners, see [`subscribe`].
///
/// The configuration is fixed at construction; a transport can be shared
/// behind an `Arc` and used from any number of callers.
///
/// [`subscribe`]: MultiLineConsole::subscribe
pub struct MultiLineConsole {
    name: String,
    format: Arc<dyn Formatter>,
    stderr_levels: LevelSet,
    eol: String,
    silent: bool,
    console: Arc<dyn Console>,
    logged: Arc<LoggedHub>,
}

impl MultiLineConsole {
    /// Build a transport from `config`.
    ///
    /// Fails only when `stderrLevels` is present and is not an array of
    /// strings. A missing formatter falls back to [`Passthrough`], an empty
    /// or missing terminator to the platform one.
    pub fn new(config: TransportConfig) -> Result<Self, ConfigError> {
        let TransportConfig {
            format,
            console,
            options,
        } = config;

        let stderr_levels = LevelSet::from_value(options.stderr_levels.as_ref(), None)?;
        let eol = options
            .eol
            .filter(|eol| !eol.is_empty())
            .unwrap_or_else(|| PLATFORM_EOL.to_string());
        let logged = LoggedHub::new(options.notify_capacity.unwrap_or(DEFAULT_NOTIFY_CAPACITY));

        let transport = Self {
            name: options.name.unwrap_or_else(|| DEFAULT_NAME.to_string()),
            format: format.unwrap_or_else(|| Arc::new(Passthrough)),
            stderr_levels,
            eol,
            silent: options.silent,
            console,
            logged,
        };

        tracing::debug!(
            transport = %transport.name,
            stderr_levels = transport.stderr_levels.len(),
            silent = transport.silent,
            ignored_options = options.passthrough.len(),
            "multi-line console transport created"
        );

        Ok(transport)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn eol(&self) -> &str {
        &self.eol
    }

    pub fn stderr_levels(&self) -> &LevelSet {
        &self.stderr_levels
    }

    pub fn is_silent(&self) -> bool {
        self.silent
    }

    /// Listen for `logged` notifications. Each carries the record exactly as
    /// it was passed to [`submit`](Self::submit).
    ///
    /// Records submitted before this call and not yet handed to any listener
    /// are delivered to the new receiver too.
    pub fn subscribe(&self) -> LoggedReceiver {
        self.logged.subscribe()
    }

    /// Write `record` line by line, then call `callback(None, true)`.
    ///
    /// All formatting and writing happens before this returns. The `logged`
    /// notification is only queued here; it reaches listeners when one of
    /// them subscribes or polls, so a receiver created right after this call
    /// still gets it.
    ///
    /// A formatter error aborts the remaining lines and is returned; the
    /// callback is not called in that case.
    pub fn submit<F>(&self, record: impl Into<Arc<LogRecord>>, callback: F) -> Result<(), SubmitError>
    where
        F: FnOnce(Option<SubmitError>, bool),
    {
        let record = record.into();

        if self.silent {
            callback(None, true);
            return Ok(());
        }

        self.logged.announce(Arc::clone(&record));

        for line in split_lines(record.message.as_ref(), &record.splat, &self.eol) {
            let formatted = self
                .format
                .transform(LineRecord::new(record.level.clone(), line))
                .map_err(SubmitError::Format)?;
            self.write_line(&formatted);
        }

        callback(None, true);
        Ok(())
    }

    fn channel_for(&self, level: &str) -> Channel {
        if self.stderr_levels.contains(level) {
            Channel::Stderr
        } else {
            Channel::Stdout
        }
    }

    fn write_line(&self, line: &LineRecord) {
        let channel = self.channel_for(&line.level);
        match self.console.raw_stream(channel) {
            Some(stream) => stream.write(&format!("{}{}", line.formatted, self.eol)),
            None => self.console.log_line(channel, &line.formatted),
        }
    }
}

impl Drop for MultiLineConsole {
    fn drop(&mut self) {
        self.logged.close();
    }
}
