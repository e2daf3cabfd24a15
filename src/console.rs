use std::io::Write;
use std::sync::{Arc, Mutex, MutexGuard};

/// The two logical destinations a line can be routed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    Stdout,
    Stderr,
}

/// Raw write capability. The caller supplies the terminator, and the text
/// is on its way to the destination when `write` returns.
///
/// Writes are treated as always succeeding.
pub trait StreamWrite: Send + Sync {
    fn write(&self, s: &str);
}

/// Access to the process environment's output capabilities.
///
/// `raw_stream` is probed on every write; when it returns `None` the line
/// goes through `log_line`, which terminates lines itself.
pub trait Console: Send + Sync {
    fn raw_stream(&self, channel: Channel) -> Option<&dyn StreamWrite>;

    fn log_line(&self, channel: Channel, message: &str);
}

/// Process stdout / stderr.
#[derive(Debug, Clone, Copy)]
pub struct StdStream {
    channel: Channel,
}

impl StreamWrite for StdStream {
    fn write(&self, s: &str) {
        // Write failures are dropped: there is nowhere left to report them.
        let _ = match self.channel {
            Channel::Stdout => write_flushed(std::io::stdout().lock(), s),
            Channel::Stderr => write_flushed(std::io::stderr().lock(), s),
        };
    }
}

/// Stdout is line-buffered; flush so terminators without `\n` and
/// interleaved stdout/stderr lines reach the terminal in write order.
fn write_flushed(mut out: impl Write, s: &str) -> std::io::Result<()> {
    out.write_all(s.as_bytes())?;
    out.flush()
}

/// [`Console`] backed by the real process streams.
#[derive(Debug, Clone, Copy)]
pub struct ProcessConsole {
    stdout: Option<StdStream>,
    stderr: Option<StdStream>,
}

impl ProcessConsole {
    pub fn new() -> Self {
        Self {
            stdout: Some(StdStream { channel: Channel::Stdout }),
            stderr: Some(StdStream { channel: Channel::Stderr }),
        }
    }

    /// Console that only offers `println!` / `eprintln!`.
    pub fn line_oriented() -> Self {
        Self {
            stdout: None,
            stderr: None,
        }
    }
}

impl Default for ProcessConsole {
    fn default() -> Self {
        Self::new()
    }
}

impl Console for ProcessConsole {
    fn raw_stream(&self, channel: Channel) -> Option<&dyn StreamWrite> {
        let stream = match channel {
            Channel::Stdout => self.stdout.as_ref(),
            Channel::Stderr => self.stderr.as_ref(),
        };
        stream.map(|s| s as &dyn StreamWrite)
    }

    fn log_line(&self, channel: Channel, message: &str) {
        match channel {
            Channel::Stdout => println!("{}", message),
            Channel::Stderr => eprintln!("{}", message),
        }
    }
}

/// What a [`MemoryConsole`] saw, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Output {
    /// Raw stream write, terminator included.
    Write(Channel, String),
    /// Line-oriented fallback call.
    Log(Channel, String),
}

impl Output {
    pub fn channel(&self) -> Channel {
        match self {
            Output::Write(channel, _) | Output::Log(channel, _) => *channel,
        }
    }

    pub fn text(&self) -> &str {
        match self {
            Output::Write(_, text) | Output::Log(_, text) => text,
        }
    }
}

type Entries = Arc<Mutex<Vec<Output>>>;

fn lock(entries: &Entries) -> MutexGuard<'_, Vec<Output>> {
    entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[derive(Debug, Clone)]
struct MemoryStream {
    channel: Channel,
    entries: Entries,
}

impl StreamWrite for MemoryStream {
    fn write(&self, s: &str) {
        lock(&self.entries).push(Output::Write(self.channel, s.to_string()));
    }
}

/// In-memory [`Console`] that records every call. Clones share the record.
///
/// Raw streams can be switched off per channel to exercise the
/// line-oriented fallback.
#[derive(Debug, Clone)]
pub struct MemoryConsole {
    entries: Entries,
    stdout: Option<MemoryStream>,
    stderr: Option<MemoryStream>,
}

impl MemoryConsole {
    /// Both raw streams available.
    pub fn new() -> Self {
        Self::with_raw_streams(true, true)
    }

    pub fn with_raw_streams(stdout: bool, stderr: bool) -> Self {
        let entries = Entries::default();
        let stream = |enabled: bool, channel: Channel| {
            enabled.then(|| MemoryStream {
                channel,
                entries: Arc::clone(&entries),
            })
        };
        Self {
            stdout: stream(stdout, Channel::Stdout),
            stderr: stream(stderr, Channel::Stderr),
            entries,
        }
    }

    pub fn outputs(&self) -> Vec<Output> {
        lock(&self.entries).clone()
    }

    /// Text seen on `channel`, raw writes and fallback calls alike.
    pub fn texts(&self, channel: Channel) -> Vec<String> {
        lock(&self.entries)
            .iter()
            .filter(|o| o.channel() == channel)
            .map(|o| o.text().to_string())
            .collect()
    }

    pub fn take(&self) -> Vec<Output> {
        std::mem::take(&mut *lock(&self.entries))
    }
}

impl Default for MemoryConsole {
    fn default() -> Self {
        Self::new()
    }
}

impl Console for MemoryConsole {
    fn raw_stream(&self, channel: Channel) -> Option<&dyn StreamWrite> {
        let stream = match channel {
            Channel::Stdout => self.stdout.as_ref(),
            Channel::Stderr => self.stderr.as_ref(),
        };
        stream.map(|s| s as &dyn StreamWrite)
    }

    fn log_line(&self, channel: Channel, message: &str) {
        lock(&self.entries).push(Output::Log(channel, message.to_string()));
    }
}
