use crate::record::LogRecord;
use std::collections::VecDeque;
use std::pin::pin;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::{mpsc, Notify};

/// Queue behind the `logged` notification.
///
/// [`announce`](Self::announce) only queues the record and wakes waiting
/// receivers. Queued records are handed out when a listener subscribes or
/// polls, never on the stack that announced them, so a listener attached
/// right after [`submit`](crate::transport::MultiLineConsole::submit) still
/// gets the record.
///
/// Every receiver has its own unbounded channel: a listener sees each
/// record exactly once, however many arrive between two polls. While no
/// listener exists, at most `backlog` records are kept for late ones,
/// oldest dropped first.
pub(crate) struct LoggedHub {
    state: Mutex<HubState>,
    wake: Notify,
    closed: AtomicBool,
}

struct HubState {
    pending: VecDeque<Arc<LogRecord>>,
    listeners: Vec<mpsc::UnboundedSender<Arc<LogRecord>>>,
    backlog: usize,
}

impl HubState {
    fn deliver(&mut self) {
        self.listeners.retain(|tx| !tx.is_closed());
        for record in self.pending.drain(..) {
            for tx in &self.listeners {
                let _ = tx.send(Arc::clone(&record));
            }
        }
    }
}

impl LoggedHub {
    pub(crate) fn new(backlog: usize) -> Arc<Self> {
        Arc::new(Self {
            state: Mutex::new(HubState {
                pending: VecDeque::new(),
                listeners: Vec::new(),
                backlog: backlog.max(1),
            }),
            wake: Notify::new(),
            closed: AtomicBool::new(false),
        })
    }

    fn lock(&self) -> MutexGuard<'_, HubState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub(crate) fn announce(&self, record: Arc<LogRecord>) {
        {
            let mut state = self.lock();
            state.pending.push_back(record);
            let listening = state.listeners.iter().any(|tx| !tx.is_closed());
            if !listening && state.pending.len() > state.backlog {
                state.pending.pop_front();
            }
        }
        self.wake.notify_waiters();
    }

    pub(crate) fn subscribe(self: &Arc<Self>) -> LoggedReceiver {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut state = self.lock();
        state.listeners.push(tx);
        state.deliver();
        LoggedReceiver {
            hub: Arc::clone(self),
            rx,
        }
    }

    /// Hand every queued record to the current listeners.
    pub(crate) fn flush(&self) {
        self.lock().deliver();
    }

    pub(crate) fn close(&self) {
        self.closed.store(true, Ordering::Release);
        self.wake.notify_waiters();
    }
}

/// Listener for `logged` notifications, created by
/// [`MultiLineConsole::subscribe`](crate::transport::MultiLineConsole::subscribe).
pub struct LoggedReceiver {
    hub: Arc<LoggedHub>,
    rx: mpsc::UnboundedReceiver<Arc<LogRecord>>,
}

impl LoggedReceiver {
    /// Next notification, waiting for one if needed.
    ///
    /// Returns `None` once the transport is dropped and everything queued
    /// has been received.
    pub async fn recv(&mut self) -> Option<Arc<LogRecord>> {
        let hub = Arc::clone(&self.hub);
        loop {
            let mut notified = pin!(hub.wake.notified());
            notified.as_mut().enable();

            if let Some(record) = self.try_recv() {
                return Some(record);
            }
            if self.hub.closed.load(Ordering::Acquire) {
                return None;
            }

            notified.await;
        }
    }

    /// Next notification if one is ready.
    pub fn try_recv(&mut self) -> Option<Arc<LogRecord>> {
        self.hub.flush();
        self.rx.try_recv().ok()
    }
}
