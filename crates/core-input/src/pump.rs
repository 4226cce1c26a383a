//! The input pump: a tokio task reading the terminal's event stream and
//! forwarding normalized events to the main loop.

use std::io;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use core_events::{Event, InputEvent};
use crossterm::event::{Event as CEvent, EventStream};
use tokio::sync::Notify;
use tokio::sync::mpsc::Sender;
use tokio::task::JoinHandle;
use tokio_stream::{Stream, StreamExt};
use tracing::{Instrument, debug, info, trace, warn};

use crate::mapping::map_event;

/// Process-wide counters for the pump, logged once at shutdown. Nothing in
/// the editor branches on them.
#[derive(Debug)]
pub struct PumpStats {
    pub started: AtomicU64,
    pub forwarded: AtomicU64,
    pub failed_sends: AtomicU64,
    stops: [AtomicU64; StopCause::COUNT],
}

impl PumpStats {
    const fn new() -> Self {
        Self {
            started: AtomicU64::new(0),
            forwarded: AtomicU64::new(0),
            failed_sends: AtomicU64::new(0),
            stops: [const { AtomicU64::new(0) }; StopCause::COUNT],
        }
    }

    pub fn stops(&self, cause: StopCause) -> u64 {
        self.stops[cause as usize].load(Ordering::Relaxed)
    }
}

pub static PUMP_STATS: PumpStats = PumpStats::new();

/// Why the pump returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopCause {
    Requested,
    ReceiverGone,
    StreamEnded,
    StreamFailed,
}

impl StopCause {
    const COUNT: usize = 4;

    fn label(self) -> &'static str {
        match self {
            StopCause::Requested => "requested",
            StopCause::ReceiverGone => "receiver_gone",
            StopCause::StreamEnded => "stream_ended",
            StopCause::StreamFailed => "stream_failed",
        }
    }
}

/// Asks a running pump to return. Signalling before the pump reaches its
/// next await still stops it; the permit is kept.
#[derive(Debug, Clone)]
pub struct InputStop {
    notify: Arc<Notify>,
}

impl InputStop {
    fn new() -> Self {
        Self {
            notify: Arc::new(Notify::new()),
        }
    }

    pub fn signal(&self) {
        self.notify.notify_one();
    }
}

/// Start the pump over crossterm's `EventStream`.
pub(crate) fn spawn(sender: Sender<Event>) -> (JoinHandle<()>, InputStop) {
    let stop = InputStop::new();
    let notify = Arc::clone(&stop.notify);
    let span = tracing::debug_span!(target: "input", "input_pump");
    let handle = tokio::spawn(
        async move {
            pump(EventStream::new(), sender, notify).await;
        }
        .instrument(span),
    );
    (handle, stop)
}

/// Forward events from `stream` until told to stop, the receiver goes away
/// or the stream ends. Sends wait for channel capacity rather than drop.
pub(crate) async fn pump<S>(mut stream: S, sender: Sender<Event>, stop: Arc<Notify>) -> StopCause
where
    S: Stream<Item = io::Result<CEvent>> + Unpin,
{
    PUMP_STATS.started.fetch_add(1, Ordering::Relaxed);
    info!(target: "input", "input_pump_started");

    let cause = loop {
        let item = tokio::select! {
            biased;
            _ = stop.notified() => break StopCause::Requested,
            item = stream.next() => item,
        };
        let raw = match item {
            None => break StopCause::StreamEnded,
            Some(Err(err)) => {
                warn!(target: "input", error_kind = ?err.kind(), "input_stream_error");
                break StopCause::StreamFailed;
            }
            Some(Ok(raw)) => raw,
        };
        let Some(input) = map_event(raw) else {
            continue;
        };
        describe(&input);
        if sender.send(Event::Input(input)).await.is_err() {
            PUMP_STATS.failed_sends.fetch_add(1, Ordering::Relaxed);
            break StopCause::ReceiverGone;
        }
        PUMP_STATS.forwarded.fetch_add(1, Ordering::Relaxed);
    };

    PUMP_STATS.stops[cause as usize].fetch_add(1, Ordering::Relaxed);
    info!(target: "input", cause = cause.label(), "input_pump_stopped");
    cause
}

// Keys and pastes are user content: log the shape, never the text.
fn describe(input: &InputEvent) {
    match input {
        InputEvent::Key(key) => trace!(target: "input", kind = "key", key = %key, "input_event"),
        InputEvent::Mouse(m) => {
            trace!(target: "input", kind = "mouse", column = m.column, row = m.row, "input_event")
        }
        InputEvent::Resize(w, h) => debug!(target: "input", kind = "resize", w, h, "input_event"),
        InputEvent::Paste(text) => {
            trace!(target: "input", kind = "paste", len = text.len(), "input_event")
        }
    }
}
