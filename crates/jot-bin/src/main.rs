//! jot entrypoint.
use anyhow::Result;
use clap::Parser;
use core_actions::open_editor;
use core_config::{Config, load_from};
use core_events::{EVENT_CHANNEL_CAP, Event, InputEvent, ShutdownSignal};
use core_input::{PUMP_STATS, PumpStats, StopCause};
use core_model::App;
use core_render::{Tabs, Theme};
use core_terminal::{CrosstermBackend, CrosstermSurface, MemorySurface, Surface, TerminalBackend};
use std::cell::RefCell;
use std::io::Write;
use std::path::PathBuf;
use std::rc::Rc;
use std::sync::atomic::Ordering;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

mod keys;
mod logging;
mod window;

/// CLI arguments.
#[derive(Parser, Debug)]
#[command(name = "jot", version, about = "A small terminal text editor")]
struct Args {
    /// Files to open, one tab each. A missing file is created on the first
    /// save.
    pub paths: Vec<PathBuf>,
    /// Configuration file (overrides discovery of `jot.toml`).
    #[arg(long = "config")]
    pub config: Option<PathBuf>,
}

/// A surface the main loop can resize when the terminal does.
trait Screen: Surface {
    fn resize_to(&mut self, width: u16, height: u16);
}

impl<W: Write> Screen for CrosstermSurface<W> {
    fn resize_to(&mut self, width: u16, height: u16) {
        self.resize(width, height);
    }
}

impl Screen for MemorySurface {
    fn resize_to(&mut self, width: u16, height: u16) {
        self.resize(width, height);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ExitReason {
    Requested,
    ShutdownEvent,
    ChannelClosed,
}

impl ExitReason {
    fn as_str(self) -> &'static str {
        match self {
            ExitReason::Requested => "requested",
            ExitReason::ShutdownEvent => "shutdown_event",
            ExitReason::ChannelClosed => "channel_closed",
        }
    }
}

fn apply_config(tabs: &Tabs, app: &mut App, config: &Config) {
    for index in 0..tabs.len() {
        let Some(state) = tabs.state(index) else {
            continue;
        };
        let mut state = state.borrow_mut();
        state.set_max_candidates(config.max_candidates());
        state.set_multi_click_window(config.multi_click_window());
    }
    app.set_scroll_sensitivity(config.scroll_sensitivity());
}

/// One tab per path in argument order, the first one on show. Without paths
/// there is a single empty buffer. A path given twice gets one tab.
fn open_tabs(paths: &[PathBuf], theme: Theme) -> Tabs {
    let mut states = paths
        .iter()
        .map(|path| Rc::new(RefCell::new(open_editor(Some(path)))));
    let first = states
        .next()
        .unwrap_or_else(|| Rc::new(RefCell::new(open_editor(None))));
    let tabs = Tabs::new(first, theme);
    for state in states {
        tabs.open(state);
    }
    tabs.activate(0);
    tabs
}

/// Build the window around `tabs` with the shell key table, focused on the
/// editor group.
fn build_app(tabs: &Tabs, shutdown: &ShutdownSignal) -> App {
    let window = window::build(tabs, Theme::default());
    let keymap = keys::global_keymap(tabs, &window.prompt);
    let mut app = App::new(window.root, keymap, shutdown.clone());
    app.focus(window.editor);
    app
}

/// Check for shutdown, wait for an event, dispatch it, repaint. Draws only
/// happen on this task.
async fn event_loop<S: Screen>(
    app: &mut App,
    surface: &mut S,
    rx: &mut mpsc::Receiver<Event>,
    shutdown: &ShutdownSignal,
) -> Result<ExitReason> {
    loop {
        if shutdown.is_requested() {
            return Ok(ExitReason::Requested);
        }
        let Some(event) = rx.recv().await else {
            return Ok(ExitReason::ChannelClosed);
        };
        let input = match event {
            Event::Shutdown => return Ok(ExitReason::ShutdownEvent),
            Event::Input(input) => input,
        };
        if let InputEvent::Resize(width, height) = input {
            surface.resize_to(width, height);
        }
        if !app.handle_event(&input) || shutdown.is_requested() {
            continue;
        }
        app.draw(surface);
        surface.flush()?;
    }
}

async fn run(args: Args) -> Result<()> {
    info!(target: "runtime", "startup");
    let config = load_from(args.config.clone())?;
    let tabs = open_tabs(&args.paths, Theme::default());
    let shutdown = ShutdownSignal::new();
    let mut app = build_app(&tabs, &shutdown);
    apply_config(&tabs, &mut app, &config);
    info!(
        target: "runtime",
        tabs = tabs.len(),
        config_override = args.config.is_some(),
        config_found = config.source.is_some(),
        "bootstrap_complete"
    );

    let mut backend = CrosstermBackend::new();
    backend.set_title("jot")?;
    let (width, height) = backend.size()?;
    let _terminal_guard = backend.enter_guard()?;
    let mut surface = CrosstermSurface::stdout(width, height);
    app.resize(width, height);
    app.draw(&mut surface);
    surface.flush()?;

    let (tx, mut rx) = mpsc::channel::<Event>(EVENT_CHANNEL_CAP);
    let (input_task, input_shutdown) = core_input::spawn_async_input(tx);
    let reason = event_loop(&mut app, &mut surface, &mut rx, &shutdown).await;

    input_shutdown.signal();
    rx.close();
    match tokio::time::timeout(Duration::from_millis(200), input_task).await {
        Ok(Ok(())) => debug!(target: "runtime", "input_task_joined"),
        Ok(Err(err)) => warn!(target: "runtime", ?err, "input_task_join_error"),
        Err(_) => warn!(target: "runtime", "input_task_join_timeout"),
    }
    log_input_stats(&PUMP_STATS);
    let reason = reason?;
    info!(target: "runtime", reason = reason.as_str(), "shutdown");
    Ok(())
}

fn log_input_stats(stats: &PumpStats) {
    info!(
        target: "runtime",
        started = stats.started.load(Ordering::Relaxed),
        forwarded = stats.forwarded.load(Ordering::Relaxed),
        failed_sends = stats.failed_sends.load(Ordering::Relaxed),
        stopped_requested = stats.stops(StopCause::Requested),
        stopped_receiver_gone = stats.stops(StopCause::ReceiverGone),
        stopped_stream_ended = stats.stops(StopCause::StreamEnded),
        stopped_stream_failed = stats.stops(StopCause::StreamFailed),
        "input_stats"
    );
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();
    let _log_guard = logging::configure_logging()?;
    logging::install_panic_hook();
    run(args).await
}
