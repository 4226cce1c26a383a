//! File logging. The terminal is in raw mode while the editor runs, so
//! nothing may be written to stdout or stderr.

use anyhow::Result;
use std::io;
use std::path::Path;
use std::sync::Once;
use tracing::warn;
use tracing_appender::non_blocking::WorkerGuard;

pub const LOG_FILE: &str = "jot.log";

/// Install the global subscriber: `RUST_LOG` filter, non-blocking writer to
/// [`LOG_FILE`] in the working directory. The returned guard must live until
/// exit or buffered lines are lost.
pub fn configure_logging() -> Result<Option<WorkerGuard>> {
    let log_dir = Path::new(".");
    let log_path = log_dir.join(LOG_FILE);
    let stale = clear_previous_log(&log_path);

    let file_appender = tracing_appender::rolling::never(log_dir, LOG_FILE);
    let (nb_writer, guard) = tracing_appender::non_blocking(file_appender);
    let installed = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_ansi(false)
        .with_writer(nb_writer)
        .try_init();
    if let Some(err) = stale {
        warn!(
            target: "runtime",
            error = %err,
            path = %log_path.display(),
            "previous_log_remove_failed"
        );
    }
    // a subscriber installed earlier keeps receiving events; dropping the
    // guard shuts our writer down
    Ok(installed.ok().map(|_| guard))
}

/// Remove the previous run's log. A missing file is fine; any other
/// failure is handed back so it can be logged once a subscriber exists.
fn clear_previous_log(path: &Path) -> Option<io::Error> {
    match std::fs::remove_file(path) {
        Ok(()) => None,
        Err(err) if err.kind() == io::ErrorKind::NotFound => None,
        Err(err) => Some(err),
    }
}

/// Log panics before the default hook prints them.
pub fn install_panic_hook() {
    static HOOK: Once = Once::new();
    HOOK.call_once(|| {
        let default_panic = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            tracing::error!(target: "runtime.panic", ?info, "panic");
            default_panic(info);
        }));
    });
}
