//! Terminal input for jot: crossterm events normalized into `core_events`
//! and pushed onto the main loop's channel by a background task.

mod mapping;
mod pump;

pub use pump::{InputStop, PUMP_STATS, PumpStats, StopCause};

use core_events::Event;
use tokio::sync::mpsc::Sender;
use tokio::task::JoinHandle;

/// Spawn the input pump on the current runtime. Signal the returned
/// [`InputStop`] and await the handle to shut it down.
pub fn spawn_async_input(sender: Sender<Event>) -> (JoinHandle<()>, InputStop) {
    pump::spawn(sender)
}
