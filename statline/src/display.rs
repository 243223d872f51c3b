//! Console readout: polls the shared store once a second and prints the
//! newest values. Stands in for a richer display fed by the same snapshots.

use std::time::Duration;

use tokio::time::interval;

use crate::history::{SharedStore, Snapshot};

/// Refresh cadence for the console readout.
pub const DISPLAY_INTERVAL: Duration = Duration::from_secs(1);

/// Latest values as one printable line; `None` until the first sample lands.
pub fn format_latest(snap: &Snapshot) -> Option<String> {
    let cpu = snap.cpu.last()?;
    let mem = snap.memory.last()?;
    Some(match snap.gpu.last() {
        Some(g) if *g >= 0.0 => {
            format!("cpu {cpu:5.1}% | mem {mem:5.1}% | gpu {g:5.1}%")
        }
        _ => format!("cpu {cpu:5.1}% | mem {mem:5.1}% | gpu   n/a"),
    })
}

/// Print the newest readings on a fixed tick until the process exits.
pub async fn run_display(store: SharedStore) {
    let mut tick = interval(DISPLAY_INTERVAL);
    loop {
        tick.tick().await;
        let snap = store.lock().await.snapshot();
        if let Some(line) = format_latest(&snap) {
            println!("{line}");
        }
    }
}
