//! Live-location tracking controller.
//!
//! Consumes a stream of raw position fixes and decides how the map view
//! reacts: the first fix centers the view exactly once, later fixes center
//! only while auto-center is on, everything else is a marker update. The
//! best-known position fans out to registered sinks, which is how proximity
//! search and the map renderer both see one consistent position without
//! duplicating raw-fix handling.

use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::domain::Position;
use crate::error::{Result, TravelokiError};

/// One event from the platform location source.
#[derive(Debug, Clone)]
pub enum FixEvent {
    Fix(Position),
    /// Transient source failure (permission denied, timeout, unsupported).
    Failed(String),
}

/// Observer of derived location updates. `center_on` is a view-centering
/// command; `update_marker` only moves the displayed marker.
pub trait ViewSink: Send + Sync {
    fn center_on(&self, position: &Position);
    fn update_marker(&self, position: &Position);
}

pub struct LocationTracker {
    last_known: Option<Position>,
    centered_once: bool,
    auto_center: bool,
    sinks: Vec<Arc<dyn ViewSink>>,
}

impl Default for LocationTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl LocationTracker {
    pub fn new() -> Self {
        Self {
            last_known: None,
            centered_once: false,
            auto_center: false,
            sinks: Vec::new(),
        }
    }

    pub fn register_sink(&mut self, sink: Arc<dyn ViewSink>) {
        self.sinks.push(sink);
    }

    pub fn last_known(&self) -> Option<Position> {
        self.last_known
    }

    pub fn auto_center_enabled(&self) -> bool {
        self.auto_center
    }

    /// Flip auto-center. Takes effect on the next fix; never re-centers
    /// retroactively.
    pub fn toggle_auto_center(&mut self) -> bool {
        self.auto_center = !self.auto_center;
        debug!("Auto-center {}", if self.auto_center { "on" } else { "off" });
        self.auto_center
    }

    /// Apply one incoming fix, in arrival order.
    pub fn handle_fix(&mut self, position: Position) {
        self.last_known = Some(position);

        if !self.centered_once {
            // First fix centers exactly once, regardless of the toggle.
            self.centered_once = true;
            for sink in &self.sinks {
                sink.center_on(&position);
            }
        } else if self.auto_center {
            for sink in &self.sinks {
                sink.center_on(&position);
            }
        } else {
            for sink in &self.sinks {
                sink.update_marker(&position);
            }
        }
    }

    /// Report a transient source failure. State is untouched and the tracker
    /// keeps listening; the error is a one-shot notification to the caller.
    pub fn handle_source_error(&self, message: &str) -> TravelokiError {
        warn!("Location source error: {}", message);
        TravelokiError::LocationUnavailable(message.to_string())
    }

    /// One-shot center on the best-known position.
    pub fn center_on_demand(&mut self) -> Result<Position> {
        let position = self.last_known.ok_or(TravelokiError::NoLocation)?;
        self.centered_once = true;
        for sink in &self.sinks {
            sink.center_on(&position);
        }
        Ok(position)
    }
}

/// Handle to a running tracker subscription. Dropping the handle does not
/// stop the task; call `clear_watch` to cancel explicitly.
pub struct TrackerHandle {
    shared: Arc<Mutex<LocationTracker>>,
    task: JoinHandle<()>,
}

impl TrackerHandle {
    pub fn last_known(&self) -> Option<Position> {
        self.shared.lock().unwrap().last_known()
    }

    pub fn toggle_auto_center(&self) -> bool {
        self.shared.lock().unwrap().toggle_auto_center()
    }

    pub fn center_on_demand(&self) -> Result<Position> {
        self.shared.lock().unwrap().center_on_demand()
    }

    /// Cancel the subscription. No fix is applied after this returns.
    pub async fn clear_watch(self) {
        self.task.abort();
        let _ = self.task.await;
    }
}

/// Run a tracker as a long-lived subscription to a fix stream. Fixes are
/// processed one at a time, in arrival order; source failures are logged and
/// never terminate the loop.
pub fn spawn(tracker: LocationTracker, mut fixes: mpsc::Receiver<FixEvent>) -> TrackerHandle {
    let shared = Arc::new(Mutex::new(tracker));
    let state = shared.clone();

    let task = tokio::spawn(async move {
        while let Some(event) = fixes.recv().await {
            let mut tracker = state.lock().unwrap();
            match event {
                FixEvent::Fix(position) => tracker.handle_fix(position),
                FixEvent::Failed(message) => {
                    let _ = tracker.handle_source_error(&message);
                }
            }
        }
        debug!("Location subscription ended");
    });

    TrackerHandle { shared, task }
}
