//! Log-based event sink adapters.
//!
//! [`LogEventSink`] writes application events through the `log` facade;
//! the server binary routes those records to stderr. [`RecordingSink`]
//! keeps them in memory for assertions.

use std::sync::Mutex;

use log::info;

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`].
#[derive(Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&self, event: &AppEvent) {
        match event {
            AppEvent::NoteAdded {
                note_id,
                notetype_id,
                image,
            } => {
                info!(
                    "NOTE | added id={} notetype={} image={}",
                    note_id, notetype_id, image
                );
            }
            AppEvent::NoteUpdated(id) => {
                info!("NOTE | updated id={}", id);
            }
            AppEvent::NotetypeAdded(id) => {
                info!("NOTETYPE | image occlusion added id={}", id);
            }
            AppEvent::NotetypeAlreadyPresent(id) => {
                info!("NOTETYPE | image occlusion present id={}", id);
            }
        }
    }
}

/// Sink that remembers every event it receives.
#[derive(Default)]
pub struct RecordingSink {
    events: Mutex<Vec<AppEvent>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drain the recorded events.
    pub fn take(&self) -> Vec<AppEvent> {
        self.events
            .lock()
            .map(|mut e| std::mem::take(&mut *e))
            .unwrap_or_default()
    }
}

impl EventSink for RecordingSink {
    fn emit(&self, event: &AppEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event.clone());
        }
    }
}
