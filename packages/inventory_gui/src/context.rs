//! Handles to the outside world, shared by every GUI built against them.

use crate::{
    event::{EventBus, NoEventBus},
    host::{Host, ViewerId},
    item::StackLimits,
    scheduler::Scheduler,
    settings::Settings,
};
use std::{
    collections::HashSet,
    fmt::{self, Formatter, Debug},
    sync::Arc,
};
use parking_lot::Mutex;


/// Explicit context passed to GUIs in place of process-wide singletons.
#[derive(Clone)]
pub struct GuiContext {
    pub host: Arc<dyn Host>,
    pub scheduler: Arc<dyn Scheduler>,
    /// Host-wide event bus, consulted before GUI listeners.
    pub events: Arc<dyn EventBus>,
    pub settings: Arc<Settings>,
    pub limits: Arc<StackLimits>,
    suppressed_closes: Arc<Mutex<HashSet<ViewerId>>>,
}

impl GuiContext {
    /// Construct with default settings, stack limits, and no host event bus.
    pub fn new(host: Arc<dyn Host>, scheduler: Arc<dyn Scheduler>) -> Self {
        GuiContext {
            host,
            scheduler,
            events: Arc::new(NoEventBus),
            settings: Default::default(),
            limits: Default::default(),
            suppressed_closes: Default::default(),
        }
    }

    pub fn with_settings(mut self, settings: Settings) -> Self {
        self.settings = Arc::new(settings);
        self
    }

    pub fn with_limits(mut self, limits: StackLimits) -> Self {
        self.limits = Arc::new(limits);
        self
    }

    pub fn with_event_bus(mut self, events: Arc<dyn EventBus>) -> Self {
        self.events = events;
        self
    }

    /// Mark close notifications for `viewer` as ignored until the returned guard drops.
    pub fn suppress_close(&self, viewer: ViewerId) -> SuppressCloseGuard {
        self.suppressed_closes.lock().insert(viewer);
        SuppressCloseGuard {
            set: Arc::clone(&self.suppressed_closes),
            viewer,
        }
    }

    /// Whether close notifications for `viewer` are currently ignored.
    pub fn is_close_suppressed(&self, viewer: ViewerId) -> bool {
        self.suppressed_closes.lock().contains(&viewer)
    }
}

impl Debug for GuiContext {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.debug_struct("GuiContext")
            .field("settings", &self.settings)
            .field("limits", &self.limits)
            .finish_non_exhaustive()
    }
}


/// See `GuiContext::suppress_close`.
#[must_use]
pub struct SuppressCloseGuard {
    set: Arc<Mutex<HashSet<ViewerId>>>,
    viewer: ViewerId,
}

impl Drop for SuppressCloseGuard {
    fn drop(&mut self) {
        self.set.lock().remove(&self.viewer);
    }
}
