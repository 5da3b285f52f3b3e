//! Semantic GUI events and the chain they travel through.

use crate::{
    element::Element,
    host::ViewerId,
    item::ItemStack,
    session::Session,
};
use std::sync::Arc;


/// How many items a pickup or place concerns.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Amount {
    All,
    /// Roughly half, rounded up. Produced by host actions that move "some".
    Some,
    Half,
    One,
}

/// What a click means once translated out of the host's raw action.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ClickKind {
    /// Move items from the slot onto the cursor.
    Pickup(Amount),
    /// Move items from the cursor into the slot.
    Place(Amount),
    /// Anything else, such as number keys or middle clicks.
    Misc,
}

/// A viewer interacting with one slot of a GUI page.
#[derive(Debug, Clone)]
pub struct ClickEvent {
    pub session: Arc<Session>,
    pub viewer: ViewerId,
    pub slot: usize,
    /// Element occupying the slot on the session's current page.
    pub element: Option<Arc<dyn Element>>,
    pub kind: ClickKind,
}

impl ClickEvent {
    /// The viewer's cursor, as the host currently has it.
    pub fn cursor(&self) -> Option<ItemStack> {
        self.session.gui().context().host.cursor(self.viewer)
    }
}

#[derive(Debug, Clone)]
pub enum GuiEvent {
    Open {
        session: Arc<Session>,
        viewer: ViewerId,
    },
    Close {
        session: Arc<Session>,
        viewer: ViewerId,
    },
    /// The viewer's view was re-rendered.
    Update {
        session: Arc<Session>,
        viewer: ViewerId,
    },
    Click(ClickEvent),
}

impl GuiEvent {
    pub fn session(&self) -> &Arc<Session> {
        match self {
            GuiEvent::Open { session, .. }
            | GuiEvent::Close { session, .. }
            | GuiEvent::Update { session, .. } => session,
            GuiEvent::Click(click) => &click.session,
        }
    }

    pub fn viewer(&self) -> ViewerId {
        match *self {
            GuiEvent::Open { viewer, .. }
            | GuiEvent::Close { viewer, .. }
            | GuiEvent::Update { viewer, .. } => viewer,
            GuiEvent::Click(ref click) => click.viewer,
        }
    }
}


/// Stage of the event chain.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Stage {
    HostBus,
    Listener,
    Element,
}

/// Outcome of raising an event.
///
/// Two independent flags: whether the semantic event was cancelled, and whether the host should
/// suppress its own default handling of the raw interaction. The latter defaults to suppressed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventResult {
    cancelled: bool,
    raw_cancelled: bool,
    consumed_by: Option<Stage>,
}

impl EventResult {
    /// Construct with defaults.
    pub fn new() -> Self {
        EventResult {
            cancelled: false,
            raw_cancelled: true,
            consumed_by: None,
        }
    }

    pub fn cancel(&mut self) {
        self.cancelled = true;
    }

    pub fn set_cancelled(&mut self, cancelled: bool) {
        self.cancelled = cancelled;
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    /// Let the host perform its own default handling of the raw interaction.
    pub fn allow_raw(&mut self) {
        self.raw_cancelled = false;
    }

    pub fn cancel_raw(&mut self) {
        self.raw_cancelled = true;
    }

    pub fn is_raw_cancelled(&self) -> bool {
        self.raw_cancelled
    }

    /// Last stage the event reached.
    pub fn consumed_by(&self) -> Option<Stage> {
        self.consumed_by
    }

    pub(crate) fn reached(&mut self, stage: Stage) {
        self.consumed_by = Some(stage);
    }
}

impl Default for EventResult {
    fn default() -> Self {
        EventResult::new()
    }
}


/// Listener registered on a single GUI.
pub trait GuiListener: Send + Sync {
    fn on_event(&self, event: &GuiEvent, result: &mut EventResult);
}

impl<F> GuiListener for F
where
    F: Fn(&GuiEvent, &mut EventResult) + Send + Sync,
{
    fn on_event(&self, event: &GuiEvent, result: &mut EventResult) {
        self(event, result)
    }
}

/// Host-wide event bus. Sees every GUI event before any GUI listener.
pub trait EventBus: Send + Sync {
    fn fire(&self, event: &GuiEvent, result: &mut EventResult);
}

/// Event bus with no subscribers.
#[derive(Debug, Copy, Clone, Default)]
pub struct NoEventBus;

impl EventBus for NoEventBus {
    fn fire(&self, _event: &GuiEvent, _result: &mut EventResult) {}
}

impl<F> EventBus for F
where
    F: Fn(&GuiEvent, &mut EventResult) + Send + Sync,
{
    fn fire(&self, event: &GuiEvent, result: &mut EventResult) {
        self(event, result)
    }
}
