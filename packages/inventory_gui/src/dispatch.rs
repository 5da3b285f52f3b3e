//! Routing raw host events to the GUI whose container they concern.

use crate::{
    context::GuiContext,
    event::GuiEvent,
    host::{Side, ViewerId},
    session::extract_session,
    translate::{RawAction, RawClick, RawDrag},
};
use std::sync::Arc;


/// Receives the host's raw container events and hands them to the right GUI. Events for
/// containers that were not created by a GUI are left alone.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    cx: GuiContext,
}

impl Dispatcher {
    pub fn new(cx: GuiContext) -> Self {
        Dispatcher { cx }
    }

    pub fn on_click(&self, raw: &mut RawClick) {
        let session = match extract_session(&*self.cx.host, raw.viewer) {
            Some(session) => session,
            None => return,
        };
        if raw.side == Side::Bottom && raw.action == RawAction::NumberKey {
            // would move a hotbar item into or out of the gui
            raw.cancelled = true;
            return;
        }
        if let Err(e) = session.gui().handle_click(&session, raw) {
            error!(%e, viewer = %raw.viewer, "error handling gui click");
            raw.cancelled = true;
        }
    }

    pub fn on_drag(&self, drag: &mut RawDrag) {
        if let Some(session) = extract_session(&*self.cx.host, drag.viewer) {
            session.gui().handle_drag(&session, drag);
        }
    }

    /// The viewer is closing their open container. Call before the host forgets it.
    pub fn on_close(&self, viewer: ViewerId) {
        if self.cx.is_close_suppressed(viewer) {
            trace!(%viewer, "ignoring close of replaced gui container");
            return;
        }
        if let Some(session) = extract_session(&*self.cx.host, viewer) {
            debug!(%viewer, gui = %session.gui().id(), "viewer closed gui");
            let gui = Arc::clone(session.gui());
            gui.fire(&GuiEvent::Close { session, viewer });
        }
    }
}


#[test]
fn test_events_without_gui_are_ignored() {
    use crate::{
        host::SlotRef,
        mem_host::test_context,
        translate::RawAction,
    };

    let (host, cx) = test_context();
    let dispatcher = Dispatcher::new(cx);
    let viewer = ViewerId(1);
    host.add_viewer(viewer);
    let mut raw = RawClick::new(viewer, SlotRef::bottom(0), RawAction::NumberKey);
    dispatcher.on_click(&mut raw);
    assert!(!raw.cancelled);
    let mut drag = RawDrag {
        viewer,
        slots: vec![SlotRef::top(0)],
        even: true,
        cancelled: false,
    };
    dispatcher.on_drag(&mut drag);
    assert!(!drag.cancelled);
}

#[test]
fn test_number_key_in_own_inventory_cancelled() {
    use crate::{
        contents::StaticContents,
        gui::Gui,
        host::SlotRef,
        mem_host::test_context,
        session::StateLifetime,
    };

    let (host, cx) = test_context();
    let gui = Gui::builder()
        .lifetime(StateLifetime::Session)
        .static_contents(StaticContents::new("Keys", Vec::new()))
        .build(&cx)
        .unwrap();
    let dispatcher = Dispatcher::new(cx);
    let viewer = ViewerId(1);
    host.add_viewer(viewer);
    gui.open(viewer).unwrap();

    let mut raw = RawClick::new(viewer, SlotRef::bottom(4), RawAction::NumberKey);
    dispatcher.on_click(&mut raw);
    assert!(raw.cancelled);
}

#[test]
fn test_close_suppression_guard() {
    use crate::{
        contents::StaticContents,
        gui::Gui,
        host::Host,
        mem_host::test_context,
        session::StateLifetime,
    };
    use parking_lot::Mutex;

    let (host, cx) = test_context();
    let closes = Arc::new(Mutex::new(0));
    let closes2 = Arc::clone(&closes);
    let gui = Gui::builder()
        .lifetime(StateLifetime::Session)
        .static_contents(StaticContents::new("Closing", Vec::new()))
        .listener(move |event: &GuiEvent, _: &mut crate::event::EventResult| {
            if let GuiEvent::Close { .. } = event {
                *closes2.lock() += 1;
            }
        })
        .build(&cx)
        .unwrap();
    let viewer = ViewerId(1);
    host.add_viewer(viewer);

    gui.open(viewer).unwrap();
    {
        let _guard = cx.suppress_close(viewer);
        assert!(cx.is_close_suppressed(viewer));
        host.close_container(viewer);
    }
    assert!(!cx.is_close_suppressed(viewer));
    assert_eq!(*closes.lock(), 0);

    gui.open(viewer).unwrap();
    host.close_container(viewer);
    assert_eq!(*closes.lock(), 1);
}
