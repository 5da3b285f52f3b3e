//! The GUI itself: configuration, opening, and view updates.

use crate::{
    context::GuiContext,
    contents::{ContentSource, StaticContents},
    event::*,
    host::{ContainerKind, ViewerId},
    populator::Populator,
    presenter::Presenter,
    session::{Session, StateLifetime, extract_session},
};
use std::{
    fmt::{self, Formatter, Debug, Display},
    sync::Arc,
};
use futures::FutureExt;
use uuid::Uuid;
use anyhow::*;


/// Unique identity of a GUI.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct GuiId(Uuid);

impl GuiId {
    pub fn new() -> Self {
        GuiId(Uuid::new_v4())
    }
}

impl Display for GuiId {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        Display::fmt(&self.0, f)
    }
}


/// A configured GUI. Can be open for any number of viewers at once.
pub struct Gui {
    id: GuiId,
    cx: GuiContext,
    kind: ContainerKind,
    max_size: usize,
    dynamic: bool,
    lifetime: StateLifetime,
    contents: Box<dyn ContentSource>,
    listeners: Vec<Arc<dyn GuiListener>>,
    populator: Populator,
    presenter: Presenter,
}

impl Gui {
    pub fn builder() -> GuiBuilder {
        GuiBuilder::new()
    }

    pub fn id(&self) -> GuiId {
        self.id
    }

    pub fn context(&self) -> &GuiContext {
        &self.cx
    }

    pub fn kind(&self) -> ContainerKind {
        self.kind
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }

    pub fn is_dynamic(&self) -> bool {
        self.dynamic
    }

    pub fn lifetime(&self) -> &StateLifetime {
        &self.lifetime
    }

    pub fn contents(&self) -> &dyn ContentSource {
        &*self.contents
    }

    /// Open page 1 for `viewer`.
    pub fn open(self: &Arc<Self>, viewer: ViewerId) -> Result<()> {
        self.open_page(viewer, 1)
    }

    /// Open a page for `viewer`. If they already have a session with this GUI, it moves to the
    /// page. Otherwise a new session starts there.
    pub fn open_page(self: &Arc<Self>, viewer: ViewerId, page: u32) -> Result<()> {
        ensure!(page >= 1, "page numbers start at 1, got {}", page);
        if let Some(session) = self.session_of(viewer) {
            session.set_page(page)?;
            return self.update_contents_and_view(viewer);
        }

        debug!(gui = %self.id, %viewer, page, "opening gui");
        let session = Session::new(Arc::clone(self), page, self.lifetime.session_state());
        let gui = Arc::clone(self);
        self.cx.scheduler.spawn(async move {
            gui.populator.populate(&session, viewer).await;
            if let Err(e) = gui.presenter.update_view(viewer, &session) {
                error!(%e, gui = %gui.id, %viewer, "unable to show opened gui");
                return;
            }
            gui.fire(&GuiEvent::Open { session, viewer });
        }.boxed());
        Ok(())
    }

    /// The viewer's session with this GUI, if they have it open.
    pub fn session_of(&self, viewer: ViewerId) -> Option<Arc<Session>> {
        extract_session(&*self.cx.host, viewer)
            .filter(|session| session.is_for(self))
    }

    /// Every viewer that has this GUI open, with their session.
    pub fn viewing_sessions(&self) -> Vec<(ViewerId, Arc<Session>)> {
        self.cx.host.viewers()
            .into_iter()
            .filter_map(|viewer| self.session_of(viewer).map(|session| (viewer, session)))
            .collect()
    }

    /// Sessions an update triggered through `viewer` should reach.
    fn update_targets(&self, viewer: ViewerId) -> Vec<(ViewerId, Arc<Session>)> {
        if self.lifetime.broadcasts() {
            self.viewing_sessions()
        } else {
            self.session_of(viewer)
                .map(|session| vec![(viewer, session)])
                .unwrap_or_default()
        }
    }

    /// Re-render the viewer's current page from its existing state. Does nothing if they don't
    /// have this GUI open. Shared GUIs re-render for every viewer.
    pub fn update_view(&self, viewer: ViewerId) -> Result<()> {
        for (viewer, session) in self.update_targets(viewer) {
            self.present(viewer, &session)?;
        }
        Ok(())
    }

    /// Recompute the viewer's current page, then re-render it. Does nothing if they don't have
    /// this GUI open. Shared GUIs do this for every viewer.
    pub fn update_contents_and_view(&self, viewer: ViewerId) -> Result<()> {
        for (viewer, session) in self.update_targets(viewer) {
            let gui = Arc::clone(session.gui());
            self.cx.scheduler.spawn(async move {
                gui.populator.populate(&session, viewer).await;
                if let Err(e) = gui.present(viewer, &session) {
                    error!(%e, gui = %gui.id, %viewer, "unable to update gui view");
                }
            }.boxed());
        }
        Ok(())
    }

    /// `update_view` for every viewer of this GUI.
    pub fn update_view_all(&self) -> Result<()> {
        for (viewer, session) in self.viewing_sessions() {
            self.present(viewer, &session)?;
        }
        Ok(())
    }

    /// `update_contents_and_view` for every viewer of this GUI.
    pub fn update_contents_and_view_all(&self) -> Result<()> {
        for (viewer, _) in self.viewing_sessions() {
            self.update_contents_and_view(viewer)?;
            if self.lifetime.broadcasts() {
                break;
            }
        }
        Ok(())
    }

    fn present(&self, viewer: ViewerId, session: &Arc<Session>) -> Result<()> {
        self.presenter.update_view(viewer, session)?;
        self.fire(&GuiEvent::Update {
            session: Arc::clone(session),
            viewer,
        });
        Ok(())
    }

    /// Pass a notification event through the host bus and this GUI's listeners.
    pub(crate) fn fire(&self, event: &GuiEvent) -> EventResult {
        let mut result = EventResult::new();
        self.cx.events.fire(event, &mut result);
        result.reached(Stage::HostBus);
        for listener in &self.listeners {
            listener.on_event(event, &mut result);
            result.reached(Stage::Listener);
        }
        result
    }

    /// Raise a click through the event chain: host bus, then listeners, then the clicked
    /// element. A cancellation at one stage skips every later stage.
    pub fn raise_click(&self, event: ClickEvent) -> EventResult {
        let mut result = EventResult::new();
        let event = GuiEvent::Click(event);

        self.cx.events.fire(&event, &mut result);
        result.reached(Stage::HostBus);
        if result.is_cancelled() {
            return result;
        }

        for listener in &self.listeners {
            listener.on_event(&event, &mut result);
        }
        if !self.listeners.is_empty() {
            result.reached(Stage::Listener);
        }
        if result.is_cancelled() {
            return result;
        }

        if let GuiEvent::Click(click) = &event {
            match &click.element {
                Some(element) => {
                    result.reached(Stage::Element);
                    element.on_event(click, &mut result);
                }
                None => result.cancel_raw(),
            }
        }
        result
    }
}

impl Debug for Gui {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.debug_struct("Gui")
            .field("id", &self.id)
            .field("kind", &self.kind)
            .field("max_size", &self.max_size)
            .field("dynamic", &self.dynamic)
            .field("lifetime", &self.lifetime)
            .finish_non_exhaustive()
    }
}


/// Builder for `Gui`. Validation happens in `build`.
pub struct GuiBuilder {
    lifetime: Option<StateLifetime>,
    kind: ContainerKind,
    size: Option<usize>,
    dynamic: bool,
    contents: Option<Box<dyn ContentSource>>,
    static_title: Option<String>,
    listeners: Vec<Arc<dyn GuiListener>>,
}

impl GuiBuilder {
    pub fn new() -> Self {
        GuiBuilder {
            lifetime: None,
            kind: ContainerKind::Chest,
            size: None,
            dynamic: false,
            contents: None,
            static_title: None,
            listeners: Vec::new(),
        }
    }

    /// Required.
    pub fn lifetime(mut self, lifetime: StateLifetime) -> Self {
        self.lifetime = Some(lifetime);
        self
    }

    pub fn kind(mut self, kind: ContainerKind) -> Self {
        self.kind = kind;
        self
    }

    /// Maximum size. Defaults to the kind's default size.
    pub fn size(mut self, size: usize) -> Self {
        self.size = Some(size);
        self
    }

    /// Shrink the container to fit the page, in whole rows.
    pub fn dynamic(mut self, dynamic: bool) -> Self {
        self.dynamic = dynamic;
        self
    }

    /// Required, unless `static_contents` is used.
    pub fn contents<C: ContentSource + 'static>(mut self, contents: C) -> Self {
        self.contents = Some(Box::new(contents));
        self.static_title = None;
        self
    }

    /// Single-page contents with a fixed title. The title is validated at build time.
    pub fn static_contents(mut self, contents: StaticContents) -> Self {
        self.static_title = Some(contents.title.clone());
        self.contents = Some(Box::new(contents));
        self
    }

    pub fn listener<L: GuiListener + 'static>(mut self, listener: L) -> Self {
        self.listeners.push(Arc::new(listener));
        self
    }

    pub fn build(self, cx: &GuiContext) -> Result<Arc<Gui>> {
        let lifetime = self.lifetime
            .ok_or_else(|| anyhow!("gui state lifetime must be specified"))?;
        let contents = self.contents
            .ok_or_else(|| anyhow!("gui contents must be specified"))?;
        let max_size = self.size.unwrap_or(self.kind.default_size());
        self.kind.validate(max_size, self.dynamic)?;
        if let Some(title) = &self.static_title {
            let max_len = cx.settings.max_title_len;
            ensure!(
                title.chars().count() <= max_len,
                "gui title {:?} is longer than {} characters",
                title, max_len,
            );
        }
        let gui = Gui {
            id: GuiId::new(),
            cx: cx.clone(),
            kind: self.kind,
            max_size,
            dynamic: self.dynamic,
            lifetime,
            contents,
            listeners: self.listeners,
            populator: Populator,
            presenter: Presenter,
        };
        debug!(gui = %gui.id, kind = ?gui.kind, max_size, "built gui");
        Ok(Arc::new(gui))
    }
}

impl Default for GuiBuilder {
    fn default() -> Self {
        GuiBuilder::new()
    }
}


#[cfg(test)]
fn numbered_items(n: usize) -> Vec<Arc<dyn crate::element::Element>> {
    use crate::{
        element::ActionItem,
        item::{ItemStack, RawItemId},
    };

    (0..n)
        .map(|i| {
            let display = ItemStack::new(RawItemId(1), i as u8 + 1).unwrap();
            Arc::new(ActionItem::new(display, |_: &ClickEvent, _: &mut EventResult| ())) as Arc<dyn crate::element::Element>
        })
        .collect()
}

#[cfg(test)]
fn shop(cx: &GuiContext, lifetime: StateLifetime, n: usize) -> Arc<Gui> {
    use crate::contents::{PaginatingSource, StaticList};

    Gui::builder()
        .lifetime(lifetime)
        .size(27)
        .contents(PaginatingSource(StaticList::new("Shop", numbered_items(n)).with_page_number()))
        .build(cx)
        .unwrap()
}

#[test]
fn test_open_first_page_of_paginated_gui() {
    use crate::{
        contents::PAGE_COUNT,
        item::count_of,
        mem_host::test_context,
    };

    let (host, cx) = test_context();
    let gui = shop(&cx, StateLifetime::Session, 30);
    let viewer = ViewerId(1);
    host.add_viewer(viewer);
    gui.open(viewer).unwrap();

    let slots = host.visible_slots(viewer);
    assert_eq!(slots.len(), 27);
    for i in 0..25 {
        assert_eq!(count_of(slots[i].as_ref()), i as u8 + 1);
    }
    assert_eq!(slots[25].as_ref().unwrap().meta.name.as_ref(), Some(&cx.settings.lang.prev_page_name));
    assert_eq!(slots[26].as_ref().unwrap().meta.name.as_ref(), Some(&cx.settings.lang.next_page_name));
    assert_eq!(host.visible_title(viewer).as_deref(), Some("Shop page 1"));

    let session = gui.session_of(viewer).unwrap();
    assert_eq!(session.page(), 1);
    assert_eq!(session.state().attributes().get(&PAGE_COUNT), Some(2));
}

#[test]
fn test_next_page_control_turns_page() {
    use crate::{
        dispatch::Dispatcher,
        host::{Host, SlotRef},
        item::count_of,
        mem_host::test_context,
        translate::{RawAction, RawClick},
    };
    use parking_lot::Mutex;

    let (host, cx) = test_context();
    let closes = Arc::new(Mutex::new(0));
    let closes2 = Arc::clone(&closes);
    let gui = Gui::builder()
        .lifetime(StateLifetime::Session)
        .size(27)
        .contents(crate::contents::PaginatingSource(
            crate::contents::StaticList::new("Shop", numbered_items(30)).with_page_number()
        ))
        .listener(move |event: &GuiEvent, _: &mut EventResult| {
            if let GuiEvent::Close { .. } = event {
                *closes2.lock() += 1;
            }
        })
        .build(&cx)
        .unwrap();
    let dispatcher = Dispatcher::new(cx.clone());
    let viewer = ViewerId(1);
    host.add_viewer(viewer);
    gui.open(viewer).unwrap();

    let mut raw = RawClick::new(viewer, SlotRef::top(26), RawAction::Pickup(Amount::All));
    dispatcher.on_click(&mut raw);
    assert!(raw.cancelled);

    let session = gui.session_of(viewer).unwrap();
    assert_eq!(session.page(), 2);
    let slots = host.visible_slots(viewer);
    for i in 0..5 {
        assert_eq!(count_of(slots[i].as_ref()), i as u8 + 26);
    }
    assert!(slots[5..25].iter().all(Option::is_none));
    assert_eq!(slots[25].as_ref().unwrap().meta.name.as_ref(), Some(&cx.settings.lang.prev_page_name));
    assert!(slots[26].is_none());
    assert_eq!(host.visible_title(viewer).as_deref(), Some("Shop page 2"));
    // the container was replaced, but the viewer never left the gui
    assert_eq!(*closes.lock(), 0);

    let mut raw = RawClick::new(viewer, SlotRef::top(25), RawAction::Pickup(Amount::All));
    dispatcher.on_click(&mut raw);
    assert_eq!(session.page(), 1);
    assert_eq!(host.visible_title(viewer).as_deref(), Some("Shop page 1"));

    host.close_container(viewer);
    assert_eq!(*closes.lock(), 1);
}

#[test]
fn test_unchanged_view_is_refreshed_not_recreated() {
    use crate::{
        host::Host,
        mem_host::{HostOp, test_context},
    };

    let (host, cx) = test_context();
    let gui = shop(&cx, StateLifetime::Session, 30);
    let viewer = ViewerId(1);
    host.add_viewer(viewer);
    gui.open(viewer).unwrap();
    let container = host.current_container(viewer);

    host.clear_ops();
    gui.update_view(viewer).unwrap();
    gui.update_contents_and_view(viewer).unwrap();
    assert_eq!(host.ops(), vec![HostOp::Refresh(viewer), HostOp::Refresh(viewer)]);
    assert_eq!(host.current_container(viewer), container);
}

#[test]
fn test_populate_is_idempotent() {
    use crate::mem_host::test_context;

    let (host, cx) = test_context();
    let gui = shop(&cx, StateLifetime::Session, 30);
    let viewer = ViewerId(1);
    host.add_viewer(viewer);
    gui.open(viewer).unwrap();
    let session = gui.session_of(viewer).unwrap();
    let before = session.page_state().unwrap();
    gui.update_contents_and_view(viewer).unwrap();
    let after = session.page_state().unwrap();
    assert!(!Arc::ptr_eq(&before, &after));
    assert_eq!(before.title(), after.title());
    assert_eq!(before.has_next_page(), after.has_next_page());
    assert_eq!(before.slots().len(), after.slots().len());
    for (slot, element) in before.slots().iter().take(25) {
        assert!(Arc::ptr_eq(element, &after.slots()[slot]));
    }
}

#[test]
fn test_open_page_moves_existing_session() {
    use crate::mem_host::test_context;

    let (host, cx) = test_context();
    let gui = shop(&cx, StateLifetime::Session, 30);
    let viewer = ViewerId(1);
    host.add_viewer(viewer);
    gui.open(viewer).unwrap();
    let session = gui.session_of(viewer).unwrap();
    gui.open_page(viewer, 2).unwrap();
    let moved = gui.session_of(viewer).unwrap();
    assert!(Arc::ptr_eq(&session, &moved));
    assert_eq!(moved.page(), 2);
    assert!(gui.open_page(viewer, 0).is_err());
}

#[test]
fn test_page_past_end_is_empty() {
    use crate::mem_host::test_context;

    let (host, cx) = test_context();
    let gui = shop(&cx, StateLifetime::Session, 30);
    let viewer = ViewerId(1);
    host.add_viewer(viewer);
    gui.open_page(viewer, 5).unwrap();
    let slots = host.visible_slots(viewer);
    assert!(slots[..25].iter().all(Option::is_none));
    assert!(slots[25].is_some());
    assert!(slots[26].is_none());
}

#[test]
fn test_dynamic_size_fits_contents() {
    use crate::{
        contents::StaticContents,
        mem_host::test_context,
    };

    let (host, cx) = test_context();
    let gui = Gui::builder()
        .lifetime(StateLifetime::Session)
        .size(54)
        .dynamic(true)
        .static_contents(StaticContents::new("Small", numbered_items(10)))
        .build(&cx)
        .unwrap();
    let viewer = ViewerId(1);
    host.add_viewer(viewer);
    gui.open(viewer).unwrap();
    assert_eq!(host.visible_slots(viewer).len(), 18);
}

#[test]
fn test_shared_gui_broadcasts_updates() {
    use crate::{
        contents::StaticContents,
        element::{AcceptAll, Element, InputSlot},
        host::{Host, SlotRef},
        item::{ItemStack, RawItemId},
        mem_host::test_context,
        dispatch::Dispatcher,
        translate::{RawAction, RawClick},
    };

    let (host, cx) = test_context();
    let input = Arc::new(InputSlot::new("deposit", AcceptAll).unwrap().at(4));
    let gui = Gui::builder()
        .lifetime(StateLifetime::shared())
        .static_contents(StaticContents::new("Deposit", vec![input.clone() as Arc<dyn Element>]))
        .build(&cx)
        .unwrap();
    let dispatcher = Dispatcher::new(cx.clone());
    let (alice, bob) = (ViewerId(1), ViewerId(2));
    host.add_viewer(alice);
    host.add_viewer(bob);
    gui.open(alice).unwrap();
    gui.open(bob).unwrap();
    assert_eq!(gui.viewing_sessions().len(), 2);

    let diamonds = ItemStack::new(RawItemId(264), 5).unwrap();
    host.set_cursor(alice, Some(diamonds.clone()));
    let mut raw = RawClick::new(alice, SlotRef::top(4), RawAction::Place(Amount::All));
    dispatcher.on_click(&mut raw);

    assert_eq!(host.cursor(alice), None);
    assert_eq!(host.visible_slots(alice)[4], Some(diamonds.clone()));
    assert_eq!(host.visible_slots(bob)[4], Some(diamonds.clone()));
    let bob_session = gui.session_of(bob).unwrap();
    assert_eq!(input.content(&bob_session), Some(diamonds));
}

#[test]
fn test_open_other_gui_closes_previous() {
    use crate::{
        contents::StaticContents,
        mem_host::test_context,
    };
    use parking_lot::Mutex;

    let (host, cx) = test_context();
    let closes = Arc::new(Mutex::new(0));
    let closes2 = Arc::clone(&closes);
    let first = Gui::builder()
        .lifetime(StateLifetime::Session)
        .static_contents(StaticContents::new("First", Vec::new()))
        .listener(move |event: &GuiEvent, _: &mut EventResult| {
            if let GuiEvent::Close { .. } = event {
                *closes2.lock() += 1;
            }
        })
        .build(&cx)
        .unwrap();
    let second = Gui::builder()
        .lifetime(StateLifetime::Session)
        .static_contents(StaticContents::new("Second", Vec::new()))
        .build(&cx)
        .unwrap();
    let viewer = ViewerId(1);
    host.add_viewer(viewer);
    first.open(viewer).unwrap();
    second.open(viewer).unwrap();
    assert_eq!(*closes.lock(), 1);
    assert!(first.session_of(viewer).is_none());
    assert_eq!(host.visible_title(viewer).as_deref(), Some("Second"));
}

#[test]
fn test_reopen_waits_for_delay() {
    use crate::{
        dispatch::Dispatcher,
        host::{Host, SlotRef},
        mem_host::MemHost,
        scheduler::TickScheduler,
        translate::{RawAction, RawClick},
    };

    let host = Arc::new(MemHost::new());
    let sched = Arc::new(TickScheduler::new());
    let cx = GuiContext::new(host.clone(), sched.clone());
    let gui = shop(&cx, StateLifetime::Session, 30);
    let dispatcher = Dispatcher::new(cx.clone());
    let viewer = ViewerId(1);
    host.add_viewer(viewer);

    gui.open(viewer).unwrap();
    assert!(host.current_container(viewer).is_none());
    sched.tick();
    assert!(host.current_container(viewer).is_some());

    let mut raw = RawClick::new(viewer, SlotRef::top(26), RawAction::Pickup(Amount::All));
    dispatcher.on_click(&mut raw);
    sched.tick();
    assert!(host.current_container(viewer).is_none());
    sched.tick();
    assert!(host.current_container(viewer).is_none());
    sched.tick();
    assert_eq!(host.visible_title(viewer).as_deref(), Some("Shop page 2"));
}

#[test]
fn test_stale_reopen_does_not_replace_newer_view() {
    use crate::{
        contents::StaticContents,
        dispatch::Dispatcher,
        host::{Host, SlotRef},
        mem_host::MemHost,
        scheduler::TickScheduler,
        translate::{RawAction, RawClick},
    };

    let host = Arc::new(MemHost::new());
    let sched = Arc::new(TickScheduler::new());
    let cx = GuiContext::new(host.clone(), sched.clone());
    let gui = shop(&cx, StateLifetime::Session, 30);
    let other = Gui::builder()
        .lifetime(StateLifetime::Session)
        .static_contents(StaticContents::new("Other", Vec::new()))
        .build(&cx)
        .unwrap();
    let dispatcher = Dispatcher::new(cx.clone());
    let viewer = ViewerId(1);
    host.add_viewer(viewer);
    gui.open(viewer).unwrap();
    sched.tick();

    // page turn closes the container and schedules the page 2 container to reopen
    let mut raw = RawClick::new(viewer, SlotRef::top(26), RawAction::Pickup(Amount::All));
    dispatcher.on_click(&mut raw);
    sched.tick();
    assert!(host.current_container(viewer).is_none());

    other.open(viewer).unwrap();
    sched.tick();
    let newer = host.current_container(viewer);
    assert!(newer.is_some());
    assert_eq!(host.visible_title(viewer).as_deref(), Some("Other"));

    sched.tick();
    sched.tick();
    assert_eq!(host.current_container(viewer), newer);
    assert_eq!(host.visible_title(viewer).as_deref(), Some("Other"));
}

#[test]
fn test_builder_validation() {
    use crate::{
        contents::StaticContents,
        host::ContainerKind,
        mem_host::test_context,
    };

    let (_host, cx) = test_context();
    let contents = || StaticContents::new("Title", Vec::new());

    assert!(Gui::builder().static_contents(contents()).build(&cx).is_err());
    assert!(Gui::builder().lifetime(StateLifetime::Session).build(&cx).is_err());
    assert!(Gui::builder()
        .lifetime(StateLifetime::Session)
        .size(10)
        .static_contents(contents())
        .build(&cx)
        .is_err());
    assert!(Gui::builder()
        .lifetime(StateLifetime::Session)
        .kind(ContainerKind::Hopper)
        .dynamic(true)
        .static_contents(contents())
        .build(&cx)
        .is_err());
    assert!(Gui::builder()
        .lifetime(StateLifetime::Session)
        .static_contents(StaticContents::new("x".repeat(33), Vec::new()))
        .build(&cx)
        .is_err());

    let gui = Gui::builder()
        .lifetime(StateLifetime::Session)
        .kind(ContainerKind::Hopper)
        .static_contents(contents())
        .build(&cx)
        .unwrap();
    assert_eq!(gui.max_size(), 5);
}

#[test]
fn test_dynamic_title_truncated() {
    use crate::{
        contents::{PaginatingSource, StaticList},
        mem_host::test_context,
    };

    let (host, cx) = test_context();
    let gui = Gui::builder()
        .lifetime(StateLifetime::Session)
        .contents(PaginatingSource(StaticList::new("y".repeat(40), Vec::new())))
        .build(&cx)
        .unwrap();
    let viewer = ViewerId(1);
    host.add_viewer(viewer);
    gui.open(viewer).unwrap();
    assert_eq!(host.visible_title(viewer), Some("y".repeat(32)));
}

#[test]
fn test_full_chest_pages_and_controls() {
    use crate::{
        contents::{PaginatingSource, StaticList},
        mem_host::test_context,
    };

    let (host, cx) = test_context();
    let gui = Gui::builder()
        .lifetime(StateLifetime::Session)
        .size(54)
        .contents(PaginatingSource(StaticList::new("Big", numbered_items(55))))
        .build(&cx)
        .unwrap();
    let viewer = ViewerId(1);
    host.add_viewer(viewer);

    gui.open(viewer).unwrap();
    let state = gui.session_of(viewer).unwrap().page_state().unwrap();
    assert_eq!(state.slots().len(), 54);
    assert!(state.has_next_page());

    gui.open_page(viewer, 2).unwrap();
    let state = gui.session_of(viewer).unwrap().page_state().unwrap();
    assert_eq!(state.slots().len(), 4);
    assert!(state.element(52).is_some());
    assert!(state.element(53).is_none());
    assert!(!state.has_next_page());
}
