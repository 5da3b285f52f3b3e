//! Things that can occupy a GUI slot.

use crate::{
    attributes::AttrKey,
    click_logic,
    event::*,
    host::{SlotRef, ViewerId},
    item::ItemStack,
    session::Session,
};
use std::fmt::{self, Formatter, Debug};
use anyhow::*;


/// Something that occupies a GUI slot.
pub trait Element: Debug + Send + Sync {
    /// Slot this element wants to be placed in, if any.
    fn desired_slot(&self) -> Option<usize> {
        None
    }

    /// What the viewer should see in the element's slot.
    fn render(&self, viewer: ViewerId, session: &Session) -> Option<ItemStack>;

    /// Handle a click that reached the element stage of the event chain.
    fn on_event(&self, event: &ClickEvent, result: &mut EventResult);

    /// Whether shift-click auto-insert may target this element's slot.
    fn can_auto_insert(&self, viewer: ViewerId, session: &Session) -> bool;

    /// Force the element's content back to a previous value, bypassing any handler. Used to roll
    /// back composite interactions that were only partially accepted.
    fn restore_content(&self, session: &Session, content: Option<ItemStack>) {
        let _ = (session, content);
    }
}


type ClickHandler = Box<dyn Fn(&ClickEvent, &mut EventResult) + Send + Sync>;

/// Fixed display item that runs a handler when clicked. Never yields its display item and never
/// accepts items.
pub struct ActionItem {
    slot: Option<usize>,
    display: ItemStack,
    handler: ClickHandler,
}

impl ActionItem {
    pub fn new<F>(display: ItemStack, handler: F) -> Self
    where
        F: Fn(&ClickEvent, &mut EventResult) + Send + Sync + 'static,
    {
        ActionItem {
            slot: None,
            display,
            handler: Box::new(handler),
        }
    }

    /// Action item whose handler only cares which viewer clicked.
    pub fn on_click_viewer<F>(display: ItemStack, f: F) -> Self
    where
        F: Fn(ViewerId) + Send + Sync + 'static,
    {
        ActionItem::new(display, move |event, _| f(event.viewer))
    }

    /// Builder-style desired slot.
    pub fn at(mut self, slot: usize) -> Self {
        self.slot = Some(slot);
        self
    }

    pub fn display(&self) -> &ItemStack {
        &self.display
    }
}

impl Element for ActionItem {
    fn desired_slot(&self) -> Option<usize> {
        self.slot
    }

    fn render(&self, _viewer: ViewerId, _session: &Session) -> Option<ItemStack> {
        Some(self.display.clone())
    }

    fn on_event(&self, event: &ClickEvent, result: &mut EventResult) {
        result.cancel_raw();
        (self.handler)(event, result);
    }

    fn can_auto_insert(&self, _viewer: ViewerId, _session: &Session) -> bool {
        false
    }
}

impl Debug for ActionItem {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.debug_struct("ActionItem")
            .field("slot", &self.slot)
            .field("display", &self.display)
            .finish_non_exhaustive()
    }
}


/// Callbacks of an `InputSlot`. Cancelling the result in `on_pickup` or `on_place` vetoes the
/// transfer.
pub trait InputSlotHandler: Send + Sync {
    fn allow_auto_insert(&self, viewer: ViewerId, session: &Session) -> bool {
        let _ = (viewer, session);
        true
    }

    fn on_click(&self, event: &ClickEvent, result: &mut EventResult) {
        let _ = (event, result);
    }

    fn on_pickup(&self, event: &ClickEvent, result: &mut EventResult) {
        let _ = (event, result);
    }

    fn on_place(&self, event: &ClickEvent, result: &mut EventResult) {
        let _ = (event, result);
    }

    /// Called after the stored content changed through a transfer.
    fn on_content_changed(&self, session: &Session, content: Option<&ItemStack>) {
        let _ = (session, content);
    }
}

/// Handler that accepts everything.
#[derive(Debug, Copy, Clone, Default)]
pub struct AcceptAll;

impl InputSlotHandler for AcceptAll {}


/// Slot the viewer can put items into and take items out of. The content is stored in the GUI
/// state's attributes, keyed by the slot's id, so it survives re-population and is shared along
/// with a shared state.
pub struct InputSlot {
    id: String,
    slot: Option<usize>,
    handler: Box<dyn InputSlotHandler>,
}

impl InputSlot {
    pub fn new<H>(id: impl Into<String>, handler: H) -> Result<Self>
    where
        H: InputSlotHandler + 'static,
    {
        let id = id.into();
        ensure!(!id.is_empty(), "input slot id must not be empty");
        Ok(InputSlot {
            id,
            slot: None,
            handler: Box::new(handler),
        })
    }

    /// Builder-style desired slot.
    pub fn at(mut self, slot: usize) -> Self {
        self.slot = Some(slot);
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    fn content_key(&self) -> AttrKey<ItemStack> {
        AttrKey::owned(format!("gui.inputSlot.currentItem.{}", self.id))
    }

    /// The stored content.
    pub fn content(&self, session: &Session) -> Option<ItemStack> {
        session.state().attributes().get(&self.content_key())
    }

    /// Store new content and notify the handler.
    pub fn set_content(&self, session: &Session, content: Option<ItemStack>) {
        self.store(session, content.clone());
        self.handler.on_content_changed(session, content.as_ref());
    }

    fn store(&self, session: &Session, content: Option<ItemStack>) {
        let key = self.content_key();
        match content {
            Some(stack) => session.state().attributes().put(&key, stack),
            None => {
                session.state().attributes().remove(&key);
            }
        }
    }

    fn transfer(&self, event: &ClickEvent, result: &mut EventResult) {
        let session = &event.session;
        let cx = session.gui().context();
        let current = self.content(session);
        let cursor = cx.host.cursor(event.viewer);

        let transfer = match event.kind {
            ClickKind::Pickup(amount) => {
                self.handler.on_pickup(event, result);
                if result.is_cancelled() {
                    return;
                }
                let max = current.as_ref().map(|s| cx.limits.max_count(s.iid)).unwrap_or(0);
                click_logic::pickup(current.as_ref(), cursor.as_ref(), amount, max)
            }
            ClickKind::Place(amount) => {
                self.handler.on_place(event, result);
                if result.is_cancelled() {
                    return;
                }
                let max = cursor.as_ref().map(|s| cx.limits.max_count(s.iid)).unwrap_or(0);
                click_logic::place(cursor.as_ref(), current.as_ref(), amount, max)
            }
            ClickKind::Misc => return,
        };
        let transfer = match transfer {
            Some(transfer) => transfer,
            None => return,
        };

        trace!(slot = event.slot, moved = transfer.moved, "input slot transfer");
        cx.host.set_view_slot(event.viewer, SlotRef::top(event.slot), transfer.slot.clone());
        self.set_content(session, transfer.slot);
        cx.host.set_cursor(event.viewer, transfer.cursor);
        if let Err(e) = session.gui().update_view(event.viewer) {
            error!(%e, "unable to update gui view after input slot transfer");
        }
    }
}

impl Element for InputSlot {
    fn desired_slot(&self) -> Option<usize> {
        self.slot
    }

    fn render(&self, _viewer: ViewerId, session: &Session) -> Option<ItemStack> {
        self.content(session)
    }

    fn on_event(&self, event: &ClickEvent, result: &mut EventResult) {
        result.cancel_raw();
        match event.kind {
            ClickKind::Misc => self.handler.on_click(event, result),
            ClickKind::Pickup(_) | ClickKind::Place(_) => self.transfer(event, result),
        }
    }

    fn can_auto_insert(&self, viewer: ViewerId, session: &Session) -> bool {
        self.handler.allow_auto_insert(viewer, session)
    }

    fn restore_content(&self, session: &Session, content: Option<ItemStack>) {
        self.store(session, content);
    }
}

impl Debug for InputSlot {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.debug_struct("InputSlot")
            .field("id", &self.id)
            .field("slot", &self.slot)
            .finish_non_exhaustive()
    }
}


#[test]
fn test_input_slot_requires_id() {
    assert!(InputSlot::new("", AcceptAll).is_err());
    assert_eq!(InputSlot::new("fuel", AcceptAll).unwrap().at(3).desired_slot(), Some(3));
}

#[test]
fn test_input_slot_content_keyed_by_id() {
    use crate::{
        contents::StaticContents,
        gui::Gui,
        item::{ItemStack, RawItemId},
        mem_host::test_context,
        session::StateLifetime,
    };

    let (host, cx) = test_context();
    let gui = Gui::builder()
        .lifetime(StateLifetime::Session)
        .static_contents(StaticContents::new("Keyed", Vec::new()))
        .build(&cx)
        .unwrap();
    let viewer = ViewerId(1);
    host.add_viewer(viewer);
    gui.open(viewer).unwrap();
    let session = gui.session_of(viewer).unwrap();

    let stack = ItemStack::new(RawItemId(3), 9);
    InputSlot::new("fuel", AcceptAll).unwrap().set_content(&session, stack.clone());
    let rebuilt = InputSlot::new("fuel", AcceptAll).unwrap().at(8);
    assert_eq!(rebuilt.content(&session), stack);
    assert_eq!(rebuilt.render(viewer, &session), stack);
    assert_eq!(InputSlot::new("other", AcceptAll).unwrap().content(&session), None);
}
