//! Translating the host's raw clicks and drags into semantic GUI events.
//!
//! Composite interactions (swapping with the cursor, shift-click auto-insert, single-slot drags)
//! are simulated as sequences of simple pickups and places, each passing through the event chain
//! on its own.

use crate::{
    click_logic,
    event::*,
    gui::Gui,
    host::{Side, SlotRef, ViewerId},
    item::*,
    session::{PageState, Session},
};
use std::{
    cmp::min,
    sync::Arc,
};
use anyhow::*;


/// Action the host reports for a raw click.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum RawAction {
    Nothing,
    Pickup(Amount),
    Place(Amount),
    SwapWithCursor,
    /// Shift-click.
    MoveToOtherInventory,
    /// Double-click gathering of matching items onto the cursor.
    CollectToCursor,
    DropCursor,
    NumberKey,
    Other,
}

/// A click as delivered by the host. Setting `cancelled` suppresses the host's default handling.
#[derive(Debug, Clone)]
pub struct RawClick {
    pub viewer: ViewerId,
    pub side: Side,
    pub slot: usize,
    pub action: RawAction,
    pub cancelled: bool,
}

impl RawClick {
    pub fn new(viewer: ViewerId, slot: SlotRef, action: RawAction) -> Self {
        RawClick {
            viewer,
            side: slot.side,
            slot: slot.idx,
            action,
            cancelled: false,
        }
    }
}

/// A drag as delivered by the host.
#[derive(Debug, Clone)]
pub struct RawDrag {
    pub viewer: ViewerId,
    pub slots: Vec<SlotRef>,
    /// Whether the drag distributes the cursor evenly rather than one item per slot.
    pub even: bool,
    pub cancelled: bool,
}

/// Semantic meaning of a raw click action.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Interaction {
    Click(ClickKind),
    Swap,
    AutoInsert,
    /// Always refused.
    Reject,
    /// Left to the host.
    Ignore,
}

pub fn classify(action: RawAction) -> Interaction {
    match action {
        RawAction::Pickup(amount) => Interaction::Click(ClickKind::Pickup(amount)),
        RawAction::Place(amount) => Interaction::Click(ClickKind::Place(amount)),
        RawAction::SwapWithCursor => Interaction::Swap,
        RawAction::MoveToOtherInventory => Interaction::AutoInsert,
        RawAction::CollectToCursor => Interaction::Reject,
        RawAction::DropCursor => Interaction::Ignore,
        RawAction::Nothing
        | RawAction::NumberKey
        | RawAction::Other => Interaction::Click(ClickKind::Misc),
    }
}


// ==== click handling ====

impl Gui {
    /// Handle a raw click made while `session` is the viewer's open session of this GUI.
    pub fn handle_click(&self, session: &Arc<Session>, raw: &mut RawClick) -> Result<()> {
        ensure!(session.is_for(self), "session does not belong to this gui");
        let page = session.page();
        let state = session.state().page(page)
            .ok_or_else(|| anyhow!("no state for interacted gui page {}", page))?;

        match classify(raw.action) {
            Interaction::Ignore => (),
            Interaction::Reject => raw.cancelled = true,
            Interaction::AutoInsert => {
                raw.cancelled = true;
                let source = SlotRef { side: raw.side, idx: raw.slot };
                self.auto_insert(session, &state, raw.viewer, source);
            }
            _ if raw.side == Side::Bottom => (),
            Interaction::Swap => {
                raw.cancelled = true;
                self.swap(session, &state, raw.viewer, raw.slot);
            }
            Interaction::Click(kind) => {
                let result = self.click(session, &state, raw.viewer, raw.slot, kind);
                raw.cancelled = result.is_raw_cancelled();
            }
        }
        Ok(())
    }

    /// Raise one click on a slot of the given page state.
    fn click(
        &self,
        session: &Arc<Session>,
        state: &PageState,
        viewer: ViewerId,
        slot: usize,
        kind: ClickKind,
    ) -> EventResult {
        trace!(%viewer, slot, ?kind, "gui click");
        self.raise_click(ClickEvent {
            session: Arc::clone(session),
            viewer,
            slot,
            element: state.element(slot).cloned(),
            kind,
        })
    }

    /// Click a top slot and, if the result lets the host handle it, do what the host would have.
    fn nested_click(
        &self,
        session: &Arc<Session>,
        state: &PageState,
        viewer: ViewerId,
        slot: usize,
        kind: ClickKind,
    ) {
        let result = self.click(session, state, viewer, slot, kind);
        if !result.is_raw_cancelled() {
            self.default_transfer(viewer, SlotRef::top(slot), kind);
        }
    }

    /// The host's own handling of a pickup or place on a slot.
    fn default_transfer(&self, viewer: ViewerId, at: SlotRef, kind: ClickKind) {
        let host = &self.context().host;
        let limits = &self.context().limits;
        let slot = host.view_slot(viewer, at);
        let cursor = host.cursor(viewer);
        let transfer = match kind {
            ClickKind::Pickup(amount) => {
                let max = slot.as_ref().map(|s| limits.max_count(s.iid)).unwrap_or(0);
                click_logic::pickup(slot.as_ref(), cursor.as_ref(), amount, max)
            }
            ClickKind::Place(amount) => {
                let max = cursor.as_ref().map(|s| limits.max_count(s.iid)).unwrap_or(0);
                click_logic::place(cursor.as_ref(), slot.as_ref(), amount, max)
            }
            ClickKind::Misc => None,
        };
        if let Some(transfer) = transfer {
            host.set_view_slot(viewer, at, transfer.slot);
            host.set_cursor(viewer, transfer.cursor);
        }
    }

    /// Exchange the cursor with a top slot, as a pickup of everything followed by a place of
    /// everything. If the place does not take the whole cursor, both are put back as they were.
    fn swap(&self, session: &Arc<Session>, state: &PageState, viewer: ViewerId, slot: usize) {
        let host = &self.context().host;
        let at = SlotRef::top(slot);
        let cursor = host.cursor(viewer);
        let original = host.view_slot(viewer, at);

        let mut picked = None;
        if let Some(original) = &original {
            host.set_cursor(viewer, None);
            self.nested_click(session, state, viewer, slot, ClickKind::Pickup(Amount::All));
            picked = host.cursor(viewer);
            if picked.is_none() {
                trace!(%viewer, slot, "swap refused at pickup");
                host.set_cursor(viewer, cursor);
                return;
            }
            if count_of(picked.as_ref()) < original.count.get() {
                trace!(%viewer, slot, "swap picked up partially, rolling back");
                self.restore(session, state, viewer, slot, original.clone().into(), cursor);
                return;
            }
        }

        host.set_cursor(viewer, cursor.clone());
        if cursor.is_some() {
            self.nested_click(session, state, viewer, slot, ClickKind::Place(Amount::All));
            if host.cursor(viewer).is_some() {
                trace!(%viewer, slot, "swap refused at place, rolling back");
                self.restore(session, state, viewer, slot, original, cursor);
                return;
            }
        }
        host.set_cursor(viewer, picked);
        host.refresh_view(viewer);
    }

    /// Force a top slot and the cursor back to earlier contents.
    fn restore(
        &self,
        session: &Arc<Session>,
        state: &PageState,
        viewer: ViewerId,
        slot: usize,
        content: Option<ItemStack>,
        cursor: Option<ItemStack>,
    ) {
        let host = &self.context().host;
        if let Some(element) = state.element(slot) {
            element.restore_content(session, content.clone());
        }
        host.set_view_slot(viewer, SlotRef::top(slot), content);
        host.set_cursor(viewer, cursor);
        if let Err(e) = self.update_view(viewer) {
            error!(%e, "unable to update gui view after rollback");
        }
    }
}


// ==== auto insert ====

impl Gui {
    /// Shift-click: repeatedly move items from `source` to the first suitable slot on the other
    /// side, until nothing is left, no destination accepts more, or the step bound is hit.
    fn auto_insert(&self, session: &Arc<Session>, state: &PageState, viewer: ViewerId, source: SlotRef) {
        let host = &self.context().host;
        let max_steps = self.context().settings.max_auto_insert_steps;
        let dest_side = source.side.other();

        let mut steps = 0;
        loop {
            let to_move = match host.view_slot(viewer, source) {
                Some(stack) => stack,
                None => break,
            };
            if steps >= max_steps {
                warn!(%viewer, steps, "auto insert did not finish within step bound");
                break;
            }
            steps += 1;

            let (dest, amount) = match self.auto_insert_dest(session, state, viewer, dest_side, &to_move) {
                Some(found) => found,
                None => break,
            };
            let moved = match dest_side {
                Side::Top => self.insert_into_gui(session, state, viewer, source, dest, &to_move, amount),
                Side::Bottom => self.extract_from_gui(session, state, viewer, source, dest, &to_move, amount),
            };
            trace!(%viewer, ?source, dest, moved, "auto insert step");
            if moved == 0 {
                break;
            }
        }
        host.refresh_view(viewer);
    }

    /// First slot on `side` that can take some of `to_move`, preferring partial stacks over empty
    /// slots, and how many items it can take.
    fn auto_insert_dest(
        &self,
        session: &Session,
        state: &PageState,
        viewer: ViewerId,
        side: Side,
        to_move: &ItemStack,
    ) -> Option<(usize, u8)> {
        let cx = self.context();
        let mut size = cx.host.view_size(viewer, side);
        if side == Side::Bottom {
            size = min(size, cx.settings.bottom_auto_insert_slots);
        }
        let max = cx.limits.max_count(to_move.iid);
        let eligible = |idx: usize| match side {
            Side::Top => state.element(idx)
                .map(|element| element.can_auto_insert(viewer, session))
                .unwrap_or(false),
            Side::Bottom => true,
        };

        for idx in 0..size {
            if let Some(existing) = cx.host.view_slot(viewer, SlotRef { side, idx }) {
                let room = max.saturating_sub(existing.count.get());
                if existing.can_stack(to_move) && room > 0 && eligible(idx) {
                    return Some((idx, min(room, to_move.count.get())));
                }
            }
        }
        for idx in 0..size {
            if cx.host.view_slot(viewer, SlotRef { side, idx }).is_none() && eligible(idx) {
                return Some((idx, min(max, to_move.count.get())));
            }
        }
        None
    }

    /// Move up to `amount` items from a bottom slot into a GUI slot by placing them from the
    /// cursor. Returns how many moved.
    fn insert_into_gui(
        &self,
        session: &Arc<Session>,
        state: &PageState,
        viewer: ViewerId,
        source: SlotRef,
        dest: usize,
        to_move: &ItemStack,
        amount: u8,
    ) -> u8 {
        let host = &self.context().host;
        let cursor = host.cursor(viewer);

        host.set_cursor(viewer, to_move.with_count(amount));
        self.nested_click(session, state, viewer, dest, ClickKind::Place(Amount::All));
        let left = host.cursor(viewer)
            .filter(|stack| stack.can_stack(to_move))
            .map(|stack| stack.count.get())
            .unwrap_or(0);
        let moved = amount.saturating_sub(left);

        host.set_cursor(viewer, cursor);
        host.set_view_slot(viewer, source, to_move.with_count(to_move.count.get() - moved));
        moved
    }

    /// Move up to `amount` items from a GUI slot into a bottom slot by picking them up onto the
    /// cursor. Anything picked up beyond `amount` is returned. Returns how many moved.
    fn extract_from_gui(
        &self,
        session: &Arc<Session>,
        state: &PageState,
        viewer: ViewerId,
        source: SlotRef,
        dest: usize,
        to_move: &ItemStack,
        amount: u8,
    ) -> u8 {
        let host = &self.context().host;
        let cursor = host.cursor(viewer);

        host.set_cursor(viewer, None);
        self.nested_click(session, state, viewer, source.idx, ClickKind::Pickup(Amount::All));
        let picked = host.cursor(viewer)
            .filter(|stack| stack.can_stack(to_move))
            .map(|stack| stack.count.get())
            .unwrap_or(0);
        let moved = min(picked, amount);

        if picked > amount {
            host.set_cursor(viewer, to_move.with_count(picked - amount));
            self.nested_click(session, state, viewer, source.idx, ClickKind::Place(Amount::All));
            let leftover = count_of(host.cursor(viewer).as_ref());
            if leftover > 0 {
                let current = host.view_slot(viewer, source)
                    .filter(|stack| stack.can_stack(to_move));
                let restored = to_move.with_count(count_of(current.as_ref()) + leftover);
                if let Some(element) = state.element(source.idx) {
                    element.restore_content(session, restored.clone());
                }
                host.set_view_slot(viewer, source, restored);
            }
        }

        if moved > 0 {
            let dest = SlotRef::bottom(dest);
            let existing = host.view_slot(viewer, dest)
                .filter(|stack| stack.can_stack(to_move));
            host.set_view_slot(viewer, dest, to_move.with_count(count_of(existing.as_ref()) + moved));
        }
        host.set_cursor(viewer, cursor);
        moved
    }
}


// ==== drag handling ====

impl Gui {
    /// Handle a raw drag made while `session` is the viewer's open session of this GUI.
    ///
    /// Drags that touch the GUI are refused. A drag over exactly one slot is replayed as a place
    /// click on that slot a little later, once the host has settled the refused drag.
    pub fn handle_drag(&self, session: &Arc<Session>, drag: &mut RawDrag) {
        let top = match drag.slots.iter().find(|slot| slot.side == Side::Top) {
            Some(slot) => *slot,
            None => return,
        };
        drag.cancelled = true;
        if drag.slots.len() != 1 {
            return;
        }

        let amount = if drag.even { Amount::All } else { Amount::One };
        let viewer = drag.viewer;
        let session = Arc::clone(session);
        let delay = self.context().settings.drag_delay_ticks;
        trace!(%viewer, slot = top.idx, ?amount, delay, "deferring single slot drag");
        self.context().scheduler.run_later(delay, Box::new(move || {
            session.gui().replay_drag(&session, viewer, top.idx, amount);
        }));
    }

    fn replay_drag(&self, session: &Arc<Session>, viewer: ViewerId, slot: usize, amount: Amount) {
        let still_open = self.session_of(viewer)
            .map(|current| Arc::ptr_eq(&current, session))
            .unwrap_or(false);
        if !still_open {
            trace!(%viewer, "gui closed before drag replay");
            return;
        }
        if self.context().host.cursor(viewer).is_none() {
            return;
        }
        let state = match session.page_state() {
            Some(state) => state,
            None => {
                warn!(%viewer, "gui page state vanished before drag replay");
                return;
            }
        };
        self.nested_click(session, &state, viewer, slot, ClickKind::Place(amount));
        self.context().host.refresh_view(viewer);
    }
}


#[test]
fn test_classify() {
    assert_eq!(classify(RawAction::Pickup(Amount::Half)), Interaction::Click(ClickKind::Pickup(Amount::Half)));
    assert_eq!(classify(RawAction::Place(Amount::One)), Interaction::Click(ClickKind::Place(Amount::One)));
    assert_eq!(classify(RawAction::SwapWithCursor), Interaction::Swap);
    assert_eq!(classify(RawAction::MoveToOtherInventory), Interaction::AutoInsert);
    assert_eq!(classify(RawAction::CollectToCursor), Interaction::Reject);
    assert_eq!(classify(RawAction::DropCursor), Interaction::Ignore);
    assert_eq!(classify(RawAction::NumberKey), Interaction::Click(ClickKind::Misc));
}


#[cfg(test)]
type DynElement = Arc<dyn crate::element::Element>;

#[cfg(test)]
struct Bench {
    host: Arc<crate::mem_host::MemHost>,
    dispatcher: crate::dispatch::Dispatcher,
    session: Arc<Session>,
    viewer: ViewerId,
}

#[cfg(test)]
impl Bench {
    /// Open a single-page GUI with the given elements for one viewer.
    fn new(elements: Vec<DynElement>) -> Self {
        Self::with_listener(elements, |_: &GuiEvent, _: &mut EventResult| ())
    }

    fn with_listener<L: GuiListener + 'static>(elements: Vec<DynElement>, listener: L) -> Self {
        Self::build(elements, listener, Default::default())
    }

    fn with_settings(elements: Vec<DynElement>, settings: crate::settings::Settings) -> Self {
        Self::build(elements, |_: &GuiEvent, _: &mut EventResult| (), settings)
    }

    fn build<L: GuiListener + 'static>(
        elements: Vec<DynElement>,
        listener: L,
        settings: crate::settings::Settings,
    ) -> Self {
        use crate::{
            contents::StaticContents,
            dispatch::Dispatcher,
            mem_host::test_context,
            session::StateLifetime,
        };

        let (host, cx) = test_context();
        let cx = cx.with_settings(settings);
        let gui = Gui::builder()
            .lifetime(StateLifetime::Session)
            .static_contents(StaticContents::new("Bench", elements))
            .listener(listener)
            .build(&cx)
            .unwrap();
        let viewer = ViewerId(1);
        host.add_viewer(viewer);
        gui.open(viewer).unwrap();
        let session = gui.session_of(viewer).unwrap();
        Bench {
            host,
            dispatcher: Dispatcher::new(cx),
            session,
            viewer,
        }
    }

    fn click(&self, slot: SlotRef, action: RawAction) -> RawClick {
        let mut raw = RawClick::new(self.viewer, slot, action);
        self.dispatcher.on_click(&mut raw);
        raw
    }

    fn drag(&self, slots: Vec<SlotRef>, even: bool) -> RawDrag {
        let mut drag = RawDrag {
            viewer: self.viewer,
            slots,
            even,
            cancelled: false,
        };
        self.dispatcher.on_drag(&mut drag);
        drag
    }

    fn cursor(&self) -> Option<ItemStack> {
        use crate::host::Host;
        self.host.cursor(self.viewer)
    }

    fn set_cursor(&self, content: Option<ItemStack>) {
        use crate::host::Host;
        self.host.set_cursor(self.viewer, content)
    }

    fn top(&self, idx: usize) -> Option<ItemStack> {
        self.host.visible_slots(self.viewer)[idx].clone()
    }
}

#[cfg(test)]
fn input(id: &str, slot: usize) -> Arc<crate::element::InputSlot> {
    Arc::new(crate::element::InputSlot::new(id, crate::element::AcceptAll).unwrap().at(slot))
}

#[cfg(test)]
fn iron(n: u8) -> Option<ItemStack> {
    ItemStack::new(RawItemId(265), n)
}

#[cfg(test)]
fn gold(n: u8) -> Option<ItemStack> {
    ItemStack::new(RawItemId(266), n)
}

#[cfg(test)]
struct RefusePlace;

#[cfg(test)]
impl crate::element::InputSlotHandler for RefusePlace {
    fn on_place(&self, _event: &ClickEvent, result: &mut EventResult) {
        result.cancel();
    }

    fn allow_auto_insert(&self, _viewer: ViewerId, _session: &Session) -> bool {
        false
    }
}

#[test]
fn test_input_slot_pickup_half() {
    let slot = input("in", 4);
    let bench = Bench::new(vec![slot.clone() as DynElement]);
    slot.set_content(&bench.session, iron(7));
    bench.session.gui().update_view(bench.viewer).unwrap();
    assert_eq!(bench.top(4), iron(7));

    let raw = bench.click(SlotRef::top(4), RawAction::Pickup(Amount::Half));
    assert!(raw.cancelled);
    assert_eq!(slot.content(&bench.session), iron(3));
    assert_eq!(bench.top(4), iron(3));
    assert_eq!(bench.cursor(), iron(4));
}

#[test]
fn test_input_slot_place_bounded_by_limit() {
    let slot = input("in", 0);
    let bench = Bench::new(vec![slot.clone() as DynElement]);
    slot.set_content(&bench.session, iron(50));
    bench.set_cursor(iron(40));

    bench.click(SlotRef::top(0), RawAction::Place(Amount::All));
    assert_eq!(slot.content(&bench.session), iron(64));
    assert_eq!(bench.cursor(), iron(26));
}

#[test]
fn test_input_slot_refuses_incompatible_place() {
    let slot = input("in", 0);
    let bench = Bench::new(vec![slot.clone() as DynElement]);
    slot.set_content(&bench.session, iron(5));
    bench.set_cursor(gold(3));

    let raw = bench.click(SlotRef::top(0), RawAction::Place(Amount::All));
    assert!(raw.cancelled);
    assert_eq!(slot.content(&bench.session), iron(5));
    assert_eq!(bench.cursor(), gold(3));
}

#[test]
fn test_action_item_never_yields_display() {
    use crate::element::ActionItem;
    use parking_lot::Mutex;

    let clicked = Arc::new(Mutex::new(Vec::new()));
    let clicked2 = Arc::clone(&clicked);
    let button = ActionItem::on_click_viewer(ItemStack::one(RawItemId(1)), move |viewer| {
        clicked2.lock().push(viewer);
    });
    let bench = Bench::new(vec![Arc::new(button.at(3)) as DynElement]);

    let raw = bench.click(SlotRef::top(3), RawAction::Pickup(Amount::All));
    assert!(raw.cancelled);
    assert_eq!(bench.cursor(), None);
    assert_eq!(*clicked.lock(), vec![bench.viewer]);

    let raw = bench.click(SlotRef::top(3), RawAction::MoveToOtherInventory);
    assert!(raw.cancelled);
    assert!(bench.top(3).is_some());
    assert_eq!(bench.host.inventory_slot(bench.viewer, 0), None);
}

#[test]
fn test_empty_slot_click_cancelled() {
    let bench = Bench::new(Vec::new());
    bench.set_cursor(iron(3));
    let raw = bench.click(SlotRef::top(5), RawAction::Place(Amount::All));
    assert!(raw.cancelled);
    assert_eq!(bench.cursor(), iron(3));
    assert_eq!(bench.top(5), None);
}

#[test]
fn test_swap_with_cursor() {
    let slot = input("in", 2);
    let bench = Bench::new(vec![slot.clone() as DynElement]);
    slot.set_content(&bench.session, iron(5));
    bench.session.gui().update_view(bench.viewer).unwrap();
    bench.set_cursor(gold(3));

    let raw = bench.click(SlotRef::top(2), RawAction::SwapWithCursor);
    assert!(raw.cancelled);
    assert_eq!(slot.content(&bench.session), gold(3));
    assert_eq!(bench.top(2), gold(3));
    assert_eq!(bench.cursor(), iron(5));
}

#[test]
fn test_swap_rolled_back_when_place_refused() {
    let slot = Arc::new(crate::element::InputSlot::new("in", RefusePlace).unwrap().at(2));
    let bench = Bench::new(vec![slot.clone() as DynElement]);
    slot.set_content(&bench.session, iron(5));
    bench.session.gui().update_view(bench.viewer).unwrap();
    bench.set_cursor(gold(3));

    bench.click(SlotRef::top(2), RawAction::SwapWithCursor);
    assert_eq!(slot.content(&bench.session), iron(5));
    assert_eq!(bench.top(2), iron(5));
    assert_eq!(bench.cursor(), gold(3));
}

#[test]
fn test_shift_insert_fills_partial_stacks_first() {
    let first = input("first", 0);
    let second = input("second", 1);
    let bench = Bench::new(vec![first.clone() as DynElement, second.clone()]);
    first.set_content(&bench.session, iron(60));
    bench.session.gui().update_view(bench.viewer).unwrap();
    bench.host.set_inventory_slot(bench.viewer, 0, iron(10));

    let raw = bench.click(SlotRef::bottom(0), RawAction::MoveToOtherInventory);
    assert!(raw.cancelled);
    assert_eq!(first.content(&bench.session), iron(64));
    assert_eq!(second.content(&bench.session), iron(6));
    assert_eq!(bench.host.inventory_slot(bench.viewer, 0), None);
    assert_eq!(bench.cursor(), None);
}

#[test]
fn test_shift_insert_skips_refusing_slots() {
    let refusing = Arc::new(crate::element::InputSlot::new("refusing", RefusePlace).unwrap().at(0));
    let accepting = input("accepting", 1);
    let bench = Bench::new(vec![refusing.clone() as DynElement, accepting.clone()]);
    bench.host.set_inventory_slot(bench.viewer, 3, gold(12));

    bench.click(SlotRef::bottom(3), RawAction::MoveToOtherInventory);
    assert_eq!(refusing.content(&bench.session), None);
    assert_eq!(accepting.content(&bench.session), gold(12));
}

#[test]
fn test_shift_insert_stops_at_step_bound() {
    let first = input("first", 0);
    let second = input("second", 1);
    let settings = crate::settings::Settings {
        max_auto_insert_steps: 1,
        ..Default::default()
    };
    let bench = Bench::with_settings(vec![first.clone() as DynElement, second.clone()], settings);
    first.set_content(&bench.session, iron(60));
    second.set_content(&bench.session, iron(60));
    bench.session.gui().update_view(bench.viewer).unwrap();
    bench.host.set_inventory_slot(bench.viewer, 0, iron(10));

    let raw = bench.click(SlotRef::bottom(0), RawAction::MoveToOtherInventory);
    assert!(raw.cancelled);
    assert_eq!(first.content(&bench.session), iron(64));
    assert_eq!(second.content(&bench.session), iron(60));
    assert_eq!(bench.host.inventory_slot(bench.viewer, 0), iron(6));
    assert_eq!(bench.cursor(), None);
}

#[test]
fn test_shift_insert_with_no_destination_keeps_items() {
    let bench = Bench::new(Vec::new());
    bench.host.set_inventory_slot(bench.viewer, 0, iron(10));
    let raw = bench.click(SlotRef::bottom(0), RawAction::MoveToOtherInventory);
    assert!(raw.cancelled);
    assert_eq!(bench.host.inventory_slot(bench.viewer, 0), iron(10));
}

#[test]
fn test_shift_extract_to_inventory() {
    let slot = input("in", 0);
    let bench = Bench::new(vec![slot.clone() as DynElement]);
    slot.set_content(&bench.session, iron(20));
    bench.session.gui().update_view(bench.viewer).unwrap();
    bench.host.set_inventory_slot(bench.viewer, 0, gold(1));
    bench.host.set_inventory_slot(bench.viewer, 1, iron(60));

    bench.click(SlotRef::top(0), RawAction::MoveToOtherInventory);
    assert_eq!(bench.host.inventory_slot(bench.viewer, 1), iron(64));
    assert_eq!(bench.host.inventory_slot(bench.viewer, 2), iron(16));
    assert_eq!(slot.content(&bench.session), None);
    assert_eq!(bench.cursor(), None);
}

#[test]
fn test_collect_to_cursor_rejected() {
    let bench = Bench::new(Vec::new());
    let raw = bench.click(SlotRef::bottom(0), RawAction::CollectToCursor);
    assert!(raw.cancelled);
}

#[test]
fn test_bottom_clicks_pass_through() {
    let bench = Bench::new(Vec::new());
    let raw = bench.click(SlotRef::bottom(0), RawAction::Pickup(Amount::All));
    assert!(!raw.cancelled);
    let raw = bench.click(SlotRef::top(0), RawAction::DropCursor);
    assert!(!raw.cancelled);
}

#[test]
fn test_single_slot_drag_replayed_as_place() {
    let slot = input("in", 3);
    let bench = Bench::new(vec![slot.clone() as DynElement]);
    bench.set_cursor(iron(5));

    let drag = bench.drag(vec![SlotRef::top(3)], false);
    assert!(drag.cancelled);
    assert_eq!(slot.content(&bench.session), iron(1));
    assert_eq!(bench.cursor(), iron(4));

    let drag = bench.drag(vec![SlotRef::top(3)], true);
    assert!(drag.cancelled);
    assert_eq!(slot.content(&bench.session), iron(5));
    assert_eq!(bench.cursor(), None);
}

#[test]
fn test_drag_replay_skipped_after_close() {
    use crate::{
        contents::StaticContents,
        context::GuiContext,
        dispatch::Dispatcher,
        host::Host,
        mem_host::MemHost,
        scheduler::TickScheduler,
        session::StateLifetime,
    };

    let host = Arc::new(MemHost::new());
    let sched = Arc::new(TickScheduler::new());
    let cx = GuiContext::new(host.clone(), sched.clone());
    let slot = input("in", 3);
    let gui = Gui::builder()
        .lifetime(StateLifetime::Session)
        .static_contents(StaticContents::new("Drag", vec![slot.clone() as DynElement]))
        .build(&cx)
        .unwrap();
    let dispatcher = Dispatcher::new(cx.clone());
    let viewer = ViewerId(1);
    host.add_viewer(viewer);
    gui.open(viewer).unwrap();
    sched.tick();
    let session = gui.session_of(viewer).unwrap();

    host.set_cursor(viewer, iron(5));
    let mut drag = RawDrag {
        viewer,
        slots: vec![SlotRef::top(3)],
        even: true,
        cancelled: false,
    };
    dispatcher.on_drag(&mut drag);
    assert!(drag.cancelled);
    host.close_container(viewer);
    sched.tick();
    sched.tick();

    assert_eq!(host.cursor(viewer), iron(5));
    assert_eq!(slot.content(&session), None);
}

#[test]
fn test_multi_slot_drag_refused() {
    let slot = input("in", 3);
    let bench = Bench::new(vec![slot.clone() as DynElement]);
    bench.set_cursor(iron(5));

    let drag = bench.drag(vec![SlotRef::top(3), SlotRef::bottom(0)], true);
    assert!(drag.cancelled);
    assert_eq!(slot.content(&bench.session), None);
    assert_eq!(bench.cursor(), iron(5));

    let drag = bench.drag(vec![SlotRef::bottom(0), SlotRef::bottom(1)], true);
    assert!(!drag.cancelled);
}

#[test]
fn test_listener_cancel_skips_element() {
    let slot = input("in", 0);
    let bench = Bench::with_listener(vec![slot.clone() as DynElement], |event: &GuiEvent, result: &mut EventResult| {
        if let GuiEvent::Click(_) = event {
            result.cancel();
        }
    });
    bench.set_cursor(iron(5));
    let raw = bench.click(SlotRef::top(0), RawAction::Place(Amount::All));
    assert!(raw.cancelled);
    assert_eq!(slot.content(&bench.session), None);
    assert_eq!(bench.cursor(), iron(5));
}

#[test]
fn test_event_chain_stages() {
    use crate::{
        contents::StaticContents,
        mem_host::test_context,
        session::StateLifetime,
    };

    let (host, cx) = test_context();
    let cx = cx.with_event_bus(Arc::new(|event: &GuiEvent, result: &mut EventResult| {
        if let GuiEvent::Click(click) = event {
            if click.slot == 0 {
                result.cancel();
            }
        }
    }));
    let slot = input("in", 1);
    let gui = Gui::builder()
        .lifetime(StateLifetime::Session)
        .static_contents(StaticContents::new("Chain", vec![slot.clone() as DynElement]))
        .build(&cx)
        .unwrap();
    let viewer = ViewerId(1);
    host.add_viewer(viewer);
    gui.open(viewer).unwrap();
    let session = gui.session_of(viewer).unwrap();

    let click = |slot: usize| ClickEvent {
        session: Arc::clone(&session),
        viewer,
        slot,
        element: session.page_state().unwrap().element(slot).cloned(),
        kind: ClickKind::Misc,
    };
    let result = gui.raise_click(click(0));
    assert!(result.is_cancelled());
    assert_eq!(result.consumed_by(), Some(Stage::HostBus));

    let result = gui.raise_click(click(1));
    assert!(!result.is_cancelled());
    assert!(result.is_raw_cancelled());
    assert_eq!(result.consumed_by(), Some(Stage::Element));

    let result = gui.raise_click(click(2));
    assert!(result.is_raw_cancelled());
    assert_eq!(result.consumed_by(), Some(Stage::HostBus));
}
