//! Turning contents into a page state.

use crate::{
    element::{ActionItem, Element},
    event::ClickEvent,
    gui::Gui,
    host::ViewerId,
    item::{ItemStack, format_item},
    session::{PageState, Session},
};
use std::{
    collections::BTreeMap,
    sync::Arc,
};


/// Elements laid out into slots.
#[derive(Debug, Default)]
pub struct Layout {
    pub slots: BTreeMap<usize, Arc<dyn Element>>,
    /// Elements that did not fit, in their original order.
    pub dropped: Vec<Arc<dyn Element>>,
}

/// Navigation controls of a page that is part of a multi-page GUI.
#[derive(Debug, Default)]
pub struct PageControls {
    pub prev: Option<Arc<dyn Element>>,
    pub next: Option<Arc<dyn Element>>,
}

/// Lay elements out into a page with `capacity` slots.
///
/// With controls, the last two slots are reserved: `capacity - 2` for the previous control and
/// `capacity - 1` for the next. Elements with a desired slot that is free and in range get it.
/// The rest fill the lowest vacant slots in order.
pub fn layout_page(
    capacity: usize,
    controls: Option<PageControls>,
    elements: &[Arc<dyn Element>],
) -> Layout {
    let mut slots = BTreeMap::new();
    let mut usable = capacity;
    if let Some(controls) = controls {
        usable = capacity.saturating_sub(2);
        if capacity >= 2 {
            if let Some(prev) = controls.prev {
                slots.insert(capacity - 2, prev);
            }
            if let Some(next) = controls.next {
                slots.insert(capacity - 1, next);
            }
        }
    }

    let mut undesired = Vec::new();
    for element in elements {
        match element.desired_slot() {
            Some(slot) if slot < usable && !slots.contains_key(&slot) => {
                slots.insert(slot, Arc::clone(element));
            }
            _ => undesired.push(Arc::clone(element)),
        }
    }

    let mut dropped = Vec::new();
    let mut vacant = 0;
    for element in undesired {
        while vacant < usable && slots.contains_key(&vacant) {
            vacant += 1;
        }
        if vacant < usable {
            slots.insert(vacant, element);
            vacant += 1;
        } else {
            dropped.push(element);
        }
    }

    Layout { slots, dropped }
}


/// Computes page states from a GUI's content source.
#[derive(Debug, Default)]
pub struct Populator;

impl Populator {
    /// Compute the state of the session's current page and install it.
    pub async fn populate(&self, session: &Arc<Session>, viewer: ViewerId) {
        let gui = session.gui();
        let cx = gui.context();
        let page = session.page();

        let contents = gui.contents().contents(viewer, page, session).await;
        let controls = if page > 1 || contents.has_next_page {
            Some(PageControls {
                prev: Some(self.prev_page_button(gui)),
                next: if contents.has_next_page { Some(self.next_page_button(gui)) } else { None },
            })
        } else {
            None
        };
        let layout = layout_page(gui.max_size(), controls, &contents.elements);
        if !layout.dropped.is_empty() {
            warn!(
                gui = %gui.id(),
                page,
                dropped = layout.dropped.len(),
                "gui elements did not fit and were not placed",
            );
        }

        let mut title = gui.contents().title(viewer, page, session).await;
        let max_len = cx.settings.max_title_len;
        if title.chars().count() > max_len {
            warn!(%title, max_len, "gui title too long, truncating");
            title = title.chars().take(max_len).collect();
        }

        let state = PageState::new(title, layout.slots, contents.has_next_page);
        session.state().replace_page(page, Arc::new(state));
        trace!(gui = %gui.id(), page, %viewer, "populated gui page");
    }

    fn button_item(&self, gui: &Gui, name: &str, lore: &[String]) -> ItemStack {
        let item = ItemStack::one(gui.context().settings.page_button_item);
        format_item(&item, name, lore.iter().cloned())
    }

    /// Control that moves the session back one page.
    pub fn prev_page_button(&self, gui: &Gui) -> Arc<dyn Element> {
        let lang = &gui.context().settings.lang;
        let display = self.button_item(gui, &lang.prev_page_name, &lang.prev_page_lore);
        Arc::new(ActionItem::new(display, |event: &ClickEvent, _result| {
            let page = event.session.page();
            if page > 1 {
                turn_page(event, page - 1);
            }
        }))
    }

    /// Control that moves the session forward one page.
    pub fn next_page_button(&self, gui: &Gui) -> Arc<dyn Element> {
        let lang = &gui.context().settings.lang;
        let display = self.button_item(gui, &lang.next_page_name, &lang.next_page_lore);
        Arc::new(ActionItem::new(display, |event: &ClickEvent, _result| {
            let page = event.session.page();
            let has_next = event.session.state().page(page)
                .map(|state| state.has_next_page())
                .unwrap_or(false);
            if has_next {
                turn_page(event, page + 1);
            }
        }))
    }
}

fn turn_page(event: &ClickEvent, page: u32) {
    debug!(viewer = %event.viewer, page, "turning gui page");
    let result = event.session.set_page(page)
        .and_then(|()| event.session.gui().update_contents_and_view(event.viewer));
    if let Err(e) = result {
        error!(%e, "unable to turn gui page");
    }
}


#[cfg(test)]
fn action(slot: Option<usize>) -> Arc<dyn Element> {
    let item = ActionItem::new(ItemStack::one(crate::item::RawItemId(1)), |_: &ClickEvent, _: &mut crate::event::EventResult| ());
    Arc::new(match slot {
        Some(slot) => item.at(slot),
        None => item,
    })
}

#[test]
fn test_layout_desired_slots_win() {
    let elements = vec![action(None), action(Some(0)), action(None), action(Some(5))];
    let layout = layout_page(9, None, &elements);
    assert!(Arc::ptr_eq(&layout.slots[&0], &elements[1]));
    assert!(Arc::ptr_eq(&layout.slots[&1], &elements[0]));
    assert!(Arc::ptr_eq(&layout.slots[&2], &elements[2]));
    assert!(Arc::ptr_eq(&layout.slots[&5], &elements[3]));
    assert!(layout.dropped.is_empty());
}

#[test]
fn test_layout_conflicting_desired_slots_fill_in_order() {
    let elements = vec![action(Some(0)), action(Some(0)), action(Some(100)), action(None)];
    let layout = layout_page(9, None, &elements);
    assert!(Arc::ptr_eq(&layout.slots[&0], &elements[0]));
    assert!(Arc::ptr_eq(&layout.slots[&1], &elements[1]));
    assert!(Arc::ptr_eq(&layout.slots[&2], &elements[2]));
    assert!(Arc::ptr_eq(&layout.slots[&3], &elements[3]));
}

#[test]
fn test_layout_reserves_control_slots() {
    let elements: Vec<_> = (0..9).map(|_| action(None)).collect();
    let next = action(None);
    let layout = layout_page(9, Some(PageControls { prev: None, next: Some(Arc::clone(&next)) }), &elements);
    assert_eq!(layout.slots.len(), 8);
    assert!(!layout.slots.contains_key(&7));
    assert!(Arc::ptr_eq(&layout.slots[&8], &next));
    assert_eq!(layout.dropped.len(), 2);
    assert!(Arc::ptr_eq(&layout.dropped[0], &elements[7]));
}

#[test]
fn test_layout_desired_slot_in_reserved_area_falls_back() {
    let elements = vec![action(Some(7))];
    let layout = layout_page(9, Some(PageControls::default()), &elements);
    assert!(Arc::ptr_eq(&layout.slots[&0], &elements[0]));
}
