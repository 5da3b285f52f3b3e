//! Paginated, slot-based inventory GUIs for hosts whose only rendering primitive is a grid of
//! item slots.
//!
//! A `Gui` pulls its elements from a `ContentSource`, lays them out into pages with the
//! `Populator`, and shows them through the `Host` with the `Presenter`, reusing the viewer's
//! open container where it can. Raw clicks and drags from the host enter through the
//! `Dispatcher` and are translated into semantic events that travel through the host bus, the
//! GUI's listeners, and finally the clicked element.

#[macro_use]
extern crate tracing;

pub mod attributes;
pub mod click_logic;
pub mod contents;
pub mod context;
pub mod dispatch;
pub mod element;
pub mod event;
pub mod gui;
pub mod host;
pub mod item;
pub mod lang;
pub mod logging;
pub mod mem_host;
pub mod populator;
pub mod presenter;
pub mod scheduler;
pub mod session;
pub mod settings;
pub mod translate;

pub use crate::{
    contents::{ContentSource, Contents, ElementList, PaginatingSource, StaticContents, StaticList},
    context::GuiContext,
    dispatch::Dispatcher,
    element::{ActionItem, Element, InputSlot, InputSlotHandler},
    event::{Amount, ClickEvent, ClickKind, EventResult, GuiEvent, GuiListener},
    gui::{Gui, GuiBuilder},
    host::{ContainerKind, Host, Side, SlotRef, ViewerId},
    item::{ItemStack, RawItemId},
    session::{Session, StateLifetime},
};
