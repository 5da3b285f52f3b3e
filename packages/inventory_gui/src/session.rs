//! Per-viewer sessions and the page state they look at.

use crate::{
    attributes::Attributes,
    element::Element,
    gui::Gui,
    host::{Host, ViewerId},
};
use std::{
    collections::{BTreeMap, HashMap},
    fmt::{self, Formatter, Debug},
    sync::{
        Arc,
        atomic::{AtomicU32, Ordering},
    },
};
use parking_lot::Mutex;
use anyhow::*;


/// Computed contents of one page. Immutable once built, except for its attributes.
pub struct PageState {
    title: String,
    slots: BTreeMap<usize, Arc<dyn Element>>,
    has_next_page: bool,
    attributes: Attributes,
}

impl PageState {
    pub fn new(
        title: String,
        slots: BTreeMap<usize, Arc<dyn Element>>,
        has_next_page: bool,
    ) -> Self {
        PageState {
            title,
            slots,
            has_next_page,
            attributes: Attributes::new(),
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn element(&self, slot: usize) -> Option<&Arc<dyn Element>> {
        self.slots.get(&slot)
    }

    pub fn slots(&self) -> &BTreeMap<usize, Arc<dyn Element>> {
        &self.slots
    }

    pub fn has_next_page(&self) -> bool {
        self.has_next_page
    }

    /// Highest occupied slot index.
    pub fn highest_slot(&self) -> Option<usize> {
        self.slots.keys().next_back().copied()
    }

    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }
}

impl Debug for PageState {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.debug_struct("PageState")
            .field("title", &self.title)
            .field("slots", &self.slots)
            .field("has_next_page", &self.has_next_page)
            .finish()
    }
}


/// State of a GUI as seen through one or more sessions. Pages are numbered from 1.
#[derive(Debug, Default)]
pub struct GuiState {
    pages: Mutex<HashMap<u32, Arc<PageState>>>,
    attributes: Attributes,
}

impl GuiState {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn page(&self, page: u32) -> Option<Arc<PageState>> {
        self.pages.lock().get(&page).cloned()
    }

    /// Atomically replace a page's state. Returns the previous state.
    pub fn replace_page(&self, page: u32, state: Arc<PageState>) -> Option<Arc<PageState>> {
        debug_assert!(page >= 1, "pages are numbered from 1");
        self.pages.lock().insert(page, state)
    }

    pub fn remove_page(&self, page: u32) -> Option<Arc<PageState>> {
        self.pages.lock().remove(&page)
    }

    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }
}


/// How long a GUI's state lives.
#[derive(Debug, Clone)]
pub enum StateLifetime {
    /// Fresh state for every session. Nothing is broadcast.
    Session,
    /// One state shared by every session of the GUI. Updates are broadcast to all viewers.
    Shared(Arc<GuiState>),
}

impl StateLifetime {
    /// Shared lifetime around a fresh state.
    pub fn shared() -> Self {
        StateLifetime::Shared(Arc::new(GuiState::new()))
    }

    /// State for a newly opened session.
    pub fn session_state(&self) -> Arc<GuiState> {
        match self {
            StateLifetime::Session => Arc::new(GuiState::new()),
            StateLifetime::Shared(state) => Arc::clone(state),
        }
    }

    /// Whether view updates should reach every viewer of the GUI.
    pub fn broadcasts(&self) -> bool {
        matches!(self, StateLifetime::Shared(_))
    }
}


/// One viewer's binding to a GUI: which page they are on and which state they see.
pub struct Session {
    gui: Arc<Gui>,
    page: AtomicU32,
    state: Arc<GuiState>,
}

impl Session {
    pub(crate) fn new(gui: Arc<Gui>, page: u32, state: Arc<GuiState>) -> Arc<Self> {
        Arc::new(Session {
            gui,
            page: AtomicU32::new(page),
            state,
        })
    }

    pub fn gui(&self) -> &Arc<Gui> {
        &self.gui
    }

    /// Current page, 1-indexed.
    pub fn page(&self) -> u32 {
        self.page.load(Ordering::SeqCst)
    }

    pub fn set_page(&self, page: u32) -> Result<()> {
        ensure!(page >= 1, "page numbers start at 1, got {}", page);
        self.page.store(page, Ordering::SeqCst);
        Ok(())
    }

    pub fn state(&self) -> &Arc<GuiState> {
        &self.state
    }

    /// State of the current page, if it has been computed.
    pub fn page_state(&self) -> Option<Arc<PageState>> {
        self.state.page(self.page())
    }

    /// Whether this session belongs to `gui`.
    pub fn is_for(&self, gui: &Gui) -> bool {
        self.gui.id() == gui.id()
    }
}

impl Debug for Session {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.debug_struct("Session")
            .field("gui", &self.gui.id())
            .field("page", &self.page())
            .finish_non_exhaustive()
    }
}

/// Session of the container the viewer currently has open, if it was created by a GUI.
pub fn extract_session(host: &dyn Host, viewer: ViewerId) -> Option<Arc<Session>> {
    let container = host.current_container(viewer)?;
    host.container_info(container).map(|info| info.session)
}


#[test]
fn test_shared_lifetime_shares_state() {
    let shared = StateLifetime::shared();
    assert!(Arc::ptr_eq(&shared.session_state(), &shared.session_state()));
    assert!(shared.broadcasts());

    let session = StateLifetime::Session;
    assert!(!Arc::ptr_eq(&session.session_state(), &session.session_state()));
    assert!(!session.broadcasts());
}

#[test]
fn test_replace_page_is_whole() {
    let state = GuiState::new();
    assert!(state.page(1).is_none());
    state.replace_page(1, Arc::new(PageState::new("a".into(), BTreeMap::new(), true)));
    let old = state.replace_page(1, Arc::new(PageState::new("b".into(), BTreeMap::new(), false)));
    assert_eq!(old.unwrap().title(), "a");
    let page = state.page(1).unwrap();
    assert_eq!(page.title(), "b");
    assert!(!page.has_next_page());
    assert_eq!(page.highest_slot(), None);
}
