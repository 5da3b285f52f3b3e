//! Where a GUI's elements and titles come from.

use crate::{
    attributes::AttrKey,
    element::Element,
    host::ViewerId,
    session::Session,
};
use std::{
    ops::Range,
    sync::Arc,
};
use futures::{
    future::{self, BoxFuture},
    FutureExt,
};


/// Attribute under which paginated sources record the page count in the GUI state.
pub const PAGE_COUNT: AttrKey<usize> = AttrKey::new("gui.pageCount");

/// Elements of one page, in fill order.
#[derive(Debug, Clone, Default)]
pub struct Contents {
    pub has_next_page: bool,
    pub elements: Vec<Arc<dyn Element>>,
}

/// Supplier of a GUI's per-page contents and title. Results may take time to arrive.
pub trait ContentSource: Send + Sync {
    fn contents(&self, viewer: ViewerId, page: u32, session: &Arc<Session>) -> BoxFuture<'static, Contents>;

    fn title(&self, viewer: ViewerId, page: u32, session: &Arc<Session>) -> BoxFuture<'static, String>;
}


/// A single-page GUI with a fixed title and elements.
#[derive(Debug, Clone)]
pub struct StaticContents {
    pub title: String,
    pub elements: Vec<Arc<dyn Element>>,
}

impl StaticContents {
    pub fn new(title: impl Into<String>, elements: Vec<Arc<dyn Element>>) -> Self {
        StaticContents {
            title: title.into(),
            elements,
        }
    }
}

impl ContentSource for StaticContents {
    fn contents(&self, _viewer: ViewerId, page: u32, _session: &Arc<Session>) -> BoxFuture<'static, Contents> {
        let elements = if page == 1 {
            self.elements.clone()
        } else {
            Vec::new()
        };
        future::ready(Contents {
            has_next_page: false,
            elements,
        }).boxed()
    }

    fn title(&self, _viewer: ViewerId, _page: u32, _session: &Arc<Session>) -> BoxFuture<'static, String> {
        future::ready(self.title.clone()).boxed()
    }
}


/// Flat list of elements, to be split into pages by `PaginatingSource`.
pub trait ElementList: Send + Sync {
    fn elements(&self, viewer: ViewerId, session: &Arc<Session>) -> BoxFuture<'static, Vec<Arc<dyn Element>>>;

    fn base_title(&self, viewer: ViewerId, session: &Arc<Session>) -> BoxFuture<'static, String>;

    fn show_page_number(&self) -> bool {
        false
    }

    fn show_page_count(&self) -> bool {
        false
    }
}

/// Fixed `ElementList`.
#[derive(Debug, Clone)]
pub struct StaticList {
    pub title: String,
    pub elements: Vec<Arc<dyn Element>>,
    pub show_page_number: bool,
    pub show_page_count: bool,
}

impl StaticList {
    pub fn new(title: impl Into<String>, elements: Vec<Arc<dyn Element>>) -> Self {
        StaticList {
            title: title.into(),
            elements,
            show_page_number: false,
            show_page_count: false,
        }
    }

    pub fn with_page_number(mut self) -> Self {
        self.show_page_number = true;
        self
    }

    pub fn with_page_count(mut self) -> Self {
        self.show_page_count = true;
        self
    }
}

impl ElementList for StaticList {
    fn elements(&self, _viewer: ViewerId, _session: &Arc<Session>) -> BoxFuture<'static, Vec<Arc<dyn Element>>> {
        future::ready(self.elements.clone()).boxed()
    }

    fn base_title(&self, _viewer: ViewerId, _session: &Arc<Session>) -> BoxFuture<'static, String> {
        future::ready(self.title.clone()).boxed()
    }

    fn show_page_number(&self) -> bool {
        self.show_page_number
    }

    fn show_page_count(&self) -> bool {
        self.show_page_count
    }
}


/// Range of a flat list shown on one page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageSlice {
    pub range: Range<usize>,
    pub has_next_page: bool,
    pub page_count: usize,
}

/// Split `total` elements into pages of a GUI with `capacity` slots.
///
/// If everything fits, it all goes on page 1 and no slots are spent on navigation. Otherwise
/// every page holds `capacity - 2` elements, leaving room for the previous and next controls.
/// Pages past the end are empty.
pub fn split_page(total: usize, capacity: usize, page: u32) -> PageSlice {
    let idx = page.saturating_sub(1) as usize;
    if total <= capacity {
        return PageSlice {
            range: if idx == 0 { 0..total } else { 0..0 },
            has_next_page: false,
            page_count: 1,
        };
    }
    let per_page = capacity.saturating_sub(2).max(1);
    let page_count = (total + per_page - 1) / per_page;
    let start = idx.saturating_mul(per_page).min(total);
    let end = (start + per_page).min(total);
    PageSlice {
        range: start..end,
        has_next_page: end < total,
        page_count,
    }
}

/// Content source that splits an `ElementList` across pages and decorates its title with the
/// page number and count.
pub struct PaginatingSource<L>(pub L);

impl<L: ElementList> ContentSource for PaginatingSource<L> {
    fn contents(&self, viewer: ViewerId, page: u32, session: &Arc<Session>) -> BoxFuture<'static, Contents> {
        let elements = self.0.elements(viewer, session);
        let session = Arc::clone(session);
        async move {
            let elements = elements.await;
            let slice = split_page(elements.len(), session.gui().max_size(), page);
            session.state().attributes().put(&PAGE_COUNT, slice.page_count);
            Contents {
                has_next_page: slice.has_next_page,
                elements: elements[slice.range].to_vec(),
            }
        }.boxed()
    }

    fn title(&self, viewer: ViewerId, page: u32, session: &Arc<Session>) -> BoxFuture<'static, String> {
        let base = self.0.base_title(viewer, session);
        let show_number = self.0.show_page_number();
        let show_count = self.0.show_page_count();
        let session = Arc::clone(session);
        async move {
            let base = base.await;
            let page_count = session.state().attributes().get(&PAGE_COUNT).unwrap_or_default();
            session.gui().context().settings.lang
                .page_title(&base, page, page_count, show_number, show_count)
        }.boxed()
    }
}


#[test]
fn test_split_page_fits_on_one_page() {
    assert_eq!(split_page(27, 27, 1), PageSlice { range: 0..27, has_next_page: false, page_count: 1 });
    assert_eq!(split_page(27, 27, 2), PageSlice { range: 0..0, has_next_page: false, page_count: 1 });
}

#[test]
fn test_split_page_capacity_math() {
    // 30 elements in a 27 slot gui: 25 per page
    assert_eq!(split_page(30, 27, 1), PageSlice { range: 0..25, has_next_page: true, page_count: 2 });
    assert_eq!(split_page(30, 27, 2), PageSlice { range: 25..30, has_next_page: false, page_count: 2 });
    assert_eq!(split_page(30, 27, 3).range.len(), 0);
    assert!(!split_page(30, 27, 3).has_next_page);
}

#[test]
fn test_split_page_covers_every_element_once() {
    for total in 0..120 {
        let mut seen = 0;
        let count = split_page(total, 27, 1).page_count;
        for page in 1..=count as u32 {
            let slice = split_page(total, 27, page);
            assert_eq!(slice.range.start, seen);
            seen = slice.range.end;
            assert_eq!(slice.has_next_page, page < count as u32);
        }
        assert_eq!(seen, total);
    }
}
