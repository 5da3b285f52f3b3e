//! In-memory host, for tests and the demo binary.

use crate::{
    host::*,
    item::ItemStack,
    session::Session,
};
use std::{
    collections::BTreeMap,
    sync::Arc,
};
use parking_lot::Mutex;
use slab::Slab;


/// Size of a viewer's own inventory.
pub const INVENTORY_SIZE: usize = 36;

/// Host operation, as recorded by `MemHost`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostOp {
    Create(ContainerHandle),
    Open(ViewerId, ContainerHandle),
    Close(ViewerId),
    Refresh(ViewerId),
}

struct MemContainer {
    ctr: u32,
    kind: ContainerKind,
    title: String,
    session: Arc<Session>,
    slots: Vec<Option<ItemStack>>,
}

struct MemViewer {
    open: Option<ContainerHandle>,
    cursor: Option<ItemStack>,
    inventory: Vec<Option<ItemStack>>,
}

impl MemViewer {
    fn new() -> Self {
        MemViewer {
            open: None,
            cursor: None,
            inventory: vec![None; INVENTORY_SIZE],
        }
    }
}

#[derive(Default)]
struct Inner {
    containers: Slab<MemContainer>,
    ctr: u32,
    viewers: BTreeMap<ViewerId, MemViewer>,
    ops: Vec<HostOp>,
}

impl Inner {
    fn container(&self, handle: ContainerHandle) -> Option<&MemContainer> {
        let (idx, ctr) = split_handle(handle);
        self.containers.get(idx).filter(|container| container.ctr == ctr)
    }

    fn container_mut(&mut self, handle: ContainerHandle) -> Option<&mut MemContainer> {
        let (idx, ctr) = split_handle(handle);
        self.containers.get_mut(idx).filter(|container| container.ctr == ctr)
    }

    fn viewer(&mut self, viewer: ViewerId) -> &mut MemViewer {
        self.viewers.entry(viewer).or_insert_with(MemViewer::new)
    }

    fn open_of(&self, viewer: ViewerId) -> Option<ContainerHandle> {
        self.viewers.get(&viewer).and_then(|v| v.open)
    }
}

fn split_handle(handle: ContainerHandle) -> (usize, u32) {
    ((handle.0 & 0xffff_ffff) as usize, (handle.0 >> 32) as u32)
}

fn join_handle(idx: usize, ctr: u32) -> ContainerHandle {
    ContainerHandle(((ctr as u64) << 32) | idx as u64)
}


type CloseHook = Arc<dyn Fn(ViewerId) + Send + Sync>;

/// Host that keeps containers and viewer inventories in memory and records every container
/// operation. Containers are freed once closed by their last viewer.
#[derive(Default)]
pub struct MemHost {
    inner: Mutex<Inner>,
    close_hook: Mutex<Option<CloseHook>>,
}

impl MemHost {
    pub fn new() -> Self {
        Default::default()
    }

    /// Connect a viewer.
    pub fn add_viewer(&self, viewer: ViewerId) {
        self.inner.lock().viewer(viewer);
    }

    /// Called on every close, before the container is forgotten. Usually `Dispatcher::on_close`.
    pub fn set_close_hook<F: Fn(ViewerId) + Send + Sync + 'static>(&self, hook: F) {
        *self.close_hook.lock() = Some(Arc::new(hook));
    }

    /// Contents of the viewer's open container, as they see it.
    pub fn visible_slots(&self, viewer: ViewerId) -> Vec<Option<ItemStack>> {
        let inner = self.inner.lock();
        inner.open_of(viewer)
            .and_then(|handle| inner.container(handle))
            .map(|container| container.slots.clone())
            .unwrap_or_default()
    }

    /// Title of the viewer's open container.
    pub fn visible_title(&self, viewer: ViewerId) -> Option<String> {
        let inner = self.inner.lock();
        inner.open_of(viewer)
            .and_then(|handle| inner.container(handle))
            .map(|container| container.title.clone())
    }

    pub fn inventory_slot(&self, viewer: ViewerId, idx: usize) -> Option<ItemStack> {
        self.inner.lock().viewer(viewer).inventory.get(idx).cloned().flatten()
    }

    pub fn set_inventory_slot(&self, viewer: ViewerId, idx: usize, content: Option<ItemStack>) {
        if let Some(slot) = self.inner.lock().viewer(viewer).inventory.get_mut(idx) {
            *slot = content;
        }
    }

    /// Number of live containers.
    pub fn container_count(&self) -> usize {
        self.inner.lock().containers.len()
    }

    /// Operations recorded so far.
    pub fn ops(&self) -> Vec<HostOp> {
        self.inner.lock().ops.clone()
    }

    pub fn clear_ops(&self) {
        self.inner.lock().ops.clear();
    }

    fn free_if_unviewed(inner: &mut Inner, handle: ContainerHandle) {
        let viewed = inner.viewers.values().any(|v| v.open == Some(handle));
        let (idx, ctr) = split_handle(handle);
        if !viewed && inner.containers.get(idx).map(|c| c.ctr == ctr).unwrap_or(false) {
            inner.containers.remove(idx);
        }
    }
}

impl Host for MemHost {
    fn create_container(
        &self,
        kind: ContainerKind,
        size: usize,
        title: &str,
        session: Arc<Session>,
    ) -> ContainerHandle {
        let mut inner = self.inner.lock();
        inner.ctr = inner.ctr.wrapping_add(1);
        let ctr = inner.ctr;
        let idx = inner.containers.insert(MemContainer {
            ctr,
            kind,
            title: title.to_owned(),
            session,
            slots: vec![None; size],
        });
        let handle = join_handle(idx, ctr);
        inner.ops.push(HostOp::Create(handle));
        handle
    }

    fn set_container_slot(&self, container: ContainerHandle, idx: usize, content: Option<ItemStack>) {
        let mut inner = self.inner.lock();
        if let Some(slot) = inner.container_mut(container).and_then(|c| c.slots.get_mut(idx)) {
            *slot = content;
        }
    }

    fn open_container(&self, viewer: ViewerId, container: ContainerHandle) {
        let mut inner = self.inner.lock();
        if inner.container(container).is_none() {
            warn!(%viewer, ?container, "tried to open freed container");
            return;
        }
        let previous = inner.viewer(viewer).open.replace(container);
        inner.ops.push(HostOp::Open(viewer, container));
        if let Some(previous) = previous.filter(|&previous| previous != container) {
            Self::free_if_unviewed(&mut inner, previous);
        }
    }

    fn close_container(&self, viewer: ViewerId) {
        if self.inner.lock().open_of(viewer).is_none() {
            return;
        }
        let hook = self.close_hook.lock().clone();
        if let Some(hook) = hook {
            hook(viewer);
        }
        let mut inner = self.inner.lock();
        let closed = inner.viewer(viewer).open.take();
        inner.ops.push(HostOp::Close(viewer));
        if let Some(closed) = closed {
            Self::free_if_unviewed(&mut inner, closed);
        }
    }

    fn current_container(&self, viewer: ViewerId) -> Option<ContainerHandle> {
        self.inner.lock().open_of(viewer)
    }

    fn container_info(&self, container: ContainerHandle) -> Option<ContainerInfo> {
        self.inner.lock().container(container).map(|c| ContainerInfo {
            kind: c.kind,
            size: c.slots.len(),
            title: c.title.clone(),
            session: Arc::clone(&c.session),
        })
    }

    fn refresh_view(&self, viewer: ViewerId) {
        self.inner.lock().ops.push(HostOp::Refresh(viewer));
    }

    fn cursor(&self, viewer: ViewerId) -> Option<ItemStack> {
        self.inner.lock().viewer(viewer).cursor.clone()
    }

    fn set_cursor(&self, viewer: ViewerId, content: Option<ItemStack>) {
        self.inner.lock().viewer(viewer).cursor = content;
    }

    fn view_slot(&self, viewer: ViewerId, slot: SlotRef) -> Option<ItemStack> {
        let mut inner = self.inner.lock();
        match slot.side {
            Side::Top => {
                let handle = inner.open_of(viewer)?;
                inner.container(handle)?.slots.get(slot.idx).cloned().flatten()
            }
            Side::Bottom => inner.viewer(viewer).inventory.get(slot.idx).cloned().flatten(),
        }
    }

    fn set_view_slot(&self, viewer: ViewerId, slot: SlotRef, content: Option<ItemStack>) {
        let mut inner = self.inner.lock();
        let target = match slot.side {
            Side::Top => match inner.open_of(viewer) {
                Some(handle) => inner.container_mut(handle).and_then(|c| c.slots.get_mut(slot.idx)),
                None => None,
            },
            Side::Bottom => inner.viewer(viewer).inventory.get_mut(slot.idx),
        };
        if let Some(target) = target {
            *target = content;
        }
    }

    fn view_size(&self, viewer: ViewerId, side: Side) -> usize {
        let mut inner = self.inner.lock();
        match side {
            Side::Top => inner.open_of(viewer)
                .and_then(|handle| inner.container(handle))
                .map(|c| c.slots.len())
                .unwrap_or(0),
            Side::Bottom => inner.viewer(viewer).inventory.len(),
        }
    }

    fn viewers(&self) -> Vec<ViewerId> {
        self.inner.lock().viewers.keys().copied().collect()
    }
}


/// Context around a fresh `MemHost` with an immediate scheduler and a dispatcher wired up to
/// close notifications.
#[cfg(test)]
pub(crate) fn test_context() -> (Arc<MemHost>, crate::context::GuiContext) {
    use crate::{
        context::GuiContext,
        dispatch::Dispatcher,
        scheduler::ImmediateScheduler,
    };

    let host = Arc::new(MemHost::new());
    let cx = GuiContext::new(host.clone(), Arc::new(ImmediateScheduler::new()));
    let dispatcher = Dispatcher::new(cx.clone());
    host.set_close_hook(move |viewer| dispatcher.on_close(viewer));
    (host, cx)
}

#[test]
fn test_freed_container_handles_go_stale() {
    let (host, cx) = test_context();
    let gui = crate::gui::Gui::builder()
        .lifetime(crate::session::StateLifetime::Session)
        .static_contents(crate::contents::StaticContents::new("a", Vec::new()))
        .build(&cx)
        .unwrap();
    let viewer = ViewerId(1);
    host.add_viewer(viewer);
    gui.open(viewer).unwrap();
    let first = host.current_container(viewer).unwrap();
    host.close_container(viewer);
    assert!(host.container_info(first).is_none());
    assert_eq!(host.container_count(), 0);

    gui.open(viewer).unwrap();
    let second = host.current_container(viewer).unwrap();
    assert_ne!(first, second);
    assert!(host.container_info(first).is_none());
}
