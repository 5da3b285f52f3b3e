//! The host game: the only thing that can actually show containers to viewers.

use crate::{
    item::ItemStack,
    session::Session,
};
use std::{
    fmt::{self, Formatter, Display},
    sync::Arc,
};
use serde::{Serialize, Deserialize};
use anyhow::*;


/// Identity of a connected viewer, assigned by the host.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ViewerId(pub u64);

impl Display for ViewerId {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "viewer#{}", self.0)
    }
}

/// Opaque handle to a container created by the host.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ContainerHandle(pub u64);

/// Which of the two inventories of an open container view.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Side {
    /// The container itself.
    Top,
    /// The viewer's own inventory, shown below it.
    Bottom,
}

impl Side {
    pub fn other(self) -> Side {
        match self {
            Side::Top => Side::Bottom,
            Side::Bottom => Side::Top,
        }
    }
}

/// Reference to one slot of a viewer's open view.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct SlotRef {
    pub side: Side,
    pub idx: usize,
}

impl SlotRef {
    pub fn top(idx: usize) -> Self {
        SlotRef { side: Side::Top, idx }
    }

    pub fn bottom(idx: usize) -> Self {
        SlotRef { side: Side::Bottom, idx }
    }
}


/// Kind of container the host can create.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContainerKind {
    Chest,
    Dispenser,
    Dropper,
    Furnace,
    Workbench,
    Crafting,
    Enchanting,
    Brewing,
    Player,
    Creative,
    Merchant,
    EnderChest,
    Anvil,
    Beacon,
    Hopper,
}

impl ContainerKind {
    /// Size granularity of resizable containers.
    pub const ROW_LEN: usize = 9;
    /// Largest size of a chest.
    pub const MAX_CHEST_SIZE: usize = 54;

    /// Size the host creates this kind with by default.
    pub fn default_size(self) -> usize {
        match self {
            ContainerKind::Chest => 27,
            ContainerKind::Dispenser => 9,
            ContainerKind::Dropper => 9,
            ContainerKind::Furnace => 3,
            ContainerKind::Workbench => 10,
            ContainerKind::Crafting => 5,
            ContainerKind::Enchanting => 2,
            ContainerKind::Brewing => 4,
            ContainerKind::Player => 41,
            ContainerKind::Creative => 5,
            ContainerKind::Merchant => 3,
            ContainerKind::EnderChest => 27,
            ContainerKind::Anvil => 3,
            ContainerKind::Beacon => 1,
            ContainerKind::Hopper => 5,
        }
    }

    /// Whether a GUI may be built on this kind at all. Kinds that only exist as part of the
    /// viewer's own inventory cannot.
    pub fn usable_for_gui(self) -> bool {
        !matches!(self, ContainerKind::Crafting | ContainerKind::Creative | ContainerKind::Player)
    }

    /// Whether this kind can be created with a size other than its default.
    pub fn resizable(self) -> bool {
        self == ContainerKind::Chest
    }

    /// Check that a GUI of this kind can have the given maximum size and sizing mode.
    pub fn validate(self, size: usize, dynamic: bool) -> Result<()> {
        ensure!(self.usable_for_gui(), "{:?} containers cannot be used for guis", self);
        if self.resizable() {
            ensure!(
                size > 0 && size % Self::ROW_LEN == 0 && size <= Self::MAX_CHEST_SIZE,
                "{:?} size must be a positive multiple of {} up to {}, got {}",
                self, Self::ROW_LEN, Self::MAX_CHEST_SIZE, size,
            );
        } else {
            ensure!(
                size == self.default_size(),
                "{:?} containers must have size {}, got {}",
                self, self.default_size(), size,
            );
            ensure!(!dynamic, "{:?} containers cannot be dynamically sized", self);
        }
        Ok(())
    }
}


/// What the host knows about a container.
#[derive(Debug, Clone)]
pub struct ContainerInfo {
    pub kind: ContainerKind,
    pub size: usize,
    pub title: String,
    /// The session that created the container.
    pub session: Arc<Session>,
}


/// The host game.
///
/// All calls happen on the host's logic thread. Implementations must not call back into the GUI
/// system while holding their own locks, since several operations deliver events synchronously.
pub trait Host: Send + Sync {
    /// Create a container. The container remembers `session` as its holder.
    fn create_container(
        &self,
        kind: ContainerKind,
        size: usize,
        title: &str,
        session: Arc<Session>,
    ) -> ContainerHandle;

    /// Set one slot of a container, as seen by everyone viewing it.
    fn set_container_slot(&self, container: ContainerHandle, idx: usize, content: Option<ItemStack>);

    /// Show a container to a viewer.
    fn open_container(&self, viewer: ViewerId, container: ContainerHandle);

    /// Close whatever the viewer has open. Must deliver the close notification to the dispatcher
    /// while the container is still reported as current.
    fn close_container(&self, viewer: ViewerId);

    /// The container the viewer has open, or `None` if they only see their own inventory.
    fn current_container(&self, viewer: ViewerId) -> Option<ContainerHandle>;

    fn container_info(&self, container: ContainerHandle) -> Option<ContainerInfo>;

    /// Resend the viewer's open view to their client.
    fn refresh_view(&self, viewer: ViewerId);

    /// The stack held on the viewer's cursor.
    fn cursor(&self, viewer: ViewerId) -> Option<ItemStack>;

    fn set_cursor(&self, viewer: ViewerId, content: Option<ItemStack>);

    /// Contents of a slot of the viewer's open view.
    fn view_slot(&self, viewer: ViewerId, slot: SlotRef) -> Option<ItemStack>;

    fn set_view_slot(&self, viewer: ViewerId, slot: SlotRef, content: Option<ItemStack>);

    /// Number of slots on one side of the viewer's open view.
    fn view_size(&self, viewer: ViewerId, side: Side) -> usize;

    /// All currently connected viewers.
    fn viewers(&self) -> Vec<ViewerId>;
}


#[test]
fn test_container_kind_validation() {
    assert!(ContainerKind::Chest.validate(54, true).is_ok());
    assert!(ContainerKind::Chest.validate(9, false).is_ok());
    assert!(ContainerKind::Chest.validate(0, false).is_err());
    assert!(ContainerKind::Chest.validate(10, false).is_err());
    assert!(ContainerKind::Chest.validate(63, false).is_err());
    assert!(ContainerKind::Hopper.validate(5, false).is_ok());
    assert!(ContainerKind::Hopper.validate(5, true).is_err());
    assert!(ContainerKind::Hopper.validate(9, false).is_err());
    assert!(ContainerKind::Player.validate(41, false).is_err());
}
