//! Item stacks as the host sees them.

use std::{
    collections::HashMap,
    num::NonZeroU8,
};
use serde::{Serialize, Deserialize};


/// Host-assigned item type identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RawItemId(pub u16);

/// Display metadata attached to an item stack.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ItemMeta {
    /// Display name override.
    pub name: Option<String>,
    /// Lore lines shown below the name.
    pub lore: Vec<String>,
}

/// Non-empty stack of items. An empty slot is `Option::<ItemStack>::None`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ItemStack {
    pub iid: RawItemId,
    pub meta: ItemMeta,
    pub count: NonZeroU8,
    pub damage: u16,
}

impl ItemStack {
    /// Construct a stack of `count` plain items, or `None` if `count` is zero.
    pub fn new(iid: RawItemId, count: u8) -> Option<Self> {
        NonZeroU8::new(count).map(|count| ItemStack {
            iid,
            meta: ItemMeta::default(),
            count,
            damage: 0,
        })
    }

    /// Construct a stack of exactly one plain item.
    pub fn one(iid: RawItemId) -> Self {
        ItemStack {
            iid,
            meta: ItemMeta::default(),
            count: NonZeroU8::MIN,
            damage: 0,
        }
    }

    /// Whether items of `self` and `other` may occupy the same slot.
    pub fn can_stack(&self, other: &ItemStack) -> bool {
        self.iid == other.iid
            && self.meta == other.meta
            && self.damage == other.damage
    }

    /// Copy of this stack with a different count, or `None` if `count` is zero.
    pub fn with_count(&self, count: u8) -> Option<ItemStack> {
        NonZeroU8::new(count).map(|count| ItemStack {
            count,
            ..self.clone()
        })
    }

    /// Builder-style display name override.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.meta.name = Some(name.into());
        self
    }

    /// Builder-style lore override.
    pub fn with_lore<I, S>(mut self, lore: I) -> Self
    where
        I: IntoIterator<Item=S>,
        S: Into<String>,
    {
        self.meta.lore = lore.into_iter().map(Into::into).collect();
        self
    }
}

/// Count of an optional stack, with empty counting as zero.
pub fn count_of(stack: Option<&ItemStack>) -> u8 {
    stack.map(|stack| stack.count.get()).unwrap_or(0)
}

/// Copy `stack` with a replaced display name and lore.
pub fn format_item<I, S>(stack: &ItemStack, name: impl Into<String>, lore: I) -> ItemStack
where
    I: IntoIterator<Item=S>,
    S: Into<String>,
{
    stack.clone().named(name).with_lore(lore)
}


/// Per-item-type maximum stack sizes.
#[derive(Debug, Clone)]
pub struct StackLimits {
    default: NonZeroU8,
    per_item: HashMap<RawItemId, NonZeroU8>,
}

impl StackLimits {
    /// Construct with every item type limited to `default`.
    pub fn new(default: NonZeroU8) -> Self {
        StackLimits {
            default,
            per_item: HashMap::new(),
        }
    }

    /// Override the limit of one item type.
    pub fn with_limit(mut self, iid: RawItemId, max: NonZeroU8) -> Self {
        self.per_item.insert(iid, max);
        self
    }

    /// Maximum stack size of the given item type.
    pub fn max_count(&self, iid: RawItemId) -> u8 {
        self.per_item.get(&iid).copied().unwrap_or(self.default).get()
    }
}

impl Default for StackLimits {
    fn default() -> Self {
        StackLimits::new(NonZeroU8::new(64).unwrap_or(NonZeroU8::MAX))
    }
}


#[test]
fn test_stackable_requires_matching_meta_and_damage() {
    let plain = ItemStack::new(RawItemId(1), 5).unwrap();
    let named = plain.clone().named("Shiny");
    let mut damaged = plain.clone();
    damaged.damage = 3;
    assert!(plain.can_stack(&ItemStack::one(RawItemId(1))));
    assert!(!plain.can_stack(&named));
    assert!(!plain.can_stack(&damaged));
    assert!(!plain.can_stack(&ItemStack::one(RawItemId(2))));
}

#[test]
fn test_stack_limit_overrides() {
    let limits = StackLimits::default()
        .with_limit(RawItemId(7), NonZeroU8::new(16).unwrap());
    assert_eq!(limits.max_count(RawItemId(1)), 64);
    assert_eq!(limits.max_count(RawItemId(7)), 16);
}
