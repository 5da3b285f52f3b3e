//! Quantity arithmetic for moving items between a slot and the viewer's cursor.
//!
//! Both operations are pure: they compute the resulting slot and cursor contents and leave it to
//! the caller to write them back to the host.

use crate::{
    event::Amount,
    item::*,
};
use std::cmp::min;


/// Outcome of a transfer between a slot and the cursor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transfer {
    /// New slot contents.
    pub slot: Option<ItemStack>,
    /// New cursor contents.
    pub cursor: Option<ItemStack>,
    /// Number of items moved.
    pub moved: u8,
}

fn ceil_half(n: u8) -> u8 {
    n / 2 + n % 2
}

/// Number of items a pickup of `amount` would take from a stack of `count`.
pub fn pickup_amount(amount: Amount, count: u8) -> u8 {
    match amount {
        Amount::All => count,
        Amount::Some | Amount::Half => ceil_half(count),
        Amount::One => min(count, 1),
    }
}

/// Number of items a place of `amount` would put down from a cursor holding `count`.
pub fn place_amount(amount: Amount, count: u8) -> u8 {
    match amount {
        Amount::All => count,
        Amount::Some | Amount::Half => ceil_half(count),
        Amount::One => min(count, 1),
    }
}

/// Move items from `slot` into the cursor.
///
/// Returns `None` if nothing can move: the slot is empty, the cursor holds an incompatible
/// stack, or the cursor is already at the stack limit.
pub fn pickup(
    slot: Option<&ItemStack>,
    cursor: Option<&ItemStack>,
    amount: Amount,
    max_count: u8,
) -> Option<Transfer> {
    let slot = slot?;
    let held = match cursor {
        None => 0,
        Some(cursor) if cursor.can_stack(slot) => cursor.count.get(),
        Some(_) => return None,
    };
    let moved = min(
        pickup_amount(amount, slot.count.get()),
        max_count.saturating_sub(held),
    );
    if moved == 0 {
        return None;
    }
    Some(Transfer {
        slot: slot.with_count(slot.count.get() - moved),
        cursor: slot.with_count(held + moved),
        moved,
    })
}

/// Move items from the cursor into `slot`.
///
/// Returns `None` if nothing can move: the cursor is empty, the slot holds an incompatible stack,
/// or the slot is already at the stack limit.
pub fn place(
    cursor: Option<&ItemStack>,
    slot: Option<&ItemStack>,
    amount: Amount,
    max_count: u8,
) -> Option<Transfer> {
    let cursor = cursor?;
    let existing = match slot {
        None => 0,
        Some(slot) if slot.can_stack(cursor) => slot.count.get(),
        Some(_) => return None,
    };
    let moved = min(
        place_amount(amount, cursor.count.get()),
        max_count.saturating_sub(existing),
    );
    if moved == 0 {
        return None;
    }
    Some(Transfer {
        slot: cursor.with_count(existing + moved),
        cursor: cursor.with_count(cursor.count.get() - moved),
        moved,
    })
}


#[cfg(test)]
fn stack(n: u8) -> ItemStack {
    ItemStack::new(RawItemId(1), n).unwrap()
}

#[test]
fn test_pickup_half_takes_ceiling() {
    let t = pickup(Some(&stack(7)), None, Amount::Half, 64).unwrap();
    assert_eq!(t.slot, Some(stack(3)));
    assert_eq!(t.cursor, Some(stack(4)));
    assert_eq!(t.moved, 4);
}

#[test]
fn test_place_bounded_by_stack_limit() {
    let t = place(Some(&stack(40)), Some(&stack(50)), Amount::All, 64).unwrap();
    assert_eq!(t.slot, Some(stack(64)));
    assert_eq!(t.cursor, Some(stack(26)));
}

#[test]
fn test_place_onto_incompatible_is_noop() {
    let other = ItemStack::new(RawItemId(2), 3).unwrap();
    assert_eq!(place(Some(&stack(5)), Some(&other), Amount::All, 64), None);
    assert_eq!(pickup(Some(&other), Some(&stack(5)), Amount::All, 64), None);
}

#[test]
fn test_pickup_and_place_conserve_items() {
    for amount in [Amount::All, Amount::Some, Amount::Half, Amount::One] {
        for (slot_n, cursor_n) in [(1, 0), (7, 0), (10, 60), (64, 1), (33, 12)] {
            let slot = stack(slot_n);
            let cursor = stack(cursor_n.max(1)).with_count(cursor_n);
            let before = slot_n as u32 + cursor_n as u32;
            if let Some(t) = pickup(Some(&slot), cursor.as_ref(), amount, 64) {
                let after = count_of(t.slot.as_ref()) as u32 + count_of(t.cursor.as_ref()) as u32;
                assert_eq!(before, after, "pickup {:?} {} {}", amount, slot_n, cursor_n);
                assert!(count_of(t.cursor.as_ref()) <= 64);
            }
            if let Some(t) = place(cursor.as_ref(), Some(&slot), amount, 64) {
                let after = count_of(t.slot.as_ref()) as u32 + count_of(t.cursor.as_ref()) as u32;
                assert_eq!(before, after, "place {:?} {} {}", amount, slot_n, cursor_n);
                assert!(count_of(t.slot.as_ref()) <= 64);
            }
        }
    }
}

#[test]
fn test_place_one_and_some() {
    let t = place(Some(&stack(5)), None, Amount::One, 64).unwrap();
    assert_eq!((t.slot, t.cursor), (Some(stack(1)), Some(stack(4))));
    let t = place(Some(&stack(5)), None, Amount::Some, 64).unwrap();
    assert_eq!((t.slot, t.cursor), (Some(stack(3)), Some(stack(2))));
}
