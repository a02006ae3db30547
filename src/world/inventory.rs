//! Slot inventories and the cursor-held item stack

use serde::{Deserialize, Serialize};

use super::item::Item;

/// Number of slots reachable through the number keys
pub const HOTBAR_SLOTS: usize = 9;

/// One inventory slot
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slot {
    pub item: Item,
    pub count: u32,
}

impl Slot {
    /// Whether the slot holds nothing
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Item stack attached to the cursor while dragging between slots.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeldItem {
    pub item: Item,
    pub count: u32,
}

impl HeldItem {
    /// Whether nothing is held
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Take the whole stack, leaving the cursor empty
    pub fn take(&mut self) -> Self {
        std::mem::take(self)
    }
}

/// A fixed-size set of item slots with a selected hotbar slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inventory {
    slots: Vec<Slot>,
    selected: usize,
}

impl Inventory {
    /// Standard player inventory size
    pub const PLAYER_SIZE: usize = 36;

    /// Create an empty inventory with `size` slots
    #[must_use]
    pub fn new(size: usize) -> Self {
        Self {
            slots: vec![Slot::default(); size],
            selected: 0,
        }
    }

    /// Put one `item` into the first slot that is empty or already holds it.
    ///
    /// Returns `false` if no slot can take it.
    pub fn try_pick(&mut self, item: Item) -> bool {
        match self
            .slots
            .iter_mut()
            .find(|slot| slot.is_empty() || slot.item == item)
        {
            Some(slot) => {
                slot.item = item;
                slot.count += 1;
                true
            }
            None => false,
        }
    }

    /// Select a hotbar slot; out-of-range indices are ignored
    pub fn select(&mut self, index: usize) {
        if index < HOTBAR_SLOTS.min(self.slots.len()) {
            self.selected = index;
        }
    }

    /// Index of the selected slot
    #[must_use]
    pub fn selected(&self) -> usize {
        self.selected
    }

    /// Item in the selected slot, if any
    #[must_use]
    pub fn selected_item(&self) -> Option<Item> {
        self.slots
            .get(self.selected)
            .filter(|slot| !slot.is_empty())
            .map(|slot| slot.item)
    }

    /// Remove one item from the selected slot
    pub fn take_selected(&mut self) -> Option<Item> {
        let slot = self.slots.get_mut(self.selected)?;
        if slot.is_empty() {
            return None;
        }

        let item = slot.item;
        slot.count -= 1;
        if slot.count == 0 {
            slot.clear();
        }
        Some(item)
    }

    /// Total count of `item` across every slot
    #[must_use]
    pub fn count(&self, item: Item) -> u32 {
        self.slots
            .iter()
            .filter(|slot| slot.item == item)
            .map(|slot| slot.count)
            .sum()
    }

    /// Borrow a slot
    #[must_use]
    pub fn slot(&self, index: usize) -> Option<&Slot> {
        self.slots.get(index)
    }

    /// All slots in order
    #[must_use]
    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    /// Number of slots
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether the inventory has no slots
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    // ========================================================================
    // Cursor interaction
    // ========================================================================

    /// Primary click on a slot: merge equal stacks, otherwise swap.
    pub fn click(&mut self, index: usize, held: &mut HeldItem) {
        let Some(slot) = self.slots.get_mut(index) else {
            return;
        };

        if !held.is_empty() && !slot.is_empty() && slot.item == held.item {
            slot.count += held.take().count;
        } else {
            std::mem::swap(&mut slot.item, &mut held.item);
            std::mem::swap(&mut slot.count, &mut held.count);
            if held.is_empty() {
                held.item = Item::Air;
            }
            if slot.is_empty() {
                slot.clear();
            }
        }
    }

    /// Secondary click: pick up half a stack with an empty cursor, otherwise
    /// drop a single item into the slot.
    pub fn split(&mut self, index: usize, held: &mut HeldItem) {
        let Some(slot) = self.slots.get_mut(index) else {
            return;
        };

        if held.is_empty() {
            if slot.is_empty() {
                return;
            }
            let half = slot.count / 2;
            held.item = slot.item;
            held.count = slot.count - half;
            slot.count = half;
            if slot.is_empty() {
                slot.clear();
            }
        } else if slot.is_empty() || slot.item == held.item {
            slot.item = held.item;
            slot.count += 1;
            held.count -= 1;
            if held.is_empty() {
                held.item = Item::Air;
            }
        }
    }

    /// Distribute the held stack over the slots in `path`: `evenly` puts an
    /// equal share in each, otherwise one item goes into each slot until the
    /// cursor runs out. Slots holding a different item are skipped.
    pub fn spread(&mut self, path: &[usize], held: &mut HeldItem, evenly: bool) {
        if held.is_empty() || path.is_empty() {
            return;
        }

        let share = if evenly { held.count / path.len() as u32 } else { 1 };
        if share == 0 {
            return;
        }

        for &index in path {
            if held.count < share {
                break;
            }
            let Some(slot) = self.slots.get_mut(index) else {
                continue;
            };
            if !slot.is_empty() && slot.item != held.item {
                continue;
            }
            slot.item = held.item;
            slot.count += share;
            held.count -= share;
        }

        if held.is_empty() {
            held.item = Item::Air;
        }
    }

    /// Collect every stack of the held item onto the cursor (double click)
    pub fn gather(&mut self, held: &mut HeldItem) {
        if held.item.is_air() {
            return;
        }

        for slot in self.slots.iter_mut().filter(|slot| slot.item == held.item) {
            held.count += slot.count;
            slot.clear();
        }
    }
}

impl Default for Inventory {
    fn default() -> Self {
        Self::new(Self::PLAYER_SIZE)
    }
}
