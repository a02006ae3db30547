//! Inventory screen interaction
//!
//! While the screen is open, mouse buttons act on the player's inventory
//! slots instead of the world:
//!
//! - left click picks up, drops, swaps or merges a stack
//! - right click takes half a stack or drops a single item
//! - a double click gathers every stack of the held item onto the cursor
//! - dragging with a button held spreads the cursor stack over the slots
//!   passed, evenly with the left button and one by one with the right
//!
//! Slots are laid out in rows of [`COLUMNS`], centred in the window, with
//! slot 0 in the top-left corner.

use glam::{UVec2, Vec2};

use super::state::Input;
use crate::ecs::signal::{DOUBLE_CLICK, LEFT_CLICK_DOWN, LEFT_HOLD, RIGHT_CLICK_DOWN, RIGHT_HOLD};
use crate::ecs::{EcsError, EntityId, Scene};
use crate::world::Inventory;

/// Slots per row
pub const COLUMNS: usize = 9;

/// Edge length of a slot in window pixels
pub const SLOT_SIZE: f32 = 40.0;

/// Open/closed state and the drag in progress
#[derive(Debug, Default)]
pub struct InventoryScreen {
    open: bool,
    /// Slots crossed by the current drag, in order
    path: Vec<usize>,
    /// Whether the current drag uses the left button
    drag_left: bool,
}

impl InventoryScreen {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Open or close the screen. Closing abandons any drag.
    pub fn toggle(&mut self) {
        self.open = !self.open;
        self.path.clear();
        log::debug!("Inventory screen {}", if self.open { "opened" } else { "closed" });
    }

    /// Slots the current drag has passed
    #[must_use]
    pub fn drag_path(&self) -> &[usize] {
        &self.path
    }

    /// Slot under a window-space point, if any
    #[must_use]
    pub fn slot_at(point: Vec2, viewport: UVec2, slots: usize) -> Option<usize> {
        let extent = grid_extent(slots);
        let local = point - (viewport.as_vec2() - extent) * 0.5;
        if local.x < 0.0 || local.y < 0.0 || local.x >= extent.x || local.y >= extent.y {
            return None;
        }

        let index = (local.x / SLOT_SIZE) as usize + (local.y / SLOT_SIZE) as usize * COLUMNS;
        (index < slots).then_some(index)
    }

    /// Window-space centre of a slot
    #[must_use]
    pub fn slot_center(index: usize, viewport: UVec2, slots: usize) -> Vec2 {
        let origin = (viewport.as_vec2() - grid_extent(slots)) * 0.5;
        let cell = Vec2::new((index % COLUMNS) as f32, (index / COLUMNS) as f32);
        origin + (cell + 0.5) * SLOT_SIZE
    }

    /// Apply this frame's clicks, holds and drags to `player`'s inventory
    /// and the scene's cursor stack. Click signals are consumed.
    ///
    /// # Errors
    ///
    /// Fails if `player` has no inventory.
    pub fn update(&mut self, scene: &mut Scene, input: &Input, player: EntityId) -> Result<(), EcsError> {
        let mut held = scene.held;
        let left_hold = scene.is_signaled(LEFT_HOLD);
        let dragging = left_hold || scene.is_signaled(RIGHT_HOLD);
        let left_click = scene.take_signal(LEFT_CLICK_DOWN) != 0;
        let right_click = scene.take_signal(RIGHT_CLICK_DOWN) != 0;
        let double_click = scene.take_signal(DOUBLE_CLICK) != 0;

        let inventory = scene.get_mut::<Inventory>(player)?;
        let hovered = Self::slot_at(input.mouse_position(), input.viewport(), inventory.len());

        if dragging {
            if self.path.is_empty() {
                self.drag_left = left_hold;
            }
            if let Some(index) = hovered
                && !held.is_empty()
                && !self.path.contains(&index)
                && inventory.slot(index).is_some_and(|slot| slot.is_empty() || slot.item == held.item)
            {
                self.path.push(index);
            }
        } else if !self.path.is_empty() {
            inventory.spread(&self.path, &mut held, self.drag_left);
            self.path.clear();
        } else if let Some(index) = hovered {
            if left_click && double_click && !held.is_empty() {
                inventory.gather(&mut held);
            } else if left_click {
                inventory.click(index, &mut held);
            } else if right_click {
                inventory.split(index, &mut held);
            }
        }

        scene.held = held;
        Ok(())
    }
}

fn grid_extent(slots: usize) -> Vec2 {
    Vec2::new(COLUMNS as f32, slots.div_ceil(COLUMNS) as f32) * SLOT_SIZE
}
