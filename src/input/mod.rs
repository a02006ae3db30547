//! Input handling module
//!
//! Raw key and mouse state, translation of platform events into scene
//! signals, the inventory screen, and the system that turns both into world
//! changes.

mod events;
mod screen;
mod state;
mod system;

pub use events::{DOUBLE_CLICK_MS, EventManager, EventResponse, HOLD_MS, InputEvent};
pub use screen::{COLUMNS, InventoryScreen, SLOT_SIZE};
pub use state::{Input, KEY_COUNT, MouseButton, Scancode};
pub use system::{Destruction, InputStats, InputSystem};
