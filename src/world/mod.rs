//! Game content: items, inventories, entity templates and terrain

mod error;
mod inventory;
mod item;
mod level;
mod registry;
mod spawn;

pub use error::WorldError;
pub use inventory::{HOTBAR_SLOTS, HeldItem, Inventory, Slot};
pub use item::Item;
pub use level::Level;
pub use registry::{LootEntry, Registry, Structure};
pub use spawn::World;
