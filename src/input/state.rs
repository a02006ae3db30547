//! Input handling

use glam::{UVec2, Vec2};
use serde::{Deserialize, Serialize};

/// Number of tracked scancodes
pub const KEY_COUNT: usize = 512;

/// Physical key code, laid out like USB HID usage ids
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Scancode(pub u32);

impl Scancode {
    pub const A: Self = Self(4);
    pub const D: Self = Self(7);
    pub const E: Self = Self(8);
    pub const NUM_1: Self = Self(30);
    pub const NUM_2: Self = Self(31);
    pub const NUM_3: Self = Self(32);
    pub const NUM_4: Self = Self(33);
    pub const NUM_5: Self = Self(34);
    pub const NUM_6: Self = Self(35);
    pub const NUM_7: Self = Self(36);
    pub const NUM_8: Self = Self(37);
    pub const NUM_9: Self = Self(38);
    pub const ESCAPE: Self = Self(41);
    pub const SPACE: Self = Self(44);
    pub const F3: Self = Self(60);
    pub const RIGHT: Self = Self(79);
    pub const LEFT: Self = Self(80);
    pub const DOWN: Self = Self(81);
    pub const UP: Self = Self(82);

    /// Hotbar number keys, slot 0 first
    pub const HOTBAR: [Self; 9] = [
        Self::NUM_1,
        Self::NUM_2,
        Self::NUM_3,
        Self::NUM_4,
        Self::NUM_5,
        Self::NUM_6,
        Self::NUM_7,
        Self::NUM_8,
        Self::NUM_9,
    ];
}

/// Mouse buttons the engine distinguishes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MouseButton {
    Left,
    Middle,
    Right,
}

impl MouseButton {
    const fn index(self) -> usize {
        match self {
            Self::Left => 0,
            Self::Middle => 1,
            Self::Right => 2,
        }
    }
}

/// Input state read by the systems
///
/// Keys live in a dense array indexed by scancode. Out-of-range scancodes
/// read as released and are ignored on write.
#[derive(Debug, Clone)]
pub struct Input {
    keystate: Box<[bool; KEY_COUNT]>,
    buttons: [bool; 3],
    /// Window coordinates, origin top-left
    mouse_position: Vec2,
    viewport: UVec2,
}

impl Input {
    /// Create input state for an 800x600 viewport
    #[must_use]
    pub fn new() -> Self {
        Self::with_viewport(UVec2::new(800, 600))
    }

    /// Create input state for a viewport of the given size
    #[must_use]
    pub fn with_viewport(viewport: UVec2) -> Self {
        Self {
            keystate: Box::new([false; KEY_COUNT]),
            buttons: [false; 3],
            mouse_position: Vec2::ZERO,
            viewport,
        }
    }

    /// Check if a key is currently pressed
    #[must_use]
    pub fn key(&self, key: Scancode) -> bool {
        self.keystate.get(key.0 as usize).copied().unwrap_or(false)
    }

    /// Record a key press or release
    pub fn set_key(&mut self, key: Scancode, pressed: bool) {
        if let Some(state) = self.keystate.get_mut(key.0 as usize) {
            *state = pressed;
        } else {
            log::warn!("Ignoring out-of-range scancode {}", key.0);
        }
    }

    /// The raw keystate array
    #[must_use]
    pub fn keystate(&self) -> &[bool] {
        &self.keystate[..]
    }

    /// Check if a mouse button is currently pressed
    #[must_use]
    pub fn button(&self, button: MouseButton) -> bool {
        self.buttons[button.index()]
    }

    /// Record a mouse button press or release
    pub fn set_button(&mut self, button: MouseButton, pressed: bool) {
        self.buttons[button.index()] = pressed;
    }

    /// Get current mouse position
    #[must_use]
    pub fn mouse_position(&self) -> Vec2 {
        self.mouse_position
    }

    /// Move the mouse cursor
    pub fn set_mouse_position(&mut self, position: Vec2) {
        self.mouse_position = position;
    }

    /// Viewport size in pixels
    #[must_use]
    pub fn viewport(&self) -> UVec2 {
        self.viewport
    }

    /// Resize the viewport
    pub fn set_viewport(&mut self, viewport: UVec2) {
        self.viewport = viewport;
    }

    /// Mouse position in world space for a camera centred on `camera`.
    ///
    /// Window y grows downwards, world y upwards.
    #[must_use]
    pub fn mouse_world(&self, camera: Vec2) -> Vec2 {
        let viewport = self.viewport.as_vec2();
        let screen = Vec2::new(self.mouse_position.x, viewport.y - self.mouse_position.y);
        screen + camera - viewport * 0.5
    }
}

impl Default for Input {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keystate() {
        let mut input = Input::new();
        assert!(!input.key(Scancode::SPACE));

        input.set_key(Scancode::SPACE, true);
        assert!(input.key(Scancode::SPACE));
        assert!(input.keystate()[44]);

        input.set_key(Scancode::SPACE, false);
        assert!(!input.key(Scancode::SPACE));
    }

    #[test]
    fn test_out_of_range_scancode_reads_released() {
        let mut input = Input::new();
        input.set_key(Scancode(10_000), true);
        assert!(!input.key(Scancode(10_000)));
    }

    #[test]
    fn test_mouse_world_flips_y() {
        let mut input = Input::with_viewport(UVec2::new(800, 600));

        // Window centre maps onto the camera
        input.set_mouse_position(Vec2::new(400.0, 300.0));
        assert_eq!(input.mouse_world(Vec2::new(64.0, 32.0)), Vec2::new(64.0, 32.0));

        // Top-left corner of the window
        input.set_mouse_position(Vec2::ZERO);
        assert_eq!(input.mouse_world(Vec2::ZERO), Vec2::new(-400.0, 300.0));
    }
}
