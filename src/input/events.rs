//! Translation of window events into input state and scene signals
//!
//! The platform layer hands over [`InputEvent`]s; [`EventManager`] records
//! them in [`Input`] and raises the matching one-shot signals on the scene.

use glam::{UVec2, Vec2};
use serde::{Deserialize, Serialize};

use super::state::{Input, MouseButton, Scancode};
use crate::ecs::Scene;
use crate::ecs::signal::{self, DOUBLE_CLICK, LEFT_CLICK_DOWN, LEFT_HOLD, RIGHT_CLICK_DOWN, RIGHT_HOLD};

/// Two left clicks closer than this form a double click
pub const DOUBLE_CLICK_MS: u64 = 300;

/// A button held longer than this raises its hold signal
pub const HOLD_MS: u64 = 200;

/// A discrete event delivered by the platform layer
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum InputEvent {
    KeyDown(Scancode),
    KeyUp(Scancode),
    MouseDown { button: MouseButton, time_ms: u64 },
    MouseUp { button: MouseButton, time_ms: u64 },
    /// Cursor position in window coordinates
    MouseMotion(Vec2),
    Resized(UVec2),
    Quit,
}

/// What the loop should do after an event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventResponse {
    Continue,
    Quit,
}

/// Turns raw events into keystate and signals
#[derive(Debug, Default)]
pub struct EventManager {
    /// Press time of each held button
    pressed_at: [Option<u64>; 2],
    last_left_click: Option<u64>,
    paused: bool,
}

impl EventManager {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether F3 has paused the simulation
    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Apply one event to `input` and `scene`
    pub fn process(&mut self, input: &mut Input, scene: &mut Scene, event: InputEvent) -> EventResponse {
        match event {
            InputEvent::Quit => {
                log::info!("Received quit event");
                return EventResponse::Quit;
            }
            InputEvent::KeyDown(key) => {
                if key == Scancode::F3 && !input.key(key) {
                    self.paused = !self.paused;
                    log::info!("Simulation {}", if self.paused { "paused" } else { "resumed" });
                }
                input.set_key(key, true);
                scene.set_signal(signal::key(key.0), 1);
                log::trace!("Key {} pressed", key.0);
            }
            InputEvent::KeyUp(key) => {
                input.set_key(key, false);
            }
            InputEvent::MouseDown { button, time_ms } => {
                input.set_button(button, true);
                self.press(scene, button, time_ms);
            }
            InputEvent::MouseUp { button, .. } => {
                input.set_button(button, false);
                if let Some(slot) = Self::slot(button) {
                    self.pressed_at[slot] = None;
                }
            }
            InputEvent::MouseMotion(position) => input.set_mouse_position(position),
            InputEvent::Resized(size) => {
                log::debug!("Viewport resized to {}x{}", size.x, size.y);
                input.set_viewport(size);
            }
        }

        EventResponse::Continue
    }

    fn press(&mut self, scene: &mut Scene, button: MouseButton, time_ms: u64) {
        let Some(slot) = Self::slot(button) else {
            return;
        };
        self.pressed_at[slot] = Some(time_ms);

        // Timestamps are stored shifted by one so a press at t = 0 still reads as set
        let value = time_ms.saturating_add(1) as i64;
        match button {
            MouseButton::Left => {
                scene.set_signal(LEFT_CLICK_DOWN, value);
                if let Some(last) = self.last_left_click
                    && time_ms.saturating_sub(last) < DOUBLE_CLICK_MS
                {
                    scene.set_signal(DOUBLE_CLICK, value);
                    self.last_left_click = None;
                } else {
                    self.last_left_click = Some(time_ms);
                }
            }
            MouseButton::Right => scene.set_signal(RIGHT_CLICK_DOWN, value),
            MouseButton::Middle => {}
        }
    }

    /// Raise hold signals for buttons held longer than [`HOLD_MS`] at `now_ms`.
    pub fn update(&self, scene: &mut Scene, now_ms: u64) {
        for (slot, signal) in [(0, LEFT_HOLD), (1, RIGHT_HOLD)] {
            if let Some(pressed) = self.pressed_at[slot]
                && now_ms.saturating_sub(pressed) > HOLD_MS
            {
                scene.set_signal(signal, 1);
            }
        }
    }

    const fn slot(button: MouseButton) -> Option<usize> {
        match button {
            MouseButton::Left => Some(0),
            MouseButton::Right => Some(1),
            MouseButton::Middle => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn click(button: MouseButton, time_ms: u64) -> InputEvent {
        InputEvent::MouseDown { button, time_ms }
    }

    #[test]
    fn test_key_events_update_keystate_and_signal() {
        let mut events = EventManager::new();
        let mut input = Input::new();
        let mut scene = Scene::new();

        events.process(&mut input, &mut scene, InputEvent::KeyDown(Scancode::NUM_3));
        assert!(input.key(Scancode::NUM_3));
        assert!(scene.is_signaled(signal::key(Scancode::NUM_3.0)));

        events.process(&mut input, &mut scene, InputEvent::KeyUp(Scancode::NUM_3));
        assert!(!input.key(Scancode::NUM_3));
    }

    #[test]
    fn test_click_signals_carry_timestamp() {
        let mut events = EventManager::new();
        let mut input = Input::new();
        let mut scene = Scene::new();

        events.process(&mut input, &mut scene, click(MouseButton::Right, 0));
        assert!(scene.is_signaled(RIGHT_CLICK_DOWN));
        assert!(input.button(MouseButton::Right));

        events.process(&mut input, &mut scene, click(MouseButton::Left, 1500));
        assert_eq!(scene.signal(LEFT_CLICK_DOWN), 1501);
    }

    #[test]
    fn test_double_click_window() {
        let mut events = EventManager::new();
        let mut input = Input::new();
        let mut scene = Scene::new();

        events.process(&mut input, &mut scene, click(MouseButton::Left, 1000));
        events.process(&mut input, &mut scene, click(MouseButton::Left, 1250));
        assert!(scene.is_signaled(DOUBLE_CLICK));

        scene.clear_signals();
        events.process(&mut input, &mut scene, click(MouseButton::Left, 2000));
        events.process(&mut input, &mut scene, click(MouseButton::Left, 2400));
        assert!(!scene.is_signaled(DOUBLE_CLICK));
    }

    #[test]
    fn test_hold_after_threshold() {
        let mut events = EventManager::new();
        let mut input = Input::new();
        let mut scene = Scene::new();

        events.process(&mut input, &mut scene, click(MouseButton::Left, 100));
        events.update(&mut scene, 250);
        assert!(!scene.is_signaled(LEFT_HOLD));

        events.update(&mut scene, 301);
        assert!(scene.is_signaled(LEFT_HOLD));

        scene.clear_signals();
        let release = InputEvent::MouseUp {
            button: MouseButton::Left,
            time_ms: 400,
        };
        events.process(&mut input, &mut scene, release);
        events.update(&mut scene, 1000);
        assert!(!scene.is_signaled(LEFT_HOLD));
        assert!(!input.button(MouseButton::Left));
    }

    #[test]
    fn test_quit_and_pause() {
        let mut events = EventManager::new();
        let mut input = Input::new();
        let mut scene = Scene::new();

        events.process(&mut input, &mut scene, InputEvent::KeyDown(Scancode::F3));
        assert!(events.is_paused());
        events.process(&mut input, &mut scene, InputEvent::KeyUp(Scancode::F3));
        events.process(&mut input, &mut scene, InputEvent::KeyDown(Scancode::F3));
        assert!(!events.is_paused());

        let response = events.process(&mut input, &mut scene, InputEvent::Quit);
        assert_eq!(response, EventResponse::Quit);
    }
}
