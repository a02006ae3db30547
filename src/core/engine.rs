//! Core Engine struct and main game loop

use std::time::Duration;

use glam::UVec2;

use super::config::{ConfigError, EngineConfig};
use super::debug::{FrameCounters, FrameStats};
use super::snapshot::{SnapshotError, WorldSnapshot};
use super::time::{Time, clamp_delta};
use crate::assets::{AssetError, AssetLoader, Assets};
use crate::ecs::{EcsError, EntityId, Position, Scene};
use crate::input::{EventManager, EventResponse, Input, InputEvent, InputSystem};
use crate::physics::PhysicsSystem;
use crate::render::{RenderSystem, Renderer};
use crate::world::{Level, Registry, World, WorldError};

/// Where the platform layer's events come from
pub trait EventSource {
    /// Append the events that arrived since the last call
    fn poll(&mut self, events: &mut Vec<InputEvent>);
}

/// Replays a fixed list of frames, then asks to quit
#[derive(Debug, Default)]
pub struct ScriptedEvents {
    frames: std::collections::VecDeque<Vec<InputEvent>>,
}

impl ScriptedEvents {
    /// One entry per frame
    #[must_use]
    pub fn new(frames: impl IntoIterator<Item = Vec<InputEvent>>) -> Self {
        Self {
            frames: frames.into_iter().collect(),
        }
    }
}

impl EventSource for ScriptedEvents {
    fn poll(&mut self, events: &mut Vec<InputEvent>) {
        match self.frames.pop_front() {
            Some(frame) => events.extend(frame),
            None => events.push(InputEvent::Quit),
        }
    }
}

/// The engine: one scene plus the systems that run over it every frame
pub struct Engine {
    config: EngineConfig,
    pub scene: Scene,
    pub world: World,
    player: EntityId,
    input: Input,
    events: EventManager,
    input_system: InputSystem,
    physics: PhysicsSystem,
    render: RenderSystem,
    stats: FrameStats,
    /// Milliseconds of simulated time; button timestamps use this clock
    clock_ms: u64,
    should_quit: bool,
}

impl Engine {
    /// Create an engine with freshly generated terrain.
    ///
    /// # Errors
    ///
    /// Fails if the config is unusable or the level or the render shaders
    /// cannot be loaded.
    pub fn new(config: EngineConfig, loader: impl AssetLoader + 'static) -> Result<Self, EngineError> {
        config.validate()?;
        let mut world = World::new(Registry::standard(), Assets::new(loader), config.block_size);
        let mut scene = Scene::new();
        let player = Level::new(config.seed).generate(&mut scene, &mut world)?;
        Self::assemble(config, world, scene, player)
    }

    /// Create an engine from a saved snapshot.
    ///
    /// # Errors
    ///
    /// Fails if the config is unusable, the snapshot cannot be restored or
    /// the shaders cannot be loaded.
    pub fn from_snapshot(
        config: EngineConfig,
        loader: impl AssetLoader + 'static,
        snapshot: &WorldSnapshot,
    ) -> Result<Self, EngineError> {
        config.validate()?;
        let mut world = World::new(Registry::standard(), Assets::new(loader), config.block_size);
        let (scene, player) = snapshot.restore(&mut world)?;
        let config = config.with_seed(snapshot.seed);
        Self::assemble(config, world, scene, player)
    }

    fn assemble(config: EngineConfig, mut world: World, scene: Scene, player: EntityId) -> Result<Self, EngineError> {
        let render = RenderSystem::new(&mut world.assets, config.block_size)?;

        log::info!(
            "Starting engine \"{}\" at {}x{}, seed {}, {} entities",
            config.title,
            config.width,
            config.height,
            config.seed,
            scene.entity_count()
        );

        Ok(Self {
            input: Input::with_viewport(UVec2::new(config.width, config.height)),
            events: EventManager::new(),
            input_system: InputSystem::new(config.seed),
            physics: PhysicsSystem::new(config.physics(), config.block_size),
            render,
            stats: FrameStats::new(),
            clock_ms: 0,
            should_quit: false,
            config,
            scene,
            world,
            player,
        })
    }

    /// The configuration the engine runs with
    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The player entity
    #[must_use]
    pub fn player(&self) -> EntityId {
        self.player
    }

    /// Current input state
    #[must_use]
    pub fn input(&self) -> &Input {
        &self.input
    }

    /// Frame history and counters
    #[must_use]
    pub fn stats(&self) -> &FrameStats {
        &self.stats
    }

    /// Simulated milliseconds since start, the clock mouse events are stamped with
    #[must_use]
    pub fn clock_ms(&self) -> u64 {
        self.clock_ms
    }

    /// Whether a quit event has been received
    #[must_use]
    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Snapshot the current world
    ///
    /// # Errors
    ///
    /// Fails if the player has lost a required component.
    pub fn snapshot(&mut self) -> Result<WorldSnapshot, SnapshotError> {
        WorldSnapshot::capture(&mut self.scene, self.player, self.config.seed)
    }

    /// Run one frame of `delta` seconds.
    ///
    /// Order: events, hold detection, input system, physics integration,
    /// collision resolution, item pickup, rendering, then the signal map is
    /// cleared. A quit event stops the frame after event processing. While
    /// paused only rendering runs.
    ///
    /// # Errors
    ///
    /// Propagates the first system error; the frame is abandoned and signals
    /// are still cleared.
    pub fn frame(
        &mut self,
        delta: f32,
        events: impl IntoIterator<Item = InputEvent>,
        renderer: &mut dyn Renderer,
    ) -> Result<FrameCounters, EngineError> {
        let delta = clamp_delta(delta, self.config.max_delta);
        let result = self.step(delta, events, renderer);
        self.scene.clear_signals();

        let counters = result.inspect_err(|err| log::error!("Frame failed: {err}"))?;
        self.stats
            .record_frame(Duration::try_from_secs_f32(delta).unwrap_or_default(), counters);
        Ok(counters)
    }

    fn step(
        &mut self,
        delta: f32,
        events: impl IntoIterator<Item = InputEvent>,
        renderer: &mut dyn Renderer,
    ) -> Result<FrameCounters, EngineError> {
        let mut counters = FrameCounters::default();
        self.clock_ms += (delta * 1000.0) as u64;

        for event in events {
            if self.events.process(&mut self.input, &mut self.scene, event) == EventResponse::Quit {
                self.should_quit = true;
            }
        }
        if self.should_quit {
            return Ok(counters);
        }

        if !self.events.is_paused() {
            self.events.update(&mut self.scene, self.clock_ms);

            self.input_system
                .update(&mut self.scene, &mut self.world, &self.input, self.player, delta)?;
            let input = self.input_system.stats();
            counters.placed = input.placed;
            counters.broken = input.broken;

            self.physics.update(&mut self.scene, &self.input, delta)?;
            counters.resolved = self.physics.collide(&mut self.scene)?;
            counters.picked_up = self.physics.pick_up_items(&mut self.scene)?;
        }

        let camera = self.scene.get::<Position>(self.player)?.0;
        let render = self.render.draw(
            &mut self.scene,
            &mut self.world.assets,
            renderer,
            camera,
            self.input.viewport(),
            self.input_system.destruction(),
        )?;
        counters.drawn = render.drawn;

        counters.entities = self.scene.entity_count();
        counters.view_rebuilds = self.scene.view_rebuilds();
        Ok(counters)
    }

    /// Drive frames from `source` in real time until it asks to quit.
    /// Returns the number of frames run.
    ///
    /// # Errors
    ///
    /// Stops at the first failed frame.
    pub fn run(&mut self, source: &mut dyn EventSource, renderer: &mut dyn Renderer) -> Result<u64, EngineError> {
        let mut time = Time::new(self.config.max_delta);
        self.drive(source, renderer, || {
            time.update();
            time.delta()
        })
    }

    /// Like [`Self::run`], but every frame advances by exactly `delta`.
    ///
    /// # Errors
    ///
    /// Stops at the first failed frame.
    pub fn run_fixed(
        &mut self,
        source: &mut dyn EventSource,
        renderer: &mut dyn Renderer,
        delta: f32,
    ) -> Result<u64, EngineError> {
        self.drive(source, renderer, || delta)
    }

    fn drive(
        &mut self,
        source: &mut dyn EventSource,
        renderer: &mut dyn Renderer,
        mut next_delta: impl FnMut() -> f32,
    ) -> Result<u64, EngineError> {
        let mut events = Vec::new();
        let mut frames = 0;

        while !self.should_quit {
            let delta = next_delta();
            events.clear();
            source.poll(&mut events);

            self.frame(delta, events.drain(..), renderer)?;
            frames += 1;

            if frames % 600 == 0 {
                log::debug!("{}", self.stats.format_stats());
            }
        }

        log::info!("Engine stopped after {frames} frames");
        Ok(frames)
    }
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("config", &self.config)
            .field("player", &self.player)
            .field("entities", &self.scene.entity_count())
            .field("frames", &self.stats.total_frames())
            .finish_non_exhaustive()
    }
}

/// Errors that stop a frame or engine start-up
#[derive(Debug, Clone, PartialEq)]
pub enum EngineError {
    Config(ConfigError),
    Ecs(EcsError),
    World(WorldError),
    Asset(AssetError),
    Snapshot(SnapshotError),
}

impl std::fmt::Display for EngineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Config(e) => write!(f, "Config error: {e}"),
            Self::Ecs(e) => write!(f, "ECS error: {e}"),
            Self::World(e) => write!(f, "World error: {e}"),
            Self::Asset(e) => write!(f, "Asset error: {e}"),
            Self::Snapshot(e) => write!(f, "Snapshot error: {e}"),
        }
    }
}

impl std::error::Error for EngineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Config(e) => Some(e),
            Self::Ecs(e) => Some(e),
            Self::World(e) => Some(e),
            Self::Asset(e) => Some(e),
            Self::Snapshot(e) => Some(e),
        }
    }
}

impl From<ConfigError> for EngineError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

impl From<EcsError> for EngineError {
    fn from(e: EcsError) -> Self {
        Self::Ecs(e)
    }
}

impl From<WorldError> for EngineError {
    fn from(e: WorldError) -> Self {
        Self::World(e)
    }
}

impl From<AssetError> for EngineError {
    fn from(e: AssetError) -> Self {
        Self::Asset(e)
    }
}

impl From<SnapshotError> for EngineError {
    fn from(e: SnapshotError) -> Self {
        Self::Snapshot(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::HeadlessLoader;
    use crate::ecs::signal::RIGHT_CLICK_DOWN;
    use crate::ecs::{Block, Velocity};
    use crate::input::{MouseButton, Scancode};
    use crate::render::RecordingRenderer;
    use glam::Vec2;

    fn engine() -> Engine {
        Engine::new(EngineConfig::default().with_seed(3), HeadlessLoader::default()).unwrap()
    }

    /// Let the player fall onto the terrain
    fn settle(engine: &mut Engine, renderer: &mut RecordingRenderer) {
        for _ in 0..60 {
            engine.frame(0.016, [], renderer).unwrap();
        }
    }

    #[test]
    fn test_player_stands_on_terrain() {
        let mut engine = engine();
        let mut renderer = RecordingRenderer::new();
        settle(&mut engine, &mut renderer);

        let player = engine.player();
        let velocity = engine.scene.get::<Velocity>(player).unwrap().0;
        assert_eq!(velocity.y, 0.0);
        assert!(!renderer.frame().is_empty());
        assert_eq!(engine.stats().total_frames(), 60);
    }

    #[test]
    fn test_signals_cleared_every_frame() {
        let mut engine = engine();
        let mut renderer = RecordingRenderer::new();
        let click = InputEvent::MouseDown {
            button: MouseButton::Middle,
            time_ms: 0,
        };
        engine.frame(0.016, [InputEvent::KeyDown(Scancode::E), click], &mut renderer).unwrap();

        assert!(!engine.scene.is_signaled(crate::ecs::signal::key(Scancode::E.0)));
        assert!(engine.input().key(Scancode::E));
    }

    #[test]
    fn test_unusable_config_is_rejected_at_start() {
        let config = EngineConfig::default().with_max_delta(-0.01);
        let err = Engine::new(config, HeadlessLoader::default()).unwrap_err();
        assert!(matches!(err, EngineError::Config(ConfigError::Invalid { field: "max_delta", .. })));

        let config = EngineConfig::default().with_block_size(0.0);
        assert!(Engine::new(config, HeadlessLoader::default()).is_err());
    }

    #[test]
    fn test_stall_is_clamped() {
        let mut engine = engine();
        let mut renderer = RecordingRenderer::new();
        let player = engine.player();
        let before = engine.scene.get::<Position>(player).unwrap().0;

        engine.frame(5.0, [], &mut renderer).unwrap();

        // At most one 0.05 s step of free fall
        let after = engine.scene.get::<Position>(player).unwrap().0;
        assert!(before.y - after.y <= 1200.0 * 0.05 * 0.05 + 1e-3);
    }

    #[test]
    fn test_right_click_places_selected_block() {
        let mut engine = engine();
        let mut renderer = RecordingRenderer::new();
        settle(&mut engine, &mut renderer);

        let player = engine.player();
        engine
            .scene
            .get_mut::<crate::world::Inventory>(player)
            .unwrap()
            .try_pick(crate::world::Item::Cobblestone);

        // Nine blocks up, above any tree crown
        let target = Vec2::new(400.0, 4.0);
        let events = [
            InputEvent::MouseMotion(target),
            InputEvent::MouseDown {
                button: MouseButton::Right,
                time_ms: 10,
            },
        ];
        let counters = engine.frame(0.016, events, &mut renderer).unwrap();

        assert_eq!(counters.placed, 1);
        assert!(!engine.scene.is_signaled(RIGHT_CLICK_DOWN));
        let cobble = engine.scene.view::<(Block,)>();
        assert!(
            cobble
                .iter()
                .any(|block| engine.scene.get::<Block>(block).unwrap().kind == crate::world::Item::Cobblestone)
        );
    }

    #[test]
    fn test_quit_stops_run() {
        let mut engine = engine();
        let mut renderer = RecordingRenderer::new();
        let mut source = ScriptedEvents::new(vec![Vec::new(), Vec::new(), Vec::new()]);

        let frames = engine.run(&mut source, &mut renderer).unwrap();

        assert_eq!(frames, 4);
        assert!(engine.should_quit());
        assert_eq!(renderer.frames(), 3);
    }

    #[test]
    fn test_fixed_run_breaks_block_under_player() {
        let mut engine = engine();
        let mut renderer = RecordingRenderer::new();
        settle(&mut engine, &mut renderer);
        let blocks_before = engine.scene.view::<(Block,)>().len();

        // Aim just below the player's feet and hold for three seconds
        let hold = InputEvent::MouseDown {
            button: MouseButton::Left,
            time_ms: engine.clock_ms(),
        };
        let mut frames = vec![vec![InputEvent::MouseMotion(Vec2::new(400.0, 310.0)), hold]];
        frames.extend((0..60).map(|_| Vec::new()));
        let mut source = ScriptedEvents::new(frames);

        engine.run_fixed(&mut source, &mut renderer, 0.05).unwrap();

        assert!(engine.scene.view::<(Block,)>().len() < blocks_before);
        assert!(engine.stats().total_frames() > 60);
    }

    #[test]
    fn test_snapshot_round_trip_through_engine() {
        let mut engine = engine();
        let mut renderer = RecordingRenderer::new();
        settle(&mut engine, &mut renderer);

        let snapshot = engine.snapshot().unwrap();
        let mut restored =
            Engine::from_snapshot(EngineConfig::default(), HeadlessLoader::default(), &snapshot).unwrap();

        assert_eq!(restored.config().seed, 3);
        assert_eq!(restored.snapshot().unwrap(), snapshot);
    }
}
