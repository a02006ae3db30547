//! Scene to draw command translation

use glam::{UVec2, Vec2};

use super::{DrawCommand, Layer, Renderer};
use crate::assets::{AssetError, AssetHandle, Assets, Shader};
use crate::ecs::{Block, Position, Scene, Sprite};
use crate::input::Destruction;
use crate::world::WorldError;

/// Overlay textures for the ten destruction stages
pub const DESTROY_STAGE_TEXTURES: [&str; 10] = [
    "blocks/destroy_stage_0.png",
    "blocks/destroy_stage_1.png",
    "blocks/destroy_stage_2.png",
    "blocks/destroy_stage_3.png",
    "blocks/destroy_stage_4.png",
    "blocks/destroy_stage_5.png",
    "blocks/destroy_stage_6.png",
    "blocks/destroy_stage_7.png",
    "blocks/destroy_stage_8.png",
    "blocks/destroy_stage_9.png",
];

/// Counters for the last drawn frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderStats {
    pub drawn: usize,
    pub culled: usize,
}

/// Draws blocks, sprites and the destruction overlay
#[derive(Debug)]
pub struct RenderSystem {
    block_shader: AssetHandle<Shader>,
    sprite_shader: AssetHandle<Shader>,
    block_size: f32,
    stats: RenderStats,
}

impl RenderSystem {
    /// Load the shaders the system draws with.
    ///
    /// # Errors
    ///
    /// Fails if either shader program cannot be built.
    pub fn new(assets: &mut Assets, block_size: f32) -> Result<Self, AssetError> {
        Ok(Self {
            block_shader: assets.shader("block.vert", "block.frag", None)?,
            sprite_shader: assets.shader("sprite.vert", "sprite.frag", None)?,
            block_size,
            stats: RenderStats::default(),
        })
    }

    /// Counters for the last frame
    #[must_use]
    pub fn stats(&self) -> RenderStats {
        self.stats
    }

    /// Draw one frame centred on `camera` and present it.
    ///
    /// Blocks come first, then the destruction overlay, then free sprites.
    /// Quads entirely outside the viewport are skipped.
    ///
    /// # Errors
    ///
    /// Fails if an overlay texture cannot be loaded.
    pub fn draw(
        &mut self,
        scene: &mut Scene,
        assets: &mut Assets,
        renderer: &mut dyn Renderer,
        camera: Vec2,
        viewport: UVec2,
        destruction: Option<Destruction>,
    ) -> Result<RenderStats, WorldError> {
        self.stats = RenderStats::default();
        let screen = viewport.as_vec2();
        let offset = screen * 0.5 - camera;

        let shader = self.block_shader.clone();
        let blocks = scene.view::<(Block, Sprite)>();
        blocks.each(scene, |_, (block, sprite)| {
            let position = block.origin(self.block_size) + offset;
            self.submit(renderer, Layer::Blocks, &shader, sprite, position, screen);
        });

        if let Some(Destruction { cell, stage }) = destruction {
            let name = DESTROY_STAGE_TEXTURES[usize::from(stage).min(DESTROY_STAGE_TEXTURES.len() - 1)];
            let texture = assets.texture(name)?;
            renderer.draw(DrawCommand {
                layer: Layer::Overlay,
                shader: self.block_shader.clone(),
                texture,
                position: cell.as_vec2() * self.block_size + offset,
                size: Vec2::splat(self.block_size),
            });
            self.stats.drawn += 1;
        }

        let shader = self.sprite_shader.clone();
        let sprites = scene.view::<(Position, Sprite)>();
        sprites.each(scene, |_, (position, sprite)| {
            self.submit(renderer, Layer::Sprites, &shader, sprite, position.0 + offset, screen);
        });

        renderer.present();
        log::trace!("Drew {} quads, culled {}", self.stats.drawn, self.stats.culled);
        Ok(self.stats)
    }

    fn submit(
        &mut self,
        renderer: &mut dyn Renderer,
        layer: Layer,
        shader: &AssetHandle<Shader>,
        sprite: &Sprite,
        position: Vec2,
        screen: Vec2,
    ) {
        let visible = position.x < screen.x
            && position.y < screen.y
            && position.x + sprite.size.x > 0.0
            && position.y + sprite.size.y > 0.0;

        if !visible {
            self.stats.culled += 1;
            return;
        }

        renderer.draw(DrawCommand {
            layer,
            shader: shader.clone(),
            texture: sprite.texture.clone(),
            position,
            size: sprite.size,
        });
        self.stats.drawn += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::HeadlessLoader;
    use crate::render::RecordingRenderer;
    use crate::world::{Item, Registry, World};
    use glam::IVec2;

    fn setup() -> (Scene, World, RenderSystem) {
        let mut world = World::new(Registry::standard(), Assets::new(HeadlessLoader::default()), 32.0);
        let system = RenderSystem::new(&mut world.assets, 32.0).unwrap();
        (Scene::new(), world, system)
    }

    #[test]
    fn test_blocks_then_sprites_in_camera_space() {
        let (mut scene, mut world, mut system) = setup();
        world.spawn_block(&mut scene, Item::Stone, IVec2::new(1, 0)).unwrap();
        world.spawn_item(&mut scene, Item::Apple, Vec2::new(10.0, 10.0)).unwrap();

        let mut renderer = RecordingRenderer::new();
        let stats = system
            .draw(&mut scene, &mut world.assets, &mut renderer, Vec2::ZERO, UVec2::new(800, 600), None)
            .unwrap();

        assert_eq!(stats.drawn, 2);
        let frame = renderer.frame();
        assert_eq!(frame[0].layer, Layer::Blocks);
        assert_eq!(frame[0].position, Vec2::new(432.0, 300.0));
        assert_eq!(frame[1].layer, Layer::Sprites);
        assert_eq!(frame[1].position, Vec2::new(410.0, 310.0));
        assert_eq!(renderer.frames(), 1);
    }

    #[test]
    fn test_offscreen_quads_are_culled() {
        let (mut scene, mut world, mut system) = setup();
        world.spawn_block(&mut scene, Item::Dirt, IVec2::new(100, 0)).unwrap();

        let mut renderer = RecordingRenderer::new();
        let stats = system
            .draw(&mut scene, &mut world.assets, &mut renderer, Vec2::ZERO, UVec2::new(800, 600), None)
            .unwrap();

        assert_eq!(stats, RenderStats { drawn: 0, culled: 1 });
        assert!(renderer.frame().is_empty());
    }

    #[test]
    fn test_destruction_overlay_uses_stage_texture() {
        let (mut scene, mut world, mut system) = setup();
        let overlay = Destruction {
            cell: IVec2::ZERO,
            stage: 4,
        };

        let mut renderer = RecordingRenderer::new();
        system
            .draw(&mut scene, &mut world.assets, &mut renderer, Vec2::ZERO, UVec2::new(800, 600), Some(overlay))
            .unwrap();

        let frame = renderer.frame();
        assert_eq!(frame.len(), 1);
        assert_eq!(frame[0].layer, Layer::Overlay);
        assert_eq!(frame[0].texture.name, "blocks/destroy_stage_4.png");
    }
}
