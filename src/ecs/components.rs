//! Common ECS components
//!
//! Plain data records. Behavior lives in the systems that read them.

use glam::{IVec2, Vec2};
use serde::{Deserialize, Serialize};

use crate::assets::{AssetHandle, Texture};
use crate::physics::Aabb;
use crate::world::Item;

/// World-space position in pixels, y pointing up
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position(pub Vec2);

/// Velocity in pixels per second
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Velocity(pub Vec2);

/// Axis-aligned collision box relative to the owner's position
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Collision {
    /// Offset of the box's lower-left corner from the position
    pub offset: Vec2,
    /// Box extent
    pub size: Vec2,
    /// Stationary boxes are never moved by resolution
    pub stationary: bool,
}

impl Collision {
    /// Movable box with no offset
    #[must_use]
    pub fn new(size: Vec2) -> Self {
        Self {
            offset: Vec2::ZERO,
            size,
            stationary: false,
        }
    }

    /// Stationary box with no offset
    #[must_use]
    pub fn stationary(size: Vec2) -> Self {
        Self {
            offset: Vec2::ZERO,
            size,
            stationary: true,
        }
    }

    /// Set the box offset
    #[must_use]
    pub fn with_offset(mut self, offset: Vec2) -> Self {
        self.offset = offset;
        self
    }

    /// World-space box when the owner sits at `position`
    #[must_use]
    pub fn aabb(&self, position: Vec2) -> Aabb {
        Aabb::from_origin_size(position + self.offset, self.size)
    }
}

/// A placed block occupying one grid cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    /// Block type
    pub kind: Item,
    /// Grid coordinate; world position is `cell * block_size`
    pub cell: IVec2,
}

impl Block {
    /// World-space lower-left corner of the block
    #[must_use]
    pub fn origin(&self, block_size: f32) -> Vec2 {
        self.cell.as_vec2() * block_size
    }
}

/// A loose item lying in the world, waiting to be picked up
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemDrop {
    pub kind: Item,
}

/// Bit flags describing entity capabilities
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tags(pub u64);

impl Tags {
    /// Can jump when grounded
    pub const JUMP: Self = Self(1);
    /// Controlled by the player; input and camera follow it
    pub const PLAYER: Self = Self(1 << 1);
    /// Marks the block-targeting cursor
    pub const CROSSHAIR: Self = Self(1 << 2);

    /// Whether every flag in `other` is set
    #[must_use]
    pub const fn has(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}

impl std::ops::BitOr for Tags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

/// Something the render system draws
#[derive(Debug, Clone)]
pub struct Sprite {
    pub texture: AssetHandle<Texture>,
    /// Draw size in pixels
    pub size: Vec2,
}

impl Sprite {
    /// Sprite drawn at `size`
    #[must_use]
    pub fn new(texture: AssetHandle<Texture>, size: Vec2) -> Self {
        Self { texture, size }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tags_combine() {
        let tags = Tags::JUMP | Tags::PLAYER;

        assert!(tags.has(Tags::JUMP));
        assert!(tags.has(Tags::PLAYER));
        assert!(!tags.has(Tags::CROSSHAIR));
        assert!(!Tags::default().has(Tags::JUMP));
    }

    #[test]
    fn test_collision_box_follows_position() {
        let collision = Collision::new(Vec2::new(20.0, 40.0)).with_offset(Vec2::new(6.0, 0.0));
        let aabb = collision.aabb(Vec2::new(100.0, 50.0));

        assert_eq!(aabb.min, Vec2::new(106.0, 50.0));
        assert_eq!(aabb.max, Vec2::new(126.0, 90.0));
    }

    #[test]
    fn test_block_origin() {
        let block = Block {
            kind: Item::Stone,
            cell: IVec2::new(-1, 2),
        };
        assert_eq!(block.origin(32.0), Vec2::new(-32.0, 64.0));
    }
}
