//! Axis-aligned bounding boxes
//!
//! All tests are strict: boxes that only share an edge do not overlap.

use glam::Vec2;

/// Axis-aligned box from `min` (lower-left) to `max` (upper-right)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    /// Box from its corners
    #[must_use]
    pub const fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    /// Box from its lower-left corner and extent
    #[must_use]
    pub fn from_origin_size(origin: Vec2, size: Vec2) -> Self {
        Self {
            min: origin,
            max: origin + size,
        }
    }

    /// Extent of the box
    #[must_use]
    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }

    /// Center point
    #[must_use]
    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    /// Whether the interiors of the two boxes overlap
    #[must_use]
    pub fn intersects(&self, other: &Self) -> bool {
        !(self.max.x <= other.min.x
            || self.max.y <= other.min.y
            || other.max.x <= self.min.x
            || other.max.y <= self.min.y)
    }

    /// Whether `self` rests on top of `block`.
    ///
    /// Horizontally the boxes must overlap by more than `inset` on the near
    /// edge, so brushing a wall does not count as ground. Vertically the
    /// bottom of `self` must lie less than `tolerance` above the top of
    /// `block` while its top is still above the block's bottom.
    #[must_use]
    pub fn rests_on(&self, block: &Self, inset: f32, tolerance: f32) -> bool {
        let apart = self.max.x - inset <= block.min.x
            || block.max.x - inset <= self.min.x
            || self.max.y <= block.min.y;

        !apart && self.min.y - tolerance < block.max.y
    }

    /// Translation that pushes `self` out of `other` along the axis of least
    /// penetration.
    ///
    /// Only one component of the result is non-zero. On an exact tie the X
    /// axis is corrected. The boxes must overlap; this is checked in debug
    /// builds only.
    #[must_use]
    pub fn minimum_translation(&self, other: &Self) -> Vec2 {
        let distance = self.center() - other.center();
        let min_distance = (self.size() + other.size()) * 0.5;

        debug_assert!(
            distance.x.abs() <= min_distance.x && distance.y.abs() <= min_distance.y,
            "minimum_translation on separated boxes {self:?} and {other:?}"
        );

        let depth_x = if distance.x > 0.0 { min_distance.x } else { -min_distance.x } - distance.x;
        let depth_y = if distance.y > 0.0 { min_distance.y } else { -min_distance.y } - distance.y;

        if depth_x.abs() <= depth_y.abs() {
            Vec2::new(depth_x, 0.0)
        } else {
            Vec2::new(0.0, depth_y)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit(x: f32, y: f32) -> Aabb {
        Aabb::from_origin_size(Vec2::new(x, y), Vec2::ONE)
    }

    #[test]
    fn test_touching_edges_do_not_intersect() {
        let a = unit(0.0, 0.0);

        assert!(!a.intersects(&unit(1.0, 0.0)));
        assert!(!a.intersects(&unit(0.0, -1.0)));
        assert!(a.intersects(&unit(0.5, 0.5)));
        assert!(a.intersects(&a));
    }

    #[test]
    fn test_push_out_along_shallow_axis() {
        // Sunk 2 into the floor, overlapping 20 horizontally
        let body = Aabb::from_origin_size(Vec2::new(0.0, 30.0), Vec2::new(20.0, 40.0));
        let floor = Aabb::from_origin_size(Vec2::new(0.0, 0.0), Vec2::new(32.0, 32.0));

        let push = body.minimum_translation(&floor);
        assert_eq!(push, Vec2::new(0.0, 2.0));
    }

    #[test]
    fn test_push_out_sideways() {
        // Moved 3 into a wall on the right
        let body = Aabb::from_origin_size(Vec2::new(15.0, 0.0), Vec2::new(20.0, 40.0));
        let wall = Aabb::from_origin_size(Vec2::new(32.0, 0.0), Vec2::new(32.0, 32.0));

        let push = body.minimum_translation(&wall);
        assert_eq!(push, Vec2::new(-3.0, 0.0));
    }

    #[test]
    fn test_corner_tie_corrects_x() {
        let a = unit(0.0, 0.0);
        let b = unit(0.5, 0.5);

        let push = a.minimum_translation(&b);
        assert_eq!(push, Vec2::new(-0.5, 0.0));
    }

    #[test]
    fn test_pushed_box_no_longer_overlaps() {
        let body = Aabb::from_origin_size(Vec2::new(10.0, 25.0), Vec2::new(20.0, 40.0));
        let block = Aabb::from_origin_size(Vec2::ZERO, Vec2::splat(32.0));

        let push = body.minimum_translation(&block);
        let moved = Aabb::from_origin_size(body.min + push, body.size());
        assert!(!moved.intersects(&block));
    }

    #[test]
    fn test_rests_on() {
        let block = Aabb::from_origin_size(Vec2::new(0.0, -32.0), Vec2::splat(32.0));

        // Standing exactly on top
        let body = Aabb::from_origin_size(Vec2::ZERO, Vec2::new(20.0, 40.0));
        assert!(body.rests_on(&block, 6.0, 0.5));

        // Hovering one pixel above
        let hovering = Aabb::from_origin_size(Vec2::new(0.0, 1.0), Vec2::new(20.0, 40.0));
        assert!(!hovering.rests_on(&block, 6.0, 0.5));

        // Overlapping only by the inset at the edge
        let edge = Aabb::from_origin_size(Vec2::new(26.0, 0.0), Vec2::new(20.0, 40.0));
        assert!(!edge.rests_on(&block, 6.0, 0.5));
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "minimum_translation on separated boxes")]
    fn test_push_out_of_separated_boxes_panics() {
        let _ = unit(0.0, 0.0).minimum_translation(&unit(5.0, 5.0));
    }
}
