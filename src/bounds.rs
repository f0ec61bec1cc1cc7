//! Axis-aligned bounding boxes.

use crate::float::Float;
use crate::vec::{Vec, Vec2};

/// An axis-aligned box given by its min and max corners.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Bounds<F: Float> {
    pub min: Vec2<F>,
    pub max: Vec2<F>,
}

impl<F: Float> Bounds<F> {
    pub fn new(min: Vec2<F>, max: Vec2<F>) -> Self {
        Bounds { min, max }
    }

    /// Tight box around `vertices`.
    pub fn from_vertices(vertices: &[Vec2<F>]) -> Self {
        let mut bounds = Bounds::new(Vec2::zero(), Vec2::zero());
        bounds.update(vertices, Vec2::zero());
        bounds
    }

    /// Refit to `vertices`, then stretch the box in the direction of
    /// `velocity` so fast bodies are still picked up by the broadphase.
    pub fn update(&mut self, vertices: &[Vec2<F>], velocity: Vec2<F>) {
        let inf = F::infinity();
        self.min = Vec2::new(inf, inf);
        self.max = Vec2::new(-inf, -inf);

        for v in vertices {
            if v.x > self.max.x { self.max.x = v.x; }
            if v.x < self.min.x { self.min.x = v.x; }
            if v.y > self.max.y { self.max.y = v.y; }
            if v.y < self.min.y { self.min.y = v.y; }
        }

        if velocity.x > F::zero() {
            self.max.x = self.max.x + velocity.x;
        } else {
            self.min.x = self.min.x + velocity.x;
        }

        if velocity.y > F::zero() {
            self.max.y = self.max.y + velocity.y;
        } else {
            self.min.y = self.min.y + velocity.y;
        }
    }

    /// True if the boxes touch or overlap.
    pub fn overlaps(&self, other: &Bounds<F>) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.max.y >= other.min.y
            && self.min.y <= other.max.y
    }

    pub fn contains(&self, point: Vec2<F>) -> bool {
        point.x >= self.min.x && point.x <= self.max.x
            && point.y >= self.min.y && point.y <= self.max.y
    }

    pub fn translate(&mut self, delta: Vec2<F>) {
        self.min = self.min + delta;
        self.max = self.max + delta;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> [Vec2<f64>; 4] {
        [
            Vec2::new(0.0, 0.0),
            Vec2::new(2.0, 0.0),
            Vec2::new(2.0, 2.0),
            Vec2::new(0.0, 2.0),
        ]
    }

    #[test]
    fn fits_vertices() {
        let b = Bounds::from_vertices(&square());
        assert_eq!(b.min, Vec2::new(0.0, 0.0));
        assert_eq!(b.max, Vec2::new(2.0, 2.0));
    }

    #[test]
    fn velocity_stretches_leading_side() {
        let mut b = Bounds::from_vertices(&square());
        b.update(&square(), Vec2::new(1.0, -3.0));
        assert_eq!(b.max.x, 3.0);
        assert_eq!(b.min.x, 0.0);
        assert_eq!(b.min.y, -3.0);
        assert_eq!(b.max.y, 2.0);
    }

    #[test]
    fn overlap_is_symmetric() {
        let a = Bounds::from_vertices(&square());
        let mut b = a;
        b.translate(Vec2::new(1.5, 1.5));
        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
        b.translate(Vec2::new(5.0, 0.0));
        assert!(!a.overlaps(&b));
    }
}
