//! Axis-aligned bounding boxes for the broad phase.

use glam::DVec2;

/// Tight AABB around a body's current vertices.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: DVec2,
    pub max: DVec2,
}

impl Bounds {
    /// Smallest AABB containing every vertex. Panics on an empty list.
    pub fn from_vertices(vertices: &[DVec2]) -> Self {
        let mut min = vertices[0];
        let mut max = vertices[0];
        for &v in &vertices[1..] {
            min = min.min(v);
            max = max.max(v);
        }
        Self { min, max }
    }

    /// Refit this AABB to the given vertices.
    #[inline]
    pub fn recompute(&mut self, vertices: &[DVec2]) {
        *self = Self::from_vertices(vertices);
    }

    /// Shift both corners by `delta`.
    #[inline]
    pub fn translate(&mut self, delta: DVec2) {
        self.min += delta;
        self.max += delta;
    }

    /// Test whether two AABBs overlap. Touching edges count as overlap.
    #[inline]
    pub fn overlaps(&self, other: &Bounds) -> bool {
        !(self.max.x < other.min.x
            || self.min.x > other.max.x
            || self.max.y < other.min.y
            || self.min.y > other.max.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_vertices_is_tight() {
        let bounds = Bounds::from_vertices(&[
            DVec2::new(1.0, 5.0),
            DVec2::new(-2.0, 3.0),
            DVec2::new(4.0, -1.0),
        ]);
        assert_eq!(bounds.min, DVec2::new(-2.0, -1.0));
        assert_eq!(bounds.max, DVec2::new(4.0, 5.0));
    }

    #[test]
    fn test_translate() {
        let mut bounds = Bounds {
            min: DVec2::ZERO,
            max: DVec2::new(1.0, 1.0),
        };
        bounds.translate(DVec2::new(3.0, -2.0));
        assert_eq!(bounds.min, DVec2::new(3.0, -2.0));
        assert_eq!(bounds.max, DVec2::new(4.0, -1.0));
    }

    #[test]
    fn test_overlaps() {
        let a = Bounds {
            min: DVec2::ZERO,
            max: DVec2::new(2.0, 2.0),
        };
        let b = Bounds {
            min: DVec2::new(1.0, 1.0),
            max: DVec2::new(3.0, 3.0),
        };
        let c = Bounds {
            min: DVec2::new(5.0, 0.0),
            max: DVec2::new(6.0, 1.0),
        };
        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
        assert!(!a.overlaps(&c));
    }

    #[test]
    fn test_touching_edges_overlap() {
        let a = Bounds {
            min: DVec2::ZERO,
            max: DVec2::new(1.0, 1.0),
        };
        let b = Bounds {
            min: DVec2::new(1.0, 0.0),
            max: DVec2::new(2.0, 1.0),
        };
        assert!(a.overlaps(&b));
    }
}
