//! Collision filtering by category, mask and group.

/// Decides which bodies may collide.
///
/// Two bodies in the same non-zero `group` always collide when the group is
/// positive and never collide when it is negative, whatever their masks say.
/// Otherwise each body's `mask` must share a bit with the other's `category`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CollisionFilter {
    /// Bit(s) this body belongs to.
    pub category: u32,
    /// Categories this body accepts.
    pub mask: u32,
    /// Group override. Zero means no group.
    pub group: i32,
}

impl CollisionFilter {
    /// Category 1, collides with every category, no group.
    pub const DEFAULT: Self = Self {
        category: 1,
        mask: u32::MAX,
        group: 0,
    };

    /// Collides with nothing (unless a positive group says otherwise).
    pub const NONE: Self = Self {
        category: 0,
        mask: 0,
        group: 0,
    };

    #[inline]
    pub const fn new(category: u32, mask: u32) -> Self {
        Self { category, mask, group: 0 }
    }

    #[inline]
    pub const fn with_group(mut self, group: i32) -> Self {
        self.group = group;
        self
    }

    /// Check if two filters allow collision.
    #[inline]
    pub fn can_collide(a: &Self, b: &Self) -> bool {
        if a.group == b.group && a.group != 0 {
            return a.group > 0;
        }
        (a.mask & b.category) != 0 && (b.mask & a.category) != 0
    }
}

impl Default for CollisionFilter {
    #[inline]
    fn default() -> Self {
        Self::DEFAULT
    }
}
