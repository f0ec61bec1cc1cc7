//! Narrow phase: separating axis test between two convex parts.

use crate::body::{BodyId, Part, RigidBody};
use crate::float::Float;
use crate::pair::PairId;
use crate::pairs::Pairs;
use crate::vec::{Vec, Vec2};
use crate::vertices;
use hashbrown::HashMap;
use smallvec::SmallVec;

/// Where a part lives: its own id, its parent's id, and the indices needed
/// to reach it in the body list.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct PartRef {
    pub id: BodyId,
    pub parent: BodyId,
    pub body: usize,
    pub part: usize,
}

impl PartRef {
    pub fn new<F: Float>(bodies: &[RigidBody<F>], body: usize, part: usize) -> Self {
        PartRef {
            id: bodies[body].parts[part].id,
            parent: bodies[body].id,
            body,
            part,
        }
    }

    #[inline]
    pub fn get<'a, F: Float>(&self, bodies: &'a [RigidBody<F>]) -> &'a Part<F> {
        &bodies[self.body].parts[self.part]
    }

    #[inline]
    pub fn parent<'a, F: Float>(&self, bodies: &'a [RigidBody<F>]) -> &'a RigidBody<F> {
        &bodies[self.body]
    }

    /// Point at the parent's new index. False if the parent is gone.
    pub(crate) fn remap(&mut self, index: &HashMap<BodyId, usize>) -> bool {
        match index.get(&self.parent) {
            Some(&body) => {
                self.body = body;
                true
            }
            None => false,
        }
    }
}

/// A vertex of a part, looked up live so it follows the part through
/// position and constraint corrections.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct VertexRef {
    pub part: PartRef,
    pub index: usize,
}

impl VertexRef {
    #[inline]
    pub fn point<F: Float>(&self, bodies: &[RigidBody<F>]) -> Vec2<F> {
        self.part.get(bodies).vertices[self.index]
    }
}

/// Contact manifold between two parts.
#[derive(Clone, Debug)]
pub struct Collision<F: Float> {
    /// Set when a pair already tracked these parts at detection time.
    pub pair: Option<PairId>,
    /// The part with the lower id.
    pub part_a: PartRef,
    pub part_b: PartRef,
    pub depth: F,
    /// Unit normal pointing from A towards B.
    pub normal: Vec2<F>,
    pub tangent: Vec2<F>,
    pub penetration: Vec2<F>,
    /// One or two support vertices.
    pub supports: SmallVec<[VertexRef; 2]>,
}

impl<F: Float> Collision<F> {
    pub fn id(&self) -> PairId {
        PairId::new(self.part_a.id, self.part_b.id)
    }
}

/// Result of projecting two polygons onto a set of axes.
#[derive(Copy, Clone, Debug)]
pub struct Overlap<F: Float> {
    pub overlap: F,
    pub axis: Vec2<F>,
}

/// Smallest overlap of `a` and `b` projected on `axes`. Stops at the first
/// separating axis, in which case the overlap is not positive.
pub fn overlap_axes<F: Float>(a: &[Vec2<F>], b: &[Vec2<F>], axes: &[Vec2<F>]) -> Overlap<F> {
    let mut result = Overlap {
        overlap: F::max_value(),
        axis: Vec2::zero(),
    };

    for &axis in axes {
        let (min_a, max_a) = project(a, axis);
        let (min_b, max_b) = project(b, axis);

        let overlap = (max_a - min_b).min(max_b - min_a);
        if overlap < result.overlap {
            result.overlap = overlap;
            result.axis = axis;
        }
        if overlap <= F::zero() {
            break;
        }
    }

    result
}

fn project<F: Float>(vertices: &[Vec2<F>], axis: Vec2<F>) -> (F, F) {
    let first = axis.dot(vertices[0]);
    vertices[1..].iter().fold((first, first), |(min, max), v| {
        let d = axis.dot(*v);
        (min.min(d), max.max(d))
    })
}

/// Test two parts for collision.
///
/// `a` and `b` may come in either order; the result is canonical with the
/// lower part id as A. When `pairs` already tracks the two parts the
/// collision carries that pair's id.
pub fn collides<F: Float>(
    bodies: &[RigidBody<F>],
    a: PartRef,
    b: PartRef,
    pairs: Option<&Pairs<F>>,
) -> Option<Collision<F>> {
    let (a, b) = if a.id < b.id { (a, b) } else { (b, a) };
    let part_a = a.get(bodies);
    let part_b = b.get(bodies);
    if part_a.vertices.is_empty() || part_b.vertices.is_empty() {
        return None;
    }

    let overlap_ab = overlap_axes(&part_a.vertices, &part_b.vertices, &part_a.axes);
    if overlap_ab.overlap <= F::zero() {
        return None;
    }
    let overlap_ba = overlap_axes(&part_b.vertices, &part_a.vertices, &part_b.axes);
    if overlap_ba.overlap <= F::zero() {
        return None;
    }

    let min = if overlap_ab.overlap < overlap_ba.overlap {
        overlap_ab
    } else {
        overlap_ba
    };

    let normal = if min.axis.dot(part_b.position - part_a.position) >= F::zero() {
        min.axis
    } else {
        -min.axis
    };

    let id = PairId::new(a.id, b.id);
    let pair = pairs.and_then(|p| p.get(&id)).map(|p| p.id);

    Some(Collision {
        pair,
        part_a: a,
        part_b: b,
        depth: min.overlap,
        normal,
        tangent: normal.perp(),
        penetration: normal.scale(min.overlap),
        supports: supports(part_a, part_b, a, b, normal),
    })
}

fn supports<F: Float>(
    part_a: &Part<F>,
    part_b: &Part<F>,
    a: PartRef,
    b: PartRef,
    normal: Vec2<F>,
) -> SmallVec<[VertexRef; 2]> {
    let mut supports: SmallVec<[VertexRef; 2]> = SmallVec::new();

    // vertices of B that sit inside A
    let candidates_b = find_supports(part_a, part_b, normal, -F::one());
    for &index in &candidates_b {
        if vertices::contains(&part_a.vertices, part_b.vertices[index]) {
            supports.push(VertexRef { part: b, index });
        }
    }

    if supports.len() < 2 {
        let candidates_a = find_supports(part_b, part_a, normal, F::one());
        for &index in &candidates_a {
            if supports.len() == 2 {
                break;
            }
            if vertices::contains(&part_b.vertices, part_a.vertices[index]) {
                supports.push(VertexRef { part: a, index });
            }
        }
    }

    if supports.is_empty() {
        supports.push(VertexRef { part: b, index: candidates_b[0] });
    }

    supports
}

/// The vertex of `incident` deepest along `normal × direction` relative to
/// `reference`, and whichever neighbour of it is deeper. Returns indices
/// into `incident.vertices`.
pub fn find_supports<F: Float>(
    reference: &Part<F>,
    incident: &Part<F>,
    normal: Vec2<F>,
    direction: F,
) -> [usize; 2] {
    let verts = &incident.vertices;
    let n = verts.len();
    let axis = normal.scale(direction);
    let origin = reference.position;
    let distance = |v: Vec2<F>| axis.dot(origin - v);

    let mut deepest = 0;
    let mut nearest = F::max_value();
    for (i, &v) in verts.iter().enumerate() {
        let d = distance(v);
        if d < nearest {
            nearest = d;
            deepest = i;
        }
    }

    let prev = (deepest + n - 1) % n;
    let next = (deepest + 1) % n;
    if distance(verts[next]) < distance(verts[prev]) {
        [deepest, next]
    } else {
        [deepest, prev]
    }
}
