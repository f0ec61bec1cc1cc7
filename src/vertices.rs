//! Polygon helpers over world-space vertex lists.
//!
//! Vertex lists are wound with positive signed area (counter-clockwise with
//! the y axis pointing up, clockwise on a y-down screen). `contains` and the
//! outward direction of `axes` both depend on that winding.

use crate::float::Float;
use crate::vec::{Vec, Vec2};
use alloc::vec::Vec as AllocVec;

/// Polygon area. With `signed`, the winding decides the sign.
pub fn area<F: Float>(vertices: &[Vec2<F>], signed: bool) -> F {
    let n = vertices.len();
    if n == 0 {
        return F::zero();
    }
    let mut sum = F::zero();
    let mut j = n - 1;
    for i in 0..n {
        sum = sum + (vertices[j].x - vertices[i].x) * (vertices[j].y + vertices[i].y);
        j = i;
    }
    let half = sum * F::half();
    if signed { half } else { half.abs() }
}

/// Area centroid.
pub fn centre<F: Float>(vertices: &[Vec2<F>]) -> Vec2<F> {
    let n = vertices.len();
    let signed_area = area(vertices, true);
    let mut centre = Vec2::zero();
    for i in 0..n {
        let j = (i + 1) % n;
        let cross = vertices[i].cross(vertices[j]);
        centre = centre + (vertices[i] + vertices[j]).scale(cross);
    }
    centre.scale(F::one() / (F::from_f64(6.0) * signed_area))
}

/// Second moment of area of a polygon of `mass`, about the origin.
/// Translate the vertices so their centroid sits at the origin first.
pub fn inertia<F: Float>(vertices: &[Vec2<F>], mass: F) -> F {
    let n = vertices.len();
    let mut numerator = F::zero();
    let mut denominator = F::zero();
    for i in 0..n {
        let j = (i + 1) % n;
        let (a, b) = (vertices[i], vertices[j]);
        let cross = b.cross(a).abs();
        numerator = numerator + cross * (b.dot(b) + b.dot(a) + a.dot(a));
        denominator = denominator + cross;
    }
    (mass / F::from_f64(6.0)) * (numerator / denominator)
}

/// Point-in-convex-polygon test. Points on an edge count as inside.
pub fn contains<F: Float>(vertices: &[Vec2<F>], point: Vec2<F>) -> bool {
    let n = vertices.len();
    if n == 0 {
        return false;
    }
    let mut vertex = vertices[n - 1];
    for &next in vertices {
        if (point.x - vertex.x) * (next.y - vertex.y) + (point.y - vertex.y) * (vertex.x - next.x) > F::zero() {
            return false;
        }
        vertex = next;
    }
    true
}

pub fn translate<F: Float>(vertices: &mut [Vec2<F>], delta: Vec2<F>) {
    for v in vertices.iter_mut() {
        *v = *v + delta;
    }
}

/// Rotate every vertex by `angle` about `point`.
pub fn rotate<F: Float>(vertices: &mut [Vec2<F>], angle: F, point: Vec2<F>) {
    if angle == F::zero() {
        return;
    }
    let (sin, cos) = (angle.sin(), angle.cos());
    for v in vertices.iter_mut() {
        let dx = v.x - point.x;
        let dy = v.y - point.y;
        v.x = point.x + (dx * cos - dy * sin);
        v.y = point.y + (dx * sin + dy * cos);
    }
}

/// Scale every vertex about `point`.
pub fn scale<F: Float>(vertices: &mut [Vec2<F>], scale_x: F, scale_y: F, point: Vec2<F>) {
    if scale_x == F::one() && scale_y == F::one() {
        return;
    }
    for v in vertices.iter_mut() {
        let delta = *v - point;
        v.x = point.x + delta.x * scale_x;
        v.y = point.y + delta.y * scale_y;
    }
}

/// Reverse the winding in place if the signed area is negative.
pub fn wind_positive<F: Float>(vertices: &mut [Vec2<F>]) {
    if area(vertices, true) < F::zero() {
        vertices.reverse();
    }
}

/// Outward unit edge normals, one per distinct edge direction.
///
/// Parallel edges (a box's opposite sides) give the same separating axis,
/// so only the first of each is kept.
pub fn axes<F: Float>(vertices: &[Vec2<F>]) -> AllocVec<Vec2<F>> {
    let n = vertices.len();
    let tolerance = F::from_f64(1e-6);
    let mut axes: AllocVec<Vec2<F>> = AllocVec::with_capacity(n);
    for i in 0..n {
        let j = (i + 1) % n;
        let normal = Vec2::new(
            vertices[j].y - vertices[i].y,
            vertices[i].x - vertices[j].x,
        )
        .normalize();
        if normal.is_zero() {
            continue;
        }
        if axes.iter().any(|a| a.cross(normal).abs() < tolerance) {
            continue;
        }
        axes.push(normal);
    }
    axes
}

/// Rotate unit axes in place.
pub fn rotate_axes<F: Float>(axes: &mut [Vec2<F>], angle: F) {
    if angle == F::zero() {
        return;
    }
    for axis in axes.iter_mut() {
        *axis = axis.rotate(angle);
    }
}

/// Convex hull (monotone chain), wound with positive area.
pub fn hull<F: Float>(points: &[Vec2<F>]) -> AllocVec<Vec2<F>> {
    let mut sorted: AllocVec<Vec2<F>> = points.to_vec();
    sorted.sort_by(|a, b| {
        a.x.partial_cmp(&b.x)
            .unwrap_or(core::cmp::Ordering::Equal)
            .then(a.y.partial_cmp(&b.y).unwrap_or(core::cmp::Ordering::Equal))
    });

    fn turn<F: Float>(o: Vec2<F>, a: Vec2<F>, b: Vec2<F>) -> F {
        (a - o).cross(b - o)
    }

    let mut lower: AllocVec<Vec2<F>> = AllocVec::new();
    for &p in sorted.iter() {
        while lower.len() >= 2 && turn(lower[lower.len() - 2], lower[lower.len() - 1], p) <= F::zero() {
            lower.pop();
        }
        lower.push(p);
    }

    let mut upper: AllocVec<Vec2<F>> = AllocVec::new();
    for &p in sorted.iter().rev() {
        while upper.len() >= 2 && turn(upper[upper.len() - 2], upper[upper.len() - 1], p) <= F::zero() {
            upper.pop();
        }
        upper.push(p);
    }

    lower.pop();
    upper.pop();
    lower.extend(upper);
    lower
}
