//! Geometry kernel for circle-vs-triangle contact
//!
//! Pure, total functions. Points on a triangle edge count as inside so that
//! borderline contacts are never missed.

use glam::Vec2;

/// Twice the signed area of (p, a, b); sign tells which side of `ab` p is on
#[inline]
fn edge_sign(p: Vec2, a: Vec2, b: Vec2) -> f32 {
    (p.x - b.x) * (a.y - b.y) - (a.x - b.x) * (p.y - b.y)
}

/// Sign-consistency point-in-triangle test (edges inclusive)
pub fn point_in_triangle(p: Vec2, a: Vec2, b: Vec2, c: Vec2) -> bool {
    let d1 = edge_sign(p, a, b);
    let d2 = edge_sign(p, b, c);
    let d3 = edge_sign(p, c, a);

    let has_neg = d1 < 0.0 || d2 < 0.0 || d3 < 0.0;
    let has_pos = d1 > 0.0 || d2 > 0.0 || d3 > 0.0;

    !(has_neg && has_pos)
}

/// Distance from `p` to the closest point on segment `ab`
pub fn distance_point_to_segment(p: Vec2, a: Vec2, b: Vec2) -> f32 {
    let seg = b - a;
    let len_sq = seg.length_squared();

    if len_sq == 0.0 {
        return p.distance(a);
    }

    let t = ((p - a).dot(seg) / len_sq).clamp(0.0, 1.0);
    let closest = a + seg * t;
    p.distance(closest)
}

/// Minimum distance from a circle center to a triangle (0 when inside)
pub fn min_separation(center: Vec2, tri: &[Vec2; 3]) -> f32 {
    let [a, b, c] = *tri;

    if point_in_triangle(center, a, b, c) {
        return 0.0;
    }

    distance_point_to_segment(center, a, b)
        .min(distance_point_to_segment(center, b, c))
        .min(distance_point_to_segment(center, c, a))
}

/// Vertices of an apex-up isosceles triangle: apex, bottom-left, bottom-right
///
/// The base is `2 * extent` wide and the triangle is `2 * extent` tall, so it
/// fills the same bounding square as a circle of radius `extent`.
#[inline]
pub fn triangle_vertices(center: Vec2, extent: f32) -> [Vec2; 3] {
    [
        Vec2::new(center.x, center.y - extent),
        Vec2::new(center.x - extent, center.y + extent),
        Vec2::new(center.x + extent, center.y + extent),
    ]
}
