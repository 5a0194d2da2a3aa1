//! Shape generation for 2D primitives
//!
//! All shapes are emitted as triangle lists in screen pixels.

use glam::Vec2;
use std::f32::consts::PI;

use super::vertex::Vertex;

/// Axis-aligned filled rectangle
pub fn rect(center: Vec2, half: Vec2, color: [f32; 4]) -> Vec<Vertex> {
    rotated_rect(center, half, 0.0, color)
}

/// Filled rectangle rotated by `angle` radians around its center
pub fn rotated_rect(center: Vec2, half: Vec2, angle: f32, color: [f32; 4]) -> Vec<Vertex> {
    let rot = Vec2::from_angle(angle);
    let corner = |x: f32, y: f32| center + rot.rotate(Vec2::new(x * half.x, y * half.y));

    let tl = corner(-1.0, -1.0);
    let tr = corner(1.0, -1.0);
    let br = corner(1.0, 1.0);
    let bl = corner(-1.0, 1.0);

    vec![
        Vertex::new(tl.x, tl.y, color),
        Vertex::new(bl.x, bl.y, color),
        Vertex::new(tr.x, tr.y, color),
        Vertex::new(tr.x, tr.y, color),
        Vertex::new(bl.x, bl.y, color),
        Vertex::new(br.x, br.y, color),
    ]
}

/// Rectangle border of the given thickness, drawn inside the box
pub fn rect_outline(center: Vec2, half: Vec2, thickness: f32, color: [f32; 4]) -> Vec<Vertex> {
    let t = thickness.min(half.x).min(half.y);
    let mut vertices = Vec::with_capacity(24);
    // Top and bottom
    vertices.extend(rect(
        center - Vec2::new(0.0, half.y - t * 0.5),
        Vec2::new(half.x, t * 0.5),
        color,
    ));
    vertices.extend(rect(
        center + Vec2::new(0.0, half.y - t * 0.5),
        Vec2::new(half.x, t * 0.5),
        color,
    ));
    // Left and right
    vertices.extend(rect(
        center - Vec2::new(half.x - t * 0.5, 0.0),
        Vec2::new(t * 0.5, half.y - t),
        color,
    ));
    vertices.extend(rect(
        center + Vec2::new(half.x - t * 0.5, 0.0),
        Vec2::new(t * 0.5, half.y - t),
        color,
    ));
    vertices
}

/// Generate vertices for a filled circle
pub fn circle(center: Vec2, radius: f32, color: [f32; 4], segments: u32) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity((segments * 3) as usize);

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;

        // Triangle from center to edge
        vertices.push(Vertex::new(center.x, center.y, color));
        vertices.push(Vertex::new(
            center.x + radius * theta1.cos(),
            center.y + radius * theta1.sin(),
            color,
        ));
        vertices.push(Vertex::new(
            center.x + radius * theta2.cos(),
            center.y + radius * theta2.sin(),
            color,
        ));
    }

    vertices
}

/// Generate vertices for a ring (hollow circle)
pub fn ring(
    center: Vec2,
    inner_radius: f32,
    outer_radius: f32,
    color: [f32; 4],
    segments: u32,
) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity((segments * 6) as usize);

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;

        let dir1 = Vec2::from_angle(theta1);
        let dir2 = Vec2::from_angle(theta2);
        let inner1 = center + dir1 * inner_radius;
        let outer1 = center + dir1 * outer_radius;
        let inner2 = center + dir2 * inner_radius;
        let outer2 = center + dir2 * outer_radius;

        // Two triangles per segment
        vertices.push(Vertex::new(inner1.x, inner1.y, color));
        vertices.push(Vertex::new(outer1.x, outer1.y, color));
        vertices.push(Vertex::new(inner2.x, inner2.y, color));

        vertices.push(Vertex::new(inner2.x, inner2.y, color));
        vertices.push(Vertex::new(outer1.x, outer1.y, color));
        vertices.push(Vertex::new(outer2.x, outer2.y, color));
    }

    vertices
}

/// Scale the alpha channel of a color
#[inline]
pub fn with_alpha(color: [f32; 4], alpha: f32) -> [f32; 4] {
    [color[0], color[1], color[2], color[3] * alpha]
}

/// Multiply two colors (sprite tinting)
#[inline]
pub fn modulate(a: [f32; 4], b: [f32; 4]) -> [f32; 4] {
    [a[0] * b[0], a[1] * b[1], a[2] * b[2], a[3] * b[3]]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_corners() {
        let v = rect(Vec2::new(10.0, 10.0), Vec2::new(2.0, 3.0), [1.0; 4]);
        assert_eq!(v.len(), 6);
        assert_eq!(v[0].position, [8.0, 7.0]);
        assert_eq!(v[5].position, [12.0, 13.0]);
    }

    #[test]
    fn test_rotated_rect_quarter_turn() {
        let v = rotated_rect(Vec2::ZERO, Vec2::new(2.0, 1.0), PI / 2.0, [1.0; 4]);
        // Top-left (-2, -1) rotated by 90 degrees lands on (1, -2)
        assert!((v[0].position[0] - 1.0).abs() < 1e-5);
        assert!((v[0].position[1] + 2.0).abs() < 1e-5);
    }

    #[test]
    fn test_circle_and_ring_sizes() {
        assert_eq!(circle(Vec2::ZERO, 5.0, [1.0; 4], 16).len(), 48);
        assert_eq!(ring(Vec2::ZERO, 4.0, 5.0, [1.0; 4], 16).len(), 96);
        assert_eq!(rect_outline(Vec2::ZERO, Vec2::splat(10.0), 1.0, [1.0; 4]).len(), 24);
    }

    #[test]
    fn test_color_helpers() {
        assert_eq!(with_alpha([1.0, 0.5, 0.0, 0.8], 0.5), [1.0, 0.5, 0.0, 0.4]);
        assert_eq!(
            modulate([1.0, 0.5, 1.0, 1.0], [0.5, 1.0, 0.0, 1.0]),
            [0.5, 0.5, 0.0, 1.0]
        );
    }
}
