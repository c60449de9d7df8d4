//! Outline tessellation for the primitive shapes, in user space.

use std::f32::consts::{FRAC_PI_2, PI, TAU};

use crate::coords::Vec2;

/// Corners of the rectangle `(x, y, w, h)`, clockwise from top-left.
pub fn rect(x: f32, y: f32, w: f32, h: f32) -> Vec<Vec2> {
    vec![Vec2::new(x, y), Vec2::new(x + w, y), Vec2::new(x + w, y + h), Vec2::new(x, y + h)]
}

/// Segment count for a curve of radii `(rx, ry)` seen at device `scale`.
pub fn curve_segments(rx: f32, ry: f32, scale: f32, high_quality: bool) -> usize {
    let extent = (rx.abs() + ry.abs()) * scale.max(0.0);
    let density = if high_quality { 1.0 } else { 0.5 };
    let n = (extent * density).ceil();
    if n.is_finite() { (n as usize).clamp(8, 256) } else { 8 }
}

/// Ellipse inscribed in `(x, y, w, h)`.
pub fn ellipse(x: f32, y: f32, w: f32, h: f32, segments: usize) -> Vec<Vec2> {
    let (rx, ry) = (w * 0.5, h * 0.5);
    let (cx, cy) = (x + rx, y + ry);
    (0..segments)
        .map(|i| {
            let t = TAU * i as f32 / segments as f32;
            Vec2::new(cx + rx * t.cos(), cy + ry * t.sin())
        })
        .collect()
}

/// Rectangle with elliptical corners of diameters `(arc_w, arc_h)`.
///
/// Corner diameters are clamped to the rectangle size.
pub fn round_rect(
    x: f32,
    y: f32,
    w: f32,
    h: f32,
    arc_w: f32,
    arc_h: f32,
    segments: usize,
) -> Vec<Vec2> {
    let rx = (arc_w.abs() * 0.5).min(w.abs() * 0.5);
    let ry = (arc_h.abs() * 0.5).min(h.abs() * 0.5);
    if rx <= 0.0 || ry <= 0.0 {
        return rect(x, y, w, h);
    }

    let per_corner = (segments / 4).max(2);
    // Corner centers with the angle each quarter arc starts at.
    let corners = [
        (x + w - rx, y + ry, -FRAC_PI_2),
        (x + w - rx, y + h - ry, 0.0),
        (x + rx, y + h - ry, FRAC_PI_2),
        (x + rx, y + ry, PI),
    ];

    let mut out = Vec::with_capacity(corners.len() * (per_corner + 1));
    for (cx, cy, start) in corners {
        for i in 0..=per_corner {
            let t = start + FRAC_PI_2 * i as f32 / per_corner as f32;
            out.push(Vec2::new(cx + rx * t.cos(), cy + ry * t.sin()));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::Rect;

    #[test]
    fn ellipse_stays_inside_bounds() {
        let pts = ellipse(10.0, 20.0, 30.0, 8.0, 32);
        let b = Rect::bounding(&pts).unwrap();
        assert!(b.origin.x >= 10.0 - 1e-4 && b.max().x <= 40.0 + 1e-4);
        assert!(b.origin.y >= 20.0 - 1e-4 && b.max().y <= 28.0 + 1e-4);
    }

    #[test]
    fn round_rect_without_arcs_is_a_rect() {
        assert_eq!(round_rect(1.0, 2.0, 3.0, 4.0, 0.0, 5.0, 16), rect(1.0, 2.0, 3.0, 4.0));
    }

    #[test]
    fn round_rect_fills_its_bounds() {
        let pts = round_rect(0.0, 0.0, 20.0, 10.0, 6.0, 6.0, 16);
        let b = Rect::bounding(&pts).unwrap();
        assert!((b.size.x - 20.0).abs() < 1e-4);
        assert!((b.size.y - 10.0).abs() < 1e-4);
    }

    #[test]
    fn segment_count_is_bounded() {
        assert_eq!(curve_segments(0.0, 0.0, 1.0, false), 8);
        assert_eq!(curve_segments(1e9, 1e9, 1.0, true), 256);
        assert!(curve_segments(40.0, 40.0, 1.0, true) > curve_segments(40.0, 40.0, 1.0, false));
        assert_eq!(curve_segments(f32::NAN, 1.0, 1.0, true), 8);
    }
}
