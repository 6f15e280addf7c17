//! Painting a wheel through a small set of drawing primitives.
//!
//! Coordinates are screen space: x grows to the right, y grows downward and
//! angles grow clockwise from the positive x axis. The pointer sits at the top.

use std::f64::consts::{FRAC_PI_2, TAU};

use crate::color::{self, Rgb};
use crate::wheel::WheelState;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Point at `radius` from `self` in direction `angle`.
    pub fn polar(self, radius: f64, angle: f64) -> Self {
        Self::new(self.x + radius * angle.cos(), self.y + radius * angle.sin())
    }
}

/// Drawing primitives a wheel needs.
pub trait Surface {
    fn clear(&mut self);
    fn fill_wedge(&mut self, center: Point, radius: f64, start: f64, end: f64, color: Rgb);
    /// `rotation` is the text baseline angle; surfaces that cannot rotate text may ignore it.
    fn draw_text(&mut self, origin: Point, rotation: f64, text: &str, color: Rgb);
    fn fill_path(&mut self, path: &[Point], color: Rgb);
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WheelGeometry {
    pub center: Point,
    pub radius: f64,
    /// Distance of labels from the center, as a fraction of the radius.
    pub label_ratio: f64,
    pub pointer_half_width: f64,
    pub pointer_height: f64,
    pub pointer_color: Rgb,
}

impl WheelGeometry {
    pub fn centered(width: f64, height: f64) -> Self {
        let radius = (width.min(height) / 2.0) * 0.85;
        Self {
            center: Point::new(width / 2.0, height / 2.0),
            radius,
            label_ratio: 0.62,
            pointer_half_width: radius * 0.08,
            pointer_height: radius * 0.14,
            pointer_color: Rgb::BLACK,
        }
    }

    /// Triangle above the wheel pointing down at the rim.
    pub fn pointer(&self) -> [Point; 3] {
        let top = self.center.y - self.radius - self.pointer_height * 0.5;
        [
            Point::new(self.center.x - self.pointer_half_width, top),
            Point::new(self.center.x + self.pointer_half_width, top),
            Point::new(self.center.x, top + self.pointer_height),
        ]
    }
}

/// Paints every slice, its label and the pointer. Does nothing but clear for
/// an empty wheel; callers show their own prompt in that case.
pub fn draw_wheel<S: Surface + ?Sized>(surface: &mut S, wheel: &WheelState, geometry: &WheelGeometry) {
    surface.clear();
    let Some(width) = wheel.slice_width() else {
        return;
    };
    let total = wheel.len();

    for (index, name) in wheel.entries().iter().enumerate() {
        let start = wheel.rotation_angle() + index as f64 * width;
        surface.fill_wedge(
            geometry.center,
            geometry.radius,
            start,
            start + width,
            color::slice_color(index, total),
        );

        let mid = start + width / 2.0;
        let origin = geometry
            .center
            .polar(geometry.radius * geometry.label_ratio, mid);
        surface.draw_text(origin, mid + FRAC_PI_2, name, Rgb::WHITE);
    }

    surface.fill_path(&geometry.pointer(), geometry.pointer_color);
}

/// Whether `angle` lies in the clockwise sweep `[start, end)`.
pub fn angle_in_sweep(angle: f64, start: f64, end: f64) -> bool {
    let sweep = end - start;
    if sweep >= TAU {
        return true;
    }
    (angle - start).rem_euclid(TAU) < sweep
}

/// Even-odd point-in-polygon test.
pub fn point_in_polygon(p: Point, path: &[Point]) -> bool {
    let mut inside = false;
    let mut j = path.len().wrapping_sub(1);
    for i in 0..path.len() {
        let (a, b) = (path[i], path[j]);
        if (a.y > p.y) != (b.y > p.y) && p.x < (b.x - a.x) * (p.y - a.y) / (b.y - a.y) + a.x {
            inside = !inside;
        }
        j = i;
    }
    inside
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    enum Call {
        Clear,
        Wedge { start: f64, end: f64, color: Rgb },
        Text { text: String, origin: Point },
        Path(usize),
    }

    #[derive(Default)]
    struct Recorder {
        calls: Vec<Call>,
    }

    impl Surface for Recorder {
        fn clear(&mut self) {
            self.calls.push(Call::Clear);
        }

        fn fill_wedge(&mut self, _c: Point, _r: f64, start: f64, end: f64, color: Rgb) {
            self.calls.push(Call::Wedge { start, end, color });
        }

        fn draw_text(&mut self, origin: Point, _rotation: f64, text: &str, _color: Rgb) {
            self.calls.push(Call::Text {
                text: text.to_string(),
                origin,
            });
        }

        fn fill_path(&mut self, path: &[Point], _color: Rgb) {
            self.calls.push(Call::Path(path.len()));
        }
    }

    fn wheel(names: &[&str]) -> WheelState {
        WheelState::new(names.iter().map(|s| s.to_string()).collect())
    }

    #[test]
    fn test_empty_wheel_only_clears() {
        let mut rec = Recorder::default();
        draw_wheel(&mut rec, &wheel(&[]), &WheelGeometry::centered(100.0, 100.0));
        assert_eq!(rec.calls, vec![Call::Clear]);
    }

    #[test]
    fn test_draws_slices_labels_and_pointer() {
        let mut rec = Recorder::default();
        let w = wheel(&["Alice", "Bob", "Charlie"]);
        draw_wheel(&mut rec, &w, &WheelGeometry::centered(100.0, 100.0));

        let wedges: Vec<_> = rec
            .calls
            .iter()
            .filter_map(|c| match c {
                Call::Wedge { start, end, color } => Some((*start, *end, *color)),
                _ => None,
            })
            .collect();
        assert_eq!(wedges.len(), 3);
        assert_eq!(wedges[0].2, color::slice_color(0, 3));
        assert!((wedges[2].1 - TAU).abs() < 1e-9);

        let labels: Vec<_> = rec
            .calls
            .iter()
            .filter_map(|c| match c {
                Call::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(labels, vec!["Alice", "Bob", "Charlie"]);
        assert_eq!(rec.calls.last(), Some(&Call::Path(3)));
    }

    #[test]
    fn test_first_label_sits_in_first_slice() {
        let mut rec = Recorder::default();
        let geometry = WheelGeometry::centered(200.0, 200.0);
        draw_wheel(&mut rec, &wheel(&["A", "B", "C", "D"]), &geometry);
        let origin = rec
            .calls
            .iter()
            .find_map(|c| match c {
                Call::Text { origin, .. } => Some(*origin),
                _ => None,
            })
            .unwrap();
        // slice 0 spans 0..90 degrees clockwise: right and below the center
        assert!(origin.x > geometry.center.x);
        assert!(origin.y > geometry.center.y);
    }

    #[test]
    fn test_angle_in_sweep_wraps() {
        assert!(angle_in_sweep(0.1, -0.2, 0.5));
        assert!(angle_in_sweep(TAU - 0.1, -0.2, 0.5));
        assert!(!angle_in_sweep(1.0, -0.2, 0.5));
        assert!(angle_in_sweep(3.0, 100.0, 100.0 + TAU));
        assert!(angle_in_sweep(100.2 + TAU * 3.0, 100.0, 100.5));
    }

    #[test]
    fn test_point_in_polygon_triangle() {
        let tri = [
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(5.0, 10.0),
        ];
        assert!(point_in_polygon(Point::new(5.0, 3.0), &tri));
        assert!(!point_in_polygon(Point::new(0.0, 9.0), &tri));
        assert!(!point_in_polygon(Point::new(5.0, 3.0), &[]));
    }

    #[test]
    fn test_pointer_sits_above_rim() {
        let g = WheelGeometry::centered(100.0, 100.0);
        let [left, right, tip] = g.pointer();
        assert!(left.y < g.center.y - g.radius);
        assert_eq!(left.y, right.y);
        assert!(tip.y > g.center.y - g.radius);
        assert_eq!(tip.x, g.center.x);
    }
}
