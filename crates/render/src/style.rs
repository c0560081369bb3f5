//! Colours and marker shapes.
//!
//! Markers are built as pixel-space outlines so every shape shares one
//! element type, in the plot and in the legend alike.

use plotters::prelude::*;
use std::f64::consts::PI;

macro_rules! hexcolour {
    ($colour:literal) => {
        RGBColor(
            (($colour & 0xFF0000) >> 16) as u8,
            (($colour & 0x00FF00) >> 8) as u8,
            ($colour & 0x0000FF) as u8,
        )
    };
}

/// Reference series colour.
pub const REFERENCE: RGBColor = hexcolour!(0x2E7D32);
/// Highlight colour of the selected reference runs.
pub const REFERENCE_BEST: RGBColor = hexcolour!(0x1B5E20);
/// Measured series colour.
pub const MEASURED: RGBColor = hexcolour!(0x1976D2);
/// Background of the note box.
pub const NOTE_BACKGROUND: RGBColor = hexcolour!(0xF5DEB3);

/// Marker shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    /// Filled circle.
    Circle,
    /// Axis-aligned square.
    Square,
    /// Upward triangle.
    Triangle,
    /// Square rotated by 45 degrees.
    Diamond,
    /// Five-pointed star.
    Star,
}

impl Marker {
    /// Polygon outline of the marker centred on `center`, `size` pixels in radius.
    pub fn outline(&self, center: (i32, i32), size: u32) -> Vec<(i32, i32)> {
        let r = f64::from(size);
        match self {
            Marker::Circle => ring(center, 20, 0.0, |_| r),
            Marker::Square => {
                let h = (r * 0.85).round() as i32;
                let (x, y) = center;
                vec![(x - h, y - h), (x + h, y - h), (x + h, y + h), (x - h, y + h)]
            }
            Marker::Triangle => ring(center, 3, -PI / 2.0, |_| r),
            Marker::Diamond => ring(center, 4, -PI / 2.0, |_| r),
            Marker::Star => ring(center, 10, -PI / 2.0, |i| {
                if i % 2 == 0 {
                    r
                } else {
                    r * 0.45
                }
            }),
        }
    }
}

fn ring(
    center: (i32, i32),
    vertices: usize,
    phase: f64,
    radius: impl Fn(usize) -> f64,
) -> Vec<(i32, i32)> {
    (0..vertices)
        .map(|i| {
            let angle = phase + 2.0 * PI * i as f64 / vertices as f64;
            let r = radius(i);
            (
                center.0 + (r * angle.cos()).round() as i32,
                center.1 + (r * angle.sin()).round() as i32,
            )
        })
        .collect()
}

/// Marker and colour for a reference parallelism degree.
pub fn degree_style(degree: u32) -> (Marker, RGBColor) {
    match degree {
        1 => (Marker::Circle, hexcolour!(0x81C784)),
        2 => (Marker::Triangle, hexcolour!(0x66BB6A)),
        4 => (Marker::Square, hexcolour!(0x4CAF50)),
        8 => (Marker::Diamond, hexcolour!(0x2E7D32)),
        _ => (Marker::Circle, REFERENCE),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outline_vertex_counts() {
        assert_eq!(Marker::Circle.outline((0, 0), 5).len(), 20);
        assert_eq!(Marker::Square.outline((0, 0), 5).len(), 4);
        assert_eq!(Marker::Triangle.outline((0, 0), 5).len(), 3);
        assert_eq!(Marker::Diamond.outline((0, 0), 5).len(), 4);
        assert_eq!(Marker::Star.outline((0, 0), 5).len(), 10);
    }

    #[test]
    fn test_outline_is_centred() {
        let diamond = Marker::Diamond.outline((100, 50), 10);
        assert_eq!(diamond[0], (100, 40));
        assert_eq!(diamond[2], (100, 60));

        for (x, y) in Marker::Circle.outline((100, 50), 10) {
            assert!((90..=110).contains(&x));
            assert!((40..=60).contains(&y));
        }
    }

    #[test]
    fn test_degree_styles_are_distinct() {
        let markers: Vec<Marker> = [1, 2, 4, 8].iter().map(|&d| degree_style(d).0).collect();
        assert_eq!(
            markers,
            vec![Marker::Circle, Marker::Triangle, Marker::Square, Marker::Diamond]
        );
        assert_eq!(degree_style(16).1, REFERENCE);
    }
}
