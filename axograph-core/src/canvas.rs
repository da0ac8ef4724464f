/// Drawing and input contract with whatever surface hosts the graph
use nalgebra::Point2;

use crate::geometry::Rect;

pub type Rgb = [u8; 3];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlign {
    Center,
    MidLeft,
    MidRight,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontSize {
    Small,
    Medium,
    Large,
}

/// Primitive draw calls, in surface coordinates (y grows downwards).
pub trait Canvas {
    fn clear(&mut self, color: Rgb);

    fn line(&mut self, from: Point2<f32>, to: Point2<f32>, thickness: f32, color: Rgb);

    fn circle(&mut self, center: Point2<f32>, radius: f32, color: Rgb);

    /// Filled rectangle, optionally with rounded corners
    fn rect(&mut self, rect: &Rect, corner_radius: f32, color: Rgb);

    fn text(&mut self, text: &str, anchor: Point2<f32>, align: TextAlign, size: FontSize, color: Rgb);
}

/// Pointer state sampled once per frame.
///
/// Every widget reads the same snapshot during a tick, so a press seen by
/// one control is seen identically by all of them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InputSnapshot {
    pub position: Point2<f32>,
    pub down: bool,
    pub was_down: bool,
}

impl InputSnapshot {
    pub fn new(position: Point2<f32>, down: bool, was_down: bool) -> Self {
        Self {
            position,
            down,
            was_down,
        }
    }

    /// Snapshot for the next frame, carrying the current button state over.
    pub fn next(&self, position: Point2<f32>, down: bool) -> Self {
        Self::new(position, down, self.down)
    }

    pub fn just_pressed(&self) -> bool {
        self.down && !self.was_down
    }

    pub fn just_released(&self) -> bool {
        !self.down && self.was_down
    }
}

impl Default for InputSnapshot {
    fn default() -> Self {
        Self::new(Point2::origin(), false, false)
    }
}
