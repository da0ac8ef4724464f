/// Axis angles and the guide lines drawn for each axis
use nalgebra::{Point2, Vector2};

use crate::canvas::Canvas;
use crate::geometry::{palette, Layout};

/// On-screen direction of each axis, in whole degrees
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AxisAngles {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl AxisAngles {
    pub fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    pub fn as_array(&self) -> [i32; 3] {
        [self.x, self.y, self.z]
    }
}

impl Default for AxisAngles {
    fn default() -> Self {
        Self::new(330, 90, 210)
    }
}

impl From<[i32; 3]> for AxisAngles {
    fn from([x, y, z]: [i32; 3]) -> Self {
        Self::new(x, y, z)
    }
}

/// A guide line through the graph centre.
///
/// Only the angle is state; the endpoints and ticks are recomputed from it.
#[derive(Debug, Clone)]
pub struct Axis {
    angle: i32,
    center: Point2<f32>,
    radius: f32,
    thickness: f32,
    start: Point2<f32>,
    end: Point2<f32>,
    ticks: [Point2<f32>; 4],
}

impl Axis {
    pub fn new(center: Point2<f32>, length: f32, thickness: f32, angle: i32) -> Self {
        let mut axis = Self {
            angle,
            center,
            radius: length / 2.0,
            thickness,
            start: center,
            end: center,
            ticks: [center; 4],
        };
        axis.set_direction(angle);
        axis
    }

    /// Point the axis at `angle` degrees and recompute its geometry.
    pub fn set_direction(&mut self, angle: i32) {
        let radians = (angle as f32).to_radians();
        // Mathematical y is up, surface y is down.
        let reach = Vector2::new(radians.cos(), -radians.sin()) * self.radius;

        self.angle = angle;
        self.start = self.center - reach;
        self.end = self.center + reach;

        let span = self.end - self.start;
        self.ticks = [
            self.start,
            self.start + span / 4.0,
            self.start + span * 3.0 / 4.0,
            self.end,
        ];
    }

    pub fn angle(&self) -> i32 {
        self.angle
    }

    /// Negative end of the axis
    pub fn start(&self) -> Point2<f32> {
        self.start
    }

    /// Positive end of the axis
    pub fn end(&self) -> Point2<f32> {
        self.end
    }

    pub fn ticks(&self) -> &[Point2<f32>; 4] {
        &self.ticks
    }

    pub fn draw(&self, canvas: &mut dyn Canvas) {
        canvas.line(self.start, self.end, self.thickness, palette::AXIS);
        let last = self.ticks.len() - 1;
        for (n, tick) in self.ticks.iter().enumerate() {
            let color = match n {
                0 => palette::AXIS_MIN,
                n if n == last => palette::AXIS_MAX,
                _ => palette::AXIS,
            };
            canvas.circle(*tick, self.thickness, color);
        }
    }
}

/// The x, y, and z guides sharing the graph centre
#[derive(Debug, Clone)]
pub struct AxisSet {
    pub x: Axis,
    pub y: Axis,
    pub z: Axis,
}

impl AxisSet {
    pub fn new(layout: &Layout, angles: &AxisAngles) -> Self {
        let axis = |angle| {
            Axis::new(
                layout.graph_center,
                layout.axis_length,
                layout.axis_thickness,
                angle,
            )
        };
        Self {
            x: axis(angles.x),
            y: axis(angles.y),
            z: axis(angles.z),
        }
    }

    pub fn set_angles(&mut self, angles: &AxisAngles) {
        self.x.set_direction(angles.x);
        self.y.set_direction(angles.y);
        self.z.set_direction(angles.z);
    }

    pub fn angles(&self) -> AxisAngles {
        AxisAngles::new(self.x.angle(), self.y.angle(), self.z.angle())
    }

    pub fn draw(&self, canvas: &mut dyn Canvas) {
        self.y.draw(canvas);
        self.x.draw(canvas);
        self.z.draw(canvas);
    }
}
