/// Additive axonometric projection of graph points onto the surface
use nalgebra::{Point2, Point3, Vector2};

use crate::axis::AxisAngles;
use crate::geometry::Layout;

/// Screen placement of the graph: its centre and the full length of an axis
/// guide, which spans the coordinate domain [-max, max].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    pub center: Point2<f32>,
    pub axis_length: f32,
}

impl Projection {
    pub fn new(center: Point2<f32>, axis_length: f32) -> Self {
        Self {
            center,
            axis_length,
        }
    }

    pub fn from_layout(layout: &Layout) -> Self {
        Self::new(layout.graph_center, layout.axis_length)
    }

    /// Project a point of the graph to surface coordinates.
    ///
    /// Each coordinate moves the point along its own axis direction; the
    /// three offsets are rounded to whole units and summed. Surface y grows
    /// downwards, so the summed mathematical y is subtracted.
    pub fn project(&self, position: &Point3<i32>, angles: &AxisAngles, max_value: i32) -> Point2<f32> {
        let offset = [position.x, position.y, position.z]
            .into_iter()
            .zip(angles.as_array())
            .map(|(coordinate, angle)| self.axis_offset(coordinate, angle, max_value))
            .fold(Vector2::zeros(), |sum, offset| sum + offset);

        Point2::new(self.center.x + offset.x, self.center.y - offset.y)
    }

    fn axis_offset(&self, coordinate: i32, angle: i32, max_value: i32) -> Vector2<f32> {
        let radius = coordinate as f32 * self.axis_length / (2 * max_value) as f32;
        let radians = (angle as f32).to_radians();
        Vector2::new(
            (radius * radians.cos()).round_ties_even(),
            (radius * radians.sin()).round_ties_even(),
        )
    }
}

/// Project with the default surface layout
pub fn project(position: &Point3<i32>, angles: &AxisAngles, max_value: i32) -> Point2<f32> {
    Projection::from_layout(&Layout::default()).project(position, angles, max_value)
}
