/// Horizontal slider producing a stepped integer value
use nalgebra::Point2;

use crate::canvas::{Canvas, InputSnapshot, Rgb};
use crate::geometry::{Rect, SliderTrack};

#[derive(Debug, Clone)]
pub struct Slider {
    bar: Rect,
    min_x: f32,
    max_x: f32,
    controller: Point2<f32>,
    radius: f32,
    min_value: i32,
    max_value: i32,
    step: i32,
    holding: bool,
    bar_color: Rgb,
    controller_colors: (Rgb, Rgb),
}

impl Slider {
    /// The controller travels between one controller radius in from each end
    /// of the bar; `step` must be positive.
    pub fn new(
        track: &SliderTrack,
        min_value: i32,
        max_value: i32,
        step: i32,
        bar_color: Rgb,
        controller_colors: (Rgb, Rgb),
    ) -> Self {
        let radius = track.height;
        let min_x = track.left + radius;
        Self {
            bar: Rect::new(
                track.left,
                track.middle_y - (track.height / 2.0).floor(),
                track.width,
                track.height,
            ),
            min_x,
            max_x: track.left + track.width - radius,
            controller: Point2::new(min_x, track.middle_y),
            radius,
            min_value,
            max_value,
            step,
            holding: false,
            bar_color,
            controller_colors,
        }
    }

    pub fn is_holding(&self) -> bool {
        self.holding
    }

    pub fn controller(&self) -> Point2<f32> {
        self.controller
    }

    pub fn bounds(&self) -> (i32, i32) {
        (self.min_value, self.max_value)
    }

    /// Current value: the controller offset mapped linearly onto the range,
    /// rounded, then floored to a multiple of the step.
    pub fn value(&self) -> i32 {
        let fraction = f64::from((self.controller.x - self.min_x) / (self.max_x - self.min_x));
        let rounded = (f64::from(self.min_value) + self.gap() * fraction).round_ties_even() as i32;
        rounded - rounded.rem_euclid(self.step)
    }

    /// Move the controller to where `value` sits, clamped to the track. Any
    /// `i32` is accepted.
    pub fn set_value(&mut self, value: i32) {
        let fraction = (f64::from(value) - f64::from(self.min_value)) / self.gap();
        let x = self.min_x + (self.max_x - self.min_x) * fraction as f32;
        self.controller.x = x.clamp(self.min_x, self.max_x);
    }

    fn gap(&self) -> f64 {
        f64::from(self.max_value) - f64::from(self.min_value)
    }

    /// Reconfigure to the symmetric range [-max_value, max_value]. The
    /// controller keeps its position, so the value it reads may change.
    pub fn update_bounds(&mut self, max_value: i32) {
        self.min_value = -max_value;
        self.max_value = max_value;
    }

    fn controller_hit(&self, position: &Point2<f32>) -> bool {
        nalgebra::distance(position, &self.controller) < self.radius
    }

    /// Drag handling for one frame.
    ///
    /// Grabbing the controller starts a hold that follows the pointer's x
    /// anywhere on the surface until release; pressing on the bar itself
    /// jumps the controller there without holding.
    pub fn update(&mut self, input: &InputSnapshot) {
        if !input.down {
            self.holding = false;
            return;
        }

        if self.controller_hit(&input.position) {
            self.holding = true;
        }
        if self.holding || self.bar.contains(&input.position) {
            self.controller.x = input.position.x;
        }
        self.controller.x = self.controller.x.clamp(self.min_x, self.max_x);
    }

    pub fn draw(&self, canvas: &mut dyn Canvas) {
        let controller_color = if self.holding {
            self.controller_colors.1
        } else {
            self.controller_colors.0
        };
        canvas.rect(&self.bar, (self.bar.height / 2.0).floor(), self.bar_color);
        canvas.circle(self.controller, self.radius, controller_color);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BAR: Rgb = [0, 0, 0];
    const KNOB: (Rgb, Rgb) = ([1, 1, 1], [2, 2, 2]);

    fn track() -> SliderTrack {
        SliderTrack {
            left: 40.0,
            middle_y: 660.0,
            width: 160.0,
            height: 12.0,
        }
    }

    fn slider(min: i32, max: i32, step: i32) -> Slider {
        Slider::new(&track(), min, max, step, BAR, KNOB)
    }

    fn press(x: f32, y: f32, was_down: bool) -> InputSnapshot {
        InputSnapshot::new(Point2::new(x, y), true, was_down)
    }

    #[test]
    fn test_starts_at_minimum() {
        assert_eq!(slider(4, 80, 4).value(), 4);
        assert_eq!(slider(-4, 4, 1).value(), -4);
    }

    #[test]
    fn test_set_value_round_trips_step_multiples() {
        let mut angle = slider(0, 359, 5);
        for value in (0..=355).step_by(5) {
            angle.set_value(value);
            assert_eq!(angle.value(), value);
        }

        let mut scale = slider(4, 80, 4);
        for value in (4..=80).step_by(4) {
            scale.set_value(value);
            assert_eq!(scale.value(), value);
        }

        let mut position = slider(-80, 80, 1);
        for value in -80..=80 {
            position.set_value(value);
            assert_eq!(position.value(), value);
        }
    }

    #[test]
    fn test_set_value_off_step_lands_within_one_step() {
        let mut angle = slider(0, 359, 5);
        for value in [1, 7, 333, 358] {
            angle.set_value(value);
            let read = angle.value();
            assert!(read <= value && value - read < 5, "{value} read as {read}");
        }
    }

    #[test]
    fn test_set_value_clamps_to_track() {
        let mut scale = slider(4, 80, 4);
        scale.set_value(200);
        assert_eq!(scale.value(), 80);
        scale.set_value(-5);
        assert_eq!(scale.value(), 4);
    }

    #[test]
    fn test_set_value_accepts_extreme_values() {
        let mut scale = slider(4, 80, 4);
        scale.set_value(i32::MIN);
        assert_eq!(scale.value(), 4);
        scale.set_value(i32::MAX);
        assert_eq!(scale.value(), 80);

        let mut wide = slider(i32::MIN, i32::MAX, 1);
        wide.set_value(i32::MIN);
        assert_eq!(wide.controller().x, 52.0);
    }

    #[test]
    fn test_negative_values_quantize_downwards() {
        let mut s = slider(-6, 6, 3);
        s.set_value(-1);
        assert_eq!(s.value(), -3);
        s.set_value(2);
        assert_eq!(s.value(), 0);
        s.set_value(-6);
        assert_eq!(s.value(), -6);
    }

    #[test]
    fn test_update_bounds_keeps_controller() {
        let mut s = slider(-4, 4, 1);
        s.set_value(4);
        let x = s.controller().x;
        s.update_bounds(8);
        assert_eq!(s.bounds(), (-8, 8));
        assert_eq!(s.controller().x, x);
        assert_eq!(s.value(), 8);
    }

    #[test]
    fn test_drag_follows_pointer_off_track() {
        let mut s = slider(4, 80, 4);
        let start = s.controller();
        s.update(&press(start.x, start.y, false));
        assert!(s.is_holding());

        // Far below the bar, still dragging.
        s.update(&press(120.0, 300.0, true));
        assert_eq!(s.controller().x, 120.0);

        // Past the right end clamps.
        s.update(&press(900.0, 300.0, true));
        assert_eq!(s.value(), 80);

        s.update(&InputSnapshot::new(Point2::new(900.0, 300.0), false, true));
        assert!(!s.is_holding());
        assert_eq!(s.value(), 80);
    }

    #[test]
    fn test_bar_press_jumps_without_holding() {
        let mut s = slider(4, 80, 4);
        s.update(&press(150.0, 660.0, false));
        assert!(!s.is_holding());
        assert_eq!(s.controller().x, 150.0);

        // Leaving the bar while not holding leaves the controller behind.
        s.update(&press(190.0, 300.0, true));
        assert_eq!(s.controller().x, 150.0);
    }

    #[test]
    fn test_pointer_up_ignores_position() {
        let mut s = slider(4, 80, 4);
        s.update(&InputSnapshot::new(Point2::new(150.0, 660.0), false, false));
        assert_eq!(s.value(), 4);
    }
}
