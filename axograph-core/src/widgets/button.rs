/// Labelled push button
use crate::canvas::{Canvas, FontSize, InputSnapshot, Rgb, TextAlign};
use crate::geometry::{hover_color, Rect};
use crate::widgets::press::PressTracker;

#[derive(Debug, Clone)]
pub struct Button {
    label: String,
    bounds: Rect,
    font: FontSize,
    colors: (Rgb, Rgb),
    text_color: Rgb,
    corner_radius: f32,
    press: PressTracker,
}

impl Button {
    pub fn new(
        label: &str,
        bounds: Rect,
        font: FontSize,
        colors: (Rgb, Rgb),
        text_color: Rgb,
        corner_radius: f32,
    ) -> Self {
        Self {
            label: label.to_string(),
            bounds,
            font,
            colors,
            text_color,
            corner_radius,
            press: PressTracker::new(),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn bounds(&self) -> &Rect {
        &self.bounds
    }

    pub fn is_clicked(&mut self, input: &InputSnapshot) -> bool {
        self.press.poll(&self.bounds, input)
    }

    /// Draw the button; `label` replaces the stored caption for toggles.
    pub fn draw(&self, canvas: &mut dyn Canvas, input: &InputSnapshot, label: Option<&str>) {
        let hovered = self.bounds.contains(&input.position);
        canvas.rect(&self.bounds, self.corner_radius, hover_color(self.colors, hovered));
        canvas.text(
            label.unwrap_or(&self.label),
            self.bounds.center(),
            TextAlign::Center,
            self.font,
            self.text_color,
        );
    }
}
