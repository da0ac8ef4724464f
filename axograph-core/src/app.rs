/// Per-frame application state: input, model updates, and drawing
use log::warn;
use nalgebra::Point3;

use crate::axis::{AxisAngles, AxisSet};
use crate::canvas::{Canvas, FontSize, InputSnapshot, TextAlign};
use crate::geometry::{hover_color, palette, Layout};
use crate::projection::Projection;
use crate::registry::Registry;
use crate::scene::{Scene, SceneStore};
use crate::settings::Settings;
use crate::widgets::{Button, Slider};

struct Buttons {
    hide_graph: Button,
    hide_dots: Button,
    reset_graph: Button,
    reset_all: Button,
    get_input: Button,
    save_data: Button,
    new_dot: Button,
    remove: Button,
}

impl Buttons {
    fn new(layout: &Layout) -> Self {
        let view = |label, bounds| {
            Button::new(
                label,
                bounds,
                FontSize::Small,
                palette::VIEW_BUTTON,
                palette::VIEW_TEXT,
                layout.corner_radius,
            )
        };
        let edit = |label, bounds| {
            Button::new(
                label,
                bounds,
                FontSize::Medium,
                palette::EDIT_BUTTON,
                palette::EDIT_TEXT,
                layout.corner_radius,
            )
        };
        Self {
            hide_graph: view("Hide Graph", layout.hide_graph),
            hide_dots: view("Hide Dots", layout.hide_dots),
            reset_graph: view("Reset Graph", layout.reset_graph),
            reset_all: view("Reset All", layout.reset_all),
            get_input: view("Get Input", layout.get_input),
            save_data: view("Save Data", layout.save_data),
            new_dot: edit("New Dot", layout.new_dot),
            remove: edit("Remove", layout.remove),
        }
    }
}

pub fn max_value_label(max_value: i32) -> String {
    format!("max:  ± {max_value}")
}

pub fn angle_label(axis: &str, angle: i32) -> String {
    format!("{axis}:  {angle}°")
}

pub fn position_label(position: &Point3<i32>) -> String {
    format!("({}, {}, {})", position.x, position.y, position.z)
}

pub fn graph_toggle_label(showing: bool) -> &'static str {
    if showing {
        "Hide Graph"
    } else {
        "Show Graph"
    }
}

pub fn dots_toggle_label(showing: bool) -> &'static str {
    if showing {
        "Hide Dots"
    } else {
        "Show Dots"
    }
}

const AXIS_NAMES: [&str; 3] = ["x", "y", "z"];

/// Everything the application loop owns between frames.
pub struct ApplicationState {
    layout: Layout,
    projection: Projection,
    default_angles: AxisAngles,
    initial_max_value: i32,

    registry: Registry,
    axes: AxisSet,
    buttons: Buttons,
    max_value_slider: Slider,
    angle_sliders: [Slider; 3],
    position_sliders: [Slider; 3],

    max_value: i32,
    show_graph: bool,
    show_points: bool,

    store: SceneStore,
    status: Option<String>,
    input: InputSnapshot,
}

impl ApplicationState {
    pub fn new(settings: &Settings) -> Self {
        let layout = Layout::new(settings.width);
        let default_angles = settings.default_angles();
        let range = settings.max_value;

        let mut max_value_slider = Slider::new(
            &layout.max_value_track,
            range.min,
            range.max,
            range.step,
            palette::VIEW_BUTTON.0,
            (palette::VIEW_BUTTON.1, palette::VIEW_TEXT),
        );
        max_value_slider.set_value(settings.initial_max_value);
        let max_value = max_value_slider.value();

        let angle_sliders = layout.angle_tracks.map(|track| {
            Slider::new(
                &track,
                0,
                359,
                settings.angle_step,
                palette::VIEW_BUTTON.0,
                (palette::VIEW_BUTTON.1, palette::VIEW_TEXT),
            )
        });
        let position_sliders = layout.position_tracks.map(|track| {
            let mut slider = Slider::new(
                &track,
                -max_value,
                max_value,
                1,
                palette::EDIT_BUTTON.0,
                (palette::EDIT_BUTTON.1, palette::EDIT_TEXT),
            );
            slider.set_value(0);
            slider
        });

        let mut state = Self {
            projection: Projection::from_layout(&layout),
            default_angles,
            initial_max_value: settings.initial_max_value,
            registry: Registry::new(&layout),
            axes: AxisSet::new(&layout, &default_angles),
            buttons: Buttons::new(&layout),
            max_value_slider,
            angle_sliders,
            position_sliders,
            max_value,
            show_graph: true,
            show_points: true,
            store: SceneStore::new(&settings.input_dir, &settings.output_dir),
            status: None,
            input: InputSnapshot::default(),
            layout,
        };
        state.reset_angles();
        state.refresh_points();
        state
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn axes(&self) -> &AxisSet {
        &self.axes
    }

    pub fn store(&self) -> &SceneStore {
        &self.store
    }

    pub fn max_value(&self) -> i32 {
        self.max_value
    }

    pub fn angles(&self) -> AxisAngles {
        AxisAngles::from(self.angle_sliders.each_ref().map(|s| s.value()))
    }

    pub fn show_graph(&self) -> bool {
        self.show_graph
    }

    pub fn show_points(&self) -> bool {
        self.show_points
    }

    /// Outcome of the last load or save
    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    /// Coordinates currently shown by the position sliders
    pub fn edited_position(&self) -> Point3<i32> {
        let [x, y, z] = self.position_sliders.each_ref().map(|s| s.value());
        Point3::new(x, y, z)
    }

    /// Advance one frame with this frame's pointer state.
    pub fn update(&mut self, input: InputSnapshot) {
        self.input = input;
        self.max_value = self.max_value_slider.value();

        self.update_view_controls(&input);

        if self.buttons.get_input.is_clicked(&input) {
            self.load_next_scene();
        }
        if self.buttons.save_data.is_clicked(&input) {
            self.save_scene();
        }
        if self.buttons.new_dot.is_clicked(&input) {
            self.new_point();
        }
        if self.buttons.remove.is_clicked(&input) {
            self.remove_chosen();
        }
        if self.buttons.reset_all.is_clicked(&input) {
            self.reset_all();
        }

        for slider in &mut self.position_sliders {
            slider.update_bounds(self.max_value);
        }
        self.update_anchors(&input);
        for slider in &mut self.position_sliders {
            slider.update(&input);
        }
        if let Some(id) = self.registry.chosen() {
            let position = self.edited_position();
            self.registry.set_position(id, position);
        }

        self.refresh_points();
    }

    /// Visibility toggles, axis reset, and the scale and angle sliders. They
    /// act only while the pointer is over the graph area.
    fn update_view_controls(&mut self, input: &InputSnapshot) {
        // Polled every frame: leaving the graph area resets a press.
        let hide_graph = self.buttons.hide_graph.is_clicked(input);
        let hide_dots = self.buttons.hide_dots.is_clicked(input);
        let reset_graph = self.buttons.reset_graph.is_clicked(input);
        if !self.layout.is_on_graph_area(&input.position) {
            return;
        }

        if input.down && self.registry.chosen().is_some() {
            self.registry.set_chosen(None);
        }
        if hide_graph {
            self.show_graph = !self.show_graph;
        }
        if hide_dots {
            self.show_points = !self.show_points;
        }
        if reset_graph {
            self.reset_angles();
        }

        self.max_value_slider.update(input);
        let max_value = self.max_value_slider.value();
        if max_value != self.max_value {
            self.max_value = max_value;
            self.registry.set_chosen(None);
        }
        for slider in &mut self.angle_sliders {
            slider.update(input);
        }
    }

    /// Hovering an anchor chooses its point; clicking marks it for a
    /// connection.
    fn update_anchors(&mut self, input: &InputSnapshot) {
        if let Some(id) = self.registry.hovered(&input.position) {
            self.registry.set_chosen(Some(id));
            self.load_position_sliders();
        }
        for id in 0..self.registry.len() {
            if self.registry.poll_anchor(id, input) {
                self.registry.toggle_connection_candidate(id);
            }
        }
    }

    fn load_position_sliders(&mut self) {
        let position = self
            .registry
            .chosen()
            .and_then(|id| self.registry.point(id))
            .map_or(Point3::origin(), |p| p.position);
        for (slider, value) in self.position_sliders.iter_mut().zip(position.iter()) {
            slider.set_value(*value);
        }
    }

    fn refresh_points(&mut self) {
        let angles = self.angles();
        self.axes.set_angles(&angles);
        self.registry.clamp_all(self.max_value);
        self.registry
            .project_all(&self.projection, &angles, self.max_value);
    }

    pub fn reset_angles(&mut self) {
        for (slider, angle) in self
            .angle_sliders
            .iter_mut()
            .zip(self.default_angles.as_array())
        {
            slider.set_value(angle);
        }
    }

    pub fn new_point(&mut self) {
        self.registry.add_point();
        for slider in &mut self.position_sliders {
            slider.set_value(0);
        }
    }

    /// Remove the chosen point, unless it is the only one.
    pub fn remove_chosen(&mut self) {
        if let Some(id) = self.registry.chosen() {
            self.registry.remove_point(id);
        }
    }

    pub fn reset_all(&mut self) {
        self.store.rewind();
        self.reset_angles();
        self.max_value_slider.set_value(self.initial_max_value);
        self.max_value = self.max_value_slider.value();
        for slider in &mut self.position_sliders {
            slider.update_bounds(self.max_value);
            slider.set_value(0);
        }
        self.show_graph = true;
        self.show_points = true;
        self.registry.reset();
        self.status = None;
        self.refresh_points();
    }

    /// The scene as it would be saved right now
    pub fn scene(&self) -> Scene {
        Scene::from_registry(&self.registry, self.angles(), self.max_value)
    }

    /// Replace the current scene. The scale goes through its slider, so it
    /// ends up in range and on a step.
    pub fn apply_scene(&mut self, scene: &Scene) {
        self.max_value_slider.set_value(scene.max_value);
        self.max_value = self.max_value_slider.value();
        for (slider, angle) in self.angle_sliders.iter_mut().zip(scene.angles.as_array()) {
            slider.set_value(angle);
        }
        self.registry.replace(&scene.positions, &scene.connections);
        self.refresh_points();
    }

    pub fn load_next_scene(&mut self) {
        match self.store.load_next() {
            Ok((path, scene)) => {
                self.apply_scene(&scene);
                self.status = Some(format!("Loaded {}", display_name(&path)));
            }
            Err(e) => {
                warn!("could not load scene: {e}");
                self.status = Some(format!("Load failed: {e}"));
            }
        }
    }

    pub fn save_scene(&mut self) {
        match self.store.save(&self.scene()) {
            Ok(path) => self.status = Some(format!("Saved {}", display_name(&path))),
            Err(e) => {
                warn!("could not save scene: {e}");
                self.status = Some(format!("Save failed: {e}"));
            }
        }
    }

    /// Draw the whole frame from current state.
    pub fn render(&self, canvas: &mut dyn Canvas) {
        canvas.clear(palette::BACKGROUND);

        if self.show_graph {
            self.axes.draw(canvas);
        }
        if self.show_points {
            self.draw_points(canvas);
        }
        if self.layout.is_on_graph_area(&self.input.position) {
            self.draw_view_controls(canvas);
        }
        if let Some(status) = &self.status {
            canvas.text(
                status,
                self.layout.status_label,
                TextAlign::MidLeft,
                FontSize::Small,
                palette::EDIT_TEXT,
            );
        }

        canvas.rect(&self.layout.panel, 0.0, palette::PANEL);
        if self.registry.chosen().is_some() {
            self.draw_position_editor(canvas);
        }
        self.buttons.new_dot.draw(canvas, &self.input, None);
        self.buttons.remove.draw(canvas, &self.input, None);
        self.draw_anchors(canvas);
    }

    fn draw_points(&self, canvas: &mut dyn Canvas) {
        let thickness = self.layout.axis_thickness;
        let points = self.registry.points();
        for connection in self.registry.connections() {
            let (a, b) = connection.endpoints();
            canvas.line(points[a].screen, points[b].screen, thickness, palette::DOT);
        }
        for (id, point) in points.iter().enumerate() {
            if !self.registry.is_chosen(id) {
                canvas.circle(point.screen, thickness * 2.0, palette::DOT);
            }
        }
        if let Some(point) = self.registry.chosen().and_then(|id| self.registry.point(id)) {
            canvas.circle(point.screen, thickness * 2.0, palette::DOT_CHOSEN);
        }
    }

    fn draw_view_controls(&self, canvas: &mut dyn Canvas) {
        let input = &self.input;
        self.buttons
            .hide_graph
            .draw(canvas, input, Some(graph_toggle_label(self.show_graph)));
        self.buttons
            .hide_dots
            .draw(canvas, input, Some(dots_toggle_label(self.show_points)));
        self.buttons.reset_graph.draw(canvas, input, None);
        self.buttons.reset_all.draw(canvas, input, None);
        self.buttons.get_input.draw(canvas, input, None);
        self.buttons.save_data.draw(canvas, input, None);

        self.max_value_slider.draw(canvas);
        for slider in &self.angle_sliders {
            slider.draw(canvas);
        }

        canvas.text(
            &max_value_label(self.max_value),
            self.layout.max_value_label,
            TextAlign::Center,
            FontSize::Large,
            palette::VIEW_TEXT,
        );
        let angles = self.angles().as_array();
        for ((name, angle), anchor) in AXIS_NAMES.iter().zip(angles).zip(self.layout.angle_labels) {
            canvas.text(
                &angle_label(name, angle),
                anchor,
                TextAlign::MidRight,
                FontSize::Large,
                palette::VIEW_TEXT,
            );
        }
    }

    fn draw_position_editor(&self, canvas: &mut dyn Canvas) {
        for slider in &self.position_sliders {
            slider.draw(canvas);
        }
        for (name, anchor) in AXIS_NAMES.iter().zip(self.layout.position_captions) {
            canvas.text(
                &format!("{name}:"),
                anchor,
                TextAlign::MidLeft,
                FontSize::Large,
                palette::EDIT_TEXT,
            );
        }
        canvas.text(
            &position_label(&self.edited_position()),
            self.layout.position_label,
            TextAlign::Center,
            FontSize::Large,
            palette::EDIT_TEXT,
        );
    }

    fn draw_anchors(&self, canvas: &mut dyn Canvas) {
        let points = self.registry.points();
        for connection in self.registry.connections() {
            let (a, b) = connection.endpoints();
            canvas.line(
                points[a].anchor().center(),
                points[b].anchor().center(),
                self.layout.axis_thickness,
                palette::EDIT_TEXT,
            );
        }
        for (id, point) in points.iter().enumerate() {
            let colors = if self.registry.is_pending(id) {
                palette::ANCHOR_PENDING
            } else if self.registry.is_chosen(id) {
                palette::ANCHOR_CHOSEN
            } else {
                palette::ANCHOR
            };
            let hovered = point.anchor().contains(&self.input.position);
            canvas.rect(point.anchor(), 0.0, hover_color(colors, hovered));
        }
    }
}

fn display_name(path: &std::path::Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
