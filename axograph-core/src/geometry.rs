/// Screen-space geometry: rectangles, the fixed widget layout, and colours
use nalgebra::Point2;

use crate::canvas::{FontSize, Rgb};

/// Axis-aligned rectangle in surface coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    /// Square of side `size` centred on `center`
    pub fn from_center(center: Point2<f32>, size: f32) -> Self {
        Self::new(center.x - size / 2.0, center.y - size / 2.0, size, size)
    }

    /// Half-open containment test: the right and bottom edges are outside.
    pub fn contains(&self, point: &Point2<f32>) -> bool {
        point.x >= self.x
            && point.x < self.x + self.width
            && point.y >= self.y
            && point.y < self.y + self.height
    }

    pub fn center(&self) -> Point2<f32> {
        Point2::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }
}

/// Horizontal slider bar placement
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SliderTrack {
    pub left: f32,
    pub middle_y: f32,
    pub width: f32,
    pub height: f32,
}

/// Every fixed position on the surface, derived from its width.
#[derive(Debug, Clone)]
pub struct Layout {
    pub width: f32,
    pub height: f32,
    pub graph_side: f32,
    pub graph_center: Point2<f32>,
    pub axis_length: f32,
    pub axis_thickness: f32,
    pub anchor_center: Point2<f32>,
    pub anchor_circle_radius: f32,
    pub anchor_side: f32,
    pub corner_radius: f32,
    pub panel: Rect,

    pub hide_graph: Rect,
    pub hide_dots: Rect,
    pub reset_graph: Rect,
    pub reset_all: Rect,
    pub get_input: Rect,
    pub save_data: Rect,
    pub new_dot: Rect,
    pub remove: Rect,

    pub max_value_track: SliderTrack,
    pub angle_tracks: [SliderTrack; 3],
    pub position_tracks: [SliderTrack; 3],

    pub max_value_label: Point2<f32>,
    pub angle_labels: [Point2<f32>; 3],
    pub position_captions: [Point2<f32>; 3],
    pub position_label: Point2<f32>,
    pub status_label: Point2<f32>,

    width_px: u32,
}

impl Layout {
    pub fn new(width: u32) -> Self {
        let f = |n: u32, d: u32| fraction(width, n, d);
        let point = |x: f32, y: f32| Point2::new(x, y);

        let small_button = |x: f32, y: f32| Rect::new(x, y, f(1, 16), f(1, 32));
        let large_button = |x: f32, y: f32| Rect::new(x, y, f(3, 32), f(1, 32));
        let rows = [f(29, 64), f(31, 64), f(33, 64)];
        let angle_track = |y: f32| SliderTrack {
            left: f(13, 32),
            middle_y: y,
            width: f(1, 8),
            height: f(3, 320),
        };
        let position_track = |y: f32| SliderTrack {
            left: f(49, 64),
            middle_y: y,
            width: f(3, 16),
            height: f(3, 384),
        };

        let graph_side = f(9, 16);

        Self {
            width: width as f32,
            height: graph_side,
            graph_side,
            graph_center: point(f(9, 32), f(9, 32)),
            axis_length: f(1, 4),
            axis_thickness: f(1, 256),
            anchor_center: point(f(25, 32), f(3, 16)),
            anchor_circle_radius: f(9, 64),
            anchor_side: f(1, 64),
            corner_radius: f(1, 128),
            panel: Rect::new(graph_side, 0.0, f(7, 16), graph_side),

            hide_graph: small_button(f(1, 32), f(1, 32)),
            hide_dots: small_button(f(1, 32), f(5, 64)),
            reset_graph: small_button(f(7, 64), f(1, 32)),
            reset_all: small_button(f(25, 64), f(1, 32)),
            get_input: small_button(f(15, 32), f(1, 32)),
            save_data: small_button(f(15, 32), f(5, 64)),
            new_dot: large_button(f(39, 64), f(7, 16)),
            remove: large_button(f(39, 64), f(1, 2)),

            max_value_track: SliderTrack {
                left: f(1, 32),
                middle_y: rows[2],
                width: f(1, 8),
                height: f(3, 320),
            },
            angle_tracks: rows.map(angle_track),
            position_tracks: rows.map(position_track),

            max_value_label: point(f(3, 32), rows[1]),
            angle_labels: rows.map(|y| point(f(25, 64), y)),
            position_captions: rows.map(|y| point(f(47, 64), y)),
            position_label: point(f(55, 64), f(25, 64)),
            status_label: point(f(1, 32), graph_side - f(1, 64)),

            width_px: width,
        }
    }

    /// Whether the pointer is over the graph half of the surface, where
    /// the view controls live.
    pub fn is_on_graph_area(&self, point: &Point2<f32>) -> bool {
        0.0 < point.x
            && point.x < self.graph_side - 1.0
            && 0.0 < point.y
            && point.y < self.graph_side - 1.0
    }

    /// Glyph height for a font size, in surface units
    pub fn font_height(&self, size: FontSize) -> f32 {
        let (n, d) = match size {
            FontSize::Small => (1, 64),
            FontSize::Medium => (3, 128),
            FontSize::Large => (1, 32),
        };
        fraction(self.width_px, n, d)
    }
}

/// `width * n / d`, truncated like integer division
fn fraction(width: u32, n: u32, d: u32) -> f32 {
    (u64::from(width) * u64::from(n) / u64::from(d)) as f32
}

impl Default for Layout {
    fn default() -> Self {
        Self::new(1280)
    }
}

pub mod palette {
    use crate::canvas::Rgb;

    pub const BACKGROUND: Rgb = [191, 191, 191];
    pub const PANEL: Rgb = [127, 127, 127];
    pub const VIEW_BUTTON: (Rgb, Rgb) = ([175, 175, 175], [167, 167, 167]);
    pub const EDIT_BUTTON: (Rgb, Rgb) = ([143, 143, 143], [135, 135, 135]);
    pub const VIEW_TEXT: Rgb = [127, 127, 127];
    pub const EDIT_TEXT: Rgb = [95, 95, 95];
    pub const ANCHOR: (Rgb, Rgb) = ([143, 143, 143], [135, 135, 135]);
    pub const ANCHOR_CHOSEN: (Rgb, Rgb) = ([111, 111, 111], [119, 119, 119]);
    pub const ANCHOR_PENDING: (Rgb, Rgb) = ([79, 79, 79], [87, 87, 87]);
    pub const AXIS: Rgb = [95, 95, 95];
    pub const AXIS_MIN: Rgb = [127, 127, 191];
    pub const AXIS_MAX: Rgb = [191, 127, 127];
    pub const DOT: Rgb = [191, 63, 63];
    pub const DOT_CHOSEN: Rgb = [223, 127, 0];
}

/// Picks the hover variant of a colour pair
pub fn hover_color(colors: (Rgb, Rgb), hovered: bool) -> Rgb {
    if hovered {
        colors.1
    } else {
        colors.0
    }
}
