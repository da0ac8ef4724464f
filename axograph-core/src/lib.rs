/// Axograph Core Library - axonometric point graph model
///
/// This library holds everything that does not depend on a particular
/// screen: the per-axis projection, the axis guides, the point and
/// connection registry, the button and slider widgets, scene CSV I/O,
/// and the per-frame application state that ties them together.

pub mod app;
pub mod axis;
pub mod canvas;
pub mod error;
pub mod geometry;
pub mod projection;
pub mod registry;
pub mod scene;
pub mod settings;
pub mod widgets;

// Re-export commonly used types
pub use app::ApplicationState;
pub use axis::{Axis, AxisAngles, AxisSet};
pub use canvas::{Canvas, FontSize, InputSnapshot, Rgb, TextAlign};
pub use error::{Error, Result};
pub use geometry::{Layout, Rect};
pub use projection::{project, Projection};
pub use registry::{Connection, ConnectionChange, PointId, Registry};
pub use scene::{Scene, SceneStore};
pub use settings::Settings;
pub use widgets::{Button, Slider};
