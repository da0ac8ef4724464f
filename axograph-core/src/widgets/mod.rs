/// Reusable polled controls
pub mod button;
pub mod press;
pub mod slider;

pub use button::Button;
pub use press::{PressState, PressTracker};
pub use slider::Slider;
