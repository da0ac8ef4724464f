/// Click detection shared by buttons and point anchors
use crate::canvas::InputSnapshot;
use crate::geometry::Rect;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PressState {
    #[default]
    Idle,
    Hovered,
    /// Pressed inside the bounds and still held there
    Armed,
}

/// Fires on release when the press started inside the bounds and the
/// pointer never left them while the button was held.
#[derive(Debug, Clone, Default)]
pub struct PressTracker {
    state: PressState,
}

impl PressTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> PressState {
        self.state
    }

    /// Advance with this frame's input; returns true on the frame the click
    /// completes.
    pub fn poll(&mut self, bounds: &Rect, input: &InputSnapshot) -> bool {
        let inside = bounds.contains(&input.position);
        let (state, fired) = match (self.state, inside) {
            // Leaving the bounds discards a pending press.
            (_, false) => (PressState::Idle, false),
            (PressState::Armed, true) if input.down => (PressState::Armed, false),
            (PressState::Armed, true) => (PressState::Hovered, true),
            (_, true) if input.just_pressed() => (PressState::Armed, false),
            (_, true) => (PressState::Hovered, false),
        };
        self.state = state;
        fired
    }
}
