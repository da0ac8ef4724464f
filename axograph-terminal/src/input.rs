/// Terminal mouse events folded into one pointer snapshot per frame
use axograph_core::InputSnapshot;
use crossterm::event::{MouseButton, MouseEvent, MouseEventKind};
use nalgebra::Point2;

use crate::renderer::CellCanvas;

#[derive(Debug)]
pub struct PointerTracker {
    position: Point2<f32>,
    down: bool,
    /// Release seen in the same frame as its press; applied next frame
    deferred_release: bool,
    last: InputSnapshot,
}

impl PointerTracker {
    pub fn new() -> Self {
        Self {
            position: Point2::origin(),
            down: false,
            deferred_release: false,
            last: InputSnapshot::default(),
        }
    }

    pub fn handle(&mut self, event: &MouseEvent, canvas: &CellCanvas) {
        self.position = canvas.to_surface(event.column, event.row);
        match event.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                self.down = true;
                self.deferred_release = false;
            }
            MouseEventKind::Up(MouseButton::Left) => {
                if self.down && !self.last.down {
                    // The press has not been reported yet.
                    self.deferred_release = true;
                } else {
                    self.down = false;
                }
            }
            _ => {}
        }
    }

    /// The state for this frame
    pub fn snapshot(&mut self) -> InputSnapshot {
        let snapshot = self.last.next(self.position, self.down);
        self.last = snapshot;
        if self.deferred_release {
            self.down = false;
            self.deferred_release = false;
        }
        snapshot
    }
}

impl Default for PointerTracker {
    fn default() -> Self {
        Self::new()
    }
}
