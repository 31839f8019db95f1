/// Pointer and wheel handling for the globe view
use nalgebra::Point2;

use crate::config::InteractionSettings;
use crate::transform::ModelView;

/// Drag state carried between pointer events
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerState {
    Idle,
    Dragging { last: Point2<f32> },
}

/// Maps pointer drags to rotations and wheel steps to uniform scaling.
///
/// Handlers that change the view replace `transform` with a freshly computed
/// value and return `true`.
#[derive(Debug, Clone)]
pub struct InteractionController {
    state: PointerState,
    settings: InteractionSettings,
}

impl InteractionController {
    pub fn new(settings: InteractionSettings) -> Self {
        Self {
            state: PointerState::Idle,
            settings,
        }
    }

    pub fn state(&self) -> PointerState {
        self.state
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, PointerState::Dragging { .. })
    }

    pub fn pointer_down(&mut self, x: f32, y: f32) {
        log::trace!("drag start at ({}, {})", x, y);
        self.state = PointerState::Dragging {
            last: Point2::new(x, y),
        };
    }

    pub fn pointer_move(&mut self, x: f32, y: f32, transform: &mut ModelView) -> bool {
        let PointerState::Dragging { last } = self.state else {
            return false;
        };

        let current = Point2::new(x, y);
        let delta = current - last;
        let k = self.settings.rotate_sensitivity;

        *transform = transform.rotated_y(delta.x * k).rotated_x(-delta.y * k);
        self.state = PointerState::Dragging { last: current };
        true
    }

    pub fn pointer_up(&mut self) {
        if self.is_dragging() {
            log::trace!("drag end");
        }
        self.state = PointerState::Idle;
    }

    /// Positive deltas zoom out, negative deltas zoom in. Zero is ignored.
    pub fn wheel(&self, delta_y: f32, transform: &mut ModelView) -> bool {
        let factor = if delta_y > 0.0 {
            self.settings.zoom_out_factor
        } else if delta_y < 0.0 {
            self.settings.zoom_in_factor
        } else {
            return false;
        };

        *transform = transform.scaled(factor);
        true
    }
}

impl Default for InteractionController {
    fn default() -> Self {
        Self::new(InteractionSettings::default())
    }
}
