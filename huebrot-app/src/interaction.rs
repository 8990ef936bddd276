//! Pointer gesture tracking for one canvas.
//!
//! A press starts a drag, moves update it, and the release is classified
//! as a pick (click) or a zoom (rectangle drag).

use huebrot_core::PixelPos;
use huebrot_render::Selection;

/// A drag counts as a zoom only when it exceeds this many pixels on both axes.
pub const DRAG_THRESHOLD_PX: f64 = 10.0;

/// Raw pointer input for a canvas, in canvas pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Down(PixelPos),
    Move(PixelPos),
    Up(PixelPos),
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum DragState {
    #[default]
    Idle,
    Dragging {
        origin: PixelPos,
        current: PixelPos,
    },
}

/// What a completed gesture asks for.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Gesture {
    /// Release without a qualifying drag, at the release position.
    Pick(PixelPos),
    /// Rectangle between the press and release positions.
    Zoom {
        origin: PixelPos,
        destination: PixelPos,
    },
}

/// `true` when the pointer moved more than `threshold` on *both* axes.
pub fn exceeds_threshold(origin: PixelPos, current: PixelPos, threshold: f64) -> bool {
    (origin.x - current.x).abs() > threshold && (origin.y - current.y).abs() > threshold
}

/// Classify a press/release pair.
pub fn classify(origin: PixelPos, release: PixelPos, threshold: f64) -> Gesture {
    if exceeds_threshold(origin, release, threshold) {
        Gesture::Zoom {
            origin,
            destination: release,
        }
    } else {
        Gesture::Pick(release)
    }
}

/// Tracks the drag state of one canvas.
#[derive(Debug, Clone)]
pub struct InteractionController {
    state: DragState,
    threshold: f64,
}

impl InteractionController {
    pub fn new(threshold: f64) -> Self {
        Self {
            state: DragState::Idle,
            threshold,
        }
    }

    pub fn state(&self) -> DragState {
        self.state
    }

    /// Feed one pointer event. Returns the gesture when a drag ends.
    ///
    /// A release with no press in progress is ignored, and the state is back
    /// to `Idle` after every release.
    pub fn handle(&mut self, event: PointerEvent) -> Option<Gesture> {
        match (event, self.state) {
            (PointerEvent::Down(pos), _) => {
                self.state = DragState::Dragging {
                    origin: pos,
                    current: pos,
                };
                None
            }
            (PointerEvent::Move(pos), DragState::Dragging { origin, .. }) => {
                self.state = DragState::Dragging {
                    origin,
                    current: pos,
                };
                None
            }
            (PointerEvent::Move(_), DragState::Idle) => None,
            (PointerEvent::Up(pos), DragState::Dragging { origin, .. }) => {
                self.state = DragState::Idle;
                Some(classify(origin, pos, self.threshold))
            }
            (PointerEvent::Up(_), DragState::Idle) => None,
        }
    }

    /// Whether the live drag currently qualifies as a zoom.
    pub fn is_dragged(&self) -> bool {
        match self.state {
            DragState::Dragging { origin, current } => {
                exceeds_threshold(origin, current, self.threshold)
            }
            DragState::Idle => false,
        }
    }

    /// The rectangle to shade while a zoom drag is in progress.
    pub fn selection(&self) -> Option<Selection> {
        match self.state {
            DragState::Dragging { origin, current } if self.is_dragged() => {
                Some(Selection::new(origin, current))
            }
            _ => None,
        }
    }

    /// Drop any gesture in progress.
    pub fn cancel(&mut self) {
        self.state = DragState::Idle;
    }
}

impl Default for InteractionController {
    fn default() -> Self {
        Self::new(DRAG_THRESHOLD_PX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: f64, y: f64) -> PixelPos {
        PixelPos::new(x, y)
    }

    #[test]
    fn long_diagonal_drag_is_zoom() {
        assert_eq!(
            classify(p(5.0, 5.0), p(20.0, 20.0), DRAG_THRESHOLD_PX),
            Gesture::Zoom {
                origin: p(5.0, 5.0),
                destination: p(20.0, 20.0)
            }
        );
    }

    #[test]
    fn short_drag_is_pick() {
        assert_eq!(
            classify(p(5.0, 5.0), p(12.0, 12.0), DRAG_THRESHOLD_PX),
            Gesture::Pick(p(12.0, 12.0))
        );
    }

    #[test]
    fn threshold_is_strict() {
        assert!(!exceeds_threshold(p(0.0, 0.0), p(10.0, 10.0), 10.0));
        assert!(exceeds_threshold(p(0.0, 0.0), p(10.5, -10.5), 10.0));
    }

    #[test]
    fn both_axes_must_exceed_threshold() {
        // A long horizontal drag with little vertical travel is still a pick.
        assert_eq!(
            classify(p(5.0, 5.0), p(80.0, 9.0), DRAG_THRESHOLD_PX),
            Gesture::Pick(p(80.0, 9.0))
        );
    }

    #[test]
    fn press_move_release_zoom() {
        let mut c = InteractionController::default();
        assert_eq!(c.handle(PointerEvent::Down(p(5.0, 5.0))), None);
        assert!(!c.is_dragged());
        assert_eq!(c.selection(), None);

        assert_eq!(c.handle(PointerEvent::Move(p(30.0, 40.0))), None);
        assert!(c.is_dragged());
        assert_eq!(
            c.selection(),
            Some(Selection::new(p(5.0, 5.0), p(30.0, 40.0)))
        );

        let gesture = c.handle(PointerEvent::Up(p(20.0, 20.0)));
        assert_eq!(
            gesture,
            Some(Gesture::Zoom {
                origin: p(5.0, 5.0),
                destination: p(20.0, 20.0)
            })
        );
        assert_eq!(c.state(), DragState::Idle);
        assert_eq!(c.selection(), None);
    }

    #[test]
    fn click_is_pick_and_resets() {
        let mut c = InteractionController::default();
        c.handle(PointerEvent::Down(p(50.0, 50.0)));
        let gesture = c.handle(PointerEvent::Up(p(51.0, 49.0)));
        assert_eq!(gesture, Some(Gesture::Pick(p(51.0, 49.0))));
        assert_eq!(c.state(), DragState::Idle);
    }

    #[test]
    fn events_without_press_are_ignored() {
        let mut c = InteractionController::default();
        assert_eq!(c.handle(PointerEvent::Move(p(1.0, 1.0))), None);
        assert_eq!(c.handle(PointerEvent::Up(p(1.0, 1.0))), None);
        assert_eq!(c.state(), DragState::Idle);
    }

    #[test]
    fn second_press_restarts_drag() {
        let mut c = InteractionController::default();
        c.handle(PointerEvent::Down(p(0.0, 0.0)));
        c.handle(PointerEvent::Move(p(90.0, 90.0)));
        c.handle(PointerEvent::Down(p(40.0, 40.0)));
        assert_eq!(
            c.state(),
            DragState::Dragging {
                origin: p(40.0, 40.0),
                current: p(40.0, 40.0)
            }
        );
    }

    #[test]
    fn cancel_drops_drag() {
        let mut c = InteractionController::default();
        c.handle(PointerEvent::Down(p(0.0, 0.0)));
        c.handle(PointerEvent::Move(p(90.0, 90.0)));
        c.cancel();
        assert_eq!(c.selection(), None);
        assert_eq!(c.handle(PointerEvent::Up(p(90.0, 90.0))), None);
    }
}
