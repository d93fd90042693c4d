//! Pen state machine behind MOVE / LINE records.
//!
//! Legacy 3D files describe the centreline the way a plotter draws it: a
//! MOVE lifts the pen and puts it somewhere, a LINE draws from wherever the
//! pen is. The decoder turns those records into explicit legs through this
//! machine.

/// Centimetre coordinate as stored in the file.
pub type RawPoint = [i32; 3];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PenState {
    #[default]
    Lifted,
    Down { at: RawPoint },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PenEvent {
    MoveTo(RawPoint),
    LineTo(RawPoint),
}

/// Output of one transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Pen repositioned, nothing drawn
    Moved,
    /// A segment was drawn
    Stroke { from: RawPoint, to: RawPoint },
    /// LINE while the pen is lifted
    NoCurrentPoint,
}

#[derive(Debug, Clone, Default)]
pub struct Pen {
    state: PenState,
}

impl Pen {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> PenState {
        self.state
    }

    /// Current point, if the pen has been placed.
    pub fn current(&self) -> Option<RawPoint> {
        match self.state {
            PenState::Lifted => None,
            PenState::Down { at } => Some(at),
        }
    }

    pub fn apply(&mut self, event: PenEvent) -> Transition {
        let (next, transition) = match (self.state, event) {
            (_, PenEvent::MoveTo(at)) => (PenState::Down { at }, Transition::Moved),
            (PenState::Down { at: from }, PenEvent::LineTo(to)) => {
                (PenState::Down { at: to }, Transition::Stroke { from, to })
            }
            (PenState::Lifted, PenEvent::LineTo(_)) => (PenState::Lifted, Transition::NoCurrentPoint),
        };
        self.state = next;
        transition
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_without_move() {
        let mut pen = Pen::new();
        assert_eq!(pen.apply(PenEvent::LineTo([1, 2, 3])), Transition::NoCurrentPoint);
        assert_eq!(pen.state(), PenState::Lifted);
        assert_eq!(pen.current(), None);
    }

    #[test]
    fn test_move_then_lines() {
        let mut pen = Pen::new();
        assert_eq!(pen.apply(PenEvent::MoveTo([0, 0, 0])), Transition::Moved);
        assert_eq!(
            pen.apply(PenEvent::LineTo([100, 0, 0])),
            Transition::Stroke { from: [0, 0, 0], to: [100, 0, 0] }
        );
        assert_eq!(
            pen.apply(PenEvent::LineTo([100, 50, 0])),
            Transition::Stroke { from: [100, 0, 0], to: [100, 50, 0] }
        );
        assert_eq!(pen.current(), Some([100, 50, 0]));
        pen.apply(PenEvent::MoveTo([7, 7, 7]));
        assert_eq!(pen.state(), PenState::Down { at: [7, 7, 7] });
    }
}
