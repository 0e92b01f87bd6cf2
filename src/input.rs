use crate::error::GridError;
use crate::grid::Position;
use crate::session::Session;

/// Pointer state sampled from the window for one tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerSample {
    /// Pixel coordinates inside the canvas
    pub x: f32,
    pub y: f32,
    /// Barricade button held
    pub fill: bool,
    /// Eraser button held
    pub clear: bool,
}

/// What a tick did to the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// No button held
    Idle,
    Edited(Position),
    /// Edit refused (search running, pointer off-grid, or cell holds a marker)
    Rejected(GridError),
}

/// Translates pointer samples into barricade edits
pub struct InputHandler {
    cell_width: f32,
    cell_height: f32,
}

impl InputHandler {
    pub fn new(cell_width: f32, cell_height: f32) -> Self {
        InputHandler {
            cell_width,
            cell_height,
        }
    }

    /// Cell under a pixel position
    pub fn cell_at(&self, x: f32, y: f32) -> Position {
        Position::new(
            (x / self.cell_width).floor() as i32,
            (y / self.cell_height).floor() as i32,
        )
    }

    /// Apply one sample. Fill wins when both buttons are held.
    pub fn tick(&self, session: &Session, sample: PointerSample) -> TickOutcome {
        if !sample.fill && !sample.clear {
            return TickOutcome::Idle;
        }
        let pos = self.cell_at(sample.x, sample.y);
        let result = if sample.fill {
            session.set_barricade(pos.x, pos.y)
        } else {
            session.clear_barricade(pos.x, pos.y)
        };
        match result {
            Ok(()) => TickOutcome::Edited(pos),
            Err(e) => TickOutcome::Rejected(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Grid;
    use std::time::Duration;

    fn sample(x: f32, y: f32, fill: bool, clear: bool) -> PointerSample {
        PointerSample { x, y, fill, clear }
    }

    #[test]
    fn test_cell_at_floors_pixels() {
        let handler = InputHandler::new(18.0, 18.0);
        assert_eq!(handler.cell_at(0.0, 0.0), Position::new(0, 0));
        assert_eq!(handler.cell_at(17.9, 36.0), Position::new(0, 2));
        assert_eq!(handler.cell_at(-1.0, 5.0), Position::new(-1, 0));
    }

    #[test]
    fn test_fill_then_clear() {
        let session = Session::new(Grid::new(4, 4).unwrap(), Duration::ZERO);
        let handler = InputHandler::new(10.0, 10.0);

        assert_eq!(handler.tick(&session, sample(25.0, 5.0, false, false)), TickOutcome::Idle);
        assert_eq!(
            handler.tick(&session, sample(25.0, 5.0, true, true)),
            TickOutcome::Edited(Position::new(2, 0))
        );
        assert_eq!(session.read(|g| g.is_walkable(2, 0)), Ok(false));

        handler.tick(&session, sample(25.0, 5.0, false, true));
        assert_eq!(session.read(|g| g.is_walkable(2, 0)), Ok(true));
    }

    #[test]
    fn test_off_grid_pointer_is_ignored() {
        let session = Session::new(Grid::new(4, 4).unwrap(), Duration::ZERO);
        let handler = InputHandler::new(10.0, 10.0);
        assert_eq!(
            handler.tick(&session, sample(45.0, 5.0, true, false)),
            TickOutcome::Rejected(GridError::OutOfRange { x: 4, y: 0 })
        );
    }
}
