//! Shared state coordinating the editors, the renderer and the search thread.
//!
//! The grid sits behind a reader-writer lock. The run status is only ever
//! raised while the write lock is held, and every topology edit checks it
//! under that same lock, so "is a search running?" and "apply this edit"
//! form a single atomic step.

use crate::action_log::{Action, ActionLog};
use crate::error::GridError;
use crate::grid::{Grid, GridSnapshot, Position};
use crate::pathfinding::{SearchEngine, SearchHandle, SearchOutcome, SharedGrid};
use parking_lot::{Mutex, RwLock};
use std::sync::Arc;
use std::time::Duration;

/// A run in flight plus the action that launched it
struct ActiveRun {
    handle: SearchHandle,
    action: Action,
}

pub struct Session {
    grid: SharedGrid,
    engine: SearchEngine,
    current: Mutex<Option<ActiveRun>>,
    last_outcome: Mutex<Option<SearchOutcome>>,
    actions: Mutex<ActionLog>,
}

impl Session {
    pub fn new(grid: Grid, step_delay: Duration) -> Self {
        Session {
            grid: Arc::new(RwLock::new(grid)),
            engine: SearchEngine::new(step_delay),
            current: Mutex::new(None),
            last_outcome: Mutex::new(None),
            actions: Mutex::new(ActionLog::new()),
        }
    }

    pub fn is_running(&self) -> bool {
        self.engine.is_running()
    }

    /// Apply `f` under the write lock unless a search is running.
    /// Only edits that change the grid are recorded.
    fn edit<T>(
        &self,
        action: Action,
        f: impl FnOnce(&mut Grid) -> Result<T, GridError>,
    ) -> Result<T, GridError> {
        let mut grid = self.grid.write();
        if self.engine.is_running() {
            log::debug!("Rejected {:?}: search running", action);
            return Err(GridError::Busy);
        }
        let before = grid.revision();
        let value = f(&mut grid)?;
        let changed = grid.revision() != before;
        drop(grid);
        if changed {
            log::debug!("Applied {:?}", action);
            self.actions.lock().record(action);
        }
        Ok(value)
    }

    pub fn set_barricade(&self, x: i32, y: i32) -> Result<(), GridError> {
        self.edit(Action::SetBarricade { x, y }, |g| g.set_barricade(x, y))
    }

    pub fn clear_barricade(&self, x: i32, y: i32) -> Result<(), GridError> {
        self.edit(Action::ClearBarricade { x, y }, |g| g.clear_barricade(x, y))
    }

    pub fn clear(&self) -> Result<(), GridError> {
        self.edit(Action::Clear, |g| {
            g.clear();
            Ok(())
        })
    }

    pub fn reset(&self) -> Result<(), GridError> {
        self.edit(Action::Reset, |g| {
            g.reset();
            Ok(())
        })
    }

    pub fn set_start(&self, x: i32, y: i32) -> Result<(), GridError> {
        self.edit(Action::SetStart { x, y }, |g| g.set_start(x, y))
    }

    pub fn set_destination(&self, x: i32, y: i32) -> Result<(), GridError> {
        self.edit(Action::SetDestination { x, y }, |g| g.set_destination(x, y))
    }

    /// Launch a search without blocking.
    ///
    /// Returns `Busy` if a search is already running (the request has no
    /// effect) and `NotReady` if start or destination is unset.
    pub fn run(&self) -> Result<(Position, Position), GridError> {
        let mut current = self.current.lock();
        if let Some(previous) = current.take() {
            // The status clears just before the thread exits; joining then is immediate
            if previous.handle.is_finished() || !self.engine.is_running() {
                self.finish(previous);
            } else {
                *current = Some(previous);
                return Err(GridError::Busy);
            }
        }

        let handle = self.engine.launch(&self.grid)?;
        let (start, dest) = (handle.start(), handle.destination());
        let action = Action::Run {
            from_x: start.x,
            from_y: start.y,
            to_x: dest.x,
            to_y: dest.y,
        };
        self.actions.lock().log_start(action.clone());
        *current = Some(ActiveRun { handle, action });
        Ok((start, dest))
    }

    fn finish(&self, run: ActiveRun) -> Option<SearchOutcome> {
        let elapsed = run.handle.elapsed();
        let name = run.handle.thread_name().unwrap_or("search").to_string();
        let outcome = run.handle.join();
        log::debug!("Thread '{}' joined after {:?}", name, elapsed);
        self.actions.lock().log_finish(run.action);
        if let Some(outcome) = &outcome {
            *self.last_outcome.lock() = Some(outcome.clone());
        }
        outcome
    }

    /// Reap a completed run without blocking
    pub fn poll_finished(&self) -> Option<SearchOutcome> {
        let mut current = self.current.lock();
        match current.take() {
            Some(run) if run.handle.is_finished() => {
                drop(current);
                self.finish(run)
            }
            other => {
                *current = other;
                None
            }
        }
    }

    /// Block until the current run, if any, completes
    pub fn wait(&self) -> Option<SearchOutcome> {
        let run = self.current.lock().take()?;
        self.finish(run)
    }

    /// Outcome of the most recently reaped run
    pub fn last_outcome(&self) -> Option<SearchOutcome> {
        self.last_outcome.lock().clone()
    }

    /// Path through the current grid state, start -> destination
    pub fn path(&self) -> Result<Vec<Position>, GridError> {
        self.grid.read().reconstruct_path()
    }

    pub fn snapshot(&self) -> GridSnapshot {
        self.grid.read().snapshot()
    }

    /// Run `f` against the grid under the read lock
    pub fn read<T>(&self, f: impl FnOnce(&Grid) -> T) -> T {
        f(&self.grid.read())
    }

    pub fn action_summary(&self) -> String {
        self.actions.lock().summary()
    }

    pub fn action_log_text(&self) -> String {
        self.actions.lock().format_with_durations()
    }

    pub fn save_action_log(&self, path: &str) -> Result<(), Box<dyn std::error::Error>> {
        self.actions.lock().save_to_file(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(cols: i32, rows: i32) -> Session {
        Session::new(Grid::new(cols, rows).unwrap(), Duration::ZERO)
    }

    #[test]
    fn test_run_requires_markers() {
        let s = session(3, 3);
        assert_eq!(s.run(), Err(GridError::NotReady));
        s.set_start(0, 0).unwrap();
        assert_eq!(s.run(), Err(GridError::NotReady));
        assert!(!s.is_running());
    }

    #[test]
    fn test_wait_reaps_outcome() {
        let s = session(5, 1);
        s.set_start(0, 0).unwrap();
        s.set_destination(4, 0).unwrap();
        assert_eq!(s.run(), Ok((Position::new(0, 0), Position::new(4, 0))));
        let outcome = s.wait().unwrap();
        assert_eq!(outcome.path().map(|p| p.len()), Some(5));
        assert_eq!(s.last_outcome(), Some(outcome));
        assert!(s.wait().is_none());
        assert!(s.action_summary().contains("Searches completed: 1"));
    }

    #[test]
    fn test_run_accepted_as_soon_as_status_is_idle() {
        let s = session(6, 6);
        s.set_start(0, 0).unwrap();
        s.set_destination(5, 5).unwrap();

        s.run().unwrap();
        for _ in 0..50 {
            while s.is_running() {
                std::hint::spin_loop();
            }
            // The previous thread may not have exited yet
            assert_eq!(s.run(), Ok((Position::new(0, 0), Position::new(5, 5))));
        }
        let outcome = s.wait().unwrap();
        assert_eq!(outcome.path().map(|p| p.len() - 1), Some(10));
        assert!(s.action_summary().contains("Searches completed: 51"));
    }

    #[test]
    fn test_rejected_and_repeated_edits_are_not_logged() {
        let s = session(2, 2);
        assert!(s.set_barricade(5, 5).is_err());
        s.set_barricade(1, 1).unwrap();
        s.set_barricade(1, 1).unwrap();
        assert!(s.action_summary().contains("1 barricaded"));
    }
}
