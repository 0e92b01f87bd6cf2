use crate::error::GridError;
use crate::grid::{Direction, Grid, Position};
use parking_lot::RwLock;
use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::sync::atomic::{AtomicBool, Ordering as AtomicOrdering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// Grid shared between the renderer, the editors and the search thread
pub type SharedGrid = Arc<RwLock<Grid>>;

/// Neighbour enumeration order: +x, -x, +y, -y.
/// Changing it changes which of several equal-cost paths is found.
pub const NEIGHBOUR_ORDER: [Direction; 4] = [
    Direction::Right,
    Direction::Left,
    Direction::Down,
    Direction::Up,
];

/// A node in the frontier
#[derive(Debug, Clone, Copy)]
struct PathNode {
    position: Position,
    cost: i32,
    estimate: i32,
    /// Insertion sequence, for FIFO tie-breaking
    seq: u64,
}

impl PathNode {
    fn total(&self) -> i32 {
        self.cost + self.estimate
    }
}

impl PartialEq for PathNode {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for PathNode {}

impl PartialOrd for PathNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for PathNode {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering for min-heap (BinaryHeap is max-heap by default)
        other
            .total()
            .cmp(&self.total())
            // Tie-breakers: cheaper cost first, then earlier insertion.
            // Cheaper-first keeps first discovery optimal under visit-on-push.
            .then_with(|| other.cost.cmp(&self.cost))
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// Terminal state of one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    /// Destination reached; path ordered start -> destination
    Found { path: Vec<Position>, expanded: usize },
    /// Frontier exhausted without reaching the destination
    NotFound { expanded: usize },
}

impl SearchOutcome {
    pub fn expanded(&self) -> usize {
        match self {
            SearchOutcome::Found { expanded, .. } | SearchOutcome::NotFound { expanded } => *expanded,
        }
    }

    pub fn path(&self) -> Option<&[Position]> {
        match self {
            SearchOutcome::Found { path, .. } => Some(path),
            SearchOutcome::NotFound { .. } => None,
        }
    }
}

/// Clears the run status when the search thread ends, even on panic
struct RunGuard {
    running: Arc<AtomicBool>,
}

impl Drop for RunGuard {
    fn drop(&mut self) {
        self.running.store(false, AtomicOrdering::Release);
    }
}

/// Handle to a run executing on its own thread
pub struct SearchHandle {
    handle: JoinHandle<SearchOutcome>,
    start: Position,
    destination: Position,
    started: Instant,
}

impl SearchHandle {
    pub fn start(&self) -> Position {
        self.start
    }

    pub fn destination(&self) -> Position {
        self.destination
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    pub fn thread_name(&self) -> Option<&str> {
        self.handle.thread().name()
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// Block until the run completes. `None` if the search thread panicked.
    pub fn join(self) -> Option<SearchOutcome> {
        match self.handle.join() {
            Ok(outcome) => Some(outcome),
            Err(_) => {
                log::error!("search thread panicked");
                None
            }
        }
    }
}

/// Best-first (A*) search over a shared grid with a single-run guard
pub struct SearchEngine {
    running: Arc<AtomicBool>,
    step_delay: Duration,
}

impl SearchEngine {
    pub fn new(step_delay: Duration) -> Self {
        SearchEngine {
            running: Arc::new(AtomicBool::new(false)),
            step_delay,
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.load(AtomicOrdering::Acquire)
    }

    /// Start a run on a new thread.
    ///
    /// The run status flips to running while the grid write lock is held,
    /// so editors that check `is_running` under the same lock can never
    /// interleave with a starting run. Search state left by a previous
    /// run is cleared first.
    pub fn launch(&self, grid: &SharedGrid) -> Result<SearchHandle, GridError> {
        let mut locked = grid.write();
        let (start, dest) = match (locked.start(), locked.destination()) {
            (Some(s), Some(d)) => (s, d),
            _ => return Err(GridError::NotReady),
        };
        if self
            .running
            .compare_exchange(false, true, AtomicOrdering::AcqRel, AtomicOrdering::Acquire)
            .is_err()
        {
            return Err(GridError::Busy);
        }
        let guard = RunGuard {
            running: Arc::clone(&self.running),
        };

        locked.reset();
        locked.mark_visited(start.x, start.y)?;
        drop(locked);

        log::info!(
            "Search started: ({},{}) -> ({},{})",
            start.x,
            start.y,
            dest.x,
            dest.y
        );

        let shared = Arc::clone(grid);
        let step_delay = self.step_delay;
        let spawned = thread::Builder::new().name("search".into()).spawn(move || {
            let _guard = guard;
            let outcome = match run_search(&shared, start, dest, step_delay) {
                Ok(outcome) => outcome,
                Err(e) => {
                    log::error!("Search aborted: {}", e);
                    SearchOutcome::NotFound { expanded: 0 }
                }
            };
            match &outcome {
                SearchOutcome::Found { path, expanded } => log::info!(
                    "Search finished: path of {} steps, {} nodes expanded",
                    path.len().saturating_sub(1),
                    expanded
                ),
                SearchOutcome::NotFound { expanded } => {
                    log::info!("Search finished: no path, {} nodes expanded", expanded)
                }
            }
            outcome
        });
        // A failed spawn drops the closure, and with it the guard
        let handle = spawned.map_err(|e| {
            log::error!("Failed to spawn search thread: {}", e);
            GridError::SpawnFailed
        })?;

        Ok(SearchHandle {
            handle,
            start,
            destination: dest,
            started: Instant::now(),
        })
    }
}

/// Run the search loop. The start cell must already be marked visited.
///
/// Cells are marked visited when they are pushed onto the frontier, not
/// when they are expanded, so a cell is never reopened through a cheaper
/// path found later in the same run.
fn run_search(
    grid: &SharedGrid,
    start: Position,
    dest: Position,
    step_delay: Duration,
) -> Result<SearchOutcome, GridError> {
    let mut frontier = BinaryHeap::new();
    let mut seq = 0u64;
    frontier.push(PathNode {
        position: start,
        cost: 0,
        estimate: start.manhattan(&dest),
        seq,
    });

    let mut expanded = 0;
    let mut reached = false;

    while let Some(node) = frontier.pop() {
        expanded += 1;
        log::trace!(
            "Expanding ({},{}) cost={} f={}",
            node.position.x,
            node.position.y,
            node.cost,
            node.total()
        );

        if node.position == dest {
            reached = true;
            break;
        }

        {
            let mut locked = grid.write();
            for dir in NEIGHBOUR_ORDER {
                let next = node.position.step(dir);
                if !locked.in_range(next.x, next.y) {
                    continue;
                }
                let cell = locked.cell(next.x, next.y)?;
                if cell.visited || !cell.walkable {
                    continue;
                }
                seq += 1;
                frontier.push(PathNode {
                    position: next,
                    cost: node.cost + 1,
                    estimate: next.manhattan(&dest),
                    seq,
                });
                locked.mark_visited(next.x, next.y)?;
                locked.set_parent_direction(next.x, next.y, Some(dir.opposite()))?;
            }
        }

        if !step_delay.is_zero() {
            thread::sleep(step_delay);
        }
    }

    if !reached {
        return Ok(SearchOutcome::NotFound { expanded });
    }

    let mut locked = grid.write();
    let path = locked.reconstruct_path()?;
    locked.mark_path(&path)?;
    Ok(SearchOutcome::Found { path, expanded })
}

/// Format path for display
pub fn format_path(path: &[Position]) -> String {
    if path.is_empty() {
        return "No path".to_string();
    }

    let mut result = String::new();
    for (i, pos) in path.iter().enumerate() {
        if i > 0 {
            result.push_str(" -> ");
        }
        result.push_str(&format!("({},{})", pos.x, pos.y));
    }
    result
}
