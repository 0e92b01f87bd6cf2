use crate::error::GridError;

/// A position on the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Position { x, y }
    }

    /// Manhattan distance, the only admissible estimate for 4-way unit moves
    pub fn manhattan(&self, other: &Position) -> i32 {
        (self.x - other.x).abs() + (self.y - other.y).abs()
    }

    /// Neighbouring position one step in `dir`
    pub fn step(&self, dir: Direction) -> Position {
        let (dx, dy) = dir.offset();
        Position::new(self.x + dx, self.y + dy)
    }
}

/// Axis-aligned direction. `Up` is toward y - 1 (screen coordinates).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub fn offset(self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }

    pub fn opposite(self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }
}

/// Per-cell state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    /// false means barricade
    pub walkable: bool,
    pub visited: bool,
    /// Where the cell that discovered this one lies
    pub parent: Option<Direction>,
    /// Part of the last reconstructed path
    pub on_path: bool,
}

impl Default for Cell {
    fn default() -> Self {
        Cell {
            walkable: true,
            visited: false,
            parent: None,
            on_path: false,
        }
    }
}

/// Grid structure holding topology, search state and the start/destination markers
#[derive(Clone, Debug)]
pub struct Grid {
    pub rows: i32,
    pub cols: i32,
    cells: Vec<Cell>,
    start: Option<Position>,
    destination: Option<Position>,
    /// Revision number - incremented whenever topology or markers change
    revision: u64,
}

impl Grid {
    /// Create a new grid with every cell walkable
    pub fn new(cols: i32, rows: i32) -> Result<Self, GridError> {
        if cols <= 0 || rows <= 0 {
            return Err(GridError::EmptyDimensions { cols, rows });
        }
        let count = cols
            .checked_mul(rows)
            .ok_or(GridError::TooLarge { cols, rows })?;
        Ok(Grid {
            rows,
            cols,
            cells: vec![Cell::default(); count as usize],
            start: None,
            destination: None,
            revision: 0,
        })
    }

    /// Create a grid with specific barricaded cells (given as cell IDs)
    pub fn with_blocked(cols: i32, rows: i32, blocked: &[i32]) -> Result<Self, GridError> {
        let mut grid = Self::new(cols, rows)?;
        for &cell_id in blocked {
            let (x, y) = grid.get_coords(cell_id);
            grid.set_barricade(x, y)?;
        }
        Ok(grid)
    }

    pub fn in_range(&self, x: i32, y: i32) -> bool {
        x >= 0 && x < self.cols && y >= 0 && y < self.rows
    }

    /// Convert (x, y) coordinates to cell ID
    pub fn get_id(&self, x: i32, y: i32) -> i32 {
        x + y * self.cols
    }

    /// Convert cell ID to (x, y) coordinates
    pub fn get_coords(&self, id: i32) -> (i32, i32) {
        (id % self.cols, id / self.cols)
    }

    fn index(&self, x: i32, y: i32) -> Result<usize, GridError> {
        if !self.in_range(x, y) {
            return Err(GridError::OutOfRange { x, y });
        }
        Ok(self.get_id(x, y) as usize)
    }

    pub fn cell(&self, x: i32, y: i32) -> Result<Cell, GridError> {
        let idx = self.index(x, y)?;
        Ok(self.cells[idx])
    }

    pub fn is_walkable(&self, x: i32, y: i32) -> Result<bool, GridError> {
        Ok(self.cell(x, y)?.walkable)
    }

    pub fn is_visited(&self, x: i32, y: i32) -> Result<bool, GridError> {
        Ok(self.cell(x, y)?.visited)
    }

    pub fn parent_direction(&self, x: i32, y: i32) -> Result<Option<Direction>, GridError> {
        Ok(self.cell(x, y)?.parent)
    }

    /// Search-engine mutator
    pub fn mark_visited(&mut self, x: i32, y: i32) -> Result<(), GridError> {
        let idx = self.index(x, y)?;
        self.cells[idx].visited = true;
        Ok(())
    }

    /// Search-engine mutator
    pub fn set_parent_direction(
        &mut self,
        x: i32,
        y: i32,
        dir: Option<Direction>,
    ) -> Result<(), GridError> {
        let idx = self.index(x, y)?;
        self.cells[idx].parent = dir;
        Ok(())
    }

    /// Turn a cell into a barricade. Idempotent.
    ///
    /// The start and destination cells cannot be barricaded; doing so
    /// returns `Blocked` and leaves the cell untouched.
    pub fn set_barricade(&mut self, x: i32, y: i32) -> Result<(), GridError> {
        let idx = self.index(x, y)?;
        let pos = Position::new(x, y);
        if self.start == Some(pos) || self.destination == Some(pos) {
            return Err(GridError::Blocked { x, y });
        }
        if self.cells[idx].walkable {
            self.cells[idx].walkable = false;
            self.revision += 1;
        }
        Ok(())
    }

    /// Remove a barricade. Idempotent.
    pub fn clear_barricade(&mut self, x: i32, y: i32) -> Result<(), GridError> {
        let idx = self.index(x, y)?;
        if !self.cells[idx].walkable {
            self.cells[idx].walkable = true;
            self.revision += 1;
        }
        Ok(())
    }

    /// Check coordinates for a start/destination marker: range first, then walkability
    fn check_marker(&self, x: i32, y: i32) -> Result<Position, GridError> {
        if !self.is_walkable(x, y)? {
            return Err(GridError::Blocked { x, y });
        }
        Ok(Position::new(x, y))
    }

    pub fn set_start(&mut self, x: i32, y: i32) -> Result<(), GridError> {
        let pos = self.check_marker(x, y)?;
        self.start = Some(pos);
        self.revision += 1;
        Ok(())
    }

    pub fn set_destination(&mut self, x: i32, y: i32) -> Result<(), GridError> {
        let pos = self.check_marker(x, y)?;
        self.destination = Some(pos);
        self.revision += 1;
        Ok(())
    }

    pub fn start(&self) -> Option<Position> {
        self.start
    }

    pub fn destination(&self) -> Option<Position> {
        self.destination
    }

    pub fn is_ready_to_run(&self) -> bool {
        self.start.is_some() && self.destination.is_some()
    }

    /// Remove every barricade. Search state and markers are untouched.
    pub fn clear(&mut self) {
        for cell in &mut self.cells {
            cell.walkable = true;
        }
        self.revision += 1;
    }

    /// Forget visitation, parent links and the highlighted path.
    /// Barricades and markers are untouched.
    pub fn reset(&mut self) {
        for cell in &mut self.cells {
            cell.visited = false;
            cell.parent = None;
            cell.on_path = false;
        }
        self.revision += 1;
    }

    /// Walk parent links from the destination back to the start.
    ///
    /// The returned path is ordered start -> destination. Fails with
    /// `NotFound` if the destination was never reached or the parent
    /// chain does not lead back to the start.
    pub fn reconstruct_path(&self) -> Result<Vec<Position>, GridError> {
        let (start, dest) = match (self.start, self.destination) {
            (Some(s), Some(d)) => (s, d),
            _ => return Err(GridError::NotFound),
        };

        let mut path = vec![dest];
        let mut current = dest;
        let limit = self.cells.len();

        while current != start {
            let cell = self.cell(current.x, current.y)?;
            let parent = match (cell.visited, cell.parent) {
                (true, Some(dir)) => dir,
                _ => return Err(GridError::NotFound),
            };
            current = current.step(parent);
            if !self.in_range(current.x, current.y) || path.len() >= limit {
                return Err(GridError::NotFound);
            }
            path.push(current);
        }

        path.reverse();
        Ok(path)
    }

    /// Highlight a path
    pub fn mark_path(&mut self, path: &[Position]) -> Result<(), GridError> {
        for pos in path {
            let idx = self.index(pos.x, pos.y)?;
            self.cells[idx].on_path = true;
        }
        self.revision += 1;
        Ok(())
    }

    /// Get current grid revision number
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Number of visited cells
    pub fn visited_count(&self) -> usize {
        self.cells.iter().filter(|c| c.visited).count()
    }

    /// Read-only copy of what a renderer needs
    pub fn snapshot(&self) -> GridSnapshot {
        let mut cells = Vec::with_capacity(self.cells.len());
        for y in 0..self.rows {
            for x in 0..self.cols {
                let pos = Position::new(x, y);
                let cell = self.cells[self.get_id(x, y) as usize];
                let kind = if self.start == Some(pos) {
                    CellKind::Start
                } else if self.destination == Some(pos) {
                    CellKind::Destination
                } else if !cell.walkable {
                    CellKind::Barricade
                } else if cell.on_path {
                    CellKind::Path
                } else if cell.visited {
                    CellKind::Visited
                } else {
                    CellKind::Free
                };
                cells.push(kind);
            }
        }
        GridSnapshot {
            cols: self.cols,
            rows: self.rows,
            revision: self.revision,
            cells,
        }
    }
}

/// What a cell looks like to the renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellKind {
    Free,
    Barricade,
    Visited,
    Path,
    Start,
    Destination,
}

impl CellKind {
    pub fn symbol(self) -> char {
        match self {
            CellKind::Free => '□',
            CellKind::Barricade => '■',
            CellKind::Visited => 'o',
            CellKind::Path => '*',
            CellKind::Start => 's',
            CellKind::Destination => 'd',
        }
    }
}

/// Consistent view of the grid taken under a single read lock
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridSnapshot {
    pub cols: i32,
    pub rows: i32,
    pub revision: u64,
    pub cells: Vec<CellKind>,
}

impl GridSnapshot {
    pub fn kind_at(&self, x: i32, y: i32) -> Option<CellKind> {
        if x < 0 || x >= self.cols || y < 0 || y >= self.rows {
            return None;
        }
        self.cells.get((x + y * self.cols) as usize).copied()
    }

    /// One line per row, using `CellKind::symbol`
    pub fn to_ascii(&self) -> String {
        let mut result = String::new();
        for y in 0..self.rows {
            for x in 0..self.cols {
                let kind = self.cells[(x + y * self.cols) as usize];
                result.push(kind.symbol());
            }
            result.push('\n');
        }
        result
    }
}
