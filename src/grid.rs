use std::fmt;
use std::fmt::{Debug, Formatter};
use std::str::FromStr;
use smallvec::SmallVec;

use crate::error::{PlacementError, TemplateError};
use crate::MAX_SLOT_LENGTH;

/// Character used to render (and parse) an empty cell.
pub const EMPTY_MARKER: char = '.';

/// Character used to render (and parse) a blocked cell.
pub const BLOCKED_MARKER: char = '#';

/// Direction that a slot is facing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Direction {
    Across,
    Down,
}

impl Direction {
    /// The (row, col) step taken when moving one cell along this direction.
    fn step(self) -> (isize, isize) {
        match self {
            Direction::Across => (0, 1),
            Direction::Down => (1, 0),
        }
    }
}

/// The contents of a single cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cell {
    Empty,
    Blocked,
    Letter(char),
}

impl Cell {
    pub fn letter(self) -> Option<char> {
        match self {
            Cell::Letter(letter) => Some(letter),
            _ => None,
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Empty => write!(f, "{}", EMPTY_MARKER),
            Cell::Blocked => write!(f, "{}", BLOCKED_MARKER),
            Cell::Letter(letter) => write!(f, "{}", letter),
        }
    }
}

/// A fillable run of cells: where it starts, which way it goes and how long it is. Slots carry no
/// identity beyond these fields, so two slots covering the same cells compare equal.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Slot {
    pub row: usize,
    pub col: usize,
    pub direction: Direction,
    pub length: usize,
}

impl Debug for Slot {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "Slot{{{}, {}, {:?}, {}}}", self.row, self.col, self.direction, self.length)
    }
}

impl Slot {
    pub fn new(row: usize, col: usize, direction: Direction, length: usize) -> Slot {
        Slot { row, col, direction, length }
    }

    /// Coordinates of the cell `index` steps along this slot from its origin. The index may fall
    /// outside the slot (e.g. -1 for the cell just before it), so this can return negative
    /// coordinates.
    pub fn coord_at(&self, index: isize) -> (isize, isize) {
        let (row_step, col_step) = self.direction.step();

        (self.row as isize + row_step * index, self.col as isize + col_step * index)
    }

    /// The cell immediately before the slot's first cell.
    pub fn before(&self) -> (isize, isize) {
        self.coord_at(-1)
    }

    /// The cell immediately after the slot's last cell.
    pub fn after(&self) -> (isize, isize) {
        self.coord_at(self.length as isize)
    }

    /// Generate the (row, col) coords for each cell of this slot.
    pub fn cell_coords(&self) -> impl Iterator<Item=(usize, usize)> + '_ {
        (0..self.length).map(move |idx| match self.direction {
            Direction::Across => (self.row, self.col + idx),
            Direction::Down => (self.row + idx, self.col),
        })
    }

    pub fn contains(&self, row: usize, col: usize) -> bool {
        match self.direction {
            Direction::Across => row == self.row && self.col <= col && col < self.col + self.length,
            Direction::Down => col == self.col && self.row <= row && row < self.row + self.length,
        }
    }

    /// Do the two slots share a cell? Slots facing the same way only meet if they're identical;
    /// otherwise the only candidate is the point where the across slot's row crosses the down
    /// slot's column.
    pub fn meets(&self, other: &Slot) -> bool {
        if self.direction == other.direction {
            return self == other;
        }

        let (row, col) = match self.direction {
            Direction::Across => (self.row, other.col),
            Direction::Down => (other.row, self.col),
        };

        self.contains(row, col) && other.contains(row, col)
    }

    /// The part of this slot covering cells `start..end`.
    pub fn sub_slot(&self, start: usize, end: usize) -> Slot {
        let (row, col) = self.coord_at(start as isize);

        Slot {
            row: row as usize,
            col: col as usize,
            direction: self.direction,
            length: end - start,
        }
    }
}

/// A rectangular board of cells. Grids are cheap to clone, and the solver clones one before every
/// tentative placement rather than undoing writes when it backtracks.
#[derive(Clone, PartialEq, Eq)]
pub struct Grid {
    width: usize,
    height: usize,
    empty_marker: char,
    blocked_marker: char,
    cells: Vec<Cell>,
}

impl Debug for Grid {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Grid")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("cells", &self.rows())
            .finish()
    }
}

impl Grid {
    /// Create an empty grid with the default markers.
    pub fn new(width: usize, height: usize) -> Grid {
        Grid::with_markers(width, height, EMPTY_MARKER, BLOCKED_MARKER)
    }

    /// Create an empty grid that renders with the given markers.
    pub fn with_markers(width: usize, height: usize, empty_marker: char, blocked_marker: char) -> Grid {
        Grid {
            width,
            height,
            empty_marker,
            blocked_marker,
            cells: vec![Cell::Empty; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn empty_marker(&self) -> char {
        self.empty_marker
    }

    pub fn blocked_marker(&self) -> char {
        self.blocked_marker
    }

    pub fn is_valid(&self, row: isize, col: isize) -> bool {
        (0..self.height as isize).contains(&row) && (0..self.width as isize).contains(&col)
    }

    pub fn get(&self, row: usize, col: usize) -> Option<Cell> {
        if row < self.height && col < self.width {
            Some(self.cells[row * self.width + col])
        } else {
            None
        }
    }

    /// Like `get`, but for coordinates that may have stepped off the top or left edge.
    pub fn get_signed(&self, row: isize, col: isize) -> Option<Cell> {
        if self.is_valid(row, col) {
            self.get(row as usize, col as usize)
        } else {
            None
        }
    }

    /// Write a value into a cell. Writing the value a cell already holds is a no-op; writing
    /// anything else over a non-empty cell is a conflict.
    pub fn set(&mut self, row: usize, col: usize, value: Cell) -> Result<(), PlacementError> {
        let existing = self.cell_at(row, col)?;

        if existing != Cell::Empty && existing != value {
            return Err(PlacementError::Conflict { row, col, existing, value });
        }

        self.cells[row * self.width + col] = value;

        Ok(())
    }

    fn cell_at(&self, row: usize, col: usize) -> Result<Cell, PlacementError> {
        self.get(row, col).ok_or(PlacementError::OutOfBounds {
            row,
            col,
            width: self.width,
            height: self.height,
        })
    }

    /// The current contents of each cell along a slot, in slot order. Fails if any part of the
    /// slot lies outside the grid.
    pub fn read(&self, slot: &Slot) -> Result<SmallVec<[Cell; MAX_SLOT_LENGTH]>, PlacementError> {
        slot.cell_coords().map(|(row, col)| self.cell_at(row, col)).collect()
    }

    /// Cells along a run that's known to lie inside the grid.
    fn run_cells(&self, run: &Slot) -> SmallVec<[Cell; MAX_SLOT_LENGTH]> {
        run.cell_coords().map(|(row, col)| self.cells[row * self.width + col]).collect()
    }

    /// Split a single run at its blocked cells, keeping every piece longer than one cell.
    fn split_run(run: &Slot, cells: &[Cell], result: &mut Vec<Slot>) {
        let mut start = 0;

        for (idx, &cell) in cells.iter().enumerate() {
            if cell == Cell::Blocked {
                if idx - start > 1 {
                    result.push(run.sub_slot(start, idx));
                }
                start = idx + 1;
            }
        }

        if run.length - start > 1 {
            result.push(run.sub_slot(start, run.length));
        }
    }

    /// Given a set of runs, return the maximal fillable pieces of each one once blocked cells are
    /// taken into account. Single-cell pieces aren't usable slots and are dropped.
    pub fn slots_of(&self, runs: &[Slot]) -> Result<Vec<Slot>, PlacementError> {
        let mut result = Vec::with_capacity(runs.len());

        for run in runs {
            Grid::split_run(run, &self.read(run)?, &mut result);
        }

        Ok(result)
    }

    /// Every slot in the grid: rows from top to bottom, then columns from left to right.
    pub fn all_slots(&self) -> Vec<Slot> {
        let rows = (0..self.height).map(|row| Slot::new(row, 0, Direction::Across, self.width));
        let cols = (0..self.width).map(|col| Slot::new(0, col, Direction::Down, self.height));
        let mut result = Vec::with_capacity(self.width + self.height);

        for run in rows.chain(cols) {
            Grid::split_run(&run, &self.run_cells(&run), &mut result);
        }

        result
    }

    /// Has every cell belonging to a slot been given a letter?
    pub fn is_filled(&self) -> bool {
        self.all_slots().iter().all(|slot| {
            self.run_cells(slot).iter().all(|cell| cell.letter().is_some())
        })
    }

    fn render_cell(&self, cell: Cell) -> char {
        match cell {
            Cell::Empty => self.empty_marker,
            Cell::Blocked => self.blocked_marker,
            Cell::Letter(letter) => letter,
        }
    }

    /// Render each row as a string using this grid's markers.
    pub fn rows(&self) -> Vec<String> {
        self.cells
            .chunks(self.width.max(1))
            .take(self.height)
            .map(|row| row.iter().map(|&cell| self.render_cell(cell)).collect())
            .collect()
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.rows().join("\n"))
    }
}

/// Parse a grid from a string template, with . representing empty cells, # representing blocks,
/// and letters representing themselves. Blank lines and surrounding whitespace are ignored.
impl FromStr for Grid {
    type Err = TemplateError;

    fn from_str(template: &str) -> Result<Grid, TemplateError> {
        let template: Vec<Vec<char>> = template.lines().filter_map(|line| {
            let line = line.trim();
            if line.is_empty() {
                None
            } else {
                Some(line.chars().collect())
            }
        }).collect();

        let width = template.first().map(|line| line.len()).ok_or(TemplateError::Empty)?;
        let mut grid = Grid::new(width, template.len());

        for (row, line) in template.iter().enumerate() {
            if line.len() != width {
                return Err(TemplateError::RaggedLine {
                    line: row,
                    expected: width,
                    actual: line.len(),
                });
            }

            for (col, &ch) in line.iter().enumerate() {
                grid.cells[row * width + col] = match ch {
                    EMPTY_MARKER => Cell::Empty,
                    BLOCKED_MARKER => Cell::Blocked,
                    letter => Cell::Letter(letter),
                };
            }
        }

        Ok(grid)
    }
}

#[cfg(test)]
mod tests {
    use crate::error::{PlacementError, TemplateError};
    use crate::grid::{Cell, Grid, Slot};
    use crate::grid::Direction::{Across, Down};

    #[test]
    fn test_all_slots_for_open_grid() {
        let grid = Grid::new(4, 3);

        assert_eq!(grid.all_slots(), vec![
            Slot::new(0, 0, Across, 4),
            Slot::new(1, 0, Across, 4),
            Slot::new(2, 0, Across, 4),
            Slot::new(0, 0, Down, 3),
            Slot::new(0, 1, Down, 3),
            Slot::new(0, 2, Down, 3),
            Slot::new(0, 3, Down, 3),
        ]);
    }

    #[test]
    fn test_slots_split_at_blocked_cells() {
        let mut grid = Grid::new(6, 1);
        grid.set(0, 3, Cell::Blocked).unwrap();

        let row = Slot::new(0, 0, Across, 6);
        assert_eq!(grid.slots_of(&[row]).unwrap(), vec![
            Slot::new(0, 0, Across, 3),
            Slot::new(0, 4, Across, 2),
        ]);
    }

    #[test]
    fn test_blocked_cell_near_edge() {
        let row = Slot::new(0, 0, Across, 5);

        let mut grid = Grid::new(5, 1);
        grid.set(0, 0, Cell::Blocked).unwrap();
        assert_eq!(grid.slots_of(&[row]).unwrap(), vec![Slot::new(0, 1, Across, 4)]);

        let mut grid = Grid::new(5, 1);
        grid.set(0, 1, Cell::Blocked).unwrap();
        assert_eq!(grid.slots_of(&[row]).unwrap(), vec![Slot::new(0, 2, Across, 3)]);

        let mut grid = Grid::new(2, 1);
        grid.set(0, 1, Cell::Blocked).unwrap();
        assert_eq!(grid.slots_of(&[Slot::new(0, 0, Across, 2)]).unwrap(), vec![]);
    }

    #[test]
    fn test_set_is_idempotent() {
        let mut grid = Grid::new(3, 3);
        grid.set(1, 1, Cell::Letter('a')).unwrap();
        let before = grid.clone();

        assert_eq!(grid.set(1, 1, Cell::Letter('a')), Ok(()));
        assert_eq!(grid, before);
    }

    #[test]
    fn test_set_conflict_and_bounds() {
        let mut grid = Grid::new(3, 2);
        grid.set(0, 2, Cell::Letter('a')).unwrap();

        assert_eq!(
            grid.set(0, 2, Cell::Letter('b')),
            Err(PlacementError::Conflict {
                row: 0,
                col: 2,
                existing: Cell::Letter('a'),
                value: Cell::Letter('b'),
            })
        );
        assert!(matches!(grid.set(0, 2, Cell::Blocked), Err(PlacementError::Conflict { .. })));
        assert_eq!(
            grid.set(2, 0, Cell::Letter('a')),
            Err(PlacementError::OutOfBounds { row: 2, col: 0, width: 3, height: 2 })
        );

        // A blocked cell can be blocked again, but not given a letter.
        grid.set(1, 1, Cell::Blocked).unwrap();
        assert_eq!(grid.set(1, 1, Cell::Blocked), Ok(()));
        assert!(grid.set(1, 1, Cell::Letter('c')).is_err());
    }

    #[test]
    fn test_read_follows_slot_order() {
        let grid: Grid = "
            ab.
            #c.
            .d#
        ".parse().unwrap();

        let cells = grid.read(&Slot::new(0, 1, Down, 3)).unwrap();
        assert_eq!(cells.as_slice(), &[Cell::Letter('b'), Cell::Letter('c'), Cell::Letter('d')]);

        let cells = grid.read(&Slot::new(0, 0, Across, 3)).unwrap();
        assert_eq!(cells.as_slice(), &[Cell::Letter('a'), Cell::Letter('b'), Cell::Empty]);
    }

    #[test]
    fn test_read_past_edge_is_an_error() {
        let grid = Grid::new(2, 2);

        assert_eq!(
            grid.read(&Slot::new(0, 1, Across, 4)),
            Err(PlacementError::OutOfBounds { row: 0, col: 2, width: 2, height: 2 })
        );
        assert_eq!(
            grid.slots_of(&[Slot::new(1, 0, Down, 2)]),
            Err(PlacementError::OutOfBounds { row: 2, col: 0, width: 2, height: 2 })
        );
        assert_eq!(grid.read(&Slot::new(0, 1, Down, 2)).unwrap().as_slice(), &[Cell::Empty, Cell::Empty]);
    }

    #[test]
    fn test_clone_is_independent() {
        let grid = Grid::new(2, 2);
        let mut copy = grid.clone();
        copy.set(0, 0, Cell::Letter('z')).unwrap();

        assert_eq!(grid.get(0, 0), Some(Cell::Empty));
        assert_eq!(copy.get(0, 0), Some(Cell::Letter('z')));
    }

    #[test]
    fn test_meets() {
        let across = Slot::new(1, 0, Across, 3);
        let down = Slot::new(0, 2, Down, 3);
        let far_down = Slot::new(0, 3, Down, 3);
        let short_down = Slot::new(2, 1, Down, 2);

        assert!(across.meets(&down));
        assert!(down.meets(&across));
        assert!(!across.meets(&far_down));
        assert!(!across.meets(&short_down));
        assert!(across.meets(&across));
        assert!(!across.meets(&Slot::new(2, 0, Across, 3)));
    }

    #[test]
    fn test_template_round_trip_and_errors() {
        let template = "#..\n.a.\n..#";
        let grid: Grid = template.parse().unwrap();

        assert_eq!(grid.width(), 3);
        assert_eq!(grid.height(), 3);
        assert_eq!(grid.get(1, 1), Some(Cell::Letter('a')));
        assert_eq!(grid.to_string(), template);

        assert_eq!("\n  \n".parse::<Grid>(), Err(TemplateError::Empty));
        assert_eq!(
            "...\n..".parse::<Grid>(),
            Err(TemplateError::RaggedLine { line: 1, expected: 3, actual: 2 })
        );
    }

    #[test]
    fn test_custom_markers_render() {
        let mut grid = Grid::with_markers(2, 1, '_', '1');
        grid.set(0, 1, Cell::Blocked).unwrap();

        assert_eq!(grid.rows(), vec!["_1".to_string()]);
        assert_eq!(grid.empty_marker(), '_');
        assert_eq!(grid.blocked_marker(), '1');
    }

    #[test]
    fn test_is_filled() {
        let grid: Grid = "ab\ncd".parse().unwrap();
        assert!(grid.is_filled());

        // The lone empty cell doesn't belong to any slot.
        let grid: Grid = "ab#\n#..".parse().unwrap();
        assert!(!grid.is_filled());
        let grid: Grid = "ab#\n##.".parse().unwrap();
        assert!(grid.is_filled());
    }
}
