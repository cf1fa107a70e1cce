use crate::error::MoveError;

use super::player::Player;

/// Default number of rows.
pub const ROWS: usize = 6;
/// Default number of columns.
pub const COLS: usize = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cell {
    Empty,
    Player1,
    Player2,
}

impl Cell {
    /// The player occupying this cell, if any
    pub fn owner(self) -> Option<Player> {
        match self {
            Cell::Empty => None,
            Cell::Player1 => Some(Player::One),
            Cell::Player2 => Some(Player::Two),
        }
    }
}

/// A cell coordinate. Row 0 is the top, row `rows - 1` is the bottom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub fn new(row: usize, col: usize) -> Self {
        Position { row, col }
    }
}

/// Scan directions for win detection, in reporting priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Vertical,
    Horizontal,
    /// Bottom-left to top-right (/)
    DiagonalUp,
    /// Top-left to bottom-right (\)
    DiagonalDown,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Vertical,
        Direction::Horizontal,
        Direction::DiagonalUp,
        Direction::DiagonalDown,
    ];

    /// (row, col) step walking forward along the direction.
    pub fn step(self) -> (isize, isize) {
        match self {
            Direction::Vertical => (1, 0),
            Direction::Horizontal => (0, 1),
            Direction::DiagonalUp => (-1, 1),
            Direction::DiagonalDown => (1, 1),
        }
    }
}

/// A completed run of same-player cells.
///
/// `cells` are contiguous along `direction` and ordered from the start of
/// the run: top to bottom for vertical runs, left to right for the rest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WinLine {
    pub player: Player,
    pub direction: Direction,
    pub cells: Vec<Position>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Board {
    rows: usize,
    cols: usize,
    cells: Vec<Cell>,
}

impl Board {
    /// Create a new empty standard 6x7 board
    pub fn new() -> Self {
        Self::with_size(ROWS, COLS)
    }

    /// Create an empty board of the given size.
    ///
    /// # Panics
    ///
    /// Panics if either dimension is zero.
    pub fn with_size(rows: usize, cols: usize) -> Self {
        assert!(rows > 0 && cols > 0, "board dimensions must be non-zero");
        Board {
            rows,
            cols,
            cells: vec![Cell::Empty; rows * cols],
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Get the cell at a specific position
    /// Row 0 is the top, row `rows - 1` is the bottom
    pub fn get(&self, row: usize, col: usize) -> Cell {
        self.cells[row * self.cols + col]
    }

    /// Get the cell at `pos`, or `None` if it lies off the board
    pub fn cell(&self, pos: Position) -> Option<Cell> {
        (pos.row < self.rows && pos.col < self.cols).then(|| self.get(pos.row, pos.col))
    }

    /// Check if a column is full. Out-of-range columns count as full.
    pub fn is_column_full(&self, col: usize) -> bool {
        if col >= self.cols {
            return true;
        }
        self.get(0, col) != Cell::Empty
    }

    /// A drop into `col` is legal iff the column exists and its top cell is empty.
    pub fn is_move_legal(&self, col: usize) -> bool {
        !self.is_column_full(col)
    }

    /// Find where a piece dropped into `col` would land
    pub fn resolve_drop(&self, col: usize) -> Result<Position, MoveError> {
        if col >= self.cols {
            return Err(MoveError::InvalidColumn {
                col,
                cols: self.cols,
            });
        }

        (0..self.rows)
            .rev()
            .find(|&row| self.get(row, col) == Cell::Empty)
            .map(|row| Position { row, col })
            .ok_or(MoveError::ColumnFull { col })
    }

    /// Normalize an arbitrary requested position to its column's drop row.
    pub fn normalize(&self, requested: Position) -> Result<Position, MoveError> {
        self.resolve_drop(requested.col)
    }

    /// Return a copy of the board with `pos` set to `player`.
    ///
    /// Legality is not checked; compose with [`Board::is_move_legal`] and
    /// [`Board::resolve_drop`], or use [`Board::drop_piece`]. An off-board
    /// position yields an unchanged copy.
    pub fn apply_move(&self, pos: Position, player: Player) -> Board {
        let mut next = self.clone();
        if pos.row < self.rows && pos.col < self.cols {
            next.cells[pos.row * self.cols + pos.col] = player.to_cell();
        }
        next
    }

    /// Drop a piece in a column, returning the new board and where it landed
    pub fn drop_piece(&self, col: usize, player: Player) -> Result<(Board, Position), MoveError> {
        let pos = self.resolve_drop(col)?;
        Ok((self.apply_move(pos, player), pos))
    }

    /// Check if the board is completely full
    pub fn is_full(&self) -> bool {
        (0..self.cols).all(|col| self.is_column_full(col))
    }

    /// One resolved drop position per open column, left to right
    pub fn legal_moves(&self) -> Vec<Position> {
        (0..self.cols)
            .filter_map(|col| self.resolve_drop(col).ok())
            .collect()
    }

    /// Check whether the piece at `last_move` completed a run of at least
    /// `win_condition` cells for `player`.
    ///
    /// Directions are tried in [`Direction::ALL`] order and the first one
    /// reaching `win_condition` is reported with its whole maximal run.
    pub fn detect_win(
        &self,
        last_move: Position,
        player: Player,
        win_condition: usize,
    ) -> Option<WinLine> {
        let target = player.to_cell();
        if self.cell(last_move) != Some(target) {
            return None;
        }

        let needed = win_condition.max(1);
        Direction::ALL.into_iter().find_map(|direction| {
            let cells = self.run_through(last_move, direction, target);
            (cells.len() >= needed).then_some(WinLine {
                player,
                direction,
                cells,
            })
        })
    }

    /// Maximal run of `target` cells through `origin` along `direction`.
    fn run_through(&self, origin: Position, direction: Direction, target: Cell) -> Vec<Position> {
        let (dr, dc) = direction.step();

        let mut start = origin;
        while let Some(prev) = self.offset(start, -dr, -dc) {
            if self.get(prev.row, prev.col) != target {
                break;
            }
            start = prev;
        }

        let mut cells = vec![start];
        let mut current = start;
        while let Some(next) = self.offset(current, dr, dc) {
            if self.get(next.row, next.col) != target {
                break;
            }
            cells.push(next);
            current = next;
        }
        cells
    }

    fn offset(&self, pos: Position, dr: isize, dc: isize) -> Option<Position> {
        let row = pos.row.checked_add_signed(dr)?;
        let col = pos.col.checked_add_signed(dc)?;
        (row < self.rows && col < self.cols).then_some(Position { row, col })
    }

    /// Build a board from text rows, top row first. `.` is empty, `1`/`2`
    /// are player pieces.
    #[cfg(test)]
    pub(crate) fn from_rows(rows: &[&str]) -> Board {
        let cols = rows[0].len();
        let mut board = Board::with_size(rows.len(), cols);
        for (r, line) in rows.iter().enumerate() {
            assert_eq!(line.len(), cols, "ragged board row {r}");
            for (c, ch) in line.chars().enumerate() {
                board.cells[r * cols + c] = match ch {
                    '1' => Cell::Player1,
                    '2' => Cell::Player2,
                    _ => Cell::Empty,
                };
            }
        }
        board
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}
