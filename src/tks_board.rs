// Board and cell model
// Owns mine placement, neighbor counting and the per-cell reveal/flag state machine

use rand::Rng;
use std::collections::VecDeque;
use thiserror::Error;

/// Board coordinate as (row, col)
pub type Pos = (usize, usize);

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoardError {
    #[error("cannot place {requested} mines on a board with {available} cells")]
    TooManyMines { requested: usize, available: usize },
}

/// A single cell on the board
/// Position is fixed at creation, only the flags change during play
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub row: usize,
    pub col: usize,
    pub is_mine: bool,
    pub is_revealed: bool,
    pub is_flagged: bool,
}

impl Cell {
    fn new(row: usize, col: usize) -> Self {
        Cell {
            row,
            col,
            is_mine: false,
            is_revealed: false,
            is_flagged: false,
        }
    }

    fn clear(&mut self) {
        self.is_mine = false;
        self.is_revealed = false;
        self.is_flagged = false;
    }
}

/// Result of a reveal request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reveal {
    /// Cell was already revealed, flagged, or outside the board
    Ignored,
    /// The revealed cell holds a mine
    Mine,
    /// Safe reveal; `opened` counts every cell uncovered, cascade included
    Safe { opened: usize },
}

/// Square grid of cells stored row-major
#[derive(Debug, Clone)]
pub struct Board {
    size: usize,
    cells: Vec<Cell>,
}

impl Board {
    /// Create a `size` x `size` board with no mines
    pub fn new(size: usize) -> Self {
        let mut cells = Vec::with_capacity(size * size);
        for row in 0..size {
            for col in 0..size {
                cells.push(Cell::new(row, col));
            }
        }
        Board { size, cells }
    }

    /// Create a board with mines at exactly the given positions
    #[cfg(test)]
    pub fn with_mines(size: usize, mines: &[Pos]) -> Self {
        let mut board = Board::new(size);
        for &(row, col) in mines {
            let idx = board.index(row, col).expect("mine position outside the board");
            board.cells[idx].is_mine = true;
        }
        board
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn total_cells(&self) -> usize {
        self.cells.len()
    }

    fn index(&self, row: usize, col: usize) -> Option<usize> {
        (row < self.size && col < self.size).then(|| row * self.size + col)
    }

    pub fn cell(&self, (row, col): Pos) -> Option<&Cell> {
        self.index(row, col).map(|i| &self.cells[i])
    }

    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter()
    }

    /// Clear mine, reveal and flag state of every cell
    pub fn reset(&mut self) {
        for cell in self.cells.iter_mut() {
            cell.clear();
        }
    }

    /// Pick `count` distinct cells uniformly at random and mark them as mines
    /// Any previous mine assignment is overwritten
    pub fn place_mines<R: Rng + ?Sized>(&mut self, count: usize, rng: &mut R) -> Result<(), BoardError> {
        let available = self.total_cells();
        if count > available {
            return Err(BoardError::TooManyMines { requested: count, available });
        }
        for cell in self.cells.iter_mut() {
            cell.is_mine = false;
        }
        for idx in rand::seq::index::sample(rng, available, count).into_iter() {
            self.cells[idx].is_mine = true;
        }
        Ok(())
    }

    /// In-bounds positions at Chebyshev distance 1 from `pos`
    pub fn neighbors_of(&self, (row, col): Pos) -> Vec<Pos> {
        let mut out = Vec::with_capacity(8);
        if row >= self.size || col >= self.size {
            return out;
        }
        for r in row.saturating_sub(1)..=(row + 1).min(self.size - 1) {
            for c in col.saturating_sub(1)..=(col + 1).min(self.size - 1) {
                if (r, c) != (row, col) {
                    out.push((r, c));
                }
            }
        }
        out
    }

    /// Number of mines among the neighbors of `pos` (0-8)
    pub fn count_adjacent_mines(&self, pos: Pos) -> u8 {
        self.neighbors_of(pos)
            .into_iter()
            .filter(|&p| self.cell(p).is_some_and(|c| c.is_mine))
            .count() as u8
    }

    /// Reveal a cell, cascading through zero-count regions
    /// Each cell enters the worklist at most once since it is marked revealed on push
    pub fn reveal(&mut self, (row, col): Pos) -> Reveal {
        let Some(idx) = self.index(row, col) else {
            return Reveal::Ignored;
        };
        let cell = &mut self.cells[idx];
        if cell.is_revealed || cell.is_flagged {
            return Reveal::Ignored;
        }
        cell.is_revealed = true;
        if cell.is_mine {
            return Reveal::Mine;
        }

        let mut opened = 1;
        let mut work = VecDeque::from([(row, col)]);
        while let Some(pos) = work.pop_front() {
            if self.count_adjacent_mines(pos) != 0 {
                continue;
            }
            for next in self.neighbors_of(pos) {
                let Some(nidx) = self.index(next.0, next.1) else { continue };
                let n = &mut self.cells[nidx];
                if n.is_revealed || n.is_flagged || n.is_mine {
                    continue;
                }
                n.is_revealed = true;
                opened += 1;
                work.push_back(next);
            }
        }
        Reveal::Safe { opened }
    }

    /// Flip the flag on an unrevealed cell, returning the new flag state
    pub fn toggle_flag(&mut self, (row, col): Pos) -> Option<bool> {
        let idx = self.index(row, col)?;
        let cell = &mut self.cells[idx];
        if cell.is_revealed {
            return None;
        }
        cell.is_flagged = !cell.is_flagged;
        Some(cell.is_flagged)
    }

    pub fn mine_count(&self) -> usize {
        self.cells().filter(|c| c.is_mine).count()
    }

    pub fn flag_count(&self) -> usize {
        self.cells().filter(|c| c.is_flagged).count()
    }

    /// True when every non-mine cell has been revealed; flags are irrelevant
    pub fn all_safe_revealed(&self) -> bool {
        self.cells().all(|c| c.is_mine || c.is_revealed)
    }

    pub fn mine_positions(&self) -> impl Iterator<Item = Pos> + '_ {
        self.cells().filter(|c| c.is_mine).map(|c| (c.row, c.col))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_place_mines_exact_count_without_accumulation() {
        let mut board = Board::new(10);
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..20 {
            board.place_mines(25, &mut rng).unwrap();
            assert_eq!(board.mine_count(), 25);
        }
        board.place_mines(3, &mut rng).unwrap();
        assert_eq!(board.mine_count(), 3);
    }

    #[test]
    fn test_place_mines_full_and_overfull() {
        let mut board = Board::new(3);
        let mut rng = StdRng::seed_from_u64(1);
        board.place_mines(9, &mut rng).unwrap();
        assert_eq!(board.mine_count(), 9);

        board.place_mines(2, &mut rng).unwrap();
        let err = board.place_mines(10, &mut rng).unwrap_err();
        assert_eq!(err, BoardError::TooManyMines { requested: 10, available: 9 });
        // failed placement leaves the previous layout alone
        assert_eq!(board.mine_count(), 2);
    }

    #[test]
    fn test_reset_clears_every_flag() {
        let mut board = Board::with_mines(4, &[(0, 0), (3, 3)]);
        board.toggle_flag((0, 0));
        board.reveal((1, 2));
        board.reset();
        assert!(board.cells().all(|c| !c.is_mine && !c.is_revealed && !c.is_flagged));
        assert_eq!(board.total_cells(), 16);
    }

    #[test]
    fn test_neighbor_counts_by_position() {
        let board = Board::new(10);
        for &corner in &[(0, 0), (0, 9), (9, 0), (9, 9)] {
            assert_eq!(board.neighbors_of(corner).len(), 3);
        }
        for &edge in &[(0, 4), (9, 5), (3, 0), (6, 9)] {
            assert_eq!(board.neighbors_of(edge).len(), 5);
        }
        assert_eq!(board.neighbors_of((4, 4)).len(), 8);
    }

    #[test]
    fn test_neighbors_stay_in_bounds_and_exclude_self() {
        let board = Board::new(5);
        for row in 0..5 {
            for col in 0..5 {
                let ns = board.neighbors_of((row, col));
                assert!(!ns.contains(&(row, col)));
                for (r, c) in ns {
                    assert!(r < 5 && c < 5);
                    assert_eq!(r.abs_diff(row).max(c.abs_diff(col)), 1);
                }
            }
        }
        assert!(board.neighbors_of((5, 0)).is_empty());
    }

    #[test]
    fn test_count_adjacent_mines() {
        let board = Board::with_mines(3, &[(0, 0), (0, 2), (2, 1)]);
        assert_eq!(board.count_adjacent_mines((1, 1)), 3);
        assert_eq!(board.count_adjacent_mines((0, 1)), 2);
        assert_eq!(board.count_adjacent_mines((2, 2)), 1);
        assert_eq!(board.count_adjacent_mines((0, 0)), 0);
    }

    #[test]
    fn test_reveal_cascade_on_empty_board_opens_everything() {
        let mut board = Board::new(10);
        assert_eq!(board.reveal((5, 5)), Reveal::Safe { opened: 100 });
        assert!(board.all_safe_revealed());
        assert_eq!(board.reveal((0, 0)), Reveal::Ignored);
    }

    #[test]
    fn test_reveal_cascade_stops_at_numbered_border() {
        // mine column at col 2 splits the board
        let mines: Vec<Pos> = (0..5).map(|r| (r, 2)).collect();
        let mut board = Board::with_mines(5, &mines);
        assert_eq!(board.reveal((2, 0)), Reveal::Safe { opened: 10 });
        for row in 0..5 {
            assert!(board.cell((row, 0)).unwrap().is_revealed);
            assert!(board.cell((row, 1)).unwrap().is_revealed);
            assert!(!board.cell((row, 3)).unwrap().is_revealed);
            assert!(!board.cell((row, 4)).unwrap().is_revealed);
        }
    }

    #[test]
    fn test_reveal_numbered_cell_does_not_cascade() {
        let mut board = Board::with_mines(3, &[(1, 1)]);
        assert_eq!(board.reveal((0, 0)), Reveal::Safe { opened: 1 });
        assert_eq!(board.cells().filter(|c| c.is_revealed).count(), 1);
    }

    #[test]
    fn test_flag_blocks_reveal_and_cascade() {
        let mut board = Board::new(3);
        assert_eq!(board.toggle_flag((2, 2)), Some(true));
        assert_eq!(board.reveal((2, 2)), Reveal::Ignored);
        assert_eq!(board.reveal((0, 0)), Reveal::Safe { opened: 8 });
        assert!(!board.cell((2, 2)).unwrap().is_revealed);

        assert_eq!(board.toggle_flag((2, 2)), Some(false));
        assert_eq!(board.reveal((2, 2)), Reveal::Safe { opened: 1 });
        assert_eq!(board.toggle_flag((2, 2)), None);
    }

    #[test]
    fn test_reveal_mine() {
        let mut board = Board::with_mines(2, &[(1, 0)]);
        assert_eq!(board.reveal((1, 0)), Reveal::Mine);
        assert!(board.cell((1, 0)).unwrap().is_revealed);
        assert_eq!(board.cells().filter(|c| c.is_revealed).count(), 1);
    }

    #[test]
    fn test_out_of_bounds_positions() {
        let mut board = Board::new(2);
        assert_eq!(board.reveal((2, 0)), Reveal::Ignored);
        assert_eq!(board.toggle_flag((0, 7)), None);
        assert!(board.cell((2, 2)).is_none());
    }

    #[test]
    #[should_panic(expected = "outside the board")]
    fn test_layout_outside_board_is_rejected() {
        Board::with_mines(2, &[(0, 2)]);
    }
}
