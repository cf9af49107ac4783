// Game controller
// Runs rounds on a fixed board, dispatches clicks and decides win/loss

use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::tks_board::{Board, Pos, Reveal};
use crate::tks_config::GameConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameState {
    InProgress,
    Won,
    Lost,
}

/// Round outcome reported to the presentation layer, once per round
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Won,
    Lost,
}

/// How a single cell should be drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellView {
    Hidden,
    Flagged,
    RevealedBlank,
    RevealedNumber(u8),
    RevealedMine,
    /// The mine that ended the round
    RevealedMineHighlighted,
}

pub struct Game {
    board: Board,
    mines: usize,
    state: GameState,
    detonated: Option<Pos>,
    rng: StdRng,
}

impl Game {
    /// Create the board for `config` and start the first round
    pub fn new(config: GameConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let mut game = Game {
            board: Board::new(config.size),
            mines: config.mines,
            state: GameState::InProgress,
            detonated: None,
            rng,
        };
        game.new_game();
        game
    }

    /// Play on a prepared board; mines stay where they are until `new_game`
    #[cfg(test)]
    pub fn with_board(board: Board, seed: u64) -> Self {
        let mines = board.mine_count();
        Game {
            board,
            mines,
            state: GameState::InProgress,
            detonated: None,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Reset every cell and lay out a fresh set of mines
    pub fn new_game(&mut self) {
        self.state = GameState::InProgress;
        self.detonated = None;
        self.board.reset();
        // GameConfig guarantees mines < size², so placement cannot fail
        if let Err(e) = self.board.place_mines(self.mines, &mut self.rng) {
            log::error!("mine placement failed: {}", e);
        }
        log::info!(
            "new round on {0}x{0} board with {1} mines",
            self.board.size(),
            self.board.mine_count()
        );
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn size(&self) -> usize {
        self.board.size()
    }

    /// Mine counter for the status bar; negative when over-flagged
    pub fn mines_remaining(&self) -> isize {
        self.mines as isize - self.board.flag_count() as isize
    }

    #[cfg(test)]
    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn on_left_click(&mut self, pos: Pos) -> Option<Outcome> {
        if self.state != GameState::InProgress {
            return None;
        }
        match self.board.reveal(pos) {
            Reveal::Ignored => None,
            Reveal::Mine => {
                self.state = GameState::Lost;
                self.detonated = Some(pos);
                log::info!("mine hit at {:?}, round lost", pos);
                log::debug!("mines: {:?}", self.board.mine_positions().collect::<Vec<_>>());
                Some(Outcome::Lost)
            }
            Reveal::Safe { opened } => {
                log::debug!("revealed {} cell(s) from {:?}", opened, pos);
                self.check_win_condition()
            }
        }
    }

    pub fn on_right_click(&mut self, pos: Pos) -> Option<Outcome> {
        if self.state != GameState::InProgress {
            return None;
        }
        if let Some(flagged) = self.board.toggle_flag(pos) {
            log::debug!("flag at {:?} set to {}", pos, flagged);
        }
        None
    }

    /// Win once every safe cell is open; flags are not required
    pub fn check_win_condition(&mut self) -> Option<Outcome> {
        if self.state != GameState::InProgress || !self.board.all_safe_revealed() {
            return None;
        }
        self.state = GameState::Won;
        log::info!("all safe cells revealed, round won");
        Some(Outcome::Won)
    }

    pub fn view(&self, pos: Pos) -> CellView {
        let Some(cell) = self.board.cell(pos) else {
            return CellView::Hidden;
        };
        if cell.is_mine && self.state == GameState::Lost {
            return if self.detonated == Some(pos) {
                CellView::RevealedMineHighlighted
            } else {
                CellView::RevealedMine
            };
        }
        if cell.is_flagged {
            return CellView::Flagged;
        }
        if !cell.is_revealed {
            return CellView::Hidden;
        }
        if cell.is_mine {
            return CellView::RevealedMine;
        }
        match self.board.count_adjacent_mines(pos) {
            0 => CellView::RevealedBlank,
            n => CellView::RevealedNumber(n),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn game_with_mines(size: usize, mines: &[Pos]) -> Game {
        Game::with_board(Board::with_mines(size, mines), 0)
    }

    fn all_positions(size: usize) -> Vec<Pos> {
        (0..size).flat_map(|r| (0..size).map(move |c| (r, c))).collect()
    }

    #[test]
    fn test_new_game_places_configured_mines() {
        let mut game = Game::new(GameConfig { size: 10, mines: 25, seed: Some(42) });
        assert_eq!(game.board().mine_count(), 25);
        assert_eq!(game.state(), GameState::InProgress);
        for _ in 0..5 {
            game.new_game();
            assert_eq!(game.board().mine_count(), 25);
            assert!(game.board().cells().all(|c| !c.is_revealed && !c.is_flagged));
        }
    }

    #[test]
    fn test_seeded_rounds_are_reproducible() {
        let cfg = GameConfig { size: 8, mines: 10, seed: Some(99) };
        let a: Vec<Pos> = Game::new(cfg).board().mine_positions().collect();
        let b: Vec<Pos> = Game::new(cfg).board().mine_positions().collect();
        assert_eq!(a, b);
    }

    #[test]
    fn test_three_by_three_scenario() {
        let mut game = game_with_mines(3, &[(1, 1)]);
        assert_eq!(game.on_left_click((0, 0)), None);
        assert_eq!(game.view((0, 0)), CellView::RevealedNumber(1));
        assert_eq!(game.state(), GameState::InProgress);

        assert_eq!(game.on_left_click((2, 2)), None);
        assert_eq!(game.view((2, 2)), CellView::RevealedNumber(1));
        assert_eq!(game.board().cells().filter(|c| c.is_revealed).count(), 2);

        let rest = [(0, 1), (0, 2), (1, 0), (1, 2), (2, 0)];
        for &p in &rest {
            assert_eq!(game.on_left_click(p), None);
        }
        assert_eq!(game.on_left_click((2, 1)), Some(Outcome::Won));
        assert_eq!(game.state(), GameState::Won);
        for p in all_positions(3) {
            if p != (1, 1) {
                assert_eq!(game.view(p), CellView::RevealedNumber(1));
            }
        }
        assert_eq!(game.view((1, 1)), CellView::Hidden);
    }

    #[test]
    fn test_zero_mine_board_wins_on_first_click() {
        let mut game = Game::new(GameConfig { size: 6, mines: 0, seed: Some(3) });
        assert_eq!(game.on_left_click((3, 3)), Some(Outcome::Won));
        for p in all_positions(6) {
            assert_eq!(game.view(p), CellView::RevealedBlank);
        }
    }

    #[test]
    fn test_win_ignores_flags() {
        let mut game = game_with_mines(2, &[(0, 0)]);
        // wrong flag on a safe cell must not block the win once it is cleared
        game.on_right_click((1, 1));
        assert_eq!(game.on_left_click((1, 1)), None);
        game.on_right_click((1, 1));
        game.on_left_click((0, 1));
        game.on_left_click((1, 0));
        assert_eq!(game.on_left_click((1, 1)), Some(Outcome::Won));
        assert_eq!(game.board().flag_count(), 0);
    }

    #[test]
    fn test_loss_reveals_every_mine() {
        let mines = [(0, 0), (2, 3), (3, 1)];
        let mut game = game_with_mines(4, &mines);
        game.on_right_click((3, 1));
        game.on_right_click((1, 1));
        assert_eq!(game.on_left_click((2, 3)), Some(Outcome::Lost));
        assert_eq!(game.state(), GameState::Lost);

        assert_eq!(game.view((2, 3)), CellView::RevealedMineHighlighted);
        assert_eq!(game.view((0, 0)), CellView::RevealedMine);
        assert_eq!(game.view((3, 1)), CellView::RevealedMine);
        // a flag on a safe cell stays a flag
        assert_eq!(game.view((1, 1)), CellView::Flagged);
        assert_eq!(game.view((0, 3)), CellView::Hidden);
    }

    #[test]
    fn test_actions_frozen_after_round_ends() {
        let mut game = game_with_mines(3, &[(0, 0)]);
        game.on_left_click((0, 0));
        assert_eq!(game.on_left_click((2, 2)), None);
        assert_eq!(game.on_right_click((2, 1)), None);
        assert!(!game.board().cell((2, 2)).unwrap().is_revealed);
        assert!(!game.board().cell((2, 1)).unwrap().is_flagged);
        assert_eq!(game.check_win_condition(), None);

        game.new_game();
        assert_eq!(game.state(), GameState::InProgress);
        assert_eq!(game.board().mine_count(), 1);
        assert!(all_positions(3).into_iter().all(|p| game.view(p) != CellView::RevealedMineHighlighted));
    }

    #[test]
    fn test_clicks_on_flagged_or_revealed_cells_are_ignored() {
        let mut game = game_with_mines(3, &[(0, 0)]);
        game.on_right_click((0, 0));
        assert_eq!(game.on_left_click((0, 0)), None);
        assert_eq!(game.state(), GameState::InProgress);
        assert_eq!(game.view((0, 0)), CellView::Flagged);
        assert_eq!(game.mines_remaining(), 0);

        game.on_left_click((2, 2));
        assert_eq!(game.on_right_click((2, 2)), None);
        assert_eq!(game.view((2, 2)), CellView::RevealedBlank);
    }

    #[test]
    fn test_mines_remaining_can_go_negative() {
        let mut game = game_with_mines(3, &[(0, 0)]);
        game.on_right_click((1, 1));
        game.on_right_click((2, 2));
        assert_eq!(game.mines_remaining(), -1);
    }
}
