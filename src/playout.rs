//! Monte Carlo playouts (random game simulation).
//!
//! A playout plays uniformly random legal moves, alternating colours, until
//! both sides pass in a row, then scores the final position with area
//! scoring. Points that are true eyes of the side to move are never
//! candidates, so a side with nothing left but its own eyes passes and the
//! game can end.

use fastrand::Rng;

use crate::board::{Board, Move};
use crate::color::Color;
use crate::constants::MAX_GAME_LEN_FACTOR;
use crate::coord::Point;

/// Result of a finished game.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    BlackWin,
    WhiteWin,
    Jigo,
}

impl Outcome {
    /// True if `color` won.
    pub fn is_win_for(self, color: Color) -> bool {
        matches!(
            (self, color),
            (Outcome::BlackWin, Color::Black) | (Outcome::WhiteWin, Color::White)
        )
    }
}

/// Number of blind draws from the legal index before falling back to a scan.
const SAMPLE_TRIES: usize = 8;

/// Pick a uniformly random legal move for `color` that doesn't fill one of
/// its own true eyes.
pub fn choose_random_move(board: &Board, color: Color, rng: &mut Rng) -> Option<Point> {
    let legal = board.legal_moves(color);
    if legal.is_empty() {
        return None;
    }
    for _ in 0..SAMPLE_TRIES {
        let p = legal.get(rng.usize(..legal.len()));
        if !board.is_true_eye(p, color) {
            return Some(p);
        }
    }
    let candidates: Vec<Point> = legal
        .iter()
        .filter(|&p| !board.is_true_eye(p, color))
        .collect();
    (!candidates.is_empty()).then(|| candidates[rng.usize(..candidates.len())])
}

/// Play a random move for `color` as chosen by [`choose_random_move`], or
/// pass if there is none.
pub fn play_random_move(board: &mut Board, color: Color, rng: &mut Rng) -> Move {
    let Some(p) = choose_random_move(board, color, rng) else {
        board.play_pass(color);
        return Move::Pass;
    };
    match board.play_at(p, color) {
        Ok(()) => Move::Play(p),
        // The legal index never holds illegal fields; fall back to a pass
        // rather than abort a whole rollout.
        Err(e) => {
            debug_assert!(false, "legal index held an illegal move: {e}");
            board.play_pass(color);
            Move::Pass
        }
    }
}

/// Maximum number of moves a rollout plays on a board of the given size.
pub fn max_game_len(size: usize) -> usize {
    size * size * MAX_GAME_LEN_FACTOR
}

/// Play the game on `board` to the end and return the moves that were played.
///
/// The game starts with the board's colour to move and ends after two
/// consecutive passes (counting passes already on the board). Without a ko
/// rule a game can cycle, so it is also cut off after [`max_game_len`]
/// moves.
pub fn rollout(board: &mut Board, rng: &mut Rng) -> Vec<Move> {
    let limit = max_game_len(board.size());
    let mut path = Vec::with_capacity(limit / 2);
    let mut color = board.to_move();
    let mut passes = board.consecutive_passes();

    while passes < 2 && path.len() < limit {
        let mv = play_random_move(board, color, rng);
        passes = if mv == Move::Pass { passes + 1 } else { 0 };
        path.push(mv);
        color = color.opposite();
    }
    path
}

/// Score the position with area scoring and `komi` points for White.
pub fn score(board: &Board, komi: f64) -> Outcome {
    let area = board.get_area();
    let margin = area.black as f64 - area.white as f64 - komi;
    if margin > 0.0 {
        Outcome::BlackWin
    } else if margin < 0.0 {
        Outcome::WhiteWin
    } else {
        Outcome::Jigo
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_move_is_legal() {
        let mut rng = Rng::with_seed(1);
        let mut board = Board::new(9);
        let mv = play_random_move(&mut board, Color::Black, &mut rng);
        let Move::Play(p) = mv else {
            panic!("empty board should not pass");
        };
        assert_eq!(board.at(p), Some(Color::Black));
        assert_eq!(board.to_move(), Color::White);
    }

    #[test]
    fn test_random_move_passes_without_legal_moves() {
        // Two black stones on the diagonal of a 2x2 board: both empty points
        // are suicide for White.
        let mut rng = Rng::with_seed(3);
        let mut board = Board::new(2);
        board.play_move(0, 0, Color::Black).unwrap();
        board.play_move(1, 1, Color::Black).unwrap();
        assert!(board.legal_moves(Color::White).is_empty());
        assert_eq!(play_random_move(&mut board, Color::White, &mut rng), Move::Pass);
        assert_eq!(board.consecutive_passes(), 1);
    }

    #[test]
    fn test_random_move_skips_own_eyes() {
        // A black cross on a 3x3 board leaves four corner eyes.
        let mut rng = Rng::with_seed(8);
        let mut board = Board::new(3);
        for (x, y) in [(1, 0), (1, 1), (1, 2), (0, 1), (2, 1)] {
            board.play_move(x, y, Color::Black).unwrap();
        }
        assert_eq!(board.legal_moves(Color::Black).len(), 4);
        for _ in 0..20 {
            assert_eq!(choose_random_move(&board, Color::Black, &mut rng), None);
        }
        // Each corner is suicide for White.
        assert!(board.legal_moves(Color::White).is_empty());
        assert_eq!(play_random_move(&mut board, Color::Black, &mut rng), Move::Pass);
    }

    #[test]
    fn test_random_move_never_picks_an_eye() {
        // Two of Black's five legal moves are true eyes.
        let mut rng = Rng::with_seed(13);
        let mut board = Board::new(3);
        for (x, y) in [(1, 0), (1, 1), (0, 1), (2, 1)] {
            board.play_move(x, y, Color::Black).unwrap();
        }
        let open: Vec<Point> = board
            .legal_moves(Color::Black)
            .iter()
            .filter(|&p| !board.is_true_eye(p, Color::Black))
            .collect();
        assert_eq!(open.len(), 3);
        for _ in 0..20 {
            let p = choose_random_move(&board, Color::Black, &mut rng).unwrap();
            assert!(open.contains(&p));
        }
    }

    #[test]
    fn test_rollouts_end_with_two_passes() {
        let mut rng = Rng::with_seed(42);
        for size in [5, 9] {
            let games = 40;
            let mut finished = 0;
            for _ in 0..games {
                let mut board = Board::new(size);
                let path = rollout(&mut board, &mut rng);
                assert!(path.len() <= max_game_len(size));
                assert_eq!(board.move_count(), path.len());
                if board.consecutive_passes() == 2 {
                    assert_eq!(path[path.len() - 2..], [Move::Pass, Move::Pass]);
                    finished += 1;
                }
            }
            assert!(finished * 4 >= games * 3, "size {size}: {finished}/{games} finished");
        }
    }

    #[test]
    fn test_rollout_on_tiny_board_is_bounded() {
        let mut rng = Rng::with_seed(42);
        let mut board = Board::new(2);
        let path = rollout(&mut board, &mut rng);
        assert!(!path.is_empty());
        assert!(path.len() <= max_game_len(2));
    }

    #[test]
    fn test_rollout_on_finished_game_is_empty() {
        let mut rng = Rng::with_seed(5);
        let mut board = Board::new(9);
        board.play_pass(Color::Black);
        board.play_pass(Color::White);
        assert!(rollout(&mut board, &mut rng).is_empty());
    }

    #[test]
    fn test_score() {
        let mut board = Board::new(5);
        assert_eq!(score(&board, 0.0), Outcome::Jigo);
        assert_eq!(score(&board, 0.5), Outcome::WhiteWin);

        board.play_move(2, 2, Color::Black).unwrap();
        // A single stone owns the whole board.
        assert_eq!(score(&board, 7.5), Outcome::BlackWin);
        assert_eq!(score(&board, 25.0), Outcome::Jigo);
        assert!(Outcome::BlackWin.is_win_for(Color::Black));
        assert!(!Outcome::Jigo.is_win_for(Color::White));
    }
}
