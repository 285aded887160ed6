//! Uniformly random move selection.

use rand::seq::SliceRandom;
use rand::Rng;
use rand_chacha::ChaCha20Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::board::{Move, SubBoardCode};
use crate::error::GameError;
use crate::state::GameState;

/// Result of [`compute_random_move`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RandomMove {
    /// State after the move (or the settled input if the game was decided)
    pub state: GameState,
    pub game_over: bool,
    /// The move played, `None` if the game was already decided
    pub played: Option<Move>,
}

/// Play one uniformly random legal move for the side to move.
///
/// Samples a sub-board from the next zone and a cell within it, and draws
/// again whenever the cell is occupied. Every (sub-board, cell) pair is
/// equally likely, so accepted moves are uniform over the legal moves.
///
/// A state whose completion sets already decide the game is returned settled
/// (`game_over` set, next zone cleared) without playing.
pub fn compute_random_move(
    state: &GameState,
    rng: &mut ChaCha20Rng,
) -> Result<RandomMove, GameError> {
    let settled = state.settle();
    if settled.game_over {
        return Ok(RandomMove {
            state: settled,
            game_over: true,
            played: None,
        });
    }

    // Guards the rejection loop below against a zone with no empty cell.
    if !settled
        .next_zone
        .iter()
        .any(|code| settled.board.sub_board(code).iter().any(|c| c.is_empty()))
    {
        return Err(GameError::EmptySelection);
    }

    let zones: Vec<SubBoardCode> = settled.next_zone.iter().collect();
    let mut attempts = 0u32;
    let mv = loop {
        attempts += 1;
        let code = zones[rng.gen_range(0..zones.len())];
        let mv = Move::from_code(code, rng.gen_range(0..9));
        if settled.board.sub_board(code)[mv.cell_index()].is_empty() {
            break mv;
        }
    };

    let next = settled.apply_move(mv)?;
    debug!(
        mv = %mv,
        attempts,
        game_over = next.game_over,
        "Random move played"
    );

    Ok(RandomMove {
        state: next,
        game_over: next.game_over,
        played: Some(mv),
    })
}

/// Pick one of `state`'s legal moves uniformly at random.
pub fn random_legal_move(state: &GameState, rng: &mut ChaCha20Rng) -> Result<Move, GameError> {
    state
        .legal_moves()
        .choose(rng)
        .copied()
        .ok_or(GameError::EmptySelection)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::CodeSet;
    use rand::SeedableRng;

    #[test]
    fn test_random_move_is_legal() {
        let mut rng = ChaCha20Rng::seed_from_u64(7);
        let state = GameState::new().apply_move(Move::new(1, 1, 0, 0)).unwrap();

        for _ in 0..50 {
            let result = compute_random_move(&state, &mut rng).unwrap();
            let mv = result.played.unwrap();
            assert!(state.is_legal(&mv), "{} should be legal", mv);
            assert_eq!(result.state, state.apply_move(mv).unwrap());
        }
    }

    #[test]
    fn test_random_move_covers_all_legal_moves() {
        let mut rng = ChaCha20Rng::seed_from_u64(11);
        let state = GameState::new();
        let mut seen = std::collections::HashSet::new();

        for _ in 0..2000 {
            let result = compute_random_move(&state, &mut rng).unwrap();
            seen.insert(result.played.unwrap());
        }
        assert_eq!(seen.len(), 81);
    }

    #[test]
    fn test_random_move_on_decided_state() {
        let mut rng = ChaCha20Rng::seed_from_u64(3);
        let mut state = GameState::new();
        state.completed.x = CodeSet::ALL;

        let result = compute_random_move(&state, &mut rng).unwrap();
        assert!(result.game_over);
        assert!(result.played.is_none());
        assert!(result.state.next_zone.is_empty());
    }

    #[test]
    fn test_random_move_same_seed_same_move() {
        let state = GameState::new();
        let a = compute_random_move(&state, &mut ChaCha20Rng::seed_from_u64(99)).unwrap();
        let b = compute_random_move(&state, &mut ChaCha20Rng::seed_from_u64(99)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_random_legal_move_empty() {
        let mut rng = ChaCha20Rng::seed_from_u64(0);
        let mut state = GameState::new();
        state.next_zone = CodeSet::EMPTY;
        assert_eq!(
            random_legal_move(&state, &mut rng),
            Err(GameError::EmptySelection)
        );
    }
}
