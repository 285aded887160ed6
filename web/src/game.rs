//! Game session management
//!
//! Wraps a [`GameState`] with the players' roles, the session RNG and the bot's
//! search settings to provide a convenient API for the web server.

use anyhow::{anyhow, Result};
use games_uttt::{compute_random_move, GameError, GameState, Move, RandomMove, Symbol};
use mcts::{compute_best_move, MctsConfig, SearchResult};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use tracing::{debug, info};

use crate::metrics;
use crate::types::GameStateResponse;

/// A game session tracking current state
pub struct GameSession {
    state: GameState,
    /// Symbol played by the human
    human: Symbol,
    /// RNG for random moves and for seeding searches
    rng: ChaCha20Rng,
    /// MCTS configuration for bot play
    mcts_config: MctsConfig,
}

impl GameSession {
    /// Create a new game session in the opening position.
    pub fn new(human: Symbol, seed: u64, mcts_config: MctsConfig) -> Self {
        metrics::GAMES_CREATED.inc();
        debug!(human = %human, seed, "New game session");
        Self {
            state: GameState::new(),
            human,
            rng: ChaCha20Rng::seed_from_u64(seed),
            mcts_config,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn is_game_over(&self) -> bool {
        self.state.game_over
    }

    pub fn is_human_turn(&self) -> bool {
        self.state.turn == self.human
    }

    /// Play `mv` for the side to move.
    pub fn play(&mut self, mv: Move) -> Result<(), GameError> {
        let next = self.state.apply_move(mv)?;
        self.advance(next);
        Ok(())
    }

    /// Play one uniformly random legal move for the side to move.
    pub fn random_move(&mut self) -> Result<RandomMove, GameError> {
        let result = compute_random_move(&self.state, &mut self.rng)?;
        if result.played.is_some() {
            self.advance(result.state);
        } else {
            self.state = result.state;
        }
        Ok(result)
    }

    /// Search for and play the best move for the side to move.
    ///
    /// The search runs on a blocking worker thread with its own RNG forked
    /// from the session's.
    pub async fn bot_move(&mut self) -> Result<SearchResult> {
        let state = self.state;
        let config = self.mcts_config.clone();
        let mut rng = ChaCha20Rng::seed_from_u64(self.rng.gen());

        let timer = metrics::BOT_MOVE_SECONDS.start_timer();
        let result =
            tokio::task::spawn_blocking(move || compute_best_move(&state, &config, &mut rng))
                .await
                .map_err(|e| anyhow!("Search task failed: {}", e))?
                .map_err(|e| anyhow!("MCTS failed: {}", e))?;
        timer.observe_duration();
        metrics::BOT_ITERATIONS.observe(result.iterations as f64);

        debug!(
            best_move = ?result.best_move,
            score = result.score,
            iterations = result.iterations,
            "MCTS selected move"
        );

        match result.best_move {
            Some(mv) => self.play(mv)?,
            None => self.state = self.state.settle(),
        }
        Ok(result)
    }

    fn advance(&mut self, next: GameState) {
        self.state = next;
        metrics::MOVES_PLAYED.inc();
        if let Some(outcome) = next.outcome().filter(|_| next.game_over) {
            metrics::GAMES_COMPLETED.inc();
            info!(outcome = %outcome, moves = next.ply(), "Game finished");
        }
    }

    /// Convert to API response
    pub fn to_response(&self) -> GameStateResponse {
        let outcome = self.state.outcome().filter(|_| self.state.game_over);
        let message = match outcome.map(|o| o.winner()) {
            None if self.is_human_turn() => format!("Your turn ({})", self.human),
            None => format!("Bot's turn ({})", self.human.opponent()),
            Some(Some(winner)) if winner == self.human => "You win!".to_string(),
            Some(Some(_)) => "Bot wins!".to_string(),
            Some(None) => "It's a draw!".to_string(),
        };

        GameStateResponse {
            board: self.state.board,
            completed: self.state.completed,
            turn: self.state.turn,
            human: self.human,
            next_zone: self.state.next_zone,
            game_over: self.state.game_over,
            winner: outcome.and_then(|o| o.winner()),
            legal_moves: self.state.legal_moves(),
            message,
        }
    }
}
