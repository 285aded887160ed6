//! MCTS search implementation.
//!
//! Implements the core MCTS algorithm:
//! 1. Selection: Descend through fully expanded nodes using UCT
//! 2. Expansion: Attach one untried move as a new child
//! 3. Simulation: Play uniformly random moves until the game ends
//! 4. Backpropagation: Update statistics along the path to the root
//!
//! Iterations repeat until the time budget (or the optional iteration cap)
//! runs out. The deadline is fixed once when the search starts; a rollout
//! still running when it passes is dropped without touching the tree.

use std::time::Instant;

use games_uttt::{random_legal_move, GameError, GameState, Move, Outcome};
use rand_chacha::ChaCha20Rng;
use thiserror::Error;
use tracing::{debug, trace};

use crate::config::MctsConfig;
use crate::node::NodeId;
use crate::tree::MctsTree;

/// Errors that can occur during MCTS search.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("Game error: {0}")]
    Game(#[from] GameError),

    #[error("No child to select")]
    EmptySelection,

    #[error("Invalid state: {0}")]
    InvalidState(String),
}

/// Result of an MCTS search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchResult {
    /// Most visited move at the root, `None` if nothing could be played
    pub best_move: Option<Move>,

    /// Mean reward of the chosen child, in [0, 1] for the side to move
    pub score: f64,

    /// Completed iterations (root visit count)
    pub iterations: u32,

    /// Whether the searched position was already decided
    pub game_over: bool,
}

impl SearchResult {
    fn finished(iterations: u32) -> Self {
        Self {
            best_move: None,
            score: 0.0,
            iterations,
            game_over: true,
        }
    }
}

/// MCTS search state.
pub struct MctsSearch {
    tree: MctsTree,
    config: MctsConfig,
}

impl MctsSearch {
    /// Create a new MCTS search from the given game state.
    pub fn new(state: GameState, config: MctsConfig) -> Self {
        Self {
            tree: MctsTree::new(state),
            config,
        }
    }

    /// Run iterations until the time budget or iteration cap is exhausted.
    pub fn run(&mut self, rng: &mut ChaCha20Rng) -> Result<SearchResult, SearchError> {
        let root_id = self.tree.root();
        if self.tree.get(root_id).is_terminal() {
            return Ok(SearchResult::finished(0));
        }

        let started = Instant::now();
        let deadline = started + self.config.time_budget;
        let mut aborted = 0u32;

        while Instant::now() < deadline && !self.iteration_cap_reached() {
            if !self.iterate(deadline, rng)? {
                aborted += 1;
            }
        }

        let root = self.tree.get(root_id);
        let iterations = root.visit_count;
        if root.children.is_empty() {
            return Ok(SearchResult {
                best_move: None,
                score: 0.0,
                iterations,
                game_over: false,
            });
        }

        let best_id = self.tree.select_most_visited_child(root_id)?;
        let best = self.tree.get(best_id);

        debug!(
            best_move = ?best.mv,
            score = best.mean_value(),
            iterations,
            aborted,
            nodes = self.tree.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "MCTS search complete"
        );

        Ok(SearchResult {
            best_move: best.mv,
            score: best.mean_value(),
            iterations,
            game_over: false,
        })
    }

    fn iteration_cap_reached(&self) -> bool {
        self.config
            .max_iterations
            .is_some_and(|cap| self.tree.get(self.tree.root()).visit_count >= cap)
    }

    /// Run one select -> expand -> simulate -> backpropagate iteration.
    /// Returns false if the deadline passed before the rollout finished.
    fn iterate(&mut self, deadline: Instant, rng: &mut ChaCha20Rng) -> Result<bool, SearchError> {
        let selected = self.select()?;
        let active = self.expand(selected)?;

        let Some(outcome) = self.simulate(active, deadline, rng)? else {
            trace!(node = active.0, "MCTS iteration past deadline, discarded");
            return Ok(false);
        };

        self.tree.backpropagate(active, outcome);

        trace!(
            node = active.0,
            outcome = %outcome,
            root_visits = self.tree.get(self.tree.root()).visit_count,
            "MCTS iteration complete"
        );

        Ok(true)
    }

    /// Descend from the root while the current node is fully expanded and
    /// has children.
    fn select(&self) -> Result<NodeId, SearchError> {
        let mut current = self.tree.root();

        loop {
            let node = self.tree.get(current);
            if !node.is_fully_expanded() || node.is_leaf() {
                return Ok(current);
            }
            current = self
                .tree
                .select_best_child(current, self.config.exploration)?;
        }
    }

    /// Expand one untried move of `node_id`, returning the new child.
    /// Fully expanded nodes are returned unchanged.
    fn expand(&mut self, node_id: NodeId) -> Result<NodeId, SearchError> {
        let node = self.tree.get_mut(node_id);
        let Some(mv) = node.untried_moves.pop() else {
            return Ok(node_id);
        };
        let state = node.state.apply_move(mv)?;
        Ok(self.tree.add_child(node_id, mv, state))
    }

    /// Play uniformly random moves from a copy of the node's state until the
    /// game ends. Returns `None` once the deadline passes.
    fn simulate(
        &self,
        node_id: NodeId,
        deadline: Instant,
        rng: &mut ChaCha20Rng,
    ) -> Result<Option<Outcome>, SearchError> {
        let mut state = self.tree.get(node_id).state;

        while !state.game_over {
            if Instant::now() >= deadline {
                return Ok(None);
            }
            let mv = random_legal_move(&state, rng)?;
            state = state.apply_move(mv)?;
        }

        match state.outcome() {
            Some(outcome) => Ok(Some(outcome)),
            None => Err(SearchError::InvalidState(format!(
                "finished game has no outcome\n{}",
                state
            ))),
        }
    }

    /// Get the search tree (for inspection/debugging).
    pub fn tree(&self) -> &MctsTree {
        &self.tree
    }
}

/// Search for the best move for the side to move in `state`.
///
/// A state whose completion sets already decide the game is settled and
/// reported as finished without searching.
pub fn compute_best_move(
    state: &GameState,
    config: &MctsConfig,
    rng: &mut ChaCha20Rng,
) -> Result<SearchResult, SearchError> {
    let settled = state.settle();
    if settled.game_over {
        return Ok(SearchResult::finished(0));
    }

    let mut search = MctsSearch::new(settled, config.clone());
    search.run(rng)
}
