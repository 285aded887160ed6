//! Monte Carlo Tree Search (MCTS) for Ultimate Tic-Tac-Toe.
//!
//! This crate searches positions from the `games-uttt` crate using UCT
//! selection and uniformly random rollouts. There is no evaluator: the value
//! of a leaf is the result of playing the game out at random.
//!
//! # Overview
//!
//! MCTS builds a search tree by repeating four phases:
//!
//! 1. **Selection**: Starting at the root, descend through nodes whose legal
//!    moves have all been expanded, picking the child with the highest UCT
//!    value
//! 2. **Expansion**: Pop one untried move from the selected node and attach
//!    the resulting position as a new child
//! 3. **Simulation**: Play random legal moves from that position until the
//!    game ends
//! 4. **Backpropagation**: Walk back to the root adding one visit and the
//!    rollout reward to every node on the way
//!
//! # Usage
//!
//! ```rust
//! use games_uttt::GameState;
//! use mcts::{compute_best_move, MctsConfig};
//! use rand::SeedableRng;
//! use rand_chacha::ChaCha20Rng;
//!
//! let config = MctsConfig::for_testing().with_max_iterations(100);
//! let mut rng = ChaCha20Rng::seed_from_u64(42);
//!
//! let result = compute_best_move(&GameState::new(), &config, &mut rng).unwrap();
//! assert!(result.best_move.is_some());
//! assert_eq!(result.iterations, 100);
//! ```
//!
//! # Configuration
//!
//! The [`MctsConfig`] struct controls search behavior:
//!
//! - `time_budget`: Wall-clock budget per search (default: 3 s)
//! - `exploration`: UCT exploration constant C (default: √2)
//! - `max_iterations`: Optional iteration cap, for tests and benchmarks
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────┐
//! │                   MctsSearch                    │
//! ├─────────────────────────────────────────────────┤
//! │  ┌─────────────┐          ┌──────────────────┐  │
//! │  │  MctsTree   │          │ games_uttt       │  │
//! │  │  (arena)    │          │ (apply/rollout)  │  │
//! │  └──────┬──────┘          └────────┬─────────┘  │
//! │         ▼                          ▼            │
//! │  ┌───────────────────────────────────────────┐  │
//! │  │ select → expand → simulate → backpropagate │  │
//! │  └───────────────────────────────────────────┘  │
//! └─────────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod node;
pub mod search;
pub mod tree;

// Re-export main types
pub use config::MctsConfig;
pub use node::{MctsNode, NodeId};
pub use search::{compute_best_move, MctsSearch, SearchError, SearchResult};
pub use tree::{MctsTree, TreeStats};
