//! MCTS tree node representation.
//!
//! Each node holds the game state reached by playing `mv` from its parent,
//! the legal moves not yet expanded into children, and the visit statistics
//! used for UCT selection.

use games_uttt::{GameState, Move};

/// Index into the node arena. Using a newtype for type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub u32);

impl NodeId {
    pub const NONE: NodeId = NodeId(u32::MAX);

    pub fn is_none(self) -> bool {
        self == Self::NONE
    }

    pub fn is_some(self) -> bool {
        !self.is_none()
    }
}

/// A node in the MCTS tree.
#[derive(Debug, Clone)]
pub struct MctsNode {
    /// Parent node index (NONE for root)
    pub parent: NodeId,

    /// Move that led to this node from parent (None for root)
    pub mv: Option<Move>,

    /// Game state at this node
    pub state: GameState,

    /// Expanded children, in expansion order
    pub children: Vec<NodeId>,

    /// Number of completed iterations that passed through this node
    pub visit_count: u32,

    /// Accumulated reward for the player who moved into this node.
    /// 1 per win, 0.5 per draw.
    pub reward: f64,

    /// Legal moves not yet expanded. Consumed from the end.
    pub untried_moves: Vec<Move>,
}

impl MctsNode {
    /// Create a new root node.
    pub fn new_root(state: GameState) -> Self {
        Self {
            parent: NodeId::NONE,
            mv: None,
            untried_moves: state.legal_moves(),
            state,
            children: Vec::new(),
            visit_count: 0,
            reward: 0.0,
        }
    }

    /// Create a new child node.
    pub fn new_child(parent: NodeId, mv: Move, state: GameState) -> Self {
        Self {
            parent,
            mv: Some(mv),
            untried_moves: state.legal_moves(),
            state,
            children: Vec::new(),
            visit_count: 0,
            reward: 0.0,
        }
    }

    /// Mean reward = reward / visit_count.
    /// Returns 0.0 if never visited.
    #[inline]
    pub fn mean_value(&self) -> f64 {
        if self.visit_count == 0 {
            0.0
        } else {
            self.reward / self.visit_count as f64
        }
    }

    /// UCT score used when the parent picks among its children.
    /// UCT = reward/visits + C * sqrt(ln(N_parent) / visits)
    ///
    /// Unvisited nodes score +∞ so every child is tried once before any is
    /// revisited. `parent_visits` is `None` for the root, which scores its
    /// plain mean.
    #[inline]
    pub fn uct_score(&self, parent_visits: Option<u32>, exploration: f64) -> f64 {
        if self.visit_count == 0 {
            return f64::INFINITY;
        }
        let exploit = self.mean_value();
        match parent_visits {
            Some(n) => {
                let explore = ((n as f64).ln() / self.visit_count as f64).sqrt();
                exploit + exploration * explore
            }
            None => exploit,
        }
    }

    /// Check if every legal move has been expanded.
    #[inline]
    pub fn is_fully_expanded(&self) -> bool {
        self.untried_moves.is_empty()
    }

    /// Check if this node has no children yet.
    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    #[inline]
    pub fn is_terminal(&self) -> bool {
        self.state.game_over
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_id_none() {
        assert!(NodeId::NONE.is_none());
        assert!(!NodeId::NONE.is_some());
        assert!(!NodeId(0).is_none());
        assert!(NodeId(0).is_some());
    }

    #[test]
    fn test_new_root() {
        let node = MctsNode::new_root(GameState::new());

        assert!(node.parent.is_none());
        assert!(node.mv.is_none());
        assert_eq!(node.visit_count, 0);
        assert_eq!(node.untried_moves.len(), 81);
        assert!(node.is_leaf());
        assert!(!node.is_fully_expanded());
        assert!(!node.is_terminal());
    }

    #[test]
    fn test_mean_value() {
        let mut node = MctsNode::new_root(GameState::new());

        // Unvisited
        assert!(node.mean_value().abs() < 1e-12);

        // After visits
        node.visit_count = 4;
        node.reward = 2.5;
        assert!((node.mean_value() - 0.625).abs() < 1e-12);
    }

    #[test]
    fn test_uct_score() {
        let mut node = MctsNode::new_root(GameState::new());
        assert_eq!(node.uct_score(Some(10), 1.0), f64::INFINITY);
        assert_eq!(node.uct_score(None, 1.0), f64::INFINITY);

        node.visit_count = 10;
        node.reward = 5.0;

        // UCT = 0.5 + sqrt(2) * sqrt(ln(100) / 10) ≈ 0.5 + 0.9597
        let uct = node.uct_score(Some(100), std::f64::consts::SQRT_2);
        assert!((uct - 1.4597).abs() < 1e-3);

        // Root: mean only
        assert!((node.uct_score(None, std::f64::consts::SQRT_2) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_child_of_finished_game_has_no_moves() {
        let mut state = GameState::new();
        state.game_over = true;
        let node = MctsNode::new_child(NodeId(0), Move::new(0, 0, 0, 0), state);

        assert_eq!(node.parent, NodeId(0));
        assert!(node.is_terminal());
        assert!(node.is_fully_expanded());
    }
}
