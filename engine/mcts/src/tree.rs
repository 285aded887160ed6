//! MCTS tree structure with arena allocation.
//!
//! The tree uses arena allocation for efficient node storage and
//! cache-friendly traversal. Nodes are stored in a contiguous Vec
//! and referenced by NodeId indices; parents are reached through
//! `MctsNode::parent`, never through owning pointers.

use games_uttt::{GameState, Move, Outcome};

use crate::node::{MctsNode, NodeId};
use crate::search::SearchError;

/// MCTS tree with arena-based node storage.
#[derive(Debug)]
pub struct MctsTree {
    /// Arena storing all nodes
    nodes: Vec<MctsNode>,

    /// Root node index (always 0 after initialization)
    root: NodeId,
}

impl MctsTree {
    /// Create a new tree rooted at the given state.
    pub fn new(root_state: GameState) -> Self {
        Self {
            nodes: vec![MctsNode::new_root(root_state)],
            root: NodeId(0),
        }
    }

    /// Get the root node ID.
    #[inline]
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Get a reference to a node by ID.
    #[inline]
    pub fn get(&self, id: NodeId) -> &MctsNode {
        &self.nodes[id.0 as usize]
    }

    /// Get a mutable reference to a node by ID.
    #[inline]
    pub fn get_mut(&mut self, id: NodeId) -> &mut MctsNode {
        &mut self.nodes[id.0 as usize]
    }

    /// Allocate a new node and return its ID.
    pub fn allocate(&mut self, node: MctsNode) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    /// Get the total number of nodes in the tree.
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if tree is empty (should never be true after construction).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// UCT value of a node as seen from its parent.
    pub fn uct_value(&self, id: NodeId, exploration: f64) -> f64 {
        let node = self.get(id);
        let parent_visits = node
            .parent
            .is_some()
            .then(|| self.get(node.parent).visit_count);
        node.uct_score(parent_visits, exploration)
    }

    /// Select the child with the greatest UCT value.
    /// Ties resolve to the child expanded last.
    pub fn select_best_child(
        &self,
        node_id: NodeId,
        exploration: f64,
    ) -> Result<NodeId, SearchError> {
        self.select_by(node_id, |id| self.uct_value(id, exploration))
    }

    /// Select the child with the greatest visit count.
    /// Ties resolve to the child expanded last.
    pub fn select_most_visited_child(&self, node_id: NodeId) -> Result<NodeId, SearchError> {
        self.select_by(node_id, |id| self.get(id).visit_count as f64)
    }

    fn select_by(
        &self,
        node_id: NodeId,
        score: impl Fn(NodeId) -> f64,
    ) -> Result<NodeId, SearchError> {
        let mut best: Option<(NodeId, f64)> = None;
        for &child in &self.get(node_id).children {
            let value = score(child);
            match best {
                Some((_, current)) if value < current => {}
                _ => best = Some((child, value)),
            }
        }
        best.map(|(id, _)| id).ok_or(SearchError::EmptySelection)
    }

    /// Add a child reached by `mv` to a parent node.
    /// Returns the new child's NodeId.
    pub fn add_child(&mut self, parent_id: NodeId, mv: Move, state: GameState) -> NodeId {
        let child_id = self.allocate(MctsNode::new_child(parent_id, mv, state));
        self.get_mut(parent_id).children.push(child_id);
        child_id
    }

    /// Backpropagate a finished rollout from a node to the root.
    ///
    /// Every node on the path gains one visit. Its reward grows by 0.5 for a
    /// draw, or by 1 when the winner is not the player to move at that node
    /// (the player who moved into it).
    pub fn backpropagate(&mut self, leaf_id: NodeId, outcome: Outcome) {
        let mut current_id = leaf_id;

        while current_id.is_some() {
            let node = self.get_mut(current_id);
            node.visit_count += 1;
            node.reward += match outcome {
                Outcome::Draw => 0.5,
                Outcome::Win(winner) if winner != node.state.turn => 1.0,
                Outcome::Win(_) => 0.0,
            };
            current_id = node.parent;
        }
    }

    /// Get statistics about the tree for debugging.
    pub fn stats(&self) -> TreeStats {
        let root = self.get(self.root);
        TreeStats {
            total_nodes: self.nodes.len(),
            root_visits: root.visit_count,
            root_value: root.mean_value(),
            max_depth: self.compute_max_depth(self.root, 0),
        }
    }

    fn compute_max_depth(&self, node_id: NodeId, current_depth: u32) -> u32 {
        let node = self.get(node_id);
        node.children
            .iter()
            .map(|id| self.compute_max_depth(*id, current_depth + 1))
            .max()
            .unwrap_or(current_depth)
    }
}

/// Statistics about an MCTS tree.
#[derive(Debug, Clone)]
pub struct TreeStats {
    pub total_nodes: usize,
    pub root_visits: u32,
    pub root_value: f64,
    pub max_depth: u32,
}
