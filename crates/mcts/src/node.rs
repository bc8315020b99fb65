//! UCT node types for tree storage.
//!
//! Uses arena allocation with indices for cache locality and simpler memory management.

use std::fmt;
use uct_core::Player;

/// Index into the node arena.
///
/// This is a lightweight handle that references a node in the tree.
/// Parent links use it too, so the tree has no ownership cycles.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    /// The root node is always at index 0.
    pub const ROOT: NodeId = NodeId(0);

    /// Position of the node in the arena.
    pub fn index(self) -> usize {
        self.0
    }
}

/// A node in the UCT tree.
///
/// Each node is one position reached by a specific move. Wins are always
/// counted from the point of view of `player_just_moved`.
#[derive(Clone, Debug)]
pub struct Node<M> {
    /// Move that led to this node (None for root).
    pub mv: Option<M>,

    /// Parent node (None for root). A lookup link only; the arena owns nodes.
    pub parent: Option<NodeId>,

    /// Children in creation order.
    pub children: Vec<NodeId>,

    /// Legal moves from this position that have no child yet.
    pub untried_moves: Vec<M>,

    /// Number of iterations whose path went through this node.
    pub visit_count: u32,

    /// Sum of rewards for `player_just_moved`.
    pub win_score: f64,

    /// The player who made `mv`.
    pub player_just_moved: Player,
}

impl<M> Node<M> {
    /// Create the root node.
    pub fn root(untried_moves: Vec<M>, player_just_moved: Player) -> Self {
        Self {
            mv: None,
            parent: None,
            children: Vec::new(),
            untried_moves,
            visit_count: 0,
            win_score: 0.0,
            player_just_moved,
        }
    }

    /// Create a node reached from `parent` by `mv`.
    pub fn child(parent: NodeId, mv: M, untried_moves: Vec<M>, player_just_moved: Player) -> Self {
        Self {
            mv: Some(mv),
            parent: Some(parent),
            children: Vec::new(),
            untried_moves,
            visit_count: 0,
            win_score: 0.0,
            player_just_moved,
        }
    }

    /// Mean reward for `player_just_moved`.
    ///
    /// Returns 0.0 if the node has never been visited.
    pub fn mean_score(&self) -> f64 {
        if self.visit_count == 0 {
            0.0
        } else {
            self.win_score / self.visit_count as f64
        }
    }

    /// True when every legal move already has a child.
    pub fn is_fully_expanded(&self) -> bool {
        self.untried_moves.is_empty()
    }

    /// Record one finished iteration through this node.
    pub fn update(&mut self, reward: f64) {
        self.visit_count += 1;
        self.win_score += reward;
    }
}

impl<M: fmt::Debug> fmt::Display for Node<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.mv {
            Some(mv) => write!(f, "[M:{:?}", mv)?,
            None => write!(f, "[M:-")?,
        }
        write!(
            f,
            " W/V:{}/{} U:{:?}]",
            self.win_score, self.visit_count, self.untried_moves
        )
    }
}
