//! Arena-allocated UCT tree.
//!
//! Using a Vec<Node> with indices provides better cache locality
//! and simpler ownership compared to Rc<RefCell<Node>>.

use crate::node::{Node, NodeId};
use std::fmt;
use uct_core::{Player, Result, Reward};

/// Arena-allocated UCT tree.
///
/// Nodes are stored in a contiguous vector and referenced by index. The
/// root is always at [`NodeId::ROOT`]; children point back to their parent
/// by id so backpropagation can walk upward without a recorded path.
#[derive(Debug, Clone)]
pub struct Tree<M> {
    nodes: Vec<Node<M>>,
}

impl<M: Copy + PartialEq> Tree<M> {
    /// Create a tree holding only the root position.
    pub fn new(untried_moves: Vec<M>, player_just_moved: Player) -> Self {
        Self {
            nodes: vec![Node::root(untried_moves, player_just_moved)],
        }
    }

    /// Get a reference to a node by ID.
    ///
    /// # Panics
    /// Panics if the NodeId is invalid.
    pub fn get(&self, id: NodeId) -> &Node<M> {
        &self.nodes[id.0]
    }

    /// Get a mutable reference to a node by ID.
    ///
    /// # Panics
    /// Panics if the NodeId is invalid.
    pub fn get_mut(&mut self, id: NodeId) -> &mut Node<M> {
        &mut self.nodes[id.0]
    }

    /// Get the root node.
    pub fn root(&self) -> &Node<M> {
        self.get(NodeId::ROOT)
    }

    /// Get the number of nodes in the tree.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if the tree is empty (never true, the root always exists).
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Iterate over all node ids in allocation order.
    pub fn ids(&self) -> impl Iterator<Item = NodeId> {
        (0..self.nodes.len()).map(NodeId)
    }

    /// Add a child for `mv` under `parent`, returning its ID.
    ///
    /// `mv` is taken out of the parent's untried moves, so the parent's
    /// `children + untried_moves` count stays equal to its legal move count.
    pub fn add_child(
        &mut self,
        parent: NodeId,
        mv: M,
        untried_moves: Vec<M>,
        player_just_moved: Player,
    ) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes
            .push(Node::child(parent, mv, untried_moves, player_just_moved));

        let parent_node = self.get_mut(parent);
        if let Some(pos) = parent_node.untried_moves.iter().position(|m| *m == mv) {
            parent_node.untried_moves.swap_remove(pos);
        }
        parent_node.children.push(id);
        id
    }

    /// Backpropagate a finished playout from `leaf` up to the root.
    ///
    /// Every node on the way gets one more visit and the reward returned by
    /// `reward_for` for its own `player_just_moved`.
    pub fn backpropagate<F>(&mut self, leaf: NodeId, mut reward_for: F) -> Result<()>
    where
        F: FnMut(Player) -> Result<Reward>,
    {
        let mut current = Some(leaf);
        while let Some(id) = current {
            let node = self.get_mut(id);
            let reward = reward_for(node.player_just_moved)?;
            node.update(reward.get());
            current = node.parent;
        }
        Ok(())
    }

    /// The most visited child of `id`; the first one wins a tie.
    pub fn most_visited_child(&self, id: NodeId) -> Option<NodeId> {
        let mut best: Option<(NodeId, u32)> = None;
        for &child in &self.get(id).children {
            let visits = self.get(child).visit_count;
            if best.map_or(true, |(_, v)| visits > v) {
                best = Some((child, visits));
            }
        }
        best.map(|(child, _)| child)
    }

    /// Number of edges between `id` and the root.
    pub fn depth(&self, id: NodeId) -> usize {
        let mut depth = 0;
        let mut current = self.get(id).parent;
        while let Some(parent) = current {
            depth += 1;
            current = self.get(parent).parent;
        }
        depth
    }
}

impl<M: Copy + PartialEq + fmt::Debug> Tree<M> {
    /// One line per child of `id`, in children order.
    pub fn children_summary(&self, id: NodeId) -> String {
        let mut out = String::new();
        for &child in &self.get(id).children {
            out.push_str(&self.get(child).to_string());
            out.push('\n');
        }
        out
    }

    fn write_subtree(&self, f: &mut fmt::Formatter<'_>, id: NodeId, indent: usize) -> fmt::Result {
        for _ in 0..indent {
            write!(f, "| ")?;
        }
        writeln!(f, "{}", self.get(id))?;
        for &child in &self.get(id).children {
            self.write_subtree(f, child, indent + 1)?;
        }
        Ok(())
    }
}

impl<M: Copy + PartialEq + fmt::Debug> fmt::Display for Tree<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_subtree(f, NodeId::ROOT, 0)
    }
}
