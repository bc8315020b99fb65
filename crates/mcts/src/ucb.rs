//! UCB1 child selection.
//!
//! score(c) = W(c) / N(c) + K * sqrt(2 * ln(N(parent)) / N(c))

use crate::node::NodeId;
use crate::tree::Tree;
use uct_core::{Result, UctError};

/// UCB1 score of a child with `visits > 0`.
///
/// `win_score` is the child's accumulated reward for the player who moved
/// into it, which is the player choosing among the parent's children.
pub fn ucb1(win_score: f64, visits: u32, parent_visits: u32, exploration: f64) -> f64 {
    let n = visits as f64;
    let exploitation = win_score / n;
    let exploration_term = (2.0 * (parent_visits as f64).ln() / n).sqrt();
    exploitation + exploration * exploration_term
}

/// Select the child of `node_id` with the highest UCB1 score.
///
/// When several children share the top score the last of them in children
/// order is returned. Returns `Ok(None)` if the node has no children.
///
/// # Errors
/// Returns `UctError::UnvisitedChild` if any child has zero visits. Every
/// child receives a visit in the iteration that creates it, so this only
/// happens if the tree was updated out of order.
pub fn select_child<M: Copy + PartialEq>(
    tree: &Tree<M>,
    node_id: NodeId,
    exploration: f64,
) -> Result<Option<NodeId>> {
    let node = tree.get(node_id);
    let parent_visits = node.visit_count;

    let mut best: Option<NodeId> = None;
    let mut best_score = f64::NEG_INFINITY;

    for &child_id in &node.children {
        let child = tree.get(child_id);
        if child.visit_count == 0 {
            return Err(UctError::UnvisitedChild(child_id.index()));
        }

        let score = ucb1(child.win_score, child.visit_count, parent_visits, exploration);
        if score >= best_score {
            best_score = score;
            best = Some(child_id);
        }
    }

    Ok(best)
}

#[cfg(test)]
mod tests {
    use super::*;
    use uct_core::Player;

    fn tree_with_children(stats: &[(f64, u32)]) -> Tree<u8> {
        let moves: Vec<u8> = (0..stats.len() as u8).collect();
        let mut tree = Tree::new(moves.clone(), Player::Second);
        let mut total = 0;
        for (&mv, &(wins, visits)) in moves.iter().zip(stats) {
            let id = tree.add_child(NodeId::ROOT, mv, vec![], Player::First);
            let child = tree.get_mut(id);
            child.win_score = wins;
            child.visit_count = visits;
            total += visits;
        }
        tree.get_mut(NodeId::ROOT).visit_count = total;
        tree
    }

    #[test]
    fn test_ucb1_formula() {
        // 3/4 + 1.0 * sqrt(2 * ln(10) / 4)
        let expected = 0.75 + (2.0 * 10f64.ln() / 4.0).sqrt();
        assert!((ucb1(3.0, 4, 10, 1.0) - expected).abs() < 1e-12);
    }

    #[test]
    fn test_ucb1_zero_exploration_is_mean() {
        assert!((ucb1(3.0, 4, 10, 0.0) - 0.75).abs() < 1e-12);
    }

    #[test]
    fn test_ucb1_single_parent_visit() {
        // ln(1) = 0, so only the mean is left
        assert!((ucb1(1.0, 1, 1, 1.0) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_select_prefers_higher_mean() {
        let tree = tree_with_children(&[(1.0, 5), (4.0, 5)]);
        let selected = select_child(&tree, NodeId::ROOT, 1.0).unwrap();
        assert_eq!(selected, Some(tree.root().children[1]));
    }

    #[test]
    fn test_select_prefers_less_visited_with_exploration() {
        // Equal means; the rarely visited child has the larger bonus.
        let tree = tree_with_children(&[(50.0, 100), (1.0, 2)]);
        let selected = select_child(&tree, NodeId::ROOT, 1.0).unwrap();
        assert_eq!(selected, Some(tree.root().children[1]));

        // Without exploration the means tie and the last one is taken.
        let selected = select_child(&tree, NodeId::ROOT, 0.0).unwrap();
        assert_eq!(selected, Some(tree.root().children[1]));
    }

    #[test]
    fn test_select_ties_take_last() {
        let tree = tree_with_children(&[(2.0, 4), (2.0, 4), (2.0, 4)]);
        let selected = select_child(&tree, NodeId::ROOT, 1.0).unwrap();
        assert_eq!(selected, Some(tree.root().children[2]));
    }

    #[test]
    fn test_select_no_children() {
        let tree: Tree<u8> = Tree::new(vec![], Player::Second);
        assert_eq!(select_child(&tree, NodeId::ROOT, 1.0).unwrap(), None);
    }

    #[test]
    fn test_select_unvisited_child_is_error() {
        let tree = tree_with_children(&[(1.0, 1), (0.0, 0)]);
        let child = tree.root().children[1];
        assert_eq!(
            select_child(&tree, NodeId::ROOT, 1.0),
            Err(UctError::UnvisitedChild(child.index()))
        );
    }
}
