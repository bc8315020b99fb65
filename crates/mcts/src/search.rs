//! UCT search implementation.
//!
//! Each iteration runs the four MCTS phases on a private clone of the root
//! state:
//! 1. Selection: descend by UCB1 while the node is fully expanded
//! 2. Expansion: add one child for a random untried move
//! 3. Simulation: play random moves until the game ends
//! 4. Backpropagation: credit the result to every node on the path

use crate::{
    config::UctConfig,
    node::NodeId,
    rollout::{RolloutPolicy, UniformRollout},
    tree::Tree,
    ucb,
};
use rand::Rng;
use std::marker::PhantomData;
use tracing::{debug, trace};
use uct_core::{Game, Result, UctError};

/// Statistics of one root child after a search.
#[derive(Clone, Debug, PartialEq)]
pub struct ChildStats<M> {
    /// Move leading to the child.
    pub mv: M,

    /// Number of iterations that went through the child.
    pub visits: u32,

    /// Accumulated reward for the player making `mv`.
    pub win_score: f64,
}

impl<M> ChildStats<M> {
    /// Mean reward for the player making the move.
    pub fn win_rate(&self) -> f64 {
        if self.visits == 0 {
            0.0
        } else {
            self.win_score / self.visits as f64
        }
    }
}

/// Result of a UCT search.
#[derive(Clone, Debug)]
pub struct SearchResult<M> {
    /// Move of the most visited root child; None if the root has no legal moves.
    pub best_move: Option<M>,

    /// Statistics for each root child, in the order the children were created.
    pub children: Vec<ChildStats<M>>,

    /// Number of iterations run (the root's visit count).
    pub iterations: usize,

    /// Number of nodes in the tree when the search finished.
    pub tree_size: usize,

    /// Visit count of the root.
    pub root_visits: u32,
}

impl<M: Copy + PartialEq> SearchResult<M> {
    /// Extract search results from the root of a finished tree.
    pub fn from_tree(tree: &Tree<M>) -> Self {
        let root = tree.root();

        let children: Vec<ChildStats<M>> = root
            .children
            .iter()
            .filter_map(|&id| {
                let child = tree.get(id);
                child.mv.map(|mv| ChildStats {
                    mv,
                    visits: child.visit_count,
                    win_score: child.win_score,
                })
            })
            .collect();

        let best_move = tree
            .most_visited_child(NodeId::ROOT)
            .and_then(|id| tree.get(id).mv);

        Self {
            best_move,
            children,
            iterations: root.visit_count as usize,
            tree_size: tree.len(),
            root_visits: root.visit_count,
        }
    }

    /// Get the best move (None means there is nothing to play).
    pub fn best(&self) -> Option<M> {
        self.best_move
    }

    /// Visit counts for each root child.
    pub fn visit_counts(&self) -> Vec<(M, u32)> {
        self.children.iter().map(|c| (c.mv, c.visits)).collect()
    }
}

/// UCT searcher.
///
/// Generic over:
/// - `G`: The game being played
/// - `P`: The move policy used during simulation
/// - `R`: The random number generator
///
/// A fresh tree is built by every call to [`Uct::search`]; nothing carries
/// over from one call to the next except the random generator's state.
pub struct Uct<G: Game, P: RolloutPolicy<G>, R: Rng> {
    config: UctConfig,
    policy: P,
    rng: R,
    _game: PhantomData<G>,
}

impl<G, R> Uct<G, UniformRollout, R>
where
    G: Game,
    R: Rng,
{
    /// Create a searcher with uniform random playouts.
    pub fn with_uniform_rollouts(config: UctConfig, rng: R) -> Self {
        Self::new(config, UniformRollout, rng)
    }
}

impl<G, P, R> Uct<G, P, R>
where
    G: Game,
    P: RolloutPolicy<G>,
    R: Rng,
{
    /// Create a new UCT instance.
    pub fn new(config: UctConfig, policy: P, rng: R) -> Self {
        Self {
            config,
            policy,
            rng,
            _game: PhantomData,
        }
    }

    /// The configuration in use.
    pub fn config(&self) -> &UctConfig {
        &self.config
    }

    /// Run UCT from the given state, returning the move to play and root statistics.
    ///
    /// # Errors
    /// Propagates `IllegalMove` and `NotTerminal` from the game, and
    /// `InvalidConfig` for an unusable exploration constant.
    pub fn search(&mut self, game: &G, state: &G::State) -> Result<SearchResult<G::Move>> {
        let tree = self.build_tree(game, state)?;
        let result = SearchResult::from_tree(&tree);

        debug!(
            iterations = result.iterations,
            nodes = result.tree_size,
            best = ?result.best_move,
            "UCT search complete"
        );

        Ok(result)
    }

    /// Run the full iteration budget and hand back the tree.
    ///
    /// Used by [`Uct::search`]; exposed so the tree can be inspected or dumped.
    pub fn build_tree(&mut self, game: &G, state: &G::State) -> Result<Tree<G::Move>> {
        self.config.validate()?;

        let mut tree = Tree::new(game.legal_moves(state), game.player_just_moved(state));

        if tree.root().untried_moves.is_empty() {
            // Nothing to search; the caller gets "no move"
            debug!("root has no legal moves, skipping search");
            return Ok(tree);
        }

        for _ in 0..self.config.iterations {
            self.iterate(game, &mut tree, state.clone())?;
        }

        debug!("root children:\n{}", tree.children_summary(NodeId::ROOT));
        trace!("search tree:\n{}", tree);

        Ok(tree)
    }

    /// Run a single iteration: select -> expand -> simulate -> backpropagate.
    fn iterate(&mut self, game: &G, tree: &mut Tree<G::Move>, mut state: G::State) -> Result<()> {
        let selected = self.select(game, tree, &mut state)?;
        let leaf = self.expand(game, tree, selected, &mut state)?;
        let plies = self.simulate(game, &mut state)?;
        backpropagate(game, tree, leaf, &state)?;

        trace!(
            leaf = leaf.index(),
            depth = tree.depth(leaf),
            plies = plies,
            "UCT iteration complete"
        );

        Ok(())
    }

    /// Descend from the root by UCB1 while the current node is fully
    /// expanded and has children, applying each chosen move to `state`.
    pub fn select(
        &self,
        game: &G,
        tree: &Tree<G::Move>,
        state: &mut G::State,
    ) -> Result<NodeId> {
        let mut current = NodeId::ROOT;

        while tree.get(current).is_fully_expanded() {
            let Some(child) = ucb::select_child(tree, current, self.config.exploration)? else {
                // Terminal position
                break;
            };
            if let Some(mv) = tree.get(child).mv {
                game.apply(state, mv)?;
            }
            current = child;
        }

        Ok(current)
    }

    /// Add a child for one untried move of `node_id`, chosen uniformly at
    /// random, and return it. Returns `node_id` itself when nothing is untried.
    pub fn expand(
        &mut self,
        game: &G,
        tree: &mut Tree<G::Move>,
        node_id: NodeId,
        state: &mut G::State,
    ) -> Result<NodeId> {
        let untried = &tree.get(node_id).untried_moves;
        if untried.is_empty() {
            return Ok(node_id);
        }

        let mv = untried[self.rng.gen_range(0..untried.len())];
        game.apply(state, mv)?;

        let child = tree.add_child(
            node_id,
            mv,
            game.legal_moves(state),
            game.player_just_moved(state),
        );
        Ok(child)
    }

    /// Play policy moves on `state` until no legal move is left.
    ///
    /// Returns the number of moves played.
    pub fn simulate(&mut self, game: &G, state: &mut G::State) -> Result<usize> {
        let mut plies = 0;

        loop {
            let legal_moves = game.legal_moves(state);
            if legal_moves.is_empty() {
                break;
            }
            let mv = self.policy.choose(game, state, &legal_moves, &mut self.rng);
            game.apply(state, mv)?;
            plies += 1;
        }

        Ok(plies)
    }
}

/// Credit the finished playout in `terminal_state` to `leaf` and its ancestors.
///
/// Each node is scored from the point of view of its own `player_just_moved`.
///
/// # Errors
/// Returns `UctError::NotTerminal` if the game has no result for `terminal_state`.
pub fn backpropagate<G: Game>(
    game: &G,
    tree: &mut Tree<G::Move>,
    leaf: NodeId,
    terminal_state: &G::State,
) -> Result<()> {
    tree.backpropagate(leaf, |player| {
        game.result(terminal_state, player).ok_or(UctError::NotTerminal)
    })
}

/// Run a UCT search with uniform random playouts and return the move to play.
///
/// Returns `Ok(None)` when `state` has no legal moves. `state` itself is
/// never modified.
///
/// # Example
///
/// ```
/// use uct_mcts::{search, games::Nim, UctConfig};
/// use uct_core::Game;
/// use rand::SeedableRng;
/// use rand_chacha::ChaCha8Rng;
///
/// let game = Nim::new(5);
/// let state = game.initial_state();
/// let mut rng = ChaCha8Rng::seed_from_u64(42);
///
/// let best = search(&game, &state, &UctConfig::with_iterations(500), &mut rng).unwrap();
/// assert!(best.is_some());
/// ```
pub fn search<G, R>(
    game: &G,
    state: &G::State,
    config: &UctConfig,
    rng: &mut R,
) -> Result<Option<G::Move>>
where
    G: Game,
    R: Rng,
{
    let mut uct = Uct::with_uniform_rollouts(config.clone(), rng);
    Ok(uct.search(game, state)?.best_move)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::{Nim, NimMove};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use uct_core::{Player, Reward};

    /// Lists a move and then refuses to play it.
    #[derive(Clone, Default)]
    struct RejectsOwnMoves {
        applies: Arc<AtomicUsize>,
    }

    impl Game for RejectsOwnMoves {
        type State = ();
        type Move = u8;

        fn initial_state(&self) {}

        fn legal_moves(&self, _state: &()) -> Vec<u8> {
            vec![0, 1]
        }

        fn apply(&self, _state: &mut (), mv: u8) -> Result<()> {
            self.applies.fetch_add(1, Ordering::SeqCst);
            Err(UctError::IllegalMove(format!("move {} refused", mv)))
        }

        fn is_terminal(&self, _state: &()) -> bool {
            false
        }

        fn result(&self, _state: &(), _perspective: Player) -> Option<Reward> {
            None
        }

        fn current_player(&self, _state: &()) -> Player {
            Player::First
        }
    }

    /// Counts down to zero moves left but never reports a result.
    #[derive(Clone, Default)]
    struct NeverDecided {
        applies: Arc<AtomicUsize>,
    }

    impl Game for NeverDecided {
        type State = u32;
        type Move = u8;

        fn initial_state(&self) -> u32 {
            3
        }

        fn legal_moves(&self, state: &u32) -> Vec<u8> {
            if *state > 0 {
                vec![1]
            } else {
                Vec::new()
            }
        }

        fn apply(&self, state: &mut u32, _mv: u8) -> Result<()> {
            self.applies.fetch_add(1, Ordering::SeqCst);
            *state -= 1;
            Ok(())
        }

        fn is_terminal(&self, state: &u32) -> bool {
            *state == 0
        }

        fn result(&self, _state: &u32, _perspective: Player) -> Option<Reward> {
            None
        }

        fn current_player(&self, state: &u32) -> Player {
            if *state % 2 == 1 {
                Player::First
            } else {
                Player::Second
            }
        }
    }

    fn uct(seed: u64, iterations: usize) -> Uct<Nim, UniformRollout, ChaCha8Rng> {
        Uct::with_uniform_rollouts(
            UctConfig::with_iterations(iterations),
            ChaCha8Rng::seed_from_u64(seed),
        )
    }

    #[test]
    fn test_search_basic() {
        let game = Nim::new(7);
        let state = game.initial_state();
        let mut uct = uct(42, 100);

        let result = uct.search(&game, &state).unwrap();

        assert!(result.best_move.is_some());
        assert_eq!(result.iterations, 100);
        assert_eq!(result.root_visits, 100);
        assert_eq!(result.children.len(), 3);

        // Every iteration goes through exactly one root child
        let total: u32 = result.children.iter().map(|c| c.visits).sum();
        assert_eq!(total, 100);
    }

    #[test]
    fn test_search_deterministic() {
        let game = Nim::new(9);
        let state = game.initial_state();

        let result1 = uct(12345, 50).search(&game, &state).unwrap();
        let result2 = uct(12345, 50).search(&game, &state).unwrap();

        assert_eq!(result1.best_move, result2.best_move);
        assert_eq!(result1.visit_counts(), result2.visit_counts());
    }

    #[test]
    fn test_search_terminal_root_has_no_move() {
        let game = Nim::new(0);
        let state = game.initial_state();

        let result = uct(1, 100).search(&game, &state).unwrap();
        assert_eq!(result.best_move, None);
        assert!(result.children.is_empty());
        assert_eq!(result.tree_size, 1);
    }

    #[test]
    fn test_search_zero_iterations_has_no_move() {
        let game = Nim::new(5);
        let state = game.initial_state();

        let result = uct(1, 0).search(&game, &state).unwrap();
        assert_eq!(result.best_move, None);
        assert_eq!(result.root_visits, 0);
    }

    #[test]
    fn test_single_legal_move_one_iteration() {
        let game = Nim::new(1);
        let state = game.initial_state();

        let result = uct(3, 1).search(&game, &state).unwrap();
        assert_eq!(result.best_move, Some(NimMove(1)));
    }

    #[test]
    fn test_search_does_not_touch_caller_state() {
        let game = Nim::new(8);
        let state = game.initial_state();
        let before = state.clone();

        uct(5, 200).search(&game, &state).unwrap();
        assert_eq!(state, before);
    }

    #[test]
    fn test_search_rejects_bad_config() {
        let game = Nim::new(5);
        let state = game.initial_state();
        let config = UctConfig::with_iterations(10).with_exploration(-2.0);
        let mut uct = Uct::with_uniform_rollouts(config, ChaCha8Rng::seed_from_u64(0));

        assert!(matches!(
            uct.search(&game, &state),
            Err(UctError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_expand_adds_one_child() {
        let game = Nim::new(5);
        let mut state = game.initial_state();
        let mut uct = uct(9, 1);
        let mut tree = Tree::new(game.legal_moves(&state), game.player_just_moved(&state));

        let child = uct.expand(&game, &mut tree, NodeId::ROOT, &mut state).unwrap();

        assert_ne!(child, NodeId::ROOT);
        assert_eq!(tree.len(), 2);
        assert_eq!(tree.root().untried_moves.len(), 2);
        assert_eq!(tree.get(child).player_just_moved, Player::First);

        // The working state has the expanded move applied
        let taken = tree.get(child).mv.unwrap();
        assert_eq!(state.chips(), 5 - taken.0);
    }

    #[test]
    fn test_expand_fully_expanded_is_noop() {
        let game = Nim::new(1);
        let mut state = game.initial_state();
        let mut uct = uct(9, 1);
        let mut tree = Tree::new(game.legal_moves(&state), game.player_just_moved(&state));

        let child = uct.expand(&game, &mut tree, NodeId::ROOT, &mut state).unwrap();
        let again = uct.expand(&game, &mut tree, child, &mut state).unwrap();
        assert_eq!(again, child);
        assert_eq!(tree.len(), 2);
    }

    #[test]
    fn test_simulate_reaches_terminal() {
        let game = Nim::new(12);
        let mut state = game.initial_state();
        let mut uct = uct(11, 1);

        let plies = uct.simulate(&game, &mut state).unwrap();

        assert!(plies >= 4); // at most 3 chips per move
        assert!(game.is_terminal(&state));
        assert!(game.legal_moves(&state).is_empty());
    }

    #[test]
    fn test_backpropagate_credits_each_perspective() {
        // First takes 1 (A), Second takes 1 (B) and wins Nim(2).
        let game = Nim::new(2);
        let mut state = game.initial_state();
        let mut tree = Tree::new(game.legal_moves(&state), game.player_just_moved(&state));

        game.apply(&mut state, NimMove(1)).unwrap();
        let a = tree.add_child(
            NodeId::ROOT,
            NimMove(1),
            game.legal_moves(&state),
            game.player_just_moved(&state),
        );
        game.apply(&mut state, NimMove(1)).unwrap();
        let b = tree.add_child(
            a,
            NimMove(1),
            game.legal_moves(&state),
            game.player_just_moved(&state),
        );

        assert_eq!(game.result(&state, Player::Second), Some(Reward::WIN));
        backpropagate(&game, &mut tree, b, &state).unwrap();

        assert_eq!(tree.get(b).win_score, 1.0);
        assert_eq!(tree.get(a).win_score, 0.0);
        assert_eq!(tree.root().win_score, 1.0);
    }

    #[test]
    fn test_backpropagate_requires_terminal_state() {
        let game = Nim::new(4);
        let state = game.initial_state();
        let mut tree = Tree::new(game.legal_moves(&state), game.player_just_moved(&state));

        assert_eq!(
            backpropagate(&game, &mut tree, NodeId::ROOT, &state),
            Err(UctError::NotTerminal)
        );
    }

    #[test]
    fn test_free_search_function() {
        let game = Nim::new(4);
        let state = game.initial_state();
        let mut rng = ChaCha8Rng::seed_from_u64(2);

        let mv = search(&game, &state, &UctConfig::with_iterations(50), &mut rng).unwrap();
        assert!(matches!(mv, Some(NimMove(1..=3))));
    }

    #[test]
    fn test_search_propagates_illegal_move() {
        let game = RejectsOwnMoves::default();
        let mut uct = Uct::with_uniform_rollouts(
            UctConfig::with_iterations(100),
            ChaCha8Rng::seed_from_u64(0),
        );

        let err = uct.search(&game, &game.initial_state()).unwrap_err();
        assert!(matches!(err, UctError::IllegalMove(_)));
        // The first expansion fails and no further iteration runs
        assert_eq!(game.applies.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_search_propagates_missing_result() {
        let game = NeverDecided::default();
        let state = game.initial_state();
        let mut uct = Uct::with_uniform_rollouts(
            UctConfig::with_iterations(100),
            ChaCha8Rng::seed_from_u64(0),
        );

        assert_eq!(uct.search(&game, &state).unwrap_err(), UctError::NotTerminal);
        // One expansion plus a two-move playout, then the search stops
        assert_eq!(game.applies.load(Ordering::SeqCst), 3);
        assert_eq!(state, 3);
    }
}
