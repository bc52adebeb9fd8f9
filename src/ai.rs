//! Parallel rollout scheduler.
//!
//! [`Ai`] owns the live game: one [`Board`] and one [`SearchTree`] rooted at
//! the current position. While it is *thinking*, a fixed pool of worker
//! threads repeatedly copies the live board, plays a random game to the end,
//! and records the sampled move path with its outcome in the shared tree.
//!
//! The live board is handed to the workers as an immutable snapshot, so each
//! rollout works on its own private copy. The tree is shared behind a mutex;
//! a worker takes it once per finished rollout to create the nodes along its
//! path and count the result.
//!
//! Workers are stopped cooperatively: [`Ai::stop_thinking`] raises a flag
//! and joins every worker. A rollout that is already running always
//! finishes, so a stop can take up to one rollout's duration. Every
//! operation that changes the live position stops the workers first.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use fastrand::Rng;
use log::{debug, error, info, warn};

use crate::board::{Board, Move, MoveError};
use crate::color::Color;
use crate::config::EngineConfig;
use crate::coord::{format_vertex, pos_to_xy, xy_to_pos};
use crate::playout::{rollout, score};
use crate::tree::{SearchTree, Stats};

/// Move-recommendation engine driving rollouts in the background.
pub struct Ai {
    config: EngineConfig,
    board: Board,
    tree: Arc<Mutex<SearchTree>>,
    stop: Arc<AtomicBool>,
    workers: Vec<JoinHandle<u64>>,
    rng: Rng,
    completed: u64,
}

impl Default for Ai {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl Ai {
    /// Create an idle engine on an empty board.
    pub fn new(config: EngineConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => Rng::with_seed(seed),
            None => Rng::new(),
        };
        Self {
            board: Board::new(config.board_size),
            tree: Arc::new(Mutex::new(SearchTree::new(config.max_tree_depth))),
            stop: Arc::new(AtomicBool::new(false)),
            workers: Vec::new(),
            rng,
            completed: 0,
            config,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The live board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn is_thinking(&self) -> bool {
        !self.workers.is_empty()
    }

    /// Total number of rollouts finished by this engine.
    pub fn completed_rollouts(&self) -> u64 {
        self.completed
    }

    fn lock_tree(&self) -> MutexGuard<'_, SearchTree> {
        lock(&self.tree)
    }

    // -------------------------------------------------------------------------
    // Thinking
    // -------------------------------------------------------------------------

    /// Start the worker pool. Does nothing if the engine is already thinking.
    pub fn start_thinking(&mut self) {
        if self.is_thinking() {
            return;
        }
        self.stop.store(false, Ordering::Release);
        let snapshot = Arc::new(self.board.clone());

        for i in 0..self.config.workers.max(1) {
            let board = Arc::clone(&snapshot);
            let tree = Arc::clone(&self.tree);
            let stop = Arc::clone(&self.stop);
            let rng = Rng::with_seed(self.rng.u64(..));
            let komi = self.config.komi;
            let spawned = thread::Builder::new()
                .name(format!("rollout-{i}"))
                .spawn(move || worker_loop(&board, &tree, &stop, komi, rng));
            match spawned {
                Ok(handle) => self.workers.push(handle),
                Err(e) => error!("failed to spawn rollout worker {i}: {e}"),
            }
        }
        info!(
            "thinking with {} workers for {}",
            self.workers.len(),
            self.board.to_move()
        );
    }

    /// Stop the worker pool and wait for every in-flight rollout to finish.
    ///
    /// Returns `false` if the engine was not thinking.
    pub fn stop_thinking(&mut self) -> bool {
        if !self.is_thinking() {
            return false;
        }
        self.stop.store(true, Ordering::Release);
        let mut rollouts = 0;
        for handle in self.workers.drain(..) {
            match handle.join() {
                Ok(n) => rollouts += n,
                Err(_) => error!("rollout worker panicked"),
            }
        }
        self.completed += rollouts;
        info!(
            "stopped thinking after {rollouts} rollouts, {} simulations at root",
            self.num_simulations()
        );
        true
    }

    /// Run `n` rollouts on the calling thread. Any background thinking is
    /// paused for the duration.
    pub fn run_rollouts(&mut self, n: usize) {
        let was_thinking = self.stop_thinking();
        let komi = self.config.komi;
        for _ in 0..n {
            let mut board = self.board.clone();
            let path = rollout(&mut board, &mut self.rng);
            let outcome = score(&board, komi);
            lock(&self.tree).record(&path, outcome);
        }
        self.completed += n as u64;
        if was_thinking {
            self.start_thinking();
        }
    }

    /// Number of rollouts counted at the root.
    pub fn num_simulations(&self) -> u64 {
        let tree = self.lock_tree();
        tree.stats(tree.root()).simulations
    }

    /// Statistics of the root's children, in move order.
    pub fn root_children(&self) -> Vec<(Move, Stats)> {
        let tree = self.lock_tree();
        tree.children(tree.root())
            .map(|(mv, id)| (mv, tree.stats(id)))
            .collect()
    }

    // -------------------------------------------------------------------------
    // Live game
    // -------------------------------------------------------------------------

    /// Play `color` at `(x, y)` on the live board and re-root the tree.
    ///
    /// Thinking is paused around the update and resumed afterwards, also
    /// when the move is rejected. A rejected move leaves board and tree
    /// unchanged.
    pub fn play_move(&mut self, x: usize, y: usize, color: Color) -> Result<(), MoveError> {
        let p = xy_to_pos(x, y, self.board.size());
        self.stop_thinking();
        let result = self.apply(Move::Play(p), color);
        self.start_thinking();
        result
    }

    /// Record a pass by `color` and re-root the tree.
    pub fn play_pass(&mut self, color: Color) {
        self.stop_thinking();
        self.apply_pass(color);
        self.start_thinking();
    }

    fn apply(&mut self, mv: Move, color: Color) -> Result<(), MoveError> {
        match mv {
            Move::Play(p) => {
                let searched_for = self.board.to_move();
                self.board.play_at(p, color)?;
                self.advance_tree(mv, color, searched_for);
            }
            Move::Pass => self.apply_pass(color),
        }
        Ok(())
    }

    fn apply_pass(&mut self, color: Color) {
        let searched_for = self.board.to_move();
        self.board.play_pass(color);
        self.advance_tree(Move::Pass, color, searched_for);
    }

    /// Follow a move played by `color` on a tree searched for `searched_for`.
    fn advance_tree(&mut self, mv: Move, color: Color, searched_for: Color) {
        let mut tree = self.lock_tree();
        if color == searched_for {
            tree.advance(mv);
        } else {
            // The tree holds moves of the other colour at this ply.
            tree.clear();
        }
    }

    /// Think for `budget`, then play and return the best move for `color`.
    ///
    /// The best move is the root child with the highest winrate for
    /// `color`; ties go to the first child in move order. If no rollout has
    /// finished yet the engine passes.
    pub fn generate_move(&mut self, color: Color, budget: Duration) -> Move {
        self.stop_thinking();
        if self.board.to_move() != color {
            self.board.set_to_move(color);
            self.lock_tree().clear();
        }

        self.start_thinking();
        thread::sleep(budget);
        self.stop_thinking();

        let mv = match self.best_move(color) {
            Some(mv) => mv,
            None => {
                warn!("no rollouts finished within {budget:?}, passing");
                Move::Pass
            }
        };
        let played = match self.apply(mv, color) {
            Ok(()) => mv,
            Err(e) => {
                warn!("best move {mv:?} was rejected ({e}), passing instead");
                self.apply_pass(color);
                Move::Pass
            }
        };
        info!("{color} plays {}", self.describe(played));
        self.start_thinking();
        played
    }

    /// Root child with the best winrate for `color`.
    fn best_move(&self, color: Color) -> Option<Move> {
        let tree = self.lock_tree();
        let mut best: Option<(Move, f64)> = None;
        for (mv, id) in tree.children(tree.root()) {
            let stats = tree.stats(id);
            let rate = stats.winrate(color);
            debug!(
                "candidate {} sims={} wins={} wr={rate:.3}",
                self.describe(mv),
                stats.simulations,
                stats.wins_for(color)
            );
            if best.is_none_or(|(_, r)| rate > r) {
                best = Some((mv, rate));
            }
        }
        best.map(|(mv, _)| mv)
    }

    /// Human-readable form of a move for logs.
    fn describe(&self, mv: Move) -> String {
        match mv {
            Move::Pass => "pass".to_string(),
            Move::Play(p) => {
                let (x, y) = pos_to_xy(p, self.board.size());
                format_vertex(x, y)
            }
        }
    }

    /// Field coordinates of a move, `None` for a pass.
    pub fn move_xy(&self, mv: Move) -> Option<(usize, usize)> {
        match mv {
            Move::Pass => None,
            Move::Play(p) => Some(pos_to_xy(p, self.board.size())),
        }
    }

    // -------------------------------------------------------------------------
    // Setup
    // -------------------------------------------------------------------------

    /// Start a new game on an empty board. The engine is left idle.
    pub fn clear_board(&mut self) {
        self.stop_thinking();
        self.board = Board::new(self.config.board_size);
        self.lock_tree().clear();
    }

    /// Change the board size and start a new game.
    pub fn set_board_size(&mut self, size: usize) {
        self.config.board_size = size;
        self.clear_board();
    }

    /// Change komi. Collected statistics are dropped since they were scored
    /// with the old value.
    pub fn set_komi(&mut self, komi: f64) {
        let was_thinking = self.stop_thinking();
        self.config.komi = komi;
        self.lock_tree().clear();
        if was_thinking {
            self.start_thinking();
        }
    }
}

impl Drop for Ai {
    fn drop(&mut self) {
        self.stop_thinking();
    }
}

/// Lock the tree, ignoring poisoning: a worker that panicked mid-update can
/// at worst leave one rollout partially counted.
fn lock(tree: &Mutex<SearchTree>) -> MutexGuard<'_, SearchTree> {
    tree.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Body of a rollout worker. Returns the number of finished rollouts.
fn worker_loop(
    board: &Board,
    tree: &Mutex<SearchTree>,
    stop: &AtomicBool,
    komi: f64,
    mut rng: Rng,
) -> u64 {
    let mut rollouts = 0;
    while !stop.load(Ordering::Acquire) {
        let mut copy = board.clone();
        let path = rollout(&mut copy, &mut rng);
        let outcome = score(&copy, komi);
        lock(tree).record(&path, outcome);
        rollouts += 1;
    }
    rollouts
}
