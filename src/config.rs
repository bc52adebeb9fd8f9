//! Engine configuration.

use std::time::Duration;

use crate::constants::{
    DEFAULT_BOARD_SIZE, DEFAULT_KOMI, DEFAULT_MAX_TREE_DEPTH, DEFAULT_THINKING_TIME,
    FALLBACK_WORKERS,
};

/// Parameters of an [`Ai`](crate::ai::Ai).
#[derive(Clone, Debug)]
pub struct EngineConfig {
    /// Board size (NxN).
    pub board_size: usize,
    /// Compensation points for White.
    pub komi: f64,
    /// Number of rollout worker threads. At least one is always started.
    pub workers: usize,
    /// Wall-clock budget used by `genmove` when none is given.
    pub thinking_time: Duration,
    /// Plies below the root for which tree nodes are created. 0 means
    /// unlimited.
    pub max_tree_depth: usize,
    /// Seed for the rollout random number generators. `None` seeds from
    /// system entropy.
    pub seed: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            board_size: DEFAULT_BOARD_SIZE,
            komi: DEFAULT_KOMI,
            workers: std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(FALLBACK_WORKERS),
            thinking_time: DEFAULT_THINKING_TIME,
            max_tree_depth: DEFAULT_MAX_TREE_DEPTH,
            seed: None,
        }
    }
}

impl EngineConfig {
    pub fn with_board_size(mut self, size: usize) -> Self {
        self.board_size = size;
        self
    }

    pub fn with_komi(mut self, komi: f64) -> Self {
        self.komi = komi;
        self
    }

    /// At least one worker is always used.
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    pub fn with_thinking_time(mut self, thinking_time: Duration) -> Self {
        self.thinking_time = thinking_time;
        self
    }

    /// A depth of 0 removes the limit.
    pub fn with_max_tree_depth(mut self, depth: usize) -> Self {
        self.max_tree_depth = depth;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.board_size, DEFAULT_BOARD_SIZE);
        assert!(config.workers >= 1);
        assert_eq!(config.seed, None);
    }

    #[test]
    fn test_builders() {
        let config = EngineConfig::default()
            .with_board_size(13)
            .with_komi(6.5)
            .with_workers(0)
            .with_max_tree_depth(0)
            .with_seed(9);
        assert_eq!(config.board_size, 13);
        assert!((config.komi - 6.5).abs() < f64::EPSILON);
        assert_eq!(config.workers, 1);
        assert_eq!(config.max_tree_depth, 0);
        assert_eq!(config.seed, Some(9));
    }
}
