//! Default engine parameters.
//!
//! Everything here can be overridden at runtime through
//! [`EngineConfig`](crate::config::EngineConfig) or the command line.

use std::time::Duration;

// =============================================================================
// Board Geometry
// =============================================================================

/// Default board size (NxN).
pub const DEFAULT_BOARD_SIZE: usize = 9;

/// Smallest supported board size.
pub const MIN_BOARD_SIZE: usize = 2;

/// Largest supported board size (limited by the letter coordinate system).
pub const MAX_BOARD_SIZE: usize = 25;

/// Rollouts stop after this many moves per board point, even without two
/// passes. Random play can repeat positions forever since ko is not enforced.
pub const MAX_GAME_LEN_FACTOR: usize = 3;

// =============================================================================
// Scoring
// =============================================================================

/// Default komi (compensation points for White).
pub const DEFAULT_KOMI: f64 = 7.5;

// =============================================================================
// Search Parameters
// =============================================================================

/// Default wall-clock thinking budget for `genmove`.
pub const DEFAULT_THINKING_TIME: Duration = Duration::from_millis(1000);

/// Tree nodes are only created this many plies below the root. Deeper
/// rollout moves still happen, they just aren't recorded as nodes.
pub const DEFAULT_MAX_TREE_DEPTH: usize = 12;

/// Worker count used when the available parallelism can't be queried.
pub const FALLBACK_WORKERS: usize = 4;
