//! Flatgo: a flat Monte Carlo Go engine.
//!
//! The engine estimates the best next move by running many uniformly random
//! games from the current position and counting how often each first move
//! led to a win. Rollouts run on a pool of worker threads that share one
//! statistics tree.
//!
//! ## Modules
//!
//! - [`constants`] - Default parameters
//! - [`config`] - Runtime engine configuration
//! - [`coord`] - Field indices, neighbours and letter coordinates
//! - [`field_indices`] - Sets of field indices used by the board
//! - [`color`] - Stone colours
//! - [`group`] - Stone groups and their liberties
//! - [`board`] - Board state, captures and legality
//! - [`playout`] - Random game simulation and scoring
//! - [`tree`] - Rollout statistics tree
//! - [`ai`] - Parallel rollout scheduler
//! - [`gtp`] - Go Text Protocol front-end
//!
//! ## Example
//!
//! ```
//! use flatgo::ai::Ai;
//! use flatgo::color::Color;
//! use flatgo::config::EngineConfig;
//!
//! let mut ai = Ai::new(EngineConfig::default().with_workers(1));
//! ai.play_move(4, 4, Color::Black).unwrap();
//! ai.stop_thinking();
//!
//! // Sample 100 more random games from here.
//! ai.run_rollouts(100);
//! assert!(ai.num_simulations() >= 100);
//! ```

pub mod ai;
pub mod board;
pub mod color;
pub mod config;
pub mod constants;
pub mod coord;
pub mod field_indices;
pub mod group;
pub mod gtp;
pub mod playout;
pub mod tree;
