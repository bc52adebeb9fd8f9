//! Tests for the rollout scheduler: thinking state machine, shared tree
//! counts under concurrency and live-game updates.

use std::thread;
use std::time::Duration;

use flatgo::ai::Ai;
use flatgo::board::{Move, MoveError};
use flatgo::color::Color;
use flatgo::config::EngineConfig;

fn config(workers: usize) -> EngineConfig {
    EngineConfig::default()
        .with_board_size(7)
        .with_workers(workers)
        .with_seed(2024)
}

fn children_sum(ai: &Ai) -> u64 {
    ai.root_children().iter().map(|(_, s)| s.simulations).sum()
}

#[test]
fn test_single_worker_rollout_counts() {
    let mut ai = Ai::new(config(1));
    ai.run_rollouts(200);
    assert_eq!(ai.num_simulations(), 200);
    assert_eq!(children_sum(&ai), 200);
    for (_, stats) in ai.root_children() {
        assert_eq!(
            stats.black_wins + stats.white_wins + stats.jigos,
            stats.simulations
        );
    }
}

#[test]
fn test_parallel_workers_lose_no_counts() {
    let mut ai = Ai::new(config(4));
    ai.start_thinking();
    thread::sleep(Duration::from_millis(200));
    assert!(ai.stop_thinking());

    let sims = ai.num_simulations();
    assert!(sims > 0);
    assert_eq!(sims, ai.completed_rollouts());
    assert_eq!(children_sum(&ai), sims);
}

#[test]
fn test_num_simulations_while_thinking() {
    let mut ai = Ai::new(config(2));
    ai.start_thinking();
    let mut last = 0;
    for _ in 0..5 {
        thread::sleep(Duration::from_millis(20));
        let now = ai.num_simulations();
        assert!(now >= last);
        last = now;
    }
    ai.stop_thinking();
    assert!(ai.num_simulations() >= last);
}

#[test]
fn test_stop_thinking_twice() {
    let mut ai = Ai::new(config(2));
    ai.start_thinking();
    assert!(ai.stop_thinking());
    assert!(!ai.stop_thinking());
}

#[test]
fn test_play_move_reroots_tree() {
    let mut ai = Ai::new(config(1));
    ai.run_rollouts(300);
    let (mv, stats) = ai
        .root_children()
        .into_iter()
        .max_by_key(|(_, s)| s.simulations)
        .unwrap();
    let (x, y) = ai.move_xy(mv).unwrap();

    ai.play_move(x, y, Color::Black).unwrap();
    assert!(ai.is_thinking());
    ai.stop_thinking();

    assert_eq!(ai.board().get(x, y), Some(Color::Black));
    assert!(ai.num_simulations() >= stats.simulations);
    assert_eq!(ai.num_simulations(), children_sum(&ai));
}

#[test]
fn test_play_move_with_unexpected_color_resets_tree() {
    let mut ai = Ai::new(config(1));
    ai.run_rollouts(50);
    // White plays first although the tree was searched for Black.
    ai.play_move(3, 3, Color::White).unwrap();
    ai.stop_thinking();
    // Only the rollouts run after the move are left in the tree.
    assert_eq!(ai.num_simulations(), ai.completed_rollouts() - 50);
    assert_eq!(ai.board().to_move(), Color::Black);
}

#[test]
fn test_illegal_move_keeps_live_state() {
    let mut ai = Ai::new(config(1));
    ai.play_move(0, 0, Color::Black).unwrap();
    ai.play_move(1, 1, Color::Black).unwrap();
    ai.play_move(0, 2, Color::Black).unwrap();
    ai.stop_thinking();
    ai.run_rollouts(25);
    let before = ai.num_simulations();

    // White at A2 would have no liberties.
    assert_eq!(ai.play_move(0, 1, Color::White), Err(MoveError::Suicide));
    assert!(ai.is_thinking());
    ai.stop_thinking();
    assert_eq!(ai.board().get(0, 1), None);
    assert_eq!(ai.board().number_of_stones().black, 3);
    assert!(ai.num_simulations() >= before);
}

#[test]
fn test_generate_move_plays_best_child() {
    let mut ai = Ai::new(config(2));
    let mv = ai.generate_move(Color::Black, Duration::from_millis(100));
    ai.stop_thinking();

    let Move::Play(_) = mv else {
        panic!("the opening move on an empty board should not be a pass");
    };
    let (x, y) = ai.move_xy(mv).unwrap();
    assert_eq!(ai.board().get(x, y), Some(Color::Black));
    assert_eq!(ai.board().to_move(), Color::White);
    assert!(ai.num_simulations() > 0);
}

#[test]
fn test_generate_move_for_the_other_color() {
    let mut ai = Ai::new(config(2));
    let mv = ai.generate_move(Color::White, Duration::from_millis(50));
    ai.stop_thinking();
    let (x, y) = ai.move_xy(mv).unwrap();
    assert_eq!(ai.board().get(x, y), Some(Color::White));
    assert_eq!(ai.board().to_move(), Color::Black);
}

#[test]
fn test_generate_move_after_game_end_passes() {
    let mut ai = Ai::new(config(1));
    ai.play_pass(Color::Black);
    ai.play_pass(Color::White);
    let mv = ai.generate_move(Color::Black, Duration::from_millis(20));
    ai.stop_thinking();
    assert_eq!(mv, Move::Pass);
}

#[test]
fn test_clear_board_and_komi() {
    let mut ai = Ai::new(config(1));
    ai.play_move(2, 2, Color::Black).unwrap();
    ai.set_komi(0.5);
    assert!(ai.is_thinking());
    ai.clear_board();
    assert!(!ai.is_thinking());
    assert_eq!(ai.num_simulations(), 0);
    assert_eq!(ai.board().number_of_stones().black, 0);

    ai.set_board_size(5);
    assert_eq!(ai.board().size(), 5);
}

#[test]
fn test_zero_tree_depth_in_struct_literal_is_unlimited() {
    let config = EngineConfig {
        board_size: 5,
        max_tree_depth: 0,
        workers: 1,
        seed: Some(1),
        ..Default::default()
    };
    let mut ai = Ai::new(config);
    ai.run_rollouts(20);
    assert_eq!(ai.num_simulations(), 20);
    assert_eq!(children_sum(&ai), 20);

    let mv = ai.generate_move(Color::Black, Duration::from_millis(30));
    ai.stop_thinking();
    assert_ne!(mv, Move::Pass);
}

#[test]
fn test_zero_workers_in_struct_literal_still_thinks() {
    let config = EngineConfig {
        board_size: 5,
        workers: 0,
        seed: Some(4),
        ..Default::default()
    };
    let mut ai = Ai::new(config);
    ai.start_thinking();
    assert!(ai.is_thinking());
    assert!(ai.stop_thinking());
}
