use tracing::{debug, info};

use crate::controller::TurnSummary;
use crate::infra::{Command, GameObserver};

pub struct DefaultObserver;

impl GameObserver for DefaultObserver {
    fn on_game_start(&mut self, width: i32, height: i32, seed: u64) {
        info!("Game started");
        info!("- seed: {}", seed);
        info!("- map size: {}x{}", width, height);
    }

    fn on_turn(&mut self, turn: u32, summary: &TurnSummary) {
        info!(
            "turn: {}, workers: {} ({} build, {} gather, {} rest), territory: {}, research: {}",
            turn,
            summary.workers,
            summary.builders,
            summary.gatherers,
            summary.resting,
            summary.territory_tiles,
            summary.research_points,
        );
    }

    fn on_actions(&mut self, turn: u32, actions: &[Command]) {
        for action in actions {
            debug!("turn {} action: {}", turn, action);
        }
    }

    fn on_game_finished(&mut self, final_turn: u32, summary: &TurnSummary) {
        info!("Game finished after {} turns", final_turn);
        info!(
            "Final territory: {} tiles, workers: {}, research: {}",
            summary.territory_tiles, summary.workers, summary.research_points
        );
    }
}
