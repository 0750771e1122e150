use crate::controller::TurnSummary;
use crate::infra::Command;

/// Trait for observing game events during execution
pub trait GameObserver {
    /// Called once the sandbox map has been generated
    fn on_game_start(&mut self, width: i32, height: i32, seed: u64);

    /// Called after the controller has absorbed a new observation
    fn on_turn(&mut self, turn: u32, summary: &TurnSummary);

    /// Called with the commands chosen for the turn
    fn on_actions(&mut self, _turn: u32, _actions: &[Command]) {
        // Default implementation does nothing
    }

    /// Called when the turn limit is reached or the player has nothing left
    fn on_game_finished(&mut self, final_turn: u32, summary: &TurnSummary);
}
