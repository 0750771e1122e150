use std::time::Instant;

use tracing::{info, warn};

use crate::controller::{Controller, TurnSummary};
use crate::infra::{BotConfig, GameObserver, ReplayFile, Sandbox};

pub struct Game {
    config: BotConfig,
    sandbox: Sandbox,
    observer: Box<dyn GameObserver>,
    replay: Option<ReplayFile>,
}

impl Game {
    pub fn new(
        config: BotConfig,
        observer: impl GameObserver + 'static,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let sandbox = Sandbox::generate(config.seed, config.map_size)?;
        let replay = config
            .replays_folder
            .as_deref()
            .map(|folder| ReplayFile::new(folder, config.seed))
            .transpose()?;
        if let Some(replay) = &replay {
            info!("Writing replay to {}", replay.path().display());
        }

        Ok(Self {
            config,
            sandbox,
            observer: Box::new(observer),
            replay,
        })
    }

    /// Play until the turn limit, returning the final summary.
    pub fn run(&mut self) -> Result<TurnSummary, Box<dyn std::error::Error>> {
        let map = &self.sandbox.world().map;
        self.observer
            .on_game_start(map.width, map.height, self.config.seed);

        let mut controller = Controller::new(self.sandbox.world(), self.config.fleet);

        while self.sandbox.turn() < self.config.turns {
            let turn_start = Instant::now();
            let turn = self.sandbox.turn();

            self.observer.on_turn(turn, &controller.summary());

            let actions = controller.collect_actions(self.sandbox.world());
            self.observer.on_actions(turn, &actions);
            if let Some(replay) = self.replay.as_mut() {
                replay.append(turn, &actions)?;
            }

            self.sandbox.apply(&actions);
            controller.update(self.sandbox.world());

            let turn_duration = turn_start.elapsed();
            if turn_duration.as_millis() > 100 {
                warn!(
                    "Turn {} took {:.2}ms ({} actions)",
                    turn,
                    turn_duration.as_secs_f64() * 1000.0,
                    actions.len()
                );
            }
        }

        let summary = controller.summary();
        self.observer.on_game_finished(self.sandbox.turn(), &summary);
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::collections::HashSet;
    use std::rc::Rc;

    use super::*;
    use crate::infra::{Command, FleetConfig, Position, TaskQuota};

    #[derive(Default)]
    struct Recorded {
        started: bool,
        turns: Vec<u32>,
        finished: Option<u32>,
    }

    struct RecordingObserver(Rc<RefCell<Recorded>>);

    impl GameObserver for RecordingObserver {
        fn on_game_start(&mut self, _width: i32, _height: i32, _seed: u64) {
            self.0.borrow_mut().started = true;
        }

        fn on_turn(&mut self, turn: u32, _summary: &TurnSummary) {
            self.0.borrow_mut().turns.push(turn);
        }

        fn on_game_finished(&mut self, final_turn: u32, _summary: &TurnSummary) {
            self.0.borrow_mut().finished = Some(final_turn);
        }
    }

    #[test]
    fn test_run_notifies_observer_every_turn() {
        let recorded = Rc::new(RefCell::new(Recorded::default()));
        let config = BotConfig {
            seed: 3,
            map_size: 12,
            turns: 20,
            ..BotConfig::default()
        };

        let mut game = Game::new(config, RecordingObserver(Rc::clone(&recorded))).unwrap();
        let summary = game.run().unwrap();

        let recorded = recorded.borrow();
        assert!(recorded.started);
        assert_eq!(recorded.turns, (0..20).collect::<Vec<_>>());
        assert_eq!(recorded.finished, Some(20));
        assert_eq!(summary.turn, 20);
        assert!(summary.workers >= 1);
        assert!(summary.research_points >= 1);
    }

    #[test]
    fn test_slots_and_moves_stay_exclusive_over_a_game() {
        for seed in [0, 7, 21] {
            let mut sandbox = Sandbox::generate(seed, 16).unwrap();
            let config = FleetConfig {
                task_quota: TaskQuota::new(0.5, 0.3, 0.2),
                ..FleetConfig::default()
            };
            let mut controller = Controller::new(sandbox.world(), config);

            for _ in 0..120 {
                let actions = controller.collect_actions(sandbox.world());

                let mut slots = HashSet::new();
                for mine in controller.registry().mines() {
                    for (_, tile) in mine.assigned_tiles() {
                        assert!(slots.insert(tile), "tile {} has two holders", tile);
                    }
                }

                let mut targets: HashSet<Position> = HashSet::new();
                for action in &actions {
                    if let Command::Move { unit, direction } = action {
                        let origin = sandbox
                            .world()
                            .player
                            .units
                            .iter()
                            .find(|u| u.id == *unit)
                            .map(|u| u.position)
                            .unwrap();
                        assert!(
                            targets.insert(origin.translate(*direction)),
                            "two moves onto the same tile in turn {}",
                            sandbox.turn()
                        );
                    }
                }

                sandbox.apply(&actions);
                controller.update(sandbox.world());
            }

            assert_eq!(controller.summary().workers, sandbox.world().player.units.len());
        }
    }
}
