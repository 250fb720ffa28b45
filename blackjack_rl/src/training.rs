use std::fs;
use std::path::{Path, PathBuf};

use crate::{agent::Agent, simulation::Game, Outcome, Result};
use log::info;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;

#[derive(Debug, Clone)]
pub struct TrainingConfig {
    pub rounds: usize,
    pub episodes_per_round: usize,
    /// Log progress every this many rounds. 0 disables it.
    pub report_every: usize,
    /// Where tables are saved after every round. None skips saving.
    pub table_dir: Option<PathBuf>,
    /// Seed for dealing. None seeds from entropy.
    pub seed: Option<u64>,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        TrainingConfig {
            rounds: 300,
            episodes_per_round: 1000,
            report_every: 10,
            table_dir: Some(PathBuf::from("files")),
            seed: None,
        }
    }
}

/// Mean reward per round of one training run.
#[derive(Debug, Clone)]
pub struct TrainingReport {
    pub agent: String,
    pub mean_rewards: Vec<f64>,
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct CurveRow {
    round: usize,
    mean_reward: f64,
}

impl TrainingReport {
    pub fn last_mean_reward(&self) -> Option<f64> {
        self.mean_rewards.last().copied()
    }

    /// Writes the curve as `Round,MeanReward` rows, rounds counted from 1.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let mut writer = csv::Writer::from_path(path)?;
        for (index, &mean_reward) in self.mean_rewards.iter().enumerate() {
            writer.serialize(CurveRow {
                round: index + 1,
                mean_reward,
            })?;
        }
        writer.flush()?;
        Ok(())
    }
}

/// Plays one game on a freshly shuffled deck and hands the outcome back to
/// the player together with its final observation.
pub fn play_episode<R: Rng + ?Sized>(
    dealer: &mut dyn Agent,
    player: &mut dyn Agent,
    rng: &mut R,
) -> Result<Outcome> {
    let (outcome, terminal) = {
        let mut game = Game::new(dealer, &mut *player, rng);
        let outcome = game.play()?;
        (outcome, game.player_observation())
    };
    player.receive_result(&terminal, outcome);
    Ok(outcome)
}

/// Runs rounds of episodes for one player at a time. Games are strictly
/// sequential; each player's table is only touched between games.
pub struct Trainer {
    config: TrainingConfig,
    rng: StdRng,
}

impl Trainer {
    pub fn new(config: TrainingConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Trainer { config, rng }
    }

    pub fn config(&self) -> &TrainingConfig {
        &self.config
    }

    /// Where `player`'s table lives under the configured directory.
    pub fn table_path(&self, player: &dyn Agent) -> Option<PathBuf> {
        self.config
            .table_dir
            .as_ref()
            .map(|dir| dir.join(format!("{}.csv", player.name())))
    }

    pub fn train(
        &mut self,
        dealer: &mut dyn Agent,
        player: &mut dyn Agent,
    ) -> Result<TrainingReport> {
        info!(
            "{:<32}{:<16}{} rounds x {} episodes",
            "training",
            player.name(),
            self.config.rounds,
            self.config.episodes_per_round
        );
        let table_path = self.table_path(player);
        let mut mean_rewards = Vec::with_capacity(self.config.rounds);

        for round in 1..=self.config.rounds {
            let mut total_reward = 0.0;
            for _ in 0..self.config.episodes_per_round {
                let outcome = play_episode(&mut *dealer, &mut *player, &mut self.rng)?;
                total_reward += outcome.reward();
            }
            let mean_reward = total_reward / self.config.episodes_per_round.max(1) as f64;
            mean_rewards.push(mean_reward);

            if let Some(path) = &table_path {
                player.save_table(path)?;
            }
            if self.config.report_every > 0 && round % self.config.report_every == 0 {
                info!(
                    "{:<32}{:<16}round {:>5} mean reward {:+.3}",
                    "training",
                    player.name(),
                    round,
                    mean_reward
                );
            }
        }

        Ok(TrainingReport {
            agent: player.name().to_string(),
            mean_rewards,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::{AgentKind, FixedThreshold, MonteCarlo, QLearning};
    use crate::Action;
    use strum::IntoEnumIterator;

    fn config(dir: Option<PathBuf>) -> TrainingConfig {
        TrainingConfig {
            rounds: 3,
            episodes_per_round: 50,
            report_every: 1,
            table_dir: dir,
            seed: Some(11),
        }
    }

    #[test]
    fn report_has_one_mean_per_round_within_bounds() {
        let mut trainer = Trainer::new(config(None));
        let mut dealer = FixedThreshold::new();
        let mut player = FixedThreshold::new();
        let report = trainer.train(&mut dealer, &mut player).unwrap();
        assert_eq!(report.agent, "FixedThreshold");
        assert_eq!(report.mean_rewards.len(), 3);
        for mean in &report.mean_rewards {
            assert!((-1.0..=1.0).contains(mean));
        }
    }

    #[test]
    fn same_seed_same_curve() {
        let run = || {
            let mut trainer = Trainer::new(config(None));
            let mut dealer = FixedThreshold::new();
            let mut player = MonteCarlo::seeded(3);
            trainer.train(&mut dealer, &mut player).unwrap().mean_rewards
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn tables_are_saved_every_round() {
        let dir = tempfile::tempdir().unwrap();
        let mut trainer = Trainer::new(config(Some(dir.path().to_path_buf())));
        let mut dealer = FixedThreshold::new();
        let mut player = QLearning::seeded(1);
        trainer.train(&mut dealer, &mut player).unwrap();

        let path = dir.path().join("QLearning.csv");
        let content = fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("AceCount,Value,Dealer,Hit,Stay"));
        assert!(!player.table().is_empty());
    }

    #[test]
    fn every_kind_trains() {
        for kind in AgentKind::iter() {
            let mut trainer = Trainer::new(config(None));
            let mut dealer = FixedThreshold::new();
            let mut player = kind.build(Some(2));
            let report = trainer.train(&mut dealer, player.as_mut()).unwrap();
            assert_eq!(report.mean_rewards.len(), 3);
        }
    }

    #[test]
    fn learner_sees_terminal_result() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut dealer = FixedThreshold::new();
        let mut player = MonteCarlo::seeded(5);
        let mut decisions = 0;
        for _ in 0..200 {
            play_episode(&mut dealer, &mut player, &mut rng).unwrap();
        }
        for state in player.table().states() {
            for action in [Action::Hit, Action::Stay] {
                decisions += player.table().get(&state, action).visits;
            }
        }
        assert!(decisions > 0);
    }

    #[test]
    fn curve_is_written_as_csv() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("curves").join("MonteCarlo.csv");
        let report = TrainingReport {
            agent: String::from("MonteCarlo"),
            mean_rewards: vec![-0.25, 0.5],
        };
        report.save(&path).unwrap();
        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content, "Round,MeanReward\n1,-0.25\n2,0.5\n");
        assert_eq!(report.last_mean_reward(), Some(0.5));
    }
}
