use std::path::PathBuf;

use anyhow::Context;
use blackjack_rl::agent::{Agent, AgentKind, FixedThreshold, Interactive};
use blackjack_rl::training::{play_episode, Trainer, TrainingConfig, TrainingReport};
use blackjack_rl::Outcome;
use blackjack_rl_drivers::Config;
use log::info;
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Trains each kind in turn against a fixed-threshold dealer and prints the
/// final mean reward of every run.
pub fn train_all(config: &Config, kinds: &[AgentKind]) -> anyhow::Result<Vec<TrainingReport>> {
    let training_config: TrainingConfig = config.training.clone().into();
    let curve_dir = config.training.curve_dir.as_ref().map(PathBuf::from);
    let mut trainer = Trainer::new(training_config);
    let mut reports = Vec::with_capacity(kinds.len());

    for kind in kinds {
        let mut dealer = FixedThreshold::with_threshold(config.agents.dealer_threshold);
        let mut player = kind.build(config.agents.seed);

        if config.agents.load_tables {
            if let Some(path) = trainer.table_path(player.as_ref()) {
                player
                    .load_table(&path)
                    .with_context(|| format!("Failed to load table {}", path.display()))?;
                info!("{:<32}{:<16}{}", "loaded table", kind.name(), path.display());
            }
        }

        let report = trainer
            .train(&mut dealer, player.as_mut())
            .with_context(|| format!("Training {} failed", kind.name()))?;

        if let Some(dir) = &curve_dir {
            let path = dir.join(format!("{}.csv", report.agent));
            report
                .save(&path)
                .with_context(|| format!("Failed to write curve {}", path.display()))?;
        }
        reports.push(report);
    }

    println!("{:<20}{:>12}", "Agent", "Mean reward");
    for report in &reports {
        match report.last_mean_reward() {
            Some(mean) => println!("{:<20}{:>+12.3}", report.agent, mean),
            None => println!("{:<20}{:>12}", report.agent, "-"),
        }
    }
    Ok(reports)
}

/// Plays one game against the fixed-threshold dealer on the terminal.
pub fn play_interactive(config: &Config) -> anyhow::Result<Outcome> {
    let mut rng = StdRng::from_entropy();
    let mut dealer = FixedThreshold::with_threshold(config.agents.dealer_threshold);
    let mut player = Interactive::stdio();
    let outcome = play_episode(&mut dealer, &mut player, &mut rng)?;
    info!("{:<32}{:<16}{}", "game over", player.name(), outcome);
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_config(dir: &std::path::Path) -> Config {
        let mut config = Config::default();
        config.training.rounds = 2;
        config.training.episodes_per_round = 25;
        config.training.seed = Some(4);
        config.training.table_dir = Some(dir.join("tables").to_string_lossy().into_owned());
        config.training.curve_dir = Some(dir.join("curves").to_string_lossy().into_owned());
        config.agents.seed = Some(4);
        config
    }

    #[test]
    fn writes_tables_and_curves() {
        let dir = tempfile::tempdir().unwrap();
        let config = small_config(dir.path());
        let reports = train_all(&config, &[AgentKind::MonteCarlo, AgentKind::DoubleQLearning])
            .unwrap();

        assert_eq!(reports.len(), 2);
        assert!(dir.path().join("tables/MonteCarlo.csv").exists());
        assert!(dir.path().join("tables/DoubleQLearning_0.csv").exists());
        assert!(dir.path().join("curves/MonteCarlo.csv").exists());
        assert!(dir.path().join("curves/DoubleQLearning.csv").exists());
    }

    #[test]
    fn continues_from_saved_tables() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = small_config(dir.path());
        train_all(&config, &[AgentKind::Sarsa]).unwrap();

        config.agents.load_tables = true;
        let reports = train_all(&config, &[AgentKind::Sarsa]).unwrap();
        assert_eq!(reports[0].mean_rewards.len(), 2);
    }

    #[test]
    fn loading_without_saved_tables_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = small_config(dir.path());
        config.agents.load_tables = true;
        assert!(train_all(&config, &[AgentKind::QLearning]).is_ok());
    }
}
