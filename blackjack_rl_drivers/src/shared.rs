use anyhow::Context;
use blackjack_rl::agent::AgentKind;
use blackjack_rl::training::TrainingConfig;
use blackjack_rl::STAND_THRESHOLD;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub training: ConfigTraining,
    pub agents: ConfigAgents,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigTraining {
    pub rounds: usize,
    pub episodes_per_round: usize,
    pub report_every: usize,
    pub seed: Option<u64>,
    /// Directory value tables are saved to after every round.
    pub table_dir: Option<String>,
    /// Directory the mean-reward curves are written to after training.
    pub curve_dir: Option<String>,
}

impl Default for ConfigTraining {
    fn default() -> Self {
        let defaults = TrainingConfig::default();
        ConfigTraining {
            rounds: defaults.rounds,
            episodes_per_round: defaults.episodes_per_round,
            report_every: defaults.report_every,
            seed: defaults.seed,
            table_dir: Some(String::from("files")),
            curve_dir: Some(String::from("files/curves")),
        }
    }
}

impl From<ConfigTraining> for TrainingConfig {
    fn from(config: ConfigTraining) -> Self {
        TrainingConfig {
            rounds: config.rounds,
            episodes_per_round: config.episodes_per_round,
            report_every: config.report_every,
            table_dir: config.table_dir.map(PathBuf::from),
            seed: config.seed,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigAgents {
    pub kinds: Vec<String>,
    /// Start from the tables saved by a previous run, if any.
    pub load_tables: bool,
    pub seed: Option<u64>,
    /// The dealer hits below this total.
    pub dealer_threshold: u8,
}

impl Default for ConfigAgents {
    fn default() -> Self {
        ConfigAgents {
            kinds: ["FixedThreshold", "MonteCarlo", "Sarsa", "QLearning", "DoubleQLearning"]
                .iter()
                .map(|kind| kind.to_string())
                .collect(),
            load_tables: false,
            seed: None,
            dealer_threshold: STAND_THRESHOLD,
        }
    }
}

impl ConfigAgents {
    pub fn parse_kinds(&self) -> Result<Vec<AgentKind>, serde::de::value::Error> {
        parse_kinds(&self.kinds)
    }
}

pub fn parse_kinds(kinds: &[String]) -> Result<Vec<AgentKind>, serde::de::value::Error> {
    kinds.iter().map(|kind| kind.parse()).collect()
}

/// Parses a YAML config. Missing sections and fields take their defaults.
pub fn parse_config(content: &str) -> anyhow::Result<Config> {
    serde_yaml::from_str(content).context("Failed to parse config")
}

/// Reads the content of a given config file and parses it to a Config.
pub fn parse_config_from_file(filename: &str) -> anyhow::Result<Config> {
    let file_content = fs::read_to_string(filename)
        .with_context(|| format!("Failed to read config file: {}", filename))?;
    parse_config(&file_content)
}
