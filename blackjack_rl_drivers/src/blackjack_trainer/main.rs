use anyhow::{bail, Context};
use blackjack_rl_drivers::{parse_config_from_file, parse_kinds, Config};
use clap::{Parser, Subcommand};
use env_logger::Env;
use log::info;

mod training;

const DEFAULT_CONFIG_PATH: &str = "~/.blackjack_rl.yml";

#[derive(Debug, Parser)]
#[command(author, about, long_about = None)]
struct CommandLineArgs {
    /// The path of the config file
    #[arg(short, long, default_value_t = String::from(DEFAULT_CONFIG_PATH))]
    config: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Train agents against the fixed-threshold dealer
    Train {
        /// Agent kinds to train, overriding the config file
        #[arg(short, long)]
        agent: Vec<String>,
    },
    /// Play one game against the dealer on the terminal
    Play,
}

fn load_config(path: &str) -> anyhow::Result<Config> {
    if path != DEFAULT_CONFIG_PATH {
        return parse_config_from_file(path);
    }
    let home_dir = home::home_dir().context("Cannot find home directory")?;
    let config_file_path = home_dir.join(".blackjack_rl.yml");
    if !config_file_path.exists() {
        info!("no config at {}, using defaults", config_file_path.display());
        return Ok(Config::default());
    }
    if config_file_path.is_dir() {
        bail!("This should be a path rather than a directory");
    }
    let path = config_file_path
        .to_str()
        .context("Config path is not valid UTF-8")?;
    parse_config_from_file(path)
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let args = CommandLineArgs::parse();
    let config = load_config(&args.config)?;

    match args.command {
        Command::Train { agent } => {
            let kinds = if agent.is_empty() {
                config.agents.parse_kinds()
            } else {
                parse_kinds(&agent)
            };
            let kinds = kinds.context("Unknown agent kind")?;
            training::train_all(&config, &kinds)?;
        }
        Command::Play => {
            training::play_interactive(&config)?;
        }
    }
    Ok(())
}
