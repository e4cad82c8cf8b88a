use anyhow::{Context, Result};
use border_rlu_atari::{
    builder_configs, config::file_prefix, example_to_episode, feature_description,
    features_dict, num_shards, BuilderConfig, DatasetInfo, Example, Game,
};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::{fs::File, io::BufReader, path::PathBuf};

/// Inspect the RL Unplugged Atari dataset schema and records
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List dataset configurations
    Configs {
        /// Only list configurations of this game
        #[arg(short, long)]
        game: Option<Game>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = Format::Names)]
        format: Format,
    },

    /// Print the feature schema of the produced episodes
    Schema {
        /// Print the schema of stored records instead
        #[arg(short, long, default_value_t = false)]
        record: bool,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = Format::Yaml)]
        format: Format,
    },

    /// Print the number of shards stored for a game
    Shards {
        /// Name of the game
        #[arg(short, long)]
        game: Game,

        /// Number of shards of a complete run
        #[arg(short, long)]
        shards: usize,
    },

    /// Print the description and citation of the dataset
    Info,

    /// Print the path prefix of the shards of a run
    FilePrefix {
        /// Root of the dataset
        #[arg(short, long)]
        prefix: String,

        /// Name of the game
        #[arg(short, long)]
        game: Game,

        /// Run index, 1 to 5
        #[arg(short, long)]
        run: usize,
    },

    /// Convert a stored record given as YAML and print a summary of the episode
    Convert {
        /// YAML file of the record
        path: PathBuf,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Format {
    Names,
    Yaml,
    Json,
}

#[derive(Serialize)]
struct EpisodeSummary {
    id: String,
    len: usize,
    episode_return: f32,
    clipped_return: f32,
    is_terminated: bool,
    sum_rewards: f32,
}

fn print<T: Serialize>(value: &T, format: Format) -> Result<()> {
    match format {
        Format::Json => println!("{}", serde_json::to_string_pretty(value)?),
        Format::Yaml | Format::Names => print!("{}", serde_yaml::to_string(value)?),
    }
    Ok(())
}

fn configs(game: Option<Game>, format: Format) -> Result<()> {
    let configs: Vec<BuilderConfig> = builder_configs()
        .into_iter()
        .filter(|c| game.map_or(true, |g| c.get_game() == g))
        .collect();
    log::info!("{} configurations", configs.len());

    match format {
        Format::Names => configs.iter().for_each(|c| println!("{}", c.name())),
        _ => print(&configs, format)?,
    }
    Ok(())
}

fn convert(path: PathBuf) -> Result<()> {
    let file = File::open(&path).with_context(|| format!("Failed to open {:?}", path))?;
    let example: Example = serde_yaml::from_reader(BufReader::new(file))?;
    let episode = example_to_episode(&example)
        .with_context(|| format!("Failed to convert record in {:?}", path))?;

    let summary = EpisodeSummary {
        id: episode.id(),
        len: episode.len(),
        episode_return: episode.episode_return,
        clipped_return: episode.clipped_return(),
        is_terminated: episode.is_terminated(),
        sum_rewards: episode.steps.iter().map(|s| s.reward).sum(),
    };
    print(&summary, Format::Yaml)
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    match args.command {
        Command::Configs { game, format } => configs(game, format)?,
        Command::Schema { record, format } => match record {
            true => print(&feature_description(), format)?,
            false => print(&features_dict(), format)?,
        },
        Command::Shards { game, shards } => println!("{}", num_shards(game, shards)),
        Command::Info => {
            let info = DatasetInfo::new();
            println!("{}", info.description);
            println!("{}", info.citation);
        }
        Command::FilePrefix { prefix, game, run } => {
            let config = BuilderConfig::new(game, run)?;
            log::debug!("Config {}", config.name());
            println!("{}", file_prefix(prefix, run, game));
        }
        Command::Convert { path } => convert(path)?,
    }

    Ok(())
}
