//! Per-game, per-run configurations of the dataset.
//!
//! Each (game, run) pair is a separate configuration named
//! `"{game}_run_{run}"`, e.g. `Pong_run_3`. The records of a configuration
//! are stored under [`file_prefix`].
use crate::{error::RluAtariError, game::NUM_RUNS, Game};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::{
    convert::TryFrom,
    fs::File,
    io::{BufReader, Write},
    path::Path,
};

/// Configuration of the dataset for a single run of a game.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone)]
#[serde(try_from = "BuilderConfigSpec")]
pub struct BuilderConfig {
    name: String,
    game: Game,
    run: usize,
}

/// Deserialized form of [`BuilderConfig`]; `name` is derived, not trusted.
#[derive(Deserialize)]
struct BuilderConfigSpec {
    game: Game,
    run: usize,
    #[serde(default)]
    name: Option<String>,
}

impl TryFrom<BuilderConfigSpec> for BuilderConfig {
    type Error = RluAtariError;

    fn try_from(spec: BuilderConfigSpec) -> Result<Self, Self::Error> {
        let config = BuilderConfig::new(spec.game, spec.run)?;
        if let Some(name) = spec.name {
            if name != config.name {
                log::warn!(
                    "Config name '{}' does not match game and run, uses '{}'",
                    name,
                    config.name
                );
            }
        }
        Ok(config)
    }
}

impl Default for BuilderConfig {
    fn default() -> Self {
        Self::new_unchecked(Game::Asterix, 1)
    }
}

impl BuilderConfig {
    /// Creates the configuration of run `run` of `game`.
    ///
    /// Runs are numbered from 1 to 5.
    pub fn new(game: Game, run: usize) -> Result<Self, RluAtariError> {
        if run == 0 || run > NUM_RUNS {
            return Err(RluAtariError::InvalidRun(run));
        }
        Ok(Self::new_unchecked(game, run))
    }

    fn new_unchecked(game: Game, run: usize) -> Self {
        Self {
            name: config_name(game, run),
            game,
            run,
        }
    }

    /// Sets the game.
    pub fn game(self, game: Game) -> Self {
        Self::new_unchecked(game, self.run)
    }

    /// Sets the run index.
    pub fn run(self, run: usize) -> Result<Self, RluAtariError> {
        Self::new(self.game, run)
    }

    /// Name of the configuration, `"{game}_run_{run}"`.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Game of the configuration.
    pub fn get_game(&self) -> Game {
        self.game
    }

    /// Run index of the configuration.
    pub fn get_run(&self) -> usize {
        self.run
    }

    /// Path prefix of the shards of this configuration.
    pub fn file_prefix(&self, prefix: impl AsRef<str>) -> String {
        file_prefix(prefix, self.run, self.game)
    }

    /// Constructs [`BuilderConfig`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        Ok(b)
    }

    /// Saves [`BuilderConfig`].
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        Ok(())
    }
}

fn config_name(game: Game, run: usize) -> String {
    format!("{}_run_{}", game, run)
}

/// Returns configurations of all games and runs.
///
/// Games follow the order of [`Game`], and runs go from 1 to 5 for each game.
pub fn builder_configs() -> Vec<BuilderConfig> {
    let mut configs = Vec::with_capacity(Game::all().len() * NUM_RUNS);
    for game in Game::all() {
        for run in 1..=NUM_RUNS {
            configs.push(BuilderConfig::new_unchecked(game, run));
        }
    }
    log::debug!("{} builder configs", configs.len());
    configs
}

/// Returns the path prefix of the shards of `game` and `run`,
/// `"{prefix}/{game}/run_{run}"`.
pub fn file_prefix(prefix: impl AsRef<str>, run: usize, game: Game) -> String {
    format!("{}/{}/run_{}", prefix.as_ref(), game, run)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use tempdir::TempDir;

    #[test]
    fn test_builder_configs() {
        let configs = builder_configs();
        assert_eq!(configs.len(), 230);

        let names: HashSet<_> = configs.iter().map(|c| c.name().to_string()).collect();
        assert_eq!(names.len(), 230);

        let pairs: HashSet<_> = configs.iter().map(|c| (c.get_game(), c.get_run())).collect();
        for game in Game::all() {
            for run in 1..=5 {
                assert!(pairs.contains(&(game, run)));
            }
        }

        assert_eq!(configs[0].name(), "Alien_run_1");
        assert_eq!(configs[4].name(), "Alien_run_5");
        assert_eq!(configs[5].name(), "Amidar_run_1");
        assert_eq!(configs[229].name(), "Zaxxon_run_5");
    }

    #[test]
    fn test_builder_config_new() {
        let config = BuilderConfig::new(Game::MsPacman, 3).unwrap();
        assert_eq!(config.name(), "MsPacman_run_3");
        assert_eq!(
            BuilderConfig::new(Game::Pong, 0),
            Err(RluAtariError::InvalidRun(0))
        );
        assert_eq!(
            BuilderConfig::new(Game::Pong, 6),
            Err(RluAtariError::InvalidRun(6))
        );

        let config = BuilderConfig::default();
        assert_eq!(config.name(), "Asterix_run_1");
        let config = config.game(Game::Breakout).run(2).unwrap();
        assert_eq!(config.name(), "Breakout_run_2");
    }

    #[test]
    fn test_file_prefix() {
        assert_eq!(
            file_prefix("gs://rl_unplugged/atari", 2, Game::Pong),
            "gs://rl_unplugged/atari/Pong/run_2"
        );
        let config = BuilderConfig::new(Game::Seaquest, 5).unwrap();
        assert_eq!(config.file_prefix("/data"), "/data/Seaquest/run_5");
    }

    #[test]
    fn test_serde_builder_config() -> Result<()> {
        let config = BuilderConfig::new(Game::YarsRevenge, 4)?;

        let dir = TempDir::new("builder_config")?;
        let path = dir.path().join("builder_config.yaml");
        config.save(&path)?;
        let config_ = BuilderConfig::load(&path)?;
        assert_eq!(config, config_);
        Ok(())
    }

    #[test]
    fn test_deserialize_rederives_name() {
        let yaml = "name: Pong_run_1\ngame: Boxing\nrun: 2\n";
        let config: BuilderConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.name(), "Boxing_run_2");

        let yaml = "game: Boxing\nrun: 9\n";
        assert!(serde_yaml::from_str::<BuilderConfig>(yaml).is_err());
    }
}
