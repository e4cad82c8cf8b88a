//! Atari games included in the dataset.
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString, IntoEnumIterator};

/// Number of recorded runs per game.
pub const NUM_RUNS: usize = 5;

/// Atari games of the dataset, in the order configurations are enumerated.
///
/// The variant names are the game names used in configuration names and
/// file paths, e.g. `Game::MsPacman.to_string() == "MsPacman"`.
#[allow(missing_docs)]
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
)]
pub enum Game {
    Alien,
    Amidar,
    Assault,
    Asterix,
    Atlantis,
    BankHeist,
    BattleZone,
    BeamRider,
    Boxing,
    Breakout,
    Carnival,
    Centipede,
    ChopperCommand,
    CrazyClimber,
    DemonAttack,
    DoubleDunk,
    Enduro,
    FishingDerby,
    Freeway,
    Frostbite,
    Gopher,
    Gravitar,
    Hero,
    IceHockey,
    Jamesbond,
    Kangaroo,
    Krull,
    KungFuMaster,
    MsPacman,
    NameThisGame,
    Phoenix,
    Pong,
    Pooyan,
    Qbert,
    Riverraid,
    RoadRunner,
    Robotank,
    Seaquest,
    SpaceInvaders,
    StarGunner,
    TimePilot,
    UpNDown,
    VideoPinball,
    WizardOfWor,
    YarsRevenge,
    Zaxxon,
}

/// Games with fewer recorded trajectories; their last shard is missing.
pub const SHORT_GAMES: [Game; 3] = [Game::Carnival, Game::Gravitar, Game::StarGunner];

impl Default for Game {
    fn default() -> Self {
        Game::Asterix
    }
}

impl Game {
    /// Returns all games in declaration order.
    pub fn all() -> Vec<Game> {
        Game::iter().collect()
    }

    /// Returns `true` if the game is one of [`SHORT_GAMES`].
    pub fn is_short(&self) -> bool {
        SHORT_GAMES.contains(self)
    }
}

/// Returns the number of shards stored for `game`.
///
/// `shards` is the shard count of a complete run. Short games have one shard
/// less. The count saturates at zero.
pub fn num_shards(game: Game, shards: usize) -> usize {
    if game.is_short() {
        shards.saturating_sub(1)
    } else {
        shards
    }
}
