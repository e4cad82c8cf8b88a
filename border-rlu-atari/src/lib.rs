#![warn(missing_docs)]
//! Schema and episode conversion for the Atari datasets of
//! [RL Unplugged](https://arxiv.org/abs/2006.13888).
//!
//! The datasets hold gameplay of 46 Atari games recorded from the replay of
//! an online DQN agent, five runs per game. Each stored record holds one
//! episode as parallel sequences of observations, actions, rewards and
//! discounts. This crate
//!
//! - lists the games and the per-run configurations ([`builder_configs`]),
//! - declares the schema of stored records ([`feature_description`]) and of
//!   the produced episodes ([`features_dict`]),
//! - decodes stored records ([`parse_example`]) and converts them into
//!   episodes with boundary flags ([`atari_example_to_rlds`]).
//!
//! ```
//! use border_rlu_atari::{atari_example_to_rlds, RawRecord};
//!
//! let record = RawRecord {
//!     checkpoint_idx: 3,
//!     episode_idx: 7,
//!     observations: vec![vec![]; 3],
//!     actions: vec![0, 1, 2],
//!     unclipped_rewards: vec![0.0; 3],
//!     clipped_rewards: vec![0.0; 3],
//!     discounts: vec![0.9, 0.9, 0.0],
//!     ..Default::default()
//! };
//! let episode = atari_example_to_rlds(&record).unwrap();
//!
//! assert_eq!(episode.id(), "3_7");
//! assert!(episode.steps[2].is_terminal);
//! assert_eq!(episode.steps[1].discount, 0.0);
//! ```
pub mod config;
pub mod episode;
pub mod error;
pub mod game;
pub mod info;
pub mod record;
pub mod schema;

pub use config::{builder_configs, file_prefix, BuilderConfig};
pub use episode::{atari_example_to_rlds, episode_id, example_to_episode, Episode, Step};
pub use error::{RluAtariError, SchemaViolation};
pub use game::{num_shards, Game, SHORT_GAMES};
pub use info::{citation, description, DatasetInfo};
pub use record::{parse_example, Example, Feature, RawRecord};
pub use schema::{feature_description, features_dict};
