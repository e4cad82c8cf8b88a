//! Stored records and their decoding.
//!
//! A stored record arrives as an [`Example`], a map from field names to typed
//! value lists. [`parse_example`] checks it against
//! [`feature_description`] and produces a [`RawRecord`].
use crate::{
    error::{RluAtariError, SchemaViolation},
    schema::{
        feature_description, DType, FieldLength, FieldSpec, ACTIONS, CHECKPOINT_IDX,
        CLIPPED_EPISODE_RETURN, CLIPPED_REWARDS, DISCOUNTS, EPISODE_IDX, EPISODE_RETURN,
        OBSERVATIONS, UNCLIPPED_REWARDS,
    },
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Values of a single field of an [`Example`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Feature {
    /// List of byte strings.
    BytesList(Vec<Vec<u8>>),
    /// List of 64-bit integers.
    Int64List(Vec<i64>),
    /// List of 32-bit floats.
    FloatList(Vec<f32>),
}

impl Feature {
    /// Primitive type of the values.
    pub fn dtype(&self) -> DType {
        match self {
            Self::BytesList(_) => DType::Bytes,
            Self::Int64List(_) => DType::Int64,
            Self::FloatList(_) => DType::Float32,
        }
    }

    /// Number of values.
    pub fn len(&self) -> usize {
        match self {
            Self::BytesList(v) => v.len(),
            Self::Int64List(v) => v.len(),
            Self::FloatList(v) => v.len(),
        }
    }

    /// Returns `true` if the feature holds no value.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A decoded stored record, mapping field names to values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Example(HashMap<String, Feature>);

impl Example {
    /// Creates an empty example.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a field.
    pub fn insert(&mut self, name: impl Into<String>, feature: Feature) {
        self.0.insert(name.into(), feature);
    }

    /// Inserts a field and returns the example.
    pub fn with(mut self, name: impl Into<String>, feature: Feature) -> Self {
        self.insert(name, feature);
        self
    }

    /// Removes a field.
    pub fn remove(&mut self, name: &str) -> Option<Feature> {
        self.0.remove(name)
    }

    /// Returns a field.
    pub fn get(&self, name: &str) -> Option<&Feature> {
        self.0.get(name)
    }
}

/// A stored record of one episode.
///
/// The sequence fields are parallel: the `i`-th element of each belongs to
/// step `i`, and the episode length is the length of `actions`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRecord {
    /// Index of the agent checkpoint that played the episode.
    pub checkpoint_idx: i64,
    /// Index of the episode.
    pub episode_idx: i64,
    /// Return of the episode.
    pub episode_return: f32,
    /// Sum of the clipped rewards.
    pub clipped_episode_return: f32,
    /// PNG-encoded observations.
    pub observations: Vec<Vec<u8>>,
    /// Actions.
    pub actions: Vec<i64>,
    /// Rewards before clipping.
    pub unclipped_rewards: Vec<f32>,
    /// Rewards clipped to `[-1, 1]`.
    pub clipped_rewards: Vec<f32>,
    /// Discounts.
    pub discounts: Vec<f32>,
}

impl RawRecord {
    /// Episode length.
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    /// Returns `true` if the record has no step.
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Checks that the record holds a non-empty episode with parallel
    /// sequences and discounts in `[0, 1]`.
    pub fn validate(&self) -> Result<(), SchemaViolation> {
        let len = self.len();
        if len == 0 {
            return Err(SchemaViolation::EmptyEpisode);
        }

        let lens = [
            (OBSERVATIONS, self.observations.len()),
            (UNCLIPPED_REWARDS, self.unclipped_rewards.len()),
            (CLIPPED_REWARDS, self.clipped_rewards.len()),
            (DISCOUNTS, self.discounts.len()),
        ];
        for (field, l) in lens.iter() {
            if *l != len {
                return Err(SchemaViolation::LengthMismatch {
                    field: *field,
                    len: *l,
                    expected: len,
                });
            }
        }

        if let Some((index, value)) = self
            .discounts
            .iter()
            .enumerate()
            .find(|(_, d)| !(d.is_finite() && (0.0..=1.0).contains(*d)))
        {
            return Err(SchemaViolation::DiscountOutOfRange {
                index,
                value: *value,
            });
        }

        Ok(())
    }
}

impl From<RawRecord> for Example {
    fn from(record: RawRecord) -> Self {
        Example::new()
            .with(CHECKPOINT_IDX, Feature::Int64List(vec![record.checkpoint_idx]))
            .with(EPISODE_IDX, Feature::Int64List(vec![record.episode_idx]))
            .with(EPISODE_RETURN, Feature::FloatList(vec![record.episode_return]))
            .with(
                CLIPPED_EPISODE_RETURN,
                Feature::FloatList(vec![record.clipped_episode_return]),
            )
            .with(OBSERVATIONS, Feature::BytesList(record.observations))
            .with(ACTIONS, Feature::Int64List(record.actions))
            .with(UNCLIPPED_REWARDS, Feature::FloatList(record.unclipped_rewards))
            .with(CLIPPED_REWARDS, Feature::FloatList(record.clipped_rewards))
            .with(DISCOUNTS, Feature::FloatList(record.discounts))
    }
}

/// Returns the field of `example` described by `spec`, or `None` if it is
/// absent and allowed to be.
fn field<'a>(example: &'a Example, spec: &FieldSpec) -> Result<Option<&'a Feature>, SchemaViolation> {
    match example.get(spec.name) {
        Some(feature) if feature.dtype() != spec.dtype => Err(SchemaViolation::TypeMismatch {
            field: spec.name,
            expected: spec.dtype,
            found: feature.dtype(),
        }),
        Some(feature) => match spec.length {
            FieldLength::Fixed if feature.len() != 1 => Err(SchemaViolation::NotScalar {
                field: spec.name,
                len: feature.len(),
            }),
            _ => Ok(Some(feature)),
        },
        None => match spec.length {
            FieldLength::VarLen {
                allow_missing: true,
            } => Ok(None),
            _ => Err(SchemaViolation::MissingField(spec.name)),
        },
    }
}

/// Decodes a stored record.
///
/// Fixed fields must be present and hold exactly one value. Absent sequence
/// fields are read as empty. Fields not in the record schema are ignored.
/// The parallel-sequence invariant is checked by [`RawRecord::validate`].
pub fn parse_example(example: &Example) -> Result<RawRecord, RluAtariError> {
    let mut record = RawRecord::default();

    for spec in feature_description() {
        let feature = match field(example, spec)? {
            Some(feature) => feature,
            None => continue,
        };

        // Types were checked by `field`.
        match (spec.name, feature) {
            (CHECKPOINT_IDX, Feature::Int64List(v)) => record.checkpoint_idx = v[0],
            (EPISODE_IDX, Feature::Int64List(v)) => record.episode_idx = v[0],
            (EPISODE_RETURN, Feature::FloatList(v)) => record.episode_return = v[0],
            (CLIPPED_EPISODE_RETURN, Feature::FloatList(v)) => {
                record.clipped_episode_return = v[0]
            }
            (OBSERVATIONS, Feature::BytesList(v)) => record.observations = v.clone(),
            (ACTIONS, Feature::Int64List(v)) => record.actions = v.clone(),
            (UNCLIPPED_REWARDS, Feature::FloatList(v)) => record.unclipped_rewards = v.clone(),
            (CLIPPED_REWARDS, Feature::FloatList(v)) => record.clipped_rewards = v.clone(),
            (DISCOUNTS, Feature::FloatList(v)) => record.discounts = v.clone(),
            _ => {}
        }
    }

    log::trace!(
        "Parsed record checkpoint {} episode {} with {} steps",
        record.checkpoint_idx,
        record.episode_idx,
        record.len()
    );
    Ok(record)
}
