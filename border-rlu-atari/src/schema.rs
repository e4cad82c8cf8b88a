//! Feature schemas of the stored records and of the produced episodes.
//!
//! [`feature_description`] is the layout used to decode a stored record into
//! a [`RawRecord`](crate::RawRecord). [`features_dict`] describes the episodes
//! produced by [`atari_example_to_rlds`](crate::atari_example_to_rlds), with
//! the nested field names expected by downstream dataset tooling
//! (`steps.observation`, `steps.action`, ..., `episode_return`).
use serde::{ser::SerializeMap, Serialize, Serializer};

/// Shape of an observation, (height, width, channels).
pub const OBSERVATION_SHAPE: [usize; 3] = [84, 84, 1];

/// Primitive type of a feature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DType {
    /// 64-bit signed integer.
    Int64,
    /// 32-bit float.
    Float32,
    /// Byte string.
    Bytes,
    /// Boolean.
    Bool,
    /// 8-bit unsigned integer.
    Uint8,
}

/// Length class of a stored field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldLength {
    /// Exactly one value.
    Fixed,
    /// Sequence of values of the same type. If `allow_missing` is `true`,
    /// an absent field decodes to an empty sequence.
    VarLen {
        /// Absent field is read as empty.
        allow_missing: bool,
    },
}

/// A field of the stored record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FieldSpec {
    /// Name of the field.
    pub name: &'static str,
    /// Primitive type of the values.
    pub dtype: DType,
    /// Length class.
    pub length: FieldLength,
}

impl FieldSpec {
    const fn fixed(name: &'static str, dtype: DType) -> Self {
        Self {
            name,
            dtype,
            length: FieldLength::Fixed,
        }
    }

    const fn sequence(name: &'static str, dtype: DType) -> Self {
        Self {
            name,
            dtype,
            length: FieldLength::VarLen {
                allow_missing: true,
            },
        }
    }
}

pub(crate) const CHECKPOINT_IDX: &str = "checkpoint_idx";
pub(crate) const EPISODE_IDX: &str = "episode_idx";
pub(crate) const EPISODE_RETURN: &str = "episode_return";
pub(crate) const CLIPPED_EPISODE_RETURN: &str = "clipped_episode_return";
pub(crate) const OBSERVATIONS: &str = "observations";
pub(crate) const ACTIONS: &str = "actions";
pub(crate) const UNCLIPPED_REWARDS: &str = "unclipped_rewards";
pub(crate) const CLIPPED_REWARDS: &str = "clipped_rewards";
pub(crate) const DISCOUNTS: &str = "discounts";

// Rewards and episode_return are also clipped in the stored records.
const FEATURE_DESCRIPTION: [FieldSpec; 9] = [
    FieldSpec::fixed(CHECKPOINT_IDX, DType::Int64),
    FieldSpec::fixed(EPISODE_IDX, DType::Int64),
    FieldSpec::fixed(EPISODE_RETURN, DType::Float32),
    FieldSpec::fixed(CLIPPED_EPISODE_RETURN, DType::Float32),
    FieldSpec::sequence(OBSERVATIONS, DType::Bytes),
    FieldSpec::sequence(ACTIONS, DType::Int64),
    FieldSpec::sequence(UNCLIPPED_REWARDS, DType::Float32),
    FieldSpec::sequence(CLIPPED_REWARDS, DType::Float32),
    FieldSpec::sequence(DISCOUNTS, DType::Float32),
];

/// Returns the schema of stored records.
pub fn feature_description() -> &'static [FieldSpec] {
    &FEATURE_DESCRIPTION
}

/// Encoding of stored images.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EncodingFormat {
    /// PNG.
    Png,
}

/// Human readable documentation attached to a feature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Documentation {
    /// Description.
    pub desc: &'static str,
    /// Range of the values, if documented.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value_range: Option<&'static str>,
}

/// A feature of the produced dataset.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FeatureSpec {
    /// Scalar of the given type without documentation.
    Tensor {
        /// Type of the value.
        dtype: DType,
    },
    /// Documented scalar.
    Scalar {
        /// Type of the value.
        dtype: DType,
        /// Documentation.
        doc: Documentation,
    },
    /// Encoded image.
    Image {
        /// (height, width, channels).
        shape: [usize; 3],
        /// Pixel type.
        dtype: DType,
        /// Encoding of the stored bytes.
        encoding_format: EncodingFormat,
    },
    /// Variable-length sequence of nested features.
    Dataset {
        /// Features of each element.
        features: FeaturesDict,
    },
}

/// Ordered mapping from feature names to features.
#[derive(Debug, Clone, PartialEq)]
pub struct FeaturesDict(Vec<(&'static str, FeatureSpec)>);

impl FeaturesDict {
    /// Returns the feature with the given name.
    pub fn get(&self, name: &str) -> Option<&FeatureSpec> {
        self.0.iter().find(|(k, _)| *k == name).map(|(_, v)| v)
    }

    /// Returns the feature at a dotted path such as `steps.observation`.
    pub fn get_path(&self, path: &str) -> Option<&FeatureSpec> {
        let mut parts = path.splitn(2, '.');
        let head = self.get(parts.next()?)?;
        match (parts.next(), head) {
            (None, feature) => Some(feature),
            (Some(rest), FeatureSpec::Dataset { features }) => features.get_path(rest),
            (Some(_), _) => None,
        }
    }

    /// Names of the top-level features, in declaration order.
    pub fn names(&self) -> Vec<&'static str> {
        self.0.iter().map(|(k, _)| *k).collect()
    }
}

impl Serialize for FeaturesDict {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (k, v) in self.0.iter() {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

/// Returns the schema of the produced episodes.
pub fn features_dict() -> FeaturesDict {
    let steps = FeaturesDict(vec![
        (
            "observation",
            FeatureSpec::Image {
                shape: OBSERVATION_SHAPE,
                dtype: DType::Uint8,
                encoding_format: EncodingFormat::Png,
            },
        ),
        ("action", FeatureSpec::Tensor { dtype: DType::Int64 }),
        (
            "reward",
            FeatureSpec::Scalar {
                dtype: DType::Float32,
                doc: Documentation {
                    desc: "Clipped reward.",
                    value_range: Some("[-1, 1]"),
                },
            },
        ),
        ("is_terminal", FeatureSpec::Tensor { dtype: DType::Bool }),
        ("is_first", FeatureSpec::Tensor { dtype: DType::Bool }),
        ("is_last", FeatureSpec::Tensor { dtype: DType::Bool }),
        ("discount", FeatureSpec::Tensor { dtype: DType::Float32 }),
    ]);

    FeaturesDict(vec![
        ("steps", FeatureSpec::Dataset { features: steps }),
        ("checkpoint_id", FeatureSpec::Tensor { dtype: DType::Int64 }),
        ("episode_id", FeatureSpec::Tensor { dtype: DType::Int64 }),
        (
            "episode_return",
            FeatureSpec::Scalar {
                dtype: DType::Float32,
                doc: Documentation {
                    desc: "Sum of the clipped rewards.",
                    value_range: None,
                },
            },
        ),
    ])
}
