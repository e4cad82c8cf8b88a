//! Conversion of stored records into episodes.
use crate::{
    error::{RluAtariError, SchemaViolation},
    record::{parse_example, Example, RawRecord},
    schema::OBSERVATION_SHAPE,
};
use image::{GenericImageView, ImageFormat};
use ndarray::Array3;

/// A step of an [`Episode`].
#[derive(Debug, Clone, PartialEq)]
pub struct Step {
    /// PNG-encoded observation, see [`Step::decode_observation`].
    pub observation: Vec<u8>,

    /// Action taken at this step.
    pub action: i64,

    /// Unclipped reward.
    pub reward: f32,

    /// Discount.
    pub discount: f32,

    /// `true` only for the first step.
    pub is_first: bool,

    /// `true` only for the last step.
    pub is_last: bool,

    /// `true` if the episode ends in a terminal state at this step.
    /// Only the observation is meaningful at a terminal step.
    pub is_terminal: bool,
}

impl Step {
    /// Decodes the observation into an array of shape (84, 84, 1).
    pub fn decode_observation(&self) -> Result<Array3<u8>, RluAtariError> {
        let img = image::load_from_memory_with_format(&self.observation, ImageFormat::Png)
            .map_err(|e| SchemaViolation::InvalidImage(e.to_string()))?;
        let found = [
            img.height() as usize,
            img.width() as usize,
            img.color().channel_count() as usize,
        ];
        if found != OBSERVATION_SHAPE {
            return Err(SchemaViolation::ImageShape {
                expected: OBSERVATION_SHAPE,
                found,
            }
            .into());
        }

        let [h, w, c] = OBSERVATION_SHAPE;
        let obs = Array3::from_shape_vec((h, w, c), img.to_luma8().into_raw())
            .map_err(|e| SchemaViolation::InvalidImage(e.to_string()))?;
        Ok(obs)
    }
}

/// An episode of the dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct Episode {
    /// Index of the episode.
    pub episode_id: i64,

    /// Index of the agent checkpoint that played the episode.
    pub checkpoint_id: i64,

    /// Return of the episode as stored in the record.
    pub episode_return: f32,

    /// Steps of the episode.
    pub steps: Vec<Step>,

    clipped_episode_return: f32,
}

impl Episode {
    /// Identifier of the episode, `"{checkpoint_id}_{episode_id}"`.
    pub fn id(&self) -> String {
        format!("{}_{}", self.checkpoint_id, self.episode_id)
    }

    /// Number of steps.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Always `false` for episodes built by [`atari_example_to_rlds`].
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Returns `true` if the episode ends in a terminal state.
    pub fn is_terminated(&self) -> bool {
        self.steps.last().map_or(false, |s| s.is_terminal)
    }

    /// Sum of the clipped rewards of the stored record.
    pub fn clipped_return(&self) -> f32 {
        self.clipped_episode_return
    }
}

/// Identifier of `episode`, `"{checkpoint_id}_{episode_id}"`.
pub fn episode_id(episode: &Episode) -> String {
    episode.id()
}

/// Converts a stored record into an episode.
///
/// The first step is marked `is_first` and the last one `is_last`. A final
/// discount of exactly `0` is the only signal of a terminal state: in that
/// case the last step is marked `is_terminal` and the discounts are shifted
/// by one step, `discounts[1..]` followed by `0`, so that the discount of a
/// step refers to the transition out of it.
///
/// Fails with [`RluAtariError::SchemaViolation`] if the record is empty, its
/// sequences have different lengths or a discount is outside `[0, 1]`.
#[allow(clippy::float_cmp)]
pub fn atari_example_to_rlds(record: &RawRecord) -> Result<Episode, RluAtariError> {
    record.validate()?;
    let len = record.len();

    let mut discounts = record.discounts.clone();
    let is_terminated = discounts[len - 1] == 0.0;
    if is_terminated {
        discounts.remove(0);
        discounts.push(0.0);
    }

    let steps = (0..len)
        .map(|i| Step {
            observation: record.observations[i].clone(),
            action: record.actions[i],
            reward: record.unclipped_rewards[i],
            discount: discounts[i],
            is_first: i == 0,
            is_last: i == len - 1,
            is_terminal: is_terminated && i == len - 1,
        })
        .collect();

    log::debug!(
        "Episode {}_{}: {} steps, terminated = {}",
        record.checkpoint_idx,
        record.episode_idx,
        len,
        is_terminated
    );

    Ok(Episode {
        episode_id: record.episode_idx,
        checkpoint_id: record.checkpoint_idx,
        episode_return: record.episode_return,
        steps,
        clipped_episode_return: record.clipped_episode_return,
    })
}

/// Decodes a stored record and converts it into an episode.
pub fn example_to_episode(example: &Example) -> Result<Episode, RluAtariError> {
    atari_example_to_rlds(&parse_example(example)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, GrayImage, ImageOutputFormat, Luma, RgbImage};

    fn init() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn record(discounts: Vec<f32>) -> RawRecord {
        let len = discounts.len();
        RawRecord {
            checkpoint_idx: 3,
            episode_idx: 7,
            episode_return: 12.0,
            clipped_episode_return: 2.0,
            observations: (0..len).map(|i| vec![i as u8]).collect(),
            actions: (0..len as i64).map(|a| a + 10).collect(),
            unclipped_rewards: (0..len).map(|i| i as f32 * 4.0).collect(),
            clipped_rewards: (0..len).map(|i| if i > 0 { 1.0 } else { 0.0 }).collect(),
            discounts,
        }
    }

    fn flags(episode: &Episode) -> (Vec<bool>, Vec<bool>, Vec<bool>) {
        (
            episode.steps.iter().map(|s| s.is_first).collect(),
            episode.steps.iter().map(|s| s.is_last).collect(),
            episode.steps.iter().map(|s| s.is_terminal).collect(),
        )
    }

    fn discounts(episode: &Episode) -> Vec<f32> {
        episode.steps.iter().map(|s| s.discount).collect()
    }

    fn png(img: DynamicImage) -> Vec<u8> {
        let mut buf = Vec::new();
        img.write_to(&mut buf, ImageOutputFormat::Png).unwrap();
        buf
    }

    #[test]
    fn test_terminal_episode() {
        init();
        let episode = atari_example_to_rlds(&record(vec![0.9, 0.9, 0.0])).unwrap();
        let (is_first, is_last, is_terminal) = flags(&episode);
        assert_eq!(is_first, vec![true, false, false]);
        assert_eq!(is_last, vec![false, false, true]);
        assert_eq!(is_terminal, vec![false, false, true]);
        assert_eq!(discounts(&episode), vec![0.9, 0.0, 0.0]);
        assert!(episode.is_terminated());
    }

    #[test]
    fn test_truncated_episode() {
        init();
        let raw = vec![1.0, 1.0, 0.5, 1.0];
        let episode = atari_example_to_rlds(&record(raw.clone())).unwrap();
        let (_, _, is_terminal) = flags(&episode);
        assert!(is_terminal.iter().all(|t| !t));
        assert_eq!(discounts(&episode), raw);
        assert!(!episode.is_terminated());
    }

    #[test]
    fn test_single_step_episode() {
        let episode = atari_example_to_rlds(&record(vec![0.0])).unwrap();
        assert_eq!(episode.len(), 1);
        assert_eq!(flags(&episode), (vec![true], vec![true], vec![true]));
        assert_eq!(discounts(&episode), vec![0.0]);

        let episode = atari_example_to_rlds(&record(vec![1.0])).unwrap();
        assert_eq!(flags(&episode), (vec![true], vec![true], vec![false]));
        assert_eq!(discounts(&episode), vec![1.0]);
    }

    #[test]
    fn test_boundary_flags() {
        for len in 1..50 {
            for terminal in [false, true].iter() {
                let mut raw = vec![1.0; len];
                if *terminal {
                    raw[len - 1] = 0.0;
                }
                let episode = atari_example_to_rlds(&record(raw.clone())).unwrap();
                let (is_first, is_last, is_terminal) = flags(&episode);

                assert_eq!(episode.len(), len);
                assert_eq!(is_first.iter().filter(|f| **f).count(), 1);
                assert!(is_first[0]);
                assert_eq!(is_last.iter().filter(|f| **f).count(), 1);
                assert!(is_last[len - 1]);

                if *terminal {
                    assert!(is_terminal[len - 1]);
                    let mut expected = raw[1..].to_vec();
                    expected.push(0.0);
                    assert_eq!(discounts(&episode), expected);
                } else {
                    assert!(is_terminal.iter().all(|t| !t));
                    assert_eq!(discounts(&episode), raw);
                }
            }
        }
    }

    #[test]
    fn test_step_fields() {
        let episode = atari_example_to_rlds(&record(vec![1.0, 1.0, 0.0])).unwrap();
        assert_eq!(episode.episode_id, 7);
        assert_eq!(episode.checkpoint_id, 3);
        assert_eq!(episode.episode_return, 12.0);
        assert_eq!(episode.clipped_return(), 2.0);

        let actions: Vec<_> = episode.steps.iter().map(|s| s.action).collect();
        assert_eq!(actions, vec![10, 11, 12]);
        let rewards: Vec<_> = episode.steps.iter().map(|s| s.reward).collect();
        assert_eq!(rewards, vec![0.0, 4.0, 8.0]);
        assert_eq!(episode.steps[2].observation, vec![2u8]);
    }

    #[test]
    fn test_episode_id() {
        let episode = atari_example_to_rlds(&record(vec![1.0])).unwrap();
        assert_eq!(episode_id(&episode), "3_7");
    }

    #[test]
    fn test_schema_violation() {
        let err = atari_example_to_rlds(&record(vec![])).unwrap_err();
        assert_eq!(
            err,
            RluAtariError::SchemaViolation(SchemaViolation::EmptyEpisode)
        );

        let mut r = record(vec![1.0, 0.0]);
        r.actions.push(3);
        assert!(matches!(
            atari_example_to_rlds(&r),
            Err(RluAtariError::SchemaViolation(
                SchemaViolation::LengthMismatch { expected: 3, .. }
            ))
        ));

        let r = record(vec![1.0, -0.5]);
        assert!(matches!(
            atari_example_to_rlds(&r),
            Err(RluAtariError::SchemaViolation(
                SchemaViolation::DiscountOutOfRange { index: 1, .. }
            ))
        ));
    }

    #[test]
    fn test_example_to_episode() {
        let example = Example::from(record(vec![1.0, 1.0, 0.0]));
        let episode = example_to_episode(&example).unwrap();
        assert_eq!(episode.id(), "3_7");
        assert_eq!(discounts(&episode), vec![1.0, 0.0, 0.0]);
    }

    #[test]
    fn test_decode_observation() {
        let img = GrayImage::from_fn(84, 84, |x, y| Luma([(x + 2 * y) as u8]));
        let mut r = record(vec![1.0]);
        r.observations[0] = png(DynamicImage::ImageLuma8(img));
        let episode = atari_example_to_rlds(&r).unwrap();

        let obs = episode.steps[0].decode_observation().unwrap();
        assert_eq!(obs.shape(), &[84, 84, 1]);
        // Rows are indexed by y, columns by x.
        assert_eq!(obs[[1, 3, 0]], 5);
        assert_eq!(obs[[10, 0, 0]], 20);
    }

    #[test]
    fn test_decode_observation_error() {
        let mut r = record(vec![1.0, 1.0]);
        r.observations[0] = png(DynamicImage::ImageRgb8(RgbImage::new(84, 84)));
        r.observations[1] = vec![1, 2, 3];
        let episode = atari_example_to_rlds(&r).unwrap();

        assert_eq!(
            episode.steps[0].decode_observation(),
            Err(RluAtariError::SchemaViolation(SchemaViolation::ImageShape {
                expected: [84, 84, 1],
                found: [84, 84, 3],
            }))
        );
        assert!(matches!(
            episode.steps[1].decode_observation(),
            Err(RluAtariError::SchemaViolation(SchemaViolation::InvalidImage(_)))
        ));
    }
}
