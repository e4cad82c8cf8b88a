//! Description and citation of the dataset.
use crate::schema::{features_dict, FeaturesDict};
use serde::Serialize;

/// Name of the dataset.
pub const DATASET_NAME: &str = "rlu_atari";

const DESCRIPTION: &str = "\
We are releasing a large and diverse dataset of gameplay following the protocol
described by [Agarwal et al., 2020](https://arxiv.org/abs/1907.04543), which can
be used to evaluate several discrete offline RL algorithms. The dataset is
generated by running an online DQN agent and recording transitions from its
replay during training with sticky actions
[Machado et al., 2018](https://arxiv.org/abs/1709.06009). As stated in
[Agarwal et al., 2020](https://arxiv.org/abs/1907.04543), for each game we use
data from five runs with 50 million transitions each. We release datasets for 46
Atari games. For details on how the dataset was generated, please refer to the
paper.

Atari is a standard RL benchmark. We recommend you to try offline RL methods on
Atari if you are interested in comparing your approach to other state of the art
offline RL methods with discrete actions.

The reward of each step is clipped (obtained with [-1, 1] clipping) and the
episode includes the sum of the clipped reward per episode.
";

const CITATION: &str = "\
@misc{gulcehre2020rl,
    title={RL Unplugged: Benchmarks for Offline Reinforcement Learning},
    author={Caglar Gulcehre and Ziyu Wang and Alexander Novikov and Tom Le Paine
        and  Sergio Gómez Colmenarejo and Konrad Zolna and Rishabh Agarwal and
        Josh Merel and Daniel Mankowitz and Cosmin Paduraru and Gabriel
        Dulac-Arnold and Jerry Li and Mohammad Norouzi and Matt Hoffman and
        Ofir Nachum and George Tucker and Nicolas Heess and Nando deFreitas},
    year={2020},
    eprint={2006.13888},
    archivePrefix={arXiv},
    primaryClass={cs.LG}
}
";

/// Description of the dataset in Markdown.
pub fn description() -> &'static str {
    DESCRIPTION
}

/// BibTeX entry of the dataset.
pub fn citation() -> &'static str {
    CITATION
}

/// Metadata of the dataset.
#[derive(Debug, Clone, Serialize)]
pub struct DatasetInfo {
    /// Name of the dataset.
    pub name: &'static str,
    /// Description, see [`description`].
    pub description: &'static str,
    /// Citation, see [`citation`].
    pub citation: &'static str,
    /// Features of the episodes.
    pub features: FeaturesDict,
}

impl DatasetInfo {
    /// Collects the metadata of the dataset.
    pub fn new() -> Self {
        Self {
            name: DATASET_NAME,
            description: description(),
            citation: citation(),
            features: features_dict(),
        }
    }
}

impl Default for DatasetInfo {
    fn default() -> Self {
        Self::new()
    }
}
