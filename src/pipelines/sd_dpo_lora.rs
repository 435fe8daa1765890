use serde::{Deserialize, Serialize};

use super::data::PairPreferenceDataLoaderConfig;
use super::defaults::{default_beta, default_sd_model};
use super::lora::LoraTrainingConfig;
use super::run::RunConfig;
use super::trainer::TrainerConfig;

/// Direct Preference Optimization LoRA pipeline for Stable Diffusion.
///
/// Trains a LoRA from paired preference data (a preferred and a rejected
/// image per prompt) instead of plain captioned images.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SdDpoLoraConfig {
    #[serde(flatten)]
    pub run: RunConfig,
    /// Base model to train: a Hub name or a path to a local model in
    /// diffusers or single-checkpoint format.
    #[serde(default = "default_sd_model")]
    pub model: String,
    #[serde(flatten)]
    pub trainer: TrainerConfig,
    #[serde(flatten)]
    pub lora: LoraTrainingConfig,
    /// LoRA checkpoint directory to initialize the LoRA weights from. When
    /// set, `train_unet`, `train_text_encoder` and `lora_rank_dim` are taken
    /// from the checkpoint instead of this config.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initial_lora: Option<String>,
    /// KL-divergence penalty strength. Larger values discourage divergence
    /// from the reference weights; typical values are 1000 to 10000.
    #[serde(default = "default_beta")]
    pub beta: f64,
    pub data_loader: PairPreferenceDataLoaderConfig,
}

impl Default for SdDpoLoraConfig {
    fn default() -> Self {
        Self {
            run: RunConfig::default(),
            model: default_sd_model(),
            trainer: TrainerConfig::default(),
            lora: LoraTrainingConfig::default(),
            initial_lora: None,
            beta: default_beta(),
            data_loader: PairPreferenceDataLoaderConfig::default(),
        }
    }
}
