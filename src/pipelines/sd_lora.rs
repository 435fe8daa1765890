use serde::{Deserialize, Serialize};

use super::data::ImageDataLoaderConfig;
use super::defaults::{default_false, default_sd_model};
use super::lora::LoraTrainingConfig;
use super::run::RunConfig;
use super::trainer::TrainerConfig;

/// Stable Diffusion LoRA training pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SdLoraConfig {
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
    /// Weight the loss with dataset-provided masks.
    #[serde(default = "default_false")]
    pub use_masks: bool,
    pub data_loader: ImageDataLoaderConfig,
}

impl Default for SdLoraConfig {
    fn default() -> Self {
        Self {
            run: RunConfig::default(),
            model: default_sd_model(),
            trainer: TrainerConfig::default(),
            lora: LoraTrainingConfig::default(),
            use_masks: false,
            data_loader: ImageDataLoaderConfig::default(),
        }
    }
}
