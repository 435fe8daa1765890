use serde::{Deserialize, Serialize};

use super::data::ImageDataLoaderConfig;
use super::defaults::{default_false, default_sdxl_model};
use super::lora::LoraTrainingConfig;
use super::run::RunConfig;
use super::trainer::TrainerConfig;

/// Stable Diffusion XL LoRA training pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SdxlLoraConfig {
    #[serde(flatten)]
    pub run: RunConfig,
    /// Base model to train: a Hub name or a path to a local model in
    /// diffusers or single-checkpoint format.
    #[serde(default = "default_sdxl_model")]
    pub model: String,
    /// Override for the VAE bundled with the base model. SDXL shipped with a
    /// VAE that produces NaNs in fp16, so a fixed VAE is commonly substituted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vae_model: Option<String>,
    #[serde(flatten)]
    pub trainer: TrainerConfig,
    #[serde(flatten)]
    pub lora: LoraTrainingConfig,
    /// Weight the loss with dataset-provided masks.
    #[serde(default = "default_false")]
    pub use_masks: bool,
    pub data_loader: ImageDataLoaderConfig,
}

impl Default for SdxlLoraConfig {
    fn default() -> Self {
        Self {
            run: RunConfig::default(),
            model: default_sdxl_model(),
            vae_model: None,
            trainer: TrainerConfig::default(),
            lora: LoraTrainingConfig::default(),
            use_masks: false,
            data_loader: ImageDataLoaderConfig::default(),
        }
    }
}
