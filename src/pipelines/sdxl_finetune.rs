use serde::{Deserialize, Serialize};

use super::data::ImageDataLoaderConfig;
use super::defaults::{default_false, default_save_dtype, default_sdxl_model};
use super::run::RunConfig;
use super::trainer::{TrainerConfig, WeightDtype};

/// Full Stable Diffusion XL finetune pipeline. Trains the base weights
/// directly; there are no LoRA layers and no per-module learning rates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SdxlFinetuneConfig {
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
    /// Save the full pipeline, or only the submodels that were trained.
    #[serde(default)]
    pub save_checkpoint_format: SaveCheckpointFormat,
    #[serde(default = "default_save_dtype")]
    pub save_dtype: WeightDtype,
    #[serde(flatten)]
    pub trainer: TrainerConfig,
    /// Weight the loss with dataset-provided masks.
    #[serde(default = "default_false")]
    pub use_masks: bool,
    pub data_loader: ImageDataLoaderConfig,
}

impl Default for SdxlFinetuneConfig {
    fn default() -> Self {
        Self {
            run: RunConfig::default(),
            model: default_sdxl_model(),
            vae_model: None,
            save_checkpoint_format: SaveCheckpointFormat::default(),
            save_dtype: default_save_dtype(),
            trainer: TrainerConfig::default(),
            use_masks: false,
            data_loader: ImageDataLoaderConfig::default(),
        }
    }
}

/// Checkpoint layout for finetune runs.
///
/// `trained_only_diffusers` keeps only the finetuned submodels, which is much
/// smaller on disk and is the right input for LoRA extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SaveCheckpointFormat {
    FullDiffusers,
    TrainedOnlyDiffusers,
}

impl Default for SaveCheckpointFormat {
    fn default() -> Self {
        Self::TrainedOnlyDiffusers
    }
}

impl SaveCheckpointFormat {
    pub const ALL: [Self; 2] = [Self::FullDiffusers, Self::TrainedOnlyDiffusers];

    pub fn label(&self) -> &'static str {
        match self {
            Self::FullDiffusers => "full_diffusers",
            Self::TrainedOnlyDiffusers => "trained_only_diffusers",
        }
    }
}
