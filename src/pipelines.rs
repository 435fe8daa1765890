//! Typed training-pipeline configurations and their on-disk round trip.

use serde::{Deserialize, Serialize};

mod data;
mod defaults;
mod io;
mod lora;
mod optimizer;
mod run;
mod sd_dpo_lora;
mod sd_lora;
mod sdxl_finetune;
mod sdxl_lora;
mod trainer;
mod validate;

pub use data::{
    AspectRatioBucketConfig, DreamboothDataLoaderConfig, HfHubImageCaptionDatasetConfig,
    ImageCaptionDataLoaderConfig, ImageCaptionDatasetConfig, ImageCaptionDirDatasetConfig,
    ImageCaptionJsonlDatasetConfig, ImageDataLoaderConfig, ImageDirDatasetConfig,
    PairPreferenceDataLoaderConfig, PairPreferenceDatasetConfig, Resolution,
};
pub use io::{PipelineFileError, load, save, to_yaml};
pub use lora::{LoraCheckpointFormat, LoraTrainingConfig};
pub use optimizer::{AdamOptimizerConfig, OptimizerConfig, ProdigyOptimizerConfig};
pub use run::{ReportTo, RunConfig};
pub use sd_dpo_lora::SdDpoLoraConfig;
pub use sd_lora::SdLoraConfig;
pub use sdxl_finetune::{SaveCheckpointFormat, SdxlFinetuneConfig};
pub use sdxl_lora::SdxlLoraConfig;
pub use trainer::{LrScheduler, MixedPrecision, PredictionType, TrainerConfig, WeightDtype};
pub use validate::ValidationError;

/// A complete training-run configuration, discriminated by `type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PipelineConfig {
    #[serde(rename = "SD_LORA")]
    SdLora(SdLoraConfig),
    #[serde(rename = "SDXL_LORA")]
    SdxlLora(SdxlLoraConfig),
    #[serde(rename = "SDXL_FINETUNE")]
    SdxlFinetune(SdxlFinetuneConfig),
    #[serde(rename = "SD_DIRECT_PREFERENCE_OPTIMIZATION_LORA")]
    SdDpoLora(SdDpoLoraConfig),
}

impl PipelineConfig {
    pub fn kind(&self) -> PipelineKind {
        match self {
            Self::SdLora(_) => PipelineKind::SdLora,
            Self::SdxlLora(_) => PipelineKind::SdxlLora,
            Self::SdxlFinetune(_) => PipelineKind::SdxlFinetune,
            Self::SdDpoLora(_) => PipelineKind::SdDpoLora,
        }
    }

    pub fn run(&self) -> &RunConfig {
        match self {
            Self::SdLora(config) => &config.run,
            Self::SdxlLora(config) => &config.run,
            Self::SdxlFinetune(config) => &config.run,
            Self::SdDpoLora(config) => &config.run,
        }
    }

    pub fn trainer(&self) -> &TrainerConfig {
        match self {
            Self::SdLora(config) => &config.trainer,
            Self::SdxlLora(config) => &config.trainer,
            Self::SdxlFinetune(config) => &config.trainer,
            Self::SdDpoLora(config) => &config.trainer,
        }
    }

    /// Check the schema rules that serde alone cannot express.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate::validate(self)
    }
}

/// The supported pipelines, in the order they appear in selection UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PipelineKind {
    SdLora,
    SdxlLora,
    SdxlFinetune,
    SdDpoLora,
}

impl PipelineKind {
    pub const ALL: [Self; 4] = [
        Self::SdLora,
        Self::SdxlLora,
        Self::SdxlFinetune,
        Self::SdDpoLora,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::SdLora => "SD LoRA",
            Self::SdxlLora => "SDXL LoRA",
            Self::SdxlFinetune => "SDXL Finetune",
            Self::SdDpoLora => "SD DPO LoRA",
        }
    }

    /// The `type` tag written to config files.
    pub fn tag(&self) -> &'static str {
        match self {
            Self::SdLora => "SD_LORA",
            Self::SdxlLora => "SDXL_LORA",
            Self::SdxlFinetune => "SDXL_FINETUNE",
            Self::SdDpoLora => "SD_DIRECT_PREFERENCE_OPTIMIZATION_LORA",
        }
    }

    /// A fresh config for this pipeline with the documented defaults.
    pub fn default_config(&self) -> PipelineConfig {
        match self {
            Self::SdLora => PipelineConfig::SdLora(SdLoraConfig::default()),
            Self::SdxlLora => PipelineConfig::SdxlLora(SdxlLoraConfig::default()),
            Self::SdxlFinetune => PipelineConfig::SdxlFinetune(SdxlFinetuneConfig::default()),
            Self::SdDpoLora => PipelineConfig::SdDpoLora(SdDpoLoraConfig::default()),
        }
    }
}
