use serde::{Deserialize, Serialize};

use super::defaults::{
    default_false, default_gradient_accumulation_steps, default_hf_variant,
    default_min_snr_gamma, default_num_validation_images_per_prompt, default_train_batch_size,
};
use super::optimizer::OptimizerConfig;

/// Trainer knobs shared by every pipeline, flattened like [`super::RunConfig`].
///
/// Config keys: `hf_variant`, `optimizer`, `lr_scheduler`, `lr_warmup_steps`,
/// `min_snr_gamma`, `cache_text_encoder_outputs`, `cache_vae_outputs`,
/// `enable_cpu_offload_during_validation`, `gradient_accumulation_steps`,
/// `weight_dtype`, `mixed_precision`, `xformers`, `gradient_checkpointing`,
/// `max_checkpoints`, `prediction_type`, `max_grad_norm`, `validation_prompts`,
/// `negative_validation_prompts`, `num_validation_images_per_prompt`,
/// `train_batch_size`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainerConfig {
    /// Hugging Face Hub model variant (e.g. `fp16`). Only applies when `model`
    /// names a Hub repo. Serialized even when null so a cleared variant does
    /// not fall back to the default on reload.
    #[serde(default = "default_hf_variant")]
    pub hf_variant: Option<String>,
    #[serde(default)]
    pub optimizer: OptimizerConfig,
    #[serde(default)]
    pub lr_scheduler: LrScheduler,
    /// Warmup steps, applied only by schedulers that support warmup.
    #[serde(default)]
    pub lr_warmup_steps: u32,
    /// Upper bound for Min-SNR loss weighting. Unset disables Min-SNR
    /// weighting; 5.0 is the recommended value when enabled.
    #[serde(default = "default_min_snr_gamma")]
    pub min_snr_gamma: Option<f64>,
    /// Precompute and cache text encoder outputs. Incompatible with training
    /// the text encoder or caption augmentations.
    #[serde(default = "default_false")]
    pub cache_text_encoder_outputs: bool,
    /// Precompute and cache VAE image latents. Requires deterministic image
    /// augmentations (center_crop on, random_flip off).
    #[serde(default = "default_false")]
    pub cache_vae_outputs: bool,
    #[serde(default = "default_false")]
    pub enable_cpu_offload_during_validation: bool,
    #[serde(default = "default_gradient_accumulation_steps")]
    pub gradient_accumulation_steps: u32,
    #[serde(default)]
    pub weight_dtype: WeightDtype,
    #[serde(default)]
    pub mixed_precision: MixedPrecision,
    #[serde(default = "default_false")]
    pub xformers: bool,
    #[serde(default = "default_false")]
    pub gradient_checkpointing: bool,
    /// Checkpoint retention limit, applied to step and epoch checkpoints
    /// separately. Unset keeps everything.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_checkpoints: Option<u32>,
    /// Override for the noise scheduler's prediction type. Unset uses the
    /// scheduler's own setting.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prediction_type: Option<PredictionType>,
    /// Gradient-clipping norm. Unset disables clipping.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_grad_norm: Option<f64>,
    /// Prompts used to render progress images during training.
    #[serde(default)]
    pub validation_prompts: Vec<String>,
    /// When set, must have the same length as `validation_prompts`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub negative_validation_prompts: Option<Vec<String>>,
    #[serde(default = "default_num_validation_images_per_prompt")]
    pub num_validation_images_per_prompt: u32,
    #[serde(default = "default_train_batch_size")]
    pub train_batch_size: u32,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        Self {
            hf_variant: default_hf_variant(),
            optimizer: OptimizerConfig::default(),
            lr_scheduler: LrScheduler::default(),
            lr_warmup_steps: 0,
            min_snr_gamma: default_min_snr_gamma(),
            cache_text_encoder_outputs: false,
            cache_vae_outputs: false,
            enable_cpu_offload_during_validation: false,
            gradient_accumulation_steps: default_gradient_accumulation_steps(),
            weight_dtype: WeightDtype::default(),
            mixed_precision: MixedPrecision::default(),
            xformers: false,
            gradient_checkpointing: false,
            max_checkpoints: None,
            prediction_type: None,
            max_grad_norm: None,
            validation_prompts: Vec::new(),
            negative_validation_prompts: None,
            num_validation_images_per_prompt: default_num_validation_images_per_prompt(),
            train_batch_size: default_train_batch_size(),
        }
    }
}

/// Learning-rate schedule shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LrScheduler {
    Linear,
    Cosine,
    CosineWithRestarts,
    Polynomial,
    Constant,
    ConstantWithWarmup,
}

impl Default for LrScheduler {
    fn default() -> Self {
        Self::Constant
    }
}

impl LrScheduler {
    pub const ALL: [Self; 6] = [
        Self::Linear,
        Self::Cosine,
        Self::CosineWithRestarts,
        Self::Polynomial,
        Self::Constant,
        Self::ConstantWithWarmup,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Linear => "linear",
            Self::Cosine => "cosine",
            Self::CosineWithRestarts => "cosine_with_restarts",
            Self::Polynomial => "polynomial",
            Self::Constant => "constant",
            Self::ConstantWithWarmup => "constant_with_warmup",
        }
    }
}

/// Precision that model weights are cast to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeightDtype {
    Float32,
    Float16,
    Bfloat16,
}

impl Default for WeightDtype {
    fn default() -> Self {
        Self::Bfloat16
    }
}

impl WeightDtype {
    pub const ALL: [Self; 3] = [Self::Float32, Self::Float16, Self::Bfloat16];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Float32 => "float32",
            Self::Float16 => "float16",
            Self::Bfloat16 => "bfloat16",
        }
    }
}

/// Mixed-precision mode handed through to the accelerator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MixedPrecision {
    No,
    Fp16,
    Bf16,
    Fp8,
}

impl Default for MixedPrecision {
    fn default() -> Self {
        Self::No
    }
}

impl MixedPrecision {
    pub const ALL: [Self; 4] = [Self::No, Self::Fp16, Self::Bf16, Self::Fp8];

    pub fn label(&self) -> &'static str {
        match self {
            Self::No => "no",
            Self::Fp16 => "fp16",
            Self::Bf16 => "bf16",
            Self::Fp8 => "fp8",
        }
    }
}

/// Noise-prediction target override.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PredictionType {
    Epsilon,
    VPrediction,
}

impl PredictionType {
    pub const ALL: [Self; 2] = [Self::Epsilon, Self::VPrediction];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Epsilon => "epsilon",
            Self::VPrediction => "v_prediction",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_mapping_yields_the_documented_defaults() {
        let trainer: TrainerConfig = serde_yaml::from_str("{}").unwrap();
        assert_eq!(trainer.hf_variant.as_deref(), Some("fp16"));
        assert_eq!(trainer.min_snr_gamma, Some(5.0));
        assert_eq!(trainer.weight_dtype, WeightDtype::Bfloat16);
        assert_eq!(trainer.mixed_precision, MixedPrecision::No);
        assert_eq!(trainer.lr_scheduler, LrScheduler::Constant);
        assert_eq!(trainer.train_batch_size, 4);
        assert_eq!(trainer.num_validation_images_per_prompt, 4);
        assert!(trainer.validation_prompts.is_empty());
    }

    #[test]
    fn cleared_hf_variant_survives_a_round_trip() {
        let mut trainer = TrainerConfig::default();
        trainer.hf_variant = None;
        trainer.min_snr_gamma = None;
        let yaml = serde_yaml::to_string(&trainer).unwrap();
        let back: TrainerConfig = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(back.hf_variant, None);
        assert_eq!(back.min_snr_gamma, None);
    }

    #[test]
    fn scheduler_names_use_snake_case_on_the_wire() {
        let yaml = serde_yaml::to_string(&LrScheduler::CosineWithRestarts).unwrap();
        assert_eq!(yaml.trim(), "cosine_with_restarts");
        let back: LrScheduler = serde_yaml::from_str("constant_with_warmup").unwrap();
        assert_eq!(back, LrScheduler::ConstantWithWarmup);
    }
}
