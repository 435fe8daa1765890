//! Schema rules checked after parsing and before saving.

use thiserror::Error;

use super::PipelineConfig;
use super::data::{
    AspectRatioBucketConfig, DreamboothDataLoaderConfig, ImageCaptionDataLoaderConfig,
    ImageDataLoaderConfig, PairPreferenceDataLoaderConfig, Resolution,
};
use super::lora::LoraTrainingConfig;
use super::run::RunConfig;
use super::trainer::TrainerConfig;

/// A pipeline config that violates one of the schema rules.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error(
        "The number of validation_prompts ({positive}) must match the number of negative_validation_prompts ({negative})"
    )]
    PromptCountMismatch { positive: usize, negative: usize },
    #[error("Exactly one of '{steps}' or '{epochs}' must be set")]
    SchedulePair {
        steps: &'static str,
        epochs: &'static str,
    },
    #[error("Invalid {field}: {value} (must be > 0)")]
    ZeroCount { field: &'static str, value: u32 },
    #[error("Invalid {field}: {value} (must be > 0.0)")]
    NonPositive { field: &'static str, value: f64 },
    #[error("Invalid resolution: {height}x{width} (both dimensions must be > 0)")]
    ZeroResolution { height: u32, width: u32 },
    #[error("Invalid aspect ratio buckets: start_dim ({start_dim}) must not exceed end_dim ({end_dim})")]
    BucketRange { start_dim: u32, end_dim: u32 },
    #[error("Dreambooth instance_caption must not be empty")]
    MissingInstanceCaption,
    #[error("Dreambooth class_caption is required when a class_dataset is set")]
    MissingClassCaption,
}

pub fn validate(config: &PipelineConfig) -> Result<(), ValidationError> {
    match config {
        PipelineConfig::SdLora(config) => {
            validate_run(&config.run)?;
            validate_trainer(&config.trainer)?;
            validate_lora(&config.lora)?;
            validate_image_loader(&config.data_loader)
        }
        PipelineConfig::SdxlLora(config) => {
            validate_run(&config.run)?;
            validate_trainer(&config.trainer)?;
            validate_lora(&config.lora)?;
            validate_image_loader(&config.data_loader)
        }
        PipelineConfig::SdxlFinetune(config) => {
            validate_run(&config.run)?;
            validate_trainer(&config.trainer)?;
            validate_image_loader(&config.data_loader)
        }
        PipelineConfig::SdDpoLora(config) => {
            validate_run(&config.run)?;
            validate_trainer(&config.trainer)?;
            validate_lora(&config.lora)?;
            if config.beta <= 0.0 {
                return Err(ValidationError::NonPositive {
                    field: "beta",
                    value: config.beta,
                });
            }
            validate_preference_loader(&config.data_loader)
        }
    }
}

fn validate_run(run: &RunConfig) -> Result<(), ValidationError> {
    schedule_pair(
        run.max_train_steps,
        run.max_train_epochs,
        "max_train_steps",
        "max_train_epochs",
    )?;
    schedule_pair(
        run.save_every_n_steps,
        run.save_every_n_epochs,
        "save_every_n_steps",
        "save_every_n_epochs",
    )?;
    schedule_pair(
        run.validate_every_n_steps,
        run.validate_every_n_epochs,
        "validate_every_n_steps",
        "validate_every_n_epochs",
    )
}

fn schedule_pair(
    step_value: Option<u32>,
    epoch_value: Option<u32>,
    steps: &'static str,
    epochs: &'static str,
) -> Result<(), ValidationError> {
    if step_value.is_some() == epoch_value.is_some() {
        return Err(ValidationError::SchedulePair { steps, epochs });
    }
    Ok(())
}

fn validate_trainer(trainer: &TrainerConfig) -> Result<(), ValidationError> {
    if let Some(negative) = &trainer.negative_validation_prompts {
        if negative.len() != trainer.validation_prompts.len() {
            return Err(ValidationError::PromptCountMismatch {
                positive: trainer.validation_prompts.len(),
                negative: negative.len(),
            });
        }
    }
    if trainer.train_batch_size == 0 {
        return Err(ValidationError::ZeroCount {
            field: "train_batch_size",
            value: trainer.train_batch_size,
        });
    }
    if trainer.gradient_accumulation_steps == 0 {
        return Err(ValidationError::ZeroCount {
            field: "gradient_accumulation_steps",
            value: trainer.gradient_accumulation_steps,
        });
    }
    let learning_rate = trainer.optimizer.learning_rate();
    if learning_rate <= 0.0 {
        return Err(ValidationError::NonPositive {
            field: "learning_rate",
            value: learning_rate,
        });
    }
    if let Some(max_grad_norm) = trainer.max_grad_norm {
        if max_grad_norm <= 0.0 {
            return Err(ValidationError::NonPositive {
                field: "max_grad_norm",
                value: max_grad_norm,
            });
        }
    }
    Ok(())
}

fn validate_lora(lora: &LoraTrainingConfig) -> Result<(), ValidationError> {
    if lora.lora_rank_dim == 0 {
        return Err(ValidationError::ZeroCount {
            field: "lora_rank_dim",
            value: lora.lora_rank_dim,
        });
    }
    if let Some(unet_learning_rate) = lora.unet_learning_rate {
        if unet_learning_rate <= 0.0 {
            return Err(ValidationError::NonPositive {
                field: "unet_learning_rate",
                value: unet_learning_rate,
            });
        }
    }
    if let Some(text_encoder_learning_rate) = lora.text_encoder_learning_rate {
        if text_encoder_learning_rate <= 0.0 {
            return Err(ValidationError::NonPositive {
                field: "text_encoder_learning_rate",
                value: text_encoder_learning_rate,
            });
        }
    }
    Ok(())
}

fn validate_image_loader(loader: &ImageDataLoaderConfig) -> Result<(), ValidationError> {
    match loader {
        ImageDataLoaderConfig::ImageCaption(loader) => validate_image_caption_loader(loader),
        ImageDataLoaderConfig::Dreambooth(loader) => validate_dreambooth_loader(loader),
    }
}

fn validate_image_caption_loader(
    loader: &ImageCaptionDataLoaderConfig,
) -> Result<(), ValidationError> {
    validate_resolution(loader.resolution)?;
    if let Some(buckets) = &loader.aspect_ratio_buckets {
        validate_buckets(buckets)?;
    }
    Ok(())
}

fn validate_dreambooth_loader(loader: &DreamboothDataLoaderConfig) -> Result<(), ValidationError> {
    if loader.instance_caption.trim().is_empty() {
        return Err(ValidationError::MissingInstanceCaption);
    }
    if loader.class_dataset.is_some()
        && loader
            .class_caption
            .as_ref()
            .is_none_or(|caption| caption.trim().is_empty())
    {
        return Err(ValidationError::MissingClassCaption);
    }
    validate_resolution(loader.resolution)?;
    if let Some(buckets) = &loader.aspect_ratio_buckets {
        validate_buckets(buckets)?;
    }
    Ok(())
}

fn validate_preference_loader(
    loader: &PairPreferenceDataLoaderConfig,
) -> Result<(), ValidationError> {
    validate_resolution(loader.resolution)
}

fn validate_resolution(resolution: Resolution) -> Result<(), ValidationError> {
    let (height, width) = resolution.dims();
    if height == 0 || width == 0 {
        return Err(ValidationError::ZeroResolution { height, width });
    }
    Ok(())
}

fn validate_buckets(buckets: &AspectRatioBucketConfig) -> Result<(), ValidationError> {
    if buckets.target_resolution == 0 {
        return Err(ValidationError::ZeroCount {
            field: "aspect_ratio_buckets.target_resolution",
            value: buckets.target_resolution,
        });
    }
    if buckets.start_dim == 0 || buckets.end_dim == 0 {
        return Err(ValidationError::ZeroCount {
            field: "aspect_ratio_buckets.start_dim/end_dim",
            value: buckets.start_dim.min(buckets.end_dim),
        });
    }
    if buckets.start_dim > buckets.end_dim {
        return Err(ValidationError::BucketRange {
            start_dim: buckets.start_dim,
            end_dim: buckets.end_dim,
        });
    }
    if buckets.divisible_by == 0 {
        return Err(ValidationError::ZeroCount {
            field: "aspect_ratio_buckets.divisible_by",
            value: buckets.divisible_by,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::super::PipelineKind;
    use super::super::data::{ImageDirDatasetConfig, PairPreferenceDatasetConfig};
    use super::super::optimizer::{OptimizerConfig, ProdigyOptimizerConfig};
    use super::super::sd_lora::SdLoraConfig;
    use super::*;

    fn sd_lora() -> SdLoraConfig {
        SdLoraConfig::default()
    }

    #[test]
    fn default_configs_validate_for_every_pipeline() {
        for kind in PipelineKind::ALL {
            let config = kind.default_config();
            assert!(config.validate().is_ok(), "{kind:?} default failed");
        }
    }

    #[test]
    fn mismatched_negative_prompt_count_is_rejected() {
        let mut config = sd_lora();
        config.trainer.validation_prompts =
            vec!["a watercolor fox".to_string(), "a pencil sketch".to_string()];
        config.trainer.negative_validation_prompts = Some(vec!["blurry".to_string()]);
        let err = validate(&PipelineConfig::SdLora(config)).unwrap_err();
        assert!(matches!(
            err,
            ValidationError::PromptCountMismatch {
                positive: 2,
                negative: 1
            }
        ));
    }

    #[test]
    fn matching_negative_prompt_count_is_accepted() {
        let mut config = sd_lora();
        config.trainer.validation_prompts = vec!["a watercolor fox".to_string()];
        config.trainer.negative_validation_prompts = Some(vec!["blurry".to_string()]);
        assert!(validate(&PipelineConfig::SdLora(config)).is_ok());
    }

    #[test]
    fn both_schedule_sides_set_is_rejected() {
        let mut config = sd_lora();
        config.run.max_train_epochs = Some(10);
        let err = validate(&PipelineConfig::SdLora(config)).unwrap_err();
        assert!(matches!(
            err,
            ValidationError::SchedulePair {
                steps: "max_train_steps",
                ..
            }
        ));
    }

    #[test]
    fn neither_schedule_side_set_is_rejected() {
        let mut config = sd_lora();
        config.run.save_every_n_epochs = None;
        let err = validate(&PipelineConfig::SdLora(config)).unwrap_err();
        assert!(matches!(
            err,
            ValidationError::SchedulePair {
                steps: "save_every_n_steps",
                ..
            }
        ));
    }

    #[test]
    fn zero_batch_size_is_rejected() {
        let mut config = sd_lora();
        config.trainer.train_batch_size = 0;
        let err = validate(&PipelineConfig::SdLora(config)).unwrap_err();
        assert!(matches!(
            err,
            ValidationError::ZeroCount {
                field: "train_batch_size",
                ..
            }
        ));
    }

    #[test]
    fn non_positive_learning_rate_is_rejected() {
        let mut config = sd_lora();
        config.trainer.optimizer = OptimizerConfig::Prodigy(ProdigyOptimizerConfig {
            learning_rate: 0.0,
            ..ProdigyOptimizerConfig::default()
        });
        let err = validate(&PipelineConfig::SdLora(config)).unwrap_err();
        assert!(matches!(
            err,
            ValidationError::NonPositive {
                field: "learning_rate",
                ..
            }
        ));
    }

    #[test]
    fn zero_lora_rank_is_rejected() {
        let mut config = sd_lora();
        config.lora.lora_rank_dim = 0;
        let err = validate(&PipelineConfig::SdLora(config)).unwrap_err();
        assert!(matches!(
            err,
            ValidationError::ZeroCount {
                field: "lora_rank_dim",
                ..
            }
        ));
    }

    #[test]
    fn negative_unet_learning_rate_override_is_rejected() {
        let mut config = sd_lora();
        config.lora.unet_learning_rate = Some(-1e-4);
        let err = validate(&PipelineConfig::SdLora(config)).unwrap_err();
        assert!(matches!(
            err,
            ValidationError::NonPositive {
                field: "unet_learning_rate",
                ..
            }
        ));
    }

    #[test]
    fn inverted_bucket_range_is_rejected() {
        let mut config = sd_lora();
        let ImageDataLoaderConfig::ImageCaption(loader) = &mut config.data_loader else {
            panic!("default loader should be image caption");
        };
        loader.aspect_ratio_buckets = Some(AspectRatioBucketConfig {
            target_resolution: 1024,
            start_dim: 1280,
            end_dim: 768,
            divisible_by: 64,
        });
        let err = validate(&PipelineConfig::SdLora(config)).unwrap_err();
        assert!(matches!(
            err,
            ValidationError::BucketRange {
                start_dim: 1280,
                end_dim: 768
            }
        ));
    }

    #[test]
    fn dreambooth_without_instance_caption_is_rejected() {
        let mut config = sd_lora();
        config.data_loader = ImageDataLoaderConfig::Dreambooth(DreamboothDataLoaderConfig {
            instance_dataset: ImageDirDatasetConfig {
                dataset_dir: "data/dog".to_string(),
                keep_in_memory: false,
            },
            ..DreamboothDataLoaderConfig::default()
        });
        let err = validate(&PipelineConfig::SdLora(config)).unwrap_err();
        assert!(matches!(err, ValidationError::MissingInstanceCaption));
    }

    #[test]
    fn dreambooth_class_dataset_requires_a_class_caption() {
        let mut config = sd_lora();
        config.data_loader = ImageDataLoaderConfig::Dreambooth(DreamboothDataLoaderConfig {
            instance_caption: "a photo of sks dog".to_string(),
            class_dataset: Some(ImageDirDatasetConfig {
                dataset_dir: "data/dogs-class".to_string(),
                keep_in_memory: false,
            }),
            ..DreamboothDataLoaderConfig::default()
        });
        let err = validate(&PipelineConfig::SdLora(config)).unwrap_err();
        assert!(matches!(err, ValidationError::MissingClassCaption));
    }

    #[test]
    fn non_positive_beta_is_rejected() {
        let mut config = super::super::sd_dpo_lora::SdDpoLoraConfig::default();
        config.beta = 0.0;
        config.data_loader.dataset = PairPreferenceDatasetConfig::HfHub;
        let err = validate(&PipelineConfig::SdDpoLora(config)).unwrap_err();
        assert!(matches!(
            err,
            ValidationError::NonPositive { field: "beta", .. }
        ));
    }

    #[test]
    fn zero_resolution_dimension_is_rejected() {
        let mut config = sd_lora();
        let ImageDataLoaderConfig::ImageCaption(loader) = &mut config.data_loader else {
            panic!("default loader should be image caption");
        };
        loader.resolution = Resolution::Dims(0, 512);
        let err = validate(&PipelineConfig::SdLora(config)).unwrap_err();
        assert!(matches!(
            err,
            ValidationError::ZeroResolution {
                height: 0,
                width: 512
            }
        ));
    }
}
