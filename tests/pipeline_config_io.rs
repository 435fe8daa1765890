//! File round trips for the pipeline configs: load, save, format switching,
//! and validation at the file boundary.

use lorabench::pipelines::{
    self, ImageCaptionDatasetConfig, ImageDataLoaderConfig, OptimizerConfig, PipelineConfig,
    PipelineFileError, PipelineKind, Resolution,
};
use tempfile::tempdir;

/// A config in the shape people write by hand: flat run and trainer keys next
/// to the pipeline's own fields, nested loader and dataset blocks
/// discriminated by `type`.
const SDXL_LORA_SAMPLE: &str = "\
type: SDXL_LORA
seed: 1
base_output_dir: output/robocats
model: stabilityai/stable-diffusion-xl-base-1.0
vae_model: madebyollin/sdxl-vae-fp16-fix
max_train_steps: 3000
save_every_n_steps: 500
validate_every_n_epochs: 1
optimizer:
  optimizer_type: Prodigy
  learning_rate: 1.0
  use_bias_correction: true
lr_scheduler: cosine
lr_warmup_steps: 100
train_batch_size: 1
gradient_accumulation_steps: 4
mixed_precision: fp16
gradient_checkpointing: true
cache_text_encoder_outputs: true
cache_vae_outputs: true
train_text_encoder: false
lora_rank_dim: 16
max_checkpoints: 5
validation_prompts:
  - a cat in a robot suit
  - a dog surfing a wave
negative_validation_prompts:
  - blurry, low quality
  - ''
num_validation_images_per_prompt: 3
data_loader:
  type: IMAGE_CAPTION_SD_DATA_LOADER
  dataset:
    type: HF_HUB_IMAGE_CAPTION_DATASET
    dataset_name: lambdalabs/naruto-blip-captions
  resolution: 1024
  aspect_ratio_buckets:
    target_resolution: 1024
    start_dim: 512
    end_dim: 1536
    divisible_by: 64
  dataloader_num_workers: 4
";

#[test]
fn hand_written_sample_parses_with_its_values() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("robocats.yaml");
    std::fs::write(&path, SDXL_LORA_SAMPLE).unwrap();

    let config = pipelines::load(&path).unwrap();
    let PipelineConfig::SdxlLora(sdxl) = &config else {
        panic!("expected SDXL LoRA, got {config:?}");
    };
    assert_eq!(sdxl.run.seed, Some(1));
    assert_eq!(sdxl.run.base_output_dir, "output/robocats");
    assert_eq!(sdxl.run.max_train_steps, Some(3000));
    assert_eq!(sdxl.run.save_every_n_steps, Some(500));
    assert_eq!(sdxl.run.validate_every_n_epochs, Some(1));
    assert_eq!(sdxl.vae_model.as_deref(), Some("madebyollin/sdxl-vae-fp16-fix"));
    assert!(matches!(
        sdxl.trainer.optimizer,
        OptimizerConfig::Prodigy(_)
    ));
    assert_eq!(sdxl.trainer.train_batch_size, 1);
    assert_eq!(sdxl.trainer.gradient_accumulation_steps, 4);
    assert_eq!(sdxl.trainer.max_checkpoints, Some(5));
    assert!(!sdxl.lora.train_text_encoder);
    assert_eq!(sdxl.lora.lora_rank_dim, 16);
    assert_eq!(
        sdxl.trainer.negative_validation_prompts.as_deref(),
        Some(&["blurry, low quality".to_string(), String::new()][..])
    );

    let ImageDataLoaderConfig::ImageCaption(loader) = &sdxl.data_loader else {
        panic!("expected the image caption loader");
    };
    assert_eq!(loader.resolution, Resolution::Square(1024));
    let buckets = loader.aspect_ratio_buckets.as_ref().unwrap();
    assert_eq!(buckets.start_dim, 512);
    assert_eq!(buckets.end_dim, 1536);
    assert_eq!(loader.dataloader_num_workers, 4);
    let ImageCaptionDatasetConfig::HfHub(dataset) = &loader.dataset else {
        panic!("expected the Hub dataset");
    };
    assert_eq!(dataset.dataset_name, "lambdalabs/naruto-blip-captions");
    // Omitted columns fall back to the dataset defaults.
    assert_eq!(dataset.image_column, "image");
    assert_eq!(dataset.caption_column, "text");
}

#[test]
fn every_pipeline_survives_a_yaml_save_and_load() {
    let dir = tempdir().unwrap();
    for kind in PipelineKind::ALL {
        let path = dir.path().join(format!("{}.yaml", kind.tag()));
        let config = kind.default_config();
        pipelines::save(&config, &path).unwrap();
        let loaded = pipelines::load(&path).unwrap();
        assert_eq!(loaded, config, "{} did not round trip", kind.label());
    }
}

#[test]
fn json_files_round_trip_and_reopen_as_yaml_text_would() {
    let dir = tempdir().unwrap();
    let yaml_path = dir.path().join("sample.yaml");
    std::fs::write(&yaml_path, SDXL_LORA_SAMPLE).unwrap();
    let config = pipelines::load(&yaml_path).unwrap();

    let json_path = dir.path().join("sample.json");
    pipelines::save(&config, &json_path).unwrap();
    let text = std::fs::read_to_string(&json_path).unwrap();
    assert!(text.trim_start().starts_with('{'));
    assert!(text.contains("\"type\": \"SDXL_LORA\""));

    let reloaded = pipelines::load(&json_path).unwrap();
    assert_eq!(reloaded, config);
}

#[test]
fn save_creates_missing_parent_directories() {
    let dir = tempdir().unwrap();
    let path = dir
        .path()
        .join("runs")
        .join("2024")
        .join("sd_dpo_lora.yaml");
    let config = PipelineKind::SdDpoLora.default_config();
    pipelines::save(&config, &path).unwrap();
    assert!(path.is_file());
}

#[test]
fn mismatched_prompt_counts_fail_at_load_time() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("mismatched.yaml");
    let yaml = "\
type: SD_LORA
max_train_steps: 100
save_every_n_epochs: 1
validate_every_n_epochs: 1
validation_prompts:
  - a watercolor fox
  - an ink sketch of a crow
negative_validation_prompts:
  - blurry
data_loader:
  type: IMAGE_CAPTION_SD_DATA_LOADER
  dataset:
    type: IMAGE_CAPTION_DIR_DATASET
    dataset_dir: data/fox
";
    std::fs::write(&path, yaml).unwrap();
    let err = pipelines::load(&path).unwrap_err();
    let PipelineFileError::Invalid { path: reported, source } = &err else {
        panic!("expected a validation failure, got {err:?}");
    };
    assert_eq!(reported, &path);
    assert!(source.to_string().contains("validation_prompts"));
}

#[test]
fn missing_file_reports_a_read_error_with_the_path() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("does-not-exist.yaml");
    let err = pipelines::load(&path).unwrap_err();
    let PipelineFileError::Read { path: reported, .. } = &err else {
        panic!("expected Read, got {err:?}");
    };
    assert_eq!(reported, &path);
}

#[test]
fn unknown_pipeline_tag_is_a_parse_error() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("future.yaml");
    std::fs::write(&path, "type: PIXART_LORA\nmax_train_steps: 100\n").unwrap();
    let err = pipelines::load(&path).unwrap_err();
    assert!(matches!(err, PipelineFileError::ParseYaml { .. }));
}

#[test]
fn to_yaml_matches_what_save_writes() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("preview.yaml");
    let config = PipelineKind::SdxlFinetune.default_config();
    pipelines::save(&config, &path).unwrap();
    let written = std::fs::read_to_string(&path).unwrap();
    assert_eq!(pipelines::to_yaml(&config).unwrap(), written);
}
