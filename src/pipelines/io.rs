use std::path::{Path, PathBuf};

use thiserror::Error;

use super::validate::ValidationError;
use super::PipelineConfig;

/// Errors that may occur while reading or writing pipeline config files.
#[derive(Debug, Error)]
pub enum PipelineFileError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Unable to create directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid pipeline config at {path}: {source}")]
    ParseYaml {
        path: PathBuf,
        source: serde_yaml::Error,
    },
    #[error("Invalid pipeline config at {path}: {source}")]
    ParseJson {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("Pipeline config at {path} failed validation: {source}")]
    Invalid {
        path: PathBuf,
        source: ValidationError,
    },
    #[error("Failed to serialize pipeline config: {0}")]
    SerializeYaml(#[from] serde_yaml::Error),
    #[error("Failed to serialize pipeline config: {0}")]
    SerializeJson(#[from] serde_json::Error),
}

/// Read a pipeline config from disk and validate it.
///
/// The file is parsed as YAML unless the extension is `.json`.
pub fn load(path: &Path) -> Result<PipelineConfig, PipelineFileError> {
    let text = std::fs::read_to_string(path).map_err(|source| PipelineFileError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let config: PipelineConfig = if is_json(path) {
        serde_json::from_str(&text).map_err(|source| PipelineFileError::ParseJson {
            path: path.to_path_buf(),
            source,
        })?
    } else {
        serde_yaml::from_str(&text).map_err(|source| PipelineFileError::ParseYaml {
            path: path.to_path_buf(),
            source,
        })?
    };
    config
        .validate()
        .map_err(|source| PipelineFileError::Invalid {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(config)
}

/// Validate a pipeline config and write it to disk, creating parent
/// directories as needed.
///
/// The format follows the extension: `.json` writes JSON, everything else
/// writes YAML.
pub fn save(config: &PipelineConfig, path: &Path) -> Result<(), PipelineFileError> {
    config
        .validate()
        .map_err(|source| PipelineFileError::Invalid {
            path: path.to_path_buf(),
            source,
        })?;
    let text = if is_json(path) {
        serde_json::to_string_pretty(config)?
    } else {
        serde_yaml::to_string(config)?
    };
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|source| PipelineFileError::CreateDir {
                path: parent.to_path_buf(),
                source,
            })?;
        }
    }
    std::fs::write(path, text).map_err(|source| PipelineFileError::Write {
        path: path.to_path_buf(),
        source,
    })
}

/// Render a config as YAML, the way [`save`] would write it.
pub fn to_yaml(config: &PipelineConfig) -> Result<String, PipelineFileError> {
    Ok(serde_yaml::to_string(config)?)
}

fn is_json(path: &Path) -> bool {
    path.extension()
        .is_some_and(|extension| extension.eq_ignore_ascii_case("json"))
}

#[cfg(test)]
mod tests {
    use super::super::PipelineKind;
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn yaml_save_and_load_round_trips() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("run").join("sdxl_lora.yaml");
        let config = PipelineKind::SdxlLora.default_config();
        save(&config, &path).unwrap();
        let loaded = load(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn json_extension_switches_the_format() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("finetune.json");
        let config = PipelineKind::SdxlFinetune.default_config();
        save(&config, &path).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.trim_start().starts_with('{'));
        let loaded = load(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn invalid_config_is_refused_before_writing() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bad.yaml");
        let mut config = PipelineKind::SdLora.default_config();
        let PipelineConfig::SdLora(inner) = &mut config else {
            panic!("expected SD LoRA");
        };
        inner.trainer.train_batch_size = 0;
        let err = save(&config, &path).unwrap_err();
        assert!(matches!(err, PipelineFileError::Invalid { .. }));
        assert!(!path.exists());
    }

    #[test]
    fn loading_a_config_that_fails_validation_reports_the_path() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("mismatched.yaml");
        let yaml = "\
type: SD_LORA
max_train_steps: 100
save_every_n_epochs: 1
validate_every_n_epochs: 1
validation_prompts:
  - a watercolor fox
negative_validation_prompts:
  - blurry
  - oversaturated
data_loader:
  type: IMAGE_CAPTION_SD_DATA_LOADER
  dataset:
    type: IMAGE_CAPTION_DIR_DATASET
    dataset_dir: data/fox
";
        std::fs::write(&path, yaml).unwrap();
        let err = load(&path).unwrap_err();
        let PipelineFileError::Invalid { path: reported, .. } = &err else {
            panic!("expected Invalid, got {err:?}");
        };
        assert_eq!(reported, &path);
    }

    #[test]
    fn malformed_yaml_is_a_parse_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("broken.yaml");
        std::fs::write(&path, "type: [unclosed").unwrap();
        let err = load(&path).unwrap_err();
        assert!(matches!(err, PipelineFileError::ParseYaml { .. }));
    }
}
