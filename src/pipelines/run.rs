use serde::{Deserialize, Serialize};

use super::defaults::default_base_output_dir;

/// Run-control fields shared by every pipeline.
///
/// Flattened into each pipeline struct so the on-disk layout stays flat.
/// Config keys (YAML): `seed`, `base_output_dir`, `report_to`,
/// `max_train_steps` / `max_train_epochs`, `save_every_n_steps` /
/// `save_every_n_epochs`, `validate_every_n_steps` / `validate_every_n_epochs`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunConfig {
    /// Seed for randomized aspects of the run. Unset means a fresh seed per run.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    #[serde(default = "default_base_output_dir")]
    pub base_output_dir: String,
    #[serde(default)]
    pub report_to: ReportTo,
    /// Total training length. Exactly one of the steps/epochs pair must be set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_train_steps: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_train_epochs: Option<u32>,
    /// Checkpoint cadence. Exactly one of the pair must be set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub save_every_n_steps: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub save_every_n_epochs: Option<u32>,
    /// Validation-image cadence. Exactly one of the pair must be set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validate_every_n_steps: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validate_every_n_epochs: Option<u32>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            seed: None,
            base_output_dir: default_base_output_dir(),
            report_to: ReportTo::default(),
            max_train_steps: Some(2000),
            max_train_epochs: None,
            save_every_n_steps: None,
            save_every_n_epochs: Some(1),
            validate_every_n_steps: None,
            validate_every_n_epochs: Some(1),
        }
    }
}

/// Experiment tracker the run reports metrics to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportTo {
    All,
    Tensorboard,
    Wandb,
    CometMl,
}

impl Default for ReportTo {
    fn default() -> Self {
        Self::Tensorboard
    }
}

impl ReportTo {
    pub const ALL: [Self; 4] = [Self::All, Self::Tensorboard, Self::Wandb, Self::CometMl];

    pub fn label(&self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Tensorboard => "tensorboard",
            Self::Wandb => "wandb",
            Self::CometMl => "comet_ml",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn omitted_run_fields_fall_back_to_field_defaults() {
        let run: RunConfig = serde_yaml::from_str("max_train_steps: 800").unwrap();
        assert_eq!(run.base_output_dir, "output");
        assert_eq!(run.report_to, ReportTo::Tensorboard);
        assert_eq!(run.max_train_steps, Some(800));
        assert_eq!(run.max_train_epochs, None);
        assert_eq!(run.save_every_n_epochs, None);
    }

    #[test]
    fn unset_options_are_not_written_out() {
        let yaml = serde_yaml::to_string(&RunConfig::default()).unwrap();
        assert!(!yaml.contains("seed"));
        assert!(!yaml.contains("max_train_epochs"));
        assert!(yaml.contains("max_train_steps: 2000"));
        assert!(yaml.contains("report_to: tensorboard"));
    }
}
