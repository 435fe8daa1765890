use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::defaults::{default_lora_rank_dim, default_true};

/// LoRA-layer fields shared by the LoRA pipelines, flattened like
/// [`super::RunConfig`].
///
/// Config keys: `base_embeddings`, `lora_checkpoint_format`, `train_unet`,
/// `train_text_encoder`, `unet_learning_rate`, `text_encoder_learning_rate`,
/// `lora_rank_dim`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoraTrainingConfig {
    /// Embedding token to trained-embedding file path. The embeddings are
    /// applied to the base model before training; they are not trained
    /// further themselves.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub base_embeddings: BTreeMap<String, String>,
    #[serde(default)]
    pub lora_checkpoint_format: LoraCheckpointFormat,
    /// Add LoRA layers to the UNet and train them.
    #[serde(default = "default_true")]
    pub train_unet: bool,
    /// Add LoRA layers to the text encoder and train them.
    #[serde(default = "default_true")]
    pub train_text_encoder: bool,
    /// Per-module learning-rate override. Unset inherits the optimizer's
    /// learning rate.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unet_learning_rate: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_encoder_learning_rate: Option<f64>,
    /// Rank of the injected LoRA layers. Higher ranks are more expressive and
    /// produce larger checkpoints.
    #[serde(default = "default_lora_rank_dim")]
    pub lora_rank_dim: u32,
}

impl Default for LoraTrainingConfig {
    fn default() -> Self {
        Self {
            base_embeddings: BTreeMap::new(),
            lora_checkpoint_format: LoraCheckpointFormat::default(),
            train_unet: true,
            train_text_encoder: true,
            unet_learning_rate: None,
            text_encoder_learning_rate: None,
            lora_rank_dim: default_lora_rank_dim(),
        }
    }
}

/// On-disk format for saved LoRA checkpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoraCheckpointFormat {
    InvokePeft,
    Kohya,
}

impl Default for LoraCheckpointFormat {
    fn default() -> Self {
        Self::Kohya
    }
}

impl LoraCheckpointFormat {
    pub const ALL: [Self; 2] = [Self::InvokePeft, Self::Kohya];

    pub fn label(&self) -> &'static str {
        match self {
            Self::InvokePeft => "invoke_peft",
            Self::Kohya => "kohya",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_embeddings_map_is_omitted_from_output() {
        let yaml = serde_yaml::to_string(&LoraTrainingConfig::default()).unwrap();
        assert!(!yaml.contains("base_embeddings"));
        assert!(yaml.contains("lora_checkpoint_format: kohya"));
    }

    #[test]
    fn embeddings_round_trip_in_token_order() {
        let mut lora = LoraTrainingConfig::default();
        lora.base_embeddings
            .insert("zeta".to_string(), "/embeddings/zeta.safetensors".to_string());
        lora.base_embeddings
            .insert("alpha".to_string(), "/embeddings/alpha.safetensors".to_string());
        let yaml = serde_yaml::to_string(&lora).unwrap();
        let alpha = yaml.find("alpha").unwrap();
        let zeta = yaml.find("zeta").unwrap();
        assert!(alpha < zeta);
        let back: LoraTrainingConfig = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(back, lora);
    }
}
