use serde::{Deserialize, Serialize};

use super::defaults::{
    default_adam_beta1, default_adam_beta2, default_adam_epsilon, default_adam_learning_rate,
    default_adam_weight_decay, default_false, default_prodigy_learning_rate,
};

/// Optimizer selection, discriminated by `optimizer_type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "optimizer_type")]
pub enum OptimizerConfig {
    AdamW(AdamOptimizerConfig),
    Prodigy(ProdigyOptimizerConfig),
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self::AdamW(AdamOptimizerConfig::default())
    }
}

impl OptimizerConfig {
    pub fn learning_rate(&self) -> f64 {
        match self {
            Self::AdamW(adam) => adam.learning_rate,
            Self::Prodigy(prodigy) => prodigy.learning_rate,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::AdamW(_) => "AdamW",
            Self::Prodigy(_) => "Prodigy",
        }
    }
}

/// AdamW optimizer parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdamOptimizerConfig {
    #[serde(default = "default_adam_learning_rate")]
    pub learning_rate: f64,
    #[serde(default = "default_adam_beta1")]
    pub beta1: f64,
    #[serde(default = "default_adam_beta2")]
    pub beta2: f64,
    #[serde(default = "default_adam_weight_decay")]
    pub weight_decay: f64,
    #[serde(default = "default_adam_epsilon")]
    pub epsilon: f64,
}

impl Default for AdamOptimizerConfig {
    fn default() -> Self {
        Self {
            learning_rate: default_adam_learning_rate(),
            beta1: default_adam_beta1(),
            beta2: default_adam_beta2(),
            weight_decay: default_adam_weight_decay(),
            epsilon: default_adam_epsilon(),
        }
    }
}

/// Prodigy optimizer parameters.
///
/// Prodigy estimates its own step size, so `learning_rate` acts as a
/// multiplier and is normally left at 1.0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProdigyOptimizerConfig {
    #[serde(default = "default_prodigy_learning_rate")]
    pub learning_rate: f64,
    #[serde(default)]
    pub weight_decay: f64,
    #[serde(default = "default_false")]
    pub use_bias_correction: bool,
    #[serde(default = "default_false")]
    pub safeguard_warmup: bool,
}

impl Default for ProdigyOptimizerConfig {
    fn default() -> Self {
        Self {
            learning_rate: default_prodigy_learning_rate(),
            weight_decay: 0.0,
            use_bias_correction: false,
            safeguard_warmup: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn optimizer_tag_selects_the_variant() {
        let optimizer: OptimizerConfig = serde_yaml::from_str(
            "optimizer_type: Prodigy\nuse_bias_correction: true\n",
        )
        .unwrap();
        let OptimizerConfig::Prodigy(prodigy) = &optimizer else {
            panic!("expected Prodigy, got {optimizer:?}");
        };
        assert_eq!(prodigy.learning_rate, 1.0);
        assert!(prodigy.use_bias_correction);
        assert!(!prodigy.safeguard_warmup);
    }

    #[test]
    fn adam_round_trips_with_its_tag() {
        let optimizer = OptimizerConfig::AdamW(AdamOptimizerConfig {
            learning_rate: 5e-4,
            ..AdamOptimizerConfig::default()
        });
        let yaml = serde_yaml::to_string(&optimizer).unwrap();
        assert!(yaml.contains("optimizer_type: AdamW"));
        let back: OptimizerConfig = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(back, optimizer);
    }

    #[test]
    fn unknown_optimizer_tag_is_rejected() {
        let result: Result<OptimizerConfig, _> = serde_yaml::from_str("optimizer_type: Lion\n");
        assert!(result.is_err());
    }
}
