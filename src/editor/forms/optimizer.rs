use eframe::egui;

use super::{WIDGET_WIDTH, enum_combo};
use crate::pipelines::{AdamOptimizerConfig, OptimizerConfig, ProdigyOptimizerConfig};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptimizerKind {
    AdamW,
    Prodigy,
}

impl OptimizerKind {
    pub const ALL: [Self; 2] = [Self::AdamW, Self::Prodigy];

    pub fn label(&self) -> &'static str {
        match self {
            Self::AdamW => "AdamW",
            Self::Prodigy => "Prodigy",
        }
    }
}

/// Widgets for [`OptimizerConfig`]. Both variants' parameters are kept so
/// switching the kind back and forth does not lose edits; only the selected
/// side is rendered and applied.
#[derive(Debug, Clone, PartialEq)]
pub struct OptimizerForm {
    pub kind: OptimizerKind,
    pub adam: AdamOptimizerConfig,
    pub prodigy: ProdigyOptimizerConfig,
}

impl OptimizerForm {
    pub fn from_config(config: &OptimizerConfig) -> Self {
        let kind = match config {
            OptimizerConfig::AdamW(_) => OptimizerKind::AdamW,
            OptimizerConfig::Prodigy(_) => OptimizerKind::Prodigy,
        };
        let adam = match config {
            OptimizerConfig::AdamW(adam) => adam.clone(),
            _ => AdamOptimizerConfig::default(),
        };
        let prodigy = match config {
            OptimizerConfig::Prodigy(prodigy) => prodigy.clone(),
            _ => ProdigyOptimizerConfig::default(),
        };
        Self { kind, adam, prodigy }
    }

    pub fn set_config(&mut self, config: &OptimizerConfig) {
        *self = Self::from_config(config);
    }

    /// All optimizer parameters live in native widgets, so this cannot fail.
    pub fn apply(&self) -> OptimizerConfig {
        match self.kind {
            OptimizerKind::AdamW => OptimizerConfig::AdamW(self.adam.clone()),
            OptimizerKind::Prodigy => OptimizerConfig::Prodigy(self.prodigy.clone()),
        }
    }

    pub(super) fn ui(&mut self, ui: &mut egui::Ui) {
        ui.label("Optimizer");
        enum_combo(
            ui,
            "optimizer_kind",
            WIDGET_WIDTH,
            &mut self.kind,
            &OptimizerKind::ALL,
            OptimizerKind::label,
        );
        ui.end_row();

        match self.kind {
            OptimizerKind::AdamW => self.adam_ui(ui),
            OptimizerKind::Prodigy => self.prodigy_ui(ui),
        }
    }

    fn adam_ui(&mut self, ui: &mut egui::Ui) {
        ui.label("Learning rate");
        ui.add(
            egui::DragValue::new(&mut self.adam.learning_rate)
                .speed(1e-5)
                .range(0.0..=1.0)
                .max_decimals(10),
        );
        ui.end_row();

        ui.label("Beta 1");
        ui.add(
            egui::DragValue::new(&mut self.adam.beta1)
                .speed(0.001)
                .range(0.0..=1.0)
                .max_decimals(6),
        );
        ui.end_row();

        ui.label("Beta 2");
        ui.add(
            egui::DragValue::new(&mut self.adam.beta2)
                .speed(0.001)
                .range(0.0..=1.0)
                .max_decimals(6),
        );
        ui.end_row();

        ui.label("Weight decay");
        ui.add(
            egui::DragValue::new(&mut self.adam.weight_decay)
                .speed(0.001)
                .range(0.0..=1.0)
                .max_decimals(6),
        );
        ui.end_row();

        ui.label("Epsilon");
        ui.add(
            egui::DragValue::new(&mut self.adam.epsilon)
                .speed(1e-9)
                .range(0.0..=1.0)
                .max_decimals(12),
        );
        ui.end_row();
    }

    fn prodigy_ui(&mut self, ui: &mut egui::Ui) {
        ui.label("Learning rate multiplier");
        ui.add(
            egui::DragValue::new(&mut self.prodigy.learning_rate)
                .speed(0.01)
                .range(0.0..=10.0)
                .max_decimals(6),
        );
        ui.end_row();

        ui.label("Weight decay");
        ui.add(
            egui::DragValue::new(&mut self.prodigy.weight_decay)
                .speed(0.001)
                .range(0.0..=1.0)
                .max_decimals(6),
        );
        ui.end_row();

        ui.checkbox(&mut self.prodigy.use_bias_correction, "Bias correction");
        ui.end_row();

        ui.checkbox(&mut self.prodigy.safeguard_warmup, "Safeguard warmup");
        ui.end_row();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_optimizer_round_trips_through_the_form() {
        let config = OptimizerConfig::default();
        let form = OptimizerForm::from_config(&config);
        assert_eq!(form.kind, OptimizerKind::AdamW);
        assert_eq!(form.apply(), config);
    }

    #[test]
    fn switching_kind_keeps_the_other_sides_edits() {
        let config = OptimizerConfig::AdamW(AdamOptimizerConfig {
            learning_rate: 5e-4,
            ..AdamOptimizerConfig::default()
        });
        let mut form = OptimizerForm::from_config(&config);
        form.kind = OptimizerKind::Prodigy;
        let OptimizerConfig::Prodigy(prodigy) = form.apply() else {
            panic!("expected Prodigy");
        };
        assert_eq!(prodigy, ProdigyOptimizerConfig::default());

        form.kind = OptimizerKind::AdamW;
        let OptimizerConfig::AdamW(adam) = form.apply() else {
            panic!("expected AdamW");
        };
        assert_eq!(adam.learning_rate, 5e-4);
    }

    #[test]
    fn unselected_side_starts_from_its_defaults() {
        let config = OptimizerConfig::Prodigy(ProdigyOptimizerConfig {
            safeguard_warmup: true,
            ..ProdigyOptimizerConfig::default()
        });
        let form = OptimizerForm::from_config(&config);
        assert_eq!(form.kind, OptimizerKind::Prodigy);
        assert!(form.prodigy.safeguard_warmup);
        assert_eq!(form.adam, AdamOptimizerConfig::default());
    }
}
