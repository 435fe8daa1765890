use eframe::egui;

use super::lora::LoraForm;
use super::optimizer::OptimizerForm;
use super::preference::PairPreferenceLoaderForm;
use super::run::RunForm;
use super::trainer::TrainerForm;
use super::{FormError, form_grid, optional_string, section_heading, text_field};
use crate::pipelines::SdDpoLoraConfig;

/// Widgets for [`SdDpoLoraConfig`]: the LoRA groups plus the DPO-specific
/// beta and initial-LoRA fields, over a pair-preference loader.
#[derive(Debug, Clone, PartialEq)]
pub struct SdDpoLoraForm {
    pub model: String,
    pub run: RunForm,
    pub trainer: TrainerForm,
    pub optimizer: OptimizerForm,
    pub lora: LoraForm,
    pub initial_lora: String,
    pub beta: f64,
    pub data_loader: PairPreferenceLoaderForm,
}

impl SdDpoLoraForm {
    pub fn from_config(config: &SdDpoLoraConfig) -> Self {
        Self {
            model: config.model.clone(),
            run: RunForm::from_config(&config.run),
            trainer: TrainerForm::from_config(&config.trainer),
            optimizer: OptimizerForm::from_config(&config.trainer.optimizer),
            lora: LoraForm::from_config(&config.lora),
            initial_lora: config.initial_lora.clone().unwrap_or_default(),
            beta: config.beta,
            data_loader: PairPreferenceLoaderForm::from_config(&config.data_loader),
        }
    }

    pub fn set_config(&mut self, config: &SdDpoLoraConfig) {
        *self = Self::from_config(config);
    }

    pub fn apply(&self, config: &SdDpoLoraConfig) -> Result<SdDpoLoraConfig, FormError> {
        let mut next = config.clone();
        next.model = self.model.trim().to_string();
        next.run = self.run.apply(&config.run)?;
        next.trainer = self.trainer.apply(&config.trainer)?;
        next.trainer.optimizer = self.optimizer.apply();
        next.lora = self.lora.apply(&config.lora)?;
        next.initial_lora = optional_string(&self.initial_lora);
        next.beta = self.beta;
        next.data_loader = self.data_loader.apply(&config.data_loader)?;
        Ok(next)
    }

    pub fn ui(&mut self, ui: &mut egui::Ui) {
        section_heading(ui, "Base Model");
        form_grid("sd_dpo_lora_base_model").show(ui, |ui| {
            ui.label("Model");
            text_field(ui, &mut self.model, "runwayml/stable-diffusion-v1-5");
            ui.end_row();
            self.trainer.base_model_ui(ui);
        });

        section_heading(ui, "Training Outputs");
        form_grid("sd_dpo_lora_outputs").show(ui, |ui| {
            self.run.outputs_ui(ui);
            self.trainer.outputs_ui(ui);
        });

        section_heading(ui, "Data");
        form_grid("sd_dpo_lora_data").show(ui, |ui| {
            self.data_loader.ui(ui);
        });

        section_heading(ui, "Optimizer");
        form_grid("sd_dpo_lora_optimizer").show(ui, |ui| {
            self.optimizer.ui(ui);
            self.trainer.lr_schedule_ui(ui);
        });

        section_heading(ui, "Speed / Memory");
        form_grid("sd_dpo_lora_speed_memory").show(ui, |ui| {
            self.trainer.speed_memory_ui(ui);
        });

        section_heading(ui, "Training");
        form_grid("sd_dpo_lora_training").show(ui, |ui| {
            self.run.training_ui(ui);
            self.trainer.training_ui(ui);
            self.lora.ui(ui);

            ui.label("Initial LoRA checkpoint");
            text_field(ui, &mut self.initial_lora, "train from scratch");
            ui.end_row();

            ui.label("DPO beta");
            ui.add(
                egui::DragValue::new(&mut self.beta)
                    .speed(50.0)
                    .range(1.0..=100_000.0),
            );
            ui.end_row();
        });
        self.lora.embeddings_ui(ui);

        section_heading(ui, "Validation");
        form_grid("sd_dpo_lora_validation").show(ui, |ui| {
            self.run.validation_ui(ui);
            self.trainer.validation_ui(ui);
        });
        self.trainer.prompts_ui(ui);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_round_trips_through_the_form() {
        let config = SdDpoLoraConfig::default();
        let form = SdDpoLoraForm::from_config(&config);
        assert_eq!(form.beta, 5000.0);
        assert_eq!(form.initial_lora, "");
        assert_eq!(form.apply(&config).unwrap(), config);
    }

    #[test]
    fn initial_lora_and_beta_are_applied() {
        let config = SdDpoLoraConfig::default();
        let mut form = SdDpoLoraForm::from_config(&config);
        form.initial_lora = "output/sd_lora/checkpoints/epoch-20".to_string();
        form.beta = 2000.0;
        let applied = form.apply(&config).unwrap();
        assert_eq!(
            applied.initial_lora.as_deref(),
            Some("output/sd_lora/checkpoints/epoch-20")
        );
        assert_eq!(applied.beta, 2000.0);
    }
}
