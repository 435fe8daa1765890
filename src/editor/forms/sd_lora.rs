use eframe::egui;

use super::data::ImageDataLoaderForm;
use super::lora::LoraForm;
use super::optimizer::OptimizerForm;
use super::run::RunForm;
use super::trainer::TrainerForm;
use super::{FormError, form_grid, section_heading, text_field};
use crate::pipelines::SdLoraConfig;

/// Widgets for [`SdLoraConfig`], composed from the shared group forms.
#[derive(Debug, Clone, PartialEq)]
pub struct SdLoraForm {
    pub model: String,
    pub run: RunForm,
    pub trainer: TrainerForm,
    pub optimizer: OptimizerForm,
    pub lora: LoraForm,
    pub use_masks: bool,
    pub data_loader: ImageDataLoaderForm,
}

impl SdLoraForm {
    pub fn from_config(config: &SdLoraConfig) -> Self {
        Self {
            model: config.model.clone(),
            run: RunForm::from_config(&config.run),
            trainer: TrainerForm::from_config(&config.trainer),
            optimizer: OptimizerForm::from_config(&config.trainer.optimizer),
            lora: LoraForm::from_config(&config.lora),
            use_masks: config.use_masks,
            data_loader: ImageDataLoaderForm::from_config(&config.data_loader),
        }
    }

    pub fn set_config(&mut self, config: &SdLoraConfig) {
        *self = Self::from_config(config);
    }

    pub fn apply(&self, config: &SdLoraConfig) -> Result<SdLoraConfig, FormError> {
        let mut next = config.clone();
        next.model = self.model.trim().to_string();
        next.run = self.run.apply(&config.run)?;
        next.trainer = self.trainer.apply(&config.trainer)?;
        next.trainer.optimizer = self.optimizer.apply();
        next.lora = self.lora.apply(&config.lora)?;
        next.use_masks = self.use_masks;
        next.data_loader = self.data_loader.apply(&config.data_loader)?;
        Ok(next)
    }

    pub fn ui(&mut self, ui: &mut egui::Ui) {
        section_heading(ui, "Base Model");
        form_grid("sd_lora_base_model").show(ui, |ui| {
            ui.label("Model");
            text_field(ui, &mut self.model, "runwayml/stable-diffusion-v1-5");
            ui.end_row();
            self.trainer.base_model_ui(ui);
        });

        section_heading(ui, "Training Outputs");
        form_grid("sd_lora_outputs").show(ui, |ui| {
            self.run.outputs_ui(ui);
            self.trainer.outputs_ui(ui);
        });

        section_heading(ui, "Data");
        form_grid("sd_lora_data").show(ui, |ui| {
            self.data_loader.ui(ui);
        });

        section_heading(ui, "Optimizer");
        form_grid("sd_lora_optimizer").show(ui, |ui| {
            self.optimizer.ui(ui);
            self.trainer.lr_schedule_ui(ui);
        });

        section_heading(ui, "Speed / Memory");
        form_grid("sd_lora_speed_memory").show(ui, |ui| {
            self.trainer.speed_memory_ui(ui);
        });

        section_heading(ui, "Training");
        form_grid("sd_lora_training").show(ui, |ui| {
            self.run.training_ui(ui);
            self.trainer.training_ui(ui);
            self.lora.ui(ui);
            ui.checkbox(&mut self.use_masks, "Weight loss with dataset masks");
            ui.end_row();
        });
        self.lora.embeddings_ui(ui);

        section_heading(ui, "Validation");
        form_grid("sd_lora_validation").show(ui, |ui| {
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
        let config = SdLoraConfig::default();
        let form = SdLoraForm::from_config(&config);
        assert_eq!(form.apply(&config).unwrap(), config);
    }

    #[test]
    fn model_field_is_trimmed_on_apply() {
        let config = SdLoraConfig::default();
        let mut form = SdLoraForm::from_config(&config);
        form.model = "  ./models/analog-diffusion-1.0.safetensors  ".to_string();
        let applied = form.apply(&config).unwrap();
        assert_eq!(applied.model, "./models/analog-diffusion-1.0.safetensors");
    }

    #[test]
    fn optimizer_edits_land_inside_the_trainer_block() {
        let config = SdLoraConfig::default();
        let mut form = SdLoraForm::from_config(&config);
        form.optimizer.adam.learning_rate = 2e-4;
        let applied = form.apply(&config).unwrap();
        assert_eq!(applied.trainer.optimizer.learning_rate(), 2e-4);
    }
}
