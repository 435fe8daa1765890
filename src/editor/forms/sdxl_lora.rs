use eframe::egui;

use super::data::ImageDataLoaderForm;
use super::lora::LoraForm;
use super::optimizer::OptimizerForm;
use super::run::RunForm;
use super::trainer::TrainerForm;
use super::{FormError, form_grid, optional_string, section_heading, text_field};
use crate::pipelines::SdxlLoraConfig;

/// Widgets for [`SdxlLoraConfig`]. Identical to the SD form apart from the
/// VAE override, which SDXL needs for stable fp16 decoding.
#[derive(Debug, Clone, PartialEq)]
pub struct SdxlLoraForm {
    pub model: String,
    pub vae_model: String,
    pub run: RunForm,
    pub trainer: TrainerForm,
    pub optimizer: OptimizerForm,
    pub lora: LoraForm,
    pub use_masks: bool,
    pub data_loader: ImageDataLoaderForm,
}

impl SdxlLoraForm {
    pub fn from_config(config: &SdxlLoraConfig) -> Self {
        Self {
            model: config.model.clone(),
            vae_model: config.vae_model.clone().unwrap_or_default(),
            run: RunForm::from_config(&config.run),
            trainer: TrainerForm::from_config(&config.trainer),
            optimizer: OptimizerForm::from_config(&config.trainer.optimizer),
            lora: LoraForm::from_config(&config.lora),
            use_masks: config.use_masks,
            data_loader: ImageDataLoaderForm::from_config(&config.data_loader),
        }
    }

    pub fn set_config(&mut self, config: &SdxlLoraConfig) {
        *self = Self::from_config(config);
    }

    pub fn apply(&self, config: &SdxlLoraConfig) -> Result<SdxlLoraConfig, FormError> {
        let mut next = config.clone();
        next.model = self.model.trim().to_string();
        next.vae_model = optional_string(&self.vae_model);
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
        form_grid("sdxl_lora_base_model").show(ui, |ui| {
            ui.label("Model");
            text_field(ui, &mut self.model, "stabilityai/stable-diffusion-xl-base-1.0");
            ui.end_row();

            ui.label("VAE override");
            text_field(ui, &mut self.vae_model, "madebyollin/sdxl-vae-fp16-fix");
            ui.end_row();

            self.trainer.base_model_ui(ui);
        });

        section_heading(ui, "Training Outputs");
        form_grid("sdxl_lora_outputs").show(ui, |ui| {
            self.run.outputs_ui(ui);
            self.trainer.outputs_ui(ui);
        });

        section_heading(ui, "Data");
        form_grid("sdxl_lora_data").show(ui, |ui| {
            self.data_loader.ui(ui);
        });

        section_heading(ui, "Optimizer");
        form_grid("sdxl_lora_optimizer").show(ui, |ui| {
            self.optimizer.ui(ui);
            self.trainer.lr_schedule_ui(ui);
        });

        section_heading(ui, "Speed / Memory");
        form_grid("sdxl_lora_speed_memory").show(ui, |ui| {
            self.trainer.speed_memory_ui(ui);
        });

        section_heading(ui, "Training");
        form_grid("sdxl_lora_training").show(ui, |ui| {
            self.run.training_ui(ui);
            self.trainer.training_ui(ui);
            self.lora.ui(ui);
            ui.checkbox(&mut self.use_masks, "Weight loss with dataset masks");
            ui.end_row();
        });
        self.lora.embeddings_ui(ui);

        section_heading(ui, "Validation");
        form_grid("sdxl_lora_validation").show(ui, |ui| {
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
        let config = SdxlLoraConfig::default();
        let form = SdxlLoraForm::from_config(&config);
        assert_eq!(form.vae_model, "");
        assert_eq!(form.apply(&config).unwrap(), config);
    }

    #[test]
    fn cleared_vae_override_becomes_none() {
        let mut config = SdxlLoraConfig::default();
        config.vae_model = Some("madebyollin/sdxl-vae-fp16-fix".to_string());
        let mut form = SdxlLoraForm::from_config(&config);
        assert_eq!(form.vae_model, "madebyollin/sdxl-vae-fp16-fix");
        form.vae_model.clear();
        assert_eq!(form.apply(&config).unwrap().vae_model, None);
    }
}
