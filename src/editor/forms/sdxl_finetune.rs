use eframe::egui;

use super::data::ImageDataLoaderForm;
use super::optimizer::OptimizerForm;
use super::run::RunForm;
use super::trainer::TrainerForm;
use super::{
    FormError, WIDGET_WIDTH, enum_combo, form_grid, optional_string, section_heading, text_field,
};
use crate::pipelines::{SaveCheckpointFormat, SdxlFinetuneConfig, WeightDtype};

/// Widgets for [`SdxlFinetuneConfig`]. No LoRA group; instead the checkpoint
/// layout and save precision are editable.
#[derive(Debug, Clone, PartialEq)]
pub struct SdxlFinetuneForm {
    pub model: String,
    pub vae_model: String,
    pub save_checkpoint_format: SaveCheckpointFormat,
    pub save_dtype: WeightDtype,
    pub run: RunForm,
    pub trainer: TrainerForm,
    pub optimizer: OptimizerForm,
    pub use_masks: bool,
    pub data_loader: ImageDataLoaderForm,
}

impl SdxlFinetuneForm {
    pub fn from_config(config: &SdxlFinetuneConfig) -> Self {
        Self {
            model: config.model.clone(),
            vae_model: config.vae_model.clone().unwrap_or_default(),
            save_checkpoint_format: config.save_checkpoint_format,
            save_dtype: config.save_dtype,
            run: RunForm::from_config(&config.run),
            trainer: TrainerForm::from_config(&config.trainer),
            optimizer: OptimizerForm::from_config(&config.trainer.optimizer),
            use_masks: config.use_masks,
            data_loader: ImageDataLoaderForm::from_config(&config.data_loader),
        }
    }

    pub fn set_config(&mut self, config: &SdxlFinetuneConfig) {
        *self = Self::from_config(config);
    }

    pub fn apply(&self, config: &SdxlFinetuneConfig) -> Result<SdxlFinetuneConfig, FormError> {
        let mut next = config.clone();
        next.model = self.model.trim().to_string();
        next.vae_model = optional_string(&self.vae_model);
        next.save_checkpoint_format = self.save_checkpoint_format;
        next.save_dtype = self.save_dtype;
        next.run = self.run.apply(&config.run)?;
        next.trainer = self.trainer.apply(&config.trainer)?;
        next.trainer.optimizer = self.optimizer.apply();
        next.use_masks = self.use_masks;
        next.data_loader = self.data_loader.apply(&config.data_loader)?;
        Ok(next)
    }

    pub fn ui(&mut self, ui: &mut egui::Ui) {
        section_heading(ui, "Base Model");
        form_grid("sdxl_finetune_base_model").show(ui, |ui| {
            ui.label("Model");
            text_field(ui, &mut self.model, "stabilityai/stable-diffusion-xl-base-1.0");
            ui.end_row();

            ui.label("VAE override");
            text_field(ui, &mut self.vae_model, "madebyollin/sdxl-vae-fp16-fix");
            ui.end_row();

            self.trainer.base_model_ui(ui);
        });

        section_heading(ui, "Training Outputs");
        form_grid("sdxl_finetune_outputs").show(ui, |ui| {
            self.run.outputs_ui(ui);
            self.trainer.outputs_ui(ui);

            ui.label("Checkpoint layout");
            enum_combo(
                ui,
                "save_checkpoint_format",
                WIDGET_WIDTH,
                &mut self.save_checkpoint_format,
                &SaveCheckpointFormat::ALL,
                SaveCheckpointFormat::label,
            );
            ui.end_row();

            ui.label("Save dtype");
            enum_combo(
                ui,
                "save_dtype",
                WIDGET_WIDTH,
                &mut self.save_dtype,
                &WeightDtype::ALL,
                WeightDtype::label,
            );
            ui.end_row();
        });

        section_heading(ui, "Data");
        form_grid("sdxl_finetune_data").show(ui, |ui| {
            self.data_loader.ui(ui);
        });

        section_heading(ui, "Optimizer");
        form_grid("sdxl_finetune_optimizer").show(ui, |ui| {
            self.optimizer.ui(ui);
            self.trainer.lr_schedule_ui(ui);
        });

        section_heading(ui, "Speed / Memory");
        form_grid("sdxl_finetune_speed_memory").show(ui, |ui| {
            self.trainer.speed_memory_ui(ui);
        });

        section_heading(ui, "Training");
        form_grid("sdxl_finetune_training").show(ui, |ui| {
            self.run.training_ui(ui);
            self.trainer.training_ui(ui);
            ui.checkbox(&mut self.use_masks, "Weight loss with dataset masks");
            ui.end_row();
        });

        section_heading(ui, "Validation");
        form_grid("sdxl_finetune_validation").show(ui, |ui| {
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
        let config = SdxlFinetuneConfig::default();
        let form = SdxlFinetuneForm::from_config(&config);
        assert_eq!(form.save_dtype, WeightDtype::Float16);
        assert_eq!(form.apply(&config).unwrap(), config);
    }

    #[test]
    fn checkpoint_layout_selection_is_applied() {
        let config = SdxlFinetuneConfig::default();
        let mut form = SdxlFinetuneForm::from_config(&config);
        form.save_checkpoint_format = SaveCheckpointFormat::FullDiffusers;
        form.save_dtype = WeightDtype::Bfloat16;
        let applied = form.apply(&config).unwrap();
        assert_eq!(
            applied.save_checkpoint_format,
            SaveCheckpointFormat::FullDiffusers
        );
        assert_eq!(applied.save_dtype, WeightDtype::Bfloat16);
    }
}
