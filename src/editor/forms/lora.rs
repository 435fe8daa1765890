use eframe::egui;

use super::super::prompts::{join_embeddings, split_embeddings};
use super::{FormError, WIDGET_WIDTH, enum_combo, number_buffer, parse_zero_as_none, text_field};
use crate::pipelines::{LoraCheckpointFormat, LoraTrainingConfig};

/// Widgets for [`LoraTrainingConfig`]. The learning-rate overrides treat
/// both an empty buffer and `0` as "inherit from the optimizer".
#[derive(Debug, Clone, PartialEq)]
pub struct LoraForm {
    /// One `token = path` line per base embedding.
    pub embeddings: String,
    pub lora_checkpoint_format: LoraCheckpointFormat,
    pub train_unet: bool,
    pub train_text_encoder: bool,
    pub unet_learning_rate: String,
    pub text_encoder_learning_rate: String,
    pub lora_rank_dim: u32,
}

impl LoraForm {
    pub fn from_config(config: &LoraTrainingConfig) -> Self {
        Self {
            embeddings: join_embeddings(&config.base_embeddings),
            lora_checkpoint_format: config.lora_checkpoint_format,
            train_unet: config.train_unet,
            train_text_encoder: config.train_text_encoder,
            unet_learning_rate: number_buffer(config.unet_learning_rate),
            text_encoder_learning_rate: number_buffer(config.text_encoder_learning_rate),
            lora_rank_dim: config.lora_rank_dim,
        }
    }

    pub fn set_config(&mut self, config: &LoraTrainingConfig) {
        *self = Self::from_config(config);
    }

    pub fn apply(&self, config: &LoraTrainingConfig) -> Result<LoraTrainingConfig, FormError> {
        let mut lora = config.clone();
        lora.base_embeddings = split_embeddings(&self.embeddings)?;
        lora.lora_checkpoint_format = self.lora_checkpoint_format;
        lora.train_unet = self.train_unet;
        lora.train_text_encoder = self.train_text_encoder;
        lora.unet_learning_rate =
            parse_zero_as_none("unet_learning_rate", &self.unet_learning_rate)?;
        lora.text_encoder_learning_rate = parse_zero_as_none(
            "text_encoder_learning_rate",
            &self.text_encoder_learning_rate,
        )?;
        lora.lora_rank_dim = self.lora_rank_dim;
        Ok(lora)
    }

    pub(super) fn ui(&mut self, ui: &mut egui::Ui) {
        ui.label("LoRA rank");
        ui.add(egui::DragValue::new(&mut self.lora_rank_dim).range(1..=1024));
        ui.end_row();

        ui.label("Checkpoint format");
        enum_combo(
            ui,
            "lora_checkpoint_format",
            WIDGET_WIDTH,
            &mut self.lora_checkpoint_format,
            &LoraCheckpointFormat::ALL,
            LoraCheckpointFormat::label,
        );
        ui.end_row();

        ui.checkbox(&mut self.train_unet, "Train UNet");
        ui.end_row();

        ui.checkbox(&mut self.train_text_encoder, "Train text encoder");
        ui.end_row();

        ui.label("UNet learning rate");
        text_field(ui, &mut self.unet_learning_rate, "inherit from optimizer");
        ui.end_row();

        ui.label("Text encoder learning rate");
        text_field(
            ui,
            &mut self.text_encoder_learning_rate,
            "inherit from optimizer",
        );
        ui.end_row();
    }

    pub(super) fn embeddings_ui(&mut self, ui: &mut egui::Ui) {
        ui.label("Base embeddings (token = path, one per line)");
        ui.add(
            egui::TextEdit::multiline(&mut self.embeddings)
                .desired_rows(2)
                .desired_width(f32::INFINITY)
                .hint_text("sks_style = /embeddings/sks_style.safetensors"),
        );
    }
}
