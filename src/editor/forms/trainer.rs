use eframe::egui;

use super::super::prompts::{join_prompts, split_prompts};
use super::{
    FormError, WIDGET_WIDTH, enum_combo, number_buffer, optional_string, parse_optional_f64,
    parse_optional_u32, parse_zero_as_none, text_field,
};
use crate::pipelines::{LrScheduler, MixedPrecision, PredictionType, TrainerConfig, WeightDtype};

/// Widgets for every [`TrainerConfig`] field except `optimizer`, which has
/// its own form. The rows are split across section methods because the
/// on-screen grouping cuts across the config structs.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainerForm {
    pub hf_variant: String,
    pub lr_scheduler: LrScheduler,
    pub lr_warmup_steps: u32,
    pub min_snr_gamma: String,
    pub cache_text_encoder_outputs: bool,
    pub cache_vae_outputs: bool,
    pub enable_cpu_offload_during_validation: bool,
    pub gradient_accumulation_steps: u32,
    pub weight_dtype: WeightDtype,
    pub mixed_precision: MixedPrecision,
    pub xformers: bool,
    pub gradient_checkpointing: bool,
    pub max_checkpoints: String,
    pub prediction_type: Option<PredictionType>,
    pub max_grad_norm: String,
    /// One prompt per line; a negative prompt follows `[NEG]` on the same line.
    pub prompts: String,
    pub num_validation_images_per_prompt: u32,
    pub train_batch_size: u32,
}

impl TrainerForm {
    pub fn from_config(config: &TrainerConfig) -> Self {
        Self {
            hf_variant: config.hf_variant.clone().unwrap_or_default(),
            lr_scheduler: config.lr_scheduler,
            lr_warmup_steps: config.lr_warmup_steps,
            min_snr_gamma: number_buffer(config.min_snr_gamma),
            cache_text_encoder_outputs: config.cache_text_encoder_outputs,
            cache_vae_outputs: config.cache_vae_outputs,
            enable_cpu_offload_during_validation: config.enable_cpu_offload_during_validation,
            gradient_accumulation_steps: config.gradient_accumulation_steps,
            weight_dtype: config.weight_dtype,
            mixed_precision: config.mixed_precision,
            xformers: config.xformers,
            gradient_checkpointing: config.gradient_checkpointing,
            max_checkpoints: number_buffer(config.max_checkpoints),
            prediction_type: config.prediction_type,
            max_grad_norm: number_buffer(config.max_grad_norm),
            prompts: join_prompts(
                &config.validation_prompts,
                config.negative_validation_prompts.as_deref(),
            ),
            num_validation_images_per_prompt: config.num_validation_images_per_prompt,
            train_batch_size: config.train_batch_size,
        }
    }

    pub fn set_config(&mut self, config: &TrainerConfig) {
        *self = Self::from_config(config);
    }

    /// The `optimizer` of `config` passes through untouched; the caller
    /// applies its own optimizer form on top.
    pub fn apply(&self, config: &TrainerConfig) -> Result<TrainerConfig, FormError> {
        let mut trainer = config.clone();
        trainer.hf_variant = optional_string(&self.hf_variant);
        trainer.lr_scheduler = self.lr_scheduler;
        trainer.lr_warmup_steps = self.lr_warmup_steps;
        trainer.min_snr_gamma = parse_optional_f64("min_snr_gamma", &self.min_snr_gamma)?;
        trainer.cache_text_encoder_outputs = self.cache_text_encoder_outputs;
        trainer.cache_vae_outputs = self.cache_vae_outputs;
        trainer.enable_cpu_offload_during_validation = self.enable_cpu_offload_during_validation;
        trainer.gradient_accumulation_steps = self.gradient_accumulation_steps;
        trainer.weight_dtype = self.weight_dtype;
        trainer.mixed_precision = self.mixed_precision;
        trainer.xformers = self.xformers;
        trainer.gradient_checkpointing = self.gradient_checkpointing;
        trainer.max_checkpoints = parse_optional_u32("max_checkpoints", &self.max_checkpoints)?;
        trainer.prediction_type = self.prediction_type;
        trainer.max_grad_norm = parse_zero_as_none("max_grad_norm", &self.max_grad_norm)?;
        let (positive, negative) = split_prompts(&self.prompts);
        trainer.validation_prompts = positive;
        trainer.negative_validation_prompts = negative;
        trainer.num_validation_images_per_prompt = self.num_validation_images_per_prompt;
        trainer.train_batch_size = self.train_batch_size;
        Ok(trainer)
    }

    pub(super) fn base_model_ui(&mut self, ui: &mut egui::Ui) {
        ui.label("Hub variant");
        text_field(ui, &mut self.hf_variant, "none");
        ui.end_row();
    }

    pub(super) fn outputs_ui(&mut self, ui: &mut egui::Ui) {
        ui.label("Keep at most");
        ui.horizontal(|ui| {
            text_field(ui, &mut self.max_checkpoints, "all");
            ui.label("checkpoints");
        });
        ui.end_row();
    }

    pub(super) fn lr_schedule_ui(&mut self, ui: &mut egui::Ui) {
        ui.label("LR scheduler");
        enum_combo(
            ui,
            "lr_scheduler",
            WIDGET_WIDTH,
            &mut self.lr_scheduler,
            &LrScheduler::ALL,
            LrScheduler::label,
        );
        ui.end_row();

        ui.label("Warmup steps");
        ui.add(egui::DragValue::new(&mut self.lr_warmup_steps).range(0..=100_000));
        ui.end_row();
    }

    pub(super) fn speed_memory_ui(&mut self, ui: &mut egui::Ui) {
        ui.label("Gradient accumulation steps");
        ui.add(egui::DragValue::new(&mut self.gradient_accumulation_steps).range(1..=1024));
        ui.end_row();

        ui.label("Weight dtype");
        enum_combo(
            ui,
            "weight_dtype",
            WIDGET_WIDTH,
            &mut self.weight_dtype,
            &WeightDtype::ALL,
            WeightDtype::label,
        );
        ui.end_row();

        ui.label("Mixed precision");
        enum_combo(
            ui,
            "mixed_precision",
            WIDGET_WIDTH,
            &mut self.mixed_precision,
            &MixedPrecision::ALL,
            MixedPrecision::label,
        );
        ui.end_row();

        ui.checkbox(&mut self.cache_text_encoder_outputs, "Cache text encoder outputs");
        ui.end_row();

        ui.checkbox(&mut self.cache_vae_outputs, "Cache VAE outputs");
        ui.end_row();

        ui.checkbox(
            &mut self.enable_cpu_offload_during_validation,
            "Offload to CPU while rendering validation images",
        );
        ui.end_row();

        ui.checkbox(&mut self.xformers, "xFormers attention");
        ui.end_row();

        ui.checkbox(&mut self.gradient_checkpointing, "Gradient checkpointing");
        ui.end_row();
    }

    pub(super) fn training_ui(&mut self, ui: &mut egui::Ui) {
        ui.label("Batch size");
        ui.add(egui::DragValue::new(&mut self.train_batch_size).range(1..=512));
        ui.end_row();

        ui.label("Max gradient norm");
        text_field(ui, &mut self.max_grad_norm, "0 = no clipping");
        ui.end_row();

        ui.label("Prediction type");
        let selected = match self.prediction_type {
            None => "auto",
            Some(prediction_type) => prediction_type.label(),
        };
        egui::ComboBox::from_id_salt("prediction_type")
            .width(WIDGET_WIDTH)
            .selected_text(selected)
            .show_ui(ui, |ui| {
                ui.selectable_value(&mut self.prediction_type, None, "auto");
                for option in PredictionType::ALL {
                    ui.selectable_value(&mut self.prediction_type, Some(option), option.label());
                }
            });
        ui.end_row();

        ui.label("Min-SNR gamma");
        text_field(ui, &mut self.min_snr_gamma, "off");
        ui.end_row();
    }

    pub(super) fn validation_ui(&mut self, ui: &mut egui::Ui) {
        ui.label("Images per prompt");
        ui.add(egui::DragValue::new(&mut self.num_validation_images_per_prompt).range(1..=64));
        ui.end_row();
    }

    pub(super) fn prompts_ui(&mut self, ui: &mut egui::Ui) {
        ui.label("Validation prompts (one per line, negative prompt after [NEG])");
        ui.add(
            egui::TextEdit::multiline(&mut self.prompts)
                .desired_rows(4)
                .desired_width(f32::INFINITY)
                .hint_text("a photo of sks dog in a bucket[NEG]blurry, low quality"),
        );
    }
}
