//! Widget-state mirrors of the pipeline configs.
//!
//! Every config field has a matching widget value here, connected by two
//! copy functions per group: `set_config` copies config values into the
//! widgets, `apply` copies widget values onto a clone of the current config.
//! Optional fields are edited through text buffers where an empty buffer
//! means unset, so `apply` is the only place parsing can fail.

use eframe::egui;
use thiserror::Error;

use super::prompts::BadEmbeddingLine;
use super::style;
use crate::pipelines::{PipelineConfig, PipelineKind};

mod data;
mod lora;
mod optimizer;
mod preference;
mod run;
mod sd_dpo_lora;
mod sd_lora;
mod sdxl_finetune;
mod sdxl_lora;
mod trainer;

pub use data::{
    BucketsForm, DataLoaderKind, DatasetKind, DreamboothLoaderForm, ImageCaptionLoaderForm,
    ImageDataLoaderForm, ResolutionForm,
};
pub use lora::LoraForm;
pub use optimizer::{OptimizerForm, OptimizerKind};
pub use preference::{PairPreferenceLoaderForm, PreferenceDatasetKind};
pub use run::{RunForm, ScheduleUnit};
pub use sd_dpo_lora::SdDpoLoraForm;
pub use sd_lora::SdLoraForm;
pub use sdxl_finetune::SdxlFinetuneForm;
pub use sdxl_lora::SdxlLoraForm;
pub use trainer::TrainerForm;

/// A widget value that does not map back onto its config field.
#[derive(Debug, Error)]
pub enum FormError {
    #[error("{field}: '{text}' is not a valid number")]
    InvalidNumber { field: &'static str, text: String },
    #[error("'{text}' is not a valid resolution (expected 'height x width')")]
    InvalidResolution { text: String },
    #[error(transparent)]
    EmbeddingLine(#[from] BadEmbeddingLine),
}

/// Form state for the active pipeline, one variant per pipeline kind.
#[derive(Debug, Clone, PartialEq)]
pub enum PipelineForm {
    SdLora(SdLoraForm),
    SdxlLora(SdxlLoraForm),
    SdxlFinetune(SdxlFinetuneForm),
    SdDpoLora(SdDpoLoraForm),
}

impl PipelineForm {
    pub fn from_config(config: &PipelineConfig) -> Self {
        match config {
            PipelineConfig::SdLora(config) => Self::SdLora(SdLoraForm::from_config(config)),
            PipelineConfig::SdxlLora(config) => Self::SdxlLora(SdxlLoraForm::from_config(config)),
            PipelineConfig::SdxlFinetune(config) => {
                Self::SdxlFinetune(SdxlFinetuneForm::from_config(config))
            }
            PipelineConfig::SdDpoLora(config) => {
                Self::SdDpoLora(SdDpoLoraForm::from_config(config))
            }
        }
    }

    pub fn kind(&self) -> PipelineKind {
        match self {
            Self::SdLora(_) => PipelineKind::SdLora,
            Self::SdxlLora(_) => PipelineKind::SdxlLora,
            Self::SdxlFinetune(_) => PipelineKind::SdxlFinetune,
            Self::SdDpoLora(_) => PipelineKind::SdDpoLora,
        }
    }

    /// Copy config values into the widgets, replacing any pending edits.
    /// A config of a different kind replaces the whole form.
    pub fn set_config(&mut self, config: &PipelineConfig) {
        match (self, config) {
            (Self::SdLora(form), PipelineConfig::SdLora(config)) => form.set_config(config),
            (Self::SdxlLora(form), PipelineConfig::SdxlLora(config)) => form.set_config(config),
            (Self::SdxlFinetune(form), PipelineConfig::SdxlFinetune(config)) => {
                form.set_config(config)
            }
            (Self::SdDpoLora(form), PipelineConfig::SdDpoLora(config)) => form.set_config(config),
            (form, config) => *form = Self::from_config(config),
        }
    }

    /// Copy widget values onto a clone of `config`. Fields without widgets
    /// pass through untouched; a kind mismatch applies onto that kind's
    /// default config instead.
    pub fn apply(&self, config: &PipelineConfig) -> Result<PipelineConfig, FormError> {
        match (self, config) {
            (Self::SdLora(form), PipelineConfig::SdLora(config)) => {
                Ok(PipelineConfig::SdLora(form.apply(config)?))
            }
            (Self::SdxlLora(form), PipelineConfig::SdxlLora(config)) => {
                Ok(PipelineConfig::SdxlLora(form.apply(config)?))
            }
            (Self::SdxlFinetune(form), PipelineConfig::SdxlFinetune(config)) => {
                Ok(PipelineConfig::SdxlFinetune(form.apply(config)?))
            }
            (Self::SdDpoLora(form), PipelineConfig::SdDpoLora(config)) => {
                Ok(PipelineConfig::SdDpoLora(form.apply(config)?))
            }
            (form, _) => form.apply(&form.kind().default_config()),
        }
    }

    pub fn ui(&mut self, ui: &mut egui::Ui) {
        match self {
            Self::SdLora(form) => form.ui(ui),
            Self::SdxlLora(form) => form.ui(ui),
            Self::SdxlFinetune(form) => form.ui(ui),
            Self::SdDpoLora(form) => form.ui(ui),
        }
    }
}

/// Width shared by text fields and full-width combo boxes so the value
/// column lines up.
pub(super) const WIDGET_WIDTH: f32 = 280.0;

/// Width for the narrow unit selectors that sit next to a number.
pub(super) const UNIT_WIDTH: f32 = 96.0;

pub(super) fn section_heading(ui: &mut egui::Ui, label: &str) {
    ui.add_space(10.0);
    ui.label(
        egui::RichText::new(label)
            .strong()
            .color(style::palette().heading),
    );
    ui.add_space(2.0);
}

pub(super) fn form_grid(id: &str) -> egui::Grid {
    egui::Grid::new(id.to_owned())
        .num_columns(2)
        .spacing([24.0, 6.0])
        .min_col_width(170.0)
}

pub(super) fn text_field(ui: &mut egui::Ui, value: &mut String, hint: &str) -> egui::Response {
    ui.add(
        egui::TextEdit::singleline(value)
            .desired_width(WIDGET_WIDTH)
            .hint_text(hint),
    )
}

pub(super) fn enum_combo<T: Copy + PartialEq>(
    ui: &mut egui::Ui,
    id: &str,
    width: f32,
    value: &mut T,
    options: &[T],
    label_of: fn(&T) -> &'static str,
) {
    egui::ComboBox::from_id_salt(id.to_owned())
        .width(width)
        .selected_text(label_of(value))
        .show_ui(ui, |ui| {
            for option in options {
                ui.selectable_value(value, *option, label_of(option));
            }
        });
}

/// Empty (after trimming) means "unset" for optional string fields.
pub(super) fn optional_string(text: &str) -> Option<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// For required string fields that carry a default, an emptied widget falls
/// back to the default instead of writing an empty string to the config.
pub(super) fn text_or(text: &str, fallback: &str) -> String {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        fallback.to_string()
    } else {
        trimmed.to_string()
    }
}

pub(super) fn parse_optional_f64(
    field: &'static str,
    text: &str,
) -> Result<Option<f64>, FormError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    trimmed
        .parse::<f64>()
        .map(Some)
        .map_err(|_| FormError::InvalidNumber {
            field,
            text: trimmed.to_string(),
        })
}

/// Like [`parse_optional_f64`], but `0` also means unset. Used for the
/// fields where the config treats zero as "fall back to the inherited
/// value": the LoRA learning-rate overrides and `max_grad_norm`.
pub(super) fn parse_zero_as_none(
    field: &'static str,
    text: &str,
) -> Result<Option<f64>, FormError> {
    Ok(parse_optional_f64(field, text)?.filter(|value| *value != 0.0))
}

pub(super) fn parse_optional_u32(
    field: &'static str,
    text: &str,
) -> Result<Option<u32>, FormError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    trimmed
        .parse::<u32>()
        .map(Some)
        .map_err(|_| FormError::InvalidNumber {
            field,
            text: trimmed.to_string(),
        })
}

pub(super) fn parse_optional_u64(
    field: &'static str,
    text: &str,
) -> Result<Option<u64>, FormError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    trimmed
        .parse::<u64>()
        .map(Some)
        .map_err(|_| FormError::InvalidNumber {
            field,
            text: trimmed.to_string(),
        })
}

/// Buffer text for an optional numeric field.
pub(super) fn number_buffer<T: ToString>(value: Option<T>) -> String {
    value.map(|value| value.to_string()).unwrap_or_default()
}
