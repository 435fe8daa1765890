use super::trainer::WeightDtype;

pub(super) fn default_true() -> bool {
    true
}

pub(super) fn default_false() -> bool {
    false
}

pub(super) fn default_sd_model() -> String {
    "runwayml/stable-diffusion-v1-5".to_string()
}

pub(super) fn default_sdxl_model() -> String {
    "stabilityai/stable-diffusion-xl-base-1.0".to_string()
}

pub(super) fn default_base_output_dir() -> String {
    "output".to_string()
}

pub(super) fn default_hf_variant() -> Option<String> {
    Some("fp16".to_string())
}

pub(super) fn default_min_snr_gamma() -> Option<f64> {
    Some(5.0)
}

pub(super) fn default_gradient_accumulation_steps() -> u32 {
    1
}

pub(super) fn default_num_validation_images_per_prompt() -> u32 {
    4
}

pub(super) fn default_train_batch_size() -> u32 {
    4
}

pub(super) fn default_save_dtype() -> WeightDtype {
    WeightDtype::Float16
}

pub(super) fn default_lora_rank_dim() -> u32 {
    4
}

pub(super) fn default_beta() -> f64 {
    5_000.0
}

pub(super) fn default_adam_learning_rate() -> f64 {
    1e-3
}

pub(super) fn default_adam_beta1() -> f64 {
    0.9
}

pub(super) fn default_adam_beta2() -> f64 {
    0.999
}

pub(super) fn default_adam_weight_decay() -> f64 {
    1e-2
}

pub(super) fn default_adam_epsilon() -> f64 {
    1e-8
}

pub(super) fn default_prodigy_learning_rate() -> f64 {
    1.0
}

pub(super) fn default_image_column() -> String {
    "image".to_string()
}

pub(super) fn default_caption_column() -> String {
    "text".to_string()
}

pub(super) fn default_class_data_loss_weight() -> f64 {
    1.0
}

pub(super) fn default_divisible_by() -> u32 {
    64
}
