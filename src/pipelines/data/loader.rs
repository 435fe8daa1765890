use serde::{Deserialize, Serialize};

use super::dataset::{ImageCaptionDatasetConfig, ImageDirDatasetConfig, PairPreferenceDatasetConfig};
use super::{AspectRatioBucketConfig, Resolution};
use crate::pipelines::defaults::{default_class_data_loss_weight, default_false, default_true};

/// Data loader for the image/caption pipelines, discriminated by `type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ImageDataLoaderConfig {
    #[serde(rename = "IMAGE_CAPTION_SD_DATA_LOADER")]
    ImageCaption(ImageCaptionDataLoaderConfig),
    #[serde(rename = "DREAMBOOTH_SD_DATA_LOADER")]
    Dreambooth(DreamboothDataLoaderConfig),
}

impl Default for ImageDataLoaderConfig {
    fn default() -> Self {
        Self::ImageCaption(ImageCaptionDataLoaderConfig::default())
    }
}

/// Loader over a captioned image dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageCaptionDataLoaderConfig {
    pub dataset: ImageCaptionDatasetConfig,
    /// Fixed prefix prepended to every caption, e.g. a trigger phrase.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caption_prefix: Option<String>,
    #[serde(default)]
    pub resolution: Resolution,
    /// When set, images are grouped into aspect-ratio buckets instead of all
    /// being resized to `resolution`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aspect_ratio_buckets: Option<AspectRatioBucketConfig>,
    /// Center-crop to the target resolution; off means random crops.
    #[serde(default = "default_true")]
    pub center_crop: bool,
    #[serde(default = "default_false")]
    pub random_flip: bool,
    /// Data-loading worker processes. 0 loads in the main process.
    #[serde(default)]
    pub dataloader_num_workers: u32,
}

impl Default for ImageCaptionDataLoaderConfig {
    fn default() -> Self {
        Self {
            dataset: ImageCaptionDatasetConfig::default(),
            caption_prefix: None,
            resolution: Resolution::default(),
            aspect_ratio_buckets: None,
            center_crop: true,
            random_flip: false,
            dataloader_num_workers: 0,
        }
    }
}

/// Loader pairing a dreambooth instance dataset with an optional
/// regularization class dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DreamboothDataLoaderConfig {
    /// Caption applied to every instance image.
    pub instance_caption: String,
    /// Caption applied to every class image. Required when `class_dataset`
    /// is set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class_caption: Option<String>,
    pub instance_dataset: ImageDirDatasetConfig,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class_dataset: Option<ImageDirDatasetConfig>,
    /// Weight of the class-image loss relative to the instance-image loss.
    #[serde(default = "default_class_data_loss_weight")]
    pub class_data_loss_weight: f64,
    #[serde(default)]
    pub resolution: Resolution,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aspect_ratio_buckets: Option<AspectRatioBucketConfig>,
    #[serde(default = "default_true")]
    pub center_crop: bool,
    #[serde(default = "default_false")]
    pub random_flip: bool,
    #[serde(default)]
    pub dataloader_num_workers: u32,
}

impl Default for DreamboothDataLoaderConfig {
    fn default() -> Self {
        Self {
            instance_caption: String::new(),
            class_caption: None,
            instance_dataset: ImageDirDatasetConfig::default(),
            class_dataset: None,
            class_data_loss_weight: default_class_data_loss_weight(),
            resolution: Resolution::default(),
            aspect_ratio_buckets: None,
            center_crop: true,
            random_flip: false,
            dataloader_num_workers: 0,
        }
    }
}

/// Loader over paired preference data. There is only one loader for the
/// preference pipelines, but the wire format still carries a `type` tag to
/// match the other loaders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairPreferenceDataLoaderConfig {
    #[serde(rename = "type", default)]
    tag: PairPreferenceLoaderTag,
    pub dataset: PairPreferenceDatasetConfig,
    #[serde(default)]
    pub resolution: Resolution,
    #[serde(default = "default_true")]
    pub center_crop: bool,
    #[serde(default = "default_false")]
    pub random_flip: bool,
    #[serde(default)]
    pub dataloader_num_workers: u32,
}

impl Default for PairPreferenceDataLoaderConfig {
    fn default() -> Self {
        Self {
            tag: PairPreferenceLoaderTag::default(),
            dataset: PairPreferenceDatasetConfig::default(),
            resolution: Resolution::default(),
            center_crop: true,
            random_flip: false,
            dataloader_num_workers: 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
enum PairPreferenceLoaderTag {
    #[serde(rename = "IMAGE_PAIR_PREFERENCE_SD_DATA_LOADER")]
    ImagePairPreferenceSdDataLoader,
}

impl Default for PairPreferenceLoaderTag {
    fn default() -> Self {
        Self::ImagePairPreferenceSdDataLoader
    }
}
