use serde::{Deserialize, Serialize};

use crate::pipelines::defaults::{default_caption_column, default_false, default_image_column};

/// Where image/caption training pairs come from, discriminated by `type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ImageCaptionDatasetConfig {
    #[serde(rename = "HF_HUB_IMAGE_CAPTION_DATASET")]
    HfHub(HfHubImageCaptionDatasetConfig),
    #[serde(rename = "IMAGE_CAPTION_JSONL_DATASET")]
    Jsonl(ImageCaptionJsonlDatasetConfig),
    #[serde(rename = "IMAGE_CAPTION_DIR_DATASET")]
    Dir(ImageCaptionDirDatasetConfig),
}

impl Default for ImageCaptionDatasetConfig {
    fn default() -> Self {
        Self::Jsonl(ImageCaptionJsonlDatasetConfig::default())
    }
}

/// Image/caption dataset hosted on the Hugging Face Hub.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HfHubImageCaptionDatasetConfig {
    pub dataset_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dataset_config_name: Option<String>,
    /// Override for the Hugging Face datasets cache directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hf_cache_dir: Option<String>,
    #[serde(default = "default_image_column")]
    pub image_column: String,
    #[serde(default = "default_caption_column")]
    pub caption_column: String,
}

impl Default for HfHubImageCaptionDatasetConfig {
    fn default() -> Self {
        Self {
            dataset_name: String::new(),
            dataset_config_name: None,
            hf_cache_dir: None,
            image_column: default_image_column(),
            caption_column: default_caption_column(),
        }
    }
}

/// Image/caption dataset described by a `.jsonl` metadata file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageCaptionJsonlDatasetConfig {
    pub jsonl_path: String,
    #[serde(default = "default_image_column")]
    pub image_column: String,
    #[serde(default = "default_caption_column")]
    pub caption_column: String,
    /// Hold the decoded dataset in memory instead of re-reading from disk.
    #[serde(default = "default_false")]
    pub keep_in_memory: bool,
}

impl Default for ImageCaptionJsonlDatasetConfig {
    fn default() -> Self {
        Self {
            jsonl_path: String::new(),
            image_column: default_image_column(),
            caption_column: default_caption_column(),
            keep_in_memory: false,
        }
    }
}

/// Directory of images with same-name `.txt` caption files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageCaptionDirDatasetConfig {
    pub dataset_dir: String,
    #[serde(default = "default_false")]
    pub keep_in_memory: bool,
}

impl Default for ImageCaptionDirDatasetConfig {
    fn default() -> Self {
        Self {
            dataset_dir: String::new(),
            keep_in_memory: false,
        }
    }
}

/// Plain directory of images without captions, used for dreambooth instance
/// and class data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageDirDatasetConfig {
    pub dataset_dir: String,
    #[serde(default = "default_false")]
    pub keep_in_memory: bool,
}

impl Default for ImageDirDatasetConfig {
    fn default() -> Self {
        Self {
            dataset_dir: String::new(),
            keep_in_memory: false,
        }
    }
}

/// Paired preference data (a preferred and a rejected image per prompt),
/// discriminated by `type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PairPreferenceDatasetConfig {
    /// Hub-hosted pair-preference dataset. Carries no settings of its own.
    #[serde(rename = "HF_HUB_IMAGE_PAIR_PREFERENCE_DATASET")]
    HfHub,
    #[serde(rename = "IMAGE_PAIR_PREFERENCE_DATASET")]
    Dir { dataset_dir: String },
}

impl Default for PairPreferenceDatasetConfig {
    fn default() -> Self {
        Self::Dir {
            dataset_dir: String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dataset_tag_selects_the_source() {
        let dataset: ImageCaptionDatasetConfig = serde_yaml::from_str(
            "type: HF_HUB_IMAGE_CAPTION_DATASET\ndataset_name: lambdalabs/naruto-blip-captions\n",
        )
        .unwrap();
        let ImageCaptionDatasetConfig::HfHub(hub) = &dataset else {
            panic!("expected HfHub, got {dataset:?}");
        };
        assert_eq!(hub.dataset_name, "lambdalabs/naruto-blip-captions");
        assert_eq!(hub.image_column, "image");
        assert_eq!(hub.caption_column, "text");
    }

    #[test]
    fn fieldless_preference_dataset_round_trips_as_tag_only() {
        let yaml = serde_yaml::to_string(&PairPreferenceDatasetConfig::HfHub).unwrap();
        assert_eq!(yaml.trim(), "type: HF_HUB_IMAGE_PAIR_PREFERENCE_DATASET");
        let back: PairPreferenceDatasetConfig = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(back, PairPreferenceDatasetConfig::HfHub);
    }

    #[test]
    fn jsonl_dataset_keeps_its_column_overrides() {
        let yaml = "type: IMAGE_CAPTION_JSONL_DATASET\njsonl_path: data/metadata.jsonl\ncaption_column: prompt\n";
        let dataset: ImageCaptionDatasetConfig = serde_yaml::from_str(yaml).unwrap();
        let ImageCaptionDatasetConfig::Jsonl(jsonl) = &dataset else {
            panic!("expected Jsonl, got {dataset:?}");
        };
        assert_eq!(jsonl.jsonl_path, "data/metadata.jsonl");
        assert_eq!(jsonl.image_column, "image");
        assert_eq!(jsonl.caption_column, "prompt");
        assert!(!jsonl.keep_in_memory);
    }
}
