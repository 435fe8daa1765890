//! Data-loading configuration: dataset sources and the loaders over them.

use serde::{Deserialize, Serialize};

use super::defaults::default_divisible_by;

mod dataset;
mod loader;

pub use dataset::{
    HfHubImageCaptionDatasetConfig, ImageCaptionDatasetConfig, ImageCaptionDirDatasetConfig,
    ImageCaptionJsonlDatasetConfig, ImageDirDatasetConfig, PairPreferenceDatasetConfig,
};
pub use loader::{
    DreamboothDataLoaderConfig, ImageCaptionDataLoaderConfig, ImageDataLoaderConfig,
    PairPreferenceDataLoaderConfig,
};

/// Target resolution for input images: either a square edge length or an
/// explicit `[height, width]` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Resolution {
    Square(u32),
    Dims(u32, u32),
}

impl Default for Resolution {
    fn default() -> Self {
        Self::Square(512)
    }
}

impl Resolution {
    pub fn dims(&self) -> (u32, u32) {
        match *self {
            Self::Square(edge) => (edge, edge),
            Self::Dims(height, width) => (height, width),
        }
    }
}

/// Bounds for aspect-ratio bucketing.
///
/// Buckets are generated with dimensions between `start_dim` and `end_dim`,
/// constrained to multiples of `divisible_by`, keeping the pixel count close
/// to `target_resolution` squared.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AspectRatioBucketConfig {
    pub target_resolution: u32,
    pub start_dim: u32,
    pub end_dim: u32,
    #[serde(default = "default_divisible_by")]
    pub divisible_by: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scalar_resolution_parses_as_a_square() {
        let resolution: Resolution = serde_yaml::from_str("512").unwrap();
        assert_eq!(resolution, Resolution::Square(512));
        assert_eq!(resolution.dims(), (512, 512));
    }

    #[test]
    fn two_element_sequence_parses_as_height_and_width() {
        let resolution: Resolution = serde_yaml::from_str("[768, 1024]").unwrap();
        assert_eq!(resolution, Resolution::Dims(768, 1024));
        assert_eq!(resolution.dims(), (768, 1024));
    }

    #[test]
    fn square_resolution_serializes_back_to_a_scalar() {
        let yaml = serde_yaml::to_string(&Resolution::Square(1024)).unwrap();
        assert_eq!(yaml.trim(), "1024");
    }

    #[test]
    fn bucket_divisible_by_defaults_to_64() {
        let buckets: AspectRatioBucketConfig = serde_yaml::from_str(
            "target_resolution: 1024\nstart_dim: 768\nend_dim: 1280\n",
        )
        .unwrap();
        assert_eq!(buckets.divisible_by, 64);
    }
}
