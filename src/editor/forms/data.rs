use eframe::egui;

use super::{
    FormError, WIDGET_WIDTH, enum_combo, optional_string, text_field, text_or,
};
use crate::pipelines::{
    AspectRatioBucketConfig, DreamboothDataLoaderConfig, HfHubImageCaptionDatasetConfig,
    ImageCaptionDataLoaderConfig, ImageCaptionDatasetConfig, ImageCaptionDirDatasetConfig,
    ImageCaptionJsonlDatasetConfig, ImageDataLoaderConfig, ImageDirDatasetConfig, Resolution,
};

/// Widgets for [`Resolution`]: a square edge plus an optional `height x
/// width` override buffer. A non-empty override wins over the edge.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolutionForm {
    pub edge: u32,
    pub dims: String,
}

impl ResolutionForm {
    pub fn from_config(resolution: Resolution) -> Self {
        match resolution {
            Resolution::Square(edge) => Self {
                edge,
                dims: String::new(),
            },
            Resolution::Dims(height, width) => Self {
                edge: 512,
                dims: format!("{height} x {width}"),
            },
        }
    }

    pub fn apply(&self) -> Result<Resolution, FormError> {
        let text = self.dims.trim();
        if text.is_empty() {
            return Ok(Resolution::Square(self.edge));
        }
        let Some((height, width)) = text.split_once(['x', 'X']) else {
            return Err(FormError::InvalidResolution {
                text: text.to_string(),
            });
        };
        let (Ok(height), Ok(width)) = (height.trim().parse(), width.trim().parse()) else {
            return Err(FormError::InvalidResolution {
                text: text.to_string(),
            });
        };
        Ok(Resolution::Dims(height, width))
    }

    pub(super) fn ui(&mut self, ui: &mut egui::Ui) {
        ui.label("Resolution");
        ui.horizontal(|ui| {
            ui.add(egui::DragValue::new(&mut self.edge).speed(8).range(64..=4096));
            ui.label("px square");
        });
        ui.end_row();

        ui.label("Resolution override");
        text_field(ui, &mut self.dims, "height x width, e.g. 768 x 1024");
        ui.end_row();
    }
}

/// Widgets for the optional [`AspectRatioBucketConfig`]. Values persist
/// while bucketing is toggled off so re-enabling restores them.
#[derive(Debug, Clone, PartialEq)]
pub struct BucketsForm {
    pub enabled: bool,
    pub target_resolution: u32,
    pub start_dim: u32,
    pub end_dim: u32,
    pub divisible_by: u32,
}

impl BucketsForm {
    pub fn from_config(buckets: Option<&AspectRatioBucketConfig>) -> Self {
        match buckets {
            Some(buckets) => Self {
                enabled: true,
                target_resolution: buckets.target_resolution,
                start_dim: buckets.start_dim,
                end_dim: buckets.end_dim,
                divisible_by: buckets.divisible_by,
            },
            None => Self {
                enabled: false,
                target_resolution: 1024,
                start_dim: 768,
                end_dim: 1280,
                divisible_by: 64,
            },
        }
    }

    pub fn apply(&self) -> Option<AspectRatioBucketConfig> {
        self.enabled.then(|| AspectRatioBucketConfig {
            target_resolution: self.target_resolution,
            start_dim: self.start_dim,
            end_dim: self.end_dim,
            divisible_by: self.divisible_by,
        })
    }

    pub(super) fn ui(&mut self, ui: &mut egui::Ui) {
        ui.checkbox(&mut self.enabled, "Aspect-ratio bucketing");
        ui.end_row();
        if !self.enabled {
            return;
        }

        ui.label("Bucket target resolution");
        ui.add(
            egui::DragValue::new(&mut self.target_resolution)
                .speed(8)
                .range(64..=4096),
        );
        ui.end_row();

        ui.label("Bucket dimension range");
        ui.horizontal(|ui| {
            ui.add(egui::DragValue::new(&mut self.start_dim).speed(8).range(64..=4096));
            ui.label("to");
            ui.add(egui::DragValue::new(&mut self.end_dim).speed(8).range(64..=4096));
        });
        ui.end_row();

        ui.label("Dimensions divisible by");
        ui.add(egui::DragValue::new(&mut self.divisible_by).range(1..=512));
        ui.end_row();
    }
}

/// Which image/caption dataset source feeds the loader.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatasetKind {
    HfHub,
    Jsonl,
    Dir,
}

impl DatasetKind {
    pub const ALL: [Self; 3] = [Self::HfHub, Self::Jsonl, Self::Dir];

    pub fn label(&self) -> &'static str {
        match self {
            Self::HfHub => "Hugging Face Hub",
            Self::Jsonl => "JSONL metadata file",
            Self::Dir => "Image directory with .txt captions",
        }
    }
}

/// Widgets for [`ImageCaptionDataLoaderConfig`]. All three dataset sources
/// keep their widget values so switching the source selector is lossless.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageCaptionLoaderForm {
    pub dataset_kind: DatasetKind,
    pub hf_dataset_name: String,
    pub hf_dataset_config_name: String,
    pub hf_cache_dir: String,
    pub hf_image_column: String,
    pub hf_caption_column: String,
    pub jsonl_path: String,
    pub jsonl_image_column: String,
    pub jsonl_caption_column: String,
    pub jsonl_keep_in_memory: bool,
    pub dir_dataset_dir: String,
    pub dir_keep_in_memory: bool,
    pub caption_prefix: String,
    pub resolution: ResolutionForm,
    pub buckets: BucketsForm,
    pub center_crop: bool,
    pub random_flip: bool,
    pub dataloader_num_workers: u32,
}

impl ImageCaptionLoaderForm {
    pub fn from_config(config: &ImageCaptionDataLoaderConfig) -> Self {
        let dataset_kind = match &config.dataset {
            ImageCaptionDatasetConfig::HfHub(_) => DatasetKind::HfHub,
            ImageCaptionDatasetConfig::Jsonl(_) => DatasetKind::Jsonl,
            ImageCaptionDatasetConfig::Dir(_) => DatasetKind::Dir,
        };
        let hf = match &config.dataset {
            ImageCaptionDatasetConfig::HfHub(hf) => hf.clone(),
            _ => HfHubImageCaptionDatasetConfig::default(),
        };
        let jsonl = match &config.dataset {
            ImageCaptionDatasetConfig::Jsonl(jsonl) => jsonl.clone(),
            _ => ImageCaptionJsonlDatasetConfig::default(),
        };
        let dir = match &config.dataset {
            ImageCaptionDatasetConfig::Dir(dir) => dir.clone(),
            _ => ImageCaptionDirDatasetConfig::default(),
        };
        Self {
            dataset_kind,
            hf_dataset_name: hf.dataset_name,
            hf_dataset_config_name: hf.dataset_config_name.unwrap_or_default(),
            hf_cache_dir: hf.hf_cache_dir.unwrap_or_default(),
            hf_image_column: hf.image_column,
            hf_caption_column: hf.caption_column,
            jsonl_path: jsonl.jsonl_path,
            jsonl_image_column: jsonl.image_column,
            jsonl_caption_column: jsonl.caption_column,
            jsonl_keep_in_memory: jsonl.keep_in_memory,
            dir_dataset_dir: dir.dataset_dir,
            dir_keep_in_memory: dir.keep_in_memory,
            caption_prefix: config.caption_prefix.clone().unwrap_or_default(),
            resolution: ResolutionForm::from_config(config.resolution),
            buckets: BucketsForm::from_config(config.aspect_ratio_buckets.as_ref()),
            center_crop: config.center_crop,
            random_flip: config.random_flip,
            dataloader_num_workers: config.dataloader_num_workers,
        }
    }

    pub fn set_config(&mut self, config: &ImageCaptionDataLoaderConfig) {
        *self = Self::from_config(config);
    }

    pub fn apply(
        &self,
        config: &ImageCaptionDataLoaderConfig,
    ) -> Result<ImageCaptionDataLoaderConfig, FormError> {
        let mut loader = config.clone();
        loader.dataset = match self.dataset_kind {
            DatasetKind::HfHub => {
                let base = HfHubImageCaptionDatasetConfig::default();
                ImageCaptionDatasetConfig::HfHub(HfHubImageCaptionDatasetConfig {
                    dataset_name: self.hf_dataset_name.trim().to_string(),
                    dataset_config_name: optional_string(&self.hf_dataset_config_name),
                    hf_cache_dir: optional_string(&self.hf_cache_dir),
                    image_column: text_or(&self.hf_image_column, &base.image_column),
                    caption_column: text_or(&self.hf_caption_column, &base.caption_column),
                })
            }
            DatasetKind::Jsonl => {
                let base = ImageCaptionJsonlDatasetConfig::default();
                ImageCaptionDatasetConfig::Jsonl(ImageCaptionJsonlDatasetConfig {
                    jsonl_path: self.jsonl_path.trim().to_string(),
                    image_column: text_or(&self.jsonl_image_column, &base.image_column),
                    caption_column: text_or(&self.jsonl_caption_column, &base.caption_column),
                    keep_in_memory: self.jsonl_keep_in_memory,
                })
            }
            DatasetKind::Dir => ImageCaptionDatasetConfig::Dir(ImageCaptionDirDatasetConfig {
                dataset_dir: self.dir_dataset_dir.trim().to_string(),
                keep_in_memory: self.dir_keep_in_memory,
            }),
        };
        loader.caption_prefix = optional_string(&self.caption_prefix);
        loader.resolution = self.resolution.apply()?;
        loader.aspect_ratio_buckets = self.buckets.apply();
        loader.center_crop = self.center_crop;
        loader.random_flip = self.random_flip;
        loader.dataloader_num_workers = self.dataloader_num_workers;
        Ok(loader)
    }

    pub(super) fn ui(&mut self, ui: &mut egui::Ui) {
        ui.label("Dataset source");
        enum_combo(
            ui,
            "dataset_kind",
            WIDGET_WIDTH,
            &mut self.dataset_kind,
            &DatasetKind::ALL,
            DatasetKind::label,
        );
        ui.end_row();

        match self.dataset_kind {
            DatasetKind::HfHub => {
                ui.label("Dataset name");
                text_field(ui, &mut self.hf_dataset_name, "user/dataset");
                ui.end_row();

                ui.label("Dataset config name");
                text_field(ui, &mut self.hf_dataset_config_name, "default");
                ui.end_row();

                ui.label("HF cache directory");
                text_field(ui, &mut self.hf_cache_dir, "default cache");
                ui.end_row();

                ui.label("Image column");
                text_field(ui, &mut self.hf_image_column, "image");
                ui.end_row();

                ui.label("Caption column");
                text_field(ui, &mut self.hf_caption_column, "text");
                ui.end_row();
            }
            DatasetKind::Jsonl => {
                ui.label("JSONL path");
                text_field(ui, &mut self.jsonl_path, "data/metadata.jsonl");
                ui.end_row();

                ui.label("Image column");
                text_field(ui, &mut self.jsonl_image_column, "image");
                ui.end_row();

                ui.label("Caption column");
                text_field(ui, &mut self.jsonl_caption_column, "text");
                ui.end_row();

                ui.checkbox(&mut self.jsonl_keep_in_memory, "Keep dataset in memory");
                ui.end_row();
            }
            DatasetKind::Dir => {
                ui.label("Dataset directory");
                text_field(ui, &mut self.dir_dataset_dir, "data/images");
                ui.end_row();

                ui.checkbox(&mut self.dir_keep_in_memory, "Keep dataset in memory");
                ui.end_row();
            }
        }

        ui.label("Caption prefix");
        text_field(ui, &mut self.caption_prefix, "none");
        ui.end_row();

        self.resolution.ui(ui);
        self.buckets.ui(ui);

        ui.checkbox(&mut self.center_crop, "Center crop");
        ui.end_row();

        ui.checkbox(&mut self.random_flip, "Random horizontal flip");
        ui.end_row();

        ui.label("Dataloader workers");
        ui.add(egui::DragValue::new(&mut self.dataloader_num_workers).range(0..=32));
        ui.end_row();
    }
}

/// Widgets for [`DreamboothDataLoaderConfig`]. The class-dataset block is
/// gated behind a checkbox; turning it off clears both class fields on
/// apply while keeping the widget values around.
#[derive(Debug, Clone, PartialEq)]
pub struct DreamboothLoaderForm {
    pub instance_caption: String,
    pub instance_dataset_dir: String,
    pub instance_keep_in_memory: bool,
    pub class_enabled: bool,
    pub class_caption: String,
    pub class_dataset_dir: String,
    pub class_keep_in_memory: bool,
    pub class_data_loss_weight: f64,
    pub resolution: ResolutionForm,
    pub buckets: BucketsForm,
    pub center_crop: bool,
    pub random_flip: bool,
    pub dataloader_num_workers: u32,
}

impl DreamboothLoaderForm {
    pub fn from_config(config: &DreamboothDataLoaderConfig) -> Self {
        let class = config.class_dataset.clone().unwrap_or_default();
        Self {
            instance_caption: config.instance_caption.clone(),
            instance_dataset_dir: config.instance_dataset.dataset_dir.clone(),
            instance_keep_in_memory: config.instance_dataset.keep_in_memory,
            class_enabled: config.class_dataset.is_some(),
            class_caption: config.class_caption.clone().unwrap_or_default(),
            class_dataset_dir: class.dataset_dir,
            class_keep_in_memory: class.keep_in_memory,
            class_data_loss_weight: config.class_data_loss_weight,
            resolution: ResolutionForm::from_config(config.resolution),
            buckets: BucketsForm::from_config(config.aspect_ratio_buckets.as_ref()),
            center_crop: config.center_crop,
            random_flip: config.random_flip,
            dataloader_num_workers: config.dataloader_num_workers,
        }
    }

    pub fn set_config(&mut self, config: &DreamboothDataLoaderConfig) {
        *self = Self::from_config(config);
    }

    pub fn apply(
        &self,
        config: &DreamboothDataLoaderConfig,
    ) -> Result<DreamboothDataLoaderConfig, FormError> {
        let mut loader = config.clone();
        loader.instance_caption = self.instance_caption.trim().to_string();
        loader.instance_dataset = ImageDirDatasetConfig {
            dataset_dir: self.instance_dataset_dir.trim().to_string(),
            keep_in_memory: self.instance_keep_in_memory,
        };
        if self.class_enabled {
            loader.class_caption = optional_string(&self.class_caption);
            loader.class_dataset = Some(ImageDirDatasetConfig {
                dataset_dir: self.class_dataset_dir.trim().to_string(),
                keep_in_memory: self.class_keep_in_memory,
            });
        } else {
            loader.class_caption = None;
            loader.class_dataset = None;
        }
        loader.class_data_loss_weight = self.class_data_loss_weight;
        loader.resolution = self.resolution.apply()?;
        loader.aspect_ratio_buckets = self.buckets.apply();
        loader.center_crop = self.center_crop;
        loader.random_flip = self.random_flip;
        loader.dataloader_num_workers = self.dataloader_num_workers;
        Ok(loader)
    }

    pub(super) fn ui(&mut self, ui: &mut egui::Ui) {
        ui.label("Instance caption");
        text_field(ui, &mut self.instance_caption, "a photo of sks dog");
        ui.end_row();

        ui.label("Instance image directory");
        text_field(ui, &mut self.instance_dataset_dir, "data/instance");
        ui.end_row();

        ui.checkbox(&mut self.instance_keep_in_memory, "Keep instance images in memory");
        ui.end_row();

        ui.checkbox(&mut self.class_enabled, "Regularize with a class dataset");
        ui.end_row();

        if self.class_enabled {
            ui.label("Class caption");
            text_field(ui, &mut self.class_caption, "a photo of a dog");
            ui.end_row();

            ui.label("Class image directory");
            text_field(ui, &mut self.class_dataset_dir, "data/class");
            ui.end_row();

            ui.checkbox(&mut self.class_keep_in_memory, "Keep class images in memory");
            ui.end_row();

            ui.label("Class loss weight");
            ui.add(
                egui::DragValue::new(&mut self.class_data_loss_weight)
                    .speed(0.05)
                    .range(0.0..=10.0)
                    .max_decimals(4),
            );
            ui.end_row();
        }

        self.resolution.ui(ui);
        self.buckets.ui(ui);

        ui.checkbox(&mut self.center_crop, "Center crop");
        ui.end_row();

        ui.checkbox(&mut self.random_flip, "Random horizontal flip");
        ui.end_row();

        ui.label("Dataloader workers");
        ui.add(egui::DragValue::new(&mut self.dataloader_num_workers).range(0..=32));
        ui.end_row();
    }
}

/// Which loader feeds the image/caption pipelines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataLoaderKind {
    ImageCaption,
    Dreambooth,
}

impl DataLoaderKind {
    pub const ALL: [Self; 2] = [Self::ImageCaption, Self::Dreambooth];

    pub fn label(&self) -> &'static str {
        match self {
            Self::ImageCaption => "Captioned images",
            Self::Dreambooth => "Dreambooth",
        }
    }
}

/// Widgets for [`ImageDataLoaderConfig`], keeping both loader variants so
/// the selector is lossless.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageDataLoaderForm {
    pub kind: DataLoaderKind,
    pub image_caption: ImageCaptionLoaderForm,
    pub dreambooth: DreamboothLoaderForm,
}

impl ImageDataLoaderForm {
    pub fn from_config(config: &ImageDataLoaderConfig) -> Self {
        let kind = match config {
            ImageDataLoaderConfig::ImageCaption(_) => DataLoaderKind::ImageCaption,
            ImageDataLoaderConfig::Dreambooth(_) => DataLoaderKind::Dreambooth,
        };
        let image_caption = match config {
            ImageDataLoaderConfig::ImageCaption(loader) => {
                ImageCaptionLoaderForm::from_config(loader)
            }
            _ => ImageCaptionLoaderForm::from_config(&ImageCaptionDataLoaderConfig::default()),
        };
        let dreambooth = match config {
            ImageDataLoaderConfig::Dreambooth(loader) => DreamboothLoaderForm::from_config(loader),
            _ => DreamboothLoaderForm::from_config(&DreamboothDataLoaderConfig::default()),
        };
        Self {
            kind,
            image_caption,
            dreambooth,
        }
    }

    pub fn set_config(&mut self, config: &ImageDataLoaderConfig) {
        *self = Self::from_config(config);
    }

    pub fn apply(&self, config: &ImageDataLoaderConfig) -> Result<ImageDataLoaderConfig, FormError> {
        match self.kind {
            DataLoaderKind::ImageCaption => {
                let base = match config {
                    ImageDataLoaderConfig::ImageCaption(loader) => loader.clone(),
                    _ => ImageCaptionDataLoaderConfig::default(),
                };
                Ok(ImageDataLoaderConfig::ImageCaption(
                    self.image_caption.apply(&base)?,
                ))
            }
            DataLoaderKind::Dreambooth => {
                let base = match config {
                    ImageDataLoaderConfig::Dreambooth(loader) => loader.clone(),
                    _ => DreamboothDataLoaderConfig::default(),
                };
                Ok(ImageDataLoaderConfig::Dreambooth(
                    self.dreambooth.apply(&base)?,
                ))
            }
        }
    }

    pub(super) fn ui(&mut self, ui: &mut egui::Ui) {
        ui.label("Data loader");
        enum_combo(
            ui,
            "data_loader_kind",
            WIDGET_WIDTH,
            &mut self.kind,
            &DataLoaderKind::ALL,
            DataLoaderKind::label,
        );
        ui.end_row();

        match self.kind {
            DataLoaderKind::ImageCaption => self.image_caption.ui(ui),
            DataLoaderKind::Dreambooth => self.dreambooth.ui(ui),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dims_override_wins_over_the_square_edge() {
        let mut form = ResolutionForm::from_config(Resolution::Square(512));
        form.dims = "768 X 1024".to_string();
        assert_eq!(form.apply().unwrap(), Resolution::Dims(768, 1024));
        form.dims.clear();
        assert_eq!(form.apply().unwrap(), Resolution::Square(512));
    }

    #[test]
    fn garbage_resolution_override_is_rejected() {
        let mut form = ResolutionForm::from_config(Resolution::default());
        form.dims = "wide".to_string();
        assert!(matches!(
            form.apply().unwrap_err(),
            FormError::InvalidResolution { .. }
        ));
        form.dims = "768 x tall".to_string();
        assert!(form.apply().is_err());
    }

    #[test]
    fn disabled_buckets_apply_to_none() {
        let buckets = AspectRatioBucketConfig {
            target_resolution: 1024,
            start_dim: 768,
            end_dim: 1280,
            divisible_by: 64,
        };
        let mut form = BucketsForm::from_config(Some(&buckets));
        assert!(form.enabled);
        assert_eq!(form.apply(), Some(buckets));
        form.enabled = false;
        assert_eq!(form.apply(), None);
    }

    #[test]
    fn default_image_caption_loader_round_trips() {
        let config = ImageCaptionDataLoaderConfig::default();
        let form = ImageCaptionLoaderForm::from_config(&config);
        assert_eq!(form.dataset_kind, DatasetKind::Jsonl);
        assert_eq!(form.apply(&config).unwrap(), config);
    }

    #[test]
    fn switching_dataset_source_rebuilds_the_dataset() {
        let config = ImageCaptionDataLoaderConfig::default();
        let mut form = ImageCaptionLoaderForm::from_config(&config);
        form.dataset_kind = DatasetKind::HfHub;
        form.hf_dataset_name = "lambdalabs/naruto-blip-captions".to_string();
        let applied = form.apply(&config).unwrap();
        let ImageCaptionDatasetConfig::HfHub(hub) = &applied.dataset else {
            panic!("expected HfHub, got {:?}", applied.dataset);
        };
        assert_eq!(hub.dataset_name, "lambdalabs/naruto-blip-captions");
        assert_eq!(hub.image_column, "image");
    }

    #[test]
    fn cleared_column_name_falls_back_to_the_default() {
        let config = ImageCaptionDataLoaderConfig::default();
        let mut form = ImageCaptionLoaderForm::from_config(&config);
        form.jsonl_caption_column = "  ".to_string();
        let applied = form.apply(&config).unwrap();
        let ImageCaptionDatasetConfig::Jsonl(jsonl) = applied.dataset else {
            panic!("expected Jsonl");
        };
        assert_eq!(jsonl.caption_column, "text");
    }

    #[test]
    fn disabling_the_class_dataset_clears_both_class_fields() {
        let mut config = DreamboothDataLoaderConfig::default();
        config.class_caption = Some("a photo of a dog".to_string());
        config.class_dataset = Some(ImageDirDatasetConfig {
            dataset_dir: "data/class".to_string(),
            keep_in_memory: false,
        });
        let mut form = DreamboothLoaderForm::from_config(&config);
        assert!(form.class_enabled);
        form.class_enabled = false;
        let applied = form.apply(&config).unwrap();
        assert_eq!(applied.class_caption, None);
        assert_eq!(applied.class_dataset, None);
    }

    #[test]
    fn loader_form_keeps_both_variants_across_switches() {
        let config = ImageDataLoaderConfig::default();
        let mut form = ImageDataLoaderForm::from_config(&config);
        form.dreambooth.instance_caption = "a photo of sks dog".to_string();
        form.kind = DataLoaderKind::Dreambooth;
        let applied = form.apply(&config).unwrap();
        let ImageDataLoaderConfig::Dreambooth(dreambooth) = applied else {
            panic!("expected Dreambooth");
        };
        assert_eq!(dreambooth.instance_caption, "a photo of sks dog");

        form.kind = DataLoaderKind::ImageCaption;
        let back = form.apply(&config).unwrap();
        assert_eq!(back, config);
    }
}
