use eframe::egui;

use super::data::ResolutionForm;
use super::{FormError, WIDGET_WIDTH, enum_combo, text_field};
use crate::pipelines::{PairPreferenceDataLoaderConfig, PairPreferenceDatasetConfig};

/// Where the preference pairs come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreferenceDatasetKind {
    HfHub,
    Dir,
}

impl PreferenceDatasetKind {
    pub const ALL: [Self; 2] = [Self::HfHub, Self::Dir];

    pub fn label(&self) -> &'static str {
        match self {
            Self::HfHub => "Hugging Face Hub",
            Self::Dir => "Local directory",
        }
    }
}

/// Widgets for [`PairPreferenceDataLoaderConfig`].
#[derive(Debug, Clone, PartialEq)]
pub struct PairPreferenceLoaderForm {
    pub dataset_kind: PreferenceDatasetKind,
    pub dataset_dir: String,
    pub resolution: ResolutionForm,
    pub center_crop: bool,
    pub random_flip: bool,
    pub dataloader_num_workers: u32,
}

impl PairPreferenceLoaderForm {
    pub fn from_config(config: &PairPreferenceDataLoaderConfig) -> Self {
        let (dataset_kind, dataset_dir) = match &config.dataset {
            PairPreferenceDatasetConfig::HfHub => (PreferenceDatasetKind::HfHub, String::new()),
            PairPreferenceDatasetConfig::Dir { dataset_dir } => {
                (PreferenceDatasetKind::Dir, dataset_dir.clone())
            }
        };
        Self {
            dataset_kind,
            dataset_dir,
            resolution: ResolutionForm::from_config(config.resolution),
            center_crop: config.center_crop,
            random_flip: config.random_flip,
            dataloader_num_workers: config.dataloader_num_workers,
        }
    }

    pub fn set_config(&mut self, config: &PairPreferenceDataLoaderConfig) {
        *self = Self::from_config(config);
    }

    pub fn apply(
        &self,
        config: &PairPreferenceDataLoaderConfig,
    ) -> Result<PairPreferenceDataLoaderConfig, FormError> {
        let mut loader = config.clone();
        loader.dataset = match self.dataset_kind {
            PreferenceDatasetKind::HfHub => PairPreferenceDatasetConfig::HfHub,
            PreferenceDatasetKind::Dir => PairPreferenceDatasetConfig::Dir {
                dataset_dir: self.dataset_dir.trim().to_string(),
            },
        };
        loader.resolution = self.resolution.apply()?;
        loader.center_crop = self.center_crop;
        loader.random_flip = self.random_flip;
        loader.dataloader_num_workers = self.dataloader_num_workers;
        Ok(loader)
    }

    pub(super) fn ui(&mut self, ui: &mut egui::Ui) {
        ui.label("Preference dataset");
        enum_combo(
            ui,
            "preference_dataset_kind",
            WIDGET_WIDTH,
            &mut self.dataset_kind,
            &PreferenceDatasetKind::ALL,
            PreferenceDatasetKind::label,
        );
        ui.end_row();

        if self.dataset_kind == PreferenceDatasetKind::Dir {
            ui.label("Dataset directory");
            text_field(ui, &mut self.dataset_dir, "data/pairs");
            ui.end_row();
        }

        self.resolution.ui(ui);

        ui.checkbox(&mut self.center_crop, "Center crop");
        ui.end_row();

        ui.checkbox(&mut self.random_flip, "Random horizontal flip");
        ui.end_row();

        ui.label("Dataloader workers");
        ui.add(egui::DragValue::new(&mut self.dataloader_num_workers).range(0..=32));
        ui.end_row();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_preference_loader_round_trips() {
        let config = PairPreferenceDataLoaderConfig::default();
        let form = PairPreferenceLoaderForm::from_config(&config);
        assert_eq!(form.dataset_kind, PreferenceDatasetKind::Dir);
        assert_eq!(form.apply(&config).unwrap(), config);
    }

    #[test]
    fn hub_dataset_drops_the_directory() {
        let config = PairPreferenceDataLoaderConfig::default();
        let mut form = PairPreferenceLoaderForm::from_config(&config);
        form.dataset_dir = "data/pairs".to_string();
        form.dataset_kind = PreferenceDatasetKind::HfHub;
        let applied = form.apply(&config).unwrap();
        assert_eq!(applied.dataset, PairPreferenceDatasetConfig::HfHub);
        assert_eq!(form.dataset_dir, "data/pairs");
    }
}
