use eframe::egui;

use super::{
    FormError, UNIT_WIDTH, WIDGET_WIDTH, enum_combo, number_buffer, parse_optional_u64, text_field,
};
use crate::pipelines::{ReportTo, RunConfig};

/// Which side of a steps/epochs pair a cadence is counted in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduleUnit {
    Steps,
    Epochs,
}

impl ScheduleUnit {
    pub const ALL: [Self; 2] = [Self::Steps, Self::Epochs];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Steps => "steps",
            Self::Epochs => "epochs",
        }
    }
}

/// Widgets for [`RunConfig`]. Each steps/epochs pair collapses to one number
/// plus a unit selector; applying sets the selected side and clears the
/// other, so the exactly-one-set rule holds by construction.
#[derive(Debug, Clone, PartialEq)]
pub struct RunForm {
    pub seed: String,
    pub base_output_dir: String,
    pub report_to: ReportTo,
    pub train_length_unit: ScheduleUnit,
    pub train_length: u32,
    pub save_every_unit: ScheduleUnit,
    pub save_every: u32,
    pub validate_every_unit: ScheduleUnit,
    pub validate_every: u32,
}

impl RunForm {
    pub fn from_config(config: &RunConfig) -> Self {
        let (train_length_unit, train_length) =
            schedule_buffer(config.max_train_steps, config.max_train_epochs, 2000);
        let (save_every_unit, save_every) =
            schedule_buffer(config.save_every_n_steps, config.save_every_n_epochs, 1);
        let (validate_every_unit, validate_every) = schedule_buffer(
            config.validate_every_n_steps,
            config.validate_every_n_epochs,
            1,
        );
        Self {
            seed: number_buffer(config.seed),
            base_output_dir: config.base_output_dir.clone(),
            report_to: config.report_to,
            train_length_unit,
            train_length,
            save_every_unit,
            save_every,
            validate_every_unit,
            validate_every,
        }
    }

    pub fn set_config(&mut self, config: &RunConfig) {
        *self = Self::from_config(config);
    }

    pub fn apply(&self, config: &RunConfig) -> Result<RunConfig, FormError> {
        let mut run = config.clone();
        run.seed = parse_optional_u64("seed", &self.seed)?;
        run.base_output_dir = self.base_output_dir.trim().to_string();
        run.report_to = self.report_to;
        (run.max_train_steps, run.max_train_epochs) =
            schedule_sides(self.train_length_unit, self.train_length);
        (run.save_every_n_steps, run.save_every_n_epochs) =
            schedule_sides(self.save_every_unit, self.save_every);
        (run.validate_every_n_steps, run.validate_every_n_epochs) =
            schedule_sides(self.validate_every_unit, self.validate_every);
        Ok(run)
    }

    pub(super) fn outputs_ui(&mut self, ui: &mut egui::Ui) {
        ui.label("Output directory");
        text_field(ui, &mut self.base_output_dir, "output");
        ui.end_row();

        ui.label("Report metrics to");
        enum_combo(
            ui,
            "report_to",
            WIDGET_WIDTH,
            &mut self.report_to,
            &ReportTo::ALL,
            ReportTo::label,
        );
        ui.end_row();

        ui.label("Save a checkpoint every");
        schedule_row(
            ui,
            "save_every_unit",
            &mut self.save_every,
            &mut self.save_every_unit,
        );
        ui.end_row();
    }

    pub(super) fn training_ui(&mut self, ui: &mut egui::Ui) {
        ui.label("Seed");
        text_field(ui, &mut self.seed, "random each run");
        ui.end_row();

        ui.label("Train for");
        schedule_row(
            ui,
            "train_length_unit",
            &mut self.train_length,
            &mut self.train_length_unit,
        );
        ui.end_row();
    }

    pub(super) fn validation_ui(&mut self, ui: &mut egui::Ui) {
        ui.label("Render validation images every");
        schedule_row(
            ui,
            "validate_every_unit",
            &mut self.validate_every,
            &mut self.validate_every_unit,
        );
        ui.end_row();
    }
}

fn schedule_row(ui: &mut egui::Ui, id: &str, value: &mut u32, unit: &mut ScheduleUnit) {
    ui.horizontal(|ui| {
        ui.add(egui::DragValue::new(value).range(1..=1_000_000));
        enum_combo(ui, id, UNIT_WIDTH, unit, &ScheduleUnit::ALL, ScheduleUnit::label);
    });
}

fn schedule_buffer(steps: Option<u32>, epochs: Option<u32>, fallback: u32) -> (ScheduleUnit, u32) {
    match (steps, epochs) {
        (Some(value), _) => (ScheduleUnit::Steps, value),
        (None, Some(value)) => (ScheduleUnit::Epochs, value),
        (None, None) => (ScheduleUnit::Steps, fallback),
    }
}

fn schedule_sides(unit: ScheduleUnit, value: u32) -> (Option<u32>, Option<u32>) {
    match unit {
        ScheduleUnit::Steps => (Some(value), None),
        ScheduleUnit::Epochs => (None, Some(value)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_round_trips_through_the_form() {
        let config = RunConfig::default();
        let form = RunForm::from_config(&config);
        assert_eq!(form.train_length_unit, ScheduleUnit::Steps);
        assert_eq!(form.train_length, 2000);
        assert_eq!(form.save_every_unit, ScheduleUnit::Epochs);
        assert_eq!(form.save_every, 1);
        assert_eq!(form.apply(&config).unwrap(), config);
    }

    #[test]
    fn switching_a_pair_to_epochs_clears_the_steps_side() {
        let config = RunConfig::default();
        let mut form = RunForm::from_config(&config);
        form.train_length_unit = ScheduleUnit::Epochs;
        form.train_length = 30;
        let applied = form.apply(&config).unwrap();
        assert_eq!(applied.max_train_steps, None);
        assert_eq!(applied.max_train_epochs, Some(30));
    }

    #[test]
    fn empty_seed_buffer_means_no_fixed_seed() {
        let mut config = RunConfig::default();
        config.seed = Some(42);
        let mut form = RunForm::from_config(&config);
        assert_eq!(form.seed, "42");
        form.seed.clear();
        assert_eq!(form.apply(&config).unwrap().seed, None);
    }

    #[test]
    fn garbage_seed_buffer_is_rejected() {
        let config = RunConfig::default();
        let mut form = RunForm::from_config(&config);
        form.seed = "not-a-seed".to_string();
        let error = form.apply(&config).unwrap_err();
        assert!(error.to_string().contains("seed"));
    }
}
