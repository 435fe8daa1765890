//! egui shell around [`EditorState`].
//!
//! Renders the pipeline selector, the active config form, the YAML preview,
//! and the status bar, and routes file dialogs into the state transitions.

use std::path::Path;

use eframe::egui::{self, Frame, Margin, RichText, StrokeKind};
use rfd::FileDialog;
use tracing::warn;

use crate::pipelines::PipelineKind;
use crate::settings;

use super::state::{EditorState, StatusTone};
use super::style;

const APP_VERSION: &str = concat!("v", env!("CARGO_PKG_VERSION"));

/// Renders the editor UI over the shared session state.
pub struct EditorApp {
    state: EditorState,
    visuals_set: bool,
    last_title: Option<String>,
}

impl EditorApp {
    pub fn new(state: EditorState) -> Self {
        Self {
            state,
            visuals_set: false,
            last_title: None,
        }
    }

    fn apply_visuals(&mut self, ctx: &egui::Context) {
        if self.visuals_set {
            return;
        }
        let mut visuals = egui::Visuals::dark();
        style::apply_visuals(&mut visuals);
        ctx.set_visuals(visuals);
        self.visuals_set = true;
    }

    fn sync_title(&mut self, ctx: &egui::Context) {
        let file = self
            .state
            .path()
            .and_then(|path| path.file_name())
            .map(|name| name.to_string_lossy().to_string());
        let mut title = match file {
            Some(file) => format!("LoRA Bench — {file}"),
            None => format!("LoRA Bench — {}", self.state.active_kind().label()),
        };
        if self.state.is_dirty() {
            title.push_str(" *");
        }
        if self.last_title.as_deref() != Some(title.as_str()) {
            ctx.send_viewport_cmd(egui::ViewportCommand::Title(title.clone()));
            self.last_title = Some(title);
        }
    }

    fn handle_shortcuts(&mut self, ctx: &egui::Context) {
        if ctx.input(|i| i.modifiers.command && i.key_pressed(egui::Key::S)) {
            self.save();
        }
        if ctx.input(|i| i.modifiers.command && i.key_pressed(egui::Key::O)) {
            self.open_via_dialog();
        }
    }

    fn render_pipelines_panel(&mut self, ctx: &egui::Context) {
        let palette = style::palette();
        egui::SidePanel::left("pipelines")
            .resizable(false)
            .min_width(230.0)
            .max_width(260.0)
            .show(ctx, |ui| {
                ui.add_space(8.0);
                ui.label(RichText::new("Pipelines").strong().color(palette.heading));
                ui.add_space(6.0);
                for kind in PipelineKind::ALL {
                    let dirty = self.state.slot_for(kind).is_dirty();
                    let mut label = kind.label().to_string();
                    if dirty {
                        label.push_str(" •");
                    }
                    let selected = self.state.active_kind() == kind;
                    if ui.selectable_label(selected, label).clicked() {
                        self.state.set_active(kind);
                    }
                }
                ui.add_space(10.0);
                ui.separator();
                ui.add_space(6.0);
                ui.horizontal(|ui| {
                    if ui.button("New").clicked() {
                        self.state.new_config();
                    }
                    if ui.button("Open…").clicked() {
                        self.open_via_dialog();
                    }
                });
                ui.horizontal(|ui| {
                    if ui.button("Save").clicked() {
                        self.save();
                    }
                    if ui.button("Save As…").clicked() {
                        self.save_as_via_dialog();
                    }
                });
                ui.add_space(6.0);
                let mut show_preview = self.state.settings.show_yaml_preview;
                if ui.checkbox(&mut show_preview, "YAML preview").changed() {
                    self.state.settings.show_yaml_preview = show_preview;
                    self.persist_settings();
                }
                ui.add_space(10.0);
                ui.separator();
                ui.add_space(6.0);
                self.render_recents(ui);
            });
    }

    fn render_recents(&mut self, ui: &mut egui::Ui) {
        let palette = style::palette();
        ui.label(RichText::new("Recent").strong().color(palette.heading));
        ui.add_space(4.0);
        let recents = self.state.settings.recent_files.clone();
        if recents.is_empty() {
            ui.label(RichText::new("Nothing opened yet").color(palette.text_muted));
            return;
        }
        egui::ScrollArea::vertical()
            .id_salt("recents_scroll")
            .show(ui, |ui| {
                for path in &recents {
                    let name = path
                        .file_name()
                        .map(|name| name.to_string_lossy().to_string())
                        .unwrap_or_else(|| path.display().to_string());
                    let response = ui
                        .selectable_label(false, name)
                        .on_hover_text(path.display().to_string());
                    if response.clicked() {
                        self.open_path(path);
                    }
                }
            });
    }

    fn render_preview_panel(&mut self, ctx: &egui::Context) {
        if !self.state.settings.show_yaml_preview {
            return;
        }
        let palette = style::palette();
        egui::SidePanel::right("yaml_preview")
            .resizable(true)
            .default_width(360.0)
            .min_width(280.0)
            .show(ctx, |ui| {
                ui.add_space(8.0);
                ui.horizontal(|ui| {
                    ui.label(
                        RichText::new("YAML preview")
                            .strong()
                            .color(palette.heading),
                    );
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.button("Copy").clicked() {
                            ctx.copy_text(self.state.yaml_preview());
                            self.state
                                .set_status("YAML copied to the clipboard", StatusTone::Info);
                        }
                        let reveal = ui.add_enabled(
                            self.state.path().is_some(),
                            egui::Button::new("Reveal"),
                        );
                        if reveal.clicked() {
                            self.reveal_active_file();
                        }
                    });
                });
                let mut wrap = self.state.settings.wrap_preview;
                if ui.checkbox(&mut wrap, "Wrap lines").changed() {
                    self.state.settings.wrap_preview = wrap;
                    self.persist_settings();
                }
                ui.add_space(4.0);
                let text = self.state.yaml_preview();
                let scroll = if wrap {
                    egui::ScrollArea::vertical()
                } else {
                    egui::ScrollArea::both()
                };
                scroll
                    .id_salt("yaml_scroll")
                    .auto_shrink([false, false])
                    .show(ui, |ui| {
                        let mut preview = text.as_str();
                        let width = if wrap {
                            ui.available_width()
                        } else {
                            f32::INFINITY
                        };
                        ui.add(
                            egui::TextEdit::multiline(&mut preview)
                                .code_editor()
                                .desired_width(width),
                        );
                    });
            });
    }

    fn render_status(&mut self, ctx: &egui::Context) {
        let palette = style::palette();
        egui::TopBottomPanel::bottom("status_bar")
            .frame(
                Frame::new()
                    .fill(palette.bg_primary)
                    .stroke(style::panel_border())
                    .inner_margin(Margin::symmetric(8, 4)),
            )
            .show(ctx, |ui| {
                let status = self.state.status.clone();
                ui.horizontal(|ui| {
                    ui.add_space(6.0);
                    let (badge_rect, _) =
                        ui.allocate_exact_size(egui::vec2(16.0, 16.0), egui::Sense::hover());
                    ui.painter().rect_filled(
                        badge_rect,
                        0.0,
                        style::status_tone_color(status.tone),
                    );
                    ui.painter().rect_stroke(
                        badge_rect,
                        0.0,
                        style::panel_border(),
                        StrokeKind::Inside,
                    );
                    ui.add_space(8.0);
                    ui.label(RichText::new(status.tone.label()).color(palette.text_primary));
                    ui.separator();
                    ui.label(RichText::new(&status.text).color(palette.text_primary));
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        ui.label(RichText::new(APP_VERSION).color(palette.text_muted));
                        ui.add_space(6.0);
                    });
                });
            });
    }

    fn render_form_panel(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            self.render_apply_bar(ui);
            ui.add_space(4.0);
            egui::ScrollArea::vertical()
                .id_salt("form_scroll")
                .auto_shrink([false, false])
                .show(ui, |ui| {
                    self.state.form_mut().ui(ui);
                    ui.add_space(16.0);
                });
        });
    }

    fn render_apply_bar(&mut self, ui: &mut egui::Ui) {
        let palette = style::palette();
        ui.horizontal(|ui| {
            ui.label(
                RichText::new(self.state.active_kind().label())
                    .strong()
                    .color(palette.heading),
            );
            ui.separator();
            let mut file = self
                .state
                .path()
                .and_then(|path| path.file_name())
                .map(|name| name.to_string_lossy().to_string())
                .unwrap_or_else(|| "unsaved".to_string());
            let dirty = self.state.is_dirty();
            if dirty {
                file.push('*');
            }
            let color = if dirty {
                palette.dirty
            } else {
                palette.text_muted
            };
            ui.label(RichText::new(file).color(color));
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui.add_enabled(dirty, egui::Button::new("Apply")).clicked() {
                    self.state.apply();
                }
                if ui.add_enabled(dirty, egui::Button::new("Revert")).clicked() {
                    self.state.revert();
                }
            });
        });
    }

    fn open_via_dialog(&mut self) {
        let mut dialog =
            FileDialog::new().add_filter("Pipeline configs", &["yaml", "yml", "json"]);
        if let Some(dir) = self.state.settings.last_open_dir.clone() {
            dialog = dialog.set_directory(dir);
        }
        let Some(path) = dialog.pick_file() else {
            return;
        };
        self.open_path(&path);
    }

    fn open_path(&mut self, path: &Path) {
        self.state.open(path);
        self.persist_settings();
    }

    fn save(&mut self) {
        if self.state.path().is_some() {
            if self.state.save() {
                self.persist_settings();
            }
        } else {
            self.save_as_via_dialog();
        }
    }

    fn save_as_via_dialog(&mut self) {
        let mut dialog =
            FileDialog::new().add_filter("Pipeline configs", &["yaml", "yml", "json"]);
        if let Some(dir) = self.state.settings.last_open_dir.clone() {
            dialog = dialog.set_directory(dir);
        }
        let suggested = self
            .state
            .path()
            .and_then(|path| path.file_name())
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_else(|| default_file_name(self.state.active_kind()));
        let Some(path) = dialog.set_file_name(suggested).save_file() else {
            return;
        };
        if self.state.save_to(path) {
            self.persist_settings();
        }
    }

    fn reveal_active_file(&mut self) {
        let Some(path) = self.state.path().map(Path::to_path_buf) else {
            return;
        };
        let target = path.parent().map(Path::to_path_buf).unwrap_or(path);
        if let Err(err) = open::that(&target) {
            self.state.set_status(
                format!("Could not open {}: {err}", target.display()),
                StatusTone::Error,
            );
        }
    }

    fn persist_settings(&mut self) {
        if let Err(error) = settings::save(&self.state.settings) {
            warn!("Failed to persist editor settings: {error}");
        }
    }
}

impl eframe::App for EditorApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.apply_visuals(ctx);
        self.sync_title(ctx);
        self.handle_shortcuts(ctx);
        self.render_pipelines_panel(ctx);
        self.render_preview_panel(ctx);
        self.render_status(ctx);
        self.render_form_panel(ctx);
    }
}

fn default_file_name(kind: PipelineKind) -> String {
    let stem = match kind {
        PipelineKind::SdLora => "sd_lora",
        PipelineKind::SdxlLora => "sdxl_lora",
        PipelineKind::SdxlFinetune => "sdxl_finetune",
        PipelineKind::SdDpoLora => "sd_dpo_lora",
    };
    format!("{stem}.yaml")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn suggested_file_names_follow_the_pipeline() {
        assert_eq!(default_file_name(PipelineKind::SdLora), "sd_lora.yaml");
        assert_eq!(
            default_file_name(PipelineKind::SdDpoLora),
            "sd_dpo_lora.yaml"
        );
    }
}
