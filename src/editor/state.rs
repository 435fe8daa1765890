//! Editor session state and its transitions.
//!
//! Everything here is plain data so the open/apply/revert/save flows can be
//! exercised headless; the egui layer only renders this state and calls into
//! it.

use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::pipelines::{self, PipelineConfig, PipelineFileError, PipelineKind};
use crate::settings::EditorSettings;

use super::forms::PipelineForm;

/// Severity of the message shown in the status bar.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StatusTone {
    Idle,
    Info,
    Warning,
    Error,
}

impl StatusTone {
    /// Short badge label shown next to the status text.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Idle => "Idle",
            Self::Info => "Info",
            Self::Warning => "Warning",
            Self::Error => "Error",
        }
    }
}

/// Outcome of the most recent editor action, rendered in the status bar.
#[derive(Clone, Debug)]
pub struct StatusMessage {
    pub tone: StatusTone,
    pub text: String,
}

impl StatusMessage {
    fn idle() -> Self {
        Self {
            tone: StatusTone::Idle,
            text: "Ready".to_string(),
        }
    }
}

/// One pipeline's editing session: the last applied config, the form being
/// edited, and where the config lives on disk.
#[derive(Clone, Debug)]
pub struct PipelineSlot {
    config: PipelineConfig,
    form: PipelineForm,
    snapshot: PipelineForm,
    path: Option<PathBuf>,
}

impl PipelineSlot {
    fn fresh(kind: PipelineKind) -> Self {
        Self::from_config(kind.default_config(), None)
    }

    fn from_config(config: PipelineConfig, path: Option<PathBuf>) -> Self {
        let form = PipelineForm::from_config(&config);
        Self {
            snapshot: form.clone(),
            form,
            config,
            path,
        }
    }

    /// Whether the form has edits that have not been applied yet.
    pub fn is_dirty(&self) -> bool {
        self.form != self.snapshot
    }

    /// The file backing this slot, if it was opened from or saved to one.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}

/// The whole editor session: one slot per pipeline kind plus the persisted
/// preferences and the status bar message.
///
/// Switching pipelines keeps each slot's draft intact, so half-finished edits
/// survive a look at another pipeline.
pub struct EditorState {
    slots: [PipelineSlot; PipelineKind::ALL.len()],
    active: PipelineKind,
    pub settings: EditorSettings,
    pub status: StatusMessage,
}

impl EditorState {
    pub fn new(settings: EditorSettings) -> Self {
        Self {
            slots: PipelineKind::ALL.map(PipelineSlot::fresh),
            active: PipelineKind::SdLora,
            settings,
            status: StatusMessage::idle(),
        }
    }

    pub fn active_kind(&self) -> PipelineKind {
        self.active
    }

    pub fn set_active(&mut self, kind: PipelineKind) {
        self.active = kind;
    }

    /// Slot lookup for chrome that shows per-pipeline markers.
    pub fn slot_for(&self, kind: PipelineKind) -> &PipelineSlot {
        &self.slots[kind as usize]
    }

    /// The last applied config of the active pipeline.
    pub fn config(&self) -> &PipelineConfig {
        &self.slot().config
    }

    /// The active pipeline's form, for rendering and tests.
    pub fn form_mut(&mut self) -> &mut PipelineForm {
        &mut self.slot_mut().form
    }

    pub fn path(&self) -> Option<&Path> {
        self.slot().path.as_deref()
    }

    pub fn is_dirty(&self) -> bool {
        self.slot().is_dirty()
    }

    /// The active config rendered as YAML, as `save` would write it.
    pub fn yaml_preview(&self) -> String {
        pipelines::to_yaml(self.config()).unwrap_or_else(|error| format!("# {error}"))
    }

    pub fn set_status(&mut self, text: impl Into<String>, tone: StatusTone) {
        self.status = StatusMessage {
            tone,
            text: text.into(),
        };
    }

    /// Copy the form into the config, if it parses and validates.
    ///
    /// On failure the config keeps its previous value, the form keeps the
    /// offending edits, and the error lands in the status bar.
    pub fn apply(&mut self) -> bool {
        let slot = self.slot();
        let candidate = match slot.form.apply(&slot.config) {
            Ok(config) => config,
            Err(error) => {
                warn!("Apply rejected: {error}");
                self.set_status(error.to_string(), StatusTone::Error);
                return false;
            }
        };
        if let Err(error) = candidate.validate() {
            warn!("Apply rejected: {error}");
            self.set_status(error.to_string(), StatusTone::Error);
            return false;
        }
        let slot = self.slot_mut();
        slot.config = candidate;
        slot.snapshot = slot.form.clone();
        self.set_status("Changes applied", StatusTone::Info);
        true
    }

    /// Throw away pending edits and reload the form from the applied config.
    pub fn revert(&mut self) {
        let slot = self.slot_mut();
        slot.form.set_config(&slot.config);
        slot.snapshot = slot.form.clone();
        self.set_status("Form reset to the applied config", StatusTone::Info);
    }

    /// Replace the active slot with pristine defaults for its kind.
    pub fn new_config(&mut self) {
        let kind = self.active;
        self.slots[kind as usize] = PipelineSlot::fresh(kind);
        info!("New {} config", kind.label());
        self.set_status(format!("New {} config", kind.label()), StatusTone::Info);
    }

    /// Load a config file, switch to its pipeline, and record it as recent.
    ///
    /// A file that no longer exists also falls out of the recents list.
    pub fn open(&mut self, path: &Path) -> bool {
        match pipelines::load(path) {
            Ok(config) => {
                let kind = config.kind();
                self.slots[kind as usize] =
                    PipelineSlot::from_config(config, Some(path.to_path_buf()));
                self.active = kind;
                self.settings.push_recent(path);
                self.settings.note_open_dir(path);
                info!("Opened {:?}", path);
                self.set_status(format!("Opened {}", path.display()), StatusTone::Info);
                true
            }
            Err(error) => {
                warn!("Failed to open {:?}: {error}", path);
                if matches!(error, PipelineFileError::Read { .. }) {
                    self.settings.remove_recent(path);
                }
                self.set_status(error.to_string(), StatusTone::Error);
                false
            }
        }
    }

    /// Apply pending edits, then write the active config to its file.
    ///
    /// Returns `false` when the slot has no file yet; the caller should fall
    /// back to a save-as dialog.
    pub fn save(&mut self) -> bool {
        let Some(path) = self.slot().path.clone() else {
            self.set_status("No file yet, use Save As", StatusTone::Warning);
            return false;
        };
        self.save_to(path)
    }

    /// Apply pending edits, then write the active config to `path` and adopt
    /// it as the slot's file.
    pub fn save_to(&mut self, path: PathBuf) -> bool {
        if !self.apply() {
            return false;
        }
        if let Err(error) = pipelines::save(self.config(), &path) {
            warn!("Failed to save {:?}: {error}", path);
            self.set_status(error.to_string(), StatusTone::Error);
            return false;
        }
        self.slot_mut().path = Some(path.clone());
        self.settings.push_recent(&path);
        self.settings.note_open_dir(&path);
        info!("Saved {:?}", path);
        self.set_status(format!("Saved {}", path.display()), StatusTone::Info);
        true
    }

    fn slot(&self) -> &PipelineSlot {
        &self.slots[self.active as usize]
    }

    fn slot_mut(&mut self) -> &mut PipelineSlot {
        &mut self.slots[self.active as usize]
    }
}
