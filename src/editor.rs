//! Graphical editor for the training pipeline configs.
//!
//! Every config field is mirrored by a widget-state form; `set_config` copies
//! a config into widget buffers and `apply` copies them back, so the config a
//! user sees is always one that parsed and validated.

pub mod app;
pub mod forms;
pub mod prompts;
pub mod state;
pub mod style;

pub use app::EditorApp;
pub use forms::PipelineForm;
pub use state::{EditorState, StatusTone};
