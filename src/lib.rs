//! Library exports for reuse in integration tests.
/// Application directory helpers.
pub mod app_dirs;
/// Config editor UI, forms, and session state.
pub mod editor;
/// Logging initialization.
pub mod logging;
/// Training pipeline config schemas and file I/O.
pub mod pipelines;
/// Persisted editor preferences.
pub mod settings;
