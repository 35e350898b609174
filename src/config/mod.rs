//! Configuration module for tts2sv.
//!
//! Provides `AppConfig` (top-level settings), sub-configs for each stage,
//! `AppPaths` for cross-platform directories, and TOML persistence via
//! `AppConfig::load` / `AppConfig::save`.

pub mod paths;
pub mod settings;

pub use paths::AppPaths;
pub use settings::{
    AppConfig, ExportConfig, ExportFormat, FallbackStrategy, MelodyConfig, PitchConfig,
    TextConfig,
};
