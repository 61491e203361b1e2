//! Latch Services Layer
//!
//! Host-side services the runtime binary boots from: currently settings.

pub mod settings;

pub use settings::{LogLevel, ScriptingSettings, Settings, SettingsError, SimulationSettings};
