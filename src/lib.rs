// Library surface for headless/integration tests and reuse.
// Keep this lean to avoid coupling to bin-only types in main.rs.
pub mod app;
pub mod app_dirs;
pub mod celebration;
pub mod color;
pub mod config;
pub mod controller;
pub mod easing;
pub mod error;
pub mod persistence;
pub mod render;
pub mod runtime;
pub mod selection;
pub mod wheel;
