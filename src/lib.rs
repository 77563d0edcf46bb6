//! boardshell - workspace and tab controller for a device-attached editor.
//!
//! Module layout:
//! - kernel: headless state/action/effect core (layout model, editors,
//!   close queue, folder view, console) plus service ports and adapters
//! - app: application layer (Workbench) that executes kernel effects
pub mod app;
pub mod kernel;
