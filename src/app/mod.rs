//! Application layer: hosts the kernel store and executes its effects.

mod workbench;

pub use workbench::{UiSink, Workbench};
