//! Service adapters: OS/runtime specific implementations (IO/async).

pub mod file;
pub mod file_watcher;
pub mod runtime;
pub mod settings;
pub mod storage;

pub use file::LocalGateway;
pub use file_watcher::{DeviceEvent, DeviceWatcher};
pub use runtime::{execute_fs, AppMessage, AsyncRuntime};
pub use settings::{ensure_settings_file, get_settings_path, load_settings, load_settings_from};
pub use storage::{ensure_log_dir, get_layout_path, get_log_dir, LayoutStorage};
