//! Service ports: traits + data contracts.

pub mod config;
pub mod file;
pub mod serial;
pub mod settings;

pub use config::WorkbenchConfig;
pub use file::{
    DirEntryInfo, FileHandle, FileSystemGateway, FsError, FsFuture, Result as FsResult,
};
pub use serial::SerialPort;
pub use settings::Settings;
