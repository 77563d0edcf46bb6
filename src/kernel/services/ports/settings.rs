use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Directory the device filesystem is mounted on.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device_root: Option<String>,
    pub restore_layout: bool,
    pub watch_device: bool,
    pub console_scrollback: usize,
    pub dirty_marker: String,
    pub read_only_suffix: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            device_root: None,
            restore_layout: true,
            watch_device: true,
            console_scrollback: 1000,
            dirty_marker: "\u{25cf} ".to_string(),
            read_only_suffix: " [RO]".to_string(),
        }
    }
}
