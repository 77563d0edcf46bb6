use super::settings::Settings;

#[derive(Clone, Debug)]
pub struct WorkbenchConfig {
    pub dirty_marker: String,
    pub read_only_suffix: String,
    pub console_scrollback: usize,
}

impl Default for WorkbenchConfig {
    fn default() -> Self {
        Self {
            dirty_marker: "\u{25cf} ".to_string(),
            read_only_suffix: " [RO]".to_string(),
            console_scrollback: 1000,
        }
    }
}

impl From<&Settings> for WorkbenchConfig {
    fn from(settings: &Settings) -> Self {
        Self {
            dirty_marker: settings.dirty_marker.clone(),
            read_only_suffix: settings.read_only_suffix.clone(),
            console_scrollback: settings.console_scrollback.max(1),
        }
    }
}
