use crate::kernel::panel::FileKey;
use crate::kernel::{Action, FsOutcome, FsRequest};

/// Completion of background work, delivered to the host thread.
#[derive(Debug)]
pub enum AppMessage {
    FileLoaded {
        key: FileKey,
        request_id: u64,
        result: Result<String, String>,
    },
    FileSaved {
        key: FileKey,
        version: u64,
        error: Option<String>,
    },
    FsCompleted {
        request: FsRequest,
        outcome: FsOutcome,
    },
    SerialData(Vec<u8>),
}

impl From<AppMessage> for Action {
    fn from(message: AppMessage) -> Self {
        match message {
            AppMessage::FileLoaded {
                key,
                request_id,
                result,
            } => Action::FileLoaded {
                key,
                request_id,
                result,
            },
            AppMessage::FileSaved {
                key,
                version,
                error,
            } => Action::FileSaved {
                key,
                version,
                error,
            },
            AppMessage::FsCompleted { request, outcome } => {
                Action::FsCompleted { request, outcome }
            }
            AppMessage::SerialData(bytes) => Action::SerialData(bytes),
        }
    }
}
