use super::message::AppMessage;
use crate::kernel::panel::FileKey;
use crate::kernel::services::ports::{FileSystemGateway, FsError};
use crate::kernel::{FsOutcome, FsRequest};
use std::io;
use std::sync::mpsc::Sender;
use std::sync::Arc;

pub struct AsyncRuntime {
    runtime: tokio::runtime::Runtime,
    tx: Sender<AppMessage>,
    gateway: Arc<dyn FileSystemGateway>,
}

impl AsyncRuntime {
    pub fn new(tx: Sender<AppMessage>, gateway: Arc<dyn FileSystemGateway>) -> io::Result<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .enable_all()
            .build()
            .or_else(|e| {
                tracing::error!(
                    error = %e,
                    "Failed to create multi-thread tokio runtime, falling back to current-thread"
                );
                tokio::runtime::Builder::new_current_thread()
                    .enable_all()
                    .build()
            })?;
        Ok(Self {
            runtime,
            tx,
            gateway,
        })
    }

    pub fn tokio_handle(&self) -> tokio::runtime::Handle {
        self.runtime.handle().clone()
    }

    pub fn gateway(&self) -> &Arc<dyn FileSystemGateway> {
        &self.gateway
    }

    pub fn load_file(&self, key: FileKey, request_id: u64, path: String) {
        let tx = self.tx.clone();
        let read = self.gateway.file_read_text(&path);
        self.runtime.spawn(async move {
            let result = read.await.map_err(|e| e.to_string());
            if let Err(error) = &result {
                tracing::warn!(%path, %error, "read failed");
            }
            let _ = tx.send(AppMessage::FileLoaded {
                key,
                request_id,
                result,
            });
        });
    }

    pub fn write_file(&self, key: FileKey, version: u64, path: String, text: String) {
        let tx = self.tx.clone();
        let write = self.gateway.file_write_text(&path, text);
        self.runtime.spawn(async move {
            let error = write.await.err().map(|e| e.to_string());
            if let Some(error) = &error {
                tracing::error!(%path, %error, "write failed");
            }
            let _ = tx.send(AppMessage::FileSaved {
                key,
                version,
                error,
            });
        });
    }

    pub fn run_fs(&self, request: FsRequest) {
        let tx = self.tx.clone();
        let gateway = Arc::clone(&self.gateway);
        self.runtime.spawn(async move {
            let outcome = execute_fs(gateway.as_ref(), &request).await;
            tracing::debug!(op = request.op_name(), path = request.subject(), ?outcome, "fs done");
            let _ = tx.send(AppMessage::FsCompleted { request, outcome });
        });
    }
}

/// Runs one request. Create/rename/duplicate/copy/move targets are checked
/// for existence first and report a conflict instead of failing.
pub async fn execute_fs(gateway: &dyn FileSystemGateway, request: &FsRequest) -> FsOutcome {
    if let Some(target) = request.conflict_target() {
        match gateway.entry_exists(&target).await {
            Ok(true) => return FsOutcome::Conflict,
            Ok(false) => {}
            Err(e) => return FsOutcome::Failed(e.to_string()),
        }
    }

    let result = match request {
        FsRequest::CreateFile { path } => gateway.file_create(path).await.map(|_| FsOutcome::Done),
        FsRequest::CreateFolder { path } => {
            gateway.folder_create(path).await.map(|_| FsOutcome::Done)
        }
        FsRequest::Rename { from, to } => {
            gateway.entry_rename(from, to).await.map(|_| FsOutcome::Done)
        }
        FsRequest::Duplicate { from, to } | FsRequest::Copy { from, to } => {
            gateway.entry_copy(from, to).await.map(|_| FsOutcome::Done)
        }
        FsRequest::Delete { path, .. } => gateway.entry_remove(path).await.map(|_| FsOutcome::Done),
        FsRequest::Move { from, to_dir } => gateway
            .entry_move(from, to_dir)
            .await
            .map(|to| FsOutcome::Moved { to }),
        FsRequest::ListFolder { path } => gateway
            .folder_get_content(path)
            .await
            .map(FsOutcome::Listed),
    };

    result.unwrap_or_else(|e| match e {
        FsError::AlreadyExists(_) => FsOutcome::Conflict,
        e => FsOutcome::Failed(e.to_string()),
    })
}

#[cfg(test)]
#[path = "../../../../../tests/unit/kernel/services/adapters/runtime/async_runtime.rs"]
mod tests;
