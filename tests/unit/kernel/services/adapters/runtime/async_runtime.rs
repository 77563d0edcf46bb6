use super::*;
use crate::kernel::services::adapters::file::LocalGateway;
use std::sync::mpsc;
use std::time::Duration;
use tempfile::tempdir;

const WAIT: Duration = Duration::from_secs(5);

fn runtime_for(root: &std::path::Path) -> (AsyncRuntime, mpsc::Receiver<AppMessage>) {
    let (tx, rx) = mpsc::channel();
    let gateway: Arc<dyn FileSystemGateway> = Arc::new(LocalGateway::new(root));
    (AsyncRuntime::new(tx, gateway).unwrap(), rx)
}

#[test]
fn load_and_write_report_back() {
    let dir = tempdir().unwrap();
    std::fs::write(dir.path().join("main.py"), "print(1)\n").unwrap();
    let (runtime, rx) = runtime_for(dir.path());

    runtime.load_file(FileKey::new(1), 7, "/main.py".to_string());
    match rx.recv_timeout(WAIT).unwrap() {
        AppMessage::FileLoaded {
            key,
            request_id,
            result,
        } => {
            assert_eq!(key, FileKey::new(1));
            assert_eq!(request_id, 7);
            assert_eq!(result.unwrap(), "print(1)\n");
        }
        other => panic!("unexpected message: {other:?}"),
    }

    runtime.write_file(FileKey::new(1), 3, "/main.py".to_string(), "x".to_string());
    match rx.recv_timeout(WAIT).unwrap() {
        AppMessage::FileSaved { version, error, .. } => {
            assert_eq!(version, 3);
            assert_eq!(error, None);
        }
        other => panic!("unexpected message: {other:?}"),
    }
    assert_eq!(std::fs::read_to_string(dir.path().join("main.py")).unwrap(), "x");
}

#[test]
fn failed_read_carries_error() {
    let dir = tempdir().unwrap();
    let (runtime, rx) = runtime_for(dir.path());
    runtime.load_file(FileKey::new(2), 1, "/missing.py".to_string());
    match rx.recv_timeout(WAIT).unwrap() {
        AppMessage::FileLoaded { result, .. } => {
            assert!(result.unwrap_err().contains("/missing.py"));
        }
        other => panic!("unexpected message: {other:?}"),
    }
}

#[test]
fn existing_target_is_reported_as_conflict() {
    let dir = tempdir().unwrap();
    std::fs::write(dir.path().join("a.py"), "").unwrap();
    std::fs::write(dir.path().join("b.py"), "").unwrap();
    let gateway = LocalGateway::new(dir.path());
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap();

    let outcome = rt.block_on(execute_fs(
        &gateway,
        &FsRequest::Rename {
            from: "/a.py".to_string(),
            to: "/b.py".to_string(),
        },
    ));
    assert_eq!(outcome, FsOutcome::Conflict);

    let outcome = rt.block_on(execute_fs(
        &gateway,
        &FsRequest::CreateFile {
            path: "/c.py".to_string(),
        },
    ));
    assert_eq!(outcome, FsOutcome::Done);

    let outcome = rt.block_on(execute_fs(
        &gateway,
        &FsRequest::Delete {
            path: "/missing".to_string(),
            is_dir: false,
        },
    ));
    assert!(matches!(outcome, FsOutcome::Failed(msg) if msg.contains("/missing")));
}

#[test]
fn run_fs_lists_folder() {
    let dir = tempdir().unwrap();
    std::fs::create_dir(dir.path().join("lib")).unwrap();
    let (runtime, rx) = runtime_for(dir.path());

    runtime.run_fs(FsRequest::ListFolder {
        path: "/".to_string(),
    });
    match rx.recv_timeout(WAIT).unwrap() {
        AppMessage::FsCompleted {
            outcome: FsOutcome::Listed(entries),
            ..
        } => {
            assert_eq!(entries.len(), 1);
            assert!(entries[0].is_dir);
        }
        other => panic!("unexpected message: {other:?}"),
    }
}
