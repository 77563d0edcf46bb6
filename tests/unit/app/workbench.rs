use super::*;
use crate::kernel::services::adapters::LocalGateway;
use crate::kernel::services::ports::{FileHandle, FileSystemGateway};
use crate::kernel::{CloseDecision, OpenOptions, PanelKind, WorkspaceState};
use std::path::Path;
use std::sync::{Arc, Mutex};
use tempfile::tempdir;

const WAIT: Duration = Duration::from_secs(5);

#[derive(Default)]
struct RecordingSink {
    effects: Vec<Effect>,
}

impl UiSink for RecordingSink {
    fn present(&mut self, effect: &Effect) {
        self.effects.push(effect.clone());
    }
}

#[derive(Clone, Default)]
struct RecordingPort {
    written: Arc<Mutex<Vec<String>>>,
}

impl SerialPort for RecordingPort {
    fn write_text(&mut self, text: &str) -> std::io::Result<()> {
        self.written.lock().unwrap().push(text.to_string());
        Ok(())
    }
}

fn workbench_for(root: &Path) -> Workbench<RecordingSink> {
    let (tx, rx) = mpsc::channel();
    let gateway: Arc<dyn FileSystemGateway> = Arc::new(LocalGateway::new(root));
    let runtime = AsyncRuntime::new(tx.clone(), gateway).unwrap();
    Workbench::new(
        Store::new(WorkspaceState::default()),
        runtime,
        (tx, rx),
        RecordingSink::default(),
    )
}

fn open(workbench: &mut Workbench<RecordingSink>, path: &str) -> crate::kernel::NodeId {
    workbench.dispatch(Action::OpenFile {
        handle: FileHandle::new(path),
        options: OpenOptions::default(),
    });
    assert!(workbench.wait_message(WAIT));
    workbench
        .store()
        .state()
        .layout
        .find_nodes_by_kind(PanelKind::Editor)
        .first()
        .map(|n| n.id)
        .unwrap()
}

#[test]
fn open_edit_and_save_on_close() {
    let dir = tempdir().unwrap();
    std::fs::write(dir.path().join("main.py"), "print(1)\n").unwrap();
    let mut workbench = workbench_for(dir.path());

    let node = open(&mut workbench, "/main.py");
    let editor = &workbench.store().state().editors[&node];
    assert_eq!(editor.text(), "print(1)\n");

    workbench.dispatch(Action::Edit {
        node,
        text: "print(2)\n".to_string(),
    });
    workbench.dispatch(Action::RequestClose { node });
    assert!(workbench
        .sink()
        .effects
        .iter()
        .any(|e| matches!(e, Effect::ShowCloseConfirm { file_name, .. } if file_name == "main.py")));

    workbench.dispatch(Action::ConfirmClose(CloseDecision::Save));
    assert!(workbench.wait_message(WAIT));

    assert!(!workbench.store().state().layout.contains(node));
    assert!(workbench.store().state().editors.is_empty());
    assert!(workbench.store().state().close_queue.is_idle());
    assert_eq!(
        std::fs::read_to_string(dir.path().join("main.py")).unwrap(),
        "print(2)\n"
    );
}

#[test]
fn missing_file_reports_read_failure() {
    let dir = tempdir().unwrap();
    let mut workbench = workbench_for(dir.path());

    open(&mut workbench, "/missing.py");
    assert!(workbench.sink().effects.iter().any(|e| matches!(
        e,
        Effect::Notify(n) if n.message.starts_with("Failed to read /missing.py")
    )));
}

#[test]
fn layout_is_persisted_and_restored() {
    let dir = tempdir().unwrap();
    let layout_path = dir.path().join("state").join("layout.json");

    let mut workbench =
        workbench_for(dir.path()).with_layout_storage(LayoutStorage::new(&layout_path));
    workbench.dispatch(Action::OpenTool {
        kind: PanelKind::Settings,
        title: None,
    });
    let saved = std::fs::read_to_string(&layout_path).unwrap();
    assert!(saved.contains("\"settings\""));

    let mut restored =
        workbench_for(dir.path()).with_layout_storage(LayoutStorage::new(&layout_path));
    assert!(restored.restore_layout());
    assert_eq!(
        restored
            .store()
            .state()
            .layout
            .find_nodes_by_kind(PanelKind::Settings)
            .len(),
        1
    );
}

#[test]
fn console_send_goes_to_serial_port() {
    let dir = tempdir().unwrap();
    let port = RecordingPort::default();
    let written = Arc::clone(&port.written);

    let mut workbench = workbench_for(dir.path());
    workbench.dispatch(Action::ConsoleSend("ls\n".to_string()));
    assert!(workbench.sink().effects.iter().any(|e| matches!(
        e,
        Effect::Notify(n) if n.message == "No device connected"
    )));

    let mut workbench = workbench.with_serial(Box::new(port));
    workbench.dispatch(Action::ConsoleSend("ls\n".to_string()));
    assert_eq!(*written.lock().unwrap(), vec!["ls\n".to_string()]);
}

#[test]
fn inbound_serial_bytes_reach_console() {
    let dir = tempdir().unwrap();
    let mut workbench = workbench_for(dir.path());

    let tx = workbench.message_sender();
    tx.send(AppMessage::SerialData(b">>> hello\r\n>>> ".to_vec()))
        .unwrap();
    assert!(workbench.pump());

    let console = &workbench.store().state().console;
    assert_eq!(console.lines().collect::<Vec<_>>(), vec![">>> hello"]);
    assert_eq!(console.partial(), ">>> ");
}
