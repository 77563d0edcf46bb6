//! Line-command host: drives the workbench from stdin against a mounted
//! device directory.

use std::io::{self, BufRead};
use std::path::PathBuf;
use std::sync::mpsc;
use std::sync::Arc;
use std::time::Duration;

use boardshell::app::{UiSink, Workbench};
use boardshell::kernel::services::adapters::{
    ensure_settings_file, load_settings_from, AsyncRuntime, DeviceWatcher, LayoutStorage,
    LocalGateway,
};
use boardshell::kernel::services::ports::{FileHandle, FileSystemGateway, Settings, WorkbenchConfig};
use boardshell::kernel::{
    Action, CloseDecision, CloseFilter, Effect, EntryPromptKind, FsRequest, NodeId,
    NotificationLevel, OpenOptions, PanelKind, SearchScope, Store, TabTarget, WorkspaceState,
};

mod logging;

const TICK: Duration = Duration::from_millis(50);

struct StderrSink;

impl UiSink for StderrSink {
    fn present(&mut self, effect: &Effect) {
        match effect {
            Effect::Notify(n) => {
                let level = match n.level {
                    NotificationLevel::Info => "info",
                    NotificationLevel::Warning => "warning",
                    NotificationLevel::Error => "error",
                };
                eprintln!("[{}] {}", level, n.message);
            }
            Effect::ShowCloseConfirm { file_name, .. } => {
                eprintln!("\"{}\" has unsaved changes. Save? (yes / no / cancel)", file_name);
            }
            Effect::ShowEntryPrompt(prompt) => match &prompt.warning {
                Some(warning) => eprintln!("{}: {} ({})", prompt.kind.title(), prompt.value, warning),
                None => eprintln!("{}: {}", prompt.kind.title(), prompt.value),
            },
            _ => tracing::trace!(?effect, "ui effect"),
        }
    }
}

fn main() -> io::Result<()> {
    let logging = logging::init();
    if let Some(guard) = &logging {
        eprintln!("logs: {}", guard.log_dir().display());
    }

    let settings = ensure_settings_file()
        .ok()
        .and_then(|path| load_settings_from(&path))
        .unwrap_or_default();
    let root = match std::env::args().nth(1) {
        Some(arg) => PathBuf::from(arg),
        None => settings
            .device_root
            .as_ref()
            .map(PathBuf::from)
            .map_or_else(std::env::current_dir, Ok)?,
    };
    tracing::info!(root = %root.display(), "starting boardshell");

    let mut workbench = build_workbench(&root, &settings)?;
    if settings.restore_layout {
        workbench.restore_layout();
    }
    workbench.dispatch(Action::Fs(FsRequest::ListFolder {
        path: "/".to_string(),
    }));

    let (line_tx, line_rx) = mpsc::channel::<String>();
    std::thread::spawn(move || {
        for line in io::stdin().lock().lines().map_while(Result::ok) {
            if line_tx.send(line).is_err() {
                break;
            }
        }
    });

    loop {
        workbench.pump();
        match line_rx.recv_timeout(TICK) {
            Ok(line) => {
                if !run_command(&mut workbench, line.trim()) {
                    break;
                }
            }
            Err(mpsc::RecvTimeoutError::Timeout) => {}
            Err(mpsc::RecvTimeoutError::Disconnected) => break,
        }
    }

    workbench.persist_layout();
    Ok(())
}

fn build_workbench(root: &std::path::Path, settings: &Settings) -> io::Result<Workbench<StderrSink>> {
    let (tx, rx) = mpsc::channel();
    let gateway: Arc<dyn FileSystemGateway> = Arc::new(LocalGateway::new(root));
    let runtime = AsyncRuntime::new(tx.clone(), gateway)?;
    let store = Store::new(WorkspaceState::new(WorkbenchConfig::from(settings)));
    let mut workbench = Workbench::new(store, runtime, (tx, rx), StderrSink);

    if let Some(storage) = LayoutStorage::default_location() {
        workbench = workbench.with_layout_storage(storage);
    }
    if settings.watch_device {
        match DeviceWatcher::new(root) {
            Ok(watcher) => workbench = workbench.with_watcher(watcher),
            Err(e) => tracing::warn!(error = %e, "device watcher unavailable"),
        }
    }
    Ok(workbench)
}

fn tab_at(workbench: &Workbench<StderrSink>, index: &str) -> Option<NodeId> {
    let index: usize = index.parse().ok()?;
    workbench
        .store()
        .state()
        .layout
        .tabs(SearchScope::All)
        .get(index)
        .map(|tab| tab.id)
}

fn print_tabs(workbench: &Workbench<StderrSink>) {
    let layout = &workbench.store().state().layout;
    let active = layout.active_node_id();
    for (i, tab) in layout.tabs(SearchScope::All).iter().enumerate() {
        let marker = if Some(tab.id) == active { '*' } else { ' ' };
        println!("{}{:>3} {:<12} {}", marker, i, tab.kind.label(), tab.title);
    }
}

fn print_folder(workbench: &Workbench<StderrSink>) {
    let explorer = &workbench.store().state().explorer;
    println!("{}", explorer.current_dir);
    for entry in &explorer.entries {
        let suffix = if entry.is_dir { "/" } else { "" };
        println!("  {}{}", entry.name, suffix);
    }
}

/// Returns `false` when the host should exit.
fn run_command(workbench: &mut Workbench<StderrSink>, line: &str) -> bool {
    let (cmd, rest) = line.split_once(' ').unwrap_or((line, ""));
    let rest = rest.trim();
    let current_dir = workbench.store().state().explorer.current_dir.clone();

    let action = match cmd {
        "" => None,
        "quit" | "exit" => return false,
        "tabs" => {
            print_tabs(workbench);
            None
        }
        "open" => Some(Action::OpenFile {
            handle: FileHandle::new(rest.trim_end_matches(" ro")),
            options: OpenOptions {
                read_only: rest.ends_with(" ro"),
                is_new_file: false,
            },
        }),
        "tool" => match PanelKind::from_name(rest) {
            Some(kind) => Some(Action::OpenTool { kind, title: None }),
            None => {
                eprintln!("unknown panel kind: {}", rest);
                None
            }
        },
        "switch" => PanelKind::from_name(rest).map(|kind| Action::SwitchTab {
            target: TabTarget::Kind(kind),
        }),
        "select" => tab_at(workbench, rest).map(|node| Action::SelectTab { node }),
        "close" => tab_at(workbench, rest).map(|node| Action::RequestClose { node }),
        "close-others" | "close-left" | "close-right" | "close-saved" | "close-all" => {
            let filter = match cmd {
                "close-others" => CloseFilter::Others,
                "close-left" => CloseFilter::Left,
                "close-right" => CloseFilter::Right,
                "close-saved" => CloseFilter::Saved,
                _ => CloseFilter::All,
            };
            tab_at(workbench, rest).map(|node| Action::CloseTabs { node, filter })
        }
        "save" => tab_at(workbench, rest).map(|node| Action::Save { node }),
        "edit" => {
            let (index, text) = rest.split_once(' ').unwrap_or((rest, ""));
            tab_at(workbench, index).map(|node| Action::Edit {
                node,
                text: text.replace("\\n", "\n"),
            })
        }
        "yes" => Some(Action::ConfirmClose(CloseDecision::Save)),
        "no" => Some(Action::ConfirmClose(CloseDecision::Discard)),
        "cancel" => Some(Action::ConfirmClose(CloseDecision::Cancel)),
        "ls" => {
            let path = if rest.is_empty() { current_dir } else { rest.to_string() };
            Some(Action::Fs(FsRequest::ListFolder { path }))
        }
        "dir" => {
            print_folder(workbench);
            None
        }
        "touch" => Some(Action::BeginPrompt(EntryPromptKind::NewFile {
            parent_dir: current_dir,
        })),
        "mkdir" => Some(Action::BeginPrompt(EntryPromptKind::NewFolder {
            parent_dir: current_dir,
        })),
        "rename" => Some(Action::BeginPrompt(EntryPromptKind::Rename {
            from: rest.to_string(),
        })),
        "dup" => Some(Action::BeginPrompt(EntryPromptKind::Duplicate {
            from: rest.to_string(),
        })),
        "name" => Some(Action::SubmitPrompt {
            value: rest.to_string(),
        }),
        "dismiss" => Some(Action::DismissPrompt),
        "rm" => Some(Action::Fs(FsRequest::Delete {
            path: boardshell::kernel::path::normalize(rest),
            is_dir: rest.ends_with('/'),
        })),
        "mv" => rest.split_once(' ').map(|(from, to_dir)| {
            Action::Fs(FsRequest::Move {
                from: from.to_string(),
                to_dir: to_dir.trim().to_string(),
            })
        }),
        "send" => Some(Action::ConsoleSend(format!("{}\r\n", rest))),
        "console" => {
            let console = &workbench.store().state().console;
            for line in console.lines() {
                println!("{}", line);
            }
            None
        }
        "clear" => Some(Action::ConsoleClear),
        _ => {
            eprintln!("unknown command: {}", cmd);
            None
        }
    };

    if let Some(action) = action {
        workbench.dispatch(action);
    }
    true
}
