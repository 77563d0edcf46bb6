//! Watches the mounted device directory and reports external entry
//! mutations as device paths.

use notify::event::{CreateKind, ModifyKind, RenameMode};
use notify::{Config, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use rustc_hash::{FxHashMap, FxHashSet};
use std::path::{Component, Path, PathBuf};
use std::sync::mpsc;
use std::time::Duration;

use crate::kernel::Action;

const WATCHER_POLL_INTERVAL: Duration = Duration::from_millis(250);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeviceEvent {
    Created { path: String, is_dir: bool },
    Deleted { path: String },
    Renamed { from: String, to: String },
}

impl From<DeviceEvent> for Action {
    fn from(event: DeviceEvent) -> Self {
        match event {
            DeviceEvent::Created { path, is_dir } => Action::EntryCreated { path, is_dir },
            DeviceEvent::Deleted { path } => Action::EntryDeleted { path },
            DeviceEvent::Renamed { from, to } => Action::EntryRenamed { from, to },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum FsDelta {
    Created { path: PathBuf, is_dir: bool },
    Deleted { path: PathBuf },
    Renamed { from: PathBuf, to: PathBuf },
    /// The source half of a rename whose destination has not been seen.
    RenamedFrom { path: PathBuf },
}

#[derive(Default)]
struct DrainBuckets {
    renamed: FxHashSet<(String, String)>,
    deleted: FxHashSet<String>,
    created: FxHashMap<String, bool>,
    renamed_from: FxHashSet<String>,
}

pub struct DeviceWatcher {
    watcher: RecommendedWatcher,
    raw_event_rx: mpsc::Receiver<notify::Event>,
    root: PathBuf,
    /// Rename sources from the previous drain still waiting for their pair.
    held_from: FxHashSet<String>,
}

impl DeviceWatcher {
    pub fn new(root: &Path) -> Result<Self, notify::Error> {
        let root = root.canonicalize().unwrap_or_else(|_| root.to_path_buf());
        let (tx, rx) = mpsc::channel();
        let mut watcher = RecommendedWatcher::new(
            move |res: Result<notify::Event, notify::Error>| {
                let Ok(event) = res else { return };
                let _ = tx.send(event);
            },
            Config::default().with_poll_interval(WATCHER_POLL_INTERVAL),
        )?;
        watcher.watch(&root, RecursiveMode::Recursive)?;
        Ok(Self {
            watcher,
            raw_event_rx: rx,
            root,
            held_from: FxHashSet::default(),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Collects pending events, deduplicated: renames first, then deletes,
    /// then creates, each sorted by path.
    ///
    /// A rename source without its destination is held for one drain and
    /// only then reported as a delete.
    pub fn drain_events(&mut self) -> Vec<DeviceEvent> {
        let _watcher_guard = &self.watcher;

        let mut buckets = DrainBuckets::default();
        while let Ok(event) = self.raw_event_rx.try_recv() {
            for delta in normalize_notify_event(event) {
                self.route_delta(delta, &mut buckets);
            }
        }

        let DrainBuckets {
            renamed,
            mut deleted,
            created,
            mut renamed_from,
        } = buckets;

        let mut expired = std::mem::take(&mut self.held_from);
        for (from, _) in &renamed {
            expired.remove(from);
            renamed_from.remove(from);
        }
        deleted.extend(expired);
        self.held_from = renamed_from;

        let mut events = Vec::new();

        let mut renamed = renamed.into_iter().collect::<Vec<_>>();
        renamed.sort_unstable();
        for (from, to) in renamed {
            events.push(DeviceEvent::Renamed { from, to });
        }

        let mut deleted = deleted.into_iter().collect::<Vec<_>>();
        deleted.sort_unstable();
        for path in deleted {
            events.push(DeviceEvent::Deleted { path });
        }

        let mut created = created.into_iter().collect::<Vec<_>>();
        created.sort_unstable_by(|(a, _), (b, _)| a.cmp(b));
        for (path, is_dir) in created {
            events.push(DeviceEvent::Created { path, is_dir });
        }

        events
    }

    fn route_delta(&self, delta: FsDelta, buckets: &mut DrainBuckets) {
        match delta {
            FsDelta::Deleted { path } => {
                if let Some(path) = self.to_device_path(&path) {
                    buckets.created.remove(&path);
                    buckets.deleted.insert(path);
                }
            }
            FsDelta::Created { path, is_dir } => {
                if let Some(path) = self.to_device_path(&path) {
                    buckets.deleted.remove(&path);
                    *buckets.created.entry(path).or_default() |= is_dir;
                }
            }
            FsDelta::RenamedFrom { path } => {
                if let Some(path) = self.to_device_path(&path) {
                    buckets.renamed_from.insert(path);
                }
            }
            FsDelta::Renamed { from, to } => {
                let is_dir = infer_is_dir(&to, None);
                match (self.to_device_path(&from), self.to_device_path(&to)) {
                    (Some(from), Some(to)) => {
                        buckets.renamed.insert((from, to));
                    }
                    (Some(from), None) => {
                        buckets.deleted.insert(from);
                    }
                    (None, Some(to)) => {
                        *buckets.created.entry(to).or_default() |= is_dir;
                    }
                    (None, None) => {}
                }
            }
        }
    }

    fn to_device_path(&self, path: &Path) -> Option<String> {
        let relative = path.strip_prefix(&self.root).ok()?;
        let mut out = String::new();
        for component in relative.components() {
            match component {
                Component::Normal(name) => {
                    out.push('/');
                    out.push_str(&name.to_string_lossy());
                }
                _ => return None,
            }
        }
        // The mount root itself is never reported.
        (!out.is_empty()).then_some(out)
    }
}

fn infer_is_dir(path: &Path, create_kind: Option<CreateKind>) -> bool {
    match create_kind {
        Some(CreateKind::Folder) => true,
        Some(CreateKind::File) => false,
        _ => std::fs::metadata(path)
            .map(|meta| meta.is_dir())
            .unwrap_or(false),
    }
}

fn normalize_notify_event(event: notify::Event) -> Vec<FsDelta> {
    match event.kind {
        EventKind::Create(create_kind) => event
            .paths
            .into_iter()
            .map(|path| FsDelta::Created {
                is_dir: infer_is_dir(path.as_path(), Some(create_kind)),
                path,
            })
            .collect(),
        EventKind::Remove(_) => event
            .paths
            .into_iter()
            .map(|path| FsDelta::Deleted { path })
            .collect(),
        EventKind::Modify(ModifyKind::Name(mode)) => normalize_rename(mode, event.paths),
        _ => Vec::new(),
    }
}

fn normalize_rename(mode: RenameMode, mut paths: Vec<PathBuf>) -> Vec<FsDelta> {
    match mode {
        RenameMode::Both if paths.len() >= 2 => {
            let to = paths.swap_remove(1);
            let from = paths.swap_remove(0);
            vec![FsDelta::Renamed { from, to }]
        }
        RenameMode::From => paths
            .into_iter()
            .map(|path| FsDelta::RenamedFrom { path })
            .collect(),
        RenameMode::To => paths
            .into_iter()
            .map(|path| FsDelta::Created {
                is_dir: infer_is_dir(path.as_path(), None),
                path,
            })
            .collect(),
        _ => Vec::new(),
    }
}
