//! Workbench: owns the store and the async runtime, turns effects into I/O
//! and feeds completions back in as actions.

use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::time::Duration;

use crate::kernel::services::adapters::{AppMessage, AsyncRuntime, DeviceWatcher, LayoutStorage};
use crate::kernel::services::ports::SerialPort;
use crate::kernel::{Action, Effect, Notification, Store};

/// Receives the effects meant for a presentation layer: dialogs,
/// notifications and focus/layout changes.
pub trait UiSink {
    fn present(&mut self, effect: &Effect);
}

pub struct Workbench<S: UiSink> {
    store: Store,
    runtime: AsyncRuntime,
    tx: Sender<AppMessage>,
    rx: Receiver<AppMessage>,
    sink: S,
    serial: Option<Box<dyn SerialPort>>,
    layout_storage: Option<LayoutStorage>,
    watcher: Option<DeviceWatcher>,
}

impl<S: UiSink> Workbench<S> {
    /// `runtime` must have been built with the sender paired to `rx`.
    pub fn new(
        store: Store,
        runtime: AsyncRuntime,
        channel: (Sender<AppMessage>, Receiver<AppMessage>),
        sink: S,
    ) -> Self {
        let (tx, rx) = channel;
        Self {
            store,
            runtime,
            tx,
            rx,
            sink,
            serial: None,
            layout_storage: None,
            watcher: None,
        }
    }

    pub fn with_serial(mut self, port: Box<dyn SerialPort>) -> Self {
        self.serial = Some(port);
        self
    }

    pub fn with_layout_storage(mut self, storage: LayoutStorage) -> Self {
        self.layout_storage = Some(storage);
        self
    }

    pub fn with_watcher(mut self, watcher: DeviceWatcher) -> Self {
        self.watcher = Some(watcher);
        self
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    /// Sender for inbound serial bytes or other background producers.
    pub fn message_sender(&self) -> Sender<AppMessage> {
        self.tx.clone()
    }

    pub fn dispatch(&mut self, action: Action) -> bool {
        let result = self.store.dispatch(action);
        for effect in result.effects {
            self.run_effect(effect);
        }
        result.state_changed
    }

    fn run_effect(&mut self, effect: Effect) {
        match effect {
            Effect::LoadFile {
                key,
                request_id,
                path,
            } => self.runtime.load_file(key, request_id, path),
            Effect::WriteFile {
                key,
                version,
                path,
                text,
            } => self.runtime.write_file(key, version, path, text),
            Effect::Fs(request) => self.runtime.run_fs(request),
            Effect::SerialWrite(text) => self.serial_write(&text),
            Effect::FileClosed { key, path } => {
                tracing::debug!(%key, %path, "file handle released");
            }
            Effect::LayoutChanged { revision } => {
                self.persist_layout();
                self.sink.present(&Effect::LayoutChanged { revision });
            }
            effect => self.sink.present(&effect),
        }
    }

    fn serial_write(&mut self, text: &str) {
        let error = match self.serial.as_mut() {
            Some(port) => match port.write_text(text) {
                Ok(()) => return,
                Err(e) => format!("Serial write failed: {}", e),
            },
            None => "No device connected".to_string(),
        };
        tracing::warn!(%error, "serial write dropped");
        self.sink
            .present(&Effect::Notify(Notification::warning(error)));
    }

    fn handle_message(&mut self, message: AppMessage) -> bool {
        self.dispatch(message.into())
    }

    /// Applies every completion and watcher event available right now.
    pub fn pump(&mut self) -> bool {
        let mut changed = false;
        loop {
            match self.rx.try_recv() {
                Ok(message) => changed |= self.handle_message(message),
                Err(mpsc::TryRecvError::Empty) | Err(mpsc::TryRecvError::Disconnected) => break,
            }
        }
        let events = self
            .watcher
            .as_mut()
            .map(|watcher| watcher.drain_events())
            .unwrap_or_default();
        for event in events {
            changed |= self.dispatch(event.into());
        }
        changed
    }

    /// Blocks for at most `timeout` until one message arrives and applies it.
    /// Returns `false` when nothing arrived.
    pub fn wait_message(&mut self, timeout: Duration) -> bool {
        match self.rx.recv_timeout(timeout) {
            Ok(message) => {
                self.handle_message(message);
                true
            }
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => false,
        }
    }

    /// Loads the persisted layout, if any, into the store.
    pub fn restore_layout(&mut self) -> bool {
        let Some(storage) = self.layout_storage.as_ref() else {
            return false;
        };
        match storage.load() {
            Ok(Some(json)) => self.dispatch(Action::RestoreLayout { json }),
            Ok(None) => false,
            Err(e) => {
                tracing::warn!(path = %storage.path().display(), error = %e, "layout load failed");
                false
            }
        }
    }

    pub fn persist_layout(&self) {
        let Some(storage) = self.layout_storage.as_ref() else {
            return;
        };
        let json = match self.store.state().layout.serialize() {
            Ok(json) => json,
            Err(e) => {
                tracing::warn!(error = %e, "layout serialize failed");
                return;
            }
        };
        if let Err(e) = storage.save(&json) {
            tracing::warn!(path = %storage.path().display(), error = %e, "layout save failed");
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/app/workbench.rs"]
mod tests;
