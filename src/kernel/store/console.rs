use crate::kernel::{Action, Effect};

use super::DispatchResult;

impl super::Store {
    pub(super) fn reduce_console_action(&mut self, action: Action) -> DispatchResult {
        match action {
            Action::SerialData(bytes) => {
                let changed = !bytes.is_empty();
                self.state.console.push_bytes(&bytes);
                DispatchResult::changed(changed, Vec::new())
            }
            Action::ConsoleSend(text) => {
                if text.is_empty() {
                    return DispatchResult::unchanged();
                }
                DispatchResult::changed(false, vec![Effect::SerialWrite(text)])
            }
            Action::ConsoleClear => {
                let changed = !self.state.console.is_empty() || !self.state.console.partial().is_empty();
                self.state.console.clear();
                DispatchResult::changed(changed, Vec::new())
            }
            _ => DispatchResult::unchanged(),
        }
    }
}
