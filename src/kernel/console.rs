//! Line buffer for the serial text stream.

use memchr::memchr;
use std::collections::VecDeque;

/// An unterminated tail longer than this is flushed as a line of its own.
pub const MAX_PARTIAL: usize = 4096;

#[derive(Debug, Clone)]
pub struct ConsoleState {
    lines: VecDeque<String>,
    partial: Vec<u8>,
    scrollback: usize,
}

impl ConsoleState {
    pub fn new(scrollback: usize) -> Self {
        Self {
            lines: VecDeque::new(),
            partial: Vec::new(),
            scrollback: scrollback.max(1),
        }
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().map(String::as_str)
    }

    /// The unterminated tail of the stream.
    pub fn partial(&self) -> String {
        String::from_utf8_lossy(&self.partial).into_owned()
    }

    /// Splits `bytes` on `\n`; the unterminated tail is kept for the next
    /// chunk. Returns the number of completed lines.
    pub fn push_bytes(&mut self, mut bytes: &[u8]) -> usize {
        let mut completed = 0;
        while let Some(idx) = memchr(b'\n', bytes) {
            self.partial.extend_from_slice(&bytes[..idx]);
            if self.partial.last() == Some(&b'\r') {
                self.partial.pop();
            }
            let line = String::from_utf8_lossy(&self.partial).into_owned();
            self.partial.clear();
            self.push_line(line);
            completed += 1;
            bytes = &bytes[idx + 1..];
        }
        self.partial.extend_from_slice(bytes);
        while self.partial.len() >= MAX_PARTIAL {
            let rest = self.partial.split_off(MAX_PARTIAL);
            let line = String::from_utf8_lossy(&self.partial).into_owned();
            self.partial = rest;
            self.push_line(line);
            completed += 1;
        }
        completed
    }

    pub fn clear(&mut self) {
        self.lines.clear();
        self.partial.clear();
    }

    pub fn set_scrollback(&mut self, scrollback: usize) {
        self.scrollback = scrollback.max(1);
        self.trim();
    }

    fn push_line(&mut self, line: String) {
        self.lines.push_back(line);
        self.trim();
    }

    fn trim(&mut self) {
        while self.lines.len() > self.scrollback {
            self.lines.pop_front();
        }
    }
}

impl Default for ConsoleState {
    fn default() -> Self {
        Self::new(1000)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/kernel/console.rs"]
mod tests;
