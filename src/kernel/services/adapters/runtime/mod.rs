//! Async runtime adapter: executes IO effects and sends messages back to the host.

mod async_runtime;
mod message;

pub use async_runtime::{execute_fs, AsyncRuntime};
pub use message::AppMessage;
