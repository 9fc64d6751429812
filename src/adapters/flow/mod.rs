//! Flow definition adapters.

mod file_loader;

pub use file_loader::{FileFlowLoader, FlowFormat};
