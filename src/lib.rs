//! Find running cells processes and let the user pick one to attach a debugger to.

pub mod filter;
pub mod picker;
pub mod process;

pub use filter::DisplayItem;
pub use picker::{list_processes, pick_process, Notifier, PickOptions, Selector};
pub use process::{collect_processes, ProcessRecord, ProcessSource, SystemProcesses};
