//! Task list services: the task record, the persistent key-value store it is
//! saved to, and the controller that keeps the two in step.

pub mod store;
pub mod task;
pub mod task_list;

pub use store::{FileStore, KeyValueStore, MemoryStore, StoreError, StoreResult};
pub use task::{FilterMode, Task};
pub use task_list::{default_tasks, filter, TaskList};
