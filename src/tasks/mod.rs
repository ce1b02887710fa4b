//! # Task abstractions and specifications.
//!
//! - [`Task`] - trait for async cancelable units of work
//! - [`TaskFn`] - closure-backed implementation
//! - [`TaskRef`] - shared reference to a task (`Arc<dyn Task>`)
//! - [`TaskSpec`] - task plus its option decorators

mod spec;
mod task;
mod task_fn;

pub use spec::TaskSpec;
pub use task::{Task, TaskRef};
pub use task_fn::TaskFn;
