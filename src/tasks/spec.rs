//! # Task specification.
//!
//! [`TaskSpec`] bundles a task with the [`TaskOption`]s that decorate it. The
//! spec is resolved into a single wrapped [`TaskRef`] when it is registered with
//! [`Supervisor::register`](crate::Supervisor::register).
//!
//! ## Rules
//! - Options keep the order they were added in.
//! - The first option becomes the outermost wrapper (see [`crate::options`]).

use crate::options::{self, TaskOption};
use crate::tasks::task::TaskRef;

/// Task plus its decorators.
///
/// ## Example
/// ```rust
/// use std::time::Duration;
/// use tokio_util::sync::CancellationToken;
/// use gracevisor::{TaskFn, TaskOption, TaskRef, TaskSpec};
///
/// let poll: TaskRef = TaskFn::arc(|ctx: CancellationToken| async move {
///     let _ = ctx;
/// });
///
/// let spec = TaskSpec::new(poll)
///     .with_option(TaskOption::restart(3))
///     .with_option(TaskOption::expire(Duration::from_secs(1)));
/// assert_eq!(spec.options().len(), 2);
/// ```
#[derive(Clone)]
pub struct TaskSpec {
    task: TaskRef,
    options: Vec<TaskOption>,
}

impl TaskSpec {
    /// Creates a spec without options.
    pub fn new(task: TaskRef) -> Self {
        Self {
            task,
            options: Vec::new(),
        }
    }

    /// Returns a new spec with `option` appended (it wraps inside the ones already present).
    pub fn with_option(mut self, option: TaskOption) -> Self {
        self.options.push(option);
        self
    }

    /// Returns a new spec with all `options` appended, in order.
    pub fn with_options(mut self, options: impl IntoIterator<Item = TaskOption>) -> Self {
        self.options.extend(options);
        self
    }

    /// Returns the undecorated task.
    pub fn task(&self) -> &TaskRef {
        &self.task
    }

    /// Returns the options in application order.
    pub fn options(&self) -> &[TaskOption] {
        &self.options
    }

    /// Applies every option and returns the decorated task.
    pub fn into_task(self) -> TaskRef {
        options::apply(self.task, &self.options)
    }
}

impl From<TaskRef> for TaskSpec {
    fn from(task: TaskRef) -> Self {
        Self::new(task)
    }
}
