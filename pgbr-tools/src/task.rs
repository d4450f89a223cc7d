use anyhow::Error;

/// Attributes progress/log lines from a long-running operation (a link-engine traversal, a
/// delete workflow) to whatever is driving it, instead of hard-coding a logging backend.
///
/// When no task context is supplied, callers fall back to the `log` facade directly.
pub trait TaskLog {
    /// If the operation should be aborted, this should fail with a reasonable error message.
    fn check_abort(&self) -> Result<(), Error>;

    fn log(&self, level: log::Level, message: &std::fmt::Arguments);
}

impl<T: TaskLog + ?Sized> TaskLog for std::sync::Arc<T> {
    fn check_abort(&self) -> Result<(), Error> {
        <T as TaskLog>::check_abort(self)
    }

    fn log(&self, level: log::Level, message: &std::fmt::Arguments) {
        <T as TaskLog>::log(self, level, message)
    }
}

#[macro_export]
macro_rules! task_error {
    ($task:expr, $($fmt:tt)+) => {{
        $crate::task::TaskLog::log(&*$task, log::Level::Error, &format_args!($($fmt)+))
    }};
}

#[macro_export]
macro_rules! task_warn {
    ($task:expr, $($fmt:tt)+) => {{
        $crate::task::TaskLog::log(&*$task, log::Level::Warn, &format_args!($($fmt)+))
    }};
}

#[macro_export]
macro_rules! task_log {
    ($task:expr, $($fmt:tt)+) => {{
        $crate::task::TaskLog::log(&*$task, log::Level::Info, &format_args!($($fmt)+))
    }};
}

#[macro_export]
macro_rules! task_debug {
    ($task:expr, $($fmt:tt)+) => {{
        $crate::task::TaskLog::log(&*$task, log::Level::Debug, &format_args!($($fmt)+))
    }};
}
