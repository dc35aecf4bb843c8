//! Runner wrappers.

#[cfg(feature = "timeout")]
pub mod deadline;
pub mod tracing;

#[cfg(feature = "timeout")]
pub use deadline::{DeadlineRunner, RunnerError};
pub use self::tracing::TracingRunner;
