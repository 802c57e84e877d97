/// An advisory produced when an input is clamped to a valid value.
///
/// Warnings never abort a computation; they are logged (with `feature = "tracing"`) and kept
/// on the engine so hosts can surface them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ConfigWarning {
    #[error("default item height must be positive; using 1px")]
    NonPositiveItemHeight,
    #[error("container size must be positive; using 1px")]
    NonPositiveContainerSize,
    #[error("batch size must be at least 1; using 1")]
    ZeroBatchSize,
    #[error("item set is empty")]
    EmptyItemSet,
    #[error("start index {start_index} is past the end of the list ({count} items)")]
    StartIndexOutOfBounds { start_index: usize, count: usize },
    #[error("index {index} is out of bounds ({count} items)")]
    IndexOutOfBounds { index: usize, count: usize },
    #[error("measured height for index {index} is negative or not a number; using 0px")]
    InvalidMeasuredHeight { index: usize },
}

/// A failure inside an [`crate::Accelerator`] backend.
///
/// These never reach engine callers: [`crate::AcceleratedPath`] recovers by running the
/// reference implementation instead.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum AccelError {
    #[error("accelerator is not loaded")]
    NotLoaded,
    #[error("accelerator failed to load: {0}")]
    LoadFailed(&'static str),
    #[error("input is not supported by the accelerator")]
    Unsupported,
    #[error("accelerator disagrees with the reference implementation")]
    SelfCheck,
    #[error("accelerator backend error: {0}")]
    Backend(&'static str),
}
