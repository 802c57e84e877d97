// Internal logging shims. With `feature = "tracing"` they forward to `tracing` under the
// `renderwave` target; otherwise the statement is compiled out.

macro_rules! wtrace {
    ($($tt:tt)*) => {{
        #[cfg(feature = "tracing")]
        tracing::trace!(target: "renderwave", $($tt)*);
    }};
}

macro_rules! wdebug {
    ($($tt:tt)*) => {{
        #[cfg(feature = "tracing")]
        tracing::debug!(target: "renderwave", $($tt)*);
    }};
}

macro_rules! wwarn {
    ($($tt:tt)*) => {{
        #[cfg(feature = "tracing")]
        tracing::warn!(target: "renderwave", $($tt)*);
    }};
}
