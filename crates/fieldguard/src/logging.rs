//! Conditional tracing macros
//!
//! These wrap `tracing` so the crate still compiles when the `tracing` feature is
//! turned off. `trace_field_failure!` records one failed field with its path,
//! message count and whether a `Required` rule failed. The library never
//! installs a subscriber; that is left to the caller.

/// Log at warn level, only when tracing feature is enabled
#[cfg(feature = "tracing")]
macro_rules! trace_warn {
    ($($arg:tt)*) => {
        tracing::warn!($($arg)*)
    };
}

/// Log at warn level, no-op when tracing feature is disabled
#[cfg(not(feature = "tracing"))]
macro_rules! trace_warn {
    ($($arg:tt)*) => {};
}

/// Log at debug level, only when tracing feature is enabled
#[cfg(feature = "tracing")]
macro_rules! trace_debug {
    ($($arg:tt)*) => {
        tracing::debug!($($arg)*)
    };
}

/// Log at debug level, no-op when tracing feature is disabled
#[cfg(not(feature = "tracing"))]
macro_rules! trace_debug {
    ($($arg:tt)*) => {};
}

/// Log at trace level, only when tracing feature is enabled
#[cfg(feature = "tracing")]
macro_rules! trace_trace {
    ($($arg:tt)*) => {
        tracing::trace!($($arg)*)
    };
}

/// Log at trace level, no-op when tracing feature is disabled
#[cfg(not(feature = "tracing"))]
macro_rules! trace_trace {
    ($($arg:tt)*) => {};
}

/// Log a failed field with its path and failure counts, only when tracing
/// feature is enabled
#[cfg(feature = "tracing")]
macro_rules! trace_field_failure {
    ($path:expr, $report:expr) => {
        tracing::debug!(
            path = %$path,
            messages = $report.messages.len(),
            required_failed = $report.required_failed,
            "field failed"
        )
    };
}

/// Log a failed field, no-op when tracing feature is disabled
#[cfg(not(feature = "tracing"))]
macro_rules! trace_field_failure {
    ($path:expr, $report:expr) => {{
        let _ = (&$path, &$report);
    }};
}

#[cfg(test)]
mod tests {
    use crate::field::FieldReport;

    #[test]
    fn field_failure_only_borrows_report() {
        let path = String::from("users.0.email");
        let report = FieldReport {
            messages: vec!["Invalid email format".to_string()],
            required_failed: false,
        };

        trace_field_failure!(path, report);
        trace_debug!(path = %path, "still usable");

        assert_eq!(path, "users.0.email");
        assert_eq!(report.messages.len(), 1);
    }
}
