//! User-facing reporting for pipeline progress.
//!
//! Components receive an `Arc<dyn Reporter>` instead of reaching for a global
//! logger. The host decides how messages surface: [`TracingReporter`] routes
//! them through `tracing`, the GitHub Actions host turns them into workflow
//! commands.

use std::sync::Arc;

/// Sink for messages addressed to the person reading the job log.
pub trait Reporter: Send + Sync {
    /// Diagnostic detail, hidden unless verbose output is requested.
    fn debug(&self, message: &str);

    /// Normal progress message.
    fn info(&self, message: &str);

    /// Recoverable anomaly (cache miss with a missing payload, failed save).
    fn warn(&self, message: &str);

    /// Error that does not by itself fail the run.
    fn error(&self, message: &str);

    /// Mark the run as failed with `message`.
    fn fail(&self, message: &str);
}

/// Reporter that forwards to `tracing` macros.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingReporter;

impl TracingReporter {
    /// Create a shared tracing reporter.
    #[must_use]
    pub fn shared() -> Arc<dyn Reporter> {
        Arc::new(Self)
    }
}

impl Reporter for TracingReporter {
    fn debug(&self, message: &str) {
        tracing::debug!("{message}");
    }

    fn info(&self, message: &str) {
        tracing::info!("{message}");
    }

    fn warn(&self, message: &str) {
        tracing::warn!("{message}");
    }

    fn error(&self, message: &str) {
        tracing::error!("{message}");
    }

    fn fail(&self, message: &str) {
        tracing::error!(failed = true, "{message}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::RecordingReporter;

    #[test]
    fn test_tracing_reporter_accepts_all_levels() {
        let reporter = TracingReporter::shared();
        reporter.debug("debug");
        reporter.info("info");
        reporter.warn("warn");
        reporter.error("error");
        reporter.fail("fail");
    }

    #[test]
    fn test_recording_reporter_filters_by_level() {
        let reporter = RecordingReporter::default();
        reporter.info("installing");
        reporter.warn("cache miss");
        reporter.warn("cache save failed");

        assert_eq!(reporter.messages("info"), vec!["installing"]);
        assert_eq!(reporter.warnings().len(), 2);
        assert!(reporter.failures().is_empty());

        reporter.fail("verification failed");
        assert_eq!(reporter.failures(), vec!["verification failed"]);
    }
}
