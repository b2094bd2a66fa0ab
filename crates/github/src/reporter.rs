//! Reporter writing GitHub Actions workflow commands.

use setup_task_core::reporter::Reporter;
use std::io::Write;
use std::sync::Mutex;

use crate::commands::format_command;

/// [`Reporter`] writing to the job log.
///
/// | Level | Output |
/// |-------|--------|
/// | debug | `::debug::msg`, or a plain line when verbose |
/// | info | plain line |
/// | warn | `::warning::msg` |
/// | error, fail | `::error::msg` |
pub struct ActionsReporter<W: Write + Send = std::io::Stdout> {
    out: Mutex<W>,
    verbose: bool,
}

impl ActionsReporter {
    /// Reporter writing to stdout, where the runner reads workflow commands.
    #[must_use]
    pub fn stdout(verbose: bool) -> Self {
        Self::new(std::io::stdout(), verbose)
    }
}

impl<W: Write + Send> ActionsReporter<W> {
    /// Reporter writing to `out`.
    pub fn new(out: W, verbose: bool) -> Self {
        Self {
            out: Mutex::new(out),
            verbose,
        }
    }

    /// Consume the reporter and return the writer.
    pub fn into_inner(self) -> W {
        self.out.into_inner().unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn line(&self, line: &str) {
        let mut out = self
            .out
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        // Write failures are ignored.
        let _ = writeln!(out, "{line}");
        let _ = out.flush();
    }
}

impl<W: Write + Send> Reporter for ActionsReporter<W> {
    fn debug(&self, message: &str) {
        if self.verbose {
            self.line(message);
        } else {
            self.line(&format_command("debug", message));
        }
    }

    fn info(&self, message: &str) {
        self.line(message);
    }

    fn warn(&self, message: &str) {
        self.line(&format_command("warning", message));
    }

    fn error(&self, message: &str) {
        self.line(&format_command("error", message));
    }

    fn fail(&self, message: &str) {
        self.line(&format_command("error", message));
    }
}
