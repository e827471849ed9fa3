/// Trait for reporting pipeline progress.
///
/// The CLI implements it with indicatif spinners; tests and embedders use
/// `SilentReporter`. All methods have default no-op implementations.
pub trait PassReporter {
    fn on_pass_start(&self, _pass: &str) {}
    fn on_pass_complete(&self, _pass: &str, _affected: usize, _duration_secs: f64) {}
}

/// No-op progress reporter for silent operation.
pub struct SilentReporter;

impl PassReporter for SilentReporter {}
