/// Observer for `(message, percent)` status updates.
///
/// `percent` is in `[0, 100]` when known. Implementations must not assume which thread calls them.
pub trait ProgressSink {
    fn report(&mut self, message: &str, percent: Option<f64>);
}

impl<F> ProgressSink for F
where
    F: FnMut(&str, Option<f64>),
{
    fn report(&mut self, message: &str, percent: Option<f64>) {
        self(message, percent)
    }
}

/// Discards every update.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullProgress;

impl ProgressSink for NullProgress {
    fn report(&mut self, _message: &str, _percent: Option<f64>) {}
}

/// Forwards updates to `tracing` at info level.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogProgress;

impl ProgressSink for LogProgress {
    fn report(&mut self, message: &str, percent: Option<f64>) {
        match percent {
            Some(p) => tracing::info!(percent = p, "{message}"),
            None => tracing::info!("{message}"),
        }
    }
}

/// Per-invocation wrapper that keeps reported percentages in `[0, 100]` and non-decreasing.
pub struct ProgressTracker<'a> {
    sink: &'a mut dyn ProgressSink,
    last: f64,
}

impl<'a> ProgressTracker<'a> {
    pub fn new(sink: &'a mut dyn ProgressSink) -> Self {
        Self { sink, last: 0.0 }
    }

    pub fn step(&mut self, message: &str, percent: f64) {
        let p = if percent.is_finite() {
            percent.clamp(0.0, 100.0).max(self.last)
        } else {
            self.last
        };
        self.last = p;
        self.sink.report(message, Some(p));
    }

    /// Report a fatal failure. The percentage is left unspecified.
    pub fn fail(&mut self, err: &dyn std::fmt::Display) {
        self.sink.report(&format!("Error: {err}"), None);
    }

    pub fn last_percent(&self) -> f64 {
        self.last
    }
}

#[cfg(test)]
#[path = "../tests/unit/progress.rs"]
mod tests;
