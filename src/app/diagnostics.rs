/// Sink for diagnostic messages emitted by the selection and rendering engine.
pub trait Diagnostics {
    fn debug(&self, message: &str);
    fn warn(&self, message: &str);
}

/// Forwards diagnostics to the `log` facade.
pub struct LogDiagnostics;

impl Diagnostics for LogDiagnostics {
    fn debug(&self, message: &str) {
        log::debug!("{}", message);
    }

    fn warn(&self, message: &str) {
        log::warn!("{}", message);
    }
}
