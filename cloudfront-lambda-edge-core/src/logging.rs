//! Diagnostic notices emitted while transforming a template.
//!
//! Components never write to a global console. They report through a
//! [`LogSink`] handed in by the caller, and every notice is also kept for the
//! [`TransformReport`](crate::TransformReport).

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: String,
}

/// Receiver for transformation notices. Logging failures are the sink's
/// problem; nothing here can abort a transformation.
pub trait LogSink {
    fn record(&mut self, diagnostic: &Diagnostic);
}

/// Forwards notices to the `log` facade.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogFacadeSink;

impl LogSink for LogFacadeSink {
    fn record(&mut self, diagnostic: &Diagnostic) {
        match diagnostic.severity {
            Severity::Info => log::info!("{}", diagnostic.message),
            Severity::Warning => log::warn!("{}", diagnostic.message),
        }
    }
}

/// Collects notices in memory.
impl LogSink for Vec<Diagnostic> {
    fn record(&mut self, diagnostic: &Diagnostic) {
        self.push(diagnostic.clone());
    }
}

impl<'a> dyn LogSink + 'a {
    pub fn info(&mut self, message: impl Into<String>) {
        self.record(&Diagnostic {
            severity: Severity::Info,
            message: message.into(),
        });
    }

    pub fn warn(&mut self, message: impl Into<String>) {
        self.record(&Diagnostic {
            severity: Severity::Warning,
            message: message.into(),
        });
    }
}

/// Forwards to the caller's sink and keeps a copy for the report.
pub(crate) struct Diagnostics<'s> {
    sink: &'s mut dyn LogSink,
    entries: Vec<Diagnostic>,
}

impl<'s> Diagnostics<'s> {
    pub(crate) fn new(sink: &'s mut dyn LogSink) -> Self {
        Self {
            sink,
            entries: Vec::new(),
        }
    }

    pub(crate) fn into_entries(self) -> Vec<Diagnostic> {
        self.entries
    }
}

impl LogSink for Diagnostics<'_> {
    fn record(&mut self, diagnostic: &Diagnostic) {
        self.sink.record(diagnostic);
        self.entries.push(diagnostic.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diagnostics_forward_and_keep_order() {
        let mut sink: Vec<Diagnostic> = Vec::new();
        let mut diagnostics = Diagnostics::new(&mut sink);
        let log: &mut dyn LogSink = &mut diagnostics;
        log.info("first");
        log.warn("second");
        let kept = diagnostics.into_entries();

        assert_eq!(kept, sink);
        assert_eq!(kept[0].severity, Severity::Info);
        assert_eq!(kept[1].severity, Severity::Warning);
        assert_eq!(kept[1].message, "second");
    }

    #[test_log::test]
    fn test_log_facade_sink_accepts_both_severities() {
        let mut sink = LogFacadeSink;
        let mut diagnostics = Diagnostics::new(&mut sink);
        let log: &mut dyn LogSink = &mut diagnostics;
        log.info("informational");
        log.warn("warning");
        assert_eq!(diagnostics.into_entries().len(), 2);
    }
}
